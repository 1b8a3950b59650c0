use brine_nano_schema::{qualify, DescriptorPool};
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{NanoError, Warning},
    gen_java::JavaEmitter,
    names::{file_class_full_name, is_outer_class_needed, java_file_path, NameResolver},
    params::{parse_generator_parameter, resolve_params, EnumStyle},
    verifier::verify_file,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub path:    String,
    pub content: String,
}

/// Everything produced for one root file. Nothing is written by the
/// compiler itself; the caller decides where the files go.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Generation {
    pub files:    Vec<OutputFile>,
    /// The `output_list_file` listing, when one was requested.
    pub manifest: Option<OutputFile>,
    #[serde(skip)]
    pub warnings: Vec<Warning>,
}

impl Generation {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }
}

/// Generates Java sources for `root_file` (which must be in `pool`) using
/// the raw `key=value,...` generator parameter.
///
/// Either every output is produced or an error is returned; there is no
/// partial result.
pub fn generate(pool: &DescriptorPool, root_file: &str, parameter: &str) -> Result<Generation, NanoError> {
    let file = pool
        .file(root_file)
        .ok_or_else(|| NanoError::Pool(format!("File \"{}\" not found", root_file)))?;

    let options = parse_generator_parameter(parameter);
    let resolution = resolve_params(pool, file, &options)?;
    let params = &resolution.params;
    verify_file(params, file)?;

    let names = NameResolver::new(params, pool);
    let emitter = JavaEmitter::new(names, file);
    let mut files = Vec::new();

    let path = java_file_path(&file_class_full_name(params, file));
    debug!(%path, outer_class = is_outer_class_needed(params, file), "emitting primary unit");
    files.push(OutputFile { path, content: emitter.primary_unit()? });

    if params.multiple_files(&file.name) {
        for message in &file.message_types {
            let class_name = names.class_name_of(&qualify(&file.package, &message.name))?;
            let path = java_file_path(&class_name);
            debug!(%path, "emitting message");
            files.push(OutputFile { path, content: emitter.message_unit(message)? });
        }
        if params.enum_style() == EnumStyle::NestedType {
            for enum_type in &file.enum_types {
                let class_name = names.class_name_of(&qualify(&file.package, &enum_type.name))?;
                let path = java_file_path(&class_name);
                debug!(%path, "emitting enum");
                files.push(OutputFile { path, content: emitter.enum_unit(enum_type) });
            }
        }
    }

    let manifest = params.output_list_file().map(|path| OutputFile {
        path:    path.to_string(),
        content: files.iter().map(|f| format!("{}\n", f.path)).collect(),
    });

    Ok(Generation { files, manifest, warnings: resolution.warnings })
}

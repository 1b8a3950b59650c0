use std::collections::{BTreeMap, HashSet};

use brine_nano_schema::{DescriptorPool, FileDescriptor};
use tracing::{debug, warn};

use crate::error::{NanoError, Warning};

/// How enum values are exposed in generated code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnumStyle {
    /// Values are `int` constants in the enclosing class.
    #[default]
    Constants,
    /// Each enum gets its own nested type holding the constants.
    NestedType,
}

/// How singular scalar fields are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionalFieldStyle {
    /// Primitive storage; presence tracked in bit fields.
    #[default]
    Default,
    /// Boxed storage; `null` means unset.
    RefTypes,
}

/// Options that apply to a single schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileParams {
    pub outer_classname: Option<String>,
    pub java_package:    Option<String>,
    pub multiple_files:  Option<bool>,
}

/// Generator configuration for one run. Built by [`resolve_params`] and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Params {
    files:                   BTreeMap<String, FileParams>,
    override_multiple_files: Option<bool>,
    store_unknown_fields:    bool,
    enum_style:              EnumStyle,
    optional_field_style:    OptionalFieldStyle,
    generate_equals:         bool,
    output_list_file:        Option<String>,
}

impl Params {
    pub fn file(&self, name: &str) -> Option<&FileParams> {
        self.files.get(name)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn java_package(&self, file: &str) -> Option<&str> {
        self.files.get(file)?.java_package.as_deref()
    }

    pub fn outer_classname(&self, file: &str) -> Option<&str> {
        self.files.get(file)?.outer_classname.as_deref()
    }

    /// A global override wins over the file's own option.
    pub fn multiple_files(&self, file: &str) -> bool {
        if let Some(value) = self.override_multiple_files {
            return value;
        }
        self.files
            .get(file)
            .and_then(|f| f.multiple_files)
            .unwrap_or(false)
    }

    pub fn store_unknown_fields(&self) -> bool {
        self.store_unknown_fields
    }

    pub fn enum_style(&self) -> EnumStyle {
        self.enum_style
    }

    pub fn use_reference_types(&self) -> bool {
        self.optional_field_style == OptionalFieldStyle::RefTypes
    }

    pub fn generate_equals(&self) -> bool {
        self.generate_equals
    }

    pub fn output_list_file(&self) -> Option<&str> {
        self.output_list_file.as_deref()
    }

    pub fn set_java_package(&mut self, file: &str, package: &str) {
        self.entry(file).java_package = Some(package.to_string());
    }

    pub fn set_outer_classname(&mut self, file: &str, classname: &str) {
        self.entry(file).outer_classname = Some(classname.to_string());
    }

    pub fn set_multiple_files(&mut self, file: &str, value: bool) {
        self.entry(file).multiple_files = Some(value);
    }

    pub fn set_override_multiple_files(&mut self, value: bool) {
        self.override_multiple_files = Some(value);
    }

    pub fn set_store_unknown_fields(&mut self, value: bool) {
        self.store_unknown_fields = value;
    }

    pub fn set_enum_style(&mut self, style: EnumStyle) {
        self.enum_style = style;
    }

    pub fn set_optional_field_style(&mut self, style: OptionalFieldStyle) {
        self.optional_field_style = style;
    }

    pub fn set_generate_equals(&mut self, value: bool) {
        self.generate_equals = value;
    }

    fn entry(&mut self, file: &str) -> &mut FileParams {
        self.files.entry(file.to_string()).or_default()
    }
}

/// Resolved parameters plus anything worth telling the user about.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub params:   Params,
    pub warnings: Vec<Warning>,
}

/// Splits `a=b,c,d=e` into key/value pairs. A part without `=` gets an
/// empty value; empty parts are skipped.
pub fn parse_generator_parameter(text: &str) -> Vec<(String, String)> {
    text.split(',')
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (part.to_string(), String::new()),
        })
        .collect()
}

/// Seeds per-file parameters from `root` and every file it depends on, then
/// layers the command line `options` on top.
pub fn resolve_params(
    pool:    &DescriptorPool,
    root:    &FileDescriptor,
    options: &[(String, String)],
) -> Result<Resolution, NanoError> {
    let mut params = Params::default();
    let mut visited = HashSet::new();
    seed_recursively(&mut params, pool, root, &mut visited)?;

    let mut warnings = Vec::new();
    for (key, value) in options {
        match key.as_str() {
            "output_list_file" => {
                params.output_list_file = Some(value.clone());
            }
            "java_package" => {
                let (file, package) = split_compound(key, value, "expecting filename|PackageName")?;
                params.set_java_package(file, package);
            }
            "java_outer_classname" => {
                let (file, classname) = split_compound(key, value, "expecting filename|ClassName")?;
                params.set_outer_classname(file, classname);
            }
            "store_unknown_fields" => {
                params.set_store_unknown_fields(value == "true");
            }
            "java_multiple_files" => {
                params.set_override_multiple_files(value == "true");
            }
            "generate_equals" => {
                params.set_generate_equals(value == "true");
            }
            "enum_style" => {
                let style = match value.as_str() {
                    "c" => EnumStyle::Constants,
                    "java" => EnumStyle::NestedType,
                    _ => return Err(config_error(key, value, "expecting c or java")),
                };
                params.set_enum_style(style);
            }
            "optional_field_style" => {
                let style = match value.as_str() {
                    "default" => OptionalFieldStyle::Default,
                    "reftypes" => OptionalFieldStyle::RefTypes,
                    _ => return Err(config_error(key, value, "expecting default or reftypes")),
                };
                params.set_optional_field_style(style);
            }
            _ => {
                let warning = Warning { option: key.clone() };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    Ok(Resolution { params, warnings })
}

fn seed_recursively<'a>(
    params:  &mut Params,
    pool:    &'a DescriptorPool,
    file:    &'a FileDescriptor,
    visited: &mut HashSet<&'a str>,
) -> Result<(), NanoError> {
    if !visited.insert(file.name.as_str()) {
        return Ok(());
    }

    debug!(file = %file.name, "seeding generator parameters");
    params.entry(&file.name);
    let options = &file.options;
    if let Some(classname) = &options.java_outer_classname {
        params.set_outer_classname(&file.name, classname);
    }
    if let Some(package) = &options.java_package {
        params.set_java_package(&file.name, package);
    }
    if let Some(multiple) = options.java_multiple_files {
        params.set_multiple_files(&file.name, multiple);
    }

    for dependency in &file.dependencies {
        let dep = pool.file(dependency).ok_or_else(|| {
            NanoError::Pool(format!("Dependency \"{}\" of \"{}\" not found", dependency, file.name))
        })?;
        seed_recursively(params, pool, dep, visited)?;
    }

    Ok(())
}

/// Splits a `filename|value` option. Empty pieces are ignored, so exactly
/// two non-empty pieces are required.
fn split_compound<'v>(
    option:  &str,
    value:   &'v str,
    message: &str,
) -> Result<(&'v str, &'v str), NanoError> {
    let parts: Vec<&str> = value.split('|').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [file, content] => Ok((*file, *content)),
        _ => Err(config_error(option, value, message)),
    }
}

fn config_error(option: &str, value: &str, message: &str) -> NanoError {
    NanoError::Config {
        option:  option.to_string(),
        value:   value.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brine_nano_schema::FileOptions;

    fn file(name: &str, deps: &[&str], options: FileOptions) -> FileDescriptor {
        FileDescriptor {
            name:         name.into(),
            package:      "pkg".into(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            options,
            ..Default::default()
        }
    }

    fn pool() -> DescriptorPool {
        DescriptorPool::new(vec![
            file("base.proto", &[], FileOptions {
                java_package: Some("com.base".into()),
                ..Default::default()
            }),
            file("mid.proto", &["base.proto"], FileOptions {
                java_multiple_files: Some(true),
                ..Default::default()
            }),
            file("foo.proto", &["mid.proto", "base.proto"], FileOptions {
                java_outer_classname: Some("FooProtos".into()),
                ..Default::default()
            }),
        ])
        .unwrap()
    }

    fn resolve(options: &str) -> Result<Resolution, NanoError> {
        let pool = pool();
        let root = pool.file("foo.proto").unwrap().clone();
        resolve_params(&pool, &root, &parse_generator_parameter(options))
    }

    #[test]
    fn test_parse_generator_parameter() {
        assert_eq!(
            parse_generator_parameter("a=b,,flag,c=d=e"),
            vec![
                ("a".to_string(), "b".to_string()),
                ("flag".to_string(), "".to_string()),
                ("c".to_string(), "d=e".to_string()),
            ]
        );
        assert!(parse_generator_parameter("").is_empty());
    }

    #[test]
    fn test_seeds_every_reachable_file() {
        let params = resolve("").unwrap().params;
        assert!(params.has_file("foo.proto"));
        assert!(params.has_file("mid.proto"));
        assert!(params.has_file("base.proto"));
        assert_eq!(params.java_package("base.proto"), Some("com.base"));
        assert_eq!(params.outer_classname("foo.proto"), Some("FooProtos"));
        assert!(params.multiple_files("mid.proto"));
        assert!(!params.multiple_files("foo.proto"));
        assert_eq!(params.file("base.proto").unwrap().outer_classname, None);
    }

    #[test]
    fn test_compound_override_scoped_to_file() {
        let params = resolve("java_package=foo.proto|com.example").unwrap().params;
        assert_eq!(params.java_package("foo.proto"), Some("com.example"));
        assert_eq!(params.java_package("base.proto"), Some("com.base"));
        assert_eq!(params.java_package("mid.proto"), None);
    }

    #[test]
    fn test_override_beats_file_option() {
        let params = resolve("java_outer_classname=foo.proto|Other,java_package=base.proto|org.base")
            .unwrap()
            .params;
        assert_eq!(params.outer_classname("foo.proto"), Some("Other"));
        assert_eq!(params.java_package("base.proto"), Some("org.base"));
    }

    #[test]
    fn test_malformed_compound_value() {
        let err = resolve("java_package=onlyonepart").unwrap_err();
        match err {
            NanoError::Config { option, value, .. } => {
                assert_eq!(option, "java_package");
                assert_eq!(value, "onlyonepart");
            }
            other => panic!("unexpected error {:?}", other),
        }

        let err = resolve("java_outer_classname=a|b|c").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Bad java_outer_classname, expecting filename|ClassName found 'a|b|c'"
        );
    }

    #[test]
    fn test_global_multiple_files_override() {
        let params = resolve("java_multiple_files=true").unwrap().params;
        assert!(params.multiple_files("foo.proto"));
        assert!(params.multiple_files("base.proto"));

        let params = resolve("java_multiple_files=false").unwrap().params;
        assert!(!params.multiple_files("mid.proto"));
    }

    #[test]
    fn test_flags_and_styles() {
        let resolution = resolve(
            "store_unknown_fields=true,enum_style=java,optional_field_style=reftypes,generate_equals=true,output_list_file=out.txt",
        )
        .unwrap();
        let params = resolution.params;
        assert!(params.store_unknown_fields());
        assert_eq!(params.enum_style(), EnumStyle::NestedType);
        assert!(params.use_reference_types());
        assert!(params.generate_equals());
        assert_eq!(params.output_list_file(), Some("out.txt"));
        assert!(resolution.warnings.is_empty());

        let params = resolve("store_unknown_fields=yes").unwrap().params;
        assert!(!params.store_unknown_fields());
        assert_eq!(params.enum_style(), EnumStyle::Constants);
    }

    #[test]
    fn test_bad_style_value() {
        assert!(matches!(resolve("enum_style=kotlin"), Err(NanoError::Config { .. })));
        assert!(matches!(resolve("optional_field_style=boxed"), Err(NanoError::Config { .. })));
    }

    #[test]
    fn test_unknown_option_is_warning() {
        let resolution = resolve("frobnicate=1,java_multiple_files=true").unwrap();
        assert_eq!(resolution.warnings, vec![Warning { option: "frobnicate".into() }]);
        assert!(resolution.params.multiple_files("foo.proto"));
    }

    #[test]
    fn test_dependency_cycle_is_tolerated() {
        let pool = DescriptorPool::new(vec![
            file("a.proto", &["b.proto"], FileOptions::default()),
            file("b.proto", &["a.proto"], FileOptions::default()),
        ])
        .unwrap();
        let root = pool.file("a.proto").unwrap().clone();
        let params = resolve_params(&pool, &root, &[]).unwrap().params;
        assert!(params.has_file("a.proto"));
        assert!(params.has_file("b.proto"));
    }

    #[test]
    fn test_missing_dependency() {
        let pool = DescriptorPool::new(vec![file("a.proto", &["gone.proto"], FileOptions::default())]).unwrap();
        let root = pool.file("a.proto").unwrap().clone();
        assert!(matches!(resolve_params(&pool, &root, &[]), Err(NanoError::Pool(_))));
    }
}

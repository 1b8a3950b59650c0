use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brine_nano_compiler::{
    generate, naming::method_camel_name, parse_generator_parameter, resolve_params, NameResolver, NanoError,
};
use brine_nano_schema::{qualify, Descriptor, DescriptorPool, DescriptorSet, FileDescriptor};

#[derive(Parser)]
#[command(name = "brine-nano-cli")]
#[command(about = "Generate Java nano sources from protocol buffer descriptors", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Java sources for one file of a JSON descriptor set
    Generate {
        /// Input descriptor set (`{ "files": [...] }`)
        #[arg(short, long)]
        input: PathBuf,

        /// Name of the file to generate, as listed in the descriptor set
        #[arg(short, long)]
        file: String,

        /// Directory the sources (and the output list, if requested) go under
        #[arg(short, long)]
        output: PathBuf,

        /// Generator parameter, e.g. `java_multiple_files=true,java_package=a.proto|com.a`
        #[arg(short, long, default_value = "")]
        param: String,
    },

    /// Print the Java class name of every message and enum in a file, and
    /// the Java method name of every service method
    Names {
        /// Input descriptor set
        #[arg(short, long)]
        input: PathBuf,

        /// Name of the file, as listed in the descriptor set
        #[arg(short, long)]
        file: String,

        /// Generator parameter
        #[arg(short, long, default_value = "")]
        param: String,
    },
}

fn main() -> Result<(), NanoError> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match &cli.command {
        Commands::Generate { input, file, output, param } => {
            let pool = load_pool(input)?;
            // Generation fails before any file is written. A failed write
            // below can still leave the earlier files on disk.
            let generation = generate(&pool, file, param)?;
            for out in generation.files.iter().chain(generation.manifest.iter()) {
                write_output(output, &out.path, &out.content)?;
            }
            println!(
                "Generated {} file(s) for {} under {}",
                generation.files.len(),
                file,
                output.display()
            );
            Ok(())
        }

        Commands::Names { input, file, param } => {
            let pool = load_pool(input)?;
            let root = pool
                .file(file)
                .ok_or_else(|| NanoError::Pool(format!("File \"{}\" not found", file)))?;
            let params = resolve_params(&pool, root, &parse_generator_parameter(param))?.params;
            let names = NameResolver::new(&params, &pool);
            for full_name in type_names(root) {
                println!("{} -> {}", full_name, names.class_name_of(&full_name)?);
            }
            for service in &root.services {
                let service_name = qualify(&root.package, &service.name);
                for method in &service.methods {
                    println!("{}.{} -> {}", service_name, method.name, method_camel_name(method));
                }
            }
            Ok(())
        }
    }
}

fn load_pool(input: &Path) -> Result<DescriptorPool, NanoError> {
    let text = fs::read_to_string(input)?;
    let set: DescriptorSet = serde_json::from_str(&text)?;
    Ok(DescriptorPool::new(set.files)?)
}

fn write_output(root: &Path, relative: &str, content: &str) -> Result<(), NanoError> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    info!(path = %path.display(), "wrote");
    Ok(())
}

/// Full names of every message and enum in `file`, outermost first.
fn type_names(file: &FileDescriptor) -> Vec<String> {
    fn walk(scope: &str, message: &Descriptor, out: &mut Vec<String>) {
        let full_name = qualify(scope, &message.name);
        out.push(full_name.clone());
        for enum_type in &message.enum_types {
            out.push(qualify(&full_name, &enum_type.name));
        }
        for nested in &message.nested_types {
            walk(&full_name, nested, out);
        }
    }

    let mut out = Vec::new();
    for message in &file.message_types {
        walk(&file.package, message, &mut out);
    }
    for enum_type in &file.enum_types {
        out.push(qualify(&file.package, &enum_type.name));
    }
    out
}

//! brine-nano-compiler
//!
//! This crate implements:
//!  1) Generator parameter parsing and per-file resolution (`params`),
//!  2) Identifier rules: reserved words and camel casing (`keywords`, `naming`),
//!  3) Java class names for files, messages and enums (`names`),
//!  4) Field defaults and presence bit layout (`defaults`, `bitfield`),
//!  5) Validation of the resolved names (`verifier`),
//!  6) Java source emission and the `generate` driver (`gen_java`, `generator`),
//!  7) Error types (`NanoError`).

pub mod error;
pub mod utils;
pub mod keywords;
pub mod naming;
pub mod params;
pub mod names;
pub mod java_types;
pub mod defaults;
pub mod bitfield;
pub mod verifier;
pub mod gen_java;
pub mod generator;

pub use error::{NanoError, Warning};
pub use generator::{generate, Generation, OutputFile};
pub use names::NameResolver;
pub use params::{parse_generator_parameter, resolve_params, Params};

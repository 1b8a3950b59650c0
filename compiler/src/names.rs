//! Fully qualified Java names for files, messages and enums.
//!
//! Every name is computed from local facts only (the node's own name, its
//! containing message and its file's parameters), so asking twice always
//! gives the same answer and no global symbol table is needed.

use brine_nano_schema::{DescriptorPool, FileDescriptor, TypeKind, TypeScope};

use crate::{
    error::NanoError,
    keywords::escape_keyword,
    naming::file_base_class_name,
    params::{EnumStyle, Params},
};

/// Suffix of every generated source file.
pub const JAVA_SUFFIX: &str = ".java";

/// Output package of `file`: the override if one was given, otherwise the
/// schema package.
pub fn file_java_package(params: &Params, file: &FileDescriptor) -> String {
    match params.java_package(&file.name) {
        Some(package) => package.to_string(),
        None => file.package.clone(),
    }
}

/// Simple name of the file's outer class.
pub fn file_class_name(params: &Params, file: &FileDescriptor) -> String {
    match params.outer_classname(&file.name) {
        Some(classname) => classname.to_string(),
        None => file_base_class_name(&file.name),
    }
}

/// Fully qualified name of the file's outer class.
pub fn file_class_full_name(params: &Params, file: &FileDescriptor) -> String {
    join(&file_java_package(params, file), &file_class_name(params, file))
}

/// Whether the file needs an outer class at all. Without multiple files
/// every type nests inside it; otherwise it is only kept as a home for
/// file-scope extensions and for file-scope enum constants.
pub fn is_outer_class_needed(params: &Params, file: &FileDescriptor) -> bool {
    if !params.multiple_files(&file.name) {
        return true;
    }
    if !file.extensions.is_empty() {
        return true;
    }
    !file.enum_types.is_empty() && params.enum_style() == EnumStyle::Constants
}

/// Relative output path of a class: package directories, then the class name.
pub fn java_file_path(class_full_name: &str) -> String {
    format!("{}{}", class_full_name.replace('.', "/"), JAVA_SUFFIX)
}

/// Resolves Java class names for messages and enums.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    pub params: &'a Params,
    pub pool:   &'a DescriptorPool,
}

impl<'a> NameResolver<'a> {
    pub fn new(params: &'a Params, pool: &'a DescriptorPool) -> Self {
        NameResolver { params, pool }
    }

    /// Class name of any message or enum, by fully qualified schema name.
    pub fn class_name_of(&self, full_name: &str) -> Result<String, NanoError> {
        let scope = self.scope(full_name)?;
        match scope.kind {
            TypeKind::Message => self.message_class_name(scope),
            TypeKind::Enum => self.enum_class_name(scope),
        }
    }

    pub fn message_class_name(&self, scope: &TypeScope) -> Result<String, NanoError> {
        self.java_name(&scope.name, true, scope.parent.as_deref(), &scope.file)
    }

    /// With nested-type enums this is the enum's own class; with constant
    /// enums it is the class that holds the constants.
    pub fn enum_class_name(&self, scope: &TypeScope) -> Result<String, NanoError> {
        if self.params.enum_style() == EnumStyle::NestedType {
            return self.java_name(&scope.name, true, scope.parent.as_deref(), &scope.file);
        }
        match scope.parent.as_deref() {
            Some(parent) => {
                let parent = self.scope(parent)?;
                self.message_class_name(parent)
            }
            None => Ok(file_class_full_name(self.params, self.file(&scope.file)?)),
        }
    }

    pub fn scope(&self, full_name: &str) -> Result<&'a TypeScope, NanoError> {
        self.pool.scope(full_name).ok_or_else(|| {
            NanoError::ContractViolation(format!("Unresolved type reference \"{}\"", full_name))
        })
    }

    pub fn file(&self, name: &str) -> Result<&'a FileDescriptor, NanoError> {
        self.pool.file(name).ok_or_else(|| {
            NanoError::ContractViolation(format!("Unknown schema file \"{}\"", name))
        })
    }

    fn java_name(
        &self,
        name:     &str,
        is_class: bool,
        parent:   Option<&str>,
        file:     &str,
    ) -> Result<String, NanoError> {
        let file = self.file(file)?;
        let container = match parent {
            Some(parent) => {
                let parent = self.scope(parent)?;
                self.message_class_name(parent)?
            }
            None if is_class && self.params.multiple_files(&file.name) => {
                file_java_package(self.params, file)
            }
            None => file_class_full_name(self.params, file),
        };
        Ok(join(&container, &escape_keyword(name)))
    }
}

fn join(container: &str, name: &str) -> String {
    if container.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", container, name)
    }
}

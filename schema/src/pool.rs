use std::collections::HashMap;

use thiserror::Error;

use crate::descriptor::{Descriptor, EnumDescriptor, FileDescriptor};

#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    #[error("File \"{0}\" is defined twice")]
    DuplicateFile(String),

    #[error("Type \"{0}\" is defined twice")]
    DuplicateType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Message,
    Enum,
}

/// Where a message or enum lives: its file and, when nested, the full name
/// of the message that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScope {
    pub kind:      TypeKind,
    pub name:      String,
    pub full_name: String,
    pub file:      String,
    pub parent:    Option<String>,
}

#[derive(Debug, Clone)]
struct Location {
    scope:      TypeScope,
    file_index: usize,
    // Indices into `message_types` then `nested_types` down to the message
    // itself (or to the enum's containing message).
    path:       Vec<usize>,
    enum_index: Option<usize>,
}

/// Read-only index over a set of files, keyed by fully-qualified type name.
#[derive(Debug, Clone, Default)]
pub struct DescriptorPool {
    files:   Vec<FileDescriptor>,
    by_name: HashMap<String, usize>,
    types:   HashMap<String, Location>,
}

impl DescriptorPool {
    pub fn new(files: Vec<FileDescriptor>) -> Result<Self, PoolError> {
        let mut pool = DescriptorPool {
            files,
            by_name: HashMap::new(),
            types:   HashMap::new(),
        };

        for file_index in 0..pool.files.len() {
            let name = pool.files[file_index].name.clone();
            if pool.by_name.insert(name.clone(), file_index).is_some() {
                return Err(PoolError::DuplicateFile(name));
            }
        }

        let mut found = Vec::new();
        for (file_index, file) in pool.files.iter().enumerate() {
            for (i, message) in file.message_types.iter().enumerate() {
                index_message(file, file_index, &file.package, None, message, vec![i], &mut found);
            }
            for (i, enum_type) in file.enum_types.iter().enumerate() {
                found.push(Location {
                    scope: TypeScope {
                        kind:      TypeKind::Enum,
                        name:      enum_type.name.clone(),
                        full_name: qualify(&file.package, &enum_type.name),
                        file:      file.name.clone(),
                        parent:    None,
                    },
                    file_index,
                    path: Vec::new(),
                    enum_index: Some(i),
                });
            }
        }

        for location in found {
            let key = location.scope.full_name.clone();
            if pool.types.insert(key.clone(), location).is_some() {
                return Err(PoolError::DuplicateType(key));
            }
        }

        Ok(pool)
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn file(&self, name: &str) -> Option<&FileDescriptor> {
        self.by_name.get(name).map(|&i| &self.files[i])
    }

    /// Looks up a message or enum by full name. A leading `.` is accepted.
    pub fn scope(&self, full_name: &str) -> Option<&TypeScope> {
        self.types.get(trim_dot(full_name)).map(|l| &l.scope)
    }

    pub fn message(&self, full_name: &str) -> Option<&Descriptor> {
        let location = self.types.get(trim_dot(full_name))?;
        if location.scope.kind != TypeKind::Message {
            return None;
        }
        self.walk(location)
    }

    pub fn enum_type(&self, full_name: &str) -> Option<&EnumDescriptor> {
        let location = self.types.get(trim_dot(full_name))?;
        let index = location.enum_index?;
        if location.path.is_empty() {
            self.files[location.file_index].enum_types.get(index)
        } else {
            self.walk(location)?.enum_types.get(index)
        }
    }

    fn walk(&self, location: &Location) -> Option<&Descriptor> {
        let file = &self.files[location.file_index];
        let (first, rest) = location.path.split_first()?;
        let mut message = file.message_types.get(*first)?;
        for &i in rest {
            message = message.nested_types.get(i)?;
        }
        Some(message)
    }
}

/// Joins a scope and a simple name with `.`, skipping an empty scope.
pub fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

fn trim_dot(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}

fn index_message(
    file:       &FileDescriptor,
    file_index: usize,
    scope:      &str,
    parent:     Option<&str>,
    message:    &Descriptor,
    path:       Vec<usize>,
    found:      &mut Vec<Location>,
) {
    let full_name = qualify(scope, &message.name);

    for (i, enum_type) in message.enum_types.iter().enumerate() {
        found.push(Location {
            scope: TypeScope {
                kind:      TypeKind::Enum,
                name:      enum_type.name.clone(),
                full_name: qualify(&full_name, &enum_type.name),
                file:      file.name.clone(),
                parent:    Some(full_name.clone()),
            },
            file_index,
            path: path.clone(),
            enum_index: Some(i),
        });
    }

    for (i, nested) in message.nested_types.iter().enumerate() {
        let mut nested_path = path.clone();
        nested_path.push(i);
        index_message(file, file_index, &full_name, Some(full_name.as_str()), nested, nested_path, found);
    }

    found.push(Location {
        scope: TypeScope {
            kind:      TypeKind::Message,
            name:      message.name.clone(),
            full_name,
            file:      file.name.clone(),
            parent:    parent.map(str::to_string),
        },
        file_index,
        path,
        enum_index: None,
    });
}

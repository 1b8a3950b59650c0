//! Java type mappings for descriptor field types.
//!
//! | Descriptor | [`JavaType`] | primitive | boxed |
//! |------------|--------------|-----------|-------|
//! | `int32`, `uint32`, `sint32`, `fixed32`, `sfixed32` | `Int` | `int` | `java.lang.Integer` |
//! | `int64`, `uint64`, `sint64`, `fixed64`, `sfixed64` | `Long` | `long` | `java.lang.Long` |
//! | `float` | `Float` | `float` | `java.lang.Float` |
//! | `double` | `Double` | `double` | `java.lang.Double` |
//! | `bool` | `Boolean` | `boolean` | `java.lang.Boolean` |
//! | `string` | `String` | `java.lang.String` | `java.lang.String` |
//! | `bytes` | `Bytes` | `byte[]` | `byte[]` |
//! | `enum` | `Enum` | `int` | `java.lang.Integer` |
//! | `message`, `group` | `Message` | class name | class name |

use brine_nano_schema::{FieldDescriptor, FieldType};

use crate::{error::NanoError, names::NameResolver};

const WIRE_FORMAT_NANO: &str = "com.google.protobuf.nano.WireFormatNano";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaType {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    String,
    Bytes,
    Enum,
    Message,
}

impl JavaType {
    /// Stored as a Java primitive (non-nullable) unless boxed.
    pub fn is_primitive(self) -> bool {
        match self {
            JavaType::Int
            | JavaType::Long
            | JavaType::Float
            | JavaType::Double
            | JavaType::Boolean
            | JavaType::Enum => true,
            JavaType::String | JavaType::Bytes | JavaType::Message => false,
        }
    }

    /// Primitive type name; empty for messages, whose name depends on the
    /// message type.
    pub fn primitive_name(self) -> &'static str {
        match self {
            JavaType::Int     => "int",
            JavaType::Long    => "long",
            JavaType::Float   => "float",
            JavaType::Double  => "double",
            JavaType::Boolean => "boolean",
            JavaType::String  => "java.lang.String",
            JavaType::Bytes   => "byte[]",
            JavaType::Enum    => "int",
            JavaType::Message => "",
        }
    }

    pub fn boxed_name(self) -> &'static str {
        match self {
            JavaType::Int     => "java.lang.Integer",
            JavaType::Long    => "java.lang.Long",
            JavaType::Float   => "java.lang.Float",
            JavaType::Double  => "java.lang.Double",
            JavaType::Boolean => "java.lang.Boolean",
            JavaType::String  => "java.lang.String",
            JavaType::Bytes   => "byte[]",
            JavaType::Enum    => "java.lang.Integer",
            JavaType::Message => "",
        }
    }
}

pub fn java_type(field_type: FieldType) -> JavaType {
    match field_type {
        FieldType::Int32
        | FieldType::Uint32
        | FieldType::Sint32
        | FieldType::Fixed32
        | FieldType::Sfixed32 => JavaType::Int,

        FieldType::Int64
        | FieldType::Uint64
        | FieldType::Sint64
        | FieldType::Fixed64
        | FieldType::Sfixed64 => JavaType::Long,

        FieldType::Float => JavaType::Float,
        FieldType::Double => JavaType::Double,
        FieldType::Bool => JavaType::Boolean,
        FieldType::String => JavaType::String,
        FieldType::Bytes => JavaType::Bytes,
        FieldType::Enum => JavaType::Enum,
        FieldType::Group | FieldType::Message => JavaType::Message,
    }
}

/// Java type of a single element of `field`, honoring boxed storage.
pub fn element_type_name(names: &NameResolver, field: &FieldDescriptor) -> Result<String, NanoError> {
    let java = java_type(field.type_);
    if java == JavaType::Message {
        return names.class_name_of(referenced_type(field)?);
    }
    if names.params.use_reference_types() && !field.is_repeated() {
        Ok(java.boxed_name().to_string())
    } else {
        Ok(java.primitive_name().to_string())
    }
}

/// Declared Java type of the field member.
pub fn field_type_name(names: &NameResolver, field: &FieldDescriptor) -> Result<String, NanoError> {
    let element = element_type_name(names, field)?;
    if field.is_repeated() {
        Ok(format!("{}[]", element))
    } else {
        Ok(element)
    }
}

/// Shared zero-length array for a repeated field.
pub fn empty_array_name(names: &NameResolver, field: &FieldDescriptor) -> Result<String, NanoError> {
    let sentinel = match java_type(field.type_) {
        JavaType::Int | JavaType::Enum => "EMPTY_INT_ARRAY",
        JavaType::Long    => "EMPTY_LONG_ARRAY",
        JavaType::Float   => "EMPTY_FLOAT_ARRAY",
        JavaType::Double  => "EMPTY_DOUBLE_ARRAY",
        JavaType::Boolean => "EMPTY_BOOLEAN_ARRAY",
        JavaType::String  => "EMPTY_STRING_ARRAY",
        JavaType::Bytes   => "EMPTY_BYTES_ARRAY",
        JavaType::Message => {
            let class_name = names.class_name_of(referenced_type(field)?)?;
            return Ok(format!("{}.EMPTY_ARRAY", class_name));
        }
    };
    Ok(format!("{}.{}", WIRE_FORMAT_NANO, sentinel))
}

pub fn empty_bytes_name() -> String {
    format!("{}.EMPTY_BYTES", WIRE_FORMAT_NANO)
}

/// The `type_name` of a message, group or enum field.
pub fn referenced_type(field: &FieldDescriptor) -> Result<&str, NanoError> {
    field.type_name.as_deref().ok_or_else(|| {
        NanoError::ContractViolation(format!(
            "Field \"{}\" of type {} has no type name",
            field.name,
            field.type_.proto_name()
        ))
    })
}

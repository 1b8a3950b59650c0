use serde::{Deserialize, Serialize};

/// A set of schema files, listed in dependency order (dependencies first).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
}

/// One parsed and resolved `.proto` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name:          String,
    #[serde(default)]
    pub package:       String,
    #[serde(default)]
    pub dependencies:  Vec<String>,
    #[serde(default)]
    pub options:       FileOptions,
    #[serde(default)]
    pub message_types: Vec<Descriptor>,
    #[serde(default)]
    pub enum_types:    Vec<EnumDescriptor>,
    #[serde(default)]
    pub extensions:    Vec<FieldDescriptor>,
    #[serde(default)]
    pub services:      Vec<ServiceDescriptor>,
}

/// Options embedded in the schema file itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_package:         Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_outer_classname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_multiple_files:  Option<bool>,
}

/// A message type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub name:         String,
    #[serde(default)]
    pub fields:       Vec<FieldDescriptor>,
    #[serde(default)]
    pub nested_types: Vec<Descriptor>,
    #[serde(default)]
    pub enum_types:   Vec<EnumDescriptor>,
    #[serde(default)]
    pub extensions:   Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    #[default]
    Optional,
    Required,
    Repeated,
}

impl Label {
    pub fn proto_name(self) -> &'static str {
        match self {
            Label::Optional => "optional",
            Label::Required => "required",
            Label::Repeated => "repeated",
        }
    }
}

/// The closed set of descriptor field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

impl FieldType {
    /// The keyword used for this type in `.proto` source.
    pub fn proto_name(self) -> &'static str {
        match self {
            FieldType::Double   => "double",
            FieldType::Float    => "float",
            FieldType::Int64    => "int64",
            FieldType::Uint64   => "uint64",
            FieldType::Int32    => "int32",
            FieldType::Fixed64  => "fixed64",
            FieldType::Fixed32  => "fixed32",
            FieldType::Bool     => "bool",
            FieldType::String   => "string",
            FieldType::Group    => "group",
            FieldType::Message  => "message",
            FieldType::Bytes    => "bytes",
            FieldType::Uint32   => "uint32",
            FieldType::Enum     => "enum",
            FieldType::Sfixed32 => "sfixed32",
            FieldType::Sfixed64 => "sfixed64",
            FieldType::Sint32   => "sint32",
            FieldType::Sint64   => "sint64",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name:          String,
    pub number:        i32,
    #[serde(default)]
    pub label:         Label,
    #[serde(rename = "type")]
    pub type_:         FieldType,
    /// Fully-qualified `.pkg.Outer.Inner` reference for message, group and enum fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name:     Option<String>,
    /// Textual default as carried by descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extendee:      Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: &str, number: i32, label: Label, type_: FieldType) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            number,
            label,
            type_,
            type_name: None,
            default_value: None,
            extendee: None,
        }
    }

    pub fn with_type_name(mut self, type_name: &str) -> Self {
        self.type_name = Some(type_name.to_string());
        self
    }

    pub fn with_default(mut self, default_value: &str) -> Self {
        self.default_value = Some(default_value.to_string());
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub name:   String,
    #[serde(default)]
    pub values: Vec<EnumValueDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueDescriptor {
    pub name:   String,
    pub number: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name:    String,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name:        String,
    pub input_type:  String,
    pub output_type: String,
}

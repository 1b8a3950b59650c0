//! Identifier derivation for generated Java code.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `foo_bar_baz` | [`underscores_to_camel_case`] (`false`) | `fooBarBaz` |
//! | `foo_bar_baz` | [`underscores_to_camel_case`] (`true`) | `FooBarBaz` |
//! | `dir/foo_bar.proto` | [`file_base_class_name`] | `FooBar` |
//! | field `foo_bar` | [`field_constant_name`] | `FOO_BAR_FIELD_NUMBER` |
//! | field `foo_bar` | [`field_default_constant_name`] | `_fooBarDefault` |

use brine_nano_schema::{FieldDescriptor, FieldType, MethodDescriptor};

use crate::keywords::escape_keyword;

/// Converts a schema name to camel case in a single left-to-right pass.
///
/// Lowercase letters are copied, upper-cased when the previous character
/// asked for it. Uppercase letters are copied as-is, except that the first
/// character of the input is lower-cased unless `cap_next_letter` starts out
/// set. Digits are copied and capitalize the following letter. Anything else
/// is dropped and capitalizes the following letter.
///
/// Only ASCII letters and digits survive, so the result does not depend on
/// locale.
///
/// ```
/// use brine_nano_compiler::naming::underscores_to_camel_case;
///
/// assert_eq!(underscores_to_camel_case("foo_bar", false), "fooBar");
/// assert_eq!(underscores_to_camel_case("foo_bar", true), "FooBar");
/// assert_eq!(underscores_to_camel_case("FooBar", false), "fooBar");
/// assert_eq!(underscores_to_camel_case("field2name", false), "field2Name");
/// ```
pub fn underscores_to_camel_case(input: &str, mut cap_next_letter: bool) -> String {
    let mut result = String::with_capacity(input.len());

    for (i, c) in input.chars().enumerate() {
        if c.is_ascii_lowercase() {
            if cap_next_letter {
                result.push(c.to_ascii_uppercase());
            } else {
                result.push(c);
            }
            cap_next_letter = false;
        } else if c.is_ascii_uppercase() {
            if i == 0 && !cap_next_letter {
                result.push(c.to_ascii_lowercase());
            } else {
                result.push(c);
            }
            cap_next_letter = false;
        } else if c.is_ascii_digit() {
            result.push(c);
            cap_next_letter = true;
        } else {
            cap_next_letter = true;
        }
    }

    result
}

/// The name a field's identifiers are derived from.
///
/// A group field is named after the lower-cased group type, so its Java
/// name is taken from the group's message type instead, which keeps the
/// original capitalization.
pub fn field_name(field: &FieldDescriptor) -> &str {
    if field.type_ == FieldType::Group {
        if let Some(type_name) = field.type_name.as_deref() {
            return type_name.rsplit('.').next().unwrap_or(&field.name);
        }
    }
    &field.name
}

pub fn field_camel_name(field: &FieldDescriptor) -> String {
    underscores_to_camel_case(field_name(field), false)
}

pub fn field_capitalized_name(field: &FieldDescriptor) -> String {
    underscores_to_camel_case(field_name(field), true)
}

pub fn method_camel_name(method: &MethodDescriptor) -> String {
    underscores_to_camel_case(&method.name, false)
}

/// Removes the schema-file suffix, preferring `.protodevel` over `.proto`.
pub fn strip_proto(filename: &str) -> &str {
    filename
        .strip_suffix(".protodevel")
        .or_else(|| filename.strip_suffix(".proto"))
        .unwrap_or(filename)
}

/// Outer class name derived from a schema file name: directory dropped,
/// suffix stripped, then capitalized camel case.
pub fn file_base_class_name(filename: &str) -> String {
    let basename = filename.rsplit('/').next().unwrap_or(filename);
    underscores_to_camel_case(strip_proto(basename), true)
}

pub fn field_constant_name(field: &FieldDescriptor) -> String {
    format!("{}_FIELD_NUMBER", field.name).to_uppercase()
}

/// Name of the hoisted constant holding a non-empty string or bytes default.
pub fn field_default_constant_name(field: &FieldDescriptor) -> String {
    format!("_{}Default", escape_keyword(&field_camel_name(field)))
}

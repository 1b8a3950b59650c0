use std::str::FromStr;

use brine_nano_schema::{FieldDescriptor, FieldType};

use crate::{
    error::NanoError,
    java_types::{empty_array_name, empty_bytes_name, referenced_type},
    keywords::escape_keyword,
    names::NameResolver,
    naming::field_default_constant_name,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    String,
    Bytes,
}

/// A non-empty string or bytes default, hoisted into a named constant. The
/// value is kept raw; turning it into a Java literal is left to the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultConstant {
    pub name:  String,
    pub kind:  ConstantKind,
    pub value: String,
}

/// Expression initializing a field, plus the constant it refers to if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultLiteral {
    pub expression: String,
    pub constant:   Option<DefaultConstant>,
}

impl DefaultLiteral {
    fn inline(expression: impl Into<String>) -> Self {
        DefaultLiteral { expression: expression.into(), constant: None }
    }
}

/// Computes the initial value of `field`.
///
/// Repeated fields start as the shared empty array of their element type.
/// With boxed storage every other field starts as `null`. Otherwise the
/// schema default (or the type's zero value) is rendered as a Java literal.
pub fn default_literal(names: &NameResolver, field: &FieldDescriptor) -> Result<DefaultLiteral, NanoError> {
    if field.is_repeated() {
        return Ok(DefaultLiteral::inline(empty_array_name(names, field)?));
    }

    if names.params.use_reference_types() {
        return Ok(DefaultLiteral::inline("null"));
    }

    let text = field.default_value.as_deref();
    let literal = match field.type_ {
        FieldType::Int32 | FieldType::Sint32 | FieldType::Sfixed32 => {
            DefaultLiteral::inline(parse_or::<i32>(field, text, 0)?.to_string())
        }
        // Java has no unsigned 32-bit primitive, print the same bits signed.
        FieldType::Uint32 | FieldType::Fixed32 => {
            DefaultLiteral::inline((parse_or::<u32>(field, text, 0)? as i32).to_string())
        }
        FieldType::Int64 | FieldType::Sint64 | FieldType::Sfixed64 => {
            DefaultLiteral::inline(format!("{}L", parse_or::<i64>(field, text, 0)?))
        }
        FieldType::Uint64 | FieldType::Fixed64 => {
            DefaultLiteral::inline(format!("{}L", parse_or::<u64>(field, text, 0)? as i64))
        }
        FieldType::Double => DefaultLiteral::inline(double_literal(parse_or::<f64>(field, text, 0.0)?)),
        FieldType::Float => DefaultLiteral::inline(float_literal(parse_or::<f32>(field, text, 0.0)?)),
        FieldType::Bool => DefaultLiteral::inline(if text == Some("true") { "true" } else { "false" }),
        FieldType::String => string_default(field, ConstantKind::String, "\"\""),
        FieldType::Bytes => string_default(field, ConstantKind::Bytes, &empty_bytes_name()),
        FieldType::Enum => DefaultLiteral::inline(enum_default(names, field)?),
        FieldType::Message | FieldType::Group => DefaultLiteral::inline("null"),
    };

    Ok(literal)
}

/// Infinities and NaN print as the `Double` constants, everything else as
/// a `D`-suffixed literal.
#[allow(clippy::eq_op)]
pub fn double_literal(value: f64) -> String {
    if value == f64::INFINITY {
        "Double.POSITIVE_INFINITY".to_string()
    } else if value == f64::NEG_INFINITY {
        "Double.NEGATIVE_INFINITY".to_string()
    } else if value != value {
        "Double.NaN".to_string()
    } else {
        format!("{:?}D", value)
    }
}

#[allow(clippy::eq_op)]
pub fn float_literal(value: f32) -> String {
    if value == f32::INFINITY {
        "Float.POSITIVE_INFINITY".to_string()
    } else if value == f32::NEG_INFINITY {
        "Float.NEGATIVE_INFINITY".to_string()
    } else if value != value {
        "Float.NaN".to_string()
    } else {
        format!("{:?}F", value)
    }
}

fn string_default(field: &FieldDescriptor, kind: ConstantKind, empty: &str) -> DefaultLiteral {
    match field.default_value.as_deref() {
        Some(value) if !value.is_empty() => {
            let name = field_default_constant_name(field);
            DefaultLiteral {
                expression: name.clone(),
                constant:   Some(DefaultConstant { name, kind, value: value.to_string() }),
            }
        }
        _ => DefaultLiteral::inline(empty),
    }
}

/// The named default value, or the enum's first value when none is given.
fn enum_default(names: &NameResolver, field: &FieldDescriptor) -> Result<String, NanoError> {
    let type_name = referenced_type(field)?;
    let value_name = match field.default_value.as_deref() {
        Some(name) => name.to_string(),
        None => {
            let enum_type = names.pool.enum_type(type_name).ok_or_else(|| {
                NanoError::ContractViolation(format!("Unresolved enum type \"{}\"", type_name))
            })?;
            let first = enum_type.values.first().ok_or_else(|| {
                NanoError::ContractViolation(format!("Enum \"{}\" has no values", type_name))
            })?;
            first.name.clone()
        }
    };
    Ok(format!("{}.{}", names.class_name_of(type_name)?, escape_keyword(&value_name)))
}

fn parse_or<T: FromStr>(field: &FieldDescriptor, text: Option<&str>, zero: T) -> Result<T, NanoError> {
    match text {
        None => Ok(zero),
        Some(text) => text.trim().parse::<T>().map_err(|_| {
            NanoError::ContractViolation(format!(
                "Invalid default value \"{}\" for field \"{}\"",
                text, field.name
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{parse_generator_parameter, resolve_params, Params};
    use brine_nano_schema::{
        Descriptor, DescriptorPool, EnumDescriptor, EnumValueDescriptor, FileDescriptor, Label,
    };

    fn pool() -> DescriptorPool {
        DescriptorPool::new(vec![FileDescriptor {
            name:    "test.proto".into(),
            package: "test".into(),
            message_types: vec![Descriptor { name: "Msg".into(), ..Default::default() }],
            enum_types: vec![EnumDescriptor {
                name:   "Mode".into(),
                values: vec![
                    EnumValueDescriptor { name: "FAST".into(), number: 1 },
                    EnumValueDescriptor { name: "default".into(), number: 2 },
                ],
            }],
            ..Default::default()
        }])
        .unwrap()
    }

    fn params(pool: &DescriptorPool, options: &str) -> Params {
        let root = pool.files()[0].clone();
        resolve_params(pool, &root, &parse_generator_parameter(options)).unwrap().params
    }

    fn literal(field: FieldDescriptor) -> DefaultLiteral {
        literal_with(field, "").unwrap()
    }

    fn literal_with(field: FieldDescriptor, options: &str) -> Result<DefaultLiteral, NanoError> {
        let pool = pool();
        let params = params(&pool, options);
        default_literal(&NameResolver::new(&params, &pool), &field)
    }

    fn scalar(type_: FieldType, default: Option<&str>) -> String {
        let mut field = FieldDescriptor::new("value", 1, Label::Optional, type_);
        field.default_value = default.map(str::to_string);
        literal(field).expression
    }

    #[test]
    fn test_integer_defaults() {
        assert_eq!(scalar(FieldType::Int32, None), "0");
        assert_eq!(scalar(FieldType::Sint32, Some("-42")), "-42");
        assert_eq!(scalar(FieldType::Uint32, Some("4294967295")), "-1");
        assert_eq!(scalar(FieldType::Fixed32, Some("2147483648")), "-2147483648");
    }

    #[test]
    fn test_long_suffix() {
        assert_eq!(scalar(FieldType::Int64, None), "0L");
        assert_eq!(scalar(FieldType::Sfixed64, Some("-7")), "-7L");
        assert_eq!(scalar(FieldType::Uint64, Some("18446744073709551615")), "-1L");
        for type_ in [FieldType::Int32, FieldType::Uint32, FieldType::Sint32, FieldType::Fixed32] {
            assert!(!scalar(type_, Some("5")).ends_with('L'));
        }
        for type_ in [FieldType::Int64, FieldType::Uint64, FieldType::Sint64, FieldType::Fixed64] {
            assert!(scalar(type_, Some("5")).ends_with('L'));
        }
    }

    #[test]
    fn test_floating_defaults() {
        assert_eq!(scalar(FieldType::Double, None), "0.0D");
        assert_eq!(scalar(FieldType::Double, Some("1.5")), "1.5D");
        assert_eq!(scalar(FieldType::Float, Some("-0.25")), "-0.25F");
        assert_eq!(scalar(FieldType::Double, Some("inf")), "Double.POSITIVE_INFINITY");
        assert_eq!(scalar(FieldType::Double, Some("-inf")), "Double.NEGATIVE_INFINITY");
        assert_eq!(scalar(FieldType::Double, Some("nan")), "Double.NaN");
        assert_eq!(scalar(FieldType::Float, Some("inf")), "Float.POSITIVE_INFINITY");
        assert_eq!(scalar(FieldType::Float, Some("-inf")), "Float.NEGATIVE_INFINITY");
        assert_eq!(scalar(FieldType::Float, Some("nan")), "Float.NaN");
    }

    #[test]
    fn test_named_float_constants() {
        assert_eq!(double_literal(f64::NAN), "Double.NaN");
        assert_eq!(float_literal(f32::INFINITY), "Float.POSITIVE_INFINITY");
        assert_eq!(double_literal(1e300), "1e300D");
    }

    #[test]
    fn test_bool_defaults() {
        assert_eq!(scalar(FieldType::Bool, None), "false");
        assert_eq!(scalar(FieldType::Bool, Some("true")), "true");
    }

    #[test]
    fn test_string_and_bytes_defaults() {
        assert_eq!(scalar(FieldType::String, None), "\"\"");
        assert_eq!(scalar(FieldType::String, Some("")), "\"\"");
        assert_eq!(
            scalar(FieldType::Bytes, None),
            "com.google.protobuf.nano.WireFormatNano.EMPTY_BYTES"
        );

        let field = FieldDescriptor::new("greeting_text", 1, Label::Optional, FieldType::String)
            .with_default("hello");
        let hoisted = literal(field);
        assert_eq!(hoisted.expression, "_greetingTextDefault");
        assert_eq!(
            hoisted.constant,
            Some(DefaultConstant {
                name:  "_greetingTextDefault".into(),
                kind:  ConstantKind::String,
                value: "hello".into(),
            })
        );

        let field = FieldDescriptor::new("blob", 2, Label::Optional, FieldType::Bytes).with_default("\\001");
        let hoisted = literal(field);
        assert_eq!(hoisted.expression, "_blobDefault");
        assert_eq!(hoisted.constant.unwrap().kind, ConstantKind::Bytes);
    }

    #[test]
    fn test_enum_defaults() {
        let field = FieldDescriptor::new("mode", 1, Label::Optional, FieldType::Enum)
            .with_type_name(".test.Mode");
        assert_eq!(literal(field.clone()).expression, "test.Test.FAST");
        assert_eq!(literal(field.with_default("default")).expression, "test.Test.default_");
    }

    #[test]
    fn test_enum_default_nested_type_style() {
        let field = FieldDescriptor::new("mode", 1, Label::Optional, FieldType::Enum)
            .with_type_name(".test.Mode")
            .with_default("FAST");
        assert_eq!(literal_with(field, "enum_style=java").unwrap().expression, "test.Test.Mode.FAST");
    }

    #[test]
    fn test_message_defaults_to_null() {
        let field = FieldDescriptor::new("msg", 1, Label::Optional, FieldType::Message)
            .with_type_name(".test.Msg");
        assert_eq!(literal(field).expression, "null");
    }

    #[test]
    fn test_repeated_defaults() {
        let field = FieldDescriptor::new("ids", 1, Label::Repeated, FieldType::Int64);
        assert_eq!(
            literal(field).expression,
            "com.google.protobuf.nano.WireFormatNano.EMPTY_LONG_ARRAY"
        );
        let field = FieldDescriptor::new("modes", 2, Label::Repeated, FieldType::Enum)
            .with_type_name(".test.Mode");
        assert_eq!(
            literal(field).expression,
            "com.google.protobuf.nano.WireFormatNano.EMPTY_INT_ARRAY"
        );
        let field = FieldDescriptor::new("msgs", 3, Label::Repeated, FieldType::Message)
            .with_type_name(".test.Msg");
        assert_eq!(literal(field).expression, "test.Test.Msg.EMPTY_ARRAY");
        let field = FieldDescriptor::new("msgs", 3, Label::Repeated, FieldType::Message)
            .with_type_name(".test.Msg");
        assert_eq!(
            literal_with(field, "java_multiple_files=true").unwrap().expression,
            "test.Msg.EMPTY_ARRAY"
        );
    }

    #[test]
    fn test_reftypes_default_to_null() {
        let field = FieldDescriptor::new("count", 1, Label::Optional, FieldType::Int32).with_default("3");
        assert_eq!(literal_with(field, "optional_field_style=reftypes").unwrap().expression, "null");

        let field = FieldDescriptor::new("counts", 2, Label::Repeated, FieldType::Int32);
        assert_eq!(
            literal_with(field, "optional_field_style=reftypes").unwrap().expression,
            "com.google.protobuf.nano.WireFormatNano.EMPTY_INT_ARRAY"
        );
    }

    #[test]
    fn test_bad_default_is_contract_violation() {
        let field = FieldDescriptor::new("count", 1, Label::Optional, FieldType::Int32).with_default("lots");
        assert!(matches!(literal_with(field, ""), Err(NanoError::ContractViolation(_))));

        let field = FieldDescriptor::new("mode", 1, Label::Optional, FieldType::Enum);
        assert!(matches!(literal_with(field, ""), Err(NanoError::ContractViolation(_))));
    }
}

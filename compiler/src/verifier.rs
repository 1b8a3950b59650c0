use lazy_static::lazy_static;
use regex::Regex;

use brine_nano_schema::{EnumDescriptor, FileDescriptor};

use crate::{
    error::NanoError,
    keywords::is_keyword,
    names::{file_class_name, file_java_package},
    params::{EnumStyle, Params},
    utils::quote,
};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

pub fn is_java_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Returns `Ok(())` if the file can be emitted with `params`, or the first
/// `NanoError::Validation` found otherwise.
pub fn verify_file(params: &Params, file: &FileDescriptor) -> Result<(), NanoError> {
    let fail = |message: String| NanoError::Validation { file: file.name.clone(), message };

    // 1) Outer class must be usable as a Java class name
    let class_name = file_class_name(params, file);
    if !is_java_identifier(&class_name) {
        return Err(fail(format!(
            "The outer class name {} is not a valid Java identifier",
            quote(&class_name)
        )));
    }
    if is_keyword(&class_name) {
        return Err(fail(format!(
            "The outer class name {} is a reserved word",
            quote(&class_name)
        )));
    }

    // 2) Every package segment must be an identifier
    let package = file_java_package(params, file);
    if !package.is_empty() {
        for segment in package.split('.') {
            if !is_java_identifier(segment) {
                return Err(fail(format!(
                    "The package {} has an invalid segment {}",
                    quote(&package),
                    quote(segment)
                )));
            }
        }
    }

    // 3) Outer class cannot share a name with a top-level type. Constant-style
    // enums only contribute int constants, so they declare no type.
    let enum_types: &[EnumDescriptor] = match params.enum_style() {
        EnumStyle::NestedType => file.enum_types.as_slice(),
        EnumStyle::Constants => &[],
    };
    let top_level = file
        .message_types
        .iter()
        .map(|m| m.name.as_str())
        .chain(enum_types.iter().map(|e| e.name.as_str()))
        .chain(file.services.iter().map(|s| s.name.as_str()));
    for name in top_level {
        if name == class_name {
            return Err(fail(format!(
                "The outer class name {} conflicts with a type of the same name",
                quote(&class_name)
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{parse_generator_parameter, resolve_params};
    use brine_nano_schema::{Descriptor, DescriptorPool, EnumValueDescriptor, ServiceDescriptor};

    fn verify(file: FileDescriptor, options: &str) -> Result<(), NanoError> {
        let pool = DescriptorPool::new(vec![file]).unwrap();
        let root = pool.files()[0].clone();
        let params = resolve_params(&pool, &root, &parse_generator_parameter(options))?.params;
        verify_file(&params, &root)
    }

    fn file(name: &str, package: &str) -> FileDescriptor {
        FileDescriptor { name: name.into(), package: package.into(), ..Default::default() }
    }

    #[test]
    fn test_identifiers() {
        assert!(is_java_identifier("Foo"));
        assert!(is_java_identifier("_foo$1"));
        assert!(!is_java_identifier("1Foo"));
        assert!(!is_java_identifier("foo-bar"));
        assert!(!is_java_identifier(""));
    }

    #[test]
    fn test_valid_file() {
        assert!(verify(file("foo_bar.proto", "foo.bar"), "").is_ok());
        assert!(verify(file("foo_bar.proto", ""), "").is_ok());
    }

    #[test]
    fn test_bad_outer_class() {
        let err = verify(file("a.proto", ""), "java_outer_classname=a.proto|Bad-Name").unwrap_err();
        assert_eq!(
            err.to_string(),
            "a.proto: The outer class name \"Bad-Name\" is not a valid Java identifier"
        );

        let err = verify(file("a.proto", ""), "java_outer_classname=a.proto|class").unwrap_err();
        assert!(matches!(err, NanoError::Validation { .. }));
    }

    #[test]
    fn test_digit_file_name() {
        // "3d.proto" camel-cases to "3D"
        assert!(matches!(verify(file("3d.proto", ""), ""), Err(NanoError::Validation { .. })));
    }

    #[test]
    fn test_bad_package_segment() {
        let err = verify(file("a.proto", "com..example"), "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "a.proto: The package \"com..example\" has an invalid segment \"\""
        );
        assert!(verify(file("a.proto", "ok"), "java_package=a.proto|com.9lives").is_err());
    }

    #[test]
    fn test_outer_class_collision() {
        let mut with_message = file("point.proto", "geo");
        with_message.message_types.push(Descriptor { name: "Point".into(), ..Default::default() });
        assert!(matches!(verify(with_message, ""), Err(NanoError::Validation { .. })));

        let mut with_service = file("point.proto", "geo");
        with_service.services.push(ServiceDescriptor { name: "Point".into(), methods: vec![] });
        assert!(verify(with_service.clone(), "").is_err());
        assert!(verify(with_service, "java_outer_classname=point.proto|PointProtos").is_ok());
    }

    #[test]
    fn test_enum_collision_depends_on_style() {
        let mut with_enum = file("geo/shapes.proto", "geo");
        with_enum.enum_types.push(EnumDescriptor {
            name:   "Shapes".into(),
            values: vec![EnumValueDescriptor { name: "SQUARE".into(), number: 0 }],
        });

        // constants land in the outer class, no type is declared
        assert!(verify(with_enum.clone(), "").is_ok());

        let err = verify(with_enum, "enum_style=java").unwrap_err();
        assert_eq!(
            err.to_string(),
            "geo/shapes.proto: The outer class name \"Shapes\" conflicts with a type of the same name"
        );
    }
}

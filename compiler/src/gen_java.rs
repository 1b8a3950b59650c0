//! Java source text for one schema file.
//!
//! Output is plain text built line by line. Only the data layout of each
//! message is produced (fields, presence bits, accessors, `clear()` and
//! optionally `equals`/`hashCode`); wire encoding lives in the runtime.

use lazy_static::lazy_static;
use regex::Regex;

use brine_nano_schema::{Descriptor, EnumDescriptor, FieldDescriptor, FieldType, FileDescriptor};

use crate::{
    bitfield::{BitAllocation, BitIndex},
    defaults::{default_literal, ConstantKind, DefaultConstant, DefaultLiteral},
    error::NanoError,
    java_types::{field_type_name, java_type, JavaType},
    keywords::escape_keyword,
    names::{file_class_name, file_java_package, is_outer_class_needed, NameResolver},
    naming::{field_camel_name, field_capitalized_name, field_constant_name},
    params::EnumStyle,
    utils::{java_bytes_literal, quote, unescape_c},
};

pub const HEADER: &str = "// Generated by the protocol buffer compiler.  DO NOT EDIT!";

const INDENT: &str = "  ";

/// Members every message class declares for itself.
const SCAFFOLDING_MEMBERS: [&str; 2] = ["EMPTY_ARRAY", "unknownFieldData"];

/// Methods a generated accessor must not shadow: everything inherited from
/// `java.lang.Object`, plus the message's own `clear()`.
const RESERVED_METHODS: [&str; 10] = [
    "clear", "clone", "equals", "finalize", "getClass", "hashCode", "notify", "notifyAll", "toString", "wait",
];

const ACCESSOR_PREFIXES: [&str; 4] = ["get", "set", "has", "clear"];

lazy_static! {
    static ref PRESENCE_WORD: Regex = Regex::new(r"^bitField[0-9]+_$").unwrap();
}

struct Source {
    lines:  Vec<String>,
    indent: usize,
}

impl Source {
    fn new() -> Self {
        Source { lines: Vec::new(), indent: 0 }
    }

    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", INDENT.repeat(self.indent), text));
        }
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(format!("{} {{", text.as_ref()));
        self.indent += 1;
    }

    fn close(&mut self) {
        if self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    /// `if (<condition>) { return false; }`
    fn bail_if(&mut self, condition: &str) {
        self.open(format!("if ({})", condition));
        self.line("return false;");
        self.close();
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// One field of a message, with everything the emitter derives from it.
struct FieldPlan<'f> {
    field:     &'f FieldDescriptor,
    java:      JavaType,
    member:    String,
    /// Suffix of the `get`/`set`/`has`/`clear` accessors.
    accessor:  String,
    type_name: String,
    default:   DefaultLiteral,
    bit:       Option<BitIndex>,
}

/// Emits compilation units for the messages and enums of one file.
pub struct JavaEmitter<'a> {
    names: NameResolver<'a>,
    file:  &'a FileDescriptor,
}

impl<'a> JavaEmitter<'a> {
    pub fn new(names: NameResolver<'a>, file: &'a FileDescriptor) -> Self {
        JavaEmitter { names, file }
    }

    /// The file named after the outer class. It always exists; the class
    /// itself is only written when something has to live in it. In
    /// single-file mode every type nests inside it.
    pub fn primary_unit(&self) -> Result<String, NanoError> {
        let params = self.names.params;
        let multiple_files = params.multiple_files(&self.file.name);
        let class_name = file_class_name(params, self.file);

        let mut out = Source::new();
        self.header(&mut out);
        if !is_outer_class_needed(params, self.file) {
            return Ok(out.finish());
        }
        out.open(format!("public final class {}", class_name));
        out.line(format!("private {}() {{}}", class_name));
        out.blank();

        for enum_type in &self.file.enum_types {
            // nested-type enums get their own file in multi-file mode
            if multiple_files && params.enum_style() == EnumStyle::NestedType {
                continue;
            }
            self.enumeration(&mut out, enum_type);
        }

        for extension in &self.file.extensions {
            self.extension(&mut out, extension);
        }

        if !multiple_files {
            for message in &self.file.message_types {
                self.message(&mut out, message, false)?;
            }
        }

        out.close();
        Ok(out.finish())
    }

    /// A top-level message in its own file.
    pub fn message_unit(&self, message: &Descriptor) -> Result<String, NanoError> {
        let mut out = Source::new();
        self.header(&mut out);
        self.message(&mut out, message, true)?;
        Ok(out.finish())
    }

    /// A top-level nested-type enum in its own file.
    pub fn enum_unit(&self, enum_type: &EnumDescriptor) -> String {
        let mut out = Source::new();
        self.header(&mut out);
        self.enum_interface(&mut out, enum_type);
        out.finish()
    }

    fn header(&self, out: &mut Source) {
        out.line(HEADER);
        out.blank();
        let package = file_java_package(self.names.params, self.file);
        if !package.is_empty() {
            out.line(format!("package {};", package));
            out.blank();
        }
    }

    fn enumeration(&self, out: &mut Source, enum_type: &EnumDescriptor) {
        match self.names.params.enum_style() {
            EnumStyle::Constants => {
                out.line(format!("// enum {}", enum_type.name));
                enum_constants(out, enum_type);
                out.blank();
            }
            EnumStyle::NestedType => self.enum_interface(out, enum_type),
        }
    }

    fn enum_interface(&self, out: &mut Source, enum_type: &EnumDescriptor) {
        out.open(format!("public interface {}", escape_keyword(&enum_type.name)));
        enum_constants(out, enum_type);
        out.close();
        out.blank();
    }

    fn extension(&self, out: &mut Source, field: &FieldDescriptor) {
        let extendee = field.extendee.as_deref().unwrap_or_default();
        out.line(format!(
            "// extend {} {{ {} }}",
            extendee.trim_start_matches('.'),
            field_signature(field)
        ));
        out.line(format!("public static final int {} = {};", field_constant_name(field), field.number));
        out.blank();
    }

    fn message(&self, out: &mut Source, message: &Descriptor, top_level: bool) -> Result<(), NanoError> {
        let params = self.names.params;
        let class_name = escape_keyword(&message.name);
        if top_level {
            out.open(format!("public final class {}", class_name));
        } else {
            out.open(format!("public static final class {}", class_name));
        }
        out.blank();
        out.line(format!("public static final {}[] EMPTY_ARRAY = {{}};", class_name));
        out.blank();

        for enum_type in &message.enum_types {
            self.enumeration(out, enum_type);
        }
        for nested in &message.nested_types {
            self.message(out, nested, false)?;
        }
        for extension in &message.extensions {
            self.extension(out, extension);
        }

        let bits = BitAllocation::allocate(params, &message.fields);
        for word in bits.word_names() {
            out.line(format!("private int {};", word));
        }
        if bits.word_count() > 0 {
            out.blank();
        }

        let plans = message
            .fields
            .iter()
            .enumerate()
            .map(|(position, field)| self.plan(field, bits.bit_of(position)))
            .collect::<Result<Vec<_>, _>>()?;

        for plan in &plans {
            self.field(out, &class_name, plan);
        }

        if params.store_unknown_fields() {
            out.line("protected java.util.List<com.google.protobuf.nano.UnknownFieldData> unknownFieldData;");
            out.blank();
        }

        self.clear(out, &class_name, &bits, &plans);
        if params.generate_equals() {
            self.equals(out, &class_name, &plans);
            self.hash_code(out, &bits, &plans);
        }

        out.close();
        out.blank();
        Ok(())
    }

    fn plan<'f>(&self, field: &'f FieldDescriptor, bit: Option<BitIndex>) -> Result<FieldPlan<'f>, NanoError> {
        Ok(FieldPlan {
            field,
            java: java_type(field.type_),
            member: member_name(field, bit.is_some()),
            accessor: accessor_suffix(field),
            type_name: field_type_name(&self.names, field)?,
            default: default_literal(&self.names, field)?,
            bit,
        })
    }

    fn field(&self, out: &mut Source, class_name: &str, plan: &FieldPlan) {
        let field = plan.field;
        out.line(format!("// {}", field_signature(field)));
        out.line(format!("public static final int {} = {};", field_constant_name(field), field.number));
        if let Some(constant) = &plan.default.constant {
            out.line(default_constant(constant));
        }

        let Some(bit) = plan.bit else {
            out.line(format!("public {} {} = {};", plan.type_name, plan.member, plan.default.expression));
            out.blank();
            return;
        };

        let capitalized = &plan.accessor;
        out.line(format!("private {} {} = {};", plan.type_name, plan.member, plan.default.expression));

        out.open(format!("public {} get{}()", plan.type_name, capitalized));
        out.line(format!("return {};", plan.member));
        out.close();

        out.open(format!("public {} set{}({} value)", class_name, capitalized, plan.type_name));
        out.line(format!("{} = value;", plan.member));
        out.line(format!("{};", bit.set_expr()));
        out.line("return this;");
        out.close();

        out.open(format!("public boolean has{}()", capitalized));
        out.line(format!("return {};", bit.get_expr()));
        out.close();

        out.open(format!("public {} clear{}()", class_name, capitalized));
        out.line(format!("{} = {};", plan.member, plan.default.expression));
        out.line(format!("{};", bit.clear_expr()));
        out.line("return this;");
        out.close();
        out.blank();
    }

    fn clear(&self, out: &mut Source, class_name: &str, bits: &BitAllocation, plans: &[FieldPlan]) {
        out.open(format!("public {} clear()", class_name));
        for word in bits.word_names() {
            out.line(format!("{} = 0;", word));
        }
        for plan in plans {
            out.line(format!("{} = {};", plan.member, plan.default.expression));
        }
        if self.names.params.store_unknown_fields() {
            out.line("unknownFieldData = null;");
        }
        out.line("return this;");
        out.close();
        out.blank();
    }

    fn equals(&self, out: &mut Source, class_name: &str, plans: &[FieldPlan]) {
        out.line("@Override");
        out.open("public boolean equals(Object o)");
        out.open("if (o == this)");
        out.line("return true;");
        out.close();
        out.bail_if(&format!("!(o instanceof {})", class_name));
        out.line(format!("{} other = ({}) o;", class_name, class_name));

        for plan in plans {
            let m = &plan.member;
            if let Some(bit) = plan.bit {
                out.bail_if(&bit.differ_expr());
            }
            let condition = if plan.field.is_repeated() {
                if plan.java == JavaType::Bytes {
                    format!("!java.util.Arrays.deepEquals(this.{m}, other.{m})")
                } else {
                    format!("!java.util.Arrays.equals(this.{m}, other.{m})")
                }
            } else if plan.bit.is_some() {
                match plan.java {
                    JavaType::Float => format!(
                        "java.lang.Float.floatToIntBits(this.{m}) != java.lang.Float.floatToIntBits(other.{m})"
                    ),
                    JavaType::Double => format!(
                        "java.lang.Double.doubleToLongBits(this.{m}) != java.lang.Double.doubleToLongBits(other.{m})"
                    ),
                    _ => format!("this.{m} != other.{m}"),
                }
            } else if plan.java == JavaType::Bytes {
                format!("!java.util.Arrays.equals(this.{m}, other.{m})")
            } else {
                format!("this.{m} == null ? other.{m} != null : !this.{m}.equals(other.{m})")
            };
            out.bail_if(&condition);
        }

        if self.names.params.store_unknown_fields() {
            out.open("if (unknownFieldData == null || unknownFieldData.isEmpty())");
            out.line("return other.unknownFieldData == null || other.unknownFieldData.isEmpty();");
            out.close();
            out.line("return unknownFieldData.equals(other.unknownFieldData);");
        } else {
            out.line("return true;");
        }
        out.close();
        out.blank();
    }

    fn hash_code(&self, out: &mut Source, bits: &BitAllocation, plans: &[FieldPlan]) {
        out.line("@Override");
        out.open("public int hashCode()");
        out.line("int result = 17;");
        for word in bits.word_names() {
            out.line(format!("result = 31 * result + {};", word));
        }
        for plan in plans {
            out.line(format!("result = 31 * result + {};", hash_term(plan)));
        }
        if self.names.params.store_unknown_fields() {
            out.line(
                "result = 31 * result + (unknownFieldData == null || unknownFieldData.isEmpty() ? 0 : unknownFieldData.hashCode());",
            );
        }
        out.line("return result;");
        out.close();
        out.blank();
    }
}

fn hash_term(plan: &FieldPlan) -> String {
    let m = &plan.member;
    if plan.field.is_repeated() {
        return if plan.java == JavaType::Bytes {
            format!("java.util.Arrays.deepHashCode(this.{m})")
        } else {
            format!("java.util.Arrays.hashCode(this.{m})")
        };
    }
    if plan.bit.is_none() {
        return if plan.java == JavaType::Bytes {
            format!("java.util.Arrays.hashCode(this.{m})")
        } else {
            format!("(this.{m} == null ? 0 : this.{m}.hashCode())")
        };
    }
    match plan.java {
        JavaType::Long => format!("(int) (this.{m} ^ (this.{m} >>> 32))"),
        JavaType::Float => format!("java.lang.Float.floatToIntBits(this.{m})"),
        JavaType::Double => format!(
            "(int) (java.lang.Double.doubleToLongBits(this.{m}) ^ (java.lang.Double.doubleToLongBits(this.{m}) >>> 32))"
        ),
        JavaType::Boolean => format!("(this.{m} ? 1231 : 1237)"),
        _ => format!("this.{m}"),
    }
}

fn enum_constants(out: &mut Source, enum_type: &EnumDescriptor) {
    for value in &enum_type.values {
        out.line(format!(
            "public static final int {} = {};",
            escape_keyword(&value.name),
            value.number
        ));
    }
}

fn is_scaffolding_member(name: &str) -> bool {
    SCAFFOLDING_MEMBERS.contains(&name) || PRESENCE_WORD.is_match(name)
}

/// Java member backing `field`. Tracked fields get a trailing `_` and stay
/// private; the rest are public and keyword-escaped. Either way a name taken
/// by the class itself is pushed aside with more `_`.
fn member_name(field: &FieldDescriptor, tracked: bool) -> String {
    let camel = field_camel_name(field);
    let mut member = if tracked { format!("{}_", camel) } else { escape_keyword(&camel) };
    while is_scaffolding_member(&member) {
        member.push('_');
    }
    member
}

fn accessor_suffix(field: &FieldDescriptor) -> String {
    let mut suffix = field_capitalized_name(field);
    while ACCESSOR_PREFIXES
        .iter()
        .any(|prefix| RESERVED_METHODS.contains(&format!("{}{}", prefix, suffix).as_str()))
    {
        suffix.push('_');
    }
    suffix
}

fn default_constant(constant: &DefaultConstant) -> String {
    match constant.kind {
        ConstantKind::String => format!(
            "private static final java.lang.String {} = {};",
            constant.name,
            quote(&constant.value)
        ),
        ConstantKind::Bytes => format!(
            "private static final byte[] {} = com.google.protobuf.nano.InternalNano.bytesDefaultValue({});",
            constant.name,
            java_bytes_literal(&unescape_c(&constant.value))
        ),
    }
}

/// `optional int32 id = 1;` as it would read in the schema.
fn field_signature(field: &FieldDescriptor) -> String {
    let type_text = match (field.type_, field.type_name.as_deref()) {
        (FieldType::Message | FieldType::Enum | FieldType::Group, Some(type_name)) => {
            type_name.trim_start_matches('.')
        }
        (type_, _) => type_.proto_name(),
    };
    format!("{} {} {} = {};", field.label.proto_name(), type_text, field.name, field.number)
}

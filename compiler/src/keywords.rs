use std::collections::HashSet;

use lazy_static::lazy_static;

/// Reserved Java words, including the literal keywords.
pub const JAVA_KEYWORDS: [&str; 53] = [
    "abstract", "assert", "boolean", "break", "byte", "case", "catch",
    "char", "class", "const", "continue", "default", "do", "double", "else",
    "enum", "extends", "final", "finally", "float", "for", "goto", "if",
    "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return",
    "short", "static", "strictfp", "super", "switch", "synchronized",
    "this", "throw", "throws", "transient", "try", "void", "volatile", "while",
    "false", "null", "true",
];

lazy_static! {
    static ref KEYWORD_SET: HashSet<&'static str> = JAVA_KEYWORDS.iter().copied().collect();
}

pub fn is_keyword(name: &str) -> bool {
    KEYWORD_SET.contains(name)
}

/// Appends `_` to a reserved word.
pub fn escape_keyword(name: &str) -> String {
    if is_keyword(name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

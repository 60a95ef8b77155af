//! Emits proto2 `.proto` schema text from a message's field descriptors.
//!
//! This is a textual projection only: it has no effect on wire encoding and
//! exists so a schema file can be checked into a repo, diffed in review, or
//! handed to another language's protoc-generated bindings. The shapes here
//! mirror the four field forms the derive macro understands (singular,
//! repeated, map, oneof).

#[cfg(feature = "alloc")]
use alloc::format;
#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Words the proto2 grammar reserves for wire/scalar types and keywords.
///
/// A field or message name that collides with one of these would produce a
/// `.proto` file the upstream `protoc` compiler rejects.
pub const RESERVED_WORDS: &[&str] = &[
    "int32", "int64", "sint32", "sint64", "uint32", "uint64", "bool", "fixed32", "fixed64",
    "sfixed32", "sfixed64", "float", "double", "string", "bytes", "message", "optional",
    "repeated", "group",
];

/// Returns `true` if `name` collides with a reserved proto2 keyword.
pub const fn is_reserved_word(name: &str) -> bool {
    let mut i = 0;
    while i < RESERVED_WORDS.len() {
        if str_eq(RESERVED_WORDS[i], name) {
            return true;
        }
        i += 1;
    }
    false
}

const fn str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// The proto2 presence label of a singular field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// `required` — absent on the wire is a decode error.
    Required,
    /// `optional` — absent on the wire decodes to the field's default.
    Optional,
}

impl Label {
    const fn keyword(self) -> &'static str {
        match self {
            Label::Required => "required",
            Label::Optional => "optional",
        }
    }
}

/// Renders a singular (non-repeated, non-map, non-oneof) field line, e.g.
/// `    optional int32 id = 2;` or, with a default, `    optional int32 id =
/// 2 [default = 7];`.
///
/// Returns `None` if `name` collides with a reserved proto2 keyword — the
/// derive macro rejects that at compile time via `validate_not_reserved`
/// before it ever builds a field name, but this module is also callable
/// directly (see `src/bin/main.rs`), so it enforces the same rule itself
/// rather than trusting every caller to have already checked.
#[cfg(feature = "alloc")]
pub fn singular_field_def(label: Label, ty: &str, name: &str, tag: u32, default: Option<&str>) -> Option<String> {
    if is_reserved_word(name) {
        return None;
    }
    Some(match default {
        Some(val) => format!(
            "{} {} {} = {} [default = {}];",
            label.keyword(),
            ty,
            name,
            tag,
            val
        ),
        None => format!("{} {} {} = {};", label.keyword(), ty, name, tag),
    })
}

/// Renders a `repeated` field line. Scalar/fixed element types are packed by
/// default, so this emits `[packed=true]` for them; length-delimited element
/// types (messages, strings, bytes) render without the option since they can
/// never be packed.
///
/// Returns `None` if `name` is a reserved word (see [`singular_field_def`]).
#[cfg(feature = "alloc")]
pub fn repeated_field_def(ty: &str, name: &str, tag: u32, packed: bool) -> Option<String> {
    if is_reserved_word(name) {
        return None;
    }
    Some(if packed {
        format!("repeated {ty} {name} = {tag} [packed=true];")
    } else {
        format!("repeated {ty} {name} = {tag};")
    })
}

/// Renders a `map<K, V>` field line. `ty` must already be the full
/// `map<K, V>` spelling (callers build this from the key/value type names).
///
/// Returns `None` if `name` is a reserved word (see [`singular_field_def`]).
#[cfg(feature = "alloc")]
pub fn map_field_def(ty: &str, name: &str, tag: u32) -> Option<String> {
    if is_reserved_word(name) {
        return None;
    }
    Some(format!("{ty} {name} = {tag};"))
}

/// One alternative inside a `oneof` block: `(type, name, tag)`.
pub type OneofAlternative<'a> = (&'a str, &'a str, u32);

/// Renders a `oneof { ... }` block. Alternative lines carry no trailing
/// semicolon inside the block, matching standard `protoc` formatting.
///
/// Returns `None` if the oneof's own name or any alternative's name is a
/// reserved word (see [`singular_field_def`]).
#[cfg(feature = "alloc")]
pub fn oneof_field_def(name: &str, alternatives: &[OneofAlternative<'_>]) -> Option<String> {
    if is_reserved_word(name) || alternatives.iter().any(|(_, alt_name, _)| is_reserved_word(alt_name)) {
        return None;
    }
    let mut body = format!("oneof {name} {{\n");
    for (ty, alt_name, tag) in alternatives {
        body.push_str(&format!("        {ty} {alt_name} = {tag}\n"));
    }
    body.push_str("    }");
    Some(body)
}

/// Joins already-rendered field lines into a full `message Name { ... }`
/// block, one field per line, four-space indented.
///
/// Returns `None` if `name` is a reserved word (see [`singular_field_def`]).
#[cfg(feature = "alloc")]
pub fn message_def(name: &str, field_lines: &[String]) -> Option<String> {
    if is_reserved_word(name) {
        return None;
    }
    let mut body = format!("message {name} {{\n");
    for line in field_lines {
        body.push_str("    ");
        body.push_str(line);
        body.push('\n');
    }
    body.push('}');
    Some(body)
}

/// Joins a set of already-rendered `message { ... }` blocks into a complete
/// `.proto` file, with an optional set of extra header lines (e.g. `package`,
/// `option` directives) injected after the `syntax` line.
///
/// `messages` is `(type_name, rendered_body)` pairs, in declaration order.
/// Returns `None` if two messages share a type name — a schema can't name
/// the same message twice.
#[cfg(feature = "alloc")]
pub fn emit_schema(header_lines: &[&str], messages: &[(&str, String)]) -> Option<String> {
    for (i, (name, _)) in messages.iter().enumerate() {
        if messages[..i].iter().any(|(other, _)| other == name) {
            return None;
        }
    }

    let mut def = String::from("syntax = \"proto2\";\n\n");

    if !header_lines.is_empty() {
        for line in header_lines {
            def.push_str(line);
            def.push('\n');
        }
        def.push('\n');
    }

    let mut first = true;
    for (_, body) in messages {
        if !first {
            def.push_str("\n\n");
        }
        def.push_str(body);
        first = false;
    }

    Some(def)
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn reserved_words_cover_scalar_and_keyword_names() {
        assert!(is_reserved_word("int32"));
        assert!(is_reserved_word("message"));
        assert!(is_reserved_word("group"));
        assert!(!is_reserved_word("name"));
        assert!(!is_reserved_word("id"));
    }

    #[test]
    fn singular_field_renders_default_literal() {
        assert_eq!(
            singular_field_def(Label::Optional, "int32", "id", 2, Some("7")).unwrap(),
            "optional int32 id = 2 [default = 7];"
        );
        assert_eq!(
            singular_field_def(Label::Required, "string", "name", 1, None).unwrap(),
            "required string name = 1;"
        );
    }

    #[test]
    fn singular_field_rejects_reserved_name() {
        assert!(singular_field_def(Label::Optional, "int32", "message", 2, None).is_none());
    }

    #[test]
    fn repeated_field_marks_packed_by_default() {
        assert_eq!(
            repeated_field_def("int32", "scores", 4, true).unwrap(),
            "repeated int32 scores = 4 [packed=true];"
        );
        assert_eq!(
            repeated_field_def("string", "tags", 5, false).unwrap(),
            "repeated string tags = 5;"
        );
    }

    #[test]
    fn repeated_field_rejects_reserved_name() {
        assert!(repeated_field_def("string", "repeated", 5, false).is_none());
    }

    #[test]
    fn map_field_rejects_reserved_name() {
        assert!(map_field_def("map<string, int32>", "group", 6).is_none());
    }

    #[test]
    fn oneof_block_has_no_member_semicolons() {
        let rendered = oneof_field_def(
            "value",
            &[("int32", "int_value", 2), ("string", "str_value", 3)],
        )
        .unwrap();
        assert_eq!(
            rendered,
            "oneof value {\n        int32 int_value = 2\n        string str_value = 3\n    }"
        );
    }

    #[test]
    fn oneof_rejects_reserved_alternative_name() {
        assert!(oneof_field_def("value", &[("int32", "bool", 2)]).is_none());
    }

    #[test]
    fn message_def_indents_fields() {
        let rendered = message_def(
            "PhoneNumber",
            &[
                "required string number = 1;".into(),
                "optional int32 type = 2;".into(),
            ],
        )
        .unwrap();
        assert_eq!(
            rendered,
            "message PhoneNumber {\n    required string number = 1;\n    optional int32 type = 2;\n}"
        );
    }

    #[test]
    fn message_def_rejects_reserved_name() {
        assert!(message_def("bytes", &[]).is_none());
    }

    #[test]
    fn emit_schema_rejects_duplicate_message_names() {
        let messages = vec![
            ("Foo", message_def("Foo", &[]).unwrap()),
            ("Foo", message_def("Foo", &[]).unwrap()),
        ];
        assert!(emit_schema(&[], &messages).is_none());
    }

    #[test]
    fn emit_schema_joins_header_and_messages() {
        let messages = vec![(
            "PhoneNumber",
            message_def("PhoneNumber", &["required string number = 1;".into()]).unwrap(),
        )];
        let rendered = emit_schema(&["package demo;"], &messages).unwrap();
        assert!(rendered.starts_with("syntax = \"proto2\";\n\n"));
        assert!(rendered.contains("package demo;\n\n"));
        assert!(rendered.contains("message PhoneNumber {"));
    }
}

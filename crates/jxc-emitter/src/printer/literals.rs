use super::Printer;
use crate::error::EmitError;
use jxc_ast::NodeIndex;
use jxc_ast::node::ObjectProperty;

/// Double-quoted target string literal for raw string content.
pub(crate) fn quote_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// Object literal keys that are not plain identifiers are quoted.
fn object_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        quote_string(key)
    }
}

impl<'a> Printer<'a> {
    pub(super) fn emit_string_literal(&mut self, idx: NodeIndex, text: &str) -> Result<(), EmitError> {
        let quoted = quote_string(text);
        self.write_mapped(idx, &quoted, None)
    }

    pub(super) fn emit_array_literal(
        &mut self,
        idx: NodeIndex,
        elements: &'a [NodeIndex],
    ) -> Result<(), EmitError> {
        self.with_mapping(idx, None, |p| {
            p.write("[");
            p.emit_comma_separated(elements)?;
            p.write("]");
            Ok(())
        })
    }

    pub(super) fn emit_object_literal(
        &mut self,
        idx: NodeIndex,
        properties: &'a [ObjectProperty],
    ) -> Result<(), EmitError> {
        self.with_mapping(idx, None, |p| {
            p.write("{");
            for (i, property) in properties.iter().enumerate() {
                p.write(if i == 0 { " " } else { ", " });
                p.write(&object_key(&property.key));
                p.write(": ");
                p.emit(property.value)?;
            }
            p.write(if properties.is_empty() { "}" } else { " }" });
            Ok(())
        })
    }
}

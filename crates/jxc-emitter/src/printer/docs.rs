//! JSDoc blocks read by the downstream optimizer.

use super::Printer;

/// Class doc directive that turns off the reflection export.
const SUPPRESS_EXPORT_TAG: &str = "@suppressexport";

/// True when a class doc comment asks for no reflection export.
pub(super) fn suppresses_export(doc: Option<&str>) -> bool {
    doc.is_some_and(|doc| {
        doc.split_whitespace()
            .any(|word| word.eq_ignore_ascii_case(SUPPRESS_EXPORT_TAG))
    })
}

impl<'a> Printer<'a> {
    /// Write `/**`, one ` * tag` line per entry, then ` */`.
    pub(super) fn write_doc_comment(&mut self, tags: &[String]) {
        self.write("/**");
        self.write_line();
        for tag in tags {
            self.write(" * ");
            self.write(tag);
            self.write_line();
        }
        self.write(" */");
        self.write_line();
    }

    pub(super) fn write_constructor_doc(&mut self, base: Option<&str>) {
        let mut tags = vec!["@constructor".to_string()];
        if let Some(base) = base {
            tags.push(format!("@extends {{{base}}}"));
        }
        self.write_doc_comment(&tags);
    }

    pub(super) fn write_type_doc(&mut self, type_name: &str) {
        self.write_doc_comment(&[format!("@type {{{type_name}}}")]);
    }

    pub(super) fn write_export_doc(&mut self) {
        self.write_doc_comment(&["Prevent renaming of class. Needed for reflection.".to_string()]);
    }
}

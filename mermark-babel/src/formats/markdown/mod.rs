//! Markdown format implementation
//!
//! This module implements bidirectional conversion between GitHub-flavored Markdown and the
//! block IR.
//!
//! # Element Mapping Table
//!
//! | IR Block     | Markdown                         | Notes                                         |
//! |--------------|----------------------------------|-----------------------------------------------|
//! | Heading      | `#` … `######`                   | ATX only; closing hashes are dropped          |
//! | Paragraph    | Text lines                       | Interior newlines are hard breaks             |
//! | List         | `- `, `1. `, `- [ ]`, `- [x]`    | Two spaces per nesting level                  |
//! | Table        | Pipe table with `---` separator  | Compact by default, see `table-padding`       |
//! | Protected    | Fenced code / `mermaid` fence    | Payload untouched; longer fence when needed   |
//! | Quote        | `> `                             | May contain any block                         |
//! | Rule         | `---`                            | `***` and `___` are read too                  |
//!
//! # Lossy Conversions
//!
//! - Setext headings and indented code blocks are not recognized.
//! - Table column alignment markers are read but not kept.
//! - Backslash escapes are passed through as literal text.
//!
//! # Options
//!
//! - `table-padding` (`true|false`, default `false`): pad non-empty table cells with one space
//!   on each side and write the separator as `| --- |`.

pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::{bool_option, check_option_keys, Format};
use crate::ir::nodes::Document;
use std::collections::HashMap;

/// Option key for padded table output.
pub const TABLE_PADDING: &str = "table-padding";

/// Markdown output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkdownOptions {
    pub table_padding: bool,
}

impl MarkdownOptions {
    /// Layer string options (as passed by `--extra-*` flags) over these settings.
    pub fn with_overrides(mut self, options: &HashMap<String, String>) -> Result<Self, FormatError> {
        check_option_keys("markdown", options, &[TABLE_PADDING])?;
        if let Some(padding) = bool_option("markdown", options, TABLE_PADDING)? {
            self.table_padding = padding;
        }
        Ok(self)
    }
}

/// Format implementation for Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    options: MarkdownOptions,
}

impl MarkdownFormat {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> MarkdownOptions {
        self.options
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "GitHub-flavored Markdown"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parser::parse_from_markdown(source))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serializer::serialize_to_markdown(doc, &self.options)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let options = self.options.with_overrides(options)?;
        serializer::serialize_to_markdown(doc, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_table_padding() {
        let mut extra = HashMap::new();
        extra.insert(TABLE_PADDING.to_string(), "true".to_string());
        let options = MarkdownOptions::default().with_overrides(&extra).unwrap();
        assert!(options.table_padding);
    }

    #[test]
    fn rejects_unknown_option() {
        let mut extra = HashMap::new();
        extra.insert("theme".to_string(), "dark".to_string());
        let err = MarkdownFormat::default()
            .serialize_with_options(&Document::default(), &extra)
            .unwrap_err();
        assert!(matches!(err, FormatError::NotSupported(_)));
    }
}

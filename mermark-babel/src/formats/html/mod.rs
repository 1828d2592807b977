//! HTML format implementation
//!
//! This module implements bidirectional conversion between the rich-text editor's HTML and the
//! block IR. It is not a general HTML parser: it understands the editor's vocabulary and strips
//! anything else while keeping its text.
//!
//! # Element Mapping Table
//!
//! | IR Block   | HTML                                                        | Notes                              |
//! |------------|-------------------------------------------------------------|------------------------------------|
//! | Heading    | `<h1 id="slug">` … `<h6>`                                   | Ids regenerated from the text      |
//! | Paragraph  | `<p>` with `<br>` between lines                             | Loose text is a paragraph too      |
//! | List       | `<ul>`/`<ol>`/`<li><p>`, nested inside the parent `<li>`    | Task lists use `data-type` attrs   |
//! | Table      | `<table><tbody><tr><th><p>`/`<td><p>`                       | Empty cells are `<td></td>`        |
//! | Protected  | `<pre><code class="language-X">` / `<div data-type="mermaid" data-code>` | Diagram source is percent-encoded |
//! | Quote      | `<blockquote>`                                              |                                    |
//! | Rule       | `<hr>`                                                      |                                    |
//!
//! Inline: `strong`/`b`, `em`/`i`, `s`/`del`/`strike`, `code`, `a[href]`, `img[src][alt]`, `br`.
//!
//! # Lossy Conversions
//!
//! - Heading ids are not read; they are always derived from the heading text.
//! - Ordered lists are renumbered from 1.
//! - Blank list items are dropped.
//! - A header-only table gains one empty body row.
//!
//! # Options
//!
//! - `heading-ids` (`true|false`, default `true`): emit slug `id` attributes on headings.

pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::{bool_option, check_option_keys, Format};
use crate::ir::nodes::Document;
use std::collections::HashMap;

/// Option key for heading anchors.
pub const HEADING_IDS: &str = "heading-ids";

/// HTML output settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOptions {
    pub heading_ids: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self { heading_ids: true }
    }
}

impl HtmlOptions {
    /// Layer string options (as passed by `--extra-*` flags) over these settings.
    pub fn with_overrides(mut self, options: &HashMap<String, String>) -> Result<Self, FormatError> {
        check_option_keys("html", options, &[HEADING_IDS])?;
        if let Some(ids) = bool_option("html", options, HEADING_IDS)? {
            self.heading_ids = ids;
        }
        Ok(self)
    }
}

/// Format implementation for HTML
#[derive(Debug, Clone, Default)]
pub struct HtmlFormat {
    options: HtmlOptions,
}

impl HtmlFormat {
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> HtmlOptions {
        self.options
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Rich-text editor HTML"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parser::parse_from_html(source))
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        serializer::serialize_to_html(doc, &self.options)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let options = self.options.with_overrides(options)?;
        serializer::serialize_to_html(doc, &options)
    }
}

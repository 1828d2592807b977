//! HTML format tests
//!
//! Tests for editor HTML → Markdown conversion.

mod import;
mod lists;
mod table;

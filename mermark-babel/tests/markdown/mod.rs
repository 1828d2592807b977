//! Markdown format tests
//!
//! Tests for Markdown → editor HTML conversion.

mod export;
mod lists;
mod table;

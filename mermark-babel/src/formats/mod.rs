//! Format implementations
//!
//! Each format converts between its text representation and the block IR.

pub mod html;
pub mod markdown;

pub use html::{HtmlFormat, HtmlOptions};
pub use markdown::{MarkdownFormat, MarkdownOptions};

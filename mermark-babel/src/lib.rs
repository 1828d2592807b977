//! Bidirectional conversion between rich-text editor HTML and GitHub-flavored Markdown
//!
//!     The editor stores documents as a constrained HTML vocabulary; users read, diff and write
//!     them as Markdown. This crate converts between the two so that a document can go
//!     HTML → Markdown → HTML (or the reverse) without structural drift, including diagram
//!     fences whose source uses characters every other pass would mangle.
//!
//!     This is a pure lib, that is, it powers mermark-cli but is shell agnostic: no code here
//!     prints, reads the environment or touches the file system. Conversions are synchronous
//!     deterministic functions of their input and keep no state between calls.
//!
//! Architecture
//!
//!     Both directions go through a typed block IR (./ir/nodes.rs) instead of rewriting one big
//!     string with global regexes:
//!
//!         markdown_to_html: normalize line endings → extract fences → parse Markdown blocks
//!                           → render HTML blocks → reinsert fences
//!         html_to_markdown: extract <pre> and diagram <div>s → parse HTML blocks
//!                           → render Markdown blocks → reinsert fences
//!
//!     Fenced payloads are lifted out before anything else runs and are only put back as the very
//!     last step (./common/protect.rs). In between they are opaque `Block::Protected` leaves
//!     whose placeholder tokens no other pass can match. The placeholder counter lives in each
//!     extraction, so concurrent conversions never share state.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── transforms.rs           # Line-ending aware conversion, round-trip checks
//!     ├── formats
//!     │   ├── <format>
//!     │   │   ├── parser.rs       # <format> → IR
//!     │   │   ├── serializer.rs   # IR → <format>
//!     │   │   └── mod.rs
//!     ├── ir                      # Intermediate Representation
//!     └── common                  # Entities, inline spans, lists, tables, fences, slugs
//!
//! Core Algorithms
//!
//!     The hard parts are lists and fences. Markdown lists are flat lines with indentation, the
//!     editor's lists are nested elements; ./common/flat_to_nested.rs and
//!     ./common/nested_to_flat.rs convert between the two through a flat `ListItem` sequence.
//!     The HTML side pairs tags with a depth-counting scanner (./common/scan.rs) because list
//!     items contain lists.
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── markdown/<testname>.rs
//!     ├── html/<testname>.rs
//!     ├── common/<testname>.rs
//!     └── round_trip.rs           # Round-trip laws and proptest properties
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include
//!     these in the mod.

pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod transforms;

pub mod common;
pub mod ir;

pub use common::entities::{decode_html_entities, escape_html};
pub use common::line_ending::{apply_line_ending, detect_line_ending, LineEnding};
pub use common::slug::generate_slug;
pub use error::FormatError;
pub use format::Format;
pub use formats::{HtmlFormat, HtmlOptions, MarkdownFormat, MarkdownOptions};
pub use registry::FormatRegistry;

/// Convert editor HTML to Markdown with default options.
///
/// The result is LF-only and has no trailing newline. Empty input gives empty output.
pub fn html_to_markdown(html: &str) -> String {
    html_to_markdown_with(html, &MarkdownOptions::default())
}

/// Convert editor HTML to Markdown.
pub fn html_to_markdown_with(html: &str, options: &MarkdownOptions) -> String {
    let doc = formats::html::parser::parse_from_html(html);
    let result = formats::markdown::serializer::render_markdown(&doc, options);
    debug_assert!(
        result.is_complete(),
        "unmatched placeholders {:?}",
        result.unmatched
    );
    result.text
}

/// Convert Markdown to editor HTML with default options.
///
/// Input may use any line endings. Empty input gives empty output.
pub fn markdown_to_html(markdown: &str) -> String {
    markdown_to_html_with(markdown, &HtmlOptions::default())
}

/// Convert Markdown to editor HTML.
pub fn markdown_to_html_with(markdown: &str, options: &HtmlOptions) -> String {
    let doc = formats::markdown::parser::parse_from_markdown(markdown);
    let result = formats::html::serializer::render_html(&doc, options);
    debug_assert!(
        result.is_complete(),
        "unmatched placeholders {:?}",
        result.unmatched
    );
    result.text
}

//! IR → Markdown.

use super::MarkdownOptions;
use crate::common::inline::escape_block_markers;
use crate::common::nested_to_flat::render_list_markdown;
use crate::common::protect::{self, placeholder, Reinsertion, DIAGRAM_LANGUAGE};
use crate::common::table::render_table_markdown;
use crate::error::FormatError;
use crate::ir::nodes::{Block, Document, ProtectedBlock, ProtectedKind};

/// Serialize a document, failing if a protected block could not be put back.
pub fn serialize_to_markdown(
    doc: &Document,
    options: &MarkdownOptions,
) -> Result<String, FormatError> {
    let result = render_markdown(doc, options);
    if result.is_complete() {
        Ok(result.text)
    } else {
        Err(FormatError::SerializationError(format!(
            "protected block(s) {:?} could not be reinserted",
            result.unmatched
        )))
    }
}

/// Render blocks with placeholder tokens, then reinsert fences as the last step.
pub fn render_markdown(doc: &Document, options: &MarkdownOptions) -> Reinsertion {
    let body = render_blocks(&doc.blocks, doc, options);
    protect::reinsert(&body, &doc.protected, render_fence)
}

fn render_blocks(blocks: &[Block], doc: &Document, options: &MarkdownOptions) -> String {
    blocks
        .iter()
        .filter_map(|block| render_block(block, doc, options))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(block: &Block, doc: &Document, options: &MarkdownOptions) -> Option<String> {
    let text = match block {
        Block::Heading { level, content } => {
            format!("{} {}", "#".repeat((*level).clamp(1, 6)), single_line(content))
        }
        Block::Paragraph { content } => content
            .lines()
            .map(escape_block_markers)
            .collect::<Vec<_>>()
            .join("\n"),
        Block::List { items } => render_list_markdown(items, &doc.protected),
        Block::Table(table) => render_table_markdown(table, options.table_padding),
        Block::Protected { id } => match doc.protected.get(*id) {
            Some(protected) => placeholder(protected),
            None => {
                log::error!("block refers to missing protected payload {id}");
                return None;
            }
        },
        Block::Quote { blocks } => render_blocks(blocks, doc, options)
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Block::Rule => "---".to_string(),
    };
    Some(text)
}

fn single_line(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a fence. `prefix` is whatever precedes the token on its line; quote
/// markers are repeated on every fence line, anything else becomes indentation.
/// An empty payload renders as an opening fence directly followed by its close.
fn render_fence(block: &ProtectedBlock, prefix: &str) -> String {
    let (info, payload) = match &block.kind {
        ProtectedKind::FencedCode { language } => {
            (language.clone().unwrap_or_default(), block.payload.clone())
        }
        ProtectedKind::Diagram => (
            DIAGRAM_LANGUAGE.to_string(),
            protect::canonicalize_diagram_breaks(&block.payload),
        ),
    };

    let fence = "`".repeat(longest_backtick_run(&payload).max(2) + 1);
    let continuation = if prefix.chars().all(|c| c == '>' || c == ' ') {
        prefix.to_string()
    } else {
        " ".repeat(prefix.chars().count())
    };

    let mut lines = vec![format!("{fence}{info}")];
    if !payload.is_empty() {
        lines.extend(payload.split('\n').map(str::to_string));
    }
    lines.push(fence);

    let mut out = lines[0].clone();
    for line in &lines[1..] {
        out.push('\n');
        if line.is_empty() {
            out.push_str(continuation.trim_end());
        } else {
            out.push_str(&continuation);
            out.push_str(line);
        }
    }
    out
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

//! IR → editor HTML.
//!
//! Output is the editor's fragment vocabulary with no document wrapper and no
//! whitespace between blocks. Code blocks and diagrams are rendered last, by
//! replacing their placeholder tokens.

use super::HtmlOptions;
use crate::common::entities::{escape_attribute, escape_html};
use crate::common::flat_to_nested::render_list_html;
use crate::common::inline::markdown_to_html_inline;
use crate::common::protect::{self, placeholder, Reinsertion, DIAGRAM_LANGUAGE, PLAIN_LANGUAGE};
use crate::common::slug::generate_slug;
use crate::common::table::render_table_html;
use crate::error::FormatError;
use crate::ir::nodes::{Block, Document, ProtectedBlock, ProtectedKind};

/// Serialize a document, failing if a protected block could not be put back.
pub fn serialize_to_html(doc: &Document, options: &HtmlOptions) -> Result<String, FormatError> {
    let result = render_html(doc, options);
    if result.is_complete() {
        Ok(result.text)
    } else {
        Err(FormatError::SerializationError(format!(
            "protected block(s) {:?} could not be reinserted",
            result.unmatched
        )))
    }
}

/// Render blocks with placeholder tokens, then reinsert payloads as the last step.
pub fn render_html(doc: &Document, options: &HtmlOptions) -> Reinsertion {
    let mut body = String::new();
    render_blocks(&doc.blocks, doc, options, &mut body);
    protect::reinsert(&body, &doc.protected, |block, _| render_protected(block))
}

fn render_blocks(blocks: &[Block], doc: &Document, options: &HtmlOptions, out: &mut String) {
    for block in blocks {
        match block {
            Block::Heading { level, content } => {
                let level = (*level).clamp(1, 6);
                let slug = generate_slug(content);
                if options.heading_ids && !slug.is_empty() {
                    out.push_str(&format!(r#"<h{level} id="{}">"#, escape_attribute(&slug)));
                } else {
                    out.push_str(&format!("<h{level}>"));
                }
                out.push_str(&markdown_to_html_inline(content));
                out.push_str(&format!("</h{level}>"));
            }
            Block::Paragraph { content } => {
                let lines: Vec<String> = content.lines().map(markdown_to_html_inline).collect();
                out.push_str("<p>");
                out.push_str(&lines.join("<br>"));
                out.push_str("</p>");
            }
            Block::List { items } => out.push_str(&render_list_html(items, &doc.protected)),
            Block::Table(table) => out.push_str(&render_table_html(table)),
            Block::Protected { id } => match doc.protected.get(*id) {
                Some(protected) => out.push_str(&placeholder(protected)),
                None => log::error!("block refers to missing protected payload {id}"),
            },
            Block::Quote { blocks } => {
                out.push_str("<blockquote>");
                render_blocks(blocks, doc, options, out);
                out.push_str("</blockquote>");
            }
            Block::Rule => out.push_str("<hr>"),
        }
    }
}

fn render_protected(block: &ProtectedBlock) -> String {
    match &block.kind {
        ProtectedKind::FencedCode { language } => {
            let language = language.as_deref().unwrap_or(PLAIN_LANGUAGE);
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_attribute(language),
                escape_html(&block.payload)
            )
        }
        ProtectedKind::Diagram => format!(
            r#"<div data-type="{DIAGRAM_LANGUAGE}" data-code="{}"></div>"#,
            protect::encode_diagram(&block.payload)
        ),
    }
}

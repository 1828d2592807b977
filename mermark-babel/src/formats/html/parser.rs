//! Editor HTML → IR.
//!
//! `<pre>` code blocks and diagram `<div>`s are lifted out first, then the
//! remaining markup is walked block by block with the depth-counting scanner.
//! Unknown wrappers are unwrapped and their content kept. An element whose
//! closing tag cannot be found ends the walk and the rest of the input is
//! treated as loose text, so nothing after it is dropped.

use crate::common::inline::html_to_markdown_inline;
use crate::common::nested_to_flat::flatten_html_list;
use crate::common::protect::{extract_html_blocks, split_placeholders};
use crate::common::scan::{self, find_open_tag, Element};
use crate::common::table::parse_html_table;
use crate::ir::nodes::{Block, Document};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Tags whose whole content is discarded.
const DISCARDED: &[&str] = &["head", "script", "style", "template"];

/// Tags that are unwrapped: their content is parsed as blocks in place.
const WRAPPERS: &[&str] = &[
    "html", "body", "main", "article", "section", "header", "footer", "div", "figure", "aside",
    "nav",
];

const BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "ul", "ol", "table", "blockquote", "hr", "head",
    "script", "style", "template", "html", "body", "main", "article", "section", "header",
    "footer", "div", "figure", "aside", "nav",
];

/// Parse editor HTML into a document.
pub fn parse_from_html(source: &str) -> Document {
    let extraction = extract_html_blocks(source);
    let blocks = parse_blocks(&extraction.text);
    log::debug!(
        "parsed html: {} block(s), {} protected",
        blocks.len(),
        extraction.blocks.len()
    );
    let mut doc = Document::new(blocks, extraction.blocks);
    for id in doc.adopt_orphans() {
        log::warn!("protected block {id} lost its position; keeping it at the end");
    }
    doc
}

/// Parse a fragment of block-level HTML. Recurses for wrappers and quotes.
pub fn parse_blocks(html: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut loose = String::new();
    let mut pos = 0;

    while let Some(open) = find_open_tag(html, pos, BLOCK_TAGS) {
        let start = open.start;
        loose.push_str(&html[pos..start]);

        let Some(el) = scan::element(html, open) else {
            log::warn!("unterminated block element at byte {start}; keeping the rest as text");
            pos = start;
            break;
        };

        push_text(&mut blocks, &std::mem::take(&mut loose));
        push_element(&mut blocks, &el);
        pos = el.end;
    }

    loose.push_str(&html[pos..]);
    push_text(&mut blocks, &loose);
    blocks
}

fn push_element(blocks: &mut Vec<Block>, el: &Element<'_>) {
    let name = el.open.name.as_str();

    if HEADINGS.contains(&name) {
        let level = name[1..].parse().unwrap_or(1);
        let mut text = Vec::new();
        let mut displaced = Vec::new();
        for part in split_placeholders(el.inner) {
            match part {
                Ok(fragment) => text.push(fragment),
                Err(id) => displaced.push(id),
            }
        }
        let content = single_line(&html_to_markdown_inline(&text.join(" ")));
        if content.is_empty() {
            log::debug!("dropping empty <{name}>");
        } else {
            blocks.push(Block::Heading { level, content });
        }
        blocks.extend(displaced.into_iter().map(|id| Block::Protected { id }));
        return;
    }

    match name {
        "p" => push_text(blocks, el.inner),
        "ul" | "ol" => {
            let items = flatten_html_list(el);
            if !items.is_empty() {
                blocks.push(Block::List { items });
            }
        }
        "table" => match parse_html_table(el) {
            Some((table, displaced)) => {
                blocks.push(Block::Table(table));
                blocks.extend(displaced.into_iter().map(|id| Block::Protected { id }));
            }
            None => blocks.extend(parse_blocks(el.inner)),
        },
        "blockquote" => {
            let inner = parse_blocks(el.inner);
            if !inner.is_empty() {
                blocks.push(Block::Quote { blocks: inner });
            }
        }
        "hr" => blocks.push(Block::Rule),
        _ if DISCARDED.contains(&name) => {}
        _ if WRAPPERS.contains(&name) => blocks.extend(parse_blocks(el.inner)),
        _ => push_text(blocks, el.inner),
    }
}

/// Turn inline HTML into paragraphs, splitting out placeholder tokens as
/// protected blocks.
fn push_text(blocks: &mut Vec<Block>, html: &str) {
    for part in split_placeholders(html) {
        match part {
            Ok(text) => {
                let content = paragraph_lines(&html_to_markdown_inline(text));
                if !content.is_empty() {
                    blocks.push(Block::Paragraph { content });
                }
            }
            Err(id) => blocks.push(Block::Protected { id }),
        }
    }
}

fn paragraph_lines(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn single_line(content: &str) -> String {
    paragraph_lines(content).replace('\n', " ")
}

//! Markdown → IR.
//!
//! Parsing is line based. Fenced code and diagram fences are lifted out first
//! (see [`protect`](crate::common::protect)), so the block scanner only ever
//! sees a placeholder line where a fence was. Inline text is kept as Markdown.

use crate::common::flat_to_nested::{is_list_line, parse_markdown_list};
use crate::common::line_ending::normalize_line_endings;
use crate::common::protect::{extract_markdown_fences, parse_placeholder};
use crate::common::table::{is_table_row, is_table_start, parse_markdown_table};
use crate::ir::nodes::{Block, Document};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").unwrap());
static RULE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
});
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}> ?(.*)$").unwrap());

/// Parse Markdown into a document.
pub fn parse_from_markdown(source: &str) -> Document {
    let normalized = normalize_line_endings(source);
    let extraction = extract_markdown_fences(&normalized);
    let lines: Vec<&str> = extraction.text.split('\n').collect();
    let blocks = parse_blocks(&lines);
    log::debug!(
        "parsed markdown: {} block(s), {} protected",
        blocks.len(),
        extraction.blocks.len()
    );
    let mut doc = Document::new(blocks, extraction.blocks);
    for id in doc.adopt_orphans() {
        log::warn!("protected block {id} lost its position; keeping it at the end");
    }
    doc
}

/// Parse block structure from LF-split lines. Recurses for blockquotes.
pub fn parse_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<Block> {
    let lines: Vec<&str> = lines.iter().map(|line| line.as_ref()).collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        if let Some(id) = parse_placeholder(line) {
            blocks.push(Block::Protected { id });
            i += 1;
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(line) {
            blocks.push(Block::Heading {
                level: caps[1].len(),
                content: caps[2].trim().to_string(),
            });
            i += 1;
            continue;
        }

        if RULE_RE.is_match(line) {
            blocks.push(Block::Rule);
            i += 1;
            continue;
        }

        if QUOTE_RE.is_match(line) {
            let end = run_end(&lines, i, |l| QUOTE_RE.is_match(l));
            let inner: Vec<&str> = lines[i..end]
                .iter()
                .filter_map(|l| QUOTE_RE.captures(l).and_then(|c| c.get(1)))
                .map(|m| m.as_str())
                .collect();
            blocks.push(Block::Quote {
                blocks: parse_blocks(&inner),
            });
            i = end;
            continue;
        }

        if is_table_start(&lines, i) {
            let end = run_end(&lines, i + 2, |l| {
                is_table_row(l) && parse_placeholder(l).is_none()
            });
            blocks.push(Block::Table(parse_markdown_table(&lines[i..end])));
            i = end;
            continue;
        }

        if is_list_line(line) {
            let end = list_end(&lines, i);
            blocks.push(Block::List {
                items: parse_markdown_list(&lines[i..end]),
            });
            i = end;
            continue;
        }

        let end = paragraph_end(&lines, i);
        let content = lines[i..end]
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join("\n");
        blocks.push(Block::Paragraph { content });
        i = end;
    }

    blocks
}

/// Index of the first line at or after `start` that fails `keep`.
fn run_end<F>(lines: &[&str], start: usize, keep: F) -> usize
where
    F: Fn(&str) -> bool,
{
    lines[start.min(lines.len())..]
        .iter()
        .position(|line| !keep(line))
        .map_or(lines.len(), |offset| start + offset)
}

/// A list runs over its item lines, an indented placeholder under an item,
/// and the indented text lines right after such a placeholder.
fn list_end(lines: &[&str], start: usize) -> usize {
    let mut end = start + 1;
    let mut after_placeholder = false;
    while let Some(&line) = lines.get(end) {
        if is_list_line(line) {
            after_placeholder = false;
        } else if is_indented(line) && parse_placeholder(line).is_some() {
            after_placeholder = true;
        } else if !(after_placeholder && is_indented(line)) {
            break;
        }
        end += 1;
    }
    end
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t']) && !line.trim().is_empty()
}

/// A paragraph runs until a blank line or a line that opens another block.
fn paragraph_end(lines: &[&str], start: usize) -> usize {
    let mut end = start + 1;
    while end < lines.len() {
        let line = lines[end];
        if line.trim().is_empty()
            || parse_placeholder(line).is_some()
            || HEADING_RE.is_match(line)
            || RULE_RE.is_match(line)
            || QUOTE_RE.is_match(line)
            || is_list_line(line)
            || is_table_start(lines, end)
        {
            break;
        }
        end += 1;
    }
    end
}

//! Flat list items to nested HTML lists.
//!
//! # The High-Level Concept
//!
//! Markdown expresses list nesting with indentation only, so a list block is
//! first read into a flat sequence of [`ListItem`]s where nesting is the
//! `indent_level` field. Rebuilding the editor's nested `<ul>`/`<ol>` markup
//! from that sequence is a recursive descent over the items: every call owns
//! one list container at one indent level, and hands deeper runs to a nested
//! call whose output is placed *inside* the `<li>` of the preceding item.
//!
//! # Reading Markdown Lines
//!
//! A line is a list item when it starts with optional whitespace, then `-`,
//! `*` or `+` (bullets) or `<digits>.` / `<digits>)` (ordered), then a space
//! or the end of the line. A bullet whose content starts with `[ ]` or `[x]`
//! is a task item. Two spaces (or one tab) are one indent level.
//!
//! Indented lines between items are continuation lines of the item above:
//! a placeholder token (a fence nested in the item) or the paragraph text
//! that follows it. They are kept in the item's `blocks`.
//!
//! Indentation jumps deeper than one level are clamped to one level below the
//! previous item, so `- a\n      - b` nests `b` directly under `a` instead of
//! losing it. Levels count from the first item of the block, which is
//! always level 0.
//!
//! # The Algorithm
//!
//! `build_nested_list(items, start, base_level, protected)`:
//!
//! 1. Open a container matching `items[start]` (`<ul>`, `<ol>`, or a task
//!    list `<ul data-type="taskList">`).
//! 2. For every following item at `base_level` that belongs in the same
//!    container, emit its `<li>` with its text and attached blocks, then recurse for each run of deeper items,
//!    appending the nested lists before closing the `<li>`.
//! 3. Stop at the first item shallower than `base_level`, or at an item of a
//!    different kind at `base_level`; the caller starts a new container there.
//! 4. Return the markup and the index of the first unconsumed item.

use crate::common::inline::markdown_to_html_inline;
use crate::common::protect::{parse_placeholder, placeholder};
use crate::ir::nodes::{Block, ListItem, ListKind, ProtectedBlock};
use once_cell::sync::Lazy;
use regex::Regex;

/// Spaces per indent level.
pub const INDENT_WIDTH: usize = 2;

static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([ \t]*)(?:([-*+])|([0-9]{1,9})[.)])(?:[ \t]+(.*))?$").unwrap());
static TASK_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([ xX])\](?:[ \t]+(.*))?$").unwrap());

/// True if `line` opens a list item.
pub fn is_list_line(line: &str) -> bool {
    LIST_ITEM_RE.is_match(line)
}

/// Read one list line. Returns the raw (unclamped) indent level and the item.
pub fn parse_list_line(line: &str) -> Option<(usize, ListItem)> {
    let caps = LIST_ITEM_RE.captures(line)?;
    let level = indent_width(&caps[1]) / INDENT_WIDTH;
    let content = caps.get(4).map_or("", |m| m.as_str().trim());

    let item = if caps.get(2).is_some() {
        match TASK_MARKER_RE.captures(content) {
            Some(task) => {
                let checked = !task[1].trim().is_empty();
                let label = task.get(2).map_or("", |m| m.as_str().trim());
                ListItem::task(level, checked, label)
            }
            None => ListItem::bullet(level, content),
        }
    } else {
        let ordinal = caps[3].parse().unwrap_or(1);
        ListItem::ordered(level, ordinal, content)
    };

    Some((level, item))
}

fn indent_width(whitespace: &str) -> usize {
    whitespace
        .chars()
        .map(|c| if c == '\t' { INDENT_WIDTH } else { 1 })
        .sum()
}

/// Read a block of consecutive list lines into flat items.
///
/// Levels are measured from the first item's indentation and clamped so each
/// item is at most one level below its predecessor. Lines that are not list
/// items continue the item before them.
pub fn parse_markdown_list<S: AsRef<str>>(lines: &[S]) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = Vec::with_capacity(lines.len());
    let mut base_level: Option<usize> = None;

    for line in lines {
        let line = line.as_ref();
        let Some((raw_level, mut item)) = parse_list_line(line) else {
            match items.last_mut() {
                Some(last) => attach_continuation(last, line),
                None => log::debug!("skipping continuation line before the first item"),
            }
            continue;
        };
        let base = *base_level.get_or_insert(raw_level);
        let relative = raw_level.saturating_sub(base);
        let level = match items.last() {
            Some(prev) => relative.min(prev.indent_level + 1),
            None => 0,
        };
        if level != relative {
            log::debug!("clamped list indent {raw_level} to {level}");
        }
        item.indent_level = level;
        items.push(item);
    }

    items
}

fn attach_continuation(item: &mut ListItem, line: &str) {
    if let Some(id) = parse_placeholder(line) {
        item.blocks.push(Block::Protected { id });
        return;
    }
    let text = line.trim();
    if text.is_empty() {
        return;
    }
    match item.blocks.last_mut() {
        Some(Block::Paragraph { content }) => {
            content.push('\n');
            content.push_str(text);
        }
        _ => item.blocks.push(Block::Paragraph {
            content: text.to_string(),
        }),
    }
}

/// Render a flat item sequence as one or more nested HTML lists.
///
/// Protected blocks attached to items are emitted as placeholder tokens for
/// the serializer to replace, so `protected` is only read for token names.
pub fn render_list_html(items: &[ListItem], protected: &[ProtectedBlock]) -> String {
    let mut html = String::new();
    let mut index = 0;
    while index < items.len() {
        let (fragment, next) =
            build_nested_list(items, index, items[index].indent_level, protected);
        html.push_str(&fragment);
        index = next;
    }
    html
}

/// Build one list container starting at `items[start]`, which must be at
/// `base_level`. Returns the markup and the index of the first item not
/// consumed. Always consumes at least `items[start]`.
pub fn build_nested_list(
    items: &[ListItem],
    start: usize,
    base_level: usize,
    protected: &[ProtectedBlock],
) -> (String, usize) {
    let first = &items[start];
    let mut html = String::from(container_open(first));
    let mut index = start;

    while let Some(item) = items.get(index) {
        if item.indent_level != base_level || !item.same_container(first) {
            break;
        }

        html.push_str(&item_open(item));
        if !item.content.is_empty() || item.blocks.is_empty() {
            html.push_str(&paragraph_html(&item.content));
        }
        for block in &item.blocks {
            match block {
                Block::Protected { id } => match protected.get(*id) {
                    Some(payload) => html.push_str(&placeholder(payload)),
                    None => log::error!("list item refers to missing protected payload {id}"),
                },
                Block::Paragraph { content } => html.push_str(&paragraph_html(content)),
                other => log::warn!("dropping unsupported block inside list item: {other:?}"),
            }
        }
        index += 1;

        while let Some(child) = items.get(index) {
            if child.indent_level <= base_level {
                break;
            }
            let (nested, next) = build_nested_list(items, index, child.indent_level, protected);
            html.push_str(&nested);
            index = next;
        }

        html.push_str("</li>");
    }

    html.push_str(container_close(first));
    (html, index)
}

fn paragraph_html(content: &str) -> String {
    let lines: Vec<String> = content.lines().map(markdown_to_html_inline).collect();
    format!("<p>{}</p>", lines.join("<br>"))
}

fn container_open(item: &ListItem) -> &'static str {
    match (item.kind, item.is_task_item) {
        (_, true) => r#"<ul data-type="taskList">"#,
        (ListKind::Unordered, false) => "<ul>",
        (ListKind::Ordered, false) => "<ol>",
    }
}

fn container_close(item: &ListItem) -> &'static str {
    match item.kind {
        ListKind::Ordered if !item.is_task_item => "</ol>",
        _ => "</ul>",
    }
}

fn item_open(item: &ListItem) -> String {
    if item.is_task_item {
        format!(
            r#"<li data-type="taskItem" data-checked="{}">"#,
            item.is_checked
        )
    } else {
        "<li>".to_string()
    }
}

//! Nested HTML lists to flat list items and indented Markdown.
//!
//! # The High-Level Concept
//!
//! An editor list is a tree: `<li>` elements may hold a nested `<ul>`/`<ol>`
//! after their own text. Walking that tree in pre-order and recording the
//! depth of each `<li>` yields the same flat [`ListItem`] sequence that
//! [`flat_to_nested`](super::flat_to_nested) reads from Markdown, which then
//! renders as one indented line per item.
//!
//! # The Algorithm
//!
//! 1. **Items:** the direct `<li>` children of a list are found with the
//!    depth-counting scanner, never a single regex, because items contain
//!    nested lists with their own `</li>` tags.
//!
//! 2. **Own content vs. nested lists:** an item's own content is everything
//!    before its first nested `<ul>`/`<ol>`, plus any text after its nested
//!    lists. It is converted with the inline converter. Each nested list is
//!    walked at `indent + 1`.
//!
//! 3. **Code blocks in items:** a placeholder token inside the own content
//!    ends the item's first line. The token and any text after it are kept
//!    in [`ListItem::blocks`] and render as indented continuation lines.
//!
//! 4. **Task items:** `data-type="taskItem"` on the item (or `taskList` on
//!    the container) makes a task item; `data-checked="true"` or a checked
//!    checkbox input marks it done.
//!
//! 5. **Blank items** (no text and no code blocks) are dropped. Their nested lists are promoted to the
//!    level the blank item would have occupied, so nothing below is lost.
//!
//! 6. **Numbering:** ordered items are renumbered from 1 within each list
//!    instance. The numbers in the source markup are not kept.

use crate::common::flat_to_nested::INDENT_WIDTH;
use crate::common::inline::{escape_block_markers, html_to_markdown_inline};
use crate::common::protect::{placeholder, split_placeholders};
use crate::common::scan::{self, find_open_tag, Element};
use crate::ir::nodes::{Block, ListItem, ListKind, ProtectedBlock};

const LIST_TAGS: &[&str] = &["ul", "ol"];

/// Flatten a `<ul>` or `<ol>` element (and everything nested in it).
pub fn flatten_html_list(list: &Element<'_>) -> Vec<ListItem> {
    let mut items = Vec::new();
    walk_list(list, 0, &mut items);
    items
}

fn walk_list(list: &Element<'_>, indent: usize, items: &mut Vec<ListItem>) {
    let kind = if list.open.name == "ol" {
        ListKind::Ordered
    } else {
        ListKind::Unordered
    };
    let task_list = list
        .open
        .attribute("data-type")
        .is_some_and(|t| t.eq_ignore_ascii_case("taskList"));

    let mut ordinal = 0u32;
    for li in scan::children(list.inner, &["li"]) {
        let (own, rest) = split_nested(li.inner);
        let (sublists, tail) = nested_lists(rest);
        let (content, blocks) = item_body(&format!("{own} {tail}"));

        let child_indent = if content.is_empty() && blocks.is_empty() {
            log::debug!("dropping blank list item at level {indent}");
            indent
        } else {
            let is_task = task_list
                || li
                    .open
                    .attribute("data-type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("taskItem"));
            let item = if is_task {
                ListItem::task(indent, is_checked(&li, own), content)
            } else if kind == ListKind::Ordered {
                ordinal += 1;
                ListItem::ordered(indent, ordinal, content)
            } else {
                ListItem::bullet(indent, content)
            };
            items.push(item.with_blocks(blocks));
            indent + 1
        };

        for sub in sublists {
            walk_list(&sub, child_indent, items);
        }
    }
}

/// Split an item's inner HTML at its first nested list.
fn split_nested(inner: &str) -> (&str, &str) {
    match find_open_tag(inner, 0, LIST_TAGS) {
        Some(tag) => inner.split_at(tag.start),
        None => (inner, ""),
    }
}

/// The lists in the part of an item after its first nested list, and the
/// item text left between and after them.
fn nested_lists(rest: &str) -> (Vec<Element<'_>>, String) {
    let lists = scan::children(rest, LIST_TAGS);
    let mut tail = String::new();
    let mut last = 0;
    for list in &lists {
        tail.push_str(&rest[last..list.open.start]);
        tail.push(' ');
        last = list.end;
    }
    tail.push_str(&rest[last..]);
    (lists, tail)
}

/// Split an item's own HTML into its first-line text and the blocks that
/// follow the first code block.
fn item_body(html: &str) -> (String, Vec<Block>) {
    let mut content = String::new();
    let mut blocks = Vec::new();

    for part in split_placeholders(html) {
        match part {
            Ok(text) if blocks.is_empty() => {
                let text = item_content(text);
                if !text.is_empty() {
                    if !content.is_empty() {
                        content.push(' ');
                    }
                    content.push_str(&text);
                }
            }
            Ok(text) => {
                let lines = inline_lines(text);
                if !lines.is_empty() {
                    blocks.push(Block::Paragraph {
                        content: lines.join("\n"),
                    });
                }
            }
            Err(id) => blocks.push(Block::Protected { id }),
        }
    }
    (content, blocks)
}

fn inline_lines(html: &str) -> Vec<String> {
    html_to_markdown_inline(html)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn item_content(own: &str) -> String {
    inline_lines(own).join(" ")
}

fn is_checked(li: &Element<'_>, own: &str) -> bool {
    if let Some(value) = li.open.attribute("data-checked") {
        return value.eq_ignore_ascii_case("true");
    }
    find_open_tag(own, 0, &["input"]).is_some_and(|input| input.attribute("checked").is_some())
}

/// Render flat items as Markdown list lines, two spaces per level.
///
/// An item's attached blocks follow it on continuation lines indented to the
/// item's content column: placeholder tokens for code blocks, and paragraph
/// lines with their block markers escaped.
pub fn render_list_markdown(items: &[ListItem], protected: &[ProtectedBlock]) -> String {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let indent = " ".repeat(item.indent_level * INDENT_WIDTH);
        let marker = match (item.is_task_item, item.kind) {
            (true, _) if item.is_checked => "- [x] ".to_string(),
            (true, _) => "- [ ] ".to_string(),
            (false, ListKind::Unordered) => "- ".to_string(),
            (false, ListKind::Ordered) => format!("{}. ", item.ordinal.unwrap_or(1)),
        };
        lines.push(
            format!("{indent}{marker}{}", item.content)
                .trim_end()
                .to_string(),
        );

        let continuation = if item.is_task_item {
            format!("{indent}  ")
        } else {
            " ".repeat(indent.len() + marker.len())
        };
        for block in &item.blocks {
            match block {
                Block::Protected { id } => match protected.get(*id) {
                    Some(payload) => lines.push(format!("{continuation}{}", placeholder(payload))),
                    None => log::error!("list item refers to missing protected payload {id}"),
                },
                Block::Paragraph { content } => lines.extend(
                    content
                        .lines()
                        .map(|line| format!("{continuation}{}", escape_block_markers(line))),
                ),
                other => log::warn!("dropping unsupported block inside list item: {other:?}"),
            }
        }
    }
    lines.join("\n")
}

//! Pipe tables in both directions.
//!
//! Tables are always rectangular. Short rows are padded with empty cells and
//! empty cells are kept as empty strings, so `|Name|||` survives a round
//! trip through the editor's `<table>` markup unchanged.

use crate::common::inline::{html_to_markdown_inline, markdown_to_html_inline};
use crate::common::protect::split_placeholders;
use crate::common::scan::{self, Element};
use crate::ir::nodes::{Table, TableRow};
use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\|?\s*:?-+:?\s*(?:\|\s*:?-+:?\s*)*\|?\s*$").unwrap()
});

/// True if `line` is a header/body separator such as `|---|:---:|`.
pub fn is_separator_row(line: &str) -> bool {
    line.contains('|') && SEPARATOR_RE.is_match(line)
}

/// True if a table starts at `lines[index]`: a row with a pipe followed by a
/// separator row.
pub fn is_table_start<S: AsRef<str>>(lines: &[S], index: usize) -> bool {
    let Some(header) = lines.get(index).map(|line| line.as_ref()) else {
        return false;
    };
    let Some(separator) = lines.get(index + 1).map(|line| line.as_ref()) else {
        return false;
    };
    header.contains('|') && !is_separator_row(header) && is_separator_row(separator)
}

/// True if `line` can continue a table body.
pub fn is_table_row(line: &str) -> bool {
    !line.trim().is_empty() && line.contains('|')
}

/// Split one pipe row into cell strings. Leading and trailing pipes are
/// optional; `\|` is a literal pipe inside a cell.
pub fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    cells.push(current);

    if line.starts_with('|') && !cells.is_empty() {
        cells.remove(0);
    }
    if line.ends_with('|') && !line.ends_with("\\|") && cells.last().is_some_and(String::is_empty)
    {
        cells.pop();
    }

    cells.into_iter().map(|cell| cell.trim().to_string()).collect()
}

/// Read a Markdown table: header row, separator row, body rows.
pub fn parse_markdown_table<S: AsRef<str>>(lines: &[S]) -> Table {
    let mut rows = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| !is_separator_row(line))
        .map(|line| TableRow::new(split_row(line)));

    let header = rows.next().unwrap_or_default();
    Table::new(header, rows.collect())
}

/// Read an HTML `<table>` element. The first `<tr>` is the header, whether its
/// cells are `<th>` or `<td>`. Returns `None` for a table without rows.
///
/// A cell holds inline text only, so placeholder tokens found in cells are
/// taken out and returned in order for the caller to place after the table.
pub fn parse_html_table(table: &Element<'_>) -> Option<(Table, Vec<usize>)> {
    let mut rows = Vec::new();
    let mut displaced = Vec::new();
    collect_rows(table.inner, &mut rows, &mut displaced);

    let mut rows = rows.into_iter();
    let header = rows.next()?;
    Some((Table::new(header, rows.collect()), displaced))
}

fn collect_rows(html: &str, rows: &mut Vec<TableRow>, displaced: &mut Vec<usize>) {
    for child in scan::children(html, &["thead", "tbody", "tfoot", "tr"]) {
        if child.open.name == "tr" {
            let cells = scan::children(child.inner, &["th", "td"])
                .iter()
                .map(|cell| cell_text(cell.inner, displaced))
                .collect();
            rows.push(TableRow::new(cells));
        } else {
            collect_rows(child.inner, rows, displaced);
        }
    }
}

fn cell_text(html: &str, displaced: &mut Vec<usize>) -> String {
    let mut text = Vec::new();
    for part in split_placeholders(html) {
        match part {
            Ok(fragment) => text.push(fragment),
            Err(id) => {
                log::debug!("moving protected block {id} out of a table cell");
                displaced.push(id);
            }
        }
    }
    html_to_markdown_inline(&text.join(" "))
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a table as Markdown.
///
/// Compact form by default: `|a|b|` with a `|---|---|` separator. With
/// `padded`, non-empty cells get a space on each side and the separator reads
/// `| --- | --- |`; empty cells stay empty in both forms.
pub fn render_table_markdown(table: &Table, padded: bool) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(markdown_row(&table.header, padded));

    let rule = if padded { " --- " } else { "---" };
    lines.push(format!("|{}|", vec![rule; table.width()].join("|")));

    for row in &table.rows {
        lines.push(markdown_row(row, padded));
    }
    lines.join("\n")
}

fn markdown_row(row: &TableRow, padded: bool) -> String {
    let cells: Vec<String> = row
        .cells
        .iter()
        .map(|cell| {
            let escaped = cell.replace('|', "\\|");
            if padded && !escaped.is_empty() {
                format!(" {escaped} ")
            } else {
                escaped
            }
        })
        .collect();
    format!("|{}|", cells.join("|"))
}

/// Render a table as editor HTML. A table without body rows gets one empty
/// body row of the header's width.
pub fn render_table_html(table: &Table) -> String {
    let mut html = String::from("<table><tbody>");
    html.push_str(&html_row(&table.header, "th"));

    if table.rows.is_empty() {
        html.push_str(&html_row(&TableRow::empty(table.width()), "td"));
    }
    for row in &table.rows {
        html.push_str(&html_row(row, "td"));
    }

    html.push_str("</tbody></table>");
    html
}

fn html_row(row: &TableRow, cell_tag: &str) -> String {
    let mut html = String::from("<tr>");
    for cell in &row.cells {
        if cell.is_empty() {
            html.push_str(&format!("<{cell_tag}></{cell_tag}>"));
        } else {
            html.push_str(&format!(
                "<{cell_tag}><p>{}</p></{cell_tag}>",
                markdown_to_html_inline(cell)
            ));
        }
    }
    html.push_str("</tr>");
    html
}

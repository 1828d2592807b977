//! Inspect transforms
//!
//! `mermark inspect` shows the intermediate representation a document parses
//! into. Each transform is one rendering of that IR:
//!
//! - `ir-json`: the whole document (blocks and protected payloads) as pretty JSON
//! - `ir-outline`: one line per block, nested blocks indented under their quote
//!   or list
//!
//! Example: `mermark inspect notes.md ir-outline`

use mermark_babel::ir::nodes::{Block, Document, ListKind, ProtectedKind};

/// All available inspect transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["ir-json", "ir-outline"];

pub const DEFAULT_TRANSFORM: &str = "ir-json";

/// Render `doc` with the named transform.
pub fn execute_transform(doc: &Document, transform: &str) -> Result<String, String> {
    match transform {
        "ir-json" => serde_json::to_string_pretty(doc)
            .map(|json| json + "\n")
            .map_err(|e| format!("JSON serialization failed: {e}")),
        "ir-outline" => Ok(outline(doc)),
        other => Err(format!("Unknown transform: {other}")),
    }
}

fn outline(doc: &Document) -> String {
    let mut out = String::new();
    outline_blocks(doc, &doc.blocks, 0, &mut out);
    out
}

fn outline_blocks(doc: &Document, blocks: &[Block], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for block in blocks {
        let line = match block {
            Block::Heading { level, content } => format!("heading h{level}: {content}"),
            Block::Paragraph { content } => {
                format!("paragraph ({} line(s)): {}", content.lines().count(), first_line(content))
            }
            Block::List { items } => {
                let levels = items.iter().map(|i| i.indent_level + 1).max().unwrap_or(0);
                let kind = match items.first() {
                    Some(item) if item.is_task_item => "task",
                    Some(item) if item.kind == ListKind::Ordered => "ordered",
                    _ => "bullet",
                };
                format!("list {kind}: {} item(s), depth {levels}", items.len())
            }
            Block::Table(table) => format!(
                "table: {} column(s), {} body row(s)",
                table.width(),
                table.rows.len()
            ),
            Block::Protected { id } => match doc.protected.get(*id) {
                Some(protected) => {
                    let kind = match &protected.kind {
                        ProtectedKind::FencedCode { language: Some(lang) } => format!("code {lang}"),
                        ProtectedKind::FencedCode { language: None } => "code".to_string(),
                        ProtectedKind::Diagram => "diagram".to_string(),
                    };
                    format!(
                        "protected #{id} {kind}: {} line(s)",
                        protected.payload.lines().count()
                    )
                }
                None => format!("protected #{id} (missing)"),
            },
            Block::Quote { blocks } => format!("quote: {} block(s)", blocks.len()),
            Block::Rule => "rule".to_string(),
        };
        out.push_str(&indent);
        out.push_str(&line);
        out.push('\n');

        match block {
            Block::Quote { blocks } => outline_blocks(doc, blocks, depth + 1, out),
            Block::List { items } => {
                for item in items.iter().filter(|item| !item.blocks.is_empty()) {
                    outline_blocks(doc, &item.blocks, depth + 1, out);
                }
            }
            _ => {}
        }
    }
}

fn first_line(content: &str) -> &str {
    content.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mermark_babel::formats::markdown::parser::parse_from_markdown;

    #[test]
    fn json_includes_blocks_and_payloads() {
        let doc = parse_from_markdown("# Title\n\n```rust\nfn f() {}\n```");
        let json = execute_transform(&doc, "ir-json").unwrap();
        assert!(json.contains("\"kind\": \"heading\""));
        assert!(json.contains("\"kind\": \"protected\""));
        assert!(json.contains("\"language\": \"rust\""));
        assert!(json.contains("fn f() {}"));
    }

    #[test]
    fn outline_lists_one_line_per_block() {
        let doc = parse_from_markdown(
            "# T\n\n- a\n  - b\n\n|x|y|\n|---|---|\n|1|2|\n\n> quoted\n\n```mermaid\nA-->B\n```",
        );
        assert_eq!(
            execute_transform(&doc, "ir-outline").unwrap(),
            "heading h1: T\n\
             list bullet: 2 item(s), depth 2\n\
             table: 2 column(s), 1 body row(s)\n\
             quote: 1 block(s)\n  \
             paragraph (1 line(s)): quoted\n\
             protected #0 diagram: 1 line(s)\n"
        );
    }

    #[test]
    fn outline_shows_blocks_inside_list_items() {
        let doc = parse_from_markdown("- run\n  ```sh\n  make\n  ```\n  then wait\n- done");
        assert_eq!(
            execute_transform(&doc, "ir-outline").unwrap(),
            "list bullet: 2 item(s), depth 1\n  \
             protected #0 code sh: 1 line(s)\n  \
             paragraph (1 line(s)): then wait\n"
        );
    }

    #[test]
    fn unknown_transform_is_an_error() {
        let doc = Document::default();
        assert!(execute_transform(&doc, "ast-tag").is_err());
    }
}

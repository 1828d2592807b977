//! Core data structures for the Intermediate Representation (IR).

use serde::Serialize;

/// A converted document: block structure plus the fenced payloads that were
/// lifted out of the text before block parsing.
///
/// `protected` is indexed by placeholder id; every entry is referred to by
/// exactly one `Block::Protected(id)` in the block tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub protected: Vec<ProtectedBlock>,
}

impl Document {
    pub fn new(blocks: Vec<Block>, protected: Vec<ProtectedBlock>) -> Self {
        Self { blocks, protected }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Protected ids referred to from the block tree, in document order.
    pub fn referenced_ids(&self) -> Vec<usize> {
        let mut ids = Vec::new();
        collect_ids(&self.blocks, &mut ids);
        ids
    }

    /// Append a top-level `Protected` block for every payload the block tree
    /// does not refer to, and return their ids.
    ///
    /// Parsers call this once their walk is done: a payload whose surrounding
    /// markup was discarded is kept at the end of the document instead of lost.
    pub fn adopt_orphans(&mut self) -> Vec<usize> {
        let referenced = self.referenced_ids();
        let orphans: Vec<usize> = (0..self.protected.len())
            .filter(|id| !referenced.contains(id))
            .collect();
        self.blocks
            .extend(orphans.iter().map(|&id| Block::Protected { id }));
        orphans
    }
}

fn collect_ids(blocks: &[Block], ids: &mut Vec<usize>) {
    for block in blocks {
        match block {
            Block::Protected { id } => ids.push(*id),
            Block::Quote { blocks } => collect_ids(blocks, ids),
            Block::List { items } => {
                for item in items {
                    collect_ids(&item.blocks, ids);
                }
            }
            _ => {}
        }
    }
}

/// A block-level node.
///
/// Inline content (`content` fields, list items, table cells) is always held
/// as Markdown inline text. The HTML side converts on the way in and out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: usize, content: String },
    Paragraph { content: String },
    List { items: Vec<ListItem> },
    Table(Table),
    /// A fenced code block or diagram, referenced by placeholder id.
    Protected { id: usize },
    Quote { blocks: Vec<Block> },
    Rule,
}

/// Marker family of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Unordered,
    Ordered,
}

/// One item of a flat list.
///
/// Nesting is expressed by `indent_level` alone. Within a list block the
/// level of an item never exceeds the level of the item before it plus one.
///
/// `blocks` holds what follows the item's first line inside the item: code
/// blocks and diagrams (`Block::Protected`) and the paragraphs after them.
/// It renders before any deeper items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub indent_level: usize,
    pub content: String,
    pub kind: ListKind,
    pub ordinal: Option<u32>,
    pub is_task_item: bool,
    pub is_checked: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl ListItem {
    pub fn bullet(indent_level: usize, content: impl Into<String>) -> Self {
        Self {
            indent_level,
            content: content.into(),
            kind: ListKind::Unordered,
            ordinal: None,
            is_task_item: false,
            is_checked: false,
            blocks: Vec::new(),
        }
    }

    pub fn ordered(indent_level: usize, ordinal: u32, content: impl Into<String>) -> Self {
        Self {
            indent_level,
            content: content.into(),
            kind: ListKind::Ordered,
            ordinal: Some(ordinal),
            is_task_item: false,
            is_checked: false,
            blocks: Vec::new(),
        }
    }

    pub fn task(indent_level: usize, checked: bool, content: impl Into<String>) -> Self {
        Self {
            indent_level,
            content: content.into(),
            kind: ListKind::Unordered,
            ordinal: None,
            is_task_item: true,
            is_checked: checked,
            blocks: Vec::new(),
        }
    }

    /// The same item with `blocks` attached.
    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Two items belong to the same list container when their marker family
    /// and task-ness agree.
    pub fn same_container(&self, other: &ListItem) -> bool {
        self.kind == other.kind && self.is_task_item == other.is_task_item
    }
}

/// A rectangular table. The header row is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub header: TableRow,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Build a table, padding every row with empty cells to the widest row.
    pub fn new(header: TableRow, rows: Vec<TableRow>) -> Self {
        let width = rows
            .iter()
            .map(|row| row.cells.len())
            .chain(std::iter::once(header.cells.len()))
            .max()
            .unwrap_or(0);

        let mut header = header;
        header.pad_to(width);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.pad_to(width);
                row
            })
            .collect();

        Self { header, rows }
    }

    pub fn width(&self) -> usize {
        self.header.cells.len()
    }
}

/// Ordered cell strings of one table row.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TableRow {
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn empty(width: usize) -> Self {
        Self {
            cells: vec![String::new(); width],
        }
    }

    fn pad_to(&mut self, width: usize) {
        if self.cells.len() < width {
            self.cells.resize(width, String::new());
        }
    }
}

/// Payload lifted out of the text stream before block parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtectedBlock {
    pub placeholder_id: usize,
    pub kind: ProtectedKind,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtectedKind {
    FencedCode { language: Option<String> },
    Diagram,
}

//! Depth-tracking HTML tag scanner.
//!
//! The editor's HTML nests arbitrarily (lists inside list items, paragraphs
//! inside table cells), so a single regex cannot pair an opening tag with its
//! close. These helpers walk tags left to right and count depth per tag name.
//!
//! Every lookup returns `None` when it cannot find what it needs. Callers treat
//! that as "leave this region alone" rather than emitting partial output.

/// Elements that never take a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "col", "wbr"];

/// One tag as it appears in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag<'a> {
    /// Lowercased element name.
    pub name: String,
    /// Raw attribute text between the name and `>`.
    pub attrs: &'a str,
    /// Byte offset of `<`.
    pub start: usize,
    /// Byte offset just past `>`.
    pub end: usize,
    pub closing: bool,
    pub self_closing: bool,
}

impl Tag<'_> {
    pub fn is_void(&self) -> bool {
        self.self_closing || VOID_ELEMENTS.contains(&self.name.as_str())
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        attribute(self.attrs, name)
    }
}

/// An element with its matched closing tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<'a> {
    pub open: Tag<'a>,
    /// Source between the opening and closing tags.
    pub inner: &'a str,
    /// Byte offset just past the closing tag.
    pub end: usize,
}

/// Find the next tag at or after `from`, skipping comments and doctypes.
pub fn next_tag(html: &str, from: usize) -> Option<Tag<'_>> {
    let bytes = html.as_bytes();
    let mut pos = from;

    while let Some(offset) = html.get(pos..)?.find('<') {
        let start = pos + offset;
        let rest = &html[start..];

        if rest.starts_with("<!--") {
            pos = match rest.find("-->") {
                Some(close) => start + close + 3,
                None => return None,
            };
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = start + rest.find('>')? + 1;
            continue;
        }

        let closing = bytes.get(start + 1) == Some(&b'/');
        let name_start = if closing { start + 2 } else { start + 1 };
        let name_len = html[name_start..]
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'-')
            .count();
        if name_len == 0 || !bytes[name_start].is_ascii_alphabetic() {
            pos = start + 1;
            continue;
        }

        let name_end = name_start + name_len;
        let gt = find_tag_end(html, name_end)?;
        let raw_attrs = &html[name_end..gt];
        let self_closing = raw_attrs.trim_end().ends_with('/');
        let attrs = raw_attrs.trim_end().trim_end_matches('/');

        return Some(Tag {
            name: html[name_start..name_end].to_ascii_lowercase(),
            attrs,
            start,
            end: gt + 1,
            closing,
            self_closing,
        });
    }

    None
}

/// Locate the `>` that ends a tag, ignoring any inside quoted attribute values.
fn find_tag_end(html: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in html.as_bytes()[from..].iter().enumerate() {
        match (quote, *b) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => quote = Some(*b),
            (None, b'>') => return Some(from + i),
            (None, _) => {}
        }
    }
    None
}

/// Find the next opening tag whose name is one of `names`.
pub fn find_open_tag<'a>(html: &'a str, from: usize, names: &[&str]) -> Option<Tag<'a>> {
    let mut pos = from;
    while let Some(tag) = next_tag(html, pos) {
        if !tag.closing && names.contains(&tag.name.as_str()) {
            return Some(tag);
        }
        pos = tag.end;
    }
    None
}

/// Find the closing tag matching an element named `name` whose content starts
/// at `from`. Returns `(close_start, close_end)`.
pub fn find_matching_close(html: &str, name: &str, from: usize) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut pos = from;
    while let Some(tag) = next_tag(html, pos) {
        pos = tag.end;
        if tag.name != name {
            continue;
        }
        if tag.closing {
            if depth == 0 {
                return Some((tag.start, tag.end));
            }
            depth -= 1;
        } else if !tag.is_void() {
            depth += 1;
        }
    }
    None
}

/// Pair an opening tag with its close. Void and self-closing tags yield an
/// element with empty content.
pub fn element<'a>(html: &'a str, open: Tag<'a>) -> Option<Element<'a>> {
    if open.is_void() {
        let end = open.end;
        return Some(Element {
            open,
            inner: "",
            end,
        });
    }
    let (close_start, close_end) = find_matching_close(html, &open.name, open.end)?;
    let inner = &html[open.end..close_start];
    Some(Element {
        open,
        inner,
        end: close_end,
    })
}

/// Collect the direct children named in `names`, in document order.
///
/// Matching elements are not searched for further matches inside themselves,
/// so `children(table, &["tr"])` never returns rows of a nested table twice.
/// An opening tag without a matching close ends the scan.
pub fn children<'a>(html: &'a str, names: &[&str]) -> Vec<Element<'a>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(open) = find_open_tag(html, pos, names) {
        let name = open.name.clone();
        let start = open.start;
        match element(html, open) {
            Some(el) => {
                pos = el.end;
                found.push(el);
            }
            None => {
                log::warn!("unterminated <{name}> at byte {start}");
                break;
            }
        }
    }
    found
}

/// Read one attribute value from raw attribute text.
///
/// Handles double-quoted, single-quoted, unquoted and bare (valueless)
/// attributes. Names compare case-insensitively. Values are returned raw;
/// callers decode character references if they need to.
pub fn attribute(attrs: &str, name: &str) -> Option<String> {
    let bytes = attrs.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' {
            i += 1;
        }
        if name_start == i {
            break;
        }
        let attr_name = &attrs[name_start..i];

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let value_start = i + 1;
                    let value_end = attrs[value_start..]
                        .find(q as char)
                        .map(|offset| value_start + offset)
                        .unwrap_or(attrs.len());
                    i = (value_end + 1).min(attrs.len());
                    &attrs[value_start..value_end]
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                        i += 1;
                    }
                    &attrs[value_start..i]
                }
            }
        } else {
            ""
        };

        if attr_name.eq_ignore_ascii_case(name) {
            return Some(value.to_string());
        }
    }

    None
}

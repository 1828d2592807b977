//! Protected-block extraction and reinsertion.
//!
//! Fenced code and diagram source are lifted out of the text before any other
//! pass runs, so that escaping, tag stripping and inline conversion never see
//! them. Each payload is replaced by a placeholder token on its own line; the
//! serializers emit the token untouched and [`reinsert`] swaps the rendered
//! payload back in as the very last step.
//!
//! Placeholder tokens are delimited by private-use code points that the editor
//! never produces. Any such code points already present in the input are
//! removed before extraction so a token can only come from the extractor.
//!
//! The placeholder counter is the length of the extraction's own block list,
//! so concurrent conversions can never collide.

use crate::common::entities::decode_html_entities;
use crate::common::scan::{self, find_open_tag};
use crate::ir::nodes::{ProtectedBlock, ProtectedKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Opening delimiter of a placeholder token.
pub const PLACEHOLDER_OPEN: char = '\u{E000}';
/// Closing delimiter of a placeholder token.
pub const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Fence language that marks a diagram instead of source code.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// Language class the editor puts on untagged code blocks.
pub const PLAIN_LANGUAGE: &str = "plaintext";

/// Stand-in for a diagram line break inside the encoded `data-code` attribute.
/// The editor's diagram node understands the same token.
pub const BR_TOKEN: &str = "__BR__";

static DIAGRAM_BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{E000}(?:CODE_BLOCK|DIAGRAM)_([0-9]+)\u{E001}").unwrap());
static FENCE_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^((?: {0,3}> ?)*)( *)(`{3,})([^`]*)$").unwrap());
static STRIP_TAGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static HTML_BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// Placeholder token for a block.
pub fn placeholder(block: &ProtectedBlock) -> String {
    let prefix = match block.kind {
        ProtectedKind::FencedCode { .. } => "CODE_BLOCK",
        ProtectedKind::Diagram => "DIAGRAM",
    };
    format!(
        "{PLACEHOLDER_OPEN}{prefix}_{}{PLACEHOLDER_CLOSE}",
        block.placeholder_id
    )
}

/// If `text` (ignoring surrounding whitespace) is exactly one placeholder
/// token, return its id.
pub fn parse_placeholder(text: &str) -> Option<usize> {
    let text = text.trim();
    let caps = PLACEHOLDER_RE.captures(text)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != text.len() {
        return None;
    }
    caps[1].parse().ok()
}

/// Split text around placeholder tokens. Yields `Ok(text)` for plain segments
/// and `Err(id)` for tokens, in order. Empty text segments are omitted.
pub fn split_placeholders(text: &str) -> Vec<Result<&str, usize>> {
    let mut parts = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            parts.push(Ok(&text[last..whole.start()]));
        }
        match caps[1].parse() {
            Ok(id) => parts.push(Err(id)),
            Err(_) => parts.push(Ok(whole.as_str())),
        }
        last = whole.end();
    }
    if last < text.len() {
        parts.push(Ok(&text[last..]));
    }
    parts
}

/// Text with protected payloads replaced by placeholder tokens.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extraction {
    pub text: String,
    pub blocks: Vec<ProtectedBlock>,
}

impl Extraction {
    fn protect(&mut self, kind: ProtectedKind, payload: String) -> String {
        let block = ProtectedBlock {
            placeholder_id: self.blocks.len(),
            kind,
            payload,
        };
        let token = placeholder(&block);
        self.blocks.push(block);
        token
    }
}

fn strip_sentinels(text: &str) -> String {
    if text.contains([PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE]) {
        log::debug!("removing reserved placeholder delimiters from input");
        text.replace([PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE], "")
    } else {
        text.to_string()
    }
}

fn fence_kind(language: Option<&str>) -> ProtectedKind {
    match language {
        Some(lang) if lang.eq_ignore_ascii_case(DIAGRAM_LANGUAGE) => ProtectedKind::Diagram,
        other => ProtectedKind::FencedCode {
            language: other.map(str::to_string),
        },
    }
}

/// Pull fenced code and diagram fences out of LF-normalized Markdown.
///
/// A fence opens on a line of three or more backticks and closes on a line
/// holding only at least as many backticks. An opening fence with no close is
/// left in place as ordinary text.
///
/// Fences inside blockquotes are recognized too: every line of the fence must
/// carry the opener's `>` markers, which are stripped from the payload and kept
/// in front of the placeholder token. The opener's indentation (a fence under
/// a list item) is kept in front of the token as well, and up to that many
/// leading spaces are removed from each payload line.
pub fn extract_markdown_fences(markdown: &str) -> Extraction {
    let source = strip_sentinels(markdown);
    let lines: Vec<&str> = source.split('\n').collect();
    let mut extraction = Extraction::default();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let Some(caps) = FENCE_OPEN_RE.captures(line) else {
            out.push(line.to_string());
            i += 1;
            continue;
        };

        let depth = caps[1].matches('>').count();
        let indent = &caps[2];
        let marker_len = caps[3].len();
        let info = caps[4].trim();

        let Some((payload, close_index)) =
            fence_body(&lines, i + 1, depth, indent.len(), marker_len)
        else {
            log::warn!("unterminated code fence on line {}", i + 1);
            out.push(line.to_string());
            i += 1;
            continue;
        };

        let language = info.split_whitespace().next();
        let token = extraction.protect(fence_kind(language), payload);
        out.push(format!("{}{indent}{token}", "> ".repeat(depth)));
        i = close_index + 1;
    }

    extraction.text = out.join("\n");
    log::trace!(
        "extracted {} protected block(s) from markdown",
        extraction.blocks.len()
    );
    extraction
}

/// Collect fence content from `lines[start..]` up to the closing fence.
/// Returns the payload and the index of the closing line.
fn fence_body(
    lines: &[&str],
    start: usize,
    depth: usize,
    indent: usize,
    marker_len: usize,
) -> Option<(String, usize)> {
    let mut body = Vec::new();
    for (offset, line) in lines[start..].iter().enumerate() {
        let content = strip_quote_markers(line, depth)?;
        let trimmed = content.trim();
        if trimmed.len() >= marker_len && trimmed.bytes().all(|b| b == b'`') {
            return Some((body.join("\n"), start + offset));
        }
        body.push(strip_indent(content, indent));
    }
    None
}

/// Remove at most `width` leading spaces.
fn strip_indent(line: &str, width: usize) -> &str {
    let spaces = line.bytes().take(width).take_while(|b| *b == b' ').count();
    &line[spaces..]
}

/// Strip `depth` blockquote markers from the start of a line.
fn strip_quote_markers(line: &str, depth: usize) -> Option<&str> {
    let mut rest = line;
    for _ in 0..depth {
        rest = rest.trim_start_matches(' ').strip_prefix('>')?;
        rest = rest.strip_prefix(' ').unwrap_or(rest);
    }
    Some(rest)
}

/// Pull `<pre>` code blocks and diagram `<div>`s out of editor HTML.
///
/// Code content is unescaped to plain text; diagram source is decoded from its
/// `data-code` attribute. A block without a matching close tag is left as is.
pub fn extract_html_blocks(html: &str) -> Extraction {
    let source = strip_sentinels(html);
    let mut extraction = Extraction::default();
    let mut out = String::with_capacity(source.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(open) = find_open_tag(&source, pos, &["pre", "div"]) {
        let start = open.start;
        let open_end = open.end;
        let is_diagram = open.name == "div"
            && open
                .attribute("data-type")
                .is_some_and(|t| t.eq_ignore_ascii_case(DIAGRAM_LANGUAGE));

        if open.name == "div" && !is_diagram {
            pos = open_end;
            continue;
        }

        let Some(el) = scan::element(&source, open) else {
            log::warn!("unterminated protected block at byte {start}");
            pos = open_end;
            continue;
        };

        let (kind, payload) = if is_diagram {
            let payload = match el.open.attribute("data-code") {
                Some(encoded) => decode_diagram(&decode_html_entities(&encoded)),
                None => html_text(el.inner),
            };
            (ProtectedKind::Diagram, payload)
        } else {
            code_block_payload(el.inner)
        };

        out.push_str(&source[copied..start]);
        out.push_str(&extraction.protect(kind, payload));
        copied = el.end;
        pos = el.end;
    }

    out.push_str(&source[copied..]);
    extraction.text = out;
    log::trace!(
        "extracted {} protected block(s) from html",
        extraction.blocks.len()
    );
    extraction
}

fn code_block_payload(pre_inner: &str) -> (ProtectedKind, String) {
    let code = find_open_tag(pre_inner, 0, &["code"]).and_then(|tag| scan::element(pre_inner, tag));
    let Some(code) = code else {
        return (ProtectedKind::FencedCode { language: None }, html_text(pre_inner));
    };

    let language = code.open.attribute("class").and_then(|class| {
        class
            .split_whitespace()
            .find_map(|c| c.strip_prefix("language-"))
            .filter(|lang| !lang.is_empty() && *lang != PLAIN_LANGUAGE)
            .map(str::to_string)
    });

    (
        fence_kind(language.as_deref()),
        html_text(code.inner),
    )
}

/// Plain text of an HTML fragment: `<br>` becomes a newline, other tags go,
/// character references are decoded.
fn html_text(fragment: &str) -> String {
    let with_breaks = HTML_BR_RE.replace_all(fragment, "\n");
    let stripped = STRIP_TAGS_RE.replace_all(&with_breaks, "");
    decode_html_entities(&stripped)
        .trim_end_matches('\n')
        .to_string()
}

/// Encode diagram source for the `data-code` attribute: line-break tags become
/// [`BR_TOKEN`], then the whole payload is percent-encoded.
pub fn encode_diagram(source: &str) -> String {
    let tokenized = DIAGRAM_BR_RE.replace_all(source, BR_TOKEN);
    urlencoding::encode(&tokenized).into_owned()
}

/// Spell every diagram line-break tag as `<br/>`.
pub fn canonicalize_diagram_breaks(source: &str) -> String {
    DIAGRAM_BR_RE.replace_all(source, "<br/>").into_owned()
}

/// Inverse of [`encode_diagram`]: percent-decode first, then restore `<br/>`.
pub fn decode_diagram(encoded: &str) -> String {
    let decoded = match urlencoding::decode(encoded) {
        Ok(text) => text.into_owned(),
        Err(err) => {
            log::warn!("diagram data-code is not valid percent-encoded UTF-8: {err}");
            encoded.to_string()
        }
    };
    decoded.replace(BR_TOKEN, "<br/>")
}

/// Result of putting protected payloads back.
#[derive(Debug, Clone, PartialEq)]
pub struct Reinsertion {
    pub text: String,
    /// Ids whose token was missing or appeared more than once.
    pub unmatched: Vec<usize>,
}

impl Reinsertion {
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// Replace each block's token with its rendering, exactly once.
///
/// `render` also receives the text between the start of the token's line and
/// the token, so line-oriented output can repeat a container prefix such as
/// `> ` on the payload's continuation lines.
pub fn reinsert<F>(text: &str, blocks: &[ProtectedBlock], render: F) -> Reinsertion
where
    F: Fn(&ProtectedBlock, &str) -> String,
{
    let mut output = text.to_string();
    let mut unmatched = Vec::new();

    for block in blocks {
        let token = placeholder(block);
        let occurrences = output.matches(token.as_str()).count();
        if occurrences != 1 {
            log::error!(
                "placeholder {} found {occurrences} times during reinsertion",
                block.placeholder_id
            );
            unmatched.push(block.placeholder_id);
        }
        if let Some(pos) = output.find(token.as_str()) {
            let line_start = output[..pos].rfind('\n').map_or(0, |i| i + 1);
            let rendered = render(block, &output[line_start..pos]);
            output.replace_range(pos..pos + token.len(), &rendered);
        }
    }

    Reinsertion {
        text: output,
        unmatched,
    }
}

//! Inline span conversion between editor HTML and Markdown.
//!
//! Both directions stash the spans whose contents must not be touched by the
//! later passes (inline code, and on the Markdown side link and image tags)
//! behind private-use tokens, run the rewriting passes, then restore them.
//!
//! Emphasis is resolved greedily from the left, bold before italic. Mixed
//! runs such as `**a*b**c*` have no canonical reading and are not guaranteed
//! to round-trip.
//!
//! Text taken from HTML has its Markdown-significant characters
//! backslash-escaped, and the Markdown side reads a backslash before ASCII
//! punctuation as that literal character.

use crate::common::entities::{decode_html_entities, escape_html};
use crate::common::scan::attribute;
use crate::common::table::is_separator_row;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const STASH_OPEN: char = '\u{E002}';
const STASH_CLOSE: char = '\u{E003}';

static STASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new("\u{E002}([0-9]+)\u{E003}").unwrap());

static HTML_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<code(?:\s[^>]*)?>(.*?)</code\s*>").unwrap());
static HTML_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a(\s[^>]*)?>(.*?)</a\s*>").unwrap());
static HTML_IMG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img(\s[^>]*)?>").unwrap());
static HTML_STRONG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<strong(?:\s[^>]*)?>(.*?)</strong\s*>").unwrap());
static HTML_B_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<b(?:\s[^>]*)?>(.*?)</b\s*>").unwrap());
static HTML_EM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<em(?:\s[^>]*)?>(.*?)</em\s*>").unwrap());
static HTML_I_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<i(?:\s[^>]*)?>(.*?)</i\s*>").unwrap());
static HTML_S_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<s(?:\s[^>]*)?>(.*?)</s\s*>").unwrap());
static HTML_STRIKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<strike(?:\s[^>]*)?>(.*?)</strike\s*>").unwrap());
static HTML_DEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<del(?:\s[^>]*)?>(.*?)</del\s*>").unwrap());
static HTML_PARAGRAPH_JOIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</p\s*>\s*<p(?:\s[^>]*)?>").unwrap());
static HTML_BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static SOURCE_NEWLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\r?\n[ \t]*").unwrap());

// Destinations are matched after HTML escaping, so `<dest>` reads `&lt;dest&gt;`.
static MD_IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[([^\]]*)\]\((&lt;.*?&gt;|(?:[^()\s]|\([^()\s]*\))*)\)").unwrap()
});
static MD_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\((&lt;.*?&gt;|(?:[^()\s]|\([^()\s]*\))+)\)").unwrap()
});
static MD_BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static MD_ITALIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*]*[^*\s])?)\*").unwrap());
static MD_STRIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").unwrap());

static BLOCK_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:#{1,6}(?:[ \t]|$)|[-+*](?:[ \t]|$)|>)").unwrap());
static ORDERED_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,9})[.)](?:[ \t]|$)").unwrap());
static RULE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
});

/// Spans hidden from the rewriting passes, restored at the end.
#[derive(Default)]
struct Stash {
    entries: Vec<String>,
}

impl Stash {
    fn hide(&mut self, content: String) -> String {
        let token = format!("{STASH_OPEN}{}{STASH_CLOSE}", self.entries.len());
        self.entries.push(content);
        token
    }

    fn restore(&self, text: &str) -> String {
        STASH_RE
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.entries.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

fn strip_stash_sentinels(text: &str) -> String {
    text.replace([STASH_OPEN, STASH_CLOSE], "")
}

/// Convert inline editor HTML to Markdown inline text.
///
/// Pass order: inline code is stashed first so generic brackets such as
/// `Result<T>` survive tag stripping; links are converted before emphasis;
/// remaining tags are stripped; references are decoded and the text escaped;
/// the stashed code and delimiters are restored.
pub fn html_to_markdown_inline(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let mut stash = Stash::default();
    let text = strip_stash_sentinels(html);
    let text = SOURCE_NEWLINE_RE.replace_all(&text, " ");

    let text = HTML_CODE_RE.replace_all(&text, |caps: &Captures| {
        let raw = HTML_TAG_RE.replace_all(&caps[1], "");
        stash.hide(code_span(&decode_html_entities(&raw)))
    });

    let text = HTML_LINK_RE.replace_all(&text, |caps: &Captures| {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let label = &caps[2];
        match attribute(attrs, "href") {
            Some(href) if !href.is_empty() => {
                let open = stash.hide("[".to_string());
                let close = stash.hide(format!(
                    "]({})",
                    link_destination(&decode_html_entities(&href))
                ));
                format!("{open}{label}{close}")
            }
            _ => label.to_string(),
        }
    });

    let text = HTML_IMG_RE.replace_all(&text, |caps: &Captures| {
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let src = attribute(attrs, "src").unwrap_or_default();
        let alt = attribute(attrs, "alt").unwrap_or_default();
        stash.hide(format!(
            "![{}]({})",
            escape_markdown_text(&decode_html_entities(&alt)),
            link_destination(&decode_html_entities(&src))
        ))
    });

    let text = HTML_STRONG_RE.replace_all(&text, |c: &Captures| delimit(&mut stash, "**", &c[1]));
    let text = HTML_B_RE.replace_all(&text, |c: &Captures| delimit(&mut stash, "**", &c[1]));
    let text = HTML_EM_RE.replace_all(&text, |c: &Captures| delimit(&mut stash, "*", &c[1]));
    let text = HTML_I_RE.replace_all(&text, |c: &Captures| delimit(&mut stash, "*", &c[1]));
    let text = HTML_S_RE.replace_all(&text, |c: &Captures| delimit(&mut stash, "~~", &c[1]));
    let text = HTML_STRIKE_RE.replace_all(&text, |c: &Captures| delimit(&mut stash, "~~", &c[1]));
    let text = HTML_DEL_RE.replace_all(&text, |c: &Captures| delimit(&mut stash, "~~", &c[1]));
    let text = HTML_PARAGRAPH_JOIN_RE.replace_all(&text, " ");
    let text = HTML_BR_RE.replace_all(&text, "\n");
    let text = HTML_TAG_RE.replace_all(&text, "");
    let text = escape_markdown_text(&decode_html_entities(&text));

    stash.restore(&text).trim().to_string()
}

/// Wrap `inner` in a stashed emphasis delimiter. Surrounding whitespace stays
/// outside the delimiters; a span with no visible content gets none.
fn delimit(stash: &mut Stash, delimiter: &str, inner: &str) -> String {
    let body = inner.trim();
    if body.is_empty() {
        return inner.to_string();
    }
    let lead = &inner[..inner.len() - inner.trim_start().len()];
    let trail = &inner[inner.trim_end().len()..];
    let token = stash.hide(delimiter.to_string());
    format!("{lead}{token}{body}{token}{trail}")
}

/// Backslash-escape the characters the inline Markdown reader would take as
/// markup: backslashes, asterisks, backticks, brackets and `~~` runs.
pub fn escape_markdown_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &ch) in chars.iter().enumerate() {
        let escape = match ch {
            '\\' | '*' | '`' | '[' | ']' => true,
            '~' => (i > 0 && chars[i - 1] == '~') || chars.get(i + 1) == Some(&'~'),
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Backslash-escape a line start that the block reader would take as a
/// heading, quote, list item, rule or table separator.
pub fn escape_block_markers(line: &str) -> String {
    let body = line.trim_start();
    let lead = &line[..line.len() - body.len()];

    if let Some(caps) = ORDERED_MARKER_RE.captures(body) {
        let digits = caps[1].len();
        return format!("{lead}{}\\{}", &body[..digits], &body[digits..]);
    }
    if BLOCK_MARKER_RE.is_match(body) || RULE_LINE_RE.is_match(body) || is_separator_row(body) {
        return format!("{lead}\\{body}");
    }
    line.to_string()
}

/// Link or image destination as Markdown. Destinations with spaces or
/// parentheses are wrapped in angle brackets; angle brackets inside are
/// percent-encoded.
fn link_destination(url: &str) -> String {
    let url = url.replace('<', "%3C").replace('>', "%3E");
    if url.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
        format!("<{url}>")
    } else {
        url
    }
}

/// Strip the angle brackets of a `<dest>` destination (seen HTML-escaped).
fn unwrap_destination(raw: &str) -> &str {
    raw.strip_prefix("&lt;")
        .and_then(|inner| inner.strip_suffix("&gt;"))
        .unwrap_or(raw)
}

/// Convert Markdown inline text to editor HTML.
///
/// Code spans and backslash escapes are stashed first; everything else is
/// escaped before any markup is synthesized, so angle brackets typed by the
/// user are never read as tags. Link and image tags are stashed as soon as
/// they are built so emphasis never matches inside a URL.
pub fn markdown_to_html_inline(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let mut stash = Stash::default();
    let text = strip_stash_sentinels(markdown);
    let text = stash_code_and_escapes(&text, &mut stash);
    let text = escape_html(&text);

    let text = MD_IMAGE_RE.replace_all(&text, |caps: &Captures| {
        stash.hide(format!(
            r#"<img src="{}" alt="{}">"#,
            unwrap_destination(&caps[2]).replace('"', "&quot;"),
            caps[1].replace('"', "&quot;")
        ))
    });

    let text = MD_LINK_RE.replace_all(&text, |caps: &Captures| {
        let open = stash.hide(format!(
            r#"<a href="{}">"#,
            unwrap_destination(&caps[2]).replace('"', "&quot;")
        ));
        format!("{open}{}</a>", &caps[1])
    });

    let text = MD_BOLD_RE.replace_all(&text, "<strong>$1</strong>");
    let text = MD_ITALIC_RE.replace_all(&text, "<em>$1</em>");
    let text = MD_STRIKE_RE.replace_all(&text, "<s>$1</s>");

    stash.restore(&text)
}

/// Replace backtick code spans with stash tokens holding `<code>` markup, and
/// a backslash before ASCII punctuation with a token holding that character.
/// A backtick run with no closing run of the same length stays literal.
/// Backslashes inside a code span are literal.
fn stash_code_and_escapes(text: &str, stash: &mut Stash) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(['`', '\\']) {
        if rest[start..].starts_with('\\') {
            match rest[start + 1..].chars().next() {
                Some(ch) if ch.is_ascii_punctuation() => {
                    out.push_str(&rest[..start]);
                    out.push_str(&stash.hide(escape_html(&ch.to_string())));
                    rest = &rest[start + 2..];
                }
                _ => {
                    out.push_str(&rest[..=start]);
                    rest = &rest[start + 1..];
                }
            }
            continue;
        }

        let run = rest[start..].bytes().take_while(|b| *b == b'`').count();
        let after_open = start + run;

        match find_backtick_run(&rest[after_open..], run) {
            Some((close_start, close_end)) => {
                let raw = &rest[after_open..after_open + close_start];
                let content = strip_code_padding(raw);
                out.push_str(&rest[..start]);
                out.push_str(&stash.hide(format!("<code>{}</code>", escape_html(content))));
                rest = &rest[after_open + close_end..];
            }
            None => {
                out.push_str(&rest[..after_open]);
                rest = &rest[after_open..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Find the next run of exactly `len` backticks. Returns `(start, end)`.
fn find_backtick_run(text: &str, len: usize) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = bytes[i..].iter().take_while(|b| **b == b'`').count();
            if run == len {
                return Some((i, i + run));
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

fn strip_code_padding(raw: &str) -> &str {
    if raw.len() >= 2 && raw.starts_with(' ') && raw.ends_with(' ') && !raw.trim().is_empty() {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// Markdown code span for `code`, with a fence longer than any backtick run
/// inside it.
pub fn code_span(code: &str) -> String {
    let longest = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{fence} {code} {fence}")
    } else {
        format!("{fence}{code}{fence}")
    }
}

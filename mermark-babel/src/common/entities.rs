//! Character reference decoding and HTML escaping.
//!
//! Decoding handles a fixed table of named references plus every decimal and
//! hexadecimal numeric reference. Anything the table does not know, and any
//! numeric reference that does not name a Unicode scalar value, is left as
//! written.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]{1,8})|#[xX]([0-9A-Fa-f]{1,8})|([A-Za-z][A-Za-z0-9]{1,31}));")
        .unwrap()
});

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{00A0}"),
    ("larr", "\u{2190}"),
    ("uarr", "\u{2191}"),
    ("rarr", "\u{2192}"),
    ("darr", "\u{2193}"),
    ("harr", "\u{2194}"),
    ("lArr", "\u{21D0}"),
    ("rArr", "\u{21D2}"),
    ("hArr", "\u{21D4}"),
    ("ndash", "\u{2013}"),
    ("mdash", "\u{2014}"),
    ("bull", "\u{2022}"),
    ("middot", "\u{00B7}"),
    ("hellip", "\u{2026}"),
    ("copy", "\u{00A9}"),
    ("reg", "\u{00AE}"),
    ("trade", "\u{2122}"),
];

fn lookup_named(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, value)| *value)
}

fn decode_code_point(digits: &str, radix: u32) -> Option<char> {
    let value = u32::from_str_radix(digits, radix).ok()?;
    if value == 0 {
        return None;
    }
    char::from_u32(value)
}

/// Decode character references in a single left-to-right pass.
///
/// Replacement text is never rescanned, so `&amp;lt;` decodes to `&lt;`.
pub fn decode_html_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let decoded = if let Some(decimal) = caps.get(1) {
                decode_code_point(decimal.as_str(), 10).map(String::from)
            } else if let Some(hex) = caps.get(2) {
                decode_code_point(hex.as_str(), 16).map(String::from)
            } else {
                caps.get(3)
                    .and_then(|name| lookup_named(name.as_str()))
                    .map(str::to_string)
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Escape `&`, `<` and `>` for use in HTML text content. Quotes pass through.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a value for a double-quoted attribute.
pub fn escape_attribute(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_basic_named_references() {
        assert_eq!(
            decode_html_entities("a &lt;b&gt; &amp; &quot;c&quot; &#39;d&#39;"),
            "a <b> & \"c\" 'd'"
        );
    }

    #[test]
    fn decodes_typographic_references() {
        assert_eq!(
            decode_html_entities("&larr; &rarr; &ndash; &mdash; &bull; &hellip;"),
            "\u{2190} \u{2192} \u{2013} \u{2014} \u{2022} \u{2026}"
        );
        assert_eq!(
            decode_html_entities("&copy;&reg;&trade;"),
            "\u{00A9}\u{00AE}\u{2122}"
        );
    }

    #[test]
    fn decodes_astral_code_points() {
        assert_eq!(decode_html_entities("&#x1F600;"), "\u{1F600}");
        assert_eq!(decode_html_entities("&#128512;"), "\u{1F600}");
    }

    #[test]
    fn leaves_unknown_and_malformed_references() {
        assert_eq!(decode_html_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_html_entities("&bogus;"), "&bogus;");
        assert_eq!(decode_html_entities("&#xD800;"), "&#xD800;");
        assert_eq!(decode_html_entities("&#0;"), "&#0;");
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
    }

    #[test]
    fn decodes_in_a_single_pass() {
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn non_breaking_space_survives() {
        assert_eq!(decode_html_entities("a&nbsp;b"), "a\u{00A0}b");
        assert_eq!(decode_html_entities("&#160;"), "\u{00A0}");
    }

    #[test]
    fn escape_leaves_quotes() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), r#"&lt;a href="x"&gt;&amp;&lt;/a&gt;"#);
        assert_eq!(escape_attribute(r#"say "hi""#), "say &quot;hi&quot;");
    }
}

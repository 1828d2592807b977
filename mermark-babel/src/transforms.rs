//! Conversion helpers for the I/O boundary.
//!
//! The converter itself always produces LF text. These helpers wrap it for
//! callers that read and write files: they detect the source's line endings
//! and re-apply them (or a fixed style) to the output, and they check whether
//! a Markdown document survives a trip through HTML unchanged.

use crate::common::line_ending::{
    apply_line_ending, detect_line_ending, normalize_line_endings, LineEnding,
};
use crate::error::FormatError;
use crate::registry::FormatRegistry;
use crate::{html_to_markdown, markdown_to_html};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which line ending converted output is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LineEndingPolicy {
    /// Reuse whatever the source document used.
    #[default]
    Preserve,
    /// Always write this style.
    Fixed(LineEnding),
}

impl LineEndingPolicy {
    /// The concrete style for output converted from `source`.
    pub fn resolve(&self, source: &str) -> LineEnding {
        match self {
            LineEndingPolicy::Preserve => detect_line_ending(source),
            LineEndingPolicy::Fixed(style) => *style,
        }
    }
}

impl FromStr for LineEndingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("preserve") {
            return Ok(LineEndingPolicy::Preserve);
        }
        s.parse()
            .map(LineEndingPolicy::Fixed)
            .map_err(|_| format!("unknown line ending policy '{s}' (expected preserve, lf, crlf or cr)"))
    }
}

impl TryFrom<String> for LineEndingPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for LineEndingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineEndingPolicy::Preserve => f.write_str("preserve"),
            LineEndingPolicy::Fixed(style) => write!(f, "{style}"),
        }
    }
}

/// Convert between two registered formats, writing the result with the
/// line ending chosen by `policy`.
pub fn convert_preserving_line_endings(
    source: &str,
    from: &str,
    to: &str,
    policy: LineEndingPolicy,
) -> Result<String, FormatError> {
    convert_with_policy(
        &FormatRegistry::default(),
        source,
        from,
        to,
        &HashMap::new(),
        policy,
    )
}

/// [`convert_preserving_line_endings`] with an explicit registry and
/// serializer options.
pub fn convert_with_policy(
    registry: &FormatRegistry,
    source: &str,
    from: &str,
    to: &str,
    options: &HashMap<String, String>,
    policy: LineEndingPolicy,
) -> Result<String, FormatError> {
    let style = policy.resolve(source);
    let converted = registry.convert_with_options(source, from, to, options)?;
    log::debug!("writing output with {style} line endings");
    Ok(apply_line_ending(&converted, style))
}

/// Markdown → HTML → Markdown.
pub fn round_trip_markdown(markdown: &str) -> String {
    html_to_markdown(&markdown_to_html(markdown))
}

/// One line that differs between a document and its round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDifference {
    /// 1-based line number.
    pub line: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

/// Result of [`check_markdown_round_trip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    pub output: String,
    pub differences: Vec<LineDifference>,
}

impl RoundTripReport {
    pub fn is_stable(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Round-trip a Markdown document and compare line by line. Line endings and
/// trailing whitespace at the end of the document are ignored.
pub fn check_markdown_round_trip(markdown: &str) -> RoundTripReport {
    let expected = normalize_line_endings(markdown);
    let expected = expected.trim_end();
    let output = round_trip_markdown(expected);

    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = output.lines().collect();
    let differences = (0..expected_lines.len().max(actual_lines.len()))
        .filter_map(|i| {
            let want = expected_lines.get(i).copied();
            let got = actual_lines.get(i).copied();
            (want != got).then(|| LineDifference {
                line: i + 1,
                expected: want.map(str::to_string),
                actual: got.map(str::to_string),
            })
        })
        .collect();

    RoundTripReport {
        output,
        differences,
    }
}

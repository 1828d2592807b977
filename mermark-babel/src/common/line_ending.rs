//! Line-ending detection and re-application.
//!
//! The converter always produces LF text. Callers writing a document back to
//! disk detect the original convention first and re-apply it afterwards so a
//! round trip never rewrites a file's line endings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A line terminator convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
    Cr,
}

impl LineEnding {
    /// The terminator itself.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Short lowercase name used in configuration and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            LineEnding::Lf => "lf",
            LineEnding::Crlf => "crlf",
            LineEnding::Cr => "cr",
        }
    }

    /// Parse either a name (`crlf`) or a literal terminator (`"\r\n"`).
    pub fn from_terminator(value: &str) -> Option<Self> {
        match value {
            "\n" => Some(LineEnding::Lf),
            "\r\n" => Some(LineEnding::Crlf),
            "\r" => Some(LineEnding::Cr),
            other => other.parse().ok(),
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" | "unix" => Ok(LineEnding::Lf),
            "crlf" | "windows" | "dos" => Ok(LineEnding::Crlf),
            "cr" | "mac" => Ok(LineEnding::Cr),
            other => Err(format!("unknown line ending '{other}'")),
        }
    }
}

/// Occurrence counts of each terminator in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineEndingCounts {
    pub crlf: usize,
    pub lf: usize,
    pub cr: usize,
}

impl LineEndingCounts {
    pub fn of(text: &str) -> Self {
        let mut counts = Self::default();
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    counts.crlf += 1;
                    i += 1;
                }
                b'\r' => counts.cr += 1,
                b'\n' => counts.lf += 1,
                _ => {}
            }
            i += 1;
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.crlf + self.lf + self.cr
    }
}

/// Majority vote over observed terminators. CRLF wins ties, then LF; a buffer
/// without terminators is LF.
pub fn detect_line_ending(text: &str) -> LineEnding {
    let counts = LineEndingCounts::of(text);
    if counts.total() == 0 {
        return LineEnding::Lf;
    }
    if counts.crlf >= counts.lf && counts.crlf >= counts.cr {
        LineEnding::Crlf
    } else if counts.lf >= counts.cr {
        LineEnding::Lf
    } else {
        LineEnding::Cr
    }
}

/// Rewrite every terminator (CRLF, lone CR, LF) as LF.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Normalize to LF, then substitute the requested terminator.
pub fn apply_line_ending(text: &str, style: LineEnding) -> String {
    let normalized = normalize_line_endings(text);
    match style {
        LineEnding::Lf => normalized,
        other => normalized.replace('\n', other.as_str()),
    }
}

//! Dotted hierarchical classification codes

use crate::error::CodeError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A dotted classification code such as `"5.4.4"`
///
/// Ordering, equality and hashing look only at the integer segments, so
/// `"2.10"` sorts after `"2.9"` and before `"12.1"`, and a code sorts before
/// everything below it (`"9.5"` < `"9.5.1"`). The text as received is kept
/// for display and dictionary lookups.
#[derive(Debug, Clone)]
pub struct Code {
    segments: Vec<u32>,
    text: String,
}

impl Code {
    /// Parse a dotted code. Every segment must be a non-negative integer.
    pub fn parse(text: &str) -> Result<Self, CodeError> {
        let trimmed = text.trim();
        let segments = trimmed
            .split('.')
            .map(parse_segment)
            .collect::<Option<Vec<u32>>>()
            .ok_or_else(|| CodeError::InvalidCode(text.to_string()))?;

        Ok(Self {
            segments,
            text: trimmed.to_string(),
        })
    }

    /// Build a code from already-split segments
    pub fn from_segments(segments: Vec<u32>) -> Result<Self, CodeError> {
        if segments.is_empty() {
            return Err(CodeError::InvalidCode(String::new()));
        }
        let text = join_segments(&segments);
        Ok(Self { segments, text })
    }

    /// `prefix` extended by one segment; never empty
    pub(crate) fn branch(prefix: &[u32], segment: u32) -> Self {
        let mut segments = Vec::with_capacity(prefix.len() + 1);
        segments.extend_from_slice(prefix);
        segments.push(segment);
        let text = join_segments(&segments);
        Self { segments, text }
    }

    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Zero-based depth: `"1"` is rank 0, `"5.4.4"` is rank 2
    pub fn rank(&self) -> usize {
        self.segments.len() - 1
    }

    pub fn starts_with(&self, prefix: &[u32]) -> bool {
        self.segments.starts_with(prefix)
    }

    /// The segment directly below `prefix`, if this code extends it
    pub fn branch_below(&self, prefix: &[u32]) -> Option<u32> {
        if self.starts_with(prefix) {
            self.segments.get(prefix.len()).copied()
        } else {
            None
        }
    }
}

fn parse_segment(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Render segments in dotted form; empty for the root
pub(crate) fn join_segments(segments: &[u32]) -> String {
    segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

impl PartialEq for Code {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for Code {}

impl Hash for Code {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl PartialOrd for Code {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Code {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.cmp(&other.segments)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Code {
    type Error = CodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

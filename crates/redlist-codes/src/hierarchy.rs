//! Ordered, prefix-addressable collections of classification entries

use crate::code::{join_segments, Code};
use crate::entry::{CodeEntry, Domain};
use crate::error::{CodeError, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Entries of one classification scheme, scoped to a codepoint
///
/// Entries are always held in ascending numeric code order regardless of the
/// order they were supplied in. Narrowing with [`CodeHierarchy::by_subcode`]
/// produces a new view that shares the same entries.
#[derive(Debug, Clone, Default)]
pub struct CodeHierarchy {
    entries: Vec<Arc<CodeEntry>>,
    codepoint: Vec<u32>,
}

impl CodeHierarchy {
    /// Root hierarchy over `entries`
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CodeEntry>,
    {
        Self::from_shared(entries.into_iter().map(Arc::new), Vec::new())
    }

    /// Hierarchy scoped to `codepoint` over already-shared entries
    pub fn from_shared<I>(entries: I, codepoint: Vec<u32>) -> Self
    where
        I: IntoIterator<Item = Arc<CodeEntry>>,
    {
        let mut entries: Vec<Arc<CodeEntry>> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.code().cmp(b.code()));
        Self { entries, codepoint }
    }

    /// Root hierarchy built from raw API rows
    pub fn from_records(domain: Domain, records: &[Value]) -> Result<Self> {
        let entries = records
            .iter()
            .map(|r| CodeEntry::from_value(domain, r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(entries))
    }

    /// Dotted prefix this view is scoped to; empty at the root
    pub fn codepoint(&self) -> String {
        join_segments(&self.codepoint)
    }

    pub fn codepoint_segments(&self) -> &[u32] {
        &self.codepoint
    }

    /// View one level deeper: every entry under `codepoint.subcode`
    ///
    /// Navigating into a branch with no entries is an error so callers can
    /// use this to assert a code path exists.
    pub fn by_subcode(&self, subcode: u32) -> Result<Self> {
        let mut prefix = self.codepoint.clone();
        prefix.push(subcode);

        let entries: Vec<Arc<CodeEntry>> = self
            .entries
            .iter()
            .filter(|e| e.code().starts_with(&prefix))
            .cloned()
            .collect();

        if entries.is_empty() {
            return Err(CodeError::NoMatch(join_segments(&prefix)));
        }

        Ok(Self {
            entries,
            codepoint: prefix,
        })
    }

    /// Repeated [`CodeHierarchy::by_subcode`] along a dotted path relative to this view
    pub fn at_path(&self, path: &str) -> Result<Self> {
        let path = Code::parse(path)?;
        let (first, rest) = path
            .segments()
            .split_first()
            .ok_or_else(|| CodeError::InvalidCode(path.to_string()))?;

        rest.iter()
            .try_fold(self.by_subcode(*first)?, |view, &subcode| {
                view.by_subcode(subcode)
            })
    }

    /// Distinct segments directly below the codepoint, ascending
    pub fn top_level_branches(&self) -> BTreeSet<u32> {
        self.entries
            .iter()
            .filter_map(|e| e.code().branch_below(&self.codepoint))
            .collect()
    }

    /// Entries in order, with a placeholder header before each branch that
    /// has no entry of its own
    pub fn iter_with_synthetic_parents(&self) -> WithSyntheticParents<'_> {
        WithSyntheticParents {
            entries: self.entries.iter(),
            codepoint: &self.codepoint,
            current_branch: None,
            pending: None,
        }
    }

    /// Positional slice of the ordered entries
    ///
    /// Both ends are clamped to the length, so a range running past the end
    /// yields whatever entries exist in it and an inverted range is empty.
    pub fn slice(&self, range: Range<usize>) -> &[Arc<CodeEntry>] {
        let end = range.end.min(self.entries.len());
        let start = range.start.min(end);
        &self.entries[start..end]
    }

    pub fn entries(&self) -> &[Arc<CodeEntry>] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<CodeEntry>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CodeEntry> for CodeHierarchy {
    fn from_iter<I: IntoIterator<Item = CodeEntry>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a CodeHierarchy {
    type Item = &'a Arc<CodeEntry>;
    type IntoIter = std::slice::Iter<'a, Arc<CodeEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for CodeHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str("]")
    }
}

/// Iterator returned by [`CodeHierarchy::iter_with_synthetic_parents`]
pub struct WithSyntheticParents<'a> {
    entries: std::slice::Iter<'a, Arc<CodeEntry>>,
    codepoint: &'a [u32],
    current_branch: Option<u32>,
    pending: Option<Arc<CodeEntry>>,
}

impl Iterator for WithSyntheticParents<'_> {
    type Item = Arc<CodeEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.pending.take() {
            return Some(entry);
        }

        let entry = self.entries.next()?;
        let Some(branch) = entry.code().branch_below(self.codepoint) else {
            return Some(Arc::clone(entry));
        };
        if self.current_branch == Some(branch) {
            return Some(Arc::clone(entry));
        }
        self.current_branch = Some(branch);

        // Sorted order puts a branch's own entry ahead of its descendants
        if entry.code().segments().len() == self.codepoint.len() + 1 {
            return Some(Arc::clone(entry));
        }

        self.pending = Some(Arc::clone(entry));
        Some(Arc::new(CodeEntry::placeholder(
            entry.domain(),
            Code::branch(self.codepoint, branch),
        )))
    }
}

//! Ordinal and word ranges
//!
//! Two small range types used by the DSL:
//!
//! - [`NumberRange`]: which of the name-matching children a `Down` step visits
//! - [`WordRange`]: which whitespace-separated words a value step keeps
//!
//! Both are one-based and inclusive, matching how matcher authors write them.

use std::fmt;

/// One-based inclusive range over the name-filtered children of a node.
///
/// `(2-3)product` visits the second and third `product` child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NumberRange {
    /// First ordinal to visit (one-based).
    pub start: usize,
    /// Last ordinal to visit (inclusive).
    pub end: usize,
}

impl NumberRange {
    /// Every matching child.
    pub const ALL: Self = Self {
        start: 1,
        end: usize::MAX,
    };

    /// Create a range. `start` is clamped to at least 1.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.max(1),
            end,
        }
    }

    /// A range that visits exactly the `n`th matching child.
    #[must_use]
    pub fn single(n: usize) -> Self {
        Self::new(n, n)
    }

    /// Whether `ordinal` (one-based) falls inside this range.
    #[must_use]
    pub fn contains(&self, ordinal: usize) -> bool {
        self.start <= ordinal && ordinal <= self.end
    }

    /// Whether this is the unbounded default range.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.start == 1 && self.end == usize::MAX
    }
}

impl Default for NumberRange {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            f.write_str("*")
        } else if self.end == usize::MAX {
            write!(f, "{}-", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

/// One-based inclusive range of words. `last == None` runs to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WordRange {
    /// First word to keep (one-based).
    pub first: usize,
    /// Last word to keep (inclusive), or `None` for "up to the last word".
    #[cfg_attr(feature = "serde", serde(default))]
    pub last: Option<usize>,
}

impl WordRange {
    /// Words `first..=last`.
    #[must_use]
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first: first.max(1),
            last: Some(last),
        }
    }

    /// Exactly the `n`th word.
    #[must_use]
    pub fn single(n: usize) -> Self {
        Self::new(n, n)
    }

    /// Word `first` and everything after it.
    #[must_use]
    pub fn from(first: usize) -> Self {
        Self {
            first: first.max(1),
            last: None,
        }
    }

    /// Select the words of `value` covered by this range.
    ///
    /// Returns `None` when `value` has fewer than `first` words. A `last` past
    /// the end is truncated silently. The returned slice keeps the original
    /// spacing between the selected words.
    #[must_use]
    pub fn select<'a>(&self, value: &'a str) -> Option<&'a str> {
        select_words(value, self.first, self.last.unwrap_or(usize::MAX))
    }
}

impl fmt::Display for WordRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last {
            Some(last) if last == self.first => write!(f, "[{}]", self.first),
            Some(last) => write!(f, "[{}-{}]", self.first, last),
            None => write!(f, "[{}-]", self.first),
        }
    }
}

/// Byte spans `(start, end)` of each whitespace-separated word.
fn word_spans(value: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut start: Option<usize> = None;
    let mut chars = value.char_indices().chain(std::iter::once((value.len(), ' ')));
    std::iter::from_fn(move || {
        for (i, c) in chars.by_ref() {
            match (c.is_whitespace(), start) {
                (false, None) => start = Some(i),
                (true, Some(s)) => {
                    start = None;
                    return Some((s, i));
                }
                _ => {}
            }
        }
        None
    })
}

/// Slice words `first..=last` (one-based) out of `value`.
///
/// Word boundaries are runs of whitespace. `None` if there are fewer than
/// `first` words, or if `first > last`.
#[must_use]
pub fn select_words(value: &str, first: usize, last: usize) -> Option<&str> {
    let first = first.max(1);
    if first > last {
        return None;
    }

    let mut begin = None;
    let mut end = 0;
    for (ordinal, (s, e)) in word_spans(value).enumerate().map(|(i, span)| (i + 1, span)) {
        if ordinal == first {
            begin = Some(s);
        }
        if ordinal >= first {
            end = e;
        }
        if ordinal == last {
            break;
        }
    }

    begin.map(|b| &value[b..end])
}

//! Step: one instruction of a walk list
//!
//! Steps fall into four families:
//!
//! | Family | Variants | Effect on `(node, value)` |
//! |--------|----------|---------------------------|
//! | walk | `Down`, `Up`, `Next`, `Prev` | moves to another node, drops the value |
//! | compare | `Equals`, `NotEquals`, `StartsWith`, `EndsWith`, `Contains`, `IsInSet`, `IsNotInSet`, `IsInLookupPrefix`, `IsNull` | filters |
//! | value | `FixedString`, `WordRange`, `Concat*`, `CleanVersion`, `NormalizeBrand`, `BackToFull` | rewrites the value |
//! | lookup | `Lookup`, `LookupPrefix` | rewrites the value through a table |
//!
//! The evaluation of each variant lives in [`WalkList`](crate::WalkList);
//! this module only holds the data and its textual form.

use crate::lookups::{LookupMap, SetRef};
use crate::{NumberRange, PrefixMap, WordRange};
use std::fmt;
use std::sync::Arc;

/// Child name that matches every child in a `Down` step.
pub const ANY_CHILD: &str = "*";

/// Which family a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepFamily {
    /// Tree navigation.
    Walk,
    /// Filters that forward `(node, value)` unchanged or miss.
    Compare,
    /// Value rewrites.
    Value,
    /// Value rewrites through a lookup table.
    Lookup,
}

/// What a step does, with the data it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum StepKind {
    /// Visit the name-matching children whose one-based ordinal is in `range`.
    Down {
        /// Ordinals to visit.
        range: NumberRange,
        /// Child rule name, or [`ANY_CHILD`].
        name: String,
    },
    /// Move to the parent.
    Up,
    /// Move to the next non-separator sibling.
    Next,
    /// Move to the previous non-separator sibling.
    Prev,
    /// Effective string equals the literal.
    Equals(String),
    /// Effective string differs from the literal.
    NotEquals(String),
    /// Effective string starts with the literal.
    StartsWith(String),
    /// Effective string ends with the literal.
    EndsWith(String),
    /// Effective string contains the literal.
    Contains(String),
    /// Lower-cased effective string is a member of the set.
    IsInSet {
        /// Set name as written in the matcher.
        name: String,
        /// The resolved set.
        set: SetRef,
    },
    /// Lower-cased effective string is not a member of the set.
    IsNotInSet {
        /// Set name as written in the matcher.
        name: String,
        /// The resolved set.
        set: SetRef,
    },
    /// Some key of the lookup map is a prefix of the lower-cased effective string.
    IsInLookupPrefix {
        /// Lookup name as written in the matcher.
        name: String,
        /// Keys of the lookup map, as a prefix tree.
        prefixes: Arc<PrefixMap<String>>,
    },
    /// Hits with the input iff the rest of the walk misses.
    IsNull,
    /// Replace the value with a literal.
    FixedString(String),
    /// Keep a range of words.
    WordRange(WordRange),
    /// `prefix + value + postfix`.
    Concat {
        /// Prepended text.
        prefix: String,
        /// Appended text.
        postfix: String,
    },
    /// `prefix + value`.
    ConcatPrefix(String),
    /// `value + postfix`.
    ConcatPostfix(String),
    /// Canonicalise a version string.
    CleanVersion,
    /// Title-case a brand name.
    NormalizeBrand,
    /// Drop the carried value; later steps fall back to the node text.
    BackToFull,
    /// Replace the value through a lookup map.
    Lookup {
        /// Lookup name as written in the matcher.
        name: String,
        /// The resolved map.
        map: Arc<LookupMap>,
        /// Value forwarded when the key is absent.
        default: Option<String>,
    },
    /// Replace the value through the longest matching key prefix.
    LookupPrefix {
        /// Lookup name as written in the matcher.
        name: String,
        /// Lookup map loaded as a prefix tree.
        prefixes: Arc<PrefixMap<String>>,
        /// Value forwarded when no prefix matches.
        default: Option<String>,
    },
}

impl StepKind {
    /// The family this variant belongs to.
    #[must_use]
    pub fn family(&self) -> StepFamily {
        match self {
            Self::Down { .. } | Self::Up | Self::Next | Self::Prev => StepFamily::Walk,
            Self::Equals(_)
            | Self::NotEquals(_)
            | Self::StartsWith(_)
            | Self::EndsWith(_)
            | Self::Contains(_)
            | Self::IsInSet { .. }
            | Self::IsNotInSet { .. }
            | Self::IsInLookupPrefix { .. }
            | Self::IsNull => StepFamily::Compare,
            Self::FixedString(_)
            | Self::WordRange(_)
            | Self::Concat { .. }
            | Self::ConcatPrefix(_)
            | Self::ConcatPostfix(_)
            | Self::CleanVersion
            | Self::NormalizeBrand
            | Self::BackToFull => StepFamily::Value,
            Self::Lookup { .. } | Self::LookupPrefix { .. } => StepFamily::Lookup,
        }
    }

    /// `Down` over the children called `name` whose ordinal is in `range`.
    #[must_use]
    pub fn down(range: NumberRange, name: impl Into<String>) -> Self {
        Self::Down {
            range,
            name: name.into(),
        }
    }

    /// `Lookup` over an ad-hoc map (keys must be lower-cased).
    #[must_use]
    pub fn lookup(name: impl Into<String>, map: Arc<LookupMap>, default: Option<String>) -> Self {
        Self::Lookup {
            name: name.into(),
            map,
            default,
        }
    }
}

/// A compiled step: its kind plus its place in the walk list.
///
/// Position, forward link and verbosity are assigned exactly once while the
/// walk list is being built and are read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    position: usize,
    next: Option<usize>,
    verbose: bool,
    kind: StepKind,
}

impl Step {
    pub(crate) fn new(kind: StepKind) -> Self {
        Self {
            position: 0,
            next: None,
            verbose: false,
            kind,
        }
    }

    pub(crate) fn link(&mut self, position: usize, next: Option<usize>) {
        self.position = position;
        self.next = next;
    }

    pub(crate) fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Zero-based offset of this step in its walk list.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Position of the step this one forwards to, `None` for the last step.
    #[must_use]
    pub fn next_position(&self) -> Option<usize> {
        self.next
    }

    /// Whether step entry and exit are logged.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// What this step does.
    #[must_use]
    pub fn kind(&self) -> &StepKind {
        &self.kind
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down { range, name } => write!(f, "Down([{range}]{name})"),
            Self::Up => f.write_str("Up()"),
            Self::Next => f.write_str("Next()"),
            Self::Prev => f.write_str("Prev()"),
            Self::Equals(v) => write!(f, "Equals({v})"),
            Self::NotEquals(v) => write!(f, "NotEquals({v})"),
            Self::StartsWith(v) => write!(f, "StartsWith({v})"),
            Self::EndsWith(v) => write!(f, "EndsWith({v})"),
            Self::Contains(v) => write!(f, "Contains({v})"),
            Self::IsInSet { name, .. } => write!(f, "IsInSet(@{name})"),
            Self::IsNotInSet { name, .. } => write!(f, "IsNotInSet(@{name})"),
            Self::IsInLookupPrefix { name, .. } => write!(f, "IsInLookupPrefix(@{name})"),
            Self::IsNull => f.write_str("IsNull()"),
            Self::FixedString(v) => write!(f, "FixedString({v})"),
            Self::WordRange(range) => write!(f, "WordRange({range})"),
            Self::Concat { prefix, postfix } => write!(f, "Concat({prefix};{postfix})"),
            Self::ConcatPrefix(prefix) => write!(f, "ConcatPrefix({prefix})"),
            Self::ConcatPostfix(postfix) => write!(f, "ConcatPostfix({postfix})"),
            Self::CleanVersion => f.write_str("CleanVersion()"),
            Self::NormalizeBrand => f.write_str("NormalizeBrand()"),
            Self::BackToFull => f.write_str("BackToFull()"),
            Self::Lookup { name, default, .. } => {
                write_lookup(f, "Lookup", name, default.as_deref())
            }
            Self::LookupPrefix { name, default, .. } => {
                write_lookup(f, "LookupPrefix", name, default.as_deref())
            }
        }
    }
}

fn write_lookup(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    name: &str,
    default: Option<&str>,
) -> fmt::Result {
    match default {
        Some(d) => write!(f, "{label}(@{name} ; default={d})"),
        None => write!(f, "{label}(@{name})"),
    }
}

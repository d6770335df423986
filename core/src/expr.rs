//! Matcher expressions: the parsed form of the path DSL
//!
//! These types are what the external parser hands to the compiler. They mirror
//! the DSL one-to-one; [`Display`](std::fmt::Display) renders them back to DSL
//! text, e.g. `LookUp[brand;agent.(1)product.name]`.
//!
//! With the `serde` feature enabled they (de)serialize as externally tagged
//! enums, so matchers can be written directly in YAML or JSON:
//!
//! ```yaml
//! lookup:
//!   name: brand
//!   matcher:
//!     path:
//!       walk:
//!         - down: { name: product, range: { start: 1, end: 1 } }
//!         - down: { name: name }
//! ```

use crate::{NumberRange, WordRange};
use std::fmt;

/// A complete matcher expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MatcherExpr {
    /// A plain path: `agent.product.name`.
    Path(BasePath),
    /// Negation of a path: hits when the inner matcher finds nothing.
    IsNull(Box<MatcherExpr>),
    /// Replace the value through a lookup map.
    Lookup {
        /// Lookup map name.
        name: String,
        /// Matcher producing the key.
        matcher: Box<MatcherExpr>,
        /// Value used when the key is absent.
        #[cfg_attr(feature = "serde", serde(default))]
        default: Option<String>,
    },
    /// Replace the value through the longest matching key prefix.
    LookupPrefix {
        /// Lookup map name.
        name: String,
        /// Matcher producing the probed value.
        matcher: Box<MatcherExpr>,
        /// Value used when no key prefix matches.
        #[cfg_attr(feature = "serde", serde(default))]
        default: Option<String>,
    },
    /// Keep the value only if some key of the lookup map is a prefix of it.
    IsInLookupPrefix {
        /// Lookup map name.
        name: String,
        /// Matcher producing the probed value.
        matcher: Box<MatcherExpr>,
    },
    /// Canonicalise a version string.
    CleanVersion(Box<MatcherExpr>),
    /// Title-case a brand name.
    NormalizeBrand(Box<MatcherExpr>),
    /// Surround the value with a prefix and a postfix.
    Concat {
        /// Prepended text.
        prefix: String,
        /// Matcher producing the value.
        matcher: Box<MatcherExpr>,
        /// Appended text.
        postfix: String,
    },
    /// Prepend text to the value.
    ConcatPrefix {
        /// Prepended text.
        prefix: String,
        /// Matcher producing the value.
        matcher: Box<MatcherExpr>,
    },
    /// Append text to the value.
    ConcatPostfix {
        /// Matcher producing the value.
        matcher: Box<MatcherExpr>,
        /// Appended text.
        postfix: String,
    },
    /// Keep a range of words of the value.
    WordRange {
        /// Matcher producing the value.
        matcher: Box<MatcherExpr>,
        /// Words to keep.
        range: WordRange,
    },
}

/// Where a path starts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BasePath {
    /// A literal value: `"Linux"`.
    Fixed(String),
    /// A previously extracted variable: `@Variable.name`.
    Variable {
        /// Variable name.
        name: String,
        /// Steps applied from the variable's node.
        #[cfg_attr(feature = "serde", serde(default))]
        steps: Vec<PathStep>,
    },
    /// A walk from the tree root: `agent.product.name`.
    Walk(Vec<PathStep>),
}

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PathStep {
    /// `.(1-2)name`: descend into the named children in range.
    Down {
        /// Ordinals to visit among the name-matching children.
        #[cfg_attr(feature = "serde", serde(default))]
        range: NumberRange,
        /// Child rule name, or `*` for any.
        name: String,
    },
    /// `^`: go to the parent.
    Up,
    /// `>`: go to the next non-separator sibling.
    Next,
    /// `<`: go to the previous non-separator sibling.
    Prev,
    /// `="value"`
    Equals(String),
    /// `!="value"`
    NotEquals(String),
    /// `{"value"`
    StartsWith(String),
    /// `}"value"`
    EndsWith(String),
    /// `~"value"`
    Contains(String),
    /// `?set`
    IsInSet(String),
    /// `!?set`
    IsNotInSet(String),
    /// `[1-2]`: keep a range of words.
    WordRange(WordRange),
    /// `@`: drop the carried value and fall back to the node text.
    BackToFull,
}

impl MatcherExpr {
    /// A walk from the root through `steps`.
    #[must_use]
    pub fn walk(steps: impl IntoIterator<Item = PathStep>) -> Self {
        Self::Path(BasePath::Walk(steps.into_iter().collect()))
    }

    /// A fixed string value.
    #[must_use]
    pub fn fixed(value: impl Into<String>) -> Self {
        Self::Path(BasePath::Fixed(value.into()))
    }

    /// `IsNull[self]`.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::IsNull(Box::new(self))
    }
}

impl PathStep {
    /// `.name` over every matching child.
    #[must_use]
    pub fn down(name: impl Into<String>) -> Self {
        Self::Down {
            range: NumberRange::ALL,
            name: name.into(),
        }
    }

    /// `.(n)name`: only the `n`th matching child.
    #[must_use]
    pub fn down_nth(n: usize, name: impl Into<String>) -> Self {
        Self::Down {
            range: NumberRange::single(n),
            name: name.into(),
        }
    }
}

impl fmt::Display for MatcherExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(base) => write!(f, "{base}"),
            Self::IsNull(m) => write!(f, "IsNull[{m}]"),
            Self::Lookup {
                name,
                matcher,
                default,
            } => write_lookup(f, "LookUp", name, matcher, default.as_deref()),
            Self::LookupPrefix {
                name,
                matcher,
                default,
            } => write_lookup(f, "LookUpPrefix", name, matcher, default.as_deref()),
            Self::IsInLookupPrefix { name, matcher } => {
                write!(f, "IsInLookUpPrefix[{name};{matcher}]")
            }
            Self::CleanVersion(m) => write!(f, "CleanVersion[{m}]"),
            Self::NormalizeBrand(m) => write!(f, "NormalizeBrand[{m}]"),
            Self::Concat {
                prefix,
                matcher,
                postfix,
            } => write!(f, "Concat[\"{prefix}\";{matcher};\"{postfix}\"]"),
            Self::ConcatPrefix { prefix, matcher } => write!(f, "Concat[\"{prefix}\";{matcher}]"),
            Self::ConcatPostfix { matcher, postfix } => {
                write!(f, "Concat[{matcher};\"{postfix}\"]")
            }
            Self::WordRange { matcher, range } => write!(f, "{matcher}{range}"),
        }
    }
}

fn write_lookup(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    name: &str,
    matcher: &MatcherExpr,
    default: Option<&str>,
) -> fmt::Result {
    match default {
        Some(d) => write!(f, "{keyword}[{name};{matcher};\"{d}\"]"),
        None => write!(f, "{keyword}[{name};{matcher}]"),
    }
}

impl fmt::Display for BasePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps = match self {
            Self::Fixed(value) => return write!(f, "\"{value}\""),
            Self::Variable { name, steps } => {
                write!(f, "@{name}")?;
                steps
            }
            Self::Walk(steps) => {
                f.write_str("agent")?;
                steps
            }
        };
        steps.iter().try_for_each(|step| write!(f, "{step}"))
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down { range, name } if range.is_all() => write!(f, ".{name}"),
            Self::Down { range, name } if range.start == range.end => {
                write!(f, ".({}){name}", range.start)
            }
            Self::Down { range, name } if range.end == usize::MAX => {
                write!(f, ".({}-){name}", range.start)
            }
            Self::Down { range, name } => write!(f, ".({}-{}){name}", range.start, range.end),
            Self::Up => f.write_str("^"),
            Self::Next => f.write_str(">"),
            Self::Prev => f.write_str("<"),
            Self::Equals(v) => write!(f, "=\"{v}\""),
            Self::NotEquals(v) => write!(f, "!=\"{v}\""),
            Self::StartsWith(v) => write!(f, "{{\"{v}\""),
            Self::EndsWith(v) => write!(f, "}}\"{v}\""),
            Self::Contains(v) => write!(f, "~\"{v}\""),
            Self::IsInSet(set) => write!(f, "?{set}"),
            Self::IsNotInSet(set) => write!(f, "!?{set}"),
            Self::WordRange(range) => write!(f, "{range}"),
            Self::BackToFull => f.write_str("@"),
        }
    }
}

//! Named lookup tables shared by every compiled walk list.
//!
//! The host owns the tables; walk lists hold `Arc` handles for as long as they
//! live. Keys are stored lower-cased so that probes can fold case once on the
//! probing side.
//!
//! # Example
//!
//! ```
//! use uawalk::Lookups;
//!
//! let lookups = Lookups::builder()
//!     .lookup("brand", [("FF", "Firefox"), ("MSIE", "Internet Explorer")])
//!     .set("mobile_brands", ["Apple", "Samsung"])
//!     .build();
//!
//! assert_eq!(lookups.map("brand").and_then(|m| m.get("ff")).map(String::as_str), Some("Firefox"));
//! assert!(lookups.set("mobile_brands").is_some_and(|s| s.contains("samsung")));
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A lookup table: lower-cased key → replacement value.
pub type LookupMap = HashMap<String, String>;

/// A lookup set of lower-cased members.
pub type LookupSet = HashSet<String>;

/// The named lookup maps and lookup sets available to the compiler.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    maps: HashMap<String, Arc<LookupMap>>,
    sets: HashMap<String, Arc<LookupSet>>,
}

impl Lookups {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a collection with case-folded keys.
    #[must_use]
    pub fn builder() -> LookupsBuilder {
        LookupsBuilder::default()
    }

    /// Wrap already-built tables. Keys and members must already be lower-cased.
    #[must_use]
    pub fn from_parts(
        maps: HashMap<String, Arc<LookupMap>>,
        sets: HashMap<String, Arc<LookupSet>>,
    ) -> Self {
        Self { maps, sets }
    }

    /// The lookup map called `name`.
    #[must_use]
    pub fn map(&self, name: &str) -> Option<&Arc<LookupMap>> {
        self.maps.get(name)
    }

    /// The lookup set called `name`.
    #[must_use]
    pub fn set(&self, name: &str) -> Option<&Arc<LookupSet>> {
        self.sets.get(name)
    }

    /// Names of all lookup maps, sorted.
    #[must_use]
    pub fn map_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.maps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names of all lookup sets, sorted.
    #[must_use]
    pub fn set_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Builder for [`Lookups`] that lower-cases keys and set members on insert.
#[derive(Debug, Default)]
#[must_use]
pub struct LookupsBuilder {
    maps: HashMap<String, LookupMap>,
    sets: HashMap<String, LookupSet>,
}

impl LookupsBuilder {
    /// Add (or extend) the lookup map `name`.
    pub fn lookup<K, V, I>(mut self, name: impl Into<String>, entries: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = self.maps.entry(name.into()).or_default();
        for (key, value) in entries {
            map.insert(key.as_ref().to_lowercase(), value.into());
        }
        self
    }

    /// Add (or extend) the lookup set `name`.
    pub fn set<M, I>(mut self, name: impl Into<String>, members: I) -> Self
    where
        M: AsRef<str>,
        I: IntoIterator<Item = M>,
    {
        let set = self.sets.entry(name.into()).or_default();
        set.extend(members.into_iter().map(|m| m.as_ref().to_lowercase()));
        self
    }

    /// Freeze the tables.
    #[must_use]
    pub fn build(self) -> Lookups {
        Lookups {
            maps: self
                .maps
                .into_iter()
                .map(|(name, map)| (name, Arc::new(map)))
                .collect(),
            sets: self
                .sets
                .into_iter()
                .map(|(name, set)| (name, Arc::new(set)))
                .collect(),
        }
    }
}

/// The set an `IsInSet` / `IsNotInSet` step probes.
///
/// When no lookup set of the requested name exists, the keys of the lookup map
/// with that name are used instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SetRef {
    /// A real lookup set.
    Set(Arc<LookupSet>),
    /// The key set of a lookup map.
    MapKeys(Arc<LookupMap>),
}

impl SetRef {
    /// Resolve `name` against `lookups`, sets first.
    #[must_use]
    pub fn resolve(lookups: &Lookups, name: &str) -> Option<Self> {
        lookups
            .set(name)
            .map(|set| Self::Set(Arc::clone(set)))
            .or_else(|| lookups.map(name).map(|map| Self::MapKeys(Arc::clone(map))))
    }

    /// Membership of an already lower-cased key.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Self::Set(set) => set.contains(key),
            Self::MapKeys(map) => map.contains_key(key),
        }
    }
}

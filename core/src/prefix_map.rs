//! Radix tree for longest-prefix lookups.
//!
//! Backs the `LookupPrefix` and `IsInLookupPrefix` steps: the keys of a lookup
//! map are loaded once at compile time, then each walk probes in O(k) where k
//! is the length of the probed value.

use std::collections::HashMap;

/// A radix tree (compressed trie) mapping key prefixes to values.
///
/// Children are keyed by the first `char` of their edge, so edges always split
/// on code point boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixMap<V> {
    root: Node<V>,
    len: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct Node<V> {
    /// Edge label leading to this node.
    prefix: String,
    value: Option<V>,
    /// Children indexed by the first char of their edge label.
    children: HashMap<char, Node<V>>,
}

impl<V> Default for PrefixMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PrefixMap<V> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::new(String::new()),
            len: 0,
        }
    }

    /// Number of keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no key has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a key. Returns the previous value if the key was already present.
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let old = self.root.insert(key, value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Value stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.root.get(key)
    }

    /// Value of the longest stored key that is a prefix of `input`.
    ///
    /// ```
    /// use uawalk::PrefixMap;
    ///
    /// let mut map = PrefixMap::new();
    /// map.insert("sm-", "Samsung");
    /// map.insert("sm-g9", "Samsung Galaxy");
    ///
    /// assert_eq!(map.find_longest_prefix("sm-g950f"), Some(&"Samsung Galaxy"));
    /// assert_eq!(map.find_longest_prefix("sm-t560"), Some(&"Samsung"));
    /// assert_eq!(map.find_longest_prefix("gt-i9000"), None);
    /// ```
    #[must_use]
    pub fn find_longest_prefix(&self, input: &str) -> Option<&V> {
        let mut current = &self.root;
        let mut remaining = input;
        let mut last_match = current.value.as_ref();

        while let Some(first) = remaining.chars().next() {
            let Some(child) = current.children.get(&first) else {
                break;
            };
            let Some(rest) = remaining.strip_prefix(child.prefix.as_str()) else {
                break;
            };
            remaining = rest;
            current = child;
            if current.value.is_some() {
                last_match = current.value.as_ref();
            }
        }

        last_match
    }

    /// Whether any stored key is a prefix of `input`.
    #[must_use]
    pub fn contains_prefix_of(&self, input: &str) -> bool {
        self.find_longest_prefix(input).is_some()
    }
}

impl<'a, V> FromIterator<(&'a str, V)> for PrefixMap<V> {
    fn from_iter<I: IntoIterator<Item = (&'a str, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V> Node<V> {
    fn new(prefix: String) -> Self {
        Self {
            prefix,
            value: None,
            children: HashMap::new(),
        }
    }

    fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let Some(first) = key.chars().next() else {
            return self.value.replace(value);
        };

        let Some(child) = self.children.get_mut(&first) else {
            let mut leaf = Node::new(key.to_string());
            leaf.value = Some(value);
            self.children.insert(first, leaf);
            return None;
        };

        let common = common_prefix_len(key, &child.prefix);
        if common == child.prefix.len() {
            return child.insert(&key[common..], value);
        }

        // Split the edge at `common`; the old child hangs below the split.
        let mut split = Node::new(key[..common].to_string());
        let mut old = std::mem::replace(child, Node::new(String::new()));
        old.prefix = old.prefix[common..].to_string();
        if let Some(c) = old.prefix.chars().next() {
            split.children.insert(c, old);
        }

        if common == key.len() {
            split.value = Some(value);
        } else {
            let rest = &key[common..];
            let mut leaf = Node::new(rest.to_string());
            leaf.value = Some(value);
            if let Some(c) = rest.chars().next() {
                split.children.insert(c, leaf);
            }
        }

        *child = split;
        None
    }

    fn get(&self, key: &str) -> Option<&V> {
        let Some(first) = key.chars().next() else {
            return self.value.as_ref();
        };
        let child = self.children.get(&first)?;
        child.get(key.strip_prefix(child.prefix.as_str())?)
    }
}

/// Byte length of the longest common prefix, cut back to a `char` boundary.
#[inline]
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i)
}

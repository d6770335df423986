//! uawalk-test: Test parse trees for conformance testing
//!
//! Provides an arena-backed [`TestTree`] whose [`TestNode`] handles implement
//! [`ParseTree`], so walk lists can be exercised without a real user-agent
//! parser.
//!
//! # Example
//!
//! ```
//! use uawalk_test::prelude::*;
//!
//! let tree = TestTree::builder("agent")
//!     .open("product")
//!     .leaf("name", "Firefox")
//!     .separator("/")
//!     .leaf("version", "120.0")
//!     .close()
//!     .build();
//!
//! let product = tree.find("agent/product").unwrap();
//! assert_eq!(product.text(), "Firefox/120.0");
//! assert_eq!(product.child_count(), 3);
//! ```

use std::borrow::Cow;
use std::fmt;
use uawalk::ParseTree;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Rule name given to separator leaves.
pub const SEPARATOR: &str = "separator";

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    text: Option<String>,
    separator: bool,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// An immutable parse tree stored as a flat arena. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct TestTree {
    nodes: Vec<NodeData>,
}

impl TestTree {
    /// Start a tree whose root is called `root`.
    pub fn builder(root: impl Into<String>) -> TestTreeBuilder {
        TestTreeBuilder {
            nodes: vec![NodeData {
                name: root.into(),
                text: None,
                separator: false,
                parent: None,
                children: Vec::new(),
            }],
            open: vec![0],
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> TestNode<'_> {
        TestNode { tree: self, id: 0 }
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by a `/`-separated path of rule names, starting with the
    /// root's name.
    ///
    /// A segment may carry a one-based ordinal among same-named siblings:
    /// `agent/product[2]/version`.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<TestNode<'_>> {
        let mut segments = path.split('/');
        let root = self.root();
        if segments.next()? != root.name() {
            return None;
        }
        segments.try_fold(root, |node, segment| {
            let (name, ordinal) = parse_segment(segment)?;
            node.children()
                .filter(|child| child.name() == name)
                .nth(ordinal - 1)
        })
    }
}

fn parse_segment(segment: &str) -> Option<(&str, usize)> {
    match segment.split_once('[') {
        None => Some((segment, 1)),
        Some((name, rest)) => {
            let ordinal: usize = rest.strip_suffix(']')?.parse().ok()?;
            (ordinal >= 1).then_some((name, ordinal))
        }
    }
}

/// Builds a [`TestTree`] depth-first.
///
/// `open` descends into a new interior node, `close` returns to its parent.
#[must_use]
#[derive(Debug)]
pub struct TestTreeBuilder {
    nodes: Vec<NodeData>,
    open: Vec<usize>,
}

impl TestTreeBuilder {
    fn push(&mut self, name: String, text: Option<String>, separator: bool) -> usize {
        let parent = self.open.last().copied().unwrap_or(0);
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            name,
            text,
            separator,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Add an interior node and descend into it.
    pub fn open(mut self, name: impl Into<String>) -> Self {
        let id = self.push(name.into(), None, false);
        self.open.push(id);
        self
    }

    /// Give the currently open node an explicit text instead of the
    /// concatenation of its children.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        if let Some(&id) = self.open.last() {
            self.nodes[id].text = Some(text.into());
        }
        self
    }

    /// Add a leaf.
    pub fn leaf(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(name.into(), Some(text.into()), false);
        self
    }

    /// Add a separator leaf.
    pub fn separator(mut self, text: impl Into<String>) -> Self {
        self.push(SEPARATOR.to_owned(), Some(text.into()), true);
        self
    }

    /// Return to the parent of the currently open node.
    pub fn close(mut self) -> Self {
        if self.open.len() > 1 {
            self.open.pop();
        }
        self
    }

    /// Finish the tree. Nodes still open are closed.
    #[must_use]
    pub fn build(self) -> TestTree {
        TestTree { nodes: self.nodes }
    }
}

/// A cheap handle to one node of a [`TestTree`].
///
/// Equality is identity: same tree, same node.
#[derive(Clone, Copy)]
pub struct TestNode<'a> {
    tree: &'a TestTree,
    id: usize,
}

impl<'a> TestNode<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.id]
    }

    fn at(&self, id: usize) -> Self {
        Self {
            tree: self.tree,
            id,
        }
    }

    /// Arena index of this node.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// `/`-separated rule names from the root, with ordinals where a name
    /// repeats among siblings.
    #[must_use]
    pub fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut node = *self;
        while let Some(parent) = node.parent() {
            let ordinal = parent
                .children()
                .filter(|c| c.name() == node.name())
                .position(|c| c == node)
                .map_or(1, |p| p + 1);
            if ordinal == 1 {
                segments.push(node.name().to_owned());
            } else {
                segments.push(format!("{}[{ordinal}]", node.name()));
            }
            node = parent;
        }
        segments.push(node.name().to_owned());
        segments.reverse();
        segments.join("/")
    }
}

impl PartialEq for TestNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for TestNode<'_> {}

impl fmt::Debug for TestNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TestNode(#{} {} {:?})", self.id, self.data().name, self.text())
    }
}

impl ParseTree for TestNode<'_> {
    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|id| self.at(id))
    }

    fn child_count(&self) -> usize {
        self.data().children.len()
    }

    fn child(&self, index: usize) -> Option<Self> {
        self.data().children.get(index).map(|&id| self.at(id))
    }

    fn name(&self) -> &str {
        &self.data().name
    }

    fn text(&self) -> Cow<'_, str> {
        let data = self.data();
        match &data.text {
            Some(text) => Cow::Borrowed(text.as_str()),
            None => Cow::Owned(self.children().map(|c| c.text().into_owned()).collect()),
        }
    }

    fn is_separator(&self) -> bool {
        self.data().separator
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{TestNode, TestTree, TestTreeBuilder};
    pub use uawalk::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TestTree {
        TestTree::builder("agent")
            .open("product")
            .leaf("name", "Mozilla")
            .separator("/")
            .leaf("version", "5.0")
            .close()
            .separator(" ")
            .open("product")
            .leaf("name", "Firefox")
            .close()
            .build()
    }

    #[test]
    fn text_concatenates_children() {
        let tree = sample();
        assert_eq!(tree.root().text(), "Mozilla/5.0 Firefox");
    }

    #[test]
    fn explicit_text_wins() {
        let tree = TestTree::builder("agent")
            .open("comments")
            .text("(Windows)")
            .leaf("entry", "Windows")
            .close()
            .build();
        assert_eq!(tree.find("agent/comments").unwrap().text(), "(Windows)");
    }

    #[test]
    fn find_with_ordinals() {
        let tree = sample();
        let second = tree.find("agent/product[2]/name").unwrap();
        assert_eq!(second.text(), "Firefox");
        assert_eq!(second.path(), "agent/product[2]/name");
        assert!(tree.find("agent/product[3]").is_none());
        assert!(tree.find("agent/product[0]").is_none());
        assert!(tree.find("other").is_none());
    }

    #[test]
    fn identity_equality() {
        let tree = sample();
        let a = tree.find("agent/product/name").unwrap();
        let b = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, tree.find("agent/product[2]/name").unwrap());

        let copy = tree.clone();
        assert_ne!(a, copy.find("agent/product/name").unwrap());
    }

    #[test]
    fn navigation() {
        let tree = sample();
        let version = tree.find("agent/product/version").unwrap();
        assert_eq!(version.parent(), tree.find("agent/product"));
        assert!(tree.root().parent().is_none());
        assert!(tree.find("agent/separator").unwrap().is_separator());
        assert_eq!(tree.root().children().count(), 3);
    }
}

//! `ParseTree`: Read-only view of a parsed user-agent
//!
//! The tokenizer and parser that build the tree live outside this crate. The
//! engine only needs to navigate: parent, ordered children, text and whether a
//! node is a separator token.

use std::borrow::Cow;
use std::fmt::Debug;

/// A handle to one node of a user-agent parse tree.
///
/// Implementations are usually cheap `Copy` handles (an arena reference plus a
/// node index) so that walk steps can pass nodes around by value. Equality must
/// be node *identity*: two handles are equal iff they point at the same node.
///
/// # Thread Safety
///
/// Compiled walk lists are shared across threads; the tree itself only has to
/// be readable from the thread that walks it, so no `Send`/`Sync` bound here.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Node<'a> { tree: &'a Arena, id: usize }
///
/// impl<'a> ParseTree for Node<'a> {
///     fn parent(&self) -> Option<Self> { self.tree.parent(self.id).map(|id| Node { id, ..*self }) }
///     fn child_count(&self) -> usize { self.tree.children(self.id).len() }
///     fn child(&self, index: usize) -> Option<Self> { /* ... */ }
///     fn name(&self) -> &str { self.tree.name(self.id) }
///     fn text(&self) -> Cow<'_, str> { Cow::Borrowed(self.tree.text(self.id)) }
///     fn is_separator(&self) -> bool { self.tree.is_separator(self.id) }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `ParseTree`",
    label = "walk lists can only be applied to parse tree node handles",
    note = "implement parent/child_count/child/name/text/is_separator on a cheap node handle"
)]
pub trait ParseTree: Clone + PartialEq + Debug {
    /// The parent node, or `None` at the root.
    fn parent(&self) -> Option<Self>;

    /// Number of direct children (separators included).
    fn child_count(&self) -> usize;

    /// The child at zero-based `index`, or `None` when out of bounds.
    fn child(&self, index: usize) -> Option<Self>;

    /// Grammar rule name of this node (`product`, `version`, `comments`, ...).
    ///
    /// `Down` steps filter children on this name.
    fn name(&self) -> &str;

    /// Textual content covered by this node.
    fn text(&self) -> Cow<'_, str>;

    /// Whether this node is a separator token (`;`, `,`, whitespace, ...).
    ///
    /// `Next` and `Prev` skip over separators.
    fn is_separator(&self) -> bool;

    /// Iterate the direct children in tree order.
    fn children(&self) -> Children<Self> {
        Children {
            parent: self.clone(),
            index: 0,
            count: self.child_count(),
        }
    }
}

/// Iterator over the children of a [`ParseTree`] node, left to right.
#[derive(Debug, Clone)]
pub struct Children<N> {
    parent: N,
    index: usize,
    count: usize,
}

impl<N: ParseTree> Iterator for Children<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        while self.index < self.count {
            let child = self.parent.child(self.index);
            self.index += 1;
            if child.is_some() {
                return child;
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.count - self.index))
    }
}

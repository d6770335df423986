//! uawalk - tree-walking matcher engine for user-agent parse trees
//!
//! A matcher such as `agent.(1)product.(1)name="Firefox"^.(1)version` is
//! compiled once into a [`WalkList`]: a flat sequence of [`Step`]s that is then
//! evaluated against many parsed user agents.
//!
//! # Architecture
//!
//! - [`MatcherExpr`]: the parsed matcher (the parser itself lives upstream)
//! - [`WalkListBuilder`]: a [`Visitor`] that emits the steps a hash probe
//!   cannot answer
//! - [`WalkList`]: the compiled, immutable, thread-shareable step chain
//! - [`ParseTree`]: the navigation capability a tree must offer
//! - [`Lookups`]: named lookup maps and sets resolved at compile time
//!
//! # Key Design Insights
//!
//! 1. **Steps link by index**: every step stores the position of its
//!    successor, so a walk list is one `Vec` with no shared ownership.
//!
//! 2. **Miss is `None`**: a step that does not match returns `None` and the
//!    remaining steps never run. Only `Down` backtracks, across its candidate
//!    children.
//!
//! 3. **Hash-entry elision**: the leading `Down` chain and the first `Equals`
//!    are answered by the caller's index, so the compiler drops them.
//!
//! # Example
//!
//! ```
//! use uawalk::prelude::*;
//! use uawalk_test::TestTree;
//!
//! let tree = TestTree::builder("agent")
//!     .open("product")
//!     .leaf("name", "Firefox")
//!     .leaf("version", "120.0")
//!     .close()
//!     .build();
//!
//! let matcher = MatcherExpr::walk([
//!     PathStep::down_nth(1, "product"),
//!     PathStep::down_nth(1, "name"),
//!     PathStep::Equals("Firefox".into()),
//!     PathStep::Up,
//!     PathStep::down_nth(1, "version"),
//! ]);
//!
//! let walk_list = WalkList::new(&matcher, &Lookups::default(), false).unwrap();
//! assert_eq!(walk_list.to_string(), " --> Up() --> Down([1:1]version)");
//!
//! // The caller's hash probe has already located the name node.
//! let name = tree.find("agent/product/name").unwrap();
//! let hit = walk_list.walk(name, None).unwrap();
//! assert_eq!(hit.effective_value(), "120.0");
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod compiler;
mod expr;
mod lookups;
mod normalize;
mod parse_tree;
mod prefix_map;
mod range;
mod step;
mod trace;
mod visit;
mod walk_list;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use compiler::WalkListBuilder;
pub use parse_tree::{Children, ParseTree};
pub use step::{Step, StepFamily, StepKind, ANY_CHILD};
pub use walk_list::{WalkList, WalkResult};

// Matcher syntax
pub use expr::{BasePath, MatcherExpr, PathStep};
pub use range::{select_words, NumberRange, WordRange};
pub use visit::{walk_base_path, walk_matcher, walk_step, walk_steps, Visitor};

// Lookup tables
pub use lookups::{LookupMap, LookupSet, Lookups, LookupsBuilder, SetRef};
pub use prefix_map::PrefixMap;

// Value normalisation
pub use normalize::{clean_version, normalize_brand};

// Trace types
pub use trace::{TraceEvent, WalkTrace};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use uawalk::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Matcher syntax
        BasePath,
        // Lookup tables
        Lookups,
        MatcherExpr,
        NumberRange,
        // Core types
        ParseTree,
        PathStep,
        Step,
        StepKind,
        // Trace types
        TraceEvent,
        WalkList,
        // Errors
        WalkListError,
        WalkResult,
        WalkTrace,
        WordRange,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from walk-list compilation.
///
/// These are configuration errors: the matcher names a table the host did not
/// provide. Fix the lookups (or the matcher) and compile again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkListError {
    /// `LookUp`, `LookUpPrefix` or `IsInLookUpPrefix` names an unknown map.
    #[error("missing lookup \"{name}\"{}", list_available(.available))]
    MissingLookup {
        /// The name as written in the matcher.
        name: String,
        /// Lookup maps that do exist, sorted.
        available: Vec<String>,
    },
    /// `?set` or `!?set` names neither a lookup set nor a lookup map.
    #[error("missing lookup set \"{name}\"{}", list_available(.available))]
    MissingLookupSet {
        /// The name as written in the matcher.
        name: String,
        /// Lookup sets that do exist, sorted.
        available: Vec<String>,
    },
}

impl WalkListError {
    /// The offending lookup or set name, verbatim.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::MissingLookup { name, .. } | Self::MissingLookupSet { name, .. } => name,
        }
    }
}

fn list_available(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

//! `WalkList`: a compiled matcher, evaluated against parse trees
//!
//! A walk list is a flat vector of [`Step`]s. Each step knows the position of
//! its successor; evaluation starts at position 0 and every step hands its
//! `(node, value)` output to the successor, returning whatever the successor
//! returns. The last step returns its own output as the hit.
//!
//! # INV: misses propagate
//!
//! A step that misses returns `None` and nothing after it runs. There is no
//! backtracking except inside `Down`, which tries each candidate child in tree
//! order and returns the first hit.

use crate::compiler::WalkListBuilder;
use crate::normalize::{clean_version, normalize_brand};
use crate::step::ANY_CHILD;
use crate::trace::{NoTrace, Tracer, WalkTrace};
use crate::{Lookups, MatcherExpr, ParseTree, Step, StepKind, WalkListError};
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

/// Outcome of a successful walk: the node reached and the value carried.
///
/// `value` is `None` when no step produced an explicit value; the caller then
/// uses the node's own text (see [`effective_value`](Self::effective_value)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkResult<N> {
    node: N,
    value: Option<String>,
}

impl<N> WalkResult<N> {
    /// Create a result.
    pub fn new(node: N, value: Option<String>) -> Self {
        Self { node, value }
    }

    /// The node the walk ended on.
    pub fn node(&self) -> &N {
        &self.node
    }

    /// The explicit value, if any step produced one.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Split into node and value.
    pub fn into_parts(self) -> (N, Option<String>) {
        (self.node, self.value)
    }
}

impl<N: ParseTree> WalkResult<N> {
    /// The explicit value, or the node text when there is none.
    pub fn effective_value(&self) -> Cow<'_, str> {
        match &self.value {
            Some(v) => Cow::Borrowed(v.as_str()),
            None => self.node.text(),
        }
    }
}

impl<N: ParseTree> fmt::Display for WalkResult<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "WalkResult{{tree={}, value='{v}'}}", self.node.text()),
            None => write!(f, "WalkResult{{tree={}, value=null}}", self.node.text()),
        }
    }
}

/// A compiled matcher.
///
/// Immutable after construction and `Send + Sync`: one walk list can be
/// evaluated from many threads at once.
///
/// # Example
///
/// ```ignore
/// let matcher = MatcherExpr::walk([PathStep::down_nth(1, "product"), PathStep::Up]);
/// let walk_list = WalkList::new(&matcher, &lookups, false)?;
/// if let Some(hit) = walk_list.walk(root, None) {
///     println!("{}", hit.effective_value());
/// }
/// ```
#[derive(Debug)]
pub struct WalkList {
    steps: Vec<Step>,
    lookups: Lookups,
    verbose: bool,
    uses_is_null: OnceLock<bool>,
}

impl WalkList {
    /// Compile `matcher` into a walk list.
    ///
    /// Steps that a hash probe on the walked prefix can answer are not
    /// emitted; see [`WalkListBuilder`] for the exact rules.
    ///
    /// # Errors
    ///
    /// Returns [`WalkListError::MissingLookup`] or
    /// [`WalkListError::MissingLookupSet`] when the matcher names a table
    /// that `lookups` does not contain.
    pub fn new(
        matcher: &MatcherExpr,
        lookups: &Lookups,
        verbose: bool,
    ) -> Result<Self, WalkListError> {
        let steps = WalkListBuilder::new(lookups).build(matcher)?;
        let walk_list = Self::assemble(steps, lookups.clone(), verbose);

        if verbose {
            tracing::info!("------------------------------------");
            tracing::info!("Required: {matcher}");
            for step in &walk_list.steps {
                tracing::info!("{}: {step}", step.position() + 1);
            }
        } else {
            tracing::debug!(%matcher, steps = walk_list.steps.len(), "compiled walk list");
        }

        Ok(walk_list)
    }

    /// Build a walk list directly from step kinds, bypassing the compiler.
    ///
    /// The steps run in the order given.
    pub fn from_steps(kinds: impl IntoIterator<Item = StepKind>, verbose: bool) -> Self {
        let steps = kinds.into_iter().map(Step::new).collect();
        Self::assemble(steps, Lookups::default(), verbose)
    }

    fn assemble(mut steps: Vec<Step>, lookups: Lookups, verbose: bool) -> Self {
        // Link back to front: every step points at the one after it.
        let mut next = None;
        for (position, step) in steps.iter_mut().enumerate().rev() {
            step.link(position, next);
            step.set_verbose(verbose);
            next = Some(position);
        }

        Self {
            steps,
            lookups,
            verbose,
            uses_is_null: OnceLock::new(),
        }
    }

    /// Evaluate against `tree`, starting with `value` (or `None` for "use the
    /// node text").
    ///
    /// An empty walk list hits with its input unchanged.
    pub fn walk<N: ParseTree>(&self, tree: N, value: Option<&str>) -> Option<WalkResult<N>> {
        self.walk_traced(tree, value, &mut NoTrace)
    }

    /// Evaluate like [`walk`](Self::walk), recording every step entry and exit.
    pub fn walk_with_trace<N: ParseTree>(&self, tree: N, value: Option<&str>) -> WalkTrace<N> {
        let mut events = Vec::new();
        let result = self.walk_traced(tree, value, &mut events);
        WalkTrace { result, events }
    }

    fn walk_traced<N: ParseTree, T: Tracer>(
        &self,
        tree: N,
        value: Option<&str>,
        tracer: &mut T,
    ) -> Option<WalkResult<N>> {
        let Some(first) = self.steps.first() else {
            return Some(WalkResult::new(tree, value.map(str::to_owned)));
        };
        if self.verbose {
            tracing::info!("Tree: >>>{}<<<", tree.text());
        }
        self.run(first, tree, value, tracer)
    }

    /// The first step, or `None` for an empty list.
    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }

    /// All steps in order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The step at `position`.
    pub fn step(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    /// The step `step` forwards to.
    pub fn next_step(&self, step: &Step) -> Option<&Step> {
        step.next_position().and_then(|p| self.steps.get(p))
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the list has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether step entry and exit are logged.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// The lookup tables this list was compiled against.
    pub fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    /// Whether any step of the chain is `IsNull`.
    ///
    /// A list that uses `IsNull` cannot be entered through a hash probe on its
    /// prefix. Computed once, on first call.
    pub fn uses_is_null(&self) -> bool {
        *self.uses_is_null.get_or_init(|| {
            let mut step = self.first_step();
            while let Some(current) = step {
                if matches!(current.kind(), StepKind::IsNull) {
                    return true;
                }
                step = self.next_step(current);
            }
            false
        })
    }

    fn run<N: ParseTree, T: Tracer>(
        &self,
        step: &Step,
        node: N,
        value: Option<&str>,
        tracer: &mut T,
    ) -> Option<WalkResult<N>> {
        if step.is_verbose() {
            tracing::info!("Enter step({}): {step}", step.position());
        }
        tracer.enter(step, &node, value);

        let result = self.evaluate(step, node, value, tracer);

        tracer.leave(step, result.is_some());
        if step.is_verbose() {
            tracing::info!(
                "Leave step({}) ({}): {step}",
                step.position(),
                if result.is_some() { "+" } else { "-" }
            );
        }
        result
    }

    /// Hand `(node, value)` to the successor of `step`, or finish the walk.
    fn forward<N: ParseTree, T: Tracer>(
        &self,
        step: &Step,
        node: N,
        value: Option<&str>,
        tracer: &mut T,
    ) -> Option<WalkResult<N>> {
        match step.next_position() {
            Some(next) => self.run(&self.steps[next], node, value, tracer),
            None => Some(WalkResult::new(node, value.map(str::to_owned))),
        }
    }

    fn evaluate<N: ParseTree, T: Tracer>(
        &self,
        step: &Step,
        node: N,
        value: Option<&str>,
        tracer: &mut T,
    ) -> Option<WalkResult<N>> {
        match step.kind() {
            // ── walk ─────────────────────────────────────────────────────────
            StepKind::Down { range, name } => {
                let mut ordinal = 0;
                for child in node.children() {
                    if name != ANY_CHILD && child.name() != name {
                        continue;
                    }
                    ordinal += 1;
                    if ordinal > range.end {
                        break;
                    }
                    if !range.contains(ordinal) {
                        continue;
                    }
                    if let Some(hit) = self.forward(step, child, None, tracer) {
                        return Some(hit);
                    }
                }
                None
            }
            StepKind::Up => {
                let parent = node.parent()?;
                self.forward(step, parent, None, tracer)
            }
            StepKind::Next => {
                let sibling = next_sibling(&node)?;
                self.forward(step, sibling, None, tracer)
            }
            StepKind::Prev => {
                let sibling = prev_sibling(&node)?;
                self.forward(step, sibling, None, tracer)
            }

            // ── compare ──────────────────────────────────────────────────────
            StepKind::Equals(expected) => {
                self.filter(step, node, value, tracer, |s| s == expected.as_str())
            }
            StepKind::NotEquals(expected) => {
                self.filter(step, node, value, tracer, |s| s != expected.as_str())
            }
            StepKind::StartsWith(prefix) => {
                self.filter(step, node, value, tracer, |s| s.starts_with(prefix.as_str()))
            }
            StepKind::EndsWith(suffix) => {
                self.filter(step, node, value, tracer, |s| s.ends_with(suffix.as_str()))
            }
            StepKind::Contains(needle) => {
                self.filter(step, node, value, tracer, |s| s.contains(needle.as_str()))
            }
            StepKind::IsInSet { set, .. } => {
                self.filter(step, node, value, tracer, |s| set.contains(&s.to_lowercase()))
            }
            StepKind::IsNotInSet { set, .. } => {
                self.filter(step, node, value, tracer, |s| !set.contains(&s.to_lowercase()))
            }
            StepKind::IsInLookupPrefix { prefixes, .. } => self.filter(step, node, value, tracer, |s| {
                prefixes.contains_prefix_of(&s.to_lowercase())
            }),
            StepKind::IsNull => match self.forward(step, node.clone(), value, tracer) {
                Some(_) => None,
                None => Some(WalkResult::new(node, value.map(str::to_owned))),
            },

            // ── value ────────────────────────────────────────────────────────
            StepKind::FixedString(literal) => self.forward(step, node, Some(literal.as_str()), tracer),
            StepKind::WordRange(range) => {
                self.transform(step, node, value, tracer, |s| range.select(s).map(str::to_owned))
            }
            StepKind::Concat { prefix, postfix } => self.transform(step, node, value, tracer, |s| {
                Some(format!("{prefix}{s}{postfix}"))
            }),
            StepKind::ConcatPrefix(prefix) => self.transform(step, node, value, tracer, |s| {
                Some(format!("{prefix}{s}"))
            }),
            StepKind::ConcatPostfix(postfix) => self.transform(step, node, value, tracer, |s| {
                Some(format!("{s}{postfix}"))
            }),
            StepKind::CleanVersion => self.transform(step, node, value, tracer, |s| {
                Some(clean_version(s))
            }),
            StepKind::NormalizeBrand => self.transform(step, node, value, tracer, |s| {
                Some(normalize_brand(s))
            }),
            StepKind::BackToFull => self.forward(step, node, None, tracer),

            // ── lookup ───────────────────────────────────────────────────────
            StepKind::Lookup { map, default, .. } => self.transform(step, node, value, tracer, |s| {
                map.get(&s.to_lowercase())
                    .or(default.as_ref())
                    .cloned()
            }),
            StepKind::LookupPrefix {
                prefixes, default, ..
            } => self.transform(step, node, value, tracer, |s| {
                prefixes
                    .find_longest_prefix(&s.to_lowercase())
                    .or(default.as_ref())
                    .cloned()
            }),
        }
    }

    /// Forward `(node, s)` when `keep(s)` holds for the effective string `s`.
    fn filter<N, T, F>(
        &self,
        step: &Step,
        node: N,
        value: Option<&str>,
        tracer: &mut T,
        keep: F,
    ) -> Option<WalkResult<N>>
    where
        N: ParseTree,
        T: Tracer,
        F: FnOnce(&str) -> bool,
    {
        let s = effective(&node, value);
        if !keep(s.as_ref()) {
            return None;
        }
        self.forward(step, node.clone(), Some(&*s), tracer)
    }

    /// Forward `(node, rewrite(s))` for the effective string `s`; miss when
    /// the rewrite yields nothing.
    fn transform<N, T, F>(
        &self,
        step: &Step,
        node: N,
        value: Option<&str>,
        tracer: &mut T,
        rewrite: F,
    ) -> Option<WalkResult<N>>
    where
        N: ParseTree,
        T: Tracer,
        F: FnOnce(&str) -> Option<String>,
    {
        let s = effective(&node, value);
        let rewritten = rewrite(s.as_ref())?;
        self.forward(step, node.clone(), Some(rewritten.as_str()), tracer)
    }
}

impl fmt::Display for WalkList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str("Empty");
        }
        self.steps
            .iter()
            .try_for_each(|step| write!(f, " --> {step}"))
    }
}

/// The carried value, or the node text when nothing has been computed yet.
fn effective<'a, N: ParseTree>(node: &'a N, value: Option<&'a str>) -> Cow<'a, str> {
    match value {
        Some(v) => Cow::Borrowed(v),
        None => node.text(),
    }
}

/// First non-separator sibling after `node`.
fn next_sibling<N: ParseTree>(node: &N) -> Option<N> {
    let parent = node.parent()?;
    let mut found = false;
    for child in parent.children() {
        if found && !child.is_separator() {
            return Some(child);
        }
        if child == *node {
            found = true;
        }
    }
    None
}

/// Last non-separator sibling before `node`.
fn prev_sibling<N: ParseTree>(node: &N) -> Option<N> {
    let parent = node.parent()?;
    let mut previous = None;
    for child in parent.children() {
        if child == *node {
            return previous;
        }
        if !child.is_separator() {
            previous = Some(child);
        }
    }
    None
}

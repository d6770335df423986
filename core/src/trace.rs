//! Evaluation trace types for debugging walk lists.
//!
//! [`WalkList::walk_with_trace`](crate::WalkList::walk_with_trace) records one
//! [`TraceEvent::Enter`] when a step starts and one [`TraceEvent::Leave`] when
//! it returns. Because every step calls its successor from inside its own
//! evaluation, the events nest: a `Down` step that tries three children shows
//! three enter/leave pairs of its successor between its own enter and leave.
//!
//! # Example
//!
//! ```ignore
//! let trace = walk_list.walk_with_trace(root, None);
//! println!("Result: {:?}", trace.result);
//! for event in &trace.events {
//!     println!("  {event}");
//! }
//! ```

use crate::{ParseTree, Step, WalkResult};
use std::fmt;

/// One entry or exit of a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A step started evaluating.
    Enter {
        /// Position of the step in the walk list.
        position: usize,
        /// Rendered step, e.g. `Down([1:1]product)`.
        step: String,
        /// Text of the node the step received.
        node: String,
        /// Value the step received (`None` when unknown so far).
        value: Option<String>,
    },
    /// A step returned.
    Leave {
        /// Position of the step in the walk list.
        position: usize,
        /// Whether it returned a hit.
        hit: bool,
    },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter {
                position,
                step,
                node,
                value,
            } => match value {
                Some(v) => write!(f, "Enter step {position}: {step} on >>>{node}<<< value={v:?}"),
                None => write!(f, "Enter step {position}: {step} on >>>{node}<<<"),
            },
            Self::Leave { position, hit } => {
                write!(f, "Leave step {position} ({})", if *hit { '+' } else { '-' })
            }
        }
    }
}

/// Trace of a full walk.
///
/// # INV: `result` == `walk()` result
///
/// The `result` field always equals what [`WalkList::walk`](crate::WalkList::walk)
/// returns for the same input.
#[derive(Debug, Clone)]
pub struct WalkTrace<N> {
    /// The final result (identical to what `walk()` returns).
    pub result: Option<WalkResult<N>>,
    /// Enter/leave events in evaluation order.
    pub events: Vec<TraceEvent>,
}

impl<N> WalkTrace<N> {
    /// Positions of the steps that were entered, in evaluation order.
    #[must_use]
    pub fn entered_positions(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TraceEvent::Enter { position, .. } => Some(*position),
                TraceEvent::Leave { .. } => None,
            })
            .collect()
    }

    /// Number of times the step at `position` was entered.
    #[must_use]
    pub fn enter_count(&self, position: usize) -> usize {
        self.entered_positions()
            .into_iter()
            .filter(|p| *p == position)
            .count()
    }
}

/// Observer threaded through evaluation.
pub(crate) trait Tracer {
    fn enter<N: ParseTree>(&mut self, step: &Step, node: &N, value: Option<&str>);
    fn leave(&mut self, step: &Step, hit: bool);
}

/// The tracer used by plain `walk()`: does nothing.
pub(crate) struct NoTrace;

impl Tracer for NoTrace {
    #[inline]
    fn enter<N: ParseTree>(&mut self, _: &Step, _: &N, _: Option<&str>) {}

    #[inline]
    fn leave(&mut self, _: &Step, _: bool) {}
}

impl Tracer for Vec<TraceEvent> {
    fn enter<N: ParseTree>(&mut self, step: &Step, node: &N, value: Option<&str>) {
        self.push(TraceEvent::Enter {
            position: step.position(),
            step: step.to_string(),
            node: node.text().into_owned(),
            value: value.map(str::to_owned),
        });
    }

    fn leave(&mut self, step: &Step, hit: bool) {
        self.push(TraceEvent::Leave {
            position: step.position(),
            hit,
        });
    }
}

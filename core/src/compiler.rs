//! Compilation of a [`MatcherExpr`] into walk-list steps.
//!
//! The caller indexes every matcher by the hash of its leading `Down` chain
//! (and of the first `Equals` literal that follows it). Everything that hash
//! probe already guarantees is not emitted as a step. The builder tracks this
//! with a single flag, `found_hash_entry_point`: until the first construct a
//! hash probe cannot express is visited, added steps are dropped.
//!
//! | Construct | Flag |
//! |-----------|------|
//! | `Down`, fixed value, `BackToFull` | unchanged |
//! | `Equals` | set *after* the step is added |
//! | other compares, `Up`/`Next`/`Prev`, word ranges | set *before* the step is added |
//! | lookups, `CleanVersion`, `NormalizeBrand`, `Concat*` | set after the inner matcher, before the step |
//! | `@Variable` | set before its steps |
//! | `IsNull` | not involved: the step is always emitted |

use crate::lookups::SetRef;
use crate::step::Step;
use crate::visit::{walk_steps, Visitor};
use crate::{
    Lookups, MatcherExpr, NumberRange, PathStep, PrefixMap, StepKind, WalkListError, WordRange,
};
use std::sync::Arc;

/// Visitor that turns a matcher into an unlinked step sequence.
///
/// Normally driven by [`WalkList::new`](crate::WalkList::new), which also
/// links the steps.
#[derive(Debug)]
pub struct WalkListBuilder<'l> {
    lookups: &'l Lookups,
    steps: Vec<Step>,
    found_hash_entry_point: bool,
}

impl<'l> WalkListBuilder<'l> {
    /// A builder resolving lookup and set names against `lookups`.
    #[must_use]
    pub fn new(lookups: &'l Lookups) -> Self {
        Self {
            lookups,
            steps: Vec::new(),
            found_hash_entry_point: false,
        }
    }

    /// Visit `matcher` and return the steps that survived.
    ///
    /// # Errors
    ///
    /// Fails on the first lookup or set name that `lookups` cannot resolve.
    pub fn build(mut self, matcher: &MatcherExpr) -> Result<Vec<Step>, WalkListError> {
        self.visit_matcher(matcher)?;
        Ok(self.steps)
    }

    fn add(&mut self, kind: StepKind) {
        if self.found_hash_entry_point {
            self.steps.push(Step::new(kind));
        }
    }

    fn from_here_on(&mut self) {
        self.found_hash_entry_point = true;
    }

    fn lookup_map(&self, name: &str) -> Result<Arc<crate::LookupMap>, WalkListError> {
        self.lookups
            .map(name)
            .cloned()
            .ok_or_else(|| WalkListError::MissingLookup {
                name: name.to_owned(),
                available: owned(self.lookups.map_names()),
            })
    }

    fn lookup_prefixes(&self, name: &str) -> Result<Arc<PrefixMap<String>>, WalkListError> {
        let map = self.lookup_map(name)?;
        Ok(Arc::new(
            map.iter().map(|(k, v)| (k.as_str(), v.clone())).collect(),
        ))
    }

    fn lookup_set(&self, name: &str) -> Result<SetRef, WalkListError> {
        SetRef::resolve(self.lookups, name).ok_or_else(|| WalkListError::MissingLookupSet {
            name: name.to_owned(),
            available: owned(self.lookups.set_names()),
        })
    }
}

fn owned(names: Vec<&str>) -> Vec<String> {
    let mut names: Vec<String> = names.into_iter().map(str::to_owned).collect();
    names.sort_unstable();
    names
}

impl Visitor for WalkListBuilder<'_> {
    type Error = WalkListError;

    fn visit_is_null(&mut self, matcher: &MatcherExpr) -> Result<(), WalkListError> {
        self.steps.push(Step::new(StepKind::IsNull));
        self.visit_matcher(matcher)
    }

    fn visit_lookup(
        &mut self,
        name: &str,
        matcher: &MatcherExpr,
        default: Option<&str>,
    ) -> Result<(), WalkListError> {
        self.visit_matcher(matcher)?;
        self.from_here_on();
        let map = self.lookup_map(name)?;
        self.add(StepKind::lookup(name, map, default.map(str::to_owned)));
        Ok(())
    }

    fn visit_lookup_prefix(
        &mut self,
        name: &str,
        matcher: &MatcherExpr,
        default: Option<&str>,
    ) -> Result<(), WalkListError> {
        self.visit_matcher(matcher)?;
        self.from_here_on();
        let prefixes = self.lookup_prefixes(name)?;
        self.add(StepKind::LookupPrefix {
            name: name.to_owned(),
            prefixes,
            default: default.map(str::to_owned),
        });
        Ok(())
    }

    fn visit_is_in_lookup_prefix(
        &mut self,
        name: &str,
        matcher: &MatcherExpr,
    ) -> Result<(), WalkListError> {
        self.visit_matcher(matcher)?;
        self.from_here_on();
        let prefixes = self.lookup_prefixes(name)?;
        self.add(StepKind::IsInLookupPrefix {
            name: name.to_owned(),
            prefixes,
        });
        Ok(())
    }

    fn visit_clean_version(&mut self, matcher: &MatcherExpr) -> Result<(), WalkListError> {
        self.visit_matcher(matcher)?;
        self.from_here_on();
        self.add(StepKind::CleanVersion);
        Ok(())
    }

    fn visit_normalize_brand(&mut self, matcher: &MatcherExpr) -> Result<(), WalkListError> {
        self.visit_matcher(matcher)?;
        self.from_here_on();
        self.add(StepKind::NormalizeBrand);
        Ok(())
    }

    fn visit_concat(
        &mut self,
        prefix: &str,
        matcher: &MatcherExpr,
        postfix: &str,
    ) -> Result<(), WalkListError> {
        self.visit_matcher(matcher)?;
        self.from_here_on();
        self.add(StepKind::Concat {
            prefix: prefix.to_owned(),
            postfix: postfix.to_owned(),
        });
        Ok(())
    }

    fn visit_concat_prefix(&mut self, prefix: &str, matcher: &MatcherExpr) -> Result<(), WalkListError> {
        self.visit_matcher(matcher)?;
        self.from_here_on();
        self.add(StepKind::ConcatPrefix(prefix.to_owned()));
        Ok(())
    }

    fn visit_concat_postfix(
        &mut self,
        matcher: &MatcherExpr,
        postfix: &str,
    ) -> Result<(), WalkListError> {
        self.visit_matcher(matcher)?;
        self.from_here_on();
        self.add(StepKind::ConcatPostfix(postfix.to_owned()));
        Ok(())
    }

    fn visit_matcher_word_range(
        &mut self,
        matcher: &MatcherExpr,
        range: WordRange,
    ) -> Result<(), WalkListError> {
        self.visit_matcher(matcher)?;
        self.from_here_on();
        self.add(StepKind::WordRange(range));
        Ok(())
    }

    fn visit_path_fixed_value(&mut self, value: &str) -> Result<(), WalkListError> {
        self.add(StepKind::FixedString(value.to_owned()));
        Ok(())
    }

    fn visit_path_variable(&mut self, _name: &str, steps: &[PathStep]) -> Result<(), WalkListError> {
        self.from_here_on();
        walk_steps(self, steps)
    }

    fn visit_step_down(&mut self, range: NumberRange, name: &str) -> Result<(), WalkListError> {
        self.add(StepKind::down(range, name));
        Ok(())
    }

    fn visit_step_up(&mut self) -> Result<(), WalkListError> {
        self.from_here_on();
        self.add(StepKind::Up);
        Ok(())
    }

    fn visit_step_next(&mut self) -> Result<(), WalkListError> {
        self.from_here_on();
        self.add(StepKind::Next);
        Ok(())
    }

    fn visit_step_prev(&mut self) -> Result<(), WalkListError> {
        self.from_here_on();
        self.add(StepKind::Prev);
        Ok(())
    }

    fn visit_step_equals(&mut self, value: &str) -> Result<(), WalkListError> {
        // The first literal is still part of the hash key.
        self.add(StepKind::Equals(value.to_owned()));
        self.from_here_on();
        Ok(())
    }

    fn visit_step_not_equals(&mut self, value: &str) -> Result<(), WalkListError> {
        self.from_here_on();
        self.add(StepKind::NotEquals(value.to_owned()));
        Ok(())
    }

    fn visit_step_starts_with(&mut self, value: &str) -> Result<(), WalkListError> {
        self.from_here_on();
        self.add(StepKind::StartsWith(value.to_owned()));
        Ok(())
    }

    fn visit_step_ends_with(&mut self, value: &str) -> Result<(), WalkListError> {
        self.from_here_on();
        self.add(StepKind::EndsWith(value.to_owned()));
        Ok(())
    }

    fn visit_step_contains(&mut self, value: &str) -> Result<(), WalkListError> {
        self.from_here_on();
        self.add(StepKind::Contains(value.to_owned()));
        Ok(())
    }

    fn visit_step_is_in_set(&mut self, set: &str) -> Result<(), WalkListError> {
        self.from_here_on();
        let resolved = self.lookup_set(set)?;
        self.add(StepKind::IsInSet {
            name: set.to_owned(),
            set: resolved,
        });
        Ok(())
    }

    fn visit_step_is_not_in_set(&mut self, set: &str) -> Result<(), WalkListError> {
        self.from_here_on();
        let resolved = self.lookup_set(set)?;
        self.add(StepKind::IsNotInSet {
            name: set.to_owned(),
            set: resolved,
        });
        Ok(())
    }

    fn visit_step_word_range(&mut self, range: WordRange) -> Result<(), WalkListError> {
        self.from_here_on();
        self.add(StepKind::WordRange(range));
        Ok(())
    }

    fn visit_step_back_to_full(&mut self) -> Result<(), WalkListError> {
        self.add(StepKind::BackToFull);
        Ok(())
    }
}

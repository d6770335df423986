//! Visitor over [`MatcherExpr`] trees.
//!
//! Every syntactic form has its own hook. The default hooks recurse in source
//! order (the inner matcher before the wrapping transformation, path steps left
//! to right), so an implementation only overrides the forms it cares about.
//! The free functions [`walk_matcher`], [`walk_base_path`] and [`walk_step`]
//! do the dispatch and can be called from overridden hooks to keep recursing.

use crate::{BasePath, MatcherExpr, NumberRange, PathStep, WordRange};

/// Hooks for each form of the matcher DSL.
#[allow(unused_variables)]
pub trait Visitor {
    /// Error that aborts the visit.
    type Error;

    /// Entry point for any matcher expression.
    fn visit_matcher(&mut self, matcher: &MatcherExpr) -> Result<(), Self::Error> {
        walk_matcher(self, matcher)
    }

    /// `agent...`, `"fixed"` or `@Variable...`.
    fn visit_matcher_path(&mut self, base: &BasePath) -> Result<(), Self::Error> {
        walk_base_path(self, base)
    }

    /// `IsNull[matcher]`
    fn visit_is_null(&mut self, matcher: &MatcherExpr) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `LookUp[name;matcher;default]`
    fn visit_lookup(
        &mut self,
        name: &str,
        matcher: &MatcherExpr,
        default: Option<&str>,
    ) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `LookUpPrefix[name;matcher;default]`
    fn visit_lookup_prefix(
        &mut self,
        name: &str,
        matcher: &MatcherExpr,
        default: Option<&str>,
    ) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `IsInLookUpPrefix[name;matcher]`
    fn visit_is_in_lookup_prefix(
        &mut self,
        name: &str,
        matcher: &MatcherExpr,
    ) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `CleanVersion[matcher]`
    fn visit_clean_version(&mut self, matcher: &MatcherExpr) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `NormalizeBrand[matcher]`
    fn visit_normalize_brand(&mut self, matcher: &MatcherExpr) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `Concat["prefix";matcher;"postfix"]`
    fn visit_concat(
        &mut self,
        prefix: &str,
        matcher: &MatcherExpr,
        postfix: &str,
    ) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `Concat["prefix";matcher]`
    fn visit_concat_prefix(&mut self, prefix: &str, matcher: &MatcherExpr) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `Concat[matcher;"postfix"]`
    fn visit_concat_postfix(
        &mut self,
        matcher: &MatcherExpr,
        postfix: &str,
    ) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `matcher[first-last]`
    fn visit_matcher_word_range(
        &mut self,
        matcher: &MatcherExpr,
        range: WordRange,
    ) -> Result<(), Self::Error> {
        self.visit_matcher(matcher)
    }

    /// `"value"` as a path.
    fn visit_path_fixed_value(&mut self, value: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `@name` followed by `steps`.
    fn visit_path_variable(&mut self, name: &str, steps: &[PathStep]) -> Result<(), Self::Error> {
        walk_steps(self, steps)
    }

    /// `agent` followed by `steps`.
    fn visit_path_walk(&mut self, steps: &[PathStep]) -> Result<(), Self::Error> {
        walk_steps(self, steps)
    }

    /// Any single path step.
    fn visit_step(&mut self, step: &PathStep) -> Result<(), Self::Error> {
        walk_step(self, step)
    }

    /// `.(range)name`
    fn visit_step_down(&mut self, range: NumberRange, name: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `^`
    fn visit_step_up(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `>`
    fn visit_step_next(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `<`
    fn visit_step_prev(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `="value"`
    fn visit_step_equals(&mut self, value: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `!="value"`
    fn visit_step_not_equals(&mut self, value: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `{"value"`
    fn visit_step_starts_with(&mut self, value: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `}"value"`
    fn visit_step_ends_with(&mut self, value: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `~"value"`
    fn visit_step_contains(&mut self, value: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `?set`
    fn visit_step_is_in_set(&mut self, set: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `!?set`
    fn visit_step_is_not_in_set(&mut self, set: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `[first-last]` inside a path.
    fn visit_step_word_range(&mut self, range: WordRange) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `@` inside a path.
    fn visit_step_back_to_full(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Dispatch `matcher` to the hook for its form.
pub fn walk_matcher<V: Visitor + ?Sized>(v: &mut V, matcher: &MatcherExpr) -> Result<(), V::Error> {
    match matcher {
        MatcherExpr::Path(base) => v.visit_matcher_path(base),
        MatcherExpr::IsNull(m) => v.visit_is_null(m),
        MatcherExpr::Lookup {
            name,
            matcher,
            default,
        } => v.visit_lookup(name, matcher, default.as_deref()),
        MatcherExpr::LookupPrefix {
            name,
            matcher,
            default,
        } => v.visit_lookup_prefix(name, matcher, default.as_deref()),
        MatcherExpr::IsInLookupPrefix { name, matcher } => v.visit_is_in_lookup_prefix(name, matcher),
        MatcherExpr::CleanVersion(m) => v.visit_clean_version(m),
        MatcherExpr::NormalizeBrand(m) => v.visit_normalize_brand(m),
        MatcherExpr::Concat {
            prefix,
            matcher,
            postfix,
        } => v.visit_concat(prefix, matcher, postfix),
        MatcherExpr::ConcatPrefix { prefix, matcher } => v.visit_concat_prefix(prefix, matcher),
        MatcherExpr::ConcatPostfix { matcher, postfix } => v.visit_concat_postfix(matcher, postfix),
        MatcherExpr::WordRange { matcher, range } => v.visit_matcher_word_range(matcher, *range),
    }
}

/// Dispatch a path base to its hook.
pub fn walk_base_path<V: Visitor + ?Sized>(v: &mut V, base: &BasePath) -> Result<(), V::Error> {
    match base {
        BasePath::Fixed(value) => v.visit_path_fixed_value(value),
        BasePath::Variable { name, steps } => v.visit_path_variable(name, steps),
        BasePath::Walk(steps) => v.visit_path_walk(steps),
    }
}

/// Visit `steps` left to right.
pub fn walk_steps<V: Visitor + ?Sized>(v: &mut V, steps: &[PathStep]) -> Result<(), V::Error> {
    steps.iter().try_for_each(|step| v.visit_step(step))
}

/// Dispatch one path step to its hook.
pub fn walk_step<V: Visitor + ?Sized>(v: &mut V, step: &PathStep) -> Result<(), V::Error> {
    match step {
        PathStep::Down { range, name } => v.visit_step_down(*range, name),
        PathStep::Up => v.visit_step_up(),
        PathStep::Next => v.visit_step_next(),
        PathStep::Prev => v.visit_step_prev(),
        PathStep::Equals(value) => v.visit_step_equals(value),
        PathStep::NotEquals(value) => v.visit_step_not_equals(value),
        PathStep::StartsWith(value) => v.visit_step_starts_with(value),
        PathStep::EndsWith(value) => v.visit_step_ends_with(value),
        PathStep::Contains(value) => v.visit_step_contains(value),
        PathStep::IsInSet(set) => v.visit_step_is_in_set(set),
        PathStep::IsNotInSet(set) => v.visit_step_is_not_in_set(set),
        PathStep::WordRange(range) => v.visit_step_word_range(*range),
        PathStep::BackToFull => v.visit_step_back_to_full(),
    }
}

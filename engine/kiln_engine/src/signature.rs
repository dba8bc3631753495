//! Best-match selection over candidate signatures.
//!
//! One scorer serves both decision problems: constructor selection and
//! operation selection. A candidate is applicable when its arity equals the
//! argument count and every declared parameter accepts the corresponding
//! argument; its score is the sum of the per-parameter specificity weights.
//! The first candidate (in declared order) reaching the strictly highest
//! score wins — ties resolve silently to the earlier declaration, so the
//! result is deterministic and no ambiguity error is raised.

use kiln_types::{TypeTag, Value};

/// Score one candidate against the supplied arguments.
///
/// `None` when the candidate is inapplicable (wrong arity, or some
/// parameter rejects its argument).
pub fn score(params: &[TypeTag], args: &[Value]) -> Option<u32> {
    if params.len() != args.len() {
        return None;
    }
    let mut total = 0u32;
    for (param, arg) in params.iter().zip(args) {
        total += param.accepts(arg)?.weight();
    }
    Some(total)
}

/// Whether the arguments are assignable to the parameter list at all,
/// without specificity ranking.
#[inline]
pub fn assignable(params: &[TypeTag], args: &[Value]) -> bool {
    score(params, args).is_some()
}

/// Select the best candidate for the supplied arguments.
///
/// Returns the position of the winning candidate within the iterator, or
/// `None` when no candidate is applicable. On equal scores the earlier
/// candidate is kept.
pub fn best_match<'a, I>(candidates: I, args: &[Value]) -> Option<usize>
where
    I: IntoIterator<Item = &'a [TypeTag]>,
{
    let mut best: Option<(usize, u32)> = None;
    for (index, params) in candidates.into_iter().enumerate() {
        let Some(candidate_score) = score(params, args) else {
            continue;
        };
        match best {
            Some((_, high)) if candidate_score <= high => {}
            _ => best = Some((index, candidate_score)),
        }
    }
    best.map(|(index, _)| index)
}

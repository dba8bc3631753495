//! Constructor selection strategies.

use kiln_types::Value;

use crate::backend::{Instance, LoadedClass};
use crate::errors::{
    constructor_raised, no_matching_constructor, ScriptError, ScriptErrorKind, ScriptResult,
};
use crate::signature::{assignable, best_match};

/// Policy for producing the instance of a freshly compiled class.
///
/// Stateless beyond its configured arguments; one strategy value can serve
/// any number of compile calls.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConstructorStrategy {
    /// Use the zero-parameter constructor; for a class whose operations
    /// are all static, produce no instance at all.
    #[default]
    NoArgs,
    /// Use the first declared constructor whose parameters the arguments
    /// are assignable to. No specificity ranking: on several applicable
    /// constructors the first declared one wins, silently.
    ExplicitArgs(Vec<Value>),
    /// Use the best-matching constructor for the arguments, via the shared
    /// signature matcher.
    MatchingArgs(Vec<Value>),
}

impl ConstructorStrategy {
    /// Produce the instance (or none, for static-only usage).
    ///
    /// The returned instance becomes permanently associated with the
    /// compiled script being built.
    pub fn construct(&self, class: &dyn LoadedClass) -> ScriptResult<Option<Instance>> {
        let descriptor = class.descriptor();
        match self {
            ConstructorStrategy::NoArgs => {
                if let Some(index) = descriptor.zero_arg_constructor() {
                    run(class, index, &[])
                } else if descriptor.is_static_only() {
                    Ok(None)
                } else {
                    Err(no_matching_constructor(descriptor.name(), 0))
                }
            }
            ConstructorStrategy::ExplicitArgs(args) => {
                let index = descriptor
                    .constructors()
                    .iter()
                    .position(|sig| assignable(&sig.params, args))
                    .ok_or_else(|| no_matching_constructor(descriptor.name(), args.len()))?;
                run(class, index, args)
            }
            ConstructorStrategy::MatchingArgs(args) => {
                let index = best_match(
                    descriptor.constructors().iter().map(|sig| sig.params.as_slice()),
                    args,
                )
                .ok_or_else(|| no_matching_constructor(descriptor.name(), args.len()))?;
                run(class, index, args)
            }
        }
    }
}

/// Run one backend constructor. Whatever the backend reports on failure
/// surfaces as `ConstructorRaised`; an already-wrapped error passes
/// through unchanged.
fn run(class: &dyn LoadedClass, index: usize, args: &[Value]) -> ScriptResult<Option<Instance>> {
    class
        .construct(index, args)
        .map(Some)
        .map_err(|err| as_raised(class.descriptor().name(), err))
}

fn as_raised(class: &str, err: ScriptError) -> ScriptError {
    match err.kind {
        ScriptErrorKind::ConstructorRaised { .. } => err,
        _ => constructor_raised(class, err.message),
    }
}

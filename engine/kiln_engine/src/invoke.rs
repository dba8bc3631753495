//! Operation selection strategies and the deferred strategy factory.

use kiln_types::{ClassType, Value};

use crate::backend::{Instance, LoadedClass};
use crate::errors::{
    ambiguous_operation, missing_instance, no_matching_operation, no_operation_candidate,
    no_such_operation, ScriptResult,
};
use crate::signature::best_match;

/// Policy for producing a result value from a compiled script.
#[derive(Clone, Debug, PartialEq)]
pub enum InvocationStrategy {
    /// A fully resolved operation with fixed arguments. Auto-detection
    /// binds here at strategy-creation time, before any instance exists.
    Bound { method: usize, args: Vec<Value> },
    /// Resolve by name at invocation time: the zero-parameter operation of
    /// that name wins, else the unique operation of that name.
    ByName(String),
    /// Resolve by best-match at invocation time, restricted to operations
    /// of `name` when given, else across all operations.
    MatchingArgs {
        name: Option<String>,
        args: Vec<Value>,
    },
}

impl InvocationStrategy {
    /// Auto-detect the single declared operation of a class.
    ///
    /// Needs only the descriptor, not an instance — which is why the
    /// engine runs this through a factory at compile time. Exactly one
    /// non-inherited operation must be declared (static counts: a
    /// static-only class with a single operation auto-detects fine);
    /// zero or several candidates fail the factory.
    pub fn auto_detect(descriptor: &ClassType) -> ScriptResult<Self> {
        let mut declared = descriptor
            .methods()
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_inherited());
        match (declared.next(), declared.next()) {
            (Some((method, _)), None) => Ok(InvocationStrategy::Bound {
                method,
                args: Vec::new(),
            }),
            (Some(_), Some(_)) => {
                let candidates = 2 + declared.count();
                Err(ambiguous_operation(descriptor.name(), candidates))
            }
            (None, _) => Err(no_operation_candidate(descriptor.name())),
        }
    }

    /// Resolve the named zero-argument (or unique same-named) operation at
    /// invocation time.
    pub fn by_name(name: impl Into<String>) -> Self {
        InvocationStrategy::ByName(name.into())
    }

    /// Resolve by best-match over all operations.
    pub fn by_matching(args: Vec<Value>) -> Self {
        InvocationStrategy::MatchingArgs { name: None, args }
    }

    /// Resolve by best-match over the operations of one name.
    pub fn by_named_matching(name: impl Into<String>, args: Vec<Value>) -> Self {
        InvocationStrategy::MatchingArgs {
            name: Some(name.into()),
            args,
        }
    }

    /// Invoke the selected operation on the given instance (none for
    /// static-only scripts) and return its result.
    pub fn execute(
        &self,
        class: &dyn LoadedClass,
        instance: Option<&mut Instance>,
    ) -> ScriptResult<Value> {
        let descriptor = class.descriptor();
        let empty: &[Value] = &[];
        let (method, args) = match self {
            InvocationStrategy::Bound { method, args } => (*method, args.as_slice()),
            InvocationStrategy::ByName(name) => (resolve_named(descriptor, name)?, empty),
            InvocationStrategy::MatchingArgs { name, args } => (
                resolve_matching(descriptor, name.as_deref(), args)?,
                args.as_slice(),
            ),
        };
        let signature = descriptor
            .methods()
            .get(method)
            .ok_or_else(|| no_matching_operation(descriptor.name(), None))?;
        if signature.is_static() {
            class.invoke(method, None, args)
        } else {
            match instance {
                Some(instance) => class.invoke(method, Some(instance), args),
                None => Err(missing_instance(&signature.name)),
            }
        }
    }
}

/// Resolve a `ByName` strategy against the descriptor.
fn resolve_named(descriptor: &ClassType, name: &str) -> ScriptResult<usize> {
    let mut sole = None;
    let mut count = 0usize;
    for index in descriptor.methods_named(name) {
        if descriptor.methods()[index].params.is_empty() {
            return Ok(index);
        }
        count += 1;
        if sole.is_none() {
            sole = Some(index);
        }
    }
    match (sole, count) {
        (Some(index), 1) => Ok(index),
        (Some(_), _) => Err(no_matching_operation(descriptor.name(), Some(name))),
        (None, _) => Err(no_such_operation(descriptor.name(), name)),
    }
}

/// Resolve a `MatchingArgs` strategy against the descriptor.
fn resolve_matching(
    descriptor: &ClassType,
    name: Option<&str>,
    args: &[Value],
) -> ScriptResult<usize> {
    let candidates: Vec<usize> = match name {
        Some(name) => descriptor.methods_named(name).collect(),
        None => (0..descriptor.methods().len()).collect(),
    };
    if let Some(name) = name {
        if candidates.is_empty() {
            return Err(no_such_operation(descriptor.name(), name));
        }
    }
    let position = best_match(
        candidates
            .iter()
            .map(|&index| descriptor.methods()[index].params.as_slice()),
        args,
    )
    .ok_or_else(|| no_matching_operation(descriptor.name(), name))?;
    Ok(candidates[position])
}

/// Deferred invocation-strategy construction.
///
/// Auto-detection needs the class descriptor (its operation list) but not
/// an instance, so the engine holds a factory and resolves it once per
/// compile, before evaluation.
pub trait InvocationStrategyFactory {
    /// Resolve a concrete strategy for the given class.
    fn resolve(&self, descriptor: &ClassType) -> ScriptResult<InvocationStrategy>;
}

impl<F> InvocationStrategyFactory for F
where
    F: Fn(&ClassType) -> ScriptResult<InvocationStrategy>,
{
    fn resolve(&self, descriptor: &ClassType) -> ScriptResult<InvocationStrategy> {
        self(descriptor)
    }
}

/// The default factory: auto-detection.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoDetectFactory;

impl InvocationStrategyFactory for AutoDetectFactory {
    fn resolve(&self, descriptor: &ClassType) -> ScriptResult<InvocationStrategy> {
        InvocationStrategy::auto_detect(descriptor)
    }
}

//! Kiln Engine - Compile-and-invoke engine for host-supplied class sources.
//!
//! A host hands the engine the source text of a single class. An external
//! toolchain (behind the `ScriptCompiler` trait) compiles it, an external
//! loader (behind `ClassLoader`/`LoadedClass`) exposes the result, and the
//! engine decides:
//! - which constructor produces the instance (`ConstructorStrategy`)
//! - which operation produces the result (`InvocationStrategy`)
//! - how the two-tier global/session variable environment is pushed into
//!   the instance's public attributes before each invocation and pulled
//!   back afterwards (`ScriptContext`, `CompiledScript`)
//!
//! Both selection problems share one best-match scorer over declared
//! signatures and supplied argument values (`signature::best_match`).
//!
//! # Threading
//!
//! Everything runs synchronously on the caller's thread. Scope maps are
//! `Rc`-shared and deliberately unsynchronized; callers needing concurrency
//! bring their own mutual exclusion.
//!
//! # Re-exports
//!
//! Value and descriptor types from `kiln_types` are re-exported for
//! convenience: `Value`, `TypeTag`, `ClassType`, `MethodSig`, `MethodFlags`,
//! `AttrSig`, `Signature`, `Specificity`.

mod backend;
mod bindings;
mod construct;
mod engine;
pub mod errors;
mod invoke;
mod script;
pub mod signature;
mod shared;

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
mod tests;

// Re-export descriptor and value types from kiln_types
pub use kiln_types::{
    AttrSig, ClassType, MethodFlags, MethodSig, Signature, Specificity, TypeTag, Value,
};

pub use backend::{Artifact, ClassLoader, Instance, LoadedClass, ScriptCompiler};
pub use bindings::{Bindings, ScriptContext};
pub use construct::ConstructorStrategy;
pub use engine::{ScriptEngine, DEFAULT_CLASS_NAME};
pub use errors::{ErrorCategory, ScriptError, ScriptErrorKind, ScriptResult};
pub use invoke::{AutoDetectFactory, InvocationStrategy, InvocationStrategyFactory};
pub use script::CompiledScript;
pub use shared::Shared;

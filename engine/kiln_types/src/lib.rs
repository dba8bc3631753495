//! Kiln Types - Runtime values and compiled-class descriptors.
//!
//! This crate is the shared vocabulary between the Kiln engine and the
//! external compiler/loader backends:
//! - `Value`: runtime values exchanged between the host, the variable
//!   environment, and compiled instances
//! - `TypeTag`: declared parameter/attribute/return types, with the
//!   compatibility and specificity rules used by signature matching
//! - `ClassType`: the immutable descriptor of a compiled class
//!   (constructors, operations, public attributes)
//!
//! No kiln_* dependencies: backends can depend on this crate without
//! pulling in the engine.

mod class;
mod tag;
mod value;

pub use class::{AttrSig, ClassType, MethodFlags, MethodSig, Signature};
pub use tag::{Specificity, TypeTag};
pub use value::Value;

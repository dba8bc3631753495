//! Declared types and the compatibility/specificity rules.
//!
//! A `TypeTag` is the declared type of a parameter, attribute, or return
//! position in a compiled-class descriptor. `TypeTag::accepts` is the single
//! source of truth for argument compatibility; the signature matcher sums
//! the resulting `Specificity` weights to rank candidates.

use std::fmt;

use crate::value::Value;

/// Declared type of a parameter, attribute, or return position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeTag {
    /// Top type: accepts every value (widening match).
    Any,
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Floating point. Accepts `Int` arguments by widening.
    Float,
    /// String.
    Str,
    /// List.
    List,
    /// A class reference by name. Only `Null` can be supplied for it
    /// across the host boundary.
    Class(String),
    /// No value. Valid only in return position; accepts nothing.
    Void,
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Any => write!(f, "any"),
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Int => write!(f, "int"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::Str => write!(f, "str"),
            TypeTag::List => write!(f, "list"),
            TypeTag::Class(name) => write!(f, "{name}"),
            TypeTag::Void => write!(f, "void"),
        }
    }
}

/// How precisely an argument matched a declared parameter type.
///
/// Ordered: `Exact` outranks `Widened`; `Neutral` (a null argument
/// against a reference type) contributes the same weight as a widening
/// match, so nulls never decide between otherwise equal candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Specificity {
    /// Null argument against a reference-like parameter.
    Neutral,
    /// Assignable-supertype match (`Any`, or `Int` into `Float`).
    Widened,
    /// Runtime type equals the declared type.
    Exact,
}

impl Specificity {
    /// Weight contributed to a candidate's total score.
    #[inline]
    pub fn weight(self) -> u32 {
        match self {
            Specificity::Exact => 2,
            Specificity::Widened | Specificity::Neutral => 1,
        }
    }
}

impl TypeTag {
    /// Whether a null argument is acceptable for this declared type.
    ///
    /// Primitives (`Bool`, `Int`, `Float`) reject null; reference-like
    /// types accept it.
    #[inline]
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            TypeTag::Any | TypeTag::Str | TypeTag::List | TypeTag::Class(_)
        )
    }

    /// Compatibility of a supplied argument with this declared type.
    ///
    /// Returns `None` when the argument cannot be passed at all, otherwise
    /// the specificity of the match.
    pub fn accepts(&self, value: &Value) -> Option<Specificity> {
        if value.is_null() {
            return self.is_reference().then_some(Specificity::Neutral);
        }
        match (self, value) {
            (TypeTag::Any, _) => Some(Specificity::Widened),
            (TypeTag::Bool, Value::Bool(_))
            | (TypeTag::Int, Value::Int(_))
            | (TypeTag::Float, Value::Float(_))
            | (TypeTag::Str, Value::Str(_))
            | (TypeTag::List, Value::List(_)) => Some(Specificity::Exact),
            (TypeTag::Float, Value::Int(_)) => Some(Specificity::Widened),
            _ => None,
        }
    }
}

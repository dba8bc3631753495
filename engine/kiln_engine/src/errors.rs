//! Error types for the Kiln engine.
//!
//! `ScriptErrorKind` provides the typed error categories; factory functions
//! (e.g. `compilation_failed()`, `unknown_attribute()`) are the public
//! construction surface and populate both `kind` and `message`.
//!
//! Every failure is reported synchronously as a typed `Err` — no retries,
//! no silent default values. `ErrorCategory` groups kinds into the six
//! failure classes callers branch on: a compile call fails as Compilation,
//! Load, Construction, or `InvocationFactory`; an evaluate call fails as
//! Binding or Invocation and leaves the script reusable.

use std::fmt;

use kiln_types::Value;

/// Result of an engine operation.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Coarse failure class, one per spec-level error kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The external toolchain rejected the source.
    Compilation,
    /// The artifact failed to resolve after successful compilation.
    Load,
    /// No instance could be produced.
    Construction,
    /// A deferred invocation strategy could not resolve against the class.
    InvocationFactory,
    /// The selected operation could not be resolved or raised.
    Invocation,
    /// An environment entry had no matching attribute during push.
    Binding,
}

/// Typed error category with structured payload.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptErrorKind {
    /// Diagnostic text from the external toolchain, surfaced verbatim.
    Compilation { diagnostics: String },
    /// The artifact could not be loaded.
    Load { message: String },

    /// No constructor matched the supplied arguments.
    NoMatchingConstructor { class: String, supplied: usize },
    /// The selected constructor raised.
    ConstructorRaised { class: String, message: String },

    /// Auto-detection found no declared operation.
    NoOperationCandidate { class: String },
    /// Auto-detection found more than one declared operation.
    AmbiguousOperation { class: String, candidates: usize },

    /// No operation with the requested name exists.
    NoSuchOperation { class: String, name: String },
    /// No operation matched the supplied arguments.
    NoMatchingOperation { class: String, name: Option<String> },
    /// The invoked operation raised.
    OperationRaised { name: String, message: String },
    /// An instance operation was invoked without an instance.
    MissingInstance { name: String },

    /// An environment entry named no declared attribute.
    UnknownAttribute { class: String, name: String },
    /// A non-empty environment was pushed at a static-only script.
    StaticPush { name: String },
    /// An attribute value did not fit the declared attribute type.
    AttributeTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },
}

impl ScriptErrorKind {
    /// The coarse failure class of this kind.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Compilation { .. } => ErrorCategory::Compilation,
            Self::Load { .. } => ErrorCategory::Load,
            Self::NoMatchingConstructor { .. } | Self::ConstructorRaised { .. } => {
                ErrorCategory::Construction
            }
            Self::NoOperationCandidate { .. } | Self::AmbiguousOperation { .. } => {
                ErrorCategory::InvocationFactory
            }
            Self::NoSuchOperation { .. }
            | Self::NoMatchingOperation { .. }
            | Self::OperationRaised { .. }
            | Self::MissingInstance { .. } => ErrorCategory::Invocation,
            Self::UnknownAttribute { .. }
            | Self::StaticPush { .. }
            | Self::AttributeTypeMismatch { .. } => ErrorCategory::Binding,
        }
    }
}

impl fmt::Display for ScriptErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compilation { diagnostics } => write!(f, "{diagnostics}"),
            Self::Load { message } => write!(f, "load failed: {message}"),

            Self::NoMatchingConstructor { class, supplied } => {
                let arg_word = if *supplied == 1 { "argument" } else { "arguments" };
                write!(
                    f,
                    "no constructor of {class} matches {supplied} {arg_word}"
                )
            }
            Self::ConstructorRaised { class, message } => {
                write!(f, "constructor of {class} raised: {message}")
            }

            Self::NoOperationCandidate { class } => {
                write!(f, "no declared operation on {class} to auto-detect")
            }
            Self::AmbiguousOperation { class, candidates } => {
                write!(
                    f,
                    "auto-detection is ambiguous: {class} declares {candidates} operations"
                )
            }

            Self::NoSuchOperation { class, name } => {
                write!(f, "no operation '{name}' on {class}")
            }
            Self::NoMatchingOperation { class, name } => match name {
                Some(name) => write!(
                    f,
                    "no overload of '{name}' on {class} matches the supplied arguments"
                ),
                None => write!(
                    f,
                    "no operation on {class} matches the supplied arguments"
                ),
            },
            Self::OperationRaised { name, message } => {
                write!(f, "operation '{name}' raised: {message}")
            }
            Self::MissingInstance { name } => {
                write!(f, "operation '{name}' requires an instance, but none was constructed")
            }

            Self::UnknownAttribute { class, name } => {
                write!(f, "no public attribute '{name}' on {class}")
            }
            Self::StaticPush { name } => {
                write!(
                    f,
                    "cannot push variable '{name}': script has no instance"
                )
            }
            Self::AttributeTypeMismatch {
                name,
                expected,
                got,
            } => {
                write!(
                    f,
                    "attribute '{name}' expects {expected}, got {got}"
                )
            }
        }
    }
}

/// Engine error.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptError {
    /// Structured error category.
    pub kind: ScriptErrorKind,
    /// Human-readable error message; equals `kind.to_string()`.
    pub message: String,
}

impl ScriptError {
    /// Create an error from a structured kind.
    ///
    /// Used internally by the factory functions.
    fn from_kind(kind: ScriptErrorKind) -> Self {
        let message = kind.to_string();
        ScriptError { kind, message }
    }

    /// The coarse failure class of this error.
    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ScriptError {}

// Factory functions

/// The external toolchain rejected the source; `diagnostics` is surfaced
/// verbatim.
pub fn compilation_failed(diagnostics: impl Into<String>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::Compilation {
        diagnostics: diagnostics.into(),
    })
}

/// The artifact failed to resolve after successful compilation.
pub fn load_failed(message: impl Into<String>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::Load {
        message: message.into(),
    })
}

/// No constructor matched the supplied argument count/types.
pub fn no_matching_constructor(class: impl Into<String>, supplied: usize) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::NoMatchingConstructor {
        class: class.into(),
        supplied,
    })
}

/// The selected constructor raised during construction.
pub fn constructor_raised(class: impl Into<String>, message: impl Into<String>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::ConstructorRaised {
        class: class.into(),
        message: message.into(),
    })
}

/// Auto-detection found no declared operation.
pub fn no_operation_candidate(class: impl Into<String>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::NoOperationCandidate {
        class: class.into(),
    })
}

/// Auto-detection found more than one declared operation.
pub fn ambiguous_operation(class: impl Into<String>, candidates: usize) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::AmbiguousOperation {
        class: class.into(),
        candidates,
    })
}

/// No operation with the requested name exists on the class.
pub fn no_such_operation(class: impl Into<String>, name: impl Into<String>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::NoSuchOperation {
        class: class.into(),
        name: name.into(),
    })
}

/// No operation matched the supplied arguments.
pub fn no_matching_operation(class: impl Into<String>, name: Option<&str>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::NoMatchingOperation {
        class: class.into(),
        name: name.map(str::to_string),
    })
}

/// The invoked operation raised.
pub fn operation_raised(name: impl Into<String>, message: impl Into<String>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::OperationRaised {
        name: name.into(),
        message: message.into(),
    })
}

/// An instance operation was invoked but the script holds no instance.
pub fn missing_instance(name: impl Into<String>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::MissingInstance { name: name.into() })
}

/// An environment entry named no declared attribute during push.
pub fn unknown_attribute(class: impl Into<String>, name: impl Into<String>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::UnknownAttribute {
        class: class.into(),
        name: name.into(),
    })
}

/// A non-empty environment was pushed at a script with no instance.
pub fn static_push(name: impl Into<String>) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::StaticPush { name: name.into() })
}

/// An attribute value did not fit the declared attribute type.
pub fn attribute_type_mismatch(
    name: impl Into<String>,
    expected: impl Into<String>,
    got: &Value,
) -> ScriptError {
    ScriptError::from_kind(ScriptErrorKind::AttributeTypeMismatch {
        name: name.into(),
        expected: expected.into(),
        got: got.type_name().to_string(),
    })
}

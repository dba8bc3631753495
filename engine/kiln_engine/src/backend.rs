//! External collaborator seams: compiler, loader, and loaded classes.
//!
//! The engine never inspects compiled code itself. An external toolchain
//! turns source text into an opaque `Artifact`; an external loader turns
//! the artifact into a `LoadedClass`, which exposes the class descriptor
//! plus a small capability set (construct / invoke / get-attribute /
//! set-attribute). Keeping attribute access on the loader keeps the
//! variable-environment logic free of backend-specific reflection.

use std::any::Any;
use std::rc::Rc;

use kiln_types::{ClassType, Value};

use crate::errors::ScriptResult;

/// Opaque compiled artifact, passed from a compiler to its paired loader.
///
/// The payload type is a private contract between the two backends; the
/// engine only transports it.
pub struct Artifact(Box<dyn Any>);

impl Artifact {
    /// Wrap a backend payload.
    pub fn new<T: Any>(payload: T) -> Self {
        Artifact(Box::new(payload))
    }

    /// Recover the payload, or get the artifact back when the type does
    /// not match (a foreign artifact reached the wrong loader).
    pub fn downcast<T: Any>(self) -> Result<Box<T>, Artifact> {
        self.0.downcast::<T>().map_err(Artifact)
    }
}

/// Opaque instance state, owned by exactly one compiled script.
///
/// Only the loader backend that produced the instance knows its concrete
/// type; the engine mutates it exclusively through the `LoadedClass`
/// capability set.
pub struct Instance(Box<dyn Any>);

impl Instance {
    /// Wrap backend instance state.
    pub fn new<T: Any>(state: T) -> Self {
        Instance(Box::new(state))
    }

    /// Borrow the state as a concrete type.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Mutably borrow the state as a concrete type.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.downcast_mut::<T>()
    }
}

/// The external compiler toolchain.
pub trait ScriptCompiler {
    /// Compile one class source. Failure carries the toolchain's
    /// diagnostic text verbatim (`ScriptErrorKind::Compilation`).
    fn compile(&self, class_name: &str, source: &str) -> ScriptResult<Artifact>;
}

/// The external artifact loader.
pub trait ClassLoader {
    /// Resolve a compiled artifact into a loaded class
    /// (`ScriptErrorKind::Load` on failure).
    fn load(&self, artifact: Artifact) -> ScriptResult<Rc<dyn LoadedClass>>;
}

/// A loaded, executable class.
///
/// Constructors and operations are addressed by index into the
/// descriptor's declared-order lists, which pins the engine's
/// deterministic first-wins selection to load order.
pub trait LoadedClass {
    /// The immutable class descriptor.
    fn descriptor(&self) -> &ClassType;

    /// Run the constructor at `constructor` with the given arguments.
    /// Whatever error the backend reports here reaches callers as
    /// `ScriptErrorKind::ConstructorRaised`.
    fn construct(&self, constructor: usize, args: &[Value]) -> ScriptResult<Instance>;

    /// Invoke the operation at `method`. Static operations are invoked
    /// with no instance.
    fn invoke(
        &self,
        method: usize,
        instance: Option<&mut Instance>,
        args: &[Value],
    ) -> ScriptResult<Value>;

    /// Read a public attribute from the instance.
    fn get_attribute(&self, instance: &Instance, name: &str) -> ScriptResult<Value>;

    /// Write a public attribute on the instance.
    fn set_attribute(&self, instance: &mut Instance, name: &str, value: Value)
        -> ScriptResult<()>;
}

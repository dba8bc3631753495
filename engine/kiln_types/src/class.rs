//! Compiled-class descriptors.
//!
//! A `ClassType` is the loader's static description of a compiled artifact:
//! its constructors, operations, and public attributes, in declared order.
//! Descriptors are immutable once produced, and declared order is load
//! order — the matcher's first-wins tie-break is pinned to it.

use bitflags::bitflags;

use crate::tag::TypeTag;

bitflags! {
    /// Properties of a declared operation.
    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    pub struct MethodFlags: u8 {
        /// Invocable without an instance.
        const STATIC = 1 << 0;
        /// Inherited rather than declared on the class itself.
        /// Excluded from auto-detection.
        const INHERITED = 1 << 1;
    }
}

/// A constructor signature: an ordered parameter-type list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Declared parameter types, in order.
    pub params: Vec<TypeTag>,
}

impl Signature {
    /// Create a signature from its parameter types.
    #[inline]
    pub fn new(params: Vec<TypeTag>) -> Self {
        Signature { params }
    }

    /// Number of parameters.
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A declared operation on a compiled class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSig {
    /// Operation name.
    pub name: String,
    /// Declared parameter types, in order.
    pub params: Vec<TypeTag>,
    /// Declared return type (`Void` for none).
    pub ret: TypeTag,
    /// Static/inherited properties.
    pub flags: MethodFlags,
}

impl MethodSig {
    /// Create an instance operation with no flags set.
    pub fn new(name: impl Into<String>, params: Vec<TypeTag>, ret: TypeTag) -> Self {
        MethodSig {
            name: name.into(),
            params,
            ret,
            flags: MethodFlags::empty(),
        }
    }

    /// Replace the flag set.
    #[must_use]
    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether the operation is static.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    /// Whether the operation is inherited rather than declared.
    #[inline]
    pub fn is_inherited(&self) -> bool {
        self.flags.contains(MethodFlags::INHERITED)
    }
}

/// A public attribute on a compiled class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrSig {
    /// Attribute name.
    pub name: String,
    /// Declared attribute type.
    pub tag: TypeTag,
}

impl AttrSig {
    /// Create an attribute signature.
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        AttrSig {
            name: name.into(),
            tag,
        }
    }
}

/// Immutable descriptor of a compiled class.
///
/// Produced by a loader backend after successful compilation; never mutated
/// afterwards. Constructors and operations are addressed by index into the
/// declared-order lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassType {
    name: String,
    constructors: Vec<Signature>,
    methods: Vec<MethodSig>,
    attributes: Vec<AttrSig>,
}

impl ClassType {
    /// Create a descriptor from its declared-order parts.
    pub fn new(
        name: impl Into<String>,
        constructors: Vec<Signature>,
        methods: Vec<MethodSig>,
        attributes: Vec<AttrSig>,
    ) -> Self {
        ClassType {
            name: name.into(),
            constructors,
            methods,
            attributes,
        }
    }

    /// Class name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared constructors, in order.
    #[inline]
    pub fn constructors(&self) -> &[Signature] {
        &self.constructors
    }

    /// Declared operations, in order.
    #[inline]
    pub fn methods(&self) -> &[MethodSig] {
        &self.methods
    }

    /// Declared public attributes, in order.
    #[inline]
    pub fn attributes(&self) -> &[AttrSig] {
        &self.attributes
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttrSig> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Whether an attribute of this name is declared.
    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Index of the zero-parameter constructor, if one is declared.
    pub fn zero_arg_constructor(&self) -> Option<usize> {
        self.constructors.iter().position(|sig| sig.arity() == 0)
    }

    /// Whether every declared operation is static.
    ///
    /// Such a class can be used without ever constructing an instance.
    pub fn is_static_only(&self) -> bool {
        self.methods.iter().all(MethodSig::is_static)
    }

    /// Indices of operations with the given name, in declared order.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.methods
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.name == name)
            .map(|(index, _)| index)
    }
}

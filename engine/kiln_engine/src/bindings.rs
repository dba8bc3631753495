//! Named-value bindings and the two-tier evaluation context.
//!
//! `Bindings` is one flat name→value map. `ScriptContext` layers two of
//! them: a *global* scope shared by every script the engine produces, and a
//! *session* scope local to one evaluation context. Merging and the
//! asymmetric write-back rule live here so the script evaluation code
//! stays free of scope bookkeeping.

use rustc_hash::FxHashMap;

use kiln_types::Value;

use crate::shared::Shared;

/// A flat named-value map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    entries: FxHashMap<String, Value>,
}

impl Bindings {
    /// Create an empty bindings map.
    pub fn new() -> Self {
        Bindings {
            entries: FxHashMap::default(),
        }
    }

    /// Insert or replace a binding.
    #[inline]
    pub fn put(&mut self, name: impl Into<String>, value: Value) {
        self.entries.insert(name.into(), value);
    }

    /// Look up a binding by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
    }

    /// Whether a binding of this name exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove a binding, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    /// Number of bindings.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

/// The two-tier global/session evaluation context.
///
/// Cloning a context clones the `Rc` handles, not the maps: clones observe
/// each other's writes. This is how every script compiled by one engine
/// shares the engine's global scope.
#[derive(Clone, Debug, Default)]
pub struct ScriptContext {
    global: Shared<Bindings>,
    session: Shared<Bindings>,
}

impl ScriptContext {
    /// Create a context with fresh, empty scopes.
    pub fn new() -> Self {
        ScriptContext::default()
    }

    /// Create a context over existing scope handles.
    pub fn with_scopes(global: Shared<Bindings>, session: Shared<Bindings>) -> Self {
        ScriptContext { global, session }
    }

    /// The global scope handle.
    #[inline]
    pub fn global(&self) -> &Shared<Bindings> {
        &self.global
    }

    /// The session scope handle.
    #[inline]
    pub fn session(&self) -> &Shared<Bindings> {
        &self.session
    }

    /// Build the merged push map: every global entry, overlaid by every
    /// session entry (session wins on key collision).
    pub fn merged(&self) -> FxHashMap<String, Value> {
        let mut merged = FxHashMap::default();
        for (name, value) in self.global.borrow().iter() {
            merged.insert(name.clone(), value.clone());
        }
        for (name, value) in self.session.borrow().iter() {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }

    /// Write a pulled attribute back using scope resolution: the global
    /// scope receives the value iff the session scope does not contain the
    /// name and the global scope does; otherwise the session scope receives
    /// it (creating the key there if absent).
    ///
    /// A variable first declared only globally therefore keeps landing in
    /// the global scope on every evaluation until a session entry shadows
    /// it; a variable unknown to both scopes becomes session-local.
    pub fn write_back(&self, name: &str, value: Value) {
        let in_session = self.session.borrow().contains(name);
        if !in_session && self.global.borrow().contains(name) {
            self.global.borrow_mut().put(name, value);
        } else {
            self.session.borrow_mut().put(name, value);
        }
    }
}

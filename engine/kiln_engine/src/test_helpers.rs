//! Shared test fixtures: an in-memory compiler/loader backend.
//!
//! "Classes" here are Rust closures over an attribute map, registered
//! against their source text. `MemoryCompiler` resolves source text to a
//! registered class definition (unregistered text fails with diagnostic
//! text, standing in for a real toolchain's rejections); `MemoryLoader`
//! turns the artifact into a `LoadedClass`.

#![allow(
    clippy::unwrap_used,
    reason = "fixture closures use unwrap for brevity; state shape is fixed by the fixture itself"
)]

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use kiln_types::{AttrSig, ClassType, MethodFlags, MethodSig, Signature, TypeTag, Value};

use crate::backend::{Artifact, ClassLoader, Instance, LoadedClass, ScriptCompiler};
use crate::engine::ScriptEngine;
use crate::errors::{
    compilation_failed, load_failed, operation_raised, unknown_attribute, ScriptResult,
};

/// Instance state of a memory class: its attribute map.
pub(crate) type AttrMap = FxHashMap<String, Value>;

type InitFn = Box<dyn Fn(usize, &[Value]) -> ScriptResult<AttrMap>>;
type CallFn = Box<dyn Fn(usize, Option<&mut AttrMap>, &[Value]) -> ScriptResult<Value>>;

/// A programmable class: descriptor plus construction/invocation behavior.
pub(crate) struct ClassDef {
    descriptor: ClassType,
    init: InitFn,
    call: CallFn,
}

impl ClassDef {
    pub(crate) fn new(descriptor: ClassType, init: InitFn, call: CallFn) -> Rc<Self> {
        Rc::new(ClassDef {
            descriptor,
            init,
            call,
        })
    }
}

/// A loaded memory class.
struct MemoryClass {
    def: Rc<ClassDef>,
}

impl LoadedClass for MemoryClass {
    fn descriptor(&self) -> &ClassType {
        &self.def.descriptor
    }

    fn construct(&self, constructor: usize, args: &[Value]) -> ScriptResult<Instance> {
        let state = (self.def.init)(constructor, args)?;
        Ok(Instance::new(state))
    }

    fn invoke(
        &self,
        method: usize,
        instance: Option<&mut Instance>,
        args: &[Value],
    ) -> ScriptResult<Value> {
        let state = match instance {
            Some(instance) => Some(
                instance
                    .downcast_mut::<AttrMap>()
                    .ok_or_else(|| load_failed("foreign instance state"))?,
            ),
            None => None,
        };
        (self.def.call)(method, state, args)
    }

    fn get_attribute(&self, instance: &Instance, name: &str) -> ScriptResult<Value> {
        let state = instance
            .downcast_ref::<AttrMap>()
            .ok_or_else(|| load_failed("foreign instance state"))?;
        state
            .get(name)
            .cloned()
            .ok_or_else(|| unknown_attribute(self.def.descriptor.name(), name))
    }

    fn set_attribute(
        &self,
        instance: &mut Instance,
        name: &str,
        value: Value,
    ) -> ScriptResult<()> {
        if !self.def.descriptor.has_attribute(name) {
            return Err(unknown_attribute(self.def.descriptor.name(), name));
        }
        let state = instance
            .downcast_mut::<AttrMap>()
            .ok_or_else(|| load_failed("foreign instance state"))?;
        state.insert(name.to_string(), value);
        Ok(())
    }
}

/// Compiler resolving source text against registered class definitions.
pub(crate) struct MemoryCompiler {
    classes: RefCell<FxHashMap<String, Rc<ClassDef>>>,
}

impl MemoryCompiler {
    pub(crate) fn new() -> Self {
        MemoryCompiler {
            classes: RefCell::new(FxHashMap::default()),
        }
    }

    pub(crate) fn register(&self, source: &str, def: Rc<ClassDef>) {
        self.classes.borrow_mut().insert(source.to_string(), def);
    }
}

impl ScriptCompiler for MemoryCompiler {
    fn compile(&self, class_name: &str, source: &str) -> ScriptResult<Artifact> {
        match self.classes.borrow().get(source) {
            Some(def) => Ok(Artifact::new(Rc::clone(def))),
            None => Err(compilation_failed(format!(
                "{class_name}:1: error: cannot resolve symbol"
            ))),
        }
    }
}

/// Loader turning memory artifacts into loaded classes.
pub(crate) struct MemoryLoader;

impl ClassLoader for MemoryLoader {
    fn load(&self, artifact: Artifact) -> ScriptResult<Rc<dyn LoadedClass>> {
        let def = artifact
            .downcast::<Rc<ClassDef>>()
            .map_err(|_| load_failed("artifact was not produced by this toolchain"))?;
        Ok(Rc::new(MemoryClass { def: *def }))
    }
}

/// Build an engine over a fresh memory backend with the given sources
/// registered.
pub(crate) fn engine_with(classes: Vec<(&str, Rc<ClassDef>)>) -> ScriptEngine {
    let compiler = Rc::new(MemoryCompiler::new());
    for (source, def) in classes {
        compiler.register(source, def);
    }
    ScriptEngine::new(compiler, Rc::new(MemoryLoader))
}

// Stock classes

pub(crate) const COUNTING_SOURCE: &str =
    "class Script { str message = \"Counting\"; int counter = 1; \
     str get_message() { return message + \" #\" + counter++; } }";

/// The end-to-end scenario class: public `message`/`counter` attributes and
/// one operation returning `message + " #" + counter++`.
pub(crate) fn counting_class() -> Rc<ClassDef> {
    let descriptor = ClassType::new(
        "Script",
        vec![Signature::new(vec![])],
        vec![MethodSig::new("get_message", vec![], TypeTag::Str)],
        vec![
            AttrSig::new("message", TypeTag::Str),
            AttrSig::new("counter", TypeTag::Int),
        ],
    );
    ClassDef::new(
        descriptor,
        Box::new(|_, _| {
            let mut state = AttrMap::default();
            state.insert("message".to_string(), Value::string("Counting"));
            state.insert("counter".to_string(), Value::int(1));
            Ok(state)
        }),
        Box::new(|_, state, _| {
            let state = state.unwrap();
            let message = state.get("message").unwrap().clone();
            let counter = state.get("counter").unwrap().as_int().unwrap();
            state.insert("counter".to_string(), Value::int(counter + 1));
            Ok(Value::string(format!("{message} #{counter}")))
        }),
    )
}

pub(crate) const OVERLOAD_SOURCE: &str =
    "class Script { str op(any a, int b) {..} str op(str a, int b) {..} }";

/// Two same-named overloads, `op(any, int)` and `op(str, int)`, each
/// reporting which one ran.
pub(crate) fn overload_class() -> Rc<ClassDef> {
    let descriptor = ClassType::new(
        "Script",
        vec![Signature::new(vec![])],
        vec![
            MethodSig::new("op", vec![TypeTag::Any, TypeTag::Int], TypeTag::Str),
            MethodSig::new("op", vec![TypeTag::Str, TypeTag::Int], TypeTag::Str),
        ],
        vec![],
    );
    ClassDef::new(
        descriptor,
        Box::new(|_, _| Ok(AttrMap::default())),
        Box::new(|method, _, args| {
            let which = if method == 0 { "any" } else { "str" };
            Ok(Value::string(format!("{which}:{}{}", args[0], args[1])))
        }),
    )
}

pub(crate) const GREETER_SOURCE: &str =
    "class Script { Script(str message, int value) {..} str get_message() {..} }";

/// A class constructible only through a `(str, int)` constructor.
pub(crate) fn greeter_class() -> Rc<ClassDef> {
    let descriptor = ClassType::new(
        "Script",
        vec![Signature::new(vec![TypeTag::Str, TypeTag::Int])],
        vec![MethodSig::new("get_message", vec![], TypeTag::Str)],
        vec![],
    );
    ClassDef::new(
        descriptor,
        Box::new(|_, args| {
            let mut state = AttrMap::default();
            state.insert("greeting".to_string(), args[0].clone());
            state.insert("value".to_string(), args[1].clone());
            Ok(state)
        }),
        Box::new(|_, state, _| {
            let state = state.unwrap();
            let greeting = state.get("greeting").unwrap();
            let value = state.get("value").unwrap();
            Ok(Value::string(format!("Message: {greeting}{value}")))
        }),
    )
}

pub(crate) const FIRST_MATCH_SOURCE: &str =
    "class Script { Script(any v) {..} Script(str v) {..} str chosen; }";

/// Two constructors, `(any)` then `(str)`, recording which one ran in the
/// public `chosen` attribute.
pub(crate) fn first_match_class() -> Rc<ClassDef> {
    let descriptor = ClassType::new(
        "Script",
        vec![
            Signature::new(vec![TypeTag::Any]),
            Signature::new(vec![TypeTag::Str]),
        ],
        vec![MethodSig::new("get_chosen", vec![], TypeTag::Str)],
        vec![AttrSig::new("chosen", TypeTag::Str)],
    );
    ClassDef::new(
        descriptor,
        Box::new(|constructor, _| {
            let mut state = AttrMap::default();
            state.insert(
                "chosen".to_string(),
                Value::string(format!("ctor{constructor}")),
            );
            Ok(state)
        }),
        Box::new(|_, state, _| Ok(state.unwrap().get("chosen").unwrap().clone())),
    )
}

pub(crate) const NAMED_SOURCE: &str =
    "class Script { str greet(str who) {..} str greet() {..} }";

/// Two `greet` overloads with the zero-parameter one declared second, for
/// by-name resolution tests.
pub(crate) fn named_class() -> Rc<ClassDef> {
    let descriptor = ClassType::new(
        "Script",
        vec![Signature::new(vec![])],
        vec![
            MethodSig::new("greet", vec![TypeTag::Str], TypeTag::Str),
            MethodSig::new("greet", vec![], TypeTag::Str),
        ],
        vec![],
    );
    ClassDef::new(
        descriptor,
        Box::new(|_, _| Ok(AttrMap::default())),
        Box::new(|method, _, args| {
            if method == 0 {
                Ok(Value::string(format!("hello {}", args[0])))
            } else {
                Ok(Value::string("hello"))
            }
        }),
    )
}

pub(crate) const STATIC_SOURCE: &str = "class Script { static str ping() { return \"pong\"; } }";

/// A class with no constructors and a single static operation.
pub(crate) fn static_only_class() -> Rc<ClassDef> {
    let descriptor = ClassType::new(
        "Script",
        vec![],
        vec![MethodSig::new("ping", vec![], TypeTag::Str).with_flags(MethodFlags::STATIC)],
        vec![],
    );
    ClassDef::new(
        descriptor,
        Box::new(|_, _| Ok(AttrMap::default())),
        Box::new(|_, state, _| {
            assert!(state.is_none(), "static operation must run without instance");
            Ok(Value::string("pong"))
        }),
    )
}

pub(crate) const FAILING_SOURCE: &str = "class Script { void boom() { throw ..; } }";

/// A class whose single operation always raises.
pub(crate) fn failing_class() -> Rc<ClassDef> {
    let descriptor = ClassType::new(
        "Script",
        vec![Signature::new(vec![])],
        vec![MethodSig::new("boom", vec![], TypeTag::Void)],
        vec![],
    );
    ClassDef::new(
        descriptor,
        Box::new(|_, _| Ok(AttrMap::default())),
        Box::new(|_, _, _| Err(operation_raised("boom", "user code raised"))),
    )
}

//! The script engine: compilation orchestration and default policies.

use std::rc::Rc;

use kiln_types::Value;

use crate::backend::{ClassLoader, ScriptCompiler};
use crate::bindings::{Bindings, ScriptContext};
use crate::construct::ConstructorStrategy;
use crate::errors::ScriptResult;
use crate::invoke::{AutoDetectFactory, InvocationStrategyFactory};
use crate::script::CompiledScript;
use crate::shared::Shared;

/// Class name assumed when the caller does not declare one.
pub const DEFAULT_CLASS_NAME: &str = "Script";

/// The engine: owns the external compiler/loader handles, the default
/// construction and invocation policies, and the canonical global/session
/// scope pair for its lifetime.
///
/// Every `CompiledScript` it produces shares the engine's global scope;
/// that sharing is the mechanism for "static/shared state" variables
/// across scripts.
pub struct ScriptEngine {
    compiler: Rc<dyn ScriptCompiler>,
    loader: Rc<dyn ClassLoader>,
    constructor_strategy: ConstructorStrategy,
    strategy_factory: Rc<dyn InvocationStrategyFactory>,
    context: ScriptContext,
}

impl ScriptEngine {
    /// Create an engine over a compiler/loader pair, with the default
    /// policies: no-argument construction and auto-detect invocation.
    pub fn new(compiler: Rc<dyn ScriptCompiler>, loader: Rc<dyn ClassLoader>) -> Self {
        ScriptEngine {
            compiler,
            loader,
            constructor_strategy: ConstructorStrategy::default(),
            strategy_factory: Rc::new(AutoDetectFactory),
            context: ScriptContext::new(),
        }
    }

    /// Replace the construction policy for subsequent compiles.
    pub fn set_constructor_strategy(&mut self, strategy: ConstructorStrategy) {
        self.constructor_strategy = strategy;
    }

    /// Replace the invocation-strategy factory for subsequent compiles.
    pub fn set_strategy_factory(&mut self, factory: Rc<dyn InvocationStrategyFactory>) {
        self.strategy_factory = factory;
    }

    /// The engine's context.
    #[inline]
    pub fn context(&self) -> &ScriptContext {
        &self.context
    }

    /// Replace the engine's context.
    pub fn set_context(&mut self, context: ScriptContext) {
        self.context = context;
    }

    /// The engine's global scope handle.
    #[inline]
    pub fn global(&self) -> &Shared<Bindings> {
        self.context.global()
    }

    /// The engine's session scope handle.
    #[inline]
    pub fn session(&self) -> &Shared<Bindings> {
        self.context.session()
    }

    /// Put a variable into the engine's session scope.
    pub fn put(&self, name: impl Into<String>, value: Value) {
        self.context.session().borrow_mut().put(name, value);
    }

    /// Read a variable from the engine's session scope.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.context.session().borrow().get(name)
    }

    /// Create an empty scope handle, for caller-managed sessions.
    pub fn new_bindings() -> Shared<Bindings> {
        Shared::default()
    }

    /// Compile a source whose class is named [`DEFAULT_CLASS_NAME`].
    pub fn compile(&self, source: &str) -> ScriptResult<CompiledScript> {
        self.compile_named(DEFAULT_CLASS_NAME, source)
    }

    /// Compile one class source into a reusable script.
    ///
    /// Orchestration: external toolchain → external loader → construction
    /// strategy → invocation-strategy factory. Any stage failing fails the
    /// whole compile with that stage's typed error.
    #[tracing::instrument(level = "debug", skip_all, fields(class = class_name))]
    pub fn compile_named(&self, class_name: &str, source: &str) -> ScriptResult<CompiledScript> {
        let artifact = self.compiler.compile(class_name, source)?;
        let class = self.loader.load(artifact)?;
        let instance = self.constructor_strategy.construct(class.as_ref())?;
        let strategy = self.strategy_factory.resolve(class.descriptor())?;
        tracing::debug!(
            class = class.descriptor().name(),
            has_instance = instance.is_some(),
            "script compiled"
        );
        Ok(CompiledScript::new(
            class,
            instance,
            strategy,
            self.context.clone(),
        ))
    }

    /// Compile and evaluate in one step, against the engine's context.
    ///
    /// Unlike reusing a `CompiledScript`, every call constructs a fresh
    /// instance.
    pub fn eval(&self, source: &str) -> ScriptResult<Value> {
        self.compile(source)?.eval()
    }

    /// Compile and evaluate against the engine's global scope paired with
    /// a caller-supplied session scope.
    pub fn eval_with_session(
        &self,
        source: &str,
        session: &Shared<Bindings>,
    ) -> ScriptResult<Value> {
        self.compile(source)?.eval_with_session(session)
    }
}

//! Compiled scripts and the push/invoke/pull evaluation sequence.

use std::fmt;
use std::rc::Rc;

use kiln_types::{ClassType, Value};

use crate::backend::{Instance, LoadedClass};
use crate::bindings::{Bindings, ScriptContext};
use crate::errors::{attribute_type_mismatch, static_push, unknown_attribute, ScriptResult};
use crate::invoke::InvocationStrategy;
use crate::shared::Shared;

/// A compiled, reusable script: a loaded class, its single instance (or
/// none, for static-only usage), and the invocation strategy selected for
/// it.
///
/// Each `eval` call reuses the same instance, so attribute state the
/// operations mutate persists across evaluations unless the environment
/// push overwrites it.
pub struct CompiledScript {
    class: Rc<dyn LoadedClass>,
    instance: Option<Instance>,
    strategy: InvocationStrategy,
    context: ScriptContext,
}

impl fmt::Debug for CompiledScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledScript")
            .field("class", &self.class.descriptor().name())
            .field("has_instance", &self.instance.is_some())
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl CompiledScript {
    pub(crate) fn new(
        class: Rc<dyn LoadedClass>,
        instance: Option<Instance>,
        strategy: InvocationStrategy,
        context: ScriptContext,
    ) -> Self {
        CompiledScript {
            class,
            instance,
            strategy,
            context,
        }
    }

    /// The compiled class descriptor.
    #[inline]
    pub fn descriptor(&self) -> &ClassType {
        self.class.descriptor()
    }

    /// The instance, or `None` for a static-only script.
    #[inline]
    pub fn instance(&self) -> Option<&Instance> {
        self.instance.as_ref()
    }

    /// Replace the invocation strategy for subsequent evaluations.
    pub fn set_strategy(&mut self, strategy: InvocationStrategy) {
        self.strategy = strategy;
    }

    /// Evaluate against the engine's context (the engine's global and
    /// session scopes).
    pub fn eval(&mut self) -> ScriptResult<Value> {
        let context = self.context.clone();
        self.eval_with(&context)
    }

    /// Evaluate against the engine's global scope paired with a
    /// caller-supplied session scope.
    pub fn eval_with_session(&mut self, session: &Shared<Bindings>) -> ScriptResult<Value> {
        let context = ScriptContext::with_scopes(self.context.global().clone(), session.clone());
        self.eval_with(&context)
    }

    /// Evaluate against an explicit context.
    ///
    /// The sequence per call: merge the global and session scopes (session
    /// wins on collision), push every merged entry into the instance's
    /// public attributes, invoke via the strategy, pull every public
    /// attribute back into the context under scope resolution.
    ///
    /// A push failure aborts before invocation; entries already pushed at
    /// that point stay written. Which entry fails first follows the merged
    /// map's iteration order, which is unspecified. An invocation failure
    /// skips the pull but leaves the script reusable.
    pub fn eval_with(&mut self, context: &ScriptContext) -> ScriptResult<Value> {
        self.push(context)?;
        let result = self
            .strategy
            .execute(self.class.as_ref(), self.instance.as_mut())?;
        self.pull(context)?;
        Ok(result)
    }

    /// Write every merged environment entry into the matching public
    /// attribute. An entry with no matching attribute is a binding error.
    fn push(&mut self, context: &ScriptContext) -> ScriptResult<()> {
        let merged = context.merged();
        if merged.is_empty() {
            return Ok(());
        }
        let Some(instance) = self.instance.as_mut() else {
            // No instance to receive attribute writes. Which entry is
            // named follows map iteration order.
            let name = merged.keys().next().map(String::as_str).unwrap_or_default();
            return Err(static_push(name));
        };
        let descriptor = self.class.descriptor();
        for (name, value) in merged {
            let Some(attr) = descriptor.attribute(&name) else {
                return Err(unknown_attribute(descriptor.name(), name));
            };
            if attr.tag.accepts(&value).is_none() {
                return Err(attribute_type_mismatch(&name, attr.tag.to_string(), &value));
            }
            tracing::trace!(attribute = %name, value = %value, "push");
            self.class.set_attribute(instance, &name, value)?;
        }
        Ok(())
    }

    /// Read every public attribute back into the context under scope
    /// resolution, in declared order.
    fn pull(&self, context: &ScriptContext) -> ScriptResult<()> {
        let Some(instance) = self.instance.as_ref() else {
            return Ok(());
        };
        let descriptor = self.class.descriptor();
        for attr in descriptor.attributes() {
            let value = self.class.get_attribute(instance, &attr.name)?;
            tracing::trace!(attribute = %attr.name, value = %value, "pull");
            context.write_back(&attr.name, value);
        }
        Ok(())
    }
}

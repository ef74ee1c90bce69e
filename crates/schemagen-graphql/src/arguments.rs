//! Custom argument resolution.
//!
//! Parameters for which [`ArgumentResolver::should_inject`] returns `true`
//! are hidden from the schema and supplied through
//! [`ArgumentResolver::inject`] when the field resolves. Parent-bound
//! parameters are always injected.

use std::sync::Arc;

use schemagen_core::{
    FunctionDescriptor, Instance, ParameterDescriptor, ResolveError, RootKind, TypeKey,
    TypeUniverse,
};
use serde_json::Value;

use crate::schema::ResolutionContext;

/// Decides which parameters are supplied outside the request arguments.
pub trait ArgumentResolver: Send + Sync {
    /// Whether `parameter` is hidden from the schema and injected instead.
    fn should_inject(&self, function: &FunctionDescriptor, parameter: &ParameterDescriptor) -> bool {
        let _ = (function, parameter);
        false
    }

    /// Supplies the value of an injected parameter.
    ///
    /// # Errors
    ///
    /// The default implementation always fails with
    /// [`ResolveError::InjectionNotImplemented`].
    fn inject(
        &self,
        target: Option<&Instance>,
        parameter: &ParameterDescriptor,
        context: &ResolutionContext,
    ) -> Result<Value, ResolveError> {
        let _ = (target, context);
        Err(ResolveError::injection_not_implemented(&parameter.name))
    }
}

/// Injects nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCustomArguments;

impl ArgumentResolver for NoCustomArguments {}

/// How a parameter type is compared to the owning type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeMatch {
    /// Same type only.
    #[default]
    Exact,
    /// The owning type or any of its supertypes.
    Supertypes,
}

/// Feeds the enclosing value into parameters that refer to the function's
/// own type (or the type its owner extends).
///
/// Parent-bound parameters always receive the enclosing value. Mutation
/// functions never get self-invocation, so their object arguments stay in
/// the schema.
#[derive(Debug, Clone)]
pub struct SelfInvocationResolver {
    universe: Arc<TypeUniverse>,
    matching: TypeMatch,
}

impl SelfInvocationResolver {
    pub fn new(universe: Arc<TypeUniverse>) -> Self {
        Self {
            universe,
            matching: TypeMatch::default(),
        }
    }

    #[must_use]
    pub fn with_type_match(mut self, matching: TypeMatch) -> Self {
        self.matching = matching;
        self
    }

    fn matches(&self, parameter: &TypeKey, owner: &TypeKey) -> bool {
        match self.matching {
            TypeMatch::Exact => parameter == owner,
            TypeMatch::Supertypes => self.universe.is_subtype_of(owner, parameter),
        }
    }
}

impl ArgumentResolver for SelfInvocationResolver {
    fn should_inject(&self, function: &FunctionDescriptor, parameter: &ParameterDescriptor) -> bool {
        if parameter.parent_bound {
            return true;
        }
        if function.root == Some(RootKind::Mutation) {
            return false;
        }
        let Some(owner) = &function.owner else {
            return false;
        };

        let parameter_type = parameter.shape.named_key();
        if self.matches(parameter_type, owner) {
            return true;
        }
        self.universe
            .get(owner)
            .and_then(|descriptor| descriptor.extends.as_ref())
            .is_some_and(|target| self.matches(parameter_type, target))
    }

    fn inject(
        &self,
        _target: Option<&Instance>,
        _parameter: &ParameterDescriptor,
        context: &ResolutionContext,
    ) -> Result<Value, ResolveError> {
        Ok(context.source.clone())
    }
}

/// Veto over argument values before a function runs.
pub trait ExecutionPredicate: Send + Sync {
    /// Returns the rejection message for a value that must not be passed on.
    ///
    /// # Errors
    ///
    /// Returns `Err(message)` to reject `value`.
    fn evaluate(&self, parameter: &ParameterDescriptor, value: &Value) -> Result<(), String>;
}

impl<F> ExecutionPredicate for F
where
    F: Fn(&ParameterDescriptor, &Value) -> Result<(), String> + Send + Sync,
{
    fn evaluate(&self, parameter: &ParameterDescriptor, value: &Value) -> Result<(), String> {
        self(parameter, value)
    }
}

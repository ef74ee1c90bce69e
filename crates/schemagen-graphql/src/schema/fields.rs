//! Field construction from properties and functions.

use std::sync::Arc;

use schemagen_core::{Directive, FunctionDescriptor, Instance, PropertyDescriptor};
use tracing::trace;

use super::generator::SchemaGenerator;
use super::graph::{SchemaArgument, SchemaField};
use super::registry::{BoundParameter, FieldCoordinates, FieldResolver, FunctionBinding};
use crate::error::SchemaError;

/// Where a built field ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldOwner<'n> {
    /// An object or root type; the field gets a resolver.
    Object(&'n str),
    /// An interface; only the declaration matters.
    Interface,
}

impl SchemaGenerator<'_> {
    pub(crate) fn property_field(
        &self,
        property: &PropertyDescriptor,
        owner: FieldOwner<'_>,
    ) -> Result<SchemaField, SchemaError> {
        let mut field = SchemaField::new(&property.name, self.type_ref(&property.shape, false)?);
        field.description = property.description.clone();
        field.deprecation = deprecation(property.deprecated.as_deref(), &property.directives);
        field.directives = property.directives.clone();

        Ok(self.wire(field, owner, || FieldResolver::property(&property.name)))
    }

    /// Builds a field from a function.
    ///
    /// Parent-bound parameters, and parameters the argument resolver claims,
    /// are injected at call time and never become schema arguments. `target`
    /// is the instance the function is invoked on.
    pub(crate) fn function_field(
        &self,
        function: &FunctionDescriptor,
        owner: FieldOwner<'_>,
        target: Option<Instance>,
    ) -> Result<SchemaField, SchemaError> {
        let hooks = self.hooks();
        let argument_resolver = hooks.argument_resolver();

        let mut field = SchemaField::new(&function.name, self.type_ref(&function.return_type, false)?);
        field.description = function.description.clone();
        field.deprecation = deprecation(function.deprecated.as_deref(), &function.directives);
        field.directives = function.directives.clone();

        let mut parameters = Vec::with_capacity(function.parameters.len());
        for parameter in &function.parameters {
            let injected = parameter.parent_bound || argument_resolver.should_inject(function, parameter);
            if injected {
                trace!(function = %function.name, parameter = %parameter.name, "Parameter is injected");
                parameters.push(BoundParameter {
                    descriptor: parameter.clone(),
                    injected,
                    coercing: None,
                });
                continue;
            }

            let mut argument = SchemaArgument::new(&parameter.name, self.type_ref(&parameter.shape, true)?);
            argument.description = parameter.description.clone();
            argument.directives = parameter.directives.clone();
            field.arguments.push(argument);

            parameters.push(BoundParameter {
                descriptor: parameter.clone(),
                injected,
                coercing: self.scalar_coercing(&parameter.shape),
            });
        }

        Ok(self.wire(field, owner, || {
            FieldResolver::Function(Arc::new(FunctionBinding::new(
                function.clone(),
                target,
                parameters,
                Arc::clone(argument_resolver),
                hooks.execution_predicate().cloned(),
            )))
        }))
    }

    /// Registers the resolver of an object field and runs field rewiring.
    fn wire(
        &self,
        field: SchemaField,
        owner: FieldOwner<'_>,
        resolver: impl FnOnce() -> FieldResolver,
    ) -> SchemaField {
        let FieldOwner::Object(type_name) = owner else {
            return field;
        };

        let coordinates = FieldCoordinates::new(type_name, &field.name);
        self.with_registry(|registry| {
            registry.register(coordinates.clone(), resolver());
            self.hooks().on_rewire_field(field, &coordinates, registry)
        })
    }
}

/// Explicit reason first, then a `@deprecated` directive.
fn deprecation(explicit: Option<&str>, directives: &[Directive]) -> Option<String> {
    explicit.map(str::to_owned).or_else(|| {
        directives
            .iter()
            .find(|d| d.name == "deprecated")
            .map(|d| {
                d.arguments
                    .get("reason")
                    .and_then(|r| r.as_str())
                    .unwrap_or("No longer supported")
                    .to_string()
            })
    })
}

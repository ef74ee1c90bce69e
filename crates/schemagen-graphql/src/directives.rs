//! Directive-driven rewiring of generated types and fields.
//!
//! The default post-build rewiring hook hands every generated element to a
//! [`DirectiveWiringFactory`], which applies the wiring registered under the
//! name of each directive attached to the element.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use schemagen_core::Directive;
use tracing::trace;

use crate::schema::{CodeRegistry, FieldCoordinates, SchemaField, SchemaType};

/// Behavior attached to one directive name.
pub trait DirectiveWiring: Send + Sync {
    fn on_type(&self, ty: SchemaType, directive: &Directive) -> SchemaType {
        let _ = directive;
        ty
    }

    /// May rewrite the field and wrap or replace its resolver in `registry`.
    fn on_field(
        &self,
        field: SchemaField,
        directive: &Directive,
        coordinates: &FieldCoordinates,
        registry: &mut CodeRegistry,
    ) -> SchemaField {
        let _ = (directive, coordinates, registry);
        field
    }
}

/// Directive wirings by directive name.
#[derive(Clone, Default)]
pub struct DirectiveWiringFactory {
    wirings: IndexMap<String, Arc<dyn DirectiveWiring>>,
}

impl DirectiveWiringFactory {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_wiring(mut self, name: impl Into<String>, wiring: impl DirectiveWiring + 'static) -> Self {
        self.wirings.insert(name.into(), Arc::new(wiring));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.wirings.is_empty()
    }

    pub fn wire_type(&self, ty: SchemaType) -> SchemaType {
        let directives = ty.directives().to_vec();
        directives.iter().fold(ty, |ty, directive| {
            match self.wirings.get(&directive.name) {
                Some(wiring) => {
                    trace!(type_name = ty.name(), directive = %directive.name, "Wiring type directive");
                    wiring.on_type(ty, directive)
                }
                None => ty,
            }
        })
    }

    pub fn wire_field(
        &self,
        field: SchemaField,
        coordinates: &FieldCoordinates,
        registry: &mut CodeRegistry,
    ) -> SchemaField {
        let directives = field.directives.clone();
        directives.iter().fold(field, |field, directive| {
            match self.wirings.get(&directive.name) {
                Some(wiring) => {
                    trace!(field = %coordinates, directive = %directive.name, "Wiring field directive");
                    wiring.on_field(field, directive, coordinates, registry)
                }
                None => field,
            }
        })
    }
}

impl fmt::Debug for DirectiveWiringFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveWiringFactory")
            .field("directives", &self.wirings.keys().collect::<Vec<_>>())
            .finish()
    }
}

//! Extenders: objects that contribute extra fields to another type.
//!
//! An object registered here must declare the type it extends
//! ([`TypeDescriptor::extends`](schemagen_core::TypeDescriptor::extends)).
//! Its ordinary functions become fields of that type. Independently, each
//! of its parent-bound functions becomes a field of the type of its parent
//! parameter. Extender fields are invoked on the extender instance, with the
//! enclosing value of the extended type as source.

use std::sync::Arc;

use indexmap::IndexMap;
use schemagen_core::{FunctionDescriptor, Instance, TypeDescriptor, TypeKey, TypeUniverse};
use tracing::debug;

use crate::error::SchemaError;
use crate::schema::{TopLevelObject, filters};

/// Functions of one extender instance that apply to one target type.
#[derive(Debug, Clone)]
pub struct Extender {
    pub instance: Instance,
    pub owner: TypeKey,
    pub functions: Vec<FunctionDescriptor>,
}

/// Extenders indexed by the type they extend.
#[derive(Debug, Clone, Default)]
pub struct ExtenderRegistry {
    declared: IndexMap<TypeKey, Vec<Extender>>,
    parent_bound: IndexMap<TypeKey, Vec<Extender>>,
}

impl ExtenderRegistry {
    /// Groups `extenders` by target type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnrecognizedGenericBinding`] when an object
    /// declares no target, or a target missing from `universe`, and
    /// [`SchemaError::UnknownType`] when the object itself is unregistered.
    pub fn new(universe: &TypeUniverse, extenders: &[TopLevelObject]) -> Result<Self, SchemaError> {
        let mut registry = Self::default();

        for extender in extenders {
            let descriptor = universe
                .get(&extender.type_key)
                .ok_or_else(|| SchemaError::UnknownType {
                    key: extender.type_key.clone(),
                })?;
            let target = descriptor
                .extends
                .as_ref()
                .filter(|target| universe.contains(target))
                .ok_or_else(|| SchemaError::UnrecognizedGenericBinding {
                    extender: descriptor.key.clone(),
                })?;

            let functions: Vec<_> = descriptor
                .functions
                .iter()
                .filter(|f| filters::is_declared_extension(f))
                .cloned()
                .collect();
            debug!(
                extender = %descriptor.key,
                target = %target,
                functions = functions.len(),
                "Registered extender"
            );
            registry
                .declared
                .entry(target.clone())
                .or_default()
                .push(Extender {
                    instance: Arc::clone(&extender.instance),
                    owner: descriptor.key.clone(),
                    functions,
                });

            registry.add_parent_bound(descriptor, &extender.instance);
        }

        Ok(registry)
    }

    fn add_parent_bound(&mut self, descriptor: &TypeDescriptor, instance: &Instance) {
        for function in descriptor
            .functions
            .iter()
            .filter(|f| filters::is_parent_extension(f))
        {
            let Some(parent) = function.parent_parameter() else {
                continue;
            };
            let target = parent.shape.named_key().clone();
            debug!(
                extender = %descriptor.key,
                target = %target,
                function = %function.name,
                "Registered parent-bound extender"
            );
            self.parent_bound.entry(target).or_default().push(Extender {
                instance: Arc::clone(instance),
                owner: descriptor.key.clone(),
                functions: vec![function.clone()],
            });
        }
    }

    /// Extenders of `key`: parent-bound ones first, then declared ones.
    pub fn lookup(&self, key: &TypeKey) -> Vec<Extender> {
        self.parent_bound
            .get(key)
            .into_iter()
            .chain(self.declared.get(key))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty() && self.parent_bound.is_empty()
    }

    /// Types that have at least one extender.
    pub fn targets(&self) -> impl Iterator<Item = &TypeKey> {
        self.parent_bound
            .keys()
            .chain(self.declared.keys().filter(|k| !self.parent_bound.contains_key(*k)))
    }
}

//! Query, mutation and subscription root assembly.

use std::any::Any;
use std::sync::Arc;

use schemagen_core::{Instance, RootKind, TypeKey};
use tracing::debug;

use super::fields::FieldOwner;
use super::filters;
use super::generator::SchemaGenerator;
use super::graph::ObjectNode;
use super::registry::FieldCoordinates;
use crate::error::SchemaError;

/// A live object whose functions become root fields, paired with the key
/// of its registered descriptor.
#[derive(Debug, Clone)]
pub struct TopLevelObject {
    pub instance: Instance,
    pub type_key: TypeKey,
}

impl TopLevelObject {
    pub fn new<T: Any + Send + Sync>(object: T, type_key: impl Into<TypeKey>) -> Self {
        Self::from_instance(Arc::new(object), type_key)
    }

    pub fn from_instance(instance: Instance, type_key: impl Into<TypeKey>) -> Self {
        Self {
            instance,
            type_key: type_key.into(),
        }
    }
}

impl SchemaGenerator<'_> {
    /// Builds one root object from `objects`, in registration order.
    ///
    /// Returns `None` for an optional root without fields.
    ///
    /// # Errors
    ///
    /// [`SchemaError::EmptySchema`] when the query root ends up without
    /// fields, [`SchemaError::InvalidRootType`] for a non-public object.
    pub(crate) fn root_object(
        &self,
        root: RootKind,
        objects: &[TopLevelObject],
    ) -> Result<Option<ObjectNode>, SchemaError> {
        if objects.is_empty() {
            return match root {
                RootKind::Query => Err(SchemaError::EmptySchema),
                _ => Ok(None),
            };
        }

        let hooks = self.hooks();
        let name = self.settings().root_name(root).to_string();
        let mut node = ObjectNode::new(&name);

        for object in objects {
            let ty = self.descriptor(&object.type_key)?;
            if !ty.visibility.is_public() {
                return Err(SchemaError::InvalidRootType {
                    root,
                    type_name: ty.key.to_string(),
                });
            }
            node.directives.extend(ty.directives.iter().cloned());

            for function in filters::valid_top_level_functions(ty, root, hooks) {
                let field = self.function_field(
                    function,
                    FieldOwner::Object(&name),
                    Some(Arc::clone(&object.instance)),
                )?;
                let generated = field.name.clone();
                let field = hooks.did_generate_root_field(root, function, field);
                if field.name != generated {
                    self.with_registry(|registry| {
                        registry.rename(
                            &FieldCoordinates::new(&name, &generated),
                            FieldCoordinates::new(&name, &field.name),
                        );
                    });
                }
                node.add_field(field);
            }
        }

        debug!(root = %root, fields = node.fields.len(), "Generated root object");
        if node.fields.is_empty() {
            return match root {
                RootKind::Query => Err(SchemaError::EmptySchema),
                _ => Ok(None),
            };
        }
        Ok(Some(node))
    }
}

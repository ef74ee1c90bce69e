//! Object type builder.

use std::sync::Arc;

use schemagen_core::{Classification, TypeDescriptor};
use tracing::debug;

use super::fields::FieldOwner;
use super::filters;
use super::generator::SchemaGenerator;
use super::graph::{ObjectNode, SchemaType};
use crate::error::SchemaError;

impl SchemaGenerator<'_> {
    /// Builds an object node for `ty`.
    ///
    /// Every valid supertype is generated and attached when it is an
    /// interface. `interface` is attached unconditionally; implementors built
    /// by an interface pass it so the link survives superclass filtering.
    pub(crate) fn object_type(
        &self,
        ty: &TypeDescriptor,
        name: &str,
        interface: Option<&str>,
    ) -> Result<SchemaType, SchemaError> {
        let hooks = self.hooks();
        let mut node = ObjectNode::new(name);
        node.description = ty.description.clone();
        node.directives = ty.directives.clone();

        if let Some(interface) = interface {
            node.implement(interface);
        }
        for supertype in filters::valid_superclasses(ty, self.universe(), hooks) {
            let handle = self.generate_type(&supertype.key, false)?;
            if supertype.classify(false) == Classification::Interface {
                node.implement(handle.name());
            }
        }

        let owner = FieldOwner::Object(name);
        for property in filters::valid_properties(ty, hooks) {
            node.add_field(self.property_field(property, owner)?);
        }
        for function in filters::valid_functions(ty, hooks) {
            node.add_field(self.function_field(function, owner, None)?);
        }

        for extender in hooks.type_extenders(ty) {
            debug!(
                type_name = name,
                extender = %extender.owner,
                functions = extender.functions.len(),
                "Adding extender fields"
            );
            for function in extender
                .functions
                .iter()
                .filter(|f| hooks.is_valid_function(f))
            {
                let target = Some(Arc::clone(&extender.instance));
                node.add_field(self.function_field(function, owner, target)?);
            }
        }

        Ok(SchemaType::Object(node))
    }
}

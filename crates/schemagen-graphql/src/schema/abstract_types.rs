//! Interface and union builders.
//!
//! An abstract type with declared members becomes an interface; one without
//! becomes a union. Either way its concrete subtypes are generated as part
//! of the build, so they are always present in the schema.

use schemagen_core::TypeDescriptor;
use tracing::debug;

use super::fields::FieldOwner;
use super::filters;
use super::generator::SchemaGenerator;
use super::graph::{InterfaceNode, SchemaType, UnionNode};
use crate::error::SchemaError;

impl SchemaGenerator<'_> {
    pub(crate) fn interface_type(&self, ty: &TypeDescriptor, name: &str) -> Result<SchemaType, SchemaError> {
        let hooks = self.hooks();
        let mut node = InterfaceNode::new(name);
        node.description = ty.description.clone();
        node.directives = ty.directives.clone();

        for property in filters::valid_properties(ty, hooks) {
            node.add_field(self.property_field(property, FieldOwner::Interface)?);
        }
        for function in filters::valid_functions(ty, hooks) {
            node.add_field(self.function_field(function, FieldOwner::Interface, None)?);
        }

        let implementors = self.object_subtypes(ty);
        debug!(interface = name, implementors = implementors.len(), "Generating implementors");
        for implementor in implementors {
            self.implementor(implementor, name)?;
        }

        Ok(SchemaType::Interface(node))
    }

    pub(crate) fn union_type(&self, ty: &TypeDescriptor, name: &str) -> Result<SchemaType, SchemaError> {
        let mut members = Vec::new();
        for member in self.object_subtypes(ty) {
            let handle = self.generate_type(&member.key, false)?;
            members.push(handle.name().to_string());
        }
        debug!(union = name, members = members.len(), "Generated union");

        Ok(SchemaType::Union(UnionNode {
            name: name.to_string(),
            description: ty.description.clone(),
            directives: ty.directives.clone(),
            members,
        }))
    }
}

//! Enum, scalar and input object builders.

use indexmap::IndexMap;
use schemagen_core::{TypeDescriptor, TypeForm};

use super::filters;
use super::generator::SchemaGenerator;
use super::graph::{EnumNode, EnumValueNode, InputObjectNode, SchemaArgument, SchemaType};
use crate::error::SchemaError;

impl SchemaGenerator<'_> {
    pub(crate) fn enum_type(&self, ty: &TypeDescriptor, name: &str) -> SchemaType {
        let values = match &ty.form {
            TypeForm::Enumeration { values } => values
                .iter()
                .map(|value| EnumValueNode {
                    name: value.name.clone(),
                    description: value.description.clone(),
                    deprecation: value.deprecated.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        SchemaType::Enum(EnumNode {
            name: name.to_string(),
            description: ty.description.clone(),
            directives: ty.directives.clone(),
            values,
        })
    }

    /// Custom scalars cannot be reflected; only a type substitution hook
    /// can supply them.
    pub(crate) fn scalar_type(&self, ty: &TypeDescriptor) -> SchemaError {
        SchemaError::unsupported(
            &ty.key,
            "custom scalars need a type substitution hook providing their coercion",
        )
    }

    /// Builds the input variant of `ty` from its properties.
    pub(crate) fn input_type(&self, ty: &TypeDescriptor, name: &str) -> Result<SchemaType, SchemaError> {
        let mut fields = IndexMap::new();
        for property in filters::valid_properties(ty, self.hooks()) {
            let mut field = SchemaArgument::new(&property.name, self.type_ref(&property.shape, true)?);
            field.description = property.description.clone();
            field.directives = property.directives.clone();
            fields.insert(property.name.clone(), field);
        }

        Ok(SchemaType::InputObject(InputObjectNode {
            name: name.to_string(),
            description: ty.description.clone(),
            directives: ty.directives.clone(),
            fields,
        }))
    }
}

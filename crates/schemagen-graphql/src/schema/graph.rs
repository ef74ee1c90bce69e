//! Engine-independent schema graph.
//!
//! Builders produce these nodes; [`SchemaGraph::finish`] lowers them into an
//! executable `async_graphql::dynamic::Schema`. Nodes are plain data so hooks
//! can inspect and rewrite them before lowering.

use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use indexmap::IndexMap;
use schemagen_core::Directive;

use super::registry::CodeRegistry;
use crate::scalars::Coercing;

/// Argument of a field, or field of an input object.
#[derive(Debug, Clone)]
pub struct SchemaArgument {
    pub name: String,
    pub type_ref: TypeRef,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
}

impl SchemaArgument {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            description: None,
            directives: Vec::new(),
        }
    }
}

/// Output field of an object, interface or root type.
#[derive(Debug, Clone)]
pub struct SchemaField {
    pub name: String,
    pub type_ref: TypeRef,
    pub description: Option<String>,
    pub arguments: Vec<SchemaArgument>,
    pub deprecation: Option<String>,
    pub directives: Vec<Directive>,
}

impl SchemaField {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            description: None,
            arguments: Vec::new(),
            deprecation: None,
            directives: Vec::new(),
        }
    }

    pub fn argument(&self, name: &str) -> Option<&SchemaArgument> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct ObjectNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub interfaces: Vec<String>,
    pub fields: IndexMap<String, SchemaField>,
}

impl ObjectNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            interfaces: Vec::new(),
            fields: IndexMap::new(),
        }
    }

    /// Attaches an interface once.
    pub fn implement(&mut self, interface: impl Into<String>) {
        let interface = interface.into();
        if !self.interfaces.contains(&interface) {
            self.interfaces.push(interface);
        }
    }

    /// Adds a field; a later field with the same name replaces the earlier one.
    pub fn add_field(&mut self, field: SchemaField) {
        self.fields.insert(field.name.clone(), field);
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.get(name)
    }
}

#[derive(Debug, Clone)]
pub struct InterfaceNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub fields: IndexMap<String, SchemaField>,
}

impl InterfaceNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            fields: IndexMap::new(),
        }
    }

    pub fn add_field(&mut self, field: SchemaField) {
        self.fields.insert(field.name.clone(), field);
    }
}

#[derive(Debug, Clone)]
pub struct UnionNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EnumValueNode {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EnumNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub values: Vec<EnumValueNode>,
}

/// A custom scalar and the coercion contract that backs it.
#[derive(Clone)]
pub struct ScalarNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub coercing: Arc<dyn Coercing>,
}

impl ScalarNode {
    pub fn new(name: impl Into<String>, coercing: Arc<dyn Coercing>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
            coercing,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Debug for ScalarNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarNode")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("directives", &self.directives)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct InputObjectNode {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
    pub fields: IndexMap<String, SchemaArgument>,
}

/// A named, non-root schema type.
#[derive(Debug, Clone)]
pub enum SchemaType {
    Object(ObjectNode),
    Interface(InterfaceNode),
    Union(UnionNode),
    Enum(EnumNode),
    Scalar(ScalarNode),
    InputObject(InputObjectNode),
}

impl SchemaType {
    pub fn name(&self) -> &str {
        match self {
            Self::Object(node) => &node.name,
            Self::Interface(node) => &node.name,
            Self::Union(node) => &node.name,
            Self::Enum(node) => &node.name,
            Self::Scalar(node) => &node.name,
            Self::InputObject(node) => &node.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Object(node) => node.description.as_deref(),
            Self::Interface(node) => node.description.as_deref(),
            Self::Union(node) => node.description.as_deref(),
            Self::Enum(node) => node.description.as_deref(),
            Self::Scalar(node) => node.description.as_deref(),
            Self::InputObject(node) => node.description.as_deref(),
        }
    }

    pub fn directives(&self) -> &[Directive] {
        match self {
            Self::Object(node) => &node.directives,
            Self::Interface(node) => &node.directives,
            Self::Union(node) => &node.directives,
            Self::Enum(node) => &node.directives,
            Self::Scalar(node) => &node.directives,
            Self::InputObject(node) => &node.directives,
        }
    }

    /// Schema keyword of the node, as it appears in SDL.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Object(_) => "type",
            Self::Interface(_) => "interface",
            Self::Union(_) => "union",
            Self::Enum(_) => "enum",
            Self::Scalar(_) => "scalar",
            Self::InputObject(_) => "input",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Self::Object(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceNode> {
        match self {
            Self::Interface(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionNode> {
        match self {
            Self::Union(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumNode> {
        match self {
            Self::Enum(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<&InputObjectNode> {
        match self {
            Self::InputObject(node) => Some(node),
            _ => None,
        }
    }
}

/// Output of a generation run, ready to be lowered.
#[derive(Debug)]
pub struct SchemaGraph {
    pub query: ObjectNode,
    pub mutation: Option<ObjectNode>,
    pub subscription: Option<ObjectNode>,
    /// Every finalized non-root type, in discovery order.
    pub types: IndexMap<String, Arc<SchemaType>>,
    pub code_registry: CodeRegistry,
}

impl SchemaGraph {
    pub fn get_type(&self, name: &str) -> Option<&Arc<SchemaType>> {
        self.types.get(name)
    }

    /// Root objects in query, mutation, subscription order.
    pub fn roots(&self) -> impl Iterator<Item = &ObjectNode> {
        std::iter::once(&self.query)
            .chain(self.mutation.as_ref())
            .chain(self.subscription.as_ref())
    }
}

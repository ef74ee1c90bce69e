//! Schema generation and lowering.
//!
//! Generation happens in two phases:
//! 1. [`SchemaGenerator`] walks descriptors from the root objects outward and
//!    produces a [`SchemaGraph`], with every reachable type built once through
//!    the [`TypeCache`] and every field resolver recorded in the
//!    [`CodeRegistry`]
//! 2. [`SchemaGraph::finish`] lowers the graph into an executable
//!    `async_graphql::dynamic::Schema`

mod abstract_types;
mod cache;
mod engine;
mod fields;
pub(crate) mod filters;
mod generator;
mod graph;
mod leaf_types;
mod object;
mod registry;
mod top_level;

pub use cache::{CacheKey, TypeCache, TypeHandle};
pub use engine::TYPENAME_KEY;
pub use generator::{INPUT_SUFFIX, SchemaGenerator};
pub use graph::{
    EnumNode, EnumValueNode, InputObjectNode, InterfaceNode, ObjectNode, ScalarNode,
    SchemaArgument, SchemaField, SchemaGraph, SchemaType, UnionNode,
};
pub use registry::{
    BoundParameter, CodeRegistry, FieldCoordinates, FieldResolver, FunctionBinding,
    ResolutionContext,
};
pub use top_level::TopLevelObject;

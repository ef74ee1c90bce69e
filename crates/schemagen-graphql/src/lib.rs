//! # schemagen-graphql
//!
//! Generates a GraphQL schema from the descriptors registered in a
//! [`TypeUniverse`].
//!
//! Root objects contribute their functions as query, mutation and
//! subscription fields; everything their signatures reach becomes a schema
//! type, built once and shared through a cache so recursive type graphs
//! terminate. The resulting [`SchemaGraph`] is lowered into an executable
//! `async_graphql::dynamic::Schema`.
//!
//! ## Configuration
//!
//! ```toml
//! [schema]
//! query_name = "Query"
//! supported_packages = ["sample"]
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Generator settings and hook bundle
//! - [`hooks`] - Customization points consulted during generation
//! - [`schema`] - Type cache, builders, graph and lowering
//! - [`arguments`] - Injected arguments and execution predicates
//! - [`extenders`] - Functions contributed to types by other objects
//! - [`directives`] - Directive wiring
//! - [`scalars`] - Custom scalar coercion
//! - [`error`] - Error types for generation

pub mod arguments;
pub mod config;
pub mod directives;
pub mod error;
pub mod extenders;
pub mod hooks;
pub mod scalars;
pub mod schema;

pub use arguments::{
    ArgumentResolver, ExecutionPredicate, NoCustomArguments, SelfInvocationResolver, TypeMatch,
};
pub use config::{GeneratorSettings, SchemaGeneratorConfig};
pub use directives::{DirectiveWiring, DirectiveWiringFactory};
pub use error::SchemaError;
pub use extenders::{Extender, ExtenderRegistry};
pub use hooks::SchemaGeneratorHooks;
pub use scalars::{Coercing, StringCoercing};
pub use schema::{
    FieldCoordinates, FieldResolver, ResolutionContext, SchemaGenerator, SchemaGraph,
    TopLevelObject,
};

pub use schemagen_core::TypeUniverse;

/// Result type for schema generation.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Generates the schema graph for the given root objects.
///
/// # Errors
///
/// Any [`SchemaError`]; generation is all-or-nothing.
pub fn generate_graph(
    universe: &TypeUniverse,
    config: &SchemaGeneratorConfig,
    queries: &[TopLevelObject],
    mutations: &[TopLevelObject],
    subscriptions: &[TopLevelObject],
) -> Result<SchemaGraph> {
    SchemaGenerator::new(universe, config)?.generate(queries, mutations, subscriptions)
}

/// Generates and lowers an executable schema for the given root objects.
///
/// # Errors
///
/// Any [`SchemaError`] from generation, or [`SchemaError::Engine`] when the
/// lowered schema is rejected.
pub fn to_schema(
    universe: &TypeUniverse,
    config: &SchemaGeneratorConfig,
    queries: &[TopLevelObject],
    mutations: &[TopLevelObject],
    subscriptions: &[TopLevelObject],
) -> Result<async_graphql::dynamic::Schema> {
    let graph = generate_graph(universe, config, queries, mutations, subscriptions)?;
    graph.finish(&config.settings, &config.hooks)
}

//! End-to-end tests: generate, lower and execute against the sample model.

mod common;

use std::sync::Arc;

use async_graphql::dynamic::Schema;
use common::*;
use futures_util::StreamExt;
use schemagen_core::{Directive, FunctionDescriptor, Invocation, ParameterDescriptor, TypeDescriptor, TypeUniverse};
use schemagen_graphql::schema::{CodeRegistry, FieldCoordinates, SchemaField};
use schemagen_graphql::{
    ArgumentResolver, DirectiveWiring, DirectiveWiringFactory, SchemaGeneratorHooks,
    SelfInvocationResolver, TopLevelObject, to_schema,
};
use serde_json::{Value, json};

fn schema(hooks: SchemaGeneratorHooks) -> Schema {
    let universe = universe();
    let hooks = hooks.with_extender_registry(extenders(&universe));
    to_schema(&universe, &config(hooks), &queries(), &mutations(), &subscriptions())
        .expect("sample schema builds")
}

async fn execute(schema: &Schema, query: &str) -> Value {
    let response = schema.execute(query).await;
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    response.data.into_json().unwrap()
}

async fn execute_err(schema: &Schema, query: &str) -> String {
    let response = schema.execute(query).await;
    assert!(!response.errors.is_empty(), "expected an error for {query}");
    response.errors[0].message.clone()
}

#[tokio::test]
async fn test_sdl_contains_generated_types() {
    let sdl = schema(hooks()).sdl();

    assert!(has_line(&sdl, "item(id: String!): Item!"), "{sdl}");
    assert!(has_line(&sdl, "items: [Item!]!"));
    assert!(has_line(&sdl, "addReview(itemId: String!, review: ReviewInput!): Review!"));
    assert!(has_line(&sdl, "counter(limit: Int!): Int!"));
    assert!(has_line(&sdl, "union SearchResult = Item"));
    assert!(has_line(&sdl, "scalar UUID"));
    assert!(sdl.contains("type Truck implements Vehicle"));
    assert!(sdl.contains("input ReviewInput"));
    assert!(sdl.contains("@deprecated(reason: \"Use ACTIVE\")"));
    assert!(!sdl.contains("secret"));
}

#[tokio::test]
async fn test_query_by_argument() {
    let schema = schema(hooks());
    let data = execute(&schema, r#"{ item(id: "1") { id name status } }"#).await;
    assert_eq!(data, json!({ "item": { "id": "1", "name": "lamp", "status": "ACTIVE" } }));
}

#[tokio::test]
async fn test_missing_non_null_result_is_an_error() {
    let schema = schema(hooks());
    let response = schema.execute(r#"{ item(id: "404") { id } }"#).await;
    assert!(!response.errors.is_empty());
}

#[tokio::test]
async fn test_parent_bound_extender_resolves_from_parent() {
    let schema = schema(hooks());
    let data = execute(&schema, r#"{ item(id: "2") { reviews { rating text } } }"#).await;
    assert_eq!(
        data,
        json!({ "item": { "reviews": [{ "rating": 4, "text": "Great chair" }] } })
    );
}

#[tokio::test]
async fn test_extender_bodies_read_their_instance() {
    let universe = Arc::new(universe());
    let reviews = ItemReviews {
        rating: 2,
        reviewed: vec!["1".to_string(), "2".to_string(), "2".to_string()],
    };
    let hooks = hooks()
        .with_extender_registry(extenders_with(&universe, reviews))
        .with_argument_resolver(SelfInvocationResolver::new(Arc::clone(&universe)));
    let schema = to_schema(&universe, &config(hooks), &queries(), &[], &[]).unwrap();

    let data = execute(&schema, "{ items { id reviewCount reviews { rating } } }").await;
    assert_eq!(
        data,
        json!({ "items": [
            { "id": "1", "reviewCount": 1, "reviews": [{ "rating": 2 }] },
            { "id": "2", "reviewCount": 2, "reviews": [{ "rating": 2 }] },
        ] })
    );
}

#[tokio::test]
async fn test_self_invocation_injects_source() {
    let universe = Arc::new(universe());
    let hooks = hooks()
        .with_extender_registry(extenders(&universe))
        .with_argument_resolver(SelfInvocationResolver::new(Arc::clone(&universe)));
    let schema = to_schema(&universe, &config(hooks), &queries(), &[], &[]).unwrap();

    let data = execute(&schema, "{ items { id reviewCount } }").await;
    assert_eq!(
        data,
        json!({ "items": [{ "id": "1", "reviewCount": 1 }, { "id": "2", "reviewCount": 0 }] })
    );
}

#[tokio::test]
async fn test_interface_and_union_values() {
    let schema = schema(hooks());
    let data = execute(
        &schema,
        r#"{
            vehicles {
                color
                ... on Truck { capacity }
                ... on Sportscar { topSpeed }
            }
            search(term: "am") { ... on Item { name } }
        }"#,
    )
    .await;

    assert_eq!(
        data,
        json!({
            "vehicles": [{ "color": "red", "capacity": 12 }, { "color": "blue", "topSpeed": 310 }],
            "search": [{ "name": "lamp" }],
        })
    );
}

#[tokio::test]
async fn test_recursive_type_executes() {
    let schema = schema(hooks());
    let data = execute(&schema, "{ tree { name parent { name } children { name children { name } } } }").await;
    assert_eq!(
        data,
        json!({ "tree": { "name": "root", "parent": null, "children": [{ "name": "leaf", "children": [] }] } })
    );
}

#[tokio::test]
async fn test_custom_scalar_coercion() {
    let schema = schema(hooks());
    let data = execute(
        &schema,
        r#"{ bySku(sku: "123e4567-e89b-12d3-a456-426614174001") { name sku } }"#,
    )
    .await;
    assert_eq!(
        data,
        json!({ "bySku": { "name": "chair", "sku": "123e4567-e89b-12d3-a456-426614174001" } })
    );

    execute_err(&schema, r#"{ bySku(sku: "not-a-uuid") { name } }"#).await;
}

#[tokio::test]
async fn test_mutation_with_input_object() {
    let schema = schema(hooks());
    let data = execute(
        &schema,
        r#"mutation { addReview(itemId: "1", review: { rating: 4, text: "fine" }) { rating text } }"#,
    )
    .await;
    assert_eq!(data, json!({ "addReview": { "rating": 4, "text": "fine" } }));
}

#[tokio::test]
async fn test_subscription_streams_values() {
    let schema = schema(hooks());
    let values: Vec<Value> = schema
        .execute_stream("subscription { counter(limit: 3) }")
        .map(|response| {
            assert!(response.errors.is_empty(), "{:?}", response.errors);
            response.data.into_json().unwrap()
        })
        .collect()
        .await;

    assert_eq!(
        values,
        [json!({ "counter": 1 }), json!({ "counter": 2 }), json!({ "counter": 3 })]
    );
}

#[tokio::test]
async fn test_execution_predicate_rejects_argument() {
    let hooks = hooks().with_execution_predicate(|parameter: &ParameterDescriptor, value: &Value| {
        if parameter.name == "id" && value.as_str() == Some("") {
            Err("id must not be empty".to_string())
        } else {
            Ok(())
        }
    });
    let schema = schema(hooks);

    let message = execute_err(&schema, r#"{ item(id: "") { id } }"#).await;
    assert_eq!(message, "Argument 'id' rejected: id must not be empty");
    execute(&schema, r#"{ item(id: "1") { id } }"#).await;
}

struct Uppercase;

impl DirectiveWiring for Uppercase {
    fn on_field(
        &self,
        field: SchemaField,
        _directive: &Directive,
        coordinates: &FieldCoordinates,
        registry: &mut CodeRegistry,
    ) -> SchemaField {
        registry.map(coordinates, |value| {
            Ok(json!(value.as_str().unwrap_or_default().to_uppercase()))
        });
        field
    }
}

#[tokio::test]
async fn test_directive_wiring_wraps_resolver() {
    let universe = TypeUniverse::new()
        .with(
            TypeDescriptor::object("sample.Greeter").function(
                FunctionDescriptor::new("greet", string())
                    .argument("name", string())
                    .directive(Directive::new("uppercase"))
                    .resolve(|inv: Invocation| async move {
                        Ok(json!(format!("hello {}", inv.argument::<String>("name")?)))
                    }),
            ),
        )
        .unwrap();
    let hooks = SchemaGeneratorHooks::default()
        .with_wiring_factory(DirectiveWiringFactory::new().with_wiring("uppercase", Uppercase));
    let queries = [TopLevelObject::new((), "sample.Greeter")];
    let schema = to_schema(&universe, &config(hooks), &queries, &[], &[]).unwrap();

    let data = execute(&schema, r#"{ greet(name: "ada") }"#).await;
    assert_eq!(data, json!({ "greet": "HELLO ADA" }));
}

struct ClaimsEverything;

impl ArgumentResolver for ClaimsEverything {
    fn should_inject(&self, _function: &FunctionDescriptor, parameter: &ParameterDescriptor) -> bool {
        parameter.name == "context"
    }
}

#[tokio::test]
async fn test_injection_not_implemented_surfaces_as_field_error() {
    let universe = TypeUniverse::new()
        .with(
            TypeDescriptor::object("sample.Query").function(
                FunctionDescriptor::new("whoami", string())
                    .argument("context", string())
                    .resolve(|inv: Invocation| async move { inv.argument::<Value>("context") }),
            ),
        )
        .unwrap();
    let hooks = SchemaGeneratorHooks::default().with_argument_resolver(ClaimsEverything);
    let queries = [TopLevelObject::new((), "sample.Query")];
    let schema = to_schema(&universe, &config(hooks), &queries, &[], &[]).unwrap();

    assert!(has_line(&schema.sdl(), "whoami: String!"));
    let message = execute_err(&schema, "{ whoami }").await;
    assert!(message.contains("Argument injection not implemented"), "{message}");
    assert!(message.contains("'context'"));
}

#[tokio::test]
async fn test_introspection_can_be_disabled() {
    let universe = universe();
    let mut config = config(hooks());
    config.settings.introspection = false;
    let schema = to_schema(&universe, &config, &queries(), &[], &[]).unwrap();

    let response = schema.execute("{ __schema { queryType { name } } }").await;
    let data = response.data.into_json().unwrap();
    assert!(!response.errors.is_empty() || data["__schema"].is_null(), "{data}");
}

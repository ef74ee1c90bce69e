//! Shared sample model for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use futures_util::stream;
use schemagen_core::{
    BuiltinScalar, EnumValueDescriptor, FunctionDescriptor, Invocation, PropertyDescriptor,
    ResolveError, TypeDescriptor, TypeShape, TypeUniverse, Visibility,
};
use schemagen_graphql::schema::{ScalarNode, SchemaType};
use schemagen_graphql::{
    ExtenderRegistry, SchemaGeneratorConfig, SchemaGeneratorHooks, StringCoercing, TopLevelObject,
};
use serde_json::{Value, json};

pub const ITEM: &str = "sample.Item";
pub const REVIEW: &str = "sample.Review";
pub const NODE: &str = "sample.Node";
pub const ITEM_QUERY: &str = "sample.ItemQuery";
pub const REVIEW_MUTATION: &str = "sample.ReviewMutation";
pub const TICKER: &str = "sample.Ticker";
pub const ITEM_REVIEWS: &str = "sample.ItemReviews";

pub fn string() -> TypeShape {
    TypeShape::builtin(BuiltinScalar::String)
}

pub fn int() -> TypeShape {
    TypeShape::builtin(BuiltinScalar::Int)
}

pub fn id() -> TypeShape {
    TypeShape::builtin(BuiltinScalar::Id)
}

pub fn named(key: &str) -> TypeShape {
    TypeShape::named(key)
}

/// State behind the query object.
pub struct ItemStore {
    pub items: Vec<Value>,
}

impl ItemStore {
    pub fn sample() -> Self {
        Self {
            items: vec![
                json!({
                    "id": "1",
                    "name": "lamp",
                    "status": "ACTIVE",
                    "sku": "123e4567-e89b-12d3-a456-426614174000",
                    "secret": "hidden",
                }),
                json!({
                    "id": "2",
                    "name": "chair",
                    "status": "RETIRED",
                    "sku": "123e4567-e89b-12d3-a456-426614174001",
                    "secret": "hidden",
                }),
            ],
        }
    }

    fn find(&self, key: &str, value: &Value) -> Value {
        self.items
            .iter()
            .find(|item| item.get(key) == Some(value))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

pub struct ReviewMutation;
pub struct Ticker;

/// State behind the item extender.
pub struct ItemReviews {
    pub rating: i64,
    pub reviewed: Vec<String>,
}

impl ItemReviews {
    pub fn sample() -> Self {
        Self {
            rating: 4,
            reviewed: vec!["1".to_string()],
        }
    }
}

pub fn is_uuid(value: &str) -> bool {
    uuid::Uuid::parse_str(value).is_ok()
}

fn item_query() -> TypeDescriptor {
    TypeDescriptor::object(ITEM_QUERY)
        .function(
            FunctionDescriptor::new("item", named(ITEM))
                .argument("id", string())
                .description("Looks an item up by id")
                .resolve(|inv: Invocation| async move {
                    let id = inv.argument::<Value>("id")?;
                    Ok(inv.target::<ItemStore>()?.find("id", &id))
                }),
        )
        .function(
            FunctionDescriptor::new("items", TypeShape::list(named(ITEM))).resolve(
                |inv: Invocation| async move { Ok(json!(inv.target::<ItemStore>()?.items)) },
            ),
        )
        .function(
            FunctionDescriptor::new("bySku", named(ITEM).optional())
                .argument("sku", named("sample.UUID"))
                .resolve(|inv: Invocation| async move {
                    let sku = inv.argument::<Value>("sku")?;
                    Ok(inv.target::<ItemStore>()?.find("sku", &sku))
                }),
        )
        .function(
            FunctionDescriptor::new("search", TypeShape::list(named("sample.SearchResult")))
                .argument("term", string())
                .resolve(|inv: Invocation| async move {
                    let term = inv.argument::<String>("term")?;
                    let hits: Vec<Value> = inv
                        .target::<ItemStore>()?
                        .items
                        .iter()
                        .filter(|item| item["name"].as_str().is_some_and(|n| n.contains(&term)))
                        .map(|item| {
                            let mut hit = item.clone();
                            hit["__typename"] = json!("Item");
                            hit
                        })
                        .collect();
                    Ok(json!(hits))
                }),
        )
        .function(
            FunctionDescriptor::new("vehicles", TypeShape::list(named("sample.Vehicle"))).resolve(
                |_inv: Invocation| async move {
                    Ok(json!([
                        { "__typename": "Truck", "color": "red", "capacity": 12 },
                        { "__typename": "Sportscar", "color": "blue", "topSpeed": 310 },
                    ]))
                },
            ),
        )
        .function(
            FunctionDescriptor::new("tree", named(NODE)).resolve(|_inv: Invocation| async move {
                Ok(json!({
                    "name": "root",
                    "children": [{ "name": "leaf", "children": [] }],
                }))
            }),
        )
        .function(
            FunctionDescriptor::new("audit", string())
                .visibility(Visibility::Private)
                .resolve(|_inv: Invocation| async move { Ok(json!("secret")) }),
        )
        .function(
            FunctionDescriptor::new("hashCode", int())
                .from_base()
                .resolve(|_inv: Invocation| async move { Ok(json!(0)) }),
        )
}

fn review_mutation() -> TypeDescriptor {
    TypeDescriptor::object(REVIEW_MUTATION).function(
        FunctionDescriptor::new("addReview", named(REVIEW))
            .argument("itemId", string())
            .argument("review", named(REVIEW))
            .mutation()
            .resolve(|inv: Invocation| async move { inv.argument::<Value>("review") }),
    )
}

fn ticker() -> TypeDescriptor {
    TypeDescriptor::object(TICKER).function(
        FunctionDescriptor::new("counter", int())
            .argument("limit", int())
            .subscription()
            .stream(|inv: Invocation| {
                let limit = inv.argument::<i64>("limit").unwrap_or(0);
                stream::iter((1..=limit).map(|n| Ok::<_, ResolveError>(json!(n))))
            }),
    )
}

fn item_reviews() -> TypeDescriptor {
    TypeDescriptor::object(ITEM_REVIEWS)
        .extends(ITEM)
        .function(
            FunctionDescriptor::new("reviews", TypeShape::list(named(REVIEW)))
                .parent("item", named(ITEM))
                .resolve(|inv: Invocation| async move {
                    let item = inv.argument::<Value>("item")?;
                    let name = item["name"].as_str().unwrap_or_default();
                    let rating = inv.target::<ItemReviews>()?.rating;
                    Ok(json!([{ "rating": rating, "text": format!("Great {name}") }]))
                }),
        )
        .function(
            FunctionDescriptor::new("reviewCount", int())
                .argument("item", named(ITEM))
                .resolve(|inv: Invocation| async move {
                    let item = inv.argument::<Value>("item")?;
                    let reviewed = &inv.target::<ItemReviews>()?.reviewed;
                    let count = reviewed.iter().filter(|id| item["id"] == id.as_str()).count();
                    Ok(json!(count))
                }),
        )
        .function(FunctionDescriptor::new("latestReview", named(REVIEW)).query())
        .function(FunctionDescriptor::new("purge", int()).ignored())
        .function(
            FunctionDescriptor::new("moderationQueue", TypeShape::list(named(REVIEW)))
                .visibility(Visibility::Private),
        )
}

/// Every type of the sample model.
pub fn universe() -> TypeUniverse {
    let vehicle = TypeDescriptor::interface("sample.Vehicle")
        .property(PropertyDescriptor::new("color", string()));

    let types = [
        TypeDescriptor::enumeration(
            "sample.Status",
            [
                EnumValueDescriptor::new("ACTIVE"),
                EnumValueDescriptor::new("RETIRED").deprecated("Use ACTIVE"),
            ],
        ),
        TypeDescriptor::scalar("sample.UUID"),
        TypeDescriptor::abstract_class("sample.SearchResult"),
        TypeDescriptor::object(ITEM)
            .supertype("sample.SearchResult")
            .description("Something for sale")
            .property(PropertyDescriptor::new("id", id()))
            .property(PropertyDescriptor::new("name", string()))
            .property(PropertyDescriptor::new("status", named("sample.Status")))
            .property(PropertyDescriptor::new("sku", named("sample.UUID")))
            .property(PropertyDescriptor::new("secret", string()).visibility(Visibility::Private)),
        TypeDescriptor::object(REVIEW)
            .property(PropertyDescriptor::new("rating", int()))
            .property(PropertyDescriptor::new("text", string().optional())),
        TypeDescriptor::object("sample.Truck")
            .implements(&vehicle)
            .property(PropertyDescriptor::new("capacity", int())),
        TypeDescriptor::object("sample.Sportscar")
            .implements(&vehicle)
            .property(PropertyDescriptor::new("topSpeed", int())),
        vehicle,
        TypeDescriptor::object(NODE)
            .property(PropertyDescriptor::new("name", string()))
            .property(PropertyDescriptor::new("parent", named(NODE).optional()))
            .property(PropertyDescriptor::new("children", TypeShape::list(named(NODE)))),
        item_query(),
        review_mutation(),
        ticker(),
        item_reviews(),
    ];

    types
        .into_iter()
        .try_fold(TypeUniverse::new(), |universe, ty| universe.with(ty))
        .expect("sample universe registers")
}

/// Hooks every sample schema needs: the UUID scalar.
pub fn hooks() -> SchemaGeneratorHooks {
    SchemaGeneratorHooks::default().with_type_substitution(|ty| {
        (ty.key.as_str() == "sample.UUID").then(|| {
            SchemaType::Scalar(
                ScalarNode::new("UUID", Arc::new(StringCoercing::new("UUID", is_uuid)))
                    .description("RFC 4122 identifier"),
            )
        })
    })
}

pub fn config(hooks: SchemaGeneratorHooks) -> SchemaGeneratorConfig {
    SchemaGeneratorConfig::default().with_hooks(hooks)
}

pub fn queries() -> Vec<TopLevelObject> {
    vec![TopLevelObject::new(ItemStore::sample(), ITEM_QUERY)]
}

pub fn mutations() -> Vec<TopLevelObject> {
    vec![TopLevelObject::new(ReviewMutation, REVIEW_MUTATION)]
}

pub fn subscriptions() -> Vec<TopLevelObject> {
    vec![TopLevelObject::new(Ticker, TICKER)]
}

pub fn extenders(universe: &TypeUniverse) -> ExtenderRegistry {
    extenders_with(universe, ItemReviews::sample())
}

pub fn extenders_with(universe: &TypeUniverse, reviews: ItemReviews) -> ExtenderRegistry {
    ExtenderRegistry::new(universe, &[TopLevelObject::new(reviews, ITEM_REVIEWS)])
        .expect("extenders register")
}

/// Whether `sdl` has a line equal to `line` once trimmed.
pub fn has_line(sdl: &str, line: &str) -> bool {
    sdl.lines().any(|l| l.trim() == line)
}

//! Sample domain served by the CLI.
//!
//! Items with reviews and users, a vehicle interface with two
//! implementations, a UUID echo and a ticking counter subscription.
//! Resolver objects double as extenders of the types they declare.

pub mod items;
pub mod vehicles;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::stream;
use schemagen_core::{
    BuiltinScalar, Directive, FunctionDescriptor, Invocation, ResolveError, TypeDescriptor, TypeShape,
    TypeUniverse,
};
use schemagen_graphql::schema::{CodeRegistry, FieldCoordinates, ScalarNode, SchemaField, SchemaType};
use schemagen_graphql::{
    DirectiveWiring, DirectiveWiringFactory, ExtenderRegistry, GeneratorSettings,
    SchemaGeneratorConfig, SchemaGeneratorHooks, SchemaGraph, SelfInvocationResolver,
    StringCoercing, TopLevelObject,
};
use serde_json::Value;
use uuid::Uuid;

pub const UUID: &str = "sample.UUID";
pub const UUID_RESOLVER: &str = "sample.UuidResolver";
pub const COUNTER_SUBSCRIPTION: &str = "sample.CounterSubscription";

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
pub struct UuidResolver;

#[derive(Debug, Default)]
pub struct CounterSubscription;

fn is_uuid(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}

fn uuid_resolver() -> TypeDescriptor {
    TypeDescriptor::object(UUID_RESOLVER).function(
        FunctionDescriptor::new("uuid", TypeShape::named(UUID))
            .argument("uuid", TypeShape::named(UUID))
            .query()
            .resolve(|inv: Invocation| async move { inv.argument::<Value>("uuid") }),
    )
}

/// Counts from 1 to `limit`, one tick apart.
fn counter_subscription() -> TypeDescriptor {
    TypeDescriptor::object(COUNTER_SUBSCRIPTION).function(
        FunctionDescriptor::new("counter", TypeShape::builtin(BuiltinScalar::Int))
            .argument("limit", TypeShape::builtin(BuiltinScalar::Int))
            .subscription()
            .stream(|inv: Invocation| {
                let limit = inv.argument::<i64>("limit").unwrap_or(0);
                stream::unfold(1, move |n| async move {
                    if n > limit {
                        return None;
                    }
                    tokio::time::sleep(TICK).await;
                    Some((Ok::<_, ResolveError>(Value::from(n)), n + 1))
                })
            }),
    )
}

/// Every descriptor of the sample domain.
pub fn universe() -> Result<TypeUniverse> {
    let universe = items::types()
        .into_iter()
        .chain(vehicles::types())
        .chain([
            TypeDescriptor::scalar(UUID),
            uuid_resolver(),
            counter_subscription(),
        ])
        .try_fold(TypeUniverse::new(), |universe, ty| universe.with(ty))?;
    Ok(universe)
}

pub fn queries() -> Vec<TopLevelObject> {
    vec![
        TopLevelObject::new(items::ItemResolver::default(), items::ITEM_RESOLVER),
        TopLevelObject::new(items::UserResolver::default(), items::USER_RESOLVER),
        TopLevelObject::new(vehicles::VehicleResolver, vehicles::VEHICLE_RESOLVER),
        TopLevelObject::new(UuidResolver, UUID_RESOLVER),
    ]
}

pub fn mutations() -> Vec<TopLevelObject> {
    vec![TopLevelObject::new(
        items::ReviewResolver::default(),
        items::REVIEW_RESOLVER,
    )]
}

pub fn subscriptions() -> Vec<TopLevelObject> {
    vec![TopLevelObject::new(CounterSubscription, COUNTER_SUBSCRIPTION)]
}

/// Resolver objects whose functions extend the types they declare.
fn extenders() -> Vec<TopLevelObject> {
    vec![
        TopLevelObject::new(items::ItemResolver::default(), items::ITEM_RESOLVER),
        TopLevelObject::new(items::ReviewResolver::default(), items::REVIEW_RESOLVER),
        TopLevelObject::new(items::UserResolver::default(), items::USER_RESOLVER),
        TopLevelObject::new(items::SecondaryUserResolver, items::SECONDARY_USER_RESOLVER),
        TopLevelObject::new(vehicles::TruckResolver, vehicles::TRUCK_RESOLVER),
        TopLevelObject::new(vehicles::SportscarResolver, vehicles::SPORTSCAR_RESOLVER),
    ]
}

/// Lowercases the string a field resolves to.
struct Lowercase;

impl DirectiveWiring for Lowercase {
    fn on_field(
        &self,
        field: SchemaField,
        _directive: &Directive,
        coordinates: &FieldCoordinates,
        registry: &mut CodeRegistry,
    ) -> SchemaField {
        registry.map(coordinates, |value| {
            Ok(match value.as_str() {
                Some(s) => Value::from(s.to_lowercase()),
                None => value,
            })
        });
        field
    }
}

fn hooks(universe: &Arc<TypeUniverse>) -> Result<SchemaGeneratorHooks> {
    let registry = ExtenderRegistry::new(universe, &extenders())?;
    let hooks = SchemaGeneratorHooks::default()
        .with_type_substitution(|ty| {
            (ty.key.as_str() == UUID).then(|| {
                SchemaType::Scalar(
                    ScalarNode::new("UUID", Arc::new(StringCoercing::new("UUID", is_uuid)))
                        .description("RFC 4122 identifier"),
                )
            })
        })
        // Resolvers also extend types, so only marked functions reach a root.
        .with_top_level_filter(|root, function: &FunctionDescriptor| function.root == Some(root))
        .with_extender_registry(registry)
        .with_argument_resolver(SelfInvocationResolver::new(Arc::clone(universe)))
        .with_execution_predicate(items::validate_not_blank)
        .with_wiring_factory(DirectiveWiringFactory::new().with_wiring("lowercase", Lowercase));
    Ok(hooks)
}

/// The sample domain ready to generate with `settings`.
pub struct Sample {
    pub universe: Arc<TypeUniverse>,
    pub config: SchemaGeneratorConfig,
}

impl Sample {
    pub fn new(settings: GeneratorSettings) -> Result<Self> {
        let universe = Arc::new(universe()?);
        let config = SchemaGeneratorConfig::new(settings).with_hooks(hooks(&universe)?);
        Ok(Self { universe, config })
    }

    pub fn graph(&self) -> Result<SchemaGraph> {
        let graph = schemagen_graphql::generate_graph(
            &self.universe,
            &self.config,
            &queries(),
            &mutations(),
            &subscriptions(),
        )?;
        Ok(graph)
    }

    pub fn schema(&self) -> Result<async_graphql::dynamic::Schema> {
        let schema = schemagen_graphql::to_schema(
            &self.universe,
            &self.config,
            &queries(),
            &mutations(),
            &subscriptions(),
        )?;
        Ok(schema)
    }
}

//! Lowering of a [`SchemaGraph`] into an executable dynamic schema.
//!
//! Values cross the engine boundary as JSON: parents and arguments are
//! converted to `serde_json::Value` before a [`FieldResolver`] runs, and its
//! output is converted back. Custom scalars serialize through their
//! [`Coercing`]; values of interface and union type name their concrete type
//! in a `__typename` key.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::{
    self, Field, FieldFuture, FieldValue, InputValue, InterfaceField, ResolverContext, Schema,
    SubscriptionField, SubscriptionFieldFuture, TypeRef,
};
use async_graphql::{Name, Value as GraphQLValue};
use futures_util::StreamExt;
use indexmap::IndexMap;
use schemagen_core::ResolveError;
use serde_json::Value;
use tracing::{debug, trace};

use super::graph::{ObjectNode, SchemaArgument, SchemaField, SchemaGraph, SchemaType};
use super::registry::{FieldCoordinates, FieldResolver, ResolutionContext};
use crate::config::GeneratorSettings;
use crate::error::SchemaError;
use crate::hooks::SchemaGeneratorHooks;
use crate::scalars::Coercing;

/// Key naming the concrete type of an interface or union value.
pub const TYPENAME_KEY: &str = "__typename";

/// How resolver output of a named type is handed to the engine.
#[derive(Clone)]
enum OutputKind {
    Plain,
    Enum,
    Abstract(String),
    Scalar(Arc<dyn Coercing>),
}

type OutputKinds = HashMap<String, OutputKind>;

impl SchemaGraph {
    /// Lowers the graph into an executable schema.
    ///
    /// The schema-builder hook runs right before the engine validates and
    /// finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Engine`] if the engine rejects the schema.
    pub fn finish(
        &self,
        settings: &GeneratorSettings,
        hooks: &SchemaGeneratorHooks,
    ) -> Result<Schema, SchemaError> {
        debug!("Starting GraphQL schema build");
        let outputs = output_kinds(self);

        let mut builder = Schema::build(
            &self.query.name,
            self.mutation.as_ref().map(|m| m.name.as_str()),
            self.subscription.as_ref().map(|s| s.name.as_str()),
        );

        for ty in self.types.values() {
            builder = builder.register(self.lower_type(ty, &outputs));
        }
        builder = builder.register(self.lower_object(&self.query, &outputs));
        if let Some(mutation) = &self.mutation {
            builder = builder.register(self.lower_object(mutation, &outputs));
        }
        if let Some(subscription) = &self.subscription {
            builder = builder.register(self.lower_subscription(subscription, &outputs));
        }

        let mut builder = builder
            .limit_depth(settings.max_depth)
            .limit_complexity(settings.max_complexity);
        if !settings.introspection {
            builder = builder.disable_introspection();
        }
        let builder = hooks.will_build_schema(builder);

        let schema = builder
            .finish()
            .map_err(|e| SchemaError::Engine(e.to_string()))?;
        debug!(types = self.types.len(), "GraphQL schema build complete");
        Ok(schema)
    }

    fn lower_type(&self, ty: &SchemaType, outputs: &OutputKinds) -> dynamic::Type {
        match ty {
            SchemaType::Object(node) => dynamic::Type::Object(self.lower_object(node, outputs)),
            SchemaType::Interface(node) => {
                let mut interface = dynamic::Interface::new(&node.name);
                for field in node.fields.values() {
                    let mut interface_field = InterfaceField::new(&field.name, field.type_ref.clone());
                    if let Some(description) = &field.description {
                        interface_field = interface_field.description(description);
                    }
                    for argument in &field.arguments {
                        interface_field = interface_field.argument(lower_argument(argument));
                    }
                    interface = interface.field(interface_field);
                }
                if let Some(description) = &node.description {
                    interface = interface.description(description);
                }
                dynamic::Type::Interface(interface)
            }
            SchemaType::Union(node) => {
                let mut union = dynamic::Union::new(&node.name);
                for member in &node.members {
                    union = union.possible_type(member);
                }
                if let Some(description) = &node.description {
                    union = union.description(description);
                }
                dynamic::Type::Union(union)
            }
            SchemaType::Enum(node) => {
                let mut enum_type = dynamic::Enum::new(&node.name);
                for value in &node.values {
                    let mut item = dynamic::EnumItem::new(&value.name);
                    if let Some(description) = &value.description {
                        item = item.description(description);
                    }
                    if let Some(reason) = &value.deprecation {
                        item = item.deprecation(Some(reason));
                    }
                    enum_type = enum_type.item(item);
                }
                if let Some(description) = &node.description {
                    enum_type = enum_type.description(description);
                }
                dynamic::Type::Enum(enum_type)
            }
            SchemaType::Scalar(node) => {
                let coercing = Arc::clone(&node.coercing);
                let mut scalar = dynamic::Scalar::new(&node.name)
                    .validator(move |value| coercing.parse_literal(value).is_ok());
                if let Some(description) = &node.description {
                    scalar = scalar.description(description);
                }
                dynamic::Type::Scalar(scalar)
            }
            SchemaType::InputObject(node) => {
                let mut input = dynamic::InputObject::new(&node.name);
                for field in node.fields.values() {
                    input = input.field(lower_argument(field));
                }
                if let Some(description) = &node.description {
                    input = input.description(description);
                }
                dynamic::Type::InputObject(input)
            }
        }
    }

    fn lower_object(&self, node: &ObjectNode, outputs: &OutputKinds) -> dynamic::Object {
        let mut object = dynamic::Object::new(&node.name);
        for interface in &node.interfaces {
            object = object.implement(interface);
        }
        for field in node.fields.values() {
            let coordinates = FieldCoordinates::new(&node.name, &field.name);
            let resolver = self.resolver(&coordinates, field);
            object = object.field(lower_field(field, coordinates, resolver, outputs));
        }
        if let Some(description) = &node.description {
            object = object.description(description);
        }
        object
    }

    fn lower_subscription(&self, node: &ObjectNode, outputs: &OutputKinds) -> dynamic::Subscription {
        let mut subscription = dynamic::Subscription::new(&node.name);
        for field in node.fields.values() {
            let coordinates = FieldCoordinates::new(&node.name, &field.name);
            let resolver = self.resolver(&coordinates, field);
            subscription = subscription.field(lower_subscription_field(
                field,
                coordinates,
                resolver,
                outputs,
            ));
        }
        if let Some(description) = &node.description {
            subscription = subscription.description(description);
        }
        subscription
    }

    fn resolver(&self, coordinates: &FieldCoordinates, field: &SchemaField) -> FieldResolver {
        self.code_registry.get(coordinates).cloned().unwrap_or_else(|| {
            trace!(field = %coordinates, "No registered resolver, reading parent property");
            FieldResolver::property(&field.name)
        })
    }
}

fn output_kinds(graph: &SchemaGraph) -> OutputKinds {
    graph
        .types
        .values()
        .filter_map(|ty| {
            let kind = match ty.as_ref() {
                SchemaType::Enum(_) => OutputKind::Enum,
                SchemaType::Interface(_) | SchemaType::Union(_) => {
                    OutputKind::Abstract(ty.name().to_string())
                }
                SchemaType::Scalar(node) => OutputKind::Scalar(Arc::clone(&node.coercing)),
                SchemaType::Object(_) | SchemaType::InputObject(_) => return None,
            };
            Some((ty.name().to_string(), kind))
        })
        .collect()
}

fn output_kind(outputs: &OutputKinds, type_ref: &TypeRef) -> OutputKind {
    outputs
        .get(type_ref.type_name())
        .cloned()
        .unwrap_or(OutputKind::Plain)
}

fn lower_argument(argument: &SchemaArgument) -> InputValue {
    let mut input = InputValue::new(&argument.name, argument.type_ref.clone());
    if let Some(description) = &argument.description {
        input = input.description(description);
    }
    input
}

fn lower_field(
    field: &SchemaField,
    coordinates: FieldCoordinates,
    resolver: FieldResolver,
    outputs: &OutputKinds,
) -> Field {
    let output = output_kind(outputs, &field.type_ref);
    let argument_names: Arc<[String]> = field.arguments.iter().map(|a| a.name.clone()).collect();

    let mut lowered = Field::new(&field.name, field.type_ref.clone(), move |ctx| {
        let resolver = resolver.clone();
        let coordinates = coordinates.clone();
        let argument_names = Arc::clone(&argument_names);
        let output = output.clone();
        FieldFuture::new(async move {
            let context = resolution_context(&ctx, coordinates, &argument_names)?;
            let field = context.coordinates.clone();
            let value = resolver
                .resolve(context)
                .await
                .inspect_err(|e| debug!(field = %field, error = %e, "Field resolution failed"))?;
            to_field_value(value, &output)
        })
    });

    for argument in &field.arguments {
        lowered = lowered.argument(lower_argument(argument));
    }
    if let Some(description) = &field.description {
        lowered = lowered.description(description);
    }
    if let Some(reason) = &field.deprecation {
        lowered = lowered.deprecation(Some(reason));
    }
    lowered
}

fn lower_subscription_field(
    field: &SchemaField,
    coordinates: FieldCoordinates,
    resolver: FieldResolver,
    outputs: &OutputKinds,
) -> SubscriptionField {
    let output = output_kind(outputs, &field.type_ref);
    let argument_names: Arc<[String]> = field.arguments.iter().map(|a| a.name.clone()).collect();

    let mut lowered = SubscriptionField::new(&field.name, field.type_ref.clone(), move |ctx| {
        let resolver = resolver.clone();
        let coordinates = coordinates.clone();
        let argument_names = Arc::clone(&argument_names);
        let output = output.clone();
        SubscriptionFieldFuture::new(async move {
            let context = resolution_context(&ctx, coordinates, &argument_names)?;
            let stream = resolver
                .subscribe(context)
                .map(move |item| stream_item(item, &output));
            Ok(stream)
        })
    });

    for argument in &field.arguments {
        lowered = lowered.argument(lower_argument(argument));
    }
    if let Some(description) = &field.description {
        lowered = lowered.description(description);
    }
    if let Some(reason) = &field.deprecation {
        lowered = lowered.deprecation(Some(reason));
    }
    lowered
}

fn resolution_context(
    ctx: &ResolverContext<'_>,
    coordinates: FieldCoordinates,
    argument_names: &[String],
) -> Result<ResolutionContext, async_graphql::Error> {
    let source = match ctx.parent_value.as_value() {
        Some(parent) => parent.clone().into_json()?,
        None => Value::Null,
    };

    let mut arguments = IndexMap::new();
    for name in argument_names {
        if let Some(value) = ctx.args.get(name) {
            arguments.insert(name.clone(), value.as_value().clone().into_json()?);
        }
    }

    Ok(ResolutionContext {
        coordinates,
        source,
        arguments,
    })
}

fn stream_item<'a>(
    item: Result<Value, ResolveError>,
    output: &OutputKind,
) -> Result<FieldValue<'a>, async_graphql::Error> {
    let value = item?;
    Ok(to_field_value(value, output)?.unwrap_or(FieldValue::NULL))
}

fn to_field_value<'a>(
    value: Value,
    output: &OutputKind,
) -> Result<Option<FieldValue<'a>>, async_graphql::Error> {
    match value {
        Value::Null => Ok(None),
        value => to_non_null_field_value(value, output).map(Some),
    }
}

fn to_non_null_field_value<'a>(
    value: Value,
    output: &OutputKind,
) -> Result<FieldValue<'a>, async_graphql::Error> {
    match (value, output) {
        (Value::Null, _) => Ok(FieldValue::NULL),
        (Value::Array(items), _) => {
            let items = items
                .into_iter()
                .map(|item| to_non_null_field_value(item, output))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(FieldValue::list(items))
        }
        (value, OutputKind::Scalar(coercing)) => {
            let wire = coercing.serialize(&value)?;
            Ok(FieldValue::value(GraphQLValue::from_json(wire)?))
        }
        (Value::String(name), OutputKind::Enum) => {
            Ok(FieldValue::value(GraphQLValue::Enum(Name::new(name))))
        }
        (value, OutputKind::Abstract(type_name)) => {
            let concrete = value
                .get(TYPENAME_KEY)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| {
                    async_graphql::Error::new(format!(
                        "value of abstract type {type_name} has no {TYPENAME_KEY}"
                    ))
                })?;
            Ok(FieldValue::value(GraphQLValue::from_json(value)?).with_type(concrete))
        }
        (value, _) => Ok(FieldValue::value(GraphQLValue::from_json(value)?)),
    }
}

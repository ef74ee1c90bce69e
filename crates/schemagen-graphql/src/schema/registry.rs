//! Field resolvers and the code registry that maps coordinates to them.

use std::fmt;
use std::sync::Arc;

use futures_util::{FutureExt, StreamExt, future, stream};
use indexmap::IndexMap;
use schemagen_core::{
    FunctionDescriptor, Instance, Invocation, ParameterDescriptor, ResolveError, ValueFuture,
    ValueStream,
};
use serde_json::Value;
use tracing::trace;

use crate::arguments::{ArgumentResolver, ExecutionPredicate};
use crate::scalars::Coercing;

/// `(type name, field name)` pair identifying one resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldCoordinates {
    pub type_name: String,
    pub field_name: String,
}

impl FieldCoordinates {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl fmt::Display for FieldCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

/// What a resolver sees of the request.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub coordinates: FieldCoordinates,
    /// The enclosing value; `null` on root fields.
    pub source: Value,
    /// Arguments supplied by the request, by schema argument name.
    pub arguments: IndexMap<String, Value>,
}

impl ResolutionContext {
    pub fn new(coordinates: FieldCoordinates, source: Value) -> Self {
        Self {
            coordinates,
            source,
            arguments: IndexMap::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }
}

type ValueMap = dyn Fn(Value) -> Result<Value, ResolveError> + Send + Sync;
type CustomResolver = dyn Fn(ResolutionContext) -> ValueFuture + Send + Sync;

/// How one field obtains its value.
#[derive(Clone)]
pub enum FieldResolver {
    /// Reads the named key of the enclosing value.
    Property(String),
    /// Invokes a native function.
    Function(Arc<FunctionBinding>),
    /// A hand-written resolver, typically installed by a hook.
    Custom(Arc<CustomResolver>),
    /// Post-processes the output of another resolver.
    Mapped {
        inner: Box<FieldResolver>,
        map: Arc<ValueMap>,
    },
}

impl FieldResolver {
    pub fn property(name: impl Into<String>) -> Self {
        Self::Property(name.into())
    }

    pub fn custom<F>(resolver: F) -> Self
    where
        F: Fn(ResolutionContext) -> ValueFuture + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(resolver))
    }

    /// Wraps this resolver so its output passes through `map`.
    #[must_use]
    pub fn map<F>(self, map: F) -> Self
    where
        F: Fn(Value) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        Self::Mapped {
            inner: Box::new(self),
            map: Arc::new(map),
        }
    }

    pub fn resolve(&self, context: ResolutionContext) -> ValueFuture {
        match self {
            Self::Property(name) => {
                let value = context.source.get(name).cloned().unwrap_or(Value::Null);
                future::ready(Ok(value)).boxed()
            }
            Self::Function(binding) => {
                let binding = Arc::clone(binding);
                async move { binding.call(context).await }.boxed()
            }
            Self::Custom(resolver) => resolver(context),
            Self::Mapped { inner, map } => {
                let inner = inner.resolve(context);
                let map = Arc::clone(map);
                async move { map(inner.await?) }.boxed()
            }
        }
    }

    /// Resolves as a stream; non-streaming resolvers yield once.
    pub fn subscribe(&self, context: ResolutionContext) -> ValueStream {
        match self {
            Self::Function(binding) => binding.subscribe(context),
            Self::Mapped { inner, map } => {
                let map = Arc::clone(map);
                inner
                    .subscribe(context)
                    .map(move |item| item.and_then(|value| map(value)))
                    .boxed()
            }
            other => stream::once(other.resolve(context)).boxed(),
        }
    }
}

impl fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => f.debug_tuple("Property").field(name).finish(),
            Self::Function(binding) => f.debug_tuple("Function").field(binding).finish(),
            Self::Custom(_) => f.write_str("Custom"),
            Self::Mapped { inner, .. } => f.debug_struct("Mapped").field("inner", inner).finish(),
        }
    }
}

/// A parameter as seen at call time.
#[derive(Clone)]
pub struct BoundParameter {
    pub descriptor: ParameterDescriptor,
    /// Supplied by the argument resolver instead of the request.
    pub injected: bool,
    /// Coercion of a custom scalar argument.
    pub coercing: Option<Arc<dyn Coercing>>,
}

/// A native function bound to its instance and argument strategy.
pub struct FunctionBinding {
    function: FunctionDescriptor,
    target: Option<Instance>,
    parameters: Vec<BoundParameter>,
    argument_resolver: Arc<dyn ArgumentResolver>,
    predicate: Option<Arc<dyn ExecutionPredicate>>,
}

impl FunctionBinding {
    pub fn new(
        function: FunctionDescriptor,
        target: Option<Instance>,
        parameters: Vec<BoundParameter>,
        argument_resolver: Arc<dyn ArgumentResolver>,
        predicate: Option<Arc<dyn ExecutionPredicate>>,
    ) -> Self {
        Self {
            function,
            target,
            parameters,
            argument_resolver,
            predicate,
        }
    }

    pub fn function(&self) -> &FunctionDescriptor {
        &self.function
    }

    pub fn parameters(&self) -> &[BoundParameter] {
        &self.parameters
    }

    /// Builds the invocation for one request.
    ///
    /// # Errors
    ///
    /// Fails when injection fails, a required argument is absent, a custom
    /// scalar rejects its input or the execution predicate vetoes a value.
    pub fn invocation(&self, context: &ResolutionContext) -> Result<Invocation, ResolveError> {
        let mut invocation = Invocation::new(self.target.clone(), context.source.clone());

        for parameter in &self.parameters {
            let descriptor = &parameter.descriptor;
            if descriptor.parent_bound {
                invocation.insert_argument(descriptor.name.clone(), context.source.clone());
                continue;
            }
            if parameter.injected {
                let value =
                    self.argument_resolver
                        .inject(self.target.as_ref(), descriptor, context)?;
                invocation.insert_argument(descriptor.name.clone(), value);
                continue;
            }

            let value = match context.arguments.get(&descriptor.name) {
                Some(value) => value.clone(),
                None if descriptor.shape.is_nullable() => Value::Null,
                None => return Err(ResolveError::MissingArgument(descriptor.name.clone())),
            };
            let value = match &parameter.coercing {
                Some(coercing) => coerce_input(coercing.as_ref(), &descriptor.name, value)?,
                None => value,
            };
            if let Some(predicate) = &self.predicate {
                predicate
                    .evaluate(descriptor, &value)
                    .map_err(|message| ResolveError::rejected(&descriptor.name, message))?;
            }
            invocation.insert_argument(descriptor.name.clone(), value);
        }

        Ok(invocation)
    }

    pub async fn call(&self, context: ResolutionContext) -> Result<Value, ResolveError> {
        trace!(field = %context.coordinates, function = %self.function.name, "Invoking function");
        let invocation = self.invocation(&context)?;
        match &self.function.body {
            Some(body) => body.call(invocation).await,
            None => Err(self.missing_body()),
        }
    }

    pub fn subscribe(&self, context: ResolutionContext) -> ValueStream {
        let invocation = match self.invocation(&context) {
            Ok(invocation) => invocation,
            Err(e) => return stream::once(future::ready(Err(e))).boxed(),
        };
        match &self.function.body {
            Some(body) => body.subscribe(invocation),
            None => stream::once(future::ready(Err(self.missing_body()))).boxed(),
        }
    }

    fn missing_body(&self) -> ResolveError {
        ResolveError::failed(format!("function '{}' has no body", self.function.name))
    }
}

impl fmt::Debug for FunctionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let injected: Vec<_> = self
            .parameters
            .iter()
            .filter(|p| p.injected)
            .map(|p| p.descriptor.name.as_str())
            .collect();
        f.debug_struct("FunctionBinding")
            .field("function", &self.function.name)
            .field("bound", &self.target.is_some())
            .field("injected", &injected)
            .finish()
    }
}

fn coerce_input(coercing: &dyn Coercing, name: &str, value: Value) -> Result<Value, ResolveError> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Array(items) => items
            .into_iter()
            .map(|item| coerce_input(coercing, name, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        value => coercing
            .parse_value(&value)
            .map_err(|e| ResolveError::invalid_argument(name, e.to_string())),
    }
}

/// Resolvers keyed by field coordinates.
#[derive(Clone, Default)]
pub struct CodeRegistry {
    resolvers: IndexMap<FieldCoordinates, FieldResolver>,
}

impl CodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resolver, replacing any previous one at `coordinates`.
    pub fn register(&mut self, coordinates: FieldCoordinates, resolver: FieldResolver) {
        self.resolvers.insert(coordinates, resolver);
    }

    pub fn get(&self, coordinates: &FieldCoordinates) -> Option<&FieldResolver> {
        self.resolvers.get(coordinates)
    }

    pub fn contains(&self, coordinates: &FieldCoordinates) -> bool {
        self.resolvers.contains_key(coordinates)
    }

    pub fn remove(&mut self, coordinates: &FieldCoordinates) -> Option<FieldResolver> {
        self.resolvers.shift_remove(coordinates)
    }

    /// Wraps the resolver at `coordinates` so its output passes through `map`.
    ///
    /// Returns `false` if nothing is registered there.
    pub fn map<F>(&mut self, coordinates: &FieldCoordinates, map: F) -> bool
    where
        F: Fn(Value) -> Result<Value, ResolveError> + Send + Sync + 'static,
    {
        match self.resolvers.shift_remove(coordinates) {
            Some(resolver) => {
                self.resolvers.insert(coordinates.clone(), resolver.map(map));
                true
            }
            None => false,
        }
    }

    /// Moves a resolver after its field was renamed.
    pub fn rename(&mut self, from: &FieldCoordinates, to: FieldCoordinates) {
        if let Some(resolver) = self.resolvers.shift_remove(from) {
            self.resolvers.insert(to, resolver);
        }
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldCoordinates, &FieldResolver)> {
        self.resolvers.iter()
    }
}

impl fmt::Debug for CodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.resolvers.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::NoCustomArguments;
    use schemagen_core::{BuiltinScalar, TypeShape, instance};
    use serde_json::json;
    use tokio_test::block_on;

    fn coordinates() -> FieldCoordinates {
        FieldCoordinates::new("Query", "item")
    }

    fn echo_binding(parameters: Vec<BoundParameter>) -> FunctionBinding {
        let function = FunctionDescriptor::new("item", TypeShape::builtin(BuiltinScalar::String))
            .resolve(|inv: Invocation| async move {
                Ok::<_, ResolveError>(json!(inv.arguments().clone()))
            });
        FunctionBinding::new(
            function,
            Some(instance(())),
            parameters,
            Arc::new(NoCustomArguments),
            None,
        )
    }

    fn plain(name: &str, shape: TypeShape) -> BoundParameter {
        BoundParameter {
            descriptor: ParameterDescriptor::new(name, shape),
            injected: false,
            coercing: None,
        }
    }

    #[tokio::test]
    async fn test_property_resolver_reads_source_key() {
        let resolver = FieldResolver::property("name");
        let context = ResolutionContext::new(coordinates(), json!({ "name": "lamp" }));
        assert_eq!(resolver.resolve(context).await.unwrap(), json!("lamp"));

        let context = ResolutionContext::new(coordinates(), json!({}));
        assert_eq!(resolver.resolve(context).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_function_binding_passes_arguments() {
        let binding = echo_binding(vec![plain("id", TypeShape::builtin(BuiltinScalar::String))]);
        let context = ResolutionContext::new(coordinates(), Value::Null).with_argument("id", json!("1"));
        let value = FieldResolver::Function(Arc::new(binding))
            .resolve(context)
            .await
            .unwrap();
        assert_eq!(value, json!({ "id": "1" }));
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let binding = echo_binding(vec![plain("id", TypeShape::builtin(BuiltinScalar::String))]);
        let err = binding
            .call(ResolutionContext::new(coordinates(), Value::Null))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingArgument(name) if name == "id"));
    }

    #[tokio::test]
    async fn test_absent_optional_argument_reads_null() {
        let binding = echo_binding(vec![plain(
            "limit",
            TypeShape::builtin(BuiltinScalar::Int).optional(),
        )]);
        let value = binding
            .call(ResolutionContext::new(coordinates(), Value::Null))
            .await
            .unwrap();
        assert_eq!(value, json!({ "limit": null }));
    }

    #[tokio::test]
    async fn test_injection_without_resolver_fails() {
        let mut parameter = plain("parent", TypeShape::named("sample.Item"));
        parameter.injected = true;
        let binding = echo_binding(vec![parameter]);
        let err = binding
            .call(ResolutionContext::new(coordinates(), json!({ "id": "1" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::InjectionNotImplemented { parameter } if parameter == "parent"));
    }

    #[tokio::test]
    async fn test_parent_bound_parameter_receives_source() {
        let mut parameter = plain("item", TypeShape::named("sample.Item"));
        parameter.descriptor.parent_bound = true;
        parameter.injected = true;
        let binding = echo_binding(vec![parameter]);
        let value = binding
            .call(ResolutionContext::new(coordinates(), json!({ "id": "1" })))
            .await
            .unwrap();
        assert_eq!(value, json!({ "item": { "id": "1" } }));
    }

    #[test]
    fn test_mapped_resolver() {
        let resolver = FieldResolver::property("name").map(|value| {
            Ok(json!(value.as_str().unwrap_or_default().to_uppercase()))
        });
        let context = ResolutionContext::new(coordinates(), json!({ "name": "lamp" }));
        assert_eq!(block_on(resolver.resolve(context)).unwrap(), json!("LAMP"));
    }

    #[tokio::test]
    async fn test_non_streaming_resolver_subscribes_once() {
        let resolver = FieldResolver::property("name");
        let context = ResolutionContext::new(coordinates(), json!({ "name": "lamp" }));
        let items: Vec<_> = resolver.subscribe(context).collect().await;
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_registry_map_and_rename() {
        let mut registry = CodeRegistry::new();
        let from = FieldCoordinates::new("Item", "name");
        registry.register(from.clone(), FieldResolver::property("name"));

        assert!(registry.map(&from, Ok));
        assert!(!registry.map(&FieldCoordinates::new("Item", "missing"), Ok));
        assert!(matches!(registry.get(&from), Some(FieldResolver::Mapped { .. })));

        let to = FieldCoordinates::new("Item", "title");
        registry.rename(&from, to.clone());
        assert!(!registry.contains(&from));
        assert!(registry.contains(&to));
        assert_eq!(registry.len(), 1);
        assert_eq!(to.to_string(), "Item.title");
    }
}

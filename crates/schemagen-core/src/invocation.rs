//! Call-time contract between generated fields and native functions.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use futures_util::{FutureExt, Stream, StreamExt};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ResolveError;

/// A live object a field is bound to (top-level object or extender).
pub type Instance = Arc<dyn Any + Send + Sync>;

pub type ValueFuture = BoxFuture<'static, Result<Value, ResolveError>>;
pub type ValueStream = BoxStream<'static, Result<Value, ResolveError>>;

type UnaryFn = dyn Fn(Invocation) -> ValueFuture + Send + Sync;
type StreamFn = dyn Fn(Invocation) -> ValueStream + Send + Sync;

/// Wraps a value as an [`Instance`].
pub fn instance<T: Any + Send + Sync>(value: T) -> Instance {
    Arc::new(value)
}

/// Executable body of a function.
#[derive(Clone)]
pub enum FunctionBody {
    Unary(Arc<UnaryFn>),
    Stream(Arc<StreamFn>),
}

impl FunctionBody {
    pub fn unary<F, Fut>(body: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ResolveError>> + Send + 'static,
    {
        Self::Unary(Arc::new(move |invocation| body(invocation).boxed()))
    }

    pub fn stream<F, S>(body: F) -> Self
    where
        F: Fn(Invocation) -> S + Send + Sync + 'static,
        S: Stream<Item = Result<Value, ResolveError>> + Send + 'static,
    {
        Self::Stream(Arc::new(move |invocation| body(invocation).boxed()))
    }

    /// Runs the body for a single value.
    ///
    /// A stream body yields its first item.
    pub async fn call(&self, invocation: Invocation) -> Result<Value, ResolveError> {
        match self {
            Self::Unary(body) => body(invocation).await,
            Self::Stream(body) => body(invocation)
                .next()
                .await
                .unwrap_or(Ok(Value::Null)),
        }
    }

    /// Runs the body as a stream.
    ///
    /// A unary body becomes a one-item stream.
    pub fn subscribe(&self, invocation: Invocation) -> ValueStream {
        match self {
            Self::Unary(body) => futures_util::stream::once(body(invocation)).boxed(),
            Self::Stream(body) => body(invocation),
        }
    }
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary(_) => f.write_str("FunctionBody::Unary"),
            Self::Stream(_) => f.write_str("FunctionBody::Stream"),
        }
    }
}

/// Everything a function body receives when a field is resolved.
#[derive(Clone, Default)]
pub struct Invocation {
    target: Option<Instance>,
    source: Value,
    arguments: IndexMap<String, Value>,
}

impl Invocation {
    pub fn new(target: Option<Instance>, source: Value) -> Self {
        Self {
            target,
            source,
            arguments: IndexMap::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    pub fn insert_argument(&mut self, name: impl Into<String>, value: Value) {
        self.arguments.insert(name.into(), value);
    }

    /// The instance the field is bound to.
    pub fn target<T: Any + Send + Sync>(&self) -> Result<&T, ResolveError> {
        self.target
            .as_deref()
            .and_then(|target| target.downcast_ref::<T>())
            .ok_or(ResolveError::TargetMismatch {
                expected: std::any::type_name::<T>(),
            })
    }

    pub fn target_instance(&self) -> Option<&Instance> {
        self.target.as_ref()
    }

    /// The enclosing (parent) value in the resolution chain.
    pub fn source_value(&self) -> &Value {
        &self.source
    }

    pub fn source<T: DeserializeOwned>(&self) -> Result<T, ResolveError> {
        Ok(serde_json::from_value(self.source.clone())?)
    }

    pub fn raw_argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// Deserializes an argument; absent arguments read as `null`.
    pub fn argument<T: DeserializeOwned>(&self, name: &str) -> Result<T, ResolveError> {
        let value = self.arguments.get(name).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| ResolveError::invalid_argument(name, e.to_string()))
    }

    pub fn arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("bound", &self.target.is_some())
            .field("source", &self.source)
            .field("arguments", &self.arguments)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::block_on;

    struct ItemService {
        prefix: &'static str,
    }

    #[tokio::test]
    async fn test_unary_body_reads_target_and_arguments() {
        let body = FunctionBody::unary(|inv: Invocation| async move {
            let service = inv.target::<ItemService>()?;
            let id: String = inv.argument("id")?;
            Ok::<_, ResolveError>(json!({ "id": format!("{}{}", service.prefix, id) }))
        });

        let invocation = Invocation::new(Some(instance(ItemService { prefix: "item-" })), Value::Null)
            .with_argument("id", json!("42"));
        let value = body.call(invocation).await.unwrap();
        assert_eq!(value, json!({ "id": "item-42" }));
    }

    #[tokio::test]
    async fn test_target_mismatch() {
        let body = FunctionBody::unary(|inv: Invocation| async move {
            inv.target::<ItemService>()?;
            Ok::<_, ResolveError>(Value::Null)
        });
        let err = body
            .call(Invocation::new(Some(instance(7_u32)), Value::Null))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::TargetMismatch { .. }));
    }

    #[tokio::test]
    async fn test_unary_body_subscribes_as_single_item() {
        let body = FunctionBody::unary(|_| async { Ok::<_, ResolveError>(json!(1)) });
        let items: Vec<_> = body.subscribe(Invocation::default()).collect().await;
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_stream_body_call_takes_first() {
        let body = FunctionBody::stream(|_| {
            futures_util::stream::iter(vec![Ok::<_, ResolveError>(json!(1)), Ok(json!(2))])
        });
        assert_eq!(block_on(body.call(Invocation::default())).unwrap(), json!(1));
    }

    #[test]
    fn test_missing_argument_reads_null() {
        let inv = Invocation::default();
        let value: Option<String> = inv.argument("missing").unwrap();
        assert!(value.is_none());
        assert!(inv.argument::<String>("missing").is_err());
    }
}

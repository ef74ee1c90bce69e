//! Coercion contract for custom scalars.
//!
//! A custom scalar only exists in the schema when a type substitution hook
//! supplies a [`ScalarNode`](crate::schema::ScalarNode) carrying one of these.

use async_graphql::Value as GraphQLValue;
use schemagen_core::ResolveError;
use serde_json::Value;

/// Converts between wire values and the values native functions exchange.
pub trait Coercing: Send + Sync {
    /// Turns a resolver output into its wire representation.
    fn serialize(&self, value: &Value) -> Result<Value, ResolveError>;

    /// Validates and normalizes an argument value.
    fn parse_value(&self, input: &Value) -> Result<Value, ResolveError>;

    /// Validates a literal written in a query document.
    fn parse_literal(&self, input: &GraphQLValue) -> Result<Value, ResolveError> {
        let json = input.clone().into_json()?;
        self.parse_value(&json)
    }
}

/// Accepts string values matching a predicate and passes them through.
pub struct StringCoercing<F> {
    name: &'static str,
    accepts: F,
}

impl<F> StringCoercing<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    pub fn new(name: &'static str, accepts: F) -> Self {
        Self { name, accepts }
    }

    fn check(&self, value: &Value) -> Result<Value, ResolveError> {
        match value.as_str() {
            Some(s) if (self.accepts)(s) => Ok(value.clone()),
            Some(s) => Err(ResolveError::failed(format!("'{s}' is not a valid {}", self.name))),
            None => Err(ResolveError::failed(format!(
                "expected a {} string, got {value}",
                self.name
            ))),
        }
    }
}

impl<F> Coercing for StringCoercing<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn serialize(&self, value: &Value) -> Result<Value, ResolveError> {
        self.check(value)
    }

    fn parse_value(&self, input: &Value) -> Result<Value, ResolveError> {
        self.check(input)
    }
}

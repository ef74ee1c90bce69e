//! Error types for schema generation.
//!
//! Every variant is fatal: generation aborts and no partial schema is
//! produced. Resolution-time failures live in [`schemagen_core::ResolveError`].

use schemagen_core::{CoreError, RootKind, TypeKey};
use thiserror::Error;

use crate::schema::CacheKey;

/// Errors that can occur while generating a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No query-root object (or no query field) was registered.
    #[error("Schema has no query root: at least one query object with a query field is required")]
    EmptySchema,

    /// A root object's owning type is not publicly visible.
    #[error("{root} root object {type_name} is not public")]
    InvalidRootType { root: RootKind, type_name: String },

    /// A type has neither a hook-supplied nor a native name.
    #[error("Could not resolve a schema name for type {key}")]
    UnresolvableName { key: TypeKey },

    /// An extender's target type could not be determined.
    #[error("Could not determine the target type extended by {extender}")]
    UnrecognizedGenericBinding { extender: TypeKey },

    /// Two distinct types were given the same schema name.
    #[error("Schema name {name} is claimed by both {first} and {second}")]
    DuplicateTypeName {
        name: String,
        first: CacheKey,
        second: CacheKey,
    },

    /// A shape references a type missing from the universe.
    #[error("Unknown type {key}")]
    UnknownType { key: TypeKey },

    /// A type cannot be represented in the schema.
    #[error("Type {key} is not supported: {reason}")]
    UnsupportedType { key: TypeKey, reason: String },

    /// Settings failed validation.
    #[error("Invalid schema generator configuration: {0}")]
    InvalidConfig(String),

    /// The descriptor registry is inconsistent.
    #[error(transparent)]
    Registry(#[from] CoreError),

    /// The execution engine rejected the finished schema.
    #[error("Failed to build GraphQL schema: {0}")]
    Engine(String),
}

impl SchemaError {
    pub fn unsupported(key: &TypeKey, reason: impl Into<String>) -> Self {
        Self::UnsupportedType {
            key: key.clone(),
            reason: reason.into(),
        }
    }

    /// Returns a stable error code for logs and diagnostics.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptySchema => "EMPTY_SCHEMA",
            Self::InvalidRootType { .. } => "INVALID_ROOT_TYPE",
            Self::UnresolvableName { .. } => "UNRESOLVABLE_NAME",
            Self::UnrecognizedGenericBinding { .. } => "UNRECOGNIZED_GENERIC_BINDING",
            Self::DuplicateTypeName { .. } => "DUPLICATE_TYPE_NAME",
            Self::UnknownType { .. } => "UNKNOWN_TYPE",
            Self::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Registry(_) => "REGISTRY_ERROR",
            Self::Engine(_) => "SCHEMA_BUILD_FAILED",
        }
    }

    /// Whether the error points at the registered types rather than at the
    /// generator configuration or the engine.
    #[must_use]
    pub fn is_model_error(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_) | Self::Engine(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaError::EmptySchema.error_code(), "EMPTY_SCHEMA");
        assert_eq!(
            SchemaError::InvalidRootType {
                root: RootKind::Subscription,
                type_name: "sample.Hidden".into()
            }
            .error_code(),
            "INVALID_ROOT_TYPE"
        );
        assert_eq!(
            SchemaError::Engine("boom".into()).error_code(),
            "SCHEMA_BUILD_FAILED"
        );
    }

    #[test]
    fn test_messages_name_the_type() {
        let err = SchemaError::InvalidRootType {
            root: RootKind::Query,
            type_name: "sample.Hidden".into(),
        };
        assert_eq!(err.to_string(), "Query root object sample.Hidden is not public");

        let err = SchemaError::UnrecognizedGenericBinding {
            extender: TypeKey::new("sample.Orphan"),
        };
        assert!(err.to_string().contains("sample.Orphan"));
    }

    #[test]
    fn test_duplicate_name_message() {
        let err = SchemaError::DuplicateTypeName {
            name: "ItemInput".into(),
            first: CacheKey::new(TypeKey::new("sample.ItemInput"), false),
            second: CacheKey::new(TypeKey::new("sample.Item"), true),
        };
        assert_eq!(err.error_code(), "DUPLICATE_TYPE_NAME");
        assert_eq!(
            err.to_string(),
            "Schema name ItemInput is claimed by both sample.ItemInput and sample.Item (input)"
        );
        assert!(err.is_model_error());
    }

    #[test]
    fn test_model_error_classification() {
        assert!(SchemaError::EmptySchema.is_model_error());
        assert!(SchemaError::unsupported(&TypeKey::new("x.Y"), "no coercion").is_model_error());
        assert!(!SchemaError::InvalidConfig("bad".into()).is_model_error());
        assert!(!SchemaError::Engine("bad".into()).is_model_error());
    }

    #[test]
    fn test_registry_error_conversion() {
        let err: SchemaError = CoreError::duplicate_type("sample.Item").into();
        assert!(matches!(err, SchemaError::Registry(_)));
        assert_eq!(err.to_string(), "Type already registered: sample.Item");
    }
}

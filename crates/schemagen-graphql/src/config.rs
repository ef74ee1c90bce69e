//! Schema generator configuration.
//!
//! Settings can be loaded from the `[schema]` table of a TOML file.
//!
//! # Example Configuration
//!
//! ```toml
//! [schema]
//! query_name = "Query"
//! mutation_name = "Mutation"
//! subscription_name = "Subscription"
//! supported_packages = ["sample"]
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```

use schemagen_core::{RootKind, TypeKey};
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::hooks::SchemaGeneratorHooks;

/// Serializable generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Name of the query root type.
    /// Default: "Query"
    #[serde(default = "default_query_name")]
    pub query_name: String,

    /// Name of the mutation root type.
    /// Default: "Mutation"
    #[serde(default = "default_mutation_name")]
    pub mutation_name: String,

    /// Name of the subscription root type.
    /// Default: "Subscription"
    #[serde(default = "default_subscription_name")]
    pub subscription_name: String,

    /// Qualified-name prefixes that interface and union member discovery is
    /// restricted to. Empty means every registered type.
    #[serde(default)]
    pub supported_packages: Vec<String>,

    /// Maximum query depth enforced by the engine.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity enforced by the engine.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_query_name() -> String {
    "Query".to_string()
}

fn default_mutation_name() -> String {
    "Mutation".to_string()
}

fn default_subscription_name() -> String {
    "Subscription".to_string()
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            query_name: default_query_name(),
            mutation_name: default_mutation_name(),
            subscription_name: default_subscription_name(),
            supported_packages: Vec::new(),
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl GeneratorSettings {
    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a root name is empty or reused, or a limit is zero.
    pub fn validate(&self) -> Result<(), String> {
        let names = [&self.query_name, &self.mutation_name, &self.subscription_name];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err("schema root names must not be empty".into());
        }
        if self.query_name == self.mutation_name
            || self.query_name == self.subscription_name
            || self.mutation_name == self.subscription_name
        {
            return Err("schema root names must be distinct".into());
        }
        if self.max_depth == 0 {
            return Err("schema.max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("schema.max_complexity must be > 0".into());
        }
        Ok(())
    }

    /// Schema name of the given root.
    pub fn root_name(&self, root: RootKind) -> &str {
        match root {
            RootKind::Query => &self.query_name,
            RootKind::Mutation => &self.mutation_name,
            RootKind::Subscription => &self.subscription_name,
        }
    }

    /// Whether subtype discovery may consider `key`.
    pub fn is_supported(&self, key: &TypeKey) -> bool {
        self.supported_packages.is_empty()
            || self
                .supported_packages
                .iter()
                .any(|package| key.as_str().starts_with(package.as_str()))
    }
}

/// Settings plus the hook strategy used for one generation run.
#[derive(Clone, Default)]
pub struct SchemaGeneratorConfig {
    pub settings: GeneratorSettings,
    pub hooks: SchemaGeneratorHooks,
}

impl SchemaGeneratorConfig {
    #[must_use]
    pub fn new(settings: GeneratorSettings) -> Self {
        Self {
            settings,
            hooks: SchemaGeneratorHooks::default(),
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: SchemaGeneratorHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Validates the settings, mapping failures into [`SchemaError`].
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.settings.validate().map_err(SchemaError::InvalidConfig)
    }
}

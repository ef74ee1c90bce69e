//! The schema generator.
//!
//! [`SchemaGenerator`] walks descriptors from the root objects outward,
//! building every reachable type through the [`TypeCache`] and recording
//! field resolvers in a [`CodeRegistry`]. The per-category builders live in
//! sibling modules as further `impl SchemaGenerator` blocks.

use std::cell::RefCell;
use std::sync::Arc;

use async_graphql::dynamic::TypeRef;
use indexmap::IndexMap;
use schemagen_core::{
    Classification, RootKind, TypeDescriptor, TypeForm, TypeKey, TypeShape, TypeUniverse,
};
use tracing::{debug, info, warn};

use super::cache::{CacheKey, TypeCache, TypeHandle};
use super::graph::{SchemaGraph, SchemaType};
use super::registry::CodeRegistry;
use super::top_level::TopLevelObject;
use crate::config::{GeneratorSettings, SchemaGeneratorConfig};
use crate::error::SchemaError;
use crate::hooks::SchemaGeneratorHooks;
use crate::scalars::Coercing;

/// Suffix appended to the names of input variants.
pub const INPUT_SUFFIX: &str = "Input";

/// One generation run over a [`TypeUniverse`].
pub struct SchemaGenerator<'a> {
    universe: &'a TypeUniverse,
    config: &'a SchemaGeneratorConfig,
    cache: TypeCache,
    code_registry: RefCell<CodeRegistry>,
}

impl<'a> SchemaGenerator<'a> {
    /// Creates a generator after validating settings and registry.
    pub fn new(universe: &'a TypeUniverse, config: &'a SchemaGeneratorConfig) -> Result<Self, SchemaError> {
        config.validate()?;
        universe.validate()?;
        Ok(Self {
            universe,
            config,
            cache: TypeCache::new(),
            code_registry: RefCell::new(CodeRegistry::new()),
        })
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.config.settings
    }

    pub fn hooks(&self) -> &SchemaGeneratorHooks {
        &self.config.hooks
    }

    pub fn universe(&self) -> &'a TypeUniverse {
        self.universe
    }

    pub fn cache(&self) -> &TypeCache {
        &self.cache
    }

    /// Builds the root objects and everything reachable from them.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`]; no partial graph is returned.
    pub fn generate(
        self,
        queries: &[TopLevelObject],
        mutations: &[TopLevelObject],
        subscriptions: &[TopLevelObject],
    ) -> Result<SchemaGraph, SchemaError> {
        debug!(
            queries = queries.len(),
            mutations = mutations.len(),
            subscriptions = subscriptions.len(),
            "Starting schema generation"
        );

        let query = self
            .root_object(RootKind::Query, queries)?
            .ok_or(SchemaError::EmptySchema)?;
        let mutation = self.root_object(RootKind::Mutation, mutations)?;
        let subscription = self.root_object(RootKind::Subscription, subscriptions)?;

        let mut owners: IndexMap<String, CacheKey> = IndexMap::new();
        let mut types = IndexMap::new();
        for (key, node) in self.cache.finalized() {
            let name = node.name().to_string();
            if let Some(first) = owners.get(&name) {
                warn!(type_name = %name, first = %first, second = %key, "Two types share a schema name");
                return Err(SchemaError::DuplicateTypeName {
                    name,
                    first: first.clone(),
                    second: key,
                });
            }
            owners.insert(name.clone(), key);
            types.insert(name, node);
        }

        let graph = SchemaGraph {
            query,
            mutation,
            subscription,
            types,
            code_registry: self.code_registry.into_inner(),
        };
        info!(
            types = graph.types.len(),
            resolvers = graph.code_registry.len(),
            "Schema generation complete"
        );
        Ok(graph)
    }

    /// Reference to the schema type of `shape`, generating it if needed.
    ///
    /// `input` selects input variants for argument positions.
    pub fn type_ref(&self, shape: &TypeShape, input: bool) -> Result<TypeRef, SchemaError> {
        match self.hooks().will_resolve_monad(shape) {
            TypeShape::Named { key, nullable } => {
                let handle = self.generate_type(&key, input)?;
                Ok(with_nullability(TypeRef::named(handle.name()), nullable))
            }
            TypeShape::List { of, nullable } => {
                let inner = self.type_ref(&of, input)?;
                Ok(with_nullability(TypeRef::List(Box::new(inner)), nullable))
            }
            TypeShape::Wrapped { wrapper, of } => Err(SchemaError::unsupported(
                of.named_key(),
                format!("no hook unwraps the {wrapper} around it"),
            )),
        }
    }

    /// Builds or reuses the schema type for `key`.
    pub fn generate_type(&self, key: &TypeKey, input: bool) -> Result<TypeHandle, SchemaError> {
        let ty = self.descriptor(key)?;
        if let TypeForm::Builtin(scalar) = ty.form {
            return Ok(TypeHandle::Builtin(scalar.graphql_name()));
        }

        let classification = ty.classify(input);
        let input = classification == Classification::Input;
        let name = self.type_name(ty, input)?;
        self.cache
            .get_or_build(CacheKey::new(ty.key.clone(), input), &name, || {
                self.build(ty, classification, &name, None)
            })
    }

    /// Builds `ty` as an object that explicitly implements `interface`.
    pub(crate) fn implementor(&self, ty: &TypeDescriptor, interface: &str) -> Result<TypeHandle, SchemaError> {
        let name = self.type_name(ty, false)?;
        self.cache
            .get_or_build(CacheKey::new(ty.key.clone(), false), &name, || {
                self.build(ty, Classification::Object, &name, Some(interface))
            })
    }

    fn build(
        &self,
        ty: &TypeDescriptor,
        classification: Classification,
        name: &str,
        interface: Option<&str>,
    ) -> Result<SchemaType, SchemaError> {
        let hooks = self.hooks();
        let node = match hooks.will_generate_type(ty) {
            Some(node) => {
                debug!(type_key = %ty.key, name = node.name(), "Using substituted type");
                node
            }
            None => match classification {
                Classification::Object => self.object_type(ty, name, interface)?,
                Classification::Interface => self.interface_type(ty, name)?,
                Classification::Union => self.union_type(ty, name)?,
                Classification::Enum => self.enum_type(ty, name),
                Classification::Scalar => return Err(self.scalar_type(ty)),
                Classification::Input => self.input_type(ty, name)?,
            },
        };

        let node = hooks.will_add_type_to_schema(ty, node);
        let node = self.with_registry(|registry| hooks.on_rewire_type(node, registry));
        hooks.did_generate_type(ty, &node);
        Ok(node)
    }

    pub(crate) fn descriptor(&self, key: &TypeKey) -> Result<&'a Arc<TypeDescriptor>, SchemaError> {
        self.universe
            .get(key)
            .ok_or_else(|| SchemaError::UnknownType { key: key.clone() })
    }

    /// Schema name of `ty`: the naming hook, else the native name.
    pub(crate) fn type_name(&self, ty: &TypeDescriptor, input: bool) -> Result<String, SchemaError> {
        let name = self
            .hooks()
            .type_name(ty)
            .or_else(|| ty.name.clone())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| SchemaError::UnresolvableName { key: ty.key.clone() })?;

        if input && !name.ends_with(INPUT_SUFFIX) {
            Ok(format!("{name}{INPUT_SUFFIX}"))
        } else {
            Ok(name)
        }
    }

    /// Concrete registered subtypes of `ty` within the supported packages.
    pub(crate) fn object_subtypes(&self, ty: &TypeDescriptor) -> Vec<&'a Arc<TypeDescriptor>> {
        self.universe
            .subtypes_of(&ty.key)
            .into_iter()
            .filter(|sub| self.settings().is_supported(&sub.key))
            .filter(|sub| sub.classify(false) == Classification::Object)
            .collect()
    }

    /// Coercion of the custom scalar a shape refers to, once generated.
    pub(crate) fn scalar_coercing(&self, shape: &TypeShape) -> Option<Arc<dyn Coercing>> {
        let handle = self
            .cache
            .get(&CacheKey::new(shape.named_key().clone(), false))?;
        match handle.node()?.as_ref() {
            SchemaType::Scalar(node) => Some(Arc::clone(&node.coercing)),
            _ => None,
        }
    }

    pub(crate) fn with_registry<R>(&self, f: impl FnOnce(&mut CodeRegistry) -> R) -> R {
        f(&mut self.code_registry.borrow_mut())
    }
}

fn with_nullability(type_ref: TypeRef, nullable: bool) -> TypeRef {
    if nullable {
        type_ref
    } else {
        TypeRef::NonNull(Box::new(type_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen_core::{BuiltinScalar, PropertyDescriptor};

    fn config() -> SchemaGeneratorConfig {
        SchemaGeneratorConfig::default()
    }

    #[test]
    fn test_type_ref_nullability() {
        let universe = TypeUniverse::new();
        let config = config();
        let generator = SchemaGenerator::new(&universe, &config).unwrap();

        let shape = TypeShape::list(TypeShape::builtin(BuiltinScalar::String).optional());
        assert_eq!(generator.type_ref(&shape, false).unwrap().to_string(), "[String]!");

        let shape = TypeShape::builtin(BuiltinScalar::Id).optional();
        assert_eq!(generator.type_ref(&shape, true).unwrap().to_string(), "ID");
    }

    #[test]
    fn test_input_names_get_suffix_once() {
        let universe = TypeUniverse::new()
            .with(TypeDescriptor::object("sample.Filter"))
            .and_then(|u| u.with(TypeDescriptor::object("sample.ItemInput")))
            .unwrap();
        let config = config();
        let generator = SchemaGenerator::new(&universe, &config).unwrap();

        let filter = universe.get(&TypeKey::new("sample.Filter")).unwrap();
        let item_input = universe.get(&TypeKey::new("sample.ItemInput")).unwrap();
        assert_eq!(generator.type_name(filter, true).unwrap(), "FilterInput");
        assert_eq!(generator.type_name(filter, false).unwrap(), "Filter");
        assert_eq!(generator.type_name(item_input, true).unwrap(), "ItemInput");
    }

    #[test]
    fn test_anonymous_type_is_unresolvable() {
        let universe = TypeUniverse::new()
            .with(TypeDescriptor::object("sample.$1").anonymous())
            .unwrap();
        let config = config();
        let generator = SchemaGenerator::new(&universe, &config).unwrap();

        let err = generator
            .generate_type(&TypeKey::new("sample.$1"), false)
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvableName { .. }));
    }

    #[test]
    fn test_unknown_and_wrapped_shapes() {
        let universe = TypeUniverse::new();
        let config = config();
        let generator = SchemaGenerator::new(&universe, &config).unwrap();

        let err = generator
            .type_ref(&TypeShape::named("sample.Missing"), false)
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { .. }));

        let wrapped = TypeShape::wrapped("Future", TypeShape::builtin(BuiltinScalar::Int));
        let err = generator.type_ref(&wrapped, false).unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedType { .. }));
    }

    #[test]
    fn test_monad_hook_unwraps() {
        let universe = TypeUniverse::new();
        let config = SchemaGeneratorConfig::default().with_hooks(
            SchemaGeneratorHooks::default().with_monad_resolver(|shape| match shape {
                TypeShape::Wrapped { of, .. } => (**of).clone(),
                other => other.clone(),
            }),
        );
        let generator = SchemaGenerator::new(&universe, &config).unwrap();

        let wrapped = TypeShape::wrapped("Future", TypeShape::builtin(BuiltinScalar::Int));
        assert_eq!(generator.type_ref(&wrapped, false).unwrap().to_string(), "Int!");
    }

    #[test]
    fn test_generate_type_is_cached() {
        let universe = TypeUniverse::new()
            .with(
                TypeDescriptor::object("sample.Item")
                    .property(PropertyDescriptor::new("id", TypeShape::builtin(BuiltinScalar::Id))),
            )
            .unwrap();
        let config = config();
        let generator = SchemaGenerator::new(&universe, &config).unwrap();

        let key = TypeKey::new("sample.Item");
        let first = generator.generate_type(&key, false).unwrap();
        let second = generator.generate_type(&key, false).unwrap();
        assert!(Arc::ptr_eq(first.node().unwrap(), second.node().unwrap()));

        let input = generator.generate_type(&key, true).unwrap();
        assert_eq!(input.name(), "ItemInput");
        assert_eq!(generator.cache().len(), 2);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let universe = TypeUniverse::new();
        let config = SchemaGeneratorConfig::new(GeneratorSettings {
            max_depth: 0,
            ..Default::default()
        });
        assert!(matches!(
            SchemaGenerator::new(&universe, &config),
            Err(SchemaError::InvalidConfig(_))
        ));
    }
}

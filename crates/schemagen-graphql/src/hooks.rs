//! Customization points consulted during generation.
//!
//! [`SchemaGeneratorHooks`] holds one independently replaceable strategy per
//! hook. Every strategy has a neutral default, so callers override only
//! what they need:
//!
//! ```ignore
//! let hooks = SchemaGeneratorHooks::default()
//!     .with_type_substitution(|ty| (ty.key.as_str() == "sample.Uuid").then(uuid_scalar))
//!     .with_function_filter(|f| !f.name.starts_with("internal"));
//! ```

use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::SchemaBuilder;
use schemagen_core::{
    FunctionDescriptor, PropertyDescriptor, RootKind, TypeDescriptor, TypeShape,
};

use crate::arguments::{ArgumentResolver, ExecutionPredicate, NoCustomArguments};
use crate::directives::DirectiveWiringFactory;
use crate::extenders::{Extender, ExtenderRegistry};
use crate::schema::{CodeRegistry, FieldCoordinates, SchemaField, SchemaType};

type SchemaBuilderHook = dyn Fn(SchemaBuilder) -> SchemaBuilder + Send + Sync;
type TypeSubstitution = dyn Fn(&TypeDescriptor) -> Option<SchemaType> + Send + Sync;
type TypeHook = dyn Fn(&TypeDescriptor, SchemaType) -> SchemaType + Send + Sync;
type TypeObserver = dyn Fn(&TypeDescriptor, &SchemaType) + Send + Sync;
type ShapeHook = dyn Fn(&TypeShape) -> TypeShape + Send + Sync;
type TypePredicate = dyn Fn(&TypeDescriptor) -> bool + Send + Sync;
type PropertyPredicate = dyn Fn(&PropertyDescriptor) -> bool + Send + Sync;
type FunctionPredicate = dyn Fn(&FunctionDescriptor) -> bool + Send + Sync;
type TopLevelPredicate = dyn Fn(RootKind, &FunctionDescriptor) -> bool + Send + Sync;
type TypeRewire = dyn Fn(SchemaType, &mut CodeRegistry) -> SchemaType + Send + Sync;
type FieldRewire =
    dyn Fn(SchemaField, &FieldCoordinates, &mut CodeRegistry) -> SchemaField + Send + Sync;
type FieldHook = dyn Fn(&FunctionDescriptor, SchemaField) -> SchemaField + Send + Sync;
type ExtenderLookup = dyn Fn(&TypeDescriptor) -> Vec<Extender> + Send + Sync;
type TypeNaming = dyn Fn(&TypeDescriptor) -> Option<String> + Send + Sync;

/// Hook strategy for one generator configuration.
#[derive(Clone)]
pub struct SchemaGeneratorHooks {
    will_build_schema: Arc<SchemaBuilderHook>,
    will_generate_type: Arc<TypeSubstitution>,
    will_add_type_to_schema: Arc<TypeHook>,
    did_generate_type: Arc<TypeObserver>,
    will_resolve_monad: Arc<ShapeHook>,
    is_valid_superclass: Arc<TypePredicate>,
    is_valid_property: Arc<PropertyPredicate>,
    is_valid_function: Arc<FunctionPredicate>,
    is_valid_top_level_function: Arc<TopLevelPredicate>,
    rewire_type: Option<Arc<TypeRewire>>,
    rewire_field: Option<Arc<FieldRewire>>,
    did_generate_query_field: Arc<FieldHook>,
    did_generate_mutation_field: Arc<FieldHook>,
    did_generate_subscription_field: Arc<FieldHook>,
    type_extenders: Arc<ExtenderLookup>,
    type_name: Arc<TypeNaming>,
    argument_resolver: Arc<dyn ArgumentResolver>,
    execution_predicate: Option<Arc<dyn ExecutionPredicate>>,
    wiring_factory: DirectiveWiringFactory,
}

impl Default for SchemaGeneratorHooks {
    fn default() -> Self {
        Self {
            will_build_schema: Arc::new(|builder| builder),
            will_generate_type: Arc::new(|_| None),
            will_add_type_to_schema: Arc::new(|_, ty| ty),
            did_generate_type: Arc::new(|_, _| {}),
            will_resolve_monad: Arc::new(TypeShape::clone),
            is_valid_superclass: Arc::new(|_| true),
            is_valid_property: Arc::new(|_| true),
            is_valid_function: Arc::new(|_| true),
            is_valid_top_level_function: Arc::new(|_, _| true),
            rewire_type: None,
            rewire_field: None,
            did_generate_query_field: Arc::new(|_, field| field),
            did_generate_mutation_field: Arc::new(|_, field| field),
            did_generate_subscription_field: Arc::new(|_, field| field),
            type_extenders: Arc::new(|_| Vec::new()),
            type_name: Arc::new(|ty: &TypeDescriptor| ty.name_override.clone()),
            argument_resolver: Arc::new(NoCustomArguments),
            execution_predicate: None,
            wiring_factory: DirectiveWiringFactory::default(),
        }
    }
}

impl SchemaGeneratorHooks {
    pub fn new() -> Self {
        Self::default()
    }

    // Setters

    /// Last chance to adjust the engine builder before the schema is finished.
    #[must_use]
    pub fn with_schema_builder_hook(
        mut self,
        hook: impl Fn(SchemaBuilder) -> SchemaBuilder + Send + Sync + 'static,
    ) -> Self {
        self.will_build_schema = Arc::new(hook);
        self
    }

    /// Supplies a prebuilt node for a type, bypassing reflection.
    #[must_use]
    pub fn with_type_substitution(
        mut self,
        hook: impl Fn(&TypeDescriptor) -> Option<SchemaType> + Send + Sync + 'static,
    ) -> Self {
        self.will_generate_type = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn with_type_transform(
        mut self,
        hook: impl Fn(&TypeDescriptor, SchemaType) -> SchemaType + Send + Sync + 'static,
    ) -> Self {
        self.will_add_type_to_schema = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn with_type_observer(
        mut self,
        hook: impl Fn(&TypeDescriptor, &SchemaType) + Send + Sync + 'static,
    ) -> Self {
        self.did_generate_type = Arc::new(hook);
        self
    }

    /// Unwraps deferred or monadic shapes (futures, publishers, ...).
    #[must_use]
    pub fn with_monad_resolver(
        mut self,
        hook: impl Fn(&TypeShape) -> TypeShape + Send + Sync + 'static,
    ) -> Self {
        self.will_resolve_monad = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn with_superclass_filter(
        mut self,
        hook: impl Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_valid_superclass = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn with_property_filter(
        mut self,
        hook: impl Fn(&PropertyDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_valid_property = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn with_function_filter(
        mut self,
        hook: impl Fn(&FunctionDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_valid_function = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn with_top_level_filter(
        mut self,
        hook: impl Fn(RootKind, &FunctionDescriptor) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_valid_top_level_function = Arc::new(hook);
        self
    }

    /// Replaces directive wiring for generated types.
    #[must_use]
    pub fn with_type_rewire(
        mut self,
        hook: impl Fn(SchemaType, &mut CodeRegistry) -> SchemaType + Send + Sync + 'static,
    ) -> Self {
        self.rewire_type = Some(Arc::new(hook));
        self
    }

    /// Replaces directive wiring for generated fields.
    #[must_use]
    pub fn with_field_rewire(
        mut self,
        hook: impl Fn(SchemaField, &FieldCoordinates, &mut CodeRegistry) -> SchemaField
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.rewire_field = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn with_root_field_hook(
        mut self,
        root: RootKind,
        hook: impl Fn(&FunctionDescriptor, SchemaField) -> SchemaField + Send + Sync + 'static,
    ) -> Self {
        let hook: Arc<FieldHook> = Arc::new(hook);
        match root {
            RootKind::Query => self.did_generate_query_field = hook,
            RootKind::Mutation => self.did_generate_mutation_field = hook,
            RootKind::Subscription => self.did_generate_subscription_field = hook,
        }
        self
    }

    #[must_use]
    pub fn with_type_extenders(
        mut self,
        hook: impl Fn(&TypeDescriptor) -> Vec<Extender> + Send + Sync + 'static,
    ) -> Self {
        self.type_extenders = Arc::new(hook);
        self
    }

    /// Looks extenders up in `registry`.
    #[must_use]
    pub fn with_extender_registry(self, registry: ExtenderRegistry) -> Self {
        let registry = Arc::new(registry);
        self.with_type_extenders(move |ty| registry.lookup(&ty.key))
    }

    /// Names types; falling back to the native name when it returns `None`.
    #[must_use]
    pub fn with_type_name(
        mut self,
        hook: impl Fn(&TypeDescriptor) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.type_name = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn with_argument_resolver(mut self, resolver: impl ArgumentResolver + 'static) -> Self {
        self.argument_resolver = Arc::new(resolver);
        self
    }

    #[must_use]
    pub fn with_execution_predicate(mut self, predicate: impl ExecutionPredicate + 'static) -> Self {
        self.execution_predicate = Some(Arc::new(predicate));
        self
    }

    #[must_use]
    pub fn with_wiring_factory(mut self, factory: DirectiveWiringFactory) -> Self {
        self.wiring_factory = factory;
        self
    }

    // Hook calls

    pub fn will_build_schema(&self, builder: SchemaBuilder) -> SchemaBuilder {
        (self.will_build_schema)(builder)
    }

    pub fn will_generate_type(&self, ty: &TypeDescriptor) -> Option<SchemaType> {
        (self.will_generate_type)(ty)
    }

    pub fn will_add_type_to_schema(&self, ty: &TypeDescriptor, node: SchemaType) -> SchemaType {
        (self.will_add_type_to_schema)(ty, node)
    }

    pub fn did_generate_type(&self, ty: &TypeDescriptor, node: &SchemaType) {
        (self.did_generate_type)(ty, node);
    }

    pub fn will_resolve_monad(&self, shape: &TypeShape) -> TypeShape {
        (self.will_resolve_monad)(shape)
    }

    pub fn is_valid_superclass(&self, ty: &TypeDescriptor) -> bool {
        (self.is_valid_superclass)(ty)
    }

    pub fn is_valid_property(&self, property: &PropertyDescriptor) -> bool {
        (self.is_valid_property)(property)
    }

    pub fn is_valid_function(&self, function: &FunctionDescriptor) -> bool {
        (self.is_valid_function)(function)
    }

    pub fn is_valid_top_level_function(&self, root: RootKind, function: &FunctionDescriptor) -> bool {
        (self.is_valid_top_level_function)(root, function)
    }

    /// Post-build rewiring of a type; directive wiring unless replaced.
    pub fn on_rewire_type(&self, ty: SchemaType, registry: &mut CodeRegistry) -> SchemaType {
        match &self.rewire_type {
            Some(hook) => hook(ty, registry),
            None => self.wiring_factory.wire_type(ty),
        }
    }

    /// Post-build rewiring of a field; directive wiring unless replaced.
    pub fn on_rewire_field(
        &self,
        field: SchemaField,
        coordinates: &FieldCoordinates,
        registry: &mut CodeRegistry,
    ) -> SchemaField {
        match &self.rewire_field {
            Some(hook) => hook(field, coordinates, registry),
            None => self.wiring_factory.wire_field(field, coordinates, registry),
        }
    }

    pub fn did_generate_root_field(
        &self,
        root: RootKind,
        function: &FunctionDescriptor,
        field: SchemaField,
    ) -> SchemaField {
        match root {
            RootKind::Query => (self.did_generate_query_field)(function, field),
            RootKind::Mutation => (self.did_generate_mutation_field)(function, field),
            RootKind::Subscription => (self.did_generate_subscription_field)(function, field),
        }
    }

    pub fn type_extenders(&self, ty: &TypeDescriptor) -> Vec<Extender> {
        (self.type_extenders)(ty)
    }

    pub fn type_name(&self, ty: &TypeDescriptor) -> Option<String> {
        (self.type_name)(ty)
    }

    pub fn argument_resolver(&self) -> &Arc<dyn ArgumentResolver> {
        &self.argument_resolver
    }

    pub fn execution_predicate(&self) -> Option<&Arc<dyn ExecutionPredicate>> {
        self.execution_predicate.as_ref()
    }

    pub fn wiring_factory(&self) -> &DirectiveWiringFactory {
        &self.wiring_factory
    }
}

impl fmt::Debug for SchemaGeneratorHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaGeneratorHooks")
            .field("custom_type_rewire", &self.rewire_type.is_some())
            .field("custom_field_rewire", &self.rewire_field.is_some())
            .field("execution_predicate", &self.execution_predicate.is_some())
            .field("wiring_factory", &self.wiring_factory)
            .finish_non_exhaustive()
    }
}

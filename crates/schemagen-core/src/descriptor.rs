//! Descriptor model for schema generation.
//!
//! Descriptors are the ahead-of-time description of the native types and
//! functions that the generator turns into schema nodes. They are populated
//! by static registration (see [`crate::TypeUniverse`]) and carry everything
//! the generator needs: structural shape, visibility, markers and the bodies
//! that are invoked at resolution time.

use std::fmt;
use std::future::Future;

use futures_util::Stream;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::invocation::{FunctionBody, Invocation};

/// Canonical identity of a native type.
///
/// Usually the qualified name, e.g. `sample.Item`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeKey(String);

impl TypeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.0
            .rsplit(['.', ':'])
            .next()
            .unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Visibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Self::Public
    }
}

/// One of the three schema entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootKind {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "Query"),
            Self::Mutation => write!(f, "Mutation"),
            Self::Subscription => write!(f, "Subscription"),
        }
    }
}

/// Scalars every GraphQL engine provides natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuiltinScalar {
    String,
    Int,
    Float,
    Boolean,
    Id,
}

impl BuiltinScalar {
    pub const ALL: [BuiltinScalar; 5] = [
        BuiltinScalar::String,
        BuiltinScalar::Int,
        BuiltinScalar::Float,
        BuiltinScalar::Boolean,
        BuiltinScalar::Id,
    ];

    /// GraphQL name of the scalar, which doubles as its registry key.
    pub fn graphql_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::Id => "ID",
        }
    }

    pub fn key(self) -> TypeKey {
        TypeKey::new(self.graphql_name())
    }
}

/// A constant of a native enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub deprecated: Option<String>,
}

impl EnumValueDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            deprecated: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }
}

/// Structural shape of a native type, the input to classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeForm {
    Class { is_abstract: bool },
    Interface,
    Enumeration { values: Vec<EnumValueDescriptor> },
    Builtin(BuiltinScalar),
    /// An opaque value type that needs a coercion contract from the hooks.
    Scalar,
}

/// Schema category a type is generated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    Input,
}

/// Reference to a type from a property, parameter or return position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Named { key: TypeKey, nullable: bool },
    List { of: Box<TypeShape>, nullable: bool },
    /// A deferred or monadic value (future, publisher, ...) around `of`.
    Wrapped { wrapper: String, of: Box<TypeShape> },
}

impl TypeShape {
    /// A non-null reference to `key`.
    pub fn named(key: impl Into<TypeKey>) -> Self {
        Self::Named {
            key: key.into(),
            nullable: false,
        }
    }

    pub fn builtin(scalar: BuiltinScalar) -> Self {
        Self::named(scalar.key())
    }

    /// A non-null list of `of`.
    pub fn list(of: TypeShape) -> Self {
        Self::List {
            of: Box::new(of),
            nullable: false,
        }
    }

    pub fn wrapped(wrapper: impl Into<String>, of: TypeShape) -> Self {
        Self::Wrapped {
            wrapper: wrapper.into(),
            of: Box::new(of),
        }
    }

    /// Marks the outermost level nullable.
    #[must_use]
    pub fn optional(self) -> Self {
        match self {
            Self::Named { key, .. } => Self::Named {
                key,
                nullable: true,
            },
            Self::List { of, .. } => Self::List { of, nullable: true },
            Self::Wrapped { wrapper, of } => Self::Wrapped {
                wrapper,
                of: Box::new(of.optional()),
            },
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Named { nullable, .. } | Self::List { nullable, .. } => *nullable,
            Self::Wrapped { of, .. } => of.is_nullable(),
        }
    }

    /// Key of the innermost named type.
    pub fn named_key(&self) -> &TypeKey {
        match self {
            Self::Named { key, .. } => key,
            Self::List { of, .. } | Self::Wrapped { of, .. } => of.named_key(),
        }
    }
}

/// A directive attached to a type or member.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Directive {
    pub name: String,
    pub arguments: IndexMap<String, serde_json::Value>,
}

impl Directive {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }
}

/// A data member of a type, resolved from the parent value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub shape: TypeShape,
    pub visibility: Visibility,
    pub ignored: bool,
    pub inherited: bool,
    pub description: Option<String>,
    pub deprecated: Option<String>,
    pub directives: Vec<Directive>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            visibility: Visibility::Public,
            ignored: false,
            inherited: false,
            description: None,
            deprecated: None,
            directives: Vec::new(),
        }
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Excludes the property from the schema.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }

    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

/// A parameter of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub shape: TypeShape,
    /// Receives the enclosing object instead of a schema argument.
    pub parent_bound: bool,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            parent_bound: false,
            description: None,
            directives: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }
}

/// A function that may become a schema field.
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    pub name: String,
    /// Declaring type; `None` for free resolver functions.
    pub owner: Option<TypeKey>,
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: TypeShape,
    pub root: Option<RootKind>,
    pub visibility: Visibility,
    pub ignored: bool,
    /// Declared by the universal base type (equality, hashing, ...).
    pub from_base: bool,
    pub inherited: bool,
    pub description: Option<String>,
    pub deprecated: Option<String>,
    pub directives: Vec<Directive>,
    pub body: Option<FunctionBody>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, return_type: TypeShape) -> Self {
        Self {
            name: name.into(),
            owner: None,
            parameters: Vec::new(),
            return_type,
            root: None,
            visibility: Visibility::Public,
            ignored: false,
            from_base: false,
            inherited: false,
            description: None,
            deprecated: None,
            directives: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn owner(mut self, owner: impl Into<TypeKey>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn argument(self, name: impl Into<String>, shape: TypeShape) -> Self {
        self.parameter(ParameterDescriptor::new(name, shape))
    }

    /// Adds the parent-bound parameter. It always becomes the first parameter.
    #[must_use]
    pub fn parent(mut self, name: impl Into<String>, shape: TypeShape) -> Self {
        let mut parameter = ParameterDescriptor::new(name, shape);
        parameter.parent_bound = true;
        self.parameters.retain(|p| !p.parent_bound);
        self.parameters.insert(0, parameter);
        self
    }

    #[must_use]
    pub fn root(mut self, root: RootKind) -> Self {
        self.root = Some(root);
        self
    }

    #[must_use]
    pub fn query(self) -> Self {
        self.root(RootKind::Query)
    }

    #[must_use]
    pub fn mutation(self) -> Self {
        self.root(RootKind::Mutation)
    }

    #[must_use]
    pub fn subscription(self) -> Self {
        self.root(RootKind::Subscription)
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Excludes the function from the schema.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    #[must_use]
    pub fn from_base(mut self) -> Self {
        self.from_base = true;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn deprecated(mut self, reason: impl Into<String>) -> Self {
        self.deprecated = Some(reason.into());
        self
    }

    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Sets a body producing a single value.
    #[must_use]
    pub fn resolve<F, Fut>(mut self, body: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value, ResolveError>> + Send + 'static,
    {
        self.body = Some(FunctionBody::unary(body));
        self
    }

    /// Sets a body producing a stream of values (subscriptions).
    #[must_use]
    pub fn stream<F, S>(mut self, body: F) -> Self
    where
        F: Fn(Invocation) -> S + Send + Sync + 'static,
        S: Stream<Item = Result<serde_json::Value, ResolveError>> + Send + 'static,
    {
        self.body = Some(FunctionBody::stream(body));
        self
    }

    /// The parent-bound parameter, if the function declares one.
    pub fn parent_parameter(&self) -> Option<&ParameterDescriptor> {
        self.parameters.first().filter(|p| p.parent_bound)
    }

    pub fn is_parent_resolver(&self) -> bool {
        self.parent_parameter().is_some()
    }
}

/// A handle to one native type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub key: TypeKey,
    /// Native display name; `None` for anonymous types.
    pub name: Option<String>,
    /// Explicit schema name, takes precedence over `name`.
    pub name_override: Option<String>,
    pub form: TypeForm,
    pub visibility: Visibility,
    pub properties: Vec<PropertyDescriptor>,
    pub functions: Vec<FunctionDescriptor>,
    pub supertypes: Vec<TypeKey>,
    /// Type this one contributes fields to when registered as an extender.
    pub extends: Option<TypeKey>,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
}

impl TypeDescriptor {
    pub fn new(key: impl Into<TypeKey>, form: TypeForm) -> Self {
        let key = key.into();
        let name = Some(key.simple_name().to_string()).filter(|n| !n.is_empty());
        Self {
            key,
            name,
            name_override: None,
            form,
            visibility: Visibility::Public,
            properties: Vec::new(),
            functions: Vec::new(),
            supertypes: Vec::new(),
            extends: None,
            description: None,
            directives: Vec::new(),
        }
    }

    /// A concrete class.
    pub fn object(key: impl Into<TypeKey>) -> Self {
        Self::new(key, TypeForm::Class { is_abstract: false })
    }

    pub fn abstract_class(key: impl Into<TypeKey>) -> Self {
        Self::new(key, TypeForm::Class { is_abstract: true })
    }

    pub fn interface(key: impl Into<TypeKey>) -> Self {
        Self::new(key, TypeForm::Interface)
    }

    pub fn enumeration(
        key: impl Into<TypeKey>,
        values: impl IntoIterator<Item = EnumValueDescriptor>,
    ) -> Self {
        Self::new(
            key,
            TypeForm::Enumeration {
                values: values.into_iter().collect(),
            },
        )
    }

    pub fn scalar(key: impl Into<TypeKey>) -> Self {
        Self::new(key, TypeForm::Scalar)
    }

    pub fn builtin(scalar: BuiltinScalar) -> Self {
        Self::new(scalar.key(), TypeForm::Builtin(scalar))
    }

    /// Overrides the native display name.
    #[must_use]
    pub fn native_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Clears the native display name.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.name = None;
        self
    }

    #[must_use]
    pub fn graphql_name(mut self, name: impl Into<String>) -> Self {
        self.name_override = Some(name.into());
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    #[must_use]
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds a declared function, owned by this type unless it names an owner.
    #[must_use]
    pub fn function(mut self, function: FunctionDescriptor) -> Self {
        let function = if function.owner.is_none() {
            function.owner(self.key.clone())
        } else {
            function
        };
        self.functions.push(function);
        self
    }

    /// Declares a supertype by key without inheriting its members.
    #[must_use]
    pub fn supertype(mut self, key: impl Into<TypeKey>) -> Self {
        self.supertypes.push(key.into());
        self
    }

    /// Declares `parent` as a supertype and inherits its members.
    ///
    /// Members already declared under the same name are kept (overrides).
    #[must_use]
    pub fn implements(mut self, parent: &TypeDescriptor) -> Self {
        self.supertypes.push(parent.key.clone());
        for property in &parent.properties {
            if self.properties.iter().all(|p| p.name != property.name) {
                let mut property = property.clone();
                property.inherited = true;
                self.properties.push(property);
            }
        }
        for function in &parent.functions {
            if self.functions.iter().all(|f| f.name != function.name) {
                let mut function = function.clone();
                function.inherited = true;
                self.functions.push(function);
            }
        }
        self
    }

    /// Declares the type this one extends as an extender.
    #[must_use]
    pub fn extends(mut self, target: impl Into<TypeKey>) -> Self {
        self.extends = Some(target.into());
        self
    }

    pub fn is_abstract(&self) -> bool {
        matches!(
            self.form,
            TypeForm::Interface | TypeForm::Class { is_abstract: true }
        )
    }

    pub fn declared_properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(|p| !p.inherited)
    }

    pub fn declared_functions(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.iter().filter(|f| !f.inherited && !f.from_base)
    }

    /// Classifies the type purely from its structural shape.
    ///
    /// `input` selects the input variant for types used in argument position.
    pub fn classify(&self, input: bool) -> Classification {
        match &self.form {
            TypeForm::Builtin(_) | TypeForm::Scalar => Classification::Scalar,
            TypeForm::Enumeration { .. } => Classification::Enum,
            _ if input => Classification::Input,
            _ if self.is_abstract() => {
                if self.declared_properties().next().is_none()
                    && self.declared_functions().next().is_none()
                {
                    Classification::Union
                } else {
                    Classification::Interface
                }
            }
            _ => Classification::Object,
        }
    }
}

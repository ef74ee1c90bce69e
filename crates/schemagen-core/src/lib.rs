//! # schemagen-core
//!
//! Descriptor model shared by the schema generator and the applications
//! that register types with it.
//!
//! - [`descriptor`] - type, property, function and parameter descriptors
//! - [`universe`] - the static registry descriptors are looked up in
//! - [`invocation`] - what a function body receives when its field resolves
//! - [`error`] - registry and resolution errors

pub mod descriptor;
pub mod error;
pub mod invocation;
pub mod universe;

pub use descriptor::{
    BuiltinScalar, Classification, Directive, EnumValueDescriptor, FunctionDescriptor,
    ParameterDescriptor, PropertyDescriptor, RootKind, TypeDescriptor, TypeForm, TypeKey,
    TypeShape, Visibility,
};
pub use error::{CoreError, ResolveError, Result};
pub use invocation::{FunctionBody, Instance, Invocation, ValueFuture, ValueStream, instance};
pub use universe::TypeUniverse;

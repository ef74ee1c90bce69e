//! Filter chains deciding which members become schema elements.
//!
//! Each chain is a plain conjunction of predicates, combined with the
//! matching hook.

use std::sync::Arc;

use schemagen_core::{FunctionDescriptor, PropertyDescriptor, RootKind, TypeDescriptor, TypeUniverse};

use crate::hooks::SchemaGeneratorHooks;

type PropertyFilter = fn(&PropertyDescriptor) -> bool;
type FunctionFilter = fn(&FunctionDescriptor) -> bool;
type SuperclassFilter = fn(&TypeDescriptor) -> bool;

const PROPERTY_FILTERS: &[PropertyFilter] = &[|p| p.visibility.is_public(), |p| !p.ignored];

const BASE_FUNCTION_FILTERS: &[FunctionFilter] = &[
    |f| f.visibility.is_public(),
    |f| !f.ignored,
    |f| !f.from_base,
];

const MEMBER_FUNCTION_FILTERS: &[FunctionFilter] = &[
    |f| f.root.is_none(),
    |f| !f.is_parent_resolver(),
];

const TOP_LEVEL_FUNCTION_FILTERS: &[FunctionFilter] = &[|f| !f.is_parent_resolver()];

const SUPERCLASS_FILTERS: &[SuperclassFilter] = &[|t| t.visibility.is_public(), |t| t.is_abstract()];

fn passes<T>(filters: &[fn(&T) -> bool], item: &T) -> bool {
    filters.iter().all(|filter| filter(item))
}

pub(crate) fn is_valid_property(property: &PropertyDescriptor, hooks: &SchemaGeneratorHooks) -> bool {
    passes(PROPERTY_FILTERS, property) && hooks.is_valid_property(property)
}

/// Ordinary member functions: no root marker, no parent binding.
pub(crate) fn is_valid_function(function: &FunctionDescriptor, hooks: &SchemaGeneratorHooks) -> bool {
    passes(BASE_FUNCTION_FILTERS, function)
        && passes(MEMBER_FUNCTION_FILTERS, function)
        && hooks.is_valid_function(function)
}

/// A function is eligible for `root` when it is unmarked or marked for it.
pub(crate) fn is_valid_top_level_function(
    function: &FunctionDescriptor,
    root: RootKind,
    hooks: &SchemaGeneratorHooks,
) -> bool {
    passes(BASE_FUNCTION_FILTERS, function)
        && passes(TOP_LEVEL_FUNCTION_FILTERS, function)
        && function.root.is_none_or(|marker| marker == root)
        && hooks.is_valid_function(function)
        && hooks.is_valid_top_level_function(root, function)
}

/// Functions an extender contributes to its declared target.
pub(crate) fn is_declared_extension(function: &FunctionDescriptor) -> bool {
    passes(BASE_FUNCTION_FILTERS, function) && passes(MEMBER_FUNCTION_FILTERS, function)
}

/// Functions an extender contributes to the type of their parent parameter.
pub(crate) fn is_parent_extension(function: &FunctionDescriptor) -> bool {
    passes(BASE_FUNCTION_FILTERS, function) && function.root.is_none() && function.is_parent_resolver()
}

pub(crate) fn valid_properties<'d>(
    ty: &'d TypeDescriptor,
    hooks: &'d SchemaGeneratorHooks,
) -> impl Iterator<Item = &'d PropertyDescriptor> {
    ty.properties.iter().filter(move |p| is_valid_property(p, hooks))
}

pub(crate) fn valid_functions<'d>(
    ty: &'d TypeDescriptor,
    hooks: &'d SchemaGeneratorHooks,
) -> impl Iterator<Item = &'d FunctionDescriptor> {
    ty.functions.iter().filter(move |f| is_valid_function(f, hooks))
}

pub(crate) fn valid_top_level_functions<'d>(
    ty: &'d TypeDescriptor,
    root: RootKind,
    hooks: &'d SchemaGeneratorHooks,
) -> impl Iterator<Item = &'d FunctionDescriptor> {
    ty.functions
        .iter()
        .filter(move |f| is_valid_top_level_function(f, root, hooks))
}

/// Transitive supertypes of `ty` that may contribute interfaces or unions.
///
/// Transitive so that an object lists every interface it inherits.
pub(crate) fn valid_superclasses<'u>(
    ty: &TypeDescriptor,
    universe: &'u TypeUniverse,
    hooks: &SchemaGeneratorHooks,
) -> Vec<&'u Arc<TypeDescriptor>> {
    universe
        .ancestors(&ty.key)
        .iter()
        .filter_map(|key| universe.get(key))
        .filter(|sup| passes(SUPERCLASS_FILTERS, &***sup) && hooks.is_valid_superclass(sup))
        .collect()
}

//! Static registry of type descriptors.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use crate::descriptor::{BuiltinScalar, TypeDescriptor, TypeKey};
use crate::error::{CoreError, Result};

/// Every type the generator may reflect over, keyed by canonical key.
///
/// Built-in scalars are pre-registered. Registration order is preserved and
/// drives the order of subtype discovery.
#[derive(Debug, Clone)]
pub struct TypeUniverse {
    types: IndexMap<TypeKey, Arc<TypeDescriptor>>,
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeUniverse {
    pub fn new() -> Self {
        let types = BuiltinScalar::ALL
            .into_iter()
            .map(|scalar| (scalar.key(), Arc::new(TypeDescriptor::builtin(scalar))))
            .collect();
        Self { types }
    }

    /// Registers a descriptor.
    ///
    /// # Errors
    ///
    /// Fails on duplicate keys and on parent-bound parameters that are not
    /// the first parameter of their function.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<()> {
        if self.types.contains_key(&descriptor.key) {
            return Err(CoreError::duplicate_type(descriptor.key.as_str()));
        }
        for function in &descriptor.functions {
            let misplaced = function
                .parameters
                .iter()
                .skip(1)
                .any(|parameter| parameter.parent_bound);
            if misplaced {
                return Err(CoreError::MisplacedParentParameter {
                    type_key: descriptor.key.to_string(),
                    function: function.name.clone(),
                });
            }
        }
        trace!(type_key = %descriptor.key, "Registered type descriptor");
        self.types.insert(descriptor.key.clone(), Arc::new(descriptor));
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: TypeDescriptor) -> Result<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// Checks that every declared supertype is registered.
    pub fn validate(&self) -> Result<()> {
        for descriptor in self.types.values() {
            for supertype in &descriptor.supertypes {
                if !self.types.contains_key(supertype) {
                    return Err(CoreError::unknown_supertype(
                        descriptor.key.as_str(),
                        supertype.as_str(),
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &TypeKey) -> Option<&Arc<TypeDescriptor>> {
        self.types.get(key)
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.types.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All transitive supertypes of `key`, nearest first.
    pub fn ancestors(&self, key: &TypeKey) -> Vec<TypeKey> {
        let mut seen = HashSet::new();
        let mut queue: VecDeque<TypeKey> = self
            .get(key)
            .map(|d| d.supertypes.iter().cloned().collect())
            .unwrap_or_default();
        let mut ancestors = Vec::new();

        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(descriptor) = self.get(&next) {
                queue.extend(descriptor.supertypes.iter().cloned());
            }
            ancestors.push(next);
        }
        ancestors
    }

    /// Whether `sub` equals `sup` or transitively declares it as a supertype.
    pub fn is_subtype_of(&self, sub: &TypeKey, sup: &TypeKey) -> bool {
        sub == sup || self.ancestors(sub).contains(sup)
    }

    /// Every registered type that transitively declares `key` as a supertype.
    pub fn subtypes_of(&self, key: &TypeKey) -> Vec<&Arc<TypeDescriptor>> {
        self.types
            .values()
            .filter(|d| &d.key != key && self.ancestors(&d.key).contains(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FunctionDescriptor, ParameterDescriptor, PropertyDescriptor, TypeShape};

    fn vehicles() -> TypeUniverse {
        let vehicle = TypeDescriptor::interface("sample.Vehicle")
            .property(PropertyDescriptor::new("color", TypeShape::builtin(BuiltinScalar::String)));
        let truck = TypeDescriptor::object("sample.Truck").implements(&vehicle);
        let monster = TypeDescriptor::object("sample.MonsterTruck").implements(&truck);
        TypeUniverse::new()
            .with(vehicle)
            .and_then(|u| u.with(truck))
            .and_then(|u| u.with(monster))
            .unwrap()
    }

    #[test]
    fn test_builtins_are_registered() {
        let universe = TypeUniverse::new();
        assert_eq!(universe.len(), 5);
        assert!(universe.contains(&TypeKey::new("ID")));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut universe = TypeUniverse::new();
        universe.register(TypeDescriptor::object("sample.Item")).unwrap();
        let err = universe
            .register(TypeDescriptor::object("sample.Item"))
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateType(_)));
    }

    #[test]
    fn test_misplaced_parent_parameter_fails() {
        let mut parameter = ParameterDescriptor::new("parent", TypeShape::named("sample.Item"));
        parameter.parent_bound = true;
        let function = FunctionDescriptor::new("reviews", TypeShape::builtin(BuiltinScalar::String))
            .argument("limit", TypeShape::builtin(BuiltinScalar::Int))
            .parameter(parameter);
        let resolver = TypeDescriptor::object("sample.ReviewResolver").function(function);

        let err = TypeUniverse::new().with(resolver).unwrap_err();
        assert!(matches!(err, CoreError::MisplacedParentParameter { .. }));
    }

    #[test]
    fn test_subtypes_are_transitive() {
        let universe = vehicles();
        let subtypes: Vec<_> = universe
            .subtypes_of(&TypeKey::new("sample.Vehicle"))
            .into_iter()
            .map(|d| d.key.to_string())
            .collect();
        assert_eq!(subtypes, vec!["sample.Truck", "sample.MonsterTruck"]);
        assert!(universe.is_subtype_of(
            &TypeKey::new("sample.MonsterTruck"),
            &TypeKey::new("sample.Vehicle")
        ));
    }

    #[test]
    fn test_validate_reports_unknown_supertype() {
        let universe = TypeUniverse::new()
            .with(TypeDescriptor::object("sample.Truck").supertype("sample.Vehicle"))
            .unwrap();
        assert!(matches!(
            universe.validate(),
            Err(CoreError::UnknownSupertype { .. })
        ));
        assert!(vehicles().validate().is_ok());
    }
}

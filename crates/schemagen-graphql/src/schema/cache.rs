//! Type cache with cycle placeholders.
//!
//! Each `(type, input variant)` pair is built at most once per generation
//! run. A key is recorded as under construction before its builder runs, so
//! a recursive request for the same key during that build gets a name-only
//! placeholder instead of recursing forever.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use schemagen_core::TypeKey;
use tracing::trace;

use super::graph::SchemaType;
use crate::error::SchemaError;

/// Identity of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub type_key: TypeKey,
    pub input: bool,
}

impl CacheKey {
    pub fn new(type_key: TypeKey, input: bool) -> Self {
        Self { type_key, input }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.input {
            write!(f, "{} (input)", self.type_key)
        } else {
            write!(f, "{}", self.type_key)
        }
    }
}

/// A reference to a generated type.
#[derive(Debug, Clone)]
pub enum TypeHandle {
    /// A finalized node.
    Built(Arc<SchemaType>),
    /// A reference by name to a type that is still being built.
    Placeholder(String),
    /// A scalar the engine provides.
    Builtin(&'static str),
}

impl TypeHandle {
    pub fn name(&self) -> &str {
        match self {
            Self::Built(node) => node.name(),
            Self::Placeholder(name) => name,
            Self::Builtin(name) => name,
        }
    }

    pub fn node(&self) -> Option<&Arc<SchemaType>> {
        match self {
            Self::Built(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

#[derive(Debug)]
enum CacheEntry {
    UnderConstruction(String),
    Finalized(Arc<SchemaType>),
}

/// Per-run memo of generated types.
///
/// Not thread-safe; one cache serves one generation run.
#[derive(Debug, Default)]
pub struct TypeCache {
    entries: RefCell<IndexMap<CacheKey, CacheEntry>>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached node for `key`, or builds it with `build`.
    ///
    /// While `build` runs, requests for `key` return a placeholder named
    /// `name`. A failed build leaves no entry behind.
    pub fn get_or_build<F>(&self, key: CacheKey, name: &str, build: F) -> Result<TypeHandle, SchemaError>
    where
        F: FnOnce() -> Result<SchemaType, SchemaError>,
    {
        if let Some(handle) = self.get(&key) {
            return Ok(handle);
        }

        self.entries
            .borrow_mut()
            .insert(key.clone(), CacheEntry::UnderConstruction(name.to_string()));

        match build() {
            Ok(node) => {
                let node = Arc::new(node);
                trace!(type_key = %key.type_key, input = key.input, name = node.name(), "Finalized type");
                self.entries
                    .borrow_mut()
                    .insert(key, CacheEntry::Finalized(Arc::clone(&node)));
                Ok(TypeHandle::Built(node))
            }
            Err(e) => {
                self.entries.borrow_mut().shift_remove(&key);
                Err(e)
            }
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<TypeHandle> {
        let entries = self.entries.borrow();
        match entries.get(key)? {
            CacheEntry::UnderConstruction(name) => {
                trace!(type_key = %key.type_key, name = %name, "Type under construction, using placeholder");
                Some(TypeHandle::Placeholder(name.clone()))
            }
            CacheEntry::Finalized(node) => Some(TypeHandle::Built(Arc::clone(node))),
        }
    }

    /// Finalized nodes with their keys, in the order construction started.
    pub fn finalized(&self) -> Vec<(CacheKey, Arc<SchemaType>)> {
        self.entries
            .borrow()
            .iter()
            .filter_map(|(key, entry)| match entry {
                CacheEntry::Finalized(node) => Some((key.clone(), Arc::clone(node))),
                CacheEntry::UnderConstruction(_) => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::graph::ObjectNode;

    fn key(name: &str) -> CacheKey {
        CacheKey::new(TypeKey::new(name), false)
    }

    #[test]
    fn test_builds_once() {
        let cache = TypeCache::new();
        let first = cache
            .get_or_build(key("sample.Item"), "Item", || {
                Ok(SchemaType::Object(ObjectNode::new("Item")))
            })
            .unwrap();
        let second = cache
            .get_or_build(key("sample.Item"), "Item", || {
                panic!("must not rebuild a cached type")
            })
            .unwrap();

        assert!(Arc::ptr_eq(first.node().unwrap(), second.node().unwrap()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_recursive_request_gets_placeholder() {
        let cache = TypeCache::new();
        let handle = cache
            .get_or_build(key("sample.Node"), "Node", || {
                let inner = cache.get_or_build(key("sample.Node"), "Node", || {
                    panic!("must not recurse")
                })?;
                assert!(inner.is_placeholder());
                assert_eq!(inner.name(), "Node");
                Ok(SchemaType::Object(ObjectNode::new("Node")))
            })
            .unwrap();
        assert!(!handle.is_placeholder());
        assert_eq!(cache.finalized().len(), 1);
    }

    #[test]
    fn test_cache_key_display() {
        assert_eq!(key("sample.Item").to_string(), "sample.Item");
        assert_eq!(
            CacheKey::new(TypeKey::new("sample.Item"), true).to_string(),
            "sample.Item (input)"
        );
    }

    #[test]
    fn test_input_variant_is_separate() {
        let cache = TypeCache::new();
        cache
            .get_or_build(key("sample.Item"), "Item", || {
                Ok(SchemaType::Object(ObjectNode::new("Item")))
            })
            .unwrap();
        let input = cache.get(&CacheKey::new(TypeKey::new("sample.Item"), true));
        assert!(input.is_none());
    }

    #[test]
    fn test_failed_build_leaves_no_entry() {
        let cache = TypeCache::new();
        let result = cache.get_or_build(key("sample.Bad"), "Bad", || Err(SchemaError::EmptySchema));
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}

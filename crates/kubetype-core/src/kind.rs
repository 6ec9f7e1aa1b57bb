//! Kind resolution against the schema registry
//!
//! Manifest authors are loose with kind casing (`pod`, `Pod`, `POD`). The
//! resolver keeps an index of `lowercase kind -> canonical kind` built from
//! the registry's type names on first use.

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{KubetypeError, Result};
use crate::naming::strip_version;
use crate::registry::SchemaRegistry;
use crate::suggestions::suggest_kind;

/// Lowercase kind to canonical kind, built once per resolver
#[derive(Debug, Default)]
pub struct KindIndex {
    entries: OnceCell<HashMap<String, String>>,
    builds: AtomicUsize,
}

impl KindIndex {
    /// Create an empty, unbuilt index
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the index, building it from `registry` on first access
    ///
    /// Concurrent first callers block until a single build completes.
    pub fn get_or_build(&self, registry: &dyn SchemaRegistry) -> &HashMap<String, String> {
        self.entries.get_or_init(|| {
            self.builds.fetch_add(1, Ordering::Relaxed);

            let mut entries = HashMap::new();
            for name in registry.type_names() {
                let kind = strip_version(name);
                if kind.is_empty() {
                    continue;
                }
                entries.insert(kind.to_lowercase(), kind.to_string());
            }

            tracing::debug!(kinds = entries.len(), "built kind index");
            entries
        })
    }

    /// Whether the index has been built
    pub fn is_built(&self) -> bool {
        self.entries.get().is_some()
    }

    /// How many times the index has been built (0 or 1)
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}

/// Resolves user-supplied kinds to the registry's canonical casing
pub struct KindResolver {
    registry: Arc<dyn SchemaRegistry>,
    index: KindIndex,
}

impl KindResolver {
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self {
            registry,
            index: KindIndex::new(),
        }
    }

    /// Resolve a kind, ignoring case and any version marker
    ///
    /// ```
    /// use std::sync::Arc;
    /// use kubetype_core::{Catalog, KindResolver};
    ///
    /// let resolver = KindResolver::new(Arc::new(Catalog::builtin().unwrap()));
    /// assert_eq!(resolver.resolve("deployment").unwrap(), "Deployment");
    /// ```
    pub fn resolve(&self, prospective_kind: &str) -> Result<String> {
        let index = self.index.get_or_build(self.registry.as_ref());
        let key = strip_version(prospective_kind).to_lowercase();

        index
            .get(&key)
            .cloned()
            .ok_or_else(|| KubetypeError::UnknownKind {
                kind: prospective_kind.to_string(),
                suggestion: suggest_kind(&key, index.values().map(String::as_str)),
            })
    }

    /// Canonical kinds known to the registry, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self
            .index
            .get_or_build(self.registry.as_ref())
            .values()
            .map(String::as_str)
            .collect();
        kinds.sort_unstable();
        kinds
    }

    /// The underlying cache
    pub fn index(&self) -> &KindIndex {
        &self.index
    }

    /// The registry this resolver reads
    pub fn registry(&self) -> &Arc<dyn SchemaRegistry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::registry::TypeDescriptor;
    use std::thread;

    /// Registry wrapper counting how often the type names are enumerated
    struct CountingRegistry {
        inner: Catalog,
        scans: AtomicUsize,
    }

    impl SchemaRegistry for CountingRegistry {
        fn descriptor(&self, name: &str) -> Option<&TypeDescriptor> {
            self.inner.descriptor(name)
        }

        fn type_names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.inner.type_names()
        }
    }

    fn counting() -> Arc<CountingRegistry> {
        Arc::new(CountingRegistry {
            inner: Catalog::builtin().unwrap(),
            scans: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let resolver = KindResolver::new(Arc::new(Catalog::builtin().unwrap()));
        assert_eq!(resolver.resolve("pod").unwrap(), "Pod");
        assert_eq!(resolver.resolve("Pod").unwrap(), "Pod");
        assert_eq!(resolver.resolve("POD").unwrap(), "Pod");
        assert_eq!(resolver.resolve("configmap").unwrap(), "ConfigMap");
    }

    #[test]
    fn test_resolve_strips_version() {
        let resolver = KindResolver::new(Arc::new(Catalog::builtin().unwrap()));
        assert_eq!(resolver.resolve("V1Deployment").unwrap(), "Deployment");
        assert_eq!(resolver.resolve("CoreV1Event").unwrap(), "Event");
    }

    #[test]
    fn test_index_built_once() {
        let registry = counting();
        let resolver = KindResolver::new(registry.clone());
        assert!(!resolver.index().is_built());

        for _ in 0..5 {
            assert_eq!(resolver.resolve("Service").unwrap(), "Service");
        }
        let _ = resolver.resolve("Frobnicator");

        assert!(resolver.index().is_built());
        assert_eq!(resolver.index().build_count(), 1);
        assert_eq!(registry.scans.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_first_build() {
        let registry = counting();
        let resolver = Arc::new(KindResolver::new(registry.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                thread::spawn(move || resolver.resolve("deployment").unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "Deployment");
        }
        assert_eq!(resolver.index().build_count(), 1);
        assert_eq!(registry.scans.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_kind() {
        let resolver = KindResolver::new(Arc::new(Catalog::builtin().unwrap()));
        let err = resolver.resolve("Frobnicator").unwrap_err();
        match err {
            KubetypeError::UnknownKind { kind, .. } => assert_eq!(kind, "Frobnicator"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_kind_suggestion() {
        let resolver = KindResolver::new(Arc::new(Catalog::builtin().unwrap()));
        let err = resolver.resolve("Deploymnet").unwrap_err();
        match err {
            KubetypeError::UnknownKind { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("Did you mean `Deployment`?"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_kinds_sorted() {
        let resolver = KindResolver::new(Arc::new(Catalog::builtin().unwrap()));
        let kinds = resolver.kinds();
        assert!(kinds.contains(&"Pod"));
        assert!(kinds.windows(2).all(|w| w[0] <= w[1]));
    }
}

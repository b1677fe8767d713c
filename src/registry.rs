use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::versification::Versification;

/// Process-wide cache of built versifications keyed by name. Entries are
/// never evicted and never change once inserted.
#[derive(Debug, Default)]
pub struct ReferenceSystemRegistry {
    systems: RwLock<HashMap<String, Arc<Versification>>>,
}

static GLOBAL: OnceLock<ReferenceSystemRegistry> = OnceLock::new();

impl ReferenceSystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static ReferenceSystemRegistry {
        GLOBAL.get_or_init(ReferenceSystemRegistry::new)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Versification>>> {
        self.systems.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Versification>>> {
        self.systems.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, name: &str) -> Option<Arc<Versification>> {
        self.read().get(name).cloned()
    }

    /// Return the cached system or build it. `build` runs at most once per
    /// name; concurrent callers wait for the first one.
    pub fn get_or_build<F>(&self, name: &str, build: F) -> Arc<Versification>
    where
        F: FnOnce() -> Versification,
    {
        if let Some(found) = self.get(name) {
            return found;
        }
        let mut systems = self.write();
        systems
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(build()))
            .clone()
    }

    /// Like [`get_or_build`](Self::get_or_build) for fallible builders. A
    /// failed build caches nothing.
    pub fn get_or_try_build<F, E>(&self, name: &str, build: F) -> Result<Arc<Versification>, E>
    where
        F: FnOnce() -> Result<Versification, E>,
    {
        if let Some(found) = self.get(name) {
            return Ok(found);
        }
        let mut systems = self.write();
        if let Some(found) = systems.get(name) {
            return Ok(found.clone());
        }
        let built = Arc::new(build()?);
        systems.insert(name.to_string(), built.clone());
        Ok(built)
    }

    /// Insert under the system's own name. The first registration wins;
    /// later ones get the already cached instance back.
    pub fn register(&self, versification: Versification) -> Arc<Versification> {
        let name = versification.name().to_string();
        self.get_or_build(&name, || versification)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bible_book::BibleBook;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn one_book(name: &str) -> Versification {
        Versification::new(name, &[BibleBook::Gen], &[], &[&[0u16, 2][..]], &[]).unwrap()
    }

    #[test]
    fn test_builder_runs_once() {
        let registry = ReferenceSystemRegistry::new();
        let calls = AtomicUsize::new(0);
        let first = registry.get_or_build("One", || {
            calls.fetch_add(1, Ordering::SeqCst);
            one_book("One")
        });
        let second = registry.get_or_build("One", || {
            calls.fetch_add(1, Ordering::SeqCst);
            one_book("One")
        });
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_builder_runs_once_across_threads() {
        let registry = Arc::new(ReferenceSystemRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let calls = calls.clone();
                thread::spawn(move || {
                    registry.get_or_build("Shared", || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        one_book("Shared")
                    })
                })
            })
            .collect();

        let built: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(built.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let registry = ReferenceSystemRegistry::new();
        let failed: Result<_, &str> = registry.get_or_try_build("Flaky", || Err("nope"));
        assert!(failed.is_err());
        assert!(registry.get("Flaky").is_none());

        let built: Result<_, &str> = registry.get_or_try_build("Flaky", || Ok(one_book("Flaky")));
        assert!(built.is_ok());
        assert!(registry.get("Flaky").is_some());
    }

    #[test]
    fn test_register_keeps_first() {
        let registry = ReferenceSystemRegistry::new();
        let first = registry.register(one_book("Mine"));
        let second = registry.register(one_book("Mine"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.names(), vec!["Mine".to_string()]);
    }

    #[test]
    fn test_global_is_shared() {
        let a = ReferenceSystemRegistry::global() as *const _;
        let b = ReferenceSystemRegistry::global() as *const _;
        assert_eq!(a, b);
    }
}

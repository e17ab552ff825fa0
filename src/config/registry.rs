//! Process-wide configuration registry.
//!
//! # Responsibilities
//! - Map lowercase names to type-erased entries
//! - Create-or-fetch typed entries, enforcing the name grammar
//! - Refuse to hand out an entry under a type other than the one it was created with
//!
//! # Design Decisions
//! - Entries are never removed; only their values change
//! - `Registry::global()` is built lazily on first use, so no module depends on
//!   static initialization order
//! - Independent registries can be created for tests and embedding

use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::config::validation::normalize_name;
use crate::config::{ConfigEntry, ConfigError, ConfigValue, ConfigVar};

/// Name → entry table.
#[derive(Default)]
pub struct Registry {
    entries: DashMap<String, Arc<dyn ConfigEntry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Fetch the entry called `name`, creating it with `default` if absent.
    ///
    /// Fails with [`ConfigError::InvalidName`] when the lowercased name breaks
    /// the grammar, and with [`ConfigError::TypeMismatch`] when the name is
    /// already registered under another type.
    pub fn lookup_or_create<T: ConfigValue>(
        &self,
        name: &str,
        default: T,
        description: &str,
    ) -> Result<Arc<ConfigVar<T>>, ConfigError> {
        let key = normalize_name(name).inspect_err(|_| {
            tracing::error!(name, "Invalid configuration name");
        })?;

        match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                tracing::debug!(name = %occupied.key(), "Configuration entry exists");
                downcast::<T>(occupied.get().clone())
            }
            Entry::Vacant(vacant) => {
                let var = Arc::new(ConfigVar::new(vacant.key().clone(), default, description));
                vacant.insert(var.clone());
                Ok(var)
            }
        }
    }

    /// Fetch a typed entry without creating it.
    ///
    /// A type mismatch is logged and reported as `None`.
    pub fn lookup<T: ConfigValue>(&self, name: &str) -> Option<Arc<ConfigVar<T>>> {
        let entry = self.lookup_base(name)?;
        downcast::<T>(entry).ok()
    }

    /// Fetch an entry without knowing its type.
    pub fn lookup_base(&self, name: &str) -> Option<Arc<dyn ConfigEntry>> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.value().clone())
    }

    /// Call `f` on every entry in name order.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&dyn ConfigEntry),
    {
        let mut entries: Vec<Arc<dyn ConfigEntry>> =
            self.entries.iter().map(|e| e.value().clone()).collect();
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        for entry in entries {
            f(entry.as_ref());
        }
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn downcast<T: ConfigValue>(entry: Arc<dyn ConfigEntry>) -> Result<Arc<ConfigVar<T>>, ConfigError> {
    if entry.value_type() != TypeId::of::<T>() {
        let err = ConfigError::TypeMismatch {
            name: entry.name().to_string(),
            requested: std::any::type_name::<T>(),
            actual: entry.type_name(),
        };
        tracing::warn!(
            name = entry.name(),
            requested = std::any::type_name::<T>(),
            actual = entry.type_name(),
            "Configuration type mismatch"
        );
        return Err(err);
    }

    let name = entry.name().to_string();
    entry
        .into_any()
        .downcast::<ConfigVar<T>>()
        .map_err(|_| ConfigError::TypeMismatch {
            name,
            requested: std::any::type_name::<T>(),
            actual: "unknown",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_create_then_fetch_same_entry() {
        let registry = Registry::new();
        let a = registry.lookup_or_create("system.port", 8080i32, "port").unwrap();
        let b = registry.lookup_or_create("system.port", 1i32, "ignored").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(b.value(), 8080);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_type_mismatch_returns_no_entry() {
        let registry = Registry::new();
        registry.lookup_or_create("a.b", 1i32, "").unwrap();

        let err = registry.lookup_or_create("a.b", "x".to_string(), "").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TypeMismatch { actual: "i32", .. }
        ));
        assert!(registry.lookup::<String>("a.b").is_none());
        assert!(registry.lookup::<i32>("a.b").is_some());
    }

    #[test]
    fn test_invalid_name_is_rejected() {
        let registry = Registry::new();
        let err = registry.lookup_or_create("Bad Name!", 0i32, "").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidName(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let registry = Registry::new();
        let var = registry.lookup_or_create("System.Value", 15u32, "").unwrap();
        assert_eq!(var.name(), "system.value");
        assert!(registry.lookup::<u32>("SYSTEM.VALUE").is_some());
        assert!(registry.lookup_base("system.value").is_some());
    }

    #[test]
    fn test_lookup_has_no_side_effects() {
        let registry = Registry::new();
        assert!(registry.lookup::<i32>("missing").is_none());
        assert!(registry.lookup_base("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_visit_in_name_order() {
        let registry = Registry::new();
        registry.lookup_or_create("z.last", 1i32, "").unwrap();
        registry.lookup_or_create("a.first", BTreeSet::from([1, 2]), "").unwrap();

        let mut seen = Vec::new();
        registry.visit(|entry| seen.push((entry.name().to_string(), entry.to_text().unwrap())));
        assert_eq!(
            seen,
            vec![
                ("a.first".to_string(), "- 1\n- 2".to_string()),
                ("z.last".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(registry.names(), vec!["a.first", "z.last"]);
    }
}

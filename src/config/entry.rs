//! Typed configuration entries.
//!
//! # Responsibilities
//! - Hold one named, described value of a concrete type
//! - Convert the value to and from text through its codec
//! - Notify listeners with `(old, new)` when the value actually changes
//!
//! # Design Decisions
//! - Reads are lock-free (`ArcSwap`); writers are serialized per entry
//! - Listeners run inside the writer section, before the new value is published,
//!   so readers see either the old value or the new one, never a torn update
//! - Listeners are keyed by a caller-chosen id and run in registration order

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::config::{Codec, CodecError};

/// Bounds every configuration value type satisfies.
pub trait ConfigValue: Codec + PartialEq + Clone + Send + Sync + 'static {}

impl<T> ConfigValue for T where T: Codec + PartialEq + Clone + Send + Sync + 'static {}

/// Change callback receiving `(old, new)`.
pub type Listener<T> = Arc<dyn Fn(&T, &T) + Send + Sync>;

/// Type-erased view of a configuration entry.
pub trait ConfigEntry: Send + Sync {
    /// Lowercase, validated name.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Name of the held value type, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Identity of the held value type.
    fn value_type(&self) -> TypeId;

    /// Current value rendered as text.
    fn to_text(&self) -> Result<String, CodecError>;

    /// Decode `text` and store it. The value is unchanged on failure.
    fn load_text(&self, text: &str) -> Result<(), CodecError>;

    #[doc(hidden)]
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A configuration entry holding a `T`.
pub struct ConfigVar<T: ConfigValue> {
    name: String,
    description: String,
    value: ArcSwap<T>,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    write_lock: Mutex<()>,
}

impl<T: ConfigValue> ConfigVar<T> {
    /// Create a detached entry. Registered entries come from the registry.
    pub fn new(name: impl Into<String>, value: T, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value: ArcSwap::from_pointee(value),
            listeners: Mutex::new(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Clone of the current value.
    pub fn value(&self) -> T {
        T::clone(&self.value.load())
    }

    /// Shared handle to the current value.
    pub fn snapshot(&self) -> Arc<T> {
        self.value.load_full()
    }

    /// Replace the value, notifying listeners if it differs from the current one.
    ///
    /// Returns `true` when the value changed.
    pub fn set_value(&self, new_value: T) -> bool {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let old_value = self.value.load_full();
        if *old_value == new_value {
            return false;
        }

        for (_, listener) in self.listener_snapshot() {
            listener(&old_value, &new_value);
        }
        self.value.store(Arc::new(new_value));
        true
    }

    /// Register `listener` under `id`, replacing any listener already using it.
    pub fn add_listener<F>(&self, id: u64, listener: F)
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        let listener: Listener<T> = Arc::new(listener);
        match listeners.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = listener,
            None => listeners.push((id, listener)),
        }
    }

    /// Remove the listener registered under `id`. Unknown ids are ignored.
    pub fn remove_listener(&self, id: u64) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.retain(|(existing, _)| *existing != id);
    }

    pub fn has_listener(&self, id: u64) -> bool {
        let listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.iter().any(|(existing, _)| *existing == id)
    }

    pub fn clear_listeners(&self) {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    // Listeners may (un)subscribe from inside a callback, so they run on a copy.
    fn listener_snapshot(&self) -> Vec<(u64, Listener<T>)> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl<T: ConfigValue> ConfigEntry for ConfigVar<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn to_text(&self) -> Result<String, CodecError> {
        self.value.load().encode().inspect_err(|e| {
            tracing::error!(name = %self.name, value_type = self.type_name(), error = %e, "Failed to encode configuration value");
        })
    }

    fn load_text(&self, text: &str) -> Result<(), CodecError> {
        match T::decode(text) {
            Ok(value) => {
                self.set_value(value);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    name = %self.name,
                    from = "text",
                    to = self.type_name(),
                    input = %text,
                    error = %e,
                    "Failed to decode configuration value"
                );
                Err(e)
            }
        }
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl<T: ConfigValue + fmt::Debug> fmt::Debug for ConfigVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigVar")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("value", &*self.value.load())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let c = Arc::new(AtomicUsize::new(0));
        (c.clone(), c)
    }

    #[test]
    fn test_set_same_value_is_noop() {
        let var = ConfigVar::new("system.port", 8080, "port");
        let (calls, seen) = counter();
        var.add_listener(1, move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!var.set_value(8080));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(var.set_value(9900));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(var.value(), 9900);
    }

    #[test]
    fn test_listener_sees_old_value_before_store() {
        let var = Arc::new(ConfigVar::new("a.b", 1i32, ""));
        let observed = Arc::new(Mutex::new(Vec::new()));
        let (inner_var, log) = (var.clone(), observed.clone());
        var.add_listener(7, move |old, new| {
            log.lock().unwrap().push((*old, *new, inner_var.value()));
        });

        var.set_value(2);
        assert_eq!(*observed.lock().unwrap(), vec![(1, 2, 1)]);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let var = ConfigVar::new("order", String::from("a"), "");
        let order = Arc::new(Mutex::new(Vec::new()));
        for id in [30u64, 10, 20] {
            let order = order.clone();
            var.add_listener(id, move |_, _| order.lock().unwrap().push(id));
        }
        var.set_value("b".into());
        assert_eq!(*order.lock().unwrap(), vec![30, 10, 20]);
    }

    #[test]
    fn test_remove_listener_is_idempotent() {
        let var = ConfigVar::new("x", 0u8, "");
        let (calls, seen) = counter();
        var.add_listener(1, move |_, _| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        let (other_calls, other_seen) = counter();
        var.add_listener(2, move |_, _| {
            other_seen.fetch_add(1, Ordering::SeqCst);
        });

        var.remove_listener(1);
        var.remove_listener(1);
        assert!(!var.has_listener(1));
        assert!(var.has_listener(2));

        var.set_value(5);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(other_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_same_id_replaces_listener() {
        let var = ConfigVar::new("x", 0u8, "");
        let (first, first_seen) = counter();
        let (second, second_seen) = counter();
        var.add_listener(1, move |_, _| {
            first_seen.fetch_add(1, Ordering::SeqCst);
        });
        var.add_listener(1, move |_, _| {
            second_seen.fetch_add(1, Ordering::SeqCst);
        });
        var.set_value(1);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_text_failure_keeps_value() {
        let var = ConfigVar::new("system.port", 8080, "");
        assert!(var.load_text("not-a-number").is_err());
        assert_eq!(var.value(), 8080);

        var.load_text("9900").unwrap();
        assert_eq!(var.value(), 9900);
        assert_eq!(var.to_text().unwrap(), "9900");
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let var = Arc::new(ConfigVar::new("x", 0u32, ""));
        let inner = var.clone();
        var.add_listener(9, move |_, _| inner.remove_listener(9));
        var.set_value(1);
        assert!(!var.has_listener(9));
    }
}

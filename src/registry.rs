//! The process-wide store of injected values
//!
//! Slots are keyed by the `TypeId` of their [`InjectionKey`]. A slot without an
//! entry resolves to the key's declared default; the first write moves it to
//! the overridden state for the rest of the process.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, instrument, trace};

use crate::config::Settings;
use crate::key::InjectionKey;

type Slot = Box<dyn Any + Send + Sync>;

static SHARED: OnceLock<InjectedValues> = OnceLock::new();

/// Mapping from injection key to current value.
///
/// Most code uses the associated functions ([`InjectedValues::get`],
/// [`InjectedValues::set`], ...) which route through the shared instance. The
/// instance methods work on any registry, e.g. one created with
/// [`InjectedValues::new`] for an isolated test.
///
/// Every operation takes the internal lock for the duration of a single map
/// access, so concurrent reads and writes of one slot are linearizable. A
/// poisoned lock is recovered: values are replaced wholesale, so the map never
/// holds a half-written entry.
pub struct InjectedValues {
    slots: RwLock<HashMap<TypeId, Slot>>,
    settings: RwLock<Settings>,
}

impl Default for InjectedValues {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InjectedValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectedValues")
            .field("overrides", &self.override_count())
            .field("settings", &self.current_settings())
            .finish()
    }
}

impl InjectedValues {
    /// Create an empty registry with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create an empty registry with the given diagnostic settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            settings: RwLock::new(settings),
        }
    }

    /// The shared registry, created on first access and never dropped.
    pub fn shared() -> &'static Self {
        SHARED.get_or_init(Self::new)
    }

    // ============================================================
    // SHARED-INSTANCE ACCESS
    // ============================================================

    /// Current value of `K` in the shared registry.
    pub fn get<K: InjectionKey>() -> K::Value {
        Self::shared().value::<K>()
    }

    /// Override `K` in the shared registry.
    pub fn set<K: InjectionKey>(value: K::Value) {
        Self::shared().set_value::<K>(value)
    }

    /// Override `K` in the shared registry, returning the value it replaced.
    pub fn replace<K: InjectionKey>(value: K::Value) -> K::Value {
        Self::shared().replace_value::<K>(value)
    }

    /// Mutate `K` in place in the shared registry.
    pub fn update<K: InjectionKey>(f: impl FnOnce(&mut K::Value)) {
        Self::shared().update_value::<K>(f)
    }

    /// Whether `K` has been written in the shared registry.
    pub fn is_overridden<K: InjectionKey>() -> bool {
        Self::shared().contains_override::<K>()
    }

    /// Replace the diagnostic settings of the shared registry.
    pub fn configure(settings: Settings) {
        Self::shared().apply_settings(settings)
    }

    /// Diagnostic settings of the shared registry.
    pub fn settings() -> Settings {
        Self::shared().current_settings()
    }

    // ============================================================
    // INSTANCE ACCESS
    // ============================================================

    /// Current value of `K`, or its default if it was never written.
    pub fn value<K: InjectionKey>(&self) -> K::Value {
        let stored = self
            .read_slots()
            .get(&TypeId::of::<K>())
            .and_then(|slot| slot.downcast_ref::<K::Value>())
            .cloned();

        if self.current_settings().trace_reads {
            trace!(
                key = type_name::<K>(),
                overridden = stored.is_some(),
                "read injected value"
            );
        }

        // Default is built outside the lock: it may itself read other slots.
        stored.unwrap_or_else(K::default_value)
    }

    /// Store `value` for `K`; every later read of `K` observes it.
    pub fn set_value<K: InjectionKey>(&self, value: K::Value) {
        let previous = self.write_slots().insert(TypeId::of::<K>(), Box::new(value));
        self.log_write::<K>(previous.is_none());
    }

    /// Store `value` for `K` and return what a read would have returned just before.
    pub fn replace_value<K: InjectionKey>(&self, value: K::Value) -> K::Value {
        let previous = self
            .write_slots()
            .insert(TypeId::of::<K>(), Box::new(value))
            .and_then(|slot| slot.downcast::<K::Value>().ok())
            .map(|boxed| *boxed);
        self.log_write::<K>(previous.is_none());

        previous.unwrap_or_else(K::default_value)
    }

    /// Mutate the value of `K` in place, starting from the default if unset.
    ///
    /// `f` runs while the registry is locked for writing and must not access
    /// the same registry.
    pub fn update_value<K: InjectionKey>(&self, f: impl FnOnce(&mut K::Value)) {
        // Slots are never removed, so a slot seen here is still present below.
        let fallback = if self.contains_override::<K>() {
            None
        } else {
            Some(K::default_value())
        };

        let first = {
            let mut slots = self.write_slots();
            let first = !slots.contains_key(&TypeId::of::<K>());
            let slot = slots
                .entry(TypeId::of::<K>())
                .or_insert_with(|| Box::new(fallback.unwrap_or_else(K::default_value)) as Slot);
            if let Some(value) = slot.downcast_mut::<K::Value>() {
                f(value);
            }
            first
        };
        self.log_write::<K>(first);
    }

    /// Whether `K` has left its default state.
    pub fn contains_override<K: InjectionKey>(&self) -> bool {
        self.read_slots().contains_key(&TypeId::of::<K>())
    }

    /// Number of slots holding an override.
    pub fn override_count(&self) -> usize {
        self.read_slots().len()
    }

    /// Replace the diagnostic settings of this registry.
    #[instrument(level = "debug", skip(self))]
    pub fn apply_settings(&self, settings: Settings) {
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Diagnostic settings of this registry.
    pub fn current_settings(&self) -> Settings {
        *self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_slots(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Slot>> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slots(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Slot>> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn log_write<K: InjectionKey>(&self, first: bool) {
        if !self.current_settings().trace_writes {
            return;
        }
        if first {
            debug!(key = type_name::<K>(), "overriding injected default");
        } else {
            trace!(key = type_name::<K>(), "replacing injected value");
        }
    }
}

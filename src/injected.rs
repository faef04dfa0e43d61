//! Field-like handle onto one injected slot

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;

use crate::key::InjectionKey;
use crate::registry::InjectedValues;

/// Handle bound to the slot of `K` in the shared registry.
///
/// The handle holds no value. Every read goes to the registry at the moment
/// of the call, and every write is visible to all other handles of `K`.
///
/// ```
/// use injected::{injection_key, Injected};
///
/// injection_key! {
///     Greeting: String = String::new();
/// }
///
/// let greeting = Injected::<Greeting>::new();
/// assert_eq!(greeting.get(), "");
///
/// greeting.set("hello".to_string());
/// assert_eq!(Injected::of(Greeting).get(), "hello");
/// ```
pub struct Injected<K: InjectionKey> {
    key: PhantomData<fn() -> K>,
}

impl<K: InjectionKey> Injected<K> {
    pub const fn new() -> Self {
        Self { key: PhantomData }
    }

    /// Bind to the slot of `key`; lets the compiler infer `K`.
    pub fn of(_key: K) -> Self {
        Self::new()
    }

    pub fn get(&self) -> K::Value {
        InjectedValues::get::<K>()
    }

    pub fn set(&self, value: K::Value) {
        InjectedValues::set::<K>(value)
    }

    /// Write `value` and return the value it replaced.
    pub fn replace(&self, value: K::Value) -> K::Value {
        InjectedValues::replace::<K>(value)
    }

    /// Mutate the slot in place. See [`InjectedValues::update_value`].
    pub fn update(&self, f: impl FnOnce(&mut K::Value)) {
        InjectedValues::update::<K>(f)
    }

    pub fn is_overridden(&self) -> bool {
        InjectedValues::is_overridden::<K>()
    }
}

// Manual impls: derives would demand `K: Clone` etc. for a marker we never hold.
impl<K: InjectionKey> Clone for Injected<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: InjectionKey> Copy for Injected<K> {}

impl<K: InjectionKey> Default for Injected<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for Injected<K>
where
    K: InjectionKey,
    K::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injected")
            .field("key", &type_name::<K>())
            .field("value", &self.get())
            .finish()
    }
}

//! Injection keys: the identity and default of one injectable slot
//!
//! A key is a type, never a value. The registry addresses slots by the key's
//! `TypeId`, so two keys never collide even when they share a value type.

/// Declares one injectable slot.
///
/// Implementors are usually empty marker types minted by [`injection_key!`].
///
/// [`injection_key!`]: crate::injection_key
pub trait InjectionKey: 'static {
    /// Type of the value stored in the slot.
    type Value: Clone + Send + Sync + 'static;

    /// Value returned while the slot has never been written.
    fn default_value() -> Self::Value;
}

/// Declare one or more injection keys.
///
/// Each entry mints a fresh unit struct and implements [`InjectionKey`] for it.
///
/// ```
/// use injected::{injection_key, InjectedValues};
///
/// injection_key! {
///     /// Greeting shown to new users.
///     pub Greeting: String = String::new();
///     RetryLimit: u32 = 3;
/// }
///
/// assert_eq!(InjectedValues::get::<RetryLimit>(), 3);
/// InjectedValues::set::<Greeting>("hello".to_string());
/// assert_eq!(InjectedValues::get::<Greeting>(), "hello");
/// ```
#[macro_export]
macro_rules! injection_key {
    () => {};
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident : $value:ty = $default:expr;
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $name;

        impl $crate::InjectionKey for $name {
            type Value = $value;

            fn default_value() -> Self::Value {
                $default
            }
        }

        $crate::injection_key! { $($rest)* }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    injection_key! {
        Plain: i32 = 7;
        /// documented
        pub(crate) Documented: Vec<String> = vec!["a".into()];
    }

    struct Manual;

    impl InjectionKey for Manual {
        type Value = &'static str;

        fn default_value() -> Self::Value {
            "manual"
        }
    }

    #[test]
    fn test_macro_keys_carry_declared_defaults() {
        assert_eq!(Plain::default_value(), 7);
        assert_eq!(Documented::default_value(), vec!["a".to_string()]);
    }

    #[test]
    fn test_manual_key_default() {
        assert_eq!(Manual::default_value(), "manual");
    }
}

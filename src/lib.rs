//! Process-wide injected values.
//!
//! A dependency owner declares a key with a default value; any code can read
//! the current value or override it, e.g. to swap in a test double:
//!
//! ```
//! use injected::{injection_key, Injected, InjectedValues};
//!
//! injection_key! {
//!     /// Base URL of the billing service.
//!     pub BillingUrl: String = "https://billing.internal".to_string();
//! }
//!
//! let url = Injected::<BillingUrl>::new();
//! assert_eq!(url.get(), "https://billing.internal");
//!
//! InjectedValues::set::<BillingUrl>("http://localhost:8080".to_string());
//! assert_eq!(url.get(), "http://localhost:8080");
//! ```
//!
//! Modules:
//! - [`key`]: the [`InjectionKey`] contract and the [`injection_key!`] macro
//! - [`registry`]: [`InjectedValues`], the shared store
//! - [`injected`]: [`Injected`], a handle onto one slot
//! - [`config`]: diagnostic [`Settings`]

pub mod config;
pub mod error;
pub mod error_ext;
pub mod injected;
pub mod key;
pub mod registry;
pub mod util;

pub use config::Settings;
pub use error::{InjectedError, InjectedResult};
pub use injected::Injected;
pub use key::InjectionKey;
pub use registry::InjectedValues;

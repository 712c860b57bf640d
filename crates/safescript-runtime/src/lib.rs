//! The SafeScript coercion runtime.
//!
//! Rewritten operator sites call `SafeScript.<op>(...)`; this crate is the
//! reference implementation of those operations over a model of JavaScript
//! values. Unlike the native operators, the runtime refuses conversions that
//! would silently produce garbage: `null + 1`, `"abc" - 1` and objects whose
//! hooks return the wrong primitive all raise a [`RuntimeError`].
//!
//! ```
//! use safescript_runtime::{Runtime, Value};
//!
//! let rt = Runtime::new();
//! let sum = rt.add(&Value::from(1), &Value::from("2")).unwrap();
//! assert_eq!(sum.as_str(), Some("12"));
//! assert!(rt.sub(&Value::Null, &Value::from(1)).is_err());
//! ```

pub mod coerce;
pub mod error;
pub mod guard;
pub mod number;
mod runtime;
pub mod value;

pub use coerce::{to_numeric, to_string, Numeric};
pub use error::{RuntimeError, RuntimeResult};
pub use guard::{check_guard, check_guards, GUARD_TYPES};
pub use runtime::Runtime;
pub use safescript_types::RuntimeOp;
pub use value::{Hint, Object, Overload, Symbol, Value};

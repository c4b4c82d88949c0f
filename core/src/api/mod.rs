//! Public API for embedding the engine.
//!
//! A [`Runtime`] owns the heap; [`Context`]s created from it evaluate code and
//! produce [`Value`](crate::values::Value)s. Every owned handle releases its
//! reference when dropped, and every fallible operation returns a `Result`
//! whose error is the thrown [`Exception`].
//!
//! # Example
//!
//! ```ignore
//! use quickbind_core::api::{EvalType, Runtime};
//!
//! let runtime = Runtime::new()?;
//! let ctx = runtime.new_context()?;
//!
//! match ctx.eval("[-1, '1', 0.1, 3]", "<input>", EvalType::Global) {
//!     Ok(array) => {
//!         assert_eq!(array.get_prop_by_idx(0)?.to_uint32()?, 4294967295);
//!     }
//!     Err(exception) => eprintln!("{}", exception),
//! }
//! ```

pub mod context;
pub mod error;
pub mod exception;
pub mod options;
pub mod runtime;

pub use context::Context;
pub use error::{Error, Location, ScriptError};
pub use exception::Exception;
pub use options::{
    DEFAULT_STACK_SIZE, EvalFlags, EvalOptions, EvalType, PROP_HAS_SHIFT, PropFlags,
    RuntimeOptions,
};
pub use runtime::Runtime;

#[cfg(test)]
mod context_test;
#[cfg(test)]
mod runtime_test;

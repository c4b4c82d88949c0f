//! quickbind - Safe, ownership-checked bindings to the QuickJS engine
//!
//! # Overview
//!
//! quickbind embeds the QuickJS ECMAScript engine. Engine values are
//! reference counted on the engine's heap; here they are owned Rust handles
//! that release their reference when dropped, and every fallible operation
//! returns a `Result` carrying the thrown value.
//!
//! # Quick Start
//!
//! ```no_run
//! use quickbind::{EvalType, Runtime};
//!
//! let runtime = Runtime::new().unwrap();
//! let ctx = runtime.new_context().unwrap();
//!
//! let value = ctx.eval("({ a: 1 })", "<input>", EvalType::Global).unwrap();
//! assert_eq!(value.get_prop("a").unwrap().to_int32().unwrap(), 1);
//!
//! match ctx.eval("undefinedName", "<input>", EvalType::Global) {
//!     Ok(_) => unreachable!(),
//!     Err(exception) => assert_eq!(exception.name().as_deref(), Some("ReferenceError")),
//! }
//! ```
//!
//! # Lifetimes
//!
//! A [`Context`] borrows its [`Runtime`], and every [`Value`], [`Atom`] and
//! [`Exception`] borrows its `Context`. Releasing in the wrong order is a
//! compile error. To keep an error past its context, convert the exception
//! into a [`ScriptError`].

pub mod error_renderer;

// Re-export public API from quickbind_core
pub use quickbind_core::api::{
    Context, DEFAULT_STACK_SIZE, Error, EvalFlags, EvalOptions, EvalType, Exception, Location,
    PropFlags, Runtime, RuntimeOptions, ScriptError,
};

// Re-export value handles
pub use quickbind_core::values::{self, Atom, Tag, Value, nan};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

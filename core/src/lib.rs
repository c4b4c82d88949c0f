//! Safe bindings to the embedded QuickJS engine.
//!
//! The [`api`] module holds the lifecycle objects and the exception channel,
//! [`values`] the owned value and atom handles, and [`sys`] the raw C ABI they
//! are built on.

pub mod api;
pub mod sys;
pub mod values;

pub use api::{
    Context, Error, EvalFlags, EvalOptions, EvalType, Exception, PropFlags, Runtime,
    RuntimeOptions, ScriptError,
};
pub use values::{Atom, Tag, Value, nan};

//! Thrown values.

use std::fmt;

use crate::api::{Error, ScriptError};
use crate::values::Value;

/// An owned value that a script threw, drained from its context.
///
/// Usually an `Error` object, but scripts may throw anything. The accessors
/// read the object lazily through the engine; [`Exception::to_script_error`]
/// takes a `'static` snapshot for propagating past the context's lifetime.
pub struct Exception<'ctx> {
    value: Value<'ctx>,
}

impl<'ctx> Exception<'ctx> {
    pub fn new(value: Value<'ctx>) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value<'ctx> {
        &self.value
    }

    pub fn into_value(self) -> Value<'ctx> {
        self.value
    }

    pub fn is_error(&self) -> bool {
        self.value.is_error()
    }

    /// The thrown object's `name` property (e.g. `"TypeError"`).
    pub fn name(&self) -> Option<String> {
        self.string_prop("name")
    }

    /// The `message` property of a thrown object, or the string form of a
    /// thrown primitive.
    pub fn message(&self) -> Option<String> {
        if self.value.is_object() {
            self.string_prop("message")
        } else {
            self.value.to_string().ok()
        }
    }

    /// The engine backtrace recorded when an `Error` was constructed.
    pub fn stack(&self) -> Option<String> {
        let stack = self.value.get_prop("stack").ok()?;
        if !stack.is_string() {
            return None;
        }
        stack.to_string().ok()
    }

    pub fn to_script_error(&self) -> ScriptError {
        if self.is_error() {
            return ScriptError {
                name: self.name().unwrap_or_else(|| "Error".to_string()),
                message: self.message().unwrap_or_default(),
                stack: self.stack(),
            };
        }

        let message = match self.value.to_string() {
            Ok(text) => text,
            Err(_) => format!("<{}>", self.value.tag()),
        };
        ScriptError::new("Uncaught", message)
    }

    fn string_prop(&self, name: &str) -> Option<String> {
        if !self.value.is_object() {
            return None;
        }
        let prop = self.value.get_prop(name).ok()?;
        if prop.is_undefined() {
            return None;
        }
        prop.to_string().ok()
    }
}

impl fmt::Display for Exception<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_script_error(), f)
    }
}

impl fmt::Debug for Exception<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exception")
            .field("value", &self.value)
            .field("name", &self.name())
            .field("message", &self.message())
            .finish()
    }
}

impl std::error::Error for Exception<'_> {}

impl From<Exception<'_>> for ScriptError {
    fn from(exception: Exception<'_>) -> Self {
        exception.to_script_error()
    }
}

impl From<Exception<'_>> for Error {
    fn from(exception: Exception<'_>) -> Self {
        Error::Script(exception.to_script_error())
    }
}

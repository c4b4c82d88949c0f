//! Public error types for the binding.
//!
//! Script failures are first observed as an [`Exception`](super::Exception),
//! which borrows its context. [`ScriptError`] is the owned, `'static`
//! snapshot of one, and [`Error`] covers the host-side failures that never
//! reach a script.

use std::fmt;

use thiserror::Error as ThisError;

/// Error type for operations that can fail outside of a running script.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The engine returned NULL while allocating a runtime or context.
    #[error("failed to allocate {0}")]
    Allocation(&'static str),

    /// A script threw.
    #[error(transparent)]
    Script(#[from] ScriptError),
}

// ============================================================================
// Script errors
// ============================================================================

/// Owned snapshot of a thrown script value.
///
/// For `Error` objects `name` and `message` are the object's own properties and
/// `stack` is the engine backtrace. Anything else that was thrown is named
/// `"Uncaught"` and carries its string form as the message.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{name}: {message}")]
pub struct ScriptError {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
}

impl ScriptError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// The innermost stack frame that points into a source file.
    ///
    /// Frames look like `at f (script.js:3)` or `at script.js:3:7`; native
    /// frames without a position are skipped.
    pub fn location(&self) -> Option<Location> {
        self.stack.as_deref()?.lines().find_map(Location::parse_frame)
    }
}

/// A `file:line[:column]` position taken from a stack frame. Lines and columns
/// are 1-based, as the engine prints them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: Option<u32>,
}

impl Location {
    fn parse_frame(frame: &str) -> Option<Location> {
        let frame = frame.trim().strip_prefix("at ")?;
        let position = match (frame.rfind('('), frame.ends_with(')')) {
            (Some(open), true) => &frame[open + 1..frame.len() - 1],
            _ => frame,
        };

        let (rest, last) = position.rsplit_once(':')?;
        let last: u32 = last.parse().ok()?;
        match rest.rsplit_once(':') {
            Some((file, line)) if line.parse::<u32>().is_ok() => Some(Location {
                file: file.to_string(),
                line: line.parse().ok()?,
                column: Some(last),
            }),
            _ => Some(Location {
                file: rest.to_string(),
                line: last,
                column: None,
            }),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(column) = self.column {
            write!(f, ":{}", column)?;
        }
        Ok(())
    }
}

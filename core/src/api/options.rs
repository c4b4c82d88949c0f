//! Configuration options for runtimes, evaluation and property definition.

use core::ffi::c_int;

use crate::sys;

pub use crate::sys::JS_DEFAULT_STACK_SIZE as DEFAULT_STACK_SIZE;

/// Configuration options for a [`Runtime`](super::Runtime).
///
/// Applied when the runtime is created; each limit can also be changed later
/// through the runtime's setters.
///
/// # Example
///
/// ```
/// use quickbind_core::api::RuntimeOptions;
///
/// let options = RuntimeOptions {
///     memory_limit: Some(64 * 1024 * 1024),
///     ..RuntimeOptions::default()
/// };
/// assert_eq!(options.max_stack_size, 256 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Maximum native stack the interpreter may use, in bytes.
    ///
    /// Exceeding it raises a `stack overflow` error inside the script. The
    /// distance is measured from where the runtime was created; calls made
    /// from shallower frames than that are never reported as overflowing.
    /// 0 disables the check.
    ///
    /// Default: 256 KiB
    pub max_stack_size: usize,

    /// Heap limit in bytes. `None` leaves the heap unbounded.
    ///
    /// Default: None
    pub memory_limit: Option<usize>,

    /// Allocation volume that triggers a collection cycle. `None` keeps the
    /// engine's own threshold.
    ///
    /// Default: None
    pub gc_threshold: Option<usize>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            max_stack_size: DEFAULT_STACK_SIZE,
            memory_limit: None,
            gc_threshold: None,
        }
    }
}

/// How a source text is evaluated. The variants are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvalType {
    /// Global code.
    #[default]
    Global,
    /// Module code (always strict).
    Module,
    /// Direct `eval` from a running script. Rejected with a `TypeError` when
    /// evaluated from the host, which has no calling frame.
    Direct,
    /// Indirect `eval`: global scope, like `Global`.
    Indirect,
}

impl EvalType {
    pub const fn as_raw(self) -> c_int {
        match self {
            EvalType::Global => sys::JS_EVAL_TYPE_GLOBAL,
            EvalType::Module => sys::JS_EVAL_TYPE_MODULE,
            EvalType::Direct => sys::JS_EVAL_TYPE_DIRECT,
            EvalType::Indirect => sys::JS_EVAL_TYPE_INDIRECT,
        }
    }
}

bitflags::bitflags! {
    /// Evaluation modifiers, combinable with any [`EvalType`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EvalFlags: c_int {
        /// Force strict mode.
        const STRICT = sys::JS_EVAL_FLAG_STRICT;
        /// Force strip mode (drop debug information).
        const STRIP = sys::JS_EVAL_FLAG_STRIP;
        /// Compile but do not run. The result is a function bytecode or module
        /// value to be run with `Context::eval_function`.
        const COMPILE_ONLY = sys::JS_EVAL_FLAG_COMPILE_ONLY;
        /// Do not include the stack frames before this eval in the Error() backtraces.
        const BACKTRACE_BARRIER = sys::JS_EVAL_FLAG_BACKTRACE_BARRIER;
    }
}

/// Evaluation type plus modifiers, as passed to `Context::eval`.
///
/// # Example
///
/// ```
/// use quickbind_core::api::{EvalFlags, EvalOptions, EvalType};
///
/// let options = EvalOptions::new(EvalType::Global).with_flags(EvalFlags::STRICT);
/// assert_eq!(options.as_raw(), 1 << 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EvalOptions {
    pub eval_type: EvalType,
    pub flags: EvalFlags,
}

impl EvalOptions {
    pub const fn new(eval_type: EvalType) -> Self {
        Self {
            eval_type,
            flags: EvalFlags::empty(),
        }
    }

    pub const fn with_flags(mut self, flags: EvalFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    /// The packed `eval_flags` word understood by `JS_Eval`.
    pub const fn as_raw(&self) -> c_int {
        self.eval_type.as_raw() | self.flags.bits()
    }
}

impl From<EvalType> for EvalOptions {
    fn from(eval_type: EvalType) -> Self {
        Self::new(eval_type)
    }
}

impl From<EvalFlags> for EvalOptions {
    fn from(flags: EvalFlags) -> Self {
        Self::default().with_flags(flags)
    }
}

/// Bit position of the `HAS_*` presence flags relative to the value flags.
pub const PROP_HAS_SHIFT: u32 = 8;

bitflags::bitflags! {
    /// Flags for object properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropFlags: c_int {
        const CONFIGURABLE = 1 << 0;
        const WRITABLE = 1 << 1;
        const ENUMERABLE = 1 << 2;
        const C_W_E = Self::CONFIGURABLE.bits() | Self::WRITABLE.bits() | Self::ENUMERABLE.bits();
        /// Used internally in Arrays.
        const LENGTH = 1 << 3;
        /// Mask for NORMAL, GETSET, VARREF, AUTOINIT.
        const TMASK = 3 << 4;
        const NORMAL = 0 << 4;
        const GETSET = 1 << 4;
        /// Used internally.
        const VARREF = 2 << 4;
        /// Used internally.
        const AUTOINIT = 3 << 4;

        const HAS_CONFIGURABLE = 1 << 8;
        const HAS_WRITABLE = 1 << 9;
        const HAS_ENUMERABLE = 1 << 10;
        const HAS_GET = 1 << 11;
        const HAS_SET = 1 << 12;
        const HAS_VALUE = 1 << 13;

        /// Throw an exception if false would be returned.
        const THROW = 1 << 14;
        /// Throw an exception if false would be returned in strict mode.
        const THROW_STRICT = 1 << 15;

        /// Internal use.
        const NO_ADD = 1 << 16;
        /// Internal use.
        const NO_EXOTIC = 1 << 17;
    }
}

impl Default for PropFlags {
    fn default() -> Self {
        PropFlags::C_W_E
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_eval_type_is_low_bits() {
        assert_eq!(EvalOptions::from(EvalType::Global).as_raw(), 0);
        assert_eq!(EvalOptions::from(EvalType::Module).as_raw(), 1);
        assert_eq!(EvalOptions::from(EvalType::Direct).as_raw(), 2);
        assert_eq!(EvalOptions::from(EvalType::Indirect).as_raw(), 3);
    }

    #[test]
    fn test_eval_flags_combine_with_type() {
        let options = EvalOptions::new(EvalType::Module)
            .with_flags(EvalFlags::STRIP)
            .with_flags(EvalFlags::COMPILE_ONLY);
        assert_eq!(options.as_raw(), 1 | (1 << 4) | (1 << 5));
        assert_eq!(EvalFlags::BACKTRACE_BARRIER.bits(), 64);
    }

    #[test]
    fn test_prop_flag_bits() {
        assert_eq!(PropFlags::C_W_E.bits(), 0b111);
        assert_eq!(PropFlags::HAS_CONFIGURABLE.bits(), 1 << PROP_HAS_SHIFT);
        assert_eq!(PropFlags::HAS_VALUE.bits(), 1 << 13);
        assert_eq!(PropFlags::THROW_STRICT.bits(), 1 << 15);
        assert_eq!(PropFlags::NO_EXOTIC.bits(), 1 << 17);
        assert_eq!(PropFlags::AUTOINIT, PropFlags::TMASK);
    }

    #[test]
    fn test_default_stack_size() {
        assert_eq!(RuntimeOptions::default().max_stack_size, 256 * 1024);
        assert_eq!(RuntimeOptions::default().memory_limit, None);
    }
}

//! Value tags.
//!
//! Tags are the engine's discriminants. Negative tags reference a
//! reference-counted heap cell; non-negative tags carry their payload inline
//! and need no release.

use core::fmt;

use crate::sys;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    BigDecimal = sys::JS_TAG_BIG_DECIMAL,
    BigInt = sys::JS_TAG_BIG_INT,
    BigFloat = sys::JS_TAG_BIG_FLOAT,
    Symbol = sys::JS_TAG_SYMBOL,
    String = sys::JS_TAG_STRING,
    /// Used internally by the engine.
    Module = sys::JS_TAG_MODULE,
    /// Used internally by the engine.
    FunctionBytecode = sys::JS_TAG_FUNCTION_BYTECODE,
    Object = sys::JS_TAG_OBJECT,

    Int = sys::JS_TAG_INT,
    Bool = sys::JS_TAG_BOOL,
    Null = sys::JS_TAG_NULL,
    Undefined = sys::JS_TAG_UNDEFINED,
    Uninitialized = sys::JS_TAG_UNINITIALIZED,
    CatchOffset = sys::JS_TAG_CATCH_OFFSET,
    Exception = sys::JS_TAG_EXCEPTION,
    Float64 = sys::JS_TAG_FLOAT64,
}

impl Tag {
    /// Decode a raw engine tag.
    ///
    /// Any tag at or above `Float64` is a float under NaN-boxing builds, so it
    /// decodes as `Float64`. Negative numbers outside the known heap tags
    /// return `None`.
    pub const fn from_raw(raw: i64) -> Option<Tag> {
        if raw >= sys::JS_TAG_FLOAT64 as i64 {
            return Some(Tag::Float64);
        }
        let tag = match raw as i32 {
            sys::JS_TAG_BIG_DECIMAL => Tag::BigDecimal,
            sys::JS_TAG_BIG_INT => Tag::BigInt,
            sys::JS_TAG_BIG_FLOAT => Tag::BigFloat,
            sys::JS_TAG_SYMBOL => Tag::Symbol,
            sys::JS_TAG_STRING => Tag::String,
            sys::JS_TAG_MODULE => Tag::Module,
            sys::JS_TAG_FUNCTION_BYTECODE => Tag::FunctionBytecode,
            sys::JS_TAG_OBJECT => Tag::Object,
            sys::JS_TAG_INT => Tag::Int,
            sys::JS_TAG_BOOL => Tag::Bool,
            sys::JS_TAG_NULL => Tag::Null,
            sys::JS_TAG_UNDEFINED => Tag::Undefined,
            sys::JS_TAG_UNINITIALIZED => Tag::Uninitialized,
            sys::JS_TAG_CATCH_OFFSET => Tag::CatchOffset,
            sys::JS_TAG_EXCEPTION => Tag::Exception,
            _ => return None,
        };
        Some(tag)
    }

    /// The engine's numeric tag.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Whether values with this tag own a reference on a heap cell.
    pub const fn is_ref_counted(self) -> bool {
        (self as i32) < 0
    }

    pub const fn name(self) -> &'static str {
        match self {
            Tag::BigDecimal => "BigDecimal",
            Tag::BigInt => "BigInt",
            Tag::BigFloat => "BigFloat",
            Tag::Symbol => "Symbol",
            Tag::String => "String",
            Tag::Module => "Module",
            Tag::FunctionBytecode => "FunctionBytecode",
            Tag::Object => "Object",
            Tag::Int => "Int",
            Tag::Bool => "Bool",
            Tag::Null => "Null",
            Tag::Undefined => "Undefined",
            Tag::Uninitialized => "Uninitialized",
            Tag::CatchOffset => "CatchOffset",
            Tag::Exception => "Exception",
            Tag::Float64 => "Float64",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The engine's canonical NaN as a host float.
pub fn nan() -> f64 {
    f64::NAN
}

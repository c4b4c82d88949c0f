//! Coercions from engine values to host scalars.
//!
//! Each conversion follows the engine's own abstract operation (`ToInt32`,
//! `ToIndex`, ...) and reports a throwing coercion as an [`Exception`].

use core::ffi::c_int;

use crate::api::Exception;
use crate::sys::{self, JSContext, JSValue};
use crate::values::Value;

type ConvertFn<T> = unsafe extern "C" fn(*mut JSContext, *mut T, JSValue) -> c_int;

impl<'ctx> Value<'ctx> {
    fn convert<T: Default>(&self, f: ConvertFn<T>) -> Result<T, Exception<'ctx>> {
        let ctx = self.context();
        let mut out = T::default();
        // SAFETY: live context, borrowed value, `out` is a valid destination.
        let status = unsafe { f(ctx.as_ptr(), &mut out, self.as_raw()) };
        ctx.check_status(status)?;
        Ok(out)
    }

    /// `ToBoolean`. Only the exception marker itself fails.
    pub fn to_bool(&self) -> Result<bool, Exception<'ctx>> {
        let ctx = self.context();
        // SAFETY: live context, borrowed value.
        let status = unsafe { sys::JS_ToBool(ctx.as_ptr(), self.as_raw()) };
        ctx.check_status(status)?;
        Ok(status != 0)
    }

    /// `ToInt32`: wraps modulo 2^32 and reinterprets as signed.
    pub fn to_int32(&self) -> Result<i32, Exception<'ctx>> {
        self.convert(sys::JS_ToInt32)
    }

    /// `ToUint32`: the same bits as [`Value::to_int32`], read unsigned.
    pub fn to_uint32(&self) -> Result<u32, Exception<'ctx>> {
        self.to_int32().map(|v| v as u32)
    }

    /// Integer conversion wrapping modulo 2^64. BigInts are rejected with
    /// `TypeError: cannot convert bigint to number`.
    pub fn to_int64(&self) -> Result<i64, Exception<'ctx>> {
        self.convert(sys::JS_ToInt64)
    }

    /// `ToIndex`: a non-negative integer no larger than 2^53 - 1.
    pub fn to_index(&self) -> Result<u64, Exception<'ctx>> {
        self.convert(sys::JS_ToIndex)
    }

    pub fn to_float64(&self) -> Result<f64, Exception<'ctx>> {
        self.convert(sys::JS_ToFloat64)
    }

    /// `BigInt64`: wraps a BigInt modulo 2^64. Numbers are rejected.
    pub fn to_bigint64(&self) -> Result<i64, Exception<'ctx>> {
        self.convert(sys::JS_ToBigInt64)
    }

    /// [`Value::to_bigint64`] for BigInts, [`Value::to_int64`] for anything else.
    pub fn to_int64_ext(&self) -> Result<i64, Exception<'ctx>> {
        self.convert(sys::JS_ToInt64Ext)
    }

    /// `ToString`, copied into a host string.
    ///
    /// Symbols cannot be converted implicitly and produce a `TypeError`.
    /// Lone surrogates are replaced with U+FFFD.
    pub fn to_string(&self) -> Result<String, Exception<'ctx>> {
        let ctx = self.context();
        let mut len = 0usize;
        // SAFETY: live context, borrowed value, `len` is a valid destination.
        let ptr = unsafe { sys::JS_ToCStringLen2(ctx.as_ptr(), &mut len, self.as_raw(), 0) };
        if ptr.is_null() {
            return Err(ctx.take_exception());
        }
        // SAFETY: the engine returned `len` initialised bytes at `ptr`, which stay
        // alive until `JS_FreeCString`.
        let text = unsafe {
            let bytes = core::slice::from_raw_parts(ptr.cast::<u8>(), len);
            let text = String::from_utf8_lossy(bytes).into_owned();
            sys::JS_FreeCString(ctx.as_ptr(), ptr);
            text
        };
        Ok(text)
    }

    /// `ToString`, kept as an engine string value.
    pub fn to_js_string(&self) -> Result<Value<'ctx>, Exception<'ctx>> {
        let ctx = self.context();
        // SAFETY: live context, borrowed value; the result is owned.
        let raw = unsafe { sys::JS_ToString(ctx.as_ptr(), self.as_raw()) };
        ctx.check(raw)
    }
}

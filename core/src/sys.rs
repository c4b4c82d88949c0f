//! Raw C ABI of the embedded QuickJS engine.
//!
//! The engine itself is compiled and linked by `libquickjs-sys`; this module
//! declares the subset of its exported entry points the binding consumes and
//! re-implements, in Rust, the `static inline` helpers of `quickjs.h` that never
//! reach the linker (value construction, refcount dup/free). Keeping the inline
//! half here means tag dispatch and refcount bookkeeping are visible to the host
//! instead of hidden behind C shims.
//!
//! Layout matches the non-NaN-boxing build used on 64-bit targets:
//!
//! ```text
//! struct JSValue { union { int32_t; double; void *ptr; } u; int64_t tag; }
//! ```

#![allow(non_camel_case_types, non_snake_case)]

use core::ffi::{c_char, c_int, c_void};

// The engine archive comes from here; nothing else in the crate names it.
use libquickjs_sys as _;

#[cfg(not(target_pointer_width = "64"))]
compile_error!("32-bit targets use the NaN-boxed JSValue layout, which is not modelled");

// ============================================================================
// Opaque engine handles
// ============================================================================

#[repr(C)]
pub struct JSRuntime {
    _private: [u8; 0],
}

#[repr(C)]
pub struct JSContext {
    _private: [u8; 0],
}

pub type JSAtom = u32;

/// The null atom, returned by atom constructors on failure.
pub const JS_ATOM_NULL: JSAtom = 0;

/// First field of every heap cell referenced by a negative-tag value.
#[repr(C)]
pub struct JSRefCountHeader {
    pub ref_count: c_int,
}

// ============================================================================
// JSValue
// ============================================================================

#[repr(C)]
#[derive(Clone, Copy)]
pub union JSValueUnion {
    pub int32: i32,
    pub float64: f64,
    pub ptr: *mut c_void,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct JSValue {
    pub u: JSValueUnion,
    pub tag: i64,
}

/* all tags with a reference count are negative */
pub const JS_TAG_FIRST: i32 = -11;
pub const JS_TAG_BIG_DECIMAL: i32 = -11;
pub const JS_TAG_BIG_INT: i32 = -10;
pub const JS_TAG_BIG_FLOAT: i32 = -9;
pub const JS_TAG_SYMBOL: i32 = -8;
pub const JS_TAG_STRING: i32 = -7;
pub const JS_TAG_MODULE: i32 = -3;
pub const JS_TAG_FUNCTION_BYTECODE: i32 = -2;
pub const JS_TAG_OBJECT: i32 = -1;

pub const JS_TAG_INT: i32 = 0;
pub const JS_TAG_BOOL: i32 = 1;
pub const JS_TAG_NULL: i32 = 2;
pub const JS_TAG_UNDEFINED: i32 = 3;
pub const JS_TAG_UNINITIALIZED: i32 = 4;
pub const JS_TAG_CATCH_OFFSET: i32 = 5;
pub const JS_TAG_EXCEPTION: i32 = 6;
pub const JS_TAG_FLOAT64: i32 = 7;

/// `JS_MKVAL`: an inline value carrying an int32 payload.
#[inline]
pub const fn mkval(tag: i32, val: i32) -> JSValue {
    JSValue {
        u: JSValueUnion { int32: val },
        tag: tag as i64,
    }
}

/// `JS_MKPTR`: a value pointing at a heap cell.
#[inline]
pub const fn mkptr(tag: i32, ptr: *mut c_void) -> JSValue {
    JSValue {
        u: JSValueUnion { ptr },
        tag: tag as i64,
    }
}

/// `__JS_NewFloat64`: a float64 value, with no int32 normalisation.
#[inline]
pub const fn mkfloat64(d: f64) -> JSValue {
    JSValue {
        u: JSValueUnion { float64: d },
        tag: JS_TAG_FLOAT64 as i64,
    }
}

/// `JS_VALUE_HAS_REF_COUNT`: the unsigned compare folds every negative tag
/// from `JS_TAG_FIRST` up to `-1` into the refcounted range.
#[inline]
pub const fn has_ref_count(v: JSValue) -> bool {
    (v.tag as i32 as u32) >= (JS_TAG_FIRST as u32)
}

/// `JS_DupValue`.
///
/// # Safety
///
/// `v` must be a live value; when refcounted its pointer must reference a
/// cell owned by a runtime that is still alive.
#[inline]
pub unsafe fn dup_value(v: JSValue) {
    if has_ref_count(v) {
        // SAFETY: refcounted payloads always point at a JSRefCountHeader.
        unsafe {
            let header = v.u.ptr.cast::<JSRefCountHeader>();
            (*header).ref_count += 1;
        }
    }
}

/// `JS_FreeValue`: drops one reference, handing the cell to the engine's
/// finaliser once the count reaches zero.
///
/// # Safety
///
/// `ctx` must be the live context `v` belongs to and the caller must own one
/// reference to `v`, which is consumed.
#[inline]
pub unsafe fn free_value(ctx: *mut JSContext, v: JSValue) {
    if has_ref_count(v) {
        // SAFETY: refcounted payloads always point at a JSRefCountHeader.
        unsafe {
            let header = v.u.ptr.cast::<JSRefCountHeader>();
            (*header).ref_count -= 1;
            if (*header).ref_count <= 0 {
                __JS_FreeValue(ctx, v);
            }
        }
    }
}

/// Reads the refcount of a heap cell.
///
/// # Safety
///
/// `v` must be a live refcounted value.
#[inline]
pub unsafe fn ref_count(v: JSValue) -> c_int {
    // SAFETY: guaranteed by the caller.
    unsafe { (*v.u.ptr.cast::<JSRefCountHeader>()).ref_count }
}

// ============================================================================
// Evaluation flags
// ============================================================================

pub const JS_EVAL_TYPE_GLOBAL: c_int = 0 << 0;
pub const JS_EVAL_TYPE_MODULE: c_int = 1 << 0;
pub const JS_EVAL_TYPE_DIRECT: c_int = 2 << 0;
pub const JS_EVAL_TYPE_INDIRECT: c_int = 3 << 0;
pub const JS_EVAL_TYPE_MASK: c_int = 3 << 0;

pub const JS_EVAL_FLAG_STRICT: c_int = 1 << 3;
pub const JS_EVAL_FLAG_STRIP: c_int = 1 << 4;
pub const JS_EVAL_FLAG_COMPILE_ONLY: c_int = 1 << 5;
pub const JS_EVAL_FLAG_BACKTRACE_BARRIER: c_int = 1 << 6;

pub const JS_DEFAULT_STACK_SIZE: usize = 256 * 1024;

// ============================================================================
// Exported entry points
// ============================================================================

unsafe extern "C" {
    pub fn JS_NewRuntime() -> *mut JSRuntime;
    pub fn JS_FreeRuntime(rt: *mut JSRuntime);
    pub fn JS_SetMemoryLimit(rt: *mut JSRuntime, limit: usize);
    pub fn JS_SetGCThreshold(rt: *mut JSRuntime, gc_threshold: usize);
    pub fn JS_SetMaxStackSize(rt: *mut JSRuntime, stack_size: usize);
    pub fn JS_RunGC(rt: *mut JSRuntime);

    pub fn JS_NewContext(rt: *mut JSRuntime) -> *mut JSContext;
    pub fn JS_FreeContext(ctx: *mut JSContext);

    pub fn __JS_FreeValue(ctx: *mut JSContext, v: JSValue);

    pub fn JS_Eval(
        ctx: *mut JSContext,
        input: *const c_char,
        input_len: usize,
        filename: *const c_char,
        eval_flags: c_int,
    ) -> JSValue;
    pub fn JS_EvalFunction(ctx: *mut JSContext, fun_obj: JSValue) -> JSValue;

    pub fn JS_GetException(ctx: *mut JSContext) -> JSValue;
    pub fn JS_Throw(ctx: *mut JSContext, obj: JSValue) -> JSValue;
    pub fn JS_NewError(ctx: *mut JSContext) -> JSValue;
    pub fn JS_ThrowOutOfMemory(ctx: *mut JSContext) -> JSValue;
    pub fn JS_ThrowTypeError(ctx: *mut JSContext, fmt: *const c_char, ...) -> JSValue;
    pub fn JS_ThrowRangeError(ctx: *mut JSContext, fmt: *const c_char, ...) -> JSValue;

    pub fn JS_NewBigInt64(ctx: *mut JSContext, v: i64) -> JSValue;
    pub fn JS_NewBigUint64(ctx: *mut JSContext, v: u64) -> JSValue;
    pub fn JS_NewStringLen(ctx: *mut JSContext, str1: *const c_char, len1: usize) -> JSValue;
    pub fn JS_NewObject(ctx: *mut JSContext) -> JSValue;
    pub fn JS_NewArray(ctx: *mut JSContext) -> JSValue;
    pub fn JS_GetGlobalObject(ctx: *mut JSContext) -> JSValue;

    pub fn JS_NewAtomLen(ctx: *mut JSContext, str: *const c_char, len: usize) -> JSAtom;
    pub fn JS_NewAtomUInt32(ctx: *mut JSContext, n: u32) -> JSAtom;
    pub fn JS_DupAtom(ctx: *mut JSContext, v: JSAtom) -> JSAtom;
    pub fn JS_FreeAtom(ctx: *mut JSContext, v: JSAtom);
    pub fn JS_AtomToValue(ctx: *mut JSContext, atom: JSAtom) -> JSValue;
    pub fn JS_AtomToString(ctx: *mut JSContext, atom: JSAtom) -> JSValue;

    pub fn JS_GetPropertyInternal(
        ctx: *mut JSContext,
        obj: JSValue,
        prop: JSAtom,
        this_obj: JSValue,
        throw_ref_error: c_int,
    ) -> JSValue;
    pub fn JS_GetPropertyUint32(ctx: *mut JSContext, this_obj: JSValue, idx: u32) -> JSValue;
    pub fn JS_DefinePropertyValue(
        ctx: *mut JSContext,
        this_obj: JSValue,
        prop: JSAtom,
        val: JSValue,
        flags: c_int,
    ) -> c_int;

    pub fn JS_IsError(ctx: *mut JSContext, val: JSValue) -> c_int;
    pub fn JS_IsFunction(ctx: *mut JSContext, val: JSValue) -> c_int;
    pub fn JS_IsConstructor(ctx: *mut JSContext, val: JSValue) -> c_int;
    pub fn JS_IsArray(ctx: *mut JSContext, val: JSValue) -> c_int;

    pub fn JS_ToBool(ctx: *mut JSContext, val: JSValue) -> c_int;
    pub fn JS_ToInt32(ctx: *mut JSContext, pres: *mut i32, val: JSValue) -> c_int;
    pub fn JS_ToInt64(ctx: *mut JSContext, pres: *mut i64, val: JSValue) -> c_int;
    pub fn JS_ToIndex(ctx: *mut JSContext, plen: *mut u64, val: JSValue) -> c_int;
    pub fn JS_ToFloat64(ctx: *mut JSContext, pres: *mut f64, val: JSValue) -> c_int;
    pub fn JS_ToBigInt64(ctx: *mut JSContext, pres: *mut i64, val: JSValue) -> c_int;
    pub fn JS_ToInt64Ext(ctx: *mut JSContext, pres: *mut i64, val: JSValue) -> c_int;
    pub fn JS_ToString(ctx: *mut JSContext, val: JSValue) -> JSValue;
    pub fn JS_ToCStringLen2(
        ctx: *mut JSContext,
        plen: *mut usize,
        val1: JSValue,
        cesu8: c_int,
    ) -> *const c_char;
    pub fn JS_FreeCString(ctx: *mut JSContext, ptr: *const c_char);
}

use core::ffi::c_int;
use core::ptr::NonNull;
use std::ffi::CString;

use tracing::{debug, trace};

use crate::api::{Error, EvalOptions, EvalType, Exception, Runtime};
use crate::sys::{self, JSValue};
use crate::values::{Atom, Value};

/// An execution environment: a global object plus a pending-exception slot.
///
/// A context borrows the [`Runtime`] it was created from, and every
/// [`Value`] and [`Atom`] it produces borrows the context, so releases always
/// happen in a valid order.
///
/// # Example
///
/// ```ignore
/// use quickbind_core::api::{EvalType, Runtime};
///
/// let runtime = Runtime::new()?;
/// let ctx = runtime.new_context()?;
///
/// let value = ctx.eval("({ a: 1 })", "<input>", EvalType::Global)?;
/// assert_eq!(value.get_prop("a")?.to_int32()?, 1);
/// ```
pub struct Context<'rt> {
    raw: NonNull<sys::JSContext>,
    runtime: &'rt Runtime,
}

impl<'rt> Context<'rt> {
    pub(crate) fn new(runtime: &'rt Runtime) -> Result<Self, Error> {
        // SAFETY: the runtime is alive for 'rt.
        let raw = unsafe { sys::JS_NewContext(runtime.as_ptr()) };
        let raw = NonNull::new(raw).ok_or(Error::Allocation("context"))?;
        debug!(context = ?raw, "created context");
        Ok(Context { raw, runtime })
    }

    pub fn as_ptr(&self) -> *mut sys::JSContext {
        self.raw.as_ptr()
    }

    pub fn runtime(&self) -> &'rt Runtime {
        self.runtime
    }

    // ============================================================================
    // Pending-exception adapter
    // ============================================================================

    /// Drain the pending exception. An empty slot yields `Undefined`.
    pub(crate) fn take_exception(&self) -> Exception<'_> {
        // SAFETY: live context; the slot's reference moves to us.
        let value = unsafe { Value::from_raw(self, sys::JS_GetException(self.as_ptr())) };
        let value = if value.is_null() || value.is_uninitialized() {
            Value::undefined(self)
        } else {
            value
        };
        trace!(tag = %value.tag(), "drained pending exception");
        Exception::new(value)
    }

    /// Own `raw`, or drain the pending exception if `raw` is the exception marker.
    pub(crate) fn check(&self, raw: JSValue) -> Result<Value<'_>, Exception<'_>> {
        if raw.tag == sys::JS_TAG_EXCEPTION as i64 {
            return Err(self.take_exception());
        }
        // SAFETY: every caller passes a freshly returned, owned value.
        Ok(unsafe { Value::from_raw(self, raw) })
    }

    /// Drain the pending exception if an engine call returned a negative status.
    pub(crate) fn check_status(&self, status: c_int) -> Result<(), Exception<'_>> {
        if status < 0 {
            return Err(self.take_exception());
        }
        Ok(())
    }

    /// Hand a value's reference to the engine.
    ///
    /// Panics if the value belongs to a different runtime, whose heap this
    /// context cannot reference.
    pub(crate) fn adopt(&self, value: Value<'_>) -> JSValue {
        assert_eq!(
            value.context().runtime().as_ptr(),
            self.runtime.as_ptr(),
            "value belongs to a different runtime"
        );
        value.into_raw()
    }

    // ============================================================================
    // Evaluation
    // ============================================================================

    /// Compile and run `source`.
    ///
    /// On success returns the completion value of the script (or `Undefined`);
    /// on failure returns what it threw. With [`EvalFlags::COMPILE_ONLY`] the
    /// compiled code is returned instead, to be run by [`Context::eval_function`].
    ///
    /// [`EvalFlags::COMPILE_ONLY`]: crate::api::EvalFlags::COMPILE_ONLY
    pub fn eval(
        &self,
        source: &str,
        filename: &str,
        options: impl Into<EvalOptions>,
    ) -> Result<Value<'_>, Exception<'_>> {
        let options = options.into();
        // The engine asserts a running script frame for direct eval; there is
        // none when called from the host.
        if options.eval_type == EvalType::Direct {
            self.throw_type_error("direct eval requires a running script frame");
            return Err(self.take_exception());
        }
        let Ok(filename_c) = CString::new(filename) else {
            self.throw_type_error("filename must not contain NUL bytes");
            return Err(self.take_exception());
        };

        // The parser reads one byte past the end.
        let mut input = Vec::with_capacity(source.len() + 1);
        input.extend_from_slice(source.as_bytes());
        input.push(0);

        trace!(
            filename,
            eval_type = ?options.eval_type,
            flags = ?options.flags,
            len = source.len(),
            "eval"
        );
        // SAFETY: `input` is NUL-terminated past `source.len()` and outlives the call.
        let raw = unsafe {
            sys::JS_Eval(
                self.as_ptr(),
                input.as_ptr().cast(),
                source.len(),
                filename_c.as_ptr(),
                options.as_raw(),
            )
        };
        self.check(raw)
    }

    /// Run code compiled with `COMPILE_ONLY`, consuming it.
    pub fn eval_function(&self, function: Value<'_>) -> Result<Value<'_>, Exception<'_>> {
        let function = self.adopt(function);
        // SAFETY: live context; the engine takes ownership of `function`.
        let raw = unsafe { sys::JS_EvalFunction(self.as_ptr(), function) };
        self.check(raw)
    }

    // ============================================================================
    // Exceptions
    // ============================================================================

    /// Drain the pending exception, `Undefined` if there is none.
    ///
    /// An empty slot and a thrown `null` are indistinguishable here; both
    /// come back as `Undefined`.
    pub fn exception(&self) -> Value<'_> {
        self.take_exception().into_value()
    }

    /// Make `value` the pending exception, releasing any previous one.
    ///
    /// Returns the exception marker, for native code that signals "threw" by
    /// returning it.
    pub fn throw(&self, value: Value<'_>) -> Value<'_> {
        let value = self.adopt(value);
        // SAFETY: live context; the slot takes ownership of `value`.
        let raw = unsafe { sys::JS_Throw(self.as_ptr(), value) };
        // SAFETY: the marker is an inline value.
        unsafe { Value::from_raw(self, raw) }
    }

    /// Throw a new `TypeError` with `message`.
    pub fn throw_type_error(&self, message: &str) -> Value<'_> {
        let message = c_message(message);
        // SAFETY: live context; "%s" consumes exactly one C string argument.
        let raw = unsafe { sys::JS_ThrowTypeError(self.as_ptr(), c"%s".as_ptr(), message.as_ptr()) };
        // SAFETY: the marker is an inline value.
        unsafe { Value::from_raw(self, raw) }
    }

    /// Throw a new `RangeError` with `message`.
    pub fn throw_range_error(&self, message: &str) -> Value<'_> {
        let message = c_message(message);
        // SAFETY: live context; "%s" consumes exactly one C string argument.
        let raw =
            unsafe { sys::JS_ThrowRangeError(self.as_ptr(), c"%s".as_ptr(), message.as_ptr()) };
        // SAFETY: the marker is an inline value.
        unsafe { Value::from_raw(self, raw) }
    }

    /// Throw the engine's canonical `InternalError: out of memory`.
    pub fn throw_out_of_memory(&self) -> Value<'_> {
        // SAFETY: live context.
        let raw = unsafe { sys::JS_ThrowOutOfMemory(self.as_ptr()) };
        // SAFETY: the marker is an inline value.
        unsafe { Value::from_raw(self, raw) }
    }

    /// A new, unthrown `Error` object.
    pub fn new_error(&self) -> Result<Value<'_>, Exception<'_>> {
        // SAFETY: live context; the result is owned.
        let raw = unsafe { sys::JS_NewError(self.as_ptr()) };
        self.check(raw)
    }

    // ============================================================================
    // Value constructors
    // ============================================================================

    pub fn new_undefined(&self) -> Value<'_> {
        Value::undefined(self)
    }

    pub fn new_null(&self) -> Value<'_> {
        Value::null(self)
    }

    pub fn new_bool(&self, v: bool) -> Value<'_> {
        Value::bool(self, v)
    }

    pub fn new_int32(&self, v: i32) -> Value<'_> {
        Value::int32(self, v)
    }

    /// Values above `i32::MAX` are stored as `Float64`.
    pub fn new_uint32(&self, v: u32) -> Value<'_> {
        match i32::try_from(v) {
            Ok(v) => Value::int32(self, v),
            Err(_) => Value::float64(self, v as f64),
        }
    }

    /// Values outside the int32 range are stored as `Float64`, which may round.
    pub fn new_int64(&self, v: i64) -> Value<'_> {
        match i32::try_from(v) {
            Ok(v) => Value::int32(self, v),
            Err(_) => Value::float64(self, v as f64),
        }
    }

    /// Stored as `Int` when `v` is bit-identical to an int32 (so `-0.0`
    /// stays a float), otherwise as `Float64`.
    pub fn new_float64(&self, v: f64) -> Value<'_> {
        let as_int = v as i32;
        if (as_int as f64).to_bits() == v.to_bits() {
            Value::int32(self, as_int)
        } else {
            Value::float64(self, v)
        }
    }

    /// A BigInt. On allocation failure the result is the exception marker.
    pub fn new_big_int64(&self, v: i64) -> Value<'_> {
        // SAFETY: live context; the result is owned.
        unsafe { Value::from_raw(self, sys::JS_NewBigInt64(self.as_ptr(), v)) }
    }

    /// A BigInt. On allocation failure the result is the exception marker.
    pub fn new_big_uint64(&self, v: u64) -> Value<'_> {
        // SAFETY: live context; the result is owned.
        unsafe { Value::from_raw(self, sys::JS_NewBigUint64(self.as_ptr(), v)) }
    }

    pub fn new_string(&self, text: &str) -> Result<Value<'_>, Exception<'_>> {
        // SAFETY: live context; the engine copies `text.len()` bytes.
        let raw = unsafe { sys::JS_NewStringLen(self.as_ptr(), text.as_ptr().cast(), text.len()) };
        self.check(raw)
    }

    pub fn new_object(&self) -> Result<Value<'_>, Exception<'_>> {
        // SAFETY: live context; the result is owned.
        let raw = unsafe { sys::JS_NewObject(self.as_ptr()) };
        self.check(raw)
    }

    pub fn new_array(&self) -> Result<Value<'_>, Exception<'_>> {
        // SAFETY: live context; the result is owned.
        let raw = unsafe { sys::JS_NewArray(self.as_ptr()) };
        self.check(raw)
    }

    pub fn global_object(&self) -> Value<'_> {
        // SAFETY: live context; the engine returns a new reference.
        unsafe { Value::from_raw(self, sys::JS_GetGlobalObject(self.as_ptr())) }
    }

    // ============================================================================
    // Atoms
    // ============================================================================

    /// Intern `name`. Equal names yield equal atoms.
    pub fn new_atom(&self, name: &str) -> Result<Atom<'_>, Exception<'_>> {
        // SAFETY: live context; the engine copies `name.len()` bytes.
        let id = unsafe { sys::JS_NewAtomLen(self.as_ptr(), name.as_ptr().cast(), name.len()) };
        self.atom(id)
    }

    /// Intern the decimal form of `n`, as used for array indices.
    pub fn new_atom_uint32(&self, n: u32) -> Result<Atom<'_>, Exception<'_>> {
        // SAFETY: live context.
        let id = unsafe { sys::JS_NewAtomUInt32(self.as_ptr(), n) };
        self.atom(id)
    }

    fn atom(&self, id: sys::JSAtom) -> Result<Atom<'_>, Exception<'_>> {
        if id == sys::JS_ATOM_NULL {
            return Err(self.take_exception());
        }
        // SAFETY: a non-null atom freshly returned by the engine is owned.
        Ok(unsafe { Atom::from_raw(self, id) })
    }
}

impl Drop for Context<'_> {
    fn drop(&mut self) {
        debug!(context = ?self.raw, "freeing context");
        // SAFETY: every value and atom borrowing this context is gone.
        unsafe { sys::JS_FreeContext(self.as_ptr()) };
    }
}

fn c_message(message: &str) -> CString {
    CString::new(message.replace('\0', "\\0")).unwrap_or_default()
}

use core::ffi::c_void;
use core::fmt;
use core::mem::ManuallyDrop;
use core::ptr::NonNull;

use tracing::warn;

use crate::api::{Context, Exception, PropFlags};
use crate::sys::{self, JSValue};
use crate::values::{Atom, Tag};

/// Payload of a value, decoded from the engine's flat `{ union, tag }` pair.
///
/// Inline variants carry their scalar; `Heap` owns one reference on a
/// refcounted cell.
#[derive(Clone, Copy, PartialEq)]
enum Repr {
    Int(i32),
    Bool(bool),
    Null,
    Undefined,
    Uninitialized,
    CatchOffset(i32),
    Exception,
    Float64(f64),
    Heap { tag: Tag, ptr: NonNull<c_void> },
}

/// An owned reference to an engine value.
///
/// Dropping a `Value` releases its reference. Cloning (or [`Value::dup`]) takes
/// an additional reference on the same heap cell. Values borrow the
/// [`Context`] that produced them and cannot outlive it.
pub struct Value<'ctx> {
    ctx: &'ctx Context<'ctx>,
    repr: Repr,
}

impl<'ctx> Value<'ctx> {
    /// Take ownership of a raw engine value.
    ///
    /// Tags the binding does not know are released immediately and decode as
    /// `Undefined`.
    ///
    /// # Safety
    ///
    /// `raw` must be a live value of `ctx`'s runtime and the caller must own one
    /// reference to it, which moves into the returned `Value`.
    pub unsafe fn from_raw(ctx: &'ctx Context<'ctx>, raw: JSValue) -> Value<'ctx> {
        // SAFETY: every union field is plain data; the tag picks which is meaningful.
        let repr = unsafe {
            match Tag::from_raw(raw.tag) {
                Some(Tag::Int) => Repr::Int(raw.u.int32),
                Some(Tag::Bool) => Repr::Bool(raw.u.int32 != 0),
                Some(Tag::Null) => Repr::Null,
                Some(Tag::Undefined) => Repr::Undefined,
                Some(Tag::Uninitialized) => Repr::Uninitialized,
                Some(Tag::CatchOffset) => Repr::CatchOffset(raw.u.int32),
                Some(Tag::Exception) => Repr::Exception,
                Some(Tag::Float64) => Repr::Float64(raw.u.float64),
                Some(tag) => match NonNull::new(raw.u.ptr) {
                    Some(ptr) => Repr::Heap { tag, ptr },
                    None => {
                        warn!(%tag, "engine returned a null heap pointer");
                        Repr::Undefined
                    }
                },
                None => {
                    warn!(tag = raw.tag, "engine returned an unknown value tag");
                    sys::free_value(ctx.as_ptr(), raw);
                    Repr::Undefined
                }
            }
        };
        Value { ctx, repr }
    }

    pub(crate) fn undefined(ctx: &'ctx Context<'ctx>) -> Value<'ctx> {
        Value {
            ctx,
            repr: Repr::Undefined,
        }
    }

    pub(crate) fn null(ctx: &'ctx Context<'ctx>) -> Value<'ctx> {
        Value {
            ctx,
            repr: Repr::Null,
        }
    }

    pub(crate) fn int32(ctx: &'ctx Context<'ctx>, v: i32) -> Value<'ctx> {
        Value {
            ctx,
            repr: Repr::Int(v),
        }
    }

    pub(crate) fn bool(ctx: &'ctx Context<'ctx>, v: bool) -> Value<'ctx> {
        Value {
            ctx,
            repr: Repr::Bool(v),
        }
    }

    /// A float64 value with no int32 normalisation.
    pub(crate) fn float64(ctx: &'ctx Context<'ctx>, v: f64) -> Value<'ctx> {
        Value {
            ctx,
            repr: Repr::Float64(v),
        }
    }

    /// The raw engine value, still owned by `self`.
    pub fn as_raw(&self) -> JSValue {
        match self.repr {
            Repr::Int(v) => sys::mkval(sys::JS_TAG_INT, v),
            Repr::Bool(v) => sys::mkval(sys::JS_TAG_BOOL, v as i32),
            Repr::Null => sys::mkval(sys::JS_TAG_NULL, 0),
            Repr::Undefined => sys::mkval(sys::JS_TAG_UNDEFINED, 0),
            Repr::Uninitialized => sys::mkval(sys::JS_TAG_UNINITIALIZED, 0),
            Repr::CatchOffset(v) => sys::mkval(sys::JS_TAG_CATCH_OFFSET, v),
            Repr::Exception => sys::mkval(sys::JS_TAG_EXCEPTION, 0),
            Repr::Float64(v) => sys::mkfloat64(v),
            Repr::Heap { tag, ptr } => sys::mkptr(tag.as_raw(), ptr.as_ptr()),
        }
    }

    /// Give up ownership, returning the raw value. The caller now owes its
    /// release.
    pub fn into_raw(self) -> JSValue {
        let this = ManuallyDrop::new(self);
        this.as_raw()
    }

    pub fn context(&self) -> &'ctx Context<'ctx> {
        self.ctx
    }

    pub fn tag(&self) -> Tag {
        match self.repr {
            Repr::Int(_) => Tag::Int,
            Repr::Bool(_) => Tag::Bool,
            Repr::Null => Tag::Null,
            Repr::Undefined => Tag::Undefined,
            Repr::Uninitialized => Tag::Uninitialized,
            Repr::CatchOffset(_) => Tag::CatchOffset,
            Repr::Exception => Tag::Exception,
            Repr::Float64(_) => Tag::Float64,
            Repr::Heap { tag, .. } => tag,
        }
    }

    /// Current reference count of the heap cell, or `None` for inline values,
    /// which have no count.
    pub fn ref_count(&self) -> Option<i32> {
        match self.repr {
            // SAFETY: we own a reference, so the cell is alive.
            Repr::Heap { .. } => Some(unsafe { sys::ref_count(self.as_raw()) }),
            _ => None,
        }
    }

    /// Take another reference on the same cell.
    pub fn dup(&self) -> Value<'ctx> {
        if let Repr::Heap { .. } = self.repr {
            // SAFETY: we own a reference, so the cell is alive.
            unsafe { sys::dup_value(self.as_raw()) };
        }
        Value {
            ctx: self.ctx,
            repr: self.repr,
        }
    }

    /// Release this reference now. Same as dropping the value.
    pub fn free(self) {
        drop(self)
    }

    /// Whether both handles denote the same value: the same heap cell, or
    /// bit-identical inline payloads.
    pub fn is_same(&self, other: &Value<'_>) -> bool {
        match (self.repr, other.repr) {
            (Repr::Heap { ptr: a, .. }, Repr::Heap { ptr: b, .. }) => a == b,
            (Repr::Float64(a), Repr::Float64(b)) => a.to_bits() == b.to_bits(),
            (a, b) => a == b,
        }
    }

    // ============================================================================
    // Inline payload access
    // ============================================================================

    pub fn as_int32(&self) -> Option<i32> {
        match self.repr {
            Repr::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.repr {
            Repr::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// The payload of a `Float64` value. Integral numbers are usually stored
    /// as `Int`; use [`Value::to_float64`] to read any number.
    pub fn as_float64(&self) -> Option<f64> {
        match self.repr {
            Repr::Float64(v) => Some(v),
            _ => None,
        }
    }

    // ============================================================================
    // Type predicates
    // ============================================================================

    pub fn is_number(&self) -> bool {
        matches!(self.repr, Repr::Int(_) | Repr::Float64(_))
    }

    pub fn is_big_int(&self) -> bool {
        self.tag() == Tag::BigInt
    }

    pub fn is_big_float(&self) -> bool {
        self.tag() == Tag::BigFloat
    }

    pub fn is_big_decimal(&self) -> bool {
        self.tag() == Tag::BigDecimal
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.repr, Repr::Bool(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.repr, Repr::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.repr, Repr::Undefined)
    }

    /// Whether this is the engine's "an exception is pending" marker.
    pub fn is_exception(&self) -> bool {
        matches!(self.repr, Repr::Exception)
    }

    pub fn is_uninitialized(&self) -> bool {
        matches!(self.repr, Repr::Uninitialized)
    }

    pub fn is_string(&self) -> bool {
        self.tag() == Tag::String
    }

    pub fn is_symbol(&self) -> bool {
        self.tag() == Tag::Symbol
    }

    pub fn is_object(&self) -> bool {
        self.tag() == Tag::Object
    }

    /// Whether this is an `Error` instance.
    pub fn is_error(&self) -> bool {
        // SAFETY: live context, borrowed value.
        unsafe { sys::JS_IsError(self.ctx.as_ptr(), self.as_raw()) != 0 }
    }

    pub fn is_function(&self) -> bool {
        // SAFETY: live context, borrowed value.
        unsafe { sys::JS_IsFunction(self.ctx.as_ptr(), self.as_raw()) != 0 }
    }

    pub fn is_constructor(&self) -> bool {
        // SAFETY: live context, borrowed value.
        unsafe { sys::JS_IsConstructor(self.ctx.as_ptr(), self.as_raw()) != 0 }
    }

    /// Whether this is an array, looking through proxies.
    ///
    /// A revoked proxy makes the engine throw; that exception is discarded and
    /// the answer is `false`.
    pub fn is_array(&self) -> bool {
        // SAFETY: live context, borrowed value.
        let status = unsafe { sys::JS_IsArray(self.ctx.as_ptr(), self.as_raw()) };
        if status < 0 {
            let exception = self.ctx.take_exception();
            warn!(%exception, "is_array raised; treating value as non-array");
            return false;
        }
        status != 0
    }

    // ============================================================================
    // Property access
    // ============================================================================

    /// Read the property `name`.
    pub fn get_prop(&self, name: &str) -> Result<Value<'ctx>, Exception<'ctx>> {
        let atom = self.ctx.new_atom(name)?;
        self.get_prop_atom(&atom)
    }

    /// Read the element at `index`.
    pub fn get_prop_by_idx(&self, index: u32) -> Result<Value<'ctx>, Exception<'ctx>> {
        // SAFETY: live context, borrowed receiver; the result is owned.
        let raw = unsafe { sys::JS_GetPropertyUint32(self.ctx.as_ptr(), self.as_raw(), index) };
        self.ctx.check(raw)
    }

    /// Read a property by interned key.
    ///
    /// Panics if `atom` was interned by a different runtime; atom ids are
    /// only meaningful within their own runtime.
    pub fn get_prop_atom(&self, atom: &Atom<'_>) -> Result<Value<'ctx>, Exception<'ctx>> {
        assert_eq!(
            atom.context().runtime().as_ptr(),
            self.ctx.runtime().as_ptr(),
            "atom belongs to a different runtime"
        );
        let raw = self.as_raw();
        // SAFETY: live context, borrowed receiver and atom; the result is owned.
        let raw = unsafe { sys::JS_GetPropertyInternal(self.ctx.as_ptr(), raw, atom.id(), raw, 0) };
        self.ctx.check(raw)
    }

    /// Define an own data property, consuming `value`.
    ///
    /// Returns `Ok(false)` when the definition was refused without throwing,
    /// which only happens when `flags` lacks [`PropFlags::THROW`].
    pub fn define_prop(
        &self,
        name: &str,
        value: Value<'_>,
        flags: PropFlags,
    ) -> Result<bool, Exception<'ctx>> {
        let atom = self.ctx.new_atom(name)?;
        let value = self.ctx.adopt(value);
        // SAFETY: live context; the engine takes ownership of `value` in every case.
        let status = unsafe {
            sys::JS_DefinePropertyValue(
                self.ctx.as_ptr(),
                self.as_raw(),
                atom.id(),
                value,
                flags.bits(),
            )
        };
        self.ctx.check_status(status)?;
        Ok(status != 0)
    }
}

impl Drop for Value<'_> {
    fn drop(&mut self) {
        if let Repr::Heap { .. } = self.repr {
            // SAFETY: we own exactly one reference and the context outlives us.
            unsafe { sys::free_value(self.ctx.as_ptr(), self.as_raw()) };
        }
    }
}

impl Clone for Value<'_> {
    fn clone(&self) -> Self {
        self.dup()
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::Int(v) => f.debug_tuple("Int").field(&v).finish(),
            Repr::Bool(v) => f.debug_tuple("Bool").field(&v).finish(),
            Repr::CatchOffset(v) => f.debug_tuple("CatchOffset").field(&v).finish(),
            Repr::Float64(v) => f.debug_tuple("Float64").field(&v).finish(),
            Repr::Heap { tag, ptr } => f.debug_tuple(tag.name()).field(&ptr).finish(),
            _ => f.write_str(self.tag().name()),
        }
    }
}

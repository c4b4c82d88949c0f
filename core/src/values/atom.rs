use core::fmt;
use core::hash::{Hash, Hasher};

use crate::api::{Context, Exception};
use crate::sys::{self, JSAtom};
use crate::values::Value;

/// An owned handle on an interned string.
///
/// Atoms are refcounted separately from values. Equal strings interned in
/// the same runtime share one id, so equality is id equality.
pub struct Atom<'ctx> {
    ctx: &'ctx Context<'ctx>,
    id: JSAtom,
}

impl<'ctx> Atom<'ctx> {
    /// Take ownership of a raw atom.
    ///
    /// # Safety
    ///
    /// `id` must be a live, non-null atom of `ctx`'s runtime and the caller
    /// must own one reference to it.
    pub unsafe fn from_raw(ctx: &'ctx Context<'ctx>, id: JSAtom) -> Atom<'ctx> {
        Atom { ctx, id }
    }

    /// The interned id. Still owned by `self`.
    pub fn id(&self) -> JSAtom {
        self.id
    }

    pub fn context(&self) -> &'ctx Context<'ctx> {
        self.ctx
    }

    /// The atom as a property-key value: a string, or a symbol for symbol atoms.
    pub fn to_value(&self) -> Result<Value<'ctx>, Exception<'ctx>> {
        // SAFETY: live context and atom; the result is owned.
        let raw = unsafe { sys::JS_AtomToValue(self.ctx.as_ptr(), self.id) };
        self.ctx.check(raw)
    }

    /// The atom's text as an engine string value.
    pub fn to_js_string(&self) -> Result<Value<'ctx>, Exception<'ctx>> {
        // SAFETY: live context and atom; the result is owned.
        let raw = unsafe { sys::JS_AtomToString(self.ctx.as_ptr(), self.id) };
        self.ctx.check(raw)
    }

    /// Copy the atom's text into a host string. Interior NULs are kept.
    pub fn to_string(&self) -> Result<String, Exception<'ctx>> {
        self.to_js_string()?.to_string()
    }
}

impl Clone for Atom<'_> {
    fn clone(&self) -> Self {
        // SAFETY: live context and atom.
        let id = unsafe { sys::JS_DupAtom(self.ctx.as_ptr(), self.id) };
        Atom { ctx: self.ctx, id }
    }
}

impl Drop for Atom<'_> {
    fn drop(&mut self) {
        // SAFETY: we own one reference and the context outlives us.
        unsafe { sys::JS_FreeAtom(self.ctx.as_ptr(), self.id) };
    }
}

impl PartialEq for Atom<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Atom<'_> {}

impl Hash for Atom<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Atom<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Atom").field(&self.id).finish()
    }
}

use core::cell::Cell;
use core::ptr::NonNull;

use tracing::debug;

use crate::api::{Context, Error, RuntimeOptions};
use crate::sys;

/// Owner of an engine heap, its garbage collector and its resource limits.
///
/// Contexts created from one runtime share its heap. A runtime must outlive
/// its contexts, which the borrow checker enforces.
///
/// # Example
///
/// ```ignore
/// use quickbind_core::api::{Runtime, RuntimeOptions};
///
/// let runtime = Runtime::with_options(RuntimeOptions {
///     memory_limit: Some(32 << 20),
///     ..Default::default()
/// })?;
/// let first = runtime.new_context()?;
/// let second = runtime.new_context()?;
/// ```
pub struct Runtime {
    raw: NonNull<sys::JSRuntime>,
    options: Cell<RuntimeOptions>,
}

impl Runtime {
    /// A runtime with the default 256 KiB stack limit and no memory limit.
    pub fn new() -> Result<Runtime, Error> {
        Self::with_options(RuntimeOptions::default())
    }

    pub fn with_options(options: RuntimeOptions) -> Result<Runtime, Error> {
        // SAFETY: no preconditions.
        let raw = unsafe { sys::JS_NewRuntime() };
        let raw = NonNull::new(raw).ok_or(Error::Allocation("runtime"))?;
        let runtime = Runtime {
            raw,
            options: Cell::new(options),
        };

        runtime.set_max_stack_size(options.max_stack_size);
        if let Some(limit) = options.memory_limit {
            runtime.set_memory_limit(Some(limit));
        }
        if let Some(threshold) = options.gc_threshold {
            runtime.set_gc_threshold(threshold);
        }

        debug!(runtime = ?raw, ?options, "created runtime");
        Ok(runtime)
    }

    /// A fresh context with its own global object, sharing this runtime's heap.
    pub fn new_context(&self) -> Result<Context<'_>, Error> {
        Context::new(self)
    }

    pub fn as_ptr(&self) -> *mut sys::JSRuntime {
        self.raw.as_ptr()
    }

    /// The limits currently in effect.
    pub fn options(&self) -> RuntimeOptions {
        self.options.get()
    }

    /// Limit the interpreter's native stack to `size` bytes; 0 disables the check.
    pub fn set_max_stack_size(&self, size: usize) {
        // The engine compares against the limit as a signed distance.
        let limit = match size {
            0 => isize::MAX as usize,
            size => size.min(isize::MAX as usize),
        };
        // SAFETY: live runtime.
        unsafe { sys::JS_SetMaxStackSize(self.as_ptr(), limit) };
        self.update(|options| options.max_stack_size = size);
    }

    /// Cap the heap at `limit` bytes; `None` removes the cap.
    pub fn set_memory_limit(&self, limit: Option<usize>) {
        // SAFETY: live runtime.
        unsafe { sys::JS_SetMemoryLimit(self.as_ptr(), limit.unwrap_or(usize::MAX)) };
        self.update(|options| options.memory_limit = limit);
    }

    pub fn set_gc_threshold(&self, threshold: usize) {
        // SAFETY: live runtime.
        unsafe { sys::JS_SetGCThreshold(self.as_ptr(), threshold) };
        self.update(|options| options.gc_threshold = Some(threshold));
    }

    /// Run a full collection cycle, including cycle removal.
    pub fn run_gc(&self) {
        debug!(runtime = ?self.raw, "running gc");
        // SAFETY: live runtime.
        unsafe { sys::JS_RunGC(self.as_ptr()) };
    }

    fn update(&self, f: impl FnOnce(&mut RuntimeOptions)) {
        let mut options = self.options.get();
        f(&mut options);
        self.options.set(options);
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        debug!(runtime = ?self.raw, "freeing runtime");
        // SAFETY: every context borrowing this runtime is gone.
        unsafe { sys::JS_FreeRuntime(self.as_ptr()) };
    }
}

//! The real allocator that tracked calls are forwarded to.

use std::ffi::c_void;

use mock_dispatch::MockFn;

/// Signature of the `malloc()` binding.
pub type MallocFn = fn(usize) -> *mut c_void;

/// Signature of the `calloc()` binding.
pub type CallocFn = fn(usize, usize) -> *mut c_void;

/// Signature of the `realloc()` binding.
pub type ReallocFn = unsafe fn(*mut c_void, usize) -> *mut c_void;

/// Signature of the `free()` binding.
pub type FreeFn = unsafe fn(*mut c_void);

/// Allocates `size` bytes with the C allocator.
#[must_use]
pub fn system_malloc(size: usize) -> *mut c_void {
    // SAFETY: No safety requirements.
    unsafe { libc::malloc(size) }
}

/// Allocates zeroed memory for `count` elements of `size` bytes with the C allocator.
#[must_use]
pub fn system_calloc(count: usize, size: usize) -> *mut c_void {
    // SAFETY: No safety requirements.
    unsafe { libc::calloc(count, size) }
}

/// Resizes an allocation with the C allocator.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from the C allocator that has not been freed.
pub unsafe fn system_realloc(ptr: *mut c_void, new_size: usize) -> *mut c_void {
    // SAFETY: Forwarding the caller's guarantees.
    unsafe { libc::realloc(ptr, new_size) }
}

/// Releases an allocation with the C allocator.
///
/// # Safety
///
/// `ptr` must be null or a pointer obtained from the C allocator that has not been freed.
pub unsafe fn system_free(ptr: *mut c_void) {
    // SAFETY: Forwarding the caller's guarantees.
    unsafe { libc::free(ptr) }
}

/// The four allocator functions a [`Tracker`][crate::Tracker] forwards to.
///
/// Each field is a replaceable slot that starts out pointing at the C allocator. Replace a
/// slot to simulate allocation failure or to route calls to a different backend, and reset
/// it to go back to the C allocator.
///
/// # Examples
///
/// ```
/// use std::ffi::c_void;
/// use std::ptr;
///
/// use alloc_audit::{Bindings, Site, Tracker};
///
/// fn out_of_memory(_size: usize) -> *mut c_void {
///     ptr::null_mut()
/// }
///
/// let bindings = Bindings::system();
/// bindings.malloc.replace(out_of_memory);
///
/// let mut tracker = Tracker::builder().bindings(bindings).build();
/// assert!(tracker.malloc(Site::new("demo.c", 1), 64).is_null());
///
/// tracker.bindings().reset();
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub struct Bindings {
    /// Forwarding target of [`Tracker::malloc()`][crate::Tracker::malloc].
    pub malloc: MockFn<MallocFn>,

    /// Forwarding target of [`Tracker::calloc()`][crate::Tracker::calloc].
    pub calloc: MockFn<CallocFn>,

    /// Forwarding target of [`Tracker::realloc()`][crate::Tracker::realloc].
    pub realloc: MockFn<ReallocFn>,

    /// Forwarding target of [`Tracker::free()`][crate::Tracker::free].
    pub free: MockFn<FreeFn>,
}

impl Bindings {
    /// Bindings that forward to the C allocator.
    #[must_use]
    pub const fn system() -> Self {
        Self {
            malloc: MockFn::new(system_malloc),
            calloc: MockFn::new(system_calloc),
            realloc: MockFn::new(system_realloc),
            free: MockFn::new(system_free),
        }
    }

    /// Points all four bindings back at the C allocator.
    pub fn reset(&self) {
        self.malloc.reset();
        self.calloc.reset();
        self.realloc.reset();
        self.free.reset();
    }

    /// Whether any of the bindings has been replaced.
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        self.malloc.is_replaced()
            || self.calloc.is_replaced()
            || self.realloc.is_replaced()
            || self.free.is_replaced()
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::system()
    }
}

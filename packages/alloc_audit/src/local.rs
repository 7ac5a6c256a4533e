//! A ready-made [`Tracker`] per thread, with call sites captured automatically.
//!
//! Code under test calls [`malloc()`], [`calloc()`], [`realloc()`] and [`free()`] from
//! this module instead of the C allocator. Each of them records the location of its caller,
//! so no site has to be passed around. Tests then inspect [`errors_get()`] and reset the
//! thread's tracker with [`errors_clear()`].
//!
//! Parallel tests run on separate threads and therefore see separate trackers.
//!
//! # Examples
//!
//! ```
//! use std::ffi::c_void;
//!
//! use alloc_audit::{Problem, local};
//!
//! // Keep the C allocator out of the double free below.
//! fn ignore_free(_ptr: *mut c_void) {}
//! local::with_tracker(|tracker| tracker.bindings().free.replace(ignore_free));
//!
//! let block = local::malloc(32);
//!
//! // SAFETY: The free binding ignores its argument.
//! unsafe {
//!     local::free(block);
//!     local::free(block);
//! }
//!
//! let report = local::errors_get();
//! assert_eq!(report.len(), 1);
//! assert_eq!(report.records()[0].problem(), Problem::InvalidFree);
//!
//! local::errors_clear();
//! local::with_tracker(|tracker| tracker.bindings().reset());
//! ```
//!
//! # Reentrancy
//!
//! The functions borrow the thread's tracker for the duration of the call. A replacement
//! binding that calls back into this module panics.

use std::cell::RefCell;
use std::ffi::c_void;

use crate::{Report, Site, Tracker};

thread_local! {
    static TRACKER: RefCell<Tracker> = const { RefCell::new(Tracker::new()) };
}

/// Executes a closure with the current thread's tracker.
///
/// # Panics
///
/// Panics if called from inside another call to this module on the same thread.
pub fn with_tracker<R>(f: impl FnOnce(&mut Tracker) -> R) -> R {
    TRACKER.with_borrow_mut(f)
}

/// Replaces the current thread's tracker, returning the previous one.
///
/// Use this to apply a configuration made with [`Tracker::builder()`].
///
/// # Panics
///
/// Panics if called from inside another call to this module on the same thread.
pub fn install(tracker: Tracker) -> Tracker {
    TRACKER.replace(tracker)
}

/// [`Tracker::malloc()`] on the current thread's tracker, recording the caller's location.
#[must_use]
#[track_caller]
pub fn malloc(size: usize) -> *mut c_void {
    let site = Site::caller();
    with_tracker(|tracker| tracker.malloc(site, size))
}

/// [`Tracker::calloc()`] on the current thread's tracker, recording the caller's location.
#[must_use]
#[track_caller]
pub fn calloc(count: usize, size: usize) -> *mut c_void {
    let site = Site::caller();
    with_tracker(|tracker| tracker.calloc(site, count, size))
}

/// [`Tracker::realloc()`] on the current thread's tracker, recording the caller's location.
///
/// # Safety
///
/// Same as [`Tracker::realloc()`].
#[track_caller]
pub unsafe fn realloc(ptr: *mut c_void, new_size: usize) -> *mut c_void {
    let site = Site::caller();

    // SAFETY: Forwarding the caller's guarantees.
    with_tracker(|tracker| unsafe { tracker.realloc(site, ptr, new_size) })
}

/// [`Tracker::free()`] on the current thread's tracker, recording the caller's location.
///
/// # Safety
///
/// Same as [`Tracker::free()`].
#[track_caller]
pub unsafe fn free(ptr: *mut c_void) {
    let site = Site::caller();

    // SAFETY: Forwarding the caller's guarantees.
    with_tracker(|tracker| unsafe { tracker.free(site, ptr) });
}

/// A snapshot of the current thread's records.
#[must_use]
pub fn errors_get() -> Report {
    with_tracker(|tracker| tracker.report())
}

/// Discards the current thread's records and releases the registry's storage.
pub fn errors_clear() {
    with_tracker(Tracker::errors_clear);
}

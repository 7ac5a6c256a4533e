use std::ffi::c_void;
use std::ptr;

use log::{error, trace, warn};

use crate::registry::Registry;
use crate::{Bindings, Problem, ReallocKey, Record, Report, Site, TrackerBuilder};

/// Records allocate/reallocate/free calls to detect leaks and invalid frees.
///
/// The tracker forwards every call to its [`Bindings`] and keeps a registry of the results.
/// Every allocation is recorded as a leak until a matching free or reallocation is observed.
/// Freeing or reallocating a pointer that is not an open allocation is recorded as misuse.
/// Nothing is ever reported by panicking; inspect [`errors()`][Self::errors] after exercising
/// the code under test.
///
/// A tracker is single-threaded state. It is neither `Send` nor `Sync`.
///
/// # Examples
///
/// ```
/// use alloc_audit::{Problem, Site, Tracker};
///
/// let mut tracker = Tracker::new();
///
/// let block = tracker.malloc(Site::new("list.c", 10), 64);
/// assert_eq!(tracker.errors().len(), 1);
/// assert_eq!(tracker.errors()[0].problem(), Problem::MallocWithoutFree);
///
/// // SAFETY: The block came from this tracker and has not been freed.
/// unsafe { tracker.free(Site::new("list.c", 11), block) };
/// assert!(tracker.is_clean());
/// ```
///
/// # Tracking exhaustion
///
/// The registry grows on demand. When it cannot grow, the allocation-family call that needed
/// the room fails the way the real allocator fails: it returns null without calling the
/// real allocator. A free that needs to record misuse but cannot still forwards to the real
/// `free()`; the lost diagnostic goes to the `log` error channel and is counted in
/// [`dropped_diagnostics()`][Self::dropped_diagnostics].
#[derive(Debug)]
pub struct Tracker {
    registry: Registry,
    bindings: Bindings,
    realloc_key: ReallocKey,
    dropped_diagnostics: u64,
}

impl Tracker {
    /// Creates a tracker that forwards to the C allocator, with no capacity limit.
    #[expect(
        clippy::new_without_default,
        reason = "a default tracker would hide which allocator is being forwarded to"
    )]
    #[must_use]
    pub const fn new() -> Self {
        Self::from_parts(Bindings::system(), None, ReallocKey::Input)
    }

    /// Starts configuring a tracker.
    pub const fn builder() -> TrackerBuilder {
        TrackerBuilder::new()
    }

    pub(crate) const fn from_parts(
        bindings: Bindings,
        capacity_limit: Option<usize>,
        realloc_key: ReallocKey,
    ) -> Self {
        Self {
            registry: Registry::new(capacity_limit),
            bindings,
            realloc_key,
            dropped_diagnostics: 0,
        }
    }

    /// The allocator functions that calls are forwarded to.
    ///
    /// The bindings are replaceable slots, so tests can substitute failing or counting
    /// allocators through this shared reference.
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Allocates `size` bytes through the `malloc` binding and records the allocation.
    ///
    /// Returns whatever the binding returned. A null result is recorded too; freeing null is
    /// a no-op, so that record never matches anything and shows up as a leak until cleared.
    ///
    /// Returns null without calling the binding if the registry cannot make room.
    pub fn malloc(&mut self, site: Site, size: usize) -> *mut c_void {
        self.allocate(site, Problem::MallocWithoutFree, |bindings| {
            (bindings.malloc.current())(size)
        })
    }

    /// Allocates zeroed memory for `count` elements of `size` bytes through the `calloc`
    /// binding and records the allocation.
    ///
    /// Behaves like [`malloc()`][Self::malloc] otherwise.
    pub fn calloc(&mut self, site: Site, count: usize, size: usize) -> *mut c_void {
        self.allocate(site, Problem::CallocWithoutFree, |bindings| {
            (bindings.calloc.current())(count, size)
        })
    }

    /// Resizes an allocation through the `realloc` binding.
    ///
    /// A non-null `ptr` must be an open allocation. Its record is removed and one new record
    /// is added for the result, keyed according to the configured [`ReallocKey`].
    ///
    /// If `ptr` is not an open allocation, the misuse is recorded and null is returned
    /// without calling the binding. Null is also returned, again without calling the
    /// binding, if the registry cannot make room for the new record. In that case the
    /// record of `ptr` has already been removed.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a pointer that the `realloc` binding accepts. With the system
    /// bindings that means a live allocation from the C allocator.
    pub unsafe fn realloc(
        &mut self,
        site: Site,
        ptr: *mut c_void,
        new_size: usize,
    ) -> *mut c_void {
        if !ptr.is_null() && !self.release(site, ptr, Problem::InvalidRealloc) {
            return ptr::null_mut();
        }

        if let Err(e) = self.registry.grow_or_init() {
            warn!(
                "{site}: realloc({ptr:?}, {new_size}) failed because allocation tracking is exhausted: {e}"
            );
            return ptr::null_mut();
        }

        // SAFETY: Forwarding the caller's guarantees. A non-null pointer has just been matched
        // with an open allocation.
        let result = unsafe { (self.bindings.realloc.current())(ptr, new_size) };
        trace!("{site}: realloc({ptr:?}, {new_size}) -> {result:?}");

        let key = match self.realloc_key {
            ReallocKey::Output if !result.is_null() => result,
            ReallocKey::Input | ReallocKey::Output => ptr,
        };

        self.registry
            .append(Record::new(site, Problem::ReallocWithoutFree, key));
        result
    }

    /// Releases an allocation through the `free` binding.
    ///
    /// Freeing null does nothing at all: the registry is not consulted and the binding is
    /// not called. Any other pointer is looked up and its record removed. If there is no
    /// such record, the misuse is recorded. Either way the pointer is then passed to the
    /// binding.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a pointer that the `free` binding accepts. With the system
    /// bindings that means a live allocation from the C allocator. Unlike
    /// [`realloc()`][Self::realloc], an unmatched pointer is still forwarded.
    pub unsafe fn free(&mut self, site: Site, ptr: *mut c_void) {
        if ptr.is_null() {
            return;
        }

        self.release(site, ptr, Problem::InvalidFree);
        trace!("{site}: free({ptr:?})");

        // SAFETY: Forwarding the caller's guarantees.
        unsafe { (self.bindings.free.current())(ptr) };
    }

    /// The current records: open allocations and recorded misuse, in the order they
    /// were observed.
    #[must_use]
    pub fn errors(&self) -> &[Record] {
        self.registry.records()
    }

    /// Records of allocations that have not been freed.
    pub fn leaks(&self) -> impl Iterator<Item = &Record> {
        self.errors()
            .iter()
            .filter(|record| record.problem().is_leak())
    }

    /// Whether there are no records at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.registry.len() == 0
    }

    /// An owned snapshot of the current records.
    #[must_use]
    pub fn report(&self) -> Report {
        Report::new(self.errors().to_vec())
    }

    /// Discards all records and releases the registry's storage.
    ///
    /// Allocations that were open stay allocated; they are simply no longer tracked.
    pub fn errors_clear(&mut self) {
        self.registry.clear();
    }

    /// How many misuse diagnostics could not be recorded because the registry was full.
    ///
    /// Each of them has been logged at error level instead.
    #[must_use]
    pub fn dropped_diagnostics(&self) -> u64 {
        self.dropped_diagnostics
    }

    fn allocate(
        &mut self,
        site: Site,
        problem: Problem,
        allocate: impl FnOnce(&Bindings) -> *mut c_void,
    ) -> *mut c_void {
        if let Err(e) = self.registry.grow_or_init() {
            warn!("{site}: allocation failed because allocation tracking is exhausted: {e}");
            return ptr::null_mut();
        }

        let result = allocate(&self.bindings);
        trace!("{site}: {problem:?} -> {result:?}");

        self.registry.append(Record::new(site, problem, result));
        result
    }

    /// Removes the record of `ptr`, recording `misuse` if there is none.
    ///
    /// Returns whether a record was removed.
    fn release(&mut self, site: Site, ptr: *mut c_void, misuse: Problem) -> bool {
        if self.registry.remove_by_pointer(ptr) {
            return true;
        }

        match self.registry.grow_or_init() {
            Ok(()) => {
                warn!("{site}: {misuse} ({ptr:?})");
                self.registry
                    .append(Record::new(site, misuse, ptr::null_mut()));
            }
            Err(e) => {
                self.dropped_diagnostics = self.dropped_diagnostics.saturating_add(1);
                error!(
                    "{site}: {misuse} ({ptr:?}) This diagnostic could not be recorded because allocation tracking is exhausted: {e}"
                );
            }
        }

        false
    }
}

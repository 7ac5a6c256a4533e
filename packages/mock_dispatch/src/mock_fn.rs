use std::any::type_name;
use std::cell::Cell;
use std::fmt;
use std::thread::LocalKey;

use crate::ScopedMock;

/// A replaceable function slot.
///
/// A `MockFn` remembers the original implementation of a function and the implementation
/// that calls are currently dispatched to. The two start out identical. Test code may
/// [`replace()`][Self::replace] the current implementation with a test double and later
/// [`reset()`][Self::reset] it back to the original.
///
/// `F` is normally a function pointer type such as `fn(i32, i32) -> i32`.
///
/// The slot uses interior mutability, so it is mutated through a shared reference. It is
/// not thread-safe; the [`mockable!`][crate::mockable] macro stores one slot per thread.
///
/// # Examples
///
/// ```
/// use mock_dispatch::MockFn;
///
/// fn add(a: i32, b: i32) -> i32 {
///     a + b
/// }
///
/// fn mul(a: i32, b: i32) -> i32 {
///     a * b
/// }
///
/// let slot: MockFn<fn(i32, i32) -> i32> = MockFn::new(add);
/// assert_eq!((slot.current())(3, 4), 7);
///
/// slot.replace(mul);
/// assert_eq!((slot.current())(3, 4), 12);
///
/// slot.reset();
/// assert_eq!((slot.current())(3, 4), 7);
/// ```
pub struct MockFn<F>
where
    F: Copy + 'static,
{
    original: F,
    current: Cell<F>,
    replaced: Cell<bool>,
}

impl<F> MockFn<F>
where
    F: Copy + 'static,
{
    /// Creates a slot that dispatches to `original` until replaced.
    // Usually called in const context by macros. Coverage instrumentation
    // cannot detect const context execution.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[must_use]
    pub const fn new(original: F) -> Self {
        Self {
            original,
            current: Cell::new(original),
            replaced: Cell::new(false),
        }
    }

    /// The implementation that calls are currently dispatched to.
    #[must_use]
    #[inline]
    pub fn current(&self) -> F {
        self.current.get()
    }

    /// The original implementation, regardless of any replacement.
    ///
    /// A replacement can use this to delegate to the real behavior.
    #[must_use]
    #[inline]
    pub fn original(&self) -> F {
        self.original
    }

    /// Dispatches all following calls to `replacement`.
    ///
    /// Calls that already obtained the previous implementation are not affected.
    pub fn replace(&self, replacement: F) {
        self.current.set(replacement);
        self.replaced.set(true);
    }

    /// Dispatches all following calls to the original implementation.
    ///
    /// Calling this on a slot that was never replaced does nothing.
    pub fn reset(&self) {
        self.current.set(self.original);
        self.replaced.set(false);
    }

    /// Whether the slot currently holds a replacement.
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        self.replaced.get()
    }

    /// Replaces the implementation in a thread-local slot until the returned guard is dropped.
    ///
    /// Dropping the guard restores whatever the slot held before this call, so scoped
    /// replacements can be nested.
    ///
    /// # Examples
    ///
    /// ```
    /// use mock_dispatch::MockFn;
    ///
    /// fn original() -> u32 {
    ///     1
    /// }
    ///
    /// thread_local! {
    ///     static SLOT: MockFn<fn() -> u32> = const { MockFn::new(original) };
    /// }
    ///
    /// {
    ///     let _guard = MockFn::replace_scoped(&SLOT, || 2);
    ///     assert_eq!(SLOT.with(|slot| (slot.current())()), 2);
    /// }
    ///
    /// assert_eq!(SLOT.with(|slot| (slot.current())()), 1);
    /// ```
    #[must_use = "the replacement is undone as soon as the guard is dropped"]
    pub fn replace_scoped(key: &'static LocalKey<Self>, replacement: F) -> ScopedMock<F> {
        let (previous, previously_replaced) = key.with(|slot| {
            let previous = (slot.current(), slot.is_replaced());
            slot.replace(replacement);
            previous
        });

        ScopedMock::new(key, previous, previously_replaced)
    }

    pub(crate) fn restore(&self, implementation: F, replaced: bool) {
        self.current.set(implementation);
        self.replaced.set(replaced);
    }
}

impl<F> fmt::Debug for MockFn<F>
where
    F: Copy + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockFn")
            .field("signature", &type_name::<F>())
            .field("replaced", &self.replaced.get())
            .finish_non_exhaustive()
    }
}

use std::fmt;
use std::marker::PhantomData;
use std::thread::LocalKey;

use crate::MockFn;

/// Restores a thread-local [`MockFn`] slot to its previous implementation when dropped.
///
/// Returned by [`MockFn::replace_scoped()`] and the [`scoped!`][crate::scoped] macro.
/// The guard is bound to the thread that created it because the slot it restores
/// belongs to that thread.
#[must_use = "the replacement is undone as soon as the guard is dropped"]
pub struct ScopedMock<F>
where
    F: Copy + 'static,
{
    key: &'static LocalKey<MockFn<F>>,
    previous: F,
    previously_replaced: bool,

    _single_threaded: PhantomData<*const ()>,
}

impl<F> ScopedMock<F>
where
    F: Copy + 'static,
{
    pub(crate) fn new(
        key: &'static LocalKey<MockFn<F>>,
        previous: F,
        previously_replaced: bool,
    ) -> Self {
        Self {
            key,
            previous,
            previously_replaced,
            _single_threaded: PhantomData,
        }
    }
}

impl<F> Drop for ScopedMock<F>
where
    F: Copy + 'static,
{
    fn drop(&mut self) {
        // The slot may already be gone if the guard outlives thread-local destruction,
        // in which case there is nothing left to restore.
        _ = self
            .key
            .try_with(|slot| slot.restore(self.previous, self.previously_replaced));
    }
}

impl<F> fmt::Debug for ScopedMock<F>
where
    F: Copy + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedMock")
            .field("previously_replaced", &self.previously_replaced)
            .finish_non_exhaustive()
    }
}

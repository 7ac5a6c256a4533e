use crate::{Bindings, Tracker};

/// Which address a record created by [`Tracker::realloc()`] is keyed by.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum ReallocKey {
    /// Key the record by the pointer passed in.
    ///
    /// A later `free()` of the returned pointer only matches if the allocation did not
    /// move. This matches the C `cmok` behavior.
    #[default]
    Input,

    /// Key the record by the pointer returned by the real allocator.
    ///
    /// If the real allocator fails and returns null, the record is keyed by the pointer
    /// passed in, which is still a live allocation in that case.
    Output,
}

/// Configures and creates a [`Tracker`].
///
/// # Examples
///
/// ```
/// use alloc_audit::{ReallocKey, Tracker};
///
/// let tracker = Tracker::builder()
///     .capacity_limit(1024)
///     .realloc_key(ReallocKey::Output)
///     .build();
///
/// assert!(tracker.is_clean());
/// ```
#[derive(Debug)]
#[must_use]
pub struct TrackerBuilder {
    bindings: Bindings,
    capacity_limit: Option<usize>,
    realloc_key: ReallocKey,
}

impl TrackerBuilder {
    pub(crate) const fn new() -> Self {
        Self {
            bindings: Bindings::system(),
            capacity_limit: None,
            realloc_key: ReallocKey::Input,
        }
    }

    /// Sets the allocator functions that tracked calls are forwarded to.
    ///
    /// Defaults to [`Bindings::system()`].
    pub fn bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Limits how many records the registry may hold.
    ///
    /// The registry grows to 16 records and then doubles. Any growth step that would exceed
    /// `limit` fails as if the registry's own storage could not be allocated, so the usable
    /// capacity is the largest step that fits. With a limit of zero every allocation fails.
    ///
    /// By default there is no limit.
    pub fn capacity_limit(mut self, limit: usize) -> Self {
        self.capacity_limit = Some(limit);
        self
    }

    /// Sets which address reallocation records are keyed by.
    ///
    /// Defaults to [`ReallocKey::Input`].
    pub fn realloc_key(mut self, key: ReallocKey) -> Self {
        self.realloc_key = key;
        self
    }

    /// Creates the tracker.
    #[must_use]
    pub fn build(self) -> Tracker {
        Tracker::from_parts(self.bindings, self.capacity_limit, self.realloc_key)
    }
}

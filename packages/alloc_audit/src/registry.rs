//! The table of open allocations and recorded misuse.

use std::ffi::c_void;

use crate::error::{Error, Result};
use crate::Record;

/// Number of records the registry makes room for when it first grows.
pub(crate) const INITIAL_CAPACITY: usize = 16;

/// Ordered records, matched by pointer.
///
/// Growth is explicit: callers reserve room with [`grow_or_init()`][Self::grow_or_init]
/// before every [`append()`][Self::append]. The capacity starts at [`INITIAL_CAPACITY`] and
/// doubles whenever it is used up. A failed growth leaves the registry untouched.
#[derive(Debug)]
pub(crate) struct Registry {
    records: Vec<Record>,
    capacity_limit: Option<usize>,
}

impl Registry {
    pub(crate) const fn new(capacity_limit: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            capacity_limit,
        }
    }

    /// Ensures there is room for one more record.
    pub(crate) fn grow_or_init(&mut self) -> Result<()> {
        let capacity = self.records.capacity();

        if self.records.len() < capacity {
            return Ok(());
        }

        let additional = if capacity == 0 {
            INITIAL_CAPACITY
        } else {
            capacity
        };

        if let Some(limit) = self.capacity_limit {
            let within_limit = capacity
                .checked_add(additional)
                .is_some_and(|target| target <= limit);

            if !within_limit {
                return Err(Error::CapacityLimitReached { limit });
            }
        }

        self.records.try_reserve_exact(additional)?;
        Ok(())
    }

    /// Appends a record. Room must have been reserved by a successful
    /// [`grow_or_init()`][Self::grow_or_init].
    pub(crate) fn append(&mut self, record: Record) {
        debug_assert!(
            self.records.len() < self.records.capacity(),
            "append() without a successful grow_or_init()"
        );

        self.records.push(record);
    }

    /// Removes the earliest record whose pointer equals `pointer`.
    ///
    /// Returns whether a record was removed. Later records keep their relative order.
    pub(crate) fn remove_by_pointer(&mut self, pointer: *mut c_void) -> bool {
        let Some(index) = self
            .records
            .iter()
            .position(|record| record.pointer() == pointer)
        else {
            return false;
        };

        self.records.remove(index);
        true
    }

    pub(crate) fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// Releases the backing storage and returns to the uninitialized state.
    pub(crate) fn clear(&mut self) {
        self.records = Vec::new();
    }
}

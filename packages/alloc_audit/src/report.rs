//! Snapshots of the allocation registry.

use std::fmt;

use crate::{Problem, Record};

/// An owned snapshot of a [`Tracker`][crate::Tracker]'s records.
///
/// Unlike [`Tracker::errors()`][crate::Tracker::errors], a report stays valid while the
/// tracker keeps changing.
///
/// # Examples
///
/// ```
/// use alloc_audit::{Problem, Site, Tracker};
///
/// let mut tracker = Tracker::new();
/// let block = tracker.malloc(Site::new("cache.c", 3), 16);
///
/// let report = tracker.report();
/// assert_eq!(report.count_of(Problem::MallocWithoutFree), 1);
/// assert_eq!(
///     report.to_string(),
///     "cache.c:3: `malloc()` was called without an associated `free()`.\n"
/// );
/// # // SAFETY: The block came from this tracker and has not been freed.
/// # unsafe { tracker.free(Site::new("cache.c", 4), block) };
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Report {
    records: Vec<Record>,
}

impl Report {
    pub(crate) fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// All records in the order they were observed.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the report has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of allocations that had not been freed.
    pub fn leaks(&self) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(|record| record.problem().is_leak())
    }

    /// Number of records describing `problem`.
    #[must_use]
    pub fn count_of(&self, problem: Problem) -> usize {
        self.records
            .iter()
            .filter(|record| record.problem() == problem)
            .count()
    }

    /// Prints one line per record to stdout.
    ///
    /// Prints nothing if there are no records, not even an empty line.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        if self.is_empty() {
            return;
        }

        print!("{self}");
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{record}")?;
        }

        Ok(())
    }
}

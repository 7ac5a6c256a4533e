use std::ffi::c_void;
use std::fmt;

use thiserror::Error;

use crate::Site;

/// The condition a [`Record`] describes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Problem {
    /// Memory obtained from `malloc()` has not been freed yet.
    MallocWithoutFree,

    /// Memory obtained from `calloc()` has not been freed yet.
    CallocWithoutFree,

    /// Memory obtained from `realloc()` has not been freed yet.
    ReallocWithoutFree,

    /// `free()` was called with a pointer that is not an open allocation.
    InvalidFree,

    /// `realloc()` was called with a non-null pointer that is not an open allocation.
    InvalidRealloc,
}

impl Problem {
    /// A human-readable description of the condition.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::MallocWithoutFree => "`malloc()` was called without an associated `free()`.",
            Self::CallocWithoutFree => "`calloc()` was called without an associated `free()`.",
            Self::ReallocWithoutFree => "`realloc()` was called without an associated `free()`.",
            Self::InvalidFree => "`free()` was called on an invalid pointer.",
            Self::InvalidRealloc => "`realloc()` was called on an invalid pointer.",
        }
    }

    /// Whether this describes an allocation that is still open, as opposed to misuse.
    #[must_use]
    pub fn is_leak(self) -> bool {
        matches!(
            self,
            Self::MallocWithoutFree | Self::CallocWithoutFree | Self::ReallocWithoutFree
        )
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// One entry in the allocation registry.
///
/// Every allocation starts out as a record describing a leak. The record disappears when the
/// allocation is freed or reallocated. Misuse such as an invalid free is recorded too and
/// stays until the registry is cleared.
///
/// Records implement [`std::error::Error`], so a test can propagate one with `?`.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("{site}: {problem}")]
pub struct Record {
    site: Site,
    problem: Problem,
    pointer: *mut c_void,
}

impl Record {
    pub(crate) fn new(site: Site, problem: Problem, pointer: *mut c_void) -> Self {
        Self {
            site,
            problem,
            pointer,
        }
    }

    /// Where the offending call was made.
    #[must_use]
    pub fn site(&self) -> Site {
        self.site
    }

    /// The condition this record describes.
    #[must_use]
    pub fn problem(&self) -> Problem {
        self.problem
    }

    /// A human-readable description of the condition.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.problem.description()
    }

    /// The address this record is matched by.
    ///
    /// For leaks this is the allocation's key address. Misuse records carry a null pointer
    /// so that they are never matched by a later free.
    #[must_use]
    pub fn pointer(&self) -> *mut c_void {
        self.pointer
    }
}

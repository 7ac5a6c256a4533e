#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Record allocate/reallocate/free calls in unit tests to detect leaks and invalid frees.
//!
//! This package is a test utility for code that manages memory through the C allocator
//! (`malloc()`, `calloc()`, `realloc()` and `free()`). Route those calls through a
//! [`Tracker`] and it keeps a registry of everything that has not been freed yet, together
//! with the source location of each call.
//!
//! The core functionality includes:
//! - [`Tracker`] - forwards allocation-family calls to the real allocator and records them
//! - [`Bindings`] - the replaceable allocator functions a tracker forwards to
//! - [`Record`] - one leak or misuse, with the call site that caused it
//! - [`Report`] - an owned snapshot of a tracker's records
//! - [`local`] - a tracker per thread, with call sites captured automatically
//!
//! This package is not meant for use in production, serving only as a development tool.
//!
//! # Simple Usage
//!
//! ```
//! use alloc_audit::{Problem, Site, Tracker};
//!
//! let mut tracker = Tracker::new();
//!
//! let kept = tracker.malloc(Site::new("buffer.c", 12), 128);
//! let released = tracker.calloc(Site::new("buffer.c", 13), 4, 32);
//!
//! // SAFETY: The block came from this tracker and has not been freed.
//! unsafe { tracker.free(Site::new("buffer.c", 20), released) };
//!
//! // Only the allocation that was never freed remains.
//! let leaks: Vec<_> = tracker.leaks().collect();
//! assert_eq!(leaks.len(), 1);
//! assert_eq!(leaks[0].site(), Site::new("buffer.c", 12));
//! assert_eq!(leaks[0].problem(), Problem::MallocWithoutFree);
//!
//! // Reset between test cases.
//! tracker.errors_clear();
//! # // SAFETY: The block came from the C allocator and has not been freed.
//! # unsafe { alloc_audit::system_free(kept) };
//! ```
//!
//! # What is recorded
//!
//! Every allocation is recorded as a leak until it is freed or passed to `realloc()`.
//! Freeing or reallocating a pointer that is not an open allocation is recorded as misuse.
//! Freeing a null pointer is ignored entirely.
//!
//! Misuse is reported, not prevented: an invalid `free()` is still forwarded to the real
//! allocator. An invalid `realloc()` is not forwarded and returns null.
//!
//! # Simulating allocation failure
//!
//! The [`Bindings`] of a tracker are replaceable, so a test can make the real allocator fail
//! and check that the code under test copes. A [capacity limit][TrackerBuilder::capacity_limit]
//! on the registry has the same outward effect: when the tracker cannot record another
//! allocation, the allocation fails with a null return.
//!
//! # Logging
//!
//! The tracker emits diagnostics through the [`log`] facade. Every call is logged at trace
//! level and recorded misuse at warn level. A diagnostic that cannot be recorded because
//! the registry is exhausted is logged at error level. No logger is installed by this package.
//!
//! # Thread safety
//!
//! A [`Tracker`] is single-threaded state and is neither `Send` nor `Sync`.

mod bindings;
mod builder;
mod error;
pub mod local;
mod record;
mod registry;
mod report;
mod site;
mod tracker;

pub use bindings::*;
pub use builder::*;
pub use record::*;
pub use report::*;
pub use site::*;
pub use tracker::*;

//! Integration tests for `alloc_audit` with the real C allocator behind the tracker.
//!
//! Misuse scenarios replace the `free` binding so that no invalid pointer ever reaches
//! the C allocator.

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::ptr;

use alloc_audit::{Problem, Record, Site, Tracker, system_free, system_malloc};

thread_local! {
    static FORWARDED_FREES: Cell<usize> = const { Cell::new(0) };
    static GUARDED_LIVE: RefCell<Vec<*mut c_void>> = const { RefCell::new(Vec::new()) };
}

fn guarded_malloc(size: usize) -> *mut c_void {
    let ptr = system_malloc(size);
    GUARDED_LIVE.with_borrow_mut(|live| live.push(ptr));
    ptr
}

// Counts every free but only forwards pointers that guarded_malloc handed out and that
// are still live.
fn guarded_free(ptr: *mut c_void) {
    FORWARDED_FREES.set(FORWARDED_FREES.get().wrapping_add(1));

    GUARDED_LIVE.with_borrow_mut(|live| {
        if let Some(index) = live.iter().position(|&p| p == ptr) {
            live.swap_remove(index);
            // SAFETY: The pointer came from the C allocator and is freed only once.
            unsafe { system_free(ptr) };
        }
    });
}

fn guarded_tracker() -> Tracker {
    FORWARDED_FREES.set(0);

    let tracker = Tracker::new();
    tracker.bindings().malloc.replace(guarded_malloc);
    tracker.bindings().free.replace(guarded_free);
    tracker
}

fn site(line: u32) -> Site {
    Site::new("scenario.c", line)
}

#[test]
fn matched_pairs_leave_no_records() {
    let mut tracker = Tracker::new();

    let blocks: Vec<_> = (1..=40)
        .map(|i| tracker.malloc(site(i), usize::try_from(i).expect("small value fits")))
        .collect();
    assert_eq!(tracker.errors().len(), 40);

    for block in blocks.into_iter().rev() {
        // SAFETY: Every block came from this tracker and is freed exactly once.
        unsafe { tracker.free(site(100), block) };
    }

    assert!(tracker.is_clean());
    assert!(tracker.report().is_empty());
}

#[test]
fn each_unmatched_allocation_has_exactly_one_record() {
    let mut tracker = Tracker::new();

    let a = tracker.malloc(site(1), 8);
    let b = tracker.calloc(site(2), 2, 8);
    let c = tracker.malloc(site(3), 8);

    // SAFETY: The block came from this tracker and has not been freed.
    unsafe { tracker.free(site(4), b) };

    let summary: Vec<_> = tracker
        .errors()
        .iter()
        .map(|record| (record.site(), record.problem(), record.pointer()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (site(1), Problem::MallocWithoutFree, a),
            (site(3), Problem::MallocWithoutFree, c),
        ]
    );

    // SAFETY: The blocks came from this tracker and have not been freed.
    unsafe {
        tracker.free(site(5), a);
        tracker.free(site(6), c);
    }
    assert!(tracker.is_clean());
}

#[test]
fn allocate_then_free_scenario() {
    let mut tracker = Tracker::new();

    let p1 = tracker.malloc(Site::new("f", 1), 8);
    assert_eq!(tracker.errors().len(), 1);
    assert_eq!(tracker.errors()[0].pointer(), p1);

    // SAFETY: The block came from this tracker and has not been freed.
    unsafe { tracker.free(Site::new("f", 2), p1) };
    assert_eq!(tracker.errors().len(), 0);
}

#[test]
fn double_free_scenario_reports_once_and_forwards_both() {
    let mut tracker = guarded_tracker();

    let p1 = tracker.malloc(Site::new("f", 1), 8);

    // SAFETY: The guarded free binding never frees a pointer twice.
    unsafe {
        tracker.free(Site::new("f", 2), p1);
        tracker.free(Site::new("f", 3), p1);
    }

    let report = tracker.report();
    assert_eq!(report.len(), 1);
    let record: &Record = &report.records()[0];
    assert_eq!(record.problem(), Problem::InvalidFree);
    assert_eq!(record.site(), Site::new("f", 3));
    assert!(record.pointer().is_null());
    assert_eq!(FORWARDED_FREES.get(), 2);
}

#[test]
fn free_of_foreign_pointer_is_reported_and_forwarded() {
    let mut tracker = guarded_tracker();

    // SAFETY: The guarded free binding ignores pointers it did not hand out.
    unsafe { tracker.free(site(9), ptr::without_provenance_mut(0x4000)) };

    assert_eq!(tracker.report().count_of(Problem::InvalidFree), 1);
    assert_eq!(FORWARDED_FREES.get(), 1);
}

#[test]
fn realloc_of_tracked_pointer_replaces_record() {
    let mut tracker = Tracker::new();
    let block = tracker.malloc(site(1), 8);

    // SAFETY: The block came from this tracker and has not been freed.
    let grown = unsafe { tracker.realloc(site(2), block, 4096) };
    assert!(!grown.is_null());

    assert_eq!(tracker.errors().len(), 1);
    let record = tracker.errors()[0];
    assert_eq!(record.problem(), Problem::ReallocWithoutFree);
    assert_eq!(record.site(), site(2));
    assert_eq!(record.pointer(), block);

    tracker.errors_clear();
    // SAFETY: The grown block is live and owned by the C allocator.
    unsafe { system_free(grown) };
}

#[test]
fn errors_clear_then_get_is_empty() {
    let mut tracker = Tracker::new();
    let block = tracker.malloc(site(1), 8);
    // SAFETY: Untracked pointers are never forwarded to the binding.
    unsafe { tracker.realloc(site(2), ptr::without_provenance_mut(0x8), 8) };
    assert_eq!(tracker.errors().len(), 2);

    tracker.errors_clear();

    assert!(tracker.errors().is_empty());
    assert_eq!(tracker.report().len(), 0);

    // SAFETY: The block is live and owned by the C allocator.
    unsafe { system_free(block) };
}

#[test]
fn record_can_be_propagated_as_error() {
    fn check(tracker: &Tracker) -> Result<(), Record> {
        match tracker.errors().first() {
            Some(record) => Err(*record),
            None => Ok(()),
        }
    }

    fn exercise() -> Result<(), Box<dyn std::error::Error>> {
        let mut tracker = Tracker::new();
        let block = tracker.malloc(site(7), 8);
        let outcome = check(&tracker);
        // SAFETY: The block came from this tracker and has not been freed.
        unsafe { tracker.free(site(8), block) };
        outcome?;
        Ok(())
    }

    let error = exercise().expect_err("the open allocation should be reported");
    assert_eq!(
        error.to_string(),
        "scenario.c:7: `malloc()` was called without an associated `free()`."
    );
}

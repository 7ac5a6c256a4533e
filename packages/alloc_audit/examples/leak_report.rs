//! Demonstrates how a test records and reports leaks and invalid frees.
//!
//! The code under test is a tiny string buffer that manages its storage through the C
//! allocator. One buffer is leaked and one is freed twice, then the report is printed.
//!
//! Run with: `RUST_LOG=warn cargo run --example leak_report`

use std::ffi::c_void;

use alloc_audit::{Problem, local};

struct Buffer {
    data: *mut c_void,
    capacity: usize,
}

impl Buffer {
    #[track_caller]
    fn with_capacity(capacity: usize) -> Option<Self> {
        let data = local::malloc(capacity);

        if data.is_null() {
            None
        } else {
            Some(Self { data, capacity })
        }
    }

    #[track_caller]
    fn grow(&mut self) -> bool {
        let new_capacity = self.capacity.saturating_mul(2);

        // SAFETY: The buffer owns a live block from the tracked allocator.
        let data = unsafe { local::realloc(self.data, new_capacity) };
        if data.is_null() {
            return false;
        }

        self.data = data;
        self.capacity = new_capacity;
        true
    }

    #[track_caller]
    fn release(self) {
        // SAFETY: The buffer owns a live block from the tracked allocator.
        unsafe { local::free(self.data) };
    }
}

// Stands in for the C allocator when the example frees a block twice.
fn ignore_free(_ptr: *mut c_void) {}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    println!("=== Allocation Audit Example ===\n");

    let Some(mut kept) = Buffer::with_capacity(16) else {
        println!("The allocator is out of memory.");
        return;
    };
    _ = kept.grow();

    if let Some(released) = Buffer::with_capacity(32) {
        released.release();
    }

    local::with_tracker(|tracker| tracker.bindings().free.replace(ignore_free));
    if let Some(twice) = Buffer::with_capacity(8) {
        let data = twice.data;
        twice.release();
        // SAFETY: The free binding has been replaced and ignores its argument.
        unsafe { local::free(data) };
    }
    local::with_tracker(|tracker| tracker.bindings().reset());

    let report = local::errors_get();
    println!("{} problems recorded:", report.len());
    report.print_to_stdout();

    println!();
    println!(
        "{} leaks, {} invalid frees",
        report.leaks().count(),
        report.count_of(Problem::InvalidFree)
    );

    local::errors_clear();
}

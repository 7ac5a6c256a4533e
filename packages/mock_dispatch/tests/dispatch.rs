//! Integration tests for functions defined through `mockable!`.

#![cfg(feature = "enabled")]

use std::cell::Cell;
use std::thread;

use mock_dispatch::MockFn;

mock_dispatch::mockable! {
    /// Adds two numbers.
    fn add(a: i32, b: i32) -> i32 {
        a.wrapping_add(b)
    }

    fn answer() -> u64 {
        42
    }

    fn record_event(id: u32) {
        LAST_EVENT.set(Some(id));
    }

    fn factorial(n: u64) -> u64 {
        if n <= 1 {
            1
        } else {
            n.wrapping_mul(factorial(n.wrapping_sub(1)))
        }
    }

    fn sum_of_nine(
        a: u8,
        b: u8,
        c: u8,
        d: u8,
        e: u8,
        f: u8,
        g: u8,
        h: u8,
        i: u8,
    ) -> u32 {
        [a, b, c, d, e, f, g, h, i].iter().map(|&x| u32::from(x)).sum()
    }
}

mod text {
    mock_dispatch::mockable! {
        pub(crate) fn shout(input: &'static str) -> String {
            input.to_uppercase()
        }
    }
}

thread_local! {
    static LAST_EVENT: Cell<Option<u32>> = const { Cell::new(None) };
}

fn mul(a: i32, b: i32) -> i32 {
    a.wrapping_mul(b)
}

fn ignore_event(_id: u32) {}

#[test]
fn unreplaced_function_runs_original() {
    assert_eq!(add(2, 3), 5);
    assert_eq!(answer(), 42);
}

#[test]
fn replaced_slot_changes_behavior_and_reset_restores_it() {
    mock_dispatch::replace!(add, mul);
    assert_eq!(add(2, 3), 6);
    assert_eq!(add(4, 5), 20);

    mock_dispatch::reset!(add);
    assert_eq!(add(2, 3), 5);
}

#[test]
fn slot_is_directly_accessible() {
    ADD_MOCK.with(|slot| slot.replace(mul));
    assert!(ADD_MOCK.with(MockFn::is_replaced));
    assert_eq!(add(3, 3), 9);

    ADD_MOCK.with(MockFn::reset);
    assert!(!ADD_MOCK.with(MockFn::is_replaced));
    assert_eq!(add(3, 3), 6);
}

#[test]
fn original_bypasses_replacement() {
    mock_dispatch::replace!(add, mul);

    assert_eq!(mock_dispatch::original!(add)(2, 3), 5);
    assert_eq!(add_original(2, 3), 5);

    mock_dispatch::reset!(add);
}

#[test]
fn replacement_can_delegate_to_original() {
    mock_dispatch::replace!(add, |a, b| add_original(a, b).wrapping_mul(10));

    assert_eq!(add(1, 2), 30);

    mock_dispatch::reset!(add);
}

#[test]
fn void_function_can_be_replaced() {
    record_event(1);
    assert_eq!(LAST_EVENT.get(), Some(1));

    mock_dispatch::replace!(record_event, ignore_event);
    record_event(2);
    assert_eq!(LAST_EVENT.get(), Some(1));

    mock_dispatch::reset!(record_event);
    record_event(3);
    assert_eq!(LAST_EVENT.get(), Some(3));
}

#[test]
fn recursion_goes_through_the_slot() {
    assert_eq!(factorial(5), 120);

    // The body calls `factorial` for the inner step, so the replacement is hit there.
    mock_dispatch::replace!(factorial, |_| 1);
    assert_eq!(factorial_original(5), 5);

    mock_dispatch::reset!(factorial);
}

#[test]
fn nine_parameters_are_supported() {
    assert_eq!(sum_of_nine(1, 2, 3, 4, 5, 6, 7, 8, 9), 45);

    mock_dispatch::replace!(sum_of_nine, |a, _, _, _, _, _, _, _, i| {
        u32::from(a) * u32::from(i)
    });
    assert_eq!(sum_of_nine(1, 2, 3, 4, 5, 6, 7, 8, 9), 9);

    mock_dispatch::reset!(sum_of_nine);
}

#[test]
fn function_in_module_is_addressed_by_path() {
    assert_eq!(text::shout("hi"), "HI");

    mock_dispatch::replace!(text::shout, |input| input.to_owned());
    assert_eq!(text::shout("hi"), "hi");
    assert!(mock_dispatch::slot!(text::shout).with(MockFn::is_replaced));
    assert_eq!(mock_dispatch::original!(text::shout)("hi"), "HI");

    mock_dispatch::reset!(text::shout);
    assert_eq!(text::shout("hi"), "HI");
}

#[test]
fn scoped_replacement_resets_on_drop() {
    {
        let _guard = mock_dispatch::scoped!(answer, || 7);
        assert_eq!(answer(), 7);
    }

    assert_eq!(answer(), 42);
}

#[test]
fn reset_without_replace_is_harmless() {
    mock_dispatch::reset!(answer);
    mock_dispatch::reset!(answer);

    assert_eq!(answer(), 42);
}

#[test]
fn replacement_does_not_leak_to_other_threads() {
    mock_dispatch::replace!(add, mul);

    let from_other_thread = thread::spawn(|| add(2, 3))
        .join()
        .expect("thread should complete successfully");

    assert_eq!(from_other_thread, 5);
    assert_eq!(add(2, 3), 6);

    mock_dispatch::reset!(add);
}

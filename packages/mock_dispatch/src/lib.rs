#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Make ordinary functions replaceable by test doubles without touching their call sites.
//!
//! Wrap function definitions in [`mockable!`] and every call to them is dispatched through a
//! thread-local slot. Tests can point the slot at a different implementation and later reset
//! it to the original:
//!
#![cfg_attr(feature = "enabled", doc = "```")]
#![cfg_attr(not(feature = "enabled"), doc = "```ignore")]
//! mock_dispatch::mockable! {
//!     pub fn add(a: i32, b: i32) -> i32 {
//!         a + b
//!     }
//! }
//!
//! fn mul(a: i32, b: i32) -> i32 {
//!     a * b
//! }
//!
//! mock_dispatch::replace!(add, mul);
//! assert_eq!(add(2, 3), 6);
//!
//! mock_dispatch::reset!(add);
//! assert_eq!(add(2, 3), 5);
//! ```
//!
//! The slots are thread-local, so tests running in parallel on different threads never see
//! each other's replacements.
//!
//! # Compiling mocks out
//!
//! The indirection is controlled by the `enabled` feature, which is on by default. Disable
//! default features to emit every `mockable!` function as a plain function with no slot and
//! no overhead. Only [`mockable!`] and [`original!`] exist in that mode; code that calls the
//! functions compiles unchanged.
//!
//! ```
//! mock_dispatch::mockable! {
//!     pub fn square(x: u64) -> u64 {
//!         x * x
//!     }
//! }
//!
//! // Both forms work with and without the `enabled` feature.
//! assert_eq!(square(4), 16);
//! assert_eq!(mock_dispatch::original!(square)(5), 25);
//! ```
//!
//! # Using slots directly
//!
//! [`MockFn`] is the slot type behind the macros. It is usable on its own wherever a
//! replaceable function pointer is needed, for example as a field in a struct.

mod macros;
mod mock_fn;
mod scoped;

pub use mock_fn::*;
pub use scoped::*;

#[doc(hidden)]
pub mod __private;

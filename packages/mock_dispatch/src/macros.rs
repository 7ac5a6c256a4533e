/// Defines functions whose calls can be redirected to test doubles.
///
/// For every function `name` in the macro body, three items are emitted next to each other:
///
/// * `name` itself, with the same signature and visibility. Calling it forwards the call to
///   whatever the slot currently holds.
/// * `NAME_MOCK`, a thread-local [`MockFn`][crate::MockFn] slot holding a function pointer
///   with the same signature. Each thread starts out pointing at the original.
/// * `name_original`, the body you wrote. Call it (or use [`original!`][crate::original])
///   from a replacement that wants to delegate to the real behavior.
///
/// Calls to `name` from inside its own body go through the slot like any other call. Use
/// [`original!`][crate::original] to recurse into the real implementation instead.
///
/// Parameters must be plain identifiers and the function must not be generic, `unsafe`,
/// `async` or `const`. Any number of parameters is supported, with or without a return type.
///
/// Without the `enabled` feature the macro emits only the plain function and no slot.
/// Call sites are the same in both modes.
///
/// # Examples
///
/// ```
/// mock_dispatch::mockable! {
///     /// Adds two numbers.
///     pub fn add(a: i32, b: i32) -> i32 {
///         a + b
///     }
/// }
///
/// fn mul(a: i32, b: i32) -> i32 {
///     a * b
/// }
///
/// assert_eq!(add(3, 4), 7);
///
/// mock_dispatch::replace!(add, mul);
/// assert_eq!(add(3, 4), 12);
///
/// mock_dispatch::reset!(add);
/// assert_eq!(add(3, 4), 7);
/// ```
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! mockable {
    () => {};

    (
        $(#[$attr:meta])*
        $vis:vis fn $name:ident ( $($arg:ident : $arg_ty:ty),* $(,)? ) $(-> $ret:ty)? $body:block
        $($rest:tt)*
    ) => {
        $crate::__private::paste! {
            $(#[$attr])*
            $vis fn $name($($arg: $arg_ty),*) $(-> $ret)? {
                let implementation = [< $name:upper _MOCK >].with($crate::MockFn::current);
                implementation($($arg),*)
            }

            #[doc = "The original implementation of [`" $name "`]."]
            $vis fn [< $name _original >]($($arg: $arg_ty),*) $(-> $ret)? $body

            ::std::thread_local! {
                #[doc = "The replaceable implementation slot of [`" $name "`]."]
                $vis static [< $name:upper _MOCK >]: $crate::MockFn<fn($($arg_ty),*) $(-> $ret)?> =
                    const { $crate::MockFn::new([< $name _original >] as fn($($arg_ty),*) $(-> $ret)?) };
            }
        }

        $crate::mockable!($($rest)*);
    };
}

/// Defines functions whose calls can be redirected to test doubles.
///
/// The `enabled` feature is off, so this emits the functions unchanged.
#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! mockable {
    () => {};

    (
        $(#[$attr:meta])*
        $vis:vis fn $name:ident ( $($arg:ident : $arg_ty:ty),* $(,)? ) $(-> $ret:ty)? $body:block
        $($rest:tt)*
    ) => {
        $(#[$attr])*
        $vis fn $name($($arg: $arg_ty),*) $(-> $ret)? $body

        $crate::mockable!($($rest)*);
    };
}

/// Expands to the thread-local slot of a [`mockable!`][crate::mockable] function.
///
/// Accepts the function name, optionally qualified with a module path.
///
/// # Examples
///
/// ```
/// mod math {
///     mock_dispatch::mockable! {
///         pub fn double(x: u32) -> u32 {
///             x * 2
///         }
///     }
/// }
///
/// assert!(!mock_dispatch::slot!(math::double).with(mock_dispatch::MockFn::is_replaced));
/// ```
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! slot {
    (@munch [$($prefix:tt)*] $name:ident) => {
        $crate::__private::paste! { $($prefix)* [< $name:upper _MOCK >] }
    };

    (@munch [$($prefix:tt)*] $segment:ident :: $($rest:tt)+) => {
        $crate::slot!(@munch [$($prefix)* $segment ::] $($rest)+)
    };

    ($($path:tt)+) => {
        $crate::slot!(@munch [] $($path)+)
    };
}

/// Redirects all following calls of a [`mockable!`][crate::mockable] function on the
/// current thread to a replacement.
///
/// The replacement is any function or capture-free closure with the same signature.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! replace {
    ($($path:ident)::+, $replacement:expr $(,)?) => {
        $crate::slot!($($path)::+).with(|slot| slot.replace($replacement))
    };
}

/// Restores the original implementation of a [`mockable!`][crate::mockable] function on
/// the current thread.
///
/// Resetting a function that was never replaced does nothing.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! reset {
    ($($path:ident)::+ $(,)?) => {
        $crate::slot!($($path)::+).with($crate::MockFn::reset)
    };
}

/// Redirects calls of a [`mockable!`][crate::mockable] function on the current thread to a
/// replacement until the returned [`ScopedMock`][crate::ScopedMock] guard is dropped.
///
/// # Examples
///
/// ```
/// mock_dispatch::mockable! {
///     fn answer() -> u32 {
///         42
///     }
/// }
///
/// {
///     let _guard = mock_dispatch::scoped!(answer, || 7);
///     assert_eq!(answer(), 7);
/// }
///
/// assert_eq!(answer(), 42);
/// ```
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! scoped {
    ($($path:ident)::+, $replacement:expr $(,)?) => {
        $crate::MockFn::replace_scoped(&$crate::slot!($($path)::+), $replacement)
    };
}

/// Expands to the original implementation of a [`mockable!`][crate::mockable] function,
/// bypassing any replacement.
///
/// This is typically used for recursion from inside a function body or to delegate from
/// a replacement to the real behavior.
#[cfg(feature = "enabled")]
#[macro_export]
macro_rules! original {
    (@munch [$($prefix:tt)*] $name:ident) => {
        $crate::__private::paste! { $($prefix)* [< $name _original >] }
    };

    (@munch [$($prefix:tt)*] $segment:ident :: $($rest:tt)+) => {
        $crate::original!(@munch [$($prefix)* $segment ::] $($rest)+)
    };

    ($($path:tt)+) => {
        $crate::original!(@munch [] $($path)+)
    };
}

/// Expands to the original implementation of a [`mockable!`][crate::mockable] function.
///
/// The `enabled` feature is off, so this is the function itself.
#[cfg(not(feature = "enabled"))]
#[macro_export]
macro_rules! original {
    ($($path:ident)::+) => {
        $($path)::+
    };
}

use std::fmt;
use std::panic::Location;

/// The source location of an allocation-family call.
///
/// The file name is borrowed for the lifetime of the program, as produced by
/// [`file!()`] or [`Location::caller()`].
///
/// # Examples
///
/// ```
/// use alloc_audit::Site;
///
/// let site = Site::new("parser.c", 120);
/// assert_eq!(site.to_string(), "parser.c:120");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Site {
    file: &'static str,
    line: u32,
}

impl Site {
    /// Creates a site from an explicit file name and line number.
    #[must_use]
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Captures the location of the code that called the current function.
    ///
    /// This is meant to be called from a `#[track_caller]` function, in which case the
    /// location is that of the call to that function.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();

        Self {
            file: location.file(),
            line: location.line(),
        }
    }

    /// The source file name.
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// The line number in the source file.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Expands to the [`Site`] of the macro invocation.
///
/// # Examples
///
/// ```
/// let site = alloc_audit::site!();
/// assert!(site.file().ends_with(".rs"));
/// ```
#[macro_export]
macro_rules! site {
    () => {
        $crate::Site::new(::std::file!(), ::std::line!())
    };
}

//! Formatting constructors

/// Create a new [`Error`](crate::Error) from a format string
#[macro_export]
macro_rules! newf {
    ($($arg:tt)*) => {
        $crate::Error::new(::std::format!($($arg)*))
    };
}

/// Wrap an [`Error`](crate::Error) with a formatted message
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $($arg:tt)*) => {
        $crate::Error::wrap($err, ::std::format!($($arg)*))
    };
}

/// Create a designated source from a format string
#[macro_export]
macro_rules! new_as_sourcef {
    ($($arg:tt)*) => {
        $crate::Error::new_as_source(::std::format!($($arg)*))
    };
}

/// Wrap an [`Error`](crate::Error), designating a source built from a format
/// string
#[macro_export]
macro_rules! wrap_by_source_msgf {
    ($err:expr, $($arg:tt)*) => {
        $crate::Error::wrap_by_source_msg($err, ::std::format!($($arg)*))
    };
}

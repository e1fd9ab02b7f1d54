//! Wrapping helpers for `Result`

use crate::Error;

/// Wrap the error of a `Result`, leaving `Ok` values untouched.
///
/// This is the `?`-friendly way to add a layer: nothing is built unless the
/// operation actually failed.
///
/// # Example
///
/// ```rust
/// use errchain::ResultExt;
///
/// fn read_config() -> errchain::Result<String> {
///     std::fs::read_to_string("/definitely/missing.toml").wrap_err("reading config")
/// }
///
/// let err = read_config().unwrap_err();
/// assert_eq!(err.to_string(), "reading config");
/// assert!(err.source_of().downcast_ref::<std::io::Error>().is_some());
/// ```
pub trait ResultExt<T> {
    /// Wrap the error with `message`
    fn wrap_err(self, message: impl Into<String>) -> Result<T, Error>;

    /// Wrap the error with a lazily built message
    fn wrap_err_with<M, F>(self, f: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M;

    /// Wrap the error, designating a new error with `message` as its source
    fn wrap_by_source_msg(self, message: impl Into<String>) -> Result<T, Error>;

    /// Wrap the error, designating `source` as its source
    fn wrap_by_source_error<S>(self, source: S) -> Result<T, Error>
    where
        S: std::error::Error + Send + Sync + 'static;

    /// Promote the error to a designated source as-is
    fn as_source(self) -> Result<T, Error>;
}

// Each method matches instead of using `map_err`: the closure frame would
// otherwise be captured as the caller.
impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn wrap_err(self, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::foreign(err).wrap(message)),
        }
    }

    fn wrap_err_with<M, F>(self, f: F) -> Result<T, Error>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let message = f();
                Err(Error::foreign(err).wrap(message))
            }
        }
    }

    fn wrap_by_source_msg(self, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::foreign(err).wrap_by_source_msg(message)),
        }
    }

    fn wrap_by_source_error<S>(self, source: S) -> Result<T, Error>
    where
        S: std::error::Error + Send + Sync + 'static,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::foreign(err).wrap_by_source_error(source)),
        }
    }

    fn as_source(self) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Error::foreign(err).as_source()),
        }
    }
}

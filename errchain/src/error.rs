//! The errchain value type and the basic wrapped node

use crate::caller::CallerInfo;
use crate::collection::Collection;
use crate::config::CaptureConfig;
use crate::source::Sourced;
use crate::ErrorKind;
use std::fmt;

/// An error value built by errchain, or a foreign error it holds.
///
/// Values form an owned tree: a node owns its inner cause, a source node also
/// owns its designated source, and a collection owns its elements. Wrapping
/// only ever adds an outer layer, so cycles cannot be built.
///
/// # Example
///
/// ```rust
/// use errchain::Error;
///
/// let err = Error::new("connection reset").wrap("fetching profile");
///
/// assert_eq!(err.to_string(), "fetching profile");
/// assert_eq!(err.inner().unwrap().to_string(), "connection reset");
/// assert_eq!(err.source_of().to_string(), "connection reset");
/// ```
pub enum Error {
    /// A message, an optional cause and a captured call site
    Node(Wrapped),
    /// A node with an explicitly designated source
    Source(Sourced),
    /// Independent failures that happened together
    Collection(Collection),
    /// An error produced outside errchain
    Foreign(anyhow::Error),
}

/// A message wrapping an optional inner error, with the call site that
/// created it.
#[derive(Debug)]
pub struct Wrapped {
    message: String,
    inner: Option<Box<Error>>,
    callers: CallerInfo,
}

impl Wrapped {
    pub(crate) fn capture(inner: Option<Error>, message: String, config: &CaptureConfig) -> Self {
        Self {
            message,
            inner: inner.map(Box::new),
            callers: CallerInfo::capture(0, config.max_stack),
        }
    }

    /// The message given at construction
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped cause (if any)
    pub fn inner(&self) -> Option<&Error> {
        self.inner.as_deref()
    }

    /// Where this node was created
    pub fn callers(&self) -> &CallerInfo {
        &self.callers
    }

    pub(crate) fn set_depth(&mut self, n: usize) {
        if let Some(inner) = self.inner.as_deref_mut() {
            inner.set_depth(n);
        }
        self.callers.set_output_depth(n);
    }
}

impl Error {
    /// Create a new error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Error::Node(Wrapped::capture(None, message.into(), &CaptureConfig::global()))
    }

    /// Create a new error, capturing the call site with `config`
    pub fn new_with(config: &CaptureConfig, message: impl Into<String>) -> Self {
        Error::Node(Wrapped::capture(None, message.into(), config))
    }

    /// Wrap this error in a new node carrying `message`
    pub fn wrap(self, message: impl Into<String>) -> Self {
        Error::Node(Wrapped::capture(Some(self), message.into(), &CaptureConfig::global()))
    }

    /// Wrap this error, capturing the call site with `config`
    pub fn wrap_with(self, config: &CaptureConfig, message: impl Into<String>) -> Self {
        Error::Node(Wrapped::capture(Some(self), message.into(), config))
    }

    /// Hold an external error as a foreign leaf.
    ///
    /// An errchain [`Error`] passed through here comes back unchanged.
    pub fn foreign<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::from(anyhow::Error::new(err))
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Node(_) => ErrorKind::Node,
            Error::Source(_) => ErrorKind::Source,
            Error::Collection(_) => ErrorKind::Collection,
            Error::Foreign(_) => ErrorKind::Foreign,
        }
    }

    /// The next error inward along the causal chain
    pub fn inner(&self) -> Option<&Error> {
        match self {
            Error::Node(node) => node.inner(),
            Error::Source(source) => source.node().inner(),
            Error::Collection(_) | Error::Foreign(_) => None,
        }
    }

    /// Where this error was created, for nodes and source nodes
    pub fn callers(&self) -> Option<&CallerInfo> {
        match self {
            Error::Node(node) => Some(node.callers()),
            Error::Source(source) => Some(source.node().callers()),
            Error::Collection(_) | Error::Foreign(_) => None,
        }
    }

    /// Check if this value designates its own source
    pub fn is_source(&self) -> bool {
        matches!(self, Error::Source(_))
    }

    /// Get the collection if this value is one
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Error::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Downcast a foreign leaf to its original type
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        match self {
            Error::Foreign(err) => err.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Iterate the causal chain, starting with this error
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    // =========================================================================
    // Depth
    // =========================================================================

    /// Limit the frames serialized for this error and everything it wraps.
    ///
    /// The value is clamped per node to the number of frames it captured.
    pub fn set_depth(&mut self, n: usize) {
        match self {
            Error::Node(node) => node.set_depth(n),
            Error::Source(source) => source.set_depth(n),
            Error::Collection(collection) => collection.set_depth(n),
            Error::Foreign(_) => {}
        }
    }
}

/// Wrap `err` with `message`, propagating absence.
///
/// `wrap(None, m)` is `None`, so callers can wrap whatever an operation
/// returned without checking it first.
pub fn wrap(err: Option<Error>, message: impl Into<String>) -> Option<Error> {
    // A closure passed to `Option::map` would be captured as frame 0.
    match err {
        Some(err) => Some(err.wrap(message)),
        None => None,
    }
}

/// Iterator over a causal chain, outermost first
pub struct Chain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.inner();
        Some(current)
    }
}

// =============================================================================
// Display - the message callers see
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Node(node) => f.write_str(node.message()),
            Error::Source(source) => fmt::Display::fmt(source.source(), f),
            Error::Collection(collection) => fmt::Display::fmt(collection, f),
            Error::Foreign(err) => fmt::Display::fmt(err, f),
        }
    }
}

// =============================================================================
// Debug - one line per node, indented by nesting level
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::trace::string_with_inner(self))
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Foreign(err) => err.source(),
            _ => self
                .inner()
                .map(|inner| inner as &(dyn std::error::Error + 'static)),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(err) => err,
            Err(err) => Error::Foreign(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::foreign(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_creation() {
        let err = Error::new("test message");
        assert_eq!(err.to_string(), "test message");
        assert_eq!(err.kind(), ErrorKind::Node);
        assert!(err.inner().is_none());
    }

    #[test]
    fn test_wrap() {
        let inner = crate::newf!("{}", "inner");
        let outer = crate::wrapf!(inner, "{}", "outer");

        assert_eq!(outer.to_string(), "outer");
        assert_eq!(outer.inner().unwrap().to_string(), "inner");
        assert_eq!(outer.source().unwrap().to_string(), "inner");
    }

    #[test]
    fn test_wrap_none() {
        assert!(wrap(None, "nothing happened").is_none());

        let err = wrap(Some(Error::new("root")), "context").unwrap();
        assert_eq!(err.to_string(), "context");
    }

    #[test]
    fn test_callers_point_at_constructor_call() {
        let (err, line) = (Error::new("here"), line!());
        let callers = err.callers().unwrap();
        let first = &callers.frames()[0];
        assert!(first.function.ends_with("test_callers_point_at_constructor_call"));
        assert!(first.file.ends_with("error.rs"));
        assert_eq!(first.line, line);

        let (wrapped, line) = (wrap(Some(err), "again"), line!());
        let wrapped = wrapped.unwrap();
        let first = &wrapped.callers().unwrap().frames()[0];
        assert!(first.function.ends_with("test_callers_point_at_constructor_call"));
        assert_eq!(first.line, line);
    }

    #[test]
    fn test_new_with_config() {
        let err = Error::new_with(&CaptureConfig::new(0), "bare");
        assert!(err.callers().unwrap().is_empty());

        let err = err.wrap_with(&CaptureConfig::new(1), "one frame");
        assert_eq!(err.callers().unwrap().len(), 1);
    }

    #[test]
    fn test_set_depth_reaches_inner_nodes() {
        let mut err = Error::new("a").wrap("b").wrap("c");
        err.set_depth(0);
        for node in err.chain() {
            assert_eq!(node.callers().unwrap().output_count(), 0);
        }

        err.set_depth(usize::MAX);
        for node in err.chain() {
            let callers = node.callers().unwrap();
            assert_eq!(callers.output_count(), callers.len());
        }
    }

    #[test]
    fn test_chain() {
        let err = Error::new("a").wrap("b").wrap("c");
        let messages: Vec<String> = err.chain().map(|e| e.to_string()).collect();
        assert_eq!(messages, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_foreign() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.json not found");
        let err = Error::from(io_err);

        assert_eq!(err.kind(), ErrorKind::Foreign);
        assert_eq!(err.to_string(), "config.json not found");
        assert_eq!(
            err.downcast_ref::<std::io::Error>().unwrap().kind(),
            std::io::ErrorKind::NotFound
        );
        assert!(err.callers().is_none());
    }

    #[test]
    fn test_foreign_recovers_errchain_values() {
        let err = Error::foreign(Error::new("ours"));
        assert_eq!(err.kind(), ErrorKind::Node);

        let err = Error::from(anyhow::Error::new(Error::new("ours")));
        assert_eq!(err.kind(), ErrorKind::Node);
    }
}

//! Designated sources
//!
//! A source node separates "what this error wraps" from "what callers should
//! act on". The wrapped inner error stays in the causal chain for tracing,
//! while `source` is handed out by [`Error::source_of`].

use crate::config::CaptureConfig;
use crate::error::Wrapped;
use crate::Error;

/// A node whose designated source is set explicitly.
///
/// Its own message is always empty; it reports the message of its source.
#[derive(Debug)]
pub struct Sourced {
    node: Wrapped,
    source: Box<Error>,
}

impl Sourced {
    pub(crate) fn capture(inner: Option<Error>, source: Error, config: &CaptureConfig) -> Self {
        Self {
            node: Wrapped::capture(inner, String::new(), config),
            source: Box::new(source),
        }
    }

    /// The underlying node holding the inner error and call site
    pub fn node(&self) -> &Wrapped {
        &self.node
    }

    /// The designated source
    pub fn source(&self) -> &Error {
        &self.source
    }

    pub(crate) fn set_depth(&mut self, n: usize) {
        self.node.set_depth(n);
    }
}

impl Error {
    /// Create an error that is its own designated source
    pub fn new_as_source(message: impl Into<String>) -> Self {
        let source = Error::new(message);
        Error::Source(Sourced::capture(None, source, &CaptureConfig::global()))
    }

    /// Promote this error to a designated source as-is
    pub fn as_source(self) -> Self {
        Error::Source(Sourced::capture(None, self, &CaptureConfig::global()))
    }

    /// Wrap this error, designating `source` as the cause to act on.
    ///
    /// `source` may be any error type; it can be recovered from
    /// [`Error::source_of`] with [`Error::downcast_ref`].
    pub fn wrap_by_source_error<E>(self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let source = Error::foreign(source);
        Error::Source(Sourced::capture(Some(self), source, &CaptureConfig::global()))
    }

    /// Wrap this error, designating a new error with `message` as the source
    pub fn wrap_by_source_msg(self, message: impl Into<String>) -> Self {
        let source = Error::new(message);
        Error::Source(Sourced::capture(Some(self), source, &CaptureConfig::global()))
    }

    // =========================================================================
    // Source resolution
    // =========================================================================

    /// The nearest explicitly designated source, walking inward.
    ///
    /// The first source node met along the inner chain wins; deeper
    /// designations are shadowed. Collections answer with their first element
    /// that has one.
    pub fn explicit_source(&self) -> Option<&Error> {
        match self {
            Error::Source(sourced) => Some(sourced.source()),
            Error::Node(node) => node.inner().and_then(Error::explicit_source),
            Error::Collection(collection) => collection.explicit_source(),
            Error::Foreign(_) => None,
        }
    }

    /// The error programmatic handling should act on.
    ///
    /// An explicit designation wins. Without one, this is the innermost error
    /// of the chain, or for a collection the source of its first element.
    pub fn source_of(&self) -> &Error {
        match self.explicit_source() {
            Some(source) => source,
            None => self.chain_source(),
        }
    }

    /// Source resolution once no explicit designation exists below `self`
    fn chain_source(&self) -> &Error {
        match self {
            Error::Source(sourced) => sourced.source(),
            Error::Node(node) => match node.inner() {
                Some(inner) => inner.chain_source(),
                None => self,
            },
            Error::Collection(collection) => collection.source().unwrap_or(self),
            Error::Foreign(_) => self,
        }
    }
}

/// The designated source of `err`, see [`Error::source_of`]
pub fn source_of(err: &Error) -> &Error {
    err.source_of()
}

/// The explicit source of `err`, see [`Error::explicit_source`]
pub fn explicit_source_of(err: &Error) -> Option<&Error> {
    err.explicit_source()
}

/// Promote any error to a designated source
pub fn as_source<E>(err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::foreign(err).as_source()
}

/// Create a designated source from a message
pub fn new_as_source(message: impl Into<String>) -> Error {
    Error::new_as_source(message)
}

/// Wrap `inner` with an explicit `source`, propagating absence
pub fn wrap_by_source_error<E>(inner: Option<Error>, source: E) -> Option<Error>
where
    E: std::error::Error + Send + Sync + 'static,
{
    match inner {
        Some(inner) => Some(inner.wrap_by_source_error(source)),
        None => None,
    }
}

/// Wrap `inner` with a source built from `message`, propagating absence
pub fn wrap_by_source_msg(inner: Option<Error>, message: impl Into<String>) -> Option<Error> {
    match inner {
        Some(inner) => Some(inner.wrap_by_source_msg(message)),
        None => None,
    }
}

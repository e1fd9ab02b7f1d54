//! Variant kinds for errchain values

use std::fmt;

/// The shape of an [`Error`](crate::Error) value.
///
/// Matching on the kind is cheaper than matching on the value itself when
/// only the shape matters, e.g. when deciding how to render a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A message with an optional wrapped cause and a captured call site
    Node,

    /// A node whose designated source is set explicitly
    Source,

    /// Several independent failures that happened together
    Collection,

    /// An error produced outside errchain, exposing only its message
    Foreign,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Node => "Node",
            ErrorKind::Source => "Source",
            ErrorKind::Collection => "Collection",
            ErrorKind::Foreign => "Foreign",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Node.to_string(), "Node");
        assert_eq!(ErrorKind::Collection.to_string(), "Collection");
    }
}

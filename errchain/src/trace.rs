//! JSON traces and human readable renderings
//!
//! Every value projects onto a fixed JSON shape:
//!
//! - node: `{"inner": .., "callers": [..], "message": ".."}`
//! - source node: the same plus `"isSource": true`, with the source's message
//! - collection: `{"errors": [..]}`
//! - foreign leaf: `{"message": ".."}`
//! - missing inner error: `null`
//!
//! The trace functions take the frame depth as a parameter and leave the
//! error untouched. Serializing an [`Error`] directly with serde uses the
//! depth stored by [`Error::set_depth`].

use crate::caller::Frame;
use crate::collection::envelope;
use crate::Error;
use serde::{Serialize, Serializer};
use thiserror::Error as ThisError;

const INDENT: &str = "    ";

/// Errors raised while producing a trace
#[derive(Debug, ThisError)]
pub enum TraceError {
    /// The JSON projection could not be encoded
    #[error("failed to encode error trace: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(untagged)]
enum Projection<'a> {
    Node {
        inner: Option<Box<Projection<'a>>>,
        callers: &'a [Frame],
        message: &'a str,
    },
    Source {
        inner: Option<Box<Projection<'a>>>,
        callers: &'a [Frame],
        message: String,
        #[serde(rename = "isSource")]
        is_source: bool,
    },
    Collection {
        errors: Vec<Projection<'a>>,
    },
    Leaf {
        message: String,
    },
}

fn project(err: &Error, depth: Option<usize>) -> Projection<'_> {
    match err {
        Error::Node(node) => Projection::Node {
            inner: project_inner(node.inner(), depth),
            callers: node.callers().emitted(depth),
            message: node.message(),
        },
        Error::Source(sourced) => Projection::Source {
            inner: project_inner(sourced.node().inner(), depth),
            callers: sourced.node().callers().emitted(depth),
            message: sourced.source().to_string(),
            is_source: true,
        },
        Error::Collection(collection) => Projection::Collection {
            errors: collection.iter().map(|err| project(err, depth)).collect(),
        },
        Error::Foreign(foreign) => Projection::Leaf {
            message: foreign.to_string(),
        },
    }
}

fn project_inner(inner: Option<&Error>, depth: Option<usize>) -> Option<Box<Projection<'_>>> {
    inner.map(|inner| Box::new(project(inner, depth)))
}

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        project(self, None).serialize(serializer)
    }
}

// =============================================================================
// JSON traces
// =============================================================================

/// JSON trace showing where each node was created (one frame per node)
pub fn trace(err: &Error) -> Result<String, TraceError> {
    trace_with_stack(err, 1)
}

/// JSON trace with every captured frame of every node
pub fn trace_all(err: &Error) -> Result<String, TraceError> {
    trace_with_stack(err, usize::MAX)
}

/// JSON trace emitting at most `depth` frames per node.
///
/// Depth 0 shows no frames; a depth at or above the capture limit shows
/// everything that was captured.
pub fn trace_with_stack(err: &Error, depth: usize) -> Result<String, TraceError> {
    Ok(serde_json::to_string(&project(err, Some(depth)))?)
}

/// Like [`trace_with_stack`], but `None` produces an empty string
pub fn json_with_stack(err: Option<&Error>, depth: usize) -> Result<String, TraceError> {
    match err {
        Some(err) => trace_with_stack(err, depth),
        None => Ok(String::new()),
    }
}

/// The projection as a JSON value
pub fn trace_value(err: &Error, depth: usize) -> Result<serde_json::Value, TraceError> {
    Ok(serde_json::to_value(project(err, Some(depth)))?)
}

// =============================================================================
// Human readable renderings
// =============================================================================

/// `<file>:<line>:<function>\t<message>` for nodes; collections render each
/// element this way inside the collection envelope.
pub fn string_with_location(err: &Error) -> String {
    match err {
        Error::Node(_) | Error::Source(_) => {
            let head = err
                .callers()
                .map(|callers| callers.head_summary())
                .unwrap_or_default();
            format!("{}\t{}", head, err)
        }
        Error::Collection(collection) => envelope(collection.iter().map(string_with_location)),
        Error::Foreign(_) => err.to_string(),
    }
}

/// One line per node of the causal chain, indented one level per `inner`.
///
/// Collection elements are rendered one level below an `Errors:` line.
pub fn string_with_inner(err: &Error) -> String {
    let mut lines = Vec::new();
    push_indented(&mut lines, err, 0);
    lines.join("\n")
}

fn push_indented(lines: &mut Vec<String>, err: &Error, level: usize) {
    let indent = INDENT.repeat(level);
    match err {
        Error::Collection(collection) => {
            lines.push(format!("{}Errors:", indent));
            for element in collection {
                push_indented(lines, element, level + 1);
            }
        }
        _ => {
            lines.push(format!("{}{}", indent, string_with_location(err)));
            if let Some(inner) = err.inner() {
                push_indented(lines, inner, level + 1);
            }
        }
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Log `err` as a single `tracing` error event with its full trace.
pub fn report(err: &Error) {
    let source = err.source_of();
    match trace_all(err) {
        Ok(trace) => tracing::error!(source = %source, trace = %trace, "{}", err),
        Err(encode) => {
            tracing::error!(source = %source, error = %encode, "{}", err)
        }
    }
}

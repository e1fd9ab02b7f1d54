//! # errchain
//!
//! Error chains that remember where they were built and which error callers
//! should act on.
//!
//! ## Design Philosophy
//!
//! - **Causal chain**: every [`Error::wrap`] adds an outer node holding a
//!   message, the wrapped error and the call site
//! - **Designated source**: [`Error::wrap_by_source_msg`] and friends mark the
//!   error that programmatic handling should see, independent of how deep the
//!   chain goes
//! - **Collections**: [`Error::merge`] combines independent failures into one
//!   flat, ordered list
//! - **Traces**: [`trace_with_stack`] renders any value as JSON with a bounded
//!   number of frames per node
//!
//! ## Usage
//!
//! ```rust
//! use errchain::{trace, Error};
//!
//! fn lookup(user: &str) -> Result<u32, Error> {
//!     let parsed = user.parse::<u32>();
//!     match parsed {
//!         Ok(id) => Ok(id),
//!         Err(err) => Err(Error::foreign(err).wrap_by_source_msg("user id must be integer")),
//!     }
//! }
//!
//! let err = lookup("abc").unwrap_err().wrap("login failed");
//!
//! assert_eq!(err.to_string(), "login failed");
//! assert_eq!(err.source_of().to_string(), "user id must be integer");
//! assert!(trace(&err).unwrap().contains(r#""isSource":true"#));
//! ```
//!
//! ## Principles
//!
//! - Absence propagates: the `Option` based [`wrap`] and [`merge`] never build
//!   a wrapper around nothing, and [`ResultExt`] leaves `Ok` untouched
//! - The nearest explicit source wins; without one the innermost error is the
//!   source
//! - Foreign errors keep their type and can be recovered with
//!   [`Error::downcast_ref`]

#[macro_use]
mod macros;

mod caller;
mod collection;
mod config;
mod error;
mod ext;
mod kind;
mod source;
mod trace;

pub use caller::{CallerInfo, Frame};
pub use collection::{merge, Collection, COLLECTION_SEPARATOR};
pub use config::{CaptureConfig, ConfigError, DEFAULT_MAX_STACK, MAX_STACK_ENV};
pub use error::{wrap, Chain, Error, Wrapped};
pub use ext::ResultExt;
pub use kind::ErrorKind;
pub use source::{
    as_source, explicit_source_of, new_as_source, source_of, wrap_by_source_error,
    wrap_by_source_msg, Sourced,
};
pub use trace::{
    json_with_stack, report, string_with_inner, string_with_location, trace, trace_all,
    trace_value, trace_with_stack, TraceError,
};

/// Result type alias using errchain Error
pub type Result<T> = std::result::Result<T, Error>;

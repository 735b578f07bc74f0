//! duckscan - CSV analysis toolkit built on the DuckDB embedded engine
//!
//! This library is a thin facade over the engine's SQL interface:
//! - Actions and parameter validation (count, sample, import, stats,
//!   schema, compression, group, query)
//! - Safe statement construction from untrusted paths and identifiers
//! - Scoped engine sessions with deterministic connection release
//! - Result normalization (scalar counts, tabular results)
//!
//! All query planning, CSV parsing, compression and execution belong to
//! the engine; nothing here reimplements them.

pub mod action;
pub mod error;
pub mod output;
pub mod session;

pub use action::{Action, Request, DEFAULT_SAMPLE_LIMIT};
pub use error::{Error, ErrorKind, Result};
pub use output::{Outcome, Scalar, Table};
pub use session::Session;

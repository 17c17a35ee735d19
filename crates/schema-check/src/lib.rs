//! Compare two Postgres schemas and report every structural difference.
//!
//! This crate provides:
//! - [`compare`]: the comparison engine, a pure function over two [`Schema`]s
//! - [`acquire`]: reading a [`Schema`] out of a live database
//!
//! # Example
//!
//! ```ignore
//! use schema_check::{AcquireConfig, SchemaCompare, acquire};
//!
//! let source = acquire(&AcquireConfig::new("postgres://localhost/prod")).await?;
//! let target = acquire(&AcquireConfig::new("postgres://localhost/staging")).await?;
//!
//! for difference in source.compare(&target) {
//!     println!("{}", difference);
//! }
//! ```

mod diff;
mod error;
pub mod introspect;
mod traced;

pub use diff::{DiffKind, Difference, SchemaCompare, Summary, compare};
pub use error::{Error, FetchStage};
pub use introspect::{AcquireConfig, acquire, fetch_schema, mask_password};
pub use traced::{Connection, ConnectionExt, TracedConn};

pub use schema_check_model::{Column, ForeignKey, Index, Schema, Table};

/// Result type for schema-check operations.
pub type Result<T> = std::result::Result<T, Error>;

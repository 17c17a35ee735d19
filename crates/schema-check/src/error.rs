use std::fmt;

use thiserror::Error;

/// Errors raised while reading a schema out of a live database.
///
/// Comparing schemas never fails; only acquisition does.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid connection string {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("error setting up TLS: {source}")]
    Tls {
        #[source]
        source: native_tls::Error,
    },

    #[error("error connecting to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("error opening read-only snapshot: {source}")]
    Snapshot {
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("error listing tables in schema {schema}: {source}")]
    ListTables {
        schema: String,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("error fetching {stage} for table {table}: {source}")]
    FetchTable {
        table: String,
        stage: FetchStage,
        #[source]
        source: tokio_postgres::Error,
    },
}

/// The per-table query that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Columns,
    PrimaryKey,
    Indexes,
    ForeignKeys,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Columns => write!(f, "columns"),
            FetchStage::PrimaryKey => write!(f, "primary key"),
            FetchStage::Indexes => write!(f, "indexes"),
            FetchStage::ForeignKeys => write!(f, "foreign keys"),
        }
    }
}

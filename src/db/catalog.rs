//! The catalog reads the setup pipeline depends on.

use async_trait::async_trait;
use thiserror::Error;

use crate::db::{EnumRow, ForeignKeyRow, RawColumn, UniqueRow};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to connect to database: {0}")]
    Connection(#[source] BoxError),

    #[error("unsupported database driver `{0}`, only `postgres` is available")]
    UnsupportedDriver(String),

    #[error("catalog query for {query} failed: {source}")]
    Query {
        query: &'static str,
        #[source]
        source: BoxError,
    },
}

impl CatalogError {
    pub fn query(query: &'static str, source: impl Into<BoxError>) -> Self {
        CatalogError::Query {
            query,
            source: source.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Read-only access to a database catalog.
///
/// Every method issues one catalog query. Ordering matters for
/// `list_tables` and `list_columns`; the lookup queries are unordered.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Base tables of the current schema, ordered by name.
    async fn list_tables(&self) -> CatalogResult<Vec<String>>;

    /// Columns of `table` in ordinal order.
    async fn list_columns(&self, table: &str) -> CatalogResult<Vec<RawColumn>>;

    /// Names of columns taking part in a primary key.
    async fn primary_keys(&self) -> CatalogResult<Vec<String>>;

    /// Foreign key columns with their target table and referential rules.
    async fn foreign_keys(&self) -> CatalogResult<Vec<ForeignKeyRow>>;

    /// Enum-typed columns with their type name and comma-joined labels.
    async fn enums(&self) -> CatalogResult<Vec<EnumRow>>;

    /// Columns covered by a unique, non-primary index.
    async fn uniques(&self) -> CatalogResult<Vec<UniqueRow>>;
}

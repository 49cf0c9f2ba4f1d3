//! Persistence for extracted schema metadata.

mod json;

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ColumnMetaData, DatabaseInfo, Table};

pub use json::JsonStorage;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("there is no database metadata stored in repository")]
    NotFound,

    #[error("table `{0}` is not stored in repository")]
    TableNotFound(String),

    #[error("column `{0}` is not stored in repository")]
    ColumnNotFound(String),

    #[error("repository already holds metadata for database `{stored}`, cannot add `{requested}`")]
    DatabaseMismatch { stored: String, requested: String },

    #[error("failed to access repository file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("repository file {path} is not valid metadata: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Store for one database's schema metadata.
pub trait Repository {
    /// Whether metadata for `database_name` has already been recorded.
    fn is_database_meta_data_added(&self, database_name: &str) -> RepositoryResult<bool> {
        match self.get_database_info() {
            Ok(info) => Ok(info.name == database_name),
            Err(RepositoryError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn add_database_info(&mut self, info: DatabaseInfo) -> RepositoryResult<()>;

    /// Insert `table` unless a table with the same name exists. An existing
    /// record keeps its id and description.
    fn add_table(&mut self, table: Table) -> RepositoryResult<()>;

    /// Insert or replace the column `(table_name, column.name)`. The table
    /// must already be stored.
    fn add_column_meta_data(&mut self, table_name: &str, column: ColumnMetaData) -> RepositoryResult<()>;

    fn remove_everything(&mut self) -> RepositoryResult<()>;

    /// Tables in the order they were first added.
    fn get_tables(&self) -> RepositoryResult<Vec<Table>>;

    fn get_columns(&self, table_name: &str) -> RepositoryResult<Vec<ColumnMetaData>>;

    fn get_database_info(&self) -> RepositoryResult<DatabaseInfo>;

    fn update_table_description(&mut self, table_id: Uuid, description: &str) -> RepositoryResult<()>;

    fn update_column_description(&mut self, column_id: Uuid, description: &str) -> RepositoryResult<()>;
}

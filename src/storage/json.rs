use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::{ColumnMetaData, DatabaseInfo, Table};
use crate::storage::{Repository, RepositoryError, RepositoryResult};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    database: Option<DatabaseInfo>,
    #[serde(default)]
    tables: Vec<Table>,
    #[serde(default)]
    columns: Vec<ColumnMetaData>,
}

/// Repository kept as a single JSON document on disk.
///
/// The whole document is loaded on open and rewritten after each change.
pub struct JsonStorage {
    path: PathBuf,
    document: Document,
}

impl JsonStorage {
    pub fn open(path: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let path = path.into();
        let document = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| RepositoryError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| RepositoryError::Json {
                path: path.clone(),
                source,
            })?
        } else {
            Document::default()
        };

        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> RepositoryResult<()> {
        let io_error = |source| RepositoryError::Io {
            path: self.path.clone(),
            source,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = serde_json::to_string_pretty(&self.document).map_err(|source| {
            RepositoryError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, content).map_err(io_error)
    }

    fn has_table(&self, name: &str) -> bool {
        self.document.tables.iter().any(|t| t.name == name)
    }
}

impl Repository for JsonStorage {
    fn add_database_info(&mut self, info: DatabaseInfo) -> RepositoryResult<()> {
        if let Some(stored) = &self.document.database {
            if stored.name != info.name {
                return Err(RepositoryError::DatabaseMismatch {
                    stored: stored.name.clone(),
                    requested: info.name,
                });
            }
        }
        self.document.database = Some(info);
        self.save()
    }

    fn add_table(&mut self, table: Table) -> RepositoryResult<()> {
        if self.has_table(&table.name) {
            return Ok(());
        }
        self.document.tables.push(table);
        self.save()
    }

    fn add_column_meta_data(&mut self, table_name: &str, mut column: ColumnMetaData) -> RepositoryResult<()> {
        if !self.has_table(table_name) {
            return Err(RepositoryError::TableNotFound(table_name.to_string()));
        }
        column.table_name = table_name.to_string();

        let existing = self
            .document
            .columns
            .iter_mut()
            .find(|c| c.table_name == table_name && c.name == column.name);
        match existing {
            Some(stored) => {
                column.id = stored.id;
                *stored = column;
            }
            None => self.document.columns.push(column),
        }
        self.save()
    }

    fn remove_everything(&mut self) -> RepositoryResult<()> {
        self.document = Document::default();
        self.save()
    }

    fn get_tables(&self) -> RepositoryResult<Vec<Table>> {
        Ok(self.document.tables.clone())
    }

    fn get_columns(&self, table_name: &str) -> RepositoryResult<Vec<ColumnMetaData>> {
        if !self.has_table(table_name) {
            return Err(RepositoryError::TableNotFound(table_name.to_string()));
        }
        Ok(self
            .document
            .columns
            .iter()
            .filter(|c| c.table_name == table_name)
            .cloned()
            .collect())
    }

    fn get_database_info(&self) -> RepositoryResult<DatabaseInfo> {
        self.document.database.clone().ok_or(RepositoryError::NotFound)
    }

    fn update_table_description(&mut self, table_id: Uuid, description: &str) -> RepositoryResult<()> {
        let table = self
            .document
            .tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .ok_or_else(|| RepositoryError::TableNotFound(table_id.to_string()))?;
        table.description = description.to_string();
        self.save()
    }

    fn update_column_description(&mut self, column_id: Uuid, description: &str) -> RepositoryResult<()> {
        let column = self
            .document
            .columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| RepositoryError::ColumnNotFound(column_id.to_string()))?;
        column.description = description.to_string();
        self.save()
    }
}

//! Operator-supplied descriptions for stored tables and columns.

use thiserror::Error;

use crate::storage::{Repository, RepositoryError};

#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("malformed description `{0}`, expected {1}")]
    Malformed(String, &'static str),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Table { table: String, text: String },
    Column { table: String, column: String, text: String },
}

impl Description {
    /// Parse `table=text`.
    pub fn parse_table(arg: &str) -> Result<Self, DescribeError> {
        const FORMAT: &str = "TABLE=TEXT";
        let (table, text) = arg
            .split_once('=')
            .filter(|(table, _)| !table.is_empty())
            .ok_or_else(|| DescribeError::Malformed(arg.to_string(), FORMAT))?;
        Ok(Description::Table {
            table: table.to_string(),
            text: text.to_string(),
        })
    }

    /// Parse `table.column=text`.
    pub fn parse_column(arg: &str) -> Result<Self, DescribeError> {
        const FORMAT: &str = "TABLE.COLUMN=TEXT";
        let malformed = || DescribeError::Malformed(arg.to_string(), FORMAT);
        let (target, text) = arg.split_once('=').ok_or_else(malformed)?;
        let (table, column) = target
            .split_once('.')
            .filter(|(table, column)| !table.is_empty() && !column.is_empty())
            .ok_or_else(malformed)?;
        Ok(Description::Column {
            table: table.to_string(),
            column: column.to_string(),
            text: text.to_string(),
        })
    }

    /// Resolve the target by name and store the text.
    pub fn apply<R: Repository>(&self, repository: &mut R) -> Result<(), DescribeError> {
        match self {
            Description::Table { table, text } => {
                let stored = repository
                    .get_tables()?
                    .into_iter()
                    .find(|t| &t.name == table)
                    .ok_or_else(|| RepositoryError::TableNotFound(table.clone()))?;
                repository.update_table_description(stored.id, text)?;
            }
            Description::Column { table, column, text } => {
                let stored = repository
                    .get_columns(table)?
                    .into_iter()
                    .find(|c| &c.name == column)
                    .ok_or_else(|| RepositoryError::ColumnNotFound(format!("{}.{}", table, column)))?;
                repository.update_column_description(stored.id, text)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnMetaData, Table};
    use crate::storage::JsonStorage;
    use tempfile::TempDir;

    #[test]
    fn test_parse_table_description() {
        assert_eq!(
            Description::parse_table("orders=Customer orders, one per checkout").unwrap(),
            Description::Table {
                table: "orders".to_string(),
                text: "Customer orders, one per checkout".to_string(),
            }
        );
        assert!(Description::parse_table("orders").is_err());
        assert!(Description::parse_table("=text").is_err());
    }

    #[test]
    fn test_parse_column_description() {
        assert_eq!(
            Description::parse_column("orders.status=a=b").unwrap(),
            Description::Column {
                table: "orders".to_string(),
                column: "status".to_string(),
                text: "a=b".to_string(),
            },
            "Only the first '=' separates the text"
        );
        assert!(Description::parse_column("orders=text").is_err());
        assert!(Description::parse_column("orders.=text").is_err());
    }

    #[test]
    fn test_apply_descriptions_by_name() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonStorage::open(dir.path().join("metadata.json")).unwrap();
        storage.add_table(Table::new("orders")).unwrap();
        storage
            .add_column_meta_data(
                "orders",
                ColumnMetaData {
                    name: "status".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();

        Description::parse_table("orders=Checkouts").unwrap().apply(&mut storage).unwrap();
        Description::parse_column("orders.status=Lifecycle state")
            .unwrap()
            .apply(&mut storage)
            .unwrap();

        assert_eq!(storage.get_tables().unwrap()[0].description, "Checkouts");
        assert_eq!(storage.get_columns("orders").unwrap()[0].description, "Lifecycle state");

        let err = Description::parse_table("missing=x").unwrap().apply(&mut storage).unwrap_err();
        assert!(matches!(err, DescribeError::Repository(RepositoryError::TableNotFound(_))));
    }
}

//! Name-indexed views over the constraint catalog queries.
//!
//! Each lookup is built once per setup run from the rows its catalog query
//! returns. When the catalog yields the same key twice, the later row wins.

use std::collections::{HashMap, HashSet};

use crate::db::{EnumRow, ForeignKeyRow, UniqueRow};

/// Column names that take part in a primary key.
///
/// Not qualified by table: a column named like a primary key column in any
/// table of the schema is reported as a primary key.
#[derive(Debug, Clone, Default)]
pub struct PrimaryKeys {
    columns: HashSet<String>,
}

impl PrimaryKeys {
    pub fn from_rows(rows: Vec<String>) -> Self {
        Self {
            columns: rows.into_iter().collect(),
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    pub fn count(&self) -> usize {
        self.columns.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub target_table: String,
    pub delete_rule: String,
    pub update_rule: String,
}

#[derive(Debug, Clone, Default)]
pub struct ForeignKeys {
    by_column: HashMap<String, ForeignKey>,
}

impl ForeignKeys {
    pub fn from_rows(rows: Vec<ForeignKeyRow>) -> Self {
        let by_column = rows
            .into_iter()
            .map(|row| {
                (
                    row.column,
                    ForeignKey {
                        target_table: row.target_table,
                        delete_rule: row.delete_rule,
                        update_rule: row.update_rule,
                    },
                )
            })
            .collect();
        Self { by_column }
    }

    pub fn get(&self, column: &str) -> Option<&ForeignKey> {
        self.by_column.get(column)
    }

    pub fn count(&self) -> usize {
        self.by_column.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub enum_name: String,
    pub enum_value: String,
}

impl EnumType {
    /// Labels split on `,` exactly as stored; whitespace is not trimmed.
    pub fn values(&self) -> Vec<String> {
        self.enum_value.split(',').map(str::to_string).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Enums {
    by_column: HashMap<String, EnumType>,
}

impl Enums {
    pub fn from_rows(rows: Vec<EnumRow>) -> Self {
        let by_column = rows
            .into_iter()
            .map(|row| {
                (
                    row.column,
                    EnumType {
                        enum_name: row.enum_name,
                        enum_value: row.enum_value,
                    },
                )
            })
            .collect();
        Self { by_column }
    }

    pub fn get(&self, column: &str) -> Option<&EnumType> {
        self.by_column.get(column)
    }

    pub fn count(&self) -> usize {
        self.by_column.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueIndex {
    pub definition: String,
}

/// Unique-index columns, keyed by `(column, table)`.
#[derive(Debug, Clone, Default)]
pub struct Uniques {
    by_column: HashMap<(String, String), UniqueIndex>,
}

impl Uniques {
    pub fn from_rows(rows: Vec<UniqueRow>) -> Self {
        let by_column = rows
            .into_iter()
            .map(|row| {
                (
                    (row.column, row.table),
                    UniqueIndex {
                        definition: row.definition,
                    },
                )
            })
            .collect();
        Self { by_column }
    }

    pub fn get(&self, column: &str, table: &str) -> Option<&UniqueIndex> {
        self.by_column.get(&(column.to_string(), table.to_string()))
    }

    pub fn count(&self) -> usize {
        self.by_column.len()
    }
}

/// The four constraint lookups of one run.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    pub primary_keys: PrimaryKeys,
    pub foreign_keys: ForeignKeys,
    pub enums: Enums,
    pub uniques: Uniques,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_values_split_literally() {
        let enum_type = EnumType {
            enum_name: "mood".to_string(),
            enum_value: "sad, ok,happy".to_string(),
        };
        assert_eq!(enum_type.values(), vec!["sad", " ok", "happy"], "Whitespace should be preserved");
    }

    #[test]
    fn test_foreign_key_get_returns_none_when_absent() {
        let foreign_keys = ForeignKeys::from_rows(vec![ForeignKeyRow {
            column: "user_id".to_string(),
            target_table: "users".to_string(),
            delete_rule: "CASCADE".to_string(),
            update_rule: "NO ACTION".to_string(),
        }]);

        assert!(foreign_keys.get("user_id").is_some());
        assert_eq!(foreign_keys.get("user_id").unwrap().target_table, "users");
        assert!(foreign_keys.get("order_id").is_none());
    }

    #[test]
    fn test_later_row_wins_on_duplicate_column() {
        let foreign_keys = ForeignKeys::from_rows(vec![
            ForeignKeyRow {
                column: "owner_id".to_string(),
                target_table: "users".to_string(),
                delete_rule: "CASCADE".to_string(),
                update_rule: "NO ACTION".to_string(),
            },
            ForeignKeyRow {
                column: "owner_id".to_string(),
                target_table: "teams".to_string(),
                delete_rule: "SET NULL".to_string(),
                update_rule: "NO ACTION".to_string(),
            },
        ]);

        assert_eq!(foreign_keys.count(), 1);
        assert_eq!(foreign_keys.get("owner_id").unwrap().target_table, "teams");
    }

    #[test]
    fn test_uniques_are_table_qualified() {
        let uniques = Uniques::from_rows(vec![UniqueRow {
            column: "id".to_string(),
            table: "accounts".to_string(),
            definition: "CREATE UNIQUE INDEX accounts_id_key ON public.accounts USING btree (id)".to_string(),
        }]);

        assert!(uniques.get("id", "accounts").is_some());
        assert!(uniques.get("id", "sessions").is_none(), "Same column in another table is not unique");
    }

    #[test]
    fn test_primary_keys_match_by_column_name() {
        let primary_keys = PrimaryKeys::from_rows(vec!["id".to_string(), "id".to_string(), "code".to_string()]);
        assert_eq!(primary_keys.count(), 2);
        assert!(primary_keys.contains("code"));
        assert!(!primary_keys.contains("name"));
    }
}

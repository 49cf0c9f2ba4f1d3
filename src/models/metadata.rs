use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the database a repository describes.
///
/// The password is stored as given. Treat repository files as secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub name: String,
    pub user: String,
    pub host: String,
    pub port: u16,
    pub password: String,
    pub driver: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
        }
    }
}

/// Everything known about one column of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetaData {
    pub id: Uuid,
    pub name: String,
    pub table_name: String,
    pub db_type: String,
    pub nullable: bool,
    pub scan_type: String,
    pub length: i64,
    #[serde(default)]
    pub description: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    #[serde(default)]
    pub target_table_fk: String,
    #[serde(default)]
    pub delete_rule: String,
    #[serde(default)]
    pub update_rule: String,
    pub has_enum: bool,
    #[serde(default)]
    pub enum_name: String,
    #[serde(default)]
    pub enum_values: Vec<String>,
    pub is_unique: bool,
    #[serde(default)]
    pub unique_index_definition: String,
}

#[cfg(test)]
impl ColumnMetaData {
    /// True when both records describe the same facts, ignoring the id.
    pub fn same_facts(&self, other: &ColumnMetaData) -> bool {
        ColumnMetaData { id: other.id, ..self.clone() } == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_json_uses_snake_case_fields() {
        let column = ColumnMetaData {
            name: "status".to_string(),
            table_name: "orders".to_string(),
            db_type: "ORDER_STATUS".to_string(),
            scan_type: "String".to_string(),
            has_enum: true,
            enum_name: "order_status".to_string(),
            enum_values: vec!["new".to_string(), "paid".to_string()],
            ..Default::default()
        };

        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["table_name"], "orders");
        assert_eq!(json["db_type"], "ORDER_STATUS");
        assert_eq!(json["has_enum"], true);
        assert_eq!(json["enum_values"][1], "paid");
    }

    #[test]
    fn test_table_defaults_to_empty_description() {
        let table: Table = serde_json::from_str(
            r#"{"id":"6f1c2f5e-8a47-4e53-9d4e-0d8a4f8f7e11","name":"users"}"#,
        )
        .unwrap();
        assert_eq!(table.name, "users");
        assert_eq!(table.description, "", "Description should default to empty");
    }

    #[test]
    fn test_same_facts_ignores_id() {
        let a = ColumnMetaData {
            id: Uuid::new_v4(),
            name: "id".to_string(),
            ..Default::default()
        };
        let mut b = a.clone();
        b.id = Uuid::new_v4();
        assert!(a.same_facts(&b));

        b.is_unique = true;
        assert!(!a.same_facts(&b), "A differing flag should not compare equal");
    }
}

use uuid::Uuid;

use crate::db::{ColumnDescriptor, Lookups};
use crate::models::ColumnMetaData;

/// Build the stored record for one column of `table`.
///
/// Primary keys, foreign keys and enums match on the column name alone;
/// uniqueness also matches the table.
pub fn merge_column(table: &str, base: ColumnDescriptor, lookups: &Lookups) -> ColumnMetaData {
    let mut column = ColumnMetaData {
        id: Uuid::new_v4(),
        name: base.name,
        table_name: table.to_string(),
        db_type: base.db_type,
        nullable: base.nullable,
        scan_type: base.scan_type,
        length: base.length,
        ..Default::default()
    };

    if lookups.primary_keys.contains(&column.name) {
        column.is_primary_key = true;
    }

    if let Some(fk) = lookups.foreign_keys.get(&column.name) {
        column.is_foreign_key = true;
        column.target_table_fk = fk.target_table.clone();
        column.delete_rule = fk.delete_rule.clone();
        column.update_rule = fk.update_rule.clone();
    }

    if let Some(enum_type) = lookups.enums.get(&column.name) {
        column.has_enum = true;
        column.enum_name = enum_type.enum_name.clone();
        column.enum_values = enum_type.values();
    }

    if let Some(unique) = lookups.uniques.get(&column.name, table) {
        column.is_unique = true;
        column.unique_index_definition = unique.definition.clone();
    }

    column
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{EnumRow, Enums, ForeignKeyRow, ForeignKeys, PrimaryKeys, UniqueRow, Uniques};

    fn descriptor(name: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            db_type: "INT4".to_string(),
            nullable: false,
            scan_type: "i32".to_string(),
            length: 0,
        }
    }

    fn lookups_for(column: &str, table: &str) -> Lookups {
        Lookups {
            primary_keys: PrimaryKeys::from_rows(vec![column.to_string()]),
            foreign_keys: ForeignKeys::from_rows(vec![ForeignKeyRow {
                column: column.to_string(),
                target_table: "parents".to_string(),
                delete_rule: "CASCADE".to_string(),
                update_rule: "RESTRICT".to_string(),
            }]),
            enums: Enums::from_rows(vec![EnumRow {
                column: column.to_string(),
                enum_name: "kind".to_string(),
                enum_value: "a,b,c".to_string(),
            }]),
            uniques: Uniques::from_rows(vec![UniqueRow {
                column: column.to_string(),
                table: table.to_string(),
                definition: "CREATE UNIQUE INDEX t_code_key ON public.t USING btree (code)".to_string(),
            }]),
        }
    }

    #[test]
    fn test_column_in_every_lookup_gets_every_attribute() {
        let column = merge_column("t", descriptor("code"), &lookups_for("code", "t"));

        assert_eq!(column.table_name, "t");
        assert!(column.is_primary_key);
        assert!(column.is_foreign_key);
        assert_eq!(column.target_table_fk, "parents");
        assert_eq!(column.delete_rule, "CASCADE");
        assert_eq!(column.update_rule, "RESTRICT");
        assert!(column.has_enum);
        assert_eq!(column.enum_name, "kind");
        assert_eq!(column.enum_values, vec!["a", "b", "c"]);
        assert!(column.is_unique);
        assert_eq!(
            column.unique_index_definition,
            "CREATE UNIQUE INDEX t_code_key ON public.t USING btree (code)"
        );
    }

    #[test]
    fn test_column_in_no_lookup_keeps_base_attributes() {
        let column = merge_column("t", descriptor("other"), &lookups_for("code", "t"));

        assert_eq!(column.name, "other");
        assert_eq!(column.db_type, "INT4");
        assert_eq!(column.scan_type, "i32");
        assert!(!column.is_primary_key);
        assert!(!column.is_foreign_key);
        assert!(!column.has_enum);
        assert!(column.enum_values.is_empty());
        assert!(!column.is_unique);
        assert_eq!(column.unique_index_definition, "");
    }

    #[test]
    fn test_uniqueness_requires_matching_table() {
        let lookups = lookups_for("code", "a");

        let in_a = merge_column("a", descriptor("code"), &lookups);
        let in_b = merge_column("b", descriptor("code"), &lookups);

        assert!(in_a.is_unique);
        assert!(!in_b.is_unique, "Unique index on another table should not apply");
        assert!(in_b.is_primary_key, "Primary keys match by column name only");
    }
}

/// A column as the catalog reports it. Nullability and length are `None`
/// when the catalog cannot tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    pub name: String,
    pub udt_name: String,
    pub nullable: Option<bool>,
    pub length: Option<i64>,
}

/// Base attributes of a column, with unknowns resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub db_type: String,
    pub nullable: bool,
    pub scan_type: String,
    pub length: i64,
}

impl From<RawColumn> for ColumnDescriptor {
    fn from(raw: RawColumn) -> Self {
        ColumnDescriptor {
            db_type: raw.udt_name.to_uppercase(),
            scan_type: scan_type_for(&raw.udt_name),
            nullable: raw.nullable.unwrap_or(false),
            length: raw.length.unwrap_or(0),
            name: raw.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRow {
    pub column: String,
    pub target_table: String,
    pub delete_rule: String,
    pub update_rule: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRow {
    pub column: String,
    pub enum_name: String,
    /// Labels joined with `,` in declaration order.
    pub enum_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueRow {
    pub column: String,
    pub table: String,
    pub definition: String,
}

/// Rust type a value of the given PostgreSQL type is read into.
pub fn scan_type_for(udt_name: &str) -> String {
    // Array types carry a leading underscore in udt_name
    if let Some(element) = udt_name.strip_prefix('_') {
        return format!("Vec<{}>", scan_type_for(element));
    }

    let scan_type = match udt_name {
        "bool" => "bool",
        "int2" => "i16",
        "int4" => "i32",
        "int8" => "i64",
        "float4" => "f32",
        "float8" => "f64",
        "oid" => "u32",
        "uuid" => "uuid::Uuid",
        "timestamp" => "chrono::NaiveDateTime",
        "timestamptz" => "chrono::DateTime<chrono::Utc>",
        "date" => "chrono::NaiveDate",
        "time" => "chrono::NaiveTime",
        "json" | "jsonb" => "serde_json::Value",
        "bytea" => "Vec<u8>",
        // text-like, numeric, enums and anything unrecognised
        _ => "String",
    };
    scan_type.to_string()
}

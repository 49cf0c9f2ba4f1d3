use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};

use crate::config::DatabaseConnection;
use crate::db::{Catalog, CatalogError, CatalogResult, EnumRow, ForeignKeyRow, RawColumn, UniqueRow};

const TABLES_QUERY: &str = "SELECT table_name::text
     FROM information_schema.tables
     WHERE table_schema = current_schema()
       AND table_type = 'BASE TABLE'
     ORDER BY table_name";

const COLUMNS_QUERY: &str = "SELECT
        c.column_name::text,
        c.udt_name::text,
        c.is_nullable::text,
        c.character_maximum_length::int8
     FROM information_schema.columns c
     WHERE c.table_schema = current_schema() AND c.table_name = $1
     ORDER BY c.ordinal_position";

const PRIMARY_KEYS_QUERY: &str = "SELECT kcu.column_name::text
     FROM information_schema.table_constraints tc
     JOIN information_schema.key_column_usage kcu
         ON tc.constraint_name = kcu.constraint_name
         AND tc.table_schema = kcu.table_schema
     WHERE tc.constraint_type = 'PRIMARY KEY'
         AND tc.table_schema = current_schema()";

const FOREIGN_KEYS_QUERY: &str = "SELECT
        kcu.column_name::text,
        ccu.table_name::text,
        rc.delete_rule::text,
        rc.update_rule::text
     FROM information_schema.referential_constraints rc
     JOIN information_schema.key_column_usage kcu
         ON rc.constraint_name = kcu.constraint_name
         AND rc.constraint_schema = kcu.constraint_schema
     JOIN information_schema.constraint_column_usage ccu
         ON rc.unique_constraint_name = ccu.constraint_name
         AND rc.unique_constraint_schema = ccu.constraint_schema
     WHERE kcu.table_schema = current_schema()";

const ENUMS_QUERY: &str = "SELECT
        c.column_name::text,
        t.typname::text,
        string_agg(e.enumlabel::text, ',' ORDER BY e.enumsortorder)
     FROM information_schema.columns c
     JOIN pg_type t ON t.typname = c.udt_name
     JOIN pg_namespace n ON n.oid = t.typnamespace AND n.nspname = c.udt_schema
     JOIN pg_enum e ON e.enumtypid = t.oid
     WHERE c.table_schema = current_schema()
     GROUP BY c.column_name, t.typname";

const UNIQUES_QUERY: &str = "SELECT
        a.attname::text,
        t.relname::text,
        pg_get_indexdef(i.indexrelid)
     FROM pg_index i
     JOIN pg_class t ON t.oid = i.indrelid
     JOIN pg_namespace n ON n.oid = t.relnamespace
     JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(i.indkey)
     WHERE i.indisunique
         AND NOT i.indisprimary
         AND n.nspname = current_schema()
     ORDER BY t.relname, a.attname";

pub struct Database {
    client: Client,
}

fn column<T>(row: &Row, idx: usize, query: &'static str) -> CatalogResult<T>
where
    T: for<'a> tokio_postgres::types::FromSql<'a>,
{
    row.try_get(idx).map_err(|e| CatalogError::query(query, e))
}

/// `SET` cannot take parameters; `search_path` is validated by the config.
fn search_path_statement(search_path: &str) -> String {
    format!("SET search_path={}", search_path)
}

/// `YES`/`NO` from information_schema; anything else is unknown.
fn parse_nullable(value: Option<&str>) -> Option<bool> {
    match value {
        Some("YES") => Some(true),
        Some("NO") => Some(false),
        _ => None,
    }
}

impl Database {
    pub async fn connect(connection: &DatabaseConnection) -> CatalogResult<Self> {
        if connection.driver != "postgres" {
            return Err(CatalogError::UnsupportedDriver(connection.driver.clone()));
        }

        let (client, conn) = tokio_postgres::connect(&connection.to_connection_string(), NoTls)
            .await
            .map_err(|e| CatalogError::Connection(e.into()))?;

        // Keep connection alive in background task
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                log::error!("Database connection error: {}", e);
            }
        });

        let database = Database { client };
        database.ping().await?;
        Ok(database)
    }

    async fn ping(&self) -> CatalogResult<()> {
        self.client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| CatalogError::Connection(e.into()))?;
        Ok(())
    }

    /// Point unqualified catalog reads at `search_path`.
    pub async fn set_search_path(&self, search_path: &str) -> CatalogResult<()> {
        let statement = search_path_statement(search_path);
        self.client
            .batch_execute(&statement)
            .await
            .map_err(|e| CatalogError::Connection(e.into()))
    }

    async fn rows(&self, query: &'static str, name: &'static str) -> CatalogResult<Vec<Row>> {
        self.client
            .query(query, &[])
            .await
            .map_err(|e| CatalogError::query(name, e))
    }
}

#[async_trait]
impl Catalog for Database {
    async fn list_tables(&self) -> CatalogResult<Vec<String>> {
        const NAME: &str = "tables";
        self.rows(TABLES_QUERY, NAME)
            .await?
            .iter()
            .map(|row| column(row, 0, NAME))
            .collect()
    }

    async fn list_columns(&self, table: &str) -> CatalogResult<Vec<RawColumn>> {
        const NAME: &str = "columns";
        let rows = self
            .client
            .query(COLUMNS_QUERY, &[&table])
            .await
            .map_err(|e| CatalogError::query(NAME, e))?;

        rows.iter()
            .map(|row| {
                let nullable: Option<String> = column(row, 2, NAME)?;
                Ok(RawColumn {
                    name: column(row, 0, NAME)?,
                    udt_name: column(row, 1, NAME)?,
                    nullable: parse_nullable(nullable.as_deref()),
                    length: column(row, 3, NAME)?,
                })
            })
            .collect()
    }

    async fn primary_keys(&self) -> CatalogResult<Vec<String>> {
        const NAME: &str = "primary keys";
        self.rows(PRIMARY_KEYS_QUERY, NAME)
            .await?
            .iter()
            .map(|row| column(row, 0, NAME))
            .collect()
    }

    async fn foreign_keys(&self) -> CatalogResult<Vec<ForeignKeyRow>> {
        const NAME: &str = "foreign keys";
        self.rows(FOREIGN_KEYS_QUERY, NAME)
            .await?
            .iter()
            .map(|row| {
                Ok(ForeignKeyRow {
                    column: column(row, 0, NAME)?,
                    target_table: column(row, 1, NAME)?,
                    delete_rule: column(row, 2, NAME)?,
                    update_rule: column(row, 3, NAME)?,
                })
            })
            .collect()
    }

    async fn enums(&self) -> CatalogResult<Vec<EnumRow>> {
        const NAME: &str = "enums";
        self.rows(ENUMS_QUERY, NAME)
            .await?
            .iter()
            .map(|row| {
                Ok(EnumRow {
                    column: column(row, 0, NAME)?,
                    enum_name: column(row, 1, NAME)?,
                    enum_value: column(row, 2, NAME)?,
                })
            })
            .collect()
    }

    async fn uniques(&self) -> CatalogResult<Vec<UniqueRow>> {
        const NAME: &str = "unique indexes";
        self.rows(UNIQUES_QUERY, NAME)
            .await?
            .iter()
            .map(|row| {
                Ok(UniqueRow {
                    column: column(row, 0, NAME)?,
                    table: column(row, 1, NAME)?,
                    definition: column(row, 2, NAME)?,
                })
            })
            .collect()
    }
}

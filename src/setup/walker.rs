use crate::db::{Catalog, CatalogResult, ColumnDescriptor};

/// Walks the tables of the current schema and their columns.
pub struct SchemaWalker<'a, C: Catalog> {
    catalog: &'a C,
}

impl<'a, C: Catalog> SchemaWalker<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    pub async fn list_tables(&self) -> CatalogResult<Vec<String>> {
        self.catalog.list_tables().await
    }

    /// Columns of `table` in catalog order, unknown attributes defaulted.
    pub async fn list_columns(&self, table: &str) -> CatalogResult<Vec<ColumnDescriptor>> {
        let columns = self.catalog.list_columns(table).await?;
        Ok(columns.into_iter().map(ColumnDescriptor::from).collect())
    }
}

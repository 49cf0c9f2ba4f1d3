//! The one-shot extraction pipeline.
//!
//! `SetupContext::run` checks the repository, reads the catalog and stores
//! one merged record per column. A run against a repository that already
//! describes the database does nothing.

mod merge;
mod walker;


use thiserror::Error;

use crate::db::{Catalog, CatalogError, CatalogResult, Enums, ForeignKeys, Lookups, PrimaryKeys, Uniques};
use crate::models::{DatabaseInfo, Table};
use crate::storage::{Repository, RepositoryError};

use merge::merge_column;
use walker::SchemaWalker;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("repository operation failed: {0}")]
    Persistence(#[from] RepositoryError),
}

#[derive(Debug, Clone, Copy)]
pub struct SetupOptions {
    /// Query key, enum and unique lookups and merge them into each column.
    pub enrich: bool,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self { enrich: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The repository already held metadata for the database.
    Skipped,
    Extracted { tables: usize, columns: usize },
}

pub struct SetupContext<'a, C: Catalog, R: Repository> {
    catalog: &'a C,
    repository: &'a mut R,
    database: DatabaseInfo,
    options: SetupOptions,
}

impl<'a, C: Catalog, R: Repository> SetupContext<'a, C, R> {
    pub fn new(catalog: &'a C, repository: &'a mut R, database: DatabaseInfo, options: SetupOptions) -> Self {
        Self {
            catalog,
            repository,
            database,
            options,
        }
    }

    pub async fn run(&mut self) -> Result<SetupOutcome, SetupError> {
        if self.repository.is_database_meta_data_added(&self.database.name)? {
            log::info!("metadata for database `{}` already stored, skipping extraction", self.database.name);
            return Ok(SetupOutcome::Skipped);
        }

        // All catalog reads finish before the first write, so a failed
        // query leaves the repository untouched.
        let walker = SchemaWalker::new(self.catalog);
        let table_names = walker.list_tables().await?;
        let lookups = if self.options.enrich {
            fetch_lookups(self.catalog).await?
        } else {
            Lookups::default()
        };

        let mut merged = Vec::with_capacity(table_names.len());
        for table_name in &table_names {
            let descriptors = walker.list_columns(table_name).await?;
            log::debug!("table `{}`: {} columns", table_name, descriptors.len());
            let columns: Vec<_> = descriptors
                .into_iter()
                .map(|descriptor| merge_column(table_name, descriptor, &lookups))
                .collect();
            merged.push((table_name, columns));
        }

        self.repository.add_database_info(self.database.clone())?;

        let mut tables = 0;
        let mut columns = 0;
        for (table_name, table_columns) in merged {
            if !table_columns.is_empty() {
                tables += 1;
            }

            for column in table_columns {
                self.repository.add_table(Table::new(table_name.as_str()))?;
                self.repository.add_column_meta_data(table_name, column)?;
                columns += 1;
            }
        }

        log::info!(
            "stored metadata for database `{}`: {} tables, {} columns",
            self.database.name,
            tables,
            columns
        );
        Ok(SetupOutcome::Extracted { tables, columns })
    }
}

async fn fetch_lookups<C: Catalog>(catalog: &C) -> CatalogResult<Lookups> {
    let primary_keys = PrimaryKeys::from_rows(catalog.primary_keys().await?);
    let foreign_keys = ForeignKeys::from_rows(catalog.foreign_keys().await?);
    let enums = Enums::from_rows(catalog.enums().await?);
    let uniques = Uniques::from_rows(catalog.uniques().await?);

    log::debug!(
        "lookups: {} primary keys, {} foreign keys, {} enums, {} unique columns",
        primary_keys.count(),
        foreign_keys.count(),
        enums.count(),
        uniques.count()
    );

    Ok(Lookups {
        primary_keys,
        foreign_keys,
        enums,
        uniques,
    })
}

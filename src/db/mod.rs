mod catalog;
mod client;
mod lookups;
mod models;

pub use catalog::{Catalog, CatalogError, CatalogResult};
pub use client::Database;
pub use lookups::{Enums, ForeignKeys, Lookups, PrimaryKeys, Uniques};
pub use models::{ColumnDescriptor, EnumRow, ForeignKeyRow, RawColumn, UniqueRow};

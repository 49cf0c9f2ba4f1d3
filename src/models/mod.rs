mod metadata;

pub use metadata::{ColumnMetaData, DatabaseInfo, Table};

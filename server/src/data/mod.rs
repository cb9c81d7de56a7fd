//! Data storage layer
//!
//! - `criteria` - criteria-to-query compiler (pure, no I/O)
//! - `sqlite` - SQLite service, schema, repositories and query executor
//! - `traits` - the query executor interface
//! - `types` - entity rows and write models

pub mod criteria;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::{SqliteError, SqliteService};
pub use traits::{Page, QueryExecutor};
pub use types::{HospitalRow, PatientRow, ProviderRow, Sex};

//! Data-access layer shared by the Ansiversa tenant databases.
//!
//! Provides connection configuration, a per-context client cache, idempotent
//! schema bootstrap, a filter/sort/paginate query builder, lenient row
//! coercion and a registry of mutation templates.

pub mod coerce;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod operations;
pub mod query;
pub mod schema;
pub mod sqlite;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod value;

pub use config::{load_env_config, ConnectionConfig, DbConfig, EnvOptions, CORE_TENANT};
pub use context::DbContext;
pub use error::{DbError, DbResult};
pub use executor::{Executor, QueryOutput, Statement};
pub use operations::{OperationKind, TableOperations};
pub use query::{ListOptions, ListSpec, Page, SortDirection, SortSpec};
pub use schema::{TableDefinition, Tenant};
pub use sqlite::{Connector, SqliteConnector, SqliteExecutor};
pub use value::{Row, Value};

//! Error types shared by every tenant module.

use thiserror::Error;

/// Main error type for data-access operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Invalid or conflicting configuration
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// The context was used before a configuration was supplied
    #[error("Ansiversa DB has not been initialized. Call DbContext::initialize() first.")]
    NotInitialized,

    /// Environment-based loading could not find a variable
    #[error("Missing required environment variable: {name}")]
    MissingEnvVar { name: String },

    /// No connection settings exist for the requested tenant
    #[error("Database configuration for tenant '{tenant}' is missing. Add it under apps.{tenant} when initializing.")]
    MissingTenantConfig { tenant: String },

    /// An INSERT/UPDATE ... RETURNING produced no row
    #[error("Failed to {operation} {entity}: statement returned no row")]
    MutationIntegrity {
        entity: String,
        operation: &'static str,
    },

    /// The mutation registry has no template for this table/operation
    #[error("Unknown operation '{operation}' for table '{table}'")]
    UnknownOperation { table: String, operation: String },

    /// Driver-level failure
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Serializing a JSON column value failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DbError {
    pub fn config(reason: impl Into<String>) -> Self {
        DbError::Config {
            reason: reason.into(),
        }
    }

    pub fn mutation_integrity(entity: impl Into<String>, operation: &'static str) -> Self {
        DbError::MutationIntegrity {
            entity: entity.into(),
            operation,
        }
    }
}

/// Result type for data-access operations.
pub type DbResult<T> = Result<T, DbError>;

//! Explicit database context: configuration, cached tenant handles and
//! schema state, owned by the caller and passed to every operation.

use ansiversa_telemetry::Metrics;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;
use tracing::info;

use crate::config::DbConfig;
use crate::error::{DbError, DbResult};
use crate::executor::{Executor, QueryOutput, Statement};
use crate::schema::{SchemaBootstrapper, Tenant};
use crate::sqlite::{Connector, SqliteConnector};

/// Everything a data-access call needs.
///
/// Resetting for tests means building a fresh context; the `reset_*`
/// methods exist for callers that want to keep the configuration.
pub struct DbContext {
    config: OnceLock<DbConfig>,
    connector: Arc<dyn Connector>,
    clients: Mutex<HashMap<&'static str, Arc<dyn Executor>>>,
    schema: SchemaBootstrapper,
    metrics: Option<Metrics>,
}

impl DbContext {
    /// Create a context with configuration already supplied.
    pub fn new(config: DbConfig) -> Self {
        let context = Self::uninitialized();
        // A fresh OnceLock always accepts its first value.
        let _ = context.config.set(config);
        context
    }

    /// Create a context that fails with `NotInitialized` until
    /// [`DbContext::initialize`] is called.
    pub fn uninitialized() -> Self {
        Self {
            config: OnceLock::new(),
            connector: Arc::new(SqliteConnector),
            clients: Mutex::new(HashMap::new()),
            schema: SchemaBootstrapper::new(),
            metrics: None,
        }
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Supply the configuration. Only the first call succeeds.
    pub fn initialize(&self, config: DbConfig) -> DbResult<&DbConfig> {
        self.config
            .set(config)
            .map_err(|_| DbError::config("database context is already initialized"))?;
        self.config()
    }

    pub fn is_initialized(&self) -> bool {
        self.config.get().is_some()
    }

    pub fn config(&self) -> DbResult<&DbConfig> {
        self.config.get().ok_or(DbError::NotInitialized)
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    /// Return the cached handle for `tenant`, building it on first use.
    pub fn client(&self, tenant: &Tenant) -> DbResult<Arc<dyn Executor>> {
        let mut clients = self.lock_clients();
        if let Some(client) = clients.get(tenant.name) {
            return Ok(Arc::clone(client));
        }

        let settings = self.config()?.resolve(tenant.name)?;
        let mut client = self.connector.connect(tenant.name, settings)?;
        if let Some(metrics) = &self.metrics {
            client = Arc::new(Instrumented {
                tenant: tenant.name,
                inner: client,
                metrics: metrics.clone(),
            });
        }
        info!(tenant = tenant.name, "Created tenant database client");

        clients.insert(tenant.name, Arc::clone(&client));
        Ok(client)
    }

    pub fn reset_client(&self, tenant: &Tenant) {
        self.lock_clients().remove(tenant.name);
    }

    pub fn reset_clients(&self) {
        self.lock_clients().clear();
    }

    /// Create the tenant's tables and indexes if this context has not yet.
    pub async fn ensure_schema(&self, tenant: &Tenant) -> DbResult<()> {
        if self.schema.is_initialized(tenant) {
            return Ok(());
        }
        let client = self.client(tenant)?;
        if self.schema.ensure(tenant, client.as_ref()).await? {
            if let Some(metrics) = &self.metrics {
                metrics.inc_schema_bootstraps();
            }
        }
        Ok(())
    }

    pub fn reset_schema_cache(&self, tenant: &Tenant) {
        self.schema.reset(tenant);
    }

    /// Ensure the schema, then hand back the tenant's handle. Every
    /// data-access entry point starts here.
    pub async fn prepare(&self, tenant: &Tenant) -> DbResult<Arc<dyn Executor>> {
        self.ensure_schema(tenant).await?;
        self.client(tenant)
    }

    fn lock_clients(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, Arc<dyn Executor>>> {
        self.clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Counts and times every statement sent to the wrapped handle.
struct Instrumented {
    tenant: &'static str,
    inner: Arc<dyn Executor>,
    metrics: Metrics,
}

#[async_trait]
impl Executor for Instrumented {
    async fn execute(&self, statement: Statement) -> DbResult<QueryOutput> {
        let started = Instant::now();
        let result = self.inner.execute(statement).await;
        self.metrics
            .observe_statement_latency(self.tenant, started.elapsed().as_secs_f64());
        self.metrics.inc_statements(self.tenant);
        if result.is_err() {
            self.metrics.inc_statement_errors(self.tenant);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;
    use crate::schema::TableDefinition;
    use crate::testing::RecordingConnector;

    const TABLES: &[TableDefinition] = &[TableDefinition {
        name: "notes",
        description: "",
        create: "CREATE TABLE IF NOT EXISTS notes (id INTEGER PRIMARY KEY)",
        indexes: &["CREATE INDEX IF NOT EXISTS idx_notes_id ON notes(id)"],
        operations: None,
    }];

    const NOTES: Tenant = Tenant {
        name: "notes",
        tables: TABLES,
    };

    fn config() -> DbConfig {
        DbConfig::new(ConnectionConfig::new("sqlite::memory:", "t"))
            .with_app("notes", ConnectionConfig::new("sqlite::memory:", "t"))
    }

    #[test]
    fn uninitialized_context_refuses_clients() {
        let ctx = DbContext::uninitialized();
        assert!(matches!(ctx.client(&NOTES), Err(DbError::NotInitialized)));

        ctx.initialize(config()).unwrap();
        assert!(ctx.client(&NOTES).is_ok());
        assert!(matches!(ctx.initialize(config()), Err(DbError::Config { .. })));
    }

    #[test]
    fn client_is_cached_until_reset() {
        let connector = Arc::new(RecordingConnector::new());
        let ctx = DbContext::new(config()).with_connector(connector.clone());

        let first = ctx.client(&NOTES).unwrap();
        let second = ctx.client(&NOTES).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(connector.connections(), 1);

        ctx.reset_client(&NOTES);
        ctx.client(&NOTES).unwrap();
        assert_eq!(connector.connections(), 2);
    }

    #[test]
    fn missing_tenant_config_is_reported() {
        let ctx = DbContext::new(DbConfig::new(ConnectionConfig::new("sqlite::memory:", "t")));
        assert!(matches!(
            ctx.client(&NOTES),
            Err(DbError::MissingTenantConfig { ref tenant }) if tenant == "notes"
        ));
    }

    #[tokio::test]
    async fn bootstrap_runs_once_per_context() {
        let connector = Arc::new(RecordingConnector::new());
        let ctx = DbContext::new(config()).with_connector(connector.clone());

        ctx.ensure_schema(&NOTES).await.unwrap();
        ctx.ensure_schema(&NOTES).await.unwrap();
        assert_eq!(connector.executor().call_count(), 2);

        ctx.reset_schema_cache(&NOTES);
        ctx.prepare(&NOTES).await.unwrap();
        assert_eq!(connector.executor().call_count(), 4);
    }

    #[tokio::test]
    async fn metrics_count_statements_per_tenant() {
        let metrics = Metrics::new().unwrap();
        let ctx = DbContext::new(config())
            .with_connector(Arc::new(RecordingConnector::new()))
            .with_metrics(metrics.clone());

        ctx.prepare(&NOTES).await.unwrap();
        assert_eq!(metrics.statements("notes"), 2);
        assert_eq!(metrics.schema_bootstraps(), 1);
    }
}

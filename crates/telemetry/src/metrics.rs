//! Prometheus metrics for statement execution.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Metrics collector for tenant database handles.
///
/// Each instance owns its registry, so several contexts (one per test, say)
/// can coexist in a process without duplicate-registration errors.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    statements_executed: IntCounterVec,
    statement_errors: IntCounterVec,
    schema_bootstraps: IntCounter,
    statement_latency: HistogramVec,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let statements_executed = IntCounterVec::new(
            Opts::new(
                "ansiversa_db_statements_total",
                "Total number of SQL statements executed",
            ),
            &["tenant"],
        )?;

        let statement_errors = IntCounterVec::new(
            Opts::new(
                "ansiversa_db_statement_errors_total",
                "Total number of SQL statements that failed",
            ),
            &["tenant"],
        )?;

        let schema_bootstraps = IntCounter::new(
            "ansiversa_db_schema_bootstraps_total",
            "Total number of completed schema bootstraps",
        )?;

        let statement_latency = HistogramVec::new(
            HistogramOpts::new(
                "ansiversa_db_statement_latency_seconds",
                "SQL statement latency in seconds",
            ),
            &["tenant"],
        )?;

        registry.register(Box::new(statements_executed.clone()))?;
        registry.register(Box::new(statement_errors.clone()))?;
        registry.register(Box::new(schema_bootstraps.clone()))?;
        registry.register(Box::new(statement_latency.clone()))?;

        Ok(Self {
            registry,
            statements_executed,
            statement_errors,
            schema_bootstraps,
            statement_latency,
        })
    }

    /// Increment the executed-statement counter for a tenant.
    pub fn inc_statements(&self, tenant: &str) {
        self.statements_executed.with_label_values(&[tenant]).inc();
    }

    /// Increment the failed-statement counter for a tenant.
    pub fn inc_statement_errors(&self, tenant: &str) {
        self.statement_errors.with_label_values(&[tenant]).inc();
    }

    /// Increment the schema bootstrap counter.
    pub fn inc_schema_bootstraps(&self) {
        self.schema_bootstraps.inc();
    }

    /// Record statement latency.
    pub fn observe_statement_latency(&self, tenant: &str, duration_secs: f64) {
        self.statement_latency
            .with_label_values(&[tenant])
            .observe(duration_secs);
    }

    pub fn statements(&self, tenant: &str) -> u64 {
        self.statements_executed.with_label_values(&[tenant]).get()
    }

    pub fn schema_bootstraps(&self) -> u64 {
        self.schema_bootstraps.get()
    }

    /// Get Prometheus metrics as a string.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_scoped_per_instance() {
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();

        first.inc_statements("quiz");
        first.inc_statements("quiz");
        second.inc_statements("core");

        assert_eq!(first.statements("quiz"), 2);
        assert_eq!(second.statements("quiz"), 0);
        assert_eq!(second.statements("core"), 1);
    }

    #[test]
    fn gather_renders_text_format() {
        let metrics = Metrics::new().unwrap();
        metrics.inc_schema_bootstraps();
        metrics.observe_statement_latency("quiz", 0.01);

        let body = metrics.gather().unwrap();
        assert!(body.contains("ansiversa_db_schema_bootstraps_total 1"));
        assert!(body.contains("ansiversa_db_statement_latency_seconds"));
    }
}

//! Per-tenant connection settings, injected directly or derived from the
//! environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{DbError, DbResult};

/// Name of the tenant served by [`DbConfig::core`].
pub const CORE_TENANT: &str = "core";

const DEFAULT_PREFIX: &str = "ANSIVERSA";
const DEFAULT_CORE_URL_VAR: &str = "ANSIVERSA_CORE_DB_URL";
const DEFAULT_CORE_AUTH_VAR: &str = "TURSO_AUTH_TOKEN";

/// Credentials for one tenant database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub url: String,
    pub auth_token: String,
}

impl ConnectionConfig {
    pub fn new(url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: auth_token.into(),
        }
    }
}

/// Connection settings for the core database and every app tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    pub core: ConnectionConfig,
    #[serde(default)]
    pub apps: BTreeMap<String, ConnectionConfig>,
}

impl DbConfig {
    pub fn new(core: ConnectionConfig) -> Self {
        Self {
            core,
            apps: BTreeMap::new(),
        }
    }

    pub fn with_app(mut self, tenant: impl Into<String>, config: ConnectionConfig) -> Self {
        self.apps.insert(tenant.into(), config);
        self
    }

    /// Return the credentials for `tenant`.
    pub fn resolve(&self, tenant: &str) -> DbResult<&ConnectionConfig> {
        let config = if tenant == CORE_TENANT {
            Some(&self.core)
        } else {
            self.apps.get(tenant)
        };
        let config = config.ok_or_else(|| DbError::MissingTenantConfig {
            tenant: tenant.to_string(),
        })?;
        if config.url.trim().is_empty() {
            return Err(DbError::config(format!(
                "database URL for tenant '{tenant}' is empty"
            )));
        }
        Ok(config)
    }
}

/// Controls which environment variables [`load_env_config`] reads.
#[derive(Debug, Clone)]
pub struct EnvOptions {
    /// App tenants to load in addition to core.
    pub apps: Vec<String>,
    pub core_url_var: String,
    pub core_auth_token_var: String,
    /// Auth variable for apps without an override; defaults to the core one.
    pub default_auth_token_var: Option<String>,
    pub app_auth_token_vars: BTreeMap<String, String>,
    /// App URL variables are `<prefix>_<TENANT_UPPER>_DB_URL`.
    pub url_var_prefix: String,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            apps: Vec::new(),
            core_url_var: DEFAULT_CORE_URL_VAR.to_string(),
            core_auth_token_var: DEFAULT_CORE_AUTH_VAR.to_string(),
            default_auth_token_var: None,
            app_auth_token_vars: BTreeMap::new(),
            url_var_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl EnvOptions {
    pub fn with_apps<I, S>(apps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            apps: apps.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn app_url_var(&self, tenant: &str) -> String {
        format!("{}_{}_DB_URL", self.url_var_prefix, tenant.to_uppercase())
    }

    fn app_auth_var(&self, tenant: &str) -> &str {
        self.app_auth_token_vars
            .get(tenant)
            .or(self.default_auth_token_var.as_ref())
            .unwrap_or(&self.core_auth_token_var)
    }
}

/// Build a [`DbConfig`] from the process environment.
pub fn load_env_config(options: &EnvOptions) -> DbResult<DbConfig> {
    load_config_with(options, |name| std::env::var(name).ok())
}

/// Build a [`DbConfig`] using `lookup` to read variables.
pub fn load_config_with<F>(options: &EnvOptions, lookup: F) -> DbResult<DbConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let require = |name: &str| -> DbResult<String> {
        lookup(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| DbError::MissingEnvVar {
                name: name.to_string(),
            })
    };

    let core = ConnectionConfig::new(
        require(&options.core_url_var)?,
        require(&options.core_auth_token_var)?,
    );

    let mut config = DbConfig::new(core);
    for tenant in &options.apps {
        let url = require(&options.app_url_var(tenant))?;
        let auth_token = require(options.app_auth_var(tenant))?;
        config
            .apps
            .insert(tenant.clone(), ConnectionConfig::new(url, auth_token));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn loads_core_and_apps_with_shared_token() {
        let vars = env(&[
            ("ANSIVERSA_CORE_DB_URL", "sqlite://core.db"),
            ("ANSIVERSA_QUIZ_DB_URL", "sqlite://quiz.db"),
            ("TURSO_AUTH_TOKEN", "secret"),
        ]);
        let options = EnvOptions::with_apps(["quiz"]);

        let config = load_config_with(&options, |name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.core.url, "sqlite://core.db");
        assert_eq!(config.apps["quiz"].url, "sqlite://quiz.db");
        assert_eq!(config.apps["quiz"].auth_token, "secret");
    }

    #[test]
    fn per_app_token_override_wins() {
        let vars = env(&[
            ("ANSIVERSA_CORE_DB_URL", "a"),
            ("ANSIVERSA_QUIZ_DB_URL", "b"),
            ("TURSO_AUTH_TOKEN", "core-token"),
            ("QUIZ_TOKEN", "quiz-token"),
        ]);
        let mut options = EnvOptions::with_apps(["quiz"]);
        options
            .app_auth_token_vars
            .insert("quiz".into(), "QUIZ_TOKEN".into());

        let config = load_config_with(&options, |name| vars.get(name).cloned()).unwrap();
        assert_eq!(config.core.auth_token, "core-token");
        assert_eq!(config.apps["quiz"].auth_token, "quiz-token");
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        let vars = env(&[("ANSIVERSA_CORE_DB_URL", "a"), ("TURSO_AUTH_TOKEN", "t")]);
        let options = EnvOptions::with_apps(["quiz"]);

        let err = load_config_with(&options, |name| vars.get(name).cloned()).unwrap_err();
        match err {
            DbError::MissingEnvVar { name } => assert_eq!(name, "ANSIVERSA_QUIZ_DB_URL"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn resolve_unknown_tenant_fails() {
        let config = DbConfig::new(ConnectionConfig::new("sqlite::memory:", "t"));
        assert!(config.resolve(CORE_TENANT).is_ok());
        assert!(matches!(
            config.resolve("quiz"),
            Err(DbError::MissingTenantConfig { .. })
        ));
    }

    #[test]
    fn deserializes_injected_config() {
        let json = r#"{
            "core": {"url": "sqlite::memory:", "authToken": "t"},
            "apps": {"quiz": {"url": "sqlite::memory:", "authToken": "q"}}
        }"#;
        let config: DbConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.resolve("quiz").unwrap().auth_token, "q");
    }
}

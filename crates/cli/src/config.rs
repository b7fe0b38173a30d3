//! Configuration loading from jsreport-mcp.toml and the environment.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use jsreport::{
    CatalogApi, DEFAULT_BASE_URL, DEFAULT_TEMPLATE, DEFAULT_TIMEOUT, ServiceAuth, ServiceConfig,
};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Reporting service settings.
    #[serde(default)]
    pub service: ServiceSection,
}

/// The `[service]` table.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceSection {
    /// Base URL of the JSReport server.
    pub url: Option<String>,

    /// Basic auth user. Defaults to "admin".
    pub username: Option<String>,

    /// Basic auth password.
    /// Mutually exclusive with token.
    pub password: Option<String>,

    /// Bearer token.
    /// Mutually exclusive with password.
    pub token: Option<String>,

    /// Template used when a request does not name one.
    pub default_template: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Template catalog endpoints: "odata" or "rest".
    pub catalog: Option<CatalogApi>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Override file values with `JSREPORT_*` variables.
    pub fn apply_env(&mut self, vars: &HashMap<String, String>) -> Result<(), ConfigError> {
        let var = |name: &str| vars.get(name).filter(|v| !v.trim().is_empty()).cloned();
        let service = &mut self.service;

        if let Some(url) = var("JSREPORT_URL") {
            service.url = Some(url);
        }
        if let Some(username) = var("JSREPORT_USERNAME") {
            service.username = Some(username);
        }
        if let Some(password) = var("JSREPORT_PASSWORD") {
            service.password = Some(password);
        }
        if let Some(token) = var("JSREPORT_TOKEN") {
            service.token = Some(token);
        }
        if let Some(template) = var("JSREPORT_DEFAULT_TEMPLATE") {
            service.default_template = Some(template);
        }
        if let Some(secs) = var("JSREPORT_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "JSREPORT_TIMEOUT_SECS",
                message: format!("expected a whole number of seconds, got '{secs}'"),
            })?;
            service.timeout_secs = Some(secs);
        }
        if let Some(catalog) = var("JSREPORT_CATALOG") {
            let catalog: CatalogApi = catalog.parse().map_err(|message| ConfigError::Invalid {
                key: "JSREPORT_CATALOG",
                message,
            })?;
            service.catalog = Some(catalog);
        }

        Ok(())
    }

    /// Build the authentication from config.
    ///
    /// A token selects Bearer auth; otherwise Basic auth is used.
    pub fn auth(&self) -> Result<ServiceAuth, ConfigError> {
        let service = &self.service;
        match (&service.password, &service.token) {
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousAuth),
            (None, Some(token)) => Ok(ServiceAuth::Bearer(token.clone())),
            (password, None) => Ok(ServiceAuth::Basic {
                username: service.username.clone().unwrap_or_else(|| "admin".to_string()),
                password: password.clone().unwrap_or_default(),
            }),
        }
    }

    /// Resolve the immutable settings handed to the service client.
    pub fn service_config(&self) -> Result<ServiceConfig, ConfigError> {
        let service = &self.service;
        let timeout = match service.timeout_secs {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    key: "timeout_secs",
                    message: "must be greater than zero".to_string(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        let url = service.url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let template = service.default_template.as_deref().unwrap_or(DEFAULT_TEMPLATE);

        Ok(ServiceConfig::new(url, self.auth()?)
            .with_default_template(template)
            .with_timeout(timeout)
            .with_catalog(service.catalog.unwrap_or_default()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error(
        "ambiguous authentication: set either service.password OR service.token, not both"
    )]
    AmbiguousAuth,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        let service = config.service_config().unwrap();
        assert_eq!(service.base_url, DEFAULT_BASE_URL);
        assert_eq!(service.default_template, DEFAULT_TEMPLATE);
        assert_eq!(service.timeout, DEFAULT_TIMEOUT);
        assert_eq!(service.catalog, CatalogApi::OData);
        assert!(matches!(
            service.auth,
            ServiceAuth::Basic { ref username, ref password } if username == "admin" && password.is_empty()
        ));
    }

    #[test]
    fn parse_toml() {
        let toml = r#"
[service]
url = "https://reports.example.com"
username = "reporter"
password = "s3cret"
default_template = "sales-report"
timeout_secs = 60
catalog = "rest"
"#;
        let service = Config::parse(toml).unwrap().service_config().unwrap();
        assert_eq!(service.base_url, "https://reports.example.com");
        assert_eq!(service.default_template, "sales-report");
        assert_eq!(service.timeout, Duration::from_secs(60));
        assert_eq!(service.catalog, CatalogApi::Rest);
        assert_eq!(service.auth.to_string(), "basic");
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config::parse(
            r#"
[service]
url = "http://file.local"
default_template = "from-file"
"#,
        )
        .unwrap();
        config
            .apply_env(&env(&[
                ("JSREPORT_URL", "http://env.local:5488"),
                ("JSREPORT_DEFAULT_TEMPLATE", ""),
                ("JSREPORT_TIMEOUT_SECS", "5"),
                ("JSREPORT_CATALOG", "REST"),
            ]))
            .unwrap();

        let service = config.service_config().unwrap();
        assert_eq!(service.base_url, "http://env.local:5488");
        assert_eq!(service.default_template, "from-file");
        assert_eq!(service.timeout, Duration::from_secs(5));
        assert_eq!(service.catalog, CatalogApi::Rest);
    }

    #[test]
    fn token_selects_bearer() {
        let mut config = Config::default();
        config
            .apply_env(&env(&[("JSREPORT_TOKEN", "tok")]))
            .unwrap();
        assert!(matches!(config.auth().unwrap(), ServiceAuth::Bearer(t) if t == "tok"));
    }

    #[test]
    fn password_and_token_conflict() {
        let config = Config::parse(
            r#"
[service]
password = "p"
token = "t"
"#,
        )
        .unwrap();
        assert!(matches!(config.auth(), Err(ConfigError::AmbiguousAuth)));
    }

    #[test]
    fn bad_env_values_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(&env(&[("JSREPORT_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("JSREPORT_TIMEOUT_SECS"));

        let err = config
            .apply_env(&env(&[("JSREPORT_CATALOG", "graphql")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JSREPORT_CATALOG", .. }));

        config.service.timeout_secs = Some(0);
        assert!(config.service_config().is_err());
    }
}

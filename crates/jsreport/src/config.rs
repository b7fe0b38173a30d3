//! Reporting service settings.

use std::fmt;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::Deserialize;

/// Base URL of a locally running JSReport server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5488";

/// Template used when a request does not name one.
pub const DEFAULT_TEMPLATE: &str = "data-report";

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authentication scheme for the reporting service.
#[derive(Clone)]
pub enum ServiceAuth {
    /// HTTP Basic authentication.
    Basic { username: String, password: String },
    /// Bearer token authentication.
    Bearer(String),
}

impl ServiceAuth {
    pub(crate) fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => req.basic_auth(username, Some(password)),
            Self::Bearer(token) => req.bearer_auth(token),
        }
    }
}

impl fmt::Display for ServiceAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { .. } => write!(f, "basic"),
            Self::Bearer(_) => write!(f, "bearer"),
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for ServiceAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

/// Which template catalog endpoints the service exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogApi {
    /// `GET /odata/templates`, filtered with `$filter=name eq '...'`.
    #[default]
    OData,
    /// `GET /api/templates` and `GET /api/templates/{name}`.
    Rest,
}

impl std::str::FromStr for CatalogApi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "odata" => Ok(Self::OData),
            "rest" => Ok(Self::Rest),
            other => Err(format!("unknown catalog api '{other}' (expected odata or rest)")),
        }
    }
}

/// Immutable settings shared by every call to the reporting service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub auth: ServiceAuth,
    pub default_template: String,
    pub timeout: Duration,
    pub catalog: CatalogApi,
}

impl ServiceConfig {
    /// Settings for `base_url` with Basic auth and every other default.
    pub fn new(base_url: impl Into<String>, auth: ServiceAuth) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            default_template: DEFAULT_TEMPLATE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            catalog: CatalogApi::default(),
        }
    }

    pub fn with_default_template(mut self, template: impl Into<String>) -> Self {
        self.default_template = template.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_catalog(mut self, catalog: CatalogApi) -> Self {
        self.catalog = catalog;
        self
    }
}

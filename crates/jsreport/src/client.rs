//! HTTP client for the reporting service.

use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{CatalogApi, ServiceAuth, ServiceConfig};
use crate::error::{Error, Result, ValidationError};
use crate::payload::TemplatePayload;
use crate::request::RawRenderOptions;
use crate::template::{TemplateDescriptor, TemplateListing};

/// Content type assumed when the service does not send one.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered document, exactly as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl RenderedReport {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Operations offered by a reporting service.
pub trait ReportBackend: Send + Sync {
    /// Render a stored template with the given data.
    fn render(
        &self,
        template_name: &str,
        payload: &TemplatePayload,
    ) -> impl Future<Output = Result<RenderedReport>> + Send;

    /// List every template the service knows.
    fn list_templates(&self) -> impl Future<Output = Result<Vec<TemplateDescriptor>>> + Send;

    /// Look up a single template, failing with [`Error::NotFound`] on a miss.
    fn get_template_info(
        &self,
        template_name: &str,
    ) -> impl Future<Output = Result<TemplateDescriptor>> + Send;

    /// Render raw HTML without a stored template.
    fn render_raw_html(
        &self,
        html: &str,
        options: &RawRenderOptions,
    ) -> impl Future<Output = Result<RenderedReport>> + Send;
}

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRenderRequest<'a, D: Serialize> {
    template: ApiTemplate<'a>,
    data: &'a D,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiTemplate<'a> {
    Named {
        name: &'a str,
    },
    Inline {
        content: &'a str,
        engine: &'a str,
        recipe: &'a str,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Client Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// JSReport HTTP client.
///
/// Holds one connection pool for its whole lifetime; clone it to share.
#[derive(Debug, Clone)]
pub struct JsReportClient {
    http: reqwest::Client,
    base_url: Url,
    auth: ServiceAuth,
    catalog: CatalogApi,
    timeout: Duration,
}

impl JsReportClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| Error::Config(format!("invalid base url '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "invalid base url '{}': not a hierarchical URL",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            auth: config.auth.clone(),
            catalog: config.catalog,
            timeout: config.timeout,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn templates_endpoint(&self) -> Url {
        match self.catalog {
            CatalogApi::OData => self.endpoint(&["odata", "templates"]),
            CatalogApi::Rest => self.endpoint(&["api", "templates"]),
        }
    }

    /// Send one authenticated request. Non-2xx statuses become
    /// [`Error::Upstream`]; nothing is retried.
    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let response = self
            .auth
            .apply(req)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "failed to read error body");
                    String::new()
                }
            };
            warn!(status = status.as_u16(), "reporting service returned an error");
            return Err(Error::upstream(status.as_u16(), &body));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self.send(self.http.get(url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    async fn post_render<D: Serialize + Sync>(
        &self,
        body: &ApiRenderRequest<'_, D>,
    ) -> Result<RenderedReport> {
        let url = self.endpoint(&["api", "report"]);
        debug!(%url, "POST");
        let response = self.send(self.http.post(url).json(body)).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(PDF_CONTENT_TYPE)
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!(size = bytes.len(), %content_type, "render complete");
        Ok(RenderedReport {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        let cause = if err.is_timeout() {
            format!("request timed out after {:?}", self.timeout)
        } else {
            error_chain(&err)
        };
        warn!(%cause, "reporting service unreachable");
        Error::Transport { cause }
    }
}

impl std::fmt::Display for JsReportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "jsreport({}, auth={})", self.base_url, self.auth)
    }
}

impl ReportBackend for JsReportClient {
    async fn render(&self, template_name: &str, payload: &TemplatePayload) -> Result<RenderedReport> {
        require("template_name", template_name)?;
        debug!(template = template_name, "rendering template");
        let body = ApiRenderRequest {
            template: ApiTemplate::Named {
                name: template_name,
            },
            data: payload,
        };
        self.post_render(&body).await
    }

    async fn list_templates(&self) -> Result<Vec<TemplateDescriptor>> {
        let listing: TemplateListing = self.get_json(self.templates_endpoint()).await?;
        Ok(listing
            .into_entities()
            .into_iter()
            .filter_map(TemplateDescriptor::from_entity)
            .collect())
    }

    async fn get_template_info(&self, template_name: &str) -> Result<TemplateDescriptor> {
        require("template_name", template_name)?;
        let not_found = |e: Error| match e {
            Error::Upstream { status: 404, .. } => Error::NotFound(template_name.to_string()),
            other => other,
        };

        match self.catalog {
            CatalogApi::OData => {
                let mut url = self.templates_endpoint();
                let filter = format!("name eq '{}'", template_name.replace('\'', "''"));
                url.query_pairs_mut().append_pair("$filter", &filter);

                let listing: TemplateListing = self.get_json(url).await.map_err(not_found)?;
                listing
                    .into_entities()
                    .into_iter()
                    .find_map(TemplateDescriptor::from_entity_with_content)
                    .ok_or_else(|| Error::NotFound(template_name.to_string()))
            }
            CatalogApi::Rest => {
                let url = self.endpoint(&["api", "templates", template_name]);
                let entity: Map<String, Value> = self.get_json(url).await.map_err(not_found)?;
                TemplateDescriptor::from_entity_with_content(entity)
                    .ok_or_else(|| Error::InvalidResponse("template entry has no name".into()))
            }
        }
    }

    async fn render_raw_html(&self, html: &str, options: &RawRenderOptions) -> Result<RenderedReport> {
        require("html_content", html)?;
        debug!(recipe = %options.recipe, engine = %options.engine, "rendering raw html");
        let empty = Value::Object(Map::new());
        let body = ApiRenderRequest {
            template: ApiTemplate::Inline {
                content: html,
                engine: &options.engine,
                recipe: &options.recipe,
            },
            data: options.data.as_ref().unwrap_or(&empty),
        };
        self.post_render(&body).await
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    let mut errors = ValidationError::new();
    if value.trim().is_empty() {
        errors.push(field, "is required");
    }
    Ok(errors.into_result()?)
}

/// Joins an error with its sources, e.g. "error sending request: connection refused".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

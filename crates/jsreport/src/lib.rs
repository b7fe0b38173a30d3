//! JSReport request translation.
//!
//! This crate turns agent-supplied report parameters into render calls
//! against a JSReport server and maps the answers back into typed results.
//!
//! # Overview
//!
//! - **PayloadBuilder**: validates a [`ReportRequest`] and shapes it into the
//!   [`TemplatePayload`] the report template expects.
//! - **JsReportClient**: authenticated HTTP calls (render, list templates,
//!   template info, raw HTML render) behind the [`ReportBackend`] trait.
//! - **Error**: one tagged error type for validation, upstream, transport
//!   and not-found failures.
//!
//! # Example
//!
//! ```no_run
//! use jsreport::{
//!     JsReportClient, PayloadBuilder, ReportBackend, ReportRequest, ServiceAuth, ServiceConfig,
//! };
//!
//! # async fn example() -> jsreport::Result<()> {
//! let auth = ServiceAuth::Basic {
//!     username: "admin".into(),
//!     password: "secret".into(),
//! };
//! let config = ServiceConfig::new("http://localhost:5488", auth);
//! let client = JsReportClient::new(&config)?;
//! let builder = PayloadBuilder::new(&config.default_template);
//!
//! let request = ReportRequest {
//!     title: "Fuel Report".into(),
//!     subtitle: "Data Analysis".into(),
//!     client_name: "Quality Station".into(),
//!     period: "01/01/2026 - 20/01/2026".into(),
//!     report_type: "Fuel".into(),
//!     ..Default::default()
//! };
//! let report = builder.build(request)?;
//! let pdf = client.render(&report.template_name, &report.payload).await?;
//! std::fs::write("report.pdf", &pdf.bytes).ok();
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod payload;
mod request;
mod template;

pub use client::{JsReportClient, PDF_CONTENT_TYPE, RenderedReport, ReportBackend};
pub use config::{
    CatalogApi, DEFAULT_BASE_URL, DEFAULT_TEMPLATE, DEFAULT_TIMEOUT, ServiceAuth, ServiceConfig,
};
pub use error::{BODY_EXCERPT_LEN, Error, ErrorKind, Result, ValidationError, Violation};
pub use payload::{
    BuiltReport, GENERATED_DATE_FORMAT, MAX_SUMMARY_CARDS, PayloadBuilder, TemplatePayload,
};
pub use request::{DEFAULT_ENGINE, DEFAULT_RECIPE, RawRenderOptions, ReportRequest, SummaryCard};
pub use template::TemplateDescriptor;

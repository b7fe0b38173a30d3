//! MCP (Model Context Protocol) tool server for JSReport.
//!
//! This crate exposes report generation to AI agents as four tools:
//!
//! - `generate_report`: build a data report and render it to PDF
//! - `list_templates`: list the templates stored on the service
//! - `get_template_info`: details of a single template
//! - `render_custom_html`: render ad-hoc HTML to PDF
//!
//! # Example
//!
//! ```no_run
//! use jsreport::{JsReportClient, PayloadBuilder, ServiceAuth, ServiceConfig};
//! use mcp::ReportServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = ServiceAuth::Basic {
//!     username: "admin".into(),
//!     password: "secret".into(),
//! };
//! let config = ServiceConfig::new("http://localhost:5488", auth);
//! let client = JsReportClient::new(&config)?;
//!
//! ReportServer::new(client, PayloadBuilder::new(&config.default_template))
//!     .serve_stdio()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod dispatcher;
mod error;
mod protocol;
mod server;

pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use protocol::{
    RenderHtmlArgs, RenderReply, TemplateInfoArgs, TemplateInfoReply, TemplateListReply,
    ToolFailure,
};
pub use server::ReportServer;

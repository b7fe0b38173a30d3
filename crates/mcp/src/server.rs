//! MCP tool server (stdio transport).

use std::sync::Arc;

use jsreport::{JsReportClient, PayloadBuilder, ReportRequest};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData, ServerHandler, ServiceExt, tool, tool_handler, tool_router};
use serde::Serialize;
use tracing::{info, warn};

use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::protocol::{RenderHtmlArgs, TemplateInfoArgs, ToolFailure};

const INSTRUCTIONS: &str = "Generates PDF reports through JSReport. Use generate_report for \
     data reports with summary cards and a table, list_templates / get_template_info to inspect \
     available templates, and render_custom_html for one-off HTML layouts. PDFs are returned \
     base64 encoded in pdf_base64.";

/// Exposes the reporting tools to MCP clients.
#[derive(Clone)]
pub struct ReportServer {
    dispatcher: Arc<Dispatcher<JsReportClient>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ReportServer {
    pub fn new(client: JsReportClient, builder: PayloadBuilder) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(client, builder)),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Generate a PDF data report (title, client, period, up to 3 summary cards \
                       and a data table) from a JSReport template. Returns the PDF base64 encoded."
    )]
    async fn generate_report(
        &self,
        Parameters(request): Parameters<ReportRequest>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        info!(tool = "generate_report", client = %request.client_name, "tool call");
        tool_result(self.dispatcher.generate_report(request).await)
    }

    #[tool(description = "List the templates available on the JSReport server.")]
    async fn list_templates(&self) -> std::result::Result<CallToolResult, ErrorData> {
        info!(tool = "list_templates", "tool call");
        tool_result(self.dispatcher.list_templates().await)
    }

    #[tool(description = "Show engine, recipe and other details of one JSReport template.")]
    async fn get_template_info(
        &self,
        Parameters(args): Parameters<TemplateInfoArgs>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        info!(tool = "get_template_info", template = %args.template_name, "tool call");
        tool_result(self.dispatcher.get_template_info(&args.template_name).await)
    }

    #[tool(
        description = "Render custom HTML (Handlebars placeholders allowed) to PDF without a \
                       stored template. Returns the PDF base64 encoded."
    )]
    async fn render_custom_html(
        &self,
        Parameters(args): Parameters<RenderHtmlArgs>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        info!(tool = "render_custom_html", size = args.html_content.len(), "tool call");
        tool_result(self.dispatcher.render_custom_html(args).await)
    }
}

impl ReportServer {
    /// Serve on stdin/stdout until the client disconnects.
    pub async fn serve_stdio(self) -> crate::error::Result<()> {
        info!(service = %self.dispatcher.backend(), "MCP server listening on stdio");

        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| Error::Initialize(e.to_string()))?;
        let reason = service.waiting().await?;

        info!(?reason, "MCP server stopped");
        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for ReportServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }
}

/// Converts a dispatcher outcome into a tool result.
///
/// Service failures become `is_error` results the agent can read; only a
/// reply that cannot be serialized is a protocol error.
fn tool_result<T: Serialize>(
    outcome: jsreport::Result<T>,
) -> std::result::Result<CallToolResult, ErrorData> {
    let (text, failed) = match outcome {
        Ok(reply) => (serde_json::to_string_pretty(&reply), false),
        Err(err) => {
            warn!(kind = %err.kind(), error = %err, "tool call failed");
            (serde_json::to_string_pretty(&ToolFailure::from(&err)), true)
        }
    };
    let text = text.map_err(|e| ErrorData::internal_error(e.to_string(), None))?;

    if failed {
        Ok(CallToolResult::error(vec![Content::text(text)]))
    } else {
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsreport::{ServiceAuth, ServiceConfig};

    fn server() -> ReportServer {
        // Port 9 (discard) is never a JSReport server; tests below must not reach it.
        let config = ServiceConfig::new("http://127.0.0.1:9", ServiceAuth::Bearer("t".into()));
        let client = JsReportClient::new(&config).unwrap();
        ReportServer::new(client, PayloadBuilder::new(&config.default_template))
    }

    #[test]
    fn exposes_the_four_tools() {
        let mut names: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            [
                "generate_report",
                "get_template_info",
                "list_templates",
                "render_custom_html"
            ]
        );
    }

    #[test]
    fn server_info_enables_tools() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("generate_report"));
    }

    #[tokio::test]
    async fn validation_failure_is_an_error_result() {
        let request = ReportRequest {
            title: "Sales".into(),
            ..Default::default()
        };
        let result = server()
            .generate_report(Parameters(request))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn blank_html_is_an_error_result() {
        let result = server()
            .render_custom_html(Parameters(RenderHtmlArgs::default()))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}

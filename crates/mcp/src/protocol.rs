//! Tool argument and result types.
//!
//! These shapes are what agents see: argument schemas are derived with
//! `schemars`, results are serialized to JSON text content.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsreport::{ErrorKind, RenderedReport, TemplateDescriptor, Violation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arguments of `get_template_info`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TemplateInfoArgs {
    /// Template name (e.g. "data-report").
    pub template_name: String,
}

/// Arguments of `render_custom_html`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct RenderHtmlArgs {
    /// HTML content, may contain Handlebars placeholders (e.g. {{title}}).
    pub html_content: String,

    /// Values for the placeholders.
    #[serde(default)]
    pub data: Option<Map<String, Value>>,

    /// JSReport recipe. Defaults to "chrome-pdf".
    #[serde(default)]
    pub recipe: Option<String>,

    /// Template engine. Defaults to "handlebars".
    #[serde(default)]
    pub engine: Option<String>,
}

/// A rendered PDF, base64 encoded for transport.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReply {
    pub success: bool,
    pub message: String,
    pub pdf_base64: String,
    pub content_type: String,
    pub size_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_used: Option<String>,
}

impl RenderReply {
    pub fn new(message: impl Into<String>, report: &RenderedReport) -> Self {
        Self {
            success: true,
            message: message.into(),
            pdf_base64: STANDARD.encode(&report.bytes),
            content_type: report.content_type.clone(),
            size_bytes: report.size(),
            template_used: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template_used = Some(template.into());
        self
    }
}

/// Result of `list_templates`.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateListReply {
    pub success: bool,
    pub count: usize,
    pub templates: Vec<TemplateDescriptor>,
}

impl From<Vec<TemplateDescriptor>> for TemplateListReply {
    fn from(templates: Vec<TemplateDescriptor>) -> Self {
        Self {
            success: true,
            count: templates.len(),
            templates,
        }
    }
}

/// Result of `get_template_info`.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfoReply {
    pub success: bool,
    pub template: TemplateDescriptor,
}

impl From<TemplateDescriptor> for TemplateInfoReply {
    fn from(template: TemplateDescriptor) -> Self {
        Self {
            success: true,
            template,
        }
    }
}

/// Body of a failed tool call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolFailure {
    pub success: bool,
    pub error_kind: ErrorKind,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_reply_encodes_pdf() {
        let report = RenderedReport {
            bytes: b"%PDF-1.7".to_vec(),
            content_type: "application/pdf".into(),
        };
        let reply = RenderReply::new("Report generated", &report).with_template("data-report");
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "Report generated",
                "pdf_base64": "JVBERi0xLjc=",
                "content_type": "application/pdf",
                "size_bytes": 8,
                "template_used": "data-report"
            })
        );
    }

    #[test]
    fn html_args_defaults() {
        let args: RenderHtmlArgs =
            serde_json::from_value(json!({"html_content": "<p>hi</p>"})).unwrap();
        assert!(args.data.is_none());
        assert!(args.recipe.is_none());
    }
}

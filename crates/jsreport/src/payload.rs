//! Report payload builder.
//!
//! Turns a [`ReportRequest`] into the data object the report template
//! expects. The field names of [`TemplatePayload`] are a contract with the
//! templates stored on the service and must not change.

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::request::{ReportRequest, SummaryCard};

/// Maximum number of summary cards a template lays out.
pub const MAX_SUMMARY_CARDS: usize = 3;

/// Format of the default generation date.
pub const GENERATED_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Data handed to the report template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    pub report_title: String,
    pub report_subtitle: String,
    pub client_name: String,
    pub period: String,
    pub report_type: String,
    pub generated_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_cards: Option<Vec<SummaryCard>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_headers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_data: Option<Vec<Vec<Value>>>,
}

/// A validated report, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltReport {
    pub template_name: String,
    pub payload: TemplatePayload,
}

/// Validates report requests and maps them onto the template contract.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    default_template: String,
}

impl PayloadBuilder {
    pub fn new(default_template: impl Into<String>) -> Self {
        Self {
            default_template: default_template.into(),
        }
    }

    /// Build a report, stamping it with the current local time if needed.
    pub fn build(&self, request: ReportRequest) -> Result<BuiltReport, ValidationError> {
        self.build_at(request, Local::now())
    }

    /// Build a report using `now` as the default generation date.
    pub fn build_at(
        &self,
        request: ReportRequest,
        now: DateTime<Local>,
    ) -> Result<BuiltReport, ValidationError> {
        validate(&request)?;

        let template_name = present(request.template_name)
            .unwrap_or_else(|| self.default_template.clone());
        let generated_date = present(request.generated_date)
            .unwrap_or_else(|| now.format(GENERATED_DATE_FORMAT).to_string());

        let payload = TemplatePayload {
            report_title: request.title,
            report_subtitle: request.subtitle,
            client_name: request.client_name,
            period: request.period,
            report_type: request.report_type,
            generated_date,
            summary_cards: request.summary_cards.filter(|c| !c.is_empty()),
            table_title: present(request.table_title),
            table_headers: request.table_headers.filter(|h| !h.is_empty()),
            table_data: request.table_data.filter(|d| !d.is_empty()),
        };

        Ok(BuiltReport {
            template_name,
            payload,
        })
    }
}

fn validate(request: &ReportRequest) -> Result<(), ValidationError> {
    let mut errors = ValidationError::new();

    let required = [
        ("title", &request.title),
        ("subtitle", &request.subtitle),
        ("client_name", &request.client_name),
        ("period", &request.period),
        ("report_type", &request.report_type),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(field, "is required");
        }
    }

    if let Some(cards) = &request.summary_cards {
        if cards.len() > MAX_SUMMARY_CARDS {
            errors.push(
                "summary_cards",
                format!("has {} entries (max {MAX_SUMMARY_CARDS})", cards.len()),
            );
        }
        for (i, card) in cards.iter().enumerate() {
            if card.title.trim().is_empty() {
                errors.push(format!("summary_cards[{i}].title"), "is required");
            }
        }
    }

    let headers = request.table_headers.as_deref().unwrap_or_default();
    if let Some(rows) = request.table_data.as_deref().filter(|r| !r.is_empty()) {
        if headers.is_empty() {
            errors.push("table_headers", "is required when table_data is given");
        } else {
            for (i, row) in rows.iter().enumerate() {
                if row.len() != headers.len() {
                    errors.push(
                        format!("table_data[{i}]"),
                        format!("has {} cells, expected {}", row.len(), headers.len()),
                    );
                }
            }
        }
    }

    errors.into_result()
}

/// Treats blank optional strings as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

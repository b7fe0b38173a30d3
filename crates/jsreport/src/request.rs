//! Agent-facing request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Recipe used for ad-hoc HTML renders.
pub const DEFAULT_RECIPE: &str = "chrome-pdf";

/// Template engine used for ad-hoc HTML renders.
pub const DEFAULT_ENGINE: &str = "handlebars";

/// Parameters of a data report, as supplied by an agent.
///
/// The tool schema marks the first five fields required. Absent and blank
/// values are both caught by [`PayloadBuilder`](crate::PayloadBuilder), which
/// reports all of them at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReportRequest {
    /// Main report title.
    #[serde(default, alias = "report_title")]
    #[schemars(required)]
    pub title: String,

    /// Report subtitle (e.g. "Data Analysis - Fuel Station").
    #[serde(default, alias = "report_subtitle")]
    #[schemars(required)]
    pub subtitle: String,

    /// Client or site the report is about.
    #[serde(default)]
    #[schemars(required)]
    pub client_name: String,

    /// Period covered (e.g. "01/01/2026 - 20/01/2026").
    #[serde(default)]
    #[schemars(required)]
    pub period: String,

    /// Kind of report (e.g. "Sales", "Products").
    #[serde(default)]
    #[schemars(required)]
    pub report_type: String,

    /// Generation date, format DD/MM/YYYY HH:MM:SS. Defaults to now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_date: Option<String>,

    /// Up to 3 headline metrics, each with a title and a value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_cards: Option<Vec<SummaryCard>>,

    /// Heading shown above the data table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_title: Option<String>,

    /// Column headers of the data table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_headers: Option<Vec<String>>,

    /// Table rows; each row has one cell per header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_data: Option<Vec<Vec<Value>>>,

    /// Template to render with. Defaults to the configured template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
}

/// A headline metric shown above the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryCard {
    /// Metric name (e.g. "Total Revenue").
    #[serde(alias = "label")]
    pub title: String,

    /// Metric value, usually preformatted text.
    pub value: Value,

    /// Any further keys are handed to the template unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SummaryCard {
    pub fn new(title: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }
}

/// Options for rendering raw HTML without a stored template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRenderOptions {
    pub recipe: String,
    pub engine: String,
    pub data: Option<Value>,
}

impl Default for RawRenderOptions {
    fn default() -> Self {
        Self {
            recipe: DEFAULT_RECIPE.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            data: None,
        }
    }
}

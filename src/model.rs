// Declarative chart description as emitted by a caller (e.g. an agent tool call)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One data row: field name → value, in the order the caller wrote them
pub type Record = Map<String, Value>;

/// Named stack groups: group id → ordered member fields
pub type StackGroups = IndexMap<String, Vec<String>>;

/// Complete chart description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_keys: Option<Vec<String>>,
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ChartConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_groups: Option<StackGroups>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_total: Option<bool>,
}

impl ChartSpec {
    /// Minimal spec with no data; mostly useful for building specs in code
    pub fn new(chart_type: ChartType, title: impl Into<String>) -> Self {
        Self {
            chart_type,
            title: title.into(),
            description: None,
            category_key: None,
            value_keys: None,
            data: Vec::new(),
            legend: None,
            config: None,
            orientation: None,
            stacked: None,
            stack_groups: None,
            show_total: None,
        }
    }

    /// Bar and line charts show a legend unless told otherwise; the other
    /// types only when asked.
    pub fn legend_enabled(&self) -> bool {
        match self.chart_type {
            ChartType::Bar | ChartType::Line => self.legend.unwrap_or(true),
            _ => self.legend.unwrap_or(false),
        }
    }

    pub fn is_stacked(&self) -> bool {
        self.stacked.unwrap_or(false)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation.unwrap_or_default()
    }

    /// Donut charts show their total unless disabled
    pub fn show_total(&self) -> bool {
        self.show_total.unwrap_or(true)
    }
}

/// Chart type tag.
///
/// Unrecognised tags are kept in `Unsupported` so a newer producer can talk to
/// an older renderer; the dispatcher turns them into a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartType {
    Bar,
    Line,
    Area,
    Pie,
    Donut,
    Radial,
    Unsupported(String),
}

impl ChartType {
    pub fn as_str(&self) -> &str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Pie => "pie",
            ChartType::Donut => "donut",
            ChartType::Radial => "radial",
            ChartType::Unsupported(tag) => tag,
        }
    }
}

impl From<String> for ChartType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "bar" => ChartType::Bar,
            "line" => ChartType::Line,
            "area" => ChartType::Area,
            "pie" => ChartType::Pie,
            "donut" => ChartType::Donut,
            "radial" => ChartType::Radial,
            _ => ChartType::Unsupported(tag),
        }
    }
}

impl From<ChartType> for String {
    fn from(chart_type: ChartType) -> Self {
        chart_type.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// Color and label overrides.
///
/// `series` is keyed by data field name (cartesian charts: bar, line, area),
/// `items` by category value (polar charts: pie, donut, radial).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<ConfigEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ConfigEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            color: None,
            label: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

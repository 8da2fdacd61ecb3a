//! Color and label assignment for chart keys.
//!
//! Explicit values come from the chart config through [`merge_config`];
//! everything else falls back to the five theme chart tokens.

use indexmap::IndexMap;

use crate::ir::{ColorMap, LabelMap};
use crate::model::ChartConfig;

/// Theme chart tokens, resolved to concrete colors by the theme at draw time
pub const FALLBACK_PALETTE: [&str; 5] = [
    "hsl(var(--chart-1))",
    "hsl(var(--chart-2))",
    "hsl(var(--chart-3))",
    "hsl(var(--chart-4))",
    "hsl(var(--chart-5))",
];

/// Palette entry for a position, cycling every five
pub fn fallback_color(index: usize) -> &'static str {
    FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()]
}

/// Explicit colors and labels taken from a chart config
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigOverrides {
    pub colors: IndexMap<String, String>,
    pub labels: IndexMap<String, String>,
}

/// Merge `series` then `items` into one table.
///
/// Precedence: entries are applied in order, `series` first and `items`
/// second, and a later entry for the same key replaces the earlier one. So
/// when a key appears in both tables, `items` wins. Empty colors and labels
/// are skipped and never clear an earlier value.
pub fn merge_config(config: Option<&ChartConfig>) -> ConfigOverrides {
    let mut merged = ConfigOverrides::default();
    let Some(config) = config else {
        return merged;
    };

    let entries = config
        .series
        .iter()
        .flatten()
        .chain(config.items.iter().flatten());

    for entry in entries {
        if let Some(color) = entry.color.as_deref().filter(|c| !c.is_empty()) {
            merged.colors.insert(entry.key.clone(), color.to_string());
        }
        if let Some(label) = entry.label.as_deref().filter(|l| !l.is_empty()) {
            merged.labels.insert(entry.key.clone(), label.to_string());
        }
    }

    merged
}

/// Colors for every configured key plus every resolved value key.
///
/// A value key without an explicit color gets `FALLBACK_PALETTE[i % 5]`,
/// where `i` is its position in `value_keys`.
pub fn resolve_colors(config: Option<&ChartConfig>, value_keys: &[String]) -> ColorMap {
    let mut colors = merge_config(config).colors;

    for (index, key) in value_keys.iter().enumerate() {
        if !colors.contains_key(key) {
            colors.insert(key.clone(), fallback_color(index).to_string());
        }
    }

    colors
}

/// Labels for every configured key plus every resolved value key; value keys
/// without a configured label are labelled with the key itself.
pub fn resolve_labels(config: Option<&ChartConfig>, value_keys: &[String]) -> LabelMap {
    let mut labels = merge_config(config).labels;

    for key in value_keys {
        if !labels.contains_key(key) {
            labels.insert(key.clone(), key.clone());
        }
    }

    labels
}

/// Label for any key, including category values that are not in the map
pub fn label_for<'a>(labels: &'a LabelMap, key: &'a str) -> &'a str {
    labels.get(key).map(String::as_str).unwrap_or(key)
}

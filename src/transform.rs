use indexmap::IndexMap;

use crate::data::{display_value, plot_value};
use crate::ir::{BarSegment, ColorMap, RadialBar, ResolvedChart, SeriesPath, Slice};
use crate::model::{ChartSpec, Record};
use crate::palette::fallback_color;
use crate::stack::StackLayout;

/// Category axis labels, one per row
pub fn category_labels(data: &[Record], category: &str) -> Vec<String> {
    data.iter()
        .map(|row| display_value(row.get(category)))
        .collect()
}

/// Plotted values of one key, one per row
pub fn series_column(data: &[Record], key: &str) -> Vec<Option<f64>> {
    data.iter().map(|row| plot_value(row.get(key))).collect()
}

/// Build bar rectangles for every (value key, category) pair.
///
/// Stacked segments accumulate per (stack id, category) in value-key order;
/// positive and negative values grow away from zero independently. Each stack
/// id, or each key when unstacked, gets its own side-by-side slot.
pub fn bar_segments(spec: &ChartSpec, resolved: &ResolvedChart) -> (Vec<BarSegment>, usize) {
    let keys = &resolved.keys.values;
    let layout = StackLayout::new(
        spec.is_stacked(),
        spec.stack_groups.as_ref(),
        spec.orientation(),
        keys.len(),
    );

    let mut slots: IndexMap<String, usize> = IndexMap::new();
    // (slot, category) -> (positive top, negative bottom)
    let mut running: IndexMap<(usize, usize), (f64, f64)> = IndexMap::new();
    let mut segments = Vec::new();

    for (index, key) in keys.iter().enumerate() {
        let stacking = layout.resolve(key, index);
        let slot_name = stacking.stack_id.clone().unwrap_or_else(|| key.clone());
        let next = slots.len();
        let slot = *slots.entry(slot_name).or_insert(next);
        let color = series_color(&resolved.colors, key, index);

        for (category_index, value) in series_column(&spec.data, key).into_iter().enumerate() {
            let Some(value) = value else { continue };

            let (start, end) = if stacking.stack_id.is_some() {
                let acc = running.entry((slot, category_index)).or_insert((0.0, 0.0));
                if value >= 0.0 {
                    let start = acc.0;
                    acc.0 += value;
                    (start, acc.0)
                } else {
                    let start = acc.1;
                    acc.1 += value;
                    (start, acc.1)
                }
            } else {
                (0.0, value)
            };

            segments.push(BarSegment {
                key: key.clone(),
                category_index,
                slot,
                start,
                end,
                color: color.clone(),
                radius: stacking.radius,
                stack_id: stacking.stack_id.clone(),
            });
        }
    }

    (segments, slots.len())
}

/// One path per value key
pub fn series_paths(
    spec: &ChartSpec,
    resolved: &ResolvedChart,
    fill_opacity: Option<f64>,
) -> Vec<SeriesPath> {
    resolved
        .keys
        .values
        .iter()
        .enumerate()
        .map(|(index, key)| SeriesPath {
            key: key.clone(),
            color: series_color(&resolved.colors, key, index),
            points: series_column(&spec.data, key),
            fill_opacity,
        })
        .collect()
}

/// Per-row fill for proportional charts: the category value's color, then
/// the first value key's color, then the palette by row position
pub fn item_fill(colors: &ColorMap, name: &str, value_keys: &[String], row: usize) -> String {
    colors
        .get(name)
        .or_else(|| value_keys.first().and_then(|k| colors.get(k)))
        .cloned()
        .unwrap_or_else(|| fallback_color(row).to_string())
}

/// Slices of the first value key, sweeping counter-clockwise from 0°.
/// Missing and negative values take no angle.
pub fn pie_slices(spec: &ChartSpec, resolved: &ResolvedChart) -> Vec<Slice> {
    let keys = &resolved.keys;
    let Some(value_key) = keys.values.first() else {
        return Vec::new();
    };

    let names = category_labels(&spec.data, &keys.category);
    let values: Vec<f64> = series_column(&spec.data, value_key)
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
    let sum: f64 = values.iter().map(|v| v.max(0.0)).sum();

    let mut angle = 0.0;
    names
        .into_iter()
        .zip(values)
        .enumerate()
        .map(|(row, (name, value))| {
            let sweep = if sum > 0.0 {
                value.max(0.0) / sum * 360.0
            } else {
                0.0
            };
            let slice = Slice {
                color: item_fill(&resolved.colors, &name, &keys.values, row),
                name,
                value,
                start_angle: angle,
                end_angle: angle + sweep,
            };
            angle += sweep;
            slice
        })
        .collect()
}

/// One ring per row, innermost first
pub fn radial_bars(spec: &ChartSpec, resolved: &ResolvedChart) -> Vec<RadialBar> {
    let keys = &resolved.keys;
    let Some(value_key) = keys.values.first() else {
        return Vec::new();
    };

    category_labels(&spec.data, &keys.category)
        .into_iter()
        .zip(series_column(&spec.data, value_key))
        .enumerate()
        .map(|(ring, (name, value))| RadialBar {
            color: item_fill(&resolved.colors, &name, &keys.values, ring),
            name,
            value: value.unwrap_or(0.0),
            ring,
        })
        .collect()
}

fn series_color(colors: &ColorMap, key: &str, index: usize) -> String {
    colors
        .get(key)
        .cloned()
        .unwrap_or_else(|| fallback_color(index).to_string())
}

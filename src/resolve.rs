use crate::data::is_numeric;
use crate::ir::{ResolvedChart, ResolvedKeys};
use crate::model::{ChartSpec, Record};
use crate::palette::{resolve_colors, resolve_labels};

/// Resolve keys, colors and labels for a chart
pub fn resolve_chart(spec: &ChartSpec) -> ResolvedChart {
    let keys = resolve_keys(
        &spec.data,
        spec.category_key.as_deref(),
        spec.value_keys.as_deref(),
    );
    let colors = resolve_colors(spec.config.as_ref(), &keys.values);
    let labels = resolve_labels(spec.config.as_ref(), &keys.values);

    ResolvedChart {
        keys,
        colors,
        labels,
    }
}

/// Decide which field is the category axis and which fields are plotted.
///
/// Only the first record is inspected; later rows are not re-validated.
pub fn resolve_keys(
    data: &[Record],
    category_key: Option<&str>,
    value_keys: Option<&[String]>,
) -> ResolvedKeys {
    let Some(first) = data.first() else {
        return ResolvedKeys::default();
    };

    let all_keys: Vec<String> = first.keys().cloned().collect();

    // An empty category key counts as not given
    let category = match category_key {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => all_keys.first().cloned().unwrap_or_default(),
    };

    let values = match value_keys {
        Some(keys) => keys.to_vec(),
        None => infer_value_keys(first, &all_keys, &category),
    };

    ResolvedKeys {
        category,
        values,
        all_keys,
    }
}

/// Numeric non-category fields of the first row, or the first
/// non-category field when none is numeric
fn infer_value_keys(first: &Record, all_keys: &[String], category: &str) -> Vec<String> {
    let numeric: Vec<String> = all_keys
        .iter()
        .filter(|key| key.as_str() != category)
        .filter(|key| first.get(key.as_str()).is_some_and(is_numeric))
        .cloned()
        .collect();

    if !numeric.is_empty() {
        return numeric;
    }

    all_keys
        .iter()
        .find(|key| key.as_str() != category)
        .cloned()
        .into_iter()
        .collect()
}

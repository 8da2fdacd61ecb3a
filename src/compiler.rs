use anyhow::{ensure, Result};
use tracing::debug;

use crate::data::{coerce_number, format_grouped};
use crate::ir::{
    BarScene, CartesianScene, ChartBody, ChartScene, LegendEntry, PieScene, RadialScene,
    ResolvedChart, TotalLabel,
};
use crate::model::{ChartSpec, ChartType};
use crate::palette::label_for;
use crate::resolve::resolve_chart;
use crate::scale::value_domain;
use crate::transform::{
    bar_segments, category_labels, pie_slices, radial_bars, series_paths,
};
use crate::view::View;

/// Fill opacity of area charts
pub const AREA_FILL_OPACITY: f64 = 0.1;

/// Donut hole as a fraction of the outer radius
pub const DONUT_INNER_RATIO: f64 = 0.6;

/// Caption under the donut total
pub const TOTAL_CAPTION: &str = "Total";

/// Chart type dispatcher: resolve the spec and build the scene for its type.
///
/// Unknown type tags produce [`View::Unsupported`] rather than an error.
pub fn compile_chart(spec: &ChartSpec) -> Result<View> {
    let resolved = resolve_chart(spec);
    debug!(
        chart_type = spec.chart_type.as_str(),
        category = %resolved.keys.category,
        values = ?resolved.keys.values,
        "resolved chart keys"
    );

    let body = match &spec.chart_type {
        ChartType::Bar => ChartBody::Bar(compile_bar(spec, &resolved)?),
        ChartType::Line => ChartBody::Line(compile_cartesian(spec, &resolved, None)?),
        ChartType::Area => {
            ChartBody::Area(compile_cartesian(spec, &resolved, Some(AREA_FILL_OPACITY))?)
        }
        ChartType::Pie => ChartBody::Pie(compile_pie(spec, &resolved, 0.0)),
        ChartType::Donut => ChartBody::Pie(compile_pie(spec, &resolved, DONUT_INNER_RATIO)),
        ChartType::Radial => ChartBody::Radial(compile_radial(spec, &resolved)),
        ChartType::Unsupported(tag) => {
            return Ok(View::Unsupported {
                chart_type: tag.clone(),
            })
        }
    };

    let legend = if spec.legend_enabled() {
        legend_entries(&body, &resolved)
    } else {
        Vec::new()
    };

    Ok(View::Chart(ChartScene {
        title: spec.title.clone(),
        description: spec.description.clone(),
        legend,
        body,
    }))
}

fn compile_bar(spec: &ChartSpec, resolved: &ResolvedChart) -> Result<BarScene> {
    let (segments, slot_count) = bar_segments(spec, resolved);
    ensure!(
        segments.iter().all(|s| s.start.is_finite() && s.end.is_finite()),
        "stacked bar values overflow"
    );
    let value_domain = value_domain(
        segments.iter().flat_map(|s| [s.start, s.end]),
        true,
    );
    ensure!(
        value_domain.0.is_finite() && value_domain.1.is_finite(),
        "bar values overflow the value axis"
    );

    Ok(BarScene {
        orientation: spec.orientation(),
        categories: category_labels(&spec.data, &resolved.keys.category),
        value_domain,
        slot_count,
        segments,
    })
}

fn compile_cartesian(
    spec: &ChartSpec,
    resolved: &ResolvedChart,
    fill_opacity: Option<f64>,
) -> Result<CartesianScene> {
    let series = series_paths(spec, resolved, fill_opacity);
    // areas fill down to zero, lines only need their own range
    let value_domain = value_domain(
        series.iter().flat_map(|s| s.points.iter().flatten().copied()),
        fill_opacity.is_some(),
    );
    ensure!(
        value_domain.0.is_finite() && value_domain.1.is_finite(),
        "series values overflow the value axis"
    );

    Ok(CartesianScene {
        categories: category_labels(&spec.data, &resolved.keys.category),
        value_domain,
        series,
    })
}

fn compile_pie(spec: &ChartSpec, resolved: &ResolvedChart, inner_radius_ratio: f64) -> PieScene {
    let total = (inner_radius_ratio > 0.0 && spec.show_total()).then(|| {
        let value = donut_total(spec, resolved);
        TotalLabel {
            value,
            text: format_grouped(value),
        }
    });

    PieScene {
        slices: pie_slices(spec, resolved),
        inner_radius_ratio,
        total,
    }
}

/// Sum of the first value key over every row with loose numeric coercion
pub fn donut_total(spec: &ChartSpec, resolved: &ResolvedChart) -> f64 {
    let Some(key) = resolved.keys.values.first() else {
        return 0.0;
    };
    spec.data.iter().map(|row| coerce_number(row.get(key))).sum()
}

fn compile_radial(spec: &ChartSpec, resolved: &ResolvedChart) -> RadialScene {
    let bars = radial_bars(spec, resolved);
    let max_value = bars.iter().map(|b| b.value).fold(0.0, f64::max);
    RadialScene { bars, max_value }
}

/// Series charts list their value keys; proportional charts list their rows
fn legend_entries(body: &ChartBody, resolved: &ResolvedChart) -> Vec<LegendEntry> {
    let entry = |key: &str, color: &str| LegendEntry {
        key: key.to_string(),
        label: label_for(&resolved.labels, key).to_string(),
        color: color.to_string(),
    };

    match body {
        ChartBody::Bar(_) | ChartBody::Line(_) | ChartBody::Area(_) => resolved
            .keys
            .values
            .iter()
            .map(|key| {
                let color = resolved.colors.get(key).map(String::as_str).unwrap_or_default();
                entry(key, color)
            })
            .collect(),
        ChartBody::Pie(pie) => pie.slices.iter().map(|s| entry(&s.name, &s.color)).collect(),
        ChartBody::Radial(radial) => radial.bars.iter().map(|b| entry(&b.name, &b.color)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChartConfig, ConfigEntry, Orientation};
    use serde_json::json;

    fn spec(chart_type: &str, data: serde_json::Value) -> ChartSpec {
        let mut spec = ChartSpec::new(ChartType::from(chart_type.to_string()), "Test chart");
        spec.data = crate::data::records_from_json(&data).unwrap();
        spec
    }

    fn scene(view: View) -> ChartScene {
        match view {
            View::Chart(scene) => scene,
            other => panic!("expected chart, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_type_placeholder() {
        let view = compile_chart(&spec("sankey", json!([{ "a": "x", "b": 1 }]))).unwrap();
        assert_eq!(
            view,
            View::Unsupported {
                chart_type: "sankey".into()
            }
        );
        assert_eq!(view.to_string().trim(), "Unsupported chart type: sankey");
    }

    #[test]
    fn test_simple_bar() {
        let s = spec(
            "bar",
            json!([
                { "sector": "Services", "gdp": 9800 },
                { "sector": "Industry", "gdp": 4200 }
            ]),
        );
        let scene = scene(compile_chart(&s).unwrap());
        let ChartBody::Bar(bar) = &scene.body else {
            panic!("expected bar body");
        };
        assert_eq!(bar.categories, vec!["Services", "Industry"]);
        assert_eq!(bar.orientation, Orientation::Vertical);
        assert_eq!(bar.slot_count, 1);
        assert_eq!(bar.value_domain.0, 0.0);
        assert!(bar.value_domain.1 > 9800.0);
        assert_eq!(scene.legend.len(), 1);
        assert_eq!(scene.legend[0].color, "hsl(var(--chart-1))");
    }

    #[test]
    fn test_legend_defaults_per_type() {
        let data = json!([{ "m": "Jan", "v": 1 }]);
        for (ty, expected) in [
            ("bar", true),
            ("line", true),
            ("area", false),
            ("pie", false),
            ("donut", false),
            ("radial", false),
        ] {
            let scene = scene(compile_chart(&spec(ty, data.clone())).unwrap());
            assert_eq!(!scene.legend.is_empty(), expected, "legend for {ty}");
        }
    }

    #[test]
    fn test_legend_uses_labels() {
        let mut s = spec("line", json!([{ "m": "Jan", "exports": 1, "imports": 2 }]));
        s.config = Some(ChartConfig {
            series: Some(vec![ConfigEntry::new("exports").with_label("Exports")]),
            items: None,
        });
        let scene = scene(compile_chart(&s).unwrap());
        let labels: Vec<&str> = scene.legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Exports", "imports"]);
    }

    #[test]
    fn test_area_fill_opacity() {
        let s = spec("area", json!([{ "m": "Jan", "v": 5 }, { "m": "Feb", "v": 8 }]));
        let scene = scene(compile_chart(&s).unwrap());
        let ChartBody::Area(area) = &scene.body else {
            panic!("expected area body");
        };
        assert_eq!(area.series[0].fill_opacity, Some(0.1));
        assert_eq!(area.value_domain.0, 0.0);
    }

    #[test]
    fn test_donut_total() {
        let s = spec(
            "donut",
            json!([
                { "source": "Income Tax", "amount": 480 },
                { "source": "VAT", "amount": 260 },
                { "source": "Corporate", "amount": 180 },
                { "source": "Customs", "amount": 30 },
                { "source": "Other", "amount": 50 }
            ]),
        );
        let scene = scene(compile_chart(&s).unwrap());
        let ChartBody::Pie(pie) = &scene.body else {
            panic!("expected pie body");
        };
        assert_eq!(pie.inner_radius_ratio, DONUT_INNER_RATIO);
        let total = pie.total.as_ref().unwrap();
        assert_eq!(total.value, 1000.0);
        assert_eq!(total.text, "1,000");
    }

    #[test]
    fn test_donut_total_coerces_values() {
        let s = spec(
            "donut",
            json!([
                { "n": "a", "v": 10 },
                { "n": "b", "v": "5" },
                { "n": "c", "v": "n/a" },
                { "n": "d" }
            ]),
        );
        let scene = scene(compile_chart(&s).unwrap());
        let ChartBody::Pie(pie) = &scene.body else {
            panic!("expected pie body");
        };
        assert_eq!(pie.total.as_ref().unwrap().value, 15.0);
    }

    #[test]
    fn test_donut_total_can_be_hidden() {
        let mut s = spec("donut", json!([{ "n": "a", "v": 10 }]));
        s.show_total = Some(false);
        let scene = scene(compile_chart(&s).unwrap());
        let ChartBody::Pie(pie) = &scene.body else {
            panic!("expected pie body");
        };
        assert!(pie.total.is_none());
    }

    #[test]
    fn test_pie_has_no_total() {
        let scene = scene(compile_chart(&spec("pie", json!([{ "n": "a", "v": 10 }]))).unwrap());
        let ChartBody::Pie(pie) = &scene.body else {
            panic!("expected pie body");
        };
        assert_eq!(pie.inner_radius_ratio, 0.0);
        assert!(pie.total.is_none());
    }

    #[test]
    fn test_pie_legend_lists_rows_with_item_colors() {
        let mut s = spec(
            "pie",
            json!([{ "region": "Europe", "share": 23 }, { "region": "Asia", "share": 41 }]),
        );
        s.legend = Some(true);
        s.config = Some(ChartConfig {
            series: None,
            items: Some(vec![ConfigEntry::new("Europe")
                .with_color("#8B5CF6")
                .with_label("EU")]),
        });
        let scene = scene(compile_chart(&s).unwrap());
        assert_eq!(scene.legend[0].label, "EU");
        assert_eq!(scene.legend[0].color, "#8B5CF6");
        assert_eq!(scene.legend[1].label, "Asia");
        assert_eq!(scene.legend[1].color, "hsl(var(--chart-1))");
    }

    #[test]
    fn test_radial_max_value() {
        let s = spec(
            "radial",
            json!([{ "k": "growth", "score": 72 }, { "k": "jobs", "score": 64 }]),
        );
        let scene = scene(compile_chart(&s).unwrap());
        let ChartBody::Radial(radial) = &scene.body else {
            panic!("expected radial body");
        };
        assert_eq!(radial.max_value, 72.0);
        assert_eq!(radial.bars.len(), 2);
    }

    #[test]
    fn test_empty_data_compiles() {
        for ty in ["bar", "line", "area", "pie", "donut", "radial"] {
            let view = compile_chart(&spec(ty, json!([]))).unwrap();
            assert!(matches!(view, View::Chart(_)), "{ty}");
        }
    }
}

//! Renderable views and their plain-text form.

use std::fmt;

use crate::data::format_grouped;
use crate::ir::{ChartBody, ChartScene, LegendEntry};
use crate::model::Orientation;
use crate::tools::image_view::{ImageGallery, TileBadge};
use crate::tools::product_view::{ProductGallery, ProductLayout};
use crate::tools::status_view::{LiveRegion, StatusDisplay};

pub const UNSUPPORTED_PREFIX: &str = "Unsupported chart type: ";

/// Everything the canvas knows how to draw
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Chart(ChartScene),
    /// Placeholder for a chart type tag the dispatcher does not know
    Unsupported { chart_type: String },
    /// Error-boundary message shown instead of a chart
    Fallback { message: String },
    Status(StatusDisplay),
    Products(ProductGallery),
    Images(ImageGallery),
}

impl View {
    pub fn kind(&self) -> &'static str {
        match self {
            View::Chart(_) => "chart",
            View::Unsupported { .. } => "unsupported",
            View::Fallback { .. } => "fallback",
            View::Status(_) => "status",
            View::Products(_) => "products",
            View::Images(_) => "images",
        }
    }

    pub fn unsupported_message(chart_type: &str) -> String {
        format!("{UNSUPPORTED_PREFIX}{chart_type}")
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Chart(scene) => write_chart(f, scene),
            View::Unsupported { chart_type } => {
                writeln!(f, "{}", View::unsupported_message(chart_type))
            }
            View::Fallback { message } => writeln!(f, "{message}"),
            View::Status(status) => write_status(f, status),
            View::Products(gallery) => write_products(f, gallery),
            View::Images(gallery) => write_images(f, gallery),
        }
    }
}

fn write_chart(f: &mut fmt::Formatter<'_>, scene: &ChartScene) -> fmt::Result {
    writeln!(f, "{}", scene.title)?;
    if let Some(description) = &scene.description {
        writeln!(f, "{description}")?;
    }

    match &scene.body {
        ChartBody::Bar(bar) => {
            let layout = match bar.orientation {
                Orientation::Horizontal => "horizontal",
                Orientation::Vertical => "vertical",
            };
            writeln!(f, "[bar, {layout}]")?;
            for (i, category) in bar.categories.iter().enumerate() {
                let parts: Vec<String> = bar
                    .segments
                    .iter()
                    .filter(|s| s.category_index == i)
                    .map(|s| {
                        let value = format_grouped(s.end - s.start);
                        match &s.stack_id {
                            Some(stack) => format!("{}={} ({stack})", s.key, value),
                            None => format!("{}={}", s.key, value),
                        }
                    })
                    .collect();
                writeln!(f, "  {category}: {}", parts.join(", "))?;
            }
        }
        ChartBody::Line(cartesian) | ChartBody::Area(cartesian) => {
            let kind = if matches!(scene.body, ChartBody::Line(_)) {
                "line"
            } else {
                "area"
            };
            writeln!(f, "[{kind}]")?;
            for (i, category) in cartesian.categories.iter().enumerate() {
                let parts: Vec<String> = cartesian
                    .series
                    .iter()
                    .map(|s| match s.points.get(i).copied().flatten() {
                        Some(v) => format!("{}={}", s.key, format_grouped(v)),
                        None => format!("{}=-", s.key),
                    })
                    .collect();
                writeln!(f, "  {category}: {}", parts.join(", "))?;
            }
        }
        ChartBody::Pie(pie) => {
            let kind = if pie.inner_radius_ratio > 0.0 { "donut" } else { "pie" };
            writeln!(f, "[{kind}]")?;
            for slice in &pie.slices {
                let share = (slice.end_angle - slice.start_angle) / 360.0 * 100.0;
                writeln!(
                    f,
                    "  {}: {} ({share:.1}%)",
                    slice.name,
                    format_grouped(slice.value)
                )?;
            }
            if let Some(total) = &pie.total {
                writeln!(f, "  Total: {}", total.text)?;
            }
        }
        ChartBody::Radial(radial) => {
            writeln!(f, "[radial]")?;
            for bar in &radial.bars {
                writeln!(f, "  {}: {}", bar.name, format_grouped(bar.value))?;
            }
        }
    }

    write_legend(f, &scene.legend)
}

fn write_legend(f: &mut fmt::Formatter<'_>, legend: &[LegendEntry]) -> fmt::Result {
    if legend.is_empty() {
        return Ok(());
    }
    let labels: Vec<&str> = legend.iter().map(|e| e.label.as_str()).collect();
    writeln!(f, "Legend: {}", labels.join(" | "))
}

fn write_status(f: &mut fmt::Formatter<'_>, status: &StatusDisplay) -> fmt::Result {
    let live = match status.live_region() {
        LiveRegion::Polite => " (live)",
        LiveRegion::Off => "",
    };
    writeln!(f, "[{}]{live} {}", status.badge(), status.title)?;
    writeln!(f, "  {}", status.description)
}

fn write_products(f: &mut fmt::Formatter<'_>, gallery: &ProductGallery) -> fmt::Result {
    match gallery.layout {
        ProductLayout::Single => writeln!(f, "[product]")?,
        ProductLayout::Carousel { navigation } => {
            let nav = if navigation { ", < >" } else { "" };
            writeln!(f, "[carousel: {} products{nav}]", gallery.cards.len())?
        }
    }
    for card in &gallery.cards {
        writeln!(f, "- {}", card.name)?;
        if let Some(description) = &card.description {
            writeln!(f, "  {description}")?;
        }
        let details: Vec<&str> = [card.price.as_deref(), card.stock.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !details.is_empty() {
            writeln!(f, "  {}", details.join(" · "))?;
        }
    }
    Ok(())
}

fn write_images(f: &mut fmt::Formatter<'_>, gallery: &ImageGallery) -> fmt::Result {
    writeln!(f, "[images: {}]", gallery.total)?;
    for tile in &gallery.tiles {
        let badge = match tile.badge {
            TileBadge::Counter { position, total } => format!("{position} / {total}"),
            TileBadge::More(n) => format!("+{n} more"),
        };
        let alt = tile.alt.as_deref().unwrap_or("");
        writeln!(f, "- {} {alt} [{badge}]", tile.src)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolStatus;

    #[test]
    fn test_unsupported_text() {
        let view = View::Unsupported {
            chart_type: "sankey".into(),
        };
        assert_eq!(view.to_string(), "Unsupported chart type: sankey\n");
        assert_eq!(view.kind(), "unsupported");
    }

    #[test]
    fn test_status_text() {
        let view = View::Status(StatusDisplay::loading("Loading Images...", "Fetching image information..."));
        assert_eq!(
            view.to_string(),
            "[in progress] (live) Loading Images...\n  Fetching image information...\n"
        );
    }

    #[test]
    fn test_error_status_text() {
        let view = View::Status(StatusDisplay::error_with("Something went wrong!", "Please try again."));
        let text = view.to_string();
        assert!(text.starts_with("[error] Something went wrong!"));
        assert_eq!(
            match view {
                View::Status(s) => s.status,
                _ => unreachable!(),
            },
            ToolStatus::Error
        );
    }
}

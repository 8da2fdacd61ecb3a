use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;

use crate::data::format_grouped;
use crate::ir::{BarScene, CartesianScene, ChartBody, ChartScene, LegendEntry, PieScene, RadialScene};
use crate::model::Orientation;
use crate::stack::CornerRadii;
use crate::theme::Theme;
use crate::tools::image_view::{ImageGallery, TileBadge};
use crate::tools::product_view::{ProductCard, ProductGallery, ProductLayout};
use crate::tools::status_view::StatusDisplay;
use crate::tools::ToolStatus;
use crate::view::View;

const FONT: &str = "sans-serif";
const PADDING: i32 = 24;
const HEADER_HEIGHT: i32 = 72;
const LEGEND_HEIGHT: i32 = 36;
const ARC_STEPS: usize = 6;

/// Fraction of a category band covered by its bars
const BAND_FILL: f64 = 0.8;

/// Radial chart inner radius relative to the outer one
const RADIAL_INNER_RATIO: f64 = 30.0 / 110.0;

/// Rendering surface for views
pub struct Canvas {
    width: u32,
    height: u32,
    theme: Theme,
}

impl Canvas {
    pub fn new(width: u32, height: u32, theme: Theme) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Cannot create a {}x{} canvas", width, height);
        }
        Ok(Canvas {
            width,
            height,
            theme,
        })
    }

    /// Draw a view and encode it as PNG
    pub fn render_png(&self, view: &View) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            draw_view(&root, view, &self.theme)?;
            root.present().context("Failed to present drawing")?;
        }

        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }

    /// Draw a view as an SVG document
    pub fn render_svg(&self, view: &View) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            draw_view(&root, view, &self.theme)?;
            root.present().context("Failed to present drawing")?;
        }
        Ok(svg)
    }
}

// =============================================================================
// View dispatch
// =============================================================================

fn draw_view<DB>(root: &DrawingArea<DB, Shift>, view: &View, theme: &Theme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&theme.background)
        .context("Failed to fill background")?;

    match view {
        View::Chart(scene) => draw_chart(root, scene, theme),
        View::Unsupported { chart_type } => draw_message(
            root,
            &View::unsupported_message(chart_type),
            theme.muted_foreground,
            theme,
        ),
        View::Fallback { message } => draw_message(root, message, theme.danger, theme),
        View::Status(status) => draw_status(root, status, theme),
        View::Products(gallery) => draw_products(root, gallery, theme),
        View::Images(gallery) => draw_images(root, gallery, theme),
    }
}

fn text_style(size: u32, color: RGBColor) -> TextStyle<'static> {
    (FONT, size).into_font().color(&color)
}

fn bold_style(size: u32, color: RGBColor) -> TextStyle<'static> {
    (FONT, size).into_font().style(FontStyle::Bold).color(&color)
}

fn anchored(style: TextStyle<'static>, h: HPos, v: VPos) -> TextStyle<'static> {
    style.pos(Pos::new(h, v))
}

fn draw_text<DB>(
    root: &DrawingArea<DB, Shift>,
    text: &str,
    at: (i32, i32),
    style: TextStyle<'static>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.draw(&Text::new(text.to_string(), at, style))
        .context("Failed to draw text")?;
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Rough text width for layout; avoids a font lookup
fn text_width(text: &str, size: u32) -> i32 {
    (text.chars().count() as f64 * size as f64 * 0.55).ceil() as i32
}

fn draw_message<DB>(
    root: &DrawingArea<DB, Shift>,
    message: &str,
    color: RGBColor,
    theme: &Theme,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (w, h) = root.dim_in_pixel();
    root.draw(&Rectangle::new(
        [(PADDING, PADDING), (w as i32 - PADDING, h as i32 - PADDING)],
        theme.border.stroke_width(1),
    ))
    .context("Failed to draw frame")?;
    draw_text(
        root,
        message,
        (w as i32 / 2, h as i32 / 2),
        anchored(text_style(16, color), HPos::Center, VPos::Center),
    )
}

// =============================================================================
// Charts
// =============================================================================

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, scene: &ChartScene, theme: &Theme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    draw_text(root, &scene.title, (PADDING, PADDING), bold_style(18, theme.foreground))?;
    if let Some(description) = &scene.description {
        draw_text(
            root,
            description,
            (PADDING, PADDING + 26),
            text_style(13, theme.muted_foreground),
        )?;
    }

    let legend_height = if scene.legend.is_empty() { 0 } else { LEGEND_HEIGHT };
    let area = root.margin(HEADER_HEIGHT, PADDING / 2 + legend_height, PADDING, PADDING);

    match &scene.body {
        ChartBody::Bar(bar) => draw_bars(root, &area, bar, theme)?,
        ChartBody::Line(line) => draw_cartesian(root, &area, line, false, theme)?,
        ChartBody::Area(area_scene) => draw_cartesian(root, &area, area_scene, true, theme)?,
        ChartBody::Pie(pie) => draw_pie(root, &area, pie, theme)?,
        ChartBody::Radial(radial) => draw_radial(root, &area, radial, theme)?,
    }

    draw_legend(root, &scene.legend, theme)
}

fn draw_legend<DB>(root: &DrawingArea<DB, Shift>, legend: &[LegendEntry], theme: &Theme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if legend.is_empty() {
        return Ok(());
    }

    let (w, h) = root.dim_in_pixel();
    let widths: Vec<i32> = legend.iter().map(|e| text_width(&e.label, 12) + 28).collect();
    let total: i32 = widths.iter().sum();
    let mut x = ((w as i32 - total) / 2).max(PADDING);
    let y = h as i32 - PADDING / 2 - LEGEND_HEIGHT / 2;

    for (entry, width) in legend.iter().zip(widths) {
        let color = theme.resolve_color(&entry.color);
        root.draw(&Circle::new((x + 4, y), 4, color.filled()))
            .context("Failed to draw legend icon")?;
        draw_text(
            root,
            &entry.label,
            (x + 14, y),
            anchored(text_style(12, theme.muted_foreground), HPos::Left, VPos::Center),
        )?;
        x += width;
    }
    Ok(())
}

fn rounded_rect(left: i32, top: i32, right: i32, bottom: i32, radius: &CornerRadii) -> Vec<(i32, i32)> {
    let (l, t, r, b) = (left as f64, top as f64, right as f64, bottom as f64);
    let max_radius = (r - l).abs().min((b - t).abs()) / 2.0;
    let clamp = |v: f64| v.clamp(0.0, max_radius);
    let (tl, tr, br, bl) = (
        clamp(radius.top_left),
        clamp(radius.top_right),
        clamp(radius.bottom_right),
        clamp(radius.bottom_left),
    );

    // corners clockwise on screen, each arc sweeping 90° from its start angle
    let corners = [
        (r - tr, t + tr, tr, -90.0),
        (r - br, b - br, br, 0.0),
        (l + bl, b - bl, bl, 90.0),
        (l + tl, t + tl, tl, 180.0),
    ];

    let mut points = Vec::with_capacity(4 * (ARC_STEPS + 1));
    for (cx, cy, radius, start) in corners {
        if radius <= 0.0 {
            points.push((cx.round() as i32, cy.round() as i32));
            continue;
        }
        for step in 0..=ARC_STEPS {
            let angle = (start + 90.0 * step as f64 / ARC_STEPS as f64).to_radians();
            points.push((
                (cx + radius * angle.cos()).round() as i32,
                (cy + radius * angle.sin()).round() as i32,
            ));
        }
    }
    points
}

fn draw_bars<DB>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    bar: &BarScene,
    theme: &Theme,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = bar.categories.len().max(1) as f64;
    let (lo, hi) = bar.value_domain;
    let slot_count = bar.slot_count.max(1) as f64;
    let slot_width = BAND_FILL / slot_count;
    let band_offset = (1.0 - BAND_FILL) / 2.0;
    let label_style = text_style(12, theme.muted_foreground);

    match bar.orientation {
        Orientation::Vertical => {
            let mut chart = ChartBuilder::on(area)
                .x_label_area_size(28)
                .y_label_area_size(56)
                .build_cartesian_2d(0f64..n, lo..hi)
                .context("Failed to build chart")?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .max_light_lines(0)
                .bold_line_style(theme.border.stroke_width(1))
                .axis_style(theme.border.stroke_width(1))
                .label_style(label_style.clone())
                .x_label_formatter(&|_: &f64| String::new())
                .y_label_formatter(&|v: &f64| format_grouped(*v))
                .draw()
                .context("Failed to draw mesh")?;

            for segment in &bar.segments {
                let x0 = segment.category_index as f64 + band_offset + segment.slot as f64 * slot_width;
                let p1 = chart.backend_coord(&(x0 + slot_width * 0.05, segment.start));
                let p2 = chart.backend_coord(&(x0 + slot_width * 0.95, segment.end));
                let points = rounded_rect(
                    p1.0.min(p2.0),
                    p1.1.min(p2.1),
                    p1.0.max(p2.0),
                    p1.1.max(p2.1),
                    &segment.radius,
                );
                root.draw(&Polygon::new(points, theme.resolve_color(&segment.color).filled()))
                    .context("Failed to draw bar")?;
            }

            for (i, category) in bar.categories.iter().enumerate() {
                let (x, y) = chart.backend_coord(&(i as f64 + 0.5, lo));
                draw_text(
                    root,
                    &truncate(category, 16),
                    (x, y + 8),
                    anchored(label_style.clone(), HPos::Center, VPos::Top),
                )?;
            }
        }
        Orientation::Horizontal => {
            let mut chart = ChartBuilder::on(area)
                .x_label_area_size(28)
                .y_label_area_size(96)
                .build_cartesian_2d(lo..hi, 0f64..n)
                .context("Failed to build chart")?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .max_light_lines(0)
                .bold_line_style(theme.border.stroke_width(1))
                .axis_style(theme.border.stroke_width(1))
                .label_style(label_style.clone())
                .x_label_formatter(&|v: &f64| format_grouped(*v))
                .y_label_formatter(&|_: &f64| String::new())
                .draw()
                .context("Failed to draw mesh")?;

            // first category on top
            let band_of = |i: usize| n - 1.0 - i as f64;

            for segment in &bar.segments {
                let y0 = band_of(segment.category_index)
                    + band_offset
                    + (slot_count - 1.0 - segment.slot as f64) * slot_width;
                let p1 = chart.backend_coord(&(segment.start, y0 + slot_width * 0.05));
                let p2 = chart.backend_coord(&(segment.end, y0 + slot_width * 0.95));
                let points = rounded_rect(
                    p1.0.min(p2.0),
                    p1.1.min(p2.1),
                    p1.0.max(p2.0),
                    p1.1.max(p2.1),
                    &segment.radius,
                );
                root.draw(&Polygon::new(points, theme.resolve_color(&segment.color).filled()))
                    .context("Failed to draw bar")?;
            }

            for (i, category) in bar.categories.iter().enumerate() {
                let (x, y) = chart.backend_coord(&(lo, band_of(i) + 0.5));
                draw_text(
                    root,
                    &truncate(category, 14),
                    (x - 8, y),
                    anchored(label_style.clone(), HPos::Right, VPos::Center),
                )?;
            }
        }
    }

    Ok(())
}

/// Consecutive defined points; gaps split a series
fn runs(points: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, point) in points.iter().enumerate() {
        match point {
            Some(v) => current.push((i as f64 + 0.5, *v)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn draw_cartesian<DB>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    scene: &CartesianScene,
    filled: bool,
    theme: &Theme,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = scene.categories.len().max(1) as f64;
    let (lo, hi) = scene.value_domain;
    let label_style = text_style(12, theme.muted_foreground);

    let mut chart = ChartBuilder::on(area)
        .x_label_area_size(28)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..n, lo..hi)
        .context("Failed to build chart")?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .max_light_lines(0)
        .bold_line_style(theme.border.stroke_width(1))
        .axis_style(theme.border.stroke_width(1))
        .label_style(label_style.clone())
        .x_label_formatter(&|_: &f64| String::new())
        .y_label_formatter(&|v: &f64| format_grouped(*v))
        .draw()
        .context("Failed to draw mesh")?;

    let baseline = 0f64.clamp(lo, hi);

    for series in &scene.series {
        let color = theme.resolve_color(&series.color);
        for run in runs(&series.points) {
            if filled {
                let opacity = series.fill_opacity.unwrap_or(0.1);
                let mut outline = run.clone();
                if let (Some(first), Some(last)) = (run.first(), run.last()) {
                    outline.push((last.0, baseline));
                    outline.push((first.0, baseline));
                }
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        outline,
                        color.mix(opacity).filled(),
                    )))
                    .context("Failed to draw area")?;
            } else {
                chart
                    .draw_series(run.iter().map(|&p| Circle::new(p, 3, color.filled())))
                    .context("Failed to draw points")?;
            }

            chart
                .draw_series(LineSeries::new(run, color.stroke_width(2)))
                .context("Failed to draw line series")?;
        }
    }

    for (i, category) in scene.categories.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64 + 0.5, lo));
        draw_text(
            root,
            &truncate(category, 16),
            (x, y + 8),
            anchored(label_style.clone(), HPos::Center, VPos::Top),
        )?;
    }

    Ok(())
}

fn polar(center: (f64, f64), radius: f64, degrees: f64) -> (i32, i32) {
    let angle = degrees.to_radians();
    (
        (center.0 + radius * angle.cos()).round() as i32,
        (center.1 - radius * angle.sin()).round() as i32,
    )
}

/// Annular sector, angles counter-clockwise from three o'clock
fn wedge(center: (f64, f64), outer: f64, inner: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = ((end - start).abs() / 2.0).ceil().max(1.0) as usize;
    let angle_at = |step: usize| start + (end - start) * step as f64 / steps as f64;

    let mut points: Vec<(i32, i32)> = (0..=steps).map(|s| polar(center, outer, angle_at(s))).collect();
    if inner > 0.0 {
        points.extend((0..=steps).rev().map(|s| polar(center, inner, angle_at(s))));
    } else {
        points.push((center.0.round() as i32, center.1.round() as i32));
    }
    points
}

/// Centre and outer radius of the largest circle that fits the area
fn disc(area_origin: (i32, i32), area_size: (u32, u32)) -> ((f64, f64), f64) {
    let (w, h) = (area_size.0 as f64, area_size.1 as f64);
    let center = (area_origin.0 as f64 + w / 2.0, area_origin.1 as f64 + h / 2.0);
    (center, w.min(h) / 2.0 * 0.9)
}

fn draw_pie<DB>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    pie: &PieScene,
    theme: &Theme,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_range, y_range) = area.get_pixel_range();
    let (center, outer) = disc((x_range.start, y_range.start), area.dim_in_pixel());
    let inner = outer * pie.inner_radius_ratio;

    for slice in &pie.slices {
        if slice.end_angle <= slice.start_angle {
            continue;
        }
        let points = wedge(center, outer, inner, slice.start_angle, slice.end_angle);
        let color = theme.resolve_color(&slice.color);
        root.draw(&Polygon::new(points.clone(), color.filled()))
            .context("Failed to draw slice")?;

        let mut edge = points;
        if let Some(first) = edge.first().copied() {
            edge.push(first);
        }
        root.draw(&PathElement::new(edge, theme.background.stroke_width(2)))
            .context("Failed to draw slice edge")?;
    }

    if let Some(total) = &pie.total {
        let (cx, cy) = (center.0.round() as i32, center.1.round() as i32);
        draw_text(
            root,
            &total.text,
            (cx, cy - 6),
            anchored(bold_style(28, theme.foreground), HPos::Center, VPos::Center),
        )?;
        draw_text(
            root,
            crate::compiler::TOTAL_CAPTION,
            (cx, cy + 20),
            anchored(text_style(13, theme.muted_foreground), HPos::Center, VPos::Center),
        )?;
    }

    Ok(())
}

fn draw_radial<DB>(
    root: &DrawingArea<DB, Shift>,
    area: &DrawingArea<DB, Shift>,
    radial: &RadialScene,
    theme: &Theme,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if radial.bars.is_empty() {
        return Ok(());
    }

    let (x_range, y_range) = area.get_pixel_range();
    let (center, outer) = disc((x_range.start, y_range.start), area.dim_in_pixel());
    let inner = outer * RADIAL_INNER_RATIO;
    let band = (outer - inner) / radial.bars.len() as f64;

    for bar in &radial.bars {
        let ring_inner = inner + band * bar.ring as f64 + band * 0.1;
        let ring_outer = ring_inner + band * 0.8;

        root.draw(&Polygon::new(
            wedge(center, ring_outer, ring_inner, 0.0, 360.0),
            theme.muted.filled(),
        ))
        .context("Failed to draw radial track")?;

        let sweep = if radial.max_value > 0.0 {
            (bar.value.max(0.0) / radial.max_value * 360.0).min(360.0)
        } else {
            0.0
        };
        if sweep > 0.0 {
            root.draw(&Polygon::new(
                wedge(center, ring_outer, ring_inner, 0.0, sweep),
                theme.resolve_color(&bar.color).filled(),
            ))
            .context("Failed to draw radial bar")?;
        }

        let (x, y) = polar(center, (ring_inner + ring_outer) / 2.0, 90.0);
        draw_text(
            root,
            &truncate(&bar.name, 18),
            (x - 6, y),
            anchored(text_style(11, theme.foreground), HPos::Right, VPos::Center),
        )?;
    }

    Ok(())
}

// =============================================================================
// Tool views
// =============================================================================

fn indicator_color(status: ToolStatus, theme: &Theme) -> RGBColor {
    match status {
        ToolStatus::Created => theme.muted_foreground,
        ToolStatus::InProgress => theme.warning,
        ToolStatus::Completed => theme.success,
        ToolStatus::Error => theme.danger,
    }
}

fn draw_status<DB>(root: &DrawingArea<DB, Shift>, status: &StatusDisplay, theme: &Theme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (w, _) = root.dim_in_pixel();
    let (left, top, right, bottom) = (PADDING, PADDING, w as i32 - PADDING, PADDING + 76);
    let is_error = status.status == ToolStatus::Error;

    let fill = if is_error { theme.danger_subtle } else { theme.card };
    root.draw(&Rectangle::new([(left, top), (right, bottom)], fill.filled()))
        .context("Failed to draw status container")?;
    root.draw(&Rectangle::new(
        [(left, top), (right, bottom)],
        theme.border.stroke_width(1),
    ))
    .context("Failed to draw status border")?;

    let title_color = if is_error { theme.danger } else { theme.foreground };
    draw_text(root, &status.title, (left + 16, top + 16), bold_style(15, title_color))?;
    draw_text(
        root,
        &status.description,
        (left + 16, top + 42),
        text_style(14, theme.muted_foreground),
    )?;

    let badge = status.badge();
    let badge_width = text_width(&badge, 12) + 32;
    let (bx0, by0) = (right - 16 - badge_width, top + 26);
    let (bx1, by1) = (right - 16, top + 50);
    root.draw(&Polygon::new(
        rounded_rect(bx0, by0, bx1, by1, &CornerRadii::uniform(12.0)),
        theme.muted.filled(),
    ))
    .context("Failed to draw status badge")?;
    root.draw(&Circle::new(
        (bx0 + 12, (by0 + by1) / 2),
        4,
        indicator_color(status.status, theme).filled(),
    ))
    .context("Failed to draw status indicator")?;
    draw_text(
        root,
        &badge,
        (bx0 + 22, (by0 + by1) / 2),
        anchored(text_style(12, theme.foreground), HPos::Left, VPos::Center),
    )
}

fn draw_products<DB>(root: &DrawingArea<DB, Shift>, gallery: &ProductGallery, theme: &Theme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (w, h) = root.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);

    match gallery.layout {
        ProductLayout::Single => {
            if let Some(card) = gallery.cards.first() {
                let top = PADDING;
                let bottom = (h - PADDING).min(PADDING + 280);
                draw_product_card(root, card, (PADDING, top, w - PADDING, bottom), true, theme)?;
            }
        }
        ProductLayout::Carousel { navigation } => {
            let visible = gallery.cards.len().min(3) as i32;
            let gutter = 16;
            let side = if navigation { 40 } else { 0 };
            let inner_left = PADDING + side;
            let inner_right = w - PADDING - side;
            let card_width = (inner_right - inner_left - gutter * (visible - 1)) / visible;
            let bottom = (h - PADDING).min(PADDING + 420);

            for (i, card) in gallery.cards.iter().take(visible as usize).enumerate() {
                let left = inner_left + i as i32 * (card_width + gutter);
                draw_product_card(root, card, (left, PADDING, left + card_width, bottom), false, theme)?;
            }

            if navigation {
                let cy = (PADDING + bottom) / 2;
                for (x, glyph) in [(PADDING + 16, "<"), (w - PADDING - 16, ">")] {
                    root.draw(&Circle::new((x, cy), 16, theme.border.stroke_width(1)))
                        .context("Failed to draw carousel control")?;
                    draw_text(
                        root,
                        glyph,
                        (x, cy),
                        anchored(text_style(16, theme.foreground), HPos::Center, VPos::Center),
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn draw_product_card<DB>(
    root: &DrawingArea<DB, Shift>,
    card: &ProductCard,
    bounds: (i32, i32, i32, i32),
    single: bool,
    theme: &Theme,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (left, top, right, bottom) = bounds;
    root.draw(&Rectangle::new([(left, top), (right, bottom)], theme.border.stroke_width(1)))
        .context("Failed to draw product card")?;

    // image slot: left third for a single card, square on top otherwise
    let (image, text_left, text_top) = if single {
        let side = ((right - left) / 3).min(bottom - top);
        ((left, top, left + side, top + side), left + side + 24, top + 24)
    } else {
        let side = (right - left).min((bottom - top) / 2);
        ((left, top, right, top + side), left + 12, top + side + 16)
    };
    root.draw(&Rectangle::new([(image.0, image.1), (image.2, image.3)], theme.muted.filled()))
        .context("Failed to draw product image slot")?;
    if let Some(url) = &card.image_url {
        let host = crate::parser::parse_url(url)
            .and_then(|parts| parts.host)
            .unwrap_or(url.as_str());
        draw_text(
            root,
            &truncate(host, 24),
            ((image.0 + image.2) / 2, (image.1 + image.3) / 2),
            anchored(text_style(11, theme.muted_foreground), HPos::Center, VPos::Center),
        )?;
    }

    let max_chars = ((right - text_left) / 8).max(8) as usize;
    let title_size = if single { 20 } else { 16 };
    let mut y = text_top;
    draw_text(root, &truncate(&card.name, max_chars), (text_left, y), bold_style(title_size, theme.foreground))?;
    y += title_size as i32 + 10;

    if let Some(description) = &card.description {
        draw_text(
            root,
            &truncate(description, max_chars),
            (text_left, y),
            text_style(13, theme.muted_foreground),
        )?;
        y += 24;
    }
    if let Some(price) = &card.price {
        draw_text(root, price, (text_left, y), bold_style(20, theme.foreground))?;
        y += 30;
    }
    if let Some(stock) = &card.stock {
        draw_text(root, stock, (text_left, y), text_style(13, theme.foreground))?;
    }
    Ok(())
}

fn draw_images<DB>(root: &DrawingArea<DB, Shift>, gallery: &ImageGallery, theme: &Theme) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (w, _) = root.dim_in_pixel();
    let columns: i32 = if w >= 640 { 4 } else { 2 };
    let gap = 8;
    let tile = (w as i32 - 2 * PADDING - gap * (columns - 1)) / columns;

    for (i, image) in gallery.tiles.iter().enumerate() {
        let (col, row) = (i as i32 % columns, i as i32 / columns);
        let left = PADDING + col * (tile + gap);
        let top = PADDING + row * (tile + gap);
        let (right, bottom) = (left + tile, top + tile);

        root.draw(&Polygon::new(
            rounded_rect(left, top, right, bottom, &CornerRadii::uniform(8.0)),
            theme.muted.filled(),
        ))
        .context("Failed to draw image tile")?;

        let caption = image
            .alt
            .clone()
            .unwrap_or_else(|| image.src.rsplit('/').next().unwrap_or_default().to_string());
        draw_text(
            root,
            &truncate(&caption, (tile / 8).max(6) as usize),
            ((left + right) / 2, (top + bottom) / 2),
            anchored(text_style(12, theme.muted_foreground), HPos::Center, VPos::Center),
        )?;

        match image.badge {
            TileBadge::More(remaining) => {
                root.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.mix(0.7).filled()))
                    .context("Failed to draw overlay")?;
                let cx = (left + right) / 2;
                let cy = (top + bottom) / 2;
                draw_text(
                    root,
                    &format!("+{remaining}"),
                    (cx, cy - 10),
                    anchored(bold_style(24, WHITE), HPos::Center, VPos::Center),
                )?;
                draw_text(
                    root,
                    "more",
                    (cx, cy + 16),
                    anchored(text_style(13, WHITE), HPos::Center, VPos::Center),
                )?;
            }
            TileBadge::Counter { position, total } => {
                let label = format!("{position} / {total}");
                let x1 = left + 12 + text_width(&label, 11) + 8;
                root.draw(&Rectangle::new(
                    [(left + 12, bottom - 30), (x1, bottom - 12)],
                    BLACK.mix(0.5).filled(),
                ))
                .context("Failed to draw counter")?;
                draw_text(
                    root,
                    &label,
                    (left + 16, bottom - 21),
                    anchored(text_style(11, WHITE), HPos::Left, VPos::Center),
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_rejects_zero_size() {
        assert!(Canvas::new(0, 100, Theme::light()).is_err());
        assert!(Canvas::new(100, 100, Theme::light()).is_ok());
    }

    #[test]
    fn test_rounded_rect_square_corners() {
        let points = rounded_rect(0, 0, 10, 20, &CornerRadii::square());
        assert_eq!(points, vec![(10, 0), (10, 20), (0, 20), (0, 0)]);
    }

    #[test]
    fn test_rounded_rect_stays_inside_bounds() {
        let points = rounded_rect(10, 10, 14, 50, &CornerRadii::uniform(4.0));
        assert!(points.iter().all(|&(x, y)| (10..=14).contains(&x) && (10..=50).contains(&y)));
        assert_eq!(points.len(), 4 * (ARC_STEPS + 1));
    }

    #[test]
    fn test_runs_split_on_gaps() {
        let r = runs(&[Some(1.0), None, Some(2.0), Some(3.0), None]);
        assert_eq!(r, vec![vec![(0.5, 1.0)], vec![(2.5, 2.0), (3.5, 3.0)]]);
        assert!(runs(&[None, None]).is_empty());
    }

    #[test]
    fn test_wedge_full_pie_closes_on_center() {
        let points = wedge((50.0, 50.0), 10.0, 0.0, 0.0, 90.0);
        assert_eq!(points.first(), Some(&(60, 50)));
        assert_eq!(points.last(), Some(&(50, 50)));
        // 90° sits at twelve o'clock, above the centre
        assert!(points.contains(&(50, 40)));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long category name", 10), "a long ...");
    }
}

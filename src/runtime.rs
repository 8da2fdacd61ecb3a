// Runtime executor: views behind error boundaries, encoded per render options

use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::{Context, Result};
use tracing::{debug, error};

use crate::compiler::compile_chart;
use crate::graph::Canvas;
use crate::model::ChartSpec;
use crate::theme::Theme;
use crate::tools::{component_failure, dispatch, DispatchOptions, ToolCall};
use crate::view::View;
use crate::{OutputFormat, RenderOptions};

/// Message of the chart error boundary
pub const CHART_FALLBACK_MESSAGE: &str = "Something Went Wrong!, please try again.";

fn chart_fallback() -> View {
    View::Fallback {
        message: CHART_FALLBACK_MESSAGE.to_string(),
    }
}

/// Build a chart view; compile errors and panics become the fallback view
pub fn chart_view(spec: &ChartSpec) -> View {
    match catch_unwind(AssertUnwindSafe(|| compile_chart(spec))) {
        Ok(Ok(view)) => view,
        Ok(Err(e)) => {
            error!(title = %spec.title, error = %e, "chart failed to compile");
            chart_fallback()
        }
        Err(_) => {
            error!(title = %spec.title, "chart compilation panicked");
            chart_fallback()
        }
    }
}

/// Encode a view in the requested format
pub fn render_view(view: &View, options: &RenderOptions) -> Result<Vec<u8>> {
    if options.format == OutputFormat::Text {
        return Ok(view.to_string().into_bytes());
    }

    let canvas = Canvas::new(options.width, options.height, Theme::for_mode(options.theme))?;
    let drawn = catch_unwind(AssertUnwindSafe(|| match options.format {
        OutputFormat::Svg => canvas.render_svg(view).map(String::into_bytes),
        _ => canvas.render_png(view),
    }));

    match drawn {
        Ok(result) => result,
        Err(_) => anyhow::bail!("Drawing the {} view panicked", view.kind()),
    }
}

/// Encode a view; when drawing fails, encode `fallback` in its place
fn render_guarded(view: &View, fallback: View, options: &RenderOptions) -> Result<Vec<u8>> {
    match render_view(view, options) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            error!(view = view.kind(), error = %e, "render failed, drawing fallback");
            render_view(&fallback, options).context("Failed to render fallback view")
        }
    }
}

/// Render a chart spec to bytes
pub fn render_chart(spec: &ChartSpec, options: &RenderOptions) -> Result<Vec<u8>> {
    let view = chart_view(spec);
    debug!(view = view.kind(), format = ?options.format, "rendering chart");
    render_guarded(&view, chart_fallback(), options)
}

/// Render a tool call; `None` when the call renders nothing
pub fn render_tool_call(
    call: &ToolCall,
    dispatch_options: &DispatchOptions,
    options: &RenderOptions,
) -> Result<Option<Vec<u8>>> {
    let Some(view) = dispatch(call, dispatch_options) else {
        debug!(tool = %call.name, "tool call renders nothing");
        return Ok(None);
    };

    let fallback = match view {
        View::Chart(_) => chart_fallback(),
        _ => component_failure(),
    };
    render_guarded(&view, fallback, options).map(Some)
}

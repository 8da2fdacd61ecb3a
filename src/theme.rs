//! Theme Resolution
//!
//! Maps the CSS color strings carried by chart configs onto concrete colors.
//! Chart tokens (`hsl(var(--chart-N))`) resolve through the active theme's
//! five-color chart palette, so the same spec renders correctly in light and
//! dark mode.

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parser::color::{hsl_to_rgb, parse_css_color, CssColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Fully resolved theme (no Options, every slot concrete)
#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background: RGBColor,
    pub card: RGBColor,
    pub foreground: RGBColor,
    pub muted: RGBColor,
    pub muted_foreground: RGBColor,
    pub border: RGBColor,
    pub chart: [RGBColor; 5],
    pub success: RGBColor,
    pub warning: RGBColor,
    pub danger: RGBColor,
    pub danger_subtle: RGBColor,
}

fn hsl(h: f64, s: f64, l: f64) -> RGBColor {
    let (r, g, b) = hsl_to_rgb(h, s, l);
    RGBColor(r, g, b)
}

impl Theme {
    pub fn light() -> Self {
        Theme {
            mode: ThemeMode::Light,
            background: RGBColor(255, 255, 255),
            card: RGBColor(255, 255, 255),
            foreground: hsl(240.0, 10.0, 3.9),
            muted: hsl(240.0, 4.8, 95.9),
            muted_foreground: hsl(240.0, 3.8, 46.1),
            border: hsl(240.0, 5.9, 90.0),
            chart: [
                hsl(12.0, 76.0, 61.0),
                hsl(173.0, 58.0, 39.0),
                hsl(197.0, 37.0, 24.0),
                hsl(43.0, 74.0, 66.0),
                hsl(27.0, 87.0, 67.0),
            ],
            success: hsl(142.0, 71.0, 45.0),
            warning: hsl(38.0, 92.0, 50.0),
            danger: hsl(0.0, 72.0, 51.0),
            danger_subtle: hsl(0.0, 86.0, 97.0),
        }
    }

    pub fn dark() -> Self {
        Theme {
            mode: ThemeMode::Dark,
            background: hsl(240.0, 10.0, 3.9),
            card: hsl(240.0, 6.0, 10.0),
            foreground: hsl(0.0, 0.0, 98.0),
            muted: hsl(240.0, 3.7, 15.9),
            muted_foreground: hsl(240.0, 5.0, 64.9),
            border: hsl(240.0, 3.7, 15.9),
            chart: [
                hsl(220.0, 70.0, 50.0),
                hsl(160.0, 60.0, 45.0),
                hsl(30.0, 80.0, 55.0),
                hsl(280.0, 65.0, 60.0),
                hsl(340.0, 75.0, 55.0),
            ],
            success: hsl(142.0, 69.0, 58.0),
            warning: hsl(43.0, 96.0, 56.0),
            danger: hsl(0.0, 84.0, 60.0),
            danger_subtle: hsl(0.0, 63.0, 15.0),
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Theme::light(),
            ThemeMode::Dark => Theme::dark(),
        }
    }

    /// Chart token color; tokens are 1-based and wrap every five
    pub fn chart_color(&self, token: u8) -> RGBColor {
        let idx = (token.max(1) as usize - 1) % self.chart.len();
        self.chart[idx]
    }

    /// Resolve a CSS color string; anything unparseable falls back to chart-1
    pub fn resolve_color(&self, css: &str) -> RGBColor {
        match parse_css_color(css) {
            Some(CssColor::Rgb(r, g, b)) => RGBColor(r, g, b),
            Some(CssColor::Hsl {
                hue,
                saturation,
                lightness,
            }) => hsl(hue, saturation, lightness),
            Some(CssColor::ChartToken(n)) => self.chart_color(n),
            None => {
                debug!(color = css, "unparseable color, using chart-1");
                self.chart[0]
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

// Library exports for toolview

pub mod data;
pub mod error;
pub mod graph;
pub mod model;
pub mod palette;
pub mod parser;
pub mod runtime;
pub mod showcase;
pub mod stack;
pub mod theme;
pub mod tools;
pub mod view;

// Chart pipeline: resolve -> transform -> scale -> compile
pub mod compiler;
pub mod ir;
pub mod resolve;
pub mod scale;
pub mod transform;

use serde::Deserialize;

pub use theme::ThemeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
    #[serde(rename = "text")]
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
    #[serde(default)]
    pub theme: ThemeMode,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Png,
            theme: ThemeMode::Light,
        }
    }
}

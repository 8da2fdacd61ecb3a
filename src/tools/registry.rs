use serde_json::Value;

use super::image_view::ImageViewArgs;
use super::product_view::ProductViewArgs;
use super::status_view::StatusViewArgs;
use super::{parse_payload, ToolPayload};
use crate::error::ValidationError;
use crate::model::ChartSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingMessages {
    pub title: &'static str,
    pub description: &'static str,
}

/// A registered tool: its loading copy and its argument parser
#[derive(Clone, Copy)]
pub struct ToolRegistration {
    pub name: &'static str,
    pub loading: LoadingMessages,
    pub parse: fn(Option<&Value>) -> Result<ToolPayload, ValidationError>,
}

impl std::fmt::Debug for ToolRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistration")
            .field("name", &self.name)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

pub static TOOL_REGISTRY: [ToolRegistration; 4] = [
    ToolRegistration {
        name: "chart_view",
        loading: LoadingMessages {
            title: "Generating Chart...",
            description: "Creating visualization from your data...",
        },
        parse: parse_payload::<ChartSpec>,
    },
    ToolRegistration {
        name: "image_view",
        loading: LoadingMessages {
            title: "Loading Images...",
            description: "Fetching image information...",
        },
        parse: parse_payload::<ImageViewArgs>,
    },
    ToolRegistration {
        name: "product_view",
        loading: LoadingMessages {
            title: "Loading Products...",
            description: "Fetching product information...",
        },
        parse: parse_payload::<ProductViewArgs>,
    },
    ToolRegistration {
        name: "status_view",
        loading: LoadingMessages {
            title: "Updating Status...",
            description: "Please wait while the status is being updated...",
        },
        parse: parse_payload::<StatusViewArgs>,
    },
];

/// Exact, case-sensitive lookup
pub fn lookup(name: &str) -> Option<&'static ToolRegistration> {
    TOOL_REGISTRY.iter().find(|r| r.name == name)
}

pub fn tool_names() -> impl Iterator<Item = &'static str> {
    TOOL_REGISTRY.iter().map(|r| r.name)
}

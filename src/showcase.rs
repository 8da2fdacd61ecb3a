//! Built-in demo items and the reveal timeline used to present them.
//!
//! Items appear one at a time: the first after [`FIRST_REVEAL_MS`], then one
//! every [`REVEAL_INTERVAL_MS`]. Each item shows its tool's loading status for
//! [`LOADING_DURATION_MS`] after it appears.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::tools::{lookup, ToolCall, ToolStatus};

pub const FIRST_REVEAL_MS: u64 = 500;
pub const REVEAL_INTERVAL_MS: u64 = 1000;
pub const LOADING_DURATION_MS: u64 = 1500;

/// Tool shown when no selection is given
pub const DEFAULT_TOOL: &str = "chart_view";

const MOCK_CHARTS: &str = include_str!("../demos/mock_charts.json");
const DEMO_TOOL_CALLS: &str = include_str!("../demos/tool_calls.json");

/// A named tool call to present
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShowcaseItem {
    pub name: String,
    pub call: ToolCall,
}

impl ShowcaseItem {
    /// The call as it looks at a point of the timeline; loading items have
    /// not produced their arguments yet
    pub fn call_at(&self, loading: bool) -> ToolCall {
        if loading {
            ToolCall {
                status: ToolStatus::InProgress,
                arguments: None,
                ..self.call.clone()
            }
        } else {
            self.call.clone()
        }
    }

    /// File-name friendly form of the item name
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for ch in self.name.chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
            } else if !slug.ends_with('-') && !slug.is_empty() {
                slug.push('-');
            }
        }
        slug.trim_end_matches('-').to_string()
    }
}

/// The demo charts, each wrapped in a completed `chart_view` call
pub fn mock_charts() -> Result<Vec<ShowcaseItem>> {
    let entries: Vec<Value> =
        serde_json::from_str(MOCK_CHARTS).context("Failed to parse built-in mock charts")?;

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, mut entry)| -> Result<ShowcaseItem> {
            let name = entry
                .as_object_mut()
                .and_then(|obj| obj.remove("name"))
                .and_then(|name| name.as_str().map(str::to_string))
                .with_context(|| format!("Mock chart {} has no name", idx))?;

            Ok(ShowcaseItem {
                name,
                call: ToolCall {
                    id: Some(format!("chart-{idx}")),
                    name: DEFAULT_TOOL.to_string(),
                    status: ToolStatus::Completed,
                    arguments: Some(entry),
                },
            })
        })
        .collect()
}

/// Demo items for one registered tool
pub fn demo_items(tool: &str) -> Result<Vec<ShowcaseItem>> {
    if tool == DEFAULT_TOOL {
        return mock_charts();
    }

    let items: Vec<ShowcaseItem> = serde_json::from_str(DEMO_TOOL_CALLS)
        .context("Failed to parse built-in demo tool calls")?;
    Ok(items.into_iter().filter(|item| item.call.name == tool).collect())
}

/// Parse a comma-separated tool list. Names are trimmed, unknown names and
/// repeats are dropped; no list at all selects [`DEFAULT_TOOL`].
pub fn parse_tool_selection(input: Option<&str>) -> Vec<&'static str> {
    let Some(input) = input else {
        return vec![DEFAULT_TOOL];
    };

    let mut selected: Vec<&'static str> = Vec::new();
    for name in input.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match lookup(name) {
            Some(registration) if !selected.contains(&registration.name) => {
                selected.push(registration.name)
            }
            Some(_) => {}
            None => warn!(tool = name, "ignoring unknown tool in selection"),
        }
    }
    selected
}

/// All demo items for a selection, in selection order
pub fn showcase_items(selection: &[&str]) -> Result<Vec<ShowcaseItem>> {
    let mut items = Vec::new();
    for tool in selection {
        items.extend(demo_items(tool)?);
    }
    Ok(items)
}

/// Plural noun used in the progress banner
pub fn noun_for(selection: &[&str]) -> &'static str {
    match selection {
        ["chart_view"] => "charts",
        ["image_view"] => "image galleries",
        ["product_view"] => "product lists",
        ["status_view"] => "status updates",
        _ => "items",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameItem {
    pub index: usize,
    pub loading: bool,
}

/// What is on screen at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub generating: bool,
    pub banner: String,
    pub items: Vec<FrameItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    total: usize,
    noun: String,
}

impl Timeline {
    pub fn new(total: usize, noun: impl Into<String>) -> Self {
        Timeline {
            total,
            noun: noun.into(),
        }
    }

    pub fn reveal_at(&self, index: usize) -> u64 {
        FIRST_REVEAL_MS + index as u64 * REVEAL_INTERVAL_MS
    }

    /// The reveal step after the last item ends generation
    pub fn completes_at(&self) -> u64 {
        self.reveal_at(self.total)
    }

    pub fn frame_at(&self, ms: u64) -> Frame {
        let items: Vec<FrameItem> = (0..self.total)
            .take_while(|&i| self.reveal_at(i) <= ms)
            .map(|index| FrameItem {
                index,
                loading: ms < self.reveal_at(index) + LOADING_DURATION_MS,
            })
            .collect();

        let generating = ms < self.completes_at();
        let banner = if generating {
            format!("Generating {}... ({}/{})", self.noun, items.len(), self.total)
        } else {
            format!("Analysis complete - {} {} generated", items.len(), self.noun)
        };

        Frame {
            generating,
            banner,
            items,
        }
    }

    /// Frame once every item has finished loading
    pub fn final_frame(&self) -> Frame {
        let last_loaded = self
            .total
            .checked_sub(1)
            .map(|last| self.reveal_at(last) + LOADING_DURATION_MS)
            .unwrap_or(0);
        self.frame_at(last_loaded.max(self.completes_at()))
    }
}

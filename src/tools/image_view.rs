use anyhow::Result;
use serde::Deserialize;

use super::{ToolSchema, ToolStatus};
use crate::error::ValidationError;
use crate::parser::is_url;
use crate::tools::status_view::StatusDisplay;
use crate::view::View;

/// Tiles shown before the remainder collapses into a "+N more" overlay
pub const MAX_VISIBLE_IMAGES: usize = 4;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageId {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageData {
    pub id: ImageId,
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// Arguments of the `image_view` tool
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageViewArgs {
    pub images: Vec<ImageData>,
}

impl ToolSchema for ImageViewArgs {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.images.iter().position(|image| !is_url(&image.src)) {
            Some(i) => Err(ValidationError::invalid(
                format!("images[{i}].src"),
                "must be a URL",
            )),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileBadge {
    /// 1-based position out of the full list
    Counter { position: usize, total: usize },
    /// Images not shown
    More(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageTile {
    pub src: String,
    pub alt: Option<String>,
    pub badge: TileBadge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageGallery {
    pub total: usize,
    pub tiles: Vec<ImageTile>,
}

pub fn image_view(args: &ImageViewArgs) -> Result<View> {
    let total = args.images.len();
    if total == 0 {
        return Ok(View::Status(StatusDisplay::new(
            ToolStatus::Error,
            Some("No images found"),
            None,
        )));
    }

    let remaining = total.saturating_sub(MAX_VISIBLE_IMAGES);
    let tiles = args
        .images
        .iter()
        .take(MAX_VISIBLE_IMAGES)
        .enumerate()
        .map(|(i, image)| {
            let badge = if remaining > 0 && i == MAX_VISIBLE_IMAGES - 1 {
                TileBadge::More(remaining)
            } else {
                TileBadge::Counter {
                    position: i + 1,
                    total,
                }
            };
            ImageTile {
                src: image.src.clone(),
                alt: image.alt.clone(),
                badge,
            }
        })
        .collect();

    Ok(View::Images(ImageGallery { total, tiles }))
}

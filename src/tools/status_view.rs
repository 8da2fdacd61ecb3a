use serde::Deserialize;

use super::{ToolSchema, ToolStatus};

/// Arguments of the `status_view` tool
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusViewArgs {
    pub status: ToolStatus,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ToolSchema for StatusViewArgs {}

/// Default (title, description) per status
pub fn default_messages(status: ToolStatus) -> (&'static str, &'static str) {
    match status {
        ToolStatus::Created => (
            "Operation queued...",
            "Your request has been received and will be processed shortly",
        ),
        ToolStatus::InProgress => ("Processing...", "Please wait while we handle your request"),
        ToolStatus::Completed => (
            "Operation completed",
            "Your request has been processed successfully",
        ),
        ToolStatus::Error => (
            "Operation failed",
            "Something went wrong while processing your request",
        ),
    }
}

/// How assistive technology announces a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveRegion {
    Polite,
    Off,
}

/// A status line with an indicator badge
#[derive(Debug, Clone, PartialEq)]
pub struct StatusDisplay {
    pub status: ToolStatus,
    pub title: String,
    pub description: String,
}

impl StatusDisplay {
    /// Missing or empty title and description fall back to the status defaults
    pub fn new(status: ToolStatus, title: Option<&str>, description: Option<&str>) -> Self {
        let (default_title, default_description) = default_messages(status);
        let pick = |given: Option<&str>, default: &str| {
            given
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        StatusDisplay {
            status,
            title: pick(title, default_title),
            description: pick(description, default_description),
        }
    }

    pub fn error(title: impl AsRef<str>) -> Self {
        StatusDisplay::new(ToolStatus::Error, Some(title.as_ref()), None)
    }

    pub fn error_with(title: impl AsRef<str>, description: impl AsRef<str>) -> Self {
        StatusDisplay::new(
            ToolStatus::Error,
            Some(title.as_ref()),
            Some(description.as_ref()),
        )
    }

    pub fn loading(title: &str, description: &str) -> Self {
        StatusDisplay::new(ToolStatus::InProgress, Some(title), Some(description))
    }

    pub fn badge(&self) -> String {
        self.status.as_str().replace('_', " ")
    }

    pub fn live_region(&self) -> LiveRegion {
        if self.status == ToolStatus::InProgress {
            LiveRegion::Polite
        } else {
            LiveRegion::Off
        }
    }
}

impl From<StatusViewArgs> for StatusDisplay {
    fn from(args: StatusViewArgs) -> Self {
        StatusDisplay::new(args.status, args.title.as_deref(), args.description.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_text() {
        let display = StatusDisplay::new(ToolStatus::Created, None, None);
        assert_eq!(display.title, "Operation queued...");
        assert_eq!(
            display.description,
            "Your request has been received and will be processed shortly"
        );
    }

    #[test]
    fn test_empty_strings_use_defaults() {
        let display = StatusDisplay::new(ToolStatus::Completed, Some(""), Some("Saved"));
        assert_eq!(display.title, "Operation completed");
        assert_eq!(display.description, "Saved");
    }

    #[test]
    fn test_error_keeps_default_description() {
        let display = StatusDisplay::error("No products found");
        assert_eq!(display.status, ToolStatus::Error);
        assert_eq!(
            display.description,
            "Something went wrong while processing your request"
        );
    }

    #[test]
    fn test_badge_and_live_region() {
        let busy = StatusDisplay::new(ToolStatus::InProgress, None, None);
        assert_eq!(busy.badge(), "in progress");
        assert_eq!(busy.live_region(), LiveRegion::Polite);

        let done = StatusDisplay::new(ToolStatus::Completed, None, None);
        assert_eq!(done.badge(), "completed");
        assert_eq!(done.live_region(), LiveRegion::Off);
    }

    #[test]
    fn test_from_args() {
        let args: StatusViewArgs = serde_json::from_value(serde_json::json!({
            "status": "error",
            "title": "Payment declined"
        }))
        .unwrap();
        let display = StatusDisplay::from(args);
        assert_eq!(display.title, "Payment declined");
        assert_eq!(display.description, default_messages(ToolStatus::Error).1);
    }
}

//! Tool calls: argument schemas, the registry and the dispatcher that turns a
//! call envelope into a view.

pub mod image_view;
pub mod product_view;
pub mod registry;
pub mod status_view;

use std::panic::{catch_unwind, AssertUnwindSafe};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::ValidationError;
use crate::model::ChartSpec;
use crate::view::View;
use image_view::ImageViewArgs;
use product_view::ProductViewArgs;
use status_view::{StatusDisplay, StatusViewArgs};

pub use registry::{lookup, tool_names, LoadingMessages, ToolRegistration, TOOL_REGISTRY};

/// Lifecycle of a tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Created,
    InProgress,
    Completed,
    Error,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Created => "created",
            ToolStatus::InProgress => "in_progress",
            ToolStatus::Completed => "completed",
            ToolStatus::Error => "error",
        }
    }
}

/// Tool-call envelope as emitted by the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub status: ToolStatus,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, status: ToolStatus, arguments: Option<Value>) -> Self {
        ToolCall {
            id: None,
            name: name.into(),
            status,
            arguments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct DispatchOptions {
    /// Show a visible error status for calls in the `error` state instead of
    /// rendering nothing
    #[serde(default)]
    pub surface_tool_errors: bool,
}

/// Typed argument schema of a tool; `validate` checks what deserialization
/// alone cannot (ranges, URL shape, integrality)
pub trait ToolSchema: DeserializeOwned {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl ToolSchema for ChartSpec {}

/// Deserialize and validate tool arguments
pub fn parse_arguments<T: ToolSchema>(arguments: Option<&Value>) -> Result<T, ValidationError> {
    let value = match arguments {
        None | Some(Value::Null) => return Err(ValidationError::MissingArguments),
        Some(value) => value,
    };

    let parsed = T::deserialize(value).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    parsed.validate()?;
    Ok(parsed)
}

/// Validated arguments of any registered tool
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    Chart(ChartSpec),
    Images(ImageViewArgs),
    Products(ProductViewArgs),
    Status(StatusViewArgs),
}

impl From<ChartSpec> for ToolPayload {
    fn from(spec: ChartSpec) -> Self {
        ToolPayload::Chart(spec)
    }
}

impl From<ImageViewArgs> for ToolPayload {
    fn from(args: ImageViewArgs) -> Self {
        ToolPayload::Images(args)
    }
}

impl From<ProductViewArgs> for ToolPayload {
    fn from(args: ProductViewArgs) -> Self {
        ToolPayload::Products(args)
    }
}

impl From<StatusViewArgs> for ToolPayload {
    fn from(args: StatusViewArgs) -> Self {
        ToolPayload::Status(args)
    }
}

/// Parser stored in the registry for tool `T`
pub fn parse_payload<T>(arguments: Option<&Value>) -> Result<ToolPayload, ValidationError>
where
    T: ToolSchema + Into<ToolPayload>,
{
    parse_arguments::<T>(arguments).map(Into::into)
}

impl ToolPayload {
    /// Build the tool's component view
    pub fn render(&self) -> Result<View> {
        match self {
            ToolPayload::Chart(spec) => Ok(crate::runtime::chart_view(spec)),
            ToolPayload::Images(args) => image_view::image_view(args),
            ToolPayload::Products(args) => product_view::product_view(args),
            ToolPayload::Status(args) => Ok(View::Status(StatusDisplay::from(args.clone()))),
        }
    }
}

pub const INVALID_DATA_TITLE: &str = "Invalid data for tool.";
pub const INVALID_DATA_DESCRIPTION: &str = "The data received is malformed.";
pub const COMPONENT_FAILURE_TITLE: &str = "Something went wrong!";
pub const COMPONENT_FAILURE_DESCRIPTION: &str = "Please try again.";

pub fn unknown_tool_title(name: &str) -> String {
    format!("Tool: \"{name}\" doesn't exist.")
}

/// Map a tool call to the view that represents it; `None` renders nothing
pub fn dispatch(call: &ToolCall, options: &DispatchOptions) -> Option<View> {
    let Some(registration) = lookup(&call.name) else {
        warn!(tool = %call.name, "unknown tool");
        return Some(View::Status(StatusDisplay::error(unknown_tool_title(
            &call.name,
        ))));
    };

    match call.status {
        ToolStatus::Created | ToolStatus::InProgress => {
            debug!(tool = registration.name, status = call.status.as_str(), "tool loading");
            Some(View::Status(StatusDisplay::loading(
                registration.loading.title,
                registration.loading.description,
            )))
        }
        ToolStatus::Completed => {
            let payload = match (registration.parse)(call.arguments.as_ref()) {
                Ok(payload) => payload,
                Err(e) => {
                    error!(tool = registration.name, error = %e, "invalid arguments for tool");
                    return Some(View::Status(StatusDisplay::error_with(
                        INVALID_DATA_TITLE,
                        INVALID_DATA_DESCRIPTION,
                    )));
                }
            };
            debug!(tool = registration.name, "tool completed");
            Some(component_boundary(registration.name, &payload))
        }
        ToolStatus::Error => {
            warn!(tool = registration.name, id = ?call.id, "tool call reported an error");
            options
                .surface_tool_errors
                .then(|| View::Status(StatusDisplay::new(ToolStatus::Error, None, None)))
        }
    }
}

/// Render a payload, turning errors and panics into the failure status
fn component_boundary(tool: &str, payload: &ToolPayload) -> View {
    match catch_unwind(AssertUnwindSafe(|| payload.render())) {
        Ok(Ok(view)) => view,
        Ok(Err(e)) => {
            error!(tool, error = %e, "tool component failed");
            component_failure()
        }
        Err(_) => {
            error!(tool, "tool component panicked");
            component_failure()
        }
    }
}

pub fn component_failure() -> View {
    View::Status(StatusDisplay::error_with(
        COMPONENT_FAILURE_TITLE,
        COMPONENT_FAILURE_DESCRIPTION,
    ))
}

//! Typed errors for the boundaries of the view layer
//!
//! The computations themselves (filter, sort, paginate, aggregate) are total
//! and never fail. Errors only arise where data or instructions enter the
//! layer:
//!
//! - [`ViewError::InvalidFilter`] / [`ViewError::InvalidSort`]: malformed query input
//! - [`ViewError::Payload`]: a fetch payload that is not a record list
//! - [`ViewError::Patch`]: an optimistic patch that would produce an invalid record
//! - [`ViewError::Fetch`]: the record source failed
//! - [`ViewError::Config`]: inconsistent view configuration
//!
//! # Example
//!
//! ```rust,ignore
//! match model.refresh(&source).await {
//!     Ok(()) => render(model.view()),
//!     Err(ViewError::Fetch { .. }) => notify("Could not refresh, showing last data"),
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ViewError {
    /// Filter JSON could not be read
    #[error("Invalid filter: {message}")]
    InvalidFilter { message: String },

    /// Sort expression is not `field[:asc|desc]`
    #[error("Invalid sort expression '{expression}'")]
    InvalidSort { expression: String },

    /// Fetch payload is neither a record array nor a `data` envelope
    #[error("Invalid {entity_type} payload: {message}")]
    Payload {
        entity_type: String,
        message: String,
    },

    /// Local patch rejected; records are left unchanged
    #[error("Failed to patch {entity_type} '{key}': {message}")]
    Patch {
        entity_type: String,
        key: Uuid,
        message: String,
    },

    /// Record source failed; the previous view is kept
    #[error("Failed to fetch {entity_type}: {source}")]
    Fetch {
        entity_type: String,
        #[source]
        source: anyhow::Error,
    },

    /// View configuration is inconsistent
    #[error("Invalid view configuration: {message}")]
    Config { message: String },
}

impl ViewError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ViewError::InvalidFilter { .. } => "INVALID_FILTER",
            ViewError::InvalidSort { .. } => "INVALID_SORT",
            ViewError::Payload { .. } => "INVALID_PAYLOAD",
            ViewError::Patch { .. } => "PATCH_REJECTED",
            ViewError::Fetch { .. } => "FETCH_FAILED",
            ViewError::Config { .. } => "CONFIG_ERROR",
        }
    }

    pub(crate) fn invalid_filter(message: impl Into<String>) -> Self {
        ViewError::InvalidFilter {
            message: message.into(),
        }
    }
}

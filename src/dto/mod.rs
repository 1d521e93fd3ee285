//! View models that bridge services with templates.

pub mod account;
pub mod main;
pub mod pricing;
pub mod survey;
pub mod surveys;

use serde::Serialize;

/// Inline notice rendered with a page instead of a flash message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Bootstrap contextual class, `success` or `danger`.
    pub level: &'static str,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: "success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: "danger",
            message: message.into(),
        }
    }
}

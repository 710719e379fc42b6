//! Uniform JSON response envelope.
//!
//! Every endpoint, success or failure, answers with this shape:
//! `{ success, message?, data?, error? }`. Absent fields are omitted from
//! the serialized body.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful response carrying only data.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    /// Successful response carrying a message and data.
    pub fn with_message(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    /// Successful response carrying only a message (deletes).
    pub fn message_only(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
            error: None,
        }
    }

    /// Failure response; `error` carries optional diagnostic detail.
    pub fn failure(message: String, error: Option<String>) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
            error,
        }
    }
}

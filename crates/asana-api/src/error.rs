use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::transport::Method;

/// Structured error reported by the Asana API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub status_code: u16,
    pub kind: String,
    pub message: String,
    pub request_id: String,
    pub help: Option<String>,
}

impl ErrorDetail {
    /// Fallback used when the error body cannot be decoded.
    pub fn from_status(status: u16, request_id: &str) -> Self {
        let message = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        Self {
            status_code: status,
            kind: "unknown".to_string(),
            message,
            request_id: request_id.to_string(),
            help: None,
        }
    }

    pub(crate) fn from_wire(errors: Vec<WireError>, status: u16, request_id: &str) -> Self {
        let mut detail = Self::from_status(status, request_id);
        let mut messages = Vec::new();
        for (idx, err) in errors.into_iter().enumerate() {
            if idx == 0 {
                if let Some(code) = err.status_code {
                    detail.status_code = code;
                }
                if let Some(kind) = err.kind.filter(|k| !k.is_empty()) {
                    detail.kind = kind;
                }
                if let Some(id) = err.request_id.filter(|id| !id.is_empty()) {
                    detail.request_id = id;
                }
                detail.help = err.help;
            }
            if let Some(message) = err.message.filter(|m| !m.is_empty()) {
                messages.push(message);
            }
        }
        if !messages.is_empty() {
            detail.message = messages.join("; ");
        }
        detail
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, status {}) [request {}]",
            self.message, self.kind, self.status_code, self.request_id
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireError {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub help: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("you are not logged in; run `asana auth login` to authenticate")]
    NotAuthenticated,
    #[error("failed to read credential: {0}")]
    Credential(String),
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid request path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("{method} {path} failed: {message}")]
    Transport {
        method: Method,
        path: String,
        message: String,
        timed_out: bool,
    },
    #[error("asana api error: {0}")]
    Api(ErrorDetail),
    #[error("unable to decode response (status {status}) [request {request_id}]: {reason}")]
    Decode {
        status: u16,
        request_id: String,
        reason: String,
    },
    #[error("missing data from response [request {request_id}]")]
    MissingData { request_id: String },
    #[error("pagination offset {offset:?} was returned twice; aborting")]
    PaginationLoop { offset: String },
}

impl ApiError {
    /// Transport failures are the only ones worth re-running as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::NotAuthenticated => true,
            Self::Api(detail) => detail.status_code == 401,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(detail) => Some(detail.status_code),
            Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}

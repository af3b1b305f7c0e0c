use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type RemoteSessionId = String;

/// Suggested action as sent by the assistant backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum ActionPayload {
    Timer {
        /// Minutes.
        duration: i32,
        #[serde(default)]
        appliance: String,
        #[serde(default)]
        label: String,
        description: String,
    },
    Temperature {
        /// Degrees Fahrenheit.
        #[serde(default)]
        value: Option<i32>,
        #[serde(default)]
        appliance: String,
        description: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub message: String,
    pub suggested_actions: Vec<ActionPayload>,
}

/// Remote work submitted to the engine. `ticket` is echoed back on the
/// matching [`EngineEvent`] so callers can discard stale results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    CreateSession {
        ticket: u64,
        recipe_id: String,
    },
    DeleteSession {
        session_id: RemoteSessionId,
    },
    FetchStepActions {
        ticket: u64,
        session_id: RemoteSessionId,
        step: usize,
    },
    SendChat {
        ticket: u64,
        session_id: RemoteSessionId,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SessionCreated {
        ticket: u64,
        result: Result<RemoteSessionId, AssistantError>,
    },
    SessionDeleted {
        session_id: RemoteSessionId,
        result: Result<(), AssistantError>,
    },
    StepActionsLoaded {
        ticket: u64,
        step: usize,
        result: Result<Vec<ActionPayload>, AssistantError>,
    },
    ChatReplied {
        ticket: u64,
        result: Result<ChatReply, AssistantError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AssistantError {
    pub kind: FailureKind,
    pub message: String,
}

impl AssistantError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response body"),
        }
    }
}

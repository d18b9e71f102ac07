//! Top-level message envelope from the host UI to a brush session.

use serde::{Deserialize, Serialize};

use crate::commands::SessionCommand;
use crate::error::IpcError;
use crate::input::PointerEvent;

/// Messages from the host UI to the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Brush or surface command
    Command(SessionCommand),
    /// Pointer path sample
    Pointer(PointerEvent),
}

impl ClientMessage {
    pub fn from_json(input: &str) -> Result<Self, IpcError> {
        if input.trim().is_empty() {
            return Err(IpcError::InvalidFormat("empty message".to_string()));
        }
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<SessionCommand> for ClientMessage {
    fn from(command: SessionCommand) -> Self {
        Self::Command(command)
    }
}

impl From<PointerEvent> for ClientMessage {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

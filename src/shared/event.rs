/**
 * Realtime Message Envelope
 *
 * Every message pushed over the realtime channel is a JSON object with a
 * string `type` field and an arbitrary set of sibling payload fields:
 *
 * ```json
 * {"type": "task_update", "task": {"id": 3, "status": "running"}}
 * ```
 *
 * The hub never inspects the payload. It only needs the envelope to
 * serialize once per broadcast.
 */
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::error::SharedError;
use crate::shared::task::TaskSnapshot;

/// Envelope type sent in reply to any inbound client message
pub const PONG: &str = "pong";

/// Envelope type for task status changes
pub const TASK_UPDATE: &str = "task_update";

/// Envelope type for free-form notifications
pub const NOTIFICATION: &str = "notification";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl RealtimeEvent {
    /// Create an event with no payload fields
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            payload: Map::new(),
        }
    }

    /// Add a payload field. A `type` key is ignored since it would clobber
    /// the envelope discriminator on the wire.
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "type" {
            self.payload.insert(key, value);
        }
        self
    }

    pub fn pong() -> Self {
        Self::new(PONG)
    }

    pub fn notification(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NOTIFICATION)
            .with_field("title", Value::String(title.into()))
            .with_field("message", Value::String(message.into()))
    }

    /// Task status change for the task owner's dashboard
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the snapshot cannot be encoded.
    pub fn task_update(task: &TaskSnapshot) -> Result<Self, SharedError> {
        let task = serde_json::to_value(task)?;
        Ok(Self::new(TASK_UPDATE).with_field("task", task))
    }

    /// Parse an envelope received from a client. The `type` field is required.
    pub fn from_json(text: &str) -> Result<Self, SharedError> {
        let event: Self = serde_json::from_str(text)?;
        if event.event_type.is_empty() {
            return Err(SharedError::validation("type", "Event type cannot be empty"));
        }
        Ok(event)
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}

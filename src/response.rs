//! Ping result and a typed view of the status document

use crate::assembler::StatusDocument;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// Key under which the latency is merged into the status document
pub const LATENCY_KEY: &str = "latency";

/// Status document returned by the server, with the measured latency.
///
/// Serializes as the server's document with a top-level numeric `latency`
/// field (milliseconds). A `latency` key sent by the server itself is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingResult {
    #[serde(rename = "latency")]
    latency_ms: u64,
    #[serde(flatten)]
    status: StatusDocument,
}

impl PingResult {
    pub fn new(mut status: StatusDocument, latency_ms: u64) -> PingResult {
        status.remove(LATENCY_KEY);
        PingResult { latency_ms, status }
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Server document, without the latency field
    pub fn status(&self) -> &StatusDocument {
        &self.status
    }

    /// Server document with `latency` merged in
    pub fn into_document(self) -> Value {
        let mut status = self.status;
        status.insert(LATENCY_KEY.to_string(), Value::from(self.latency_ms));
        Value::Object(status)
    }

    pub fn to_json(&self) -> String {
        self.clone().into_document().to_string()
    }

    /// Deserialize the server document into any type
    pub fn parse_status<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.status.clone()))
    }

    /// Typed view of the usual vanilla status fields
    pub fn status_response(&self) -> Result<StatusResponse, serde_json::Error> {
        self.parse_status()
    }
}

/// Vanilla status response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub version: Version,
    pub players: Option<Players>,
    /// Text component or plain string
    pub description: Option<Value>,
    /// `data:image/png;base64,...` icon
    pub favicon: Option<String>,
    pub enforces_secure_chat: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub name: String,
    pub protocol: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    pub max: i64,
    pub online: i64,
    #[serde(default)]
    pub sample: Vec<PlayerSample>,
}

/// Entry of the online player sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSample {
    pub name: String,
    pub id: Uuid,
}

impl StatusResponse {
    /// Description flattened to plain text
    pub fn motd(&self) -> String {
        let mut text = String::new();
        if let Some(description) = &self.description {
            flatten_text(description, &mut text);
        }
        text
    }
}

fn flatten_text(component: &Value, out: &mut String) {
    match component {
        Value::String(s) => out.push_str(s),
        Value::Array(parts) => parts.iter().for_each(|part| flatten_text(part, out)),
        Value::Object(fields) => {
            if let Some(Value::String(s)) = fields.get("text") {
                out.push_str(s);
            }
            if let Some(extra) = fields.get("extra") {
                flatten_text(extra, out);
            }
        }
        _ => {}
    }
}

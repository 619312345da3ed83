use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bridge::ResponseEnvelope;

/// Client -> host messages, tagged by `"type"`. Every message carries an
/// `id` that the reply echoes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "invoke")]
    Invoke {
        id: String,
        command: String,
        #[serde(default)]
        args: Vec<Value>,
    },

    #[serde(rename = "ping")]
    Ping { id: String },

    /// Ask the host to shut down.
    #[serde(rename = "quit")]
    Quit { id: String },
}

/// Host -> client messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    #[serde(rename = "response")]
    Response {
        id: String,
        envelope: ResponseEnvelope<Value>,
    },

    #[serde(rename = "ack")]
    Ack { id: String },

    /// Protocol-level failure. Command failures travel inside `Response`.
    #[serde(rename = "error")]
    Error {
        id: String,
        code: String,
        message: String,
    },
}

impl ClientMessage {
    pub fn id(&self) -> &str {
        match self {
            ClientMessage::Invoke { id, .. }
            | ClientMessage::Ping { id }
            | ClientMessage::Quit { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invoke_wire_format() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"invoke","id":"req-1","command":"window:isMaximized","args":["main"]}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Invoke {
                id: "req-1".to_string(),
                command: "window:isMaximized".to_string(),
                args: vec![json!("main")],
            }
        );
        assert_eq!(msg.id(), "req-1");
    }

    #[test]
    fn test_invoke_args_default_to_empty() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"invoke","id":"r","command":"app:getTitle"}"#)
                .unwrap();
        assert!(matches!(msg, ClientMessage::Invoke { ref args, .. } if args.is_empty()));
    }

    #[test]
    fn test_response_nests_envelope() {
        let msg = HostMessage::Response {
            id: "req-2".to_string(),
            envelope: ResponseEnvelope::err("unknown command: nope"),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "response",
                "id": "req-2",
                "envelope": {"success": false, "error": "unknown command: nope"}
            })
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"explode","id":"x"}"#);
        assert!(result.is_err());
    }
}

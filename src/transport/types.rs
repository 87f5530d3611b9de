use serde::{Deserialize, Serialize};

/// Name of the field carrying the session identifier in the session response.
pub const SESSION_ID_FIELD: &str = "sessionId";

/// Record type that marks the end of a bot reply.
const COMPLETION_TYPE: &str = "completion";

/// The request body for the chat endpoint
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequestBody<'a> {
    pub message: &'a str,
    #[serde(rename = "sessionId")]
    pub session_id: &'a str,
}

/// One JSON record of the streamed chat response.
///
/// The service sends `{"type":"content","content":"..."}` for text and
/// `{"type":"completion"}` once the reply is finished. Both fields are
/// lenient: an unknown `type` carrying `content` is still treated as text.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StreamRecord {
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl StreamRecord {
    /// Classifies the record. Returns `None` for records with nothing to fold.
    pub fn into_event(self) -> Option<StreamEvent> {
        if self.record_type == COMPLETION_TYPE {
            return Some(StreamEvent::Completed);
        }
        self.content
            .filter(|content| !content.is_empty())
            .map(StreamEvent::Content)
    }
}

/// A decoded unit of the bot reply, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Content(String),
    Completed,
}

/// Pulls a usable session id out of the session endpoint's JSON body.
/// Missing, non-string and empty ids all count as unusable.
pub fn session_id_from(body: &serde_json::Value) -> Option<String> {
    body.get(SESSION_ID_FIELD)
        .and_then(serde_json::Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}

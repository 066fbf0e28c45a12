// Wire types for the chat API (requests, responses, reply items)

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Message Roles
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Assistant,
    #[default]
    User,
}

/// Roles are not validated: anything other than the strings `system` and
/// `assistant` (including `null` and non-strings) is a user turn.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("system") => Role::System,
            Some("assistant") => Role::Assistant,
            _ => Role::User,
        })
    }
}

impl Role {
    /// Line prefix used when a conversation is flattened into plain text.
    pub fn prefix(&self) -> &'static str {
        match self {
            Role::System => "System: ",
            Role::Assistant => "Assistant: ",
            Role::User => "User: ",
        }
    }
}

// One turn of a client-supplied conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
        }
    }
}

// POST /chat request body. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub session_key: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub chat_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_messages")]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub provider: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub surface: Option<String>,
}

// Successful POST /chat response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub ok: bool,
    pub session_key: String,
    pub text: String,
}

impl ChatResponse {
    pub fn new(session_key: String, text: String) -> Self {
        Self {
            ok: true,
            session_key,
            text,
        }
    }
}

// Failure body shared by every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

// GET /health response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub ok: bool,
}

/// A single reply produced by a reply generator. Fields other than `text`
/// are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReplyItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: Option<String>,
}

impl ReplyItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// What a reply generator hands back: one item or an ordered sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ReplyOutput {
    Many(Vec<ReplyItem>),
    One(ReplyItem),
}

impl From<ReplyItem> for ReplyOutput {
    fn from(item: ReplyItem) -> Self {
        ReplyOutput::One(item)
    }
}

impl From<Vec<ReplyItem>> for ReplyOutput {
    fn from(items: Vec<ReplyItem>) -> Self {
        ReplyOutput::Many(items)
    }
}

/// Anything but an array reads as no conversation. Entries that are not
/// objects become blank turns, so they are skipped when flattening but still
/// count towards the length of the list.
fn lenient_messages<'de, D>(deserializer: D) -> Result<Option<Vec<ChatMessage>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries,
        _ => return Ok(None),
    };

    entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(_) => serde_json::from_value(entry).map_err(de::Error::custom),
            _ => Ok(ChatMessage::default()),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Accepts strings, numbers and booleans, stringifying the latter two.
/// `null`, `false` and `0` read as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or number, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
        _ => "a scalar",
    }
}

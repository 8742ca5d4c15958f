use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::relay::RelayError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinMessage {
    pub room_id: String,
    pub user_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveMessage {
    pub room_id: String,
    pub user_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeChangeMessage {
    pub room_id: String,
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LanguageChangeMessage {
    pub room_id: String,
    pub language: String,
}

/// Chat message. Relayed verbatim, so fields we don't know about are kept.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub room_id: String,
    pub user: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypingMessage {
    pub room_id: String,
    pub user: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrawMessage {
    pub room_id: String,
    pub draw_data: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LanguageUpdate {
    pub language: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TypingUpdate {
    pub user: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PongMessage {
    pub date: String,
}

/// Events a client may send. One JSON object per text frame:
/// `{"type": "<event>", "data": { .. }}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum ReceivedMessage {
    #[serde(rename = "join")]
    Join(JoinMessage),
    #[serde(rename = "codeChange", alias = "Codechange")]
    CodeChange(CodeChangeMessage),
    #[serde(rename = "languageChange", alias = "language-change")]
    LanguageChange(LanguageChangeMessage),
    #[serde(rename = "sendMessage", alias = "send-message")]
    SendMessage(ChatMessage),
    #[serde(rename = "typing")]
    Typing(TypingMessage),
    #[serde(rename = "draw")]
    Draw(DrawMessage),
    #[serde(rename = "leaveRoom")]
    LeaveRoom(LeaveMessage),
    #[serde(rename = "ping")]
    Ping,
}

impl ReceivedMessage {
    /// Decode a text frame and check the identifiers it carries.
    pub fn parse(text: &str) -> Result<Self, RelayError> {
        let msg: ReceivedMessage = serde_json::from_str(text)?;
        msg.validate()?;
        Ok(msg)
    }

    fn validate(&self) -> Result<(), RelayError> {
        let room_id = match self {
            ReceivedMessage::Join(m) => {
                require("userName", &m.user_name)?;
                &m.room_id
            }
            ReceivedMessage::LeaveRoom(m) => {
                require("userName", &m.user_name)?;
                &m.room_id
            }
            ReceivedMessage::CodeChange(m) => &m.room_id,
            ReceivedMessage::LanguageChange(m) => &m.room_id,
            ReceivedMessage::SendMessage(m) => &m.room_id,
            ReceivedMessage::Typing(m) => &m.room_id,
            ReceivedMessage::Draw(m) => &m.room_id,
            ReceivedMessage::Ping => return Ok(()),
        };
        require("roomId", room_id)
    }

    /// Event name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ReceivedMessage::Join(_) => "join",
            ReceivedMessage::CodeChange(_) => "codeChange",
            ReceivedMessage::LanguageChange(_) => "languageChange",
            ReceivedMessage::SendMessage(_) => "sendMessage",
            ReceivedMessage::Typing(_) => "typing",
            ReceivedMessage::Draw(_) => "draw",
            ReceivedMessage::LeaveRoom(_) => "leaveRoom",
            ReceivedMessage::Ping => "ping",
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), RelayError> {
    if value.trim().is_empty() {
        return Err(RelayError::BlankField(field));
    }
    Ok(())
}

/// Events the server pushes to a client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum SendMessage {
    #[serde(rename = "user-joined")]
    UserJoined(Vec<String>),
    #[serde(rename = "codeupdate")]
    CodeUpdate(String),
    #[serde(rename = "language-updated")]
    LanguageUpdated(LanguageUpdate),
    #[serde(rename = "chat-message")]
    ChatMessage(ChatMessage),
    #[serde(rename = "user-typing")]
    UserTyping(TypingUpdate),
    #[serde(rename = "draw-update")]
    DrawUpdate(Value),
    #[serde(rename = "pong")]
    Pong(PongMessage),
}

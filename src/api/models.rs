use serde::{Deserialize, Deserializer, Serialize};

/// Conversation summary as served by `/api/conversations`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Conversation {
    pub phone_number: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_message_content: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_human_intervening: bool,
}

fn null_as_false<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(de)?.unwrap_or(false))
}

impl Conversation {
    /// Display name, falling back to the phone number.
    pub fn title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.phone_number,
        }
    }
}

/// Who wrote a message. Matched case-insensitively; anything unexpected is
/// kept so it can still be styled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sender {
    Client,
    Bot,
    Human,
    Other(String),
}

impl From<String> for Sender {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "client" => Sender::Client,
            "bot" => Sender::Bot,
            "human" => Sender::Human,
            other => Sender::Other(other.to_string()),
        }
    }
}

impl From<Sender> for String {
    fn from(sender: Sender) -> Self {
        sender.as_str().to_string()
    }
}

impl Sender {
    pub fn as_str(&self) -> &str {
        match self {
            Sender::Client => "client",
            Sender::Bot => "bot",
            Sender::Human => "human",
            Sender::Other(s) => s,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    pub timestamp: String,
}

/// Body of `POST /api/send`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SendRequest {
    pub phone_number: String,
    pub message: String,
}

/// Body of `POST /api/message` on the bot server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BotRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BotReply {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_optional_fields_default() {
        let conv: Conversation =
            serde_json::from_str(r#"{"phone_number":"123","name":null}"#).unwrap();
        assert_eq!(conv.name, None);
        assert_eq!(conv.last_message_content, None);
        assert!(!conv.is_human_intervening);
        assert_eq!(conv.title(), "123");
    }

    #[test]
    fn null_intervention_flag_means_bot() {
        let conv: Conversation =
            serde_json::from_str(r#"{"phone_number":"123","is_human_intervening":null}"#).unwrap();
        assert!(!conv.is_human_intervening);
    }

    #[test]
    fn empty_name_falls_back_to_number() {
        let conv = Conversation {
            phone_number: "34600111222".into(),
            name: Some(String::new()),
            last_message_content: None,
            is_human_intervening: true,
        };
        assert_eq!(conv.title(), "34600111222");
    }

    #[test]
    fn sender_is_case_insensitive() {
        let msgs: Vec<Message> = serde_json::from_str(
            r#"[
                {"sender":"HUMAN","content":"a","timestamp":"t"},
                {"sender":"Bot","content":"b","timestamp":"t"},
                {"sender":"client","content":"c","timestamp":"t"},
                {"sender":"System","content":"d","timestamp":"t"}
            ]"#,
        )
        .unwrap();
        let senders: Vec<Sender> = msgs.into_iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![
                Sender::Human,
                Sender::Bot,
                Sender::Client,
                Sender::Other("system".into())
            ]
        );
    }

    #[test]
    fn send_request_wire_shape() {
        let body = serde_json::to_value(SendRequest {
            phone_number: "123".into(),
            message: "hola".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"phone_number": "123", "message": "hola"}));
    }
}

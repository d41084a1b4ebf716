//! View model for the operator console.
//!
//! Everything the console decides (what the sidebar shows, how a message is
//! labelled, whether a send may go out, which load response is still
//! wanted) lives here so the GTK layer only has to copy values into widgets.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, Utc};

use crate::api::ApiError;
use crate::api::models::{Conversation, Message, SendRequest, Sender};
use crate::echo::EchoPolicy;

pub const NO_CONVERSATIONS: &str = "No hay conversaciones.";
pub const NO_MESSAGES_PREVIEW: &str = "No hay mensajes.";
pub const LOADING_MESSAGES: &str = "Cargando mensajes...";
pub const HUMAN_LABEL: &str = "Tú (Manual)";
pub const BOT_LABEL: &str = "Bot";
const INVALID_TIME: &str = "--:--";

/// Who is answering a conversation right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Bot,
    Humano,
}

impl Mode {
    pub fn of(conv: &Conversation) -> Self {
        if conv.is_human_intervening {
            Mode::Humano
        } else {
            Mode::Bot
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Bot => "BOT",
            Mode::Humano => "HUMANO",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Mode::Bot => "bot",
            Mode::Humano => "humano",
        }
    }

    pub fn badge(&self) -> String {
        format!("Modo: {}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRow {
    pub title: String,
    pub preview: String,
    pub mode: Mode,
}

impl ConversationRow {
    pub fn from_conversation(conv: &Conversation) -> Self {
        Self {
            title: conv.title().to_string(),
            preview: conv
                .last_message_content
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| NO_MESSAGES_PREVIEW.to_string()),
            mode: Mode::of(conv),
        }
    }
}

/// What the sidebar list should contain.
#[derive(Debug, Clone, PartialEq)]
pub enum ListContent {
    Rows(Vec<ConversationRow>),
    Placeholder(String),
}

pub fn list_content(result: &Result<Vec<Conversation>, ApiError>) -> ListContent {
    match result {
        Ok(convs) if convs.is_empty() => ListContent::Placeholder(NO_CONVERSATIONS.to_string()),
        Ok(convs) => ListContent::Rows(convs.iter().map(ConversationRow::from_conversation).collect()),
        Err(err) => ListContent::Placeholder(format!("Error al cargar chats. {err}")),
    }
}

/// Timezone used to print message times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockZone {
    Local,
    Fixed(FixedOffset),
}

impl ClockZone {
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        match minutes {
            None => ClockZone::Local,
            Some(m) => match m.checked_mul(60).and_then(FixedOffset::east_opt) {
                Some(offset) => ClockZone::Fixed(offset),
                None => {
                    log::warn!("ignoring out of range utc offset of {m} minutes");
                    ClockZone::Local
                }
            },
        }
    }

    pub fn utc() -> Self {
        ClockZone::Fixed(Utc.fix())
    }
}

/// Format a server timestamp as a 24h `HH:MM` clock.
///
/// Zoned timestamps are converted into `zone`. Naive ones are taken as
/// wall-clock time already and printed as is.
pub fn format_clock(raw: &str, zone: ClockZone) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return match zone {
            ClockZone::Local => dt.with_timezone(&Local).format("%H:%M").to_string(),
            ClockZone::Fixed(offset) => dt.with_timezone(&offset).format("%H:%M").to_string(),
        };
    }
    for pattern in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return naive.format("%H:%M").to_string();
        }
    }
    log::debug!("unparseable timestamp {raw:?}");
    INVALID_TIME.to_string()
}

pub fn sender_label(sender: &Sender) -> Option<&'static str> {
    match sender {
        Sender::Human => Some(HUMAN_LABEL),
        Sender::Bot => Some(BOT_LABEL),
        Sender::Client | Sender::Other(_) => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageBubble {
    pub css_class: String,
    pub label: Option<&'static str>,
    pub content: String,
    pub time: Option<String>,
}

impl MessageBubble {
    pub fn from_message(msg: &Message, zone: ClockZone) -> Self {
        Self {
            css_class: msg.sender.as_str().to_string(),
            label: sender_label(&msg.sender),
            content: msg.content.clone(),
            time: Some(format_clock(&msg.timestamp, zone)),
        }
    }

    /// Operator message rendered before the server has confirmed it.
    pub fn local_echo(text: &str, zone: ClockZone) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            css_class: Sender::Human.as_str().to_string(),
            label: Some(HUMAN_LABEL),
            content: text.to_string(),
            time: Some(format_clock(&now, zone)),
        }
    }

    fn error(text: String) -> Self {
        Self {
            css_class: Sender::Client.as_str().to_string(),
            label: None,
            content: text,
            time: None,
        }
    }
}

/// What the message pane should contain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatContent {
    Loading,
    Bubbles(Vec<MessageBubble>),
}

pub fn chat_content(result: &Result<Vec<Message>, ApiError>, zone: ClockZone) -> ChatContent {
    match result {
        Ok(msgs) => ChatContent::Bubbles(
            msgs.iter()
                .map(|m| MessageBubble::from_message(m, zone))
                .collect(),
        ),
        Err(err) => ChatContent::Bubbles(vec![MessageBubble::error(format!(
            "Error al cargar mensajes. {err}"
        ))]),
    }
}

/// Trimmed input, or `None` when there is nothing worth sending.
pub fn draft_text(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Identifies one message load: the selection it was issued for and its
/// position in the sequence of loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub phone_number: String,
}

/// Console state shared by the sidebar, the message pane and the input row.
#[derive(Debug, Default)]
pub struct ConsoleState {
    selected: Option<Conversation>,
    generation: u64,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `conv` the selected contact and start loading its messages.
    pub fn select(&mut self, conv: Conversation) -> LoadTicket {
        let phone = conv.phone_number.clone();
        self.selected = Some(conv);
        self.begin_load(phone)
    }

    pub fn begin_load(&mut self, phone_number: String) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            generation: self.generation,
            phone_number,
        }
    }

    /// Whether a load response may still be shown: it must be the newest
    /// load issued and still be about the selected contact.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
            && self
                .selected
                .as_ref()
                .is_some_and(|c| c.phone_number == ticket.phone_number)
    }

    /// Build the request for a manual send, if one is allowed.
    pub fn prepare_send(&self, input: &str) -> Option<SendRequest> {
        let contact = self.selected.as_ref()?;
        let text = draft_text(input)?;
        Some(SendRequest {
            phone_number: contact.phone_number.clone(),
            message: text.to_string(),
        })
    }

    /// Reload after a confirmed send, unless the operator has moved on to
    /// another contact in the meantime.
    pub fn reload_after_send(&mut self, phone_number: &str) -> Option<LoadTicket> {
        let still_selected = self
            .selected
            .as_ref()
            .is_some_and(|c| c.phone_number == phone_number);
        still_selected.then(|| self.begin_load(phone_number.to_string()))
    }
}

/// What the input row does once a manual send has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendFollowUp {
    pub clear_input: bool,
    pub reload_after: Option<Duration>,
}

pub fn send_follow_up(outcome: &Result<(), ApiError>, policy: EchoPolicy) -> SendFollowUp {
    match outcome {
        Ok(()) => SendFollowUp {
            clear_input: true,
            reload_after: policy.reload_delay(),
        },
        Err(_) => SendFollowUp {
            clear_input: false,
            reload_after: None,
        },
    }
}

//! Transcript of the one-to-one bot chat.

use crate::api::ApiError;
use crate::console::draft_text;
use crate::echo::EchoPolicy;

pub const CONNECTIVITY_ERROR: &str =
    "Lo siento, no he podido conectar con el servidor. Inténtalo de nuevo más tarde.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    pub fn css_class(&self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotEntry {
    pub direction: Direction,
    pub text: String,
}

/// A message accepted for sending, waiting for the bot's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAsk {
    pub text: String,
    echoed: bool,
}

impl PendingAsk {
    /// The input can be emptied right away only if the text is already on
    /// screen.
    pub fn clears_input(&self) -> bool {
        self.echoed
    }
}

/// Entries appended by [`BotTranscript::resolve`], and whether the input
/// still holding the asked text should now be emptied.
#[derive(Debug, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub appended: &'a [BotEntry],
    pub clear_input: bool,
}

#[derive(Debug)]
pub struct BotTranscript {
    entries: Vec<BotEntry>,
    policy: EchoPolicy,
}

impl BotTranscript {
    pub fn new(policy: EchoPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    pub fn entries(&self) -> &[BotEntry] {
        &self.entries
    }

    /// Accept user input. Blank input is ignored and nothing should be sent.
    /// Returns the entries appended right away together with the pending ask.
    pub fn submit(&mut self, input: &str) -> Option<(PendingAsk, &[BotEntry])> {
        let text = draft_text(input)?.to_string();
        let start = self.entries.len();
        let echoed = self.policy.renders_immediately();
        if echoed {
            self.push(Direction::Sent, text.clone());
        }
        Some((PendingAsk { text, echoed }, &self.entries[start..]))
    }

    /// Record the outcome of an ask.
    pub fn resolve(&mut self, ask: PendingAsk, outcome: Result<String, ApiError>) -> Resolved<'_> {
        let start = self.entries.len();
        let clear_input = !ask.echoed && outcome.is_ok();
        match outcome {
            Ok(reply) => {
                if !ask.echoed {
                    self.push(Direction::Sent, ask.text);
                }
                self.push(Direction::Received, reply);
            }
            Err(err) => {
                log::warn!("bot request failed: {err}");
                self.push(Direction::Received, CONNECTIVITY_ERROR.to_string());
            }
        }
        Resolved {
            appended: &self.entries[start..],
            clear_input,
        }
    }

    fn push(&mut self, direction: Direction, text: String) {
        self.entries.push(BotEntry { direction, text });
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a chat view shows a message the user just sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoPolicy {
    /// Render the text right away and never reconcile it with the server.
    Optimistic,
    /// Render nothing locally; reload from the server once the send has
    /// been accepted and `reload_after` has elapsed.
    Confirmed { reload_after: Duration },
}

impl EchoPolicy {
    pub fn renders_immediately(&self) -> bool {
        matches!(self, EchoPolicy::Optimistic)
    }

    pub fn reload_delay(&self) -> Option<Duration> {
        match self {
            EchoPolicy::Optimistic => None,
            EchoPolicy::Confirmed { reload_after } => Some(*reload_after),
        }
    }
}

/// Serialized form of [`EchoPolicy`] in the settings file. The reload delay
/// lives in its own key so it can be tuned without switching modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EchoMode {
    Optimistic,
    Confirmed,
}

impl EchoMode {
    pub fn with_delay(self, reload_after: Duration) -> EchoPolicy {
        match self {
            EchoMode::Optimistic => EchoPolicy::Optimistic,
            EchoMode::Confirmed => EchoPolicy::Confirmed { reload_after },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmed_carries_delay() {
        let policy = EchoMode::Confirmed.with_delay(Duration::from_millis(500));
        assert!(!policy.renders_immediately());
        assert_eq!(policy.reload_delay(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn optimistic_never_reloads() {
        let policy = EchoMode::Optimistic.with_delay(Duration::from_secs(3));
        assert!(policy.renders_immediately());
        assert_eq!(policy.reload_delay(), None);
    }
}

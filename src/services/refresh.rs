//! Recompute triggers
//!
//! The host application decides when to recompute (initial load, pull to
//! refresh, screen focus, or a change notification) and passes the reason
//! along as a plain value. The trigger is recorded on the result and in the
//! logs; it never changes what gets computed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Topic of a change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshTopic {
    TransactionAdded,
    TransactionUpdated,
    TransactionDeleted,
    PreferencesChanged,
}

impl RefreshTopic {
    pub const ALL: [RefreshTopic; 4] = [
        Self::TransactionAdded,
        Self::TransactionUpdated,
        Self::TransactionDeleted,
        Self::PreferencesChanged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransactionAdded => "transaction-added",
            Self::TransactionUpdated => "transaction-updated",
            Self::TransactionDeleted => "transaction-deleted",
            Self::PreferencesChanged => "preferences-changed",
        }
    }
}

impl fmt::Display for RefreshTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefreshTopic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown refresh topic: {}", s))
    }
}

/// Why a recompute was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "trigger", content = "topic")]
pub enum RecomputeTrigger {
    #[default]
    InitialLoad,
    Refresh,
    Focus,
    Event(RefreshTopic),
}

impl fmt::Display for RecomputeTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitialLoad => f.write_str("initial-load"),
            Self::Refresh => f.write_str("refresh"),
            Self::Focus => f.write_str("focus"),
            Self::Event(topic) => write!(f, "event:{}", topic),
        }
    }
}

impl From<RefreshTopic> for RecomputeTrigger {
    fn from(topic: RefreshTopic) -> Self {
        Self::Event(topic)
    }
}

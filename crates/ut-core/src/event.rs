//! Raw foreground lifecycle events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::AppKey;

/// A single lifecycle transition observed for an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    /// The application the transition belongs to.
    pub key: AppKey,
    /// Whether the application entered or left the foreground.
    pub kind: UsageEventKind,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl UsageEvent {
    pub const fn new(key: AppKey, kind: UsageEventKind, timestamp: i64) -> Self {
        Self {
            key,
            kind,
            timestamp,
        }
    }

    pub const fn entered(key: AppKey, timestamp: i64) -> Self {
        Self::new(key, UsageEventKind::EnteredForeground, timestamp)
    }

    pub const fn left(key: AppKey, timestamp: i64) -> Self {
        Self::new(key, UsageEventKind::LeftForeground, timestamp)
    }
}

/// Foreground transition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageEventKind {
    EnteredForeground,
    LeftForeground,
}

impl UsageEventKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnteredForeground => "entered_foreground",
            Self::LeftForeground => "left_foreground",
        }
    }
}

impl fmt::Display for UsageEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsageEventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entered_foreground" | "activity_resumed" | "resumed" => Ok(Self::EnteredForeground),
            "left_foreground" | "activity_paused" | "paused" => Ok(Self::LeftForeground),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

impl Serialize for UsageEventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UsageEventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event kind strings.
#[derive(Debug, Clone)]
pub struct UnknownEventKind(String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

// src/model/message.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentiment of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Map a raw span label from the dialogue annotator. The service marks
    /// positive spans "POS"; every other label reads as negative.
    pub fn from_annotator_label(label: &str) -> Self {
        if label == "POS" {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intent of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Salutation,
    Praise,
    Complaint,
    Question,
    Request,
    Explanation,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Salutation => "Salutation",
            Intent::Praise => "Praise",
            Intent::Complaint => "Complaint",
            Intent::Question => "Question",
            Intent::Request => "Request",
            Intent::Explanation => "Explanation",
        }
    }

    /// Parse a zero-shot classifier label. The classifier is configured with
    /// "hello" as its greeting label, which normalizes to `Salutation`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "hello" | "salutation" => Some(Intent::Salutation),
            "praise" => Some(Intent::Praise),
            "complaint" => Some(Intent::Complaint),
            "question" => Some(Intent::Question),
            "request" => Some(Intent::Request),
            "explanation" => Some(Intent::Explanation),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::from_label(s).ok_or_else(|| format!("Unknown intent label: {s}"))
    }
}

/// Structured representation of a chat message.
///
/// Constructed by the caller, enriched in place by the alignment walk.
/// Caller-supplied `sentiment`, `intent` and `root_message_id` are
/// authoritative and never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub text: String,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub root_message_id: Option<String>,
}

impl Message {
    /// Message length in characters, the unit all span offsets count in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

// src/model/tag.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Span tag kinds understood by the aligner.
///
/// Annotator responses carrying any other kind are rejected at the adapter
/// boundary rather than flowing into the walk as an open-ended string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagKind {
    Speaker,
    DialogueSegmentation,
    Sentiments,
    Intent,
}

impl TagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Speaker => "speaker",
            TagKind::DialogueSegmentation => "dialogue-segmentation",
            TagKind::Sentiments => "sentiments",
            TagKind::Intent => "intent",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "speaker" => Some(TagKind::Speaker),
            "dialogue-segmentation" => Some(TagKind::DialogueSegmentation),
            "sentiments" => Some(TagKind::Sentiments),
            "intent" => Some(TagKind::Intent),
            _ => None,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A labeled interval over a text document.
///
/// Offsets are character positions into the owning document, with
/// `start_idx <= end_idx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanTag {
    pub kind: TagKind,
    pub start_idx: usize,
    pub end_idx: usize,
    pub name: String,
}

impl SpanTag {
    pub fn new(kind: TagKind, start_idx: usize, end_idx: usize, name: impl Into<String>) -> Self {
        Self {
            kind,
            start_idx,
            end_idx,
            name: name.into(),
        }
    }
}

/// A text document with its span tags. Request-scoped; there is no
/// cross-request document state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    #[serde(default)]
    pub tags: Vec<SpanTag>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags(text: impl Into<String>, tags: Vec<SpanTag>) -> Self {
        Self {
            text: text.into(),
            tags,
        }
    }

    /// Tags of one kind, in document order.
    pub fn tags_of_kind(&self, kind: TagKind) -> impl Iterator<Item = &SpanTag> {
        self.tags.iter().filter(move |tag| tag.kind == kind)
    }
}

// src/document.rs
// Builds the annotator input documents from a chat stream.

use crate::error::AnalyticsError;
use crate::model::{Document, Message, SpanTag, TagKind};

/// The two annotator inputs derived from one chat stream.
#[derive(Debug, Clone)]
pub struct DocumentSet {
    /// All message texts joined with no separator, one speaker tag per
    /// message. Input to the dialogue segmentation + sentiment annotator.
    pub conversation: Document,
    /// One independent tag-free document per message. Input to the intent
    /// classifier; offsets are not shared with the conversation document.
    pub per_message: Vec<Document>,
}

/// Pure transformation from messages to annotator documents.
///
/// Speaker spans cover `[offset, offset + char_len)` with the running offset
/// advanced by the message length alone; the alignment walk later advances
/// its own offset by length + 1, and that asymmetry is intentional.
pub fn build_documents(messages: &[Message]) -> Result<DocumentSet, AnalyticsError> {
    if messages.is_empty() {
        return Err(AnalyticsError::Validation("chat stream is empty".to_string()));
    }

    let mut text = String::new();
    let mut tags = Vec::with_capacity(messages.len());
    let mut offset = 0usize;
    for message in messages {
        let message_len = message.char_len();
        tags.push(SpanTag::new(
            TagKind::Speaker,
            offset,
            offset + message_len,
            &message.user_id,
        ));
        text.push_str(&message.text);
        offset += message_len;
    }

    let per_message = messages
        .iter()
        .map(|message| Document::new(message.text.clone()))
        .collect();

    Ok(DocumentSet {
        conversation: Document::with_tags(text, tags),
        per_message,
    })
}

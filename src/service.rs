// src/service.rs
// Orchestrates the annotators and the alignment walk for one chat stream.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::align::Alignment;
use crate::annotator::Annotator;
use crate::document::{DocumentSet, build_documents};
use crate::error::{AnalyticsError, AnnotatorError, Result};
use crate::model::Message;
use crate::store::{ExampleRecord, ExampleStore};

/// Entry point for chat stream analysis.
///
/// Each call builds fresh documents; there is no shared mutable state
/// across concurrent requests.
pub struct ChatAnalytics {
    dialogue: Arc<dyn Annotator>,
    intent: Arc<dyn Annotator>,
    examples: Arc<dyn ExampleStore>,
}

impl ChatAnalytics {
    pub fn new(
        dialogue: Arc<dyn Annotator>,
        intent: Arc<dyn Annotator>,
        examples: Arc<dyn ExampleStore>,
    ) -> Self {
        Self {
            dialogue,
            intent,
            examples,
        }
    }

    /// Analyze a stream of chat messages and fill in sentiment, intent and
    /// thread roots where the caller left them absent.
    ///
    /// The two annotator calls are independent and run concurrently; both
    /// must succeed before alignment starts. Output length and order match
    /// the input exactly.
    pub async fn analyze(&self, chat_stream: Vec<Message>) -> Result<Vec<Message>> {
        validate_stream(&chat_stream)?;

        let DocumentSet {
            conversation,
            per_message,
        } = build_documents(&chat_stream)?;

        info!(
            "Analyzing chat stream of {} messages ({} chars)",
            chat_stream.len(),
            conversation.text.chars().count()
        );

        let (mut conversation_docs, message_docs) = tokio::try_join!(
            self.dialogue.annotate(vec![conversation]),
            self.intent.annotate(per_message),
        )?;

        if conversation_docs.len() != 1 {
            return Err(AnnotatorError::DocumentCount {
                expected: 1,
                actual: conversation_docs.len(),
            }
            .into());
        }
        let conversation = conversation_docs.remove(0);

        let alignment = Alignment::from_conversation(&conversation)?;
        let enriched = alignment.enrich(chat_stream, &message_docs)?;
        Ok(enriched)
    }

    /// Upload a labeled chat stream as training examples, one record per
    /// message. Persistence beyond the store contract is external.
    pub async fn add_examples(&self, chat_stream: Vec<Message>) -> Result<()> {
        validate_stream(&chat_stream)?;

        let examples: Vec<ExampleRecord> = chat_stream.iter().map(ExampleRecord::from_message).collect();
        self.examples.put(examples).await?;

        info!("Uploaded {} chat examples", chat_stream.len());
        Ok(())
    }
}

fn validate_stream(chat_stream: &[Message]) -> Result<()> {
    if chat_stream.is_empty() {
        return Err(AnalyticsError::Validation("chat stream is empty".to_string()));
    }

    let mut seen = HashSet::new();
    for message in chat_stream {
        if message.text.is_empty() {
            return Err(AnalyticsError::Validation(format!(
                "message {} has empty text",
                message.message_id
            )));
        }
        if !seen.insert(message.message_id.as_str()) {
            // Thread-root lookups assume ids are unique within one stream.
            warn!("Duplicate message id {} in chat stream", message.message_id);
        }
    }

    Ok(())
}

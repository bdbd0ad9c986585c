// src/align.rs
// Stitches span tags from the annotators back onto message boundaries.
//
// The walk is a single left-to-right pass: both tag streams are consumed in
// offset order alongside the original messages, so nothing is re-scanned.
// The cost is that badly-ordered or overlapping annotator output is not
// tolerated; tags must sort by start offset within each kind.

use tracing::debug;

use crate::error::AlignmentError;
use crate::model::{Document, Intent, Message, Sentiment, SpanTag, TagKind};

/// State carried across the walk, threaded through each step explicitly.
///
/// `offset` advances by message length + 1 per message, which does not match
/// the separator-free layout of the conversation document (speaker spans are
/// built without the + 1). Historical behavior; both sides are kept as-is.
#[derive(Debug)]
struct WalkState {
    offset: usize,
    thread_idx: usize,
    root: Option<String>,
}

/// Sorted tag streams extracted from the annotated conversation document.
pub struct Alignment {
    thread_tags: Vec<SpanTag>,
    sentiment_tags: Vec<SpanTag>,
}

impl Alignment {
    /// Pull the segmentation and sentiment streams out of the conversation
    /// document. At least one segmentation tag must be present; the walk
    /// cannot start without a current segment.
    pub fn from_conversation(conversation: &Document) -> Result<Self, AlignmentError> {
        let mut thread_tags: Vec<SpanTag> = conversation
            .tags_of_kind(TagKind::DialogueSegmentation)
            .cloned()
            .collect();
        thread_tags.sort_by_key(|tag| tag.start_idx);

        let mut sentiment_tags: Vec<SpanTag> = conversation
            .tags_of_kind(TagKind::Sentiments)
            .cloned()
            .collect();
        sentiment_tags.sort_by_key(|tag| tag.start_idx);

        if thread_tags.is_empty() {
            return Err(AlignmentError::MissingSegmentation);
        }

        debug!(
            "alignment over {} segments, {} sentiment spans",
            thread_tags.len(),
            sentiment_tags.len()
        );

        Ok(Self {
            thread_tags,
            sentiment_tags,
        })
    }

    /// Enrich the messages in place and return them in input order.
    ///
    /// Messages pair with their intent documents in lockstep; a length
    /// mismatch between the two is an invariant violation and fails the
    /// request rather than silently padding the shorter side.
    pub fn enrich(
        &self,
        mut messages: Vec<Message>,
        per_message: &[Document],
    ) -> Result<Vec<Message>, AlignmentError> {
        if messages.len() != per_message.len() {
            return Err(AlignmentError::DocumentCountMismatch {
                messages: messages.len(),
                documents: per_message.len(),
            });
        }

        let mut state = WalkState {
            offset: 0,
            thread_idx: 0,
            root: None,
        };
        for (message, document) in messages.iter_mut().zip(per_message) {
            self.step(&mut state, message, document)?;
        }

        Ok(messages)
    }

    fn step(
        &self,
        state: &mut WalkState,
        message: &mut Message,
        document: &Document,
    ) -> Result<(), AlignmentError> {
        let message_len = message.char_len();

        // Thread segmentation advance. At most one boundary is crossed per
        // message; a message spanning several segments still advances one.
        let segment = self
            .thread_tags
            .get(state.thread_idx)
            .ok_or(AlignmentError::SegmentationExhausted {
                offset: state.offset,
            })?;
        if state.offset > segment.end_idx {
            state.thread_idx += 1;
            state.root = Some(
                message
                    .root_message_id
                    .clone()
                    .unwrap_or_else(|| message.message_id.clone()),
            );
        }

        // Caller-supplied roots are authoritative: they are kept verbatim
        // and become the carried root for the messages that follow.
        match &message.root_message_id {
            None => {
                message.root_message_id = Some(
                    state
                        .root
                        .clone()
                        .unwrap_or_else(|| message.message_id.clone()),
                );
            }
            Some(explicit) => state.root = Some(explicit.clone()),
        }

        if message.intent.is_none() {
            if let Some(tag) = document.tags_of_kind(TagKind::Intent).next() {
                let intent = Intent::from_label(&tag.name)
                    .ok_or_else(|| AlignmentError::UnknownIntentLabel(tag.name.clone()))?;
                message.intent = Some(intent);
            }
        }

        if message.sentiment.is_none() {
            message.sentiment = Some(self.sentiment_at(state.offset, message_len));
        }

        state.offset += message_len + 1;
        Ok(())
    }

    /// Majority sentiment over the spans near a message, Neutral when none
    /// qualify. The window test keys off the walk offset rather than exact
    /// interval overlap, so a short message can match a neighboring span;
    /// behavior is kept verbatim.
    fn sentiment_at(&self, offset: usize, message_len: usize) -> Sentiment {
        let offset = offset as i64;
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for tag in &self.sentiment_tags {
            // The left bound can go negative for short messages near the
            // document start, hence the signed arithmetic.
            if tag.start_idx as i64 - message_len as i64 <= offset
                && offset <= tag.end_idx as i64
            {
                match counts.iter_mut().find(|(name, _)| *name == tag.name) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((tag.name.as_str(), 1)),
                }
            }
        }

        // Stable mode: ties go to the label encountered first.
        let mut winner: Option<(&str, usize)> = None;
        for (label, count) in counts {
            if winner.map_or(true, |(_, best)| count > best) {
                winner = Some((label, count));
            }
        }

        match winner {
            Some((label, _)) => Sentiment::from_annotator_label(label),
            None => Sentiment::Neutral,
        }
    }
}

//! HTTP client for task-based annotation services.
//!
//! Annotation runs asynchronously on the service side: a submit creates a
//! task, the task is polled until it reaches a terminal state, and the
//! tagged documents come back with the final task status.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::{Annotator, TaskHandle};
use crate::error::AnnotatorError;
use crate::model::{Document, SpanTag, TagKind};

/// Default poll interval while waiting on a task.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default cap on poll attempts before a task counts as timed out.
const DEFAULT_MAX_POLLS: u32 = 600;

/// Annotation task state from the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Initial state, task is queued
    Pending,
    /// Task is being processed
    Running,
    /// All documents annotated successfully
    Succeeded,
    /// Task failed (check error details)
    Failed,
    /// Unknown state
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Returns true if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// A document on the annotation service wire. The id correlates a submitted
/// document with its annotated counterpart.
#[derive(Debug, Serialize, Deserialize)]
struct WireDocument {
    id: String,
    text: String,
    #[serde(default)]
    tags: Vec<WireTag>,
}

/// Service tags arrive with an open string kind; conversion into [`SpanTag`]
/// validates kind membership at this boundary.
#[derive(Debug, Serialize, Deserialize)]
struct WireTag {
    kind: String,
    start_idx: usize,
    end_idx: usize,
    name: String,
}

impl WireTag {
    fn into_span_tag(self) -> Result<SpanTag, AnnotatorError> {
        let kind = TagKind::parse(&self.kind)
            .ok_or_else(|| AnnotatorError::UnknownTagKind(self.kind.clone()))?;
        Ok(SpanTag::new(kind, self.start_idx, self.end_idx, self.name))
    }
}

#[derive(Debug, Serialize)]
struct CreateTaskRequest<'a> {
    documents: Vec<WireDocument>,
    options: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    task_id: String,
    state: TaskState,
    error: Option<String>,
    documents: Option<Vec<WireDocument>>,
}

/// Client for one remote annotation capability.
///
/// The same wire protocol serves both backends; what distinguishes them is
/// the options blob sent with every submit.
pub struct RemoteAnnotator {
    name: &'static str,
    client: Client,
    base_url: String,
    api_key: String,
    options: serde_json::Value,
    poll_interval: Duration,
    max_polls: u32,
}

impl RemoteAnnotator {
    pub fn new(
        name: &'static str,
        base_url: &str,
        api_key: &str,
        options: serde_json::Value,
    ) -> Self {
        Self {
            name,
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            options,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Override the poll cadence for the wait loop.
    pub fn with_polling(mut self, poll_interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_polls = max_polls;
        self
    }

    /// Dialogue annotator: segments a conversation into threads and scores
    /// sentiment spans over the concatenated document.
    pub fn dialogue_annotator(base_url: &str, api_key: &str) -> Self {
        Self::new(
            "dialogue-annotator",
            base_url,
            api_key,
            json!({
                "skills": ["dialogue-segmentation", "sentiments"],
            }),
        )
    }

    /// Zero-shot intent classifier over independent per-message documents.
    /// "hello" is the greeting label; the aligner normalizes it later.
    pub fn intent_classifier(base_url: &str, api_key: &str, model: &str) -> Self {
        Self::new(
            "intent-classifier",
            base_url,
            api_key,
            json!({
                "model": model,
                "labels": ["hello", "praise", "complaint", "question", "request", "explanation"],
                "tag_kind": "intent",
                "multi_label": false,
            }),
        )
    }

    async fn get_task(&self, task_id: &str) -> Result<TaskEnvelope, AnnotatorError> {
        let url = format!("{}/v1/tasks/{}", self.base_url, task_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnnotatorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Annotator for RemoteAnnotator {
    async fn submit(&self, documents: Vec<Document>) -> Result<TaskHandle, AnnotatorError> {
        let documents: Vec<WireDocument> = documents
            .into_iter()
            .map(|doc| WireDocument {
                id: Uuid::new_v4().to_string(),
                text: doc.text,
                tags: doc
                    .tags
                    .into_iter()
                    .map(|tag| WireTag {
                        kind: tag.kind.as_str().to_string(),
                        start_idx: tag.start_idx,
                        end_idx: tag.end_idx,
                        name: tag.name,
                    })
                    .collect(),
            })
            .collect();

        debug!("{}: submitting {} documents", self.name, documents.len());

        let url = format!("{}/v1/tasks", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CreateTaskRequest {
                documents,
                options: &self.options,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AnnotatorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: TaskEnvelope = response.json().await?;
        debug!("{}: created task {}", self.name, envelope.task_id);

        Ok(TaskHandle {
            task_id: envelope.task_id,
        })
    }

    async fn wait(&self, handle: &TaskHandle) -> Result<Vec<Document>, AnnotatorError> {
        let mut polls = 0;

        loop {
            let envelope = self.get_task(&handle.task_id).await?;

            if envelope.state.is_terminal() {
                if envelope.state == TaskState::Failed {
                    return Err(AnnotatorError::TaskFailed {
                        task_id: handle.task_id.clone(),
                        message: envelope.error.unwrap_or_default(),
                    });
                }
                let documents = envelope.documents.unwrap_or_default();
                return documents
                    .into_iter()
                    .map(|doc| {
                        let tags = doc
                            .tags
                            .into_iter()
                            .map(WireTag::into_span_tag)
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(Document::with_tags(doc.text, tags))
                    })
                    .collect();
            }

            polls += 1;
            if polls >= self.max_polls {
                return Err(AnnotatorError::Timeout {
                    task_id: handle.task_id.clone(),
                    polls,
                });
            }

            debug!(
                "{}: task {} is {:?}, polling again in {:?} (poll {}/{})",
                self.name, handle.task_id, envelope.state, self.poll_interval, polls, self.max_polls
            );

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

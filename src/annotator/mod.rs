//! Annotator client abstraction.
//!
//! Two external services tag documents: a dialogue annotator that segments a
//! whole conversation and scores sentiment spans, and a zero-shot intent
//! classifier that labels messages one at a time. Both sit behind the same
//! task-based contract: submit documents, poll until the task settles,
//! collect the tagged documents back.

mod remote;

pub use remote::{RemoteAnnotator, TaskState};

use async_trait::async_trait;

use crate::error::AnnotatorError;
use crate::model::Document;

/// Opaque handle to an in-flight annotation task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    pub task_id: String,
}

/// Blocking request/response contract over an annotation backend.
///
/// `wait` polls with a bounded interval and poll count; exhausting the bound
/// surfaces a timeout error. There is no cancellation of in-flight tasks.
#[async_trait]
pub trait Annotator: Send + Sync {
    /// Dispatch a batch of documents for annotation.
    async fn submit(&self, documents: Vec<Document>) -> Result<TaskHandle, AnnotatorError>;

    /// Block until the task settles and return the annotated documents in
    /// submission order.
    async fn wait(&self, handle: &TaskHandle) -> Result<Vec<Document>, AnnotatorError>;

    /// Get the annotator name for logging
    fn name(&self) -> &'static str;

    /// Submit and wait in one step.
    async fn annotate(&self, documents: Vec<Document>) -> Result<Vec<Document>, AnnotatorError> {
        let handle = self.submit(documents).await?;
        self.wait(&handle).await
    }
}

// src/error.rs
// Standardized error types for chat analytics

use thiserror::Error;

/// Main error type for the analytics library
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("invalid chat stream: {0}")]
    Validation(String),

    #[error("annotator error: {0}")]
    Annotator(#[from] AnnotatorError),

    #[error("alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    #[error("example store error: {0}")]
    Store(#[from] StoreError),
}

/// Failures talking to an external annotation service. Either annotator
/// failing is fatal to the whole request; no partial enrichment is returned.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("annotation service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("annotation task {task_id} failed: {message}")]
    TaskFailed { task_id: String, message: String },

    #[error("annotation task {task_id} did not complete after {polls} polls")]
    Timeout { task_id: String, polls: u32 },

    #[error("unknown tag kind `{0}` in annotator response")]
    UnknownTagKind(String),

    #[error("annotator returned {actual} documents, expected {expected}")]
    DocumentCount { expected: usize, actual: usize },
}

/// Invariant violations detected while stitching span tags back onto
/// message boundaries.
#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error("conversation document has no dialogue segmentation tags")]
    MissingSegmentation,

    #[error("segmentation tags exhausted at offset {offset}")]
    SegmentationExhausted { offset: usize },

    #[error("{messages} messages but {documents} intent documents")]
    DocumentCountMismatch { messages: usize, documents: usize },

    #[error("unknown intent label `{0}`")]
    UnknownIntentLabel(String),
}

/// Failures persisting labeled examples to the external store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("example store returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Convenience type alias for Result using AnalyticsError
pub type Result<T> = std::result::Result<T, AnalyticsError>;

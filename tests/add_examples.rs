// tests/add_examples.rs
// Example upload path over an in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use chat_analytics::annotator::{Annotator, TaskHandle};
use chat_analytics::error::{AnalyticsError, AnnotatorError, StoreError};
use chat_analytics::model::{Document, Intent, Message, Sentiment};
use chat_analytics::service::ChatAnalytics;
use chat_analytics::store::{ExampleRecord, ExampleStore};

/// Annotator stub; the example path never reaches it.
struct UnusedAnnotator;

#[async_trait]
impl Annotator for UnusedAnnotator {
    async fn submit(&self, _documents: Vec<Document>) -> Result<TaskHandle, AnnotatorError> {
        unreachable!("add_examples does not annotate");
    }

    async fn wait(&self, _handle: &TaskHandle) -> Result<Vec<Document>, AnnotatorError> {
        unreachable!("add_examples does not annotate");
    }

    fn name(&self) -> &'static str {
        "unused"
    }
}

#[derive(Default)]
struct MemoryExampleStore {
    records: Mutex<Vec<ExampleRecord>>,
}

impl MemoryExampleStore {
    fn records(&self) -> Vec<ExampleRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExampleStore for MemoryExampleStore {
    async fn put(&self, examples: Vec<ExampleRecord>) -> Result<(), StoreError> {
        self.records.lock().unwrap().extend(examples);
        Ok(())
    }
}

fn service_with_store() -> (ChatAnalytics, Arc<MemoryExampleStore>) {
    let store = Arc::new(MemoryExampleStore::default());
    let service = ChatAnalytics::new(
        Arc::new(UnusedAnnotator),
        Arc::new(UnusedAnnotator),
        store.clone(),
    );
    (service, store)
}

fn labeled_message(id: &str, text: &str) -> Message {
    Message {
        message_id: id.to_string(),
        timestamp: Utc.with_ymd_and_hms(2022, 6, 15, 16, 18, 33).unwrap(),
        user_id: "u001".to_string(),
        text: text.to_string(),
        sentiment: Some(Sentiment::Positive),
        intent: Some(Intent::Praise),
        root_message_id: Some("0".to_string()),
    }
}

#[tokio::test]
async fn test_one_record_per_message() {
    let (service, store) = service_with_store();
    let messages = vec![
        labeled_message("0", "Thanks for the quick fix!"),
        labeled_message("1", "Really appreciate it."),
    ];

    service.add_examples(messages).await.unwrap();

    let records = store.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text, "Thanks for the quick fix!");
    assert_eq!(records[1].text, "Really appreciate it.");
}

#[tokio::test]
async fn test_records_reconstruct_labeled_fields() {
    let (service, store) = service_with_store();
    let message = labeled_message("42", "Thanks for the quick fix!");
    let expected_timestamp = message.timestamp.to_rfc3339();

    service.add_examples(vec![message]).await.unwrap();

    let records = store.records();
    let value = |kind: &str| {
        records[0]
            .tags
            .iter()
            .find(|tag| tag.kind == kind)
            .map(|tag| tag.name.clone())
            .unwrap()
    };
    assert_eq!(value("sentiments"), "Positive");
    assert_eq!(value("intent"), "Praise");
    assert_eq!(value("root_message_id"), "0");
    assert_eq!(value("timestamp"), expected_timestamp);
    assert_eq!(value("user_id"), "u001");
    assert_eq!(value("message_id"), "42");
}

#[tokio::test]
async fn test_unlabeled_fields_store_as_empty_strings() {
    let (service, store) = service_with_store();
    let mut message = labeled_message("0", "Hi Team!");
    message.sentiment = None;
    message.intent = None;
    message.root_message_id = None;

    service.add_examples(vec![message]).await.unwrap();

    let records = store.records();
    let value = |kind: &str| {
        records[0]
            .tags
            .iter()
            .find(|tag| tag.kind == kind)
            .map(|tag| tag.name.clone())
            .unwrap()
    };
    assert_eq!(value("sentiments"), "");
    assert_eq!(value("intent"), "");
    assert_eq!(value("root_message_id"), "");
}

#[tokio::test]
async fn test_empty_stream_is_rejected() {
    let (service, store) = service_with_store();
    let result = service.add_examples(Vec::new()).await;
    assert!(matches!(result, Err(AnalyticsError::Validation(_))));
    assert!(store.records().is_empty());
}

// src/store.rs
// External storage for labeled training examples.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::model::Message;

/// An offset-free labeled attribute on a stored example. Unlike span tags,
/// attribute kinds are open strings: they name message fields, not
/// annotator capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeTag {
    pub kind: String,
    pub name: String,
}

/// One training example: a message text plus its labeled attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleRecord {
    pub text: String,
    pub tags: Vec<AttributeTag>,
}

impl ExampleRecord {
    /// Stringify a message into its attribute tags. Absent fields store as
    /// empty strings; sentiment keeps its historical plural kind.
    pub fn from_message(message: &Message) -> Self {
        let attribute = |kind: &str, name: String| AttributeTag {
            kind: kind.to_string(),
            name,
        };
        let tags = vec![
            attribute(
                "sentiments",
                message
                    .sentiment
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
            ),
            attribute(
                "intent",
                message
                    .intent
                    .map(|i| i.as_str().to_string())
                    .unwrap_or_default(),
            ),
            attribute(
                "root_message_id",
                message.root_message_id.clone().unwrap_or_default(),
            ),
            attribute("timestamp", message.timestamp.to_rfc3339()),
            attribute("user_id", message.user_id.clone()),
            attribute("message_id", message.message_id.clone()),
        ];
        Self {
            text: message.text.clone(),
            tags,
        }
    }
}

/// Contract for the example persistence backend.
#[async_trait]
pub trait ExampleStore: Send + Sync {
    /// Persist a batch of examples. The whole batch lands as one upload.
    async fn put(&self, examples: Vec<ExampleRecord>) -> Result<(), StoreError>;
}

/// Stores examples through the annotation platform's file API.
pub struct RemoteExampleStore {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct CreateFileRequest {
    blocks: Vec<ExampleRecord>,
}

impl RemoteExampleStore {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ExampleStore for RemoteExampleStore {
    async fn put(&self, examples: Vec<ExampleRecord>) -> Result<(), StoreError> {
        debug!("Uploading {} example records", examples.len());

        let url = format!("{}/v1/files", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CreateFileRequest { blocks: examples })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

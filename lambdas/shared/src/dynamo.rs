//! DynamoDB operations for the Movies API
//!
//! Items are written as-is; the table's key schema is owned by the
//! deployment:
//!
//! | Attribute | Type | Source            |
//! |-----------|------|-------------------|
//! | year      | N    | `MovieItem::year`  |
//! | title     | S    | `MovieItem::title` |
//! | id        | S    | `MovieItem::id`    |

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::to_item;
use std::collections::HashMap;
use tracing::info;

use crate::config::Config;
use crate::errors::{Error, Result};
use crate::models::MovieItem;

/// Storage for movie records
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Write one movie to `table`, replacing any item with the same key
    async fn put_movie(&self, table: &str, movie: &MovieItem) -> Result<()>;
}

/// DynamoDB client for Movies API operations
#[derive(Debug, Clone)]
pub struct DynamoClient {
    client: Client,
}

impl DynamoClient {
    /// Create a new DynamoDB client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the AWS default provider chain, honouring the
    /// configured endpoint override
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(endpoint) = &config.dynamodb_endpoint {
            info!(endpoint = %endpoint, "Using DynamoDB endpoint override");
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }

    /// Access the underlying SDK client
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl MovieStore for DynamoClient {
    async fn put_movie(&self, table: &str, movie: &MovieItem) -> Result<()> {
        let item = movie_item(movie)?;

        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert a movie into DynamoDB attributes
pub fn movie_item(movie: &MovieItem) -> Result<HashMap<String, AttributeValue>> {
    to_item(movie).map_err(|e| Error::DynamoSerialization(e.to_string()))
}

//! Movies API Client for testing

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::fixtures::{load_env, API_URL_ENV};

/// API client for the Movies API
pub struct MoviesApiClient {
    client: Client,
    url: String,
}

// Request/Response types

/// Body of an insert request
///
/// `year` is a JSON value so tests can send it as a number or a string.
#[derive(Debug, Clone, Serialize)]
pub struct NewMovie {
    pub year: serde_json::Value,
    pub title: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Result type for API responses
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// HTTP error with status code and body
    Http { status: StatusCode, body: String },
    /// Network or serialization error
    Request(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Request(_) => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ApiError::Request(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl MoviesApiClient {
    /// Create a new client for the insert route at `url`
    pub fn new(url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Create a client from environment variable
    pub fn from_env() -> Self {
        load_env();
        let url = std::env::var(API_URL_ENV).expect("MOVIES_API_URL environment variable not set");
        Self::new(&url)
    }

    /// Insert a movie
    pub async fn insert_movie(&self, movie: &NewMovie) -> ApiResult<MessageResponse> {
        let response = self
            .client
            .post(&self.url)
            .json(movie)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Insert the default movie by posting without a body
    pub async fn insert_default(&self) -> ApiResult<MessageResponse> {
        let response = self
            .client
            .post(&self.url)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        self.handle_response(response).await
    }

    /// Post a raw body, bypassing serialization
    pub async fn insert_raw(&self, body: &str) -> ApiResult<MessageResponse> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| ApiError::Request(e.to_string()))
        } else {
            Err(ApiError::Http { status, body })
        }
    }
}

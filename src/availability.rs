// Availability service client
// Builds the per-airport request body and posts it to the hotels availability endpoint

use crate::stay::StayWindow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3050";
pub const DEFAULT_AVAILABILITY_PATH: &str = "/availability";
pub const DEFAULT_SALES_CHANNEL: &str = "website";
pub const DEFAULT_OCCUPANCY: &str = "2-2";

// Error types for availability calls
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError {
        status_code: u16,
        message: String,
        error_type: Option<String>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub availability_path: String,
    pub timeout_ms: u64,
    // Honour HTTP_PROXY / HTTPS_PROXY from the environment
    pub use_env_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            availability_path: DEFAULT_AVAILABILITY_PATH.to_string(),
            timeout_ms: 30_000,
            use_env_proxy: true,
        }
    }
}

impl ClientConfig {
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.availability_path
        )
    }
}

// Request body sent for one airport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub airport_code: String,
    pub check_in: String,
    pub check_out: String,
    pub sales_channel: String,
    pub occupancy: Vec<String>,
}

// Error body returned by the service on non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

/// Shared parameters for every airport in a run: dates, sales channel and occupancy.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    pub stay: StayWindow,
    pub sales_channel: String,
    pub occupancy: Vec<String>,
}

impl RequestTemplate {
    pub fn new(stay: StayWindow) -> Self {
        Self {
            stay,
            sales_channel: DEFAULT_SALES_CHANNEL.to_string(),
            occupancy: vec![DEFAULT_OCCUPANCY.to_string()],
        }
    }

    pub fn for_airport(&self, airport_code: impl Into<String>) -> AvailabilityRequest {
        AvailabilityRequest {
            airport_code: airport_code.into(),
            check_in: self.stay.check_in_str(),
            check_out: self.stay.check_out_str(),
            sales_channel: self.sales_channel.clone(),
            occupancy: self.occupancy.clone(),
        }
    }
}

#[async_trait]
pub trait AvailabilityService: Send + Sync {
    // The payload is opaque here; callers only filter it
    async fn fetch_availability(&self, request: AvailabilityRequest) -> Result<Value, ApiError>;
}

pub struct HttpAvailabilityClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpAvailabilityClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::ConfigError("base_url is empty".to_string()));
        }

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_millis(config.timeout_ms));
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.config.timeout_ms)
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

#[async_trait]
impl AvailabilityService for HttpAvailabilityClient {
    async fn fetch_availability(&self, request: AvailabilityRequest) -> Result<Value, ApiError> {
        let endpoint = self.config.endpoint();
        debug!(
            airport_code = %request.airport_code,
            endpoint = %endpoint,
            "posting availability request"
        );

        let response = self
            .client
            .post(&endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !status.is_success() {
            let (message, error_type) = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(error) => (error.message, error.error_type),
                Err(_) => (body, None),
            };
            return Err(ApiError::ApiResponseError {
                status_code: status.as_u16(),
                message,
                error_type,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }
}

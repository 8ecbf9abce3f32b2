use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

pub const PRACTICUM_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Decoded body of the homework statuses endpoint. Its shape is checked by
/// [`crate::response::check_response`], not here.
pub type ReviewSnapshot = Value;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("endpoint {endpoint} answered with status {status}")]
    StatusCode { endpoint: Url, status: StatusCode },
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("endpoint {endpoint} returned invalid JSON: {source}")]
    Decode {
        endpoint: Url,
        #[source]
        source: serde_json::Error,
    },
}

#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// Fetch every homework whose status changed since `from_date` (unix seconds).
    async fn fetch(&self, from_date: i64) -> Result<ReviewSnapshot, FetchError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    pub fn new(token: String, endpoint: Url, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder()
            .user_agent("homework-bot/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn build_request(&self, from_date: i64) -> reqwest::Result<reqwest::Request> {
        self.http
            .get(self.endpoint.clone())
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
    }
}

#[async_trait]
impl ReviewApi for PracticumClient {
    #[instrument(skip_all, fields(from_date = from_date))]
    async fn fetch(&self, from_date: i64) -> Result<ReviewSnapshot, FetchError> {
        let request_error = |source| FetchError::Request {
            endpoint: self.endpoint.clone(),
            source,
        };

        let request = self.build_request(from_date).map_err(request_error)?;
        info!(endpoint = %self.endpoint, "requesting homework statuses");
        let res = self.http.execute(request).await.map_err(request_error)?;

        let status = res.status();
        let body = res.text().await.map_err(request_error)?;
        debug!(%status, body_len = body.len(), "received homework statuses");
        decode_response(&self.endpoint, status, &body)
    }
}

/// Turn a raw HTTP answer into a snapshot. Only `200 OK` is accepted.
pub fn decode_response(
    endpoint: &Url,
    status: StatusCode,
    body: &str,
) -> Result<ReviewSnapshot, FetchError> {
    if status != StatusCode::OK {
        return Err(FetchError::StatusCode {
            endpoint: endpoint.clone(),
            status,
        });
    }
    serde_json::from_str(body).map_err(|source| FetchError::Decode {
        endpoint: endpoint.clone(),
        source,
    })
}

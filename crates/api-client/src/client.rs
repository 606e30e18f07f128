//! HTTP client for the devis quote API.
//!
//! One shared client for every resource. All calls are single attempts with
//! a 30 second timeout; failures are reported as [`PersistenceError`].

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use devis_core::errors::{Error, PersistenceError, Result};

use crate::dto::ApiErrorResponse;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest slice of an unparseable error body kept in messages.
const ERROR_BODY_PREVIEW: usize = 200;

/// Default base URL of the quote API.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// HTTP client for the quote API.
///
/// # Example
///
/// ```ignore
/// let client = ApiClient::new("http://localhost:3000/api", None)?;
/// let quote = client.get_quote_by_id("P-00421337").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: Option<HeaderValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the API (e.g., "http://localhost:3000/api")
    /// * `access_token` - Optional bearer token sent with every request
    ///
    /// # Errors
    ///
    /// Returns an error if the token format is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(base_url: &str, access_token: Option<&str>) -> Result<Self> {
        let auth_header = access_token
            .filter(|token| !token.trim().is_empty())
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                    .map_err(|e| Error::Unexpected(format!("Invalid access token format: {}", e)))
            })
            .transpose()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create default headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(auth) = &self.auth_header {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        headers
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("[DevisApi] {} {}", method, url);
        self.client.request(method, url).headers(self.headers())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = send(self.request(Method::GET, path)).await?;
        parse_response(response).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = send(self.request(Method::GET, path).query(query)).await?;
        parse_response(response).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = send(self.request(Method::POST, path).json(body)).await?;
        parse_response(response).await
    }

    pub(crate) async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = send(self.request(Method::PATCH, path).json(body)).await?;
        parse_response(response).await
    }

    /// DELETE ignoring the response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let response = send(self.request(Method::DELETE, path)).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = read_body(response).await?;
        Err(status_error(status, &body).into())
    }
}

/// Percent-encodes one path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
    request.send().await.map_err(|e| {
        let reason = if e.is_timeout() {
            format!("Request timed out: {}", e)
        } else {
            format!("Request failed: {}", e)
        };
        PersistenceError::Request(reason).into()
    })
}

async fn read_body(response: reqwest::Response) -> Result<String> {
    response
        .text()
        .await
        .map_err(|e| PersistenceError::Request(format!("Failed to read response: {}", e)).into())
}

/// Maps an error status to the persistence taxonomy.
fn status_error(status: StatusCode, body: &str) -> PersistenceError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(ApiErrorResponse::into_message)
        .unwrap_or_else(|| body.chars().take(ERROR_BODY_PREVIEW).collect());

    match status {
        StatusCode::NOT_FOUND => PersistenceError::NotFound(message),
        StatusCode::CONFLICT => PersistenceError::Conflict(message),
        _ => PersistenceError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

/// Parse an HTTP response, handling errors appropriately.
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = read_body(response).await?;

    if !status.is_success() {
        return Err(status_error(status, &body).into());
    }

    serde_json::from_str(&body).map_err(|e| {
        PersistenceError::Decode(format!(
            "{} - {}",
            e,
            body.chars().take(ERROR_BODY_PREVIEW).collect::<String>()
        ))
        .into()
    })
}

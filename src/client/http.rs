//! Shared HTTP plumbing for upstream clients

use std::time::Duration;

use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build an HTTP client with a request timeout
pub fn http_client(timeout: Duration) -> Result<HttpClient> {
    let http = HttpClient::builder()
        .timeout(timeout)
        .user_agent(concat!("drmscope/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))?;
    Ok(http)
}

/// Strip a trailing slash so paths can be appended with `format!`
pub fn base_url(host: Option<String>, default: &str) -> String {
    host.unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Map the response status to an error, or parse the JSON body.
///
/// `service` names the upstream in error messages.
pub async fn read_json<T: DeserializeOwned>(response: Response, service: &str) -> Result<T> {
    let status = response.status();
    match status {
        s if s.is_success() => {
            let data = response.json::<T>().await.map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse {} response: {}", service, e))
            })?;
            Ok(data)
        }
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized(service.to_string()).into()),
        StatusCode::FORBIDDEN => Err(ApiError::Forbidden(service.to_string()).into()),
        StatusCode::NOT_FOUND => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Resource not found".to_string());
            Err(ApiError::NotFound(error_msg).into())
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Bad request".to_string());
            Err(ApiError::BadRequest(error_msg).into())
        }
        s if s.is_server_error() => {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| format!("Server error: {}", s));
            Err(ApiError::ServerError(format!("{} ({}): {}", service, s, error_msg)).into())
        }
        _ => {
            let error_msg = format!("Unexpected status code from {}: {}", service, status);
            Err(ApiError::InvalidResponse(error_msg).into())
        }
    }
}

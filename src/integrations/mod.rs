//! External service integrations.
//!
//! Each adapter owns the request shaping for one third-party service. They
//! share a single `reqwest::Client` built by [`http_client`], and every HTTP
//! adapter reports a non-2xx answer through [`ensure_success`].

pub mod calendly;
pub mod hubspot;
pub mod search;
pub mod slack;
pub mod sms;
pub mod zapier;

use crate::errors::AppError;
use reqwest::{Client, Response};
use std::time::Duration;

pub use calendly::scheduling_link;
pub use hubspot::HubSpotClient;
pub use search::SearchClient;
pub use slack::SlackNotifier;
pub use sms::SmsSender;
pub use zapier::ZapierClient;

/// Builds the shared outbound HTTP client.
pub fn http_client(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("tint-funnel-api/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::InternalError(format!("Failed to create HTTP client: {}", e)))
}

/// Turns a non-2xx response into an error carrying the HTTP status text.
pub(crate) async fn ensure_success(
    response: Response,
    service: &str,
) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_text = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string());
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::debug!("{} returned {}: {}", service, status, body);

    Err(AppError::ExternalApiError(format!(
        "{} request failed: {}",
        service, status_text
    )))
}

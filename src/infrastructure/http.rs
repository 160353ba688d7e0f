use std::time::Duration;

use reqwest::{redirect, Client, ClientBuilder, Response};

use crate::domain::TransportError;

fn base_builder(timeout: Duration) -> ClientBuilder {
    Client::builder()
        .user_agent(format!("kingmaker-rust/{}", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
}

/// Client for JSON APIs. Follows redirects.
pub fn api_client(timeout: Duration) -> reqwest::Result<Client> {
    base_builder(timeout).build()
}

/// Client for status probes. Never follows redirects, so a 3xx reaches the caller.
pub fn probe_client(timeout: Duration) -> reqwest::Result<Client> {
    base_builder(timeout).redirect(redirect::Policy::none()).build()
}

/// Turns a non-2xx response into `TransportError::Status`, keeping the body's
/// `error.message` when the service sent a Google-style error document.
pub async fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status: status.as_u16(),
        message: error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string()),
    })
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(|message| message.as_str())
        .map(str::to_string)
        .filter(|message| !message.is_empty())
}

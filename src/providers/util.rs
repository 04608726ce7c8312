use anyhow::{Result, anyhow};
use reqwest::Response;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Passes 2xx responses through and turns anything else into one readable error.
///
/// The body's `message` is used verbatim, then `error`, then the status code.
pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = %status, body = %body, "Request rejected");
    Err(anyhow!(error_message(status.as_u16(), &body)))
}

pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

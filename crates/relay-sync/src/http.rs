//! Shared HTTP response helpers for the vendor client.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, other non-success → [`SyncError::VendorPermanent`]) so the
//! adapter stays focused on pagination and response mapping.

use crate::error::SyncError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`SyncError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 60 s if absent or
///   unparseable).
/// - **Any other non-success status** → [`SyncError::VendorPermanent`]
///   with status code and response body. Permanent errors are never
///   retried.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(SyncError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        return Err(SyncError::VendorPermanent {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

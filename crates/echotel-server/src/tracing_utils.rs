use http::HeaderMap;
use uuid::Uuid;

pub const CORRELATION_ID_KEY: &str = "x-correlation-id";

/// Correlation id for request logs: honor the caller's header when present,
/// otherwise mint a fresh one.
pub fn extract_or_generate_correlation_id(headers: &HeaderMap) -> String {
    if let Some(correlation_id) = headers.get(CORRELATION_ID_KEY)
        && let Ok(correlation_id_str) = correlation_id.to_str()
    {
        return correlation_id_str.to_string();
    }

    Uuid::now_v7().to_string()
}

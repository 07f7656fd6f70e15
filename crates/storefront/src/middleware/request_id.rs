//! Request correlation ids.
//!
//! Each API call gets an id: the caller's `x-request-id` when it is usable,
//! otherwise a fresh UUID v4. The id lands in the `http_request` span (so
//! every log line of the call carries it), in the request extensions as
//! [`RequestId`], and in the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is kept as is.
const MAX_INBOUND_LEN: usize = 128;

/// Correlation id of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Tag the request and its response with a correlation id.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(accept_inbound)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", id.as_str());
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// A caller id is reused only if it is short, non-blank, visible ASCII.
fn accept_inbound(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let usable = !trimmed.is_empty()
        && trimmed.len() <= MAX_INBOUND_LEN
        && trimmed.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_inbound() {
        assert_eq!(accept_inbound(" req-42 "), Some("req-42".to_string()));
        assert_eq!(accept_inbound("   "), None);
        assert_eq!(accept_inbound("has space"), None);
        assert_eq!(accept_inbound(&"x".repeat(129)), None);
    }
}

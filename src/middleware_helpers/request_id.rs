use crate::tracing::{scope_request_id, RequestId};
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Correlation header, read from the caller and echoed on every response
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Picks the id for one exchange. A caller-supplied, non-blank, visible-ASCII
/// value wins; anything else gets a fresh UUID.
fn correlate(headers: &HeaderMap) -> (RequestId, Option<HeaderValue>) {
    if let Some(value) = headers.get(&REQUEST_ID_HEADER) {
        match value.to_str() {
            Ok(text) if !text.trim().is_empty() => {
                return (RequestId::new(text), Some(value.clone()));
            }
            _ => {}
        }
    }

    let generated = RequestId::default();
    let value = HeaderValue::from_str(generated.as_str()).ok();
    (generated, value)
}

/// Tags the request with its correlation id and runs the rest of the stack
/// inside that id's scope, so error bodies can report it.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let (request_id, echo) = correlate(request.headers());

    if let Some(value) = &echo {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }
    request.extensions_mut().insert(request_id.clone());

    let mut response = scope_request_id(request_id, next.run(request)).await;

    if let Some(value) = echo {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

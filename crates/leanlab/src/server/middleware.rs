//! Request logging middleware
//!
//! Every request gets a uuid that is attached to its tracing span and echoed
//! back in the `x-request-id` response header.

use std::time::Instant;

use axum::{
  extract::Request,
  http::{HeaderName, HeaderValue},
  middleware::Next,
  response::Response,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn request_logging(request: Request, next: Next) -> Response {
  let request_id = Uuid::new_v4();
  let span = info_span!(
    "request",
    %request_id,
    method = %request.method(),
    path = %request.uri().path(),
  );

  let start = Instant::now();
  let mut response = next.run(request).instrument(span.clone()).await;
  let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

  span.in_scope(|| {
    info!(status = response.status().as_u16(), duration_ms, "request completed");
  });

  if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
    response.headers_mut().insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
  }
  response
}

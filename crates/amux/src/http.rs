pub type Error = axum_core::Error;
pub type Body = axum_core::body::Body;
pub type Request = ::http::Request<Body>;
pub type Response = ::http::Response<Body>;

pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header};
use bytes::Bytes;

/// Buffer a body, capped. Requests and non-streaming responses are bounded;
/// anything larger is rejected upstream of parsing.
pub const BODY_LIMIT: usize = 2_097_152;

pub async fn to_bytes(body: Body) -> Result<Bytes, Error> {
	axum::body::to_bytes(body, BODY_LIMIT).await
}

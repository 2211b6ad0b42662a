//! Upstream HTTP client.
//!
//! One shared connection pool for all providers; deadlines are enforced per
//! request. Non-streaming calls are bounded end to end, streaming calls only
//! to the first byte of the response head so long streams are not cut off.

use std::time::Duration;

use bytes::Bytes;
use futures_util::TryStreamExt;

use crate::http::{Body, HeaderMap, StatusCode};
use crate::proxy::ProxyError;

#[derive(Clone)]
pub struct Client {
	inner: reqwest::Client,
}

pub struct UpstreamResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Body,
}

pub struct BufferedResponse {
	pub status: StatusCode,
	pub bytes: Bytes,
}

impl Client {
	pub fn new() -> Client {
		Client {
			inner: reqwest::Client::builder()
				.connect_timeout(Duration::from_secs(10))
				.build()
				.expect("client construction cannot fail"),
		}
	}

	/// POST a buffered body and buffer the whole response, within `timeout`.
	pub async fn call(
		&self,
		url: &str,
		headers: HeaderMap,
		body: Vec<u8>,
		timeout: Duration,
	) -> Result<BufferedResponse, ProxyError> {
		let fut = async {
			let resp = self
				.inner
				.post(url)
				.headers(headers)
				.body(body)
				.send()
				.await
				.map_err(classify)?;
			let status = resp.status();
			let bytes = resp.bytes().await.map_err(classify)?;
			Ok(BufferedResponse { status, bytes })
		};
		match tokio::time::timeout(timeout, fut).await {
			Ok(res) => res,
			Err(_) => Err(ProxyError::ConnectionTimeout),
		}
	}

	/// POST a buffered body and hand back the streaming response. The
	/// deadline covers the response head; body reads are driven (and
	/// cancelled) by the client.
	pub async fn call_streaming(
		&self,
		url: &str,
		headers: HeaderMap,
		body: Vec<u8>,
		timeout: Duration,
	) -> Result<UpstreamResponse, ProxyError> {
		let fut = self.inner.post(url).headers(headers).body(body).send();
		let resp = match tokio::time::timeout(timeout, fut).await {
			Ok(res) => res.map_err(classify)?,
			Err(_) => return Err(ProxyError::ConnectionTimeout),
		};
		let status = resp.status();
		let headers = resp.headers().clone();
		let body = Body::from_stream(resp.bytes_stream().map_err(std::io::Error::other));
		Ok(UpstreamResponse {
			status,
			headers,
			body,
		})
	}

}

impl Default for Client {
	fn default() -> Self {
		Self::new()
	}
}

fn classify(e: reqwest::Error) -> ProxyError {
	if e.is_timeout() {
		ProxyError::ConnectionTimeout
	} else if e.is_connect() {
		ProxyError::ProviderUnreachable(e.to_string())
	} else {
		ProxyError::Internal(e.to_string())
	}
}

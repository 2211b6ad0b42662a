//! A body wrapper that observes decoded frames while forwarding the raw
//! bytes untouched. Used on passthrough routes, where the client gets the
//! upstream's exact framing but the gateway still wants usage bookkeeping.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::{Bytes, BytesMut};
use http_body::Body;
use pin_project_lite::pin_project;
use tokio_util::codec::Decoder;

use crate::http;

pin_project! {
	pub struct PassthroughBody<D, F> {
		#[pin]
		body: http::Body,
		decoder: D,
		decode_buffer: BytesMut,
		handler: F,
		finished: bool,
	}
}

/// `handler` sees `Some(item)` for every decoded item and `None` exactly
/// once when the upstream body ends; the raw frames pass through untouched.
pub fn parser<D, F>(body: http::Body, decoder: D, handler: F) -> http::Body
where
	D: Decoder + Send + 'static,
	D::Error: Send + Sync + std::error::Error + 'static,
	F: FnMut(Option<D::Item>) + Send + 'static,
{
	http::Body::new(PassthroughBody {
		body,
		decoder,
		handler,
		decode_buffer: BytesMut::new(),
		finished: false,
	})
}

impl<D, F> Body for PassthroughBody<D, F>
where
	D: Decoder + Send + 'static,
	D::Error: Send + Sync + std::error::Error + 'static,
	F: FnMut(Option<D::Item>) + Send + 'static,
{
	type Data = Bytes;
	type Error = http::Error;

	fn poll_frame(
		self: Pin<&mut Self>,
		cx: &mut Context<'_>,
	) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
		let mut this = self.project();
		if *this.finished {
			return Poll::Ready(None);
		}

		let try_decode = |eof: bool, buf: &mut BytesMut, decoder: &mut D, handler: &mut F| {
			loop {
				let decoded = if eof {
					decoder.decode_eof(buf)
				} else {
					decoder.decode(buf)
				};
				match decoded {
					Ok(Some(item)) => (handler)(Some(item)),
					Ok(None) => return Ok(()),
					Err(e) => return Err(http::Error::new(e)),
				}
			}
		};

		let res = ready!(this.body.as_mut().poll_frame(cx));
		let frame_to_send = match res {
			Some(Ok(frame)) => {
				if let Some(data) = frame.data_ref() {
					this.decode_buffer.extend_from_slice(data);
				}
				Some(Ok(frame))
			},
			Some(Err(e)) => {
				return Poll::Ready(Some(Err(e)));
			},
			None => {
				*this.finished = true;
				None
			},
		};

		match (try_decode)(
			*this.finished,
			this.decode_buffer,
			&mut *this.decoder,
			this.handler,
		) {
			Ok(_) => {
				if *this.finished {
					(this.handler)(None);
				}
				Poll::Ready(frame_to_send)
			},
			Err(e) => Poll::Ready(Some(Err(e))),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{Arc, Mutex};

	use http_body_util::BodyExt;

	use super::*;
	use crate::parse::sse::SseDecoder;

	#[tokio::test]
	async fn observes_without_altering() {
		let input = "event: message_start\ndata: {}\n\ndata: [DONE]\n\n";
		let seen = Arc::new(Mutex::new(Vec::new()));
		let seen2 = seen.clone();
		let body = http::Body::from(input);
		let out = parser(body, SseDecoder::new(), move |f| {
			seen2.lock().unwrap().push(f.map(|f| f.data.clone()));
		});
		let collected = out.collect().await.unwrap().to_bytes();
		assert_eq!(collected.as_ref(), input.as_bytes());
		assert_eq!(
			*seen.lock().unwrap(),
			vec![Some("{}".to_string()), Some("[DONE]".to_string()), None]
		);
	}
}

//! A pull-driven body that decodes upstream frames, hands each to a
//! transform, and re-encodes whatever the transform yields.
//!
//! This is the streaming engine: the client's poll drives the upstream read,
//! so upstream consumption is naturally tied to client consumption with no
//! internal queue. Dropping the body drops the upstream stream with it.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::{Bytes, BytesMut};
use http_body::Body;
use pin_project_lite::pin_project;
use tokio_util::codec::{Decoder, Encoder};

use crate::http;

pin_project! {
	pub struct TransformedBody<D, E, F, T> {
		#[pin]
		body: http::Body,
		decoder: D,
		decode_buffer: BytesMut,
		encoder: E,
		handler: F,
		finished: bool,
		_phantom: std::marker::PhantomData<T>,
	}
}

/// `handler` is called with `Some(item)` for every decoded upstream item and
/// exactly once with `None` when the upstream body ends; every returned item
/// is encoded into the output in order.
pub fn parser<D, E, F, T>(body: http::Body, decoder: D, encoder: E, handler: F) -> http::Body
where
	D: Decoder + Send + 'static,
	D::Error: Send + Sync + std::error::Error + 'static,
	F: FnMut(Option<D::Item>) -> Vec<T> + Send + 'static,
	E: Encoder<T> + Send + 'static,
	E::Error: Send + Sync + std::error::Error + 'static,
	T: Send + 'static,
{
	http::Body::new(TransformedBody {
		body,
		decoder,
		decode_buffer: BytesMut::new(),
		encoder,
		handler,
		finished: false,
		_phantom: std::marker::PhantomData,
	})
}

impl<D, E, F, T> Body for TransformedBody<D, E, F, T>
where
	D: Decoder + Send + 'static,
	D::Error: Send + Sync + std::error::Error + 'static,
	E: Encoder<T> + Send + 'static,
	E::Error: Send + Sync + std::error::Error + 'static,
	F: FnMut(Option<D::Item>) -> Vec<T> + Send + 'static,
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

		let mut encode_buffer = BytesMut::new();

		let mut pump = |eof: bool,
		                buf: &mut BytesMut,
		                decoder: &mut D,
		                handler: &mut F,
		                encoder: &mut E,
		                encode_buf: &mut BytesMut|
		 -> Result<(), http::Error> {
			loop {
				let decoded = if eof {
					decoder.decode_eof(buf)
				} else {
					decoder.decode(buf)
				};
				match decoded {
					Ok(Some(item)) => {
						for out in (handler)(Some(item)) {
							encoder.encode(out, encode_buf).map_err(http::Error::new)?;
						}
					},
					Ok(None) => return Ok(()),
					Err(e) => return Err(http::Error::new(e)),
				}
			}
		};

		if let Err(e) = (pump)(
			false,
			this.decode_buffer,
			&mut *this.decoder,
			this.handler,
			&mut *this.encoder,
			&mut encode_buffer,
		) {
			return Poll::Ready(Some(Err(e)));
		}

		if !encode_buffer.is_empty() {
			let data = encode_buffer.split_to(encode_buffer.len());
			return Poll::Ready(Some(Ok(http_body::Frame::data(data.freeze()))));
		}

		match ready!(this.body.as_mut().poll_frame(cx)) {
			Some(Ok(frame)) => {
				if let Some(data) = frame.data_ref() {
					this.decode_buffer.extend_from_slice(data);
				}
				// Trailers are dropped; SSE responses do not carry them
				cx.waker().wake_by_ref();
				Poll::Pending
			},
			Some(Err(e)) => Poll::Ready(Some(Err(e))),
			None => {
				*this.finished = true;
				if let Err(e) = (pump)(
					true,
					this.decode_buffer,
					&mut *this.decoder,
					this.handler,
					&mut *this.encoder,
					&mut encode_buffer,
				) {
					return Poll::Ready(Some(Err(e)));
				}
				for out in (this.handler)(None) {
					if let Err(e) = this.encoder.encode(out, &mut encode_buffer) {
						return Poll::Ready(Some(Err(http::Error::new(e))));
					}
				}
				if !encode_buffer.is_empty() {
					let data = encode_buffer.split_to(encode_buffer.len());
					Poll::Ready(Some(Ok(http_body::Frame::data(data.freeze()))))
				} else {
					Poll::Ready(None)
				}
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use http_body_util::BodyExt;

	use super::*;
	use crate::parse::sse::{SseDecoder, SseEncoder, SseFrame};

	#[tokio::test]
	async fn transforms_and_flushes_on_eof() {
		let input = "data: one\n\ndata: two\n\n";
		let body = http::Body::from(input);
		let out = parser(body, SseDecoder::new(), SseEncoder, |item| match item {
			Some(f) => vec![SseFrame::data(format!("<{}>", f.data))],
			None => vec![SseFrame::data("[DONE]")],
		});
		let collected = out.collect().await.unwrap().to_bytes();
		assert_eq!(
			collected.as_ref(),
			b"data: <one>\n\ndata: <two>\n\ndata: [DONE]\n\n"
		);
	}

	#[tokio::test]
	async fn handler_can_fan_out_and_swallow() {
		let input = "data: x\n\n";
		let body = http::Body::from(input);
		let out = parser(body, SseDecoder::new(), SseEncoder, |item| match item {
			Some(_) => vec![
				SseFrame::named("message_start", "{}"),
				SseFrame::named("message_stop", "{}"),
			],
			None => vec![],
		});
		let collected = out.collect().await.unwrap().to_bytes();
		assert_eq!(
			collected.as_ref(),
			b"event: message_start\ndata: {}\n\nevent: message_stop\ndata: {}\n\n"
		);
	}
}

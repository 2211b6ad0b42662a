//! Incremental SSE framing over the tokio-util codec traits.
//!
//! One `SseFrame` is one `event:`/`data:` block terminated by a blank line.
//! Comment lines (`:`), `id:`, and `retry:` fields are dropped; multiple
//! `data:` lines within a block are joined with newlines per the SSE spec.

use std::io;

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
	pub event: Option<String>,
	pub data: String,
}

impl SseFrame {
	pub fn data(data: impl Into<String>) -> SseFrame {
		SseFrame {
			event: None,
			data: data.into(),
		}
	}

	pub fn named(event: impl Into<String>, data: impl Into<String>) -> SseFrame {
		SseFrame {
			event: Some(event.into()),
			data: data.into(),
		}
	}

	pub fn is_done_marker(&self) -> bool {
		self.event.is_none() && self.data == "[DONE]"
	}
}

pub struct SseDecoder {
	max_size: usize,
}

impl SseDecoder {
	pub fn new() -> SseDecoder {
		SseDecoder {
			max_size: crate::http::BODY_LIMIT,
		}
	}

	pub fn with_max_size(max_size: usize) -> SseDecoder {
		SseDecoder { max_size }
	}

	fn parse_block(block: &[u8]) -> Option<SseFrame> {
		let mut event = None;
		let mut data: Option<String> = None;
		for line in block.split(|b| *b == b'\n') {
			let line = match line.last() {
				Some(b'\r') => &line[..line.len() - 1],
				_ => line,
			};
			if line.is_empty() || line[0] == b':' {
				continue;
			}
			let (field, value) = match line.iter().position(|b| *b == b':') {
				Some(idx) => {
					let v = &line[idx + 1..];
					// A single leading space after the colon is part of the framing
					let v = v.strip_prefix(b" ").unwrap_or(v);
					(&line[..idx], v)
				},
				None => (line, &[][..]),
			};
			let value = String::from_utf8_lossy(value);
			match field {
				b"event" => event = Some(value.into_owned()),
				b"data" => match data.as_mut() {
					Some(d) => {
						d.push('\n');
						d.push_str(&value);
					},
					None => data = Some(value.into_owned()),
				},
				// id / retry are transport details we do not propagate
				_ => {},
			}
		}
		data.map(|data| SseFrame { event, data })
	}
}

impl Default for SseDecoder {
	fn default() -> Self {
		Self::new()
	}
}

/// Find the end of the first complete block: a newline followed by an
/// optionally-CR'd newline. Returns (block length, delimiter length).
fn find_block_end(buf: &[u8]) -> Option<(usize, usize)> {
	let mut i = 0;
	while let Some(pos) = buf[i..].iter().position(|b| *b == b'\n') {
		let at = i + pos;
		let rest = &buf[at + 1..];
		if rest.first() == Some(&b'\n') {
			return Some((at + 1, 1));
		}
		if rest.first() == Some(&b'\r') && rest.get(1) == Some(&b'\n') {
			return Some((at + 1, 2));
		}
		i = at + 1;
	}
	None
}

impl Decoder for SseDecoder {
	type Item = SseFrame;
	type Error = io::Error;

	fn decode(&mut self, src: &mut BytesMut) -> Result<Option<SseFrame>, io::Error> {
		loop {
			let Some((len, delim)) = find_block_end(src) else {
				if src.len() > self.max_size {
					return Err(io::Error::new(
						io::ErrorKind::InvalidData,
						"SSE frame exceeds maximum size",
					));
				}
				return Ok(None);
			};
			let block = src.split_to(len + delim);
			if let Some(frame) = Self::parse_block(&block[..len]) {
				return Ok(Some(frame));
			}
			// Block held only comments/ids; keep scanning
		}
	}

	fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<SseFrame>, io::Error> {
		if let Some(frame) = self.decode(src)? {
			return Ok(Some(frame));
		}
		if src.is_empty() {
			return Ok(None);
		}
		// Trailing block without a final blank line
		let block = src.split_to(src.len());
		Ok(Self::parse_block(&block))
	}
}

pub struct SseEncoder;

impl Encoder<SseFrame> for SseEncoder {
	type Error = io::Error;

	fn encode(&mut self, frame: SseFrame, dst: &mut BytesMut) -> Result<(), io::Error> {
		if let Some(event) = &frame.event {
			dst.put_slice(b"event: ");
			dst.put_slice(event.as_bytes());
			dst.put_slice(b"\n");
		}
		for line in frame.data.split('\n') {
			dst.put_slice(b"data: ");
			dst.put_slice(line.as_bytes());
			dst.put_slice(b"\n");
		}
		dst.put_slice(b"\n");
		Ok(())
	}
}

/// Encode a frame to standalone bytes, for error frames synthesised outside a
/// codec pipeline.
pub fn encode_frame(frame: &SseFrame) -> Bytes {
	let mut buf = BytesMut::new();
	let mut enc = SseEncoder;
	enc
		.encode(frame.clone(), &mut buf)
		.expect("in-memory encode cannot fail");
	buf.freeze()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn decode_all(input: &str) -> Vec<SseFrame> {
		let mut dec = SseDecoder::new();
		let mut buf = BytesMut::from(input.as_bytes());
		let mut out = Vec::new();
		while let Some(f) = dec.decode(&mut buf).unwrap() {
			out.push(f);
		}
		if let Some(f) = dec.decode_eof(&mut buf).unwrap() {
			out.push(f);
		}
		out
	}

	#[test]
	fn decodes_data_frames() {
		let frames = decode_all("data: {\"a\":1}\n\ndata: [DONE]\n\n");
		assert_eq!(frames.len(), 2);
		assert_eq!(frames[0], SseFrame::data("{\"a\":1}"));
		assert!(frames[1].is_done_marker());
	}

	#[test]
	fn decodes_named_events_and_crlf() {
		let frames = decode_all("event: message_start\r\ndata: {}\r\n\r\n");
		assert_eq!(frames, vec![SseFrame::named("message_start", "{}")]);
	}

	#[test]
	fn joins_multiline_data_and_skips_comments() {
		let frames = decode_all(": keepalive\n\ndata: line1\ndata: line2\n\n");
		assert_eq!(frames, vec![SseFrame::data("line1\nline2")]);
	}

	#[test]
	fn eof_flushes_unterminated_block() {
		let frames = decode_all("data: tail");
		assert_eq!(frames, vec![SseFrame::data("tail")]);
	}

	#[test]
	fn partial_input_waits_for_delimiter() {
		let mut dec = SseDecoder::new();
		let mut buf = BytesMut::from(&b"data: par"[..]);
		assert_eq!(dec.decode(&mut buf).unwrap(), None);
		buf.extend_from_slice(b"tial\n\n");
		assert_eq!(dec.decode(&mut buf).unwrap(), Some(SseFrame::data("partial")));
	}

	#[test]
	fn encode_round_trips() {
		let f = SseFrame::named("content_block_delta", "{\"x\":2}");
		let encoded = encode_frame(&f);
		assert_eq!(
			encoded.as_ref(),
			b"event: content_block_delta\ndata: {\"x\":2}\n\n"
		);
		let frames = decode_all(std::str::from_utf8(&encoded).unwrap());
		assert_eq!(frames, vec![f]);
	}
}

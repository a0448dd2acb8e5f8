//! Incremental extraction of the status JSON from the inbound byte stream
//!
//! The status response is never parsed as a whole packet. Bytes are buffered
//! until the first `{` of the document is balanced by a closing `}`, and that
//! span is parsed as a JSON object.
//!
//! The frame head (frame length, packet id, string length) is read as three
//! VarInts first, so head bytes equal to `{` are never taken as the document.
//! A head that is malformed or does not describe a status response with a
//! single string body falls back to scanning from the first byte.
//!
//! Scanning resumes where the previous chunk stopped. It works on raw bytes:
//! `{`, `}`, `"` and `\` are ASCII and never occur inside a multi-byte UTF-8
//! sequence, so a chunk may end in the middle of a character. Braces inside
//! JSON string literals are not counted.

use crate::{data::varint, PingError, ProtocolError, STATUS_RESPONSE_PACKET_ID};
use serde_json::{Map, Value};
use std::ops::Range;
use tracing::trace;

/// Default cap on buffered response bytes
pub const DEFAULT_MAX_RESPONSE_LEN: usize = 2 * 1024 * 1024;

/// Status JSON object
pub type StatusDocument = Map<String, Value>;

/// Buffers inbound chunks and yields the first balanced JSON object
#[derive(Debug)]
pub struct ResponseAssembler {
    buffer: Vec<u8>,
    max_len: usize,
    body_located: bool,
    scanned: usize,
    depth: usize,
    start: Option<usize>,
    in_string: bool,
    escaped: bool,
    finished: bool,
}

impl Default for ResponseAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseAssembler {
    pub fn new() -> ResponseAssembler {
        Self::with_limit(DEFAULT_MAX_RESPONSE_LEN)
    }

    /// Create assembler that fails once more than `max_len` bytes are buffered
    /// without a complete object
    pub fn with_limit(max_len: usize) -> ResponseAssembler {
        ResponseAssembler {
            buffer: Vec::new(),
            max_len,
            body_located: false,
            scanned: 0,
            depth: 0,
            start: None,
            in_string: false,
            escaped: false,
            finished: false,
        }
    }

    /// Number of bytes buffered so far
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// A document was produced or a terminal error was returned
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Append chunk and try to complete the document.
    ///
    /// Returns `Ok(Some(_))` exactly once, when the object is complete. Errors are
    /// terminal. After either, further input is ignored and `Ok(None)` is returned.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Option<StatusDocument>, PingError> {
        if self.finished {
            return Ok(None);
        }

        self.buffer.extend_from_slice(chunk);

        let Some(span) = self.scan() else {
            if self.buffer.len() > self.max_len {
                self.finished = true;
                return Err(PingError::ResponseTooLarge {
                    limit: self.max_len,
                });
            }
            return Ok(None);
        };

        self.finished = true;
        trace!(start = span.start, end = span.end, "found balanced object");

        serde_json::from_slice(&self.buffer[span])
            .map(Some)
            .map_err(PingError::Decode)
    }

    /// Offset of the string body, `None` while the head is still incomplete
    fn body_offset(&self) -> Option<usize> {
        let mut offset = 0;
        let mut head = [(0i64, 0usize); 3];

        for field in head.iter_mut() {
            match varint::decode(&self.buffer[offset..]) {
                Ok((value, size)) => {
                    *field = (value as i64, size);
                    offset += size;
                }
                Err(ProtocolError::DataRanOutError) => return None,
                Err(_) => return Some(0),
            }
        }

        let [(frame_len, _), (packet_id, id_size), (string_len, prefix_size)] = head;

        if packet_id == STATUS_RESPONSE_PACKET_ID as i64
            && string_len >= 0
            && frame_len == (id_size + prefix_size) as i64 + string_len
        {
            Some(offset)
        } else {
            Some(0)
        }
    }

    fn scan(&mut self) -> Option<Range<usize>> {
        if !self.body_located {
            self.scanned = self.body_offset()?;
            self.body_located = true;
            trace!(offset = self.scanned, "document scan starts");
        }

        while self.scanned < self.buffer.len() {
            let index = self.scanned;
            let byte = self.buffer[index];
            self.scanned += 1;

            if self.depth == 0 {
                if byte == b'{' {
                    self.start = Some(index);
                    self.depth = 1;
                }
                continue;
            }

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => self.in_string = true,
                b'{' => self.depth += 1,
                b'}' => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        return self.start.map(|start| start..self.scanned);
                    }
                }
                _ => {}
            }
        }

        None
    }
}

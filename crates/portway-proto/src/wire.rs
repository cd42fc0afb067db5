//! Wire marshaling for request and channel-open payloads.
//!
//! Field format: `uint32` values are 4-byte big-endian; `string` values are
//! a `uint32` length prefix followed by that many bytes of UTF-8.

use crate::error::{ProtoError, ProtoResult};

/// Appends wire-encoded fields to a growable buffer.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append a big-endian `uint32`.
    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Append a length-prefixed string.
    pub fn put_string(&mut self, value: &str) {
        self.put_u32(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Consumes wire-encoded fields from a byte slice.
#[derive(Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Consume a big-endian `uint32`.
    pub fn take_u32(&mut self) -> ProtoResult<u32> {
        let bytes = self.take_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Consume a length-prefixed UTF-8 string.
    pub fn take_string(&mut self) -> ProtoResult<String> {
        let len = self.take_u32()? as usize;
        let bytes = self.take_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| ProtoError::Malformed("string field is not valid UTF-8".to_string()))
    }

    /// Fail unless every byte has been consumed.
    pub fn finish(self) -> ProtoResult<()> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(ProtoError::Malformed(format!(
                "{} trailing bytes after payload",
                self.data.len()
            )))
        }
    }

    fn take_bytes(&mut self, len: usize) -> ProtoResult<&'a [u8]> {
        if self.data.len() < len {
            return Err(ProtoError::Malformed(format!(
                "truncated payload: need {len} bytes, have {}",
                self.data.len()
            )));
        }
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        Ok(head)
    }
}

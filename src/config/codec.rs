//! Length-prefixed byte codec shared by the configuration types.
//!
//! Strings are written as `[len:1][bytes:len]`, integers big-endian.

use super::error::ConfigError;

/// Append a length-prefixed string.
///
/// Callers validate lengths first; every field limit is below 256.
pub(crate) fn put_str(buf: &mut Vec<u8>, value: &str) {
    debug_assert!(value.len() <= u8::MAX as usize);
    buf.push(value.len() as u8);
    buf.extend_from_slice(value.as_bytes());
}

/// Append a big-endian `u16`.
pub(crate) fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Cursor over an encoded buffer.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], ConfigError> {
        let end = self.pos + len;
        if end > self.bytes.len() {
            return Err(ConfigError::InvalidFormat(format!("truncated {}", what)));
        }
        let bytes: &'a [u8] = self.bytes;
        let slice = &bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self, what: &str) -> Result<u8, ConfigError> {
        Ok(self.take(1, what)?[0])
    }

    pub(crate) fn u16(&mut self, what: &str) -> Result<u16, ConfigError> {
        let raw = self.take(2, what)?;
        Ok(u16::from_be_bytes([raw[0], raw[1]]))
    }

    pub(crate) fn string(&mut self, what: &str) -> Result<String, ConfigError> {
        let len = self.u8(what)? as usize;
        let raw = self.take(len, what)?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| ConfigError::InvalidFormat(format!("invalid {} UTF-8", what)))
    }

    /// Bytes left after the last read.
    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

//! Structural message framing for undelimited JSON streams.
//!
//! Messages carry no delimiter or length prefix. The framer accumulates raw
//! bytes and runs a streaming JSON parser over them: a value that parses is a
//! complete message, an unexpected end of input means more bytes are needed,
//! and any other syntax error means the buffer can never become valid.
//!
//! Bytes that follow a complete value stay in the buffer as the start of the
//! next message, so two objects arriving in one read yield two messages in
//! order. The accumulator is byte-based, which keeps multi-byte UTF-8 sequences
//! intact when a read splits them.

use serde_json::Value;

use crate::errors::ProtocolError;

/// Default upper bound on bytes held while waiting for a message to complete.
pub const MAX_PENDING_BYTES: usize = 16 * 1024 * 1024;

/// Per-connection accumulator that yields complete JSON messages.
#[derive(Debug)]
pub struct MessageFramer {
    pending: Vec<u8>,
    limit: usize,
}

impl Default for MessageFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageFramer {
    /// Creates an empty framer with the default size limit.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limit(MAX_PENDING_BYTES)
    }

    /// Creates an empty framer that holds at most `limit` pending bytes.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            pending: Vec::new(),
            limit,
        }
    }

    /// Appends bytes read from the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MessageTooLarge`] and discards the pending
    /// bytes when the accumulator would exceed its limit.
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), ProtocolError> {
        if self.pending.len().saturating_add(bytes.len()) > self.limit {
            self.pending.clear();
            return Err(ProtocolError::MessageTooLarge { limit: self.limit });
        }
        self.pending.extend_from_slice(bytes);
        Ok(())
    }

    /// Extracts the next complete message, if one is buffered.
    ///
    /// Returns `None` while the buffered bytes form an incomplete value (or
    /// only whitespace). Returns `Some(Err(_))` once for a buffer that can
    /// never parse; the buffer is discarded so the connection can recover.
    pub fn next_message(&mut self) -> Option<Result<Value, ProtocolError>> {
        let Some(start) = self
            .pending
            .iter()
            .position(|byte| !byte.is_ascii_whitespace())
        else {
            self.pending.clear();
            return None;
        };

        let candidate = self.pending.get(start..).unwrap_or_default();
        let mut stream = serde_json::Deserializer::from_slice(candidate).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                let consumed = start.saturating_add(stream.byte_offset());
                self.pending.drain(..consumed);
                Some(Ok(value))
            }
            Some(Err(error)) if error.is_eof() => None,
            Some(Err(error)) => {
                self.pending.clear();
                Some(Err(ProtocolError::malformed(&error)))
            }
            None => {
                self.pending.clear();
                None
            }
        }
    }

    /// Number of bytes waiting for a message to complete.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true when no bytes are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

//! Pending-output buffer for expect matching

use regex::bytes::Regex;

/// Default buffer capacity: 16MB
pub const DEFAULT_CAPACITY: usize = 16 * 1_048_576;

/// Output read from the terminal but not yet claimed by an expect call.
///
/// Bytes are kept raw so a UTF-8 sequence split across reads is only decoded
/// once it has been claimed. Capacity is fixed; the oldest bytes are dropped
/// when it overflows.
pub struct ExpectBuffer {
    buffer: Vec<u8>,
    capacity: usize,
}

impl ExpectBuffer {
    /// Create buffer with specified capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::new(),
            capacity,
        }
    }

    /// Append data, dropping oldest bytes if over capacity
    pub fn append(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        if self.buffer.len() > self.capacity {
            let overflow = self.buffer.len() - self.capacity;
            self.buffer.drain(..overflow);
        }
    }

    /// Remove and return everything up to and including the first match
    pub fn take_through(&mut self, pattern: &Regex) -> Option<String> {
        let end = pattern.find(&self.buffer)?.end();
        let claimed: Vec<u8> = self.buffer.drain(..end).collect();
        Some(String::from_utf8_lossy(&claimed).into_owned())
    }

    /// Remove and return everything buffered
    pub fn take_all(&mut self) -> String {
        let claimed = std::mem::take(&mut self.buffer);
        String::from_utf8_lossy(&claimed).into_owned()
    }

    /// Current buffer size in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for ExpectBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

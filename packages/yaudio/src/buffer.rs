//! # Command Buffer
//!
//! Bounded, append-only notation log with a read cursor.
//!
//! Callers append text at the back; the interpreter consumes from the front by
//! advancing the cursor. Consumed text is reclaimed lazily, when the buffer
//! empties or when the consumed prefix outgrows the unread part, so consuming
//! one token never shifts the rest of the log.
//!
//! ## Invariants
//! - `len()` (unread bytes) never exceeds `capacity()`
//! - An append that would exceed capacity is rejected whole; nothing is written
//! - The cursor always sits on a `char` boundary

use crate::error::AudioError;

#[derive(Debug, Clone)]
pub struct CommandBuffer {
    log: String,
    cursor: usize,
    /// Bytes of this sequence already dropped from the front of `log`
    origin: usize,
    capacity: usize,
}

impl CommandBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            log: String::new(),
            cursor: 0,
            origin: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of unread bytes
    pub fn len(&self) -> usize {
        self.log.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unread text, starting at the cursor
    pub fn remaining(&self) -> &str {
        &self.log[self.cursor..]
    }

    /// Offset of the cursor from the start of the current sequence
    pub fn position(&self) -> usize {
        self.origin + self.cursor
    }

    /// Append `text` if it fits, otherwise leave the buffer untouched.
    pub fn append(&mut self, text: &str) -> Result<(), AudioError> {
        if self.len() + text.len() > self.capacity {
            return Err(AudioError::CapacityExceeded {
                buffered: self.len(),
                incoming: text.len(),
                capacity: self.capacity,
            });
        }

        if self.cursor > 0 && self.cursor >= self.len() {
            self.compact();
        }
        self.log.push_str(text);
        Ok(())
    }

    /// Append several pieces as one all-or-nothing write.
    pub fn append_all(&mut self, pieces: &[&str]) -> Result<(), AudioError> {
        let incoming: usize = pieces.iter().map(|p| p.len()).sum();
        if self.len() + incoming > self.capacity {
            return Err(AudioError::CapacityExceeded {
                buffered: self.len(),
                incoming,
                capacity: self.capacity,
            });
        }
        for piece in pieces {
            self.append(piece)?;
        }
        Ok(())
    }

    /// Advance the cursor past `bytes` unread bytes.
    ///
    /// `bytes` is clamped to the unread length and must land on a `char`
    /// boundary, which holds for every count produced by the lexer.
    pub fn consume(&mut self, bytes: usize) {
        self.cursor += bytes.min(self.len());
        if self.is_empty() {
            self.clear();
        }
    }

    /// Drop all unread text and start a new sequence.
    pub fn clear(&mut self) {
        self.log.clear();
        self.cursor = 0;
        self.origin = 0;
    }

    fn compact(&mut self) {
        self.log.drain(..self.cursor);
        self.origin += self.cursor;
        self.cursor = 0;
    }
}

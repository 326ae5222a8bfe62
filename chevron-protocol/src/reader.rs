//! Byte stream to line assembly
//!
//! The link carries two kinds of lines:
//! - status reports, closed by the `#` of their `Z#` sentinel
//! - plain commands, closed by a newline
//!
//! The delimiter byte is kept as the last byte of the line. A newline closes
//! a line (dropping it and a CR just before it) only when the line has
//! content other than line breaks; otherwise the break is kept as leading
//! CR/LF for the sanitizer to strip.

use crate::line::{LineBuffer, RawLine};

/// Default line delimiter (last byte of the `Z#` sentinel)
pub const DEFAULT_DELIMITER: u8 = b'#';

/// Errors raised while assembling lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded the buffer; bytes are discarded up to the next delimiter
    Overflow,
    /// A NUL byte was received; the partial line was dropped
    InvalidByte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Collecting bytes into the current line
    Assembling,
    /// Skipping the rest of an overlong line
    Discarding,
}

/// Assembles received bytes into bounded lines
#[derive(Debug, Clone)]
pub struct LineReader<const N: usize> {
    state: ReadState,
    line: LineBuffer<N>,
    delimiter: u8,
    /// A CR arrived while the line was full
    pending_cr: bool,
}

impl<const N: usize> Default for LineReader<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineReader<N> {
    /// Create a reader using [`DEFAULT_DELIMITER`]
    pub const fn new() -> Self {
        Self::with_delimiter(DEFAULT_DELIMITER)
    }

    /// Create a reader with a custom delimiter byte
    pub const fn with_delimiter(delimiter: u8) -> Self {
        Self {
            state: ReadState::Assembling,
            line: LineBuffer::new(),
            delimiter,
            pending_cr: false,
        }
    }

    /// Delimiter byte in use
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Bytes of the line currently being assembled
    pub fn pending(&self) -> &[u8] {
        self.line.as_bytes()
    }

    /// Drop any partial line and resume assembling
    pub fn reset(&mut self) {
        self.state = ReadState::Assembling;
        self.line.clear();
        self.pending_cr = false;
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a line is complete, `Ok(None)` when
    /// more bytes are needed, or `Err` when the current line was lost.
    pub fn feed(&mut self, byte: u8) -> Result<Option<RawLine<N>>, LineError> {
        match self.state {
            ReadState::Discarding => {
                if byte == self.delimiter || byte == b'\n' {
                    self.reset();
                }
                Ok(None)
            }
            ReadState::Assembling => {
                if byte == 0 {
                    self.reset();
                    return Err(LineError::InvalidByte);
                }

                if self.pending_cr {
                    self.pending_cr = false;
                    if byte == b'\n' {
                        return Ok(Some(self.take()));
                    }
                    if byte == self.delimiter {
                        self.reset();
                    } else {
                        self.line.clear();
                        self.state = ReadState::Discarding;
                    }
                    return Err(LineError::Overflow);
                }

                if byte == self.delimiter {
                    if self.line.push(byte).is_err() {
                        // The delimiter itself closes the lost line
                        self.reset();
                        return Err(LineError::Overflow);
                    }
                    return Ok(Some(self.take()));
                }

                if byte == b'\n' && self.has_content() {
                    if self.line.ends_with(b"\r") {
                        self.line.remove(self.line.len() - 1);
                    }
                    return Ok(Some(self.take()));
                }

                if self.line.push(byte).is_err() {
                    if byte == b'\r' && self.has_content() {
                        // Held back until the next byte shows whether it ends a CRLF
                        self.pending_cr = true;
                        return Ok(None);
                    }
                    if byte == b'\n' {
                        // Only line breaks so far, nothing worth keeping
                        self.line.clear();
                        return Ok(None);
                    }
                    self.line.clear();
                    self.state = ReadState::Discarding;
                    return Err(LineError::Overflow);
                }

                Ok(None)
            }
        }
    }

    /// Feed multiple bytes
    ///
    /// Returns the first complete line found, if any. Bytes after a complete
    /// line are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<RawLine<N>>, LineError> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte)? {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }

    fn has_content(&self) -> bool {
        self.line
            .as_bytes()
            .iter()
            .any(|&b| b != b'\r' && b != b'\n')
    }

    fn take(&mut self) -> RawLine<N> {
        self.pending_cr = false;
        core::mem::take(&mut self.line)
    }
}

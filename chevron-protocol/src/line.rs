//! Fixed-capacity text line buffer
//!
//! A `LineBuffer<N>` models a receive buffer of `N` bytes that always keeps
//! room for a terminator, so at most `N - 1` content bytes are stored. All
//! in-place edits (stripping a prefix, inserting or removing a byte) are
//! bounds checked; an edit that would not fit is refused and leaves the
//! content untouched.

use heapless::Vec;

/// Default receive line capacity in bytes (including the terminator slot)
pub const LINE_CAPACITY: usize = 128;

/// Returned when an edit would exceed the buffer capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapacityError;

/// Bounded line of raw bytes
///
/// Content never contains a NUL byte: construction from raw bytes stops at
/// the first NUL, the way a terminated receive buffer is read.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct LineBuffer<const N: usize> {
    bytes: Vec<u8, N>,
}

/// A received line that has not been sanitized yet
pub type RawLine<const N: usize> = LineBuffer<N>;

impl<const N: usize> LineBuffer<N> {
    /// Create an empty line
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Build a line from raw bytes
    ///
    /// Reads up to the first NUL and truncates to [`Self::capacity`].
    pub fn from_bytes(raw: &[u8]) -> Self {
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        let take = end.min(Self::capacity());
        let mut bytes = Vec::new();
        // Cannot fail: `take` is bounded by the capacity
        let _ = bytes.extend_from_slice(&raw[..take]);
        Self { bytes }
    }

    /// Maximum number of content bytes (one slot is kept for the terminator)
    pub const fn capacity() -> usize {
        N.saturating_sub(1)
    }

    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if there is no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True if no further byte can be added
    pub fn is_full(&self) -> bool {
        self.len() >= Self::capacity()
    }

    /// Content bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Content as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    /// First content byte
    pub fn first(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// True if the content starts with `prefix`
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes.starts_with(prefix)
    }

    /// True if the content ends with `suffix`
    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.bytes.ends_with(suffix)
    }

    /// Remove all content
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Append a byte
    pub fn push(&mut self, byte: u8) -> Result<(), CapacityError> {
        if byte == 0 || self.is_full() {
            return Err(CapacityError);
        }
        self.bytes.push(byte).map_err(|_| CapacityError)
    }

    /// Append a slice, all or nothing
    pub fn extend_from_slice(&mut self, data: &[u8]) -> Result<(), CapacityError> {
        if data.contains(&0) || self.len() + data.len() > Self::capacity() {
            return Err(CapacityError);
        }
        self.bytes.extend_from_slice(data).map_err(|_| CapacityError)
    }

    /// Shift the content right by one and write `byte` at index 0
    ///
    /// Refused without modification when the result would not fit.
    pub fn insert_front(&mut self, byte: u8) -> Result<(), CapacityError> {
        if byte == 0 || self.is_full() {
            return Err(CapacityError);
        }
        self.bytes.insert(0, byte).map_err(|_| CapacityError)
    }

    /// Remove the byte at `index`, shifting the tail left by one
    pub fn remove(&mut self, index: usize) -> Option<u8> {
        if index < self.len() {
            Some(self.bytes.remove(index))
        } else {
            None
        }
    }

    /// Drop the leading run of bytes matching `pred`
    ///
    /// Returns the length of the removed run.
    pub fn strip_leading(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let run = self.bytes.iter().take_while(|&&b| pred(b)).count();
        if run > 0 {
            self.bytes.copy_within(run.., 0);
            self.bytes.truncate(self.len() - run);
        }
        run
    }

    /// Copy the content into a caller buffer followed by a NUL terminator
    ///
    /// Truncates to `out.len() - 1` bytes. Returns the number of content
    /// bytes written (the terminator is not counted). An empty `out` is
    /// left untouched.
    pub fn write_terminated(&self, out: &mut [u8]) -> usize {
        write_terminated(&self.bytes, out)
    }
}

impl<const N: usize> core::fmt::Debug for LineBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.as_str() {
            Some(text) => write!(f, "LineBuffer({:?})", text),
            None => write!(f, "LineBuffer({:?})", self.as_bytes()),
        }
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for LineBuffer<N> {
    fn format(&self, f: defmt::Formatter) {
        match self.as_str() {
            Some(text) => defmt::write!(f, "{=str}", text),
            None => defmt::write!(f, "{=[u8]}", self.as_bytes()),
        }
    }
}

/// Copy `src` into `out` with a trailing NUL, truncating as needed
///
/// Returns the number of bytes of `src` that were copied.
pub fn write_terminated(src: &[u8], out: &mut [u8]) -> usize {
    let Some(room) = out.len().checked_sub(1) else {
        return 0;
    };
    let n = src.len().min(room);
    out[..n].copy_from_slice(&src[..n]);
    out[n] = 0;
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_stops_at_nul_and_capacity() {
        let line = LineBuffer::<8>::from_bytes(b"ab\0cd");
        assert_eq!(line.as_bytes(), b"ab");

        let line = LineBuffer::<4>::from_bytes(b"abcdef");
        assert_eq!(line.as_bytes(), b"abc");
        assert!(line.is_full());
    }

    #[test]
    fn test_zero_capacity_is_inert() {
        let mut line = LineBuffer::<0>::from_bytes(b"abc");
        assert!(line.is_empty());
        assert_eq!(line.push(b'a'), Err(CapacityError));
        assert_eq!(line.insert_front(b'>'), Err(CapacityError));
        assert_eq!(LineBuffer::<0>::capacity(), 0);
    }

    #[test]
    fn test_insert_front_respects_terminator_slot() {
        let mut line = LineBuffer::<4>::from_bytes(b"Z#");
        assert_eq!(line.insert_front(b'>'), Ok(()));
        assert_eq!(line.as_bytes(), b">Z#");
        assert_eq!(line.insert_front(b'>'), Err(CapacityError));
        assert_eq!(line.as_bytes(), b">Z#");
    }

    #[test]
    fn test_strip_leading() {
        let mut line = LineBuffer::<16>::from_bytes(b"\r\n\r>MA");
        let removed = line.strip_leading(|b| b == b'\r' || b == b'\n');
        assert_eq!(removed, 3);
        assert_eq!(line.as_bytes(), b">MA");

        assert_eq!(line.strip_leading(|b| b == b'\r'), 0);
        assert_eq!(line.as_bytes(), b">MA");
    }

    #[test]
    fn test_remove_shifts_tail() {
        let mut line = LineBuffer::<16>::from_bytes(b">TMA");
        assert_eq!(line.remove(1), Some(b'T'));
        assert_eq!(line.as_bytes(), b">MA");
        assert_eq!(line.remove(10), None);
    }

    #[test]
    fn test_push_rejects_nul() {
        let mut line = LineBuffer::<8>::new();
        assert_eq!(line.push(0), Err(CapacityError));
        assert_eq!(line.extend_from_slice(b"a\0"), Err(CapacityError));
        assert!(line.is_empty());
    }

    #[test]
    fn test_write_terminated_truncates() {
        let line = LineBuffer::<16>::from_bytes(b"hello");
        let mut out = [0xFFu8; 4];
        assert_eq!(line.write_terminated(&mut out), 3);
        assert_eq!(&out, b"hel\0");

        let mut empty: [u8; 0] = [];
        assert_eq!(line.write_terminated(&mut empty), 0);
    }
}

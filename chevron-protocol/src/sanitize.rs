//! Line sanitization
//!
//! Received lines are normalized before interpretation:
//!
//! 1. A leading run of CR/LF left over from the previous line is stripped.
//! 2. A line ending in the `Z#` sentinel that lost its `>` opener gets it
//!    back, provided the buffer has room for it.
//! 3. A `>T` opener is collapsed to `>` (`>TMA10` becomes `>MA10`).
//!
//! None of these steps fail. A prefix that does not fit is reported in the
//! [`SanitizeReport`] and the line is left as it was.

use crate::line::{LineBuffer, RawLine};

/// Opener of every status report and prefixed command
pub const CHEVRON: u8 = b'>';

/// Closing sentinel of a status report
pub const STATUS_SUFFIX: &[u8] = b"Z#";

/// Byte removed when it directly follows the chevron
pub const TAG_T: u8 = b'T';

/// What happened to the `>` opener during sanitization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrefixOutcome {
    /// The line did not need an opener
    #[default]
    NotNeeded,
    /// The opener was inserted
    Inserted,
    /// The line needed an opener but the buffer was full
    NoRoom,
}

/// Diagnostics collected while sanitizing one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SanitizeReport {
    /// Number of leading CR/LF bytes removed
    pub stripped: usize,
    /// Handling of the `>` opener
    pub prefix: PrefixOutcome,
    /// True if a `T` following the opener was removed
    pub removed_t: bool,
}

impl SanitizeReport {
    /// True if the line was left exactly as received
    pub fn is_untouched(&self) -> bool {
        self.stripped == 0 && self.prefix != PrefixOutcome::Inserted && !self.removed_t
    }
}

fn is_line_break(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// Strip leading CR/LF and restore a missing `>` on `Z#`-terminated lines
///
/// Never grows the content past the buffer capacity.
pub fn sanitize<const N: usize>(line: &mut LineBuffer<N>) -> SanitizeReport {
    let stripped = line.strip_leading(is_line_break);

    let needs_prefix =
        line.len() >= 2 && line.ends_with(STATUS_SUFFIX) && line.first() != Some(CHEVRON);

    let prefix = if !needs_prefix {
        PrefixOutcome::NotNeeded
    } else if line.insert_front(CHEVRON).is_ok() {
        PrefixOutcome::Inserted
    } else {
        PrefixOutcome::NoRoom
    };

    SanitizeReport {
        stripped,
        prefix,
        removed_t: false,
    }
}

/// Collapse a leading `>T` into `>`
///
/// Returns true if the `T` was removed.
pub fn strip_leading_t<const N: usize>(line: &mut LineBuffer<N>) -> bool {
    if line.starts_with(&[CHEVRON, TAG_T]) {
        line.remove(1);
        true
    } else {
        false
    }
}

/// Shape of a canonical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    /// Nothing left after sanitization
    Empty,
    /// `>...Z#` status report carrying tagged fields
    StatusReport,
    /// Any other line, handed to the command layer untouched
    Command,
}

/// A line after sanitization
///
/// Only obtainable through [`CanonicalCommand::from_raw`], so holding one
/// means both normalization passes have run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCommand<const N: usize> {
    line: LineBuffer<N>,
}

impl<const N: usize> CanonicalCommand<N> {
    /// Sanitize a raw line and collapse a `>T` opener
    pub fn from_raw(mut raw: RawLine<N>) -> (Self, SanitizeReport) {
        let mut report = sanitize(&mut raw);
        report.removed_t = strip_leading_t(&mut raw);
        (Self { line: raw }, report)
    }

    /// Classify the line
    pub fn kind(&self) -> FrameKind {
        if self.line.is_empty() {
            FrameKind::Empty
        } else if self.line.first() == Some(CHEVRON) && self.line.ends_with(STATUS_SUFFIX) {
            FrameKind::StatusReport
        } else {
            FrameKind::Command
        }
    }

    /// Canonical bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.line.as_bytes()
    }

    /// Canonical text, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.line.as_str()
    }

    /// Give back the underlying buffer
    pub fn into_inner(self) -> LineBuffer<N> {
        self.line
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for CanonicalCommand<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", self.line)
    }
}

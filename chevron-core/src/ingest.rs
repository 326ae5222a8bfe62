//! Receive path: raw line to published state
//!
//! ```text
//! RawLine ─► canonicalize ─► kind ─┬─ StatusReport ─► parse_frame ─► publish
//!                                  ├─ Command ──────► returned to the caller
//!                                  └─ Empty ────────► dropped
//! ```
//!
//! Parsing builds the snapshot outside the lock; only the final copy runs
//! inside the publisher's exclusion window.

use chevron_protocol::{
    parse_frame, CanonicalCommand, FieldSet, FrameKind, PrefixOutcome, RawLine, SanitizeReport,
};
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::logging::{log_debug, log_trace, log_warn};
use crate::state::RemoteStateCell;

/// Sanitize a raw line and collapse a `>T` opener
pub fn canonicalize<const N: usize>(raw: RawLine<N>) -> (CanonicalCommand<N>, SanitizeReport) {
    CanonicalCommand::from_raw(raw)
}

/// What became of one received line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingested<const N: usize> {
    /// Nothing left after sanitization
    Empty,
    /// A status report was parsed and published
    Status {
        /// Generation assigned by the publisher
        generation: u32,
        /// Tags that were present in the report
        fields: FieldSet,
    },
    /// A status report without a single recognised tag; not published
    Rejected,
    /// Any other line, for the command layer
    Command(CanonicalCommand<N>),
}

/// Counters kept by [`LineIngest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IngestStats {
    /// Lines handed to `ingest`
    pub lines: u32,
    /// Status reports published
    pub published: u32,
    /// Status reports dropped for lack of any tag
    pub rejected: u32,
    /// Lines returned as commands
    pub commands: u32,
    /// Lines whose `>` opener could not be inserted for lack of room
    pub prefix_declined: u32,
}

/// Producer side of the shared remote state
#[derive(Debug, Default)]
pub struct LineIngest {
    stats: IngestStats,
}

impl LineIngest {
    pub const fn new() -> Self {
        Self {
            stats: IngestStats {
                lines: 0,
                published: 0,
                rejected: 0,
                commands: 0,
                prefix_declined: 0,
            },
        }
    }

    /// Counters so far
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Run one received line through the receive path
    pub fn ingest<M: RawMutex, const N: usize>(
        &mut self,
        raw: RawLine<N>,
        shared: &RemoteStateCell<M>,
    ) -> Ingested<N> {
        self.stats.lines = self.stats.lines.wrapping_add(1);

        let (canonical, report) = canonicalize(raw);
        if report.prefix == PrefixOutcome::NoRoom {
            self.stats.prefix_declined = self.stats.prefix_declined.wrapping_add(1);
            log_warn!("no room for '>' opener, {} bytes", canonical.as_bytes().len());
        }

        match canonical.kind() {
            FrameKind::Empty => Ingested::Empty,
            FrameKind::Command => {
                self.stats.commands = self.stats.commands.wrapping_add(1);
                Ingested::Command(canonical)
            }
            FrameKind::StatusReport => {
                let outcome = parse_frame(canonical.as_bytes());
                if outcome.is_empty() {
                    self.stats.rejected = self.stats.rejected.wrapping_add(1);
                    log_debug!("status report without tags dropped");
                    return Ingested::Rejected;
                }

                let fields = outcome.fields;
                let generation = shared.publish(outcome.state);
                self.stats.published = self.stats.published.wrapping_add(1);
                log_trace!("published remote state, generation {}", generation);
                Ingested::Status { generation, fields }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chevron_protocol::{LineBuffer, Tag};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    fn raw<const N: usize>(text: &[u8]) -> RawLine<N> {
        LineBuffer::from_bytes(text)
    }

    #[test]
    fn test_status_report_is_published() {
        let shared = RemoteStateCell::<NoopRawMutex>::new();
        let mut ingest = LineIngest::new();

        let result = ingest.ingest(raw::<128>(b"\r\n{\"p\":X12,\"r\":1,\"v\":42}Z#"), &shared);
        match result {
            Ingested::Status { generation, fields } => {
                assert_eq!(generation, 1);
                assert!(fields.contains(Tag::Position));
                assert_eq!(fields.len(), 3);
            }
            other => panic!("unexpected {:?}", other),
        }

        let state = shared.snapshot();
        assert_eq!(state.position.as_str(), "X12");
        assert!(state.referenced);
        assert_eq!(state.speed, 42);
        assert_eq!(ingest.stats().published, 1);
    }

    #[test]
    fn test_command_is_forwarded() {
        let shared = RemoteStateCell::<NoopRawMutex>::new();
        let mut ingest = LineIngest::new();

        match ingest.ingest(raw::<128>(b"\n>TMA10"), &shared) {
            Ingested::Command(cmd) => assert_eq!(cmd.as_bytes(), b">MA10"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(shared.versioned().is_stale());
        assert_eq!(ingest.stats().commands, 1);
    }

    #[test]
    fn test_report_without_tags_keeps_previous_state() {
        let shared = RemoteStateCell::<NoopRawMutex>::new();
        let mut ingest = LineIngest::new();

        ingest.ingest(raw::<128>(b">{\"v\":7}Z#"), &shared);
        assert_eq!(ingest.ingest(raw::<128>(b">garbageZ#"), &shared), Ingested::Rejected);

        let versioned = shared.versioned();
        assert_eq!(versioned.generation, 1);
        assert_eq!(versioned.state.speed, 7);
        assert_eq!(ingest.stats().rejected, 1);
    }

    #[test]
    fn test_empty_and_declined_prefix() {
        let shared = RemoteStateCell::<NoopRawMutex>::new();
        let mut ingest = LineIngest::new();

        assert_eq!(ingest.ingest(raw::<16>(b"\r\n"), &shared), Ingested::Empty);

        // Three content bytes fill a 4 byte buffer, so '>' cannot be added
        match ingest.ingest(raw::<4>(b"vZ#"), &shared) {
            Ingested::Command(cmd) => assert_eq!(cmd.as_bytes(), b"vZ#"),
            other => panic!("unexpected {:?}", other),
        }

        let stats = ingest.stats();
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.prefix_declined, 1);
        assert_eq!(stats.published, 0);
    }
}

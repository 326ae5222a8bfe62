//! Status report parsing
//!
//! A status report is not a strict JSON document. It is scanned for a fixed
//! set of `"<tag>":<value>` pairs, each looked up independently:
//!
//! | tag | field        | value                                        |
//! |-----|--------------|----------------------------------------------|
//! | `p` | `position`   | text up to `,` or `}` (at most 31 bytes)     |
//! | `r` | `referenced` | `1` is true, anything else false             |
//! | `b` | `busy`       | same                                         |
//! | `o` | `back`       | back limit switch                            |
//! | `u` | `front`      | front limit switch                           |
//! | `v` | `speed`      | decimal digits, saturating at 255            |
//!
//! Speeds above 255 clamp to 255 instead of wrapping modulo 256, so a
//! report of `300` reads as full speed rather than 44.
//!
//! Only the first occurrence of each tag counts. A missing or damaged tag
//! leaves its field at the default and never affects the other tags, so a
//! corrupted report degrades to a partial snapshot instead of failing.

use heapless::String;

/// Maximum position text length (a C-style 32 byte field with terminator)
pub const POSITION_CAPACITY: usize = 31;

/// Snapshot of the remote axis controller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RemoteState {
    /// Position text as reported
    pub position: String<POSITION_CAPACITY>,
    /// Axis has been referenced (homed)
    pub referenced: bool,
    /// A motion is in progress
    pub busy: bool,
    /// Back limit switch asserted
    pub back: bool,
    /// Front limit switch asserted
    pub front: bool,
    /// Current speed setting
    pub speed: u8,
}

impl RemoteState {
    /// All-default snapshot, usable in `const` context
    pub const fn new() -> Self {
        Self {
            position: String::new(),
            referenced: false,
            busy: false,
            back: false,
            front: false,
            speed: 0,
        }
    }

    /// Parse a report, discarding the field presence information
    pub fn parse(text: &[u8]) -> Self {
        parse_frame(text).state
    }
}

/// A single-letter field tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tag {
    Position,
    Referenced,
    Busy,
    Back,
    Front,
    Speed,
}

impl Tag {
    /// Every tag, in scan order
    pub const ALL: [Tag; 6] = [
        Tag::Position,
        Tag::Referenced,
        Tag::Busy,
        Tag::Back,
        Tag::Front,
        Tag::Speed,
    ];

    /// Wire letter
    pub const fn letter(self) -> u8 {
        match self {
            Tag::Position => b'p',
            Tag::Referenced => b'r',
            Tag::Busy => b'b',
            Tag::Back => b'o',
            Tag::Front => b'u',
            Tag::Speed => b'v',
        }
    }

    /// The literal `"x":` searched for in the text
    pub const fn pattern(self) -> [u8; 4] {
        [b'"', self.letter(), b'"', b':']
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of tags found in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSet(u8);

impl FieldSet {
    /// No fields
    pub const EMPTY: Self = Self(0);

    /// Mark a tag as present
    pub fn insert(&mut self, tag: Tag) {
        self.0 |= tag.bit();
    }

    /// True if the tag was present
    pub fn contains(&self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// True if no tag was present
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of tags present
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }
}

/// Result of scanning one report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseOutcome {
    /// Fully built snapshot (defaults for missing fields)
    pub state: RemoteState,
    /// Which tags were found
    pub fields: FieldSet,
}

impl ParseOutcome {
    /// True if not a single tag was recognised
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Scan a canonical report for tagged fields
///
/// Always returns a complete snapshot; see the module docs for the rules.
pub fn parse_frame(text: &[u8]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for tag in Tag::ALL {
        let Some(value) = find_value(text, tag) else {
            continue;
        };
        outcome.fields.insert(tag);

        let state = &mut outcome.state;
        match tag {
            Tag::Position => state.position = parse_position(value),
            Tag::Referenced => state.referenced = parse_flag(value),
            Tag::Busy => state.busy = parse_flag(value),
            Tag::Back => state.back = parse_flag(value),
            Tag::Front => state.front = parse_flag(value),
            Tag::Speed => state.speed = parse_speed(value),
        }
    }

    outcome
}

/// Locate the first `"x":` and return the text after it and any spaces/colons
fn find_value(text: &[u8], tag: Tag) -> Option<&[u8]> {
    let pattern = tag.pattern();
    let start = text
        .windows(pattern.len())
        .position(|window| window == pattern)?;

    let rest = &text[start + pattern.len()..];
    let skip = rest
        .iter()
        .take_while(|&&b| b == b' ' || b == b':')
        .count();
    Some(&rest[skip..])
}

fn parse_position(value: &[u8]) -> String<POSITION_CAPACITY> {
    let mut position = String::new();
    for &byte in value
        .iter()
        .take_while(|&&b| b != b',' && b != b'}' && b != 0)
        .take(POSITION_CAPACITY)
    {
        // Non-ASCII bytes cannot be stored one-for-one in UTF-8 text
        let ch = if byte.is_ascii() { byte as char } else { '?' };
        // Cannot fail: at most POSITION_CAPACITY single-byte chars
        let _ = position.push(ch);
    }
    position
}

fn parse_flag(value: &[u8]) -> bool {
    value.first() == Some(&b'1')
}

/// Leading decimal digits, clamped to `u8::MAX`
fn parse_speed(value: &[u8]) -> u8 {
    value
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u8, |acc, &digit| {
            acc.saturating_mul(10).saturating_add(digit - b'0')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_basic_frame() {
        let outcome = parse_frame(b"\"p\":X12,\"r\":1,\"v\":42}");
        let state = &outcome.state;
        assert_eq!(state.position.as_str(), "X12");
        assert!(state.referenced);
        assert!(!state.busy);
        assert!(!state.back);
        assert!(!state.front);
        assert_eq!(state.speed, 42);

        assert!(outcome.fields.contains(Tag::Position));
        assert!(outcome.fields.contains(Tag::Speed));
        assert!(!outcome.fields.contains(Tag::Busy));
        assert_eq!(outcome.fields.len(), 3);
    }

    #[test]
    fn test_garbage_yields_defaults() {
        let outcome = parse_frame(b"garbage");
        assert!(outcome.is_empty());
        assert_eq!(outcome.state, RemoteState::new());
    }

    #[test]
    fn test_full_status_report() {
        let text = b">{\"p\":\"A-10.5\",\"r\":1,\"b\":0,\"o\":1,\"u\":0,\"v\":120}Z#";
        let state = RemoteState::parse(text);
        // Quotes are part of the copied text, only , and } terminate it
        assert_eq!(state.position.as_str(), "\"A-10.5\"");
        assert!(state.referenced);
        assert!(!state.busy);
        assert!(state.back);
        assert!(!state.front);
        assert_eq!(state.speed, 120);
    }

    #[test]
    fn test_separators_after_tag_are_skipped() {
        let state = RemoteState::parse(b"\"b\": :1,\"v\":  7}");
        assert!(state.busy);
        assert_eq!(state.speed, 7);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let state = RemoteState::parse(b"\"v\":10,\"v\":20,\"r\":0,\"r\":1}");
        assert_eq!(state.speed, 10);
        assert!(!state.referenced);
    }

    #[test]
    fn test_position_bounded() {
        let long = b"\"p\":0123456789012345678901234567890123456789}";
        let state = RemoteState::parse(long);
        assert_eq!(state.position.len(), POSITION_CAPACITY);
        assert_eq!(state.position.as_str(), "0123456789012345678901234567890");
    }

    #[test]
    fn test_position_at_end_of_text() {
        assert_eq!(RemoteState::parse(b"\"p\":Y7").position.as_str(), "Y7");
        assert_eq!(RemoteState::parse(b"\"p\":").position.as_str(), "");
    }

    #[test]
    fn test_position_non_ascii_replaced() {
        let state = RemoteState::parse(b"\"p\":A\xC3\xA9B,");
        assert_eq!(state.position.as_str(), "A??B");
    }

    #[test]
    fn test_speed_edge_cases() {
        assert_eq!(RemoteState::parse(b"\"v\":abc").speed, 0);
        assert_eq!(RemoteState::parse(b"\"v\":").speed, 0);
        assert_eq!(RemoteState::parse(b"\"v\":-5").speed, 0);
        assert_eq!(RemoteState::parse(b"\"v\":255").speed, 255);
        assert_eq!(RemoteState::parse(b"\"v\":300").speed, 255);
        assert_eq!(RemoteState::parse(b"\"v\":256").speed, 255);
        assert_eq!(RemoteState::parse(b"\"v\":99999").speed, 255);
        assert_eq!(RemoteState::parse(b"\"v\":12x9").speed, 12);
    }

    #[test]
    fn test_flag_requires_literal_one() {
        assert!(!RemoteState::parse(b"\"r\":true").referenced);
        assert!(!RemoteState::parse(b"\"r\":").referenced);
        assert!(RemoteState::parse(b"\"r\":1").referenced);
    }

    #[test]
    fn test_damaged_tag_does_not_affect_others() {
        // `"b"` without its colon is not a tag; `v` still parses
        let outcome = parse_frame(b"{\"b\"1,\"v\":9}");
        assert!(!outcome.fields.contains(Tag::Busy));
        assert_eq!(outcome.state.speed, 9);
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(text in proptest::collection::vec(any::<u8>(), 0..96)) {
            let outcome = parse_frame(&text);
            prop_assert!(outcome.state.position.len() <= POSITION_CAPACITY);
        }

        #[test]
        fn prop_speed_roundtrip(speed in any::<u8>(), busy in any::<bool>()) {
            let mut text = heapless::String::<48>::new();
            core::fmt::write(
                &mut text,
                format_args!("{{\"b\":{},\"v\":{}}}", busy as u8, speed),
            ).unwrap();
            let state = RemoteState::parse(text.as_bytes());
            prop_assert_eq!(state.speed, speed);
            prop_assert_eq!(state.busy, busy);
        }
    }
}

//! Verse references and the character scanner that reads them from chat text.
//!
//! A reference starts with a sentinel character (`$` by default) followed by
//! `chapter:verse` or `chapter:first-last`. The [`ReferenceScanner`] walks the
//! text one character at a time with a three-field cursor
//! (chapter → first verse → last verse) and produces a [`RawReference`]. Raw
//! references are unchecked; [`crate::validate`] turns them into a
//! [`VerseReference`].

use std::fmt;

/// The sentinel that introduces a verse reference in chat text.
pub const DEFAULT_SENTINEL: char = '$';

/// The verses covered by a reference: one verse or a contiguous range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerseSpan {
    /// A single verse.
    Single(u16),
    /// An inclusive range `first..=last`, with `first <= last`.
    Range { first: u16, last: u16 },
}

impl VerseSpan {
    /// The first verse of the span.
    pub fn first(&self) -> u16 {
        match *self {
            VerseSpan::Single(verse) => verse,
            VerseSpan::Range { first, .. } => first,
        }
    }

    /// The last verse of the span (equal to `first` for a single verse).
    pub fn last(&self) -> u16 {
        match *self {
            VerseSpan::Single(verse) => verse,
            VerseSpan::Range { last, .. } => last,
        }
    }

    /// Number of verses covered.
    pub fn len(&self) -> usize {
        usize::from(self.last() - self.first()) + 1
    }

    /// A span always covers at least one verse.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// A validated reference to a verse or verse range of one chapter.
///
/// Only [`crate::validate`] constructs these, so every value upholds the
/// chapter and verse bounds it was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerseReference {
    sura: u16,
    span: VerseSpan,
}

impl VerseReference {
    pub(crate) fn new(sura: u16, span: VerseSpan) -> Self {
        Self { sura, span }
    }

    /// The chapter number.
    pub fn sura(&self) -> u16 {
        self.sura
    }

    /// The verse span.
    pub fn span(&self) -> VerseSpan {
        self.span
    }

    /// The first (or only) verse.
    pub fn first_verse(&self) -> u16 {
        self.span.first()
    }

    /// The last verse, present only for ranges.
    pub fn last_verse(&self) -> Option<u16> {
        match self.span {
            VerseSpan::Single(_) => None,
            VerseSpan::Range { last, .. } => Some(last),
        }
    }

    /// Whether this reference names a range rather than one verse.
    pub fn is_range(&self) -> bool {
        matches!(self.span, VerseSpan::Range { .. })
    }
}

impl fmt::Display for VerseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            VerseSpan::Single(verse) => write!(f, "{}:{verse}", self.sura),
            VerseSpan::Range { first, last } => write!(f, "{}:{first}-{last}", self.sura),
        }
    }
}

/// The three numeric fields of a reference, in scanning order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Sura,
    FirstVerse,
    LastVerse,
}

impl Field {
    fn index(self) -> usize {
        match self {
            Field::Sura => 0,
            Field::FirstVerse => 1,
            Field::LastVerse => 2,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Sura => "chapter",
            Field::FirstVerse => "first verse",
            Field::LastVerse => "last verse",
        };
        f.write_str(name)
    }
}

/// The last-verse field as scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawLast {
    /// No range separator was seen.
    Absent,
    /// A range separator followed by a number.
    Number(u32),
    /// A range separator with no digits after it, or digits that overflow.
    NotANumber,
}

/// The unchecked result of scanning a reference.
///
/// `None` marks a field whose buffer was empty or did not fit a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReference {
    pub sura: Option<u32>,
    pub first_verse: Option<u32>,
    pub last_verse: RawLast,
    /// Characters consumed, counting the sentinel.
    pub consumed: usize,
}

/// Errors from scanning and validating a reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    #[error("reference result queried before scanning finished")]
    ParseIncomplete,

    #[error("input does not start with the reference sentinel {sentinel:?}")]
    NotAReference { sentinel: char },

    #[error("{field} is not a number")]
    InvalidNumeric { field: Field },

    #[error("chapter {sura} does not exist (expected 1-114)")]
    InvalidChapter { sura: u32 },

    #[error("verse {verse} is out of bounds for chapter {sura} (max {max})")]
    InvalidVerseBound { sura: u16, verse: u32, max: u16 },

    #[error("first verse {first} is greater than last verse {last}")]
    InvalidRange { first: u16, last: u16 },

    #[error("chapter {sura} has no verse 0")]
    InvalidZeroVerse { sura: u16 },
}

impl ReferenceError {
    /// Short machine-readable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ReferenceError::ParseIncomplete => "parse_incomplete",
            ReferenceError::NotAReference { .. } => "not_a_reference",
            ReferenceError::InvalidNumeric { .. } => "invalid_numeric",
            ReferenceError::InvalidChapter { .. } => "invalid_chapter",
            ReferenceError::InvalidVerseBound { .. } => "invalid_verse_bound",
            ReferenceError::InvalidRange { .. } => "invalid_range",
            ReferenceError::InvalidZeroVerse { .. } => "invalid_zero_verse",
        }
    }
}

/// Character-at-a-time scanner for the reference syntax.
///
/// `:` moves the cursor from the chapter to the first verse and `-` moves it
/// from the first verse to the last verse; each is legal once, in that order.
/// Scanning stops at the first character that is neither a digit nor a legal
/// separator, or at end of input. The stopping character is not consumed.
#[derive(Debug, Clone)]
pub struct ReferenceScanner<'a> {
    rest: &'a str,
    field: Field,
    buffers: [String; 3],
    range_separator: bool,
    consumed: usize,
    finished: bool,
}

impl<'a> ReferenceScanner<'a> {
    /// Start scanning `input`, which must begin with `sentinel`.
    pub fn new(input: &'a str, sentinel: char) -> Result<Self, ReferenceError> {
        let rest = input
            .strip_prefix(sentinel)
            .ok_or(ReferenceError::NotAReference { sentinel })?;

        Ok(Self {
            rest,
            field: Field::Sura,
            buffers: Default::default(),
            range_separator: false,
            consumed: 1,
            finished: false,
        })
    }

    /// Consume one character. Returns `false` once scanning has terminated.
    pub fn step(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let Some(c) = self.rest.chars().next() else {
            self.finished = true;
            return false;
        };

        match (c, self.field) {
            (digit, field) if digit.is_ascii_digit() => self.buffers[field.index()].push(digit),
            (':', Field::Sura) => self.field = Field::FirstVerse,
            ('-', Field::FirstVerse) => {
                self.field = Field::LastVerse;
                self.range_separator = true;
            }
            _ => {
                self.finished = true;
                return false;
            }
        }

        self.rest = &self.rest[c.len_utf8()..];
        self.consumed += 1;
        true
    }

    /// Scan until termination.
    pub fn scan_to_end(&mut self) {
        while self.step() {}
    }

    /// Whether scanning has terminated.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Characters consumed so far, counting the sentinel.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Convert the field buffers into a [`RawReference`].
    ///
    /// Fails with [`ReferenceError::ParseIncomplete`] if scanning has not
    /// terminated yet.
    pub fn finish(&self) -> Result<RawReference, ReferenceError> {
        if !self.finished {
            return Err(ReferenceError::ParseIncomplete);
        }

        let [sura, first, last] = &self.buffers;
        let last_verse = match (self.range_separator, number(last)) {
            (false, _) => RawLast::Absent,
            (true, Some(n)) => RawLast::Number(n),
            (true, None) => RawLast::NotANumber,
        };

        Ok(RawReference {
            sura: number(sura),
            first_verse: number(first),
            last_verse,
            consumed: self.consumed,
        })
    }
}

fn number(digits: &str) -> Option<u32> {
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Scan `input` to completion and return the raw fields.
pub fn scan(input: &str, sentinel: char) -> Result<RawReference, ReferenceError> {
    let mut scanner = ReferenceScanner::new(input, sentinel)?;
    scanner.scan_to_end();
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(input: &str) -> RawReference {
        scan(input, DEFAULT_SENTINEL).unwrap()
    }

    #[test]
    fn test_single_verse() {
        let r = raw("$63:6");
        assert_eq!(r.sura, Some(63));
        assert_eq!(r.first_verse, Some(6));
        assert_eq!(r.last_verse, RawLast::Absent);
        assert_eq!(r.consumed, 5);
    }

    #[test]
    fn test_range() {
        let r = raw("$2:110-120");
        assert_eq!(r.sura, Some(2));
        assert_eq!(r.first_verse, Some(110));
        assert_eq!(r.last_verse, RawLast::Number(120));
        assert_eq!(r.consumed, 10);
    }

    #[test]
    fn test_stops_at_foreign_character() {
        let input = "$63:6 is my favourite";
        let r = raw(input);
        assert_eq!(r.first_verse, Some(6));
        assert_eq!(&input[..r.consumed], "$63:6");
    }

    #[test]
    fn test_no_digits() {
        let r = raw("$");
        assert_eq!(r.sura, None);
        assert_eq!(r.first_verse, None);
        assert_eq!(r.consumed, 1);

        let r = raw("$random");
        assert_eq!(r.sura, None);
        assert_eq!(r.consumed, 1);
    }

    #[test]
    fn test_dangling_range_separator() {
        let r = raw("$2:5-");
        assert_eq!(r.first_verse, Some(5));
        assert_eq!(r.last_verse, RawLast::NotANumber);
    }

    #[test]
    fn test_separator_out_of_order_terminates() {
        // '-' is only legal after the first verse.
        let r = raw("$2-5");
        assert_eq!(r.sura, Some(2));
        assert_eq!(r.first_verse, None);
        assert_eq!(r.consumed, 2);

        // A second ':' stops the scan.
        let r = raw("$2:3:4");
        assert_eq!(r.first_verse, Some(3));
        assert_eq!(r.last_verse, RawLast::Absent);
        assert_eq!(r.consumed, 4);

        // A second '-' stops the scan.
        let r = raw("$2:3-4-5");
        assert_eq!(r.last_verse, RawLast::Number(4));
        assert_eq!(r.consumed, 6);
    }

    #[test]
    fn test_overflowing_digits_are_not_numbers() {
        let r = raw("$99999999999:1");
        assert_eq!(r.sura, None);
        assert_eq!(r.first_verse, Some(1));
    }

    #[test]
    fn test_missing_sentinel() {
        assert_eq!(
            scan("63:6", DEFAULT_SENTINEL),
            Err(ReferenceError::NotAReference { sentinel: '$' })
        );
        assert!(scan("", DEFAULT_SENTINEL).is_err());
    }

    #[test]
    fn test_custom_sentinel() {
        let r = scan("#7:2", '#').unwrap();
        assert_eq!(r.sura, Some(7));
        assert_eq!(r.first_verse, Some(2));
    }

    #[test]
    fn test_finish_before_scan_completes() {
        let mut scanner = ReferenceScanner::new("$1:2", DEFAULT_SENTINEL).unwrap();
        assert_eq!(scanner.finish(), Err(ReferenceError::ParseIncomplete));

        assert!(scanner.step());
        assert!(!scanner.is_finished());
        assert_eq!(scanner.finish(), Err(ReferenceError::ParseIncomplete));

        scanner.scan_to_end();
        assert!(scanner.is_finished());
        assert!(scanner.finish().is_ok());
        // Stepping a finished scanner is a no-op.
        assert!(!scanner.step());
        assert_eq!(scanner.consumed(), 4);
    }

    #[test]
    fn test_non_ascii_digits_terminate() {
        let r = raw("$٢:٥");
        assert_eq!(r.sura, None);
        assert_eq!(r.consumed, 1);
    }

    #[test]
    fn test_span_accessors() {
        let single = VerseSpan::Single(4);
        assert_eq!((single.first(), single.last(), single.len()), (4, 4, 1));

        let range = VerseSpan::Range { first: 0, last: 7 };
        assert_eq!((range.first(), range.last(), range.len()), (0, 7, 8));
    }

    #[test]
    fn test_reference_display() {
        assert_eq!(VerseReference::new(63, VerseSpan::Single(6)).to_string(), "63:6");
        assert_eq!(
            VerseReference::new(2, VerseSpan::Range { first: 110, last: 120 }).to_string(),
            "2:110-120"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ReferenceError::ParseIncomplete.kind(), "parse_incomplete");
        assert_eq!(
            ReferenceError::InvalidRange { first: 5, last: 2 }.to_string(),
            "first verse 5 is greater than last verse 2"
        );
        assert_eq!(
            ReferenceError::InvalidNumeric {
                field: Field::LastVerse
            }
            .to_string(),
            "last verse is not a number"
        );
    }
}

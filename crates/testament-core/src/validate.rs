//! Bounds and legality checks that turn a [`RawReference`] into a
//! [`VerseReference`].

use crate::reference::{
    self, DEFAULT_SENTINEL, Field, RawLast, RawReference, ReferenceError, VerseReference,
    VerseSpan,
};
use crate::verse_counts::{self, CHAPTER_COUNT, GLOBAL_MAX_VERSE};

/// Which upper bound applies to verse numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerseBound {
    /// Each chapter's own verse count.
    #[default]
    PerChapter,
    /// 286 for every chapter.
    Global,
}

impl VerseBound {
    /// The highest legal verse number for `sura`, which must be in `1..=114`.
    fn max_for(self, sura: u16) -> u16 {
        match self {
            VerseBound::PerChapter => verse_counts::max_verse(sura).unwrap_or(0),
            VerseBound::Global => GLOBAL_MAX_VERSE,
        }
    }
}

/// Chapters whose verse 0 does not exist: the Opener (1) and chapter 9.
const NO_HEADER_CHAPTERS: [u16; 2] = [1, 9];

/// Validate a scanned reference.
///
/// Rules apply in order: numeric fields, chapter range, verse bounds,
/// range ordering, verse-zero legality.
pub fn validate(raw: &RawReference, bound: VerseBound) -> Result<VerseReference, ReferenceError> {
    let sura = raw.sura.ok_or(ReferenceError::InvalidNumeric { field: Field::Sura })?;
    let first = raw.first_verse.ok_or(ReferenceError::InvalidNumeric {
        field: Field::FirstVerse,
    })?;
    let last = match raw.last_verse {
        RawLast::Absent => None,
        RawLast::Number(n) => Some(n),
        RawLast::NotANumber => {
            return Err(ReferenceError::InvalidNumeric {
                field: Field::LastVerse,
            });
        }
    };

    let sura = u16::try_from(sura)
        .ok()
        .filter(|s| (1..=CHAPTER_COUNT).contains(s))
        .ok_or(ReferenceError::InvalidChapter { sura })?;

    let max = bound.max_for(sura);
    let check_bound = |verse: u32| {
        u16::try_from(verse)
            .ok()
            .filter(|v| *v <= max)
            .ok_or(ReferenceError::InvalidVerseBound { sura, verse, max })
    };
    let first = check_bound(first)?;
    let last = last.map(check_bound).transpose()?;

    let span = match last {
        None => VerseSpan::Single(first),
        Some(last) if first <= last => VerseSpan::Range { first, last },
        Some(last) => return Err(ReferenceError::InvalidRange { first, last }),
    };

    if first == 0 && NO_HEADER_CHAPTERS.contains(&sura) {
        return Err(ReferenceError::InvalidZeroVerse { sura });
    }

    Ok(VerseReference::new(sura, span))
}

/// The sentinel and bound used to read references, bundled so every caller
/// parses through the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceRules {
    pub sentinel: char,
    pub bound: VerseBound,
}

impl Default for ReferenceRules {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL,
            bound: VerseBound::PerChapter,
        }
    }
}

impl ReferenceRules {
    /// Scan and validate `input`.
    pub fn parse(&self, input: &str) -> Result<VerseReference, ReferenceError> {
        let raw = reference::scan(input, self.sentinel)?;
        validate(&raw, self.bound)
    }
}

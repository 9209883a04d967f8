//! Passage rendering: turns fetched verse records into display text.
//!
//! Each record renders as, in order: its subtitle, a chapter heading when the
//! verse opens the chapter, the verse line, and its footnote. Verse 0 is the
//! chapter preamble and renders without a `[sura:verse]` bracket.

use crate::reference::VerseReference;
use crate::store::VerseRecord;

/// The line that precedes the first verse of every chapter except 9.
pub const INVOCATION: &str = "In the name of GOD, Most Gracious, Most Merciful";

/// The marker shown instead of [`INVOCATION`] at the start of chapter 9.
pub const NO_INVOCATION: &str = "No Basmalah*";

/// Errors from rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("no verse records to render")]
    Empty,

    #[error("expected {expected} verse records, got {found}")]
    CountMismatch { expected: usize, found: usize },

    #[error("chapter {sura} has no verse 0")]
    ZeroVerse { sura: u16 },
}

/// How a chapter opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChapterStyle {
    /// Chapter 1: its first verse is the invocation itself.
    Opener,
    /// Chapter 9: opens without the invocation.
    WithoutInvocation,
    Standard,
}

impl ChapterStyle {
    fn of(sura: u16) -> Self {
        match sura {
            1 => ChapterStyle::Opener,
            9 => ChapterStyle::WithoutInvocation,
            _ => ChapterStyle::Standard,
        }
    }
}

/// What precedes (or replaces) the bracketed verse line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    /// Just the verse line.
    None,
    /// Chapter title, then the verse line.
    Title,
    /// Chapter title, an invocation line, then the verse line.
    TitleAndInvocation(&'static str),
    /// Chapter title, then the unbracketed preamble text.
    Preamble,
}

fn heading(sura: u16, verse: u16, first_verse: u16) -> Result<Heading, RenderError> {
    let heading = match (ChapterStyle::of(sura), verse) {
        (ChapterStyle::Opener, 0) => return Err(RenderError::ZeroVerse { sura }),
        (ChapterStyle::Opener, 1) => Heading::Title,
        (_, 0) => Heading::Preamble,
        // The title already went out with the preamble.
        (_, 1) if first_verse == 0 => Heading::None,
        (ChapterStyle::WithoutInvocation, 1) => Heading::TitleAndInvocation(NO_INVOCATION),
        (_, 1) => Heading::TitleAndInvocation(INVOCATION),
        _ => Heading::None,
    };
    Ok(heading)
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|s| !s.is_empty())
}

/// Render `records` for `reference`.
///
/// `records[i]` is taken to be verse `first_verse + i`, so the record count
/// must match the reference's span exactly.
pub fn render(reference: &VerseReference, records: &[VerseRecord]) -> Result<String, RenderError> {
    if records.is_empty() {
        return Err(RenderError::Empty);
    }
    let expected = reference.span().len();
    if records.len() != expected {
        return Err(RenderError::CountMismatch {
            expected,
            found: records.len(),
        });
    }

    let sura = reference.sura();
    let first_verse = reference.first_verse();
    let mut lines: Vec<String> = Vec::with_capacity(records.len() * 2);

    for (verse, record) in (first_verse..).zip(records) {
        if let Some(subtitle) = non_empty(&record.subtitle) {
            lines.push(subtitle.to_string());
        }

        let title = || format!("Chapter {sura}: {}", record.chapter_english_name);
        let verse_line = || format!("[{sura}:{verse}] {}", record.verse_text);

        match heading(sura, verse, first_verse)? {
            Heading::None => lines.push(verse_line()),
            Heading::Title => {
                lines.push(title());
                lines.push(verse_line());
            }
            Heading::TitleAndInvocation(invocation) => {
                lines.push(title());
                lines.push(invocation.to_string());
                lines.push(verse_line());
            }
            Heading::Preamble => {
                lines.push(title());
                lines.push(record.verse_text.clone());
            }
        }

        if let Some(footnote) = non_empty(&record.footnote) {
            lines.push(footnote.to_string());
        }
    }

    Ok(lines.join("\n"))
}

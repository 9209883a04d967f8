//! Uniformly random single-verse references.

use rand::Rng;

use crate::reference::{ReferenceError, VerseReference};
use crate::validate::ReferenceRules;
use crate::verse_counts::{self, CHAPTER_COUNT};

/// Draw a chapter uniformly from `1..=114`, then a verse uniformly from
/// `1..=max_verse(chapter)`.
///
/// The pair is rendered as reference text and read back through
/// [`ReferenceRules::parse`], so generated references obey the same rules as
/// typed ones. Verse 0 is never drawn.
pub fn random_reference<R: Rng + ?Sized>(
    rng: &mut R,
    rules: &ReferenceRules,
) -> Result<VerseReference, ReferenceError> {
    let sura = rng.gen_range(1..=CHAPTER_COUNT);
    let max = verse_counts::max_verse(sura).ok_or(ReferenceError::InvalidChapter {
        sura: u32::from(sura),
    })?;
    let verse = rng.gen_range(1..=max);

    rules.parse(&format!("{}{sura}:{verse}", rules.sentinel))
}

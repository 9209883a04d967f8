//! Static verse-count table for the 114 chapters of the corpus.
//!
//! Chapter 9 carries 127 verses: this corpus omits the two closing verses that
//! other editions append to it.

/// Number of chapters in the corpus.
pub const CHAPTER_COUNT: u16 = 114;

/// The largest verse number of any chapter (chapter 2).
pub const GLOBAL_MAX_VERSE: u16 = 286;

/// Total number of numbered verses across all chapters.
pub const TOTAL_VERSES: u32 = 6234;

/// Maximum verse number per chapter, indexed by `chapter - 1`.
static VERSE_COUNTS: [u16; CHAPTER_COUNT as usize] = [
    7, 286, 200, 176, 120, 165, 206, 75, 127, 109, // 1-10
    123, 111, 43, 52, 99, 128, 111, 110, 98, 135, // 11-20
    112, 78, 118, 64, 77, 227, 93, 88, 69, 60, // 21-30
    34, 30, 73, 54, 45, 83, 182, 88, 75, 85, // 31-40
    54, 53, 89, 59, 37, 35, 38, 29, 18, 45, // 41-50
    60, 49, 62, 55, 78, 96, 29, 22, 24, 13, // 51-60
    14, 11, 11, 18, 12, 12, 30, 52, 52, 44, // 61-70
    28, 28, 20, 56, 40, 31, 50, 40, 46, 42, // 71-80
    29, 19, 36, 25, 22, 17, 19, 26, 30, 20, // 81-90
    15, 21, 11, 8, 8, 19, 5, 8, 8, 11, // 91-100
    11, 8, 3, 9, 5, 4, 7, 3, 6, 3, // 101-110
    5, 4, 5, 6, // 111-114
];

/// Return the highest verse number of `chapter`, or `None` for a chapter
/// outside `1..=114`.
pub fn max_verse(chapter: u16) -> Option<u16> {
    if chapter == 0 {
        return None;
    }
    VERSE_COUNTS.get(usize::from(chapter) - 1).copied()
}

/// Iterate `(chapter, max_verse)` pairs in chapter order.
pub fn chapters() -> impl Iterator<Item = (u16, u16)> {
    (1..=CHAPTER_COUNT).zip(VERSE_COUNTS.iter().copied())
}

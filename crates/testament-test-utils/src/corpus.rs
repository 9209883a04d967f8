//! Verse corpus fixtures.
//!
//! [`sample_corpus`] holds a handful of hand-written chapters that cover every
//! rendering rule; [`synthetic_corpus`] holds a placeholder for every verse in
//! the corpus so random lookups always succeed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use testament_core::store::{Corpus, CorpusChapter, CorpusVerse, MemoryStore};
use testament_core::verse_counts;

/// Text of the sample 63:6.
pub const HYPOCRITES_6: &str = "It is the same for them; whether you pray for them, or do not \
pray for them, GOD will not forgive them.";

/// Footnote of the sample 63:6.
pub const HYPOCRITES_6_NOTE: &str = "*63:6 Forgiveness is not granted to the wicked.";

/// A small corpus covering chapters 1, 2, 9 and 63.
pub fn sample_corpus() -> Corpus {
    let opener = (1..=7).fold(CorpusChapter::new(1, "The Opener"), |chapter, n| {
        chapter.with_verse(CorpusVerse::new(n, format!("Opener verse {n}")))
    });

    let mut heifer = CorpusChapter::new(2, "The Heifer")
        .with_verse(CorpusVerse::new(0, "Preamble of the Heifer"))
        .with_verse(CorpusVerse::new(1, "A.L.M.").with_footnote("*2:1 Quranic initials."))
        .with_verse(
            CorpusVerse::new(2, "This scripture is infallible.").with_subtitle("The Believers"),
        );
    for n in 3..=5 {
        heifer = heifer.with_verse(CorpusVerse::new(n, format!("Heifer verse {n}")));
    }
    for n in 110..=120 {
        heifer = heifer.with_verse(CorpusVerse::new(n, format!("Heifer verse {n}")));
    }

    let ultimatum = CorpusChapter::new(9, "Ultimatum")
        .with_verse(
            CorpusVerse::new(1, "An ultimatum is herein issued.")
                .with_footnote("*9:1 The only chapter without the opening statement."),
        )
        .with_verse(CorpusVerse::new(2, "Roam the land for four months."))
        .with_verse(CorpusVerse::new(3, "A proclamation is herein issued."));

    let mut hypocrites = CorpusChapter::new(63, "The Hypocrites")
        .with_verse(CorpusVerse::new(0, "Preamble of the Hypocrites"));
    for n in 1..=11 {
        let verse = match n {
            6 => CorpusVerse::new(6, HYPOCRITES_6).with_footnote(HYPOCRITES_6_NOTE),
            _ => CorpusVerse::new(n, format!("Hypocrites verse {n}")),
        };
        hypocrites = hypocrites.with_verse(verse);
    }

    Corpus {
        chapters: vec![opener, heifer, ultimatum, hypocrites],
    }
}

/// A corpus with a placeholder for every verse of every chapter, plus a
/// preamble (verse 0) for every chapter except 1 and 9.
pub fn synthetic_corpus() -> Corpus {
    let chapters = verse_counts::chapters()
        .map(|(sura, max)| {
            let first = if sura == 1 || sura == 9 { 1 } else { 0 };
            (first..=max).fold(
                CorpusChapter::new(sura, format!("Chapter Name {sura}")),
                |chapter, n| chapter.with_verse(CorpusVerse::new(n, format!("text {sura}:{n}"))),
            )
        })
        .collect();
    Corpus { chapters }
}

/// [`sample_corpus`] as a store.
pub fn sample_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::from_corpus("sample", sample_corpus()).expect("sample corpus is valid"))
}

/// [`synthetic_corpus`] as a store.
pub fn synthetic_store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStore::from_corpus("synthetic", synthetic_corpus())
            .expect("synthetic corpus is valid"),
    )
}

/// Write [`sample_corpus`] as JSON to `corpus.json` inside `dir`.
pub async fn write_sample_corpus(dir: &Path) -> PathBuf {
    let path = dir.join("corpus.json");
    let json = serde_json::to_string_pretty(&sample_corpus()).expect("corpus serializes");
    tokio::fs::write(&path, json)
        .await
        .expect("failed to write corpus");
    path
}

//! Verse storage: the [`VerseStore`] trait and an in-memory implementation
//! loaded from a JSON corpus file.
//!
//! ## Corpus format
//!
//! ```json
//! { "chapters": [
//!     { "number": 1, "english_name": "The Opener",
//!       "verses": [ { "number": 1, "text": "...", "subtitle": null, "footnote": "*1:1 ..." } ] }
//! ] }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::BoxFuture;
use crate::lookup::LookupSpec;
use crate::verse_counts::{self, CHAPTER_COUNT};

/// One verse as returned by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    /// English name of the chapter the verse belongs to.
    pub chapter_english_name: String,
    /// Section heading that starts at this verse.
    pub subtitle: Option<String>,
    /// The verse text. For verse 0 this is the chapter preamble.
    pub verse_text: String,
    /// Footnote attached to this verse.
    pub footnote: Option<String>,
}

/// Errors from loading or querying a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse corpus JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid corpus: {0}")]
    Corpus(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only verse lookup service.
///
/// `fetch` returns every stored verse of `spec.chapter` whose number lies in
/// `spec.verse_low..=spec.verse_high`, ascending. An empty vector means no
/// such verses; a failed lookup is an `Err`.
pub trait VerseStore: Send + Sync {
    /// Store display name for logs.
    fn name(&self) -> &str;

    /// Fetch the verses described by `spec`.
    fn fetch(&self, spec: &LookupSpec) -> BoxFuture<'_, Result<Vec<VerseRecord>, StoreError>>;
}

/// A verse entry in the corpus file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusVerse {
    pub number: u16,
    pub text: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub footnote: Option<String>,
}

impl CorpusVerse {
    pub fn new(number: u16, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            subtitle: None,
            footnote: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_footnote(mut self, footnote: impl Into<String>) -> Self {
        self.footnote = Some(footnote.into());
        self
    }
}

/// A chapter entry in the corpus file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusChapter {
    pub number: u16,
    pub english_name: String,
    #[serde(default)]
    pub verses: Vec<CorpusVerse>,
}

impl CorpusChapter {
    pub fn new(number: u16, english_name: impl Into<String>) -> Self {
        Self {
            number,
            english_name: english_name.into(),
            verses: Vec::new(),
        }
    }

    pub fn with_verse(mut self, verse: CorpusVerse) -> Self {
        self.verses.push(verse);
        self
    }
}

/// The corpus file root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub chapters: Vec<CorpusChapter>,
}

#[derive(Debug, Clone)]
struct StoredVerse {
    subtitle: Option<String>,
    text: String,
    footnote: Option<String>,
}

/// An in-memory verse store keyed by `(chapter, verse)`.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    name: String,
    chapter_names: BTreeMap<u16, String>,
    verses: BTreeMap<(u16, u16), StoredVerse>,
    unavailable: Option<String>,
}

impl MemoryStore {
    /// Build a store from a parsed corpus, rejecting duplicate or
    /// out-of-range chapters and verses.
    pub fn from_corpus(name: impl Into<String>, corpus: Corpus) -> Result<Self, StoreError> {
        let mut chapter_names = BTreeMap::new();
        let mut verses = BTreeMap::new();

        for chapter in corpus.chapters {
            let max = verse_counts::max_verse(chapter.number).ok_or_else(|| {
                StoreError::Corpus(format!(
                    "chapter {} is outside 1-{CHAPTER_COUNT}",
                    chapter.number
                ))
            })?;
            if chapter_names
                .insert(chapter.number, chapter.english_name)
                .is_some()
            {
                return Err(StoreError::Corpus(format!(
                    "chapter {} is listed twice",
                    chapter.number
                )));
            }

            for verse in chapter.verses {
                if verse.number > max {
                    return Err(StoreError::Corpus(format!(
                        "verse {}:{} exceeds the chapter's {max} verses",
                        chapter.number, verse.number
                    )));
                }
                let stored = StoredVerse {
                    subtitle: verse.subtitle,
                    text: verse.text,
                    footnote: verse.footnote,
                };
                if verses.insert((chapter.number, verse.number), stored).is_some() {
                    return Err(StoreError::Corpus(format!(
                        "verse {}:{} is listed twice",
                        chapter.number, verse.number
                    )));
                }
            }
        }

        Ok(Self {
            name: name.into(),
            chapter_names,
            verses,
            unavailable: None,
        })
    }

    /// Parse a corpus from a JSON string.
    pub fn parse(name: impl Into<String>, json: &str) -> Result<Self, StoreError> {
        let corpus: Corpus = serde_json::from_str(json)?;
        Self::from_corpus(name, corpus)
    }

    /// Load a corpus JSON file using async I/O.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(path.display().to_string(), &content)
    }

    /// Make every subsequent fetch fail with [`StoreError::Unavailable`].
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.unavailable = Some(reason.into());
        self
    }

    /// Number of stored verses, including chapter headers.
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// Whether the store holds no verses.
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Number of chapters with a name entry.
    pub fn chapter_count(&self) -> usize {
        self.chapter_names.len()
    }

    fn lookup(&self, spec: &LookupSpec) -> Result<Vec<VerseRecord>, StoreError> {
        if let Some(reason) = &self.unavailable {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        if spec.verse_low > spec.verse_high {
            return Ok(Vec::new());
        }
        let Some(chapter_name) = self.chapter_names.get(&spec.chapter) else {
            return Ok(Vec::new());
        };

        let records = self
            .verses
            .range((spec.chapter, spec.verse_low)..=(spec.chapter, spec.verse_high))
            .map(|(_, verse)| VerseRecord {
                chapter_english_name: chapter_name.clone(),
                subtitle: verse.subtitle.clone(),
                verse_text: verse.text.clone(),
                footnote: verse.footnote.clone(),
            })
            .collect();
        Ok(records)
    }
}

impl VerseStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, spec: &LookupSpec) -> BoxFuture<'_, Result<Vec<VerseRecord>, StoreError>> {
        let spec = *spec;
        Box::pin(async move { self.lookup(&spec) })
    }
}

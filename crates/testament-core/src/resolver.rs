//! Reference resolution: raw text → validated reference → fetched verses →
//! rendered passage.
//!
//! The resolver performs no logging and reads no configuration; callers pass
//! it a store and explicit [`ReferenceRules`].

use std::sync::Arc;

use crate::lookup::LookupSpec;
use crate::random::random_reference;
use crate::reference::{ReferenceError, VerseReference};
use crate::render::{self, RenderError};
use crate::store::{StoreError, VerseStore};
use crate::validate::ReferenceRules;

/// Keyword that requests a random verse (`$random`).
pub const DEFAULT_RANDOM_KEYWORD: &str = "random";

/// A rendered passage and the reference it was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub reference: VerseReference,
    pub text: String,
}

/// Errors from resolving a reference.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("no verses found for {spec} (expected {expected}, found {found})")]
    LookupEmpty {
        spec: LookupSpec,
        expected: usize,
        found: usize,
    },

    #[error("verse lookup failed: {0}")]
    LookupFailure(#[from] StoreError),

    #[error("rendering failed: {0}")]
    Render(RenderError),
}

impl ResolveError {
    /// Short machine-readable name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::Reference(err) => err.kind(),
            ResolveError::LookupEmpty { .. } => "lookup_empty",
            ResolveError::LookupFailure(_) => "lookup_failure",
            ResolveError::Render(_) => "render",
        }
    }

    /// Whether the failure was caused by what the user typed.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ResolveError::Reference(err) if !matches!(err, ReferenceError::ParseIncomplete)
        )
    }
}

/// Resolves references against a [`VerseStore`].
pub struct Resolver {
    store: Arc<dyn VerseStore>,
    rules: ReferenceRules,
    random_keyword: String,
}

impl Resolver {
    /// Create a resolver with the default sentinel, per-chapter bounds, and
    /// the `random` keyword.
    pub fn new(store: Arc<dyn VerseStore>) -> Self {
        Self {
            store,
            rules: ReferenceRules::default(),
            random_keyword: DEFAULT_RANDOM_KEYWORD.to_string(),
        }
    }

    pub fn with_rules(mut self, rules: ReferenceRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_random_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.random_keyword = keyword.into();
        self
    }

    pub fn rules(&self) -> &ReferenceRules {
        &self.rules
    }

    /// The word that requests a random verse after the sentinel.
    pub fn random_keyword(&self) -> &str {
        &self.random_keyword
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Whether `raw` is the sentinel followed by the random keyword
    /// (case-insensitive), e.g. `$random`.
    pub fn is_random_request(&self, raw: &str) -> bool {
        let Some(rest) = raw.strip_prefix(self.rules.sentinel) else {
            return false;
        };
        let word_end = rest
            .find(|c: char| !c.is_alphanumeric())
            .unwrap_or(rest.len());
        rest[..word_end].eq_ignore_ascii_case(&self.random_keyword)
    }

    /// Resolve a raw reference such as `$2:110-120` or `$random`.
    pub async fn resolve(&self, raw: &str) -> Result<Passage, ResolveError> {
        if self.is_random_request(raw) {
            return self.resolve_random().await;
        }
        let reference = self.rules.parse(raw)?;
        self.resolve_reference(reference).await
    }

    /// Resolve a uniformly random verse.
    pub async fn resolve_random(&self) -> Result<Passage, ResolveError> {
        let reference = random_reference(&mut rand::thread_rng(), &self.rules)?;
        self.resolve_reference(reference).await
    }

    /// Fetch and render an already validated reference.
    pub async fn resolve_reference(
        &self,
        reference: VerseReference,
    ) -> Result<Passage, ResolveError> {
        let spec = LookupSpec::for_reference(&reference);
        let records = self.store.fetch(&spec).await?;

        let text = render::render(&reference, &records).map_err(|err| match err {
            RenderError::Empty | RenderError::CountMismatch { .. } => ResolveError::LookupEmpty {
                spec,
                expected: spec.expected_len(),
                found: records.len(),
            },
            other => ResolveError::Render(other),
        })?;

        Ok(Passage { reference, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Corpus, CorpusChapter, CorpusVerse, MemoryStore};
    use crate::validate::VerseBound;
    use pretty_assertions::assert_eq;

    fn store() -> Arc<dyn VerseStore> {
        let corpus = Corpus {
            chapters: vec![
                CorpusChapter::new(63, "The Hypocrites")
                    .with_verse(CorpusVerse::new(6, "It is the same for them.").with_footnote("*63:6 note")),
                CorpusChapter::new(2, "The Heifer")
                    .with_verse(CorpusVerse::new(0, "preamble"))
                    .with_verse(CorpusVerse::new(1, "A.L.M.")),
            ],
        };
        Arc::new(MemoryStore::from_corpus("unit", corpus).unwrap())
    }

    #[tokio::test]
    async fn test_resolve_single() {
        let resolver = Resolver::new(store());
        let passage = resolver.resolve("$63:6").await.unwrap();
        assert_eq!(passage.text, "[63:6] It is the same for them.\n*63:6 note");
        assert_eq!(passage.reference.to_string(), "63:6");
    }

    #[tokio::test]
    async fn test_resolve_header_range() {
        let resolver = Resolver::new(store());
        let passage = resolver.resolve("$2:0-1").await.unwrap();
        assert_eq!(passage.text, "Chapter 2: The Heifer\npreamble\n[2:1] A.L.M.");
    }

    #[tokio::test]
    async fn test_validation_error_is_returned() {
        let resolver = Resolver::new(store());
        let err = resolver.resolve("$1:0").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_zero_verse");
        assert!(err.is_user_error());
    }

    #[tokio::test]
    async fn test_missing_verses_are_lookup_empty() {
        let resolver = Resolver::new(store());
        let err = resolver.resolve("$63:7").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::LookupEmpty {
                expected: 1,
                found: 0,
                ..
            }
        ));
        assert!(!err.is_user_error());

        let err = resolver.resolve("$2:0-3").await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::LookupEmpty {
                expected: 4,
                found: 2,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_lookup_failure() {
        let failing = MemoryStore::from_corpus("down", Corpus::default())
            .unwrap()
            .unavailable("disk gone");
        let resolver = Resolver::new(Arc::new(failing));
        let err = resolver.resolve("$63:6").await.unwrap_err();
        assert_eq!(err.kind(), "lookup_failure");
    }

    #[test]
    fn test_random_keyword_detection() {
        let resolver = Resolver::new(store());
        assert!(resolver.is_random_request("$random"));
        assert!(resolver.is_random_request("$RANDOM please"));
        assert!(!resolver.is_random_request("$randomly"));
        assert!(!resolver.is_random_request("random"));
        assert!(!resolver.is_random_request("$2:1"));

        let custom = Resolver::new(store())
            .with_rules(ReferenceRules {
                sentinel: '#',
                bound: VerseBound::Global,
            })
            .with_random_keyword("any");
        assert!(custom.is_random_request("#any"));
        assert!(!custom.is_random_request("$random"));
        assert_eq!(custom.random_keyword(), "any");
        assert_eq!(custom.rules().bound, VerseBound::Global);
    }

    #[tokio::test]
    async fn test_global_bound_defers_to_store() {
        let resolver = Resolver::new(store()).with_rules(ReferenceRules {
            bound: VerseBound::Global,
            ..ReferenceRules::default()
        });
        // 63:200 passes the global cap and then finds nothing.
        let err = resolver.resolve("$63:200").await.unwrap_err();
        assert_eq!(err.kind(), "lookup_empty");
    }
}

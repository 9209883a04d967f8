//! Fetch descriptors handed to a [`VerseStore`](crate::store::VerseStore).

use std::fmt;

use crate::reference::VerseReference;

/// The chapter and inclusive verse range to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookupSpec {
    pub chapter: u16,
    pub verse_low: u16,
    pub verse_high: u16,
}

impl LookupSpec {
    /// Build the descriptor for a validated reference.
    pub fn for_reference(reference: &VerseReference) -> Self {
        Self {
            chapter: reference.sura(),
            verse_low: reference.first_verse(),
            verse_high: reference.last_verse().unwrap_or(reference.first_verse()),
        }
    }

    /// Whether the descriptor names exactly one verse.
    pub fn is_single(&self) -> bool {
        self.verse_low == self.verse_high
    }

    /// Number of verses a consistent store returns for this descriptor.
    pub fn expected_len(&self) -> usize {
        usize::from(self.verse_high.saturating_sub(self.verse_low)) + 1
    }

    /// Whether `verse` lies within the descriptor's range.
    pub fn contains(&self, verse: u16) -> bool {
        (self.verse_low..=self.verse_high).contains(&verse)
    }
}

impl From<&VerseReference> for LookupSpec {
    fn from(reference: &VerseReference) -> Self {
        Self::for_reference(reference)
    }
}

impl fmt::Display for LookupSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chapter, self.verse_low, self.verse_high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ReferenceRules;

    fn spec(input: &str) -> LookupSpec {
        LookupSpec::from(&ReferenceRules::default().parse(input).unwrap())
    }

    #[test]
    fn test_single_verse_descriptor() {
        let s = spec("$63:6");
        assert_eq!(
            s,
            LookupSpec {
                chapter: 63,
                verse_low: 6,
                verse_high: 6
            }
        );
        assert!(s.is_single());
        assert_eq!(s.expected_len(), 1);
    }

    #[test]
    fn test_range_descriptor() {
        let s = spec("$2:110-120");
        assert_eq!((s.chapter, s.verse_low, s.verse_high), (2, 110, 120));
        assert!(!s.is_single());
        assert_eq!(s.expected_len(), 11);
        assert!(s.contains(110) && s.contains(120));
        assert!(!s.contains(121));
        assert_eq!(s.to_string(), "2:110-120");
    }

    #[test]
    fn test_header_range_descriptor() {
        let s = spec("$2:0-1");
        assert_eq!((s.verse_low, s.verse_high), (0, 1));
        assert_eq!(s.expected_len(), 2);
    }
}

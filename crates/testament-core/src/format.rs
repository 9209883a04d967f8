//! Output formatting: length cap, ellipsis, and display envelope.

/// Default passage length cap, leaving room for the envelope under a
/// 2000-character chat message limit.
pub const DEFAULT_MAX_LENGTH: usize = 1900;

/// Truncates rendered passages and wraps them for the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormatter {
    max_length: usize,
    envelope: String,
    ellipsis: String,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH, "```", "...")
    }
}

impl OutputFormatter {
    pub fn new(max_length: usize, envelope: impl Into<String>, ellipsis: impl Into<String>) -> Self {
        Self {
            max_length,
            envelope: envelope.into(),
            ellipsis: ellipsis.into(),
        }
    }

    /// The passage length cap in characters.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Format `passage` for display.
    ///
    /// Passages longer than the cap are cut after `max_length` characters and
    /// end with the ellipsis. Returns `None` for an empty passage so the caller
    /// sends nothing.
    pub fn format(&self, passage: &str) -> Option<String> {
        if passage.is_empty() {
            return None;
        }

        let body = match passage.char_indices().nth(self.max_length) {
            Some((cut, _)) => format!("{}{}", &passage[..cut], self.ellipsis),
            None => passage.to_string(),
        };

        if self.envelope.is_empty() {
            Some(body)
        } else {
            Some(format!("{env}\n{body}\n{env}", env = self.envelope))
        }
    }
}

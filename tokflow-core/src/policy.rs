//! Holdback policy: decides from the tail of a decode whether text is safe to show

use crate::error::{Result, StreamError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default holdback constants
pub mod defaults {
    /// Marks after which models frequently keep writing the same clause
    pub const SOFT_PUNCTUATION: [char; 5] = [',', '!', ':', ';', '?'];

    /// Placeholder a lossy UTF-8 decode produces for an unfinished character
    pub const INCOMPLETE_MARKER: &str = "\u{FFFD}";

    /// Hard flush point
    pub const LINE_BREAK: char = '\n';
}

/// Classification of a decoded string by its trailing content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    /// Nothing was decoded
    Empty,
    /// Ends with the line-break character; the line is final
    LineBreak,
    /// Ends with soft punctuation; the clause may continue
    SoftPunctuation(char),
    /// Ends with the incomplete-character marker
    Incomplete,
    /// Anything else; safe to emit
    Settled,
}

/// Rules deciding when decoded text is stable enough to emit
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct HoldbackPolicy {
    /// Trailing characters that defer emission by at least one batch
    pub soft_punctuation: Vec<char>,
    /// Sentinel a decoder produces for an unfinished multi-byte character
    pub incomplete_marker: String,
    /// Character that completes a line and empties the token cache
    pub line_break: char,
    /// Force a flush once this many tokens are buffered (None = unbounded)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max_pending_tokens: Option<usize>,
}

impl Default for HoldbackPolicy {
    fn default() -> Self {
        Self {
            soft_punctuation: defaults::SOFT_PUNCTUATION.to_vec(),
            incomplete_marker: defaults::INCOMPLETE_MARKER.to_string(),
            line_break: defaults::LINE_BREAK,
            max_pending_tokens: None,
        }
    }
}

impl HoldbackPolicy {
    /// Replace the soft-punctuation set
    pub fn with_soft_punctuation(mut self, marks: impl IntoIterator<Item = char>) -> Self {
        self.soft_punctuation = marks.into_iter().collect();
        self
    }

    /// Replace the incomplete-character marker
    pub fn with_incomplete_marker(mut self, marker: impl Into<String>) -> Self {
        self.incomplete_marker = marker.into();
        self
    }

    /// Cap the number of buffered tokens before a forced flush
    pub fn with_max_pending_tokens(mut self, limit: Option<usize>) -> Self {
        self.max_pending_tokens = limit;
        self
    }

    /// Classify decoded text by its trailing content.
    ///
    /// Checked in order: line break, soft punctuation, incomplete marker.
    pub fn classify(&self, text: &str) -> Tail {
        let Some(last) = text.chars().next_back() else {
            return Tail::Empty;
        };

        if last == self.line_break {
            Tail::LineBreak
        } else if self.soft_punctuation.contains(&last) {
            Tail::SoftPunctuation(last)
        } else if text.ends_with(self.incomplete_marker.as_str()) {
            Tail::Incomplete
        } else {
            Tail::Settled
        }
    }

    /// Whether `pending` buffered tokens exceed the configured cap
    pub fn exceeds_cap(&self, pending: usize) -> bool {
        self.max_pending_tokens.is_some_and(|limit| pending >= limit)
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<()> {
        if self.incomplete_marker.is_empty() {
            return Err(StreamError::InvalidPolicy(
                "incomplete_marker must not be empty".into(),
            ));
        }

        if self.soft_punctuation.contains(&self.line_break) {
            return Err(StreamError::InvalidPolicy(format!(
                "line break {:?} cannot also be soft punctuation",
                self.line_break
            )));
        }

        if self.max_pending_tokens == Some(0) {
            return Err(StreamError::InvalidPolicy(
                "max_pending_tokens must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

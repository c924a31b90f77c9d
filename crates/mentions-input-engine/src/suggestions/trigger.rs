use regex::Regex;

use crate::text::char_len;

/// A trigger sequence found right before the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMatch {
    /// Text typed after the trigger.
    pub query: String,
    /// Plain-text start of the trigger sequence (trigger plus query).
    pub start: usize,
    /// Plain-text end of the trigger sequence.
    pub end: usize,
}

/// Recognises the start of a mention in the text before the caret.
///
/// Group 1 of the pattern is the sequence a selected suggestion replaces,
/// group 2 the query handed to the provider.
#[derive(Debug, Clone)]
pub struct Trigger {
    pattern: Regex,
}

impl Trigger {
    /// A literal trigger such as `@`. It must start the text or follow
    /// whitespace, and the query may not contain whitespace or the trigger.
    pub fn literal(trigger: &str) -> Result<Self, regex::Error> {
        let escaped = regex::escape(trigger);
        let pattern = Regex::new(&format!(r"(?:^|\s)({escaped}([^\s{escaped}]*))$"))?;
        Ok(Self { pattern })
    }

    /// A caller-supplied pattern following the same group convention.
    pub fn pattern(pattern: Regex) -> Self {
        Self { pattern }
    }

    pub fn as_regex(&self) -> &Regex {
        &self.pattern
    }

    pub fn find(&self, text_before_caret: &str) -> Option<QueryMatch> {
        let caps = self.pattern.captures(text_before_caret)?;
        let sequence = caps.get(1)?;
        let start = char_len(&text_before_caret[..sequence.start()]);
        Some(QueryMatch {
            query: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            start,
            end: start + char_len(sequence.as_str()),
        })
    }
}

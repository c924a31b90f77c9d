use serde::{Deserialize, Serialize};

use super::state::QueryTicket;

/// A candidate entity for a mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Suggestion {
    pub fn new(id: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display: Some(display.into()),
        }
    }

    /// The display text, or the id when there is none.
    pub fn display(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.id)
    }
}

/// Result of asking a provider for suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Ready(Vec<Suggestion>),
    /// Results arrive later through
    /// [`MentionSession::receive_suggestions`](crate::MentionSession::receive_suggestions)
    /// with the ticket passed to [`SuggestionProvider::fetch`].
    Pending,
}

pub trait SuggestionProvider: Send + Sync {
    fn fetch(&self, query: &str, ticket: &QueryTicket) -> Fetch;
}

/// A fixed list filtered by case-insensitive substring match.
#[derive(Debug, Clone, Default)]
pub struct StaticSuggestions {
    entries: Vec<Suggestion>,
}

impl StaticSuggestions {
    pub fn new(entries: Vec<Suggestion>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Suggestion] {
        &self.entries
    }

    pub fn matching(&self, query: &str) -> Vec<Suggestion> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|s| s.display().to_lowercase().contains(&query))
            .cloned()
            .collect()
    }
}

impl SuggestionProvider for StaticSuggestions {
    fn fetch(&self, query: &str, _ticket: &QueryTicket) -> Fetch {
        Fetch::Ready(self.matching(query))
    }
}

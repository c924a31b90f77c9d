//! Keeps a marked-up string (`Hi @[Alice](42)!`) and the plain text a user
//! edits (`Hi Alice!`) in sync.
//!
//! All offsets are counted in chars.

pub mod engine;
pub mod markup;
pub mod session;
pub mod suggestions;
pub mod sync;
pub mod text;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use engine::{Change, MentionsEngine, Selection};
pub use markup::{
    DEFAULT_MARKUP, DisplayTransform, Grammar, GrammarRegistry, MarkupError, PatternAnchor,
    build_mention_markup,
};
pub use session::{KeyOutcome, MentionSession, MentionSource, SuggestionKey};
pub use suggestions::{
    Fetch, QueryContext, QueryId, QueryTicket, StaticSuggestions, Suggestion, SuggestionList,
    SuggestionProvider, Trigger,
};
pub use sync::{Correction, EditSelection, Mention};

//! # Suggestions
//!
//! Finding the query a user is typing and tracking the suggestions offered
//! for it.
//!
//! - **`trigger`**: recognises `@query` style sequences before the caret
//! - **`provider`**: where suggestions come from, synchronously or later
//! - **`state`**: query ids, stale-result detection and the focused list

pub mod provider;
pub mod state;
pub mod trigger;

pub use provider::{Fetch, StaticSuggestions, Suggestion, SuggestionProvider};
pub use state::{QueryContext, QueryId, QueryTicket, QueryTracker, SuggestionGroup, SuggestionList};
pub use trigger::{QueryMatch, Trigger};

//! # Markup
//!
//! Everything that knows about the shape of a markup template.
//!
//! A template such as `@[__display__](__id__)` is literal text with up to three
//! placeholders (`__id__`, `__display__`, `__type__`). It compiles to a regex
//! where each placeholder becomes a lazy capture group, plus a
//! [`GroupPositions`] record telling which group holds which field.
//!
//! ## Modules
//!
//! - **`placeholders`**: the placeholder tokens; nothing else hardcodes them
//! - **`grammar`**: template compilation, group ranking, mention building
//! - **`registry`**: get-or-compute caches of compiled templates
//! - **`scanner`**: the single traversal over a marked-up value, yielding
//!   text runs and mentions with offsets in both spaces

pub mod grammar;
pub mod placeholders;
pub mod registry;
pub mod scanner;

pub use grammar::{
    Grammar, GroupPositions, MentionFields, PatternAnchor, build_mention_markup, compile_pattern,
    group_positions,
};
pub use placeholders::Placeholder;
pub use registry::GrammarRegistry;
pub use scanner::{MentionOccurrence, Scanner, Segment, TextRun, scan};

/// Template used when the caller does not configure one.
pub const DEFAULT_MARKUP: &str = "@[__display__](__id__)";

#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    #[error("Markup '{template}' has to contain at least one of placeholders __id__ or __display__")]
    MissingPlaceholders { template: String },
    #[error("Invalid markup pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Customises the text a mention renders as in the plain-text view.
///
/// Applied wherever display text is produced; the stored markup keeps the
/// display value as written.
pub trait DisplayTransform: Send + Sync {
    fn transform(&self, id: &str, display: &str, kind: Option<&str>) -> String;
}

impl<F> DisplayTransform for F
where
    F: Fn(&str, &str, Option<&str>) -> String + Send + Sync,
{
    fn transform(&self, id: &str, display: &str, kind: Option<&str>) -> String {
        self(id, display, kind)
    }
}

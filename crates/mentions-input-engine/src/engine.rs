use std::fmt;
use std::sync::Arc;

use crate::markup::{
    DisplayTransform, Grammar, GrammarRegistry, MarkupError, Scanner, scan,
};
use crate::sync::{
    Correction, EditSelection, Mention, find_enclosing_mention_start, is_inside_mention,
    map_plain_text_index, mentions, offsets::locate, plain_text, reconcile,
};
use crate::text::char_len;

/// A selection (or caret, when collapsed) in plain-text chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Builds a selection, swapping the bounds if they are reversed.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    fn clamp(self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }
}

/// Everything a host needs to re-render after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// The new marked-up value.
    pub value: String,
    /// The new plain text, which differs from what the field holds when a
    /// mention was removed as a unit.
    pub plain_text: String,
    pub mentions: Vec<Mention>,
    /// Where the host should put the selection.
    pub selection: Selection,
    /// True when `selection` differs from what the field reported and the
    /// host must restore it explicitly.
    pub selection_adjusted: bool,
}

/// A grammar bound to a display transform and a mention editing policy.
///
/// Cheap to clone; all operations are pure functions of their arguments.
#[derive(Clone)]
pub struct MentionsEngine {
    grammar: Grammar,
    transform: Option<Arc<dyn DisplayTransform>>,
    treat_mention_as_unit: bool,
}

impl fmt::Debug for MentionsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MentionsEngine")
            .field("template", &self.grammar.template())
            .field("has_transform", &self.transform.is_some())
            .field("treat_mention_as_unit", &self.treat_mention_as_unit)
            .finish()
    }
}

impl MentionsEngine {
    /// Mentions are treated as units by default.
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            transform: None,
            treat_mention_as_unit: true,
        }
    }

    /// Builds an engine for `template` using the registry's caches.
    pub fn from_template(registry: &GrammarRegistry, template: &str) -> Result<Self, MarkupError> {
        Ok(Self::new(registry.grammar(template)?))
    }

    pub fn with_display_transform(mut self, transform: impl DisplayTransform + 'static) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn with_mention_as_unit(mut self, treat_mention_as_unit: bool) -> Self {
        self.treat_mention_as_unit = treat_mention_as_unit;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn treats_mention_as_unit(&self) -> bool {
        self.treat_mention_as_unit
    }

    fn transform(&self) -> Option<&dyn DisplayTransform> {
        self.transform.as_deref()
    }

    pub fn scan<'a>(&'a self, value: &'a str) -> Scanner<'a> {
        scan(value, &self.grammar, self.transform())
    }

    pub fn plain_text(&self, value: &str) -> String {
        plain_text(value, &self.grammar, self.transform())
    }

    pub fn mentions(&self, value: &str) -> Vec<Mention> {
        mentions(value, &self.grammar, self.transform())
    }

    pub fn map_plain_text_index(&self, value: &str, index: usize, correction: Correction) -> Option<usize> {
        map_plain_text_index(value, &self.grammar, index, correction, self.transform())
    }

    pub fn find_enclosing_mention_start(&self, value: &str, index: usize) -> Option<usize> {
        find_enclosing_mention_start(value, &self.grammar, index, self.transform())
    }

    pub fn is_inside_mention(&self, value: &str, index: usize) -> bool {
        is_inside_mention(value, &self.grammar, index, self.transform())
    }

    /// Markup offset for a plain-text offset, moved to the mention start when
    /// it falls inside one.
    pub(crate) fn markup_offset(&self, value: &str, index: usize) -> usize {
        locate(value, &self.grammar, index, self.transform()).start_side()
    }

    /// The text a mention renders as in the plain-text view.
    pub fn display(&self, id: &str, display: &str, kind: Option<&str>) -> String {
        match self.transform() {
            Some(t) => t.transform(id, display, kind),
            None => display.to_string(),
        }
    }

    pub fn build_mention(&self, id: &str, display: &str, kind: &str) -> String {
        self.grammar.build_mention(id, display, kind)
    }

    pub fn reconcile(&self, old_value: &str, new_plain_text: &str, selection: EditSelection) -> String {
        reconcile(
            old_value,
            &self.grammar,
            new_plain_text,
            selection,
            self.transform(),
            self.treat_mention_as_unit,
        )
    }

    /// Applies a field edit and works out where the caret belongs.
    ///
    /// `before` is the selection the host last recorded (if any), `after` the
    /// one the field reports now. When a mention was removed as a unit because
    /// the edit touched its tail, the caret moves back to where the mention
    /// started.
    pub fn apply_change(
        &self,
        old_value: &str,
        new_plain_text: &str,
        before: Option<Selection>,
        after: Selection,
    ) -> Change {
        let selection = EditSelection {
            start_before: before.map(|s| s.start),
            end_before: before.map(|s| s.end),
            end_after: after.end,
        };
        let value = self.reconcile(old_value, new_plain_text, selection);
        let plain_text = self.plain_text(&value);

        let mut selection = after;
        let mut selection_adjusted = false;
        if self.treat_mention_as_unit
            && let Some(start) = self.find_enclosing_mention_start(old_value, after.start)
            && before.is_some_and(|b| b.end > start)
        {
            selection = Selection::caret(start);
            selection_adjusted = true;
        }

        Change {
            mentions: self.mentions(&value),
            selection: selection.clamp(char_len(&plain_text)),
            plain_text,
            value,
            selection_adjusted,
        }
    }
}

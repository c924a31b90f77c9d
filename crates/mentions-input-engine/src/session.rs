//! A mention-aware text field, minus the rendering.
//!
//! [`MentionSession`] owns the marked-up value and the selection and reacts to
//! the events an editable field produces. Hosts forward field events and
//! render what comes back.

use std::fmt;
use std::sync::Arc;

use crate::engine::{Change, MentionsEngine, Selection};
use crate::suggestions::{
    Fetch, QueryContext, QueryTicket, QueryTracker, Suggestion, SuggestionGroup, SuggestionList,
    SuggestionProvider, Trigger,
};
use crate::sync::Mention;
use crate::text::{char_len, slice, splice};

/// One kind of mention the field supports.
#[derive(Clone)]
pub struct MentionSource {
    pub kind: String,
    pub trigger: Trigger,
    pub provider: Arc<dyn SuggestionProvider>,
    pub append_space_on_add: bool,
}

impl MentionSource {
    pub fn new(kind: impl Into<String>, trigger: Trigger, provider: Arc<dyn SuggestionProvider>) -> Self {
        Self {
            kind: kind.into(),
            trigger,
            provider,
            append_space_on_add: false,
        }
    }

    pub fn with_space_on_add(mut self, append_space_on_add: bool) -> Self {
        self.append_space_on_add = append_space_on_add;
        self
    }
}

impl fmt::Debug for MentionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MentionSource")
            .field("kind", &self.kind)
            .field("trigger", &self.trigger.as_regex().as_str())
            .field("append_space_on_add", &self.append_space_on_add)
            .finish_non_exhaustive()
    }
}

/// Keys that drive the suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKey {
    Escape,
    Up,
    Down,
    Enter,
    Tab,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No suggestions were shown; the host should handle the key itself.
    Ignored,
    Handled,
    /// A suggestion was inserted.
    Changed(Change),
}

#[derive(Debug)]
pub struct MentionSession {
    engine: MentionsEngine,
    sources: Vec<MentionSource>,
    value: String,
    selection: Option<Selection>,
    tracker: QueryTracker,
    suggestions: SuggestionList,
}

impl MentionSession {
    pub fn new(engine: MentionsEngine, sources: Vec<MentionSource>) -> Self {
        Self {
            engine,
            sources,
            value: String::new(),
            selection: None,
            tracker: QueryTracker::new(),
            suggestions: SuggestionList::default(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Replaces the value from outside, as a controlled field would.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.clear_suggestions();
    }

    pub fn engine(&self) -> &MentionsEngine {
        &self.engine
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn plain_text(&self) -> String {
        self.engine.plain_text(&self.value)
    }

    pub fn mentions(&self) -> Vec<Mention> {
        self.engine.mentions(&self.value)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    /// True when the suggestion list should be drawn.
    pub fn suggestions_visible(&self) -> bool {
        self.selection.is_some() && !self.suggestions.is_empty()
    }

    /// The field's text changed to `new_plain_text` with the selection now at
    /// `selection`.
    pub fn handle_change(&mut self, new_plain_text: &str, selection: Selection) -> Change {
        let change = self
            .engine
            .apply_change(&self.value, new_plain_text, self.selection, selection);
        self.value.clone_from(&change.value);
        self.handle_select(change.selection);
        change
    }

    /// The selection moved. A collapsed caret looks for a trigger sequence
    /// before it; a range hides the suggestions.
    pub fn handle_select(&mut self, selection: Selection) {
        self.selection = Some(selection);
        if selection.is_collapsed() {
            self.update_queries(selection.end);
        } else {
            self.clear_suggestions();
        }
    }

    /// The field lost focus.
    pub fn handle_blur(&mut self) {
        self.selection = None;
    }

    pub fn handle_key(&mut self, key: SuggestionKey) -> KeyOutcome {
        if !self.suggestions_visible() {
            return KeyOutcome::Ignored;
        }
        match key {
            SuggestionKey::Escape => self.clear_suggestions(),
            SuggestionKey::Down => self.suggestions.shift_focus(1),
            SuggestionKey::Up => self.suggestions.shift_focus(-1),
            SuggestionKey::Enter | SuggestionKey::Tab => {
                if let Some((suggestion, context)) = self.suggestions.focused() {
                    let (suggestion, context) = (suggestion.clone(), context.clone());
                    return KeyOutcome::Changed(self.add_mention(&suggestion, &context));
                }
            }
        }
        KeyOutcome::Handled
    }

    /// Delivers results for a query answered with [`Fetch::Pending`].
    ///
    /// Returns false when the results belong to an outdated query and were
    /// dropped.
    pub fn receive_suggestions(&mut self, ticket: QueryTicket, results: Vec<Suggestion>) -> bool {
        if !self.tracker.is_current(ticket.id) {
            log::debug!(
                "dropping {} stale suggestions for {:?} query {:?}",
                results.len(),
                ticket.context.kind,
                ticket.context.query
            );
            return false;
        }
        self.suggestions.update(SuggestionGroup {
            context: ticket.context,
            results,
        });
        true
    }

    /// Replaces the query sequence with a mention of `suggestion` and puts
    /// the caret after it.
    pub fn add_mention(&mut self, suggestion: &Suggestion, context: &QueryContext) -> Change {
        let engine = &self.engine;
        let start = engine.markup_offset(&self.value, context.start);
        let end = start + context.end.saturating_sub(context.start);

        let display = suggestion.display();
        let kind = engine.grammar().groups().kind.map(|_| context.kind.as_str());
        let mut markup = engine.build_mention(&suggestion.id, display, &context.kind);
        let mut rendered = engine.display(&suggestion.id, display, kind);
        if context.append_space_on_add {
            markup.push(' ');
            rendered.push(' ');
        }

        self.value = splice(&self.value, start, end, &markup);
        let caret = Selection::caret(context.start + char_len(&rendered));
        self.selection = Some(caret);
        self.clear_suggestions();

        Change {
            plain_text: self.plain_text(),
            mentions: self.mentions(),
            value: self.value.clone(),
            selection: caret,
            selection_adjusted: true,
        }
    }

    fn clear_suggestions(&mut self) {
        self.tracker.invalidate();
        self.suggestions.clear();
    }

    fn update_queries(&mut self, caret: usize) {
        self.clear_suggestions();
        if self.engine.is_inside_mention(&self.value, caret) {
            return;
        }

        let plain_text = self.plain_text();
        let before_caret = slice(&plain_text, 0, caret);
        let id = self.tracker.current();

        let mut ready = Vec::new();
        for source in &self.sources {
            let Some(found) = source.trigger.find(before_caret) else {
                continue;
            };
            let ticket = QueryTicket {
                id,
                context: QueryContext {
                    kind: source.kind.clone(),
                    query: found.query,
                    start: found.start,
                    end: found.end,
                    append_space_on_add: source.append_space_on_add,
                },
            };
            match source.provider.fetch(&ticket.context.query, &ticket) {
                Fetch::Ready(results) => ready.push((ticket, results)),
                Fetch::Pending => log::trace!("{} query {:?} pending", source.kind, ticket.context.query),
            }
        }

        for (ticket, results) in ready {
            self.receive_suggestions(ticket, results);
        }
    }
}

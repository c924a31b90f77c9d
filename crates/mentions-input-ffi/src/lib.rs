//! UniFFI bindings for mentions-input native hosts
//!
//! Lets an Android or iOS text field keep its marked-up value in sync with
//! what the user edits. Offsets cross the boundary as `u32` char counts.
//! Display transforms are not exposed here, so the plain text always shows
//! the stored display values.

use mentions_input_engine::{
    Change, Correction, GrammarRegistry, Mention, MentionsEngine, Selection,
};
use std::sync::{Mutex, OnceLock};

uniffi::setup_scaffolding!();

/// Compiled templates shared by every handle in the process.
fn registry() -> &'static GrammarRegistry {
    static REGISTRY: OnceLock<GrammarRegistry> = OnceLock::new();
    REGISTRY.get_or_init(GrammarRegistry::new)
}

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Invalid markup: {reason}")]
    InvalidMarkup { reason: String },
}

// ============ Mentions Handle ============

struct FieldState {
    value: String,
    selection: Option<Selection>,
}

/// The marked-up value behind one text field.
///
/// Hosts report selection changes with `set_selection` and edits with
/// `apply_change`, then render the returned plain text and selection.
#[derive(uniffi::Object)]
pub struct MentionsHandle {
    engine: MentionsEngine,
    inner: Mutex<FieldState>,
}

impl MentionsHandle {
    fn state(&self) -> std::sync::MutexGuard<'_, FieldState> {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[uniffi::export]
impl MentionsHandle {
    /// Create a handle for a markup template such as `@[__display__](__id__)`.
    #[uniffi::constructor]
    pub fn new(markup: String, treat_mention_as_unit: bool) -> Result<Self, FfiError> {
        let engine = MentionsEngine::from_template(registry(), &markup)
            .map_err(|e| FfiError::InvalidMarkup {
                reason: e.to_string(),
            })?
            .with_mention_as_unit(treat_mention_as_unit);

        Ok(Self {
            engine,
            inner: Mutex::new(FieldState {
                value: String::new(),
                selection: None,
            }),
        })
    }

    /// Replace the marked-up value, e.g. when loading a saved draft.
    pub fn set_value(&self, value: String) {
        self.state().value = value;
    }

    pub fn get_value(&self) -> String {
        self.state().value.clone()
    }

    pub fn plain_text(&self) -> String {
        self.engine.plain_text(&self.state().value)
    }

    pub fn mentions(&self) -> Vec<MentionDto> {
        self.engine
            .mentions(&self.state().value)
            .into_iter()
            .map(MentionDto::from_engine)
            .collect()
    }

    /// Record the field's selection; the next `apply_change` uses it as the
    /// selection before the edit.
    pub fn set_selection(&self, start: u32, end: u32) {
        self.state().selection = Some(Selection::new(start as usize, end as usize));
    }

    /// Forget the selection, e.g. when the field loses focus.
    pub fn clear_selection(&self) {
        self.state().selection = None;
    }

    pub fn map_plain_text_index(&self, index: u32, correction: CorrectionDto) -> Option<u32> {
        self.engine
            .map_plain_text_index(&self.state().value, index as usize, correction.into())
            .map(to_u32)
    }

    pub fn find_enclosing_mention_start(&self, index: u32) -> Option<u32> {
        self.engine
            .find_enclosing_mention_start(&self.state().value, index as usize)
            .map(to_u32)
    }

    /// Apply an edit the user made in the field.
    pub fn apply_change(
        &self,
        new_plain_text: String,
        selection_start: u32,
        selection_end: u32,
    ) -> ChangeDto {
        let mut state = self.state();
        let after = Selection::new(selection_start as usize, selection_end as usize);
        let change = self
            .engine
            .apply_change(&state.value, &new_plain_text, state.selection, after);
        state.value.clone_from(&change.value);
        state.selection = Some(change.selection);
        ChangeDto::from_engine(change)
    }

    /// Build the markup for one mention with this handle's template.
    pub fn build_mention(&self, id: String, display: String, kind: String) -> String {
        self.engine.build_mention(&id, &display, &kind)
    }
}

// ============ DTOs ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum CorrectionDto {
    Start,
    End,
    Null,
}

impl From<CorrectionDto> for Correction {
    fn from(correction: CorrectionDto) -> Self {
        match correction {
            CorrectionDto::Start => Correction::Start,
            CorrectionDto::End => Correction::End,
            CorrectionDto::Null => Correction::Null,
        }
    }
}

/// A mention found in the value.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct MentionDto {
    pub id: String,
    pub display: String,
    /// Empty when the template has no `__type__` placeholder
    pub kind: String,
    pub markup_offset: u32,
    pub plain_text_offset: u32,
}

impl MentionDto {
    fn from_engine(mention: Mention) -> Self {
        Self {
            id: mention.id,
            display: mention.display,
            kind: mention.kind.unwrap_or_default(),
            markup_offset: to_u32(mention.markup_offset),
            plain_text_offset: to_u32(mention.plain_text_offset),
        }
    }
}

/// Result of an edit, ready for the host to render.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ChangeDto {
    pub value: String,
    pub plain_text: String,
    pub mentions: Vec<MentionDto>,
    pub selection_start: u32,
    pub selection_end: u32,
    /// True when the host must move the field's selection explicitly
    pub selection_adjusted: bool,
}

impl ChangeDto {
    fn from_engine(change: Change) -> Self {
        Self {
            value: change.value,
            plain_text: change.plain_text,
            mentions: change
                .mentions
                .into_iter()
                .map(MentionDto::from_engine)
                .collect(),
            selection_start: to_u32(change.selection.start),
            selection_end: to_u32(change.selection.end),
            selection_adjusted: change.selection_adjusted,
        }
    }
}

fn to_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

// ============ Standalone Functions ============

/// Fill the placeholders of a markup template with literal values.
#[uniffi::export]
pub fn build_mention_markup(markup: String, id: String, display: String, kind: String) -> String {
    mentions_input_engine::build_mention_markup(&markup, &id, &display, &kind)
}

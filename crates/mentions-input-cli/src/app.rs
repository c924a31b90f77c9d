use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mentions_input_config::Config;
use mentions_input_engine::{
    GrammarRegistry, KeyOutcome, MentionSession, MentionSource, MentionsEngine, Selection,
    StaticSuggestions, Suggestion, SuggestionKey, Trigger, text::char_len,
};

use crate::field::{self, FieldEdit};

pub struct App {
    pub session: MentionSession,
    pub status: String,
}

impl App {
    pub fn from_config(
        registry: &GrammarRegistry,
        config: &Config,
        initial_markup: &str,
    ) -> Result<Self> {
        let engine = MentionsEngine::from_template(registry, &config.markup)?
            .with_mention_as_unit(config.treat_mention_as_unit);

        let mut sources = Vec::with_capacity(config.mentions.len());
        for source in &config.mentions {
            let entries = source
                .entries()?
                .into_iter()
                .map(|entry| Suggestion {
                    id: entry.id,
                    display: entry.display,
                })
                .collect();
            sources.push(
                MentionSource::new(
                    source.kind.clone(),
                    Trigger::literal(&source.trigger)?,
                    Arc::new(StaticSuggestions::new(entries)),
                )
                .with_space_on_add(source.append_space_on_add),
            );
        }
        log::info!(
            "markup {:?} with {} mention source(s)",
            config.markup,
            sources.len()
        );

        let mut session = MentionSession::new(engine, sources).with_value(initial_markup);
        let end = char_len(&session.plain_text());
        session.handle_select(Selection::caret(end));

        Ok(Self {
            session,
            status: String::new(),
        })
    }

    pub fn caret(&self) -> usize {
        self.session.selection().map_or(0, |s| s.end)
    }

    /// Handles one key press. Returns false when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }

        if let Some(suggestion_key) = suggestion_key(key.code) {
            match self.session.handle_key(suggestion_key) {
                KeyOutcome::Ignored => {}
                KeyOutcome::Handled => return true,
                KeyOutcome::Changed(change) => {
                    self.status = format!("{} mention(s)", change.mentions.len());
                    return true;
                }
            }
        }

        let plain = self.session.plain_text();
        let caret = self.caret();
        match key.code {
            KeyCode::Char(c) => self.apply(field::insert(&plain, caret, c.encode_utf8(&mut [0; 4]))),
            KeyCode::Backspace => {
                if let Some(edit) = field::backspace(&plain, caret) {
                    self.apply(edit);
                }
            }
            KeyCode::Delete => {
                if let Some(edit) = field::delete(&plain, caret) {
                    self.apply(edit);
                }
            }
            KeyCode::Left => self.move_caret(caret.saturating_sub(1)),
            KeyCode::Right => self.move_caret((caret + 1).min(char_len(&plain))),
            KeyCode::Home => self.move_caret(0),
            KeyCode::End => self.move_caret(char_len(&plain)),
            _ => {}
        }
        true
    }

    fn apply(&mut self, edit: FieldEdit) {
        let change = self
            .session
            .handle_change(&edit.text, Selection::caret(edit.caret));
        self.status = if change.selection_adjusted {
            "mention removed".to_string()
        } else {
            format!("{} mention(s)", change.mentions.len())
        };
    }

    fn move_caret(&mut self, caret: usize) {
        self.session.handle_select(Selection::caret(caret));
    }
}

fn suggestion_key(code: KeyCode) -> Option<SuggestionKey> {
    match code {
        KeyCode::Esc => Some(SuggestionKey::Escape),
        KeyCode::Up => Some(SuggestionKey::Up),
        KeyCode::Down => Some(SuggestionKey::Down),
        KeyCode::Enter => Some(SuggestionKey::Enter),
        KeyCode::Tab => Some(SuggestionKey::Tab),
        _ => None,
    }
}

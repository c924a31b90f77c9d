use std::sync::Arc;

use mentions_input_engine::{
    DEFAULT_MARKUP, GrammarRegistry, KeyOutcome, MentionSession, MentionSource, MentionsEngine,
    Selection, StaticSuggestions, Suggestion, SuggestionKey, Trigger,
};
use pretty_assertions::assert_eq;

fn session() -> MentionSession {
    let engine = MentionsEngine::from_template(&GrammarRegistry::new(), DEFAULT_MARKUP)
        .unwrap()
        .with_display_transform(|_: &str, display: &str, _: Option<&str>| format!("@{display}"));
    let people = StaticSuggestions::new(vec![
        Suggestion::new("walter", "Walter White"),
        Suggestion::new("jesse", "Jesse Pinkman"),
    ]);
    MentionSession::new(
        engine,
        vec![
            MentionSource::new("user", Trigger::literal("@").unwrap(), Arc::new(people))
                .with_space_on_add(true),
        ],
    )
}

/// Types `text` at the caret the way a field reports it: new text plus caret.
fn type_at_caret(session: &mut MentionSession, text: &str) {
    for c in text.chars() {
        let plain = session.plain_text();
        let caret = session.selection().map_or(0, |s| s.end);
        let mut chars: Vec<char> = plain.chars().collect();
        chars.insert(caret, c);
        let new_plain: String = chars.into_iter().collect();
        session.handle_change(&new_plain, Selection::caret(caret + 1));
    }
}

fn backspace(session: &mut MentionSession) {
    let plain = session.plain_text();
    let caret = session.selection().map_or(0, |s| s.end);
    let mut chars: Vec<char> = plain.chars().collect();
    chars.remove(caret - 1);
    let new_plain: String = chars.into_iter().collect();
    session.handle_change(&new_plain, Selection::caret(caret - 1));
}

#[test]
fn mention_a_user_then_keep_typing() {
    let mut session = session();
    session.handle_select(Selection::caret(0));

    type_at_caret(&mut session, "cc @pink");
    assert_eq!(session.suggestions().len(), 1);

    let KeyOutcome::Changed(change) = session.handle_key(SuggestionKey::Enter) else {
        panic!("expected the suggestion to be inserted");
    };
    assert_eq!(change.value, "cc @[Jesse Pinkman](jesse) ");
    assert_eq!(change.plain_text, "cc @Jesse Pinkman ");
    assert_eq!(change.selection, Selection::caret(18));

    type_at_caret(&mut session, "thanks");
    assert_eq!(session.value(), "cc @[Jesse Pinkman](jesse) thanks");

    let mentions = session.mentions();
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].display, "Jesse Pinkman");
    assert_eq!(mentions[0].plain_text_offset, 3);
}

#[test]
fn backspacing_into_a_mention_removes_it() {
    let mut session = session().with_value("hi @[Walter White](walter)");
    session.handle_select(Selection::caret(16));

    backspace(&mut session);

    assert_eq!(session.value(), "hi ");
    assert_eq!(session.selection(), Some(Selection::caret(3)));
    assert!(session.mentions().is_empty());
}

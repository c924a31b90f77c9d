//! Cross-module properties checked over a handful of representative values.

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::text::{char_len, slice};
use crate::{
    Correction, DEFAULT_MARKUP, EditSelection, GrammarRegistry, MentionsEngine, build_mention_markup,
};

fn engine() -> MentionsEngine {
    MentionsEngine::from_template(&GrammarRegistry::new(), DEFAULT_MARKUP).unwrap()
}

fn transformed() -> MentionsEngine {
    engine().with_display_transform(|_: &str, display: &str, _: Option<&str>| format!("<{display}>"))
}

#[rstest]
#[case::plain("no mentions at all")]
#[case::single("Hello @[John](1), how are you?")]
#[case::adjacent("@[Al](1)@[Bo](2)")]
#[case::edges("@[Al](1) middle @[Bo](2)")]
#[case::unicode("Grüße an @[Zoë](z) und @[日本](jp)!")]
#[case::empty("")]
fn mention_offsets_point_at_their_display_text(
    #[case] value: &str,
    #[values(engine(), transformed())] subject: MentionsEngine,
) {
    let engine = subject;
    let plain = engine.plain_text(value);
    for mention in engine.mentions(value) {
        let rendered = engine.display(&mention.id, &mention.display, None);
        let start = mention.plain_text_offset;
        assert_eq!(slice(&plain, start, start + char_len(&rendered)), rendered);
        assert!(slice(value, mention.markup_offset, char_len(value)).starts_with("@["));
    }
}

#[rstest]
#[case("Hello @[John](1), how are you?")]
#[case("Grüße an @[Zoë](z) und @[日本](jp)!")]
fn projecting_twice_changes_nothing(#[case] value: &str) {
    let engine = engine();
    let once = engine.plain_text(value);
    assert_eq!(engine.plain_text(&once), once);
}

#[rstest]
#[case("Hello @[John](1), how are you?")]
#[case("@[Al](1)@[Bo](2)")]
#[case("Grüße an @[Zoë](z) und @[日本](jp)!")]
fn start_mapping_is_monotonic(#[case] value: &str) {
    let engine = engine();
    let len = char_len(&engine.plain_text(value));
    let mapped: Vec<_> = (0..=len)
        .map(|i| engine.map_plain_text_index(value, i, Correction::Start).unwrap())
        .collect();
    assert!(mapped.windows(2).all(|w| w[0] <= w[1]), "{mapped:?}");
}

#[test]
fn corrections_differ_inside_a_mention() {
    let engine = engine();
    let value = "Hello @[John](1), how are you?";
    let start = engine.map_plain_text_index(value, 8, Correction::Start);
    let end = engine.map_plain_text_index(value, 8, Correction::End);
    let null = engine.map_plain_text_index(value, 8, Correction::Null);
    assert_eq!((start, end, null), (Some(6), Some(16), None));
}

#[test]
fn backspacing_inside_a_mention_removes_it_whole() {
    let engine = engine();
    let value = engine.reconcile(
        "Hello @[John](1), how are you?",
        "Hello Jon, how are you?",
        EditSelection::caret(9, 8),
    );
    assert_eq!(value, "Hello , how are you?");
    assert_eq!(engine.plain_text(&value), "Hello , how are you?");
}

#[test]
fn typing_at_the_end_keeps_the_mention() {
    let value = engine().reconcile("Hi @[Alice](42)!", "Hi Alice!!", EditSelection::new(9, 9, 10));
    assert_eq!(value, "Hi @[Alice](42)!!");
}

#[test]
fn unused_kind_placeholder_is_ignored_when_building() {
    assert_eq!(build_mention_markup(DEFAULT_MARKUP, "7", "Bob", "user"), "@[Bob](7)");
}

#[rstest]
#[case::insert_middle("Hi @[Alice](42)!", "Hey Alice!", EditSelection::caret(2, 3), "Hey @[Alice](42)!")]
#[case::delete_before("Hi @[Alice](42)!", "H Alice!", EditSelection::caret(2, 1), "H @[Alice](42)!")]
#[case::delete_after("Hi @[Alice](42)!?", "Hi Alice!", EditSelection::caret(9, 9), "Hi @[Alice](42)!")]
fn edits_outside_mentions_round_trip(
    #[case] old: &str,
    #[case] new_plain: &str,
    #[case] selection: EditSelection,
    #[case] expected: &str,
) {
    let engine = engine();
    let value = engine.reconcile(old, new_plain, selection);
    assert_eq!(value, expected);
    assert_eq!(engine.plain_text(&value), new_plain);
}

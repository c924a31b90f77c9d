use std::borrow::Cow;
use std::iter::FusedIterator;

use regex::CaptureMatches;

use super::{DisplayTransform, grammar::Grammar};
use crate::text::char_len;

/// Literal text between mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Char offset of the run in the marked-up value.
    pub markup_offset: usize,
    /// Char offset of the run in the plain-text value.
    pub plain_offset: usize,
    /// Length of the run in chars (identical in both spaces).
    pub len: usize,
}

impl TextRun<'_> {
    pub fn plain_end(&self) -> usize {
        self.plain_offset + self.len
    }
}

/// One mention token found in the marked-up value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionOccurrence<'a> {
    /// The whole matched token.
    pub markup: &'a str,
    pub markup_offset: usize,
    pub markup_len: usize,
    /// Where the display text starts in the plain-text value.
    pub plain_offset: usize,
    pub id: &'a str,
    /// Display text as stored in the markup.
    pub raw_display: &'a str,
    /// Display text after the display transform.
    pub display: Cow<'a, str>,
    pub display_len: usize,
    pub kind: Option<&'a str>,
    /// Markup offset where the previous mention ended (0 for the first).
    pub previous_end: usize,
}

impl MentionOccurrence<'_> {
    pub fn markup_end(&self) -> usize {
        self.markup_offset + self.markup_len
    }

    pub fn plain_end(&self) -> usize {
        self.plain_offset + self.display_len
    }

    /// True when `index` lies strictly inside the rendered display text.
    pub fn strictly_contains(&self, index: usize) -> bool {
        self.plain_offset < index && index < self.plain_end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(TextRun<'a>),
    Mention(MentionOccurrence<'a>),
}

/// Walks a marked-up value once, alternating text runs and mentions.
///
/// Every mention is preceded by a text run, which is empty when two mentions
/// touch or the value starts with one. A trailing run is only yielded when
/// text remains after the last mention. Stop iterating to stop scanning.
pub struct Scanner<'a> {
    value: &'a str,
    grammar: &'a Grammar,
    transform: Option<&'a dyn DisplayTransform>,
    matches: CaptureMatches<'a, 'a>,
    byte_pos: usize,
    markup_pos: usize,
    plain_pos: usize,
    pending: Option<MentionOccurrence<'a>>,
    finished: bool,
}

/// Starts a scan of `value` with `grammar`.
pub fn scan<'a>(
    value: &'a str,
    grammar: &'a Grammar,
    transform: Option<&'a dyn DisplayTransform>,
) -> Scanner<'a> {
    Scanner {
        value,
        grammar,
        transform,
        matches: grammar.pattern().captures_iter(value),
        byte_pos: 0,
        markup_pos: 0,
        plain_pos: 0,
        pending: None,
        finished: false,
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if let Some(mention) = self.pending.take() {
            self.plain_pos += mention.display_len;
            return Some(Segment::Mention(mention));
        }
        if self.finished {
            return None;
        }

        let Some(caps) = self.matches.next() else {
            self.finished = true;
            if self.byte_pos >= self.value.len() {
                return None;
            }
            let text = &self.value[self.byte_pos..];
            self.byte_pos = self.value.len();
            return Some(Segment::Text(TextRun {
                text,
                markup_offset: self.markup_pos,
                plain_offset: self.plain_pos,
                len: char_len(text),
            }));
        };
        let whole = caps.get(0)?;

        let text = &self.value[self.byte_pos..whole.start()];
        let run = TextRun {
            text,
            markup_offset: self.markup_pos,
            plain_offset: self.plain_pos,
            len: char_len(text),
        };

        let fields = self.grammar.fields(&caps);
        let display = match self.transform {
            Some(t) => Cow::Owned(t.transform(fields.id, fields.display, fields.kind)),
            None => Cow::Borrowed(fields.display),
        };
        let markup = whole.as_str();
        let mention = MentionOccurrence {
            markup,
            markup_offset: run.markup_offset + run.len,
            markup_len: char_len(markup),
            plain_offset: run.plain_end(),
            id: fields.id,
            raw_display: fields.display,
            display_len: char_len(&display),
            display,
            kind: fields.kind,
            previous_end: self.markup_pos,
        };

        self.byte_pos = whole.end();
        self.markup_pos = mention.markup_end();
        self.plain_pos = run.plain_end();
        self.pending = Some(mention);

        Some(Segment::Text(run))
    }
}

impl FusedIterator for Scanner<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grammar() -> Grammar {
        Grammar::compile("@[__display__](__id__)").unwrap()
    }

    #[test]
    fn alternates_text_and_mentions() {
        let grammar = grammar();
        let segments: Vec<_> = scan("Hi @[Alice](42)!", &grammar, None).collect();
        assert_eq!(segments.len(), 3);

        match &segments[0] {
            Segment::Text(run) => {
                assert_eq!(run.text, "Hi ");
                assert_eq!((run.markup_offset, run.plain_offset), (0, 0));
            }
            other => panic!("expected text, got {other:?}"),
        }
        match &segments[1] {
            Segment::Mention(m) => {
                assert_eq!(m.markup, "@[Alice](42)");
                assert_eq!((m.id, m.display.as_ref()), ("42", "Alice"));
                assert_eq!((m.markup_offset, m.plain_offset), (3, 3));
                assert_eq!(m.markup_end(), 15);
                assert_eq!(m.plain_end(), 8);
            }
            other => panic!("expected mention, got {other:?}"),
        }
        match &segments[2] {
            Segment::Text(run) => {
                assert_eq!(run.text, "!");
                assert_eq!((run.markup_offset, run.plain_offset), (15, 8));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn adjacent_mentions_get_empty_runs_and_no_trailing_run() {
        let grammar = grammar();
        let segments: Vec<_> = scan("@[A](1)@[B](2)", &grammar, None).collect();
        let kinds: Vec<_> = segments
            .iter()
            .map(|s| match s {
                Segment::Text(run) => format!("text:{}@{}", run.text, run.plain_offset),
                Segment::Mention(m) => format!("mention:{}@{}<-{}", m.display, m.plain_offset, m.previous_end),
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["text:@0", "mention:A@0<-0", "text:@1", "mention:B@1<-7"]
        );
    }

    #[test]
    fn empty_value_yields_nothing() {
        let grammar = grammar();
        assert_eq!(scan("", &grammar, None).count(), 0);
    }

    #[test]
    fn text_only_value_is_a_single_run() {
        let grammar = grammar();
        let segments: Vec<_> = scan("no mentions", &grammar, None).collect();
        assert_eq!(
            segments,
            vec![Segment::Text(TextRun {
                text: "no mentions",
                markup_offset: 0,
                plain_offset: 0,
                len: 11,
            })]
        );
    }

    #[test]
    fn transform_changes_plain_offsets_not_markup_offsets() {
        let grammar = grammar();
        let at = |_: &str, display: &str, _: Option<&str>| format!("@{display}");
        let mentions: Vec<_> = scan("@[A](1) @[B](2)", &grammar, Some(&at))
            .filter_map(|s| match s {
                Segment::Mention(m) => Some((m.display.into_owned(), m.markup_offset, m.plain_offset)),
                Segment::Text(_) => None,
            })
            .collect();
        assert_eq!(
            mentions,
            vec![("@A".to_string(), 0, 0), ("@B".to_string(), 8, 3)]
        );
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let grammar = grammar();
        let segments: Vec<_> = scan("på @[Ærø](1) ok", &grammar, None).collect();
        match (&segments[1], &segments[2]) {
            (Segment::Mention(m), Segment::Text(run)) => {
                assert_eq!((m.markup_offset, m.plain_offset, m.display_len), (3, 3, 3));
                assert_eq!((run.markup_offset, run.plain_offset), (12, 6));
            }
            other => panic!("unexpected segments {other:?}"),
        }
    }

    #[test]
    fn scanning_stops_when_iteration_stops() {
        let grammar = grammar();
        let first_mention = scan("a @[A](1) b @[B](2)", &grammar, None).find_map(|s| match s {
            Segment::Mention(m) => Some(m.id),
            Segment::Text(_) => None,
        });
        assert_eq!(first_mention, Some("1"));
    }

    #[test]
    fn kind_is_captured_when_template_has_type() {
        let grammar = Grammar::compile("<__type__:__id__|__display__>").unwrap();
        let mention = scan("x <user:7|Bob>", &grammar, None)
            .find_map(|s| match s {
                Segment::Mention(m) => Some(m),
                Segment::Text(_) => None,
            })
            .unwrap();
        assert_eq!(mention.kind, Some("user"));
        assert_eq!(mention.id, "7");
        assert_eq!(mention.display, "Bob");
    }
}

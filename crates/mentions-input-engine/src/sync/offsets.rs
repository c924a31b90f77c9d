use crate::markup::{DisplayTransform, Grammar, Segment, scan};
use crate::text::char_len;

/// What to return for a plain-text offset that falls inside a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Correction {
    /// The markup offset of the mention's first char.
    #[default]
    Start,
    /// The markup offset just past the mention's last char.
    End,
    /// No offset: the position is inside an atomic token.
    Null,
}

/// Where a plain-text offset lands in the marked-up value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    /// On literal text, or on a mention edge.
    Text(usize),
    /// Strictly inside a mention's display text.
    InMention { start: usize, end: usize },
}

impl Location {
    pub(crate) fn resolve(self, correction: Correction) -> Option<usize> {
        match (self, correction) {
            (Location::Text(index), _) => Some(index),
            (Location::InMention { start, .. }, Correction::Start) => Some(start),
            (Location::InMention { end, .. }, Correction::End) => Some(end),
            (Location::InMention { .. }, Correction::Null) => None,
        }
    }

    /// Markup offset with the mention widened towards its start.
    pub(crate) fn start_side(self) -> usize {
        match self {
            Location::Text(index) | Location::InMention { start: index, .. } => index,
        }
    }

    /// Markup offset with the mention widened towards its end.
    pub(crate) fn end_side(self) -> usize {
        match self {
            Location::Text(index) | Location::InMention { end: index, .. } => index,
        }
    }

    pub(crate) fn is_in_mention(self) -> bool {
        matches!(self, Location::InMention { .. })
    }
}

/// Scans `value` until the segment holding plain-text offset `index`.
pub(crate) fn locate(
    value: &str,
    grammar: &Grammar,
    index: usize,
    transform: Option<&dyn DisplayTransform>,
) -> Location {
    for segment in scan(value, grammar, transform) {
        match segment {
            Segment::Text(run) => {
                if run.plain_end() >= index {
                    return Location::Text(
                        run.markup_offset + index.saturating_sub(run.plain_offset),
                    );
                }
            }
            Segment::Mention(mention) => {
                if mention.plain_end() > index {
                    return Location::InMention {
                        start: mention.markup_offset,
                        end: mention.markup_end(),
                    };
                }
            }
        }
    }
    Location::Text(char_len(value))
}

/// Maps a plain-text offset to the corresponding offset in the marked-up
/// value.
///
/// Offsets at a mention's edges map to the surrounding text. Offsets strictly
/// inside a mention's display text are resolved by `correction`, which is the
/// only way this returns `None`. Offsets past the end clamp to the markup
/// length.
pub fn map_plain_text_index(
    value: &str,
    grammar: &Grammar,
    index: usize,
    correction: Correction,
    transform: Option<&dyn DisplayTransform>,
) -> Option<usize> {
    locate(value, grammar, index, transform).resolve(correction)
}

/// Returns the plain-text start of the mention whose display text covers
/// `index`, or `None` when `index` is not on a mention.
///
/// A mention covers `start..start + display_len`, so its first char counts as
/// covered and the offset right after it does not.
pub fn find_enclosing_mention_start(
    value: &str,
    grammar: &Grammar,
    index: usize,
    transform: Option<&dyn DisplayTransform>,
) -> Option<usize> {
    scan(value, grammar, transform).find_map(|segment| match segment {
        Segment::Mention(m) if m.plain_offset <= index && index < m.plain_end() => {
            Some(m.plain_offset)
        }
        _ => None,
    })
}

/// True when `index` is inside a mention and not at its first char.
pub fn is_inside_mention(
    value: &str,
    grammar: &Grammar,
    index: usize,
    transform: Option<&dyn DisplayTransform>,
) -> bool {
    find_enclosing_mention_start(value, grammar, index, transform)
        .is_some_and(|start| start != index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VALUE: &str = "Hello @[John](1), how are you?";

    fn grammar() -> Grammar {
        Grammar::compile("@[__display__](__id__)").unwrap()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(5, 5)]
    #[case(6, 6)]
    #[case(10, 16)]
    #[case(11, 17)]
    #[case(24, 30)]
    fn text_offsets_shift_past_mentions(#[case] plain: usize, #[case] markup: usize) {
        let grammar = grammar();
        for correction in [Correction::Start, Correction::End, Correction::Null] {
            assert_eq!(
                map_plain_text_index(VALUE, &grammar, plain, correction, None),
                Some(markup),
                "plain offset {plain} with {correction:?}"
            );
        }
    }

    #[rstest]
    #[case(7)]
    #[case(8)]
    #[case(9)]
    fn offsets_inside_mention_follow_correction(#[case] plain: usize) {
        let grammar = grammar();
        assert_eq!(
            map_plain_text_index(VALUE, &grammar, plain, Correction::Start, None),
            Some(6)
        );
        assert_eq!(
            map_plain_text_index(VALUE, &grammar, plain, Correction::End, None),
            Some(16)
        );
        assert_eq!(
            map_plain_text_index(VALUE, &grammar, plain, Correction::Null, None),
            None
        );
    }

    #[test]
    fn offset_past_end_clamps_to_markup_length() {
        let grammar = grammar();
        assert_eq!(
            map_plain_text_index(VALUE, &grammar, 500, Correction::Start, None),
            Some(30)
        );
    }

    #[test]
    fn offset_after_trailing_mention_maps_to_markup_end() {
        let grammar = grammar();
        let value = "x @[A](1)";
        assert_eq!(
            map_plain_text_index(value, &grammar, 3, Correction::Null, None),
            Some(9)
        );
    }

    #[test]
    fn offset_between_adjacent_mentions_is_not_inside_either() {
        let grammar = grammar();
        let value = "@[Al](1)@[Bo](2)";
        assert_eq!(
            map_plain_text_index(value, &grammar, 2, Correction::Null, None),
            Some(8)
        );
        assert_eq!(
            map_plain_text_index(value, &grammar, 0, Correction::Null, None),
            Some(0)
        );
    }

    #[test]
    fn transform_widens_the_mention_span() {
        let grammar = grammar();
        let at = |_: &str, display: &str, _: Option<&str>| format!("@{display}");
        // plain text is "Hello @John, how are you?"
        assert_eq!(
            map_plain_text_index(VALUE, &grammar, 10, Correction::Null, Some(&at)),
            None
        );
        assert_eq!(
            map_plain_text_index(VALUE, &grammar, 11, Correction::Null, Some(&at)),
            Some(16)
        );
    }

    #[test]
    fn enclosing_mention_includes_first_char_but_not_end() {
        let grammar = grammar();
        assert_eq!(find_enclosing_mention_start(VALUE, &grammar, 5, None), None);
        assert_eq!(find_enclosing_mention_start(VALUE, &grammar, 6, None), Some(6));
        assert_eq!(find_enclosing_mention_start(VALUE, &grammar, 9, None), Some(6));
        assert_eq!(find_enclosing_mention_start(VALUE, &grammar, 10, None), None);
    }

    #[test]
    fn inside_mention_excludes_its_start() {
        let grammar = grammar();
        assert!(!is_inside_mention(VALUE, &grammar, 6, None));
        assert!(is_inside_mention(VALUE, &grammar, 7, None));
        assert!(!is_inside_mention(VALUE, &grammar, 10, None));
    }
}

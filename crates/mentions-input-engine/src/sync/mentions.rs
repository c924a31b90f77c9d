use serde::{Deserialize, Serialize};

use crate::markup::{DisplayTransform, Grammar, Segment, scan};

/// A mention found in a marked-up value, with its position in both views.
///
/// `display` is the stored value; the plain-text view may render it
/// differently when a display transform is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub id: String,
    pub display: String,
    pub kind: Option<String>,
    /// Char offset of the mention token in the marked-up value.
    pub markup_offset: usize,
    /// Char offset of the display text in the plain-text value.
    pub plain_text_offset: usize,
}

/// Lists every mention in `value` in order of appearance.
pub fn mentions(value: &str, grammar: &Grammar, transform: Option<&dyn DisplayTransform>) -> Vec<Mention> {
    scan(value, grammar, transform)
        .filter_map(|segment| match segment {
            Segment::Mention(m) => Some(Mention {
                id: m.id.to_string(),
                display: m.raw_display.to_string(),
                kind: m.kind.map(str::to_string),
                markup_offset: m.markup_offset,
                plain_text_offset: m.plain_offset,
            }),
            Segment::Text(_) => None,
        })
        .collect()
}

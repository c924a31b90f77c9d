use regex::Captures;

use crate::markup::{DisplayTransform, Grammar};

/// Derives the plain-text view of a marked-up value: every mention token is
/// replaced by its (transformed) display text, literal text is kept as is.
pub fn plain_text(value: &str, grammar: &Grammar, transform: Option<&dyn DisplayTransform>) -> String {
    grammar
        .pattern()
        .replace_all(value, |caps: &Captures<'_>| {
            let fields = grammar.fields(caps);
            match transform {
                Some(t) => t.transform(fields.id, fields.display, fields.kind),
                None => fields.display.to_string(),
            }
        })
        .into_owned()
}

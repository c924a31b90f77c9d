//! Turns an edit made in the plain-text field into an edit of the markup.
//!
//! The field only reports its new text and caret, so the edited range has to
//! be inferred from the selection before the edit, the caret after it and the
//! change in length. That guess is spliced into the markup and then checked by
//! projecting the result back to plain text: when it does not match what the
//! field shows, something (autocorrect, autocapitalisation, an IME) rewrote
//! more than the selection covered and the range is recomputed from the
//! actual difference.

use crate::markup::{DisplayTransform, Grammar};
use crate::sync::offsets::locate;
use crate::sync::plain_text::plain_text;
use crate::text::{char_len, common_prefix_len, rfind, slice, slice_from, splice};

/// Selection offsets surrounding an edit, in plain-text chars.
///
/// Fields do not report the selection start after an edit reliably, so only
/// the end is taken from after the edit. `None` marks a "before" value the
/// host did not capture; it is reconstructed from the length change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditSelection {
    pub start_before: Option<usize>,
    pub end_before: Option<usize>,
    pub end_after: usize,
}

impl EditSelection {
    pub fn new(start_before: usize, end_before: usize, end_after: usize) -> Self {
        Self {
            start_before: Some(start_before),
            end_before: Some(end_before),
            end_after,
        }
    }

    /// A collapsed caret at `before` that moved to `after`.
    pub fn caret(before: usize, after: usize) -> Self {
        Self::new(before, before, after)
    }
}

/// Computes the marked-up value after a plain-text edit.
///
/// With `treat_mention_as_unit`, an edit that touches any char of a mention
/// removes the whole mention token; mentions are never left half-edited.
pub fn reconcile(
    old_value: &str,
    grammar: &Grammar,
    new_plain_text: &str,
    selection: EditSelection,
    transform: Option<&dyn DisplayTransform>,
    treat_mention_as_unit: bool,
) -> String {
    let old_plain_text = plain_text(old_value, grammar, transform);
    let length_delta = char_len(&old_plain_text) as isize - char_len(new_plain_text) as isize;
    let end_after = selection.end_after;

    log::trace!(
        "reconcile: {old_plain_text:?} -> {new_plain_text:?} with {selection:?} (delta {length_delta})"
    );

    let mut start_before = selection
        .start_before
        .unwrap_or_else(|| offset_by(end_after, length_delta));
    let end_before = selection.end_before.unwrap_or(start_before);

    // A same-length edit with an unmoved caret is a composed character
    // replacing the one before the caret.
    if start_before == end_before && end_before == end_after && length_delta == 0 {
        start_before = start_before.saturating_sub(1);
    }

    let insert = slice(new_plain_text, start_before, end_after);

    let splice_start = start_before.min(end_after);
    let splice_end = if start_before == end_after {
        // Delete/Backspace with a collapsed caret: the removed span is the
        // length change, not the (empty) selection.
        end_before.max(offset_by(start_before, length_delta))
    } else {
        end_before
    };

    let start = locate(old_value, grammar, splice_start, transform);
    let end = locate(old_value, grammar, splice_end, transform);
    let new_value = splice(old_value, start.start_side(), end.end_side(), insert);

    if treat_mention_as_unit && (start.is_in_mention() || end.is_in_mention()) {
        log::debug!("edit {splice_start}..{splice_end} removes a mention");
        return new_value;
    }

    let control = plain_text(&new_value, grammar, transform);
    if control == new_plain_text {
        return new_value;
    }

    log::debug!("plain text diverged after splice ({control:?}), recovering autocorrected range");

    let splice_start = common_prefix_len(new_plain_text, &control);
    let unchanged_suffix = slice_from(new_plain_text, end_after);
    // Rightmost occurrence: a suffix that also appears earlier in the text can
    // anchor the range too far left, which is accepted.
    let (insert, splice_end) = match rfind(&old_plain_text, unchanged_suffix) {
        Some(end) => (slice(new_plain_text, splice_start, end_after), end),
        None => (
            slice_from(new_plain_text, splice_start),
            char_len(&old_plain_text),
        ),
    };

    let start = locate(old_value, grammar, splice_start, transform);
    let end = locate(old_value, grammar, splice_end, transform);
    splice(old_value, start.start_side(), end.end_side(), insert)
}

/// `base + delta`, floored at zero.
fn offset_by(base: usize, delta: isize) -> usize {
    base.saturating_add_signed(delta)
}

//! What a single-line text field does to its own contents on a key press,
//! before anything mention-aware sees the result.

use mentions_input_engine::text::{char_len, splice};

/// The field's text and caret after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub text: String,
    pub caret: usize,
}

pub fn insert(text: &str, caret: usize, inserted: &str) -> FieldEdit {
    let caret = caret.min(char_len(text));
    FieldEdit {
        text: splice(text, caret, caret, inserted),
        caret: caret + char_len(inserted),
    }
}

pub fn backspace(text: &str, caret: usize) -> Option<FieldEdit> {
    let caret = caret.min(char_len(text));
    if caret == 0 {
        return None;
    }
    Some(FieldEdit {
        text: splice(text, caret - 1, caret, ""),
        caret: caret - 1,
    })
}

pub fn delete(text: &str, caret: usize) -> Option<FieldEdit> {
    if caret >= char_len(text) {
        return None;
    }
    Some(FieldEdit {
        text: splice(text, caret, caret + 1, ""),
        caret,
    })
}

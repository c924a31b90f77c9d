//! # Synchronisation
//!
//! Functions over a marked-up value that keep it consistent with the
//! plain-text view a user edits. All of them are built on the single
//! [`scan`](crate::markup::scan) traversal, so plain-text and markup offsets
//! agree everywhere.
//!
//! - **`offsets`**: plain-text → markup offset mapping with [`Correction`]
//! - **`plain_text`**: projection of markup to plain text
//! - **`mentions`**: extraction of [`Mention`] records
//! - **`reconcile`**: applying a plain-text edit to the markup

pub mod mentions;
pub mod offsets;
pub mod plain_text;
pub mod reconcile;

pub use mentions::{Mention, mentions};
pub use offsets::{Correction, find_enclosing_mention_start, is_inside_mention, map_plain_text_index};
pub use plain_text::plain_text;
pub use reconcile::{EditSelection, reconcile};

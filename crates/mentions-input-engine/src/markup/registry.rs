use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;
use regex::Regex;

use super::{
    MarkupError,
    grammar::{Grammar, GroupPositions, PatternAnchor, compile_pattern, group_positions},
};

/// A get-or-compute map.
///
/// Values are pure functions of their key, so two threads racing to fill the
/// same entry both write an equal value and neither needs to wait for the other.
struct Memo<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> Memo<K, V> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_try_insert_with<E>(
        &self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.entries.read().get(&key).cloned() {
            return Ok(value);
        }
        let value = compute()?;
        self.entries.write().insert(key, value.clone());
        Ok(value)
    }

    fn insert(&self, key: K, value: V) {
        self.entries.write().insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

/// Owns the compiled-template caches.
///
/// One long-lived registry is meant to be shared by everything that works with
/// the same templates; tests create their own for isolation. Entries are never
/// evicted since the key space is the set of templates callers configure.
pub struct GrammarRegistry {
    patterns: Memo<(String, PatternAnchor), Regex>,
    groups: Memo<String, GroupPositions>,
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self {
            patterns: Memo::new(),
            groups: Memo::new(),
        }
    }

    /// Returns the compiled pattern for `template`, compiling it on first use.
    pub fn pattern(&self, template: &str, anchor: PatternAnchor) -> Result<Regex, MarkupError> {
        self.patterns
            .get_or_try_insert_with((template.to_string(), anchor), || {
                compile_pattern(template, anchor)
            })
    }

    /// Returns the capture group layout for `template`.
    pub fn group_positions(&self, template: &str) -> Result<GroupPositions, MarkupError> {
        self.groups
            .get_or_try_insert_with(template.to_string(), || group_positions(template))
    }

    /// Returns a ready-to-scan grammar for `template`.
    ///
    /// Fails with [`MarkupError::MissingPlaceholders`] before anything is
    /// cached when the template has neither an id nor a display placeholder.
    pub fn grammar(&self, template: &str) -> Result<Grammar, MarkupError> {
        let groups = self.group_positions(template)?;
        let pattern = self.pattern(template, PatternAnchor::Anywhere)?;
        let end_pattern = self.pattern(template, PatternAnchor::End)?;
        Ok(Grammar::from_parts(template, pattern, end_pattern, groups))
    }

    /// Replaces the scanning pattern cached for `template` with `pattern`.
    ///
    /// Later calls to [`GrammarRegistry::grammar`] for the same template
    /// return the override.
    pub fn use_pattern(&self, template: &str, pattern: Regex) -> Result<Grammar, MarkupError> {
        self.group_positions(template)?;
        self.patterns
            .insert((template.to_string(), PatternAnchor::Anywhere), pattern);
        self.grammar(template)
    }

    /// Number of distinct templates whose group layout has been computed.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use super::provider::Suggestion;

/// Identifies one round of suggestion queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct QueryId(u64);

/// Hands out query ids and remembers which one is current.
///
/// Every selection change invalidates the previous round, so results that
/// arrive late for an older caret position are recognised and dropped.
#[derive(Debug, Default)]
pub struct QueryTracker {
    current: u64,
}

impl QueryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> QueryId {
        QueryId(self.current)
    }

    /// Starts a new round and returns its id.
    pub fn invalidate(&mut self) -> QueryId {
        self.current += 1;
        QueryId(self.current)
    }

    pub fn is_current(&self, id: QueryId) -> bool {
        id.0 == self.current
    }
}

/// Where a query came from and which plain-text range a chosen suggestion
/// replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// Kind of the mention source that matched.
    pub kind: String,
    pub query: String,
    pub start: usize,
    pub end: usize,
    pub append_space_on_add: bool,
}

/// Passed to providers so late results can be delivered to the right round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub id: QueryId,
    pub context: QueryContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionGroup {
    pub context: QueryContext,
    pub results: Vec<Suggestion>,
}

/// Suggestions shown to the user, grouped by mention source in arrival order,
/// with a focused entry.
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    groups: Vec<SuggestionGroup>,
    focus: usize,
}

impl SuggestionList {
    /// Stores results for a source, replacing earlier results of the same kind.
    pub fn update(&mut self, group: SuggestionGroup) {
        match self
            .groups
            .iter_mut()
            .find(|g| g.context.kind == group.context.kind)
        {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
        if self.focus >= self.len() {
            self.focus = 0;
        }
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.focus = 0;
    }

    pub fn groups(&self) -> &[SuggestionGroup] {
        &self.groups
    }

    /// Total number of suggestions across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.results.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The suggestion at a flattened index, with its query.
    pub fn get(&self, index: usize) -> Option<(&Suggestion, &QueryContext)> {
        self.iter().nth(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Suggestion, &QueryContext)> {
        self.groups
            .iter()
            .flat_map(|g| g.results.iter().map(move |s| (s, &g.context)))
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves the focus by `delta`, wrapping at both ends.
    pub fn shift_focus(&mut self, delta: isize) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let len = len as isize;
        self.focus = (self.focus as isize + delta).rem_euclid(len) as usize;
    }

    pub fn focused(&self) -> Option<(&Suggestion, &QueryContext)> {
        self.get(self.focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context(kind: &str) -> QueryContext {
        QueryContext {
            kind: kind.to_string(),
            query: String::new(),
            start: 0,
            end: 1,
            append_space_on_add: false,
        }
    }

    fn group(kind: &str, ids: &[&str]) -> SuggestionGroup {
        SuggestionGroup {
            context: context(kind),
            results: ids.iter().map(|id| Suggestion::new(*id, *id)).collect(),
        }
    }

    #[test]
    fn tracker_only_accepts_latest_id() {
        let mut tracker = QueryTracker::new();
        let first = tracker.invalidate();
        assert!(tracker.is_current(first));
        let second = tracker.invalidate();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
        assert!(first < second);
    }

    #[test]
    fn flattens_groups_in_arrival_order() {
        let mut list = SuggestionList::default();
        list.update(group("user", &["a", "b"]));
        list.update(group("tag", &["c"]));
        assert_eq!(list.len(), 3);
        let (suggestion, context) = list.get(2).unwrap();
        assert_eq!(suggestion.id, "c");
        assert_eq!(context.kind, "tag");
        assert!(list.get(3).is_none());
    }

    #[test]
    fn update_replaces_results_of_same_kind() {
        let mut list = SuggestionList::default();
        list.update(group("user", &["a", "b"]));
        list.update(group("user", &["z"]));
        assert_eq!(list.groups().len(), 1);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn focus_wraps_around() {
        let mut list = SuggestionList::default();
        list.update(group("user", &["a", "b", "c"]));
        list.shift_focus(-1);
        assert_eq!(list.focus(), 2);
        list.shift_focus(1);
        assert_eq!(list.focus(), 0);
        list.shift_focus(1);
        assert_eq!(list.focused().map(|(s, _)| s.id.as_str()), Some("b"));
    }

    #[test]
    fn shrinking_results_resets_out_of_range_focus() {
        let mut list = SuggestionList::default();
        list.update(group("user", &["a", "b", "c"]));
        list.shift_focus(2);
        list.update(group("user", &["a"]));
        assert_eq!(list.focus(), 0);
    }

    #[test]
    fn empty_list_ignores_focus_moves() {
        let mut list = SuggestionList::default();
        list.shift_focus(1);
        assert_eq!(list.focus(), 0);
        assert!(list.focused().is_none());
    }
}

use indexmap::IndexMap;

/// Result of one attempt to remove a filesystem entry (or run a command step).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub entry_name: String,
    pub succeeded: bool,
    /// OS error text. Only set when `succeeded` is false.
    pub reason: Option<String>,
}

impl Outcome {
    pub fn success(entry_name: impl Into<String>) -> Self {
        Self {
            entry_name: entry_name.into(),
            succeeded: true,
            reason: None,
        }
    }

    pub fn failure(entry_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            entry_name: entry_name.into(),
            succeeded: false,
            reason: Some(reason.into()),
        }
    }
}

/// Outcomes grouped by category label.
///
/// Categories keep first-seen order and outcomes keep append order. Nothing is
/// ever removed or rewritten, so rendering the same sequence of `record` calls
/// always yields the same report.
#[derive(Debug, Default)]
pub struct ResultStore {
    categories: IndexMap<String, Vec<Outcome>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one outcome under `category`. A `reason` passed with a
    /// successful outcome is dropped.
    pub fn record(
        &mut self,
        category: impl Into<String>,
        entry_name: impl Into<String>,
        succeeded: bool,
        reason: Option<String>,
    ) {
        let outcome = Outcome {
            entry_name: entry_name.into(),
            succeeded,
            reason: if succeeded { None } else { reason },
        };
        self.push(category, outcome);
    }

    pub fn push(&mut self, category: impl Into<String>, outcome: Outcome) {
        self.categories
            .entry(category.into())
            .or_default()
            .push(outcome);
    }

    /// Ordered read-only view used by the report writer.
    pub fn snapshot(&self) -> &IndexMap<String, Vec<Outcome>> {
        &self.categories
    }

    /// Fold another store in after everything already recorded here.
    /// Categories present in both keep their position in `self`.
    pub fn merge(&mut self, other: ResultStore) {
        for (category, outcomes) in other.categories {
            self.categories
                .entry(category)
                .or_default()
                .extend(outcomes);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn total(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes().filter(|o| o.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes().filter(|o| !o.succeeded).count()
    }

    fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.categories.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_keep_first_seen_order() {
        let mut store = ResultStore::new();
        store.record("Y", "1", true, None);
        store.record("X", "2", true, None);
        store.record("Y", "3", false, Some("busy".into()));

        let keys: Vec<&str> = store.snapshot().keys().map(String::as_str).collect();
        assert_eq!(keys, ["Y", "X"]);

        let names: Vec<&str> = store.snapshot()["Y"]
            .iter()
            .map(|o| o.entry_name.as_str())
            .collect();
        assert_eq!(names, ["1", "3"]);
    }

    #[test]
    fn reason_is_dropped_on_success() {
        let mut store = ResultStore::new();
        store.record("X", "a.txt", true, Some("ignored".into()));
        assert_eq!(store.snapshot()["X"][0], Outcome::success("a.txt"));
    }

    #[test]
    fn merge_appends_after_existing_entries() {
        let mut first = ResultStore::new();
        first.record("A", "one", true, None);
        first.record("B", "two", true, None);

        let mut second = ResultStore::new();
        second.record("C", "three", false, Some("denied".into()));
        second.record("A", "four", true, None);

        first.merge(second);

        let keys: Vec<&str> = first.snapshot().keys().map(String::as_str).collect();
        assert_eq!(keys, ["A", "B", "C"]);
        let a: Vec<&str> = first.snapshot()["A"]
            .iter()
            .map(|o| o.entry_name.as_str())
            .collect();
        assert_eq!(a, ["one", "four"]);
        assert_eq!(first.total(), 4);
        assert_eq!(first.succeeded(), 3);
        assert_eq!(first.failed(), 1);
    }

    #[test]
    fn empty_store() {
        let store = ResultStore::new();
        assert!(store.is_empty());
        assert_eq!(store.total(), 0);
    }
}

//! Per-process invocation counts.

use indexmap::IndexMap;

/// How many times each physics process fired during a run.
///
/// Keys are process names as the transport layer reports them
/// (`"eIoni"`, `"compt"`, ...). Storage is an [`IndexMap`] so iteration
/// is deterministic for a given insertion order; consumers that need
/// merge-order independence (the run report) sort by name on top of
/// this.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessCounter {
    counts: IndexMap<String, u64>,
}

impl ProcessCounter {
    /// An empty counter table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one invocation of `name`, inserting it at 1 if unseen.
    pub fn count(&mut self, name: &str) {
        if let Some(n) = self.counts.get_mut(name) {
            *n += 1;
        } else {
            self.counts.insert(name.to_owned(), 1);
        }
    }

    /// Invocations recorded for `name` (0 if unseen).
    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Number of distinct processes seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// `true` if no process has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate `(name, count)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, n)| (name.as_str(), *n))
    }

    /// Fold another table into this one, adding counts for shared names
    /// and inserting the rest.
    pub fn merge(&mut self, other: &ProcessCounter) {
        for (name, n) in &other.counts {
            if let Some(mine) = self.counts.get_mut(name) {
                *mine += n;
            } else {
                self.counts.insert(name.clone(), *n);
            }
        }
    }

    /// Drop every entry. Used by the end-of-run volatile reset.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

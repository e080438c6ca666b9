use std::collections::HashSet;

use crate::model::{Bindings, Value};

/// One partial match: the bindings so far, and the index of the next unconsumed token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct Candidate {
    bindings: Bindings,
    cursor: usize,
}

impl Candidate {
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Fork this candidate, binding `name` and consuming `consumed` tokens.
    /// An existing binding for `name` is replaced.
    pub(crate) fn bind(&self, name: &str, value: Value, consumed: usize) -> Self {
        let mut bindings = self.bindings.clone();
        bindings.insert(name.to_string(), value);
        Self {
            bindings,
            cursor: self.cursor + consumed,
        }
    }

    pub(crate) fn into_bindings(self) -> Bindings {
        self.bindings
    }
}

/// Remove structurally equal candidates, keeping the first of each.
pub(crate) fn deduplicate(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect()
}

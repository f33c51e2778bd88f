use std::hash::Hash;

use crate::ordered_hashmap::OrderedHashMap;

/// State values, 0 for any state never written.
///
/// Entries are only ever overwritten, never removed.
#[derive(Debug, Clone)]
pub struct ValueTable<S> {
    values: OrderedHashMap<S, f64>,
}

impl<S: Hash + Eq + Clone> Default for ValueTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Hash + Eq + Clone> ValueTable<S> {
    pub fn new() -> Self {
        ValueTable {
            values: OrderedHashMap::new(),
        }
    }

    pub fn get(&self, state: &S) -> f64 {
        self.values.get(state).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: S, value: f64) {
        self.values.insert(state, value);
    }

    /// Written entries in first-write order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, f64)> {
        self.values.iter().map(|(state, value)| (state, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_states_default_to_zero() {
        let mut table = ValueTable::new();
        assert_eq!(table.get(&"a"), 0.0);
        table.set("a", 2.5);
        table.set("b", -1.0);
        table.set("a", 3.0);
        assert_eq!(table.get(&"a"), 3.0);
        assert_eq!(table.get(&"z"), 0.0);
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec![(&"a", 3.0), (&"b", -1.0)]
        );
    }
}

//! Seen-id set for deduplication
//!
//! Unbounded by default. With a capacity the oldest ids are forgotten first.

use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct SeenIdSet {
    ids: HashSet<String>,
    /// Insertion order, only tracked when capped
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl SeenIdSet {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity: capacity.map(|c| c.max(1)),
            ..Default::default()
        }
    }

    /// Returns `true` if the id was not seen before
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string());

        if let Some(capacity) = self.capacity {
            self.order.push_back(id.to_string());
            while self.order.len() > capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.ids.remove(&oldest);
                }
            }
        }
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_keeps_everything() {
        let mut seen = SeenIdSet::unbounded();
        for i in 0..1_000 {
            assert!(seen.insert(&format!("id-{}", i)));
        }
        assert!(!seen.insert("id-0"));
        assert_eq!(seen.len(), 1_000);
    }

    #[test]
    fn test_capped_forgets_oldest() {
        let mut seen = SeenIdSet::with_capacity(Some(2));
        seen.insert("a");
        seen.insert("b");
        seen.insert("c");

        assert!(!seen.contains("a"));
        assert!(seen.contains("b"));
        assert!(seen.contains("c"));
        assert_eq!(seen.len(), 2);
        // Forgotten ids are accepted again
        assert!(seen.insert("a"));
    }
}

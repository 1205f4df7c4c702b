//! Category Tally - lifetime counts per attack category
//!
//! Not capped and not touched by display eviction.

use serde::Serialize;

use crate::logic::alert::AttackCategory;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTally {
    counts: [u64; 6],
}

/// One row of the attack statistics panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: AttackCategory,
    pub count: u64,
    pub percentage: f64,
}

impl CategoryTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: AttackCategory) {
        self.counts[category.index()] += 1;
    }

    pub fn count(&self, category: AttackCategory) -> u64 {
        self.counts[category.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Everything except normal traffic
    pub fn attacks_detected(&self) -> u64 {
        self.total() - self.count(AttackCategory::NormalTraffic)
    }

    /// All categories in display order, zeros included
    pub fn entries(&self) -> Vec<(AttackCategory, u64)> {
        AttackCategory::ALL
            .iter()
            .map(|c| (*c, self.count(*c)))
            .collect()
    }

    /// Non-zero categories with their share of the total
    pub fn shares(&self) -> Vec<CategoryShare> {
        let total = self.total();
        AttackCategory::ALL
            .iter()
            .filter_map(|c| {
                let count = self.count(*c);
                (count > 0).then(|| CategoryShare {
                    category: *c,
                    count,
                    percentage: count as f64 / total as f64 * 100.0,
                })
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.counts = [0; 6];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_totals() {
        let mut tally = CategoryTally::new();
        tally.record(AttackCategory::SqlInjection);
        tally.record(AttackCategory::SqlInjection);
        tally.record(AttackCategory::NormalTraffic);
        tally.record(AttackCategory::CommandInjection);

        assert_eq!(tally.count(AttackCategory::SqlInjection), 2);
        assert_eq!(tally.total(), 4);
        assert_eq!(tally.attacks_detected(), 3);
        assert_eq!(tally.entries().len(), 6);
    }

    #[test]
    fn test_shares_skip_empty_categories() {
        let mut tally = CategoryTally::new();
        assert!(tally.shares().is_empty());

        tally.record(AttackCategory::XssAttack);
        tally.record(AttackCategory::BotAttack);
        tally.record(AttackCategory::BotAttack);
        tally.record(AttackCategory::BotAttack);

        let shares = tally.shares();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, AttackCategory::XssAttack);
        assert!((shares[0].percentage - 25.0).abs() < f64::EPSILON);
        assert!((shares[1].percentage - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let mut tally = CategoryTally::new();
        tally.record(AttackCategory::BotAttack);
        tally.reset();
        assert_eq!(tally.total(), 0);
    }
}

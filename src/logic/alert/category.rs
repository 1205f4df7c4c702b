//! Attack category matching
//!
//! Case-sensitive keyword containment, first match wins.

use super::types::AttackCategory;

/// Keyword table in precedence order
const KEYWORDS: [(&[&str], AttackCategory); 5] = [
    (&["SQL"], AttackCategory::SqlInjection),
    (&["XSS"], AttackCategory::XssAttack),
    (&["Bot"], AttackCategory::BotAttack),
    (&["Directory", "Traversal"], AttackCategory::DirectoryTraversal),
    (&["Command"], AttackCategory::CommandInjection),
];

/// Bucket a free-form attack type label
pub fn classify(attack_type: &str) -> AttackCategory {
    KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| attack_type.contains(w)))
        .map(|(_, category)| *category)
        .unwrap_or(AttackCategory::NormalTraffic)
}

//! Hiring rule definitions and the day-scoped catalog

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::types::{Day, Decision, RuleType};

/// Case field a condition inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionField {
    Region,
    UniversityTier,
    University,
    Major,
    GPA,
    Experience,
    Age,
    HasCriminalRecord,
    HasRecommendation,
}

impl ConditionField {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionField::Region => "Region",
            ConditionField::UniversityTier => "UniversityTier",
            ConditionField::University => "University",
            ConditionField::Major => "Major",
            ConditionField::GPA => "GPA",
            ConditionField::Experience => "Experience",
            ConditionField::Age => "Age",
            ConditionField::HasCriminalRecord => "HasCriminalRecord",
            ConditionField::HasRecommendation => "HasRecommendation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Contains,
}

/// A single field/operator/literal predicate
///
/// The literal is kept in text form and parsed per field type at
/// evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: ConditionField,
    pub operator: ConditionOperator,
    pub value: String,
}

impl Condition {
    pub fn new(field: ConditionField, operator: ConditionOperator, value: impl Into<String>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }
}

/// Inclusive day range; `to_day == None` means the rule never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationWindow {
    pub from_day: Day,
    pub to_day: Option<Day>,
}

impl ActivationWindow {
    pub fn new(from_day: Day, to_day: Option<Day>) -> Self {
        Self { from_day, to_day }
    }

    pub fn contains(&self, day: Day) -> bool {
        day >= self.from_day && self.to_day.map_or(true, |to| day <= to)
    }
}

/// Loyalty/conscience deltas for following or violating a rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImpactDeltas {
    pub loyalty_on_follow: i32,
    pub conscience_on_follow: i32,
    pub loyalty_on_violate: i32,
    pub conscience_on_violate: i32,
}

/// A prioritized, time-scoped hiring rule. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct HiringRule {
    pub id: String,
    pub name: String,
    pub rule_type: RuleType,
    pub window: ActivationWindow,
    pub description: String,
    pub ethical: bool,
    /// AND-combined; an empty list never matches
    pub conditions: Vec<Condition>,
    pub enforced_decision: Option<Decision>,
    pub priority: i32,
    pub impact: ImpactDeltas,
}

impl HiringRule {
    pub fn is_active_on_day(&self, day: Day) -> bool {
        self.window.contains(day)
    }
}

/// Central storage for all hiring rules, in insertion order
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<HiringRule>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<HiringRule>) -> Self {
        Self { rules }
    }

    pub fn insert(&mut self, rule: HiringRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn all_rules(&self) -> &[HiringRule] {
        &self.rules
    }

    /// Rules active on `day`, highest priority first.
    ///
    /// The sort is stable so equal priorities keep catalog order.
    pub fn active_rules_for_day(&self, day: Day) -> Vec<&HiringRule> {
        let mut active: Vec<&HiringRule> =
            self.rules.iter().filter(|r| r.is_active_on_day(day)).collect();
        active.sort_by_key(|r| Reverse(r.priority));

        debug!(day, count = active.len(), "Active rules recomputed");
        active
    }

    /// Look up a rule by id; missing ids are logged and yield `None`.
    pub fn rule_by_id(&self, id: &str) -> Option<&HiringRule> {
        let found = self.rules.iter().find(|r| r.id == id);
        if found.is_none() {
            warn!(rule_id = id, "Rule not found");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, priority: i32, from: Day, to: Option<Day>) -> HiringRule {
        HiringRule {
            id: id.to_string(),
            name: id.to_string(),
            rule_type: RuleType::Basic,
            window: ActivationWindow::new(from, to),
            description: String::new(),
            ethical: true,
            conditions: vec![],
            enforced_decision: None,
            priority,
            impact: ImpactDeltas::default(),
        }
    }

    #[test]
    fn test_window_unbounded_end() {
        let window = ActivationWindow::new(13, None);
        assert!(!window.contains(12));
        assert!(window.contains(13));
        assert!(window.contains(1000));
    }

    #[test]
    fn test_window_inclusive_bounds() {
        let window = ActivationWindow::new(7, Some(11));
        assert!(!window.contains(6));
        assert!(window.contains(7));
        assert!(window.contains(11));
        assert!(!window.contains(12));
    }

    #[test]
    fn test_active_rules_sorted_by_priority() {
        let catalog = RuleCatalog::from_rules(vec![
            rule("low", 1, 1, None),
            rule("high", 20, 1, None),
            rule("expired", 50, 1, Some(2)),
            rule("mid", 10, 1, None),
        ]);

        let ids: Vec<&str> = catalog
            .active_rules_for_day(5)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_active_rules_ties_keep_insertion_order() {
        let catalog = RuleCatalog::from_rules(vec![
            rule("first", 5, 1, None),
            rule("second", 5, 1, None),
            rule("third", 5, 1, None),
        ]);

        let ids: Vec<&str> = catalog
            .active_rules_for_day(1)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_no_active_rules_is_valid() {
        let catalog = RuleCatalog::from_rules(vec![rule("late", 5, 10, None)]);
        assert!(catalog.active_rules_for_day(3).is_empty());
    }

    #[test]
    fn test_rule_by_id_missing_returns_none() {
        let catalog = RuleCatalog::from_rules(vec![rule("known", 1, 1, None)]);
        assert!(catalog.rule_by_id("known").is_some());
        assert!(catalog.rule_by_id("unknown").is_none());
    }
}

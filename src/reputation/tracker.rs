//! Loyalty, conscience and inequality axes with mood and ending selection

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::{
    HIGH_THRESHOLD, INEQUALITY_MAX, LOW_THRESHOLD, MID_HIGH_THRESHOLD, PARAM_MAX, PARAM_MIN,
    VERY_LOW_THRESHOLD,
};
use crate::core::types::{EndingOutcome, Mood};
use crate::rules::HiringRule;

/// Inequality added when an unethical rule is followed
pub const INEQUALITY_ON_DISCRIMINATION: i32 = 2;
/// Inequality added by a bias-reinforcing decision
pub const INEQUALITY_ON_BIAS: i32 = 3;
/// Inequality removed by a fair decision
pub const INEQUALITY_ON_FAIRNESS: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Loyalty,
    Conscience,
    Inequality,
}

impl Axis {
    pub fn bounds(self) -> (i32, i32) {
        match self {
            Axis::Loyalty | Axis::Conscience => (PARAM_MIN, PARAM_MAX),
            Axis::Inequality => (PARAM_MIN, INEQUALITY_MAX),
        }
    }
}

/// A clamped value that actually moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReputationChange {
    pub axis: Axis,
    pub old_value: i32,
    pub new_value: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessCounters {
    pub discriminatory: u32,
    pub fair: u32,
    pub bias_reinforced: u32,
}

/// Household mood for a pair of axis values. First match wins.
pub fn mood_for(loyalty: i32, conscience: i32) -> Mood {
    if loyalty < LOW_THRESHOLD && conscience < LOW_THRESHOLD {
        Mood::Crisis
    } else if loyalty >= MID_HIGH_THRESHOLD {
        Mood::HighLoyalty
    } else if conscience >= MID_HIGH_THRESHOLD {
        Mood::HighConscience
    } else {
        Mood::Balanced
    }
}

/// Stand-in for a civil-solidarity contact check; currently the same
/// test as the revolutionary conscience threshold.
pub fn civil_cooperation(conscience: i32) -> bool {
    conscience >= HIGH_THRESHOLD
}

/// Ending for final axis values. First match wins.
///
/// The martyr profile (very low loyalty, high conscience) is tested ahead of
/// the revolutionary check; with the cooperation stand-in above it would
/// otherwise never be reachable. The usual cascade lists revolutionary
/// first, so keep this order: `(20, 85)` must stay a martyr ending.
pub fn ending_for(loyalty: i32, conscience: i32) -> EndingOutcome {
    if loyalty <= VERY_LOW_THRESHOLD && conscience >= HIGH_THRESHOLD {
        EndingOutcome::Martyr
    } else if conscience >= HIGH_THRESHOLD && civil_cooperation(conscience) {
        EndingOutcome::Revolutionary
    } else if loyalty >= HIGH_THRESHOLD && conscience <= VERY_LOW_THRESHOLD {
        EndingOutcome::CorporateDog
    } else if loyalty < LOW_THRESHOLD && conscience < LOW_THRESHOLD {
        EndingOutcome::Downfall
    } else {
        EndingOutcome::Balance
    }
}

/// Session-long reputation state
///
/// All mutation goes through the `adjust_*` methods, which clamp and record
/// a [`ReputationChange`] only when the stored value moves.
#[derive(Debug, Clone)]
pub struct ReputationTracker {
    loyalty: i32,
    conscience: i32,
    inequality: i32,
    counters: FairnessCounters,
    pending: Vec<ReputationChange>,
}

impl Default for ReputationTracker {
    fn default() -> Self {
        Self::new(50, 50)
    }
}

impl ReputationTracker {
    pub fn new(loyalty: i32, conscience: i32) -> Self {
        Self {
            loyalty: loyalty.clamp(PARAM_MIN, PARAM_MAX),
            conscience: conscience.clamp(PARAM_MIN, PARAM_MAX),
            inequality: 0,
            counters: FairnessCounters::default(),
            pending: Vec::new(),
        }
    }

    pub fn loyalty(&self) -> i32 {
        self.loyalty
    }

    pub fn conscience(&self) -> i32 {
        self.conscience
    }

    pub fn inequality(&self) -> i32 {
        self.inequality
    }

    pub fn counters(&self) -> FairnessCounters {
        self.counters
    }

    pub fn value(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Loyalty => self.loyalty,
            Axis::Conscience => self.conscience,
            Axis::Inequality => self.inequality,
        }
    }

    pub fn adjust_loyalty(&mut self, delta: i32) -> bool {
        self.adjust(Axis::Loyalty, delta)
    }

    pub fn adjust_conscience(&mut self, delta: i32) -> bool {
        self.adjust(Axis::Conscience, delta)
    }

    pub fn adjust_inequality(&mut self, delta: i32) -> bool {
        self.adjust(Axis::Inequality, delta)
    }

    fn adjust(&mut self, axis: Axis, delta: i32) -> bool {
        let (min, max) = axis.bounds();
        let slot = match axis {
            Axis::Loyalty => &mut self.loyalty,
            Axis::Conscience => &mut self.conscience,
            Axis::Inequality => &mut self.inequality,
        };

        let old_value = *slot;
        let new_value = old_value.saturating_add(delta).clamp(min, max);
        if new_value == old_value {
            return false;
        }

        *slot = new_value;
        debug!(?axis, old_value, new_value, delta, "Reputation changed");
        self.pending.push(ReputationChange {
            axis,
            old_value,
            new_value,
        });
        true
    }

    pub fn on_rule_followed(&mut self, rule: &HiringRule) {
        self.adjust_loyalty(rule.impact.loyalty_on_follow);
        self.adjust_conscience(rule.impact.conscience_on_follow);

        if rule.ethical {
            self.counters.fair += 1;
        } else {
            self.counters.discriminatory += 1;
            self.adjust_inequality(INEQUALITY_ON_DISCRIMINATION);
        }
    }

    pub fn on_rule_violated(&mut self, rule: &HiringRule) {
        self.adjust_loyalty(rule.impact.loyalty_on_violate);
        self.adjust_conscience(rule.impact.conscience_on_violate);

        if !rule.ethical {
            self.counters.fair += 1;
            self.adjust_inequality(INEQUALITY_ON_FAIRNESS);
        }
    }

    pub fn record_discriminatory_decision(&mut self) {
        self.counters.discriminatory += 1;
        self.adjust_inequality(INEQUALITY_ON_DISCRIMINATION);
    }

    pub fn record_fair_decision(&mut self) {
        self.counters.fair += 1;
        self.adjust_inequality(INEQUALITY_ON_FAIRNESS);
    }

    pub fn record_bias_reinforced_decision(&mut self) {
        self.counters.bias_reinforced += 1;
        self.adjust_inequality(INEQUALITY_ON_BIAS);
    }

    pub fn current_mood(&self) -> Mood {
        mood_for(self.loyalty, self.conscience)
    }

    pub fn determine_ending(&self) -> EndingOutcome {
        ending_for(self.loyalty, self.conscience)
    }

    /// Changes recorded since the last drain, oldest first
    pub fn drain_changes(&mut self) -> Vec<ReputationChange> {
        std::mem::take(&mut self.pending)
    }

    /// Overwrite all state from persisted values; callers validate ranges first.
    pub fn restore(
        &mut self,
        loyalty: i32,
        conscience: i32,
        inequality: i32,
        counters: FairnessCounters,
    ) {
        self.loyalty = loyalty.clamp(PARAM_MIN, PARAM_MAX);
        self.conscience = conscience.clamp(PARAM_MIN, PARAM_MAX);
        self.inequality = inequality.clamp(PARAM_MIN, INEQUALITY_MAX);
        self.counters = counters;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RuleType;
    use crate::rules::{ActivationWindow, ImpactDeltas};

    fn rule(ethical: bool) -> HiringRule {
        HiringRule {
            id: "r".to_string(),
            name: "r".to_string(),
            rule_type: RuleType::Preference,
            window: ActivationWindow::new(1, None),
            description: String::new(),
            ethical,
            conditions: vec![],
            enforced_decision: None,
            priority: 1,
            impact: ImpactDeltas {
                loyalty_on_follow: 3,
                conscience_on_follow: -2,
                loyalty_on_violate: -5,
                conscience_on_violate: 3,
            },
        }
    }

    #[test]
    fn test_adjust_clamps_and_reports_only_real_changes() {
        let mut tracker = ReputationTracker::new(95, 50);
        assert!(tracker.adjust_loyalty(20));
        assert_eq!(tracker.loyalty(), 100);
        assert!(!tracker.adjust_loyalty(5));

        assert!(!tracker.adjust_inequality(-10));
        assert_eq!(tracker.inequality(), 0);

        let changes = tracker.drain_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_value, 95);
        assert_eq!(changes[0].new_value, 100);
        assert!(tracker.drain_changes().is_empty());
    }

    #[test]
    fn test_inequality_upper_bound() {
        let mut tracker = ReputationTracker::default();
        tracker.adjust_inequality(500);
        assert_eq!(tracker.inequality(), INEQUALITY_MAX);
    }

    #[test]
    fn test_following_unethical_rule_raises_inequality() {
        let mut tracker = ReputationTracker::default();
        tracker.on_rule_followed(&rule(false));
        assert_eq!(tracker.loyalty(), 53);
        assert_eq!(tracker.conscience(), 48);
        assert_eq!(tracker.inequality(), 2);
        assert_eq!(tracker.counters().discriminatory, 1);
    }

    #[test]
    fn test_following_ethical_rule_counts_fair() {
        let mut tracker = ReputationTracker::default();
        tracker.on_rule_followed(&rule(true));
        assert_eq!(tracker.inequality(), 0);
        assert_eq!(tracker.counters().fair, 1);
    }

    #[test]
    fn test_violating_unethical_rule() {
        let mut tracker = ReputationTracker::default();
        tracker.adjust_inequality(4);
        tracker.on_rule_violated(&rule(false));
        assert_eq!(tracker.loyalty(), 45);
        assert_eq!(tracker.conscience(), 53);
        assert_eq!(tracker.inequality(), 3);
        assert_eq!(tracker.counters().fair, 1);
    }

    #[test]
    fn test_bias_reinforced_decision() {
        let mut tracker = ReputationTracker::default();
        tracker.record_bias_reinforced_decision();
        assert_eq!(tracker.inequality(), 3);
        assert_eq!(tracker.counters().bias_reinforced, 1);
    }

    #[test]
    fn test_discriminatory_decision() {
        let mut tracker = ReputationTracker::default();
        tracker.record_discriminatory_decision();
        tracker.record_discriminatory_decision();
        assert_eq!(tracker.inequality(), 4);
        assert_eq!(tracker.counters().discriminatory, 2);
        assert_eq!(tracker.counters().fair, 0);
    }

    #[test]
    fn test_mood_cascade_order() {
        assert_eq!(mood_for(20, 20), Mood::Crisis);
        assert_eq!(mood_for(75, 75), Mood::HighLoyalty);
        assert_eq!(mood_for(50, 70), Mood::HighConscience);
        assert_eq!(mood_for(50, 50), Mood::Balanced);
        assert_eq!(mood_for(39, 60), Mood::Balanced);
    }

    #[test]
    fn test_ending_scenarios() {
        assert_eq!(ending_for(85, 20), EndingOutcome::CorporateDog);
        assert_eq!(ending_for(20, 85), EndingOutcome::Martyr);
        assert_eq!(ending_for(40, 85), EndingOutcome::Revolutionary);
        assert_eq!(ending_for(90, 90), EndingOutcome::Revolutionary);
        assert_eq!(ending_for(30, 30), EndingOutcome::Downfall);
        assert_eq!(ending_for(60, 60), EndingOutcome::Balance);
    }

    #[test]
    fn test_tracker_ending_matches_pure_function() {
        let mut tracker = ReputationTracker::new(85, 20);
        assert_eq!(tracker.determine_ending(), EndingOutcome::CorporateDog);
        assert_eq!(tracker.determine_ending(), tracker.determine_ending());
        tracker.adjust_conscience(70);
        assert_eq!(tracker.determine_ending(), EndingOutcome::Revolutionary);
    }
}

//! Canonical decision resolution for case records

pub mod resolver;
pub mod rule_eval;

pub use resolver::{
    baseline_score, match_rules, resolve, score_based_decision, Resolution, ResolutionBasis,
    RuleMatch, APPROVAL_SCORE,
};
pub use rule_eval::{evaluate_condition, rule_applies};

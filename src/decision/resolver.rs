//! Canonical decision resolution
//!
//! A record with an injected error is always rejected. Otherwise the active
//! rules are walked in the order given (highest priority first), and when no
//! rule enforces a decision the baseline score decides.

use crate::cases::CaseRecord;
use crate::core::types::{Decision, UniversityTier};
use crate::decision::rule_eval::rule_applies;
use crate::rules::HiringRule;

/// Minimum baseline score for approval
pub const APPROVAL_SCORE: i32 = 60;

pub const REASON_MEETS_BASELINE: &str = "Meets the baseline evaluation criteria.";
pub const REASON_BELOW_BASELINE: &str = "Falls short of the baseline evaluation criteria.";

/// What fixed the canonical decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionBasis {
    DocumentError,
    Rule,
    Score,
}

/// Outcome of matching a record against the active rules
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'a> {
    /// Last rule that enforced a decision
    pub primary_rule: Option<&'a HiringRule>,
    pub applied_rules: Vec<&'a HiringRule>,
    pub decision: Option<Decision>,
    pub is_ethical: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    pub decision: Decision,
    pub primary_rule: Option<&'a HiringRule>,
    pub applied_rules: Vec<&'a HiringRule>,
    pub is_ethical: bool,
    pub basis: ResolutionBasis,
}

impl Resolution<'_> {
    /// Human-readable justification for the canonical decision
    pub fn reason(&self, record: &CaseRecord) -> String {
        match self.basis {
            ResolutionBasis::DocumentError => {
                let field = record
                    .error
                    .as_ref()
                    .map_or("unknown", |e| e.field.as_str());
                format!("Document error found: {}", field)
            }
            ResolutionBasis::Rule => self
                .primary_rule
                .map(|r| r.description.clone())
                .unwrap_or_default(),
            ResolutionBasis::Score => match self.decision {
                Decision::Approve => REASON_MEETS_BASELINE.to_string(),
                Decision::Reject => REASON_BELOW_BASELINE.to_string(),
            },
        }
    }
}

/// Match rules against a record, ignoring any injected error.
///
/// Non-terminal matches keep overwriting the decision, so the lowest
/// priority non-terminal match survives unless a terminal rule with an
/// enforced decision stops the walk first.
pub fn match_rules<'a>(record: &CaseRecord, active_rules: &[&'a HiringRule]) -> RuleMatch<'a> {
    let mut result = RuleMatch {
        primary_rule: None,
        applied_rules: Vec::new(),
        decision: None,
        is_ethical: true,
    };

    for &rule in active_rules {
        if !rule_applies(rule, record) {
            continue;
        }

        result.applied_rules.push(rule);

        if let Some(enforced) = rule.enforced_decision {
            result.decision = Some(enforced);
            result.primary_rule = Some(rule);

            if !rule.ethical {
                result.is_ethical = false;
            }

            if rule.rule_type.is_terminal() {
                break;
            }
        }
    }

    result
}

/// Canonical decision for a record against today's active rules
pub fn resolve<'a>(record: &CaseRecord, active_rules: &[&'a HiringRule]) -> Resolution<'a> {
    if record.has_error() {
        return Resolution {
            decision: Decision::Reject,
            primary_rule: None,
            applied_rules: Vec::new(),
            is_ethical: true,
            basis: ResolutionBasis::DocumentError,
        };
    }

    let matched = match_rules(record, active_rules);
    match matched.decision {
        Some(decision) => Resolution {
            decision,
            primary_rule: matched.primary_rule,
            applied_rules: matched.applied_rules,
            is_ethical: matched.is_ethical,
            basis: ResolutionBasis::Rule,
        },
        None => Resolution {
            decision: score_based_decision(record),
            primary_rule: None,
            applied_rules: matched.applied_rules,
            is_ethical: matched.is_ethical,
            basis: ResolutionBasis::Score,
        },
    }
}

/// Baseline points for education, grades, experience and documents
pub fn baseline_score(record: &CaseRecord) -> i32 {
    let mut score = match record.university_tier {
        UniversityTier::VNU => 40,
        UniversityTier::CIT => 35,
        UniversityTier::Mid => 25,
        UniversityTier::CCC => 15,
    };

    score += if record.gpa >= 4.0 {
        30
    } else if record.gpa >= 3.5 {
        20
    } else if record.gpa >= 3.0 {
        10
    } else {
        0
    };

    score += match record.experience_months {
        m if m >= 36 => 30,
        m if m >= 24 => 20,
        m if m >= 12 => 10,
        _ => 0,
    };

    if record.has_recommendation() {
        score += 10;
    }
    if record.has_criminal_record() {
        score -= 50;
    }

    score
}

pub fn score_based_decision(record: &CaseRecord) -> Decision {
    if baseline_score(record) >= APPROVAL_SCORE {
        Decision::Approve
    } else {
        Decision::Reject
    }
}

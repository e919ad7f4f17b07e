//! Condition evaluation against case records
//!
//! Every evaluation is total. Literals that cannot be parsed for the
//! field's type make the condition false and log a warning.

use tracing::warn;

use crate::cases::CaseRecord;
use crate::rules::{Condition, ConditionField, ConditionOperator, HiringRule};

/// Tolerance for GPA equality
pub const GPA_EPSILON: f32 = 1e-4;

/// True when every condition holds. An empty condition list never matches.
pub fn rule_applies(rule: &HiringRule, record: &CaseRecord) -> bool {
    !rule.conditions.is_empty() && rule.conditions.iter().all(|c| evaluate_condition(c, record))
}

pub fn evaluate_condition(condition: &Condition, record: &CaseRecord) -> bool {
    let op = condition.operator;
    let literal = condition.value.as_str();

    match condition.field {
        ConditionField::Region => evaluate_categorical(op, record.region.as_str(), literal),
        ConditionField::UniversityTier => {
            evaluate_categorical(op, record.university_tier.as_str(), literal)
        }
        ConditionField::University => evaluate_text(op, &record.university, literal),
        ConditionField::Major => evaluate_text(op, &record.major, literal),
        ConditionField::GPA => match literal.trim().parse::<f32>() {
            Ok(expected) => evaluate_gpa(op, record.gpa, expected),
            Err(_) => malformed(condition),
        },
        ConditionField::Experience => match literal.trim().parse::<i64>() {
            Ok(expected) => evaluate_int(op, record.experience_months as i64, expected),
            Err(_) => malformed(condition),
        },
        ConditionField::Age => match literal.trim().parse::<i64>() {
            Ok(expected) => evaluate_int(op, record.age as i64, expected),
            Err(_) => malformed(condition),
        },
        ConditionField::HasCriminalRecord => match parse_bool(literal) {
            Some(expected) => evaluate_flag(op, record.has_criminal_record(), expected),
            None => malformed(condition),
        },
        ConditionField::HasRecommendation => match parse_bool(literal) {
            Some(expected) => evaluate_flag(op, record.has_recommendation(), expected),
            None => malformed(condition),
        },
    }
}

fn malformed(condition: &Condition) -> bool {
    warn!(
        field = condition.field.as_str(),
        value = %condition.value,
        "Condition literal cannot be parsed for field; treating as false"
    );
    false
}

fn parse_bool(literal: &str) -> Option<bool> {
    let trimmed = literal.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn evaluate_categorical(op: ConditionOperator, actual: &str, expected: &str) -> bool {
    match op {
        ConditionOperator::Equals => actual == expected,
        ConditionOperator::NotEquals => actual != expected,
        _ => false,
    }
}

fn evaluate_text(op: ConditionOperator, actual: &str, expected: &str) -> bool {
    match op {
        ConditionOperator::Contains => actual.contains(expected),
        _ => evaluate_categorical(op, actual, expected),
    }
}

fn evaluate_gpa(op: ConditionOperator, actual: f32, expected: f32) -> bool {
    let equal = (actual - expected).abs() <= GPA_EPSILON;
    match op {
        ConditionOperator::Equals => equal,
        ConditionOperator::NotEquals => !equal,
        ConditionOperator::GreaterThan => actual > expected,
        ConditionOperator::LessThan => actual < expected,
        ConditionOperator::GreaterOrEqual => actual >= expected,
        ConditionOperator::LessOrEqual => actual <= expected,
        ConditionOperator::Contains => false,
    }
}

fn evaluate_int(op: ConditionOperator, actual: i64, expected: i64) -> bool {
    match op {
        ConditionOperator::Equals => actual == expected,
        ConditionOperator::NotEquals => actual != expected,
        ConditionOperator::GreaterThan => actual > expected,
        ConditionOperator::LessThan => actual < expected,
        ConditionOperator::GreaterOrEqual => actual >= expected,
        ConditionOperator::LessOrEqual => actual <= expected,
        ConditionOperator::Contains => false,
    }
}

fn evaluate_flag(op: ConditionOperator, actual: bool, expected: bool) -> bool {
    match op {
        ConditionOperator::Equals => actual == expected,
        ConditionOperator::NotEquals => actual != expected,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cases::record::fixtures::sample_record;
    use crate::cases::BackgroundCheck;
    use crate::core::types::{Region, RuleType};
    use crate::rules::{ActivationWindow, ImpactDeltas};

    fn cond(field: ConditionField, op: ConditionOperator, value: &str) -> Condition {
        Condition::new(field, op, value)
    }

    #[test]
    fn test_region_equals_and_not_equals() {
        let record = sample_record();
        assert!(evaluate_condition(
            &cond(ConditionField::Region, ConditionOperator::Equals, "Libra"),
            &record
        ));
        assert!(evaluate_condition(
            &cond(ConditionField::Region, ConditionOperator::NotEquals, "Corvus"),
            &record
        ));
    }

    #[test]
    fn test_categorical_rejects_ordering_operators() {
        let record = sample_record();
        assert!(!evaluate_condition(
            &cond(ConditionField::UniversityTier, ConditionOperator::GreaterThan, "CCC"),
            &record
        ));
    }

    #[test]
    fn test_major_contains() {
        let record = sample_record();
        assert!(evaluate_condition(
            &cond(ConditionField::Major, ConditionOperator::Contains, "conom"),
            &record
        ));
        assert!(!evaluate_condition(
            &cond(ConditionField::Major, ConditionOperator::Contains, "Law"),
            &record
        ));
    }

    #[test]
    fn test_gpa_equality_is_tolerant() {
        let mut record = sample_record();
        record.gpa = 3.1 + 0.1;
        assert!(evaluate_condition(
            &cond(ConditionField::GPA, ConditionOperator::Equals, "3.2"),
            &record
        ));
        assert!(evaluate_condition(
            &cond(ConditionField::GPA, ConditionOperator::LessThan, "3.5"),
            &record
        ));
    }

    #[test]
    fn test_integer_comparisons() {
        let mut record = sample_record();
        record.experience_months = 36;
        assert!(evaluate_condition(
            &cond(ConditionField::Experience, ConditionOperator::GreaterOrEqual, "36"),
            &record
        ));
        assert!(!evaluate_condition(
            &cond(ConditionField::Experience, ConditionOperator::GreaterThan, "36"),
            &record
        ));
        assert!(evaluate_condition(
            &cond(ConditionField::Age, ConditionOperator::LessOrEqual, "28"),
            &record
        ));
    }

    #[test]
    fn test_malformed_boolean_fails_closed() {
        let mut record = sample_record();
        record.background_check = Some(BackgroundCheck { has_criminal_record: true });
        assert!(!evaluate_condition(
            &cond(ConditionField::HasCriminalRecord, ConditionOperator::Equals, "yes"),
            &record
        ));
        assert!(evaluate_condition(
            &cond(ConditionField::HasCriminalRecord, ConditionOperator::Equals, "True"),
            &record
        ));
    }

    #[test]
    fn test_malformed_number_fails_closed() {
        let record = sample_record();
        assert!(!evaluate_condition(
            &cond(ConditionField::Age, ConditionOperator::NotEquals, "old"),
            &record
        ));
    }

    #[test]
    fn test_empty_conditions_never_match() {
        let rule = HiringRule {
            id: "empty".to_string(),
            name: "empty".to_string(),
            rule_type: RuleType::Prohibition,
            window: ActivationWindow::new(1, None),
            description: String::new(),
            ethical: true,
            conditions: vec![],
            enforced_decision: None,
            priority: 1,
            impact: ImpactDeltas::default(),
        };
        let mut record = sample_record();
        record.region = Region::Corvus;
        assert!(!rule_applies(&rule, &record));
    }
}

//! Load the hiring rule catalog from TOML

use std::fs;
use std::path::Path;

use ahash::AHashSet;
use tracing::info;

use crate::core::error::{DeskError, Result};
use crate::core::types::{parse_enforced_decision, Day, RuleType};
use crate::rules::hiring_rules::{
    ActivationWindow, Condition, ConditionField, ConditionOperator, HiringRule, ImpactDeltas,
    RuleCatalog,
};

const BUILTIN_RULES: &str = include_str!("../../data/rules.toml");

/// Load a rule catalog from a TOML file on disk
pub fn load_rule_catalog(path: &Path) -> Result<RuleCatalog> {
    let content = fs::read_to_string(path)?;
    parse_rule_catalog(&content)
}

/// The catalog shipped with the crate
pub fn builtin_rule_catalog() -> Result<RuleCatalog> {
    parse_rule_catalog(BUILTIN_RULES)
}

/// Parse `[[rules]]` entries in file order
pub fn parse_rule_catalog(content: &str) -> Result<RuleCatalog> {
    let toml: toml::Value = content.parse()?;

    let mut catalog = RuleCatalog::new();
    let mut seen = AHashSet::new();

    if let Some(rules) = toml.get("rules").and_then(|v| v.as_array()) {
        for rule in rules {
            let parsed = parse_rule(rule)?;
            if !seen.insert(parsed.id.clone()) {
                return Err(DeskError::RuleData(format!("duplicate rule id '{}'", parsed.id)));
            }
            catalog.insert(parsed);
        }
    }

    info!(count = catalog.len(), "Loaded hiring rules");
    Ok(catalog)
}

fn parse_rule(value: &toml::Value) -> Result<HiringRule> {
    let id = value
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeskError::RuleData("rule missing id".into()))?
        .to_string();

    let name = value
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(id.as_str())
        .to_string();

    let type_str = value
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeskError::RuleData(format!("{}: rule missing type", id)))?;
    let rule_type: RuleType = type_str.parse()?;

    let from_day = value
        .get("from_day")
        .and_then(|v| v.as_integer())
        .ok_or_else(|| DeskError::RuleData(format!("{}: rule missing from_day", id)))?;
    let from_day = day_field(from_day, "from_day", &id)?;

    // -1 marks an open-ended window
    let to_day = match value.get("to_day").and_then(|v| v.as_integer()).unwrap_or(-1) {
        -1 => None,
        raw => {
            let to_day = day_field(raw, "to_day", &id)?;
            if to_day < from_day {
                return Err(DeskError::RuleData(format!(
                    "{}: to_day {} precedes from_day {}",
                    id, to_day, from_day
                )));
            }
            Some(to_day)
        }
    };

    let description = value
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let ethical = value
        .get("ethical")
        .and_then(|v| v.as_bool())
        .unwrap_or(true);

    let enforced_decision =
        parse_enforced_decision(value.get("enforced_decision").and_then(|v| v.as_str()).unwrap_or("None"))?;

    let priority = int_field(value, "priority", &id)?;

    let impact = ImpactDeltas {
        loyalty_on_follow: int_field(value, "loyalty_on_follow", &id)?,
        conscience_on_follow: int_field(value, "conscience_on_follow", &id)?,
        loyalty_on_violate: int_field(value, "loyalty_on_violate", &id)?,
        conscience_on_violate: int_field(value, "conscience_on_violate", &id)?,
    };

    let mut conditions = Vec::new();
    if let Some(list) = value.get("conditions").and_then(|v| v.as_array()) {
        for condition in list {
            conditions.push(parse_condition(condition, &id)?);
        }
    }

    Ok(HiringRule {
        id,
        name,
        rule_type,
        window: ActivationWindow::new(from_day, to_day),
        description,
        ethical,
        conditions,
        enforced_decision,
        priority,
        impact,
    })
}

fn day_field(raw: i64, key: &str, rule_id: &str) -> Result<Day> {
    Day::try_from(raw).map_err(|_| {
        DeskError::RuleData(format!("{}: {} {} is not a valid day", rule_id, key, raw))
    })
}

/// Optional integer; absent means 0
fn int_field(value: &toml::Value, key: &str, rule_id: &str) -> Result<i32> {
    let raw = value.get(key).and_then(|v| v.as_integer()).unwrap_or(0);
    i32::try_from(raw).map_err(|_| {
        DeskError::RuleData(format!("{}: {} {} out of range", rule_id, key, raw))
    })
}

fn parse_condition(value: &toml::Value, rule_id: &str) -> Result<Condition> {
    let field_str = value
        .get("field")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeskError::RuleData(format!("{}: condition missing field", rule_id)))?;
    let field = parse_field(field_str)
        .ok_or_else(|| DeskError::RuleData(format!("{}: unknown field '{}'", rule_id, field_str)))?;

    let op_str = value
        .get("operator")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeskError::RuleData(format!("{}: condition missing operator", rule_id)))?;
    let operator = parse_operator(op_str)
        .ok_or_else(|| DeskError::RuleData(format!("{}: unknown operator '{}'", rule_id, op_str)))?;

    // Literals stay textual; booleans and numbers are accepted unquoted too
    let literal = match value.get("value") {
        Some(toml::Value::String(s)) => s.clone(),
        Some(toml::Value::Boolean(b)) => b.to_string(),
        Some(toml::Value::Integer(i)) => i.to_string(),
        Some(toml::Value::Float(f)) => f.to_string(),
        _ => {
            return Err(DeskError::RuleData(format!(
                "{}: condition on {} missing value",
                rule_id, field_str
            )))
        }
    };

    Ok(Condition::new(field, operator, literal))
}

fn parse_field(s: &str) -> Option<ConditionField> {
    match s {
        "Region" => Some(ConditionField::Region),
        "UniversityTier" => Some(ConditionField::UniversityTier),
        "University" => Some(ConditionField::University),
        "Major" => Some(ConditionField::Major),
        "GPA" => Some(ConditionField::GPA),
        "Experience" => Some(ConditionField::Experience),
        "Age" => Some(ConditionField::Age),
        "HasCriminalRecord" => Some(ConditionField::HasCriminalRecord),
        "HasRecommendation" => Some(ConditionField::HasRecommendation),
        _ => None,
    }
}

fn parse_operator(s: &str) -> Option<ConditionOperator> {
    match s {
        "Equals" => Some(ConditionOperator::Equals),
        "NotEquals" => Some(ConditionOperator::NotEquals),
        "GreaterThan" => Some(ConditionOperator::GreaterThan),
        "LessThan" => Some(ConditionOperator::LessThan),
        "GreaterOrEqual" => Some(ConditionOperator::GreaterOrEqual),
        "LessOrEqual" => Some(ConditionOperator::LessOrEqual),
        "Contains" => Some(ConditionOperator::Contains),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Decision;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = builtin_rule_catalog().unwrap();
        assert!(!catalog.is_empty());

        let corvus = catalog.rule_by_id("rule_day7_corvus").unwrap();
        assert_eq!(corvus.rule_type, RuleType::Preference);
        assert_eq!(corvus.window, ActivationWindow::new(7, Some(11)));
        assert!(!corvus.ethical);
        assert_eq!(corvus.enforced_decision, Some(Decision::Reject));
        assert_eq!(corvus.impact.conscience_on_violate, 3);
    }

    #[test]
    fn test_open_ended_window_from_minus_one() {
        let catalog = builtin_rule_catalog().unwrap();
        let vnu = catalog.rule_by_id("rule_day13_vnu").unwrap();
        assert_eq!(vnu.window.to_day, None);
        assert_eq!(vnu.rule_type, RuleType::Priority);
    }

    #[test]
    fn test_parse_minimal_rule() {
        let content = r#"
            [[rules]]
            id = "r1"
            type = "Prohibition"
            from_day = 2
            to_day = 4
            enforced_decision = "Reject"
            priority = 9

            [[rules.conditions]]
            field = "HasCriminalRecord"
            operator = "Equals"
            value = true
        "#;

        let catalog = parse_rule_catalog(content).unwrap();
        let rule = &catalog.all_rules()[0];
        assert_eq!(rule.name, "r1");
        assert!(rule.ethical);
        assert_eq!(rule.conditions.len(), 1);
        assert_eq!(rule.conditions[0].value, "true");
        assert_eq!(rule.impact, ImpactDeltas::default());
    }

    #[test]
    fn test_unknown_rule_type_is_error() {
        let content = r#"
            [[rules]]
            id = "r1"
            type = "Whim"
            from_day = 1
        "#;
        assert!(matches!(
            parse_rule_catalog(content),
            Err(DeskError::UnknownValue(_))
        ));
    }

    #[test]
    fn test_unknown_field_is_error() {
        let content = r#"
            [[rules]]
            id = "r1"
            type = "Basic"
            from_day = 1

            [[rules.conditions]]
            field = "Height"
            operator = "Equals"
            value = "180"
        "#;
        assert!(matches!(parse_rule_catalog(content), Err(DeskError::RuleData(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let content = r#"
            [[rules]]
            id = "same"
            type = "Basic"
            from_day = 1

            [[rules]]
            id = "same"
            type = "Basic"
            from_day = 2
        "#;
        assert!(matches!(parse_rule_catalog(content), Err(DeskError::RuleData(_))));
    }

    #[test]
    fn test_out_of_range_integers_rejected() {
        let huge_priority = r#"
            [[rules]]
            id = "r1"
            type = "Basic"
            from_day = 1
            priority = 4294967296
        "#;
        assert!(matches!(parse_rule_catalog(huge_priority), Err(DeskError::RuleData(_))));

        let huge_delta = r#"
            [[rules]]
            id = "r1"
            type = "Basic"
            from_day = 1
            loyalty_on_violate = -3000000000
        "#;
        assert!(matches!(parse_rule_catalog(huge_delta), Err(DeskError::RuleData(_))));

        let huge_day = r#"
            [[rules]]
            id = "r1"
            type = "Basic"
            from_day = 4294967297
        "#;
        assert!(matches!(parse_rule_catalog(huge_day), Err(DeskError::RuleData(_))));

        let negative_day = r#"
            [[rules]]
            id = "r1"
            type = "Basic"
            from_day = -2
        "#;
        assert!(matches!(parse_rule_catalog(negative_day), Err(DeskError::RuleData(_))));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let content = r#"
            [[rules]]
            id = "r1"
            type = "Basic"
            from_day = 8
            to_day = 3
        "#;
        assert!(matches!(parse_rule_catalog(content), Err(DeskError::RuleData(_))));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/rules.toml");
        let catalog = load_rule_catalog(&path).unwrap();
        assert_eq!(catalog.len(), builtin_rule_catalog().unwrap().len());

        let missing = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/no_such_rules.toml");
        assert!(matches!(load_rule_catalog(&missing), Err(DeskError::IoError(_))));
    }
}

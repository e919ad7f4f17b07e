//! Hiring rules loaded from TOML

pub mod hiring_rules;
mod loader;

pub use hiring_rules::{
    ActivationWindow, Condition, ConditionField, ConditionOperator, HiringRule, ImpactDeltas,
    RuleCatalog,
};
pub use loader::{builtin_rule_catalog, load_rule_catalog, parse_rule_catalog};

//! Persisted session state
//!
//! Pure data; reading and writing files is left to the caller.

use serde::{Deserialize, Serialize};

use crate::core::config::{FINAL_TABLE_DAY, INEQUALITY_MAX, PARAM_MAX, PARAM_MIN};
use crate::core::error::{DeskError, Result};
use crate::core::types::Day;
use crate::economy::EconomyTotals;
use crate::progression::CumulativeStats;
use crate::reputation::FairnessCounters;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Day the session resumes on
    pub current_day: Day,
    pub loyalty: i32,
    pub conscience: i32,
    pub inequality: i32,
    pub fairness: FairnessCounters,
    pub economy: EconomyTotals,
    pub cumulative: CumulativeStats,
}

impl SessionSnapshot {
    pub fn validate(&self) -> Result<()> {
        if !(1..=FINAL_TABLE_DAY).contains(&self.current_day) {
            return Err(DeskError::InvalidSnapshot(format!(
                "current_day {} outside 1..={}",
                self.current_day, FINAL_TABLE_DAY
            )));
        }

        let axis = PARAM_MIN..=PARAM_MAX;
        if !axis.contains(&self.loyalty) {
            return Err(DeskError::InvalidSnapshot(format!(
                "loyalty {} outside {}..={}",
                self.loyalty, PARAM_MIN, PARAM_MAX
            )));
        }
        if !axis.contains(&self.conscience) {
            return Err(DeskError::InvalidSnapshot(format!(
                "conscience {} outside {}..={}",
                self.conscience, PARAM_MIN, PARAM_MAX
            )));
        }
        if !(PARAM_MIN..=INEQUALITY_MAX).contains(&self.inequality) {
            return Err(DeskError::InvalidSnapshot(format!(
                "inequality {} outside {}..={}",
                self.inequality, PARAM_MIN, INEQUALITY_MAX
            )));
        }

        if self.cumulative.correct > self.cumulative.total {
            return Err(DeskError::InvalidSnapshot(
                "more correct decisions than total decisions".into(),
            ));
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SessionSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            current_day: 4,
            loyalty: 55,
            conscience: 48,
            inequality: 6,
            fairness: FairnessCounters {
                discriminatory: 1,
                fair: 3,
                bias_reinforced: 0,
            },
            economy: EconomyTotals {
                total_earnings: 540_000,
                total_expenses: 520_000,
                period_earnings: 0,
                period_expenses: 0,
                balance: 1_020_000,
                work_days_this_period: 0,
            },
            cumulative: CumulativeStats {
                correct: 20,
                total: 24,
            },
        }
    }

    #[test]
    fn test_json_preserves_snapshot() {
        let original = snapshot();
        let json = original.to_json().unwrap();
        assert!(json.contains("\"current_day\": 4"));
        assert_eq!(SessionSnapshot::from_json(&json).unwrap(), original);
    }

    #[test]
    fn test_out_of_range_day_rejected() {
        let mut bad = snapshot();
        bad.current_day = 17;
        assert!(matches!(bad.validate(), Err(DeskError::InvalidSnapshot(_))));
        bad.current_day = 0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_out_of_range_axes_rejected() {
        let mut bad = snapshot();
        bad.inequality = 201;
        assert!(bad.validate().is_err());

        let mut bad = snapshot();
        bad.loyalty = -1;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            SessionSnapshot::from_json("{\"current_day\": 3"),
            Err(DeskError::SerdeError(_))
        ));
    }
}

//! Ending texts and end-of-session statistics

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::types::{Day, EndingOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingText {
    pub outcome: EndingOutcome,
    pub title: String,
    pub story: String,
    pub summary: String,
    pub message: String,
}

/// One text per outcome; a later entry for the same outcome replaces the earlier
#[derive(Debug, Clone, Default)]
pub struct EndingCatalog {
    endings: AHashMap<EndingOutcome, EndingText>,
}

impl EndingCatalog {
    pub fn new(endings: Vec<EndingText>) -> Self {
        Self {
            endings: endings.into_iter().map(|e| (e.outcome, e)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.endings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endings.is_empty()
    }

    pub fn get(&self, outcome: EndingOutcome) -> Option<&EndingText> {
        let found = self.endings.get(&outcome);
        if found.is_none() {
            warn!(?outcome, "Ending text not found");
        }
        found
    }
}

/// Figures shown next to the ending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingStatistics {
    pub final_loyalty: i32,
    pub final_conscience: i32,
    pub final_inequality: i32,
    pub total_earnings: i64,
    pub final_balance: i64,
    pub days_worked: Day,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ending_returns_none() {
        let catalog = EndingCatalog::new(vec![EndingText {
            outcome: EndingOutcome::Balance,
            title: "Balance".to_string(),
            story: String::new(),
            summary: String::new(),
            message: String::new(),
        }]);
        assert!(catalog.get(EndingOutcome::Balance).is_some());
        assert!(catalog.get(EndingOutcome::Martyr).is_none());
    }
}

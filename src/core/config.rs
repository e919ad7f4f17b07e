//! Session configuration with documented constants
//!
//! Economy and pacing numbers live in [`GameConfig`] and may be overridden
//! from TOML. The day tables and the ending thresholds are fixed.

use serde::Deserialize;

use crate::core::error::{DeskError, Result};
use crate::core::types::Day;

/// Documents to process per day. Index 0 is unused.
pub const DAILY_DOCUMENT_TARGETS: [u32; 17] =
    [0, 8, 8, 8, 10, 10, 10, 12, 12, 12, 15, 15, 15, 18, 18, 18, 20];

/// Chance that a generated case carries an injected error. Index 0 is unused.
pub const DAILY_ERROR_RATES: [f32; 17] = [
    0.0, 0.2, 0.2, 0.2, 0.3, 0.3, 0.3, 0.35, 0.35, 0.35, 0.4, 0.4, 0.4, 0.45, 0.45, 0.45, 0.5,
];

/// Last day covered by the day tables
pub const FINAL_TABLE_DAY: Day = 16;

// === REPUTATION BOUNDS ===
pub const PARAM_MIN: i32 = 0;
pub const PARAM_MAX: i32 = 100;
pub const INEQUALITY_MAX: i32 = 200;

// === ENDING THRESHOLDS ===
pub const VERY_LOW_THRESHOLD: i32 = 30;
pub const LOW_THRESHOLD: i32 = 40;
pub const MID_THRESHOLD: i32 = 50;
pub const MID_HIGH_THRESHOLD: i32 = 70;
pub const HIGH_THRESHOLD: i32 = 80;

/// Target document count for a day; 0 outside the table.
pub fn daily_target(day: Day) -> u32 {
    if (1..=FINAL_TABLE_DAY).contains(&day) {
        DAILY_DOCUMENT_TARGETS[day as usize]
    } else {
        0
    }
}

/// Error injection rate for a day; 0.0 outside the table.
pub fn daily_error_rate(day: Day) -> f32 {
    if (1..=FINAL_TABLE_DAY).contains(&day) {
        DAILY_ERROR_RATES[day as usize]
    } else {
        0.0
    }
}

/// Configuration for a desk session
///
/// Money is in won. Changing these affects pay and the settlement cadence,
/// never the canonical answers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === PACING ===
    /// Number of working days in a session
    ///
    /// Cannot exceed the day tables (16).
    pub total_days: Day,

    /// Every Nth day triggers inner thoughts, family talk and settlement
    pub family_talk_interval: Day,

    // === PAY ===
    /// Flat pay for showing up
    pub base_daily_salary: i64,

    /// Added per correct decision
    pub correct_bonus: i64,

    /// Subtracted per wrong decision
    pub error_penalty: i64,

    /// Floor for the daily salary after penalties
    pub minimum_wage: i64,

    /// Accuracy at or above which the day grants a loyalty bump
    /// and the settlement pays the performance bonus
    pub performance_threshold: f32,

    /// Loyalty granted by a high-accuracy day
    pub accuracy_loyalty_bump: i32,

    // === HOUSEHOLD ===
    /// Balance at the start of a new session
    pub starting_balance: i64,

    pub monthly_rent: i64,
    pub monthly_living: i64,
    pub monthly_education: i64,

    /// Spread across settlements like the expenses
    pub monthly_performance_bonus: i64,

    // === GENERATION ===
    /// Year used to derive graduation years (year - 2..=10)
    pub calendar_year: i32,

    // === REPUTATION ===
    pub starting_loyalty: i32,
    pub starting_conscience: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_days: 16,
            family_talk_interval: 3,

            base_daily_salary: 150_000,
            correct_bonus: 5_000,
            error_penalty: 10_000,
            minimum_wage: 50_000,
            performance_threshold: 0.95,
            accuracy_loyalty_bump: 2,

            starting_balance: 1_000_000,
            monthly_rent: 1_200_000,
            monthly_living: 1_000_000,
            monthly_education: 400_000,
            monthly_performance_bonus: 500_000,

            calendar_year: 2025,

            starting_loyalty: 50,
            starting_conscience: 50,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides from TOML; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn total_monthly_expense(&self) -> i64 {
        self.monthly_rent + self.monthly_living + self.monthly_education
    }

    /// Number of settlements in a full session (16 / 3 = 5)
    pub fn settlements_per_session(&self) -> i64 {
        (self.total_days / self.family_talk_interval).max(1) as i64
    }

    /// Expense charged at each settlement
    pub fn settlement_expense(&self) -> i64 {
        self.total_monthly_expense() / self.settlements_per_session()
    }

    /// Bonus paid at a settlement when accuracy qualifies
    pub fn settlement_bonus(&self) -> i64 {
        self.monthly_performance_bonus / self.settlements_per_session()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.total_days == 0 || self.total_days > FINAL_TABLE_DAY {
            return Err(DeskError::InvalidConfig(format!(
                "total_days ({}) must be within 1..={}",
                self.total_days, FINAL_TABLE_DAY
            )));
        }

        if self.family_talk_interval == 0 {
            return Err(DeskError::InvalidConfig(
                "family_talk_interval must be positive".into(),
            ));
        }

        if self.minimum_wage > self.base_daily_salary {
            return Err(DeskError::InvalidConfig(format!(
                "minimum_wage ({}) should be <= base_daily_salary ({})",
                self.minimum_wage, self.base_daily_salary
            )));
        }

        if !(0.0..=1.0).contains(&self.performance_threshold) {
            return Err(DeskError::InvalidConfig(format!(
                "performance_threshold ({}) must be within 0..=1",
                self.performance_threshold
            )));
        }

        let axis = PARAM_MIN..=PARAM_MAX;
        if !axis.contains(&self.starting_loyalty) || !axis.contains(&self.starting_conscience) {
            return Err(DeskError::InvalidConfig(
                "starting loyalty/conscience must be within 0..=100".into(),
            ));
        }

        Ok(())
    }
}

//! Household ledger: salary in, settlements out

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceStatus {
    Comfortable,
    Stable,
    Modest,
    Tight,
    InDebt,
}

impl BalanceStatus {
    pub fn for_balance(balance: i64) -> Self {
        match balance {
            b if b >= 5_000_000 => BalanceStatus::Comfortable,
            b if b >= 2_000_000 => BalanceStatus::Stable,
            b if b >= 500_000 => BalanceStatus::Modest,
            b if b >= 0 => BalanceStatus::Tight,
            _ => BalanceStatus::InDebt,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BalanceStatus::Comfortable => "Comfortable",
            BalanceStatus::Stable => "Stable",
            BalanceStatus::Modest => "Modest",
            BalanceStatus::Tight => "Tight",
            BalanceStatus::InDebt => "In debt",
        }
    }
}

/// Ledger totals; this is also the persisted economy block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyTotals {
    pub total_earnings: i64,
    pub total_expenses: i64,
    pub period_earnings: i64,
    pub period_expenses: i64,
    pub balance: i64,
    pub work_days_this_period: u32,
}

/// Result of a periodic settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementReport {
    /// Earnings of the period, bonus included
    pub period_earnings: i64,
    pub expense: i64,
    pub bonus: Option<i64>,
    pub balance: i64,
}

/// Daily pay before crediting: `max(minimum_wage, base + correct*bonus - errors*penalty)`
pub fn daily_salary(config: &GameConfig, correct: u32, total: u32) -> i64 {
    let errors = total.saturating_sub(correct) as i64;
    let salary =
        config.base_daily_salary + correct as i64 * config.correct_bonus - errors * config.error_penalty;
    salary.max(config.minimum_wage)
}

#[derive(Debug, Clone)]
pub struct EconomyLedger {
    totals: EconomyTotals,
}

impl EconomyLedger {
    pub fn new(starting_balance: i64) -> Self {
        Self {
            totals: EconomyTotals {
                total_earnings: 0,
                total_expenses: 0,
                period_earnings: 0,
                period_expenses: 0,
                balance: starting_balance,
                work_days_this_period: 0,
            },
        }
    }

    pub fn from_totals(totals: EconomyTotals) -> Self {
        Self { totals }
    }

    pub fn totals(&self) -> EconomyTotals {
        self.totals
    }

    pub fn balance(&self) -> i64 {
        self.totals.balance
    }

    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::for_balance(self.totals.balance)
    }

    /// Credit a day's pay and count the work day
    pub fn add_daily_salary(&mut self, amount: i64) {
        self.credit(amount);
        self.totals.work_days_this_period += 1;
        info!(amount, balance = self.totals.balance, "Daily salary added");
    }

    fn credit(&mut self, amount: i64) {
        self.totals.period_earnings += amount;
        self.totals.total_earnings += amount;
        self.totals.balance += amount;
    }

    /// Debit an expense; the balance may go negative
    pub fn pay_expense(&mut self, amount: i64, description: &str) {
        if self.totals.balance < amount {
            warn!(
                needed = amount,
                balance = self.totals.balance,
                description,
                "Insufficient balance for expense"
            );
        }

        self.totals.period_expenses += amount;
        self.totals.total_expenses += amount;
        self.totals.balance -= amount;
        info!(amount, description, balance = self.totals.balance, "Expense paid");
    }

    /// Pay the period's share of household costs, credit the bonus if earned,
    /// and start a new period.
    pub fn settle(&mut self, config: &GameConfig, bonus_earned: bool) -> SettlementReport {
        let expense = config.settlement_expense();
        self.pay_expense(expense, "rent and living costs");

        let bonus = if bonus_earned {
            let bonus = config.settlement_bonus();
            self.credit(bonus);
            info!(bonus, "Performance bonus paid");
            Some(bonus)
        } else {
            None
        };

        let report = SettlementReport {
            period_earnings: self.totals.period_earnings,
            expense,
            bonus,
            balance: self.totals.balance,
        };

        self.totals.period_earnings = 0;
        self.totals.period_expenses = 0;
        self.totals.work_days_this_period = 0;
        report
    }
}

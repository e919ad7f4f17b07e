//! Salary and household economy

pub mod ledger;

pub use ledger::{daily_salary, BalanceStatus, EconomyLedger, EconomyTotals, SettlementReport};

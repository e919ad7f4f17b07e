//! Equality Corp - hiring desk simulation
//!
//! A player reviews synthetic applicant records across a sixteen-day
//! session. Time-scoped hiring rules decide the expected verdict, every
//! call moves the loyalty, conscience and inequality axes, salary and
//! household expenses run through a ledger, and the final axes pick one
//! of five endings.

pub mod cases;
pub mod core;
pub mod decision;
pub mod economy;
pub mod narrative;
pub mod progression;
pub mod reputation;
pub mod rules;
pub mod session;

pub use crate::core::config::GameConfig;
pub use crate::core::error::{DeskError, Result};
pub use crate::core::types::{Decision, EndingOutcome, Mood, Region};
pub use crate::session::{GameSession, SessionEvent, SessionSnapshot};

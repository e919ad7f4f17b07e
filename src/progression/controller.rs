//! Day/phase state machine
//!
//! The controller only sequences phases and keeps the decision counters.
//! Work attached to entering a phase (emails, cases, pay, family beats,
//! settlement, ending) is performed by the session that owns it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::{daily_target, GameConfig};
use crate::core::error::{DeskError, Result};
use crate::core::types::Day;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    DayStart,
    EmailBriefing,
    DocumentReview,
    DailyReport,
    InnerThoughts,
    FamilyTalk,
    DayEnd,
    FinalChoice,
    Ending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    /// Day after the transition
    pub day: Day,
}

/// Decision counters for one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub processed: u32,
    pub correct: u32,
}

impl DayStats {
    pub fn errors(&self) -> u32 {
        self.processed - self.correct
    }

    /// Share of correct decisions; 0.0 before any decision
    pub fn accuracy(&self) -> f32 {
        if self.processed == 0 {
            0.0
        } else {
            self.correct as f32 / self.processed as f32
        }
    }
}

/// Decision counters across the whole session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativeStats {
    pub correct: u32,
    pub total: u32,
}

impl CumulativeStats {
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 / self.total as f32
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressionController {
    phase: Phase,
    day: Day,
    total_days: Day,
    family_interval: Day,
    today: DayStats,
    cumulative: CumulativeStats,
}

impl ProgressionController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: Phase::DayStart,
            day: 1,
            total_days: config.total_days,
            family_interval: config.family_talk_interval.max(1),
            today: DayStats::default(),
            cumulative: CumulativeStats::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn total_days(&self) -> Day {
        self.total_days
    }

    pub fn today(&self) -> DayStats {
        self.today
    }

    pub fn cumulative(&self) -> CumulativeStats {
        self.cumulative
    }

    /// Documents required today
    pub fn target(&self) -> u32 {
        daily_target(self.day)
    }

    pub fn is_final_day(&self) -> bool {
        self.day >= self.total_days
    }

    /// Inner thoughts, family talk and settlement run on these days
    pub fn is_family_day(&self) -> bool {
        self.day % self.family_interval == 0
    }

    pub fn review_complete(&self) -> bool {
        self.today.processed >= self.target()
    }

    fn successor(&self) -> Result<Phase> {
        let next = match self.phase {
            Phase::DayStart => Phase::EmailBriefing,
            Phase::EmailBriefing => Phase::DocumentReview,
            Phase::DocumentReview => {
                if !self.review_complete() {
                    return Err(DeskError::ReviewIncomplete {
                        processed: self.today.processed,
                        target: self.target(),
                    });
                }
                Phase::DailyReport
            }
            Phase::DailyReport => {
                if self.is_family_day() {
                    Phase::InnerThoughts
                } else {
                    Phase::DayEnd
                }
            }
            Phase::InnerThoughts => Phase::FamilyTalk,
            Phase::FamilyTalk => Phase::DayEnd,
            Phase::DayEnd => {
                if self.is_final_day() {
                    Phase::FinalChoice
                } else {
                    Phase::DayStart
                }
            }
            Phase::FinalChoice => Phase::Ending,
            Phase::Ending => return Err(DeskError::SessionFinished),
        };
        Ok(next)
    }

    /// Take one transition from the current phase
    pub fn advance(&mut self) -> Result<PhaseTransition> {
        let next = self.successor()?;
        Ok(self.enter(next))
    }

    fn enter(&mut self, next: Phase) -> PhaseTransition {
        let from = self.phase;

        if from == Phase::DayEnd && next == Phase::DayStart {
            self.day += 1;
        }
        if next == Phase::DayStart {
            self.today = DayStats::default();
        }

        self.phase = next;
        debug!(?from, to = ?next, day = self.day, "Phase changed");
        PhaseTransition {
            from,
            to: next,
            day: self.day,
        }
    }

    /// Count an adjudication. Reaching the day's target moves to the report.
    pub fn record_decision(&mut self, correct: bool) -> Result<Option<PhaseTransition>> {
        if self.phase != Phase::DocumentReview {
            return Err(DeskError::WrongPhase {
                expected: Phase::DocumentReview,
                actual: self.phase,
            });
        }

        self.today.processed += 1;
        self.cumulative.total += 1;
        if correct {
            self.today.correct += 1;
            self.cumulative.correct += 1;
        }

        if self.review_complete() {
            Ok(Some(self.enter(Phase::DailyReport)))
        } else {
            Ok(None)
        }
    }

    /// Resume at the start of `day` with prior cumulative counters
    pub fn restore(&mut self, day: Day, cumulative: CumulativeStats) {
        self.day = day;
        self.phase = Phase::DayStart;
        self.today = DayStats::default();
        self.cumulative = cumulative;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ProgressionController {
        ProgressionController::new(&GameConfig::default())
    }

    fn finish_review(controller: &mut ProgressionController) {
        let target = controller.target();
        for _ in 0..target {
            controller.record_decision(true).unwrap();
        }
    }

    #[test]
    fn test_first_day_sequence_without_family() {
        let mut c = controller();
        assert_eq!(c.advance().unwrap().to, Phase::EmailBriefing);
        assert_eq!(c.advance().unwrap().to, Phase::DocumentReview);
        finish_review(&mut c);
        assert_eq!(c.phase(), Phase::DailyReport);
        assert_eq!(c.advance().unwrap().to, Phase::DayEnd);

        let next_day = c.advance().unwrap();
        assert_eq!(next_day.to, Phase::DayStart);
        assert_eq!(next_day.day, 2);
        assert_eq!(c.today(), DayStats::default());
    }

    #[test]
    fn test_family_day_visits_narrative_phases() {
        let mut c = controller();
        c.restore(3, CumulativeStats::default());
        c.advance().unwrap();
        c.advance().unwrap();
        finish_review(&mut c);
        assert_eq!(c.advance().unwrap().to, Phase::InnerThoughts);
        assert_eq!(c.advance().unwrap().to, Phase::FamilyTalk);
        assert_eq!(c.advance().unwrap().to, Phase::DayEnd);
    }

    #[test]
    fn test_review_cannot_be_skipped() {
        let mut c = controller();
        c.advance().unwrap();
        c.advance().unwrap();
        c.record_decision(true).unwrap();
        assert!(matches!(
            c.advance(),
            Err(DeskError::ReviewIncomplete { processed: 1, target: 8 })
        ));
    }

    #[test]
    fn test_decision_outside_review_rejected() {
        let mut c = controller();
        assert!(matches!(
            c.record_decision(true),
            Err(DeskError::WrongPhase { .. })
        ));
    }

    #[test]
    fn test_target_reached_moves_to_report() {
        let mut c = controller();
        c.advance().unwrap();
        c.advance().unwrap();
        for _ in 0..7 {
            assert!(c.record_decision(false).unwrap().is_none());
        }
        let transition = c.record_decision(true).unwrap().unwrap();
        assert_eq!(transition.to, Phase::DailyReport);
        assert_eq!(c.today().errors(), 7);
        assert!((c.today().accuracy() - 0.125).abs() < f32::EPSILON);
    }

    #[test]
    fn test_final_day_leads_to_ending() {
        let mut c = controller();
        c.restore(16, CumulativeStats::default());
        c.advance().unwrap();
        c.advance().unwrap();
        finish_review(&mut c);
        assert_eq!(c.advance().unwrap().to, Phase::DayEnd);
        assert_eq!(c.advance().unwrap().to, Phase::FinalChoice);
        assert_eq!(c.advance().unwrap().to, Phase::Ending);
        assert!(matches!(c.advance(), Err(DeskError::SessionFinished)));
        assert_eq!(c.day(), 16);
    }

    #[test]
    fn test_cumulative_accuracy() {
        let stats = CumulativeStats { correct: 19, total: 20 };
        assert!((stats.accuracy() - 0.95).abs() < f32::EPSILON);
        assert_eq!(CumulativeStats::default().accuracy(), 0.0);
    }
}

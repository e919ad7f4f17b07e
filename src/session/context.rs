//! Game session: owns every subsystem and runs phase entry work
//!
//! All commands are synchronous. Anything the presentation layer needs to
//! react to is queued as a [`SessionEvent`] and drained with
//! [`GameSession::drain_events`].

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::cases::{CaseFile, CaseGenerator, CaseRecord, ContentPools};
use crate::core::config::GameConfig;
use crate::core::error::{DeskError, Result};
use crate::core::types::{CaseId, Day, Decision, EndingOutcome, Mood};
use crate::decision::match_rules;
use crate::economy::{daily_salary, EconomyLedger};
use crate::narrative::{
    relationship_status, EndingStatistics, EndingText, FamilyDialogue, Inbox, NarrativeCatalog,
};
use crate::progression::{Phase, PhaseTransition, ProgressionController};
use crate::reputation::ReputationTracker;
use crate::rules::{builtin_rule_catalog, HiringRule, RuleCatalog};
use crate::session::events::{EventQueue, SessionEvent};
use crate::session::snapshot::SessionSnapshot;

/// Loyalty granted for a correct call when no rule applied
pub const LOYALTY_ON_CORRECT_BASELINE: i32 = 1;
/// Loyalty lost for a wrong call when no rule applied
pub const LOYALTY_ON_WRONG_BASELINE: i32 = -2;

/// Outcome of a submitted decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjudication {
    pub case_id: CaseId,
    pub decision: Decision,
    pub canonical: Decision,
    pub correct: bool,
    pub reason: String,
    /// Rule whose follow/violate impact was applied
    pub primary_rule: Option<String>,
}

pub struct GameSession {
    config: GameConfig,
    catalog: RuleCatalog,
    generator: CaseGenerator,
    narrative: NarrativeCatalog,
    reputation: ReputationTracker,
    economy: EconomyLedger,
    progression: ProgressionController,
    seed: u64,
    rng: ChaCha8Rng,
    inbox: Inbox,
    pending_cases: VecDeque<CaseFile>,
    current_case: Option<CaseFile>,
    current_dialogue: Option<FamilyDialogue>,
    /// State at the start of the day a reload would replay
    resume_point: SessionSnapshot,
    ending: Option<EndingOutcome>,
    events: EventQueue,
}

impl GameSession {
    pub fn new(
        config: GameConfig,
        catalog: RuleCatalog,
        pools: ContentPools,
        narrative: NarrativeCatalog,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;

        let reputation = ReputationTracker::new(config.starting_loyalty, config.starting_conscience);
        let economy = EconomyLedger::new(config.starting_balance);
        let progression = ProgressionController::new(&config);
        let resume_point = capture(progression.day(), &reputation, &economy, &progression);

        let mut session = Self {
            generator: CaseGenerator::new(pools, config.calendar_year),
            reputation,
            economy,
            progression,
            config,
            catalog,
            narrative,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            inbox: Inbox::default(),
            pending_cases: VecDeque::new(),
            current_case: None,
            current_dialogue: None,
            resume_point,
            ending: None,
            events: EventQueue::new(),
        };
        session.start_new_session();
        Ok(session)
    }

    /// Session using the rules and content shipped with the crate
    pub fn with_builtin_content(config: GameConfig, seed: u64) -> Result<Self> {
        Self::new(
            config,
            builtin_rule_catalog()?,
            ContentPools::builtin()?,
            NarrativeCatalog::builtin()?,
            seed,
        )
    }

    // === COMMANDS ===

    /// Reset everything to day 1 and reseed the generator
    pub fn start_new_session(&mut self) {
        self.reputation =
            ReputationTracker::new(self.config.starting_loyalty, self.config.starting_conscience);
        self.economy = EconomyLedger::new(self.config.starting_balance);
        self.progression = ProgressionController::new(&self.config);
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.clear_day_state();
        self.resume_point = self.snapshot_for_day(self.progression.day());
        self.ending = None;
        self.events.clear();

        info!(seed = self.seed, rules = self.catalog.len(), "New session started");
    }

    /// Take exactly one phase transition and run the new phase's entry work
    pub fn advance_phase(&mut self) -> Result<PhaseTransition> {
        let transition = self.progression.advance()?;
        self.after_transition(transition);
        Ok(transition)
    }

    /// Step phases until the next day starts, the final choice or ending is
    /// reached, or document review is waiting for decisions.
    pub fn advance_day(&mut self) -> Result<Vec<PhaseTransition>> {
        let mut transitions = Vec::new();
        loop {
            let transition = self.advance_phase()?;
            transitions.push(transition);

            let waiting_for_review =
                transition.to == Phase::DocumentReview && !self.progression.review_complete();
            if waiting_for_review
                || matches!(transition.to, Phase::DayStart | Phase::FinalChoice | Phase::Ending)
            {
                return Ok(transitions);
            }
        }
    }

    /// Adjudicate the case under review
    pub fn submit_decision(&mut self, decision: Decision) -> Result<Adjudication> {
        if self.progression.phase() != Phase::DocumentReview {
            return Err(DeskError::WrongPhase {
                expected: Phase::DocumentReview,
                actual: self.progression.phase(),
            });
        }
        let case = self.current_case.take().ok_or(DeskError::NoActiveCase)?;
        let correct = decision == case.canonical_decision;

        let primary_rule = {
            let active = self.catalog.active_rules_for_day(self.progression.day());
            let matched = match_rules(&case.record, &active);
            match matched.primary_rule {
                Some(rule) => {
                    if correct {
                        self.reputation.on_rule_followed(rule);
                    } else {
                        self.reputation.on_rule_violated(rule);
                    }
                    Some(rule.id.clone())
                }
                None => {
                    if correct {
                        self.reputation.adjust_loyalty(LOYALTY_ON_CORRECT_BASELINE);
                        self.reputation.record_fair_decision();
                    } else {
                        self.reputation.adjust_loyalty(LOYALTY_ON_WRONG_BASELINE);
                    }
                    None
                }
            }
        };

        let adjudication = Adjudication {
            case_id: case.record.id,
            decision,
            canonical: case.canonical_decision,
            correct,
            reason: case.reason.clone(),
            primary_rule,
        };

        self.events.push(SessionEvent::CaseAdjudicated {
            case_id: adjudication.case_id,
            decision,
            canonical: adjudication.canonical,
            correct,
        });
        self.flush_reputation();

        match self.progression.record_decision(correct)? {
            Some(transition) => self.after_transition(transition),
            None => self.present_next_case(),
        }

        Ok(adjudication)
    }

    /// Mark an email read; unknown or already-read ids are a no-op.
    pub fn read_email(&mut self, id: &str) -> bool {
        match self.inbox.mark_read(id) {
            Some(email) => {
                let event = SessionEvent::EmailRead {
                    id: email.id.clone(),
                    mandatory: email.mandatory,
                };
                self.events.push(event);
                true
            }
            None => {
                warn!(email_id = id, "Email not found or already read");
                false
            }
        }
    }

    /// Persisted data for the day a reload resumes on: the last DayEnd save,
    /// or the session start. Progress made since then is not included.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.resume_point.clone()
    }

    /// Replace session state with a validated snapshot, resuming at the
    /// start of its day. On error nothing changes.
    pub fn load_snapshot(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        snapshot.validate()?;
        if snapshot.current_day > self.config.total_days {
            return Err(DeskError::InvalidSnapshot(format!(
                "current_day {} beyond session length {}",
                snapshot.current_day, self.config.total_days
            )));
        }

        self.reputation.restore(
            snapshot.loyalty,
            snapshot.conscience,
            snapshot.inequality,
            snapshot.fairness,
        );
        self.economy = EconomyLedger::from_totals(snapshot.economy);
        self.progression
            .restore(snapshot.current_day, snapshot.cumulative);
        self.clear_day_state();
        self.ending = None;
        self.resume_point = snapshot.clone();

        info!(day = snapshot.current_day, "Snapshot loaded");
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    // === QUERIES ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.progression.phase()
    }

    pub fn day(&self) -> Day {
        self.progression.day()
    }

    pub fn progression(&self) -> &ProgressionController {
        &self.progression
    }

    pub fn reputation(&self) -> &ReputationTracker {
        &self.reputation
    }

    pub fn economy(&self) -> &EconomyLedger {
        &self.economy
    }

    pub fn rule_catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn active_rules(&self) -> Vec<&HiringRule> {
        self.catalog.active_rules_for_day(self.progression.day())
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub fn current_case(&self) -> Option<&CaseFile> {
        self.current_case.as_ref()
    }

    pub fn current_record(&self) -> Option<&CaseRecord> {
        self.current_case.as_ref().map(|c| &c.record)
    }

    /// Cases still queued behind the current one
    pub fn remaining_cases(&self) -> usize {
        self.pending_cases.len()
    }

    pub fn current_dialogue(&self) -> Option<&FamilyDialogue> {
        self.current_dialogue.as_ref()
    }

    pub fn mood(&self) -> Mood {
        self.reputation.current_mood()
    }

    pub fn relationship_status(&self) -> &'static str {
        relationship_status(self.mood())
    }

    pub fn resume_point(&self) -> &SessionSnapshot {
        &self.resume_point
    }

    pub fn ending(&self) -> Option<EndingOutcome> {
        self.ending
    }

    pub fn ending_text(&self) -> Option<&EndingText> {
        self.ending.and_then(|outcome| self.narrative.endings.get(outcome))
    }

    pub fn ending_statistics(&self) -> EndingStatistics {
        let days_worked = match self.progression.phase() {
            Phase::FinalChoice | Phase::Ending => self.progression.day(),
            _ => self.progression.day() - 1,
        };
        let totals = self.economy.totals();
        EndingStatistics {
            final_loyalty: self.reputation.loyalty(),
            final_conscience: self.reputation.conscience(),
            final_inequality: self.reputation.inequality(),
            total_earnings: totals.total_earnings,
            final_balance: totals.balance,
            days_worked,
        }
    }

    // === PHASE ENTRY ===

    fn after_transition(&mut self, transition: PhaseTransition) {
        self.events.push(SessionEvent::PhaseChanged {
            from: transition.from,
            to: transition.to,
            day: transition.day,
        });

        match transition.to {
            Phase::DayStart => self.clear_day_state(),
            Phase::EmailBriefing => self.deliver_emails(),
            Phase::DocumentReview => self.open_review(),
            Phase::DailyReport => self.pay_salary(),
            Phase::InnerThoughts => self.show_inner_thoughts(),
            Phase::FamilyTalk => self.start_family_talk(),
            Phase::DayEnd => self.end_day(),
            Phase::FinalChoice => {}
            Phase::Ending => self.select_ending(),
        }
    }

    fn clear_day_state(&mut self) {
        self.inbox = Inbox::default();
        self.pending_cases.clear();
        self.current_case = None;
        self.current_dialogue = None;
    }

    fn deliver_emails(&mut self) {
        let day = self.progression.day();
        self.inbox = Inbox::for_day(&self.narrative.emails, day, self.progression.target());
        self.events.push(SessionEvent::EmailsReceived {
            day,
            count: self.inbox.len(),
            has_mandatory: self.inbox.mandatory().is_some(),
        });
    }

    fn open_review(&mut self) {
        let day = self.progression.day();
        let target = self.progression.target();
        let active = self.catalog.active_rules_for_day(day);
        let batch = self
            .generator
            .generate_batch(day, target, &active, &mut self.rng);

        info!(day, cases = batch.len(), rules = active.len(), "Document review opened");
        self.pending_cases = batch.into();
        self.present_next_case();
    }

    fn present_next_case(&mut self) {
        self.current_case = self.pending_cases.pop_front();
        if let Some(case) = &self.current_case {
            self.events.push(SessionEvent::CasePresented {
                record: Box::new(case.record.clone()),
            });
        }
    }

    fn pay_salary(&mut self) {
        let day = self.progression.day();
        let stats = self.progression.today();
        let amount = daily_salary(&self.config, stats.correct, stats.processed);
        let accuracy = stats.accuracy();

        self.economy.add_daily_salary(amount);
        info!(day, amount, accuracy, "Daily report");
        self.events.push(SessionEvent::SalaryPaid {
            day,
            amount,
            accuracy,
        });

        if accuracy >= self.config.performance_threshold {
            self.reputation
                .adjust_loyalty(self.config.accuracy_loyalty_bump);
            self.flush_reputation();
        }
    }

    fn find_dialogue(&self) -> Option<FamilyDialogue> {
        let day = self.progression.day();
        let mood = self.reputation.current_mood();
        let found = self.narrative.family.find(day, mood).cloned();
        if found.is_none() {
            warn!(day, ?mood, "No family dialogue for day; beat skipped");
        }
        found
    }

    fn show_inner_thoughts(&mut self) {
        self.current_dialogue = self.find_dialogue();
        if let Some(dialogue) = &self.current_dialogue {
            self.events.push(SessionEvent::InnerThought {
                day: dialogue.day,
                mood: dialogue.mood,
                text: dialogue.inner_thought.clone(),
            });
        }
    }

    fn start_family_talk(&mut self) {
        if self.current_dialogue.is_none() {
            self.current_dialogue = self.find_dialogue();
        }
        if let Some(dialogue) = &self.current_dialogue {
            self.events.push(SessionEvent::FamilyDialogue {
                day: dialogue.day,
                mood: dialogue.mood,
                spouse: dialogue.spouse.clone(),
                daughter: dialogue.daughter.clone(),
            });
        }
    }

    fn end_day(&mut self) {
        self.current_dialogue = None;

        if self.progression.is_family_day() {
            let bonus_earned =
                self.progression.cumulative().accuracy() >= self.config.performance_threshold;
            let report = self.economy.settle(&self.config, bonus_earned);
            info!(
                day = self.progression.day(),
                expense = report.expense,
                balance = report.balance,
                "Settlement"
            );
            self.events.push(SessionEvent::Settlement {
                expense: report.expense,
                bonus: report.bonus,
                balance: report.balance,
            });
        }

        // No day left to resume on; the final day keeps its start-of-day save
        if self.progression.is_final_day() {
            return;
        }
        let snapshot = self.snapshot_for_day(self.progression.day() + 1);
        self.resume_point = snapshot.clone();
        self.events.push(SessionEvent::SnapshotSaved { snapshot });
    }

    fn select_ending(&mut self) {
        let outcome = self.reputation.determine_ending();
        info!(?outcome, "Ending selected");
        self.ending = Some(outcome);
        self.events.push(SessionEvent::EndingSelected { outcome });
    }

    fn flush_reputation(&mut self) {
        for change in self.reputation.drain_changes() {
            self.events.push(SessionEvent::ReputationChanged {
                axis: change.axis,
                value: change.new_value,
            });
        }
    }

    fn snapshot_for_day(&self, day: Day) -> SessionSnapshot {
        capture(day, &self.reputation, &self.economy, &self.progression)
    }
}

fn capture(
    day: Day,
    reputation: &ReputationTracker,
    economy: &EconomyLedger,
    progression: &ProgressionController,
) -> SessionSnapshot {
    SessionSnapshot {
        current_day: day,
        loyalty: reputation.loyalty(),
        conscience: reputation.conscience(),
        inequality: reputation.inequality(),
        fairness: reputation.counters(),
        economy: economy.totals(),
        cumulative: progression.cumulative(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(seed: u64) -> GameSession {
        GameSession::with_builtin_content(GameConfig::default(), seed).unwrap()
    }

    fn play_review(session: &mut GameSession, by_the_book: bool) {
        while session.phase() == Phase::DocumentReview {
            let canonical = session.current_case().unwrap().canonical_decision;
            let decision = if by_the_book {
                canonical
            } else {
                match canonical {
                    Decision::Approve => Decision::Reject,
                    Decision::Reject => Decision::Approve,
                }
            };
            session.submit_decision(decision).unwrap();
        }
    }

    #[test]
    fn test_new_session_starts_on_day_one() {
        let s = session(1);
        assert_eq!(s.day(), 1);
        assert_eq!(s.phase(), Phase::DayStart);
        assert_eq!(s.reputation().loyalty(), 50);
        assert_eq!(s.economy().balance(), 1_000_000);
    }

    #[test]
    fn test_briefing_delivers_day_one_guideline() {
        let mut s = session(1);
        s.advance_phase().unwrap();
        assert_eq!(s.phase(), Phase::EmailBriefing);
        assert_eq!(s.inbox().len(), 1);
        assert!(!s.inbox().mandatory_read());

        let id = s.inbox().emails[0].email.id.clone();
        assert!(s.read_email(&id));
        assert!(!s.read_email(&id));
        assert!(s.inbox().mandatory_read());
    }

    #[test]
    fn test_review_presents_target_cases() {
        let mut s = session(2);
        let transitions = s.advance_day().unwrap();
        assert_eq!(transitions.last().unwrap().to, Phase::DocumentReview);
        assert!(s.current_case().is_some());
        assert_eq!(s.remaining_cases(), 7);

        let events = s.drain_events();
        let presented = events
            .iter()
            .filter(|e| matches!(e, SessionEvent::CasePresented { .. }))
            .count();
        assert_eq!(presented, 1);
    }

    #[test]
    fn test_submit_outside_review_rejected() {
        let mut s = session(3);
        assert!(matches!(
            s.submit_decision(Decision::Approve),
            Err(DeskError::WrongPhase { .. })
        ));
    }

    #[test]
    fn test_advance_day_blocked_by_pending_review() {
        let mut s = session(3);
        s.advance_day().unwrap();
        assert!(matches!(
            s.advance_day(),
            Err(DeskError::ReviewIncomplete { processed: 0, target: 8 })
        ));
    }

    #[test]
    fn test_perfect_day_pays_full_salary_and_bump() {
        let mut s = session(4);
        s.advance_day().unwrap();
        play_review(&mut s, true);
        assert_eq!(s.phase(), Phase::DailyReport);
        // 150000 + 8 * 5000
        assert_eq!(s.economy().balance(), 1_190_000);
        assert_eq!(s.progression().today().correct, 8);

        let transitions = s.advance_day().unwrap();
        assert_eq!(transitions.last().unwrap().to, Phase::DayStart);
        assert_eq!(s.day(), 2);
        assert_eq!(s.resume_point().current_day, 2);
        assert_eq!(s.snapshot().economy.total_earnings, 190_000);
    }

    #[test]
    fn test_midday_save_resumes_at_day_start() {
        let mut s = session(6);
        s.advance_day().unwrap();
        play_review(&mut s, true);
        assert_eq!(s.phase(), Phase::DailyReport);

        // Day 1 is not over yet, so the save is the session start
        let saved = s.snapshot();
        assert_eq!(saved.current_day, 1);
        assert_eq!(saved.economy.total_earnings, 0);
        assert_eq!(saved.cumulative.total, 0);

        let mut resumed = session(6);
        resumed.load_snapshot(&saved).unwrap();
        resumed.advance_day().unwrap();
        play_review(&mut resumed, true);

        assert_eq!(resumed.economy().totals(), s.economy().totals());
        assert_eq!(resumed.progression().cumulative(), s.progression().cumulative());
        assert_eq!(resumed.progression().cumulative().total, 8);
    }

    #[test]
    fn test_wrong_calls_cost_loyalty() {
        let mut s = session(5);
        s.advance_day().unwrap();
        play_review(&mut s, false);
        assert!(s.reputation().loyalty() < 50);
        assert_eq!(s.progression().today().correct, 0);
        // 150000 - 8 * 10000
        assert_eq!(s.economy().totals().total_earnings, 70_000);
    }

    #[test]
    fn test_load_snapshot_rejects_invalid_and_keeps_state() {
        let mut s = session(6);
        let before = s.snapshot();
        let mut bad = before.clone();
        bad.loyalty = 250;
        assert!(s.load_snapshot(&bad).is_err());
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_load_snapshot_resumes_day() {
        let mut s = session(7);
        let mut snapshot = s.snapshot();
        snapshot.current_day = 9;
        snapshot.loyalty = 72;
        s.load_snapshot(&snapshot).unwrap();
        assert_eq!(s.day(), 9);
        assert_eq!(s.phase(), Phase::DayStart);
        assert_eq!(s.reputation().loyalty(), 72);
    }
}

//! Events queued for the presentation layer

use serde::{Deserialize, Serialize};

use crate::cases::CaseRecord;
use crate::core::types::{CaseId, Day, Decision, EndingOutcome, Mood};
use crate::progression::Phase;
use crate::reputation::Axis;
use crate::session::snapshot::SessionSnapshot;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    // Flow
    PhaseChanged { from: Phase, to: Phase, day: Day },

    // Briefing
    EmailsReceived { day: Day, count: usize, has_mandatory: bool },
    EmailRead { id: String, mandatory: bool },

    // Review
    CasePresented { record: Box<CaseRecord> },
    CaseAdjudicated { case_id: CaseId, decision: Decision, canonical: Decision, correct: bool },
    ReputationChanged { axis: Axis, value: i32 },

    // Report
    SalaryPaid { day: Day, amount: i64, accuracy: f32 },
    Settlement { expense: i64, bonus: Option<i64>, balance: i64 },

    // Home
    InnerThought { day: Day, mood: Mood, text: String },
    FamilyDialogue { day: Day, mood: Mood, spouse: String, daughter: String },

    SnapshotSaved { snapshot: SessionSnapshot },
    EndingSelected { outcome: EndingOutcome },
}

/// FIFO queue drained synchronously by the caller
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SessionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

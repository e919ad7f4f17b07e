//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for generated cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub Uuid);

impl CaseId {
    /// Draw an id from the session RNG so a seed reproduces every id.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bytes: [u8; 16] = rng.gen();
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulation day, 1-based
pub type Day = u32;

/// Home region of an applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Eridanus,
    Corvus,
    Libra,
    Edea,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Eridanus, Region::Corvus, Region::Libra, Region::Edea];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Eridanus => "Eridanus",
            Region::Corvus => "Corvus",
            Region::Libra => "Libra",
            Region::Edea => "Edea",
        }
    }
}

/// Prestige tier of a university
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniversityTier {
    /// Veridia National University
    VNU,
    /// Centaurus Institute of Technology
    CIT,
    Mid,
    /// Corvus City College
    CCC,
}

impl UniversityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            UniversityTier::VNU => "VNU",
            UniversityTier::CIT => "CIT",
            UniversityTier::Mid => "Mid",
            UniversityTier::CCC => "CCC",
        }
    }
}

/// Adjudication outcome for a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Approve => "Approve",
            Decision::Reject => "Reject",
        }
    }
}

/// Kind of defect injected into a case record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InfoMismatch,
    MinorTypo,
    DateError,
    ForgeryDetected,
    RuleViolation,
}

/// Category of a hiring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleType {
    /// Objective screening rule
    Basic,
    /// Biased rule
    Preference,
    /// Unconditional approval
    Priority,
    /// Unconditional rejection
    Prohibition,
}

impl RuleType {
    /// Terminal rule types end evaluation on their first match.
    pub fn is_terminal(self) -> bool {
        matches!(self, RuleType::Prohibition | RuleType::Priority)
    }
}

/// Final narrative classification of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndingOutcome {
    CorporateDog,
    Downfall,
    Martyr,
    Revolutionary,
    Balance,
}

/// Household mood derived from the reputation axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    HighLoyalty,
    HighConscience,
    Balanced,
    Crisis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value: {}", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

fn unknown(kind: &'static str, s: &str) -> ParseEnumError {
    ParseEnumError {
        kind,
        value: s.to_string(),
    }
}

impl FromStr for Region {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Eridanus" => Ok(Region::Eridanus),
            "Corvus" => Ok(Region::Corvus),
            "Libra" => Ok(Region::Libra),
            "Edea" => Ok(Region::Edea),
            _ => Err(unknown("region", s)),
        }
    }
}

impl FromStr for UniversityTier {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VNU" => Ok(UniversityTier::VNU),
            "CIT" => Ok(UniversityTier::CIT),
            "Mid" => Ok(UniversityTier::Mid),
            "CCC" => Ok(UniversityTier::CCC),
            _ => Err(unknown("university tier", s)),
        }
    }
}

impl FromStr for RuleType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basic" => Ok(RuleType::Basic),
            "Preference" => Ok(RuleType::Preference),
            "Priority" => Ok(RuleType::Priority),
            "Prohibition" => Ok(RuleType::Prohibition),
            _ => Err(unknown("rule type", s)),
        }
    }
}

impl FromStr for EndingOutcome {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CorporateDog" => Ok(EndingOutcome::CorporateDog),
            "Downfall" => Ok(EndingOutcome::Downfall),
            "Martyr" => Ok(EndingOutcome::Martyr),
            "Revolutionary" => Ok(EndingOutcome::Revolutionary),
            "Balance" => Ok(EndingOutcome::Balance),
            _ => Err(unknown("ending", s)),
        }
    }
}

impl FromStr for Mood {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HighLoyalty" => Ok(Mood::HighLoyalty),
            "HighConscience" => Ok(Mood::HighConscience),
            "Balanced" => Ok(Mood::Balanced),
            "Crisis" => Ok(Mood::Crisis),
            _ => Err(unknown("mood", s)),
        }
    }
}

/// Parse an optional enforced decision; "None" and "" mean no enforcement.
pub fn parse_enforced_decision(s: &str) -> Result<Option<Decision>, ParseEnumError> {
    match s {
        "" | "None" => Ok(None),
        "Approve" => Ok(Some(Decision::Approve)),
        "Reject" => Ok(Some(Decision::Reject)),
        _ => Err(unknown("decision", s)),
    }
}

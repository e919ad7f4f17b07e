//! Applicant case records

use serde::{Deserialize, Serialize};

use crate::core::types::{CaseId, Decision, ErrorKind, Region, UniversityTier};
use crate::rules::ConditionField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Background check block, attached from day 8 onward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundCheck {
    pub has_criminal_record: bool,
}

/// Defect injected into a record
///
/// `original_value` holds the field's value before the transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub field: ConditionField,
    pub original_value: String,
}

/// A synthetic applicant file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: CaseId,

    // Personal
    pub full_name: String,
    pub gender: Gender,
    pub age: u32,
    pub region: Region,
    pub address: String,
    pub phone: String,

    // Education
    pub university: String,
    pub university_tier: UniversityTier,
    pub major: String,
    pub graduation_year: i32,
    pub gpa: f32,

    // Career
    pub previous_company: String,
    pub position: String,
    pub experience_months: u32,

    // Supporting documents
    pub background_check: Option<BackgroundCheck>,
    pub recommendation: Option<String>,
    pub certification: Option<String>,

    pub error: Option<ErrorDescriptor>,
}

impl CaseRecord {
    pub fn has_criminal_record(&self) -> bool {
        self.background_check
            .map_or(false, |check| check.has_criminal_record)
    }

    pub fn has_recommendation(&self) -> bool {
        self.recommendation.is_some()
    }

    pub fn has_certification(&self) -> bool {
        self.certification.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// "3y 4m" style duration, or months only under a year
    pub fn experience_duration(&self) -> String {
        let years = self.experience_months / 12;
        let months = self.experience_months % 12;
        if years > 0 {
            format!("{}y {}m", years, months)
        } else {
            format!("{}m", months)
        }
    }
}

/// A generated record plus the answer the desk is graded against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFile {
    pub record: CaseRecord,
    pub canonical_decision: Decision,
    pub reason: String,
}

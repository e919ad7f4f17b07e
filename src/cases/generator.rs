//! Procedural case generation
//!
//! Every draw comes from the caller's RNG, so a seeded `ChaCha8Rng`
//! reproduces a whole day of cases including their ids and injected errors.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::cases::pools::ContentPools;
use crate::cases::record::{BackgroundCheck, CaseFile, CaseRecord, ErrorDescriptor, Gender};
use crate::core::config::daily_error_rate;
use crate::core::types::{CaseId, Day, ErrorKind, Region, UniversityTier};
use crate::decision::resolve;
use crate::rules::{ConditionField, HiringRule};

/// Background checks are attached from this day on
pub const BACKGROUND_CHECK_FROM_DAY: Day = 8;
pub const CRIMINAL_RECORD_PERCENT: u32 = 5;
pub const RECOMMENDATION_PERCENT: u32 = 30;
pub const CERTIFICATION_PERCENT: u32 = 40;

pub const MIN_AGE: u32 = 25;
pub const MAX_AGE: u32 = 35;
pub const MAX_EXPERIENCE_MONTHS: u32 = 60;
pub const MIN_GPA: f32 = 2.0;
pub const MAX_GPA: f32 = 4.5;

/// Region every rule-violation error rewrites to
pub const DISADVANTAGED_REGION: Region = Region::Corvus;

/// Generates applicant files for a day
#[derive(Debug, Clone)]
pub struct CaseGenerator {
    pools: ContentPools,
    calendar_year: i32,
}

impl CaseGenerator {
    pub fn new(pools: ContentPools, calendar_year: i32) -> Self {
        Self {
            pools,
            calendar_year,
        }
    }

    pub fn pools(&self) -> &ContentPools {
        &self.pools
    }

    /// Generate a full case file with its canonical answer
    pub fn generate_case<R: Rng + ?Sized>(
        &self,
        day: Day,
        active_rules: &[&HiringRule],
        rng: &mut R,
    ) -> CaseFile {
        let mut record = self.generate_record(day, rng);

        if rng.gen::<f32>() < daily_error_rate(day) {
            inject_error(&mut record, day, rng);
        }

        let resolution = resolve(&record, active_rules);
        let reason = resolution.reason(&record);
        CaseFile {
            canonical_decision: resolution.decision,
            reason,
            record,
        }
    }

    /// Generate `count` case files for a day
    pub fn generate_batch<R: Rng + ?Sized>(
        &self,
        day: Day,
        count: u32,
        active_rules: &[&HiringRule],
        rng: &mut R,
    ) -> Vec<CaseFile> {
        (0..count)
            .map(|_| self.generate_case(day, active_rules, rng))
            .collect()
    }

    /// Draw a clean record; no error is injected here
    pub fn generate_record<R: Rng + ?Sized>(&self, day: Day, rng: &mut R) -> CaseRecord {
        let id = CaseId::generate(rng);

        // Personal
        let gender = if rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };
        let given_pool = match gender {
            Gender::Male => &self.pools.male_names,
            Gender::Female => &self.pools.female_names,
        };
        let full_name = format!(
            "{} {}",
            pick(&self.pools.surnames, rng, "Doe"),
            pick(given_pool, rng, "Applicant")
        );
        let age = rng.gen_range(MIN_AGE..=MAX_AGE);

        let (region, region_name) = match self.pools.regions.choose(rng) {
            Some(profile) => (profile.region, profile.display_name.clone()),
            None => {
                let region = Region::ALL[rng.gen_range(0..Region::ALL.len())];
                (region, region.as_str().to_string())
            }
        };
        let address = format!(
            "{} {}-gil {}",
            region_name,
            rng.gen_range(1..100),
            rng.gen_range(1..50)
        );
        let phone = format!(
            "010-{}-{}",
            rng.gen_range(1000..10000),
            rng.gen_range(1000..10000)
        );

        // Education
        let (university, university_tier) = match self.pools.universities.choose(rng) {
            Some(profile) => (profile.name.clone(), profile.tier),
            None => ("Unlisted University".to_string(), UniversityTier::Mid),
        };
        let major = pick(&self.pools.majors, rng, "General Studies");
        let graduation_year = self.calendar_year - rng.gen_range(2..=10);
        let gpa = round_gpa(rng.gen::<f64>() * 2.5 + 2.0);

        // Career
        let experience_months = rng.gen_range(0..=MAX_EXPERIENCE_MONTHS);
        let (previous_company, position) = if experience_months > 0 {
            (
                pick(&self.pools.companies, rng, "Unlisted Company"),
                pick(&self.pools.positions, rng, "Associate"),
            )
        } else {
            ("None".to_string(), "Entry level".to_string())
        };

        // Supporting documents
        let background_check = if day >= BACKGROUND_CHECK_FROM_DAY {
            Some(BackgroundCheck {
                has_criminal_record: rng.gen_range(0..100) < CRIMINAL_RECORD_PERCENT,
            })
        } else {
            None
        };
        let recommendation = (rng.gen_range(0..100) < RECOMMENDATION_PERCENT)
            .then(|| self.pools.recommendation_text.clone());
        let certification = (rng.gen_range(0..100) < CERTIFICATION_PERCENT)
            .then(|| self.pools.certification_name.clone());

        CaseRecord {
            id,
            full_name,
            gender,
            age,
            region,
            address,
            phone,
            university,
            university_tier,
            major,
            graduation_year,
            gpa,
            previous_company,
            position,
            experience_months,
            background_check,
            recommendation,
            certification,
            error: None,
        }
    }
}

fn pick<R: Rng + ?Sized>(pool: &[String], rng: &mut R, fallback: &str) -> String {
    pool.choose(rng)
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

fn round_gpa(raw: f64) -> f32 {
    ((raw * 100.0).round() / 100.0) as f32
}

/// Error kind for a day's difficulty band
pub fn choose_error_kind<R: Rng + ?Sized>(day: Day, rng: &mut R) -> ErrorKind {
    match day {
        0..=3 => ErrorKind::InfoMismatch,
        4..=9 => {
            if rng.gen_bool(0.5) {
                ErrorKind::MinorTypo
            } else {
                ErrorKind::DateError
            }
        }
        10..=15 => ErrorKind::ForgeryDetected,
        _ => ErrorKind::RuleViolation,
    }
}

/// Pick a day-appropriate error and apply it to the record
pub fn inject_error<R: Rng + ?Sized>(record: &mut CaseRecord, day: Day, rng: &mut R) {
    let kind = choose_error_kind(day, rng);
    apply_error(record, kind, rng);
}

/// Apply one transform, remembering the field's prior value
pub fn apply_error<R: Rng + ?Sized>(record: &mut CaseRecord, kind: ErrorKind, rng: &mut R) {
    let (field, original_value) = match kind {
        ErrorKind::InfoMismatch => {
            let original = record.age.to_string();
            record.age += rng.gen_range(5..=9);
            (ConditionField::Age, original)
        }
        ErrorKind::MinorTypo => {
            let original = record.major.clone();
            record.major = duplicated_suffix(&record.major);
            (ConditionField::Major, original)
        }
        ErrorKind::DateError => {
            let original = record.experience_months.to_string();
            record.experience_months += rng.gen_range(6..=11);
            (ConditionField::Experience, original)
        }
        ErrorKind::ForgeryDetected => {
            let original = format!("{:.2}", record.gpa);
            record.gpa = MAX_GPA;
            (ConditionField::GPA, original)
        }
        ErrorKind::RuleViolation => {
            let original = record.region.as_str().to_string();
            record.region = DISADVANTAGED_REGION;
            (ConditionField::Region, original)
        }
    };

    record.error = Some(ErrorDescriptor {
        kind,
        field,
        original_value,
    });
}

/// "Economics" -> "Economicscs"
fn duplicated_suffix(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = chars.len().saturating_sub(2);
    let suffix: String = chars[start..].iter().collect();
    format!("{}{}", text, suffix)
}

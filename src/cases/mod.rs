//! Applicant case records and their procedural generation

pub mod generator;
pub mod pools;
pub mod record;

pub use generator::{apply_error, choose_error_kind, inject_error, CaseGenerator};
pub use pools::{ContentPools, RegionProfile, UniversityProfile};
pub use record::{BackgroundCheck, CaseFile, CaseRecord, ErrorDescriptor, Gender};

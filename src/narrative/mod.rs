//! Emails, family beats and endings

pub mod emails;
pub mod endings;
pub mod family;
mod loader;

pub use emails::{EmailCatalog, EmailKind, EmailTemplate, Inbox, InboxEmail};
pub use endings::{EndingCatalog, EndingStatistics, EndingText};
pub use family::{relationship_status, FamilyCatalog, FamilyDialogue};
pub use loader::NarrativeCatalog;

//! Session orchestration, events and persisted snapshots

pub mod context;
pub mod events;
pub mod snapshot;

pub use context::{Adjudication, GameSession};
pub use events::{EventQueue, SessionEvent};
pub use snapshot::SessionSnapshot;

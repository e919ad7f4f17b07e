use thiserror::Error;

use crate::core::types::ParseEnumError;
use crate::progression::Phase;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Rule data error: {0}")]
    RuleData(String),

    #[error("Content data error: {0}")]
    ContentData(String),

    #[error("Unknown value: {0}")]
    UnknownValue(#[from] ParseEnumError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("No case is under review")]
    NoActiveCase,

    #[error("Command not valid during {actual:?} (expected {expected:?})")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("Document review incomplete: {processed}/{target} processed")]
    ReviewIncomplete { processed: u32, target: u32 },

    #[error("Session already reached its ending")]
    SessionFinished,

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeskError>;

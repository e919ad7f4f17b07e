//! Load emails, family dialogue and endings from TOML

use std::fs;
use std::path::Path;

use tracing::info;

use crate::core::error::{DeskError, Result};
use crate::core::types::{Day, EndingOutcome, Mood};
use crate::narrative::emails::{EmailCatalog, EmailKind, EmailTemplate};
use crate::narrative::endings::{EndingCatalog, EndingText};
use crate::narrative::family::{FamilyCatalog, FamilyDialogue};

const BUILTIN_NARRATIVE: &str = include_str!("../../data/narrative.toml");

/// All narrative content for a session
#[derive(Debug, Clone, Default)]
pub struct NarrativeCatalog {
    pub emails: EmailCatalog,
    pub family: FamilyCatalog,
    pub endings: EndingCatalog,
}

impl NarrativeCatalog {
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_NARRATIVE)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let toml: toml::Value = content.parse()?;

        let mut emails = Vec::new();
        if let Some(list) = toml.get("emails").and_then(|v| v.as_array()) {
            for entry in list {
                emails.push(parse_email(entry)?);
            }
        }

        let mut dialogues = Vec::new();
        if let Some(list) = toml.get("family").and_then(|v| v.as_array()) {
            for entry in list {
                dialogues.push(parse_dialogue(entry)?);
            }
        }

        let mut endings = Vec::new();
        if let Some(list) = toml.get("endings").and_then(|v| v.as_array()) {
            for entry in list {
                endings.push(parse_ending(entry)?);
            }
        }

        info!(
            emails = emails.len(),
            dialogues = dialogues.len(),
            endings = endings.len(),
            "Loaded narrative content"
        );

        Ok(Self {
            emails: EmailCatalog::new(emails),
            family: FamilyCatalog::new(dialogues),
            endings: EndingCatalog::new(endings),
        })
    }
}

fn required_str<'a>(value: &'a toml::Value, key: &str, context: &str) -> Result<&'a str> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| DeskError::ContentData(format!("{}: missing {}", context, key)))
}

fn optional_string(value: &toml::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

fn parse_email(value: &toml::Value) -> Result<EmailTemplate> {
    let id = required_str(value, "id", "email")?.to_string();
    let kind: EmailKind = required_str(value, "kind", &id)?.parse()?;

    let day = match value.get("day").and_then(|v| v.as_integer()).unwrap_or(-1) {
        -1 => None,
        d if d >= 1 => Some(d as Day),
        d => {
            return Err(DeskError::ContentData(format!(
                "{}: invalid day {}",
                id, d
            )))
        }
    };

    Ok(EmailTemplate {
        kind,
        day,
        sender: optional_string(value, "sender"),
        sender_title: optional_string(value, "sender_title"),
        subject: required_str(value, "subject", &id)?.to_string(),
        body: optional_string(value, "body"),
        mandatory: value
            .get("mandatory")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        id,
    })
}

fn parse_dialogue(value: &toml::Value) -> Result<FamilyDialogue> {
    let id = required_str(value, "id", "family dialogue")?.to_string();
    let mood: Mood = required_str(value, "mood", &id)?.parse()?;
    let day = value
        .get("day")
        .and_then(|v| v.as_integer())
        .filter(|d| *d >= 1)
        .ok_or_else(|| DeskError::ContentData(format!("{}: missing or invalid day", id)))?
        as Day;

    Ok(FamilyDialogue {
        mood,
        day,
        inner_thought: optional_string(value, "inner_thought"),
        spouse: optional_string(value, "spouse"),
        daughter: optional_string(value, "daughter"),
        id,
    })
}

fn parse_ending(value: &toml::Value) -> Result<EndingText> {
    let outcome: EndingOutcome = required_str(value, "outcome", "ending")?.parse()?;
    let context = format!("{:?}", outcome);

    Ok(EndingText {
        outcome,
        title: required_str(value, "title", &context)?.to_string(),
        story: optional_string(value, "story"),
        summary: optional_string(value, "summary"),
        message: optional_string(value, "message"),
    })
}

//! Morning email briefing

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{Day, ParseEnumError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmailKind {
    WorkGuideline,
    CompanyNews,
    ExternalNews,
    PersonalMail,
}

impl FromStr for EmailKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WorkGuideline" => Ok(EmailKind::WorkGuideline),
            "CompanyNews" => Ok(EmailKind::CompanyNews),
            "ExternalNews" => Ok(EmailKind::ExternalNews),
            "PersonalMail" => Ok(EmailKind::PersonalMail),
            _ => Err(ParseEnumError {
                kind: "email kind",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EmailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmailKind::WorkGuideline => "Work guideline",
            EmailKind::CompanyNews => "Company news",
            EmailKind::ExternalNews => "External news",
            EmailKind::PersonalMail => "Personal",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: String,
    pub kind: EmailKind,
    /// `None` delivers on every day
    pub day: Option<Day>,
    pub sender: String,
    pub sender_title: String,
    pub subject: String,
    pub body: String,
    pub mandatory: bool,
}

impl EmailTemplate {
    pub fn is_active_on_day(&self, day: Day) -> bool {
        self.day.map_or(true, |d| d == day)
    }

    /// Mandatory guideline used when nothing else is scheduled for the day
    pub fn daily_fallback(day: Day, target: u32) -> Self {
        Self {
            id: format!("fallback_email_day{}", day),
            kind: EmailKind::WorkGuideline,
            day: None,
            sender: "Human Resources".to_string(),
            sender_title: "System Administrator".to_string(),
            subject: format!("Day {} work guideline", day),
            body: format!(
                "Good morning.\n\nDay {} of hiring review begins.\n\nToday's target: {} files.\n\nPress start when you are ready.",
                day, target
            ),
            mandatory: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmailCatalog {
    templates: Vec<EmailTemplate>,
}

impl EmailCatalog {
    pub fn new(templates: Vec<EmailTemplate>) -> Self {
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn emails_for_day(&self, day: Day) -> impl Iterator<Item = &EmailTemplate> {
        self.templates.iter().filter(move |t| t.is_active_on_day(day))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxEmail {
    pub email: EmailTemplate,
    pub read: bool,
}

/// Emails delivered for one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbox {
    pub day: Day,
    pub emails: Vec<InboxEmail>,
}

impl Inbox {
    /// Build the day's inbox, synthesizing a guideline when nothing applies
    pub fn for_day(catalog: &EmailCatalog, day: Day, target: u32) -> Self {
        let mut emails: Vec<InboxEmail> = catalog
            .emails_for_day(day)
            .map(|email| InboxEmail {
                email: email.clone(),
                read: false,
            })
            .collect();

        if emails.is_empty() {
            debug!(day, "No scheduled email; using fallback guideline");
            emails.push(InboxEmail {
                email: EmailTemplate::daily_fallback(day, target),
                read: false,
            });
        }

        Self { day, emails }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    /// Mark an email read. Returns the email when this call changed it.
    pub fn mark_read(&mut self, id: &str) -> Option<&EmailTemplate> {
        let entry = self
            .emails
            .iter_mut()
            .find(|e| e.email.id == id && !e.read)?;
        entry.read = true;
        Some(&entry.email)
    }

    pub fn unread_count(&self) -> usize {
        self.emails.iter().filter(|e| !e.read).count()
    }

    pub fn mandatory(&self) -> Option<&InboxEmail> {
        self.emails.iter().find(|e| e.email.mandatory)
    }

    /// True when there is no mandatory email or it has been read
    pub fn mandatory_read(&self) -> bool {
        self.emails
            .iter()
            .filter(|e| e.email.mandatory)
            .all(|e| e.read)
    }

    pub fn by_kind(&self, kind: EmailKind) -> impl Iterator<Item = &InboxEmail> {
        self.emails.iter().filter(move |e| e.email.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, day: Option<Day>, mandatory: bool) -> EmailTemplate {
        EmailTemplate {
            id: id.to_string(),
            kind: EmailKind::CompanyNews,
            day,
            sender: "s".to_string(),
            sender_title: "t".to_string(),
            subject: "subj".to_string(),
            body: "body".to_string(),
            mandatory,
        }
    }

    #[test]
    fn test_every_day_email_always_delivered() {
        let catalog = EmailCatalog::new(vec![template("daily", None, false)]);
        assert_eq!(catalog.emails_for_day(1).count(), 1);
        assert_eq!(catalog.emails_for_day(9).count(), 1);
    }

    #[test]
    fn test_fallback_when_nothing_scheduled() {
        let catalog = EmailCatalog::new(vec![template("d2", Some(2), false)]);
        let inbox = Inbox::for_day(&catalog, 5, 10);
        assert_eq!(inbox.len(), 1);
        let email = &inbox.emails[0].email;
        assert!(email.mandatory);
        assert_eq!(email.kind, EmailKind::WorkGuideline);
        assert!(email.body.contains("10 files"));
    }

    #[test]
    fn test_mark_read_once() {
        let catalog = EmailCatalog::new(vec![
            template("a", Some(1), true),
            template("b", Some(1), false),
        ]);
        let mut inbox = Inbox::for_day(&catalog, 1, 8);
        assert_eq!(inbox.unread_count(), 2);
        assert!(!inbox.mandatory_read());

        assert!(inbox.mark_read("a").is_some());
        assert!(inbox.mark_read("a").is_none());
        assert!(inbox.mark_read("missing").is_none());
        assert_eq!(inbox.unread_count(), 1);
        assert!(inbox.mandatory_read());
    }
}

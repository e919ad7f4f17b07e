//! Inner thoughts and family dialogue beats

use serde::{Deserialize, Serialize};

use crate::core::types::{Day, Mood};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyDialogue {
    pub id: String,
    pub mood: Mood,
    pub day: Day,
    pub inner_thought: String,
    pub spouse: String,
    pub daughter: String,
}

#[derive(Debug, Clone, Default)]
pub struct FamilyCatalog {
    dialogues: Vec<FamilyDialogue>,
}

impl FamilyCatalog {
    pub fn new(dialogues: Vec<FamilyDialogue>) -> Self {
        Self { dialogues }
    }

    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }

    /// Exact (day, mood) match, else the day's Balanced dialogue
    pub fn find(&self, day: Day, mood: Mood) -> Option<&FamilyDialogue> {
        self.dialogues
            .iter()
            .find(|d| d.day == day && d.mood == mood)
            .or_else(|| {
                self.dialogues
                    .iter()
                    .find(|d| d.day == day && d.mood == Mood::Balanced)
            })
    }
}

pub fn relationship_status(mood: Mood) -> &'static str {
    match mood {
        Mood::HighLoyalty => "Your family is proud of your success.",
        Mood::HighConscience => "Your family is worried about you.",
        Mood::Crisis => "Your relationship with your family is on the edge.",
        Mood::Balanced => "Ordinary days with your family.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialogue(id: &str, day: Day, mood: Mood) -> FamilyDialogue {
        FamilyDialogue {
            id: id.to_string(),
            mood,
            day,
            inner_thought: format!("{} thought", id),
            spouse: String::new(),
            daughter: String::new(),
        }
    }

    #[test]
    fn test_exact_match_preferred() {
        let catalog = FamilyCatalog::new(vec![
            dialogue("balanced", 3, Mood::Balanced),
            dialogue("loyal", 3, Mood::HighLoyalty),
        ]);
        assert_eq!(catalog.find(3, Mood::HighLoyalty).unwrap().id, "loyal");
    }

    #[test]
    fn test_falls_back_to_balanced() {
        let catalog = FamilyCatalog::new(vec![dialogue("balanced", 3, Mood::Balanced)]);
        assert_eq!(catalog.find(3, Mood::Crisis).unwrap().id, "balanced");
    }

    #[test]
    fn test_no_dialogue_for_day() {
        let catalog = FamilyCatalog::new(vec![dialogue("loyal", 3, Mood::HighLoyalty)]);
        assert!(catalog.find(3, Mood::Crisis).is_none());
        assert!(catalog.find(6, Mood::HighLoyalty).is_none());
    }
}

//! Journal entries and their plain-text layout.
//!
//! An entry (question, drawn cards, narrative, reflections) is flattened into
//! the marked-up text block the export engine consumes: `#`/`##` prefixed
//! headers separated by blank lines.

use chrono::{DateTime, Utc};

const DEFAULT_TITLE: &str = "Journal Entry";

/// A card drawn for a reading.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawnCard {
    pub name: String,
    /// Spread position, e.g. "Past" or "Outcome".
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reversed: bool,
}

impl DrawnCard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    fn describe(&self) -> String {
        let name = self.name.trim();
        let mut line = match self.position.as_deref().map(str::trim) {
            Some(position) if !position.is_empty() => format!("{position}: {name}"),
            _ => name.to_string(),
        };
        if self.reversed {
            line.push_str(" (reversed)");
        }
        line
    }
}

/// One journal entry as stored by the application.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JournalEntry {
    pub title: Option<String>,
    pub question: Option<String>,
    pub cards: Vec<DrawnCard>,
    pub narrative: Option<String>,
    pub reflections: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_card(mut self, card: DrawnCard) -> Self {
        self.cards.push(card);
        self
    }

    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = Some(narrative.into());
        self
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflections.push(reflection.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Flattens an entry into the text block fed to the export engine.
///
/// Empty sections are left out entirely.
pub fn format_entry(entry: &JournalEntry) -> String {
    let title = non_empty(entry.title.as_deref()).unwrap_or(DEFAULT_TITLE);

    let mut heading = vec![format!("# {title}")];
    if let Some(created_at) = entry.created_at {
        heading.push(created_at.format("%B %-d, %Y").to_string());
    }

    let mut sections: Vec<Vec<String>> = vec![heading];

    if let Some(question) = non_empty(entry.question.as_deref()) {
        sections.push(vec!["## Question".to_string(), question.to_string()]);
    }

    let cards: Vec<String> = entry
        .cards
        .iter()
        .filter(|card| !card.name.trim().is_empty())
        .map(DrawnCard::describe)
        .collect();
    if !cards.is_empty() {
        let mut section = vec!["## Cards".to_string()];
        section.extend(cards);
        sections.push(section);
    }

    if let Some(narrative) = non_empty(entry.narrative.as_deref()) {
        sections.push(vec!["## Reading".to_string(), narrative.to_string()]);
    }

    let reflections: Vec<&str> = entry
        .reflections
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();
    if !reflections.is_empty() {
        let mut section = vec!["## Reflections".to_string()];
        for (i, reflection) in reflections.iter().enumerate() {
            if i > 0 {
                section.push(String::new());
            }
            section.push(reflection.to_string());
        }
        sections.push(section);
    }

    sections
        .into_iter()
        .map(|section| section.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

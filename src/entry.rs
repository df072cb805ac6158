//! Diary data model: entries, the emotion catalog and user preferences.
//!
//! Everything here is plain data with serde derives. The JSON field names
//! (`date`, `color`) match what earlier versions of the diary wrote, so a
//! snapshot written by one version can be read by another.

use crate::i18n::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed emotion catalog as `(name, color tag)` pairs, in display order.
pub const EMOTION_CATALOG: [(&str, &str); 10] = [
    ("Feliz", "yellow-300"),
    ("Triste", "blue-300"),
    ("Ansioso", "red-300"),
    ("Relajado", "green-300"),
    ("Enojado", "orange-400"),
    ("Irritado", "pink-400"),
    ("Esperanzado", "indigo-300"),
    ("Desesperado", "gray-400"),
    ("Motivado", "teal-300"),
    ("Apático", "purple-300"),
];

/// Opaque, unique entry identifier.
///
/// Ids are built from the creation time in milliseconds plus a random
/// suffix, so two entries created in the same millisecond still differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generates a fresh id for an entry created at `now`.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        EntryId(format!("{}-{}", now.timestamp_millis(), &suffix[..12]))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId(value.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which of the two sequences an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// An emotion tap.
    Emotion,
    /// A free-text note.
    Text,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Emotion => f.write_str("emotion"),
            EntryKind::Text => f.write_str("text"),
        }
    }
}

/// One emotion from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emotion {
    /// Display name, e.g. "Feliz".
    pub name: String,
    /// Color tag used by renderers.
    #[serde(rename = "color")]
    pub color_tag: String,
}

impl Emotion {
    /// Looks up a catalog emotion by name, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodlog::entry::Emotion;
    ///
    /// let emotion = Emotion::from_catalog("feliz").unwrap();
    /// assert_eq!(emotion.name, "Feliz");
    /// assert!(Emotion::from_catalog("Aburrido").is_none());
    /// ```
    pub fn from_catalog(name: &str) -> Option<Emotion> {
        let wanted = name.trim().to_lowercase();
        EMOTION_CATALOG
            .iter()
            .find(|(candidate, _)| candidate.to_lowercase() == wanted)
            .map(|(name, color)| Emotion {
                name: (*name).to_string(),
                color_tag: (*color).to_string(),
            })
    }

    /// Returns every catalog emotion in display order.
    pub fn catalog() -> Vec<Emotion> {
        EMOTION_CATALOG
            .iter()
            .map(|(name, color)| Emotion {
                name: (*name).to_string(),
                color_tag: (*color).to_string(),
            })
            .collect()
    }
}

/// A logged emotion. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionEntry {
    pub id: EntryId,
    pub emotion: Emotion,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

/// A free-text note. Only `text` may change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntry {
    pub id: EntryId,
    pub text: String,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
}

/// Borrowed view over either kind of entry, used where both sequences are
/// walked together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRef<'a> {
    Emotion(&'a EmotionEntry),
    Text(&'a TextEntry),
}

impl<'a> EntryRef<'a> {
    pub fn id(&self) -> &'a EntryId {
        match self {
            EntryRef::Emotion(entry) => &entry.id,
            EntryRef::Text(entry) => &entry.id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            EntryRef::Emotion(entry) => entry.timestamp,
            EntryRef::Text(entry) => entry.timestamp,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            EntryRef::Emotion(_) => EntryKind::Emotion,
            EntryRef::Text(_) => EntryKind::Text,
        }
    }
}

/// Process-wide user preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub language: Language,
}

//! The entry store: two insertion-ordered sequences plus preferences, written
//! through to durable slots on every change.
//!
//! The store talks to durable storage only through [`SlotStorage`], a tiny
//! named-slot interface. [`FileStorage`] backs it with one file per slot;
//! [`MemoryStorage`] keeps slots in a map for tests and dry runs.
//!
//! Persistence is a full snapshot of the changed slot after each mutation.
//! Expected entry counts are in the hundreds, so there is no diffing or
//! batching.

mod file;

pub use file::{FileStorage, StoreLock};

use crate::constants::{
    CORRUPT_SLOT_SUFFIX, SLOT_DARK_MODE, SLOT_EMOTIONS, SLOT_LANGUAGE, SLOT_TEXTS,
};
use crate::entry::{
    Emotion, EmotionEntry, EntryId, EntryKind, EntryRef, Preferences, TextEntry,
};
use crate::errors::{AppResult, DiaryError, StorageError};
use crate::guard;
use crate::i18n::Language;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Named-slot durable storage.
///
/// Reads return `Ok(None)` for a slot that was never written.
pub trait SlotStorage {
    /// Reads the raw content of `slot`.
    fn read_slot(&self, slot: &str) -> AppResult<Option<String>>;

    /// Replaces the content of `slot` with `value`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` if the snapshot could not be written.
    fn write_slot(&mut self, slot: &str, value: &str) -> AppResult<()>;

    /// Keeps the current content of `slot` under
    /// `<slot>.corrupt`, replacing any earlier copy. A missing slot is not an
    /// error.
    fn set_aside(&mut self, slot: &str) -> AppResult<()>;
}

/// In-memory slots.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a slot, e.g. with corrupt content for a test.
    pub fn with_slot(mut self, slot: &str, value: &str) -> Self {
        self.slots.insert(slot.to_string(), value.to_string());
        self
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }
}

impl SlotStorage for MemoryStorage {
    fn read_slot(&self, slot: &str) -> AppResult<Option<String>> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write_slot(&mut self, slot: &str, value: &str) -> AppResult<()> {
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn set_aside(&mut self, slot: &str) -> AppResult<()> {
        if let Some(value) = self.slots.remove(slot) {
            self.slots
                .insert(format!("{}{}", slot, CORRUPT_SLOT_SUFFIX), value);
        }
        Ok(())
    }
}

/// Entry sequences and preferences, synchronized to a [`SlotStorage`].
#[derive(Debug)]
pub struct EntryStore<S: SlotStorage> {
    storage: S,
    emotions: Vec<EmotionEntry>,
    texts: Vec<TextEntry>,
    preferences: Preferences,
    recovered_slots: Vec<&'static str>,
}

impl<S: SlotStorage> EntryStore<S> {
    /// Reconstructs the store from `storage`.
    ///
    /// Never fails: a missing slot yields its default, and a slot that cannot
    /// be read or decoded is logged and replaced by its default. Recovered
    /// slots are listed by [`EntryStore::recovered_slots`].
    pub fn load(storage: S) -> Self {
        let mut recovered = Vec::new();

        let emotions: Vec<EmotionEntry> =
            load_json_slot(&storage, SLOT_EMOTIONS, &mut recovered)
                .map(|stored: Vec<EmotionEntry>| {
                    let total = stored.len();
                    let kept: Vec<EmotionEntry> =
                        stored.into_iter().filter_map(catalog_entry).collect();
                    if kept.len() < total {
                        recovered.push(SLOT_EMOTIONS);
                    }
                    kept
                })
                .unwrap_or_default();
        let texts: Vec<TextEntry> = load_json_slot(&storage, SLOT_TEXTS, &mut recovered)
            .map(|texts: Vec<TextEntry>| {
                texts
                    .into_iter()
                    .filter(|t| {
                        let keep = !t.text.trim().is_empty();
                        if !keep {
                            warn!(id = %t.id, "Dropping stored text entry with empty text");
                        }
                        keep
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let dark_mode = load_parsed_slot(&storage, SLOT_DARK_MODE, &mut recovered, |raw| {
            match raw {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            }
        })
        .unwrap_or(false);
        let language = load_parsed_slot(&storage, SLOT_LANGUAGE, &mut recovered, |raw| {
            raw.parse::<Language>().ok()
        })
        .unwrap_or_default();

        info!(
            emotions = emotions.len(),
            texts = texts.len(),
            "Loaded diary entries"
        );

        EntryStore {
            storage,
            emotions,
            texts,
            preferences: Preferences {
                dark_mode,
                language,
            },
            recovered_slots: recovered,
        }
    }

    pub fn emotions(&self) -> &[EmotionEntry] {
        &self.emotions
    }

    pub fn texts(&self) -> &[TextEntry] {
        &self.texts
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Slots that were corrupt or unreadable at load time.
    pub fn recovered_slots(&self) -> &[&'static str] {
        &self.recovered_slots
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Finds an entry by id in either sequence.
    pub fn find(&self, id: &EntryId) -> Option<EntryRef<'_>> {
        self.emotions
            .iter()
            .find(|e| &e.id == id)
            .map(EntryRef::Emotion)
            .or_else(|| self.texts.iter().find(|t| &t.id == id).map(EntryRef::Text))
    }

    /// Logs the catalog emotion called `name` (case-insensitive) at `now`.
    ///
    /// # Errors
    ///
    /// - `DiaryError::UnknownEmotion` if no catalog emotion has that name
    /// - `DiaryError::DuplicateEmotion` if the same emotion was logged less than
    ///   30 seconds before `now`; nothing is stored
    /// - `StorageError::WriteFailed` if the snapshot could not be written
    pub fn add_emotion(&mut self, name: &str, now: DateTime<Utc>) -> AppResult<EmotionEntry> {
        let emotion = Emotion::from_catalog(name)
            .ok_or_else(|| DiaryError::UnknownEmotion(name.trim().to_string()))?;

        if guard::is_duplicate(&self.emotions, &emotion.name, now) {
            debug!(emotion = %emotion.name, "Rejected duplicate emotion");
            return Err(DiaryError::DuplicateEmotion { name: emotion.name }.into());
        }

        let entry = EmotionEntry {
            id: EntryId::generate(now),
            emotion,
            timestamp: now,
        };
        self.emotions.push(entry.clone());
        self.persist_emotions()?;

        debug!(id = %entry.id, emotion = %entry.emotion.name, "Stored emotion entry");
        Ok(entry)
    }

    /// Stores a trimmed text note written at `now`.
    ///
    /// # Errors
    ///
    /// - `DiaryError::EmptyTextRejected` if `text` is empty after trimming
    /// - `StorageError::WriteFailed` if the snapshot could not be written
    pub fn add_text(&mut self, text: &str, now: DateTime<Utc>) -> AppResult<TextEntry> {
        let text = validated_text(text)?;

        let entry = TextEntry {
            id: EntryId::generate(now),
            text,
            timestamp: now,
        };
        self.texts.push(entry.clone());
        self.persist_texts()?;

        debug!(id = %entry.id, "Stored text entry");
        Ok(entry)
    }

    /// Replaces the text of entry `id` in place. Id, timestamp and position
    /// are unchanged.
    ///
    /// # Errors
    ///
    /// - `DiaryError::EmptyTextRejected` if `new_text` is empty after trimming
    /// - `DiaryError::EntryNotFound` if no text entry has this id
    /// - `StorageError::WriteFailed` if the snapshot could not be written
    pub fn update_text(&mut self, id: &EntryId, new_text: &str) -> AppResult<()> {
        let new_text = validated_text(new_text)?;

        let entry = self
            .texts
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| DiaryError::EntryNotFound { id: id.to_string() })?;
        entry.text = new_text;
        self.persist_texts()?;

        debug!(id = %id, "Updated text entry");
        Ok(())
    }

    /// Removes entry `id` from the sequence for `kind`.
    ///
    /// # Errors
    ///
    /// - `DiaryError::EntryNotFound` if the sequence has no such entry
    /// - `StorageError::WriteFailed` if the snapshot could not be written
    pub fn delete_entry(&mut self, id: &EntryId, kind: EntryKind) -> AppResult<()> {
        let removed = match kind {
            EntryKind::Emotion => remove_by_id(&mut self.emotions, |e| &e.id == id),
            EntryKind::Text => remove_by_id(&mut self.texts, |t| &t.id == id),
        };
        if !removed {
            return Err(DiaryError::EntryNotFound { id: id.to_string() }.into());
        }

        match kind {
            EntryKind::Emotion => self.persist_emotions()?,
            EntryKind::Text => self.persist_texts()?,
        }

        debug!(id = %id, kind = %kind, "Deleted entry");
        Ok(())
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> AppResult<()> {
        self.preferences.dark_mode = dark_mode;
        self.storage
            .write_slot(SLOT_DARK_MODE, if dark_mode { "true" } else { "false" })
    }

    pub fn set_language(&mut self, language: Language) -> AppResult<()> {
        self.preferences.language = language;
        self.storage.write_slot(SLOT_LANGUAGE, language.code())
    }

    /// Writes every slot. Used once after load to heal recovered slots.
    /// Rewrites every recovered slot with its loaded value, keeping the
    /// previous content via [`SlotStorage::set_aside`] first.
    pub fn heal(&mut self) -> AppResult<()> {
        if self.recovered_slots.is_empty() {
            return Ok(());
        }
        for slot in &self.recovered_slots {
            self.storage.set_aside(slot)?;
        }
        warn!(slots = ?self.recovered_slots, "Rewrote recovered storage slots");
        self.persist()?;
        self.recovered_slots.clear();
        Ok(())
    }

    pub fn persist(&mut self) -> AppResult<()> {
        self.persist_emotions()?;
        self.persist_texts()?;
        let Preferences {
            dark_mode,
            language,
        } = self.preferences;
        self.set_dark_mode(dark_mode)?;
        self.set_language(language)
    }

    fn persist_emotions(&mut self) -> AppResult<()> {
        let snapshot = encode_slot(SLOT_EMOTIONS, &self.emotions)?;
        self.storage.write_slot(SLOT_EMOTIONS, &snapshot)
    }

    fn persist_texts(&mut self) -> AppResult<()> {
        let snapshot = encode_slot(SLOT_TEXTS, &self.texts)?;
        self.storage.write_slot(SLOT_TEXTS, &snapshot)
    }
}

fn validated_text(text: &str) -> Result<String, DiaryError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DiaryError::EmptyTextRejected);
    }
    Ok(trimmed.to_string())
}

fn remove_by_id<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !matches(item));
    items.len() != before
}

fn encode_slot<T: serde::Serialize>(slot: &str, value: &T) -> AppResult<String> {
    serde_json::to_string(value).map_err(|e| {
        StorageError::WriteFailed {
            slot: slot.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        }
        .into()
    })
}

/// Re-anchors a stored emotion entry on the catalog, dropping unknown names.
fn catalog_entry(entry: EmotionEntry) -> Option<EmotionEntry> {
    match Emotion::from_catalog(&entry.emotion.name) {
        Some(emotion) => Some(EmotionEntry { emotion, ..entry }),
        None => {
            warn!(id = %entry.id, emotion = %entry.emotion.name, "Dropping stored entry with unknown emotion");
            None
        }
    }
}

fn load_json_slot<S: SlotStorage, T: DeserializeOwned>(
    storage: &S,
    slot: &'static str,
    recovered: &mut Vec<&'static str>,
) -> Option<T> {
    let raw = read_or_recover(storage, slot, recovered)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            let error = StorageError::ReadCorrupt {
                slot: slot.to_string(),
                message: e.to_string(),
            };
            warn!("{}; falling back to default", error);
            recovered.push(slot);
            None
        }
    }
}

fn load_parsed_slot<S: SlotStorage, T>(
    storage: &S,
    slot: &'static str,
    recovered: &mut Vec<&'static str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = read_or_recover(storage, slot, recovered)?;
    let parsed = parse(raw.trim());
    if parsed.is_none() {
        let error = StorageError::ReadCorrupt {
            slot: slot.to_string(),
            message: format!("unexpected value {:?}", raw),
        };
        warn!("{}; falling back to default", error);
        recovered.push(slot);
    }
    parsed
}

fn read_or_recover<S: SlotStorage>(
    storage: &S,
    slot: &'static str,
    recovered: &mut Vec<&'static str>,
) -> Option<String> {
    match storage.read_slot(slot) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(slot, "Failed to read storage slot: {}; falling back to default", e);
            recovered.push(slot);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn empty_store() -> EntryStore<MemoryStorage> {
        EntryStore::load(MemoryStorage::new())
    }

    #[test]
    fn test_load_from_empty_storage_uses_defaults() {
        let store = empty_store();
        assert!(store.emotions().is_empty());
        assert!(store.texts().is_empty());
        assert_eq!(store.preferences(), Preferences::default());
        assert!(store.recovered_slots().is_empty());
    }

    #[test]
    fn test_duplicate_emotion_inside_window_is_rejected() {
        let mut store = empty_store();
        store.add_emotion("Feliz", t0()).unwrap();

        let result = store.add_emotion("Feliz", t0() + Duration::seconds(29));

        assert!(matches!(
            result,
            Err(AppError::Diary(DiaryError::DuplicateEmotion { .. }))
        ));
        assert_eq!(store.emotions().len(), 1);
    }

    #[test]
    fn test_same_emotion_after_window_is_stored() {
        let mut store = empty_store();
        store.add_emotion("Feliz", t0()).unwrap();
        store
            .add_emotion("Feliz", t0() + Duration::seconds(30))
            .unwrap();
        assert_eq!(store.emotions().len(), 2);
    }

    #[test]
    fn test_different_emotions_in_succession_are_stored() {
        let mut store = empty_store();
        for (i, emotion) in Emotion::catalog().iter().enumerate() {
            store
                .add_emotion(&emotion.name, t0() + Duration::milliseconds(i as i64))
                .unwrap();
        }
        assert_eq!(store.emotions().len(), 10);
    }

    #[test]
    fn test_unknown_emotion_is_rejected() {
        let mut store = empty_store();
        let result = store.add_emotion("Aburrido", t0());
        assert!(matches!(
            result,
            Err(AppError::Diary(DiaryError::UnknownEmotion(_)))
        ));
    }

    #[test]
    fn test_add_text_rejects_blank_and_trims() {
        let mut store = empty_store();

        for blank in ["", "   ", "\n\t"] {
            let result = store.add_text(blank, t0());
            assert!(matches!(
                result,
                Err(AppError::Diary(DiaryError::EmptyTextRejected))
            ));
        }
        assert!(store.texts().is_empty());
        assert!(store.storage().get(SLOT_TEXTS).is_none());

        let entry = store.add_text(" hi ", t0()).unwrap();
        assert_eq!(entry.text, "hi");
        assert_eq!(store.texts()[0].text, "hi");
    }

    #[test]
    fn test_update_text_preserves_id_timestamp_and_position() {
        let mut store = empty_store();
        let first = store.add_text("uno", t0()).unwrap();
        let second = store.add_text("dos", t0() + Duration::seconds(1)).unwrap();

        store.update_text(&first.id, "  uno corregido ").unwrap();

        assert_eq!(store.texts()[0].id, first.id);
        assert_eq!(store.texts()[0].timestamp, first.timestamp);
        assert_eq!(store.texts()[0].text, "uno corregido");
        assert_eq!(store.texts()[1], second);
    }

    #[test]
    fn test_update_text_errors() {
        let mut store = empty_store();
        let entry = store.add_text("uno", t0()).unwrap();

        assert!(matches!(
            store.update_text(&EntryId::from("missing"), "x"),
            Err(AppError::Diary(DiaryError::EntryNotFound { .. }))
        ));
        assert!(matches!(
            store.update_text(&entry.id, "  "),
            Err(AppError::Diary(DiaryError::EmptyTextRejected))
        ));
        assert_eq!(store.texts()[0].text, "uno");
    }

    #[test]
    fn test_delete_removes_only_from_matching_sequence() {
        let mut store = empty_store();
        let emotion = store.add_emotion("Feliz", t0()).unwrap();
        let text = store.add_text("hola", t0()).unwrap();

        // Wrong kind does not touch the other sequence
        assert!(store.delete_entry(&emotion.id, EntryKind::Text).is_err());
        assert_eq!(store.emotions().len(), 1);

        store.delete_entry(&emotion.id, EntryKind::Emotion).unwrap();
        assert!(store.emotions().is_empty());
        assert_eq!(store.texts(), &[text]);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let mut store = empty_store();
        for (i, emotion) in Emotion::catalog().iter().take(4).enumerate() {
            store
                .add_emotion(&emotion.name, t0() + Duration::minutes(i as i64))
                .unwrap();
        }
        for i in 0..3 {
            store
                .add_text(&format!("nota {}", i), t0() + Duration::hours(i))
                .unwrap();
        }
        store.set_dark_mode(true).unwrap();
        store.set_language(Language::En).unwrap();

        let reloaded = EntryStore::load(store.storage().clone());

        assert_eq!(reloaded.emotions(), store.emotions());
        assert_eq!(reloaded.texts(), store.texts());
        assert_eq!(reloaded.preferences(), store.preferences());
    }

    #[test]
    fn test_corrupt_slots_fall_back_to_defaults() {
        let storage = MemoryStorage::new()
            .with_slot(SLOT_EMOTIONS, "{not json")
            .with_slot(SLOT_TEXTS, r#"[{"id":"1-a","text":"ok","date":"2024-01-01T00:00:00Z"}]"#)
            .with_slot(SLOT_DARK_MODE, "maybe")
            .with_slot(SLOT_LANGUAGE, "fr");

        let store = EntryStore::load(storage);

        assert!(store.emotions().is_empty());
        assert_eq!(store.texts().len(), 1);
        assert_eq!(store.preferences(), Preferences::default());
        assert_eq!(
            store.recovered_slots(),
            &[SLOT_EMOTIONS, SLOT_DARK_MODE, SLOT_LANGUAGE]
        );
    }

    #[test]
    fn test_unknown_stored_emotion_is_dropped_on_load() {
        let storage = MemoryStorage::new().with_slot(
            SLOT_EMOTIONS,
            r#"[{"id":"1-a","emotion":{"name":"Aburrido","color":"gray-100"},"date":"2024-01-01T00:00:00Z"},
                {"id":"2-b","emotion":{"name":"feliz","color":"pink-900"},"date":"2024-01-01T00:00:01Z"}]"#,
        );

        let store = EntryStore::load(storage);

        assert_eq!(store.emotions().len(), 1);
        assert_eq!(store.emotions()[0].id.as_str(), "2-b");
        assert_eq!(store.emotions()[0].emotion, Emotion::from_catalog("Feliz").unwrap());
        assert_eq!(store.recovered_slots(), &[SLOT_EMOTIONS]);
    }

    #[test]
    fn test_heal_keeps_corrupt_content_aside() {
        let storage = MemoryStorage::new()
            .with_slot(SLOT_EMOTIONS, "{not json")
            .with_slot(SLOT_TEXTS, "[]");
        let mut store = EntryStore::load(storage);

        store.heal().unwrap();

        assert_eq!(store.storage().get(SLOT_EMOTIONS), Some("[]"));
        assert_eq!(store.storage().get("emotions.corrupt"), Some("{not json"));
        assert_eq!(store.storage().get("texts.corrupt"), None);
        assert!(store.recovered_slots().is_empty());
    }

    #[test]
    fn test_blank_stored_text_is_dropped_on_load() {
        let storage = MemoryStorage::new().with_slot(
            SLOT_TEXTS,
            r#"[{"id":"1-a","text":"  ","date":"2024-01-01T00:00:00Z"},
                {"id":"2-b","text":"hola","date":"2024-01-01T00:00:01Z"}]"#,
        );

        let store = EntryStore::load(storage);

        assert_eq!(store.texts().len(), 1);
        assert_eq!(store.texts()[0].text, "hola");
    }

    #[test]
    fn test_every_mutation_writes_a_snapshot() {
        let mut store = empty_store();
        store.add_emotion("Feliz", t0()).unwrap();
        let snapshot = store.storage().get(SLOT_EMOTIONS).unwrap();
        let decoded: Vec<EmotionEntry> = serde_json::from_str(snapshot).unwrap();
        assert_eq!(decoded, store.emotions());

        let id = decoded[0].id.clone();
        store.delete_entry(&id, EntryKind::Emotion).unwrap();
        assert_eq!(store.storage().get(SLOT_EMOTIONS), Some("[]"));

        store.set_dark_mode(true).unwrap();
        assert_eq!(store.storage().get(SLOT_DARK_MODE), Some("true"));
    }
}

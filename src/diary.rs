//! Application state for one diary session.
//!
//! [`Diary`] owns the entry store, the editing session and the reminder
//! scheduler, and is passed explicitly to whatever drives it. Create it with
//! [`Diary::init`] and end it with [`Diary::teardown`].

use crate::editor::Editor;
use crate::entry::{Emotion, EmotionEntry, EntryId, EntryKind, Preferences, TextEntry};
use crate::errors::{AppError, AppResult, DiaryError};
use crate::filter::{filter_by_date, FilteredEntries};
use crate::i18n::{Language, Strings};
use crate::reminder::{Notifier, Reminder, ReminderScheduler};
use crate::report::layout::PageLayout;
use crate::report::{export_report, ReportDocument};
use crate::session::{CommitAction, EditingSession};
use crate::store::{EntryStore, SlotStorage};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The running diary.
pub struct Diary<S: SlotStorage> {
    store: EntryStore<S>,
    session: EditingSession,
    reminder: ReminderScheduler,
}

impl<S: SlotStorage> Diary<S> {
    /// Loads the diary from `storage`.
    ///
    /// Slots that were corrupt at load time are rewritten with their
    /// recovered defaults so the next load is clean. The corrupt content is
    /// kept next to the slot with a `.corrupt` suffix.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` if healing a recovered slot fails.
    pub fn init(storage: S, notifier: Option<Arc<dyn Notifier>>) -> AppResult<Self> {
        let mut store = EntryStore::load(storage);
        store.heal()?;

        Ok(Diary {
            store,
            session: EditingSession::default(),
            reminder: ReminderScheduler::new(notifier),
        })
    }

    /// Ends the session: drops any draft, cancels the reminder and hands the
    /// storage back.
    pub fn teardown(mut self) -> S {
        self.session.cancel();
        self.reminder.cancel();
        let Diary { store, .. } = self;
        store.into_storage()
    }

    pub fn store(&self) -> &EntryStore<S> {
        &self.store
    }

    pub fn session(&self) -> &EditingSession {
        &self.session
    }

    pub fn preferences(&self) -> Preferences {
        self.store.preferences()
    }

    /// Strings for the current language.
    pub fn strings(&self) -> &'static Strings {
        self.preferences().language.strings()
    }

    /// Logs the catalog emotion called `name` (case-insensitive).
    ///
    /// # Errors
    ///
    /// - `DiaryError::UnknownEmotion` if no catalog emotion has that name
    /// - `DiaryError::DuplicateEmotion` inside the 30 second window
    /// - `StorageError::WriteFailed` if the snapshot could not be written
    pub fn add_emotion(&mut self, name: &str, now: DateTime<Utc>) -> AppResult<EmotionEntry> {
        self.store.add_emotion(name, now)
    }

    pub fn add_text(&mut self, text: &str, now: DateTime<Utc>) -> AppResult<TextEntry> {
        self.store.add_text(text, now)
    }

    /// Which sequence holds `id`.
    pub fn kind_of(&self, id: &EntryId) -> AppResult<EntryKind> {
        self.store
            .find(id)
            .map(|entry| entry.kind())
            .ok_or_else(|| DiaryError::EntryNotFound { id: id.to_string() }.into())
    }

    /// Starts editing entry `id`, replacing any edit in progress.
    pub fn begin_edit(&mut self, id: &EntryId) -> AppResult<EntryKind> {
        let entry = self
            .store
            .find(id)
            .ok_or_else(|| DiaryError::EntryNotFound { id: id.to_string() })?;
        self.session.begin(entry);
        debug!(id = %id, kind = %entry.kind(), "Editing started");
        Ok(entry.kind())
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.session.set_draft(text);
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel();
    }

    /// Ends the edit and applies it. Committing an emotion edit does nothing.
    ///
    /// # Errors
    ///
    /// - `DiaryError::EmptyTextRejected` if the draft is blank; the entry keeps
    ///   its old text
    /// - `DiaryError::EntryNotFound` if the entry disappeared meanwhile
    pub fn commit_edit(&mut self) -> AppResult<CommitAction> {
        let action = self.session.commit();
        if let CommitAction::UpdateText { id, text } = &action {
            self.store.update_text(id, text)?;
        }
        Ok(action)
    }

    /// Runs a whole edit of `id` through `editor`: begin, revise the draft,
    /// commit. Emotion entries are not handed to the editor.
    ///
    /// On any editor failure the session is cancelled and nothing changes.
    pub fn edit_with(&mut self, id: &EntryId, editor: &dyn Editor) -> AppResult<CommitAction> {
        if self.begin_edit(id)? == EntryKind::Emotion {
            return self.commit_edit();
        }

        let draft = self.session.draft().unwrap_or_default().to_string();
        match editor.edit(&draft) {
            Ok(revised) => {
                self.set_draft(revised);
                self.commit_edit()
            }
            Err(e) => {
                self.cancel_edit();
                Err(e)
            }
        }
    }

    /// Deletes entry `id` of `kind`. Ends the edit if it targeted this entry.
    pub fn delete_entry(&mut self, id: &EntryId, kind: EntryKind) -> AppResult<()> {
        self.store.delete_entry(id, kind)?;
        if self.session.clear_if_target(id) {
            debug!(id = %id, "Cleared editing session for deleted entry");
        }
        Ok(())
    }

    /// Entries on local `date` in `tz`, or all entries for `None`.
    pub fn entries_on<Tz: TimeZone>(&self, date: Option<NaiveDate>, tz: &Tz) -> FilteredEntries<'_> {
        filter_by_date(date, self.store.emotions(), self.store.texts(), tz)
    }

    /// Count per catalog emotion, in catalog order, for the selected day.
    pub fn emotion_counts<Tz: TimeZone>(
        &self,
        date: Option<NaiveDate>,
        tz: &Tz,
    ) -> Vec<(Emotion, usize)> {
        let filtered = self.entries_on(date, tz);
        Emotion::catalog()
            .into_iter()
            .map(|emotion| {
                let count = filtered
                    .emotions
                    .iter()
                    .filter(|e| e.emotion.name == emotion.name)
                    .count();
                (emotion, count)
            })
            .collect()
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> AppResult<()> {
        self.store.set_dark_mode(dark_mode)?;
        info!(dark_mode, "Dark mode updated");
        Ok(())
    }

    /// Switches the interface language. A pending reminder is re-armed so it
    /// fires in the new language.
    pub fn set_language(&mut self, language: Language) -> AppResult<()> {
        self.store.set_language(language)?;
        info!(language = %language, "Language updated");

        if self.reminder.is_armed() {
            if let Err(e) = self.arm_reminder(&Local::now()) {
                warn!("Could not re-arm reminder: {}", e);
            }
        }
        Ok(())
    }

    /// Replaces the notification capability. Any pending reminder is
    /// cancelled.
    pub fn attach_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.reminder = ReminderScheduler::new(Some(notifier));
    }

    /// Arms the daily reminder in the current language.
    pub fn arm_reminder<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> AppResult<DateTime<Tz>> {
        let reminder = Reminder::localized(self.preferences().language);
        self.reminder.arm(now, reminder)
    }

    pub fn reminder_armed(&self) -> bool {
        self.reminder.is_armed()
    }

    /// Waits for the armed reminder to fire.
    pub async fn wait_for_reminder(&mut self) {
        self.reminder.wait().await;
    }

    /// Builds the PDF report in the current language and color scheme.
    pub fn export<Tz: TimeZone>(
        &self,
        date: Option<NaiveDate>,
        tz: &Tz,
        layout: &PageLayout,
    ) -> ReportDocument
    where
        Tz::Offset: std::fmt::Display,
    {
        let preferences = self.preferences();
        export_report(
            self.store.emotions(),
            self.store.texts(),
            date,
            preferences.language.strings().title,
            preferences.dark_mode,
            tz,
            layout,
        )
    }
}

/// True for rejections the diary reports silently.
pub fn is_silent_rejection(error: &AppError) -> bool {
    matches!(error, AppError::Diary(DiaryError::EmptyTextRejected))
}

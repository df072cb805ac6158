//! The single in-flight edit.
//!
//! At most one entry is being edited at a time. Starting a new edit replaces
//! the previous draft without merging. Only text entries can be committed;
//! an emotion's identity is fixed, so committing an emotion edit does nothing.

use crate::entry::{EntryId, EntryKind, EntryRef};

/// What the caller must do after a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitAction {
    /// Replace the text of entry `id` with `text`.
    UpdateText { id: EntryId, text: String },
    /// Nothing to apply.
    Nothing,
}

/// Editing state machine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditingSession {
    #[default]
    Idle,
    Editing {
        target_id: EntryId,
        target_kind: EntryKind,
        draft: String,
    },
}

impl EditingSession {
    /// Starts editing `entry`, discarding any previous draft.
    ///
    /// The draft starts as the entry's text, or the emotion name for emotion
    /// entries.
    pub fn begin(&mut self, entry: EntryRef<'_>) {
        let draft = match entry {
            EntryRef::Emotion(e) => e.emotion.name.clone(),
            EntryRef::Text(t) => t.text.clone(),
        };
        *self = EditingSession::Editing {
            target_id: entry.id().clone(),
            target_kind: entry.kind(),
            draft,
        };
    }

    /// Replaces the draft text. Ignored while idle.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let EditingSession::Editing { draft, .. } = self {
            *draft = text.into();
        }
    }

    /// Returns the current draft, if editing.
    pub fn draft(&self) -> Option<&str> {
        match self {
            EditingSession::Editing { draft, .. } => Some(draft),
            EditingSession::Idle => None,
        }
    }

    /// Returns the id being edited, if any.
    pub fn target(&self) -> Option<&EntryId> {
        match self {
            EditingSession::Editing { target_id, .. } => Some(target_id),
            EditingSession::Idle => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditingSession::Editing { .. })
    }

    /// Abandons the edit.
    pub fn cancel(&mut self) {
        *self = EditingSession::Idle;
    }

    /// Ends the edit and returns what should be applied to the store.
    pub fn commit(&mut self) -> CommitAction {
        match std::mem::take(self) {
            EditingSession::Editing {
                target_id,
                target_kind: EntryKind::Text,
                draft,
            } => CommitAction::UpdateText {
                id: target_id,
                text: draft,
            },
            EditingSession::Editing { .. } | EditingSession::Idle => CommitAction::Nothing,
        }
    }

    /// Returns to idle if `id` is the entry being edited. Returns whether it was.
    pub fn clear_if_target(&mut self, id: &EntryId) -> bool {
        if self.target() == Some(id) {
            *self = EditingSession::Idle;
            true
        } else {
            false
        }
    }
}

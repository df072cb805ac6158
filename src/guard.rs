//! Duplicate emotion suppression.
//!
//! Logging the same emotion twice within [`DUPLICATE_EMOTION_WINDOW_SECS`]
//! is treated as an accidental double tap. The window is tracked per emotion
//! name; different emotions never block each other.

use crate::constants::DUPLICATE_EMOTION_WINDOW_SECS;
use crate::entry::EmotionEntry;
use chrono::{DateTime, Duration, Utc};

/// Returns true if logging `name` at `now` would duplicate a recent entry.
///
/// Only the most recent entry with the same name is considered. A stored
/// timestamp later than `now` (clock moved backwards) counts as inside the
/// window.
///
/// # Examples
///
/// ```
/// use moodlog::guard::is_duplicate;
/// use chrono::Utc;
///
/// assert!(!is_duplicate(&[], "Feliz", Utc::now()));
/// ```
pub fn is_duplicate(entries: &[EmotionEntry], name: &str, now: DateTime<Utc>) -> bool {
    let window = Duration::seconds(DUPLICATE_EMOTION_WINDOW_SECS);

    entries
        .iter()
        .rev()
        .find(|entry| entry.emotion.name == name)
        .is_some_and(|latest| now.signed_duration_since(latest.timestamp) < window)
}

//! Calendar-day views over the entry sequences.
//!
//! Entries are bucketed by the calendar date of their timestamp as seen in
//! the viewer's time zone, not by UTC midnight.

use crate::entry::{EmotionEntry, TextEntry};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Filtered, borrowed views of both sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredEntries<'a> {
    pub emotions: Vec<&'a EmotionEntry>,
    pub texts: Vec<&'a TextEntry>,
}

impl FilteredEntries<'_> {
    pub fn is_empty(&self) -> bool {
        self.emotions.is_empty() && self.texts.is_empty()
    }
}

/// Calendar date of `timestamp` in time zone `tz`.
pub fn local_date<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// Keeps the entries whose local date equals `date`; `None` keeps everything.
///
/// Order within each sequence is preserved.
///
/// # Examples
///
/// ```
/// use moodlog::filter::filter_by_date;
/// use chrono::Utc;
///
/// let filtered = filter_by_date(None, &[], &[], &Utc);
/// assert!(filtered.is_empty());
/// ```
pub fn filter_by_date<'a, Tz: TimeZone>(
    date: Option<NaiveDate>,
    emotions: &'a [EmotionEntry],
    texts: &'a [TextEntry],
    tz: &Tz,
) -> FilteredEntries<'a> {
    let on_day = |timestamp: DateTime<Utc>| date.map_or(true, |d| local_date(timestamp, tz) == d);

    FilteredEntries {
        emotions: emotions.iter().filter(|e| on_day(e.timestamp)).collect(),
        texts: texts.iter().filter(|t| on_day(t.timestamp)).collect(),
    }
}

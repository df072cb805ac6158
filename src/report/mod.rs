//! Report exporter: renders the diary as a paginated PDF document.
//!
//! Exporting never touches the store. Entries are combined (emotions first,
//! then texts), optionally filtered to one day, grouped by local calendar
//! date in ascending order and laid out on A4 pages.

pub mod layout;
mod pdf;

use crate::constants::{DATE_FORMAT_ISO, TIME_FORMAT};
use crate::entry::{EmotionEntry, EntryRef, TextEntry};
use crate::errors::{AppError, AppResult};
use crate::filter::{filter_by_date, local_date};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use layout::{paginate, wrap_text, GroupText, Page, PageLayout};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// A laid-out report, ready to be serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub dark_mode: bool,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serializes the document as PDF bytes.
    pub fn to_pdf(&self) -> AppResult<Vec<u8>> {
        pdf::render_pdf(&self.title, &self.pages, self.dark_mode)
    }

    /// Writes the PDF to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> AppResult<()> {
        let bytes = self.to_pdf()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(&bytes)?;
        temp.flush()?;
        temp.persist(path).map_err(|e| {
            AppError::Report(format!("could not write {}: {}", path.display(), e.error))
        })?;

        info!(path = %path.display(), pages = self.page_count(), "Report written");
        Ok(())
    }
}

/// Entries of one local calendar day, in combined order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup<'a> {
    pub date: NaiveDate,
    pub entries: Vec<EntryRef<'a>>,
}

/// All emotions in insertion order, followed by all texts in insertion order.
pub fn combined_entries<'a>(
    emotions: &[&'a EmotionEntry],
    texts: &[&'a TextEntry],
) -> Vec<EntryRef<'a>> {
    emotions
        .iter()
        .map(|e| EntryRef::Emotion(*e))
        .chain(texts.iter().map(|t| EntryRef::Text(*t)))
        .collect()
}

/// Groups entries by local date, calendar-ascending.
///
/// Relative order inside a group is the order of `entries`.
pub fn group_by_date<'a, Tz: TimeZone>(entries: &[EntryRef<'a>], tz: &Tz) -> Vec<DateGroup<'a>> {
    let mut groups: BTreeMap<NaiveDate, Vec<EntryRef<'a>>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry(local_date(entry.timestamp(), tz))
            .or_default()
            .push(*entry);
    }
    groups
        .into_iter()
        .map(|(date, entries)| DateGroup { date, entries })
        .collect()
}

fn local_time<Tz: TimeZone>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format(TIME_FORMAT).to_string()
}

/// Report lines for one entry: `Name (HH:MM:SS)` or a quoted, wrapped text.
pub fn entry_lines<Tz: TimeZone>(entry: &EntryRef<'_>, tz: &Tz, layout: &PageLayout) -> Vec<String>
where
    Tz::Offset: std::fmt::Display,
{
    match entry {
        EntryRef::Emotion(e) => vec![format!(
            "{} ({})",
            e.emotion.name,
            local_time(e.timestamp, tz)
        )],
        EntryRef::Text(t) => {
            let line = format!("\"{}\" ({})", t.text, local_time(t.timestamp, tz));
            wrap_text(&line, layout.content_width, layout.entry_font)
        }
    }
}

/// Builds the report for the current entries.
///
/// `date` restricts the report to one local day; `None` exports everything.
/// An empty selection still yields a one-page document holding the title.
pub fn export_report<Tz: TimeZone>(
    emotions: &[EmotionEntry],
    texts: &[TextEntry],
    date: Option<NaiveDate>,
    title: &str,
    dark_mode: bool,
    tz: &Tz,
    layout: &PageLayout,
) -> ReportDocument
where
    Tz::Offset: std::fmt::Display,
{
    let filtered = filter_by_date(date, emotions, texts, tz);
    let combined = combined_entries(&filtered.emotions, &filtered.texts);
    let groups: Vec<GroupText> = group_by_date(&combined, tz)
        .iter()
        .map(|group| GroupText {
            header: group.date.format(DATE_FORMAT_ISO).to_string(),
            entries: group
                .entries
                .iter()
                .map(|entry| entry_lines(entry, tz, layout))
                .collect(),
        })
        .collect();

    debug!(
        entries = combined.len(),
        groups = groups.len(),
        "Laying out report"
    );

    ReportDocument {
        title: title.to_string(),
        dark_mode,
        pages: paginate(title, &groups, layout),
    }
}

/// Writes `document` to `path`. Missing parent directories are created.
pub fn save_report(document: &ReportDocument, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    document.write_to(path)
}

//! Constants used throughout the application.
//!
//! This module contains all constants used in the moodlog application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "moodlog";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str =
    "An emotional diary: log how you feel, write notes, export a PDF summary";

// CLI Arguments & Defaults
/// Default command for the editor if not specified otherwise.
pub const DEFAULT_EDITOR_COMMAND: &str = "vim";
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the diary data directory.
pub const ENV_VAR_MOODLOG_DIR: &str = "MOODLOG_DIR";
/// Environment variable for specifying the preferred moodlog editor.
pub const ENV_VAR_MOODLOG_EDITOR: &str = "MOODLOG_EDITOR";
/// Standard environment variable for specifying the default editor.
pub const ENV_VAR_EDITOR: &str = "EDITOR";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory for diary data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".local/share/moodlog";

// Validation
/// Characters forbidden in editor commands for security reasons.
pub const EDITOR_FORBIDDEN_CHARS: &[char] =
    &['|', '&', ';', '$', '(', ')', '`', '\\', '<', '>', '\'', '"'];
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Storage Slots
/// Slot holding the serialized emotion entry sequence.
pub const SLOT_EMOTIONS: &str = "emotions";
/// Slot holding the serialized text entry sequence.
pub const SLOT_TEXTS: &str = "texts";
/// Slot holding the dark-mode flag as `true`/`false`.
pub const SLOT_DARK_MODE: &str = "darkMode";
/// Slot holding the two-letter language code.
pub const SLOT_LANGUAGE: &str = "lang";
/// Suffix of the copy kept when a corrupt slot is replaced by its default.
pub const CORRUPT_SLOT_SUFFIX: &str = ".corrupt";
/// Name of the advisory lock file guarding the data directory.
pub const STORE_LOCK_FILE: &str = ".moodlog.lock";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Entry Rules
/// Window during which logging the same emotion again is rejected.
pub const DUPLICATE_EMOTION_WINDOW_SECS: i64 = 30;
/// Prefix of the draft file handed to the editor.
pub const EDIT_DRAFT_PREFIX: &str = "moodlog-draft-";
/// Suffix of the draft file handed to the editor.
pub const EDIT_DRAFT_SUFFIX: &str = ".txt";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Time-of-day format used when listing and exporting entries.
pub const TIME_FORMAT: &str = "%H:%M:%S";

// Reminder
/// Local hour at which the daily reminder fires.
pub const REMINDER_HOUR: u32 = 20;
/// Local minute at which the daily reminder fires.
pub const REMINDER_MINUTE: u32 = 0;
/// Icon shown with the reminder notification.
pub const REMINDER_ICON: &str = "face-smile";

// Report Export
/// File name of the exported report.
pub const REPORT_FILE_NAME: &str = "diario-emocional.pdf";
/// A4 page width in millimetres.
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 page height in millimetres.
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// Baseline of the report title on the first page.
pub const REPORT_TITLE_Y_MM: f32 = 10.0;
/// Left margin for titles and date headers.
pub const REPORT_MARGIN_X_MM: f32 = 10.0;
/// Left margin for entry lines.
pub const REPORT_ENTRY_X_MM: f32 = 12.0;
/// Vertical position the cursor resets to on every new page.
pub const REPORT_TOP_MARGIN_MM: f32 = 20.0;
/// Cursor position beyond which a page break is emitted.
pub const REPORT_PAGE_BOTTOM_MM: f32 = 280.0;
/// Width available to wrapped entry text.
pub const REPORT_CONTENT_WIDTH_MM: f32 = 180.0;
/// Advance after a date header.
pub const REPORT_HEADER_ADVANCE_MM: f32 = 8.0;
/// Height of one entry line.
pub const REPORT_LINE_HEIGHT_MM: f32 = 6.0;
/// Trailing space after each date group.
pub const REPORT_GROUP_SPACING_MM: f32 = 10.0;
/// Font size of the report title, in points.
pub const REPORT_TITLE_FONT_PT: f32 = 16.0;
/// Font size of date headers, in points.
pub const REPORT_HEADER_FONT_PT: f32 = 14.0;
/// Font size of entry lines, in points.
pub const REPORT_ENTRY_FONT_PT: f32 = 12.0;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "moodlog";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

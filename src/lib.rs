/*!
# Moodlog

Moodlog is an emotional diary for the terminal. Log one of a fixed set of
emotions with a single command, write free-text notes, and export a
paginated PDF summary grouped by day.

## Core Features

- Log catalog emotions, with a 30 second guard against accidental repeats
- Write, revise (in your editor) and delete free-text notes
- Filter any view to a single local calendar day
- Export a PDF report, honouring the dark-mode preference
- Spanish and English interface
- Optional daily desktop reminder at 20:00

## Architecture

- `entry`: entry types and the emotion catalog
- `store`: the entry store and its durable slot storage
- `guard`: duplicate-emotion rule
- `session`: the single in-flight edit
- `filter`: local calendar-day filtering
- `reminder`: daily reminder scheduling and desktop notifications
- `report`: grouping, layout and PDF output
- `diary`: application state tying the above together
- `cli`, `config`, `errors`, `i18n`: the outer shell

## Usage Example

```rust
use chrono::Utc;
use moodlog::diary::Diary;
use moodlog::store::MemoryStorage;

fn main() -> moodlog::AppResult<()> {
    let mut diary = Diary::init(MemoryStorage::new(), None)?;

    diary.add_emotion("Feliz", Utc::now())?;
    diary.add_text("Hoy fue un buen día", Utc::now())?;

    assert_eq!(diary.store().emotions().len(), 1);
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Application state and lifecycle
pub mod diary;
/// External editor integration
pub mod editor;
/// Entry types and the emotion catalog
pub mod entry;
/// Error types and utilities for error handling
pub mod errors;
/// Calendar-day filtering
pub mod filter;
/// Duplicate-emotion guard
pub mod guard;
/// Localized strings
pub mod i18n;
/// Daily reminder
pub mod reminder;
/// PDF report export
pub mod report;
/// Editing session state machine
pub mod session;
/// Entry store and slot storage
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use diary::Diary;
pub use errors::{AppError, AppResult};

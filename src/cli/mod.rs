//! Command-line interface for moodlog.
//!
//! One subcommand per diary action. Dates are accepted as `YYYY-MM-DD` or
//! `YYYYMMDD` and always refer to the local calendar day.

use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DATE_FORMAT_COMPACT, LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use crate::i18n::Language;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// An emotional diary: log how you feel, write notes, export a PDF summary
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(long, global = true, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON], default_value = LOG_FORMAT_TEXT)]
    pub log_format: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log an emotion from the catalog
    Feel {
        /// Emotion name, e.g. Feliz (case-insensitive)
        emotion: String,
    },

    /// Write a free-text note
    Write {
        /// Note text; several words are joined with spaces
        #[clap(required = true)]
        text: Vec<String>,
    },

    /// Revise a text note in your editor
    Edit {
        /// Id of the entry, as shown by `list`
        id: String,
    },

    /// Delete an entry
    Delete {
        /// Id of the entry, as shown by `list`
        id: String,
    },

    /// List entries, optionally for one day
    List {
        /// Only show this day (format: YYYY-MM-DD or YYYYMMDD)
        #[clap(short = 'd', long)]
        date: Option<String>,
    },

    /// Count logged emotions
    Stats {
        /// Only count this day (format: YYYY-MM-DD or YYYYMMDD)
        #[clap(short = 'd', long)]
        date: Option<String>,
    },

    /// List the available emotions
    Emotions,

    /// Export the diary as a PDF report
    Export {
        /// Only export this day (format: YYYY-MM-DD or YYYYMMDD)
        #[clap(short = 'd', long)]
        date: Option<String>,

        /// Output file (defaults to diario-emocional.pdf in the current directory)
        #[clap(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Show or change preferences
    Prefs {
        /// Turn dark mode on or off
        #[clap(long, value_enum)]
        dark_mode: Option<Switch>,

        /// Interface language
        #[clap(long, value_parser = Language::from_str)]
        lang: Option<Language>,
    },

    /// Wait in the foreground and show the daily reminder at 20:00
    Remind {
        /// Grant notification permission without asking
        #[clap(short = 'y', long)]
        yes: bool,
    },
}

/// On/off switch for boolean preferences.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl From<Switch> for bool {
    fn from(switch: Switch) -> bool {
        switch == Switch::On
    }
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}

impl Command {
    /// The `--date` argument of the subcommand, if it takes one.
    pub fn date_arg(&self) -> Option<&str> {
        match self {
            Command::List { date } | Command::Stats { date } | Command::Export { date, .. } => {
                date.as_deref()
            }
            _ => None,
        }
    }
}

/// Parses a date in YYYY-MM-DD or YYYYMMDD format.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::from_str(date_str)
        .or_else(|_| NaiveDate::parse_from_str(date_str, DATE_FORMAT_COMPACT))
}

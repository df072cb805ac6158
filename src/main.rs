/*!
# Moodlog - An Emotional Diary

This file contains the main application flow: it parses arguments, sets up
logging, opens the diary and dispatches one subcommand.

## Usage

```
moodlog <COMMAND>

Commands:
  feel      Log an emotion from the catalog
  write     Write a free-text note
  edit      Revise a text note in your editor
  delete    Delete an entry
  list      List entries, optionally for one day
  stats     Count logged emotions
  emotions  List the available emotions
  export    Export the diary as a PDF report
  prefs     Show or change preferences
  remind    Wait in the foreground and show the daily reminder at 20:00
```

## Configuration

- `MOODLOG_EDITOR` or `EDITOR`: The editor used to revise notes (defaults to "vim")
- `MOODLOG_DIR`: The data directory (defaults to "~/.local/share/moodlog")
- `RUST_LOG`: Log filter (defaults to "info")
*/

use chrono::{Local, NaiveDate, Utc};
use moodlog::cli::{parse_date, CliArgs, Command};
use moodlog::config::Config;
use moodlog::constants::{
    DATE_FORMAT_ISO, DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, REPORT_FILE_NAME, TIME_FORMAT,
    TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
};
use moodlog::diary::{is_silent_rejection, Diary};
use moodlog::editor::SystemEditor;
use moodlog::entry::{Emotion, EntryId};
use moodlog::errors::{AppError, AppResult, DiaryError};
use moodlog::reminder::{DesktopNotifier, Notifier};
use moodlog::report::layout::PageLayout;
use moodlog::report::save_report;
use moodlog::session::CommitAction;
use moodlog::store::{FileStorage, SlotStorage};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(&args.log_format, args.verbose);

    let correlation_id = uuid::Uuid::new_v4().to_string();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id,
    );
    let _enter = root_span.enter();

    info!("Starting moodlog");
    debug!("CLI arguments: {:?}", args);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "Command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the global subscriber writing to stderr.
///
/// `RUST_LOG` wins over the level implied by `--verbose`.
fn init_tracing(log_format: &str, verbose: bool) {
    let default_level = if verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339());

    if log_format == LOG_FORMAT_JSON {
        builder.json().with_current_span(true).init();
    } else {
        builder.init();
    }
}

fn run(args: CliArgs) -> AppResult<ExitCode> {
    if args.command == Command::Emotions {
        for emotion in Emotion::catalog() {
            println!("{} ({})", emotion.name, emotion.color_tag);
        }
        return Ok(ExitCode::SUCCESS);
    }

    info!("Loading configuration");
    let config = Config::load()?;
    config.validate()?;

    let date = args.command.date_arg().map(parse_date_arg).transpose()?;

    let storage = FileStorage::open(&config.data_dir)?;
    let lock = storage.lock()?;
    let mut diary = Diary::init(storage, None)?;
    let strings = diary.strings();
    let now = Utc::now();

    let code = match args.command {
        Command::Feel { emotion } => match diary.add_emotion(&emotion, now) {
            Ok(entry) => {
                println!("{} {} ({})", strings.emotion_saved, entry.emotion.name, entry.id);
                ExitCode::SUCCESS
            }
            Err(AppError::Diary(DiaryError::DuplicateEmotion { .. })) => {
                eprintln!("{}", strings.duplicate_emotion);
                ExitCode::FAILURE
            }
            Err(e) => return Err(e),
        },

        Command::Write { text } => match diary.add_text(&text.join(" "), now) {
            Ok(entry) => {
                println!("{} ({})", strings.text_saved, entry.id);
                ExitCode::SUCCESS
            }
            Err(e) if is_silent_rejection(&e) => {
                debug!("Ignoring empty text");
                ExitCode::SUCCESS
            }
            Err(e) => return Err(e),
        },

        Command::Edit { id } => {
            let editor = SystemEditor {
                editor_cmd: config.editor.clone(),
            };
            match diary.edit_with(&EntryId::from(id.as_str()), &editor) {
                Ok(CommitAction::UpdateText { .. }) => println!("{}", strings.text_saved),
                Ok(CommitAction::Nothing) => println!("{}", strings.emotion_not_editable),
                Err(e) if is_silent_rejection(&e) => println!("{}", strings.edit_cancelled),
                Err(e) => return Err(e),
            }
            ExitCode::SUCCESS
        }

        Command::Delete { id } => {
            let id = EntryId::from(id.as_str());
            let kind = diary.kind_of(&id)?;
            diary.delete_entry(&id, kind)?;
            println!("{}", strings.entry_deleted);
            ExitCode::SUCCESS
        }

        Command::List { .. } => {
            print_entries(&diary, date);
            ExitCode::SUCCESS
        }

        Command::Stats { .. } => {
            println!("{}:", strings.emotions);
            for (emotion, count) in diary.emotion_counts(date, &Local) {
                println!("  {:<12} {}", emotion.name, count);
            }
            ExitCode::SUCCESS
        }

        Command::Export { output, .. } => {
            let path = output.unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME));
            let document = diary.export(date, &Local, &PageLayout::default());
            save_report(&document, &path)?;
            println!("{} {}", strings.report_saved, path.display());
            ExitCode::SUCCESS
        }

        Command::Prefs { dark_mode, lang } => {
            if let Some(switch) = dark_mode {
                diary.set_dark_mode(switch.into())?;
            }
            if let Some(language) = lang {
                diary.set_language(language)?;
            }
            let preferences = diary.preferences();
            let strings = diary.strings();
            println!(
                "{}: {}",
                strings.dark_mode,
                if preferences.dark_mode { "on" } else { "off" }
            );
            println!("{}: {}", strings.language, preferences.language);
            ExitCode::SUCCESS
        }

        Command::Remind { yes } => {
            // The reminder may wait for hours; other invocations must not block on it
            drop(lock);
            remind(&mut diary, yes)?;
            ExitCode::SUCCESS
        }

        Command::Emotions => ExitCode::SUCCESS,
    };

    diary.teardown();
    Ok(code)
}

fn parse_date_arg(raw: &str) -> AppResult<NaiveDate> {
    parse_date(raw).map_err(|_| AppError::InvalidDate(raw.to_string()))
}

fn print_entries<S: SlotStorage>(diary: &Diary<S>, date: Option<NaiveDate>) {
    let strings = diary.strings();
    let filtered = diary.entries_on(date, &Local);
    if filtered.is_empty() {
        println!("{}", strings.no_entries);
        return;
    }

    let stamp = format!("{} {}", DATE_FORMAT_ISO, TIME_FORMAT);
    if !filtered.emotions.is_empty() {
        println!("{}:", strings.emotions);
        for entry in &filtered.emotions {
            println!(
                "  {}  {}  {}",
                entry.id,
                entry.timestamp.with_timezone(&Local).format(&stamp),
                entry.emotion.name
            );
        }
    }
    if !filtered.texts.is_empty() {
        println!("{}:", strings.texts);
        for entry in &filtered.texts {
            println!(
                "  {}  {}  {}",
                entry.id,
                entry.timestamp.with_timezone(&Local).format(&stamp),
                entry.text
            );
        }
    }
}

fn remind<S: SlotStorage>(diary: &mut Diary<S>, pre_granted: bool) -> AppResult<()> {
    let strings = diary.strings();
    let Some(notifier) = DesktopNotifier::detect(strings, pre_granted) else {
        println!("{}", strings.reminder_skipped);
        return Ok(());
    };
    diary.attach_notifier(Arc::new(notifier) as Arc<dyn Notifier>);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        match diary.arm_reminder(&Local::now()) {
            Ok(fire_at) => {
                println!("{} {}", strings.reminder_armed, fire_at.format("%Y-%m-%d %H:%M"));
                diary.wait_for_reminder().await;
                Ok(())
            }
            Err(AppError::Notification(e)) => {
                debug!("Reminder not armed: {}", e);
                println!("{}", strings.reminder_skipped);
                Ok(())
            }
            Err(e) => Err(e),
        }
    })
}

//! Editor abstraction for revising text drafts.
//!
//! Editing a note hands its current text to an external editor through a
//! temporary draft file and reads the result back. The [`Editor`] trait keeps
//! that step swappable so the editing flow can be tested without a terminal.

use crate::constants::{EDIT_DRAFT_PREFIX, EDIT_DRAFT_SUFFIX};
use crate::errors::{AppResult, EditorError};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Trait defining the interface for an editor component.
///
/// # Examples
///
/// ```
/// use moodlog::editor::Editor;
/// use moodlog::errors::AppResult;
///
/// struct Shouting;
///
/// impl Editor for Shouting {
///     fn edit(&self, draft: &str) -> AppResult<String> {
///         Ok(draft.to_uppercase())
///     }
/// }
///
/// assert_eq!(Shouting.edit("hola").unwrap(), "HOLA");
/// ```
pub trait Editor {
    /// Lets the user revise `draft` and returns the revised text.
    ///
    /// # Errors
    ///
    /// Implementations return `AppError::Editor` when the editor cannot be
    /// run or exits unsuccessfully; the draft is then discarded.
    fn edit(&self, draft: &str) -> AppResult<String>;
}

/// Edits drafts with an external command, e.g. `vim` or `nano`.
///
/// # Examples
///
/// ```no_run
/// use moodlog::editor::{Editor, SystemEditor};
///
/// let editor = SystemEditor {
///     editor_cmd: "vim".to_string(),
/// };
/// let revised = editor.edit("hoy fue un buen día").expect("editor failed");
/// ```
pub struct SystemEditor {
    /// The command used to open the draft file.
    pub editor_cmd: String,
}

impl Editor for SystemEditor {
    /// Writes `draft` to a private temporary file, opens it in the editor
    /// and reads it back once the editor exits. The file is removed
    /// afterwards in every case.
    fn edit(&self, draft: &str) -> AppResult<String> {
        let mut file = tempfile::Builder::new()
            .prefix(EDIT_DRAFT_PREFIX)
            .suffix(EDIT_DRAFT_SUFFIX)
            .tempfile()?;
        file.write_all(draft.as_bytes())?;
        file.flush()?;

        launch_editor(&self.editor_cmd, file.path())?;

        Ok(fs::read_to_string(file.path())?)
    }
}

fn launch_editor(editor: &str, path: &Path) -> AppResult<()> {
    let editor_cmd = editor.to_string();
    debug!("Launching editor: {}", editor);

    match Command::new(editor).arg(path).status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(EditorError::NonZeroExit {
            command: editor_cmd,
            status_code: status.code().unwrap_or(-1),
        }
        .into()),
        Err(e) => {
            let specific_error = match e.kind() {
                std::io::ErrorKind::NotFound => EditorError::CommandNotFound {
                    command: editor_cmd,
                    source: e,
                },
                std::io::ErrorKind::PermissionDenied => EditorError::PermissionDenied {
                    command: editor_cmd,
                    source: e,
                },
                _ => EditorError::ExecutionFailed {
                    command: editor_cmd,
                    source: e,
                },
            };
            Err(specific_error.into())
        }
    }
}

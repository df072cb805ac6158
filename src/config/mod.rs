//! Configuration management for the moodlog application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. It supports configuring the data directory
//! and the editor command used to revise text entries.
//!
//! # Environment Variables
//!
//! - `MOODLOG_DIR`: Path to the data directory (defaults to ~/.local/share/moodlog)
//! - `MOODLOG_EDITOR`: Editor to use for revising text entries
//! - `EDITOR`: Fallback editor if MOODLOG_EDITOR is not set (defaults to "vim")
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DEFAULT_DATA_SUBDIR, DEFAULT_EDITOR_COMMAND, EDITOR_FORBIDDEN_CHARS, ENV_VAR_EDITOR,
    ENV_VAR_HOME, ENV_VAR_MOODLOG_DIR, ENV_VAR_MOODLOG_EDITOR, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the moodlog application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use moodlog::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     editor: "nano".to_string(),
///     data_dir: PathBuf::from("/path/to/diary"),
/// };
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use moodlog::Config;
/// use std::env;
///
/// env::set_var("MOODLOG_EDITOR", "code");
/// env::set_var("MOODLOG_DIR", "/custom/diary/path");
///
/// let config = Config::load().expect("Failed to load configuration");
/// assert_eq!(config.editor, "code");
/// ```
pub struct Config {
    /// Editor command used when revising a text entry.
    ///
    /// Loaded from, in order of precedence:
    /// 1. MOODLOG_EDITOR
    /// 2. EDITOR
    /// 3. "vim" if neither is set
    pub editor: String,

    /// Directory holding the storage slots.
    ///
    /// Loaded from MOODLOG_DIR with a fallback to ~/.local/share/moodlog.
    pub data_dir: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("editor", &REDACTED_PLACEHOLDER)
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            editor: DEFAULT_EDITOR_COMMAND.to_string(),
            data_dir: PathBuf::from(""),
        }
    }
}

impl Config {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates an editor command string for security.
    ///
    /// The command must be non-empty and contain neither spaces nor shell
    /// metacharacters; editors that need arguments belong in a wrapper script.
    fn validate_editor_command(editor_cmd: &str) -> AppResult<&str> {
        if editor_cmd.is_empty() {
            return Err(AppError::Config(
                "Editor command cannot be empty".to_string(),
            ));
        }

        if editor_cmd.contains(' ') {
            return Err(AppError::Config(
                "Editor command cannot contain spaces. Use a wrapper script or shell alias for editors requiring arguments".to_string(),
            ));
        }

        if let Some(ch) = editor_cmd
            .chars()
            .find(|c| EDITOR_FORBIDDEN_CHARS.contains(c))
        {
            return Err(AppError::Config(format!(
                "Editor command cannot contain shell metacharacters: '{}'. Use a wrapper script or shell alias instead",
                ch
            )));
        }

        Ok(editor_cmd)
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory is expanded with `shellexpand`, so `~` and
    /// `$VAR` references work.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path expansion fails or yields an empty path
    /// - The editor command fails validation
    pub fn load() -> AppResult<Self> {
        let editor_raw = env::var(ENV_VAR_MOODLOG_EDITOR)
            .or_else(|_| env::var(ENV_VAR_EDITOR))
            .unwrap_or_else(|_| DEFAULT_EDITOR_COMMAND.to_string());
        let editor = Config::validate_editor_command(&editor_raw)?;

        let data_dir_str = env::var(ENV_VAR_MOODLOG_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        Ok(Config {
            editor: editor.to_string(),
            data_dir,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the data directory is empty or relative,
    /// or the editor command is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodlog::Config;
    /// use std::path::PathBuf;
    ///
    /// let valid_config = Config {
    ///     editor: "vim".to_string(),
    ///     data_dir: PathBuf::from("/absolute/path"),
    /// };
    /// assert!(valid_config.validate().is_ok());
    ///
    /// let invalid_config = Config {
    ///     editor: "vim".to_string(),
    ///     data_dir: PathBuf::from("relative/path"),
    /// };
    /// assert!(invalid_config.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if self.editor.is_empty() {
            return Err(AppError::Config("Editor command is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    /// Saves the variables the loader reads and restores them on drop.
    struct EnvGuard(Vec<(&'static str, Option<String>)>);

    impl EnvGuard {
        fn clear() -> Self {
            let saved = [ENV_VAR_MOODLOG_EDITOR, ENV_VAR_EDITOR, ENV_VAR_MOODLOG_DIR]
                .into_iter()
                .map(|key| {
                    let old = env::var(key).ok();
                    env::remove_var(key);
                    (key, old)
                })
                .collect();
            EnvGuard(saved)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.0 {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    #[test]
    fn test_debug_impl_redacts_sensitive_info() {
        let config = Config {
            editor: "vim".to_string(),
            data_dir: PathBuf::from("/home/username/private/diary"),
        };

        let debug_output = format!("{:?}", config);

        assert!(debug_output.contains(REDACTED_PLACEHOLDER));
        assert!(!debug_output.contains("vim"));
        assert!(!debug_output.contains("/home/username/private/diary"));
    }

    #[test]
    fn test_new_config_defaults() {
        let config = Config::new();
        assert_eq!(config.editor, "vim");
        assert_eq!(config.data_dir, PathBuf::from(""));
    }

    #[test]
    #[serial]
    fn test_load_editor_precedence() {
        let _guard = EnvGuard::clear();

        let config = Config::load().unwrap();
        assert_eq!(config.editor, "vim");

        env::set_var(ENV_VAR_EDITOR, "nano");
        let config = Config::load().unwrap();
        assert_eq!(config.editor, "nano");

        env::set_var(ENV_VAR_MOODLOG_EDITOR, "code");
        let config = Config::load().unwrap();
        assert_eq!(config.editor, "code");
    }

    #[test]
    #[serial]
    fn test_load_with_custom_dir() {
        let _guard = EnvGuard::clear();
        let temp_dir = tempdir().unwrap();
        let dir_path = temp_dir.path().to_string_lossy().to_string();

        env::set_var(ENV_VAR_MOODLOG_DIR, &dir_path);
        let config = Config::load().unwrap();

        assert_eq!(config.data_dir, PathBuf::from(dir_path));
    }

    #[test]
    #[serial]
    fn test_load_default_dir_under_home() {
        let _guard = EnvGuard::clear();

        let config = Config::load().unwrap();
        assert!(config.data_dir.ends_with(DEFAULT_DATA_SUBDIR));
    }

    #[test]
    #[serial]
    fn test_load_config_with_invalid_editor() {
        let _guard = EnvGuard::clear();
        env::set_var(ENV_VAR_MOODLOG_DIR, "/tmp");

        env::set_var(ENV_VAR_MOODLOG_EDITOR, "vim --noplugin");
        match Config::load() {
            Err(AppError::Config(msg)) => assert!(msg.contains("cannot contain spaces")),
            _ => panic!("Expected Config error for invalid editor"),
        }

        env::set_var(ENV_VAR_MOODLOG_EDITOR, "echo>/tmp/pwned");
        match Config::load() {
            Err(AppError::Config(msg)) => {
                assert!(msg.contains("Editor command cannot contain shell metacharacters"))
            }
            _ => panic!("Expected Config error for metacharacters"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let cases = [
            ("", "/some/path", "Editor command is empty"),
            ("vim", "", "Data directory path is empty"),
            ("vim", "relative/path", "must be an absolute path"),
        ];

        for (editor, dir, expected) in cases {
            let config = Config {
                editor: editor.to_string(),
                data_dir: PathBuf::from(dir),
            };
            match config.validate() {
                Err(AppError::Config(message)) => assert!(message.contains(expected)),
                _ => panic!("Expected Config error containing '{}'", expected),
            }
        }
    }

    #[test]
    fn test_validate_editor_command_valid() {
        assert_eq!(Config::validate_editor_command("vim").unwrap(), "vim");
        assert_eq!(
            Config::validate_editor_command("/usr/bin/code").unwrap(),
            "/usr/bin/code"
        );
        assert_eq!(
            Config::validate_editor_command("./my-editor").unwrap(),
            "./my-editor"
        );
    }

    #[test]
    fn test_validate_editor_command_with_metacharacters() {
        let test_cases = [
            ("echo>/tmp/file", '>'),
            ("echo|cat", '|'),
            ("vim;echo", ';'),
            ("$(echo)", '$'),
            ("`echo`", '`'),
            ("vim'~/test'", '\''),
            ("vim\\test", '\\'),
            ("vim<file", '<'),
        ];

        for (cmd, ch) in test_cases {
            match Config::validate_editor_command(cmd) {
                Err(AppError::Config(msg)) => {
                    assert!(msg.contains("Editor command cannot contain shell metacharacters"));
                    assert!(msg.contains(&ch.to_string()));
                }
                _ => panic!("Expected Config error for metacharacter '{}'", ch),
            }
        }
    }
}

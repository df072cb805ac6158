//! Desktop notifications through the platform notification service.

use super::{Notifier, Permission, Reminder};
use crate::constants::APP_NAME;
use crate::errors::{AppResult, NotificationError};
use crate::i18n::Strings;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Mutex;
use tracing::debug;

/// Notifier backed by `notify-rust`.
///
/// Permission lives for the lifetime of the process. It starts undetermined
/// unless granted up front, and requesting it asks on the terminal.
pub struct DesktopNotifier {
    permission: Mutex<Permission>,
    strings: &'static Strings,
}

impl DesktopNotifier {
    /// Returns a notifier if the host can show desktop notifications.
    ///
    /// On Linux and the BSDs this requires a D-Bus session bus.
    /// The permission prompt is asked in the language of `strings`.
    pub fn detect(strings: &'static Strings, pre_granted: bool) -> Option<Self> {
        if cfg!(all(unix, not(target_os = "macos")))
            && std::env::var_os("DBUS_SESSION_BUS_ADDRESS").is_none()
        {
            debug!("No D-Bus session bus; desktop notifications unavailable");
            return None;
        }

        let permission = if pre_granted {
            Permission::Granted
        } else {
            Permission::Undetermined
        };
        Some(DesktopNotifier {
            permission: Mutex::new(permission),
            strings,
        })
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        self.permission
            .lock()
            .map(|p| *p)
            .unwrap_or(Permission::Denied)
    }

    fn request_permission(&self) -> Permission {
        // Without a terminal there is nobody to ask.
        let granted = io::stdin().is_terminal() && prompt_yes_no(
                self.strings.notification_prompt,
                self.strings.answer_yes_or_no,
                false,
            );
        let outcome = if granted {
            Permission::Granted
        } else {
            Permission::Denied
        };
        if let Ok(mut permission) = self.permission.lock() {
            *permission = outcome;
        }
        outcome
    }

    fn notify(&self, reminder: &Reminder) -> AppResult<()> {
        notify_rust::Notification::new()
            .appname(APP_NAME)
            .summary(&reminder.title)
            .body(&reminder.body)
            .icon(&reminder.icon)
            .show()
            .map_err(|e| NotificationError::SendFailed(e.to_string()))?;
        Ok(())
    }
}

/// Prompts the user for a yes/no answer with a default.
///
/// Unreadable input counts as the default answer.
///
/// # Arguments
///
/// * `question` - The question to ask
/// * `retry` - Shown before asking again after an unrecognized answer
/// * `default` - Default answer if user just presses Enter
pub fn prompt_yes_no(question: &str, retry: &str, default: bool) -> bool {
    let stdin = io::stdin();
    prompt_yes_no_from(&mut stdin.lock(), &mut io::stdout(), question, retry, default)
}

fn prompt_yes_no_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    retry: &str,
    default: bool,
) -> bool {
    let hint = if default { "[Y/n]" } else { "[y/N]" };

    loop {
        if write!(output, "{} {} ", question, hint)
            .and_then(|_| output.flush())
            .is_err()
        {
            return default;
        }

        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) | Err(_) => return default,
            Ok(_) => {}
        }

        match answer.trim().to_lowercase().as_str() {
            "" => return default,
            "y" | "yes" | "s" | "si" | "sí" => return true,
            "n" | "no" => return false,
            _ => {
                let _ = writeln!(output, "{}", retry);
            }
        }
    }
}

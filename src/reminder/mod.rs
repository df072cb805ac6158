//! Daily reminder scheduling.
//!
//! A [`ReminderScheduler`] keeps at most one pending reminder. Arming it
//! always cancels the previous one first, so re-arming after a language
//! change never leaves two timers running.
//!
//! Notification delivery goes through the [`Notifier`] capability. A host
//! without one, or a user who declines permission, simply gets no reminder.

mod desktop;

pub use desktop::{prompt_yes_no, DesktopNotifier};

use crate::constants::{REMINDER_HOUR, REMINDER_ICON, REMINDER_MINUTE};
use crate::errors::{AppResult, NotificationError};
use crate::i18n::Language;
use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

/// Content of a reminder notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    pub icon: String,
}

impl Reminder {
    /// The daily reminder in `language`: the diary title and the writing prompt.
    pub fn localized(language: Language) -> Self {
        let strings = language.strings();
        Reminder {
            title: strings.title.to_string(),
            body: strings.placeholder.to_string(),
            icon: REMINDER_ICON.to_string(),
        }
    }
}

/// A host notification capability.
pub trait Notifier: Send + Sync {
    /// Current permission state.
    fn permission(&self) -> Permission;

    /// Asks the user for permission and returns the outcome.
    fn request_permission(&self) -> Permission;

    /// Presents `reminder` to the user.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::SendFailed` if the backend rejects it.
    fn notify(&self, reminder: &Reminder) -> AppResult<()>;
}

/// The fixed local time of the daily reminder.
pub fn reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(REMINDER_HOUR, REMINDER_MINUTE, 0).unwrap_or(NaiveTime::MIN)
}

/// Next instant at local time `at`, starting from `now`.
///
/// Today's occurrence is used unless it has already passed; an occurrence
/// exactly at `now` counts as today. A local time that falls in a DST gap
/// is moved forward by an hour.
///
/// # Examples
///
/// ```
/// use moodlog::reminder::next_occurrence;
/// use chrono::{NaiveTime, TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap();
/// let at = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
/// let next = next_occurrence(&now, at);
/// assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 2, 20, 0, 0).unwrap());
/// ```
pub fn next_occurrence<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive().and_time(at);
    let candidate = resolve_local(&tz, today);
    if *now > candidate {
        resolve_local(&tz, today + Duration::days(1))
    } else {
        candidate
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&local))
}

/// Owns the single pending reminder task.
pub struct ReminderScheduler {
    notifier: Option<Arc<dyn Notifier>>,
    at: NaiveTime,
    permission_requested: bool,
    pending: Option<JoinHandle<()>>,
}

impl ReminderScheduler {
    /// Creates a scheduler firing at the default daily time. `None` means the
    /// host has no notification capability.
    pub fn new(notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self::with_time(notifier, reminder_time())
    }

    pub fn with_time(notifier: Option<Arc<dyn Notifier>>, at: NaiveTime) -> Self {
        ReminderScheduler {
            notifier,
            at,
            permission_requested: false,
            pending: None,
        }
    }

    /// Cancels any pending reminder and arms a new one for the next
    /// occurrence after `now`. Must be called inside a tokio runtime.
    ///
    /// Permission is requested at most once per scheduler if undetermined.
    ///
    /// # Returns
    ///
    /// The instant the reminder will fire.
    ///
    /// # Errors
    ///
    /// - `NotificationError::Unavailable` if there is no notifier
    /// - `NotificationError::PermissionDenied` if permission is not granted
    pub fn arm<Tz: TimeZone>(
        &mut self,
        now: &DateTime<Tz>,
        reminder: Reminder,
    ) -> AppResult<DateTime<Tz>> {
        self.cancel();

        let notifier = self
            .notifier
            .clone()
            .ok_or(NotificationError::Unavailable)?;

        let mut permission = notifier.permission();
        if permission == Permission::Undetermined && !self.permission_requested {
            self.permission_requested = true;
            permission = notifier.request_permission();
            debug!(?permission, "Requested notification permission");
        }
        if permission != Permission::Granted {
            return Err(NotificationError::PermissionDenied.into());
        }

        let fire_at = next_occurrence(now, self.at);
        let delay = fire_at
            .clone()
            .signed_duration_since(now.clone())
            .to_std()
            .unwrap_or_default();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match notifier.notify(&reminder) {
                Ok(()) => info!("Reminder delivered"),
                Err(e) => warn!("Failed to deliver reminder: {}", e),
            }
        }));

        info!(delay_secs = delay.as_secs(), "Reminder armed");
        Ok(fire_at)
    }

    /// Cancels the pending reminder, if any. Safe to call repeatedly, and
    /// after the reminder has already fired.
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
            debug!("Reminder cancelled");
        }
    }

    /// True while a reminder is armed and has not fired yet.
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Waits until the pending reminder has fired. Returns immediately if
    /// nothing is armed.
    pub async fn wait(&mut self) {
        if let Some(task) = self.pending.take() {
            // A cancelled task resolves with a JoinError; either way it is done.
            let _ = task.await;
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use std::sync::Mutex;

    struct RecordingNotifier {
        permission: Mutex<Permission>,
        grant_on_request: bool,
        requests: Mutex<u32>,
        delivered: Mutex<Vec<Reminder>>,
    }

    impl RecordingNotifier {
        fn new(permission: Permission, grant_on_request: bool) -> Arc<Self> {
            Arc::new(RecordingNotifier {
                permission: Mutex::new(permission),
                grant_on_request,
                requests: Mutex::new(0),
                delivered: Mutex::new(Vec::new()),
            })
        }

        fn delivered(&self) -> Vec<Reminder> {
            self.delivered.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn permission(&self) -> Permission {
            *self.permission.lock().unwrap()
        }

        fn request_permission(&self) -> Permission {
            *self.requests.lock().unwrap() += 1;
            let outcome = if self.grant_on_request {
                Permission::Granted
            } else {
                Permission::Denied
            };
            *self.permission.lock().unwrap() = outcome;
            outcome
        }

        fn notify(&self, reminder: &Reminder) -> AppResult<()> {
            self.delivered.lock().unwrap().push(reminder.clone());
            Ok(())
        }
    }

    fn as_notifier(notifier: &Arc<RecordingNotifier>) -> Option<Arc<dyn Notifier>> {
        Some(notifier.clone() as Arc<dyn Notifier>)
    }

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_next_occurrence_later_today() {
        let next = next_occurrence(&utc(8, 0), reminder_time());
        assert_eq!(next, utc(20, 0));
    }

    #[test]
    fn test_next_occurrence_exactly_now_is_today() {
        let next = next_occurrence(&utc(20, 0), reminder_time());
        assert_eq!(next, utc(20, 0));
    }

    #[test]
    fn test_next_occurrence_after_time_is_tomorrow() {
        let next = next_occurrence(&utc(20, 1), reminder_time());
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 2, 20, 0, 0).unwrap());
    }

    #[test]
    fn test_next_occurrence_uses_local_wall_clock() {
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = minus_five.with_ymd_and_hms(2024, 1, 1, 19, 0, 0).unwrap();

        let next = next_occurrence(&now, reminder_time());

        assert_eq!(next, minus_five.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap());
        assert_eq!(next.with_timezone(&Utc), Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_localized_reminder_text() {
        let reminder = Reminder::localized(Language::En);
        assert_eq!(reminder.title, "My Emotional Diary");
        assert_eq!(reminder.body, "Write how you feel...");
    }

    #[tokio::test]
    async fn test_no_capability_arms_nothing() {
        let mut scheduler = ReminderScheduler::new(None);
        let result = scheduler.arm(&utc(8, 0), Reminder::localized(Language::Es));
        assert!(matches!(
            result,
            Err(crate::errors::AppError::Notification(
                NotificationError::Unavailable
            ))
        ));
        assert!(!scheduler.is_armed());
    }

    #[tokio::test]
    async fn test_declined_permission_is_requested_once() {
        let notifier = RecordingNotifier::new(Permission::Undetermined, false);
        let mut scheduler = ReminderScheduler::new(as_notifier(&notifier));

        assert!(scheduler
            .arm(&utc(8, 0), Reminder::localized(Language::Es))
            .is_err());
        assert!(scheduler
            .arm(&utc(8, 0), Reminder::localized(Language::En))
            .is_err());

        assert_eq!(*notifier.requests.lock().unwrap(), 1);
        assert!(!scheduler.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_granted_after_request_fires_at_reminder_time() {
        let notifier = RecordingNotifier::new(Permission::Undetermined, true);
        let mut scheduler = ReminderScheduler::new(as_notifier(&notifier));

        let fire_at = scheduler
            .arm(&utc(19, 59), Reminder::localized(Language::Es))
            .unwrap();
        assert_eq!(fire_at, utc(20, 0));
        assert!(scheduler.is_armed());

        scheduler.wait().await;

        let delivered = notifier.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title, "Mi Diario Emocional");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_pending_reminder() {
        let notifier = RecordingNotifier::new(Permission::Granted, true);
        let mut scheduler = ReminderScheduler::new(as_notifier(&notifier));

        scheduler
            .arm(&utc(10, 0), Reminder::localized(Language::Es))
            .unwrap();
        scheduler
            .arm(&utc(10, 0), Reminder::localized(Language::En))
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_secs(11 * 3600)).await;
        scheduler.wait().await;

        let delivered = notifier.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].title, "My Emotional Diary");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent_and_prevents_delivery() {
        let notifier = RecordingNotifier::new(Permission::Granted, true);
        let mut scheduler = ReminderScheduler::new(as_notifier(&notifier));

        scheduler
            .arm(&utc(19, 0), Reminder::localized(Language::Es))
            .unwrap();
        scheduler.cancel();
        scheduler.cancel();

        tokio::time::sleep(std::time::Duration::from_secs(2 * 3600)).await;

        assert!(notifier.delivered().is_empty());
        assert!(!scheduler.is_armed());
        scheduler.wait().await;
    }
}

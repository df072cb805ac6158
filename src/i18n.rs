//! Localized user-facing strings.
//!
//! Every message the diary prints or renders comes from a [`Strings`] table
//! selected by [`Language`]. Switching language takes effect on the next
//! message; nothing is cached.

use std::fmt;
use std::str::FromStr;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Spanish (the default).
    #[default]
    Es,
    /// English.
    En,
}

impl Language {
    /// Two-letter code, as stored in the `lang` slot.
    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }

    /// Returns the string table for this language.
    pub fn strings(self) -> &'static Strings {
        match self {
            Language::Es => &ES,
            Language::En => &EN,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language '{}' (expected es or en)", other)),
        }
    }
}

/// The full set of user-facing strings for one language.
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub placeholder: &'static str,
    pub no_entries: &'static str,
    pub emotions: &'static str,
    pub texts: &'static str,
    pub dark_mode: &'static str,
    pub language: &'static str,
    pub duplicate_emotion: &'static str,
    pub emotion_saved: &'static str,
    pub text_saved: &'static str,
    pub entry_deleted: &'static str,
    pub edit_cancelled: &'static str,
    pub emotion_not_editable: &'static str,
    pub report_saved: &'static str,
    pub reminder_armed: &'static str,
    pub reminder_skipped: &'static str,
    pub notification_prompt: &'static str,
    pub answer_yes_or_no: &'static str,
}

static ES: Strings = Strings {
    title: "Mi Diario Emocional",
    placeholder: "Escribe cómo te sientes...",
    no_entries: "No hay entradas aún.",
    emotions: "Emociones",
    texts: "Textos",
    dark_mode: "Modo oscuro",
    language: "Idioma",
    duplicate_emotion: "Ya registraste esta emoción hace menos de 30 segundos.",
    emotion_saved: "Emoción registrada.",
    text_saved: "Texto guardado.",
    entry_deleted: "Entrada eliminada.",
    edit_cancelled: "Edición cancelada.",
    emotion_not_editable: "Las emociones no se pueden editar, solo eliminar.",
    report_saved: "Informe exportado:",
    reminder_armed: "Recordatorio programado para",
    reminder_skipped: "Recordatorio no programado: notificaciones no disponibles.",
    notification_prompt: "¿Permitir notificaciones de recordatorio diario?",
    answer_yes_or_no: "Responde sí o no.",
};

static EN: Strings = Strings {
    title: "My Emotional Diary",
    placeholder: "Write how you feel...",
    no_entries: "No entries yet.",
    emotions: "Emotions",
    texts: "Texts",
    dark_mode: "Dark Mode",
    language: "Language",
    duplicate_emotion: "You already registered this emotion less than 30 seconds ago.",
    emotion_saved: "Emotion registered.",
    text_saved: "Text saved.",
    entry_deleted: "Entry deleted.",
    edit_cancelled: "Edit cancelled.",
    emotion_not_editable: "Emotions cannot be edited, only deleted.",
    report_saved: "Report exported:",
    reminder_armed: "Reminder scheduled for",
    reminder_skipped: "Reminder not scheduled: notifications unavailable.",
    notification_prompt: "Allow daily reminder notifications?",
    answer_yes_or_no: "Please answer yes or no.",
};

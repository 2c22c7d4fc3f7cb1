//! Contact-form field rules.

use once_cell::sync::Lazy;
use regex::Regex;

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s'-]{2,50}$").expect("valid name pattern"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s+()-]{10,20}$").expect("valid phone pattern"));
static MESSAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^.{10,}$").expect("valid message pattern"));

pub const SERVICE_PLACEHOLDER: &str = "Wählen Sie einen Service";

pub const FORM_INVALID: &str = "Bitte füllen Sie alle Felder korrekt aus";
pub const SUBMIT_SUCCESS: &str = "Nachricht erfolgreich gesendet!";
pub const SUBMIT_BUSY: &str = "Wird gesendet...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Email,
    Phone,
    Service,
    Message,
    Privacy,
}

impl FieldKind {
    /// Every field a contact form may carry, in the order they are checked.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::Name,
        FieldKind::Email,
        FieldKind::Phone,
        FieldKind::Service,
        FieldKind::Message,
        FieldKind::Privacy,
    ];

    /// Element id of the field inside its form.
    pub fn element_id(&self) -> &'static str {
        match self {
            FieldKind::Name => "name",
            FieldKind::Email => "email",
            FieldKind::Phone => "phone",
            FieldKind::Service => "service",
            FieldKind::Message => "message",
            FieldKind::Privacy => "privacy",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FieldKind::Name => "Bitte geben Sie einen gültigen Namen ein (2-50 Zeichen)",
            FieldKind::Email => "Bitte geben Sie eine gültige E-Mail-Adresse ein",
            FieldKind::Phone => "Bitte geben Sie eine gültige Telefonnummer ein (10-20 Zeichen)",
            FieldKind::Message => "Die Nachricht muss mindestens 10 Zeichen lang sein",
            FieldKind::Privacy => "Bitte akzeptieren Sie die Datenschutzerklärung",
            FieldKind::Service => "Bitte wählen Sie einen Service aus",
        }
    }

    /// Checks a field's current input. `checked` only matters for the
    /// privacy checkbox.
    pub fn is_valid(&self, value: &str, checked: bool) -> bool {
        match self {
            FieldKind::Privacy => checked,
            FieldKind::Service => !value.is_empty() && value != SERVICE_PLACEHOLDER,
            FieldKind::Name => NAME_RE.is_match(value.trim()),
            FieldKind::Email => EMAIL_RE.is_match(value.trim()),
            FieldKind::Phone => PHONE_RE.is_match(value.trim()),
            FieldKind::Message => MESSAGE_RE.is_match(value.trim()),
        }
    }
}

/// Per-field validation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    #[default]
    Untouched,
    Invalid,
    Valid,
}

impl FieldState {
    pub fn from_valid(valid: bool) -> Self {
        if valid {
            FieldState::Valid
        } else {
            FieldState::Invalid
        }
    }
}

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const HOMEWORK_NAME_FIELD: &str = "homework_name";
pub const STATUS_FIELD: &str = "status";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("homework record has no `{0}` field")]
    MissingField(&'static str),
    #[error("unknown homework status `{0}`")]
    Unknown(String),
}

/// Review verdict. This enum is the only list of known status codes; both
/// code parsing and notification text derive from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Reviewing,
    Approved,
    Rejected,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Reviewing, Verdict::Approved, Verdict::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Reviewing => "reviewing",
            Verdict::Approved => "approved",
            Verdict::Rejected => "rejected",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Verdict::Reviewing => "Работа взята в ревью,",
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for Verdict {
    type Err = StatusError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Verdict::ALL
            .into_iter()
            .find(|v| v.as_str() == code)
            .ok_or_else(|| StatusError::Unknown(code.to_string()))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed homework record together with the chat message announcing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub homework_name: String,
    pub verdict: Verdict,
    pub message: String,
}

pub fn parse_status(record: &Value) -> Result<StatusUpdate, StatusError> {
    let homework_name = string_field(record, HOMEWORK_NAME_FIELD)?;
    let verdict: Verdict = string_field(record, STATUS_FIELD)?.parse()?;
    Ok(StatusUpdate {
        message: render(homework_name, verdict),
        homework_name: homework_name.to_string(),
        verdict,
    })
}

pub fn render(homework_name: &str, verdict: Verdict) -> String {
    format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework_name,
        verdict.text()
    )
}

// A non-string value is as useless as an absent one.
fn string_field<'a>(record: &'a Value, field: &'static str) -> Result<&'a str, StatusError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or(StatusError::MissingField(field))
}

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// The instant every clock in the gallery is rendered against.
///
/// An invalid instant is a normal state, not an error: clocks render
/// placeholder text until a valid instant arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceInstant {
    Valid(DateTime<Utc>),
    Invalid { input: String },
}

impl ReferenceInstant {
    pub fn now() -> Self {
        Self::Valid(Utc::now())
    }

    pub fn from_datetime<Tz: TimeZone>(datetime: DateTime<Tz>) -> Self {
        Self::Valid(datetime.with_timezone(&Utc))
    }

    /// Parses RFC 3339, or a naive `YYYY-MM-DDTHH:MM[:SS]` taken as UTC.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::from_datetime(parsed);
        }
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
            .map(|naive| Self::Valid(Utc.from_utc_datetime(&naive)))
            .unwrap_or_else(|_| Self::Invalid {
                input: input.to_string(),
            })
    }

    pub fn as_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Valid(instant) => Some(*instant),
            Self::Invalid { .. } => None,
        }
    }
}

impl fmt::Display for ReferenceInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(instant) => write!(f, "{}", instant.format("%Y-%m-%dT%H:%M:%SZ")),
            Self::Invalid { input } => write!(f, "invalid ({input:?})"),
        }
    }
}

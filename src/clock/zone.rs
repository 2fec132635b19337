use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Narrow no-break space shown in place of an offset label on UTC-like clocks.
pub const NARROW_SPACER: &str = "\u{202F}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockZone {
    #[default]
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
}

impl ClockZone {
    /// Accepts `UTC`/`GMT`/`Z`, `UTC+5`/`GMT-03:30` style offsets, bare
    /// `+05:00`/`-0930`/`+05` offsets, and any tz database name (case-insensitive),
    /// which covers abbreviations such as `EST` as well as `America/New_York`.
    pub fn normalize(spec: &str) -> Option<Self> {
        let trimmed = spec.trim();
        if trimmed.is_empty() {
            return None;
        }

        let upper = trimmed.to_ascii_uppercase();
        if matches!(upper.as_str(), "UTC" | "GMT" | "Z") {
            return Some(Self::Utc);
        }
        for prefix in ["UTC", "GMT"] {
            if let Some(rest) = upper.strip_prefix(prefix)
                && rest.starts_with(['+', '-'])
            {
                return parse_fixed_offset(rest).map(Self::from_fixed);
            }
        }
        if trimmed.starts_with(['+', '-']) {
            return parse_fixed_offset(trimmed).map(Self::from_fixed);
        }

        Tz::from_str(trimmed)
            .or_else(|_| Tz::from_str_insensitive(trimmed))
            .ok()
            .map(Self::Named)
    }

    fn from_fixed(offset: FixedOffset) -> Self {
        if offset.local_minus_utc() == 0 {
            Self::Utc
        } else {
            Self::Fixed(offset)
        }
    }

    /// True for zones that are UTC regardless of the instant.
    pub fn is_utc(&self) -> bool {
        matches!(self, Self::Utc)
    }

    pub fn offset_at(&self, instant: DateTime<Utc>) -> FixedOffset {
        match self {
            Self::Utc => Utc.fix(),
            Self::Fixed(offset) => *offset,
            Self::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
        }
    }

    pub fn offset_seconds_at(&self, instant: DateTime<Utc>) -> i32 {
        self.offset_at(instant).local_minus_utc()
    }

    pub fn zoned(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset_at(instant))
    }
}

fn parse_fixed_offset(input: &str) -> Option<FixedOffset> {
    let (sign, body) = match input.as_bytes().first()? {
        b'+' => (1, &input[1..]),
        b'-' => (-1, &input[1..]),
        _ => return None,
    };
    if !body.is_ascii() {
        return None;
    }

    let (hours, minutes) = match body.split_once(':') {
        Some((hours, minutes)) if minutes.len() == 2 => (hours, minutes),
        Some(_) => return None,
        None if body.len() == 4 => body.split_at(2),
        None => (body, "00"),
    };
    if hours.is_empty() || hours.len() > 2 || !is_ascii_digits(hours) || !is_ascii_digits(minutes)
    {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
}

fn is_ascii_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}

pub fn format_time(zoned: &DateTime<FixedOffset>) -> String {
    zoned.format("%H:%M").to_string()
}

pub fn format_iso_date(zoned: &DateTime<FixedOffset>) -> String {
    zoned.format("%Y-%m-%d").to_string()
}

pub fn format_offset_label(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    format!("UTC{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

pub fn relative_day_caption(date: NaiveDate, base: NaiveDate) -> String {
    match date.signed_duration_since(base).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        days if days > 1 => format!("In {days} days"),
        days => format!("{} days ago", -days),
    }
}

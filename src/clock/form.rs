use std::fmt;

use anyhow::Result;
use log::info;

use crate::clock::error::ValidationError;
use crate::clock::model::UTC_CLOCK;
use crate::clock::zone::ClockZone;
use crate::store::repository::ClockRepository;

/// Numeric offset shorthand: `5`, `-9`, `+5:30`, `05:45`.
///
/// Sign defaults to `+`, hours are one or two digits, minutes are optional
/// (two digits, default `00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetShorthand {
    pub negative: bool,
    pub hours: u8,
    pub minutes: u8,
}

impl OffsetShorthand {
    pub fn parse(input: &str) -> Option<Self> {
        let (negative, rest) = match input.as_bytes().first()? {
            b'+' => (false, &input[1..]),
            b'-' => (true, &input[1..]),
            _ => (false, input),
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some((hours, minutes)) => (hours, Some(minutes)),
            None => (rest, None),
        };

        if !(1..=2).contains(&hours.len()) || !hours.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let minutes = match minutes {
            Some(minutes) if minutes.len() == 2 && minutes.bytes().all(|b| b.is_ascii_digit()) => {
                minutes.parse().ok()?
            }
            Some(_) => return None,
            None => 0,
        };

        Some(Self {
            negative,
            hours: hours.parse().ok()?,
            minutes,
        })
    }
}

impl fmt::Display for OffsetShorthand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        write!(f, "{sign}{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Expands shorthand to `±HH:MM`; anything else passes through unchanged.
pub fn expand_offset(input: &str) -> String {
    OffsetShorthand::parse(input)
        .map(|shorthand| shorthand.to_string())
        .unwrap_or_else(|| input.to_string())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        Err(ValidationError::EmptyName)
    } else if name.eq_ignore_ascii_case(UTC_CLOCK) {
        Err(ValidationError::ReservedName)
    } else {
        Ok(())
    }
}

pub fn validate_offset(offset: &str) -> Result<(), ValidationError> {
    if offset.is_empty() {
        return Err(ValidationError::EmptyOffset);
    }
    match ClockZone::normalize(offset) {
        Some(_) => Ok(()),
        None => Err(ValidationError::InvalidOffset),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Add,
    Edit {
        original: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Committed { name: String, offset: String },
    Rejected,
}

#[derive(Debug, Default)]
pub struct ClockForm {
    pub name: String,
    pub offset: String,
    name_error: Option<ValidationError>,
    offset_error: Option<ValidationError>,
    mode: FormMode,
    open: bool,
}

impl ClockForm {
    pub fn open_add(&mut self) {
        self.reset();
        self.open = true;
    }

    pub fn open_edit(&mut self, name: &str, offset: &str) {
        self.reset();
        self.name = name.to_string();
        self.offset = offset.to_string();
        self.mode = FormMode::Edit {
            original: name.to_string(),
        };
        self.open = true;
    }

    /// Closes without committing. Clears values and validation state.
    pub fn close(&mut self) {
        self.reset();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn name_error(&self) -> Option<&ValidationError> {
        self.name_error.as_ref()
    }

    pub fn offset_error(&self) -> Option<&ValidationError> {
        self.offset_error.as_ref()
    }

    pub fn clear_name_error(&mut self) {
        self.name_error = None;
    }

    pub fn clear_offset_error(&mut self) {
        self.offset_error = None;
    }

    /// Field errors leave the repository untouched and the form open. An edit
    /// that renames a clock replaces the old entry and carries a reference
    /// selection over to the new name. Renaming onto another existing clock
    /// is rejected.
    pub fn submit<R: ClockRepository>(&mut self, repository: &mut R) -> Result<SubmitOutcome> {
        self.name = self.name.trim().to_string();
        self.offset = expand_offset(self.offset.trim());

        self.name_error = validate_name(&self.name).err();
        self.offset_error = validate_offset(&self.offset).err();
        if self.name_error.is_some() || self.offset_error.is_some() {
            return Ok(SubmitOutcome::Rejected);
        }

        let mut definitions = repository.load()?;
        if let FormMode::Edit { original } = &self.mode
            && *original != self.name
            && definitions.contains(&self.name)
        {
            self.name_error = Some(ValidationError::DuplicateName);
            return Ok(SubmitOutcome::Rejected);
        }
        let renamed_from = match &self.mode {
            FormMode::Edit { original } if *original != self.name => {
                definitions.remove(original);
                Some(original.clone())
            }
            _ => None,
        };
        definitions.upsert(&self.name, &self.offset);
        repository.save(&definitions)?;

        if let Some(original) = renamed_from {
            info!("renamed clock '{original}' to '{}'", self.name);
            if repository.load_selection()?.as_deref() == Some(original.as_str()) {
                repository.save_selection(&self.name)?;
            }
        }
        info!("saved clock '{}' -> '{}'", self.name, self.offset);

        let outcome = SubmitOutcome::Committed {
            name: self.name.clone(),
            offset: self.offset.clone(),
        };
        self.reset();
        Ok(outcome)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

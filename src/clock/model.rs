use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use log::warn;
use serde_json::{Map, Value};

use crate::clock::zone::ClockZone;

/// Name and zone of the clock that always exists and can never be edited.
pub const UTC_CLOCK: &str = "UTC";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockDefinition {
    pub name: String,
    pub offset: String,
}

/// Clock name to offset specifier, in insertion order.
///
/// Always contains `UTC -> "UTC"`; every constructor and mutator keeps it that way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockDefinitions {
    entries: Vec<ClockDefinition>,
}

impl Default for ClockDefinitions {
    fn default() -> Self {
        Self {
            entries: vec![ClockDefinition {
                name: UTC_CLOCK.to_string(),
                offset: UTC_CLOCK.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResolvedClock<'a> {
    pub definition: &'a ClockDefinition,
    pub zone: Option<ClockZone>,
}

impl ClockDefinitions {
    pub fn from_pairs<I, N, O>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, O)>,
        N: Into<String>,
        O: Into<String>,
    {
        let mut definitions = Self {
            entries: Vec::new(),
        };
        for (name, offset) in pairs {
            definitions.insert_raw(name.into(), offset.into());
        }
        definitions.ensure_utc();
        definitions
    }

    pub fn from_json_text(content: &str) -> Result<Self> {
        let raw = serde_json::from_str::<Map<String, Value>>(content).map_err(|err| {
            let line = err.line();
            let column = err.column();
            anyhow!("invalid clock JSON at line {line}, column {column}: {err}")
        })?;

        let mut pairs = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            match value {
                Value::String(offset) => pairs.push((name, offset)),
                other => warn!("dropping clock '{name}' with non-string offset {other}"),
            }
        }
        Ok(Self::from_pairs(pairs))
    }

    pub fn to_json_text(&self) -> Result<String> {
        let map = self
            .entries
            .iter()
            .map(|entry| (entry.name.clone(), Value::String(entry.offset.clone())))
            .collect::<Map<String, Value>>();
        Ok(serde_json::to_string(&Value::Object(map))?)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.offset.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts or replaces a clock in place. Writes to `UTC` are ignored.
    pub fn upsert(&mut self, name: &str, offset: &str) -> bool {
        if name == UTC_CLOCK {
            return false;
        }
        self.insert_raw(name.to_string(), offset.to_string());
        true
    }

    /// Removes a clock and returns its offset. `UTC` is never removed.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        if name == UTC_CLOCK {
            return None;
        }
        let index = self.entries.iter().position(|entry| entry.name == name)?;
        Some(self.entries.remove(index).offset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Orders clocks by their UTC offset at `now`, ascending.
    ///
    /// The sort is stable, so equal offsets keep mapping order. Specifiers that
    /// don't resolve go last.
    pub fn sorted_by_offset(&self, now: DateTime<Utc>) -> Vec<ResolvedClock<'_>> {
        let mut resolved = self
            .entries
            .iter()
            .map(|definition| ResolvedClock {
                definition,
                zone: ClockZone::normalize(&definition.offset),
            })
            .collect::<Vec<_>>();
        resolved.sort_by_key(|clock| match clock.zone {
            Some(zone) => (0, zone.offset_seconds_at(now)),
            None => (1, 0),
        });
        resolved
    }

    fn insert_raw(&mut self, name: String, offset: String) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(existing) => existing.offset = offset,
            None => self.entries.push(ClockDefinition { name, offset }),
        }
    }

    fn ensure_utc(&mut self) {
        self.insert_raw(UTC_CLOCK.to_string(), UTC_CLOCK.to_string());
    }
}

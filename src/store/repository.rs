use anyhow::Result;
use log::{info, warn};

use crate::clock::model::ClockDefinitions;
use crate::store::KeyValueStore;

pub const CLOCKS_KEY: &str = "clocks";
pub const REFERENCE_KEY: &str = "ref";

/// Persistence for clock definitions and the selected reference clock.
pub trait ClockRepository {
    /// Loads definitions, initialising and persisting `{UTC: "UTC"}` when absent.
    fn load(&mut self) -> Result<ClockDefinitions>;
    fn save(&mut self, definitions: &ClockDefinitions) -> Result<()>;
    fn load_selection(&self) -> Result<Option<String>>;
    fn save_selection(&mut self, name: &str) -> Result<()>;
}

/// Stores definitions as JSON text under `clocks` and the selection under `ref`.
#[derive(Debug)]
pub struct StoreRepository<S> {
    store: S,
}

impl<S: KeyValueStore> StoreRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn reset_definitions(&mut self) -> Result<ClockDefinitions> {
        let defaults = ClockDefinitions::default();
        self.save(&defaults)?;
        Ok(defaults)
    }
}

impl<S: KeyValueStore> ClockRepository for StoreRepository<S> {
    fn load(&mut self) -> Result<ClockDefinitions> {
        let Some(text) = self.store.get(CLOCKS_KEY)? else {
            info!("no stored clocks, initialising with UTC only");
            return self.reset_definitions();
        };

        match ClockDefinitions::from_json_text(&text) {
            Ok(definitions) => Ok(definitions),
            Err(err) => {
                warn!("stored clocks are unreadable, resetting to UTC only: {err:#}");
                self.reset_definitions()
            }
        }
    }

    fn save(&mut self, definitions: &ClockDefinitions) -> Result<()> {
        let text = definitions.to_json_text()?;
        self.store.set(CLOCKS_KEY, &text)
    }

    fn load_selection(&self) -> Result<Option<String>> {
        self.store.get(REFERENCE_KEY)
    }

    fn save_selection(&mut self, name: &str) -> Result<()> {
        self.store.set(REFERENCE_KEY, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn first_load_initialises_and_persists_utc() {
        let mut repository = StoreRepository::new(MemoryStore::default());
        let definitions = repository.load().expect("load");
        assert_eq!(definitions, ClockDefinitions::default());
        assert_eq!(repository.store().raw(CLOCKS_KEY), Some(r#"{"UTC":"UTC"}"#));
    }

    #[test]
    fn load_forces_utc_mapping() {
        let mut repository = StoreRepository::new(MemoryStore::with_entries([(
            CLOCKS_KEY,
            r#"{"UTC":"Asia/Tokyo","Paris":"Europe/Paris"}"#,
        )]));
        let definitions = repository.load().expect("load");
        assert_eq!(definitions.get("UTC"), Some("UTC"));
        assert_eq!(definitions.get("Paris"), Some("Europe/Paris"));
    }

    #[test]
    fn corrupted_clocks_reset_and_persist() {
        let mut repository = StoreRepository::new(MemoryStore::with_entries([
            (CLOCKS_KEY, "{ definitely not json"),
            (REFERENCE_KEY, "Paris"),
        ]));
        let definitions = repository.load().expect("load recovers");
        assert_eq!(definitions, ClockDefinitions::default());
        assert_eq!(repository.store().raw(CLOCKS_KEY), Some(r#"{"UTC":"UTC"}"#));
        assert_eq!(repository.store().raw(REFERENCE_KEY), Some("Paris"));
    }

    #[test]
    fn selection_round_trips_as_plain_string() {
        let mut repository = StoreRepository::new(MemoryStore::default());
        assert_eq!(repository.load_selection().expect("load"), None);
        repository.save_selection("Tokyo").expect("save");
        assert_eq!(repository.store().raw(REFERENCE_KEY), Some("Tokyo"));
        assert_eq!(
            repository.load_selection().expect("load").as_deref(),
            Some("Tokyo")
        );
    }
}

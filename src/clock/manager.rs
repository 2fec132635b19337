use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};

use crate::clock::error::ValidationError;
use crate::clock::form::{ClockForm, SubmitOutcome};
use crate::clock::gallery::ClockGallery;
use crate::clock::instant::ReferenceInstant;
use crate::clock::model::{ClockDefinitions, UTC_CLOCK};
use crate::store::repository::ClockRepository;
use crate::time_provider::SelectedInstantSource;

pub struct WorldClocks<R> {
    repository: R,
    source: SelectedInstantSource,
    definitions: ClockDefinitions,
    reference_name: String,
    reference_instant: ReferenceInstant,
    gallery: ClockGallery,
    form: ClockForm,
}

impl<R: ClockRepository> WorldClocks<R> {
    pub fn new(repository: R, source: SelectedInstantSource) -> Result<Self> {
        let reference_instant = source.now();
        let mut clocks = Self {
            repository,
            source,
            definitions: ClockDefinitions::default(),
            reference_name: UTC_CLOCK.to_string(),
            reference_instant,
            gallery: ClockGallery::default(),
            form: ClockForm::default(),
        };
        clocks.reload()?;
        Ok(clocks)
    }

    /// A stored reference that no longer exists is repaired to `UTC` and persisted.
    pub fn reload(&mut self) -> Result<()> {
        self.definitions = self.repository.load()?;

        let stored = self.repository.load_selection()?;
        self.reference_name = match stored {
            Some(name) if self.definitions.contains(&name) => name,
            other => {
                if let Some(missing) = other {
                    warn!("reference clock '{missing}' no longer exists, falling back to UTC");
                }
                self.repository.save_selection(UTC_CLOCK)?;
                UTC_CLOCK.to_string()
            }
        };

        let now = self.source.now().as_utc().unwrap_or_else(Utc::now);
        let sorted = self.definitions.sorted_by_offset(now);
        self.gallery.rebuild(&sorted, &self.reference_name);
        self.gallery.update_all(&self.reference_instant);
        debug!(
            "reloaded {} definition(s) into {} card(s), reference '{}'",
            self.definitions.len(),
            self.gallery.subscription_count(),
            self.reference_name
        );
        Ok(())
    }

    pub fn update_clocks(&mut self, instant: ReferenceInstant) {
        self.reference_instant = instant;
        self.gallery.update_all(&self.reference_instant);
    }

    pub fn refresh(&mut self) {
        let now = self.source.now();
        self.update_clocks(now);
    }

    /// Returns `false` when `name` was already the reference.
    pub fn select_reference(&mut self, name: &str) -> Result<bool> {
        if name == self.reference_name {
            return Ok(false);
        }
        if !self.definitions.contains(name) {
            return Err(ValidationError::UnknownClock(name.to_string()).into());
        }
        self.repository.save_selection(name)?;
        info!("reference clock set to '{name}'");
        self.reload()?;
        Ok(true)
    }

    /// Removes a clock. Callers confirm with the user first.
    pub fn delete_clock(&mut self, name: &str) -> Result<()> {
        if name == UTC_CLOCK {
            return Err(ValidationError::ImmutableClock(name.to_string()).into());
        }
        let mut definitions = self.repository.load()?;
        if definitions.remove(name).is_none() {
            return Err(ValidationError::UnknownClock(name.to_string()).into());
        }
        self.repository.save(&definitions)?;
        info!("deleted clock '{name}'");
        self.reload()
    }

    pub fn open_add_form(&mut self) {
        self.form.open_add();
    }

    pub fn open_edit_form(&mut self, name: &str) -> Result<(), ValidationError> {
        if name == UTC_CLOCK {
            return Err(ValidationError::ImmutableClock(name.to_string()));
        }
        let offset = self
            .definitions
            .get(name)
            .ok_or_else(|| ValidationError::UnknownClock(name.to_string()))?;
        self.form.open_edit(name, offset);
        Ok(())
    }

    pub fn submit_form(&mut self) -> Result<SubmitOutcome> {
        let outcome = self.form.submit(&mut self.repository)?;
        if matches!(outcome, SubmitOutcome::Committed { .. }) {
            self.reload()?;
        }
        Ok(outcome)
    }

    pub fn close_form(&mut self) {
        self.form.close();
    }

    pub fn form(&self) -> &ClockForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ClockForm {
        &mut self.form
    }

    pub fn gallery(&self) -> &ClockGallery {
        &self.gallery
    }

    pub fn reference_name(&self) -> &str {
        &self.reference_name
    }

    pub fn reference_instant(&self) -> &ReferenceInstant {
        &self.reference_instant
    }

    pub fn source_label(&self) -> &'static str {
        self.source.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::gallery::ClockCard;
    use crate::store::MemoryStore;
    use crate::store::repository::{CLOCKS_KEY, REFERENCE_KEY, StoreRepository};
    use crate::time_provider::select_source;

    type TestClocks = WorldClocks<StoreRepository<MemoryStore>>;

    fn clocks_with<const N: usize>(entries: [(&str, &str); N]) -> TestClocks {
        WorldClocks::new(
            StoreRepository::new(MemoryStore::with_entries(entries)),
            select_source(Some("2024-01-01T00:00:00Z")),
        )
        .expect("clocks load")
    }

    fn names(clocks: &TestClocks) -> Vec<&str> {
        clocks
            .gallery()
            .cards()
            .iter()
            .map(|card| card.name.as_str())
            .collect()
    }

    fn card<'a>(clocks: &'a TestClocks, name: &str) -> &'a ClockCard {
        clocks
            .gallery()
            .cards()
            .iter()
            .find(|card| card.name == name)
            .expect("card present")
    }

    #[test]
    fn renders_sorted_gallery_on_startup() {
        let clocks = clocks_with([(CLOCKS_KEY, r#"{"A":"+02:00","B":"-05:00","UTC":"UTC"}"#)]);
        assert_eq!(names(&clocks), ["B", "UTC", "A"]);
        assert_eq!(clocks.gallery().subscription_count(), 3);
        assert_eq!(card(&clocks, "B").display.time, "19:00");
        assert_eq!(card(&clocks, "A").display.date, "Today");
    }

    #[test]
    fn missing_reference_is_repaired_and_persisted() {
        let clocks = clocks_with([
            (CLOCKS_KEY, r#"{"Tokyo":"Asia/Tokyo"}"#),
            (REFERENCE_KEY, "Atlantis"),
        ]);
        assert_eq!(clocks.reference_name(), "UTC");
        assert!(card(&clocks, "UTC").selected);
        assert_eq!(clocks.repository.load_selection().expect("load").as_deref(), Some("UTC"));
    }

    #[test]
    fn selecting_reference_persists_and_rerenders() {
        let mut clocks = clocks_with([(CLOCKS_KEY, r#"{"NY":"-05:00","Tokyo":"+09:00"}"#)]);
        assert_eq!(card(&clocks, "Tokyo").display.date, "Today");

        assert!(clocks.select_reference("NY").expect("select"));
        assert_eq!(clocks.reference_name(), "NY");
        assert!(card(&clocks, "NY").selected);
        assert!(!card(&clocks, "UTC").selected);
        assert_eq!(card(&clocks, "Tokyo").display.date, "Tomorrow");
        assert_eq!(card(&clocks, "NY").display.date, "Today");

        assert!(!clocks.select_reference("NY").expect("no-op"));
        assert!(clocks.select_reference("Nowhere").is_err());
    }

    #[test]
    fn deleting_only_clock_leaves_utc() {
        let mut clocks = clocks_with([(CLOCKS_KEY, r#"{"Tokyo":"Asia/Tokyo"}"#)]);
        clocks.select_reference("Tokyo").expect("select");
        clocks.delete_clock("Tokyo").expect("delete");
        assert_eq!(names(&clocks), ["UTC"]);
        assert_eq!(clocks.gallery().subscription_count(), 1);
        assert_eq!(clocks.reference_name(), "UTC");
    }

    #[test]
    fn utc_cannot_be_deleted_or_edited() {
        let mut clocks = clocks_with([]);
        let err = clocks.delete_clock("UTC").expect_err("utc is immutable");
        assert!(err.to_string().contains("cannot be modified"));
        assert_eq!(
            clocks.open_edit_form("UTC"),
            Err(ValidationError::ImmutableClock("UTC".to_string()))
        );
        assert!(!clocks.form().is_open());
    }

    #[test]
    fn edit_form_is_prefilled() {
        let mut clocks = clocks_with([(CLOCKS_KEY, r#"{"Tokyo":"Asia/Tokyo"}"#)]);
        clocks.open_edit_form("Tokyo").expect("editable");
        assert!(clocks.form().is_open());
        assert_eq!(clocks.form().name, "Tokyo");
        assert_eq!(clocks.form().offset, "Asia/Tokyo");
    }

    #[test]
    fn submitted_form_reloads_gallery() {
        let mut clocks = clocks_with([]);
        clocks.open_add_form();
        clocks.form_mut().name = "Mumbai".to_string();
        clocks.form_mut().offset = "5:30".to_string();
        let outcome = clocks.submit_form().expect("submit");
        assert!(matches!(outcome, SubmitOutcome::Committed { .. }));
        assert_eq!(names(&clocks), ["UTC", "Mumbai"]);
        assert_eq!(card(&clocks, "Mumbai").display.offset_label, "UTC+05:30");
        assert_eq!(card(&clocks, "Mumbai").display.time, "05:30");
    }

    #[test]
    fn invalid_instant_shows_placeholders_everywhere() {
        let mut clocks = clocks_with([(CLOCKS_KEY, r#"{"Tokyo":"Asia/Tokyo"}"#)]);
        clocks.update_clocks(ReferenceInstant::parse("garbage"));
        for card in clocks.gallery().cards() {
            assert_eq!(card.display.time, "??:??");
        }
        assert_eq!(card(&clocks, "UTC").display.date, "????-??-??");
        assert_eq!(card(&clocks, "Tokyo").display.date, "?");

        clocks.refresh();
        assert_eq!(card(&clocks, "Tokyo").display.time, "09:00");
    }
}

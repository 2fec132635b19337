use crate::clock::manager::WorldClocks;
use crate::store::repository::ClockRepository;

pub fn gallery_lines<R: ClockRepository>(clocks: &WorldClocks<R>) -> Vec<String> {
    let cards = clocks.gallery().cards();
    let name_width = cards
        .iter()
        .map(|card| card.name.chars().count())
        .max()
        .unwrap_or(0);

    cards
        .iter()
        .map(|card| {
            let marker = if card.selected { "[x]" } else { "[ ]" };
            format!(
                "{marker} {:<name_width$}  {:<9}  {}  {}",
                card.name,
                card.display.offset_label.trim(),
                card.display.time,
                card.display.date,
            )
        })
        .collect()
}

pub fn print_gallery<R: ClockRepository>(clocks: &WorldClocks<R>) {
    println!("World clocks");
    println!("Instant source: {}", clocks.source_label());
    println!("Reference instant: {}", clocks.reference_instant());
    println!("Reference clock: {}", clocks.reference_name());
    for line in gallery_lines(clocks) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::repository::{CLOCKS_KEY, REFERENCE_KEY, StoreRepository};
    use crate::time_provider::select_source;

    #[test]
    fn lines_follow_gallery_order_and_mark_reference() {
        let store = MemoryStore::with_entries([
            (CLOCKS_KEY, r#"{"Tokyo":"+09:00","Los Angeles":"-08:00"}"#),
            (REFERENCE_KEY, "Tokyo"),
        ]);
        let clocks = WorldClocks::new(
            StoreRepository::new(store),
            select_source(Some("2024-03-10T12:00:00Z")),
        )
        .expect("clocks load");

        assert_eq!(
            gallery_lines(&clocks),
            [
                "[ ] Los Angeles  UTC-08:00  04:00  Today",
                "[ ] UTC                     12:00  2024-03-10",
                "[x] Tokyo        UTC+09:00  21:00  Today",
            ]
        );
    }
}

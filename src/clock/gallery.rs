use log::debug;

use crate::clock::instant::ReferenceInstant;
use crate::clock::model::{ResolvedClock, UTC_CLOCK};
use crate::clock::zone::{
    ClockZone, NARROW_SPACER, format_iso_date, format_offset_label, format_time,
    relative_day_caption,
};

const PLACEHOLDER_TIME: &str = "??:??";
const PLACEHOLDER_OFFSET: &str = "???";
const PLACEHOLDER_DATE: &str = "?";
const PLACEHOLDER_ISO_DATE: &str = "????-??-??";

/// Index of a card in the gallery arena. Only valid until the next rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardId(usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockDisplay {
    pub offset_label: String,
    pub time: String,
    pub date: String,
}

impl ClockDisplay {
    fn placeholder(utc_like: bool) -> Self {
        if utc_like {
            Self {
                offset_label: NARROW_SPACER.to_string(),
                time: PLACEHOLDER_TIME.to_string(),
                date: PLACEHOLDER_ISO_DATE.to_string(),
            }
        } else {
            Self {
                offset_label: PLACEHOLDER_OFFSET.to_string(),
                time: PLACEHOLDER_TIME.to_string(),
                date: PLACEHOLDER_DATE.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClockCard {
    pub name: String,
    pub offset_spec: String,
    pub selected: bool,
    pub display: ClockDisplay,
}

impl ClockCard {
    /// The UTC card has no edit or delete controls.
    pub fn is_editable(&self) -> bool {
        self.name != UTC_CLOCK
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClockSubscription {
    card: CardId,
    zone: Option<ClockZone>,
}

impl ClockSubscription {
    /// Relative-day captions compare the clock's local date against the
    /// local date of the same instant on the reference clock.
    pub fn render(&self, instant: &ReferenceInstant, reference: ClockZone) -> ClockDisplay {
        let Some(zone) = self.zone else {
            return ClockDisplay::placeholder(false);
        };
        let Some(instant) = instant.as_utc() else {
            return ClockDisplay::placeholder(zone.is_utc());
        };

        let zoned = zone.zoned(instant);
        if zoned.offset().local_minus_utc() == 0 {
            return ClockDisplay {
                offset_label: NARROW_SPACER.to_string(),
                time: format_time(&zoned),
                date: format_iso_date(&zoned),
            };
        }

        let base = reference.zoned(instant).date_naive();
        ClockDisplay {
            offset_label: format_offset_label(zoned.offset()),
            time: format_time(&zoned),
            date: relative_day_caption(zoned.date_naive(), base),
        }
    }
}

#[derive(Debug, Default)]
pub struct ClockGallery {
    cards: Vec<ClockCard>,
    subscriptions: Vec<ClockSubscription>,
    reference_zone: ClockZone,
}

impl ClockGallery {
    pub fn rebuild(&mut self, sorted: &[ResolvedClock<'_>], reference_name: &str) {
        self.cards.clear();
        self.subscriptions.clear();
        self.reference_zone = sorted
            .iter()
            .find(|clock| clock.definition.name == reference_name)
            .and_then(|clock| clock.zone)
            .unwrap_or_default();

        for clock in sorted {
            let card = CardId(self.cards.len());
            self.cards.push(ClockCard {
                name: clock.definition.name.clone(),
                offset_spec: clock.definition.offset.clone(),
                selected: clock.definition.name == reference_name,
                display: ClockDisplay::default(),
            });
            self.subscriptions.push(ClockSubscription {
                card,
                zone: clock.zone,
            });
        }
        debug!("gallery rebuilt with {} clock(s)", self.cards.len());
    }

    pub fn update_all(&mut self, instant: &ReferenceInstant) {
        for subscription in &self.subscriptions {
            self.cards[subscription.card.0].display =
                subscription.render(instant, self.reference_zone);
        }
    }

    pub fn cards(&self) -> &[ClockCard] {
        &self.cards
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

use crate::clock::instant::ReferenceInstant;

pub trait InstantSource {
    fn now(&self) -> ReferenceInstant;
}

pub struct SystemInstantSource;

impl InstantSource for SystemInstantSource {
    fn now(&self) -> ReferenceInstant {
        ReferenceInstant::now()
    }
}

/// Always returns the same instant, valid or not.
pub struct PinnedInstantSource {
    instant: ReferenceInstant,
}

impl InstantSource for PinnedInstantSource {
    fn now(&self) -> ReferenceInstant {
        self.instant.clone()
    }
}

pub struct SelectedInstantSource {
    pub source: Box<dyn InstantSource>,
    pub label: &'static str,
}

impl SelectedInstantSource {
    pub fn now(&self) -> ReferenceInstant {
        self.source.now()
    }
}

pub fn select_source(pinned: Option<&str>) -> SelectedInstantSource {
    match pinned {
        Some(text) => SelectedInstantSource {
            source: Box::new(PinnedInstantSource {
                instant: ReferenceInstant::parse(text),
            }),
            label: "PINNED",
        },
        None => SelectedInstantSource {
            source: Box::new(SystemInstantSource),
            label: "SYSTEM_CLOCK",
        },
    }
}

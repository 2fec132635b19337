use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, TextEdit, TopBottomPanel, Ui};
use log::error;

use crate::clock::form::{FormMode, SubmitOutcome};
use crate::clock::gallery::ClockCard;
use crate::clock::manager::WorldClocks;
use crate::store::repository::ClockRepository;

const CARD_WIDTH: f32 = 220.0;
const CARD_FILL: Color32 = Color32::from_rgb(16, 24, 38);
const SELECTED_FILL: Color32 = Color32::from_rgb(22, 44, 58);
const ACCENT: Color32 = Color32::from_rgb(96, 228, 206);
const CLOCK_MAIN: Color32 = Color32::from_rgb(255, 214, 117);
const MUTED: Color32 = Color32::from_rgb(169, 188, 209);
const OK: Color32 = Color32::from_rgb(111, 228, 134);
const ALERT: Color32 = Color32::from_rgb(255, 124, 124);
const DANGER_FILL: Color32 = Color32::from_rgb(150, 40, 48);

pub struct GuiOptions {
    pub live: bool,
    pub tick: Duration,
    pub store_path: PathBuf,
}

pub fn run_gui<R: ClockRepository + 'static>(
    clocks: WorldClocks<R>,
    options: GuiOptions,
) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("World Clocks")
            .with_inner_size([980.0, 640.0])
            .with_min_inner_size([520.0, 360.0]),
        ..Default::default()
    };

    let app = WorldClocksApp::new(clocks, options);

    eframe::run_native(
        "World Clocks",
        native_options,
        Box::new(move |cc| {
            configure_theme(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow!("failed to launch World Clocks GUI: {err}"))?;

    Ok(())
}

fn configure_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(Color32::from_rgb(226, 234, 246));
    visuals.panel_fill = Color32::from_rgb(8, 16, 26);
    visuals.window_fill = Color32::from_rgb(12, 20, 32);
    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(10, 18, 30);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(16, 24, 38);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(26, 42, 62);
    visuals.widgets.active.bg_fill = Color32::from_rgb(34, 60, 88);
    visuals.selection.bg_fill = Color32::from_rgb(43, 148, 178);
    ctx.set_visuals(visuals);
}

#[derive(Debug, Clone)]
enum CardAction {
    Select(String),
    Edit(String),
    Delete(String),
}

struct WorldClocksApp<R> {
    clocks: WorldClocks<R>,
    live: bool,
    tick: Duration,
    store_path: PathBuf,
    next_tick: Instant,
    status_message: Option<(String, Instant)>,
    pending_delete: Option<String>,
}

impl<R: ClockRepository> WorldClocksApp<R> {
    fn new(clocks: WorldClocks<R>, options: GuiOptions) -> Self {
        Self {
            clocks,
            live: options.live,
            tick: options.tick,
            store_path: options.store_path,
            next_tick: Instant::now(),
            status_message: None,
            pending_delete: None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, ttl: Duration) {
        self.status_message = Some((text.into(), Instant::now() + ttl));
    }

    fn report_error(&mut self, context: &str, err: anyhow::Error) {
        error!("{context}: {err:#}");
        self.set_status(format!("{context}: {err}"), Duration::from_secs(4));
    }

    fn show_header(&mut self, ui: &mut Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new("World Clocks")
                    .size(26.0)
                    .color(ACCENT)
                    .strong(),
            );
            ui.separator();
            ui.label(
                RichText::new(format!("Reference: {}", self.clocks.reference_instant()))
                    .size(16.0)
                    .color(MUTED),
            );
        });

        ui.horizontal(|ui| {
            if ui.button("Refresh").clicked() {
                self.clocks.refresh();
                self.next_tick = Instant::now() + self.tick;
            }
            if ui.button("Add clock").clicked() {
                self.clocks.open_add_form();
            }
            if ui.checkbox(&mut self.live, "Live").changed() && self.live {
                self.next_tick = Instant::now();
            }
        });

        if let Some((msg, _)) = &self.status_message {
            ui.label(RichText::new(msg).color(OK).strong());
        }
    }

    fn show_gallery(&mut self, ui: &mut Ui) {
        let mut action: Option<CardAction> = None;
        ScrollArea::vertical()
            .id_salt("gallery_scroll")
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for card in self.clocks.gallery().cards() {
                        if let Some(clicked) = show_card(ui, card) {
                            action = Some(clicked);
                        }
                    }
                });
            });

        if let Some(action) = action {
            self.apply_card_action(action);
        }
    }

    fn apply_card_action(&mut self, action: CardAction) {
        match action {
            CardAction::Select(name) => match self.clocks.select_reference(&name) {
                Ok(true) => {
                    self.set_status(format!("Reference clock set to '{name}'."), Duration::from_secs(3))
                }
                Ok(false) => {}
                Err(err) => self.report_error("Select failed", err),
            },
            CardAction::Edit(name) => {
                if let Err(err) = self.clocks.open_edit_form(&name) {
                    self.set_status(err.to_string(), Duration::from_secs(3));
                }
            }
            CardAction::Delete(name) => self.pending_delete = Some(name),
        }
    }

    fn show_form_window(&mut self, ctx: &egui::Context) {
        if !self.clocks.form().is_open() {
            return;
        }

        let title = match self.clocks.form().mode() {
            FormMode::Add => "Add clock",
            FormMode::Edit { .. } => "Edit clock",
        };
        let mut submit = false;
        let mut cancel = false;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                let form = self.clocks.form_mut();

                ui.label("Name");
                if ui
                    .add(TextEdit::singleline(&mut form.name).hint_text("Tokyo"))
                    .changed()
                {
                    form.clear_name_error();
                }
                if let Some(err) = form.name_error() {
                    ui.colored_label(ALERT, err.to_string());
                }

                ui.add_space(6.0);
                ui.label("Offset");
                let offset_response = ui.add(
                    TextEdit::singleline(&mut form.offset)
                        .hint_text("+05:30, 5, EST, America/New_York"),
                );
                if offset_response.changed() {
                    form.clear_offset_error();
                }
                if offset_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                if let Some(err) = form.offset_error() {
                    ui.colored_label(ALERT, err.to_string());
                }

                ui.add_space(10.0);
                ui.separator();
                ui.horizontal(|ui| {
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.button("Save").clicked() {
                            submit = true;
                        }
                        if ui.button("Cancel").clicked() {
                            cancel = true;
                        }
                    });
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            cancel = true;
        }

        if cancel {
            self.clocks.close_form();
        } else if submit {
            match self.clocks.submit_form() {
                Ok(SubmitOutcome::Committed { name, offset }) => {
                    self.set_status(format!("Saved clock '{name}' ({offset})."), Duration::from_secs(3))
                }
                Ok(SubmitOutcome::Rejected) => {}
                Err(err) => self.report_error("Save failed", err),
            }
        }
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(name) = self.pending_delete.clone() else {
            return;
        };
        let mut confirmed = false;
        let mut cancelled = false;

        egui::Window::new("Delete clock")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(300.0);
                ui.label(format!("Are you sure you want to delete \"{name}\"?"));
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let delete = egui::Button::new(RichText::new("Delete").color(Color32::WHITE))
                            .fill(DANGER_FILL);
                        if ui.add(delete).clicked() {
                            confirmed = true;
                        }
                        if ui.button("Cancel").clicked() {
                            cancelled = true;
                        }
                    });
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            cancelled = true;
        }

        if confirmed {
            self.pending_delete = None;
            match self.clocks.delete_clock(&name) {
                Ok(()) => self.set_status(format!("Deleted clock '{name}'."), Duration::from_secs(3)),
                Err(err) => self.report_error("Delete failed", err),
            }
        } else if cancelled {
            self.pending_delete = None;
        }
    }
}

fn show_card(ui: &mut Ui, card: &ClockCard) -> Option<CardAction> {
    let mut action = None;
    let fill = if card.selected { SELECTED_FILL } else { CARD_FILL };

    egui::Frame::group(ui.style())
        .fill(fill)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.horizontal(|ui| {
                ui.label(RichText::new(if card.selected { "●" } else { "○" }).color(ACCENT));
                ui.label(RichText::new(&card.name).size(18.0).strong())
                    .on_hover_text(card.offset_spec.as_str());
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(
                        RichText::new(&card.display.offset_label)
                            .monospace()
                            .color(MUTED),
                    );
                });
            });
            ui.label(
                RichText::new(&card.display.time)
                    .size(34.0)
                    .monospace()
                    .color(CLOCK_MAIN)
                    .strong(),
            );
            ui.label(RichText::new(&card.display.date).color(MUTED));
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let select = ui
                    .add_enabled(!card.selected, egui::Button::new("Set reference"))
                    .on_hover_text("Use this clock as the day anchor for captions");
                if select.clicked() {
                    action = Some(CardAction::Select(card.name.clone()));
                }
                if card.is_editable() {
                    if ui.button("Edit").clicked() {
                        action = Some(CardAction::Edit(card.name.clone()));
                    }
                    let delete = egui::Button::new(RichText::new("Delete").color(ALERT))
                        .fill(Color32::from_rgb(51, 20, 24));
                    if ui.add(delete).clicked() {
                        action = Some(CardAction::Delete(card.name.clone()));
                    }
                }
            });
        });

    action
}

impl<R: ClockRepository> eframe::App for WorldClocksApp<R> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some((_, expires_at)) = &self.status_message
            && Instant::now() >= *expires_at
        {
            self.status_message = None;
        }

        let now = Instant::now();
        if self.live && now >= self.next_tick {
            self.clocks.refresh();
            self.next_tick = now + self.tick;
        }

        TopBottomPanel::top("header")
            .resizable(false)
            .show(ctx, |ui| self.show_header(ui));

        TopBottomPanel::bottom("footer")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        RichText::new(format!(
                            "Source: {} | Reference clock: {}",
                            self.clocks.source_label(),
                            self.clocks.reference_name()
                        ))
                        .color(MUTED),
                    );
                    ui.separator();
                    ui.label(
                        RichText::new(format!("Store: {}", self.store_path.display()))
                            .color(MUTED),
                    );
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| self.show_gallery(ui));

        self.show_form_window(ctx);
        self.show_delete_confirmation(ctx);

        if self.live {
            let wait = self.next_tick.saturating_duration_since(Instant::now());
            ctx.request_repaint_after(wait);
        }
    }
}

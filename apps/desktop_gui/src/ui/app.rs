use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Item, ItemId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
    reducer::{apply_action, apply_event, ListState, UiAction},
};

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: ListState,
    status: String,
}

impl DesktopGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            state: ListState::default(),
            status: String::new(),
        };
        app.act(UiAction::Reload);
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if let Some(cmd) = apply_event(&mut self.state, event) {
                self.send(cmd);
            }
        }
    }

    fn act(&mut self, action: UiAction) {
        if let Some(cmd) = apply_action(&mut self.state, action) {
            self.send(cmd);
        }
    }

    fn send(&mut self, cmd: BackendCommand) {
        let is_reorder = matches!(cmd, BackendCommand::Reorder(_));
        match dispatch_backend_command(&self.cmd_tx, cmd) {
            Ok(()) => self.status.clear(),
            Err(status) => {
                // The optimistic move never left the window; undo it.
                if is_reorder {
                    apply_event(
                        &mut self.state,
                        UiEvent::ReorderFailed(UiError::from_message(
                            UiErrorContext::Reorder,
                            status.clone(),
                        )),
                    );
                } else {
                    self.state.loading = false;
                }
                self.status = status;
            }
        }
    }

    fn show_toolbar(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            ui.heading("Items");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let busy = self.state.loading || self.state.list.is_syncing();
                if ui
                    .add_enabled(!busy, egui::Button::new("Reload"))
                    .clicked()
                {
                    actions.push(UiAction::Reload);
                }
                if self.state.list.is_syncing() {
                    ui.spinner();
                    ui.label("Saving…");
                } else if self.state.loading {
                    ui.spinner();
                    ui.label("Loading…");
                }
            });
        });
    }

    fn show_error_banner(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Some(error) = &self.state.error else {
            return;
        };
        ui.horizontal(|ui| {
            ui.colored_label(ui.visuals().error_fg_color, error.banner_text());
            if ui.small_button("Dismiss").clicked() {
                actions.push(UiAction::DismissError);
            }
        });
    }

    fn show_items(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let items: &[Item] = self.state.list.items();
        if items.is_empty() && !self.state.loading {
            ui.weak("No items.");
            return;
        }
        let locked = self.state.list.is_syncing();
        let last = items.len().saturating_sub(1);

        for (index, item) in items.iter().enumerate() {
            let row = ui.horizontal(|ui| {
                let rank = index as u32;
                if ui
                    .add_enabled(!locked && index > 0, egui::Button::new("▲").small())
                    .clicked()
                {
                    actions.push(UiAction::MoveTo {
                        id: item.id.clone(),
                        to_index: rank - 1,
                    });
                }
                if ui
                    .add_enabled(!locked && index < last, egui::Button::new("▼").small())
                    .clicked()
                {
                    actions.push(UiAction::MoveTo {
                        id: item.id.clone(),
                        to_index: rank + 1,
                    });
                }

                let drag_id = egui::Id::new(("item", item.id.as_str()));
                if locked {
                    ui.label(row_text(item));
                } else {
                    ui.dnd_drag_source(drag_id, item.id.clone(), |ui| {
                        ui.label(row_text(item));
                    });
                }
            });

            let response = row.response;
            if let Some(hovered) = response.dnd_hover_payload::<ItemId>() {
                if *hovered != item.id {
                    let stroke = ui.visuals().selection.stroke;
                    let rect = response.rect;
                    ui.painter().rect_stroke(
                        rect.expand(2.0),
                        2.0,
                        stroke,
                        egui::StrokeKind::Outside,
                    );
                }
            }
            if let Some(dropped) = response.dnd_release_payload::<ItemId>() {
                actions.push(UiAction::Drop {
                    active: (*dropped).clone(),
                    over: item.id.clone(),
                });
            }
        }
    }
}

fn row_text(item: &Item) -> String {
    format!("☰  {:>2}  {}", item.order, item.name)
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_toolbar(ui, &mut actions);
            self.show_error_banner(ui, &mut actions);
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_items(ui, &mut actions);
            });
            if !self.status.is_empty() {
                ui.separator();
                ui.small(&self.status);
            }
        });

        for action in actions {
            self.act(action);
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

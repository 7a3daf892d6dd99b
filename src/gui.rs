// EMS Log Filter - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the UI panels, the background load, and the save action.

use crate::app::load::{LoadManager, LoadProgress};
use crate::app::state::AppState;
use crate::app::workflow::{save_selected, SaveRequest};
use crate::platform::editor::OpenInEditor;
use crate::ui;

/// The EMS Log Filter application.
pub struct EmsLogFilterApp {
    pub state: AppState,
    pub load_manager: LoadManager,
    pub editor: Box<dyn OpenInEditor + Send>,
}

impl EmsLogFilterApp {
    /// Create a new application instance with the given state.
    pub fn new(state: AppState, editor: Box<dyn OpenInEditor + Send>) -> Self {
        Self {
            state,
            load_manager: LoadManager::new(),
            editor,
        }
    }

    /// Run "Save & View" against the current UI snapshot.
    fn save(&mut self) {
        let Some(loaded) = self.state.loaded.as_ref() else {
            return;
        };
        let criteria = self.state.criteria();
        let selection = self.state.selection();
        let request = SaveRequest {
            source: &loaded.path,
            entries: &loaded.parsed.entries,
            criteria: &criteria,
            selection: &selection,
            timestamp: chrono::Local::now(),
        };
        let result = save_selected(&request, &mut self.state.memory, &*self.editor);

        match result {
            Ok(outcome) => {
                let summary = outcome.summary();
                if outcome.memory_error.is_some() || outcome.editor_error.is_some() {
                    self.state.notify_error(summary);
                } else {
                    self.state.status_message = summary;
                }
            }
            Err(e) => self.state.notify_error(format!("Save failed: {e}")),
        }
    }
}

impl eframe::App for EmsLogFilterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll for a finished load.
        if let Some(msg) = self.load_manager.poll() {
            match msg {
                LoadProgress::Completed(loaded) => self.state.apply_loaded(loaded),
                LoadProgress::Failed { error, .. } => {
                    self.state.loading = false;
                    self.state.notify_error(format!("Load failed: {error}"));
                }
            }
        }
        // Keep repainting while the worker runs so the result appears promptly.
        if self.load_manager.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }

        // pending_load: the Load button picked a file.
        if let Some(path) = self.state.pending_load.take() {
            self.state.loading = true;
            self.state.status_message = format!("Loading {}\u{2026}", path.display());
            self.load_manager.start_load(path, self.state.parse_config());
        }

        let enabled = !self.state.loading;

        // Top bar: load button and file name.
        egui::TopBottomPanel::top("load_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    if ui.button("Load Log File").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Log files", &["log", "txt"])
                            .add_filter("All files", &["*"])
                            .pick_file()
                        {
                            self.state.pending_load = Some(path);
                        }
                    }
                });
                if self.state.loading {
                    ui.spinner();
                }
                match self.state.file_name() {
                    Some(name) => ui.label(format!("FileName: {name}")),
                    None => ui.label(egui::RichText::new("No file loaded").color(ui::theme::MUTED_TEXT)),
                };
            });
            ui.add_space(4.0);
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.state.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.state.debug_mode {
                        ui.label(egui::RichText::new("DEBUG").color(ui::theme::MUTED_TEXT));
                    }
                    let count = self.state.warnings.len();
                    if count > 0 {
                        let label = ui.label(
                            egui::RichText::new(format!("\u{26a0} {count}"))
                                .color(ui::theme::WARNING_TEXT),
                        );
                        label.on_hover_text(self.state.warnings.join("\n"));
                    }
                });
            });
        });

        // Save bar
        egui::TopBottomPanel::bottom("save_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.vertical_centered(|ui| {
                let can_save = self.state.can_save();
                if ui
                    .add_enabled(can_save, egui::Button::new("Save & View"))
                    .clicked()
                {
                    self.state.request_save = true;
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                ui::panels::keys::render(ui, &mut self.state);
                ui.separator();
                ui::panels::filters::render(ui, &mut self.state);
            });
        });

        if std::mem::take(&mut self.state.request_save) {
            self.save();
        }
    }
}

// EMS Log Filter - ui/panels/keys.rs
//
// Key checkbox grid with the "Prev. Filters" dropdown.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the remembered-selection dropdown and one checkbox per key.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        let labels = state.history_labels();
        ui.add_enabled_ui(!labels.is_empty() && !state.checkboxes.is_empty(), |ui| {
            egui::ComboBox::from_label("Prev. Filters")
                .selected_text("Choose\u{2026}")
                .show_ui(ui, |ui| {
                    for (n, label) in labels.iter().enumerate() {
                        if ui.selectable_label(false, label.as_str()).clicked() {
                            state.apply_history(n);
                        }
                    }
                });
        });

        ui.separator();
        ui.add_enabled_ui(!state.checkboxes.is_empty(), |ui| {
            if ui.small_button("Select All").clicked() {
                state.set_all(true);
            }
            if ui.small_button("Select None").clicked() {
                state.set_all(false);
            }
        });
    });

    ui.separator();

    if state.checkboxes.is_empty() {
        ui.label(egui::RichText::new("Load a log file to list its keys.").color(theme::MUTED_TEXT));
        return;
    }

    ui.label(format!(
        "Keys ({} of {} selected):",
        state.checked_count(),
        state.checkboxes.len()
    ));

    let columns = state.config.checkbox_columns.max(1);
    egui::ScrollArea::both()
        .id_salt("key_checkboxes")
        .auto_shrink([false, true])
        .max_height(ui.available_height() * 0.6)
        .show(ui, |ui| {
            egui::Grid::new("key_grid")
                .spacing(theme::CHECKBOX_SPACING)
                .show(ui, |ui| {
                    for (i, checkbox) in state.checkboxes.iter_mut().enumerate() {
                        ui.checkbox(&mut checkbox.checked, checkbox.key.as_str());
                        if (i + 1) % columns == 0 {
                            ui.end_row();
                        }
                    }
                });
        });
}

// EMS Log Filter - ui/panels/filters.rs
//
// Filter controls: text filter, include/exclude, context lines, key mode.

use crate::app::state::AppState;
use crate::core::model::KeySelectionMode;
use crate::ui::theme;
use crate::util::constants::MAX_CONTEXT_LINES;

/// Render the filter controls.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label("Filter Text:");
    ui.add(
        egui::TextEdit::singleline(&mut state.filter_text)
            .hint_text("e.g. 192.168.1.1")
            .desired_width(theme::FILTER_TEXT_WIDTH),
    );
    ui.horizontal(|ui| {
        ui.checkbox(&mut state.filter_out, "Filter out")
            .on_hover_text("Keep only entries that do NOT contain the text");
        ui.checkbox(&mut state.case_sensitive, "Case sensitive");
    });

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label("# Lines Before:");
        ui.add(egui::DragValue::new(&mut state.lines_before).range(0..=MAX_CONTEXT_LINES));
        ui.label("After:");
        ui.add(egui::DragValue::new(&mut state.lines_after).range(0..=MAX_CONTEXT_LINES));
    });

    ui.add_space(4.0);
    ui.label("Selected keys:");
    ui.horizontal_wrapped(|ui| {
        for mode in KeySelectionMode::all() {
            ui.radio_value(&mut state.key_mode, *mode, mode.label());
        }
    });
}

// EMS Log Filter - ui/theme.rs
//
// Colours and layout constants.
// No dependencies on app state or business logic.

use egui::Color32;

/// Status bar text for errors and warnings.
pub const WARNING_TEXT: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600

/// Dimmed text (e.g. "No file loaded").
pub const MUTED_TEXT: Color32 = Color32::from_rgb(107, 114, 128); // Gray 500

/// Layout constants.
pub const WINDOW_SIZE: [f32; 2] = [520.0, 700.0];
pub const MIN_WINDOW_SIZE: [f32; 2] = [420.0, 480.0];
pub const FILTER_TEXT_WIDTH: f32 = 260.0;
pub const CHECKBOX_SPACING: [f32; 2] = [12.0, 4.0];

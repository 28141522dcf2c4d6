use eframe::egui::{self, Color32, DragValue, RichText, Ui};

use crate::data::model::SampleSet;
use crate::state::{AppState, Axis};

// ---------------------------------------------------------------------------
// Left side panel – view settings
// ---------------------------------------------------------------------------

/// Render the left view-settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("View");
    ui.separator();

    ui.strong("Marker size");
    ui.add(egui::Slider::new(&mut state.config.marker_size, 0.1..=10.0).logarithmic(true));
    ui.separator();

    limits_editor(ui, state, Axis::X, "Fixed z limits");
    limits_editor(ui, state, Axis::Y, "Fixed v limits");
    ui.separator();

    match state.samples.as_ref().and_then(SampleSet::extent) {
        Some(ext) => {
            ui.strong("Data extent");
            ui.label(format!("z: [{:.4}, {:.4}]", ext.z[0], ext.z[1]));
            ui.label(format!("v: [{:.4}, {:.4}]", ext.v[0], ext.v[1]));
        }
        None => {
            ui.label("No finite samples.");
        }
    }
}

fn limits_editor(ui: &mut Ui, state: &mut AppState, axis: Axis, title: &str) {
    let current = match axis {
        Axis::X => state.config.x_limits,
        Axis::Y => state.config.y_limits,
    };

    let mut fixed = current.is_some();
    if ui.checkbox(&mut fixed, title).changed() {
        state.set_fixed_limits(axis, fixed);
    }

    if let Some([mut lo, mut hi]) = current.filter(|_| fixed) {
        let changed = ui
            .horizontal(|ui: &mut Ui| {
                let a = ui.add(DragValue::new(&mut lo).speed(0.05).prefix("min "));
                let b = ui.add(DragValue::new(&mut hi).speed(0.05).prefix("max "));
                a.changed() || b.changed()
            })
            .inner;
        if changed {
            state.set_limits(axis, lo, hi);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                // Failures already land in the status line.
                let _ = state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(samples), Some(source)) = (&state.samples, &state.source) {
            ui.label(format!("{} samples from {}", samples.len(), source.display()));
        }

        ui.separator();

        if ui.button("Reset view").clicked() {
            state.reset_view = true;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open portrait samples")
        .add_filter("Sample files", &["txt", "dat"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        // Failures already land in the status line.
        let _ = state.load_path(&path);
    }
}

use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FilterField;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Wells");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the menus so we can mutate state inside the loop.
    let menus = [
        (FilterField::Operator, dataset.operators.clone()),
        (FilterField::Contractor, dataset.contractors.clone()),
    ];

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (field, options) in &menus {
                let n_selected = state.filters.selected(*field).len();
                let header_text = if n_selected == 0 {
                    format!("Select {}  (all)", field.label())
                } else {
                    format!("Select {}  ({n_selected}/{})", field.label(), options.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        if options.is_empty() {
                            ui.weak("No values in this column.");
                            return;
                        }
                        if ui
                            .add_enabled(n_selected > 0, egui::Button::new("Clear").small())
                            .clicked()
                        {
                            state.clear_filter(*field);
                        }

                        for value in options {
                            let mut checked = state.filters.selected(*field).contains(value);
                            let mut text = RichText::new(value);
                            if *field == FilterField::Operator {
                                let color = state.color_map.color_for(Some(value.as_str()));
                                text = text.color(color);
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(*field, value);
                            }
                        }
                    });
                ui.separator();
            }
        });
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
            let loaded = state.dataset.is_some();
            if ui
                .add_enabled(loaded, egui::Button::new("Download as Excel…"))
                .clicked()
            {
                save_file_dialog(state, ReportFormat::Excel);
                ui.close_menu();
            }
            if ui
                .add_enabled(loaded, egui::Button::new("Download as CSV…"))
                .clicked()
            {
                save_file_dialog(state, ReportFormat::Csv);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let file = state
                .source
                .as_deref()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let filtered = if state.filters.is_active() { " (filtered)" } else { "" };
            ui.label(format!(
                "{file}: {} wells loaded, {} visible{filtered}",
                ds.len(),
                state.visible_indices.len()
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.notice {
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Excel,
    Csv,
}

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload Cost Optimization Excel File")
        .add_filter("Supported files", &["xlsx", "xlsm", "csv", "json", "parquet", "pq"])
        .add_filter("Excel", &["xlsx", "xlsm"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState, format: ReportFormat) {
    let base = Path::new(&state.config.report_file_name);
    let (file_name, filter_name, ext) = match format {
        ReportFormat::Excel => (base.with_extension("xlsx"), "Excel", "xlsx"),
        ReportFormat::Csv => (base.with_extension("csv"), "CSV", "csv"),
    };

    let file = rfd::FileDialog::new()
        .set_title("Download Results")
        .set_file_name(file_name.to_string_lossy())
        .add_filter(filter_name, &[ext])
        .save_file();

    let Some(mut path) = file else {
        return;
    };
    if path.extension().is_none() {
        path.set_extension(ext);
    }

    match state.export(&path) {
        Ok(()) => {
            state.status_message = None;
            state.notice = Some(format!("Saved {}", path.display()));
        }
        Err(e) => {
            log::error!("Failed to export report: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

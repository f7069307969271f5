use eframe::egui::{Color32, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::panels::{ReportFormat, save_file_dialog};
use crate::ui::{plot, table};

const DILUTION_COLOR: Color32 = Color32::from_rgb(70, 130, 180);
const HAUL_OFF_COLOR: Color32 = Color32::from_rgb(205, 133, 63);

// ---------------------------------------------------------------------------
// Report (central panel)
// ---------------------------------------------------------------------------

/// Render the report: table, three charts and the download buttons.
pub fn report_view(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(
                "Please upload a drilling cost optimization report in Excel format.  (File → Open…)",
            );
        });
        return;
    };
    if dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.weak("The uploaded file contains no wells.");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            {
                let rows = state.visible_rows();

                ui.heading("Calculated Cost Metrics");
                table::report_table(ui, &rows);
                ui.add_space(12.0);

                ui.heading("Cost Per Day Distribution");
                plot::cost_per_day_chart(ui, &rows, &state.color_map);
                ui.add_space(12.0);

                ui.heading("Dilution Cost Per Foot by Well");
                plot::per_foot_chart(
                    ui,
                    "dilution_cost_per_foot",
                    "Dilution_Cost_Per_Foot",
                    &rows,
                    |m| m.dilution_cost_per_foot,
                    DILUTION_COLOR,
                );
                ui.add_space(12.0);

                ui.heading("Haul-Off Cost Per Foot by Well");
                plot::per_foot_chart(
                    ui,
                    "haul_off_cost_per_foot",
                    "Haul_Off_Cost_Per_Foot",
                    &rows,
                    |m| m.haul_off_cost_per_foot,
                    HAUL_OFF_COLOR,
                );
                ui.add_space(12.0);
            }

            ui.heading("Download Results");
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Download Data as Excel").clicked() {
                    save_file_dialog(state, ReportFormat::Excel);
                }
                if ui.button("Download Data as CSV").clicked() {
                    save_file_dialog(state, ReportFormat::Csv);
                }
            });
        });
}

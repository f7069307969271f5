use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{DerivedRecord, REPORT_COLUMNS, ReportCell};

/// Text shown for a report cell. Null values render as `-`.
pub fn format_cell(cell: ReportCell<'_>) -> String {
    match cell {
        ReportCell::Text(Some(s)) => s.to_string(),
        ReportCell::Number(Some(v)) if v.fract() == 0.0 => format!("{v:.0}"),
        ReportCell::Number(Some(v)) => format!("{v:.2}"),
        ReportCell::Text(None) | ReportCell::Number(None) => "-".to_string(),
    }
}

/// Render the thirteen report columns for the visible rows.
pub fn report_table(ui: &mut Ui, rows: &[&DerivedRecord]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(70.0), REPORT_COLUMNS.len())
        .min_scrolled_height(0.0)
        .max_scroll_height(320.0)
        .header(20.0, |mut header| {
            for name in REPORT_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let record = rows[row.index()];
                for cell in record.report_cells() {
                    row.col(|ui| {
                        ui.label(format_cell(cell));
                    });
                }
            });
        });

    if rows.is_empty() {
        ui.weak("No wells match the current filters.");
    }
}

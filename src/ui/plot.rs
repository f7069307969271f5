use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, Legend, Line, Plot, PlotPoints, PlotUi, Points, uniform_grid_spacer,
};

use crate::color::ColorMap;
use crate::data::model::{CostMetrics, DerivedRecord};

const CHART_HEIGHT: f32 = 240.0;
const NO_OPERATOR: &str = "(no operator)";

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// `[position, value]` points for a metric, skipping rows where it is null.
/// Positions are the row's index in `rows`, so they line up with
/// [`axis_label`].
pub fn metric_points(
    rows: &[&DerivedRecord],
    metric: impl Fn(&CostMetrics) -> Option<f64>,
) -> Vec<[f64; 2]> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| metric(&row.metrics).map(|v| [i as f64, v]))
        .collect()
}

/// Well id for an axis position, empty between wells.
pub fn axis_label(ids: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    ids.get(idx as usize).cloned().unwrap_or_default()
}

/// Cost-per-day bars grouped by operator, one group per legend entry.
fn cost_per_day_bars<'a>(rows: &[&'a DerivedRecord]) -> BTreeMap<Option<&'a str>, Vec<Bar>> {
    let mut groups: BTreeMap<Option<&'a str>, Vec<Bar>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        let Some(v) = row.metrics.cost_per_day else {
            continue;
        };
        groups
            .entry(row.record.operator.as_deref())
            .or_default()
            .push(Bar::new(i as f64, v).name(&row.record.well_job_id));
    }
    groups
}

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Show a chart whose x axis is labelled with the well ids.
fn show_well_plot(
    ui: &mut Ui,
    id: &str,
    ids: Vec<String>,
    y_label: &str,
    add_contents: impl FnOnce(&mut PlotUi),
) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Well_Job_ID")
        .y_axis_label(y_label)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 25.0]))
        .x_axis_formatter(move |mark, _range| axis_label(&ids, mark.value))
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, add_contents);
}

/// Bar chart of `Cost_Per_Day`, coloured by operator.
pub fn cost_per_day_chart(ui: &mut Ui, rows: &[&DerivedRecord], colors: &ColorMap) {
    let ids = rows.iter().map(|r| r.record.well_job_id.clone()).collect();
    show_well_plot(ui, "cost_per_day", ids, "Cost per day ($)", |plot_ui| {
        for (operator, bars) in cost_per_day_bars(rows) {
            let chart = BarChart::new(bars)
                .name(operator.unwrap_or(NO_OPERATOR))
                .color(colors.color_for(operator))
                .width(0.7);
            plot_ui.bar_chart(chart);
        }
    });
}

/// Line chart of one per-foot metric.
pub fn per_foot_chart(
    ui: &mut Ui,
    id: &str,
    name: &str,
    rows: &[&DerivedRecord],
    metric: impl Fn(&CostMetrics) -> Option<f64>,
    color: Color32,
) {
    let ids = rows.iter().map(|r| r.record.well_job_id.clone()).collect();
    let points = metric_points(rows, metric);
    show_well_plot(ui, id, ids, "Cost per foot ($/ft)", |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points.clone()))
                .name(name)
                .color(color)
                .width(1.5),
        );
        plot_ui.points(Points::new(PlotPoints::from(points)).color(color).radius(3.0));
    });
}

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::state::AppState;

/// Share of a month slot taken up by its bar group.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Monthly bar chart
// ---------------------------------------------------------------------------

fn month_total(row: &[usize]) -> usize {
    row.iter().sum()
}

/// Grouped bar chart of matching tenders: one group per month, one series per
/// country.
pub fn monthly_chart(ui: &mut Ui, state: &AppState) {
    let Some(aggregate) = state.report.as_ref().and_then(|r| r.monthly.as_ref()) else {
        return;
    };

    ui.heading("Tenders per month");
    if aggregate.is_empty() {
        ui.label("None of the matching tenders has a readable publication date.");
        return;
    }
    if aggregate.undated > 0 {
        ui.weak(format!(
            "{} tender(s) without a readable publication date are not charted.",
            aggregate.undated
        ));
    }

    let bar_width = GROUP_WIDTH / aggregate.countries.len().max(1) as f64;
    // Month label with the month's total over all countries.
    let labels: Vec<String> = aggregate
        .months
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{m} ({})", month_total(aggregate.row(i))))
        .collect();

    Plot::new("monthly_chart")
        .legend(Legend::default())
        .height(280.0)
        .x_axis_label("Month")
        .y_axis_label("Tenders")
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (c, code) in aggregate.countries.iter().enumerate() {
                let offset = -GROUP_WIDTH / 2.0 + bar_width * (c as f64 + 0.5);
                let bars: Vec<Bar> = aggregate
                    .series(c)
                    .enumerate()
                    .filter(|(_, count)| *count > 0)
                    .map(|(m, count)| {
                        Bar::new(m as f64 + offset, count as f64)
                            .width(bar_width)
                            .name(format!("{code} {}", aggregate.months[m]))
                    })
                    .collect();

                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(code))
                    .unwrap_or(eframe::egui::Color32::LIGHT_BLUE);

                plot_ui.bar_chart(BarChart::new(bars).name(code).color(color));
            }
        });
}

use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use ted_market_analyzer::data::model::TenderTable;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable grid of the filtered tenders, all columns, source order.
pub fn tender_table(ui: &mut Ui, table: &TenderTable) {
    if table.is_empty() {
        ui.label("No tenders match the current filters.");
        return;
    }

    egui::ScrollArea::horizontal()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(40.0))
                .columns(
                    Column::initial(140.0).at_least(40.0).clip(true),
                    table.headers.len(),
                )
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Line");
                    });
                    for name in &table.headers {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, table.len(), |mut row| {
                        let record = &table.records[row.index()];
                        row.col(|ui| {
                            ui.weak(record.line.to_string());
                        });
                        for cell in &record.cells {
                            row.col(|ui| {
                                ui.label(cell).on_hover_text(cell);
                            });
                        }
                    });
                });
        });
}

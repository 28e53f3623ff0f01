use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use ted_market_analyzer::data::countries::COUNTRIES;
use ted_market_analyzer::data::export::EXPORT_MIME;
use ted_market_analyzer::data::source::ArchiveSource;

use crate::state::AppState;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    ui.strong("Keywords (comma-separated)");
    if ui
        .add(egui::TextEdit::multiline(&mut state.keywords_input).desired_rows(2))
        .changed()
    {
        state.filters_dirty = true;
    }
    ui.add_space(6.0);

    let n_selected = state.selected_countries.len();
    ui.strong(format!("Countries  ({n_selected}/{})", COUNTRIES.len()));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    ScrollArea::vertical()
        .max_height((ui.available_height() - 120.0).max(80.0))
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for &(name, code) in COUNTRIES {
                let mut text = RichText::new(format!("{name} ({code})"));
                if let Some(cm) = &state.color_map {
                    if state.selected_countries.contains(code) {
                        text = text.color(cm.color_for(code));
                    }
                }

                let mut checked = state.selected_countries.contains(code);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_country(code);
                }
            }
        });

    ui.separator();

    ui.add_enabled_ui(state.loaded.is_some(), |ui: &mut Ui| {
        let label = if state.filters_dirty {
            RichText::new("Apply filters").strong()
        } else {
            RichText::new("Apply filters")
        };
        if ui.button(label).clicked() {
            state.refilter();
        }
    });

    if ui.button("🚀 Fetch latest export").clicked() {
        fetch_latest(state);
    }
    if ui.button("Open ZIP…").clicked() {
        open_archive_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Fetch latest export").clicked() {
                ui.close_menu();
                fetch_latest(state);
            }
            if ui.button("Open ZIP…").clicked() {
                ui.close_menu();
                open_archive_dialog(state);
            }
            let can_save = state.report.is_some();
            if ui.add_enabled(can_save, egui::Button::new("Save CSV…")).clicked() {
                ui.close_menu();
                save_export_dialog(state);
            }
        });

        ui.separator();

        if let Some(loaded) = &state.loaded {
            ui.label(format!("{}: {} rows", loaded.entry_name, loaded.table.len()));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.info_message {
            ui.label(RichText::new(msg).color(Color32::from_rgb(0x2e, 0x9e, 0x4f)));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – count, chart, table, download
// ---------------------------------------------------------------------------

/// Render the result of the last run.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            let hint = match &state.status_message {
                Some(msg) => RichText::new(msg).color(Color32::RED),
                None => RichText::new(
                    "Fetch the latest TED export, open a ZIP file, or drop one onto this window.",
                )
                .heading(),
            };
            ui.label(hint);
        });
        return;
    };

    let n = report.filtered.len();
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(format!("✅ {n} matching tenders"));
        let save = ui.button(format!("⬇ Save {}", state.settings.export.file_name));
        if save.on_hover_text(EXPORT_MIME).clicked() {
            save_export_dialog(state);
        }
    });
    ui.separator();

    // Re-borrow after the possible mutation above.
    let Some(report) = &state.report else {
        return;
    };

    plot::monthly_chart(ui, state);
    ui.separator();
    table::tender_table(ui, &report.filtered);
}

// ---------------------------------------------------------------------------
// Acquisition actions
// ---------------------------------------------------------------------------

pub fn fetch_latest(state: &mut AppState) {
    let url = state.settings.source.url.clone();
    state.run_source(ArchiveSource::Remote { url });
}

pub fn open_archive_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open TED export")
        .add_filter("ZIP archive", &["zip"])
        .pick_file();

    if let Some(path) = file {
        state.run_source(ArchiveSource::Upload { path });
    }
}

/// Run the pipeline on the first file dropped onto the window, if any.
pub fn handle_dropped_files(ctx: &egui::Context, state: &mut AppState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.first().cloned());
    let Some(file) = dropped else {
        return;
    };

    if let Some(bytes) = file.bytes {
        state.run_source(ArchiveSource::Dropped { name: file.name, bytes });
    } else if let Some(path) = file.path {
        state.run_source(ArchiveSource::Upload { path });
    }
}

pub fn save_export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filtered tenders")
        .set_file_name(&state.settings.export.file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_export(&path) {
            log::error!("Failed to save export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

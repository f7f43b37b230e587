use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::summary::METRIC_HEADINGS;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.batch.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export figure + summary"))
                .clicked()
            {
                state.export();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(batch) = &state.batch {
            ui.label(format!(
                "{}  |  {} stage files, {} rows",
                batch.dir.display(),
                batch.n_files,
                batch.output.dataset.len()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.config.output.sort_by_depth, "Sort by depth")
            .clicked()
        {
            let sort_by_depth = !state.config.output.sort_by_depth;
            state.set_sort_by_depth(sort_by_depth);
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.info_message {
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

/// Per-stage maxima, one row per sort key.
pub fn summary_table(ui: &mut Ui, state: &AppState) {
    ui.heading("Summary Table");

    let Some(batch) = &state.batch else {
        ui.label("No stage exports loaded.");
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::centered_and_justified(egui::Direction::LeftToRight))
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(140.0))
        .columns(Column::remainder().at_least(90.0), METRIC_HEADINGS.len())
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("sort");
            });
            header.col(|ui| {
                ui.strong("Stage");
            });
            for heading in METRIC_HEADINGS {
                header.col(|ui| {
                    ui.strong(heading);
                });
            }
        })
        .body(|mut body| {
            for row in &batch.table.rows {
                body.row(20.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(row.sort_key.to_string());
                    });
                    table_row.col(|ui| {
                        ui.label(&row.stage_label);
                    });
                    for cell in &row.cells {
                        table_row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

/// Shared legend for all four panels.
pub fn legend_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Stage");
    ui.separator();

    let Some(batch) = &state.batch else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (label, [r, g, b]) in batch.palette.legend_entries() {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("━━").color(Color32::from_rgb(r, g, b)).strong());
                    ui.label(label);
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open folder of PLAXIS stage exports")
        .set_directory(&state.config.input.dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.load_dir(&dir);
    }
}

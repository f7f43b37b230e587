use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PlaxisGraphApp {
    pub state: AppState,
}

impl PlaxisGraphApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PlaxisGraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Summary table under the menu ----
        egui::TopBottomPanel::top("summary_table")
            .resizable(true)
            .default_height(180.0)
            .show(ctx, |ui| {
                panels::summary_table(ui, &self.state);
            });

        // ---- Right side panel: shared legend ----
        egui::SidePanel::right("legend_panel")
            .default_width(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::legend_panel(ui, &self.state);
            });

        // ---- Central panel: profile plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::profile_plots(ui, &self.state);
        });
    }
}

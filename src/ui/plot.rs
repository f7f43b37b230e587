use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::data::profile::DEPTH_LABEL;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Depth-profile plots (central panel)
// ---------------------------------------------------------------------------

/// Render the four profile panels side by side, sharing the depth axis.
pub fn profile_plots(ui: &mut Ui, state: &AppState) {
    let batch = match &state.batch {
        Some(b) => b,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a folder of stage exports  (File → Open folder…)");
            });
            return;
        }
    };

    ui.columns(batch.panels.len(), |columns| {
        for (i, (ui, (quantity, series))) in columns.iter_mut().zip(&batch.panels).enumerate() {
            ui.label(quantity.axis_label());

            let mut plot = Plot::new(("profile_plot", i))
                .link_axis("profile_depth", [false, true])
                .link_cursor("profile_depth", [false, true])
                .allow_boxed_zoom(true)
                .allow_drag(true)
                .allow_scroll(true)
                .allow_zoom(true);
            if i == 0 {
                plot = plot.y_axis_label(DEPTH_LABEL);
            }

            plot.show(ui, |plot_ui| {
                for s in series {
                    let [r, g, b] = batch.palette.color_for(&s.label);
                    let points: PlotPoints = s.points.iter().copied().collect();
                    let line = Line::new(points)
                        .name(&s.label)
                        .color(Color32::from_rgb(r, g, b))
                        .width(1.5);
                    plot_ui.line(line);
                }
            });
        }
    });
}

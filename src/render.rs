use std::path::Path;

use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::color::StagePalette;
use crate::data::model::Dataset;
use crate::data::profile::{profile_series, value_range, Quantity, StageSeries, DEPTH_LABEL};

/// Errors that can occur while drawing or saving the figure.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Plotting error: {0}")]
    Plotting(String),

    #[error("dataset has no plottable points")]
    EmptyDataset,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Figure size and series ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureOptions {
    pub width: u32,
    pub height: u32,
    pub sort_by_depth: bool,
}

/// Share of the figure width reserved for the legend.
const LEGEND_FRACTION: f64 = 0.14;

fn plotting<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Plotting(e.to_string())
}

/// Draw the four profile panels plus the shared stage legend.
///
/// The figure goes into an in-memory RGB buffer, so the same image can be
/// written as PNG or inspected directly.
pub fn render_profiles(
    dataset: &Dataset,
    palette: &StagePalette,
    options: &FigureOptions,
) -> Result<RgbImage> {
    if dataset.is_empty() {
        return Err(RenderError::EmptyDataset);
    }
    let panels: Vec<(Quantity, Vec<StageSeries>)> = Quantity::ALL
        .iter()
        .map(|&q| (q, profile_series(dataset, q, options.sort_by_depth)))
        .collect();

    let depth = panels
        .iter()
        .filter_map(|(_, series)| value_range(series, 1))
        .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)))
        .ok_or(RenderError::EmptyDataset)?;

    let (w, h) = (options.width, options.height);
    let mut buffer = vec![0u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
        root.fill(&WHITE).map_err(plotting)?;

        let legend_width = (w as f64 * LEGEND_FRACTION) as u32;
        let (plots, legend) = root.split_horizontally(w - legend_width);
        let areas = plots.split_evenly((1, Quantity::ALL.len()));

        for (i, (area, (quantity, series))) in areas.iter().zip(&panels).enumerate() {
            draw_panel(area, *quantity, series, depth, palette, i == 0)?;
        }
        draw_legend(&legend, palette)?;

        root.present().map_err(plotting)?;
    }

    RgbImage::from_raw(w, h, buffer)
        .ok_or_else(|| RenderError::Plotting("figure buffer has the wrong size".to_string()))
}

/// Render the figure and write it as a PNG.
pub fn write_figure(
    path: &Path,
    dataset: &Dataset,
    palette: &StagePalette,
    options: &FigureOptions,
) -> Result<()> {
    let image = render_profiles(dataset, palette, options)?;
    image.save_with_format(path, ImageFormat::Png)?;
    log::info!("figure written to {}", path.display());
    Ok(())
}

fn draw_panel(
    area: &Area<'_>,
    quantity: Quantity,
    series: &[StageSeries],
    depth: (f64, f64),
    palette: &StagePalette,
    first: bool,
) -> Result<()> {
    let (x_lo, x_hi) = padded(value_range(series, 0).unwrap_or((-1.0, 1.0)));
    let (y_lo, y_hi) = padded(depth);

    // x labels sit on top, depth labels only on the first panel
    let mut chart = ChartBuilder::on(area)
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Top, 60)
        .set_label_area_size(LabelAreaPosition::Left, if first { 80 } else { 12 })
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(plotting)?;

    chart
        .configure_mesh()
        .x_desc(quantity.axis_label())
        .y_desc(if first { DEPTH_LABEL } else { "" })
        .y_labels(if first { 10 } else { 0 })
        .x_labels(5)
        .light_line_style(RGBColor(235, 235, 242).stroke_width(1))
        .draw()
        .map_err(plotting)?;

    for s in series {
        let [r, g, b] = palette.color_for(&s.label);
        chart
            .draw_series(LineSeries::new(
                s.points
                    .iter()
                    .filter(|p| p[0].is_finite() && p[1].is_finite())
                    .map(|p| (p[0], p[1])),
                RGBColor(r, g, b).stroke_width(2),
            ))
            .map_err(plotting)?;
    }
    Ok(())
}

fn draw_legend(area: &Area<'_>, palette: &StagePalette) -> Result<()> {
    area.draw(&Text::new("Stage", (12, 72), ("sans-serif", 24)))
        .map_err(plotting)?;

    for (i, (label, [r, g, b])) in palette.legend_entries().into_iter().enumerate() {
        let y = 112 + i as i32 * 30;
        area.draw(&PathElement::new(
            vec![(12, y), (44, y)],
            RGBColor(r, g, b).stroke_width(3),
        ))
        .map_err(plotting)?;
        area.draw(&Text::new(label, (52, y - 10), ("sans-serif", 20)))
            .map_err(plotting)?;
    }
    Ok(())
}

/// Widen a range by 5% each side; a degenerate range becomes ±1.
fn padded((lo, hi): (f64, f64)) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo - span * 0.05, hi + span * 0.05)
    }
}

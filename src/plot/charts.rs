use std::path::Path;

use image::{Rgb, RgbImage};
use log::info;

use crate::plot::PlotError;

pub const CHART_WIDTH: u32 = 640;
pub const CHART_HEIGHT: u32 = 360;
const MARGIN: u32 = 32;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
pub const METRIC_COLOR: Rgb<u8> = Rgb([31, 119, 180]);
pub const LOSS_COLOR: Rgb<u8> = Rgb([214, 39, 40]);
pub const ACCURACY_COLOR: Rgb<u8> = Rgb([44, 160, 44]);

/// Empty chart with the x axis along the bottom and one y axis on each side.
fn blank_chart() -> RgbImage {
    let mut img = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);
    let (left, right) = (MARGIN as i64, (CHART_WIDTH - MARGIN) as i64);
    let (top, bottom) = (MARGIN as i64, (CHART_HEIGHT - MARGIN) as i64);
    draw_line(&mut img, (left, bottom), (right, bottom), AXIS);
    draw_line(&mut img, (left, top), (left, bottom), AXIS);
    draw_line(&mut img, (right, top), (right, bottom), AXIS);
    img
}

/// Draws `values` as a polyline scaled to the plot area. Each series gets its
/// own y range; non-finite values break the line.
fn draw_series(img: &mut RgbImage, values: &[f32], color: Rgb<u8>) {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return;
    }

    let plot_w = (CHART_WIDTH - 2 * MARGIN) as f32;
    let plot_h = (CHART_HEIGHT - 2 * MARGIN) as f32;
    let steps = (values.len().max(2) - 1) as f32;
    let to_point = |i: usize, v: f32| -> (i64, i64) {
        let t = if hi > lo { (v - lo) / (hi - lo) } else { 0.5 };
        let x = MARGIN as f32 + plot_w * i as f32 / steps;
        let y = (CHART_HEIGHT - MARGIN) as f32 - plot_h * t;
        (x.round() as i64, y.round() as i64)
    };

    let mut previous: Option<(i64, i64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            previous = None;
            continue;
        }
        let point = to_point(i, v);
        draw_line(img, previous.unwrap_or(point), point, color);
        previous = Some(point);
    }
}

/// Bresenham line; points outside the image are clipped.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
            img.put_pixel(x as u32, y as u32, color);
        }
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Chart of a single metric over steps.
pub fn render_metric(values: &[f32]) -> Result<RgbImage, PlotError> {
    if values.is_empty() {
        return Err(PlotError::Empty);
    }
    let mut img = blank_chart();
    draw_series(&mut img, values, METRIC_COLOR);
    Ok(img)
}

/// Loss in red and, when given, accuracy in green on its own scale.
pub fn render_training_metrics(loss: &[f32], accuracy: Option<&[f32]>) -> Result<RgbImage, PlotError> {
    if loss.is_empty() {
        return Err(PlotError::Empty);
    }
    let mut img = blank_chart();
    draw_series(&mut img, loss, LOSS_COLOR);
    if let Some(acc) = accuracy {
        draw_series(&mut img, acc, ACCURACY_COLOR);
    }
    Ok(img)
}

/// Writes a line chart of `values` to `path`.
pub fn plot_metric(values: &[f32], values_label: &str, path: impl AsRef<Path>) -> Result<(), PlotError> {
    let path = path.as_ref();
    render_metric(values)?.save(path)?;
    info!("Plotted {} ({} points) -> {}", values_label, values.len(), path.display());
    Ok(())
}

/// Writes the training metrics chart to `path`.
pub fn plot_training_metrics(
    loss: &[f32],
    accuracy: Option<&[f32]>,
    path: impl AsRef<Path>,
) -> Result<(), PlotError> {
    let path = path.as_ref();
    render_training_metrics(loss, accuracy)?.save(path)?;
    info!("Plotted training metrics ({} steps) -> {}", loss.len(), path.display());
    Ok(())
}

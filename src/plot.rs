use std::path::Path;

use plotters::prelude::*;

use crate::error::DynError;

const PLOT_FONT_SCALE: f64 = 1.2;

fn scaled_font_size(base: i32) -> i32 {
    ((base as f64) * PLOT_FONT_SCALE).round() as i32
}

fn scaled_area_size(base: i32) -> i32 {
    ((base as f64) * PLOT_FONT_SCALE).round() as i32
}

fn finite_range(values: impl Iterator<Item = f64>) -> Result<(f64, f64), DynError> {
    let mut min_val = f64::INFINITY;
    let mut max_val = f64::NEG_INFINITY;
    for value in values.filter(|v| v.is_finite()) {
        min_val = min_val.min(value);
        max_val = max_val.max(value);
    }
    if min_val > max_val {
        return Err("No finite data points to plot".into());
    }
    if min_val == max_val {
        min_val -= 1.0;
        max_val += 1.0;
    }
    Ok((min_val, max_val))
}

pub fn plot_spectrum_db(
    x_vals: &[f64],
    data: &[f64],
    title: &str,
    filename: &Path,
    x_label: &str,
    y_label: &str,
    label: &str,
) -> Result<(), DynError> {
    if x_vals.len() != data.len() {
        return Err("X-value vector length does not match data length".into());
    }
    if x_vals.is_empty() {
        return Err("No data points to plot".into());
    }

    let root = BitMapBackend::new(filename, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = finite_range(x_vals.iter().copied())?;
    let (y_min, y_max) = finite_range(data.iter().copied())?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", scaled_font_size(32)).into_font())
        .margin(10)
        .x_label_area_size(scaled_area_size(40))
        .y_label_area_size(scaled_area_size(60))
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(("sans-serif", scaled_font_size(20)).into_font())
        .axis_desc_style(("sans-serif", scaled_font_size(24)).into_font())
        .light_line_style(WHITE.mix(0.0))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            x_vals
                .iter()
                .zip(data.iter())
                .filter(|(_, y)| y.is_finite())
                .map(|(x, y)| (*x, *y)),
            &BLUE,
        ))
        .map(|s| {
            s.label(label)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLUE))
        })?;

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(&WHITE.mix(0.8))
        .label_font(("sans-serif", scaled_font_size(20)).into_font())
        .draw()?;

    root.present()?;
    Ok(())
}

/// Overlay every channel of one status bucket on a single chart, one palette
/// color per channel, no legend.
pub fn plot_spectra_overlay(
    x_vals: &[f64],
    rows: &[Vec<f64>],
    title: &str,
    filename: &Path,
    x_label: &str,
    y_label: &str,
) -> Result<(), DynError> {
    if rows.is_empty() {
        return Err("No series provided to plot".into());
    }
    for row in rows {
        if row.len() != x_vals.len() {
            return Err("X-value vector length does not match data length".into());
        }
    }
    if x_vals.is_empty() {
        return Err("No data points to plot".into());
    }

    let root = BitMapBackend::new(filename, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = finite_range(x_vals.iter().copied())?;
    let (y_min, y_max) = finite_range(rows.iter().flat_map(|row| row.iter().copied()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", scaled_font_size(32)).into_font())
        .margin(10)
        .x_label_area_size(scaled_area_size(40))
        .y_label_area_size(scaled_area_size(60))
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(("sans-serif", scaled_font_size(20)).into_font())
        .axis_desc_style(("sans-serif", scaled_font_size(24)).into_font())
        .light_line_style(WHITE.mix(0.0))
        .draw()?;

    for (idx, row) in rows.iter().enumerate() {
        chart.draw_series(LineSeries::new(
            x_vals
                .iter()
                .zip(row.iter())
                .filter(|(_, y)| y.is_finite())
                .map(|(x, y)| (*x, *y)),
            &Palette99::pick(idx),
        ))?;
    }

    root.present()?;
    Ok(())
}

/// Scatter of per-capture median power against fractional day. Outliers are
/// drawn again as red crosses on top of the regular markers.
pub fn plot_median_power_scatter(
    points: &[(f64, f64)],
    outliers: &[(f64, f64)],
    title: &str,
    filename: &Path,
    x_label: &str,
    y_label: &str,
) -> Result<(), DynError> {
    if points.is_empty() {
        return Err("No data points to plot".into());
    }

    let root = BitMapBackend::new(filename, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = finite_range(points.iter().map(|&(x, _)| x))?;
    let (y_min, y_max) = finite_range(points.iter().map(|&(_, y)| y))?;
    let x_pad = (x_max - x_min) * 0.05;
    let y_pad = (y_max - y_min) * 0.05;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", scaled_font_size(32)).into_font())
        .margin(10)
        .x_label_area_size(scaled_area_size(40))
        .y_label_area_size(scaled_area_size(60))
        .build_cartesian_2d(
            (x_min - x_pad)..(x_max + x_pad),
            (y_min - y_pad)..(y_max + y_pad),
        )?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(("sans-serif", scaled_font_size(20)).into_font())
        .axis_desc_style(("sans-serif", scaled_font_size(24)).into_font())
        .light_line_style(WHITE.mix(0.0))
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
    )?;
    chart.draw_series(
        outliers
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|&(x, y)| Cross::new((x, y), 5, RED)),
    )?;

    root.present()?;
    Ok(())
}

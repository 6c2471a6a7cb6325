//! Chart drawing on top of plotters
//!
//! The x axis is hours since the first observation; tick labels are
//! formatted back into wall-clock timestamps.

use super::{ChartFormat, ChartOptions, ImpactSummary};
use crate::error::ReportError;
use crate::models::EnrichedSeries;
use chrono::{DateTime, Duration, Utc};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::register_font;
use std::error::Error;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

const RAW_COLOR: RGBColor = RGBColor(0xbd, 0xc3, 0xc7);
const THRESHOLD_COLOR: RGBColor = RGBColor(0xe6, 0x7e, 0x22);
const ANOMALY_COLOR: RGBColor = RGBColor(0xe7, 0x4c, 0x3c);
const PANEL_EDGE_COLOR: RGBColor = RGBColor(0x34, 0x49, 0x5e);

const TITLE: &str = "SRE Decision Support: Threshold Optimization Analysis";

/// Smallest x span drawn, one sample interval
const MIN_SPAN_HOURS: f64 = 5.0 / 60.0;

/// Fonts compiled into the binary so raster output never depends on the host
const FONTS: [(&str, &[u8]); 2] = [
    (
        "sans-serif",
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSans.ttf")),
    ),
    (
        "monospace",
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/DejaVuSansMono.ttf")),
    ),
];

static FONTS_REGISTERED: OnceLock<Result<(), &'static str>> = OnceLock::new();

/// Register the bundled font families with plotters, once per process
pub(super) fn register_fonts() -> Result<(), ReportError> {
    let registered = FONTS_REGISTERED.get_or_init(|| {
        for (family, bytes) in FONTS {
            register_font(family, FontStyle::Normal, bytes).map_err(|_| family)?;
        }
        Ok(())
    });

    (*registered).map_err(ReportError::Font)
}

/// Pixels per typographic point for a 7in tall canvas
fn points_to_pixels(height: u32) -> f64 {
    f64::from(height) / (7.0 * 72.0)
}

pub(super) fn draw(
    format: ChartFormat,
    path: &Path,
    series: &EnrichedSeries,
    summary: &ImpactSummary,
    options: &ChartOptions,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let size = (options.width, options.height);

    match format {
        ChartFormat::Bitmap => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_on(&root, series, summary, options)?;
        }
        ChartFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_on(&root, series, summary, options)?;
        }
    }

    Ok(())
}

fn offset_hours(start: DateTime<Utc>, timestamp: DateTime<Utc>) -> f64 {
    (timestamp - start).num_seconds() as f64 / 3600.0
}

fn draw_on<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &EnrichedSeries,
    summary: &ImpactSummary,
    options: &ChartOptions,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let pt = points_to_pixels(options.height);
    let px = |points: f64| (points * pt).round().max(1.0) as u32;

    root.fill(&WHITE)?;

    let start = series
        .records
        .first()
        .map(|r| r.timestamp)
        .unwrap_or_default();
    let (x_range, y_range) = axis_ranges(series, start);

    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, ("sans-serif", pt * 16.0).into_font())
        .margin(px(12.0))
        .x_label_area_size(px(40.0))
        .y_label_area_size(px(48.0))
        .build_cartesian_2d(x_range, y_range)?;

    let x_label = |hours: &f64| {
        (start + Duration::seconds((hours * 3600.0).round() as i64))
            .format("%m-%d %H:%M")
            .to_string()
    };

    chart
        .configure_mesh()
        .x_desc("Time Observation Period")
        .y_desc("Utilization %")
        .x_label_formatter(&x_label)
        .label_style(("sans-serif", pt * 9.0).into_font())
        .axis_desc_style(("sans-serif", pt * 12.0).into_font())
        .draw()?;

    let legend_len = px(14.0) as i32;

    // (a) raw series
    let raw_style = RAW_COLOR.mix(0.4).stroke_width(px(1.5));
    chart
        .draw_series(LineSeries::new(
            series
                .iter()
                .map(|r| (offset_hours(start, r.timestamp), r.value)),
            raw_style,
        ))?
        .label("Real CPU Usage (Raw)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], raw_style));

    // (b) adaptive threshold, one line per run of defined values
    let threshold_style = THRESHOLD_COLOR.stroke_width(px(1.5));
    for (i, segment) in threshold_segments(series, start).into_iter().enumerate() {
        let anno = chart.draw_series(LineSeries::new(segment, threshold_style))?;
        if i == 0 {
            anno.label("SmartAlert Adaptive Threshold").legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + legend_len, y)], threshold_style)
            });
        }
    }

    // (c) anomalies flagged by the adaptive threshold
    let marker = px(1.9);
    chart
        .draw_series(series.dynamic_alerts().map(|r| {
            Circle::new(
                (offset_hours(start, r.timestamp), r.value),
                marker,
                ANOMALY_COLOR.filled(),
            )
        }))?
        .label("Actual Anomalies Detected")
        .legend(move |(x, y)| Circle::new((x + legend_len / 2, y), marker, ANOMALY_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", pt * 10.0).into_font())
        .background_style(WHITE.mix(0.9).filled())
        .border_style(BLACK.mix(0.3).stroke_width(1))
        .draw()?;

    let (x_pixels, y_pixels) = chart.plotting_area().get_pixel_range();
    draw_summary_panel(root, summary, x_pixels, y_pixels, pt)?;

    root.present()?;
    Ok(())
}

/// Draw the summary box anchored to the top-left corner of the plot area
fn draw_summary_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    summary: &ImpactSummary,
    x_pixels: Range<i32>,
    y_pixels: Range<i32>,
    pt: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let lines = summary.lines();
    let font_px = pt * 11.0;
    let line_height = (font_px * 1.3).round() as i32;
    let padding = (font_px * 0.6).round() as i32;

    // Monospace glyphs are roughly 0.6em wide
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = (longest as f64 * font_px * 0.62).round() as i32 + 2 * padding;
    let height = line_height * lines.len() as i32 + 2 * padding;

    let x0 = x_pixels.start + ((x_pixels.end - x_pixels.start) as f64 * 0.02) as i32;
    let y0 = y_pixels.start + ((y_pixels.end - y_pixels.start) as f64 * 0.05) as i32;
    let corners = [(x0, y0), (x0 + width, y0 + height)];

    root.draw(&Rectangle::new(corners, WHITE.mix(0.9).filled()))?;
    root.draw(&Rectangle::new(
        corners,
        PANEL_EDGE_COLOR.stroke_width((pt * 1.0).round().max(1.0) as u32),
    ))?;

    let style = ("monospace", font_px).into_font().color(&BLACK);
    for (i, line) in lines.iter().enumerate() {
        root.draw(&Text::new(
            line.as_str(),
            (x0 + padding, y0 + padding + i as i32 * line_height),
            style.clone(),
        ))?;
    }

    Ok(())
}

/// Axis bounds covering raw values and thresholds, with a small margin
fn axis_ranges(series: &EnrichedSeries, start: DateTime<Utc>) -> (Range<f64>, Range<f64>) {
    let end = series
        .records
        .last()
        .map(|r| offset_hours(start, r.timestamp))
        .unwrap_or(0.0);
    let x_range = 0.0..end.max(MIN_SPAN_HOURS);

    let (lo, hi) = series
        .iter()
        .flat_map(|r| [Some(r.value), r.dynamic_threshold])
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return (x_range, 0.0..100.0);
    }

    let pad = ((hi - lo) * 0.05).max(1.0);
    (x_range, (lo - pad)..(hi + pad))
}

/// Split the threshold curve wherever it is undefined
fn threshold_segments(series: &EnrichedSeries, start: DateTime<Utc>) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for record in series.iter() {
        match record.dynamic_threshold {
            Some(threshold) => current.push((offset_hours(start, record.timestamp), threshold)),
            None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

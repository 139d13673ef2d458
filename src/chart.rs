//! SVG rendering of a [`RadarChart`]
//!
//! Screen layout: a square plot area with the legend to its right.
//!
//! ```text
//! ┌───────────────────────────┬──────────────┐
//! │        label (0 rad)      │ ┌──────────┐ │
//! │            │              │ │ ── A     │ │
//! │   label ── ● ── label     │ │ -- B     │ │
//! │            │              │ └──────────┘ │
//! │          label            │              │
//! └───────────────────────────┴──────────────┘
//! ```
//!
//! Angle 0 points to 12 o'clock and angles grow clockwise. Radii map
//! `[0, radial_max]` onto the plot circle; anything beyond is clipped.

use crate::radar::{HAlign, RadarChart, RenderSeries, FILL_COLOR, FILL_OPACITY};
use crate::style::escape_html;
use std::fmt::Write;

const PLOT_SIZE: f64 = 600.0;
const PLOT_RADIUS: f64 = 210.0;
const LEGEND_X: f64 = PLOT_SIZE + 10.0;
const LEGEND_Y: f64 = 20.0;
const LEGEND_WIDTH: f64 = 220.0;
const LEGEND_ROW: f64 = 20.0;
const LEGEND_SAMPLE: f64 = 30.0;

/// Pixels per line-width unit.
const LINE_SCALE: f64 = 1.4;
const LABEL_PAD: f64 = 14.0;
const LINE_HEIGHT_EM: f64 = 1.2;
const TICK_FONT_SIZE: f64 = 8.0;

const TICK_COLOR: &str = "#222222";
const GRID_COLOR: &str = "#AAAAAA";
const FACE_COLOR: &str = "#FAFAFA";
const FONT_FAMILY: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";

/// Screen position of a point at data angle `angle` and screen radius `r`.
pub fn to_screen(angle: f64, r: f64) -> (f64, f64) {
    let c = PLOT_SIZE / 2.0;
    (c + r * angle.sin(), c - r * angle.cos())
}

/// Screen radius of a data value; negative values collapse onto the center.
pub fn value_radius(value: f64, radial_max: f64) -> f64 {
    (value / radial_max * PLOT_RADIUS).max(0.0)
}

/// Radial tick values from 0 to `max` with a 1-2-2.5-5 step, at most 6 intervals.
pub fn radial_ticks(max: f64) -> Vec<f64> {
    if !(max > 0.0) || !max.is_finite() {
        return vec![0.0];
    }
    let magnitude = 10f64.powf((max / 6.0).log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| max / s <= 6.0 + 1e-9)
        .unwrap_or(max);
    let count = (max / step + 1e-9).floor() as usize;
    (0..=count).map(|i| i as f64 * step).collect()
}

fn format_tick(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    format!("{}", rounded)
}

fn anchor(align: HAlign) -> &'static str {
    match align {
        HAlign::Left => "start",
        HAlign::Center => "middle",
        HAlign::Right => "end",
    }
}

fn dash_array(series: &RenderSeries) -> Option<String> {
    let pattern = series.style.line_style.dash_pattern();
    if pattern.is_empty() {
        return None;
    }
    let scale = series.style.width * LINE_SCALE;
    Some(
        pattern
            .iter()
            .map(|d| format!("{:.2}", d * scale))
            .collect::<Vec<_>>()
            .join(","),
    )
}

fn points(chart: &RadarChart, series: &RenderSeries) -> String {
    chart
        .angles
        .iter()
        .zip(&series.values)
        .map(|(&angle, &v)| {
            let (x, y) = to_screen(angle, value_radius(v, chart.radial_max));
            format!("{:.2},{:.2}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn stroke_attrs(series: &RenderSeries) -> String {
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{:.2}""#,
        series.style.color,
        series.style.width * LINE_SCALE
    );
    if let Some(dash) = dash_array(series) {
        let _ = write!(attrs, r#" stroke-dasharray="{}""#, dash);
    }
    attrs
}

/// Render the chart as a standalone SVG document.
pub fn to_svg(chart: &RadarChart) -> String {
    let c = PLOT_SIZE / 2.0;
    let legend_height = chart.series.len() as f64 * LEGEND_ROW + 12.0;
    let width = LEGEND_X + LEGEND_WIDTH;
    let height = PLOT_SIZE.max(LEGEND_Y + legend_height + 10.0);
    let font = chart.label_font_size;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg viewBox="0 0 {width} {height}" width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg" font-family="{FONT_FAMILY}">"#
    );
    let _ = write!(
        svg,
        r#"<defs><clipPath id="plot-area"><circle cx="{c}" cy="{c}" r="{PLOT_RADIUS}"/></clipPath></defs>"#
    );
    let _ = write!(
        svg,
        r##"<rect x="0" y="0" width="{width}" height="{height}" fill="#ffffff"/>"##
    );
    let _ = write!(
        svg,
        r#"<circle cx="{c}" cy="{c}" r="{PLOT_RADIUS}" fill="{FACE_COLOR}" stroke="none"/>"#
    );

    // Radial grid
    let ticks = radial_ticks(chart.radial_max);
    for &t in ticks.iter().filter(|&&t| t > 0.0 && t < chart.radial_max) {
        let r = value_radius(t, chart.radial_max);
        let _ = write!(
            svg,
            r#"<circle cx="{c}" cy="{c}" r="{r:.2}" fill="none" stroke="{GRID_COLOR}" stroke-width="0.8"/>"#
        );
    }

    // Spokes; the closing axis coincides with the first one
    let spokes = chart.axes.len().saturating_sub(1).max(1).min(chart.axes.len());
    for axis in &chart.axes[..spokes] {
        let (x, y) = to_screen(axis.angle, PLOT_RADIUS);
        let _ = write!(
            svg,
            r#"<line x1="{c}" y1="{c}" x2="{x:.2}" y2="{y:.2}" stroke="{GRID_COLOR}" stroke-width="0.8"/>"#
        );
    }

    // Series: all fills below all lines, both in row order
    let _ = write!(svg, r#"<g clip-path="url(#plot-area)">"#);
    for series in &chart.series {
        let _ = write!(
            svg,
            r#"<polygon points="{}" fill="{FILL_COLOR}" fill-opacity="{FILL_OPACITY}" stroke="none"/>"#,
            points(chart, series)
        );
    }
    for series in &chart.series {
        let _ = write!(
            svg,
            r#"<polyline points="{}" fill="none" {} stroke-linejoin="round"><title>{}</title></polyline>"#,
            points(chart, series),
            stroke_attrs(series),
            escape_html(&series.label)
        );
    }
    svg.push_str("</g>");

    // Outer spine
    let _ = write!(
        svg,
        r#"<circle cx="{c}" cy="{c}" r="{PLOT_RADIUS}" fill="none" stroke="{TICK_COLOR}" stroke-width="1"/>"#
    );

    // Radial tick labels along the rlabel angle
    let rlabel_angle = chart.rlabel_position.to_radians();
    for &t in &ticks {
        let (x, y) = to_screen(rlabel_angle, value_radius(t, chart.radial_max));
        let _ = write!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}" font-size="{TICK_FONT_SIZE}" fill="{TICK_COLOR}" text-anchor="start" dominant-baseline="middle">{}</text>"#,
            format_tick(t)
        );
    }

    // Axis labels
    for axis in &chart.axes[..spokes] {
        let (x, y) = to_screen(axis.angle, PLOT_RADIUS + LABEL_PAD);
        let n = axis.lines.len().max(1) as f64;
        let _ = write!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}" font-size="{font}" fill="{TICK_COLOR}" text-anchor="{}" dominant-baseline="middle">"#,
            anchor(axis.align)
        );
        for (i, line) in axis.lines.iter().enumerate() {
            let dy = if i == 0 {
                -(n - 1.0) / 2.0 * LINE_HEIGHT_EM
            } else {
                LINE_HEIGHT_EM
            };
            let _ = write!(
                svg,
                r#"<tspan x="{x:.2}" dy="{dy:.2}em">{}</tspan>"#,
                escape_html(line)
            );
        }
        svg.push_str("</text>");
    }

    // Legend
    let _ = write!(
        svg,
        r##"<g class="legend"><rect x="{LEGEND_X}" y="{LEGEND_Y}" width="{LEGEND_WIDTH}" height="{legend_height}" rx="3" fill="#ffffff" fill-opacity="0.8" stroke="#cccccc"/>"##
    );
    for (i, series) in chart.series.iter().enumerate() {
        let y = LEGEND_Y + 6.0 + LEGEND_ROW * (i as f64 + 0.5);
        let x1 = LEGEND_X + 8.0;
        let x2 = x1 + LEGEND_SAMPLE;
        let _ = write!(
            svg,
            r#"<line x1="{x1}" y1="{y:.2}" x2="{x2}" y2="{y:.2}" {}/>"#,
            stroke_attrs(series)
        );
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{y:.2}" font-size="10" fill="{TICK_COLOR}" dominant-baseline="middle">{}</text>"#,
            x2 + 6.0,
            escape_html(&series.label)
        );
    }
    svg.push_str("</g></svg>");
    svg
}

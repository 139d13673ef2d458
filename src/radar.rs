//! Radar chart geometry and series styling
//!
//! Builds a [`RadarChart`]: a plotting-backend-neutral description of what to
//! draw. Angles follow the data convention (0 = first column, increasing in
//! column order); [`crate::chart`] maps them onto the screen with 0 at
//! 12 o'clock and clockwise direction.
//!
//! # Style cycle
//!
//! In detailed mode, row `i` gets its line style, color and width from three
//! independent cycles:
//!
//! ```text
//! line style = LINE_STYLES[i % 4]
//! color      = BORDER_COLORS[(i / 4) % 5]
//! width      = LINE_WIDTHS[(i / 20) % 2]
//! ```
//!
//! so combinations repeat every 4 x 5 x 2 = 40 rows.

use crate::error::{Error, Result};
use crate::labels;
use crate::selection::{Selection, StyleMode, ViewState};
use crate::table::{Table, SYNTHESE_LABEL};
use serde::Serialize;
use std::f64::consts::PI;

/// Line dash patterns, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    /// Long dash followed by two dots: on/off lengths `5 1 1 1 1 1`.
    DashDotDot,
}

impl LineStyle {
    /// On/off dash lengths, in units of the line width. Empty for solid lines.
    pub fn dash_pattern(&self) -> &'static [f64] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[3.7, 1.6],
            LineStyle::Dotted => &[1.0, 1.65],
            LineStyle::DashDotDot => &[5.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        }
    }
}

pub const LINE_STYLES: [LineStyle; 4] = [
    LineStyle::Solid,
    LineStyle::Dashed,
    LineStyle::Dotted,
    LineStyle::DashDotDot,
];
pub const BORDER_COLORS: [&str; 5] = ["#FF8700", "#4682B4", "#32CD32", "#FFD700", "#8A2BE2"];
pub const LINE_WIDTHS: [f64; 2] = [1.0, 1.5];

/// Number of rows before a detailed-mode style combination repeats.
pub const STYLE_PERIOD: usize = LINE_STYLES.len() * BORDER_COLORS.len() * LINE_WIDTHS.len();

/// Every series is filled with this color, whatever its border looks like.
pub const FILL_COLOR: &str = "#14aeb0";
pub const FILL_OPACITY: f64 = 0.15;

/// Border line appearance of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub line_style: LineStyle,
    pub color: &'static str,
    pub width: f64,
}

impl SeriesStyle {
    /// Solid, width 1, first palette color. Used for single rows, simple
    /// mode and the synthese row.
    pub const PLAIN: SeriesStyle = SeriesStyle {
        line_style: LINE_STYLES[0],
        color: BORDER_COLORS[0],
        width: LINE_WIDTHS[0],
    };
}

/// Detailed-mode style of the row at `index` (0-based, table order).
pub fn style_for(index: usize) -> SeriesStyle {
    let n_styles = LINE_STYLES.len();
    let n_colors = BORDER_COLORS.len();
    SeriesStyle {
        line_style: LINE_STYLES[index % n_styles],
        color: BORDER_COLORS[(index / n_styles) % n_colors],
        width: LINE_WIDTHS[(index / (n_styles * n_colors)) % LINE_WIDTHS.len()],
    }
}

/// Repeat the first element at the end so a polyline returns to its start.
pub fn close_loop<T: Clone>(mut items: Vec<T>) -> Vec<T> {
    if let Some(first) = items.first().cloned() {
        items.push(first);
    }
    items
}

/// `num_vars` evenly spaced angles over `[0, 2π)`, closed.
///
/// `angle_k = k * (2π / num_vars)`; the result has `num_vars + 1` entries and
/// its last entry is 0 again. With a single variable this is `[0, 0]`.
pub fn closed_angles(num_vars: usize) -> Vec<f64> {
    if num_vars == 0 {
        return Vec::new();
    }
    let step = 2.0 * PI / num_vars as f64;
    close_loop((0..num_vars).map(|k| k as f64 * step).collect())
}

/// Horizontal anchoring of an axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Labels on the top/bottom spokes are centered, those on the right half
/// start at the spoke, those on the left half end at it.
pub fn label_alignment(angle: f64) -> HAlign {
    if angle == 0.0 || angle == PI {
        HAlign::Center
    } else if angle > 0.0 && angle < PI {
        HAlign::Left
    } else {
        HAlign::Right
    }
}

/// One spoke of the chart with its (possibly wrapped) label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub angle: f64,
    pub lines: Vec<String>,
    pub align: HAlign,
}

/// One closed polyline plus fill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSeries {
    pub label: String,
    /// Closed: `values[0] == values[n]`.
    pub values: Vec<f64>,
    pub style: SeriesStyle,
}

/// Everything needed to draw one radar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    /// Closed angle sequence, radians.
    pub angles: Vec<f64>,
    /// Closed axis sequence, parallel to `angles`.
    pub axes: Vec<Axis>,
    pub series: Vec<RenderSeries>,
    pub label_font_size: u8,
    pub radial_max: f64,
    /// Angle of the radial tick labels, degrees.
    pub rlabel_position: f64,
}

impl RadarChart {
    /// Build the chart for the current selection.
    pub fn build(table: &Table, view: &ViewState, radial_max: f64) -> Result<Self> {
        let num_vars = table.num_columns();
        if num_vars == 0 {
            return Err(Error::NoColumns);
        }

        let angles = closed_angles(num_vars);
        let lines = close_loop(labels::axis_labels(table.columns(), view.options.wrap_labels));
        let axes = angles
            .iter()
            .zip(lines)
            .map(|(&angle, lines)| Axis {
                angle,
                lines,
                align: label_alignment(angle),
            })
            .collect();

        let series = match &view.selection {
            Selection::All(mode) => table
                .iter_rows()
                .enumerate()
                .map(|(i, (label, values))| {
                    let style = match mode {
                        StyleMode::Detailed => style_for(i),
                        StyleMode::Simple => SeriesStyle::PLAIN,
                    };
                    series(label, values, style)
                })
                .collect(),
            Selection::Synthese => vec![series(SYNTHESE_LABEL, table.synthese(), SeriesStyle::PLAIN)],
            Selection::Row(label) => {
                let values = table
                    .row(label)
                    .ok_or_else(|| Error::UnknownRow(label.clone()))?;
                vec![series(label, values, SeriesStyle::PLAIN)]
            }
        };

        Ok(Self {
            angles,
            axes,
            series,
            label_font_size: view.options.label_font_size,
            radial_max,
            rlabel_position: 180.0 / num_vars as f64,
        })
    }
}

fn series(label: &str, values: &[f64], style: SeriesStyle) -> RenderSeries {
    RenderSeries {
        label: label.to_string(),
        values: close_loop(values.to_vec()),
        style,
    }
}

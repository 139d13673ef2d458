//! Matrice en radar - Turn a spreadsheet table into a radar chart
//!
//! Upload an `.xlsx` workbook whose first sheet is a labeled table (one row
//! per entity, one column per criterion, numeric cells) and get back a polar
//! "radar" chart plus a heat-mapped copy of the table.
//!
//! # Overview
//!
//! Each column becomes a spoke of the radar, evenly spaced clockwise from
//! 12 o'clock. Each row becomes a closed polygon. Besides the rows of the
//! workbook, the chart can show:
//!
//! - **Tous**: every row at once, in a cycling style or in one plain style
//! - **Synthese**: a derived row holding the maximum of each column
//!
//! Values are rounded to one decimal on load. The radial axis is fixed to
//! `[0, radial_max]` (5 by default) so charts stay comparable.
//!
//! # Quick Start
//!
//! ```no_run
//! use matrice_radar::{render, RenderSettings, Selection, Table, ViewState};
//!
//! let table = Table::open("scores.xlsx")?;
//! let view = ViewState {
//!     selection: Selection::Synthese,
//!     ..ViewState::default()
//! };
//! let out = render(&table, &view, &RenderSettings::default())?;
//!
//! std::fs::write("radar.svg", &out.chart_svg)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`table`]: workbook loading, validation, rounding and the Synthese row
//! - [`selection`]: the controls (series choice, style, wrapping, font size)
//! - [`labels`]: axis label truncation and wrapping
//! - [`radar`]: chart geometry and series styling
//! - [`chart`]: SVG drawing of a [`RadarChart`]
//! - [`style`]: the heat-mapped HTML table
//! - [`render`]: `(table, view) -> (chart, table)`
//! - [`serve`]: the web form
//! - [`report`]: HTML/SVG files for offline use

pub mod chart;
pub mod error;
pub mod labels;
pub mod radar;
pub mod render;
pub mod report;
pub mod selection;
pub mod serve;
pub mod session;
pub mod style;
pub mod table;

pub use error::{Error, Result};
pub use radar::{RadarChart, SeriesStyle};
pub use render::{render, RenderSettings, Rendered, DEFAULT_RADIAL_MAX};
pub use selection::{Choice, ControlEvent, DisplayOptions, Selection, StyleMode, ViewQuery, ViewState};
pub use table::{Table, SYNTHESE_LABEL};

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PUBLIC API TESTS
    // ==========================================================================
    //
    // These tests verify the public API surface is correct and documented.
    // ==========================================================================

    #[test]
    fn test_public_exports() {
        // Core types are re-exported from crate root
        let _ = Selection::Synthese;
        let _ = StyleMode::Simple;
        let _ = RenderSettings::default();
        assert_eq!(SYNTHESE_LABEL, "Synthese");
        assert_eq!(DEFAULT_RADIAL_MAX, 5.0);
    }

    #[test]
    fn test_default_view() {
        // A fresh view shows every row in the detailed style
        let view = ViewState::default();
        assert_eq!(view.selection, Selection::All(StyleMode::Detailed));
        assert!(view.options.wrap_labels);
        assert_eq!(view.options.label_font_size, 10);
    }

    #[test]
    fn test_render_from_crate_root() {
        let table = Table::new(
            vec!["A".into()],
            vec!["x".into(), "y".into()],
            vec![vec![1.0, 2.0]],
        )
        .unwrap();
        let out = render(&table, &ViewState::default(), &RenderSettings::default()).unwrap();
        assert_eq!(out.chart.series.len(), 1);
    }
}

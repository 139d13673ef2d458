//! The render pipeline: `(table, view) -> (chart, table)`
//!
//! Pure and deterministic. The server, the report writer and the tests all
//! go through [`render`].

use crate::chart;
use crate::error::{Error, Result};
use crate::radar::RadarChart;
use crate::selection::ViewState;
use crate::style;
use crate::table::Table;
use serde::Serialize;

pub const DEFAULT_RADIAL_MAX: f64 = 5.0;

/// Settings fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderSettings {
    /// Ceiling of the radial axis. Values above it are clipped, not rescaled.
    pub radial_max: f64,
}

impl RenderSettings {
    pub fn new(radial_max: f64) -> Result<Self> {
        if radial_max.is_finite() && radial_max > 0.0 {
            Ok(Self { radial_max })
        } else {
            Err(Error::BadRequest(format!(
                "radial axis ceiling must be a positive number, got {}",
                radial_max
            )))
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            radial_max: DEFAULT_RADIAL_MAX,
        }
    }
}

/// What the page shows, in display order: chart first, then table.
#[derive(Debug, Clone, Serialize)]
pub struct Rendered {
    pub chart_svg: String,
    pub table_html: String,
    pub chart: RadarChart,
}

pub fn render(table: &Table, view: &ViewState, settings: &RenderSettings) -> Result<Rendered> {
    let chart = RadarChart::build(table, view, settings.radial_max)?;
    Ok(Rendered {
        chart_svg: chart::to_svg(&chart),
        table_html: style::to_html(table),
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::SeriesStyle;
    use crate::selection::{DisplayOptions, Selection, StyleMode};
    use crate::table::tests::sample_table;
    use std::f64::consts::PI;

    fn view(selection: Selection, wrap_labels: bool) -> ViewState {
        ViewState {
            selection,
            options: DisplayOptions {
                wrap_labels,
                label_font_size: 10,
            },
        }
    }

    #[test]
    fn test_settings_validation() {
        assert!(RenderSettings::new(5.0).is_ok());
        assert!(RenderSettings::new(0.0).is_err());
        assert!(RenderSettings::new(-1.0).is_err());
        assert!(RenderSettings::new(f64::NAN).is_err());
        assert_eq!(RenderSettings::default().radial_max, 5.0);
    }

    #[test]
    fn test_render_is_deterministic() {
        let table = sample_table();
        let v = view(Selection::All(StyleMode::Detailed), true);
        let a = render(&table, &v, &RenderSettings::default()).unwrap();
        let b = render(&table, &v, &RenderSettings::default()).unwrap();
        assert_eq!(a.chart_svg, b.chart_svg);
        assert_eq!(a.table_html, b.table_html);
    }

    // End to end: rows A, B; columns x, y, z; values [[1,2,3],[4,5,6]]
    #[test]
    fn test_scenario_all_rows_simple() {
        let table = sample_table();
        assert_eq!(table.synthese(), &[4.0, 5.0, 6.0]);

        let out = render(
            &table,
            &view(Selection::All(StyleMode::Simple), true),
            &RenderSettings::default(),
        )
        .unwrap();
        assert_eq!(out.chart.series.len(), 2);
        for s in &out.chart.series {
            assert_eq!(s.style, SeriesStyle::PLAIN);
            assert_eq!(s.style.width, 1.0);
            assert_eq!(s.style.color, "#FF8700");
        }
        assert!(out.table_html.contains("<table"));
    }

    #[test]
    fn test_scenario_single_row() {
        let out = render(
            &sample_table(),
            &view(Selection::Row("B".into()), true),
            &RenderSettings::default(),
        )
        .unwrap();
        let chart = &out.chart;
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].values, vec![4.0, 5.0, 6.0, 4.0]);
        let expected = [0.0, 2.0 * PI / 3.0, 4.0 * PI / 3.0, 0.0];
        for (a, e) in chart.angles.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_scenario_long_label_wrap_toggle() {
        let long = "This is an extremely long descriptive column header name";
        let table = Table::new(
            vec!["A".into()],
            vec![long.into(), "b".into()],
            vec![vec![1.0, 2.0]],
        )
        .unwrap();
        let settings = RenderSettings::default();

        let wrapped = render(&table, &view(Selection::Row("A".into()), true), &settings).unwrap();
        let lines = &wrapped.chart.axes[0].lines;
        assert!(lines.len() > 1);
        assert!(lines.last().unwrap().ends_with("..."));

        let plain = render(&table, &view(Selection::Row("A".into()), false), &settings).unwrap();
        assert_eq!(plain.chart.axes[0].lines, vec![long.to_string()]);
    }

    #[test]
    fn test_radial_max_reaches_chart() {
        let settings = RenderSettings::new(10.0).unwrap();
        let out = render(&sample_table(), &view(Selection::Synthese, true), &settings).unwrap();
        assert_eq!(out.chart.radial_max, 10.0);
        assert!(out.chart_svg.contains(">10</text>"));
    }
}

//! Heat-mapped HTML rendering of the loaded table
//!
//! Cell backgrounds come from an orange → yellow → green gradient,
//! discretized into [`GRADIENT_STEPS`] colors and normalized over the global
//! min/max of the whole table (not per row or per column).

use crate::table::Table;
use palette::{LinSrgb, Srgb};
use std::fmt::Write;

pub const GRADIENT_STEPS: usize = 100;

/// Low, mid and high colors of the gradient.
pub const GRADIENT_STOPS: [Srgb<u8>; 3] = [
    Srgb::new(0xF4, 0xAF, 0x81),
    Srgb::new(0xFE, 0xF2, 0xCB),
    Srgb::new(0xA9, 0xD0, 0x8D),
];

/// Backgrounds darker than this relative luminance get light text.
const TEXT_COLOR_THRESHOLD: f32 = 0.408;
const DARK_TEXT: &str = "#000000";
const LIGHT_TEXT: &str = "#f1f1f1";

const TABLE_ID: &str = "T_matrice";

/// A discretized multi-stop color gradient.
#[derive(Debug, Clone)]
pub struct Gradient {
    lut: Vec<Srgb<f32>>,
}

impl Gradient {
    /// Sample `steps` evenly spaced colors from equally spaced `stops`.
    pub fn new(stops: &[Srgb<u8>], steps: usize) -> Self {
        let stops: Vec<Srgb<f32>> = stops.iter().map(|s| s.into_format()).collect();
        let segments = stops.len().saturating_sub(1).max(1);
        let lut = (0..steps)
            .map(|i| {
                let x = if steps > 1 { i as f32 / (steps - 1) as f32 } else { 0.0 };
                let pos = x * segments as f32;
                let seg = (pos.floor() as usize).min(segments - 1);
                let lo = stops[seg];
                let hi = stops.get(seg + 1).copied().unwrap_or(lo);
                lerp(lo, hi, pos - seg as f32)
            })
            .collect();
        Self { lut }
    }

    /// Color for a normalized position in `[0, 1]` (clamped).
    pub fn color_at(&self, x: f64) -> Srgb<f32> {
        let n = self.lut.len();
        let idx = if x.is_nan() {
            0
        } else {
            ((x.clamp(0.0, 1.0) * n as f64) as usize).min(n - 1)
        };
        self.lut[idx]
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::new(&GRADIENT_STOPS, GRADIENT_STEPS)
    }
}

/// Component-wise interpolation in sRGB space.
fn lerp(a: Srgb<f32>, b: Srgb<f32>, t: f32) -> Srgb<f32> {
    Srgb::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
    )
}

/// Position of `value` within `[lo, hi]`. A flat range maps everything to 0.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        (value - lo) / (hi - lo)
    } else {
        0.0
    }
}

pub fn to_hex(color: Srgb<f32>) -> String {
    let c: Srgb<u8> = color.into_format();
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

/// WCAG relative luminance.
pub fn relative_luminance(color: Srgb<f32>) -> f32 {
    let lin: LinSrgb<f32> = color.into_linear();
    0.2126 * lin.red + 0.7152 * lin.green + 0.0722 * lin.blue
}

/// Text color readable on the given background.
pub fn text_color(background: Srgb<f32>) -> &'static str {
    if relative_luminance(background) < TEXT_COLOR_THRESHOLD {
        LIGHT_TEXT
    } else {
        DARK_TEXT
    }
}

/// Render the table as a self-contained `<style>` + `<table>` fragment.
pub fn to_html(table: &Table) -> String {
    let gradient = Gradient::default();
    let (lo, hi) = table.value_range();
    let width = 100.0 / table.num_columns() as f64;

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<style type="text/css">
#{id} {{ border: none; table-layout: fixed; width: 100%; border-collapse: collapse; }}
#{id} th {{ font-weight: bold; text-align: center; white-space: normal; }}
#{id} td {{ text-align: center; white-space: normal; }}
#{id} td.row_heading {{ text-align: left; }}
#{id} td, #{id} th {{ border: 1px solid lightgray; width: {width}%; }}
</style>
"#,
        id = TABLE_ID,
        width = width
    );

    let _ = write!(out, r#"<table id="{}">"#, TABLE_ID);
    out.push_str("\n<thead>\n<tr><th class=\"blank\"></th>");
    for column in table.columns() {
        let _ = write!(out, r#"<th class="col_heading">{}</th>"#, escape_html(column));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for (label, values) in table.iter_rows() {
        let _ = write!(out, r#"<tr><td class="row_heading">{}</td>"#, escape_html(label));
        for &v in values {
            let bg = gradient.color_at(normalize(v, lo, hi));
            let _ = write!(
                out,
                r#"<td class="data" style="background-color: {}; color: {};">{:.1}</td>"#,
                to_hex(bg),
                text_color(bg),
                v
            );
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::sample_table;

    // ==========================================================================
    // GRADIENT
    // ==========================================================================

    #[test]
    fn test_gradient_endpoints_are_stops() {
        let g = Gradient::default();
        assert_eq!(to_hex(g.color_at(0.0)), "#f4af81");
        assert_eq!(to_hex(g.color_at(1.0)), "#a9d08d");
    }

    #[test]
    fn test_gradient_is_discretized() {
        let g = Gradient::default();
        assert_eq!(g.lut.len(), GRADIENT_STEPS);
        // Same bin: 0.001 and 0.009 both land in bin 0
        assert_eq!(g.color_at(0.001), g.color_at(0.009));
        assert_ne!(g.color_at(0.0), g.color_at(0.02));
    }

    #[test]
    fn test_gradient_middle_is_near_yellow() {
        let g = Gradient::default();
        let mid: Srgb<u8> = g.color_at(0.5).into_format();
        // Bin 50 of 100 sits just past the middle stop
        assert!(mid.red >= 0xF9 && mid.green >= 0xEC, "{mid:?}");
    }

    #[test]
    fn test_gradient_clamps_out_of_range() {
        let g = Gradient::default();
        assert_eq!(g.color_at(-3.0), g.color_at(0.0));
        assert_eq!(g.color_at(7.0), g.color_at(1.0));
    }

    #[test]
    fn test_normalize_flat_range() {
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
        assert_eq!(normalize(2.0, 1.0, 3.0), 0.5);
    }

    #[test]
    fn test_text_color_contrast() {
        assert_eq!(text_color(Srgb::new(1.0, 1.0, 1.0)), DARK_TEXT);
        assert_eq!(text_color(Srgb::new(0.0, 0.0, 0.1)), LIGHT_TEXT);
        // Every gradient color is light enough for dark text
        let g = Gradient::default();
        for i in 0..=10 {
            assert_eq!(text_color(g.color_at(i as f64 / 10.0)), DARK_TEXT);
        }
    }

    // ==========================================================================
    // HTML TABLE
    // ==========================================================================

    #[test]
    fn test_html_structure() {
        let html = to_html(&sample_table());
        assert!(html.contains("table-layout: fixed"));
        assert!(html.contains("width: 100%"));
        assert!(html.contains("border: 1px solid lightgray"));
        assert!(html.contains("font-weight: bold"));
        assert!(html.contains("td.row_heading { text-align: left; }"));
        assert!(html.contains("width: 33.333333333333336%"));
        assert_eq!(html.matches("<th class=\"col_heading\">").count(), 3);
        assert_eq!(html.matches("<td class=\"row_heading\">").count(), 2);
        assert_eq!(html.matches("<td class=\"data\"").count(), 6);
    }

    #[test]
    fn test_html_global_coloring_and_one_decimal() {
        let html = to_html(&sample_table());
        // 1.0 is the global min, 6.0 the global max
        assert!(html.contains("background-color: #f4af81; color: #000000;\">1.0</td>"));
        assert!(html.contains("background-color: #a9d08d; color: #000000;\">6.0</td>"));
        assert!(html.contains(">4.0<"));
    }

    #[test]
    fn test_html_escapes_labels() {
        let table = Table::new(
            vec!["<b>R&D</b>".into()],
            vec!["\"q\"".into()],
            vec![vec![1.0]],
        )
        .unwrap();
        let html = to_html(&table);
        assert!(html.contains("&lt;b&gt;R&amp;D&lt;/b&gt;"));
        assert!(html.contains("&quot;q&quot;"));
        assert!(!html.contains("<b>R&D"));
    }
}

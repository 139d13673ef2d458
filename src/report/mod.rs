//! Offline export of a rendered view
//!
//! - **HTML**: self-contained page with the chart followed by the data table
//! - **SVG**: the chart alone
//!
//! # Usage
//!
//! ```ignore
//! use matrice_radar::report;
//!
//! // Picks the format from the extension
//! report::generate("radar.html", &table, &view, &settings, Some("scores.xlsx"))?;
//! report::generate("radar.svg", &table, &view, &settings, None)?;
//! ```

pub mod html;

use crate::error::Result;
use crate::render::{render, RenderSettings};
use crate::selection::ViewState;
use crate::table::Table;
use std::io::Write;
use std::path::Path;

/// Render `view` of `table` and write it to `path`.
pub fn generate<P: AsRef<Path>>(
    path: P,
    table: &Table,
    view: &ViewState,
    settings: &RenderSettings,
    source_name: Option<&str>,
) -> Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let rendered = render(table, view, settings)?;
    let mut file = std::fs::File::create(path)?;

    match ext.as_str() {
        "svg" => file.write_all(rendered.chart_svg.as_bytes())?,
        _ => html::write(&mut file, &rendered, source_name)?,
    }
    log::info!("wrote {}", path.display());
    Ok(())
}

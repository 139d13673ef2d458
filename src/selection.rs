//! What to plot and how
//!
//! A [`ViewState`] holds the user's current choices. Controls do not re-run
//! anything themselves: each change arrives as a [`ControlEvent`], is applied
//! with [`ViewState::apply`], and the caller re-renders from the new state.

use crate::error::{Error, Result};
use crate::table::{Table, SYNTHESE_LABEL};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Display label of the "all rows" choice.
pub const ALL_ROWS_LABEL: &str = "Tous";

pub const FONT_SIZE_RANGE: RangeInclusive<u8> = 6..=20;
pub const DEFAULT_FONT_SIZE: u8 = 10;

/// Line styling when every row is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleMode {
    /// Each row gets its own line style, color and width from the style cycle.
    #[default]
    Detailed,
    /// All rows share one solid line.
    Simple,
}

/// Which series end up on the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selection {
    Row(String),
    All(StyleMode),
    Synthese,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::All(StyleMode::default())
    }
}

/// One entry of the series selector, as sent by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum Choice {
    Row(String),
    All,
    Synthese,
}

/// A selector entry with the text shown for it.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceEntry {
    pub text: String,
    pub choice: Choice,
}

/// Selector entries: every row in table order, then "Tous", then "Synthese".
pub fn choices(table: &Table) -> Vec<ChoiceEntry> {
    table
        .rows()
        .iter()
        .map(|r| ChoiceEntry {
            text: r.clone(),
            choice: Choice::Row(r.clone()),
        })
        .chain([
            ChoiceEntry {
                text: ALL_ROWS_LABEL.to_string(),
                choice: Choice::All,
            },
            ChoiceEntry {
                text: SYNTHESE_LABEL.to_string(),
                choice: Choice::Synthese,
            },
        ])
        .collect()
}

/// Index of the default entry ("Tous") in [`choices`].
pub fn default_choice_index(table: &Table) -> usize {
    table.num_rows()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayOptions {
    pub wrap_labels: bool,
    pub label_font_size: u8,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            wrap_labels: true,
            label_font_size: DEFAULT_FONT_SIZE,
        }
    }
}

fn check_font_size(size: u8) -> Result<u8> {
    if FONT_SIZE_RANGE.contains(&size) {
        Ok(size)
    } else {
        Err(Error::FontSizeOutOfRange(size))
    }
}

/// A change of one control.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "control", content = "value", rename_all = "snake_case")]
pub enum ControlEvent {
    Series(Choice),
    StyleMode(StyleMode),
    WrapLabels(bool),
    FontSize(u8),
}

/// Current selection and display options of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub selection: Selection,
    pub options: DisplayOptions,
}

impl ViewState {
    /// Apply one control change. The state is left untouched on error.
    pub fn apply(&mut self, event: ControlEvent, table: &Table) -> Result<()> {
        match event {
            ControlEvent::Series(Choice::Row(label)) => {
                if table.row(&label).is_none() {
                    return Err(Error::UnknownRow(label));
                }
                self.selection = Selection::Row(label);
            }
            // The style selector is recreated with its default each time "Tous" is picked.
            ControlEvent::Series(Choice::All) => self.selection = Selection::default(),
            ControlEvent::Series(Choice::Synthese) => self.selection = Selection::Synthese,
            ControlEvent::StyleMode(mode) => match &mut self.selection {
                Selection::All(style) => *style = mode,
                _ => {
                    return Err(Error::BadRequest(
                        "line style only applies when all rows are shown".to_string(),
                    ))
                }
            },
            ControlEvent::WrapLabels(wrap) => self.options.wrap_labels = wrap,
            ControlEvent::FontSize(size) => self.options.label_font_size = check_font_size(size)?,
        }
        Ok(())
    }
}

/// A complete view given as query parameters, e.g.
/// `series=row&row=Model%20B&wrap=false&font_size=12`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewQuery {
    /// `row`, `all` or `synthese`. Defaults to `all`.
    pub series: Option<String>,
    pub row: Option<String>,
    pub style: Option<StyleMode>,
    pub wrap: Option<bool>,
    pub font_size: Option<u8>,
}

impl ViewQuery {
    pub fn into_view(self, table: &Table) -> Result<ViewState> {
        let selection = match self.series.as_deref().unwrap_or("all") {
            "all" => Selection::All(self.style.unwrap_or_default()),
            "synthese" => Selection::Synthese,
            "row" => {
                let label = self
                    .row
                    .ok_or_else(|| Error::BadRequest("series=row needs a row".to_string()))?;
                if table.row(&label).is_none() {
                    return Err(Error::UnknownRow(label));
                }
                Selection::Row(label)
            }
            other => return Err(Error::BadRequest(format!("unknown series {:?}", other))),
        };

        let defaults = DisplayOptions::default();
        let options = DisplayOptions {
            wrap_labels: self.wrap.unwrap_or(defaults.wrap_labels),
            label_font_size: check_font_size(self.font_size.unwrap_or(defaults.label_font_size))?,
        };

        Ok(ViewState { selection, options })
    }
}

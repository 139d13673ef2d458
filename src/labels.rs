//! Axis label shortening
//!
//! Long column headers are cut to [`MAX_LABEL_CHARS`] characters (with a
//! trailing `...`) and then wrapped at [`WRAP_WIDTH`] columns. Words are
//! never broken, so a single word longer than the width keeps its own line.

use textwrap::{Options, WordSeparator, WrapAlgorithm};

pub const MAX_LABEL_CHARS: usize = 38;
pub const WRAP_WIDTH: usize = 22;

/// Cut a label to [`MAX_LABEL_CHARS`] characters, appending `...` when cut.
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let mut s: String = label.chars().take(MAX_LABEL_CHARS).collect();
        s.push_str("...");
        s
    } else {
        label.to_string()
    }
}

/// Truncate then wrap a label into lines of at most [`WRAP_WIDTH`] columns.
///
/// Lines are filled greedily: each line takes as many words as fit.
pub fn wrap_label(label: &str) -> Vec<String> {
    let options = Options::new(WRAP_WIDTH)
        .break_words(false)
        .word_separator(WordSeparator::AsciiSpace)
        .wrap_algorithm(WrapAlgorithm::FirstFit);
    textwrap::wrap(&truncate_label(label), options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Labels as drawn on the chart: one entry per column, each split into lines.
///
/// With `wrap` off every label is a single, unmodified line.
pub fn axis_labels(columns: &[String], wrap: bool) -> Vec<Vec<String>> {
    columns
        .iter()
        .map(|c| if wrap { wrap_label(c) } else { vec![c.clone()] })
        .collect()
}

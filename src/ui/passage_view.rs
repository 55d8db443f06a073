use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::engine::RawSelection;
use crate::util::word_spans;

/// One display line of the passage pane. `text` is a verbatim slice of
/// the unit starting at char `char_start`, so screen cells map back to
/// unit char offsets exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    pub unit: usize,
    pub char_start: usize,
    pub text: String,
}

/// Greedy word-wrap of normalized units into rows no wider than
/// `width` columns. A word wider than the pane gets a row of its own.
pub fn wrap_units(units: &[String], width: u16) -> Vec<RenderRow> {
    let width = width.max(1) as usize;
    let mut rows = Vec::new();

    for (unit, text) in units.iter().enumerate() {
        let mut row: Option<(usize, String, usize)> = None;

        for (word_start, word) in word_spans(text) {
            let word_width = UnicodeWidthStr::width(word.as_str());
            row = match row {
                None => Some((word_start, word, word_width)),
                Some((start, mut line, line_width))
                    if line_width + 1 + word_width <= width =>
                {
                    line.push(' ');
                    line.push_str(&word);
                    Some((start, line, line_width + 1 + word_width))
                }
                Some((start, line, _)) => {
                    rows.push(RenderRow {
                        unit,
                        char_start: start,
                        text: line,
                    });
                    Some((word_start, word, word_width))
                }
            };
        }

        if let Some((start, line, _)) = row {
            rows.push(RenderRow {
                unit,
                char_start: start,
                text: line,
            });
        }
    }

    rows
}

/// Map a click at display column `x` of row `row_idx` to a selection.
/// A click on a word selects the whole word; a click on the space
/// between words yields the single space cell (which the resolver then
/// rejects as blank); a click past the end of the line selects nothing.
pub fn selection_at(
    rows: &[RenderRow],
    units: &[String],
    row_idx: usize,
    x: u16,
) -> Option<RawSelection> {
    let row = rows.get(row_idx)?;
    let x = x as usize;

    let mut col = 0;
    for (i, ch) in row.text.chars().enumerate() {
        let cell_width = ch.width().unwrap_or(0);
        if x < col + cell_width {
            let offset = row.char_start + i;
            if ch == ' ' {
                return Some(RawSelection::new(row.unit, offset, offset + 1));
            }

            let unit_text = units.get(row.unit)?;
            for (start, word) in word_spans(unit_text) {
                let len = word.chars().count();
                if offset >= start && offset < start + len {
                    return Some(RawSelection::new(row.unit, start, start + len));
                }
            }
            return None;
        }
        col += cell_width;
    }

    None
}

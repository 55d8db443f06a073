use crate::document::Document;
use crate::engine::diff::first_diff_offset;

/// A selection as reported by the input layer: a char range inside one
/// content unit. `start <= end` is not guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSelection {
    pub unit: usize,
    pub start: usize,
    pub end: usize,
}

impl RawSelection {
    pub fn new(unit: usize, start: usize, end: usize) -> Self {
        Self { unit, start, end }
    }
}

/// Three-way split of a unit at the selection offsets. Reassembling the
/// three parts gives back the original unit exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSpan {
    pub before: String,
    pub selected: String,
    pub after: String,
}

impl SelectionSpan {
    /// Offsets are clamped to the unit's char length; an inverted range
    /// (`end < start`) produces an empty selection.
    pub fn split(text: &str, start: usize, end: usize) -> Self {
        let len = text.chars().count();
        let start = start.min(len);
        let end = end.clamp(start, len);

        let bs = byte_of_char(text, start);
        let be = byte_of_char(text, end);

        Self {
            before: text[..bs].to_string(),
            selected: text[bs..be].to_string(),
            after: text[be..].to_string(),
        }
    }

    /// A selection counts as blank when removing the space characters
    /// leaves nothing. Only spaces: other whitespace still counts as
    /// selectable content.
    pub fn is_blank(&self) -> bool {
        self.selected.replace(' ', "").is_empty()
    }

    pub fn with_selected_removed(&self) -> String {
        format!("{}{}", self.before, self.after)
    }

    pub fn reassembled(&self) -> String {
        format!("{}{}{}", self.before, self.selected, self.after)
    }
}

fn byte_of_char(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Map a raw selection to the absolute char offset of the selected text
/// in the document's flat rendering, by observation: snapshot the flat
/// text, write the unit back without the selected range, snapshot
/// again, restore the unit, and report where the two snapshots first
/// differ.
///
/// Returns `None` when the selection is blank, out of range, or had no
/// observable effect on the flat text; callers ignore the interaction
/// in that case. The exclusive borrow keeps the mutate/measure/restore
/// window closed to every other reader of the document.
pub fn resolve_selection<D: Document>(doc: &mut D, sel: RawSelection) -> Option<usize> {
    let snapshot_before = doc.flat_text();

    let unit_text = doc.unit_text(sel.unit)?.to_string();
    let span = SelectionSpan::split(&unit_text, sel.start, sel.end);
    if span.is_blank() {
        return None;
    }

    doc.set_unit_text(sel.unit, &span.with_selected_removed());
    let snapshot_after = doc.flat_text();
    doc.set_unit_text(sel.unit, &span.reassembled());

    first_diff_offset(&snapshot_before, &snapshot_after)
}

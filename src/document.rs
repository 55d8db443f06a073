use itertools::Itertools;

/// A round's text, structured as a list of mutable content units
/// (paragraph fragments). All offset bookkeeping in the engine happens
/// against the flat text; the unit structure only exists so a selection
/// can be expressed as "a char range inside one unit".
pub trait Document {
    /// Plain-text linearization of the whole document. Whitespace runs
    /// inside a unit collapse to single spaces, units that are empty
    /// after trimming vanish entirely (separator included), remaining
    /// units join with a newline. Not a pure function of any single
    /// unit: a mutation that empties a unit shifts everything after it.
    fn flat_text(&self) -> String;

    fn unit_count(&self) -> usize;

    fn unit_text(&self, unit: usize) -> Option<&str>;

    /// Replace one unit's text. Out-of-range indices are ignored.
    fn set_unit_text(&mut self, unit: usize, text: &str);
}

/// Normalize raw text into content units: one unit per non-empty line,
/// inner whitespace collapsed.
pub fn split_units(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split_whitespace().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageDoc {
    units: Vec<String>,
}

impl PassageDoc {
    pub fn new(units: Vec<String>) -> Self {
        Self { units }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(split_units(text))
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }
}

impl Document for PassageDoc {
    fn flat_text(&self) -> String {
        self.units
            .iter()
            .map(|u| u.split_whitespace().join(" "))
            .filter(|u| !u.is_empty())
            .join("\n")
    }

    fn unit_count(&self) -> usize {
        self.units.len()
    }

    fn unit_text(&self, unit: usize) -> Option<&str> {
        self.units.get(unit).map(|u| u.as_str())
    }

    fn set_unit_text(&mut self, unit: usize, text: &str) {
        if let Some(u) = self.units.get_mut(unit) {
            *u = text.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_units_drops_blank_lines() {
        let units = split_units("one two\n\n  \nthree");
        assert_eq!(units, vec!["one two".to_string(), "three".to_string()]);
    }

    #[test]
    fn test_split_units_collapses_whitespace() {
        let units = split_units("a\t b   c");
        assert_eq!(units, vec!["a b c".to_string()]);
    }

    #[test]
    fn test_flat_text_joins_units_with_newline() {
        let doc = PassageDoc::from_text("first line\nsecond line");
        assert_eq!(doc.flat_text(), "first line\nsecond line");
    }

    #[test]
    fn test_flat_text_is_identity_for_normalized_units() {
        let doc = PassageDoc::from_text("the quick brown fox");
        assert_eq!(doc.flat_text(), "the quick brown fox");
    }

    #[test]
    fn test_flat_text_renormalizes_after_mutation() {
        let mut doc = PassageDoc::new(vec!["alpha beta".into(), "gamma".into()]);
        doc.set_unit_text(0, "alpha  beta");
        assert_eq!(doc.flat_text(), "alpha beta\ngamma");
    }

    #[test]
    fn test_flat_text_drops_emptied_unit_and_separator() {
        let mut doc = PassageDoc::new(vec!["alpha".into(), "beta".into(), "gamma".into()]);
        // offsets of "gamma" in the flat text shift left when "beta" vanishes
        assert_eq!(doc.flat_text(), "alpha\nbeta\ngamma");
        doc.set_unit_text(1, "");
        assert_eq!(doc.flat_text(), "alpha\ngamma");
        doc.set_unit_text(1, "   ");
        assert_eq!(doc.flat_text(), "alpha\ngamma");
    }

    #[test]
    fn test_unit_accessors() {
        let doc = PassageDoc::new(vec!["one".into(), "two".into()]);
        assert_eq!(doc.unit_count(), 2);
        assert_eq!(doc.unit_text(0), Some("one"));
        assert_eq!(doc.unit_text(1), Some("two"));
        assert_eq!(doc.unit_text(2), None);
    }

    #[test]
    fn test_set_unit_text_out_of_range_is_ignored() {
        let mut doc = PassageDoc::new(vec!["one".into()]);
        doc.set_unit_text(5, "nope");
        assert_eq!(doc.units(), &["one".to_string()]);
    }
}

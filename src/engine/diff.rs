/// Index of the first char at which `before` and `after` differ,
/// scanning from 0. `None` means the strings are identical (the edit
/// had no observable effect). When one string is a strict prefix of
/// the other the result is the shorter string's char length.
///
/// The only edits fed through here are single contiguous deletions, so
/// a first-difference scan recovers the deletion point without any
/// general diffing.
pub fn first_diff_offset(before: &str, after: &str) -> Option<usize> {
    let mut b = before.chars();
    let mut a = after.chars();
    let mut idx = 0;

    loop {
        match (b.next(), a.next()) {
            (None, None) => return None,
            (Some(x), Some(y)) if x == y => idx += 1,
            _ => return Some(idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_have_no_diff() {
        assert_eq!(first_diff_offset("", ""), None);
        assert_eq!(first_diff_offset("same text", "same text"), None);
    }

    #[test]
    fn removal_in_the_middle_is_found_at_its_start() {
        // "quick " removed at char 4
        assert_eq!(
            first_diff_offset("the quick brown fox", "the brown fox"),
            Some(4)
        );
    }

    #[test]
    fn removal_at_the_start() {
        assert_eq!(first_diff_offset("one two", "two"), Some(0));
    }

    #[test]
    fn strict_prefix_yields_shorter_length() {
        // removal at the tail: nothing differs until the shorter string ends
        assert_eq!(first_diff_offset("hello world", "hello"), Some(5));
        assert_eq!(first_diff_offset("hello", "hello world"), Some(5));
    }

    #[test]
    fn empty_vs_nonempty() {
        assert_eq!(first_diff_offset("", "x"), Some(0));
        assert_eq!(first_diff_offset("x", ""), Some(0));
    }

    #[test]
    fn substitution_is_also_found() {
        assert_eq!(first_diff_offset("abcd", "abXd"), Some(2));
    }

    #[test]
    fn offsets_are_chars_not_bytes() {
        // each "ä" is one char, two bytes
        assert_eq!(first_diff_offset("ääb", "ääc"), Some(2));
    }

    #[test]
    fn single_word_removals_across_a_sentence() {
        let text = "pack my box with five dozen jugs";
        for (start, word) in crate::util::word_spans(text) {
            // remove the word plus its trailing space (or leading, at the end)
            let chars: Vec<char> = text.chars().collect();
            let end = (start + word.chars().count() + 1).min(chars.len());
            let removed: String = chars[..start]
                .iter()
                .chain(chars[end..].iter())
                .collect();
            assert_eq!(
                first_diff_offset(text, &removed),
                Some(start),
                "removing {word:?} at {start}"
            );
        }
    }
}

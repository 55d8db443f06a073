/// Elapsed-time display as minutes:seconds, e.g. "1:05"
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Split text into words with their starting char offsets.
/// A word is a maximal run of non-whitespace characters.
pub fn word_spans(text: &str) -> Vec<(usize, String)> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut start = 0;

    for (idx, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            if !current.is_empty() {
                words.push((start, std::mem::take(&mut current)));
            }
        } else {
            if current.is_empty() {
                start = idx;
            }
            current.push(ch);
        }
    }
    if !current.is_empty() {
        words.push((start, current));
    }

    words
}

pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

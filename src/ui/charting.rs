/// Compute X (seconds) and Y (char offset) bounds for the results chart
pub fn compute_chart_params(progress_points: &[(f64, f64)], doc_chars: usize) -> (f64, f64) {
    let mut overall_duration = match progress_points.last() {
        Some(p) => p.0,
        None => 1.0,
    };
    if overall_duration < 1.0 {
        overall_duration = 1.0;
    }

    // the Y axis always spans the whole document so progress reads
    // against the full text
    (overall_duration, doc_chars.max(1) as f64)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

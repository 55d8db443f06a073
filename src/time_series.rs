#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressPoint {
    pub t: f64,
    pub offset: f64,
}

impl ProgressPoint {
    pub fn new(t: f64, offset: f64) -> Self {
        Self { t, offset }
    }
}

impl From<(f64, f64)> for ProgressPoint {
    fn from(v: (f64, f64)) -> Self {
        ProgressPoint { t: v.0, offset: v.1 }
    }
}

impl From<ProgressPoint> for (f64, f64) {
    fn from(p: ProgressPoint) -> Self {
        (p.t, p.offset)
    }
}

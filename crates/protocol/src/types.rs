use serde::{Deserialize, Serialize};

/// Identity of an admitted comment, unique for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub u64);

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The video surface comments travel across, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Height of one visible row when the surface is split into `rows`.
    pub fn row_height(&self, rows: u32) -> f64 {
        self.height / f64::from(rows.max(1))
    }

    /// Font size a renderer should use so a banner fits its row.
    pub fn font_size(&self, rows: u32) -> f64 {
        self.row_height(rows) * 0.8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_geometry() {
        let vp = Viewport::new(1280.0, 720.0);
        assert!((vp.row_height(12) - 60.0).abs() < f64::EPSILON);
        assert!((vp.font_size(12) - 48.0).abs() < 1e-9);
    }

    #[test]
    fn zero_rows_does_not_divide_by_zero() {
        let vp = Viewport::new(100.0, 50.0);
        assert!((vp.row_height(0) - 50.0).abs() < f64::EPSILON);
    }
}

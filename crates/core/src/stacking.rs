use serde::Serialize;

/// Where and how faintly a banner is drawn.
///
/// Lanes beyond the visible row count wrap around onto the same rows, one
/// "depth" layer per wrap, each layer fainter than the last.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Placement {
    pub lane: usize,
    /// Visible row the lane maps onto.
    pub row: u32,
    /// Offset from the top of the surface.
    pub top: f64,
    pub depth: u32,
    pub opacity: f64,
}

/// Place lane `lane` on a surface of `rows` rows each `row_height` tall.
///
/// Exempt banners (those carrying an avatar badge) always sit on the
/// first depth layer.
pub fn place(lane: usize, rows: u32, row_height: f64, exempt: bool, opacity_base: f64) -> Placement {
    let rows = rows.max(1) as usize;
    let row = (lane % rows) as u32;
    let depth = if exempt { 0 } else { (lane / rows) as u32 };
    Placement {
        lane,
        row,
        top: row_height * (0.1 + f64::from(row)),
        depth,
        opacity: opacity(opacity_base, depth),
    }
}

/// Opacity of depth layer `depth`.
pub fn opacity(base: f64, depth: u32) -> f64 {
    base.powi(depth as i32 + 1)
}

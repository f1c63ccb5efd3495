//! Scope gate: is the crosshair on the target?

use crate::types::{Detection, ScreenGeometry};

/// True iff the window centre lies strictly inside
/// `[x - w, x + w] × [y - h, y + h]`. A centre on an edge is outside.
pub fn in_scope(
    center: (f64, f64),
    target_x: f64,
    target_y: f64,
    target_w: f64,
    target_h: f64,
) -> bool {
    let (cx, cy) = center;
    let x1 = target_x - target_w;
    let x2 = target_x + target_w;
    let y1 = target_y - target_h;
    let y2 = target_y + target_h;

    cx > x1 && cx < x2 && cy > y1 && cy < y2
}

/// [`in_scope`] for a detection against the given window.
pub fn detection_in_scope(geometry: &ScreenGeometry, detection: &Detection) -> bool {
    in_scope(
        geometry.center(),
        detection.x,
        detection.y,
        detection.width,
        detection.height,
    )
}

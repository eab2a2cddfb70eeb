//! Rotation-aware geometry utilities shared by the snap engine and the store.

use kurbo::{Point, Rect, Size};

/// Tolerance below which a rotation (in degrees, mod 360) counts as axis-aligned.
pub const ROTATION_EPSILON: f64 = 1e-4;

/// Default grid spacing for grid snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Rotate a point around a pivot by an angle in degrees.
///
/// Rotation throughout the editor pivots around an element's *position* (the
/// top-left anchor), never its visual center. Callers pass that anchor here.
pub fn rotate_point(p: Point, pivot: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
}

/// Check whether a rotation is a whole number of full turns within
/// [`ROTATION_EPSILON`].
pub fn is_axis_aligned(degrees: f64) -> bool {
    let normalized = degrees.rem_euclid(360.0);
    normalized < ROTATION_EPSILON || 360.0 - normalized < ROTATION_EPSILON
}

/// Axis-aligned bounding box of a `size` box anchored at `position`, taking
/// rotation into account.
///
/// Axis-aligned rotations short-circuit to the plain rect. Otherwise all four
/// corners are rotated about the position anchor and the min/max extents taken.
pub fn bounding_box(position: Point, size: Size, degrees: f64) -> Rect {
    if is_axis_aligned(degrees) {
        return Rect::new(
            position.x,
            position.y,
            position.x + size.width,
            position.y + size.height,
        );
    }

    let corners = [
        position,
        Point::new(position.x + size.width, position.y),
        Point::new(position.x + size.width, position.y + size.height),
        Point::new(position.x, position.y + size.height),
    ];
    let rotated = corners.map(|c| rotate_point(c, position, degrees));

    let min_x = rotated.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = rotated.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = rotated.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = rotated.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    Rect::new(min_x, min_y, max_x, max_y)
}

/// True rotated center of a box: the untransformed center offset `(w/2, h/2)`
/// rotated about the position anchor.
///
/// Distinct from the center of [`bounding_box`], which drifts for rotated
/// boxes. Center-alignment checks use this point.
pub fn rotated_center(position: Point, size: Size, degrees: f64) -> Point {
    let center = Point::new(
        position.x + size.width / 2.0,
        position.y + size.height / 2.0,
    );
    if is_axis_aligned(degrees) {
        return center;
    }
    rotate_point(center, position, degrees)
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, spacing: f64) -> Point {
    Point::new(
        (point.x / spacing).round() * spacing,
        (point.y / spacing).round() * spacing,
    )
}

/// Clamp a top-left position so the unrotated box stays inside the canvas.
pub fn clamp_to_canvas(position: Point, size: Size, canvas: Size) -> Point {
    Point::new(
        position.x.clamp(0.0, (canvas.width - size.width).max(0.0)),
        position.y.clamp(0.0, (canvas.height - size.height).max(0.0)),
    )
}

/// Exact hit test against a rotated box.
///
/// The probe is inverse-rotated about the position anchor, then tested against
/// the unrotated rect inflated by `tolerance`.
pub fn hit_test(position: Point, size: Size, degrees: f64, probe: Point, tolerance: f64) -> bool {
    let local = if is_axis_aligned(degrees) {
        probe
    } else {
        rotate_point(probe, position, -degrees)
    };
    Rect::new(
        position.x,
        position.y,
        position.x + size.width,
        position.y + size.height,
    )
    .inflate(tolerance, tolerance)
    .contains(local)
}

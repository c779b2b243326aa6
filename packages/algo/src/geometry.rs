//! Joint Angle Geometry
//!
//! Computes the angle formed at a body joint from three keypoints, e.g. the
//! knee angle from hip-knee-ankle. All angles are in degrees.

use crate::types::Joint;

/// Angle at vertex `b` between rays `b -> a` and `b -> c`, in degrees.
///
/// The angle is direction-independent and always falls in `[0, 180]`:
/// collinear points on opposite sides of the vertex give 180, coincident
/// rays give 0. Degenerate inputs (coincident points) still produce a
/// finite value.
///
/// # Arguments
/// * `a` - First endpoint (e.g. hip)
/// * `b` - Vertex joint (e.g. knee)
/// * `c` - Second endpoint (e.g. ankle)
pub fn joint_angle(a: Joint, b: Joint, c: Joint) -> f64 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut degrees = radians.abs().to_degrees();

    // atan2 differences can sweep past a half turn; reflect back
    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }

    degrees
}

// ==================== Tests ====================

// Geometry helpers over normalized 2D keypoints

use crate::models::pose::Point2;

/// Added to the magnitude product so coincident points never divide by zero
const ANGLE_EPSILON: f32 = 1e-8;

/// Angle ABC in degrees, in [0, 180], formed at vertex `b` by rays b→a and b→c.
///
/// Zero-length rays do not fail: the epsilon in the denominator drives the
/// cosine to 0 and the result to 90°.
pub fn angle_between(a: Point2, b: Point2, c: Point2) -> f32 {
    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);

    let dot = bax * bcx + bay * bcy;
    let norms = bax.hypot(bay) * bcx.hypot(bcy);
    let cosang = (dot / (norms + ANGLE_EPSILON)).clamp(-1.0, 1.0);

    cosang.acos().to_degrees()
}

pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Euclidean distance
pub fn distance(a: Point2, b: Point2) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

//! Segment, rectangle and polygon helpers for hull collision
//!
//! Screen coordinates: +x right, +y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Two directions whose cross term falls below this are treated as parallel
const PARALLEL_EPSILON: f32 = 1e-6;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Rectangle of the given extents centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    pub fn top_left(&self) -> Vec2 {
        self.min
    }

    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.max.x, self.min.y)
    }

    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.min.x, self.max.y)
    }

    pub fn bottom_right(&self) -> Vec2 {
        self.max
    }

    /// Edges in left, bottom, right, top order
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        [
            (self.top_left(), self.bottom_left()),
            (self.bottom_left(), self.bottom_right()),
            (self.bottom_right(), self.top_right()),
            (self.top_right(), self.top_left()),
        ]
    }
}

/// Parametric segment-segment test on normalized directions.
///
/// The segments cross iff both parameters lie strictly inside their segment
/// and the segments are not parallel. Touching endpoints do not count.
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let a_vec = a2 - a1;
    let b_vec = b2 - b1;
    let r = a_vec.normalize_or_zero();
    let s = b_vec.normalize_or_zero();

    // Normals to each direction
    let r_normal = Vec2::new(r.y, -r.x);
    let s_normal = Vec2::new(s.y, -s.x);

    let denom = r.dot(s_normal);
    if denom.abs() < PARALLEL_EPSILON {
        return false;
    }

    let qp = b1 - a1;
    let t = qp.dot(s_normal) / denom;
    let u = qp.dot(r_normal) / denom;

    t > 0.0 && u > 0.0 && t * t < a_vec.length_squared() && u * u < b_vec.length_squared()
}

/// Whether a segment crosses any edge of the rectangle
pub fn segment_hits_rect(p1: Vec2, p2: Vec2, rect: &Rect) -> bool {
    rect.edges()
        .iter()
        .any(|&(e1, e2)| segments_intersect(p1, p2, e1, e2))
}

/// Edges of a closed polygon, including the edge from the last vertex back to the first
pub fn polygon_edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    let count = if n < 2 { 0 } else { n };
    (0..count).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Whether any polygon edge crosses any rectangle edge (short-circuits on first hit)
pub fn polygon_hits_rect(polygon: &[Vec2], rect: &Rect) -> bool {
    polygon_edges(polygon).any(|(p1, p2)| segment_hits_rect(p1, p2, rect))
}

/// Rotate a local point by `angle` radians and translate by `offset`.
///
/// Positive angles turn the +y-down frame counter-clockwise on screen, so a
/// positive heading leans the bow to the left.
#[inline]
pub fn rotate_translate(local: Vec2, angle: f32, offset: Vec2) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(
        local.x * cos + local.y * sin + offset.x,
        local.y * cos - local.x * sin + offset.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_segments() {
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        ));
    }

    #[test]
    fn test_disjoint_segments() {
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(10.0, -4.0),
        ));
    }

    #[test]
    fn test_parallel_segments_never_intersect() {
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
        ));
    }

    #[test]
    fn test_touching_endpoint_is_not_a_crossing() {
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, -5.0),
            Vec2::new(10.0, 5.0),
        ));
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Vec2::new(5.0, 5.0);
        assert!(!segments_intersect(p, p, Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_rect_from_center() {
        let rect = Rect::from_center(Vec2::new(450.0, 150.0), Vec2::new(100.0, 100.0));
        assert_eq!(rect.min, Vec2::new(400.0, 100.0));
        assert_eq!(rect.max, Vec2::new(500.0, 200.0));
        assert_eq!(rect.top_right(), Vec2::new(500.0, 100.0));
        assert_eq!(rect.bottom_left(), Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_hull_left_of_rect_misses() {
        let rect = Rect::new(Vec2::new(400.0, 100.0), Vec2::new(500.0, 200.0));
        let hull = crate::sim::vessel::hull_at(0.0, Vec2::new(325.0, 150.0));
        let max_x = hull.iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 350.0);
        assert!(!polygon_hits_rect(&hull, &rect));
    }

    #[test]
    fn test_polygon_overlapping_rect_hits() {
        let rect = Rect::new(Vec2::new(400.0, 100.0), Vec2::new(500.0, 200.0));
        let polygon = [
            Vec2::new(380.0, 150.0),
            Vec2::new(420.0, 140.0),
            Vec2::new(420.0, 160.0),
        ];
        assert!(polygon_hits_rect(&polygon, &rect));
    }

    #[test]
    fn test_closing_edge_is_tested() {
        // Only the last -> first edge crosses the rectangle
        let rect = Rect::new(Vec2::new(-5.0, 40.0), Vec2::new(5.0, 60.0));
        let polygon = [
            Vec2::new(-20.0, 50.0),
            Vec2::new(-20.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(20.0, 50.0),
        ];
        assert_eq!(polygon_edges(&polygon).count(), 4);
        assert!(polygon_hits_rect(&polygon, &rect));
    }

    #[test]
    fn test_rotate_translate() {
        let p = rotate_translate(Vec2::new(0.0, -75.0), 0.0, Vec2::new(450.0, 700.0));
        assert!((p - Vec2::new(450.0, 625.0)).length() < 1e-4);

        // Quarter turn left: bow (0, -75) swings to the left of center
        let p = rotate_translate(
            Vec2::new(0.0, -75.0),
            std::f32::consts::FRAC_PI_2,
            Vec2::ZERO,
        );
        assert!((p - Vec2::new(-75.0, 0.0)).length() < 1e-4);
    }
}

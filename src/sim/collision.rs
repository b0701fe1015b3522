//! Collision detection between the vessel and the scrolling entities
//!
//! Obstacles use the exact hull: every hull edge against every edge of the
//! obstacle's box. Pickups use a coarse box around the vessel center.

use glam::Vec2;

use super::entities::{Obstacle, Pickup};
use super::geometry::polygon_hits_rect;

/// Half-size of the square around the vessel center that collects pickups
pub const PICKUP_REACH: f32 = 50.0;

/// First obstacle whose box is crossed by the hull, if any
pub fn hull_obstacle_collision<'a>(hull: &[Vec2], obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .find(|obs| polygon_hits_rect(hull, &obs.rect()))
}

/// Whether the pickup sits inside the collection box around `center`
pub fn pickup_in_reach(center: Vec2, pickup: &Pickup, reach: f32) -> bool {
    !pickup.collected
        && (center.x - pickup.pos.x).abs() < reach
        && (center.y - pickup.pos.y).abs() < reach
}

/// Collect and remove the first pickup within reach. At most one per call.
pub fn collect_pickup(center: Vec2, pickups: &mut Vec<Pickup>, reach: f32) -> Option<Pickup> {
    let index = pickups
        .iter()
        .position(|p| pickup_in_reach(center, p, reach))?;
    let mut pickup = pickups.remove(index);
    pickup.collected = true;
    Some(pickup)
}

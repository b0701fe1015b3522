//! Idle/demo steering
//!
//! Stands in for a human at the helm: heads for the lane whose next obstacle
//! is furthest away and leans just enough to get there.

use super::entities::LANE_COUNT;
use super::state::World;
use super::vessel::TurnCommand;

/// Obstacles further behind the bow than this no longer matter
const PASSED_MARGIN: f32 = 80.0;
/// Degrees of lean per pixel of lateral error
const LEAN_GAIN: f32 = 0.5;
/// Steepest lean the autopilot asks for
const MAX_LEAN: f32 = 45.0;
/// Heading error tolerated before correcting
const DEADBAND: f32 = 0.5;

/// Lane with the most open water ahead (ties go to the nearest lane)
pub fn safest_lane(world: &World) -> usize {
    let vessel_y = world.vessel.pos.y;
    let vessel_x = world.vessel.pos.x;

    let clearance = |lane: usize| -> f32 {
        world
            .obstacles
            .iter()
            .filter(|o| o.lane == lane && o.pos.y < vessel_y + PASSED_MARGIN)
            .map(|o| vessel_y - o.pos.y)
            .fold(f32::INFINITY, f32::min)
    };

    (0..LANE_COUNT)
        .max_by(|&a, &b| {
            clearance(a).total_cmp(&clearance(b)).then_with(|| {
                let da = (world.spawner.lane_x(a) - vessel_x).abs();
                let db = (world.spawner.lane_x(b) - vessel_x).abs();
                db.total_cmp(&da)
            })
        })
        .unwrap_or(LANE_COUNT / 2)
}

/// Turn command that steers toward the safest lane
pub fn steer(world: &World) -> TurnCommand {
    let target_x = world.spawner.lane_x(safest_lane(world));
    // Positive heading leans left, so a target to the left wants a positive lean
    let desired = ((world.vessel.pos.x - target_x) * LEAN_GAIN).clamp(-MAX_LEAN, MAX_LEAN);
    let heading = world.vessel.heading();

    if heading < desired - DEADBAND {
        TurnCommand::Left
    } else if heading > desired + DEADBAND {
        TurnCommand::Right
    } else {
        TurnCommand::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::entities::{Obstacle, ObstacleKind};
    use crate::sim::tick::{TickInput, tick};
    use glam::Vec2;

    fn world() -> World {
        let config = GameConfig {
            spawn_chance: 0.0,
            ..Default::default()
        };
        World::new(&config, 4)
    }

    #[test]
    fn test_open_river_keeps_center_lane() {
        let w = world();
        assert_eq!(safest_lane(&w), 1);
        assert_eq!(steer(&w), TurnCommand::None);
    }

    #[test]
    fn test_dodges_obstacle_ahead() {
        let mut w = world();
        w.obstacles.push(Obstacle {
            id: 1,
            kind: ObstacleKind::Rock,
            lane: 1,
            pos: Vec2::new(450.0, 300.0),
        });
        w.obstacles.push(Obstacle {
            id: 2,
            kind: ObstacleKind::Rock,
            lane: 2,
            pos: Vec2::new(550.0, 100.0),
        });
        assert_eq!(safest_lane(&w), 0);
        assert_eq!(steer(&w), TurnCommand::Left);
    }

    #[test]
    fn test_reaches_target_lane() {
        let mut w = world();
        w.obstacles.push(Obstacle {
            id: 1,
            kind: ObstacleKind::Log,
            lane: 1,
            pos: Vec2::new(450.0, -2000.0),
        });
        w.obstacles.push(Obstacle {
            id: 2,
            kind: ObstacleKind::Log,
            lane: 0,
            pos: Vec2::new(350.0, -1000.0),
        });
        for _ in 0..480 {
            let input = TickInput { turn: steer(&w) };
            tick(&mut w, &input);
        }
        assert!((w.vessel.pos.x - 550.0).abs() < 10.0);
    }
}

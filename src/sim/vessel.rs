//! Vessel kinematics
//!
//! The vessel never moves vertically on screen. Its velocity only steers it
//! sideways; the vertical component is handed to the world, which scrolls
//! everything else toward it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::rotate_translate;
use crate::consts::*;

/// Hull outline around the vessel center, bow first, heading 0
pub const HULL_TEMPLATE: [Vec2; 7] = [
    Vec2::new(0.0, -75.0),
    Vec2::new(25.0, -37.0),
    Vec2::new(25.0, 53.0),
    Vec2::new(16.0, 75.0),
    Vec2::new(-16.0, 75.0),
    Vec2::new(-25.0, 53.0),
    Vec2::new(-25.0, -37.0),
];

/// Abstract steering input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnCommand {
    /// Lean toward +90 (bow to the left)
    Left,
    /// Lean toward -90 (bow to the right)
    Right,
    #[default]
    None,
}

/// World-space hull derived from the template, heading and position
pub fn hull_at(heading: f32, pos: Vec2) -> [Vec2; 7] {
    let angle = heading.to_radians();
    HULL_TEMPLATE.map(|p| rotate_translate(p, angle, pos))
}

/// The player's boat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vessel {
    /// Degrees in [-90, 90]; 0 points up the river, +90 points left
    heading: f32,
    /// Magnitude of the velocity vector
    pub speed: f32,
    /// Velocity derived from heading and speed (+y is forward progress)
    pub vel: Vec2,
    /// Center of the hull in screen space
    pub pos: Vec2,
    /// Hull vertices in screen space
    hull: [Vec2; 7],
    /// 255 = fully visible, 0 = sunk
    pub alpha: u8,
}

impl Vessel {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        let mut vessel = Self {
            heading: 0.0,
            speed,
            vel: Vec2::ZERO,
            pos,
            hull: HULL_TEMPLATE,
            alpha: OPAQUE_ALPHA,
        };
        vessel.update_velocity();
        vessel.update_hull();
        vessel
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn hull(&self) -> &[Vec2; 7] {
        &self.hull
    }

    /// One steering step: heading, then velocity, position and hull
    pub fn steer(&mut self, turn: TurnCommand, river_left: f32, river_right: f32) {
        self.update_heading(turn);
        self.update_velocity();
        self.update_position(river_left, river_right);
        self.update_hull();
    }

    /// Recompute velocity from heading and speed
    pub fn update_velocity(&mut self) {
        let angle = (self.heading + 90.0).to_radians();
        self.vel = Vec2::new(self.speed * angle.cos(), self.speed * angle.sin());
    }

    /// Apply the turn command, then the water drift that deepens an existing lean.
    ///
    /// The lean is judged on the heading before this tick's turn, so the first
    /// step away from 0 or back from the stops never drifts.
    pub fn update_heading(&mut self, turn: TurnCommand) {
        let lean = self.heading;
        let mut heading = lean;

        match turn {
            TurnCommand::Left => heading += TURN_STEP,
            TurnCommand::Right => heading -= TURN_STEP,
            TurnCommand::None => {}
        }

        if lean > 0.0 && lean < MAX_HEADING {
            heading += LEAN_DRIFT;
        } else if lean < 0.0 && lean > -MAX_HEADING {
            heading -= LEAN_DRIFT;
        }

        self.heading = heading.clamp(-MAX_HEADING, MAX_HEADING);
        assert!(
            (-MAX_HEADING..=MAX_HEADING).contains(&self.heading),
            "heading out of range: {}",
            self.heading
        );
    }

    /// Move sideways by a fraction of the horizontal velocity, staying off the banks
    pub fn update_position(&mut self, river_left: f32, river_right: f32) {
        let min_x = river_left + BANK_OFFSET;
        let max_x = river_right - BANK_OFFSET;
        self.pos.x = (self.pos.x + LATERAL_FACTOR * self.vel.x).max(min_x).min(max_x);
    }

    /// Rebuild the hull from the fixed template
    pub fn update_hull(&mut self) {
        self.hull = hull_at(self.heading, self.pos);
    }

    /// Fade the vessel out by `rate`, stopping at 0
    pub fn sink(&mut self, rate: u8) {
        self.alpha = self.alpha.saturating_sub(rate);
    }

    pub fn has_sunk(&self) -> bool {
        self.alpha == 0
    }
}

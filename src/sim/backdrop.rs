//! Looping river backdrop
//!
//! Two copies of one tile, stacked vertically, scroll with the world. When the
//! lower copy has fully left the screen the upper one takes its place and a
//! fresh upper copy is stacked above it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Backdrop {
    /// Tile height in pixels
    pub tile_height: f32,
    /// Top edge of the lower tile
    pub lower_y: f32,
    /// Top edge of the upper tile
    pub upper_y: f32,
}

impl Backdrop {
    pub fn new(tile_height: f32) -> Self {
        Self {
            tile_height,
            lower_y: 0.0,
            upper_y: -tile_height,
        }
    }

    /// Scroll both tiles by `dy`, then swap once the lower tile is off screen
    pub fn advance(&mut self, dy: f32) {
        self.lower_y += dy;
        self.upper_y += dy;
        if self.lower_y > self.tile_height {
            self.lower_y = self.upper_y;
            self.upper_y = self.lower_y - self.tile_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiles_stay_stacked() {
        let mut backdrop = Backdrop::new(900.0);
        for _ in 0..1000 {
            backdrop.advance(5.0);
            assert!((backdrop.lower_y - backdrop.upper_y - 900.0).abs() < 1e-3);
            assert!(backdrop.lower_y <= 900.0);
        }
    }

    #[test]
    fn test_swap_after_tile_passes() {
        let mut backdrop = Backdrop::new(100.0);
        backdrop.advance(60.0);
        assert_eq!(backdrop.lower_y, 60.0);
        backdrop.advance(60.0);
        // Lower passed 100, upper (at 20) took its place
        assert_eq!(backdrop.lower_y, 20.0);
        assert_eq!(backdrop.upper_y, -80.0);
    }
}

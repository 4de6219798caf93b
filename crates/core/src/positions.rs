//! Position and vector types for beings, drops and map tiles

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Edge length of one map tile in pixels
pub const TILE_SIZE: i32 = 32;

/// Tile-based position (for collision lookups)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePosition {
    pub x: i32,
    pub y: i32,
}

impl TilePosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert tile position to the pixel position of its top-left corner
    pub fn to_pixels(self) -> Position {
        Position {
            x: (self.x * TILE_SIZE) as f32,
            y: (self.y * TILE_SIZE) as f32,
        }
    }
}

/// Pixel-based position (for smooth movement)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert pixel position to tile position
    pub fn to_tiles(self) -> TilePosition {
        TilePosition {
            x: (self.x / TILE_SIZE as f32).floor() as i32,
            y: (self.y / TILE_SIZE as f32).floor() as i32,
        }
    }

    /// Calculate distance to another position
    pub fn distance_to(self, other: Position) -> f32 {
        (other - self).length()
    }

    /// Offset this position by a vector
    pub fn offset(self, by: Vector2) -> Position {
        Position::new(self.x + by.x, self.y + by.y)
    }
}

impl Sub for Position {
    type Output = Vector2;

    fn sub(self, rhs: Position) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector2> for Position {
    type Output = Position;

    fn add(self, rhs: Vector2) -> Position {
        self.offset(rhs)
    }
}

/// Displacement or direction in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn is_null(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit vector in the same direction, or zero for the null vector
    pub fn normalized(self) -> Vector2 {
        let len = self.length();
        if len == 0.0 {
            return Vector2::ZERO;
        }
        Vector2::new(self.x / len, self.y / len)
    }

    pub fn scaled(self, factor: f32) -> Vector2 {
        Vector2::new(self.x * factor, self.y * factor)
    }

    /// True when both components are non-zero
    pub fn is_diagonal(self) -> bool {
        self.x != 0.0 && self.y != 0.0
    }
}

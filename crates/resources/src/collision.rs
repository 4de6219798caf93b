//! Tile collision for client-side movement prediction
//!
//! A map is a grid of 32x32 pixel tiles, each either free or blocked. Beings
//! are treated as squares of `2 * radius` pixels centred on their position.

use crate::error::{ResourceError, Result};
use mana_core::{Position, TilePosition, Vector2, TILE_SIZE};

/// Something that can clamp a requested move against the world
pub trait CollisionProvider {
    /// Move `pos` by `delta` as far as collision allows
    ///
    /// # Returns
    /// The resulting position. Equal to `pos` when every part of the move is
    /// blocked.
    fn adjust_move(&self, pos: Position, delta: Vector2, radius: f32) -> Position;
}

/// Character marking a blocked tile in text map files
pub const BLOCKED_TILE: char = '#';

/// Walkability grid of one map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionLayer {
    width: i32,
    height: i32,
    /// Row-major, `true` = blocked
    blocked: Vec<bool>,
}

impl CollisionLayer {
    /// Create an all-walkable layer
    pub fn open(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            blocked: vec![false; (width * height) as usize],
        }
    }

    /// Parse a text grid: one line per row, `#` blocked, anything else free
    ///
    /// Blank trailing lines are ignored; all rows must have the same width.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut rows: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(ResourceError::InvalidFormat("map has no tiles".into()));
        }

        let mut blocked = Vec::with_capacity(width * rows.len());
        for (index, row) in rows.iter().enumerate() {
            let row_width = row.chars().count();
            if row_width != width {
                return Err(ResourceError::InvalidFormat(format!(
                    "row {} has {} tiles, expected {}",
                    index + 1,
                    row_width,
                    width
                )));
            }
            blocked.extend(row.chars().map(|c| c == BLOCKED_TILE));
        }

        Ok(Self {
            width: width as i32,
            height: rows.len() as i32,
            blocked,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Mark a tile blocked or free; out-of-map tiles are ignored
    pub fn set_blocked(&mut self, tile: TilePosition, blocked: bool) {
        if let Some(index) = self.index(tile) {
            self.blocked[index] = blocked;
        }
    }

    /// Whether a tile is blocked; everything outside the map is
    pub fn is_blocked(&self, tile: TilePosition) -> bool {
        match self.index(tile) {
            Some(index) => self.blocked[index],
            None => true,
        }
    }

    /// Whether a square of half-size `radius` centred on `pos` touches no blocked tile
    pub fn is_area_free(&self, pos: Position, radius: f32) -> bool {
        let tile = TILE_SIZE as f32;
        let x0 = ((pos.x - radius) / tile).floor() as i32;
        let y0 = ((pos.y - radius) / tile).floor() as i32;
        // The far edge itself belongs to the next tile only if it crosses into it
        let x1 = ((pos.x + radius) / tile).ceil() as i32 - 1;
        let y1 = ((pos.y + radius) / tile).ceil() as i32 - 1;

        for ty in y0..=y1.max(y0) {
            for tx in x0..=x1.max(x0) {
                if self.is_blocked(TilePosition::new(tx, ty)) {
                    return false;
                }
            }
        }
        true
    }

    #[inline]
    fn index(&self, tile: TilePosition) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width || tile.y >= self.height {
            return None;
        }
        Some((tile.y * self.width + tile.x) as usize)
    }
}

impl CollisionProvider for CollisionLayer {
    fn adjust_move(&self, pos: Position, delta: Vector2, radius: f32) -> Position {
        let target = pos + delta;
        if self.is_area_free(target, radius) {
            return target;
        }

        // Slide: keep whichever axis is still free
        let mut result = pos;
        let along_x = Position::new(pos.x + delta.x, pos.y);
        if delta.x != 0.0 && self.is_area_free(along_x, radius) {
            result = along_x;
        }
        let along_y = Position::new(result.x, result.y + delta.y);
        if delta.y != 0.0 && self.is_area_free(along_y, radius) {
            result = along_y;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
#####
#...#
#..##
#...#
#####
";

    #[test]
    fn test_parse_grid() {
        let layer = CollisionLayer::from_text(MAP).unwrap();
        assert_eq!(layer.width(), 5);
        assert_eq!(layer.height(), 5);
        assert!(layer.is_blocked(TilePosition::new(0, 0)));
        assert!(!layer.is_blocked(TilePosition::new(1, 1)));
        assert!(layer.is_blocked(TilePosition::new(3, 2)));
    }

    #[test]
    fn test_out_of_map_is_blocked() {
        let layer = CollisionLayer::open(2, 2);
        assert!(layer.is_blocked(TilePosition::new(-1, 0)));
        assert!(layer.is_blocked(TilePosition::new(2, 1)));
        assert!(!layer.is_blocked(TilePosition::new(1, 1)));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = CollisionLayer::from_text("...\n..\n");
        assert!(matches!(result, Err(ResourceError::InvalidFormat(_))));
    }

    #[test]
    fn test_empty_map_rejected() {
        assert!(CollisionLayer::from_text("\n\n").is_err());
    }

    #[test]
    fn test_free_move_is_applied() {
        let layer = CollisionLayer::from_text(MAP).unwrap();
        let start = Position::new(48.0, 48.0);
        let end = layer.adjust_move(start, Vector2::new(2.0, 3.0), 14.0);
        assert_eq!(end, Position::new(50.0, 51.0));
    }

    #[test]
    fn test_blocked_axis_slides() {
        let layer = CollisionLayer::from_text(MAP).unwrap();
        // Against the top wall: y is blocked, x is free
        let start = Position::new(60.0, 46.0);
        let end = layer.adjust_move(start, Vector2::new(2.0, -2.0), 14.0);
        assert_eq!(end, Position::new(62.0, 46.0));
    }

    #[test]
    fn test_fully_blocked_move_stays() {
        let layer = CollisionLayer::from_text(MAP).unwrap();
        let start = Position::new(46.0, 46.0);
        let end = layer.adjust_move(start, Vector2::new(-2.0, -2.0), 14.0);
        assert_eq!(end, start);
    }
}

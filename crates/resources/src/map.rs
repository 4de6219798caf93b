//! Map resources and how they are loaded

use crate::collision::{CollisionLayer, CollisionProvider};
use crate::error::{ResourceError, Result};
use mana_core::{MapName, Position, Vector2};
use std::path::{Path, PathBuf};

/// A loaded map
#[derive(Debug)]
pub struct MapResource {
    pub name: MapName,
    pub collision: CollisionLayer,
}

impl MapResource {
    pub fn new(name: impl Into<MapName>, collision: CollisionLayer) -> Self {
        Self {
            name: name.into(),
            collision,
        }
    }
}

impl CollisionProvider for MapResource {
    fn adjust_move(&self, pos: Position, delta: Vector2, radius: f32) -> Position {
        self.collision.adjust_move(pos, delta, radius)
    }
}

/// Source of map resources for the cache
pub trait MapLoader: Send + Sync {
    fn load(&self, name: &str) -> Result<MapResource>;
}

/// Loads `<maps_dir>/<name>.txt` collision grids
#[derive(Debug, Clone)]
pub struct TextMapLoader {
    maps_dir: PathBuf,
}

impl TextMapLoader {
    pub fn new<P: Into<PathBuf>>(maps_dir: P) -> Self {
        Self {
            maps_dir: maps_dir.into(),
        }
    }

    pub fn maps_dir(&self) -> &Path {
        &self.maps_dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.maps_dir.join(format!("{}.txt", name))
    }
}

impl MapLoader for TextMapLoader {
    fn load(&self, name: &str) -> Result<MapResource> {
        // Map names come from the server; never let them leave maps_dir
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(ResourceError::NotFound(format!("map '{}'", name)));
        }

        let path = self.path_for(name);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResourceError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let collision = CollisionLayer::from_text(&text)?;
        tracing::debug!(
            "Loaded map {} ({}x{} tiles)",
            name,
            collision.width(),
            collision.height()
        );
        Ok(MapResource::new(name, collision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_text_map() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("field.txt"), "..#\n...\n").unwrap();

        let loader = TextMapLoader::new(temp_dir.path());
        let map = loader.load("field").unwrap();
        assert_eq!(map.name, MapName::from("field"));
        assert_eq!(map.collision.width(), 3);
        assert_eq!(map.collision.height(), 2);
    }

    #[test]
    fn test_missing_map() {
        let temp_dir = TempDir::new().unwrap();
        let loader = TextMapLoader::new(temp_dir.path());
        assert!(matches!(loader.load("nowhere"), Err(ResourceError::NotFound(_))));
    }

    #[test]
    fn test_path_escape_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let loader = TextMapLoader::new(temp_dir.path());
        assert!(loader.load("../secret").is_err());
        assert!(loader.load("").is_err());
    }
}

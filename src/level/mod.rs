use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::SetupError;
use crate::render::TextureId;

/// Parsed level description in the Tiled JSON layout. Loaded once at
/// world setup and read-only afterwards.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Level {
    pub width: Option<i32>,
    pub height: Option<i32>,
    #[serde(rename = "tilewidth")]
    pub tile_width: Option<i32>,
    #[serde(rename = "tileheight")]
    pub tile_height: Option<i32>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(rename = "tilesets", default)]
    pub tile_sets: Vec<TileSetRef>,
}

/// One terrain layer: a row-major grid of tile indices, where 0 means
/// empty and any other value is the tile id plus one.
#[derive(Clone, Debug, Deserialize)]
pub struct Layer {
    pub width: i32,
    pub data: Vec<u32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TileSetRef {
    pub source: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TileSet {
    pub name: String,
    pub tiles: Vec<TileDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TileDef {
    pub id: u32,
    pub image: String,
    #[serde(rename = "imagewidth")]
    pub image_width: i32,
    #[serde(rename = "imageheight")]
    pub image_height: i32,
}

/// A tile id resolved against its loaded texture.
#[derive(Clone, Copy, Debug)]
pub struct Tile {
    pub texture: TextureId,
    pub width: i32,
    pub height: i32,
}

impl Level {
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let file = File::open(path).map_err(|source| SetupError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let level: Level = serde_json::from_reader(file).map_err(|source| SetupError::Level {
            path: path.display().to_string(),
            source,
        })?;
        level.validate(path)?;
        Ok(level)
    }

    fn validate(&self, path: &Path) -> Result<(), SetupError> {
        let complete = self.width.is_some()
            && self.height.is_some()
            && self.tile_width.is_some()
            && self.tile_height.is_some();
        if !complete {
            return Err(SetupError::MissingDimensions {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }

    /// World size in pixels. Only valid after `validate`, which `load`
    /// always runs.
    pub fn pixel_width(&self) -> i32 {
        self.width.unwrap_or(0) * self.tile_width.unwrap_or(0)
    }

    pub fn pixel_height(&self) -> i32 {
        self.height.unwrap_or(0) * self.tile_height.unwrap_or(0)
    }
}

impl TileSet {
    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let file = File::open(path).map_err(|source| SetupError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| SetupError::TileSet {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_deserializes_from_tiled_json() {
        let json = r#"{
            "width": 4, "height": 3,
            "tilewidth": 16, "tileheight": 16,
            "layers": [{"width": 4, "data": [1, 0, 2, 1, 0, 0, 0, 0, 1, 1, 2, 2]}],
            "tilesets": [{"source": "terrain.tsj"}]
        }"#;
        let level: Level = serde_json::from_str(json).unwrap();
        assert_eq!(level.pixel_width(), 64);
        assert_eq!(level.pixel_height(), 48);
        assert_eq!(level.layers.len(), 1);
        assert_eq!(level.layers[0].data[2], 2);
        assert_eq!(level.tile_sets[0].source, "terrain.tsj");
    }

    #[test]
    fn level_without_dimensions_fails_validation() {
        let json = r#"{"width": 4, "layers": []}"#;
        let level: Level = serde_json::from_str(json).unwrap();
        assert!(level.validate(Path::new("broken.tmj")).is_err());
    }

    #[test]
    fn tile_set_deserializes() {
        let json = r#"{
            "name": "terrain",
            "tiles": [{"id": 0, "image": "grass.png", "imagewidth": 16, "imageheight": 16}]
        }"#;
        let set: TileSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.tiles[0].id, 0);
        assert_eq!(set.tiles[0].image_width, 16);
    }
}

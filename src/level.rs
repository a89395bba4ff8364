//! Level data schema and validation
//!
//! Levels are JSON documents (field names camelCase, matching the files the
//! level generator writes): a tilemap with collision and graphical grids,
//! shrimp/start/exit tile positions, tileset metadata with per-animation
//! frame sets, and a music reference for the audio layer.
//!
//! Structural problems are construction errors and fail fast here; tile
//! codes outside the 0-15 wall-mask range are only a data-integrity warning
//! because the collision resolver treats them as open water anyway.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::animator::{Frame, FrameSet};
use crate::sim::collision::WALL_ALL;

/// Player animations every level must provide.
pub const PLAYER_FRAME_KEYS: [&str; 4] = ["idle-left", "swim-left", "idle-right", "swim-right"];
/// Shrimp animations every level must provide.
pub const SHRIMP_FRAME_KEYS: [&str; 1] = ["squirm"];

/// A raw frame entry: `[x, y, w, h]` or `[x, y, w, h, offsetX, offsetY]`.
pub type FrameDef = Vec<f32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub tilemap: Tilemap,
    pub tileset: Tileset,
    pub music: Music,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tilemap {
    /// Per-tile wall-mask codes (0-15)
    pub collision: Vec<Vec<u8>>,
    /// Per-tile `[tileRow, tileCol]` indices into the tileset image
    pub graphical: Vec<Vec<[u16; 2]>>,
    /// `[row, col]` of each shrimp
    pub shrimp_pos: Vec<[usize; 2]>,
    pub start_tile: TilePos,
    /// May sit one column outside the grid; generated levels end when the
    /// player leaves the maze through the right edge
    pub exit_tile: TilePos,
    pub size: GridSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePos {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tileset {
    /// Tileset image location; opaque to the core, consumed by the renderer
    #[serde(default)]
    pub url: Option<String>,
    pub size: TilesetSizes,
    pub frame_sets: FrameSetDefs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetSizes {
    /// Tile edge length in pixels
    pub tile: u32,
    pub player: SpriteSize,
    pub shrimp: SpriteSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSetDefs {
    pub player: BTreeMap<String, Vec<FrameDef>>,
    pub shrimp: BTreeMap<String, Vec<FrameDef>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Music {
    pub url: String,
    /// Seconds into the track to start playback at
    #[serde(default)]
    pub offset: f32,
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("tilemap must have at least one row and one column")]
    EmptyTilemap,
    #[error("{grid} grid is ragged or does not match the declared {rows}x{cols} size")]
    DimensionMismatch {
        grid: &'static str,
        rows: usize,
        cols: usize,
    },
    #[error("tile size must be positive")]
    ZeroTileSize,
    #[error("player and shrimp sprites must have positive dimensions")]
    ZeroSpriteSize,
    #[error("{what} tile ({row}, {col}) lies outside the {rows}x{cols} grid")]
    TileOutOfBounds {
        what: &'static str,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("required {kind} frame set {key:?} is missing")]
    MissingFrameSet { kind: &'static str, key: String },
    #[error("{kind} frame set {key:?} has no frames")]
    EmptyFrameSet { kind: &'static str, key: String },
    #[error("{kind} frame set {key:?} entry {index} has {len} values, expected 4 or 6")]
    BadFrameArity {
        kind: &'static str,
        key: String,
        index: usize,
        len: usize,
    },
}

impl LevelData {
    /// World width in pixels.
    pub fn world_width(&self) -> f32 {
        (self.tilemap.size.cols * self.tileset.size.tile as usize) as f32
    }

    /// World height in pixels.
    pub fn world_height(&self) -> f32 {
        (self.tilemap.size.rows * self.tileset.size.tile as usize) as f32
    }

    pub fn tile_size(&self) -> f32 {
        self.tileset.size.tile as f32
    }

    /// Structural validation; call before constructing a `World`.
    pub fn validate(&self) -> Result<(), LevelError> {
        let GridSize { rows, cols } = self.tilemap.size;
        if rows == 0 || cols == 0 {
            return Err(LevelError::EmptyTilemap);
        }
        if self.tileset.size.tile == 0 {
            return Err(LevelError::ZeroTileSize);
        }
        let player = self.tileset.size.player;
        let shrimp = self.tileset.size.shrimp;
        if player.width == 0 || player.height == 0 || shrimp.width == 0 || shrimp.height == 0 {
            return Err(LevelError::ZeroSpriteSize);
        }

        check_grid("collision", &self.tilemap.collision, rows, cols)?;
        check_grid("graphical", &self.tilemap.graphical, rows, cols)?;

        let start = self.tilemap.start_tile;
        if start.row >= rows || start.col >= cols {
            return Err(LevelError::TileOutOfBounds {
                what: "start",
                row: start.row,
                col: start.col,
                rows,
                cols,
            });
        }
        // The exit is allowed to sit flush outside the right edge.
        let exit = self.tilemap.exit_tile;
        if exit.row >= rows || exit.col > cols {
            return Err(LevelError::TileOutOfBounds {
                what: "exit",
                row: exit.row,
                col: exit.col,
                rows,
                cols,
            });
        }
        for &[row, col] in &self.tilemap.shrimp_pos {
            if row >= rows || col >= cols {
                return Err(LevelError::TileOutOfBounds {
                    what: "shrimp",
                    row,
                    col,
                    rows,
                    cols,
                });
            }
        }

        for key in PLAYER_FRAME_KEYS {
            check_frame_set("player", &self.tileset.frame_sets.player, key)?;
        }
        for key in SHRIMP_FRAME_KEYS {
            check_frame_set("shrimp", &self.tileset.frame_sets.shrimp, key)?;
        }

        // Unknown codes resolve as "no walls"; surface them here instead of
        // letting them vanish silently inside the resolver.
        for (r, row) in self.tilemap.collision.iter().enumerate() {
            for (c, &code) in row.iter().enumerate() {
                if code > WALL_ALL {
                    log::warn!(
                        "collision code {code} at tile ({r}, {c}) is outside 0-{WALL_ALL}; \
                         treating as open water"
                    );
                }
            }
        }

        Ok(())
    }

    /// Build the shared frame set for a player animation key.
    pub fn player_frames(&self, key: &str) -> Result<FrameSet, LevelError> {
        build_frame_set("player", &self.tileset.frame_sets.player, key)
    }

    /// Build the shared frame set for a shrimp animation key.
    pub fn shrimp_frames(&self, key: &str) -> Result<FrameSet, LevelError> {
        build_frame_set("shrimp", &self.tileset.frame_sets.shrimp, key)
    }
}

fn check_grid<T>(
    grid: &'static str,
    data: &[Vec<T>],
    rows: usize,
    cols: usize,
) -> Result<(), LevelError> {
    if data.len() != rows || data.iter().any(|r| r.len() != cols) {
        return Err(LevelError::DimensionMismatch { grid, rows, cols });
    }
    Ok(())
}

fn check_frame_set(
    kind: &'static str,
    sets: &BTreeMap<String, Vec<FrameDef>>,
    key: &str,
) -> Result<(), LevelError> {
    let frames = sets.get(key).ok_or_else(|| LevelError::MissingFrameSet {
        kind,
        key: key.to_string(),
    })?;
    if frames.is_empty() {
        return Err(LevelError::EmptyFrameSet {
            kind,
            key: key.to_string(),
        });
    }
    for (index, def) in frames.iter().enumerate() {
        if def.len() != 4 && def.len() != 6 {
            return Err(LevelError::BadFrameArity {
                kind,
                key: key.to_string(),
                index,
                len: def.len(),
            });
        }
    }
    Ok(())
}

fn build_frame_set(
    kind: &'static str,
    sets: &BTreeMap<String, Vec<FrameDef>>,
    key: &str,
) -> Result<FrameSet, LevelError> {
    check_frame_set(kind, sets, key)?;
    let frames: Vec<Frame> = sets[key]
        .iter()
        .map(|def| {
            let frame = Frame::new(def[0], def[1], def[2], def[3]);
            if def.len() == 6 {
                frame.with_offset(def[4], def[5])
            } else {
                frame
            }
        })
        .collect();
    Ok(frames.into())
}

/// A small hand-written level shared by unit tests across the crate.
#[cfg(test)]
pub(crate) fn sample_level() -> LevelData {
    serde_json::from_str(tests::sample_json()).expect("sample level parses")
}

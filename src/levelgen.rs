//! Seeded maze level generator
//!
//! Carves a perfect maze with a depth-first backtracker on an odd-sized
//! grid (cells at odd coordinates, walls between), opens the border for
//! the start corridor and the exit mouth, drops a shrimp in every dead
//! end, then derives the collision wall-masks and the graphical tile
//! indices from the carved layout. The same seed always yields the same
//! level.
//!
//! The exit tile itself sits one column outside the grid: the level is
//! finished when the player leaves the maze through the open mouth on the
//! right edge and touches that tile.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::level::{
    FrameDef, FrameSetDefs, GridSize, LevelData, Music, SpriteSize, TilePos, Tilemap, Tileset,
    TilesetSizes,
};

/// Tileset image coordinates for each wall-mask code 0-15. Index 0 is open
/// water, index 15 the solid wall block.
const CODE_TILES: [[u16; 2]; 16] = [
    [3, 7],
    [1, 6],
    [1, 7],
    [1, 5],
    [2, 7],
    [0, 5],
    [2, 5],
    [0, 6],
    [2, 6],
    [1, 4],
    [1, 3],
    [0, 3],
    [2, 4],
    [0, 4],
    [2, 3],
    [4, 1],
];

/// Open-water tile, the lookup result for code 0.
const EMPTY: [u16; 2] = CODE_TILES[0];

// Basin edge tiles for the outer ring.
const EDGE_T: [u16; 2] = [0, 1];
const EDGE_R: [u16; 2] = [1, 2];
const EDGE_B: [u16; 2] = [2, 1];
const EDGE_L: [u16; 2] = [1, 0];
const CORN_TL: [u16; 2] = [5, 2];
const CORN_TR: [u16; 2] = [5, 0];
const CORN_BR: [u16; 2] = [3, 0];
const CORN_BL: [u16; 2] = [3, 2];
const CORN_TLTR: [u16; 2] = [5, 1];
const CORN_TRBR: [u16; 2] = [4, 0];
const CORN_BLBR: [u16; 2] = [3, 1];
const CORN_TLBL: [u16; 2] = [4, 2];

// Start corridor and exit mouth dressing.
const START_WALL: [u16; 2] = [3, 3];
const START_OPEN: [u16; 2] = [0, 2];
const EXIT_WALL: [u16; 2] = [4, 4];
const EXIT_OPEN: [u16; 2] = [2, 0];

const TILE_SIZE: u32 = 16;
const PLAYER_SIZE: SpriteSize = SpriteSize {
    width: 12,
    height: 8,
};
const SHRIMP_SIZE: SpriteSize = SpriteSize {
    width: 6,
    height: 6,
};

#[derive(Debug, Error)]
pub enum GenError {
    #[error("maze dimensions must be odd and at least 3, got {rows}x{cols}")]
    BadDimensions { rows: usize, cols: usize },
}

/// Generate a complete level. `rows` and `cols` are tile counts and must
/// be odd and at least 3 so the maze has a wall ring and carveable cells.
pub fn generate(rows: usize, cols: usize, seed: u64, music_url: &str) -> Result<LevelData, GenError> {
    if rows < 3 || rows % 2 == 0 || cols < 3 || cols % 2 == 0 {
        return Err(GenError::BadDimensions { rows, cols });
    }

    // Start in the top-left border cell, exit through the bottom-right.
    // The exit tile is one column outside the grid; the mouth cell on the
    // border is what gets opened in the maze.
    let start = TilePos { row: 1, col: 0 };
    let exit = TilePos {
        row: rows - 2,
        col: cols,
    };

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut maze = carve_maze(rows, cols, &mut rng);
    maze[start.row][start.col] = false;
    maze[exit.row][exit.col - 1] = false;

    let shrimp_pos = dead_ends(&maze, rows, cols);
    let collision = collision_map(&maze, rows, cols);
    let graphical = graphical_map(&maze, &collision, rows, cols, start, exit);

    log::info!(
        "Generated {rows}x{cols} level from seed {seed} with {} shrimp",
        shrimp_pos.len()
    );

    Ok(LevelData {
        tilemap: Tilemap {
            collision,
            graphical,
            shrimp_pos,
            start_tile: start,
            exit_tile: exit,
            size: GridSize { rows, cols },
        },
        tileset: Tileset {
            url: None,
            size: TilesetSizes {
                tile: TILE_SIZE,
                player: PLAYER_SIZE,
                shrimp: SHRIMP_SIZE,
            },
            frame_sets: builtin_frame_sets(),
        },
        music: Music {
            url: music_url.to_string(),
            offset: 0.0,
        },
    })
}

/// Carve corridors into an all-wall grid. `true` is wall.
fn carve_maze(rows: usize, cols: usize, rng: &mut Pcg32) -> Vec<Vec<bool>> {
    let mut maze = vec![vec![true; cols]; rows];

    // Start on an odd cell; corridors advance two tiles at a time so
    // walls always separate them.
    let start_row = 1 + 2 * rng.random_range(0..(rows - 1) / 2);
    let start_col = 1 + 2 * rng.random_range(0..(cols - 1) / 2);
    maze[start_row][start_col] = false;

    let mut stack = vec![(start_row, start_col)];
    while let Some(&(row, col)) = stack.last() {
        let mut next = None;
        let mut neighbors = cell_neighbors(rows, cols, row, col);
        neighbors.shuffle(rng);
        for (nrow, ncol) in neighbors {
            if maze[nrow][ncol] {
                next = Some((nrow, ncol));
                break;
            }
        }
        match next {
            Some((nrow, ncol)) => {
                // Knock out the wall between the two cells
                maze[(row + nrow) / 2][(col + ncol) / 2] = false;
                maze[nrow][ncol] = false;
                stack.push((nrow, ncol));
            }
            None => {
                stack.pop();
            }
        }
    }
    maze
}

fn cell_neighbors(rows: usize, cols: usize, row: usize, col: usize) -> Vec<(usize, usize)> {
    let mut ns = Vec::with_capacity(4);
    if row > 1 {
        ns.push((row - 2, col));
    }
    if row < rows - 2 {
        ns.push((row + 2, col));
    }
    if col > 1 {
        ns.push((row, col - 2));
    }
    if col < cols - 2 {
        ns.push((row, col + 2));
    }
    ns
}

/// A shrimp goes in every open interior cell walled on exactly three sides.
fn dead_ends(maze: &[Vec<bool>], rows: usize, cols: usize) -> Vec<[usize; 2]> {
    let mut shrimp = Vec::new();
    for row in 1..rows - 1 {
        for col in 1..cols - 1 {
            if maze[row][col] {
                continue;
            }
            let walls = [
                maze[row + 1][col],
                maze[row][col - 1],
                maze[row - 1][col],
                maze[row][col + 1],
            ];
            if walls.iter().filter(|&&w| w).count() == 3 {
                shrimp.push([row, col]);
            }
        }
    }
    shrimp
}

/// Derive wall-mask codes from the carved layout.
///
/// Open cells stay 0; each wall tile bordering an open cell gets the bit
/// for the face it presents to that cell, and fully enclosed wall tiles
/// become solid blocks (15).
fn collision_map(maze: &[Vec<bool>], rows: usize, cols: usize) -> Vec<Vec<u8>> {
    let mut cmap = vec![vec![0u8; cols]; rows];
    for row in 0..rows {
        for col in 0..cols {
            let b = row < rows - 1 && maze[row + 1][col];
            let l = col > 0 && maze[row][col - 1];
            let t = row > 0 && maze[row - 1][col];
            let r = col < cols - 1 && maze[row][col + 1];

            if maze[row][col] {
                if b && l && t && r {
                    cmap[row][col] = 15;
                }
            } else {
                if b {
                    cmap[row + 1][col] |= 1;
                }
                if l {
                    cmap[row][col - 1] |= 2;
                }
                if t {
                    cmap[row - 1][col] |= 4;
                }
                if r {
                    cmap[row][col + 1] |= 8;
                }
            }
        }
    }
    cmap
}

/// Map codes to tileset indices, restyle the outer ring as a solid basin
/// edge, then dress the start corridor and exit mouth.
fn graphical_map(
    maze: &[Vec<bool>],
    cmap: &[Vec<u8>],
    rows: usize,
    cols: usize,
    start: TilePos,
    exit: TilePos,
) -> Vec<Vec<[u16; 2]>> {
    let mut gmap: Vec<Vec<[u16; 2]>> = cmap
        .iter()
        .map(|row| {
            row.iter()
                .map(|&code| CODE_TILES[usize::from(code) & 0xf])
                .collect()
        })
        .collect();

    for r in 1..rows - 1 {
        gmap[r][0] = if gmap[r][0] == EMPTY { CORN_TRBR } else { EDGE_R };
        gmap[r][cols - 1] = if gmap[r][cols - 1] == EMPTY {
            CORN_TLBL
        } else {
            EDGE_L
        };
    }
    for c in 1..cols - 1 {
        gmap[0][c] = if gmap[0][c] == EMPTY { CORN_BLBR } else { EDGE_B };
        gmap[rows - 1][c] = if gmap[rows - 1][c] == EMPTY {
            CORN_TLTR
        } else {
            EDGE_T
        };
    }
    gmap[0][0] = CORN_BR;
    gmap[0][cols - 1] = CORN_BL;
    gmap[rows - 1][0] = CORN_TR;
    gmap[rows - 1][cols - 1] = CORN_TL;

    // The start and exit mouth read as open water, with the basin edge
    // above/below patched up and the flanking wall picked to match the
    // maze behind it.
    gmap[start.row][start.col] = EMPTY;
    gmap[exit.row][exit.col - 1] = EMPTY;
    gmap[start.row - 1][start.col] = EDGE_B;
    gmap[exit.row + 1][exit.col - 1] = EDGE_T;
    gmap[start.row + 1][start.col] = if maze[start.row + 1][start.col + 1] {
        START_WALL
    } else {
        START_OPEN
    };
    gmap[exit.row - 1][exit.col - 1] = if maze[exit.row - 1][exit.col - 2] {
        EXIT_WALL
    } else {
        EXIT_OPEN
    };

    gmap
}

/// Frame sets for the built-in sprite sheet layout.
fn builtin_frame_sets() -> FrameSetDefs {
    let strip = |y: f32, w: f32, h: f32, n: usize| -> Vec<FrameDef> {
        (0..n)
            .map(|i| vec![i as f32 * TILE_SIZE as f32, y, w, h])
            .collect()
    };

    let mut player = std::collections::BTreeMap::new();
    player.insert("idle-left".to_string(), strip(112.0, 12.0, 8.0, 1));
    player.insert("swim-left".to_string(), strip(112.0, 12.0, 8.0, 2));
    player.insert("idle-right".to_string(), strip(120.0, 12.0, 8.0, 1));
    player.insert("swim-right".to_string(), strip(120.0, 12.0, 8.0, 2));

    let mut shrimp = std::collections::BTreeMap::new();
    shrimp.insert("squirm".to_string(), strip(128.0, 6.0, 6.0, 2));

    FrameSetDefs { player, shrimp }
}

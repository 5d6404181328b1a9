use engine::{Simulation, TickOutcome};
use serde::{Deserialize, Serialize};

use crate::rng::Rng;

pub const GRID: usize = 4;

/// Chance (percent) that a spawned tile is a 4 instead of a 2.
const FOUR_TILE_CHANCE: u32 = 10;
/// Tiles placed on a fresh board.
const STARTING_TILES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dir {
    Left,
    Right,
    Up,
    Down,
}

/// The sliding-tile game: a 4x4 grid of powers of two.
///
/// A directional move compacts every line toward the moved edge, merging each
/// equal adjacent pair at most once, then spawns one random tile if anything
/// moved. The run ends when no legal move remains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Twenty48 {
    cells: [[u32; GRID]; GRID],
    score: u32,
    rng: Rng,
}

impl Twenty48 {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            cells: [[0; GRID]; GRID],
            score: 0,
            rng: Rng::new(seed),
        };
        for _ in 0..STARTING_TILES {
            game.spawn_tile();
        }
        game
    }

    pub fn cells(&self) -> &[[u32; GRID]; GRID] {
        &self.cells
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Replace the board wholesale. Test hook; does not touch score or RNG.
    pub fn set_cells(&mut self, cells: [[u32; GRID]; GRID]) {
        self.cells = cells;
    }

    pub fn tile_sum(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }

    /// Apply one directional move. Returns whether the board changed; a move
    /// that changes nothing spawns nothing and scores nothing.
    pub fn shift(&mut self, dir: Dir) -> bool {
        let mut changed = false;
        let mut gained = 0;

        for i in 0..GRID {
            let coords = line_coords(dir, i);
            let line = coords.map(|(r, c)| self.cells[r][c]);
            let (merged, line_gain) = compact_merge(line);
            if merged != line {
                changed = true;
            }
            gained += line_gain;
            for (j, (r, c)) in coords.into_iter().enumerate() {
                self.cells[r][c] = merged[j];
            }
        }

        if changed {
            self.score += gained;
            self.spawn_tile();
        }
        changed
    }

    /// A move exists while any cell is empty or any neighbors are equal.
    pub fn has_moves(&self) -> bool {
        for r in 0..GRID {
            for c in 0..GRID {
                let v = self.cells[r][c];
                if v == 0 {
                    return true;
                }
                if c + 1 < GRID && self.cells[r][c + 1] == v {
                    return true;
                }
                if r + 1 < GRID && self.cells[r + 1][c] == v {
                    return true;
                }
            }
        }
        false
    }

    fn spawn_tile(&mut self) {
        let empty: Vec<(usize, usize)> = (0..GRID)
            .flat_map(|r| (0..GRID).map(move |c| (r, c)))
            .filter(|&(r, c)| self.cells[r][c] == 0)
            .collect();
        let Some(&(r, c)) = empty.get(self.rng.below(empty.len() as u32) as usize) else {
            return;
        };
        self.cells[r][c] = if self.rng.chance(FOUR_TILE_CHANCE) { 4 } else { 2 };
    }
}

impl Simulation for Twenty48 {
    type Action = Dir;

    fn tick(&mut self) -> TickOutcome {
        if self.has_moves() {
            TickOutcome::Running
        } else {
            TickOutcome::Lost
        }
    }

    fn apply(&mut self, dir: Dir) {
        self.shift(dir);
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn reset(&mut self) {
        self.cells = [[0; GRID]; GRID];
        self.score = 0;
        for _ in 0..STARTING_TILES {
            self.spawn_tile();
        }
    }
}

/// Cell coordinates of line `i`, ordered so the movement target comes first.
fn line_coords(dir: Dir, i: usize) -> [(usize, usize); GRID] {
    std::array::from_fn(|j| match dir {
        Dir::Left => (i, j),
        Dir::Right => (i, GRID - 1 - j),
        Dir::Up => (j, i),
        Dir::Down => (GRID - 1 - j, i),
    })
}

/// Compact non-zero values to the front, merging each equal adjacent pair at
/// most once. Returns the new line and the score gained (sum of merged tile
/// values).
fn compact_merge(line: [u32; GRID]) -> ([u32; GRID], u32) {
    let mut out = [0u32; GRID];
    let mut len = 0;
    let mut gained = 0;
    let mut last_was_merge = false;

    for v in line.into_iter().filter(|&v| v != 0) {
        if len > 0 && out[len - 1] == v && !last_was_merge {
            out[len - 1] = v * 2;
            gained += v * 2;
            last_was_merge = true;
        } else {
            out[len] = v;
            len += 1;
            last_was_merge = false;
        }
    }

    (out, gained)
}

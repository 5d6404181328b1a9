use engine::{Simulation, TickOutcome};
use serde::{Deserialize, Serialize};

use crate::geom::Aabb;
use crate::rng::Rng;

pub const WORLD_W: f32 = crate::SCREEN_W as f32;
pub const WORLD_H: f32 = crate::SCREEN_H as f32;

pub const BIRD_X: f32 = 80.0;
pub const BIRD_SIZE: f32 = 14.0;
pub const PIPE_W: f32 = 44.0;
pub const PIPE_GAP: f32 = 88.0;

/// Per-tick tuning, calibrated for the 60 Hz session tick.
const GRAVITY: f32 = 0.22;
const FLAP_VELOCITY: f32 = -4.4;
const PIPE_SPEED: f32 = 1.8;
const SPAWN_INTERVAL_TICKS: u32 = 100;
/// Keep gap centers away from the screen edges.
const GAP_EDGE_MARGIN: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Flap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub x: f32,
    pub gap_center: f32,
    pub scored: bool,
}

impl Pipe {
    pub fn top_rect(&self) -> Aabb {
        Aabb::new(self.x, 0.0, PIPE_W, self.gap_center - PIPE_GAP / 2.0)
    }

    pub fn bottom_rect(&self) -> Aabb {
        let top = self.gap_center + PIPE_GAP / 2.0;
        Aabb::new(self.x, top, PIPE_W, WORLD_H - top)
    }
}

/// One bird, constant gravity, an endless stream of pipe pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flappy {
    bird_y: f32,
    bird_vy: f32,
    pipes: Vec<Pipe>,
    ticks_to_spawn: u32,
    score: u32,
    rng: Rng,
}

impl Flappy {
    pub fn new(seed: u64) -> Self {
        Self {
            bird_y: WORLD_H / 2.0 - BIRD_SIZE / 2.0,
            bird_vy: 0.0,
            pipes: Vec::new(),
            ticks_to_spawn: SPAWN_INTERVAL_TICKS,
            score: 0,
            rng: Rng::new(seed),
        }
    }

    pub fn bird_y(&self) -> f32 {
        self.bird_y
    }

    pub fn bird_vy(&self) -> f32 {
        self.bird_vy
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn bird_rect(&self) -> Aabb {
        Aabb::new(BIRD_X, self.bird_y, BIRD_SIZE, BIRD_SIZE)
    }

    fn spawn_pipe(&mut self) {
        let lo = GAP_EDGE_MARGIN + PIPE_GAP / 2.0;
        let hi = WORLD_H - GAP_EDGE_MARGIN - PIPE_GAP / 2.0;
        self.pipes.push(Pipe {
            x: WORLD_W,
            gap_center: self.rng.range_f32(lo, hi),
            scored: false,
        });
    }

    fn collided(&self) -> bool {
        if self.bird_y < 0.0 || self.bird_y + BIRD_SIZE > WORLD_H {
            return true;
        }
        let bird = self.bird_rect();
        self.pipes
            .iter()
            .any(|p| bird.overlaps(&p.top_rect()) || bird.overlaps(&p.bottom_rect()))
    }
}

impl Simulation for Flappy {
    type Action = Action;

    fn tick(&mut self) -> TickOutcome {
        self.bird_vy += GRAVITY;
        self.bird_y += self.bird_vy;

        if self.ticks_to_spawn == 0 {
            self.spawn_pipe();
            self.ticks_to_spawn = SPAWN_INTERVAL_TICKS;
        } else {
            self.ticks_to_spawn -= 1;
        }

        for pipe in &mut self.pipes {
            pipe.x -= PIPE_SPEED;
            // Score exactly once, when the pair's right edge clears the bird.
            if !pipe.scored && pipe.x + PIPE_W < BIRD_X {
                pipe.scored = true;
                self.score += 1;
            }
        }
        self.pipes.retain(|p| p.x + PIPE_W > 0.0);

        if self.collided() {
            TickOutcome::Lost
        } else {
            TickOutcome::Running
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Flap => self.bird_vy = FLAP_VELOCITY,
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn reset(&mut self) {
        self.bird_y = WORLD_H / 2.0 - BIRD_SIZE / 2.0;
        self.bird_vy = 0.0;
        self.pipes.clear();
        self.ticks_to_spawn = SPAWN_INTERVAL_TICKS;
        self.score = 0;
    }
}

use engine::{Simulation, TickOutcome};
use serde::{Deserialize, Serialize};

use crate::geom::Aabb;
use crate::rng::Rng;

pub const WORLD_W: f32 = crate::SCREEN_W as f32;
pub const WORLD_H: f32 = crate::SCREEN_H as f32;

pub const PADDLE_W: f32 = 8.0;
pub const PADDLE_H: f32 = 48.0;
pub const PADDLE_INSET: f32 = 14.0;
pub const BALL_SIZE: f32 = 8.0;
pub const BALL_SPEED: f32 = 3.2;
pub const WIN_SCORE: u32 = 5;

const PLAYER_STEP: f32 = 4.0;
const AI_SPEED: f32 = 2.6;
/// Maximum serve angle from horizontal, in radians.
const SERVE_ANGLE_MAX: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Ball {
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.x, self.y, BALL_SIZE, BALL_SIZE)
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

/// Player paddle on the left, tracking AI paddle on the right. First side to
/// [`WIN_SCORE`] points ends the rally; the player's points are the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pong {
    player_y: f32,
    ai_y: f32,
    ball: Ball,
    player_score: u32,
    ai_score: u32,
    rng: Rng,
}

impl Pong {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            player_y: (WORLD_H - PADDLE_H) / 2.0,
            ai_y: (WORLD_H - PADDLE_H) / 2.0,
            ball: Ball {
                x: 0.0,
                y: 0.0,
                vx: 0.0,
                vy: 0.0,
            },
            player_score: 0,
            ai_score: 0,
            rng: Rng::new(seed),
        };
        game.serve();
        game
    }

    pub fn player_y(&self) -> f32 {
        self.player_y
    }

    pub fn ai_y(&self) -> f32 {
        self.ai_y
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn player_score(&self) -> u32 {
        self.player_score
    }

    pub fn ai_score(&self) -> u32 {
        self.ai_score
    }

    pub fn player_rect(&self) -> Aabb {
        Aabb::new(PADDLE_INSET, self.player_y, PADDLE_W, PADDLE_H)
    }

    pub fn ai_rect(&self) -> Aabb {
        Aabb::new(WORLD_W - PADDLE_INSET - PADDLE_W, self.ai_y, PADDLE_W, PADDLE_H)
    }

    /// Center the ball exactly and pick a fresh direction; the speed
    /// magnitude is always [`BALL_SPEED`].
    fn serve(&mut self) {
        let angle = self.rng.range_f32(-SERVE_ANGLE_MAX, SERVE_ANGLE_MAX);
        let toward_player = self.rng.chance(50);
        let dir = if toward_player { -1.0 } else { 1.0 };
        self.ball = Ball {
            x: (WORLD_W - BALL_SIZE) / 2.0,
            y: (WORLD_H - BALL_SIZE) / 2.0,
            vx: dir * BALL_SPEED * angle.cos(),
            vy: BALL_SPEED * angle.sin(),
        };
    }

    fn move_ai(&mut self) {
        let paddle_center = self.ai_y + PADDLE_H / 2.0;
        let ball_center = self.ball.y + BALL_SIZE / 2.0;
        let step = (ball_center - paddle_center).clamp(-AI_SPEED, AI_SPEED);
        self.ai_y = (self.ai_y + step).clamp(0.0, WORLD_H - PADDLE_H);
    }
}

impl Simulation for Pong {
    type Action = Action;

    fn tick(&mut self) -> TickOutcome {
        self.ball.x += self.ball.vx;
        self.ball.y += self.ball.vy;

        if self.ball.y <= 0.0 {
            self.ball.y = 0.0;
            self.ball.vy = self.ball.vy.abs();
        } else if self.ball.y + BALL_SIZE >= WORLD_H {
            self.ball.y = WORLD_H - BALL_SIZE;
            self.ball.vy = -self.ball.vy.abs();
        }

        self.move_ai();

        let ball_rect = self.ball.rect();
        if self.ball.vx < 0.0 && ball_rect.overlaps(&self.player_rect()) {
            self.ball.vx = self.ball.vx.abs();
            self.ball.x = PADDLE_INSET + PADDLE_W;
        } else if self.ball.vx > 0.0 && ball_rect.overlaps(&self.ai_rect()) {
            self.ball.vx = -self.ball.vx.abs();
            self.ball.x = WORLD_W - PADDLE_INSET - PADDLE_W - BALL_SIZE;
        }

        if self.ball.x + BALL_SIZE < 0.0 {
            self.ai_score += 1;
            self.serve();
        } else if self.ball.x > WORLD_W {
            self.player_score += 1;
            self.serve();
        }

        if self.player_score >= WIN_SCORE || self.ai_score >= WIN_SCORE {
            TickOutcome::Lost
        } else {
            TickOutcome::Running
        }
    }

    fn apply(&mut self, action: Action) {
        let step = match action {
            Action::Up => -PLAYER_STEP,
            Action::Down => PLAYER_STEP,
        };
        self.player_y = (self.player_y + step).clamp(0.0, WORLD_H - PADDLE_H);
    }

    fn score(&self) -> u32 {
        self.player_score
    }

    fn reset(&mut self) {
        self.player_y = (WORLD_H - PADDLE_H) / 2.0;
        self.ai_y = (WORLD_H - PADDLE_H) / 2.0;
        self.player_score = 0;
        self.ai_score = 0;
        self.serve();
    }
}

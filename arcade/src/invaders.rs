use engine::{Simulation, TickOutcome};
use serde::{Deserialize, Serialize};

use crate::geom::Aabb;

pub const WORLD_W: f32 = crate::SCREEN_W as f32;
pub const WORLD_H: f32 = crate::SCREEN_H as f32;

pub const PLAYER_W: f32 = 26.0;
pub const PLAYER_H: f32 = 10.0;
pub const PLAYER_Y: f32 = WORLD_H - 24.0;
pub const BULLET_W: f32 = 3.0;
pub const BULLET_H: f32 = 9.0;
pub const ENEMY_ROWS: usize = 4;
pub const ENEMY_COLS: usize = 8;
pub const ENEMY_W: f32 = 22.0;
pub const ENEMY_H: f32 = 14.0;
pub const MAX_PLAYER_BULLETS: usize = 3;
pub const KILL_POINTS: u32 = 10;

pub const FORMATION_Y: f32 = 30.0;
pub const ROW_SPACING: f32 = 24.0;

const PLAYER_STEP: f32 = 3.5;
const BULLET_SPEED: f32 = 6.0;
const WALL_MARGIN: f32 = 8.0;
const FORMATION_X: f32 = 40.0;
const COL_SPACING: f32 = 34.0;
const DROP_STEP: f32 = 14.0;
const BASE_SPEED: f32 = 0.7;
const SPEED_PER_WAVE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Fire,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
}

impl Enemy {
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.x, self.y, ENEMY_W, ENEMY_H)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
}

impl Bullet {
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.x, self.y, BULLET_W, BULLET_H)
    }
}

/// A marching enemy formation over a single player ship.
///
/// The formation drops a row and reverses at the walls; clearing it spawns a
/// faster wave. Any enemy descending to the player's row ends the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invaders {
    player_x: f32,
    bullets: Vec<Bullet>,
    enemies: Vec<Enemy>,
    march_dir: f32,
    march_speed: f32,
    wave: u32,
    score: u32,
}

impl Invaders {
    pub fn new() -> Self {
        let mut game = Self {
            player_x: (WORLD_W - PLAYER_W) / 2.0,
            bullets: Vec::new(),
            enemies: Vec::new(),
            march_dir: 1.0,
            march_speed: BASE_SPEED,
            wave: 1,
            score: 0,
        };
        game.spawn_wave();
        game
    }

    pub fn player_x(&self) -> f32 {
        self.player_x
    }

    pub fn player_rect(&self) -> Aabb {
        Aabb::new(self.player_x, PLAYER_Y, PLAYER_W, PLAYER_H)
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn march_speed(&self) -> f32 {
        self.march_speed
    }

    fn spawn_wave(&mut self) {
        self.enemies.clear();
        for row in 0..ENEMY_ROWS {
            for col in 0..ENEMY_COLS {
                self.enemies.push(Enemy {
                    x: FORMATION_X + col as f32 * COL_SPACING,
                    y: FORMATION_Y + row as f32 * ROW_SPACING,
                });
            }
        }
        self.march_dir = 1.0;
    }

    fn march_formation(&mut self) {
        let dx = self.march_dir * self.march_speed;
        let hits_wall = self.enemies.iter().any(|e| {
            let nx = e.x + dx;
            nx < WALL_MARGIN || nx + ENEMY_W > WORLD_W - WALL_MARGIN
        });

        if hits_wall {
            self.march_dir = -self.march_dir;
            for e in &mut self.enemies {
                e.y += DROP_STEP;
            }
        } else {
            for e in &mut self.enemies {
                e.x += dx;
            }
        }
    }

    fn resolve_hits(&mut self) {
        let mut surviving = Vec::with_capacity(self.bullets.len());
        for bullet in self.bullets.drain(..) {
            let rect = bullet.rect();
            if let Some(i) = self.enemies.iter().position(|e| rect.overlaps(&e.rect())) {
                self.enemies.swap_remove(i);
                self.score += KILL_POINTS;
            } else {
                surviving.push(bullet);
            }
        }
        self.bullets = surviving;
    }
}

impl Default for Invaders {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for Invaders {
    type Action = Action;

    fn tick(&mut self) -> TickOutcome {
        for b in &mut self.bullets {
            b.y -= BULLET_SPEED;
        }
        self.bullets.retain(|b| b.y + BULLET_H > 0.0);

        self.march_formation();
        self.resolve_hits();

        if self.enemies.is_empty() {
            self.wave += 1;
            self.march_speed += SPEED_PER_WAVE;
            self.spawn_wave();
        }

        if self.enemies.iter().any(|e| e.y + ENEMY_H >= PLAYER_Y) {
            TickOutcome::Lost
        } else {
            TickOutcome::Running
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Left => {
                self.player_x = (self.player_x - PLAYER_STEP).max(WALL_MARGIN);
            }
            Action::Right => {
                self.player_x =
                    (self.player_x + PLAYER_STEP).min(WORLD_W - WALL_MARGIN - PLAYER_W);
            }
            Action::Fire => {
                if self.bullets.len() < MAX_PLAYER_BULLETS {
                    self.bullets.push(Bullet {
                        x: self.player_x + PLAYER_W / 2.0 - BULLET_W / 2.0,
                        y: PLAYER_Y - BULLET_H,
                    });
                }
            }
        }
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn reset(&mut self) {
        self.player_x = (WORLD_W - PLAYER_W) / 2.0;
        self.bullets.clear();
        self.march_speed = BASE_SPEED;
        self.wave = 1;
        self.score = 0;
        self.spawn_wave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_game_fields_a_full_formation() {
        let game = Invaders::new();
        assert_eq!(game.enemies().len(), ENEMY_ROWS * ENEMY_COLS);
        assert_eq!(game.wave(), 1);
    }

    #[test]
    fn at_most_three_bullets_fly_at_once() {
        let mut game = Invaders::new();
        for _ in 0..10 {
            game.apply(Action::Fire);
        }
        assert_eq!(game.bullets().len(), MAX_PLAYER_BULLETS);
    }

    #[test]
    fn bullets_despawn_off_the_top() {
        let mut game = Invaders::new();
        game.enemies.clear();
        game.apply(Action::Fire);
        // Clearing the wave respawns it above the bullet's path, so park the
        // formation out of the way.
        for _ in 0..60 {
            game.tick();
            for e in &mut game.enemies {
                e.x = WORLD_W / 2.0 - ENEMY_W / 2.0;
                e.y = -1000.0;
            }
        }
        assert!(game.bullets().is_empty());
    }

    #[test]
    fn the_formation_drops_and_reverses_at_the_wall() {
        let mut game = Invaders::new();
        let start_y = game.enemies()[0].y;
        let mut reversals = 0;
        for _ in 0..2000 {
            let dir_before = game.march_dir;
            game.march_formation();
            if game.march_dir != dir_before {
                reversals += 1;
                break;
            }
        }
        assert_eq!(reversals, 1);
        assert_eq!(game.enemies()[0].y, start_y + DROP_STEP);
    }

    #[test]
    fn shooting_an_enemy_scores_ten_and_removes_both() {
        let mut game = Invaders::new();
        let target = game.enemies()[0];
        game.bullets.push(Bullet {
            x: target.x + ENEMY_W / 2.0,
            y: target.y + ENEMY_H + BULLET_SPEED - 1.0,
        });
        let enemies_before = game.enemies().len();
        game.tick();
        assert_eq!(game.score(), KILL_POINTS);
        assert_eq!(game.enemies().len(), enemies_before - 1);
        assert!(game.bullets().is_empty());
    }

    #[test]
    fn clearing_a_wave_spawns_a_faster_full_formation() {
        let mut game = Invaders::new();
        let speed_before = game.march_speed();
        game.enemies.truncate(1);
        let survivor = game.enemies()[0];
        game.bullets.push(Bullet {
            x: survivor.x + ENEMY_W / 2.0,
            y: survivor.y + ENEMY_H,
        });
        game.tick();

        assert_eq!(game.enemies().len(), ENEMY_ROWS * ENEMY_COLS);
        assert!(game.march_speed() > speed_before);
        assert_eq!(game.wave(), 2);
    }

    #[test]
    fn an_enemy_reaching_the_player_row_ends_the_run() {
        let mut game = Invaders::new();
        game.enemies[0].y = PLAYER_Y - ENEMY_H - DROP_STEP / 2.0;
        // Park the column against the wall so the next march drops.
        game.enemies[0].x = WORLD_W - WALL_MARGIN - ENEMY_W - 0.1;
        game.march_dir = 1.0;
        assert_eq!(game.tick(), TickOutcome::Lost);
    }

    #[test]
    fn the_player_clamps_to_the_walls() {
        let mut game = Invaders::new();
        for _ in 0..500 {
            game.apply(Action::Left);
        }
        assert_eq!(game.player_x(), WALL_MARGIN);
        for _ in 0..500 {
            game.apply(Action::Right);
        }
        assert_eq!(game.player_x(), WORLD_W - WALL_MARGIN - PLAYER_W);
    }
}

//! Full-redraw projections of each game's state.
//!
//! Nothing in here mutates a simulation; every function repaints from
//! scratch, so a paused or finished game keeps showing its frozen state.

use engine::graphics::{Color, Rect, Renderer2d, text_width};

use crate::flappy::Flappy;
use crate::geom::Aabb;
use crate::invaders::{self, Invaders};
use crate::pong::Pong;
use crate::twenty48::{GRID, Twenty48};

pub const BACKDROP: Color = [14, 15, 22, 255];
const HUD_TEXT: Color = [222, 222, 226, 255];

fn rect(aabb: Aabb) -> Rect {
    Rect::new(
        aabb.x.round() as i32,
        aabb.y.round() as i32,
        aabb.w.round().max(0.0) as u32,
        aabb.h.round().max(0.0) as u32,
    )
}

pub fn draw_centered_text(gfx: &mut dyn Renderer2d, y: i32, text: &str, color: Color, scale: u32) {
    let x = (gfx.size().width as i32 - text_width(text, scale) as i32) / 2;
    gfx.draw_text_scaled(x, y, text, color, scale);
}

// ── 2048 ───────────────────────────────────────────────────────────

const TILE: i32 = 56;
const TILE_GAP: i32 = 8;
const BOARD_BG: Color = [52, 48, 44, 255];
const CELL_EMPTY: Color = [76, 70, 64, 255];

fn tile_color(value: u32) -> Color {
    match value {
        2 => [238, 228, 218, 255],
        4 => [237, 224, 200, 255],
        8 => [242, 177, 121, 255],
        16 => [245, 149, 99, 255],
        32 => [246, 124, 95, 255],
        64 => [246, 94, 59, 255],
        128 => [237, 207, 114, 255],
        256 => [237, 204, 97, 255],
        512 => [237, 200, 80, 255],
        1024 => [237, 197, 63, 255],
        _ => [237, 194, 46, 255],
    }
}

fn tile_text_color(value: u32) -> Color {
    if value <= 4 {
        [119, 110, 101, 255]
    } else {
        [249, 246, 242, 255]
    }
}

pub fn draw_twenty48(game: &Twenty48, gfx: &mut dyn Renderer2d) {
    gfx.clear(BACKDROP);

    let side = GRID as i32 * TILE + (GRID as i32 + 1) * TILE_GAP;
    let x0 = (gfx.size().width as i32 - side) / 2;
    let y0 = (gfx.size().height as i32 - side) / 2;
    gfx.fill_rect(Rect::new(x0, y0, side as u32, side as u32), BOARD_BG);

    for r in 0..GRID {
        for c in 0..GRID {
            let cx = x0 + TILE_GAP + c as i32 * (TILE + TILE_GAP);
            let cy = y0 + TILE_GAP + r as i32 * (TILE + TILE_GAP);
            let value = game.cells()[r][c];
            let fill = if value == 0 {
                CELL_EMPTY
            } else {
                tile_color(value)
            };
            gfx.fill_rect(Rect::new(cx, cy, TILE as u32, TILE as u32), fill);

            if value > 0 {
                let label = value.to_string();
                let scale = if label.len() > 3 { 1 } else { 2 };
                let tx = cx + (TILE - text_width(&label, scale) as i32) / 2;
                let ty = cy + (TILE - 5 * scale as i32) / 2;
                gfx.draw_text_scaled(tx, ty, &label, tile_text_color(value), scale);
            }
        }
    }
}

// ── Flappy Bird ────────────────────────────────────────────────────

const SKY: Color = [52, 120, 168, 255];
const PIPE_GREEN: Color = [72, 160, 72, 255];
const PIPE_LIP: Color = [56, 128, 56, 255];
const BIRD_YELLOW: Color = [238, 206, 70, 255];

pub fn draw_flappy(game: &Flappy, gfx: &mut dyn Renderer2d) {
    gfx.clear(SKY);

    for pipe in game.pipes() {
        let top = pipe.top_rect();
        let bottom = pipe.bottom_rect();
        gfx.fill_rect(rect(top), PIPE_GREEN);
        gfx.fill_rect(rect(bottom), PIPE_GREEN);
        // Lip caps on the gap ends.
        gfx.fill_rect(
            rect(Aabb::new(top.x - 2.0, top.bottom() - 6.0, top.w + 4.0, 6.0)),
            PIPE_LIP,
        );
        gfx.fill_rect(
            rect(Aabb::new(bottom.x - 2.0, bottom.y, bottom.w + 4.0, 6.0)),
            PIPE_LIP,
        );
    }

    gfx.fill_rect(rect(game.bird_rect()), BIRD_YELLOW);
}

// ── Pong ───────────────────────────────────────────────────────────

const PONG_INK: Color = [235, 235, 235, 255];
const NET_GRAY: Color = [90, 90, 90, 255];

pub fn draw_pong(game: &Pong, gfx: &mut dyn Renderer2d) {
    gfx.clear(BACKDROP);

    let mid_x = gfx.size().width as i32 / 2 - 1;
    let mut y = 0;
    while y < gfx.size().height as i32 {
        gfx.fill_rect(Rect::new(mid_x, y, 2, 8), NET_GRAY);
        y += 16;
    }

    gfx.fill_rect(rect(game.player_rect()), PONG_INK);
    gfx.fill_rect(rect(game.ai_rect()), PONG_INK);
    gfx.fill_rect(rect(game.ball().rect()), PONG_INK);

    let quarter = gfx.size().width as i32 / 4;
    let player = game.player_score().to_string();
    let ai = game.ai_score().to_string();
    gfx.draw_text_scaled(
        quarter - text_width(&player, 3) as i32 / 2,
        10,
        &player,
        HUD_TEXT,
        3,
    );
    gfx.draw_text_scaled(
        3 * quarter - text_width(&ai, 3) as i32 / 2,
        10,
        &ai,
        HUD_TEXT,
        3,
    );
}

// ── Space Invaders ─────────────────────────────────────────────────

const SHIP_GREEN: Color = [96, 220, 96, 255];
const SHOT_WHITE: Color = [240, 240, 240, 255];
const ROW_COLORS: [Color; 4] = [
    [226, 86, 112, 255],
    [232, 156, 70, 255],
    [116, 186, 226, 255],
    [172, 132, 222, 255],
];

pub fn draw_invaders(game: &Invaders, gfx: &mut dyn Renderer2d) {
    gfx.clear(BACKDROP);

    for enemy in game.enemies() {
        // Row color keyed off the spawn row height.
        let row_f = (enemy.y - invaders::FORMATION_Y) / invaders::ROW_SPACING;
        let row = (row_f.max(0.0) as usize) % ROW_COLORS.len();
        gfx.fill_rect(rect(enemy.rect()), ROW_COLORS[row]);
    }

    for bullet in game.bullets() {
        gfx.fill_rect(rect(bullet.rect()), SHOT_WHITE);
    }

    let ship = game.player_rect();
    gfx.fill_rect(rect(ship), SHIP_GREEN);
    // Cannon nub.
    gfx.fill_rect(
        rect(Aabb::new(ship.x + ship.w / 2.0 - 2.0, ship.y - 4.0, 4.0, 4.0)),
        SHIP_GREEN,
    );

    let wave = format!("WAVE {}", game.wave());
    gfx.draw_text_scaled(
        gfx.size().width as i32 - text_width(&wave, 1) as i32 - 6,
        6,
        &wave,
        HUD_TEXT,
        1,
    );
}

use std::time::Duration;

use engine::Simulation;
use engine::app::{App, AppFlow};
use engine::graphics::{Color, Rect, Renderer2d, text_width};
use engine::input::InputFrame;
use engine::session::{Phase, Session, SessionEvent};
use engine::storage::{SaveStore, Storage};
use log::{info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use winit::event::VirtualKeyCode;

use crate::draw;
use crate::flappy::{self, Flappy};
use crate::invaders::{self, Invaders};
use crate::pong::{self, Pong};
use crate::rng::entropy_seed;
use crate::twenty48::{Dir, Twenty48};

const HUD_TEXT: Color = [222, 222, 226, 255];
const MENU_DIM: Color = [140, 140, 150, 255];
const BANNER_BG: Color = [10, 10, 14, 230];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameId {
    Twenty48,
    Flappy,
    Pong,
    Invaders,
}

impl GameId {
    pub const ALL: [GameId; 4] = [
        GameId::Twenty48,
        GameId::Flappy,
        GameId::Pong,
        GameId::Invaders,
    ];

    /// Stable identifier used as the persistence key family.
    pub fn storage_id(self) -> &'static str {
        match self {
            GameId::Twenty48 => "2048",
            GameId::Flappy => "flappy-bird",
            GameId::Pong => "pong",
            GameId::Invaders => "space-invaders",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameId::Twenty48 => "2048",
            GameId::Flappy => "FLAPPY BIRD",
            GameId::Pong => "PONG",
            GameId::Invaders => "SPACE INVADERS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    InGame(GameId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameControl {
    Stay,
    ToMenu,
}

/// The launcher plus one session per game, wired to the save store.
pub struct ArcadeApp<S: Storage> {
    save: SaveStore<S>,
    screen: Screen,
    cursor: usize,
    twenty48: Session<Twenty48>,
    flappy: Session<Flappy>,
    pong: Session<Pong>,
    invaders: Session<Invaders>,
}

impl<S: Storage> ArcadeApp<S> {
    pub fn new(save: SaveStore<S>) -> Self {
        let mut twenty48 = Session::new(Twenty48::new(entropy_seed()));
        let mut flappy = Session::new(Flappy::new(entropy_seed()));
        let mut pong = Session::new(Pong::new(entropy_seed()));
        let mut invaders = Session::new(Invaders::new());

        twenty48.set_high_score(save.high_score(GameId::Twenty48.storage_id()));
        flappy.set_high_score(save.high_score(GameId::Flappy.storage_id()));
        pong.set_high_score(save.high_score(GameId::Pong.storage_id()));
        invaders.set_high_score(save.high_score(GameId::Invaders.storage_id()));

        Self {
            save,
            screen: Screen::Menu,
            cursor: 0,
            twenty48,
            flappy,
            pong,
            invaders,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn twenty48(&self) -> &Session<Twenty48> {
        &self.twenty48
    }

    pub fn flappy(&self) -> &Session<Flappy> {
        &self.flappy
    }

    pub fn pong(&self) -> &Session<Pong> {
        &self.pong
    }

    pub fn invaders(&self) -> &Session<Invaders> {
        &self.invaders
    }

    fn high_score_of(&self, id: GameId) -> u32 {
        match id {
            GameId::Twenty48 => self.twenty48.high_score(),
            GameId::Flappy => self.flappy.high_score(),
            GameId::Pong => self.pong.high_score(),
            GameId::Invaders => self.invaders.high_score(),
        }
    }

    fn start_game(&mut self, id: GameId) {
        info!("starting {}", id.storage_id());
        self.screen = Screen::InGame(id);
        match id {
            GameId::Twenty48 => self.twenty48.start(),
            GameId::Flappy => self.flappy.start(),
            GameId::Pong => self.pong.start(),
            GameId::Invaders => self.invaders.start(),
        }
    }

    fn update_menu(&mut self, input: &InputFrame) -> AppFlow {
        if input.pressed(VirtualKeyCode::Escape) {
            return AppFlow::Exit;
        }
        if input.pressed(VirtualKeyCode::Up) || input.pressed(VirtualKeyCode::W) {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(GameId::ALL.len() - 1);
        }
        if input.pressed(VirtualKeyCode::Down) || input.pressed(VirtualKeyCode::S) {
            self.cursor = (self.cursor + 1) % GameId::ALL.len();
        }
        if input.pressed(VirtualKeyCode::Return) || input.pressed(VirtualKeyCode::Space) {
            self.start_game(GameId::ALL[self.cursor]);
        }
        AppFlow::Continue
    }

    fn update_game(&mut self, id: GameId, input: &InputFrame, dt: Duration) {
        let control = match id {
            GameId::Twenty48 => {
                let control = session_controls(&mut self.twenty48, &mut self.save, id, input);
                if control == GameControl::Stay {
                    if let Some(dir) = grid_dir(input) {
                        self.twenty48.apply(dir);
                    }
                    settle(&mut self.twenty48, &mut self.save, id, dt);
                }
                control
            }
            GameId::Flappy => {
                let control = session_controls(&mut self.flappy, &mut self.save, id, input);
                if control == GameControl::Stay {
                    if input.pressed(VirtualKeyCode::Space) || input.pressed(VirtualKeyCode::Up) {
                        self.flappy.apply(flappy::Action::Flap);
                    }
                    settle(&mut self.flappy, &mut self.save, id, dt);
                }
                control
            }
            GameId::Pong => {
                let control = session_controls(&mut self.pong, &mut self.save, id, input);
                if control == GameControl::Stay {
                    if input.held(VirtualKeyCode::Up) || input.held(VirtualKeyCode::W) {
                        self.pong.apply(pong::Action::Up);
                    }
                    if input.held(VirtualKeyCode::Down) || input.held(VirtualKeyCode::S) {
                        self.pong.apply(pong::Action::Down);
                    }
                    settle(&mut self.pong, &mut self.save, id, dt);
                }
                control
            }
            GameId::Invaders => {
                let control = session_controls(&mut self.invaders, &mut self.save, id, input);
                if control == GameControl::Stay {
                    if input.held(VirtualKeyCode::Left) || input.held(VirtualKeyCode::A) {
                        self.invaders.apply(invaders::Action::Left);
                    }
                    if input.held(VirtualKeyCode::Right) || input.held(VirtualKeyCode::D) {
                        self.invaders.apply(invaders::Action::Right);
                    }
                    if input.pressed(VirtualKeyCode::Space) {
                        self.invaders.apply(invaders::Action::Fire);
                    }
                    settle(&mut self.invaders, &mut self.save, id, dt);
                }
                control
            }
        };

        if control == GameControl::ToMenu {
            self.screen = Screen::Menu;
        }
    }

    fn render_menu(&self, gfx: &mut dyn Renderer2d) {
        gfx.clear(draw::BACKDROP);
        draw::draw_centered_text(gfx, 26, "RETROCADE", HUD_TEXT, 4);

        let left = 70;
        let mut y = 90;
        for (i, id) in GameId::ALL.into_iter().enumerate() {
            let color = if i == self.cursor { HUD_TEXT } else { MENU_DIM };
            if i == self.cursor {
                gfx.draw_text(left - 18, y, ">", color);
            }
            gfx.draw_text(left, y, id.title(), color);

            let high = format!("HI {}", self.high_score_of(id));
            let hx = gfx.size().width as i32 - 70 - text_width(&high, 2) as i32;
            gfx.draw_text(hx, y, &high, color);
            y += 26;
        }

        draw::draw_centered_text(gfx, 240, "ARROWS SELECT - ENTER PLAY", MENU_DIM, 1);
        draw::draw_centered_text(
            gfx,
            252,
            "P PAUSE - R RESTART - F5 SAVE - F9 LOAD - ESC QUIT",
            MENU_DIM,
            1,
        );
    }

    fn render_game(&self, id: GameId, gfx: &mut dyn Renderer2d) {
        match id {
            GameId::Twenty48 => draw::draw_twenty48(self.twenty48.sim(), gfx),
            GameId::Flappy => draw::draw_flappy(self.flappy.sim(), gfx),
            GameId::Pong => draw::draw_pong(self.pong.sim(), gfx),
            GameId::Invaders => draw::draw_invaders(self.invaders.sim(), gfx),
        }

        let (phase, score, high) = match id {
            GameId::Twenty48 => (
                self.twenty48.phase(),
                self.twenty48.score(),
                self.twenty48.high_score(),
            ),
            GameId::Flappy => (
                self.flappy.phase(),
                self.flappy.score(),
                self.flappy.high_score(),
            ),
            GameId::Pong => (self.pong.phase(), self.pong.score(), self.pong.high_score()),
            GameId::Invaders => (
                self.invaders.phase(),
                self.invaders.score(),
                self.invaders.high_score(),
            ),
        };

        gfx.draw_text(6, 6, &format!("SCORE {score}"), HUD_TEXT);
        let high_label = format!("HI {high}");
        let hx = gfx.size().width as i32 - 6 - text_width(&high_label, 2) as i32;
        gfx.draw_text(hx, 6, &high_label, HUD_TEXT);

        match phase {
            Phase::Paused => {
                banner(gfx, &["PAUSED", "P TO RESUME"]);
            }
            Phase::GameOver => {
                banner(
                    gfx,
                    &[
                        "GAME OVER",
                        &format!("SCORE {score}"),
                        "ENTER TO RESTART - ESC FOR MENU",
                    ],
                );
            }
            _ => {}
        }
    }
}

impl<S: Storage> App for ArcadeApp<S> {
    fn update(&mut self, input: &InputFrame, dt: Duration) -> AppFlow {
        match self.screen {
            Screen::Menu => self.update_menu(input),
            Screen::InGame(id) => {
                self.update_game(id, input, dt);
                AppFlow::Continue
            }
        }
    }

    fn render(&mut self, gfx: &mut dyn Renderer2d) {
        match self.screen {
            Screen::Menu => self.render_menu(gfx),
            Screen::InGame(id) => self.render_game(id, gfx),
        }
    }
}

/// Keys every game shares: pause, restart, save/load, back to menu.
fn session_controls<Sim, St>(
    session: &mut Session<Sim>,
    save: &mut SaveStore<St>,
    id: GameId,
    input: &InputFrame,
) -> GameControl
where
    Sim: Simulation + Serialize + DeserializeOwned,
    St: Storage,
{
    if input.pressed(VirtualKeyCode::Escape) {
        session.stop();
        return GameControl::ToMenu;
    }
    if input.pressed(VirtualKeyCode::P) {
        session.toggle_pause();
    }
    if input.pressed(VirtualKeyCode::R) {
        session.restart();
    }
    if input.pressed(VirtualKeyCode::Return) && session.phase().is_over() {
        session.start();
    }
    if input.pressed(VirtualKeyCode::F5) {
        match save.save_state(id.storage_id(), session.sim()) {
            Ok(()) => info!("saved {}", id.storage_id()),
            Err(e) => warn!("saving {} failed: {e}", id.storage_id()),
        }
    }
    if input.pressed(VirtualKeyCode::F9) {
        if let Some(sim) = save.load_state(id.storage_id()) {
            session.restore(sim);
            info!("loaded {}", id.storage_id());
        }
    }
    GameControl::Stay
}

/// Advance the session and fold a finished run's score into the stored high
/// score. Zero-score runs are not persisted.
fn settle<Sim, St>(session: &mut Session<Sim>, save: &mut SaveStore<St>, id: GameId, dt: Duration)
where
    Sim: Simulation,
    St: Storage,
{
    if let SessionEvent::GameOver { score } = session.advance(dt) {
        info!("{} over: score {score}", id.storage_id());
        if score > 0 {
            let best = save.record_score(id.storage_id(), score);
            session.set_high_score(best);
        }
    }
}

fn grid_dir(input: &InputFrame) -> Option<Dir> {
    if input.pressed(VirtualKeyCode::Left) || input.pressed(VirtualKeyCode::A) {
        Some(Dir::Left)
    } else if input.pressed(VirtualKeyCode::Right) || input.pressed(VirtualKeyCode::D) {
        Some(Dir::Right)
    } else if input.pressed(VirtualKeyCode::Up) || input.pressed(VirtualKeyCode::W) {
        Some(Dir::Up)
    } else if input.pressed(VirtualKeyCode::Down) || input.pressed(VirtualKeyCode::S) {
        Some(Dir::Down)
    } else {
        None
    }
}

fn banner(gfx: &mut dyn Renderer2d, lines: &[&str]) {
    let width = gfx.size().width;
    let height = gfx.size().height;
    let box_h = (lines.len() as u32) * 18 + 20;
    let y0 = (height.saturating_sub(box_h)) / 2;
    gfx.fill_rect(Rect::new(0, y0 as i32, width, box_h), BANNER_BG);

    let mut y = y0 as i32 + 10;
    for line in lines {
        draw::draw_centered_text(gfx, y, line, HUD_TEXT, 2);
        y += 18;
    }
}

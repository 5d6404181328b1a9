pub mod app;
pub mod draw;
pub mod flappy;
pub mod geom;
pub mod invaders;
pub mod pong;
pub mod rng;
pub mod settings;
pub mod twenty48;

/// Logical resolution every game draws at; the window scales it up.
pub const SCREEN_W: u32 = 400;
pub const SCREEN_H: u32 = 300;

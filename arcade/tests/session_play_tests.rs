use std::time::Duration;

use arcade::flappy::Flappy;
use arcade::invaders::{self, Invaders};
use arcade::pong::{self, Pong};
use engine::Simulation;
use engine::session::{Phase, Session, SessionEvent};

const FRAME: Duration = Duration::from_micros(16_667);

fn run_until_over<S: Simulation>(session: &mut Session<S>, max_frames: u32) -> Option<u32> {
    for _ in 0..max_frames {
        if let SessionEvent::GameOver { score } = session.advance(FRAME) {
            return Some(score);
        }
    }
    None
}

#[test]
fn an_unpiloted_bird_crashes_within_seconds() {
    let mut session = Session::new(Flappy::new(21));
    session.start();

    let score = run_until_over(&mut session, 600);
    assert_eq!(score, Some(0));
    assert_eq!(session.phase(), Phase::GameOver);
}

#[test]
fn an_idle_invaders_run_ends_when_the_formation_lands() {
    let mut session = Session::new(Invaders::new());
    session.start();

    let score = run_until_over(&mut session, 20_000);
    assert_eq!(score, Some(0), "formation never reached the player row");
    assert_eq!(session.phase(), Phase::GameOver);
}

#[test]
fn firing_at_the_wave_raises_the_score() {
    let mut session = Session::new(Invaders::new());
    session.start();

    for _ in 0..2_000 {
        session.apply(invaders::Action::Fire);
        session.advance(FRAME);
        if session.score() > 0 {
            break;
        }
    }
    assert!(session.score() > 0, "no enemy was ever hit");
    assert_eq!(session.score() % invaders::KILL_POINTS, 0);
}

#[test]
fn pausing_freezes_the_ball_mid_rally() {
    let mut session = Session::new(Pong::new(4));
    session.start();
    session.advance(FRAME);

    session.toggle_pause();
    let frozen = *session.sim().ball();
    let paddle_before = session.sim().player_y();
    for _ in 0..50 {
        session.advance(FRAME);
        session.apply(pong::Action::Up);
    }
    assert_eq!(*session.sim().ball(), frozen);
    assert_eq!(session.sim().player_y(), paddle_before);

    // Resuming makes input land again.
    session.toggle_pause();
    session.apply(pong::Action::Up);
    assert!(session.sim().player_y() < paddle_before);
}

#[test]
fn paddle_input_moves_the_player_only_while_playing() {
    let mut session = Session::new(Pong::new(4));
    let resting = session.sim().player_y();

    session.apply(pong::Action::Up);
    assert_eq!(session.sim().player_y(), resting);

    session.start();
    session.apply(pong::Action::Up);
    assert!(session.sim().player_y() < resting);
}

#[test]
fn restart_mid_run_zeroes_the_score_but_keeps_the_high_score() {
    let mut session = Session::new(Invaders::new());
    session.set_high_score(250);
    session.start();

    for _ in 0..2_000 {
        session.apply(invaders::Action::Fire);
        session.advance(FRAME);
        if session.score() > 0 {
            break;
        }
    }
    assert!(session.score() > 0);

    session.restart();
    assert_eq!(session.score(), 0);
    assert_eq!(session.high_score(), 250);
    assert_eq!(session.phase(), Phase::Playing);
}

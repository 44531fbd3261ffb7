use clap::Parser;
use neon_shooter::compute::GameStatus;
use neon_shooter::input::KeySet;
use neon_shooter::{App, Config, GameError};

fn seeded_config(seed: u64) -> Config {
    Config {
        seed: Some(seed),
        ..Config::default()
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!((config.width, config.height), (800.0, 600.0));
    let frame = config.frame_duration().as_secs_f64();
    assert!((frame - 1.0 / 60.0).abs() < 1e-9);
}

#[test]
fn config_parses_flags() {
    let config = Config::try_parse_from([
        "neon_shooter",
        "--width",
        "1024",
        "--seed",
        "9",
        "--spawn-interval",
        "30",
    ])
    .expect("valid flags");
    assert_eq!(config.width, 1024.0);
    assert_eq!(config.height, 600.0);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.spawn_interval, 30);
    assert!(config.log_file.is_none());
}

#[test]
fn config_rejects_bad_values() {
    let tiny = Config {
        width: 50.0,
        ..Config::default()
    };
    assert!(matches!(tiny.validate(), Err(GameError::InvalidConfig(_))));

    let unbounded = Config {
        width: f32::INFINITY,
        ..Config::default()
    };
    assert!(matches!(unbounded.validate(), Err(GameError::InvalidConfig(_))));

    let no_fps = Config {
        fps: 0,
        ..Config::default()
    };
    assert!(matches!(no_fps.validate(), Err(GameError::InvalidConfig(_))));

    let no_spawns = Config {
        spawn_interval: 0,
        ..Config::default()
    };
    assert!(matches!(no_spawns.validate(), Err(GameError::InvalidConfig(_))));
}

#[test]
fn app_new_validates_config() {
    let bad = Config {
        height: f32::NAN,
        ..Config::default()
    };
    assert!(App::new(bad).is_err());
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn app_rejects_infinite_canvas() {
    let config = Config {
        height: f32::INFINITY,
        ..seeded_config(1)
    };
    assert!(matches!(App::new(config), Err(GameError::InvalidConfig(_))));
}

#[test]
fn app_is_idle_until_started() {
    let mut app = App::new(seeded_config(1)).expect("valid config");
    assert!(!app.is_started());
    assert!(app.state().is_none());
    let report = app.step(&KeySet::new());
    assert_eq!(report.spawned, None);
}

#[test]
fn start_builds_fresh_game() {
    let mut app = App::new(seeded_config(1)).expect("valid config");
    app.start();
    let state = app.state().expect("started");
    assert_eq!(state.frame, 0);
    assert_eq!(state.status, GameStatus::Playing);
    assert_eq!(state.spawn_interval, app.config().spawn_interval);
}

#[test]
fn step_advances_running_game() {
    let mut app = App::new(seeded_config(1)).expect("valid config");
    app.start();
    for _ in 0..5 {
        app.step(&KeySet::new());
    }
    assert_eq!(app.state().map(|s| s.frame), Some(5));
}

#[test]
fn restart_without_game_starts_one() {
    let mut app = App::new(seeded_config(1)).expect("valid config");
    app.restart();
    assert!(app.is_started());
}

#[test]
fn restart_resets_game_but_keeps_high_score() {
    let mut app = App::new(seeded_config(1)).expect("valid config");
    app.start();
    if let Some(state) = app.state_mut() {
        state.score = 700;
    }
    app.step(&KeySet::new());
    assert_eq!(app.high_score(), 700);

    app.restart();
    let state = app.state().expect("restarted");
    assert_eq!(state.score, 0);
    assert_eq!(state.frame, 0);
    assert_eq!(state.high_score, 700);
    assert_eq!(app.high_score(), 700);
}

#[test]
fn pause_stops_the_clock() {
    let mut app = App::new(seeded_config(1)).expect("valid config");
    app.start();
    app.step(&KeySet::new());
    app.toggle_pause();
    for _ in 0..10 {
        app.step(&KeySet::new());
    }
    assert_eq!(app.state().map(|s| s.frame), Some(1));
    app.toggle_pause();
    app.step(&KeySet::new());
    assert_eq!(app.state().map(|s| s.frame), Some(2));
}

#[test]
fn game_over_is_reported() {
    let mut app = App::new(seeded_config(1)).expect("valid config");
    app.start();
    assert!(!app.is_game_over());
    if let Some(state) = app.state_mut() {
        state.status = GameStatus::GameOver;
    }
    assert!(app.is_game_over());
}

#[test]
fn same_seed_same_game() {
    let run = || {
        let mut app = App::new(seeded_config(7)).expect("valid config");
        app.start();
        let keys: KeySet = [" ", "ArrowLeft"].into_iter().collect();
        for _ in 0..400 {
            app.step(&keys);
        }
        let state = app.state().expect("started");
        let monsters: Vec<_> = state.monsters.iter().map(|m| (m.kind(), m.pos)).collect();
        (state.score, state.lives, monsters)
    };
    assert_eq!(run(), run());
}

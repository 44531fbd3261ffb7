use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, LevelFilter};

use neon_shooter::display::TerminalCanvas;
use neon_shooter::input::{key_name, KeyTracker, HOLD_WINDOW};
use neon_shooter::{App, Config, GameError, Result};

fn init_logging(config: &Config) -> Result<()> {
    // stderr shares the terminal with the game, so logs only go to a file.
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| GameError::Logger(e.to_string()))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: a `KeyTracker` records the frame of the last press/repeat
/// event for every key. Each frame the keys still inside the hold window
/// form the `KeySet` the simulation reads, so movement and fire can be held
/// together.
fn game_loop<W: Write>(out: &mut W, app: &mut App, rx: &mpsc::Receiver<Event>) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut canvas = TerminalCanvas::new(cols, rows, app.config().width, app.config().height);
    let frame_budget = app.config().frame_duration();
    let mut keys = KeyTracker::with_duration(HOLD_WINDOW, frame_budget);
    let mut frame: u64 = 0;

    app.start();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char('p') | KeyCode::Char('P') => app.toggle_pause(),
                            KeyCode::Char('r') | KeyCode::Char('R') if app.is_game_over() => {
                                app.restart();
                            }
                            _ => {}
                        }
                        if let Some(name) = key_name(&code) {
                            keys.seen(name, frame);
                        }
                    }
                    KeyEventKind::Repeat => {
                        if let Some(name) = key_name(&code) {
                            keys.seen(name, frame);
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(name) = key_name(&code) {
                            keys.released(&name);
                        }
                    }
                },
                Event::Resize(cols, rows) => canvas.resize(cols, rows),
                _ => {}
            }
        }

        app.step(&keys.snapshot(frame));

        canvas.clear();
        app.render(&mut canvas);
        if let Some(state) = app.state() {
            canvas.present(out, state)?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;
    let mut app = App::new(config)?;
    info!("neon_shooter starting");

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release events; terminals without the protocol fall back
    // to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the loop never stalls.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut app, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("neon_shooter exiting, best score {}", app.high_score());
    result
}

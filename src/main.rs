mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use void_space::compute::{Direction, Game};
use void_space::config::Settings;
use void_space::services::PlayField;
use void_space::sound::ChannelSound;
use void_space::status::{Phase, StatusBoard};

use display::Canvas;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

/// Terminal front end for the Void Space arcade shooter.
#[derive(Parser, Debug)]
#[command(name = "void_space", version, about)]
struct Args {
    /// Settings file; built-in defaults are used when it does not exist.
    #[arg(long, default_value = "assets/void_space.toml")]
    config: PathBuf,

    /// Where log output goes (the terminal itself is busy with the game).
    #[arg(long, default_value = "void_space.log")]
    log_file: PathBuf,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| is_held(key_frame, key, frame))
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the still-fresh keys are
/// applied together, so Space and the arrows can be held at once.  On
/// keyboard-enhancement terminals a release removes the key immediately;
/// elsewhere keys expire after `HOLD_WINDOW` frames of silence.
fn game_loop<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, settings: Settings) -> anyhow::Result<()> {
    let mut rng = thread_rng();
    let clock = Instant::now();
    let field = PlayField::new(settings.field.width, settings.field.height);

    let (sound, worker) = ChannelSound::spawn(|effect| tracing::debug!(?effect, "sound"));
    let mut board = StatusBoard::new();
    let mut game = Game::new(settings, &field);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    let up = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
    let down = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
    let left = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
    let right = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
    let fire = [KeyCode::Char(' ')];

    'frames: loop {
        let frame_start = Instant::now();
        let now_ms = clock.elapsed().as_millis() as u64;
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break 'frames,
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => break 'frames,
                        KeyCode::Char(' ') if game.status.phase() == Phase::NotStarted => {
                            game.new_game(now_ms, &field, &mut rng);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Apply held-key actions every frame ────────────────────────────────
        if game.status.is_playing() {
            if any_held(&key_frame, &up, frame) {
                game.move_ship(Direction::Up, &field);
            } else if any_held(&key_frame, &down, frame) {
                game.move_ship(Direction::Down, &field);
            }
            if any_held(&key_frame, &left, frame) {
                game.move_ship(Direction::Left, &field);
            } else if any_held(&key_frame, &right, frame) {
                game.move_ship(Direction::Right, &field);
            }
            if any_held(&key_frame, &fire, frame) {
                game.pull_trigger(now_ms, &sound);
            }
        }

        game.tick(now_ms, &field, &sound, &mut rng);
        game.publish(&mut board);

        let (width, height) = terminal::size()?;
        let mut canvas = Canvas::new(width, height, field.width, field.height);
        canvas.draw_stars(&mut rng);
        game.draw(now_ms, &mut canvas);
        display::render(out, &canvas, &board.read())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }

    drop(sound);
    if worker.join().is_err() {
        tracing::warn!("sound worker panicked");
    }
    tracing::info!(points = board.read().points, "player quit");
    Ok(())
}

// ── Terminal session ──────────────────────────────────────────────────────────

/// Raw mode and the alternate screen for as long as the value lives.
struct TerminalSession<W: Write> {
    out: W,
    keyboard_enhanced: bool,
}

impl<W: Write> TerminalSession<W> {
    fn enter(mut out: W) -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        // Key-release events where the terminal supports them; elsewhere the
        // hold window takes over.
        let keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(Self {
            out,
            keyboard_enhanced,
        })
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Forward terminal events from a dedicated thread so the frame loop never
/// blocks on input.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(%err, "input thread stopped");
                break;
            }
        }
    });
    rx
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let settings = Settings::load_or_default(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;

    let mut session = TerminalSession::enter(BufWriter::new(stdout()))?;
    let rx = spawn_input_thread();

    let result = game_loop(&mut session.out, &rx, settings);
    drop(session);

    if let Err(err) = &result {
        tracing::error!(error = %err, "game loop failed");
    }
    result
}

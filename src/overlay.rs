//! Interactive terminal overlay driver.
//!
//! The thin IO shell around the engine: it owns the terminal (raw
//! mode, alternate screen, mouse capture), translates terminal events
//! into engine calls, paces the frame loop, and writes each rendered
//! frame as ANSI. All effect logic lives in the library modules; this
//! file only wires them to a live terminal.
//!
//! [`initialize`] returns an [`OverlayHandle`] so hosts can tear the
//! loop down explicitly instead of leaking a free-running callback.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::audio::{self, AudioSink};
use crate::engine::FireworksEngine;
use crate::models::EffectConfig;
use crate::render;
use crate::rng::Rng;
use crate::shake::ShakeCue;
use crate::surface::Surface;
use crate::terminal::frame_to_ansi;

/// Handle to a running overlay. Dropping it also stops the loop.
pub struct OverlayHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<io::Result<()>>>,
}

impl OverlayHandle {
    /// Request termination and wait for the loop to release the
    /// terminal.
    pub fn stop(mut self) -> io::Result<()> {
        self.running.store(false, Ordering::SeqCst);
        self.join_inner()
    }

    /// Block until the overlay exits on its own (quit key or error).
    pub fn wait(mut self) -> io::Result<()> {
        self.join_inner()
    }

    fn join_inner(&mut self) -> io::Result<()> {
        match self.thread.take() {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "overlay thread panicked"))),
            None => Ok(()),
        }
    }
}

impl Drop for OverlayHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

/// Start the overlay on the current terminal.
///
/// The caller is responsible for checking that this process is
/// attached to an interactive terminal first; `initialize` assumes the
/// environment check already happened.
pub fn initialize(config: EffectConfig, sink: Box<dyn AudioSink + Send>) -> OverlayHandle {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    let thread = thread::spawn(move || run_session(config, sink, flag));
    OverlayHandle { running, thread: Some(thread) }
}

/// Acquire the terminal, run the frame loop, and always hand the
/// terminal back, even when the loop errors.
fn run_session(
    config: EffectConfig,
    mut sink: Box<dyn AudioSink + Send>,
    running: Arc<AtomicBool>,
) -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;

    let result = frame_loop(&mut stdout, config, sink.as_mut(), &running);

    let _ = execute!(stdout, Show, DisableMouseCapture, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    result
}

fn frame_loop(
    stdout: &mut io::Stdout,
    config: EffectConfig,
    sink: &mut dyn AudioSink,
    running: &AtomicBool,
) -> io::Result<()> {
    let (cols, rows) = crossterm::terminal::size()?;
    // Half-block cells pack two pixel rows per text row
    let (mut width, mut height) = (cols as u32, rows as u32 * 2);

    let mut engine = FireworksEngine::new(config.clone(), width as f64, height as f64)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut tone_rng = Rng::new(engine.seed().wrapping_add(1));
    let mut surface = Surface::new(width, height);
    let mut shake = ShakeCue::new(config.shake.duration_ms, config.fps);

    let audio_on = config.audio.enabled;
    let shake_on = config.shake.enabled;
    let frame_budget = Duration::from_secs_f64(1.0 / config.fps.max(1) as f64);

    while running.load(Ordering::SeqCst) {
        let frame_start = Instant::now();

        // Handle input until this frame's time slice is spent
        loop {
            let remaining = frame_budget.saturating_sub(frame_start.elapsed());
            if remaining.is_zero() || !event::poll(remaining)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if is_quit(&key) => {
                    running.store(false, Ordering::SeqCst);
                }
                Event::Mouse(mouse) => {
                    let (x, y) = (mouse.column as f64, mouse.row as f64 * 2.0);
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            engine.pointer_moved(x, y);
                            engine.trigger_at(x, y);
                            if audio_on {
                                sink.play(&[audio::launch_tone()]);
                            }
                        }
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                            engine.pointer_moved(x, y);
                        }
                        _ => {}
                    }
                }
                Event::Resize(new_cols, new_rows) => {
                    width = new_cols as u32;
                    height = new_rows as u32 * 2;
                    engine.resize(width as f64, height as f64);
                    surface.resize(width, height);
                }
                _ => {}
            }
        }

        let events = engine.step();
        for _burst in &events.bursts {
            if audio_on {
                sink.play(&audio::explosion_tones(&mut tone_rng));
            }
            if shake_on {
                shake.trigger();
            }
        }
        shake.tick();

        render::render(&engine, &mut surface);
        let ansi = frame_to_ansi(surface.frame(), shake.offset());
        queue!(stdout, MoveTo(0, 0))?;
        stdout.write_all(ansi.as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

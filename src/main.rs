//! Terminal Neuro Quest runner (default binary).
//!
//! Crossterm input, a fixed-step clock that drives the shell's scheduler, and
//! the framebuffer renderer. Logs go to a file so they never touch the TUI.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use neuro_quest::input::{handle_key_event, is_interrupt, should_quit, TextEvent, TextInput};
use neuro_quest::shell::{AppConfig, AppShell, Screen};
use neuro_quest::term::{
    frame_key, FrameBuffer, RenderThrottle, ScreenRenderer, TerminalApp, TerminalPresenter,
    TerminalRenderer, Viewport,
};
use neuro_quest::core::SessionSnapshot;
use neuro_quest::types::{InputAction, TICK_MS};

/// Idle redraw interval.
const HEARTBEAT_MS: u64 = 250;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    setup_logging(config.log_dir.as_deref())?;

    let app = AppShell::new(&config, TerminalPresenter::new())
        .context("failed to initialise game")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, app);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(err) = &result {
        tracing::error!(%err, "exited with error");
    }
    result
}

fn run(term: &mut TerminalRenderer, mut app: TerminalApp) -> Result<()> {
    let screens = ScreenRenderer::default();
    let mut throttle = RenderThrottle::new(HEARTBEAT_MS);
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();
    let mut name = TextInput::with_text(app.player_name());
    let mut last_screen = app.screen();

    let started = Instant::now();
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        if app.should_quit() {
            tracing::info!("quit");
            return Ok(());
        }

        let screen = app.screen();
        if screen != last_screen {
            if screen == Screen::NameEntry {
                name.set_text(app.player_name());
            }
            tracing::debug!(from = last_screen.name(), to = screen.name(), "screen changed");
            last_screen = screen;
        }

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let key = frame_key(&(
            screen,
            app.port().revision(),
            app.cursor(),
            name.as_str(),
            app.notice(),
            (w, h),
        ));
        let now_ms = started.elapsed().as_millis() as u64;
        let animating = !app.scheduler().is_empty() || app.port().cue().is_some();
        if throttle.should_render(now_ms, key, animating) {
            app.session_snapshot_into(&mut snap);
            screens.render_into(&app, name.as_str(), &snap, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
        }

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    on_key(&mut app, &mut name, key);
                }
                Event::Resize(..) => {
                    term.invalidate();
                    throttle.reset();
                }
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let elapsed_ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
            app.advance(elapsed_ms);
            app.port_mut().advance(elapsed_ms);
        }
    }
}

fn on_key(app: &mut TerminalApp, name: &mut TextInput, key: KeyEvent) {
    match app.screen() {
        Screen::NameEntry => {
            if is_interrupt(key) {
                app.request_quit();
                return;
            }
            match name.handle_key_press(key) {
                TextEvent::Submitted => {
                    app.submit_name(name.value());
                }
                TextEvent::Cancelled => app.cancel_name_entry(),
                TextEvent::Rejected(reason) => {
                    tracing::trace!(?reason, "name key rejected");
                }
                TextEvent::Changed | TextEvent::Ignored => {}
            }
        }
        Screen::Instructions => {
            if should_quit(key) {
                app.request_quit();
            } else {
                app.handle(InputAction::Back);
            }
        }
        _ => {
            if should_quit(key) {
                app.request_quit();
            } else if let Some(action) = handle_key_event(key) {
                app.handle(action);
            }
        }
    }
}

/// File-only logging; stderr belongs to the terminal UI.
fn setup_logging(log_dir: Option<&Path>) -> Result<()> {
    let log_dir = log_dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "neuro-quest.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false),
        )
        .init();

    // Keep the writer alive for the life of the process.
    std::mem::forget(guard);

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");
    Ok(())
}

fn default_log_dir() -> PathBuf {
    if let Some(cache) = std::env::var_os("XDG_CACHE_HOME") {
        return PathBuf::from(cache).join("neuro-quest").join("logs");
    }
    if let Some(home) = std::env::var_os("HOME") {
        let mut path = PathBuf::from(home);
        if cfg!(target_os = "macos") {
            path.push("Library");
            path.push("Caches");
        } else {
            path.push(".cache");
        }
        return path.join("neuro-quest").join("logs");
    }
    std::env::temp_dir().join("neuro-quest").join("logs")
}

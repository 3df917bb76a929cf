mod app;
mod config;
mod error;
mod logging;

use crate::app::handlers::host::process_host_messages;
use crate::app::handlers::input::{handle_dialog_key, handle_mouse};
use crate::app::runtime::{spawn_host, HostBridge, HostProcess, StdioBridge};
use crate::app::view::draw_ui;
use crate::app::DialogController;
use crate::config::parse_config;
use crate::logging::init_logging;
use crossterm::cursor::Show;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::{Terminal, TerminalOptions, Viewport};
use std::error::Error;
use std::process::Child;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const TICK: Duration = Duration::from_millis(50);
const INLINE_VIEWPORT_HEIGHT: u16 = 16;

struct TerminalRestoreGuard {
    use_alt_screen: bool,
}

impl TerminalRestoreGuard {
    fn new(use_alt_screen: bool) -> Self {
        Self { use_alt_screen }
    }
}

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        if self.use_alt_screen {
            let _ = stdout.execute(LeaveAlternateScreen);
        }
        let _ = stdout.execute(Show);
    }
}

/// Sleeps no longer than the pending progress timer allows.
fn poll_timeout(deadline: Option<Instant>, now: Instant) -> Duration {
    deadline.map_or(TICK, |deadline| {
        deadline.saturating_duration_since(now).min(TICK)
    })
}

fn run<T: Backend, B: HostBridge>(
    terminal: &mut Terminal<T>,
    controller: &mut DialogController<B>,
    child: &mut Child,
    lines: &Receiver<String>,
) -> Result<(), Box<dyn Error>> {
    let mut host_open = true;
    loop {
        if host_open && !process_host_messages(controller, lines) {
            warn!("host output closed");
            host_open = false;
        }

        if let Ok(Some(status)) = child.try_wait() {
            info!(%status, "host exited");
            return Ok(());
        }

        if event::poll(poll_timeout(controller.next_deadline(), Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        info!("quit requested");
                        return Ok(());
                    }
                    if handle_dialog_key(controller, key.code, key.modifiers) {
                        controller.request_redraw();
                    }
                }
                Event::Mouse(mouse) => {
                    if handle_mouse(controller, mouse) {
                        controller.request_redraw();
                    }
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal resized");
                    terminal.autoresize()?;
                    controller.request_redraw();
                }
                _ => {}
            }
        }

        let now = Instant::now();
        controller.fire_due_timers(now);

        if controller.take_redraw() || controller.is_animating() {
            let dialog = controller.dialog_view();
            let progress = controller.progress_view(now);
            terminal.draw(|f| draw_ui(f, &dialog, &progress, &mut controller.render_state))?;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = parse_config()?;
    let _log_guard = init_logging(&config.log_filter, &config.log_file)?;
    info!(
        host = %config.host_command,
        args = ?config.host_args,
        endpoint = ?config.endpoint,
        "starting dialog controller"
    );

    let HostProcess {
        mut child,
        stdin,
        lines,
    } = spawn_host(&config.host_command, &config.host_args)?;
    let mut controller = DialogController::new(StdioBridge::new(stdin), config.endpoint.clone());

    let mut stdout = std::io::stdout();
    let _restore_guard = TerminalRestoreGuard::new(config.alt_screen);
    if config.alt_screen {
        stdout.execute(EnterAlternateScreen)?;
    }
    enable_raw_mode()?;
    let _ = stdout.execute(EnableMouseCapture);
    let viewport = if config.alt_screen {
        Viewport::Fullscreen
    } else {
        Viewport::Inline(INLINE_VIEWPORT_HEIGHT)
    };
    let mut terminal = Terminal::with_options(CrosstermBackend::new(stdout), TerminalOptions {
        viewport,
    })?;

    let result = run(&mut terminal, &mut controller, &mut child, &lines);

    if let Err(error) = child.kill() {
        debug!(%error, "host already stopped");
    }
    let _ = child.wait();
    info!("dialog controller stopped");
    result
}

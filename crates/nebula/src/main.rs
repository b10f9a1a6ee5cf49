mod cli;
mod logging;
mod paint;

use std::io::{Write, stdout};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
};
use nebula_background::{Renderer, SystemClock, normalize};
use nebula_config::Config;
use nebula_core::{Variant, View};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::Stylize,
    text::Line,
};

use crate::cli::Cli;
use crate::paint::{CELL_HEIGHT_PX, CELL_WIDTH_PX, area_px, render_commands};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = cli.load_config()?;

    if cli.write_config {
        let path = cli.config_path()?;
        config.save_to(&path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    if let Some(path) = logging::init(cli.log_file.as_deref())? {
        log::info!("logging to {}", path.display());
    }

    let terminal = ratatui::init();
    let app = App::new(&config);
    let result = with_mouse_capture(&mut stdout(), || app.run(terminal));
    ratatui::restore();
    result
}

/// Run `body` with mouse capture enabled on `out`, disabling it again
/// afterwards. `body` is skipped if capture cannot be enabled.
fn with_mouse_capture<W: Write>(
    out: &mut W,
    body: impl FnOnce() -> color_eyre::Result<()>,
) -> color_eyre::Result<()> {
    let result = execute!(out, EnableMouseCapture)
        .map_err(Into::into)
        .and_then(|_| body());
    let _ = execute!(out, DisableMouseCapture);
    result
}

/// Seed from the system clock, for runs without a configured seed.
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Which renderers are visible.
    view: View,
    /// Time between frames.
    frame_interval: Duration,
    /// Device-scale factor reported to the renderers.
    device_scale: f64,
    /// Clock panel side as a fraction of the shorter screen side.
    clock_panel: f64,
    /// Full-screen starfield.
    starfield: Renderer,
    /// Clock rings in a centred panel.
    clock: Renderer,
    /// Last known terminal size in logical pixels.
    viewport: (f64, f64),
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: &Config) -> Self {
        let settings = config.renderer_settings();
        let seed = config.display.seed.unwrap_or_else(time_seed);
        Self {
            running: false,
            view: config.display.view,
            frame_interval: Duration::from_secs(1) / config.display.fps.max(1),
            device_scale: config.display.device_scale,
            clock_panel: config.display.clock_panel,
            starfield: Renderer::new(Variant::Starfield, settings.clone(), seed),
            clock: Renderer::new(Variant::Clock, settings, seed),
            viewport: (0.0, 0.0),
        }
    }

    /// Run the application's main loop.
    ///
    /// Each iteration draws one frame, then handles events until the next
    /// frame is due, so input is always applied before the following paint.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        log::info!("starting with view {:?}", self.view);
        while self.running {
            let due = Instant::now() + self.frame_interval;
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(due)?;
        }
        log::info!("rendered {} starfield frames", self.starfield.frames());
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.viewport = area_px(area);
        let time = SystemClock;

        if self.view.shows(Variant::Starfield) {
            let (w, h) = self.viewport;
            if self.starfield.sync_surface(w, h, self.device_scale) {
                log::debug!("starfield surface is now {w}x{h}");
            }
            let commands = self.starfield.tick(&time);
            render_commands(frame, area, &commands);
        }

        if self.view.shows(Variant::Clock) {
            let panel = clock_panel(area, self.clock_panel);
            let (w, h) = area_px(panel);
            if self.clock.sync_surface(w, h, self.device_scale) {
                log::debug!("clock surface is now {w}x{h}");
            }
            let commands = self.clock.tick(&time);
            render_commands(frame, panel, &commands);
        }

        let help = Line::from(vec![
            "q".bold().cyan(),
            " quit  ".dark_gray(),
            "v".bold().cyan(),
            " cycle view  ".dark_gray(),
            "r".bold().cyan(),
            " new stars".dark_gray(),
        ])
        .centered();
        let [_, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        frame.render_widget(help, help_area);
    }

    /// Reads the crossterm events and updates the state of [`App`] until
    /// `due`.
    fn handle_crossterm_events(&mut self, due: Instant) -> color_eyre::Result<()> {
        loop {
            let remaining = due.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !event::poll(remaining)? {
                return Ok(());
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                // Surfaces are re-measured on the next draw.
                Event::Resize(w, h) => log::trace!("terminal resized to {w}x{h} cells"),
                _ => {}
            }
            if !self.running {
                return Ok(());
            }
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('v')) => self.cycle_view(),
            (_, KeyCode::Char('r')) => self.starfield.reseed(time_seed()),
            _ => {}
        }
    }

    /// Feed pointer movement to the renderers, normalized to the terminal
    /// centre.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }
        let px = (mouse.column as f64 + 0.5) * CELL_WIDTH_PX;
        let py = (mouse.row as f64 + 0.5) * CELL_HEIGHT_PX;
        let (nx, ny) = normalize(px, py, self.viewport.0, self.viewport.1);
        self.starfield.on_pointer_move(nx, ny);
        self.clock.on_pointer_move(nx, ny);
    }

    /// Cycle through the available views.
    fn cycle_view(&mut self) {
        self.view = self.view.next();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Centred square (in logical pixels) for the clock face.
fn clock_panel(area: Rect, fraction: f64) -> Rect {
    let (w, h) = area_px(area);
    let side = w.min(h) * fraction;
    let cols = ((side / CELL_WIDTH_PX).round() as u16).min(area.width);
    let rows = ((side / CELL_HEIGHT_PX).round() as u16).min(area.height);
    let [column] = Layout::horizontal([Constraint::Length(cols)])
        .flex(Flex::Center)
        .areas(area);
    let [panel] = Layout::vertical([Constraint::Length(rows)])
        .flex(Flex::Center)
        .areas(column);
    panel
}

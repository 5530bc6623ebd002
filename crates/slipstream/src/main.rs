use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
};
use slipstream_config::Config;
use slipstream_core::Theme;
use slipstream_flow::{AnimatorHandle, ThemeSignal, create, stop};
use tracing::{debug, info, warn};

mod host;
mod logging;

use host::TerminalHost;

/// Longest wait for input when no frame is due; keeps the footer clock live.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(err) = logging::init() {
        eprintln!("slipstream: logging disabled: {err}");
    }
    let (config, save_path) = load_config(slipstream_config::config_path());
    let terminal = ratatui::init();
    let result = App::new(config, save_path).run(terminal);
    ratatui::restore();
    result
}

/// Load the config at `path`, falling back to defaults. The path is handed
/// back only when the file loaded cleanly, so settings saved later never
/// replace a file the user still has to fix.
fn load_config(path: Option<PathBuf>) -> (Config, Option<PathBuf>) {
    let Some(path) = path else {
        warn!("no home directory found, settings will not be saved");
        return (Config::default(), None);
    };
    match Config::load_from(&path) {
        Ok(config) => (config, Some(path)),
        Err(err) => {
            warn!("ignoring config, settings will not be saved: {err:#}");
            (Config::default(), None)
        }
    }
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    config: Config,
    /// Where settings are saved, if anywhere.
    save_path: Option<PathBuf>,
    theme: ThemeSignal,
    reduced_motion: bool,
    /// Terminal size in cells.
    columns: u16,
    rows: u16,
    /// The mounted backdrop, if the terminal has room for one.
    animator: Option<AnimatorHandle<TerminalHost>>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, save_path: Option<PathBuf>) -> Self {
        Self {
            running: false,
            save_path,
            theme: ThemeSignal::new(config.theme),
            reduced_motion: config.reduced_motion || host::reduced_motion_from_env(),
            columns: 0,
            rows: 0,
            animator: None,
            config,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let area = terminal.size()?;
        self.columns = area.width;
        self.rows = area.height;
        self.mount();

        self.running = true;
        while self.running {
            if let Some(animator) = &mut self.animator {
                animator.tick(Instant::now());
            }
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }

        if let Some(animator) = self.animator.take() {
            stop(animator);
        }
        info!("exiting");
        Ok(())
    }

    /// Tear down any running backdrop and mount a fresh one for the current
    /// terminal size.
    fn mount(&mut self) {
        if let Some(animator) = self.animator.take() {
            stop(animator);
        }
        let host =
            TerminalHost::new(self.columns, self.rows, self.config.cell, self.reduced_motion);
        self.animator = create(host, self.theme.reader(), self.config.flow.clone());
        match &self.animator {
            Some(animator) => info!(
                columns = self.columns,
                rows = self.rows,
                animated = animator.is_animated(),
                particles = animator.particle_count(),
                "backdrop mounted"
            ),
            None => debug!(columns = self.columns, rows = self.rows, "no room for a backdrop"),
        }
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if let Some(animator) = &self.animator {
            frame.render_widget(animator.surface(), area);
        }

        let theme = self.theme.get();
        let color = text_color(theme);
        let dim = muted_color(theme);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Top padding
            Constraint::Length(1), // Title
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Clock
            Constraint::Fill(1),   // Bottom padding
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let title = Paragraph::new(self.config.title.as_str())
            .style(Style::new().fg(color).bold())
            .alignment(Alignment::Center);
        frame.render_widget(title, chunks[1]);

        let clock = Paragraph::new(Local::now().format("%b %d, %Y · %H:%M:%S").to_string())
            .style(Style::new().fg(dim))
            .alignment(Alignment::Center);
        frame.render_widget(clock, chunks[3]);

        let motion = if self.reduced_motion { " animate" } else { " hold still" };
        let help = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".fg(dim),
            "t".bold().fg(color),
            " toggle theme  ".fg(dim),
            "m".bold().fg(color),
            motion.fg(dim),
        ])
        .centered();
        frame.render_widget(help, chunks[5]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the next frame deadline.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = self
            .animator
            .as_ref()
            .and_then(|animator| animator.next_deadline())
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(columns, rows) => self.on_resize(columns, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t')) => self.toggle_theme(),
            (_, KeyCode::Char('m')) => self.toggle_reduced_motion(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }
        if let Some(animator) = &mut self.animator {
            let (x, y) = self.config.cell.cell_center(mouse.column, mouse.row);
            animator.pointer_moved(x, y);
        }
    }

    fn on_resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
        match &mut self.animator {
            Some(animator) => animator.resize_requested(
                self.config.cell.logical_size(columns, rows),
                Instant::now(),
            ),
            None => self.mount(),
        }
    }

    /// Flip light/dark and remember the choice.
    fn toggle_theme(&mut self) {
        let theme = self.theme.get().toggle();
        self.theme.set(theme);
        self.config.theme = theme;
        let Some(path) = &self.save_path else {
            warn!(theme = theme.name(), "theme changed for this session only");
            return;
        };
        if let Err(err) = self.config.save_to(path) {
            warn!("failed to save theme: {err:#}");
        }
    }

    fn toggle_reduced_motion(&mut self) {
        self.reduced_motion = !self.reduced_motion;
        self.mount();
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

fn text_color(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Rgb(226, 232, 240),
        Theme::Light => Color::Rgb(15, 23, 42),
    }
}

fn muted_color(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Rgb(100, 116, 139),
        Theme::Light => Color::Rgb(71, 85, 105),
    }
}

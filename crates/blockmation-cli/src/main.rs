use anyhow::Result;
use blockmation_config::Config;
use blockmation_engine::{
    Block, Cmd, EditSession, LoadError, Model, PlaybackEvent, PlaybackOutcome, PlaybackSpeed,
    Player, SpeedPresets, io,
};
use crossbeam_channel::Receiver;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as Pane, Borders, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    sync::Arc,
    time::Duration,
};

/// Movie opened when no file is named on the command line
const DEFAULT_MOVIE_NAME: &str = "untitled.txt";

/// Terminal columns per block, so cells come out roughly square
const CELL_WIDTH: u16 = 2;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(30);

/// A running (or just finished) playback and the movie copy it is showing
struct Playback {
    player: Player,
    events: Receiver<PlaybackEvent>,
    movie: Arc<Model>,
    frame: Option<usize>,
    outcome: Option<PlaybackOutcome>,
}

struct App {
    movie_path: PathBuf,
    session: EditSession,
    cursor: (usize, usize),
    presets: SpeedPresets,
    speed: PlaybackSpeed,
    playback: Option<Playback>,
    message: String,
    confirm_quit: bool,
    // Where the grid was last drawn, for mouse hit testing
    grid_area: Rect,
}

impl App {
    fn new(movie_path: PathBuf, session: EditSession, config: &Config) -> Self {
        let message = session.status();
        Self {
            movie_path,
            session,
            cursor: (0, 0),
            presets: config.speed_presets(),
            speed: config.playback_speed(),
            playback: None,
            message,
            confirm_quit: false,
            grid_area: Rect::default(),
        }
    }

    fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let last = self.session.model().dimensions().saturating_sub(1);
        let (x, y) = self.cursor;
        self.cursor = (
            x.saturating_add_signed(dx).min(last),
            y.saturating_add_signed(dy).min(last),
        );
    }

    fn apply(&mut self, cmd: Cmd) {
        match self.session.apply(cmd) {
            Ok(patch) => {
                log::debug!("Applied {cmd:?}: {patch:?}");
                self.message = self.session.status();
            }
            Err(e) => self.message = format!("Error: {e}"),
        }
    }

    fn paint_at_cursor(&mut self) {
        let (x, y) = self.cursor;
        self.apply(Cmd::Paint { x, y });
    }

    fn select_brush(&mut self, key: char) {
        if let Some(block) = brush_for_key(key) {
            self.apply(Cmd::SetBrush(block));
            self.message = format!("Brush: {}", block.name());
        }
    }

    fn last_frame(&self) -> usize {
        self.session.model().total_frames().saturating_sub(1)
    }

    fn save(&mut self) {
        match io::save_file(&self.movie_path, self.session.model()) {
            Ok(saved_path) => {
                self.session.mark_saved();
                self.message = format!("Saved {}", saved_path.display());
                self.movie_path = saved_path;
            }
            Err(e) => {
                log::warn!("Save to {} failed: {e}", self.movie_path.display());
                self.message = format!("Save failed: {e}");
            }
        }
    }

    fn toggle_playback(&mut self) {
        if let Some(playback) = self.playback.take() {
            if playback.outcome.is_none() {
                playback.player.stop();
            }
            self.message = self.session.status();
            return;
        }

        let movie = self.session.snapshot();
        let delay = self.speed.delay(&self.presets);
        let (player, events) = Player::start(Arc::clone(&movie), delay);
        self.playback = Some(Playback {
            player,
            events,
            movie,
            frame: None,
            outcome: None,
        });
        self.message = format!("Playing at {} speed", self.speed.label());
    }

    fn cycle_speed(&mut self) {
        self.speed = self.speed.cycle();
        self.message = format!(
            "Speed: {} ({}ms per frame)",
            self.speed.label(),
            self.speed.delay(&self.presets).as_millis()
        );
    }

    /// Pick up frame changes from the playback thread
    fn poll_playback(&mut self) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };

        for event in playback.events.try_iter() {
            match event {
                PlaybackEvent::Frame(index) => playback.frame = Some(index),
                PlaybackEvent::Finished(outcome) => {
                    playback.outcome = Some(outcome);
                    self.message = match outcome {
                        PlaybackOutcome::Completed => "Playback finished, p to return".to_string(),
                        PlaybackOutcome::Stopped => "Playback stopped".to_string(),
                    };
                }
            }
        }
    }

    fn request_quit(&mut self) -> bool {
        if self.session.is_dirty() && !self.confirm_quit {
            self.confirm_quit = true;
            self.message = "Unsaved changes: q again to quit, s to save".to_string();
            return false;
        }
        true
    }

    /// Handle one key press; true means quit
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if code != KeyCode::Char('q') {
            self.confirm_quit = false;
        }

        if self.is_playing() {
            match code {
                KeyCode::Char('q') => return self.request_quit(),
                KeyCode::Char('p') | KeyCode::Esc => self.toggle_playback(),
                KeyCode::Char('+') => self.cycle_speed(),
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') => return self.request_quit(),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.paint_at_cursor(),
            KeyCode::Char(key @ '1'..='5') => self.select_brush(key),
            KeyCode::Char('c') => self.apply(Cmd::ClearFrame),
            KeyCode::Char('n') => self.apply(Cmd::NewFrame),
            KeyCode::Char('a') => self.apply(Cmd::AppendBlankFrame),
            KeyCode::Char('x') => self.apply(Cmd::RemoveFrame),
            KeyCode::Char('[') | KeyCode::PageUp => self.apply(Cmd::PreviousFrame),
            KeyCode::Char(']') | KeyCode::PageDown => self.apply(Cmd::NextFrame),
            KeyCode::Home => self.apply(Cmd::GoToFrame(0)),
            KeyCode::End => self.apply(Cmd::GoToFrame(self.last_frame())),
            KeyCode::Char('<') => {
                let to = self.session.current_frame().saturating_sub(1);
                self.apply(Cmd::MoveFrame { to });
            }
            KeyCode::Char('>') => {
                let to = self.session.current_frame() + 1;
                self.apply(Cmd::MoveFrame { to });
            }
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('p') => self.toggle_playback(),
            KeyCode::Char('+') => self.cycle_speed(),
            _ => {}
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.is_playing() {
            return;
        }

        if matches!(
            mouse.kind,
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left)
        ) && let Some(cell) = cell_at(
            self.grid_area,
            self.session.model().dimensions(),
            mouse.column,
            mouse.row,
        ) {
            self.cursor = cell;
            self.paint_at_cursor();
        }
    }

    fn title(&self) -> String {
        let name = self
            .movie_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.movie_path.display().to_string());
        if self.session.is_dirty() {
            format!("{name} *")
        } else {
            name
        }
    }

    /// Title and grid lines for the main pane
    fn canvas(&self) -> (String, Vec<Line<'static>>) {
        if let Some(playback) = &self.playback {
            let total = playback.movie.total_frames();
            return match playback.frame.and_then(|i| playback.movie.frame(i).ok()) {
                Some(frame) => (
                    format!(
                        "Playing: frame {} of {}",
                        playback.frame.map_or(0, |i| i + 1),
                        total
                    ),
                    grid_lines(frame, None),
                ),
                None => (
                    "Playing".to_string(),
                    vec![Line::from("Nothing to play")],
                ),
            };
        }

        match self.session.current() {
            Ok(frame) => (
                format!("Editing: {}", self.session.status()),
                grid_lines(frame, Some(self.cursor)),
            ),
            Err(_) => (
                "Editing".to_string(),
                vec![Line::from("No frames: press n to add one")],
            ),
        }
    }

    fn side_panel(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = Block::ALL
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let marker = if *block == self.session.brush() {
                    " <"
                } else {
                    ""
                };
                Line::from(vec![
                    Span::raw(format!("{} ", i + 1)),
                    Span::styled("  ", Style::default().bg(block_color(*block))),
                    Span::raw(format!(" {}{marker}", block.name())),
                ])
            })
            .collect();

        lines.push(Line::from(""));
        lines.extend(
            [
                "arrows/hjkl: move",
                "space/enter: paint",
                "c: clear frame",
                "n: copy last frame",
                "a: add blank frame",
                "[ ]: prev/next frame",
                "< >: move frame",
                "x: remove frame",
                "p: play/stop",
                "+: change speed",
                "s: save  q: quit",
            ]
            .into_iter()
            .map(Line::from),
        );
        lines
    }
}

fn brush_for_key(key: char) -> Option<Block> {
    let index = key.to_digit(10)?.checked_sub(1)?;
    Block::ALL.get(index as usize).copied()
}

fn block_color(block: Block) -> Color {
    match block {
        Block::LightGray => Color::Gray,
        Block::DarkGray => Color::DarkGray,
        Block::Red => Color::Red,
        Block::Green => Color::Green,
        Block::Blue => Color::Blue,
    }
}

fn grid_lines(
    frame: &blockmation_engine::Frame,
    cursor: Option<(usize, usize)>,
) -> Vec<Line<'static>> {
    frame
        .rows()
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .enumerate()
                .map(|(x, block)| {
                    let style = Style::default().bg(block_color(block));
                    if cursor == Some((x, y)) {
                        Span::styled(
                            "[]",
                            style.fg(Color::White).add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::styled("  ", style)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Grid cell under a terminal position, if any
fn cell_at(area: Rect, dimensions: usize, column: u16, row: u16) -> Option<(usize, usize)> {
    if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
        return None;
    }
    let x = usize::from((column - area.x) / CELL_WIDTH);
    let y = usize::from(row - area.y);
    (x < dimensions && y < dimensions).then_some((x, y))
}

/// Open the movie at `path`, or start a new one if there is no such file
fn open_session(path: &Path, config: &Config) -> Result<EditSession> {
    let mut session = match io::load_file(path) {
        Ok(model) => EditSession::from_model(model),
        Err(LoadError::NotFound(_)) => {
            log::info!(
                "No movie at {}, starting a new {}x{} movie",
                path.display(),
                config.default_dimensions,
                config.default_dimensions
            );
            EditSession::new(config.default_dimensions)?
        }
        Err(e) => return Err(e.into()),
    };
    session.apply(Cmd::SetBrush(config.default_brush))?;
    Ok(session)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", config_path.display());
            process::exit(1);
        }
    };

    let movie_arg = match args.len() {
        1 => PathBuf::from(DEFAULT_MOVIE_NAME),
        2 => PathBuf::from(&args[1]),
        _ => {
            eprintln!("Usage: {} [movie-file]", args[0]);
            process::exit(1);
        }
    };

    // Accept the movie name without its extension
    let mut movie_path = config.resolve_movie_path(&movie_arg);
    if !movie_path.exists() {
        movie_path = io::with_movie_extension(&movie_path);
    }

    let session = match open_session(&movie_path, &config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: Could not open '{}': {e}", movie_path.display());
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(movie_path, session, &config);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.poll_playback();
        terminal.draw(|f| ui(f, app))?;

        // Poll with a timeout so playback frames keep arriving without input
        if !event::poll(INPUT_POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key.code) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(26)])
        .split(rows[0]);

    // Movie grid
    let (title, lines) = app.canvas();
    let canvas = Pane::default().borders(Borders::ALL).title(title);
    app.grid_area = canvas.inner(columns[0]);
    f.render_widget(Paragraph::new(lines).block(canvas), columns[0]);

    // Palette and key help
    let side = Paragraph::new(app.side_panel())
        .block(Pane::default().borders(Borders::ALL).title("Brush"));
    f.render_widget(side, columns[1]);

    // Status bar
    let status = Line::from(vec![
        Span::raw(format!("speed: {} | ", app.speed.label())),
        Span::raw(app.message.clone()),
    ]);
    let status_bar =
        Paragraph::new(vec![status]).block(Pane::default().borders(Borders::ALL).title(app.title()));
    f.render_widget(status_bar, rows[1]);
}

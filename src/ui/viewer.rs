use std::io;
use std::process::{Command, Stdio};
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::logging;
use crate::models::WindowType;
use crate::navigation::{NavEvent, Navigator};
use crate::settings::{CfgDefaultKeymaps, VIEWER_PRESET_LIST};
use crate::state::State;
use crate::ui::player::{CommandPlayer, PlayerEvent};
use crate::ui::screen::Screen;
use crate::ui::windows::{help::HelpWindow, selector::SelectorWindow};

pub type VerseNavigator = Navigator<State, CommandPlayer, Screen>;

/// Open the database, load the catalog and seed the navigator.
pub fn open_navigator(config: &Config) -> crate::error::Result<VerseNavigator> {
    let state = State::open(&config.database_path())?;
    let catalog = Catalog::load(&state, &config.media_root())?;
    let player = CommandPlayer::new(&config.settings.audio_player);
    Navigator::new(catalog, state, player, Screen::default())
}

pub enum Session {
    Ready(Box<VerseNavigator>),
    /// Startup failed; only the error screen is shown.
    Failed(String),
}

impl Session {
    pub fn start(config: &Config) -> Self {
        match open_navigator(config) {
            Ok(navigator) => Session::Ready(Box::new(navigator)),
            Err(err) => {
                logging::error(format!("startup failed: {err}"));
                Session::Failed(format!("Error initializing app: {err}"))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum MessageType {
    #[default]
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub active_window: WindowType,
    pub surah_selected_index: usize,
    pub verse_selected_index: usize,
    pub message: Option<String>,
    pub message_type: MessageType,
}

impl UiState {
    pub fn set_message(&mut self, message: String, message_type: MessageType) {
        self.message = Some(message);
        self.message_type = message_type;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn open_window(&mut self, window_type: WindowType) {
        self.active_window = window_type;
    }
}

/// Whether a configured binding such as `"l"`, `"Space"` or `"Ctrl+n"`
/// matches a key press.
pub fn binding_matches(binding: &str, key: &KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if let Some(rest) = binding.strip_prefix("Ctrl+") {
        let mut chars = rest.chars();
        return match (chars.next(), chars.next(), key.code) {
            (Some(expected), None, KeyCode::Char(c)) => ctrl && c.eq_ignore_ascii_case(&expected),
            _ => false,
        };
    }
    if ctrl {
        return false;
    }
    match binding {
        "Space" => key.code == KeyCode::Char(' '),
        "Enter" => key.code == KeyCode::Enter,
        "Tab" => key.code == KeyCode::Tab,
        "Esc" => key.code == KeyCode::Esc,
        _ => {
            let mut chars = binding.chars();
            match (chars.next(), chars.next()) {
                (Some(expected), None) => key.code == KeyCode::Char(expected),
                _ => false,
            }
        }
    }
}

/// Shared list movement for the selector popups. Returns false for keys
/// that are not movement keys.
fn move_selection(index: &mut usize, count: usize, key: &KeyEvent) -> bool {
    if count == 0 {
        return false;
    }
    let last = count - 1;
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => *index = (*index + 1).min(last),
        KeyCode::Up | KeyCode::Char('k') => *index = index.saturating_sub(1),
        KeyCode::PageDown => *index = (*index + 10).min(last),
        KeyCode::PageUp => *index = index.saturating_sub(10),
        KeyCode::Home | KeyCode::Char('g') => *index = 0,
        KeyCode::End | KeyCode::Char('G') => *index = last,
        _ => return false,
    }
    true
}

/// Terminal front end driving a [`VerseNavigator`].
pub struct Viewer {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    session: Session,
    ui_state: UiState,
    should_quit: bool,
}

impl Viewer {
    pub fn new(config: Config) -> eyre::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        let session = Session::start(&config);

        let mut viewer = Self {
            terminal,
            config,
            session,
            ui_state: UiState::default(),
            should_quit: false,
        };
        if viewer.config.settings.autoplay_on_start {
            viewer.dispatch(NavEvent::PlayRequested);
        }
        Ok(viewer)
    }

    /// Run the main application loop
    pub fn run(&mut self) -> eyre::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;

        self.terminal.clear()?;
        self.terminal.hide_cursor()?;

        let result = self.event_loop();

        if let Session::Ready(navigator) = &mut self.session {
            navigator.player_mut().stop();
        }

        self.terminal.clear()?;
        self.terminal.show_cursor()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        crossterm::terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(&mut self) -> eyre::Result<()> {
        while !self.should_quit {
            self.poll_player();

            {
                let session = &self.session;
                let ui_state = &self.ui_state;
                let keymap = &self.config.keymap;
                self.terminal
                    .draw(|f| Self::render_static(f, session, ui_state, keymap))?;
            }

            // Poll with timeout so a finished clip is picked up without a key press
            let poll_timeout = if self.is_playing() {
                Duration::from_millis(200)
            } else {
                Duration::from_secs(1)
            };
            if !crossterm::event::poll(poll_timeout)? {
                continue;
            }

            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }
        Ok(())
    }

    fn is_playing(&self) -> bool {
        match &self.session {
            Session::Ready(navigator) => navigator.player().is_playing(),
            Session::Failed(_) => false,
        }
    }

    fn poll_player(&mut self) {
        let event = match &mut self.session {
            Session::Ready(navigator) => navigator.player_mut().poll_event(),
            Session::Failed(_) => None,
        };
        match event {
            Some(PlayerEvent::Completed) => self.dispatch(NavEvent::PlaybackCompleted),
            Some(PlayerEvent::Failed(reason)) => {
                logging::warn(format!("playback stopped: {reason}"));
                self.ui_state
                    .set_message(format!("Playback stopped: {reason}"), MessageType::Warning);
            }
            None => {}
        }
    }

    fn dispatch(&mut self, event: NavEvent) {
        let Session::Ready(navigator) = &mut self.session else {
            return;
        };
        let result = navigator.dispatch(event);
        if let Err(err) = result {
            logging::error(format!("navigation failed: {err}"));
            self.ui_state.set_message(err.to_string(), MessageType::Error);
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.ui_state.message.is_some() {
            self.ui_state.clear_message();
        }

        let is_quit = binding_matches(&self.config.keymap.quit, &key)
            || binding_matches("Ctrl+c", &key);

        if matches!(self.session, Session::Failed(_)) {
            if is_quit || key.code == KeyCode::Esc {
                self.should_quit = true;
            }
            return;
        }

        match self.ui_state.active_window {
            WindowType::Viewer => {
                if is_quit || key.code == KeyCode::Esc {
                    self.should_quit = true;
                } else {
                    self.handle_viewer_keys(key);
                }
            }
            WindowType::SurahList => self.handle_surah_list_keys(key),
            WindowType::VerseList => self.handle_verse_list_keys(key),
            WindowType::Help => self.ui_state.open_window(WindowType::Viewer),
        }
    }

    fn handle_viewer_keys(&mut self, key: KeyEvent) {
        let keymap = self.config.keymap.clone();
        if binding_matches(&keymap.next_verse, &key)
            || matches!(key.code, KeyCode::Right | KeyCode::Down)
        {
            self.dispatch(NavEvent::Next);
        } else if binding_matches(&keymap.prev_verse, &key)
            || matches!(key.code, KeyCode::Left | KeyCode::Up)
        {
            self.dispatch(NavEvent::Previous);
        } else if binding_matches(&keymap.play, &key) || key.code == KeyCode::Char(' ') {
            self.dispatch(NavEvent::PlayRequested);
        } else if binding_matches(&keymap.select_surah, &key) {
            self.open_surah_list();
        } else if binding_matches(&keymap.select_verse, &key) {
            self.open_verse_list();
        } else if binding_matches(&keymap.open_image, &key) {
            self.open_current_image();
        } else if binding_matches(&keymap.help, &key) {
            self.ui_state.open_window(WindowType::Help);
        }
    }

    fn handle_surah_list_keys(&mut self, key: KeyEvent) {
        let Session::Ready(navigator) = &self.session else {
            return;
        };
        let names: Vec<String> = navigator
            .catalog()
            .surah_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        if move_selection(&mut self.ui_state.surah_selected_index, names.len(), &key) {
            return;
        }
        match key.code {
            KeyCode::Enter => {
                self.ui_state.open_window(WindowType::Viewer);
                if let Some(name) = names.get(self.ui_state.surah_selected_index) {
                    self.select_surah(name.clone());
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => self.ui_state.open_window(WindowType::Viewer),
            _ => {}
        }
    }

    fn handle_verse_list_keys(&mut self, key: KeyEvent) {
        let Session::Ready(navigator) = &self.session else {
            return;
        };
        let choices = navigator.view().verse_choices();

        if move_selection(&mut self.ui_state.verse_selected_index, choices.len(), &key) {
            return;
        }
        match key.code {
            KeyCode::Enter => {
                self.ui_state.open_window(WindowType::Viewer);
                if let Some(verse_number) = choices.get(self.ui_state.verse_selected_index) {
                    self.select_verse(*verse_number);
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => self.ui_state.open_window(WindowType::Viewer),
            _ => {}
        }
    }

    fn open_surah_list(&mut self) {
        let Session::Ready(navigator) = &self.session else {
            return;
        };
        let selected = &navigator.view().selected_surah;
        self.ui_state.surah_selected_index = navigator
            .catalog()
            .surah_names()
            .iter()
            .position(|name| *name == selected.as_str())
            .unwrap_or(0);
        self.ui_state.open_window(WindowType::SurahList);
    }

    fn open_verse_list(&mut self) {
        let Session::Ready(navigator) = &self.session else {
            return;
        };
        let screen = navigator.view();
        self.ui_state.verse_selected_index = screen
            .verse_choices()
            .iter()
            .position(|n| *n == screen.selected_verse)
            .unwrap_or(0);
        self.ui_state.open_window(WindowType::VerseList);
    }

    // The screen picks up the new surah and verse from the navigator's
    // refresh, so a failed move leaves the selectors as they were.
    fn select_surah(&mut self, surah_name: String) {
        self.dispatch(NavEvent::SurahSelectionChanged(surah_name));
    }

    fn select_verse(&mut self, verse_number: u32) {
        let Session::Ready(navigator) = &self.session else {
            return;
        };
        let surah_name = navigator.view().selected_surah.clone();
        self.dispatch(NavEvent::JumpTo {
            surah_name,
            verse_number,
        });
    }

    fn open_current_image(&mut self) {
        let Session::Ready(navigator) = &self.session else {
            return;
        };
        let Some(path) = navigator.view().image_path.clone() else {
            return;
        };
        if !path.exists() {
            self.ui_state.set_message(
                format!("Image not found: {}", path.display()),
                MessageType::Warning,
            );
            return;
        }

        let configured = self.config.settings.default_viewer.as_str();
        let viewers_to_try: Vec<&str> = if configured == "auto" {
            VIEWER_PRESET_LIST.to_vec()
        } else {
            vec![configured]
        };

        for viewer in viewers_to_try {
            let spawned = Command::new(viewer)
                .arg(&path)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            if spawned.is_ok() {
                logging::debug(format!("opened {} with {viewer}", path.display()));
                return;
            }
        }

        self.ui_state.set_message(
            "Failed to open image with any available viewer".to_string(),
            MessageType::Error,
        );
    }

    fn render_static(
        frame: &mut Frame,
        session: &Session,
        ui_state: &UiState,
        keymap: &CfgDefaultKeymaps,
    ) {
        match session {
            Session::Failed(message) => Self::render_failure_static(frame, message),
            Session::Ready(navigator) => {
                Self::render_viewer_static(frame, navigator, keymap);

                match ui_state.active_window {
                    WindowType::Help => HelpWindow::render(frame, frame.area(), keymap),
                    WindowType::SurahList => {
                        let entries: Vec<String> = navigator
                            .catalog()
                            .surah_names()
                            .into_iter()
                            .map(str::to_string)
                            .collect();
                        SelectorWindow::render(
                            frame,
                            frame.area(),
                            "Select Surah",
                            &entries,
                            ui_state.surah_selected_index,
                        );
                    }
                    WindowType::VerseList => {
                        let screen = navigator.view();
                        let entries: Vec<String> = screen
                            .verse_choices()
                            .iter()
                            .map(u32::to_string)
                            .collect();
                        SelectorWindow::render(
                            frame,
                            frame.area(),
                            &format!("Select Ayah - {}", screen.selected_surah),
                            &entries,
                            ui_state.verse_selected_index,
                        );
                    }
                    WindowType::Viewer => {}
                }
            }
        }

        if let Some(ref message) = ui_state.message {
            Self::render_message_static(frame, message, &ui_state.message_type);
        }
    }

    fn render_viewer_static(frame: &mut Frame, navigator: &VerseNavigator, keymap: &CfgDefaultKeymaps) {
        let screen = navigator.view();
        let player = navigator.player();
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

        let position = format!(
            " {} / {} ",
            navigator.current_index() + 1,
            navigator.catalog().len()
        );
        let status = Paragraph::new(Line::from(Span::styled(
            screen.status.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().title(position).borders(Borders::ALL));
        frame.render_widget(status, chunks[0]);

        let selector = Paragraph::new(screen.selector_text())
            .block(Block::default().title("Selection").borders(Borders::ALL));
        frame.render_widget(selector, chunks[1]);

        let image_text = match &screen.image_path {
            Some(path) => path.display().to_string(),
            None => String::new(),
        };
        let image = Paragraph::new(image_text)
            .block(Block::default().title("Image").borders(Borders::ALL));
        frame.render_widget(image, chunks[2]);

        let audio_state = if player.is_playing() { "Playing" } else { "Stopped" };
        let audio_text = match &screen.audio_path {
            Some(path) => format!("{audio_state}: {}", path.display()),
            None => audio_state.to_string(),
        };
        let audio = Paragraph::new(audio_text)
            .block(Block::default().title("Audio").borders(Borders::ALL));
        frame.render_widget(audio, chunks[3]);

        let hints = format!(
            " {} next  {} prev  {} play  {} surah  {} ayah  {} image  {} help  {} quit",
            keymap.next_verse,
            keymap.prev_verse,
            keymap.play,
            keymap.select_surah,
            keymap.select_verse,
            keymap.open_image,
            keymap.help,
            keymap.quit
        );
        let hint_line = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint_line, chunks[5]);
    }

    fn render_failure_static(frame: &mut Frame, message: &str) {
        let text = vec![
            Line::from(Span::styled(
                message,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press q to quit",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, frame.area());
    }

    fn render_message_static(frame: &mut Frame, message: &str, message_type: &MessageType) {
        let color = match message_type {
            MessageType::Info => Color::Blue,
            MessageType::Warning => Color::Yellow,
            MessageType::Error => Color::Red,
        };

        let message_paragraph = Paragraph::new(message)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        let frame_area = frame.area();
        let area = Rect {
            x: frame_area.x + 2,
            y: frame_area.y + 2,
            width: frame_area.width.saturating_sub(4),
            height: 3.min(frame_area.height),
        };

        frame.render_widget(Clear, area);
        frame.render_widget(message_paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_binding_matches_single_char() {
        assert!(binding_matches("l", &key(KeyCode::Char('l'))));
        assert!(!binding_matches("l", &key(KeyCode::Char('L'))));
        assert!(!binding_matches("l", &ctrl('l')));
    }

    #[test]
    fn test_binding_matches_named_keys() {
        assert!(binding_matches("Space", &key(KeyCode::Char(' '))));
        assert!(binding_matches("Enter", &key(KeyCode::Enter)));
        assert!(binding_matches("Esc", &key(KeyCode::Esc)));
        assert!(!binding_matches("Space", &key(KeyCode::Enter)));
    }

    #[test]
    fn test_binding_matches_ctrl() {
        assert!(binding_matches("Ctrl+c", &ctrl('c')));
        assert!(binding_matches("Ctrl+c", &ctrl('C')));
        assert!(!binding_matches("Ctrl+c", &key(KeyCode::Char('c'))));
        assert!(!binding_matches("Ctrl+", &ctrl('c')));
    }

    #[test]
    fn test_binding_rejects_multi_char() {
        assert!(!binding_matches("ll", &key(KeyCode::Char('l'))));
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut index = 0;
        assert!(move_selection(&mut index, 3, &key(KeyCode::Up)));
        assert_eq!(index, 0);
        assert!(move_selection(&mut index, 3, &key(KeyCode::Char('j'))));
        assert!(move_selection(&mut index, 3, &key(KeyCode::Down)));
        assert!(move_selection(&mut index, 3, &key(KeyCode::Down)));
        assert_eq!(index, 2);
        assert!(move_selection(&mut index, 3, &key(KeyCode::Home)));
        assert_eq!(index, 0);
        assert!(move_selection(&mut index, 3, &key(KeyCode::PageDown)));
        assert_eq!(index, 2);
        assert!(!move_selection(&mut index, 3, &key(KeyCode::Enter)));
        assert!(!move_selection(&mut index, 0, &key(KeyCode::Down)));
    }

    fn config_for(dir: &tempfile::TempDir, db_name: &str) -> Config {
        let mut config = Config::load_from(dir.path().join("configuration.json")).unwrap();
        config.settings.database = dir.path().join(db_name).to_string_lossy().to_string();
        config.settings.media_root = dir.path().join("q_files").to_string_lossy().to_string();
        config
    }

    #[test]
    fn test_session_start_with_empty_catalog_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir, "aya.db");

        let session = Session::start(&config);
        assert!(matches!(
            session,
            Session::Failed(ref m)
                if m.starts_with("Error initializing app:") && m.contains("catalog unavailable")
        ));
    }

    #[test]
    fn test_session_start_with_unreadable_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("aya.db"), vec![b'g'; 4096]).unwrap();
        let config = config_for(&dir, "aya.db");

        assert!(matches!(
            Session::start(&config),
            Session::Failed(m) if m.contains("catalog unavailable")
        ));
    }

    #[test]
    fn test_session_start_with_catalog_is_ready() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir, "aya.db");
        {
            let conn = rusqlite::Connection::open(config.database_path()).unwrap();
            conn.execute_batch(
                "CREATE TABLE all_aya (
                    id INTEGER PRIMARY KEY, audio TEXT, image TEXT,
                    sura INTEGER, aya INTEGER, aya_suffix INTEGER, sura_name TEXT
                 );
                 INSERT INTO all_aya VALUES (1, '001001.mp3', '001001.png', 1, 1, NULL, 'Al-Fatiha');",
            )
            .unwrap();
        }

        match Session::start(&config) {
            Session::Ready(navigator) => {
                assert_eq!(navigator.view().status, "Surah Al-Fatiha - Ayah 1");
                assert!(!navigator.player().is_playing());
            }
            Session::Failed(m) => panic!("startup failed: {m}"),
        }
    }

    #[test]
    fn test_ui_state_messages() {
        let mut ui_state = UiState::default();
        assert_eq!(ui_state.active_window, WindowType::Viewer);
        ui_state.set_message("could not persist position".to_string(), MessageType::Error);
        assert!(ui_state.message.is_some());
        ui_state.clear_message();
        assert!(ui_state.message.is_none());
        ui_state.open_window(WindowType::SurahList);
        assert_eq!(ui_state.active_window, WindowType::SurahList);
    }
}

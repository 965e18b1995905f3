use std::{
    io::stdout,
    sync::{Arc, Mutex},
    time::Instant,
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Terminal,
};

use crate::{
    service::data_manager::DataManager,
    ui::{menu::Menu, views::RenderableView, Controller, RenderContext, ACCENT},
};

use super::ReplError;

enum AppState {
    Menu,
    ViewingOutput(Box<dyn RenderableView>),
    Error(String),
}

struct App {
    state: AppState,
    menu: Menu,
    should_quit: bool,
    scroll_offset: u16,
    pressed_keys: Vec<KeyCode>,
    last_refresh: Option<Instant>,
    panic_flag: Arc<Mutex<Option<String>>>,
}

impl App {
    fn new(panic_flag: Arc<Mutex<Option<String>>>) -> Self {
        Self {
            menu: Menu::new(),
            should_quit: false,
            state: AppState::Menu,
            scroll_offset: 0,
            pressed_keys: Vec::new(),
            last_refresh: None,
            panic_flag,
        }
    }

    fn is_in_menu(&self) -> bool {
        matches!(self.state, AppState::Menu)
    }

    fn is_in_subview(&self) -> bool {
        matches!(self.state, AppState::ViewingOutput(_))
    }

    fn next(&mut self) {
        match &self.state {
            AppState::Menu => self.menu.next(),
            AppState::ViewingOutput(_) | AppState::Error(_) => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
        }
    }

    fn previous(&mut self) {
        match &self.state {
            AppState::Menu => self.menu.previous(),
            AppState::ViewingOutput(_) | AppState::Error(_) => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
        }
    }

    fn page_down(&mut self, amount: u16) {
        if self.is_in_subview() {
            self.scroll_offset = self.scroll_offset.saturating_add(amount);
        }
    }

    fn page_up(&mut self, amount: u16) {
        if self.is_in_subview() {
            self.scroll_offset = self.scroll_offset.saturating_sub(amount);
        }
    }

    fn should_refresh_view(&self) -> bool {
        if let AppState::ViewingOutput(view) = &self.state {
            if let Some(interval) = view.auto_refresh_interval() {
                return match self.last_refresh {
                    Some(last) => last.elapsed().as_secs_f32() >= interval,
                    None => true,
                };
            }
        }
        false
    }

    fn refresh_current_view(&mut self, controller: &Controller, reset_scroll: bool) {
        if let AppState::ViewingOutput(view) = &mut self.state {
            let _ = view.refresh_data(controller);
            self.last_refresh = Some(Instant::now());
            if reset_scroll {
                self.scroll_offset = 0;
            }
        }
    }

    fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
        manager: &DataManager,
    ) -> Result<(), ReplError> {
        let display_name = manager.get_profile().display_name.clone();
        let ctrl = Controller { manager };

        loop {
            // A panic on any worker thread lands on the error screen.
            if let Ok(panic_guard) = self.panic_flag.lock() {
                if let Some(panic_msg) = panic_guard.as_ref() {
                    self.state = AppState::Error(panic_msg.clone());
                }
            }

            // An invalidated session is fatal for this run; there is no
            // silent re-login.
            if manager.session_expired() && !matches!(self.state, AppState::Error(_)) {
                self.state = AppState::Error(
                    "Your session has expired (the server answered 401). Restart and log in again.".to_string(),
                );
            }

            if self.should_refresh_view() {
                self.refresh_current_view(&ctrl, false);
            }

            let mut view_height = 0;
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
                    .split(f.size());
                view_height = chunks[1].height;

                let title = Paragraph::new(format!(" Welcome, {}!", display_name))
                    .style(Style::default().add_modifier(Modifier::BOLD))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(ACCENT))
                            .title("Riftboost - LoL Boosting Marketplace")
                            .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
                    );
                f.render_widget(title, chunks[0]);

                let info = match &self.state {
                    AppState::Menu => {
                        "Use ↑/↓ to navigate, Enter to select, r to refresh data, q to quit.".to_string()
                    }
                    AppState::ViewingOutput(_) => {
                        "Use ↑/↓ or PgUp/PgDown to scroll, r to refresh, Esc to return.".to_string()
                    }
                    AppState::Error(_) => "Press 'q' to quit.".to_string(),
                };
                let info_paragraph = Paragraph::new(info)
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Right);
                f.render_widget(info_paragraph, chunks[2]);

                match &mut self.state {
                    AppState::Error(message) => {
                        let error_block = Block::default()
                            .borders(Borders::ALL)
                            .title("ERROR")
                            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                            .padding(Padding::horizontal(1))
                            .border_style(Style::default().fg(Color::Red));

                        let error_text = Paragraph::new(message.as_str())
                            .block(error_block)
                            .wrap(Wrap { trim: false })
                            .scroll((self.scroll_offset, 0))
                            .style(Style::default().fg(Color::Red));

                        f.render_widget(error_text, chunks[1]);
                    }
                    AppState::Menu => self.menu.render(f, chunks[1]),
                    AppState::ViewingOutput(view) => {
                        // Views see every key that the REPL did not claim.
                        view.update(&ctrl, &self.pressed_keys);
                        self.pressed_keys.clear();

                        let block = Block::default()
                            .borders(Borders::ALL)
                            .padding(Padding::horizontal(1))
                            .title(view.title().to_string())
                            .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
                            .border_style(Style::default().fg(ACCENT));

                        let rc = RenderContext {
                            frame: f,
                            area: chunks[1],
                            scroll_offset: self.scroll_offset,
                            block,
                        };
                        let _ = view.render(rc);
                    }
                }
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    match key.code {
                        KeyCode::Char('q') if !self.is_in_subview() => {
                            self.should_quit = true;
                        }
                        KeyCode::Char('r') if self.is_in_menu() => {
                            manager.refresh();
                        }
                        KeyCode::Char('r') if self.is_in_subview() => {
                            self.refresh_current_view(&ctrl, true);
                        }
                        KeyCode::Up => self.previous(),
                        KeyCode::Down => self.next(),
                        KeyCode::PageUp => self.page_up(view_height / 2),
                        KeyCode::PageDown => self.page_down(view_height / 2),
                        KeyCode::Esc if self.is_in_subview() => {
                            self.state = AppState::Menu;
                            self.scroll_offset = 0;
                            self.last_refresh = None;
                        }
                        KeyCode::Enter if self.is_in_menu() => {
                            if let Some(factory) = self.menu.get_factory() {
                                let view = factory(&ctrl);

                                terminal.clear()?;
                                self.state = AppState::ViewingOutput(view);
                                self.scroll_offset = 0;
                                self.last_refresh = Some(Instant::now());
                            }
                        }
                        _ => {
                            self.pressed_keys.push(key.code);
                        }
                    }
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }
}

pub fn run(manager: DataManager) -> Result<(), ReplError> {
    #[cfg(debug_assertions)]
    {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let panic_flag = Arc::new(Mutex::new(None));
    let panic_flag_hook = panic_flag.clone();

    // Raw mode eats the default panic output, so capture it for the error
    // screen instead.
    std::panic::set_hook(Box::new(move |panic_info| {
        let mut msg = String::from("Application panicked!\n\n");

        if let Some(location) = panic_info.location() {
            msg.push_str(&format!(
                "Location: {}:{}:{}\n\n",
                location.file(),
                location.line(),
                location.column()
            ));
        }

        msg.push_str("Message:\n");
        if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            msg.push_str(&format!("  {}\n\n", s));
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            msg.push_str(&format!("  {}\n\n", s));
        } else {
            msg.push_str("  <no message>\n\n");
        }

        let backtrace_enabled = std::env::var("RUST_BACKTRACE")
            .map(|v| v == "1" || v.to_lowercase() == "full")
            .unwrap_or(false);
        if backtrace_enabled {
            let backtrace = std::backtrace::Backtrace::force_capture();
            msg.push_str(&format!("Backtrace:\n{}\n", backtrace));
        } else {
            msg.push_str("Backtrace: <disabled - run with RUST_BACKTRACE=1 to enable>\n");
        }

        if let Ok(mut panic_info_guard) = panic_flag_hook.lock() {
            *panic_info_guard = Some(msg);
        }
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(panic_flag);
    let result = app.run(&mut terminal, &manager);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        eprintln!("Error: {}", err);
    }

    result
}

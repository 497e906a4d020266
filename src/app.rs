use crate::api::{CachedCatalogClient, CatalogClient};
use crate::auth::{Session, SessionManager};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::state::ListStore;
use crate::storage::Stores;
use crate::ui;
use crate::ui::renderfns::extract_domain;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{LoginView, ProductListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application state
pub struct App {
  /// Navigation stack - root is the login form or the product list
  view_stack: Vec<Box<dyn View>>,

  config: Config,

  /// Unauthenticated client; authenticated copies are derived per session
  client: CatalogClient,

  stores: Stores,

  sessions: SessionManager,

  session: Option<Session>,

  title: String,

  should_quit: bool,
}

impl App {
  pub fn new(config: Config, stores: Stores) -> Result<Self> {
    let client = CatalogClient::new(&config)?;
    let sessions = SessionManager::new(stores.clone());
    let title = config
      .title
      .clone()
      .unwrap_or_else(|| extract_domain(&config.api.url).to_string());

    let mut app = Self {
      view_stack: Vec::new(),
      config,
      client,
      stores,
      sessions,
      session: None,
      title,
      should_quit: false,
    };

    match app.sessions.restore() {
      Some(session) => app.start_session(session),
      None => app.show_login(),
    }

    Ok(app)
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Cleanup terminal, even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
  ) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) | Some(Event::Resize) => {}
        None => break,
      }

      // Poll on every event so results land even while keys keep coming
      self.tick();
    }

    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let Some(view) = self.view_stack.last_mut() else {
      return;
    };

    // Global keys only apply while no text field owns the keyboard
    if !view.is_capturing_input() && key.code == KeyCode::Char('q') {
      self.apply(ViewAction::Pop);
      return;
    }

    let action = view.handle_key(key);
    self.apply(action);
  }

  fn tick(&mut self) {
    // Every view polls so background results are not left in channels;
    // only the top view may navigate.
    let top = self.view_stack.len().saturating_sub(1);
    let mut top_action = ViewAction::None;
    for (i, view) in self.view_stack.iter_mut().enumerate() {
      let action = view.tick();
      if i == top {
        top_action = action;
      }
    }
    self.apply(top_action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::Quit => self.should_quit = true,
      ViewAction::LoggedIn(session) => self.start_session(session),
      ViewAction::Logout => {
        self.sessions.logout();
        self.show_login();
      }
    }
  }

  fn start_session(&mut self, session: Session) {
    let page_size = self.config.list.page_size;
    let catalog = CachedCatalogClient::new(
      self.client.with_token(session.token.clone()),
      page_size,
      self.config.stale_time(),
    );
    let store = ListStore::load(self.stores.durable.clone(), page_size);

    let view: Box<dyn View> = Box::new(ProductListView::new(catalog, store, &self.config));
    self.view_stack = vec![view];
    self.session = Some(session);
  }

  fn show_login(&mut self) {
    let username = self
      .session
      .take()
      .map(|s| s.user.username)
      .or_else(Config::default_username);
    let view: Box<dyn View> = Box::new(LoginView::new(
      self.client.clone(),
      self.sessions.clone(),
      username,
    ));
    self.view_stack = vec![view];
  }

  // Accessors for UI rendering
  pub fn current_view(&self) -> Option<&dyn View> {
    self.view_stack.last().map(|v| &**v)
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn user_label(&self) -> Option<&str> {
    self.session.as_ref().map(|s| s.user.display_name())
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self.view_stack.iter().map(|v| v.breadcrumb_label()).collect()
  }
}

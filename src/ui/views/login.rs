use crate::api::CatalogClient;
use crate::auth::{failure_message, Session, SessionManager};
use crate::query::Query;
use crate::ui::centered_rect;
use crate::ui::components::{InputResult, TextInput};
use crate::ui::view::{Shortcut, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
  Username,
  Password,
  RememberMe,
}

impl Focus {
  fn next(self) -> Self {
    match self {
      Focus::Username => Focus::Password,
      Focus::Password => Focus::RememberMe,
      Focus::RememberMe => Focus::Username,
    }
  }

  fn previous(self) -> Self {
    match self {
      Focus::Username => Focus::RememberMe,
      Focus::Password => Focus::Username,
      Focus::RememberMe => Focus::Password,
    }
  }
}

/// Sign-in form
pub struct LoginView {
  client: CatalogClient,
  sessions: SessionManager,
  username: TextInput,
  password: TextInput,
  remember_me: bool,
  focus: Focus,
  username_error: Option<String>,
  password_error: Option<String>,
  banner: Option<String>,
  query: Query<Session>,
}

impl LoginView {
  pub fn new(client: CatalogClient, sessions: SessionManager, username: Option<String>) -> Self {
    let focus = if username.is_some() {
      Focus::Password
    } else {
      Focus::Username
    };

    Self {
      client,
      sessions,
      username: TextInput::with_value(username.unwrap_or_default()),
      password: TextInput::masked(),
      remember_me: false,
      focus,
      username_error: None,
      password_error: None,
      banner: None,
      query: Query::manual(),
    }
  }

  fn submit(&mut self) {
    if self.query.is_loading() {
      return;
    }

    let username = self.username.value().to_string();
    let password = self.password.value().to_string();

    self.banner = None;
    self.username_error = None;
    self.password_error = None;
    for err in SessionManager::validate(&username, &password) {
      match err.field() {
        Some("username") => self.username_error = Some(failure_message(&err)),
        Some("password") => self.password_error = Some(failure_message(&err)),
        _ => {}
      }
    }
    if self.username_error.is_some() || self.password_error.is_some() {
      return;
    }

    let client = self.client.clone();
    let sessions = self.sessions.clone();
    let remember_me = self.remember_me;
    self.query.run(async move {
      sessions
        .login(&client, &username, &password, remember_me)
        .await
    });
  }

  fn render_form(&self, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(54, 13, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
      .title(" Sign in ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let label = |focus: Focus, text: &'static str| {
      let style = if self.focus == focus {
        Style::default().fg(Color::Yellow).bold()
      } else {
        Style::default().fg(Color::DarkGray)
      };
      Span::styled(format!("{:<10}", text), style)
    };
    let error_line = |error: &Option<String>| match error {
      Some(message) => Line::from(Span::styled(
        format!("{:10}{}", "", message),
        Style::default().fg(Color::Red),
      )),
      None => Line::raw(""),
    };

    let mut username = vec![label(Focus::Username, "Username")];
    username.extend(self.username.spans(self.focus == Focus::Username));
    let mut password = vec![label(Focus::Password, "Password")];
    password.extend(self.password.spans(self.focus == Focus::Password));

    let checkbox = if self.remember_me { "[x]" } else { "[ ]" };
    let remember = Line::from(vec![
      label(Focus::RememberMe, "Remember"),
      Span::raw(format!("{} keep me signed in", checkbox)),
    ]);

    let status = if let Some(banner) = &self.banner {
      Line::from(Span::styled(
        banner.clone(),
        Style::default().fg(Color::Red).bold(),
      ))
    } else if self.query.is_loading() {
      Line::from(Span::styled(
        "Signing in…",
        Style::default().fg(Color::DarkGray),
      ))
    } else {
      Line::raw("")
    };

    let lines = vec![
      Line::raw(""),
      Line::from(username),
      error_line(&self.username_error),
      Line::from(password),
      error_line(&self.password_error),
      remember,
      Line::raw(""),
      status,
      Line::raw(""),
      Line::from(Span::styled(
        "Enter sign in · Tab next · Space toggle · Esc quit",
        Style::default().fg(Color::DarkGray),
      )),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
  }
}

impl View for LoginView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Esc => return ViewAction::Quit,
      KeyCode::Tab | KeyCode::Down => {
        self.focus = self.focus.next();
        return ViewAction::None;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = self.focus.previous();
        return ViewAction::None;
      }
      KeyCode::Enter => {
        self.submit();
        return ViewAction::None;
      }
      _ => {}
    }

    let result = match self.focus {
      Focus::Username => self.username.handle_key(key),
      Focus::Password => self.password.handle_key(key),
      Focus::RememberMe => {
        if key.code == KeyCode::Char(' ') {
          self.remember_me = !self.remember_me;
        }
        return ViewAction::None;
      }
    };

    if result == InputResult::Changed {
      match self.focus {
        Focus::Username => self.username_error = None,
        Focus::Password => self.password_error = None,
        Focus::RememberMe => {}
      }
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_form(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Sign in".to_string()
  }

  fn tick(&mut self) -> ViewAction {
    if !self.query.poll() {
      return ViewAction::None;
    }

    if let Some(err) = self.query.error() {
      match err.field() {
        Some("username") => self.username_error = Some(failure_message(err)),
        Some("password") => self.password_error = Some(failure_message(err)),
        _ => self.banner = Some(failure_message(err)),
      }
      self.password.clear();
      return ViewAction::None;
    }

    match self.query.data() {
      Some(session) => ViewAction::LoggedIn(session.clone()),
      None => ViewAction::None,
    }
  }

  fn is_capturing_input(&self) -> bool {
    true
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("enter", "sign in").with_priority(10),
      Shortcut::new("tab", "next field").with_priority(20),
      Shortcut::new("esc", "quit").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::Stores;
  use crossterm::event::KeyModifiers;
  use std::time::Duration;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn view(base: &str) -> LoginView {
    let client = CatalogClient::with_base_url(base, Duration::from_secs(1)).unwrap();
    LoginView::new(client, SessionManager::new(Stores::in_memory()), None)
  }

  fn type_str(view: &mut LoginView, s: &str) {
    for c in s.chars() {
      view.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_prefilled_username_focuses_password() {
    let client = CatalogClient::with_base_url("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let view = LoginView::new(
      client,
      SessionManager::new(Stores::in_memory()),
      Some("emilys".to_string()),
    );
    assert_eq!(view.focus, Focus::Password);
    assert_eq!(view.username.value(), "emilys");
  }

  #[test]
  fn test_invalid_form_shows_field_errors_without_request() {
    let mut v = view("http://127.0.0.1:9");
    type_str(&mut v, "emilys");
    v.handle_key(key(KeyCode::Tab));
    type_str(&mut v, "123");
    v.handle_key(key(KeyCode::Enter));

    assert_eq!(v.username_error, None);
    assert_eq!(
      v.password_error.as_deref(),
      Some("password must be at least 6 characters")
    );
    assert!(!v.query.is_loading());

    type_str(&mut v, "4");
    assert_eq!(v.password_error, None);
  }

  #[test]
  fn test_space_toggles_remember_me() {
    let mut v = view("http://127.0.0.1:9");
    v.handle_key(key(KeyCode::BackTab));
    assert_eq!(v.focus, Focus::RememberMe);
    v.handle_key(key(KeyCode::Char(' ')));
    assert!(v.remember_me);
  }

  #[tokio::test]
  async fn test_failed_login_shows_generic_banner() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut v = view(&base);
    type_str(&mut v, "emilys");
    v.handle_key(key(KeyCode::Tab));
    type_str(&mut v, "emilyspass");
    v.handle_key(key(KeyCode::Enter));

    for _ in 0..200 {
      tokio::time::sleep(Duration::from_millis(10)).await;
      assert!(matches!(v.tick(), ViewAction::None));
      if !v.query.is_loading() {
        break;
      }
    }

    assert_eq!(v.banner.as_deref(), Some(crate::auth::LOGIN_FAILED_MESSAGE));
    assert!(v.password.is_empty());
  }
}

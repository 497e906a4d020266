use crate::auth::Session;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

pub type Shortcut = ShortcutInfo;

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
  /// Leave the application
  Quit,
  /// Login succeeded; replace the stack with the product list
  LoggedIn(Session),
  /// Drop the session and return to the login form
  Logout,
}

/// Trait for view behavior
///
/// Views handle their own input modes (search, dialogs) and return
/// actions for the App to execute: App → View → Components.
///
/// Views that load data asynchronously use Query<T> internally and
/// poll it in `tick()`.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Called on each tick to poll queries and timers
  fn tick(&mut self) -> ViewAction {
    ViewAction::None
  }

  /// True while a text field owns the keyboard; the app then skips its
  /// global keys and forwards everything to the view
  fn is_capturing_input(&self) -> bool {
    false
  }

  /// Keyboard shortcuts to display in the header
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![ShortcutInfo::new("q", "back").with_priority(90)]
  }
}

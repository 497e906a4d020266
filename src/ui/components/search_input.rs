use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::state::{SearchController, SearchPhase};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use std::time::Duration;

/// Events emitted by the search box that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// The committed search term changed
  Committed(String),
}

/// Search box: echoes keystrokes immediately and commits the term through
/// the debounced controller.
#[derive(Debug, Clone)]
pub struct SearchInput {
  input: TextInput,
  controller: SearchController,
  active: bool,
}

impl SearchInput {
  pub fn new(committed: &str, delay: Duration, min_chars: usize) -> Self {
    Self {
      input: TextInput::with_value(committed),
      controller: SearchController::new(committed, delay, min_chars),
      active: false,
    }
  }

  /// Check if the box has keyboard focus
  pub fn is_active(&self) -> bool {
    self.active
  }

  #[cfg(test)]
  pub fn draft(&self) -> &str {
    self.controller.draft()
  }

  pub fn activate(&mut self) {
    self.active = true;
  }

  /// Follow a committed term set from elsewhere
  pub fn sync(&mut self, committed: &str) {
    self.controller.sync(committed);
    self.input.set_value(committed);
  }

  /// Call on every tick; reports a term whose quiet period elapsed
  pub fn poll(&mut self) -> Option<SearchEvent> {
    self.controller.poll().map(SearchEvent::Committed)
  }

  /// Handle a key event. Call this regardless of focus: `/` activates.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Changed => {
        self.controller.input(self.input.value());
        KeyResult::Handled
      }
      InputResult::Moved => KeyResult::Handled,
      InputResult::Submitted(_) => {
        self.active = false;
        match self.controller.submit() {
          Some(term) => KeyResult::Event(SearchEvent::Committed(term)),
          None => KeyResult::Handled,
        }
      }
      InputResult::Cancelled => {
        // Leave the box; a pending commit still fires
        self.active = false;
        KeyResult::Handled
      }
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let border = if self.active {
      Color::Yellow
    } else {
      Color::DarkGray
    };
    let title = match self.controller.phase() {
      SearchPhase::Typing => " Search (typing…) ",
      _ => " Search ",
    };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(title);

    let mut spans = vec![Span::styled("/", Style::default().fg(Color::Yellow))];
    if self.input.is_empty() && !self.active {
      spans.push(Span::styled(
        "search products",
        Style::default().fg(Color::DarkGray),
      ));
    } else {
      spans.extend(self.input.spans(self.active));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
  }
}

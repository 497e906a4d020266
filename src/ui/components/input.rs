use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled and the value changed
  Changed,
  /// Key was handled, value unchanged (cursor movement)
  Moved,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Single-line text input.
///
/// The cursor counts characters, not bytes, so non-ASCII input edits
/// correctly.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
  /// Render as bullets (passwords)
  masked: bool,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn masked() -> Self {
    Self {
      masked: true,
      ..Self::default()
    }
  }

  pub fn with_value(value: impl Into<String>) -> Self {
    let mut input = Self::new();
    input.set_value(value);
    input
  }

  /// Get the current input value
  pub fn value(&self) -> &str {
    &self.buffer
  }

  /// Replace the value and move the cursor to the end
  pub fn set_value(&mut self, value: impl Into<String>) {
    self.buffer = value.into();
    self.cursor = self.len();
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  fn len(&self) -> usize {
    self.buffer.chars().count()
  }

  /// Byte offset of the character at `idx`
  fn byte_at(&self, idx: usize) -> usize {
    self
      .buffer
      .char_indices()
      .nth(idx)
      .map(|(i, _)| i)
      .unwrap_or(self.buffer.len())
  }

  /// Handle a key event, returning the result
  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor == 0 {
          return InputResult::Moved;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.buffer.remove(at);
        InputResult::Changed
      }
      KeyCode::Delete => {
        if self.cursor >= self.len() {
          return InputResult::Moved;
        }
        let at = self.byte_at(self.cursor);
        self.buffer.remove(at);
        InputResult::Changed
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        InputResult::Moved
      }
      KeyCode::Right => {
        self.cursor = (self.cursor + 1).min(self.len());
        InputResult::Moved
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Moved
      }
      KeyCode::End => {
        self.cursor = self.len();
        InputResult::Moved
      }
      KeyCode::Char('a') if ctrl => {
        self.cursor = 0;
        InputResult::Moved
      }
      KeyCode::Char('e') if ctrl => {
        self.cursor = self.len();
        InputResult::Moved
      }
      KeyCode::Char('u') if ctrl => {
        // Clear line before cursor
        let at = self.byte_at(self.cursor);
        self.buffer = self.buffer[at..].to_string();
        self.cursor = 0;
        InputResult::Changed
      }
      KeyCode::Char('w') if ctrl => {
        // Delete word before cursor
        let at = self.byte_at(self.cursor);
        let before = &self.buffer[..at];
        let word_start = before.trim_end().rfind(' ').map(|i| i + 1).unwrap_or(0);
        self.buffer = format!("{}{}", &self.buffer[..word_start], &self.buffer[at..]);
        self.cursor = self.buffer[..word_start].chars().count();
        InputResult::Changed
      }
      KeyCode::Char(_) if ctrl => InputResult::NotHandled,
      KeyCode::Char(c) => {
        let at = self.byte_at(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        InputResult::Changed
      }
      _ => InputResult::NotHandled,
    }
  }

  /// Spans for the value with a cursor block when focused
  pub fn spans(&self, focused: bool) -> Vec<Span<'static>> {
    let shown: String = if self.masked {
      "•".repeat(self.len())
    } else {
      self.buffer.clone()
    };

    if !focused {
      return vec![Span::raw(shown)];
    }

    let chars: Vec<char> = shown.chars().collect();
    let before: String = chars[..self.cursor.min(chars.len())].iter().collect();
    let under = chars.get(self.cursor).copied().unwrap_or(' ');
    let after: String = chars
      .get(self.cursor + 1..)
      .map(|rest| rest.iter().collect())
      .unwrap_or_default();

    vec![
      Span::raw(before),
      Span::styled(
        under.to_string(),
        Style::default().add_modifier(Modifier::REVERSED),
      ),
      Span::raw(after),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn ctrl_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::CONTROL)
  }

  fn type_str(input: &mut TextInput, s: &str) {
    for c in s.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_basic_input() {
    let mut input = TextInput::new();
    assert!(input.is_empty());
    assert_eq!(input.handle_key(key(KeyCode::Char('h'))), InputResult::Changed);
    input.handle_key(key(KeyCode::Char('i')));
    assert_eq!(input.value(), "hi");
  }

  #[test]
  fn test_submit_and_cancel() {
    let mut input = TextInput::new();
    type_str(&mut input, "lamp");
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      InputResult::Submitted("lamp".to_string())
    );
    assert_eq!(input.handle_key(key(KeyCode::Esc)), InputResult::Cancelled);
  }

  #[test]
  fn test_cursor_movement_and_backspace() {
    let mut input = TextInput::new();
    type_str(&mut input, "ac");
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Char('b')));
    assert_eq!(input.value(), "abc");

    input.handle_key(key(KeyCode::End));
    assert_eq!(input.handle_key(key(KeyCode::Backspace)), InputResult::Changed);
    assert_eq!(input.value(), "ab");

    input.handle_key(key(KeyCode::Home));
    assert_eq!(input.handle_key(key(KeyCode::Backspace)), InputResult::Moved);
  }

  #[test]
  fn test_multibyte_editing() {
    let mut input = TextInput::new();
    type_str(&mut input, "чай");
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Backspace));
    assert_eq!(input.value(), "чй");
    input.handle_key(key(KeyCode::Delete));
    assert_eq!(input.value(), "ч");
  }

  #[test]
  fn test_ctrl_u_and_ctrl_w() {
    let mut input = TextInput::new();
    type_str(&mut input, "red wireless phone");
    input.handle_key(ctrl_key(KeyCode::Char('w')));
    assert_eq!(input.value(), "red wireless ");

    for _ in 0..5 {
      input.handle_key(key(KeyCode::Left));
    }
    input.handle_key(ctrl_key(KeyCode::Char('u')));
    assert_eq!(input.value(), "less ");
  }

  #[test]
  fn test_unknown_ctrl_chord_is_not_handled() {
    let mut input = TextInput::new();
    assert_eq!(
      input.handle_key(ctrl_key(KeyCode::Char('s'))),
      InputResult::NotHandled
    );
    assert!(input.is_empty());
  }

  #[test]
  fn test_masked_spans_hide_value() {
    let mut input = TextInput::masked();
    input.set_value("secret");
    let text: String = input.spans(false).iter().map(|s| s.content.to_string()).collect();
    assert_eq!(text, "••••••");
  }
}

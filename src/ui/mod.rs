pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::TableState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let [header, content, footer] = Layout::vertical([
    Constraint::Length(1), // Header
    Constraint::Min(1),    // Main content
    Constraint::Length(1), // Footer
  ])
  .areas(frame.area());

  let shortcuts = app.current_view().map(|v| v.shortcuts()).unwrap_or_default();
  renderfns::draw_header(frame, header, app.title(), app.user_label(), &shortcuts);

  if let Some(view) = app.current_view_mut() {
    view.render(frame, content);
  }

  components::draw_footer(frame, footer, &app.breadcrumb(), None);
}

/// Keep the table cursor inside `len` rows
pub fn ensure_valid_selection(state: &mut TableState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    None => state.select(Some(0)),
    Some(i) if i >= len => state.select(Some(len - 1)),
    Some(_) => {}
  }
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect::new(
    area.x + (area.width - width) / 2,
    area.y + (area.height - height) / 2,
    width,
    height,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ensure_valid_selection() {
    let mut state = TableState::default();
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(0));

    state.select(Some(7));
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(2));

    ensure_valid_selection(&mut state, 0);
    assert_eq!(state.selected(), None);
  }

  #[test]
  fn test_centered_rect_fits_small_area() {
    let area = Rect::new(0, 0, 40, 10);
    assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
    assert_eq!(centered_rect(64, 22, area), area);
  }
}

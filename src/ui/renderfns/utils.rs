use ratatui::prelude::*;

/// Truncate a string to a maximum number of characters, adding "..." if
/// truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Ratings below this are highlighted
pub const LOW_RATING: f64 = 3.0;

pub fn rating_style(rating: f64) -> Style {
  if rating < LOW_RATING {
    Style::default().fg(Color::Red).bold()
  } else {
    Style::default()
  }
}

/// How many of the three stock bars are lit, and whether the level is
/// critically low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
  pub filled: usize,
  pub critical: bool,
}

pub fn stock_level(stock: i64) -> StockLevel {
  match stock {
    s if s < 3 => StockLevel {
      filled: 1,
      critical: true,
    },
    s if s < 46 => StockLevel {
      filled: 1,
      critical: false,
    },
    s if s < 90 => StockLevel {
      filled: 2,
      critical: false,
    },
    _ => StockLevel {
      filled: 3,
      critical: false,
    },
  }
}

/// Three-bar stock gauge, lit from the right
pub fn stock_bars(stock: i64) -> Vec<Span<'static>> {
  let level = stock_level(stock);
  let lit = if level.critical {
    Style::default().fg(Color::Red)
  } else {
    Style::default().fg(Color::Gray)
  };
  let dim = Style::default().fg(Color::DarkGray);

  (0..3)
    .map(|i| {
      let style = if i >= 3 - level.filled { lit } else { dim };
      Span::styled("▮", style)
    })
    .collect()
}

/// One-based page numbers for the pagination strip: up to five pages
/// starting two before the current one.
pub fn page_window(current: u64, total_pages: u64) -> Vec<u64> {
  let display = current.saturating_add(1);
  let start = display.saturating_sub(2).max(1);
  let end = total_pages.min(start.saturating_add(4));
  (start..=end).collect()
}

/// "from–to of total" for the rows of `page`
pub fn range_label(page: u64, limit: u64, shown: usize, total: u64) -> String {
  if total == 0 || shown == 0 {
    return format!("0 of {}", total);
  }
  let from = page.saturating_mul(limit).saturating_add(1);
  let to = from.saturating_add(shown as u64 - 1).min(total);
  format!("{}–{} of {}", from, to, total)
}

pub fn format_price(price: f64) -> String {
  format!("${:.2}", price)
}

use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::api::types::{Product, ProductDraft};
use crate::api::CachedCatalogClient;
use crate::error::CatalogError;
use crate::query::Query;
use crate::ui::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
  Title,
  Price,
  Brand,
  Sku,
  Description,
  Category,
  Stock,
  Rating,
}

impl Field {
  const ALL: [Field; 8] = [
    Field::Title,
    Field::Price,
    Field::Brand,
    Field::Sku,
    Field::Description,
    Field::Category,
    Field::Stock,
    Field::Rating,
  ];

  fn label(self) -> &'static str {
    match self {
      Field::Title => "Title*",
      Field::Price => "Price*",
      Field::Brand => "Brand*",
      Field::Sku => "SKU*",
      Field::Description => "Description",
      Field::Category => "Category",
      Field::Stock => "Stock",
      Field::Rating => "Rating",
    }
  }

  /// Field name used by validation errors
  fn name(self) -> &'static str {
    match self {
      Field::Title => "title",
      Field::Price => "price",
      Field::Brand => "brand",
      Field::Sku => "sku",
      Field::Description => "description",
      Field::Category => "category",
      Field::Stock => "stock",
      Field::Rating => "rating",
    }
  }

  fn from_name(name: &str) -> Option<Field> {
    Field::ALL.into_iter().find(|f| f.name() == name)
  }

  fn index(self) -> usize {
    Field::ALL.iter().position(|f| *f == self).unwrap_or(0)
  }
}

/// Events emitted by the dialog
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
  /// Esc pressed; discard the dialog
  Closed,
}

/// Modal form for adding a product.
///
/// Problems are shown next to their fields and nothing is sent until the
/// draft is valid. A failed request keeps the dialog open with a banner.
pub struct AddProductDialog {
  catalog: CachedCatalogClient,
  inputs: Vec<TextInput>,
  focus: Field,
  errors: BTreeMap<Field, String>,
  banner: Option<String>,
  query: Query<Product>,
}

impl AddProductDialog {
  pub fn new(catalog: CachedCatalogClient) -> Self {
    Self {
      catalog,
      inputs: vec![TextInput::new(); Field::ALL.len()],
      focus: Field::Title,
      errors: BTreeMap::new(),
      banner: None,
      query: Query::manual(),
    }
  }

  #[cfg(test)]
  pub fn focus(&self) -> Field {
    self.focus
  }

  fn error(&self, field: Field) -> Option<&str> {
    self.errors.get(&field).map(|s| s.as_str())
  }

  #[cfg(test)]
  pub fn banner(&self) -> Option<&str> {
    self.banner.as_deref()
  }

  pub fn is_submitting(&self) -> bool {
    self.query.is_loading()
  }

  fn value(&self, field: Field) -> &str {
    self.inputs[field.index()].value()
  }

  fn move_focus(&mut self, delta: isize) {
    let len = Field::ALL.len() as isize;
    let next = (self.focus.index() as isize + delta).rem_euclid(len) as usize;
    self.focus = Field::ALL[next];
  }

  /// Parse the inputs into a draft, collecting per-field problems
  fn draft(&self) -> (ProductDraft, BTreeMap<Field, String>) {
    let mut errors = BTreeMap::new();

    let price = parse_number::<f64>(self.value(Field::Price), Field::Price, &mut errors);
    let stock = parse_number::<i64>(self.value(Field::Stock), Field::Stock, &mut errors);
    let rating = parse_number::<f64>(self.value(Field::Rating), Field::Rating, &mut errors);

    let draft = ProductDraft {
      title: self.value(Field::Title).trim().to_string(),
      price,
      brand: self.value(Field::Brand).trim().to_string(),
      sku: self.value(Field::Sku).trim().to_string(),
      description: self.value(Field::Description).trim().to_string(),
      category: self.value(Field::Category).trim().to_string(),
      stock,
      rating,
      weight: None,
    };

    for err in draft.errors() {
      if let Some(field) = err.field().and_then(Field::from_name) {
        errors.entry(field).or_insert_with(|| message_of(&err));
      }
    }

    (draft, errors)
  }

  fn submit(&mut self) {
    if self.is_submitting() {
      return;
    }

    let (draft, errors) = self.draft();
    self.banner = None;
    if !errors.is_empty() {
      tracing::debug!(count = errors.len(), "product draft rejected");
      self.focus = *errors.keys().next().unwrap_or(&self.focus);
      self.errors = errors;
      return;
    }

    self.errors.clear();
    let catalog = self.catalog.clone();
    self.query.run(async move { catalog.create(draft).await });
  }

  /// Poll the pending submission. Returns the product once created.
  pub fn tick(&mut self) -> Option<Product> {
    if !self.query.poll() {
      return None;
    }

    if let Some(err) = self.query.error() {
      match err.field().and_then(Field::from_name) {
        Some(field) => {
          self.errors.insert(field, message_of(err));
        }
        None => self.banner = Some(format!("Failed to add product: {}", err)),
      }
      return None;
    }

    self.query.data().cloned()
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<DialogEvent> {
    match key.code {
      KeyCode::Esc => return KeyResult::Event(DialogEvent::Closed),
      KeyCode::Tab | KeyCode::Down => {
        self.move_focus(1);
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.move_focus(-1);
        return KeyResult::Handled;
      }
      KeyCode::Enter => {
        self.submit();
        return KeyResult::Handled;
      }
      _ => {}
    }

    let focus = self.focus;
    match self.inputs[focus.index()].handle_key(key) {
      InputResult::Changed => {
        self.errors.remove(&focus);
        KeyResult::Handled
      }
      InputResult::NotHandled => KeyResult::NotHandled,
      _ => KeyResult::Handled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let popup = centered_rect(64, 22, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Add product ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = Vec::new();
    for field in Field::ALL {
      let focused = field == self.focus;
      let label_style = if focused {
        Style::default().fg(Color::Yellow).bold()
      } else {
        Style::default().fg(Color::DarkGray)
      };

      let mut spans = vec![Span::styled(format!("{:<13}", field.label()), label_style)];
      spans.extend(self.inputs[field.index()].spans(focused));
      lines.push(Line::from(spans));

      match self.error(field) {
        Some(message) => lines.push(Line::from(Span::styled(
          format!("{:13}{}", "", message),
          Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::raw("")),
      }
    }

    if let Some(banner) = &self.banner {
      lines.push(Line::from(Span::styled(
        banner.clone(),
        Style::default().fg(Color::Red).bold(),
      )));
    } else if self.is_submitting() {
      lines.push(Line::from(Span::styled(
        "Saving…",
        Style::default().fg(Color::DarkGray),
      )));
    } else {
      lines.push(Line::from(Span::styled(
        "Enter save · Tab next field · Esc cancel",
        Style::default().fg(Color::DarkGray),
      )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
  }
}

fn parse_number<T: std::str::FromStr>(
  raw: &str,
  field: Field,
  errors: &mut BTreeMap<Field, String>,
) -> Option<T> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }
  match raw.parse::<T>() {
    Ok(n) => Some(n),
    Err(_) => {
      errors.insert(field, format!("{} must be a number", field.name()));
      None
    }
  }
}

fn message_of(err: &CatalogError) -> String {
  match err {
    CatalogError::Validation { message, .. } => message.clone(),
    other => other.to_string(),
  }
}

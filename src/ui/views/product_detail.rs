use crate::api::types::Product;
use crate::api::CachedCatalogClient;
use crate::query::{Query, QueryState};
use crate::ui::renderfns::{format_price, rating_style};
use crate::ui::view::{Shortcut, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// View for displaying one product.
///
/// Opens with the row from the table and replaces it with the live record
/// once it arrives.
pub struct ProductDetailView {
  row: Product,
  query: Query<Product>,
}

impl ProductDetailView {
  pub fn new(row: Product, catalog: CachedCatalogClient) -> Self {
    let id = row.id;
    let mut query = Query::new(move || {
      let catalog = catalog.clone();
      async move { catalog.get_product(id).await }
    });

    query.fetch();

    Self { row, query }
  }

  fn product(&self) -> &Product {
    self.query.data().unwrap_or(&self.row)
  }

  fn render_detail(&self, frame: &mut Frame, area: Rect) {
    let product = self.product();
    let title = match self.query.state() {
      QueryState::Loading => format!(" {} (loading...) ", product.title),
      QueryState::Error(e) => format!(" {} (error: {}) ", product.title, e),
      _ => format!(" {} ", product.title),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let label = |text: &'static str| Span::styled(format!("{:<14}", text), Style::default().fg(Color::DarkGray));
    let field = |name: &'static str, value: String| Line::from(vec![label(name), Span::raw(value)]);

    let mut lines = vec![
      Line::from(Span::styled(product.title.clone(), Style::default().bold())),
      Line::raw(""),
      field("Brand", product.brand.clone()),
      field("SKU", product.sku.clone()),
      field("Category", product.category.clone()),
      Line::from(vec![
        label("Price"),
        Span::styled(format_price(product.price), Style::default().bold()),
      ]),
      Line::from(vec![
        label("Rating"),
        Span::styled(format!("{} / 5", product.rating), rating_style(product.rating)),
      ]),
      field("Stock", format!("{} pcs", product.stock)),
      field("Weight", format!("{} kg", product.weight)),
    ];

    if !product.availability_status.is_empty() {
      lines.push(field("Availability", product.availability_status.clone()));
    }
    if !product.tags.is_empty() {
      lines.push(field("Tags", product.tags.join(", ")));
    }
    if !product.description.is_empty() {
      lines.push(Line::raw(""));
      lines.push(Line::from(label("Description")));
      lines.push(Line::raw(product.description.clone()));
    }
    if !product.reviews.is_empty() {
      lines.push(Line::raw(""));
      lines.push(Line::from(label("Reviews")));
      for review in &product.reviews {
        lines.push(Line::from(vec![
          Span::styled(format!("  {} ", review.rating), rating_style(review.rating)),
          Span::styled(
            format!("{}: ", review.reviewer_name),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw(review.comment.clone()),
        ]));
      }
    }

    let paragraph = Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
  }
}

impl View for ProductDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => {
        self.query.refetch();
        ViewAction::None
      }
      KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_detail(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.product().title.clone()
  }

  fn tick(&mut self) -> ViewAction {
    self.query.poll();
    ViewAction::None
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("r", "refresh").with_priority(10),
      Shortcut::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::CatalogClient;
  use std::time::Duration;

  #[tokio::test]
  async fn test_falls_back_to_row_when_fetch_fails() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = CatalogClient::with_base_url(&base, Duration::from_secs(1)).unwrap();
    let catalog = CachedCatalogClient::new(client, 20, Duration::from_secs(300));
    let row = Product {
      id: 7,
      title: "Desk Lamp".to_string(),
      ..Default::default()
    };

    let mut view = ProductDetailView::new(row, catalog);
    assert_eq!(view.breadcrumb_label(), "Desk Lamp");

    for _ in 0..200 {
      tokio::time::sleep(Duration::from_millis(10)).await;
      view.tick();
      if !view.query.is_loading() {
        break;
      }
    }

    assert!(view.query.is_error());
    assert_eq!(view.product().id, 7);
    assert!(matches!(
      view.handle_key(KeyEvent::from(KeyCode::Esc)),
      ViewAction::Pop
    ));
  }
}

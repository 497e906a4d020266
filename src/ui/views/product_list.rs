use crate::api::types::{Page, Product};
use crate::api::CachedCatalogClient;
use crate::cache::{CacheResult, CacheSource, Lookup};
use crate::config::Config;
use crate::query::{Query, QueryState};
use crate::state::sort::{indicator, sort_products};
use crate::state::{ListStore, ParamsChange, SortKey};
use crate::ui::components::{AddProductDialog, DialogEvent, KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{format_price, page_window, range_label, rating_style, stock_bars, truncate};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::ProductDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

/// Columns that can be sorted, in hotkey order `1`..`6`
const SORT_COLUMNS: [SortKey; 6] = [
  SortKey::Title,
  SortKey::Brand,
  SortKey::Sku,
  SortKey::Rating,
  SortKey::Price,
  SortKey::Stock,
];

/// Paginated, searchable product table
pub struct ProductListView {
  catalog: CachedCatalogClient,
  store: ListStore,
  search: SearchInput,
  query: Query<CacheResult<Page>>,
  /// Items of the page on screen, in server order
  items: Vec<Product>,
  /// Same items, sorted for display
  rows: Vec<Product>,
  total: u64,
  table_state: TableState,
  dialog: Option<AddProductDialog>,
  notice: Option<String>,
}

impl ProductListView {
  pub fn new(catalog: CachedCatalogClient, store: ListStore, config: &Config) -> Self {
    let search = SearchInput::new(
      &store.params().search_term,
      config.debounce(),
      config.search.min_chars,
    );

    let mut view = Self {
      catalog,
      store,
      search,
      query: Query::manual(),
      items: Vec::new(),
      rows: Vec::new(),
      total: 0,
      table_state: TableState::default(),
      dialog: None,
      notice: None,
    };
    view.load();
    view
  }

  /// Fetch the page the parameters point at. Rows already cached are shown
  /// right away while the request runs.
  fn load(&mut self) {
    let key = self.store.params().page_key();
    tracing::debug!(term = %key.term, page = key.page, "loading products");

    match self.catalog.peek_page(&key) {
      Lookup::Fresh(page) | Lookup::Stale(page) => self.show_page(&page),
      Lookup::Pending | Lookup::Miss => {}
    }

    let catalog = self.catalog.clone();
    self.query.run(async move { catalog.fetch_page(key).await });
  }

  /// Drop the cached copy of the current page and fetch it again
  fn refresh(&mut self) {
    let key = self.store.params().page_key();
    self.catalog.invalidate_page(&key);
    self.load();
  }

  fn show_page(&mut self, page: &Page) {
    self.total = page.total;
    self.items = page.items.clone();
    self.rows = sort_products(&self.items, self.store.params().sort);
    self
      .store
      .selection_mut()
      .set_items(self.items.iter().map(|p| p.id));
    ensure_valid_selection(&mut self.table_state, self.rows.len());
  }

  fn on_page_loaded(&mut self) {
    let page = match self.query.state() {
      QueryState::Success(result) => result.data.clone(),
      _ => return,
    };

    // A restored page index can point past the end of the result set
    if self.store.params().page >= page.page_count() {
      if let ParamsChange::Query(_) = self.store.set_page(self.store.params().page, page.total) {
        self.load();
        return;
      }
    }

    self.show_page(&page);
  }

  /// Re-sort the rows already on screen
  fn resort(&mut self) {
    self.rows = sort_products(&self.items, self.store.params().sort);
  }

  fn apply_search(&mut self, term: &str) {
    if let ParamsChange::Query(_) = self.store.set_search_term(term) {
      self.table_state.select(Some(0));
      self.load();
    }
  }

  /// Drop the search term from outside the box; a pending draft is discarded
  fn clear_search(&mut self) {
    self.search.sync("");
    self.apply_search("");
  }

  fn go_to_page(&mut self, page: u64) {
    if let ParamsChange::Query(_) = self.store.set_page(page, self.total) {
      self.table_state.select(Some(0));
      self.load();
    }
  }

  fn last_page(&self) -> u64 {
    crate::api::types::page_count(self.total, self.store.page_size()) - 1
  }

  fn highlighted(&self) -> Option<&Product> {
    self.table_state.selected().and_then(|i| self.rows.get(i))
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect) {
    ensure_valid_selection(&mut self.table_state, self.rows.len());
    let params = self.store.params();
    let status = match self.query.state() {
      QueryState::Loading => "loading…".to_string(),
      QueryState::Error(_) => "error".to_string(),
      QueryState::Success(result) if result.source == CacheSource::CacheFresh => {
        format!("{} · cached", self.total)
      }
      _ => self.total.to_string(),
    };
    let title = if params.search_term.is_empty() {
      format!(" Products ({}) ", status)
    } else {
      format!(" Products “{}” ({}) ", params.search_term, status)
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if let Some(err) = self.query.error() {
      let paragraph = Paragraph::new(format!(
        "Failed to load products: {}\n\nPress 'r' to retry.",
        err
      ))
      .wrap(Wrap { trim: true })
      .block(block)
      .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, area);
      return;
    }

    if self.rows.is_empty() && !self.query.is_loading() {
      let content = if params.search_term.is_empty() {
        "No products."
      } else {
        "No products match this search."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let selection = self.store.selection();
    let sort = params.sort;
    let column = |n: usize, key: SortKey| {
      Cell::from(format!("{} {}{}", n, key.label(), indicator(sort, key)))
    };
    let all_box = if selection.is_all_selected() { "[x]" } else { "[ ]" };

    let header = Row::new(vec![
      Cell::from(all_box),
      column(1, SortKey::Title),
      column(2, SortKey::Brand),
      column(3, SortKey::Sku),
      column(4, SortKey::Rating),
      column(5, SortKey::Price),
      column(6, SortKey::Stock),
      Cell::from(""),
    ])
    .style(Style::default().fg(Color::Cyan).bold());

    let rows: Vec<Row> = self
      .rows
      .iter()
      .map(|product| {
        let checkbox = if selection.is_selected(product.id) {
          "[x]"
        } else {
          "[ ]"
        };
        let title = Line::from(vec![
          Span::raw(truncate(&product.title, 32)),
          Span::styled(
            format!("  {}", product.category),
            Style::default().fg(Color::DarkGray),
          ),
        ]);
        let mut stock = stock_bars(product.stock);
        stock.push(Span::raw(format!(" {}", product.stock)));

        Row::new(vec![
          Cell::from(checkbox),
          Cell::from(title),
          Cell::from(truncate(&product.brand, 16)),
          Cell::from(truncate(&product.sku, 14)),
          Cell::from(Span::styled(
            format!("{:.2}", product.rating),
            rating_style(product.rating),
          )),
          Cell::from(format_price(product.price)),
          Cell::from(Line::from(stock)),
          Cell::from(Span::styled("⏎ view", Style::default().fg(Color::DarkGray))),
        ])
      })
      .collect();

    let widths = [
      Constraint::Length(3),
      Constraint::Min(24),
      Constraint::Length(16),
      Constraint::Length(14),
      Constraint::Length(10),
      Constraint::Length(11),
      Constraint::Length(10),
      Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      );

    frame.render_stateful_widget(table, area, &mut self.table_state);
  }

  fn render_pagination(&self, frame: &mut Frame, area: Rect) {
    let page = self.store.params().page;
    let total_pages = crate::api::types::page_count(self.total, self.store.page_size());
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
      " ‹ ",
      if page == 0 { dim } else { Style::default() },
    )];
    for n in page_window(page, total_pages) {
      if n == page.saturating_add(1) {
        spans.push(Span::styled(
          format!("[{}]", n),
          Style::default().fg(Color::Magenta).bold(),
        ));
      } else {
        spans.push(Span::styled(format!(" {} ", n), dim));
      }
    }
    spans.push(Span::styled(
      " › ",
      if page.saturating_add(1) >= total_pages { dim } else { Style::default() },
    ));
    spans.push(Span::raw("   "));
    spans.push(Span::raw(range_label(
      page,
      self.store.page_size(),
      self.rows.len(),
      self.total,
    )));

    let selection = self.store.selection();
    if !selection.is_empty() {
      spans.push(Span::styled(
        format!("   {} selected", selection.len()),
        Style::default().fg(Color::Yellow),
      ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }

  fn render_notice(&self, frame: &mut Frame, area: Rect) {
    if let Some(notice) = &self.notice {
      let paragraph = Paragraph::new(format!(" {}", notice)).style(Style::default().fg(Color::Green));
      frame.render_widget(paragraph, area);
    }
  }
}

impl View for ProductListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if let Some(dialog) = &mut self.dialog {
      if let KeyResult::Event(DialogEvent::Closed) = dialog.handle_key(key) {
        self.dialog = None;
      }
      return ViewAction::None;
    }

    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Committed(term)) => {
        self.apply_search(&term);
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    self.notice = None;
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char(' ') => {
        if let Some(id) = self.highlighted().map(|p| p.id) {
          self.store.selection_mut().toggle(id);
        }
      }
      KeyCode::Char('a') => self.store.selection_mut().toggle_all(),
      KeyCode::Char(c @ '1'..='6') => {
        let idx = c as usize - '1' as usize;
        self.store.cycle_sort(SORT_COLUMNS[idx]);
        self.resort();
      }
      KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => {
        let page = self.store.params().page;
        if page > 0 {
          self.go_to_page(page - 1);
        }
      }
      KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => {
        self.go_to_page(self.store.params().page.saturating_add(1));
      }
      KeyCode::Char('g') => self.go_to_page(0),
      KeyCode::Char('G') => self.go_to_page(self.last_page()),
      KeyCode::Char('r') => self.refresh(),
      KeyCode::Char('x') => self.clear_search(),
      KeyCode::Char('+') | KeyCode::Char('c') => {
        self.dialog = Some(AddProductDialog::new(self.catalog.clone()));
      }
      KeyCode::Enter => {
        if let Some(product) = self.highlighted() {
          return ViewAction::Push(Box::new(ProductDetailView::new(
            product.clone(),
            self.catalog.clone(),
          )));
        }
      }
      KeyCode::Char('L') => return ViewAction::Logout,
      KeyCode::Esc => return ViewAction::Quit,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let [search, table, pagination, notice] = Layout::vertical([
      Constraint::Length(3),
      Constraint::Min(3),
      Constraint::Length(1),
      Constraint::Length(1),
    ])
    .areas(area);

    self.search.render(frame, search);
    self.render_table(frame, table);
    self.render_pagination(frame, pagination);
    self.render_notice(frame, notice);

    if let Some(dialog) = &self.dialog {
      dialog.render(frame, area);
    }
  }

  fn breadcrumb_label(&self) -> String {
    let term = &self.store.params().search_term;
    if term.is_empty() {
      "Products".to_string()
    } else {
      format!("Products [{}]", term)
    }
  }

  fn tick(&mut self) -> ViewAction {
    if let Some(dialog) = &mut self.dialog {
      if let Some(product) = dialog.tick() {
        tracing::info!(id = product.id, title = %product.title, "product added");
        self.notice = Some(format!("Added “{}” (id {})", product.title, product.id));
        self.dialog = None;
      }
    }

    if let Some(SearchEvent::Committed(term)) = self.search.poll() {
      self.apply_search(&term);
    }

    if self.query.poll() {
      self.on_page_loaded();
    }

    ViewAction::None
  }

  fn is_capturing_input(&self) -> bool {
    self.dialog.is_some() || self.search.is_active()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    if self.dialog.is_some() {
      return vec![
        Shortcut::new("enter", "save").with_priority(10),
        Shortcut::new("esc", "cancel").with_priority(20),
      ];
    }
    vec![
      Shortcut::new("/", "search").with_priority(10),
      Shortcut::new("x", "clear search").with_priority(15),
      Shortcut::new("1-6", "sort").with_priority(20),
      Shortcut::new("h/l", "page").with_priority(30),
      Shortcut::new("space", "select").with_priority(40),
      Shortcut::new("+", "add").with_priority(50),
      Shortcut::new("r", "refresh").with_priority(60),
      Shortcut::new("L", "logout").with_priority(70),
      Shortcut::new("q", "quit").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::{CatalogClient, PageKey};
  use crate::storage::{KeyValueStore, MemoryStore};
  use crossterm::event::KeyModifiers;
  use ratatui::backend::TestBackend;
  use std::sync::Arc;
  use std::time::Duration;
  use tokio::io::{AsyncReadExt, AsyncWriteExt};

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  /// Serve the same listing body to every request
  async fn serve_listing(body: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
      while let Ok((mut socket, _)) = listener.accept().await {
        let body = body.clone();
        tokio::spawn(async move {
          let mut buf = vec![0u8; 4096];
          let _ = socket.read(&mut buf).await;
          let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
          );
          let _ = socket.write_all(response.as_bytes()).await;
        });
      }
    });
    base
  }

  /// Serve `first` for offset 0 and `rest` for every other offset
  async fn serve_pages(first: String, rest: String) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
      while let Ok((mut socket, _)) = listener.accept().await {
        let (first, rest) = (first.clone(), rest.clone());
        tokio::spawn(async move {
          let mut buf = vec![0u8; 4096];
          let n = socket.read(&mut buf).await.unwrap_or(0);
          let request = String::from_utf8_lossy(&buf[..n]).to_string();
          let body = if request.contains("skip=0") { first } else { rest };
          let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
          );
          let _ = socket.write_all(response.as_bytes()).await;
        });
      }
    });
    base
  }

  fn page_of(products: &[(u64, f64)], total: u64, skip: u64) -> String {
    let products: Vec<_> = products
      .iter()
      .map(|(id, price)| serde_json::json!({ "id": id, "title": format!("item {}", id), "price": price }))
      .collect();
    serde_json::json!({ "products": products, "total": total, "skip": skip, "limit": 3 }).to_string()
  }

  fn listing(total: u64) -> String {
    serde_json::json!({
      "products": [
        { "id": 1, "title": "Phone", "price": 500.0 },
        { "id": 2, "title": "Apple", "price": 3.0 },
        { "id": 3, "title": "Mop", "price": 12.0 }
      ],
      "total": total,
      "skip": 0,
      "limit": 3
    })
    .to_string()
  }

  fn view(base: &str, storage: Arc<MemoryStore>) -> ProductListView {
    view_with_stale_time(base, storage, Duration::from_secs(300))
  }

  fn view_with_stale_time(base: &str, storage: Arc<MemoryStore>, stale_time: Duration) -> ProductListView {
    let client = CatalogClient::with_base_url(base, Duration::from_secs(2)).unwrap();
    let catalog = CachedCatalogClient::new(client, 3, stale_time);
    ProductListView::new(catalog, ListStore::load(storage, 3), &Config::default())
  }

  fn ids(view: &ProductListView) -> Vec<u64> {
    view.rows.iter().map(|p| p.id).collect()
  }

  async fn settle(view: &mut ProductListView) {
    for _ in 0..200 {
      tokio::time::sleep(Duration::from_millis(10)).await;
      view.tick();
      if !view.query.is_loading() {
        break;
      }
    }
  }

  fn titles(view: &ProductListView) -> Vec<&str> {
    view.rows.iter().map(|p| p.title.as_str()).collect()
  }

  #[tokio::test]
  async fn test_loads_first_page() {
    let base = serve_listing(listing(3)).await;
    let mut v = view(&base, Arc::new(MemoryStore::new()));
    settle(&mut v).await;

    assert_eq!(titles(&v), vec!["Phone", "Apple", "Mop"]);
    assert_eq!(v.total, 3);
    assert_eq!(v.table_state.selected(), Some(0));
  }

  #[tokio::test]
  async fn test_sort_hotkey_reorders_current_rows() {
    let base = serve_listing(listing(3)).await;
    let mut v = view(&base, Arc::new(MemoryStore::new()));
    settle(&mut v).await;

    // 5 = price
    v.handle_key(key(KeyCode::Char('5')));
    assert_eq!(titles(&v), vec!["Apple", "Mop", "Phone"]);
    v.handle_key(key(KeyCode::Char('5')));
    assert_eq!(titles(&v), vec!["Phone", "Mop", "Apple"]);
    v.handle_key(key(KeyCode::Char('5')));
    assert_eq!(titles(&v), vec!["Phone", "Apple", "Mop"]);
  }

  #[tokio::test]
  async fn test_selection_and_toggle_all() {
    let base = serve_listing(listing(3)).await;
    let mut v = view(&base, Arc::new(MemoryStore::new()));
    settle(&mut v).await;

    v.handle_key(key(KeyCode::Char(' ')));
    assert!(v.store.selection().is_selected(1));

    v.handle_key(key(KeyCode::Char('a')));
    assert!(v.store.selection().is_all_selected());
    v.handle_key(key(KeyCode::Char('a')));
    assert!(v.store.selection().is_empty());
  }

  #[tokio::test]
  async fn test_restored_page_past_end_is_clamped() {
    let base = serve_listing(listing(3)).await;
    let storage = Arc::new(MemoryStore::new());
    storage.set(crate::state::store::PAGE_KEY, "7").unwrap();

    let mut v = view(&base, storage.clone());
    settle(&mut v).await;
    settle(&mut v).await;

    assert_eq!(v.store.params().page, 0);
    assert_eq!(
      storage.get(crate::state::store::PAGE_KEY).unwrap().as_deref(),
      Some("0")
    );
  }

  #[tokio::test]
  async fn test_empty_result_clamps_restored_page_to_zero() {
    let base = serve_listing(page_of(&[], 0, 0)).await;
    let storage = Arc::new(MemoryStore::new());
    storage.set(crate::state::store::PAGE_KEY, "3").unwrap();

    let mut v = view(&base, storage.clone());
    settle(&mut v).await;
    settle(&mut v).await;

    assert_eq!(v.store.params().page, 0);
    assert_eq!(
      storage.get(crate::state::store::PAGE_KEY).unwrap().as_deref(),
      Some("0")
    );
  }

  #[tokio::test]
  async fn test_huge_restored_page_renders_and_clamps() {
    let base = serve_listing(listing(3)).await;
    let storage = Arc::new(MemoryStore::new());
    storage
      .set(crate::state::store::PAGE_KEY, &(u64::MAX / 3).to_string())
      .unwrap();

    let mut v = view(&base, storage);
    let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
    let mut draw = |v: &mut ProductListView| {
      terminal
        .draw(|frame| {
          let area = frame.area();
          v.render(frame, area);
        })
        .unwrap();
    };
    draw(&mut v);

    settle(&mut v).await;
    settle(&mut v).await;
    draw(&mut v);
    assert_eq!(v.store.params().page, 0);
  }

  #[tokio::test]
  async fn test_sort_while_refetching_keeps_rows_of_current_page() {
    let base = serve_pages(
      page_of(&[(1, 500.0), (2, 3.0), (3, 12.0)], 6, 0),
      page_of(&[(11, 7.0), (12, 1.0), (13, 9.0)], 6, 3),
    )
    .await;
    // Every cached page is stale, so going back refetches
    let mut v = view_with_stale_time(&base, Arc::new(MemoryStore::new()), Duration::ZERO);
    settle(&mut v).await;
    assert_eq!(ids(&v), vec![1, 2, 3]);

    v.handle_key(key(KeyCode::Char('l')));
    settle(&mut v).await;
    assert_eq!(ids(&v), vec![11, 12, 13]);

    // Stale page 0 is shown while its refetch is in flight
    v.handle_key(key(KeyCode::Char('h')));
    assert!(v.query.is_loading());
    assert_eq!(ids(&v), vec![1, 2, 3]);

    // 5 = price
    v.handle_key(key(KeyCode::Char('5')));
    assert_eq!(ids(&v), vec![2, 3, 1]);

    settle(&mut v).await;
    assert_eq!(ids(&v), vec![2, 3, 1]);
  }

  #[tokio::test]
  async fn test_next_page_changes_key_and_clears_selection() {
    let base = serve_listing(listing(9)).await;
    let mut v = view(&base, Arc::new(MemoryStore::new()));
    settle(&mut v).await;
    v.handle_key(key(KeyCode::Char('a')));

    v.handle_key(key(KeyCode::Char('l')));
    assert_eq!(v.store.params().page_key(), PageKey::new("", 1));
    assert!(v.store.selection().is_empty());
    // Previous rows stay visible while the next page loads
    assert_eq!(v.rows.len(), 3);
  }

  #[tokio::test]
  async fn test_failed_load_reports_inline_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut v = view(&base, Arc::new(MemoryStore::new()));
    settle(&mut v).await;
    assert!(v.query.is_error());
    assert!(v.rows.is_empty());
  }

  #[tokio::test]
  async fn test_clear_search_resets_term_and_draft() {
    let base = serve_listing(listing(3)).await;
    let mut v = view(&base, Arc::new(MemoryStore::new()));
    settle(&mut v).await;

    v.handle_key(key(KeyCode::Char('/')));
    for c in "lamp".chars() {
      v.handle_key(key(KeyCode::Char(c)));
    }
    v.handle_key(key(KeyCode::Enter));
    assert_eq!(v.store.params().search_term, "lamp");

    // Leave an edit pending, then clear from outside the box
    v.handle_key(key(KeyCode::Char('/')));
    v.handle_key(key(KeyCode::Char('s')));
    v.handle_key(key(KeyCode::Esc));
    v.handle_key(key(KeyCode::Char('x')));

    assert_eq!(v.store.params().search_term, "");
    assert_eq!(v.search.draft(), "");
  }

  #[tokio::test]
  async fn test_keys_go_to_search_box_while_active() {
    let base = serve_listing(listing(3)).await;
    let mut v = view(&base, Arc::new(MemoryStore::new()));
    settle(&mut v).await;

    v.handle_key(key(KeyCode::Char('/')));
    assert!(v.is_capturing_input());
    v.handle_key(key(KeyCode::Char('q')));
    assert_eq!(v.search.draft(), "q");
    assert!(matches!(v.handle_key(key(KeyCode::Enter)), ViewAction::None));
    assert_eq!(v.store.params().search_term, "q");
  }
}

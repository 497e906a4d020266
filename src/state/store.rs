//! Single source of truth for what the product table shows.

use std::sync::Arc;

use super::selection::Selection;
use super::sort::{cycle, SortKey, SortSpec};
use crate::api::types::page_count;
use crate::api::PageKey;
use crate::storage::KeyValueStore;

pub const SEARCH_TERM_KEY: &str = "productSearchTerm";
pub const SORT_CONFIG_KEY: &str = "productSortConfig";
pub const PAGE_KEY: &str = "productPage";

/// Search term, sort and page index governing the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewParameters {
  pub search_term: String,
  pub sort: Option<SortSpec>,
  pub page: u64,
}

impl ViewParameters {
  /// Cache key of the page these parameters display. Sort is client-side
  /// and not part of it.
  pub fn page_key(&self) -> PageKey {
    PageKey::new(self.search_term.clone(), self.page)
  }
}

/// What a mutation changed, so the caller can react explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamsChange {
  /// Nothing changed
  None,
  /// Only the client-side order changed; re-sort the current rows
  Sort,
  /// The remote query changed; fetch this key
  Query(PageKey),
}

/// View parameters plus the selection, persisted on every change.
pub struct ListStore {
  params: ViewParameters,
  selection: Selection,
  page_size: u64,
  storage: Arc<dyn KeyValueStore>,
}

impl ListStore {
  /// Restore parameters from storage. Each key is read on its own; a missing
  /// or unreadable value falls back to its default without affecting the
  /// others.
  pub fn load(storage: Arc<dyn KeyValueStore>, page_size: u64) -> Self {
    let search_term = read(&*storage, SEARCH_TERM_KEY).unwrap_or_default();

    let sort = read(&*storage, SORT_CONFIG_KEY).and_then(|raw| {
      serde_json::from_str::<Option<SortSpec>>(&raw)
        .map_err(|e| tracing::warn!(value = %raw, error = %e, "ignoring malformed sort config"))
        .ok()
        .flatten()
    });

    let page_size = page_size.max(1);
    let page = read(&*storage, PAGE_KEY)
      .and_then(|raw| {
        raw
          .trim()
          .parse::<u64>()
          .map_err(|e| tracing::warn!(value = %raw, error = %e, "ignoring malformed page"))
          .ok()
          // The offset `page * page_size` has to be representable
          .filter(|page| {
            let fits = page.checked_mul(page_size).is_some();
            if !fits {
              tracing::warn!(value = %raw, "ignoring out of range page");
            }
            fits
          })
      })
      .unwrap_or(0);

    let params = ViewParameters {
      search_term,
      sort,
      page,
    };
    tracing::debug!(?params, "restored list parameters");

    Self {
      params,
      selection: Selection::new(),
      page_size,
      storage,
    }
  }

  pub fn params(&self) -> &ViewParameters {
    &self.params
  }

  pub fn selection(&self) -> &Selection {
    &self.selection
  }

  pub fn selection_mut(&mut self) -> &mut Selection {
    &mut self.selection
  }

  pub fn page_size(&self) -> u64 {
    self.page_size
  }

  /// New search term: page goes back to 0 and the selection is cleared.
  pub fn set_search_term(&mut self, term: &str) -> ParamsChange {
    if self.params.search_term == term {
      return ParamsChange::None;
    }
    self.params.search_term = term.to_string();
    self.params.page = 0;
    self.selection.clear();
    self.persist();
    ParamsChange::Query(self.params.page_key())
  }

  /// Replace the sort; page and selection are untouched.
  pub fn set_sort(&mut self, sort: Option<SortSpec>) -> ParamsChange {
    if self.params.sort == sort {
      return ParamsChange::None;
    }
    self.params.sort = sort;
    self.persist();
    ParamsChange::Sort
  }

  /// Advance `key`'s column through ascending → descending → none.
  pub fn cycle_sort(&mut self, key: SortKey) -> ParamsChange {
    self.set_sort(cycle(self.params.sort, key))
  }

  /// Go to page `n`, clamped to the last page for `total` items.
  pub fn set_page(&mut self, n: u64, total: u64) -> ParamsChange {
    let last = page_count(total, self.page_size) - 1;
    let page = n.min(last);
    if page == self.params.page {
      return ParamsChange::None;
    }
    self.params.page = page;
    self.selection.clear();
    self.persist();
    ParamsChange::Query(self.params.page_key())
  }

  /// Write every parameter back. Keys are written independently and a
  /// failed write only loses that key.
  fn persist(&self) {
    let sort = serde_json::to_string(&self.params.sort).unwrap_or_else(|_| "null".to_string());
    let writes = [
      (SEARCH_TERM_KEY, self.params.search_term.clone()),
      (SORT_CONFIG_KEY, sort),
      (PAGE_KEY, self.params.page.to_string()),
    ];

    for (key, value) in writes {
      if let Err(e) = self.storage.set(key, &value) {
        tracing::warn!(key, error = %e, "failed to persist list parameter");
      }
    }
  }
}

fn read(storage: &dyn KeyValueStore, key: &str) -> Option<String> {
  storage
    .get(key)
    .map_err(|e| tracing::warn!(key, error = %e, "failed to read list parameter"))
    .ok()
    .flatten()
}

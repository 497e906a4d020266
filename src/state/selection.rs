use std::collections::BTreeSet;

/// Selected product ids on the visible page.
///
/// The selection never outlives what is on screen: it is cleared on page and
/// search changes by the store, and pruned when the page's rows change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
  selected: BTreeSet<u64>,
  /// Ids of the rows currently displayed
  items: Vec<u64>,
  all_selected: bool,
}

impl Selection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Flip membership of `id`.
  pub fn toggle(&mut self, id: u64) {
    if !self.selected.remove(&id) {
      self.selected.insert(id);
    }
    self.recompute();
  }

  /// Select every visible row unless all of them are selected already, in
  /// which case clear the selection.
  pub fn toggle_all(&mut self) {
    if self.all_selected {
      self.selected.clear();
    } else {
      self.selected = self.items.iter().copied().collect();
    }
    self.recompute();
  }

  /// Replace the visible rows, dropping selected ids that are no longer shown.
  pub fn set_items(&mut self, items: impl IntoIterator<Item = u64>) {
    self.items = items.into_iter().collect();
    let visible: BTreeSet<u64> = self.items.iter().copied().collect();
    self.selected.retain(|id| visible.contains(id));
    self.recompute();
  }

  pub fn clear(&mut self) {
    self.selected.clear();
    self.recompute();
  }

  pub fn is_selected(&self, id: u64) -> bool {
    self.selected.contains(&id)
  }

  pub fn is_all_selected(&self) -> bool {
    self.all_selected
  }

  pub fn len(&self) -> usize {
    self.selected.len()
  }

  pub fn is_empty(&self) -> bool {
    self.selected.is_empty()
  }

  #[cfg(test)]
  pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
    self.selected.iter().copied()
  }

  fn recompute(&mut self) {
    self.all_selected = !self.selected.is_empty() && self.selected.len() == self.items.len();
  }
}

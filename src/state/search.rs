//! Debounced promotion of the search box draft to the committed search term.
//!
//! ```text
//! Idle --keystroke--> Typing --quiet period--> Committed
//!                       |  ^
//!                       +--+ keystroke re-arms the deadline
//! ```
//!
//! The draft echoes every keystroke. The committed term only changes when
//! the quiet period elapses with a long enough draft, or on Enter.

use std::time::Duration;
use tokio::time::Instant;

/// Explicit cancellable deadline, polled by the event loop tick.
#[derive(Debug, Clone)]
pub struct Debouncer {
  delay: Duration,
  deadline: Option<Instant>,
}

impl Debouncer {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      deadline: None,
    }
  }

  /// Cancel any pending deadline and start a new one.
  pub fn arm(&mut self) {
    self.deadline = Some(Instant::now() + self.delay);
  }

  pub fn cancel(&mut self) {
    self.deadline = None;
  }

  #[cfg(test)]
  pub fn is_armed(&self) -> bool {
    self.deadline.is_some()
  }

  /// True exactly once when the armed deadline has passed.
  pub fn poll(&mut self) -> bool {
    match self.deadline {
      Some(deadline) if Instant::now() >= deadline => {
        self.deadline = None;
        true
      }
      _ => false,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
  /// Draft matches the committed term, nothing pending
  Idle,
  /// A promotion is pending
  Typing,
  /// The last quiet period or Enter promoted the draft
  Committed,
}

#[derive(Debug, Clone)]
pub struct SearchController {
  draft: String,
  committed: String,
  debouncer: Debouncer,
  min_chars: usize,
  phase: SearchPhase,
}

impl SearchController {
  pub fn new(committed: impl Into<String>, delay: Duration, min_chars: usize) -> Self {
    let committed = committed.into();
    Self {
      draft: committed.clone(),
      committed,
      debouncer: Debouncer::new(delay),
      min_chars,
      phase: SearchPhase::Idle,
    }
  }

  #[cfg(test)]
  pub fn draft(&self) -> &str {
    &self.draft
  }

  #[cfg(test)]
  pub fn committed(&self) -> &str {
    &self.committed
  }

  pub fn phase(&self) -> SearchPhase {
    self.phase
  }

  /// Record the new draft and re-arm the quiet period.
  pub fn input(&mut self, draft: impl Into<String>) {
    self.draft = draft.into();
    self.debouncer.arm();
    self.phase = SearchPhase::Typing;
  }

  /// Call on every tick. Returns the newly committed term when the quiet
  /// period elapsed with a draft of at least `min_chars` trimmed characters.
  pub fn poll(&mut self) -> Option<String> {
    if !self.debouncer.poll() {
      return None;
    }

    let trimmed = self.draft.trim();
    if trimmed.chars().count() < self.min_chars {
      tracing::trace!(draft = %self.draft, "draft too short, not committing");
      self.phase = SearchPhase::Idle;
      return None;
    }

    self.promote()
  }

  /// Commit the trimmed draft now, whatever its length (Enter).
  pub fn submit(&mut self) -> Option<String> {
    self.debouncer.cancel();
    self.promote()
  }

  /// Follow an external change of the committed term; drops any pending
  /// promotion.
  pub fn sync(&mut self, committed: &str) {
    self.debouncer.cancel();
    self.committed = committed.to_string();
    self.draft = committed.to_string();
    self.phase = SearchPhase::Idle;
  }

  fn promote(&mut self) -> Option<String> {
    let trimmed = self.draft.trim().to_string();
    self.phase = SearchPhase::Committed;
    if trimmed == self.committed {
      return None;
    }
    tracing::debug!(term = %trimmed, "search term committed");
    self.committed = trimmed.clone();
    Some(trimmed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const DELAY: Duration = Duration::from_millis(500);

  fn controller() -> SearchController {
    SearchController::new("", DELAY, 2)
  }

  async fn wait(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
  }

  #[tokio::test(start_paused = true)]
  async fn test_draft_echoes_immediately_and_commits_after_quiet_period() {
    let mut search = controller();
    search.input("ph");
    assert_eq!(search.draft(), "ph");
    assert_eq!(search.committed(), "");
    assert_eq!(search.phase(), SearchPhase::Typing);

    wait(499).await;
    assert_eq!(search.poll(), None);

    wait(1).await;
    assert_eq!(search.poll(), Some("ph".to_string()));
    assert_eq!(search.committed(), "ph");
    assert_eq!(search.phase(), SearchPhase::Committed);

    // Fires only once
    wait(500).await;
    assert_eq!(search.poll(), None);
  }

  #[tokio::test(start_paused = true)]
  async fn test_keystroke_rearms_deadline() {
    let mut search = controller();
    search.input("p");
    wait(300).await;
    search.input("ph");
    wait(300).await;
    assert_eq!(search.poll(), None);

    wait(200).await;
    assert_eq!(search.poll(), Some("ph".to_string()));
  }

  #[tokio::test(start_paused = true)]
  async fn test_short_drafts_are_never_promoted() {
    for draft in ["", "a", " a ", "   "] {
      let mut search = SearchController::new("phone", DELAY, 2);
      search.input(draft);
      wait(1000).await;
      assert_eq!(search.poll(), None, "{:?}", draft);
      assert_eq!(search.committed(), "phone");
      assert_eq!(search.phase(), SearchPhase::Idle);
    }
  }

  #[tokio::test(start_paused = true)]
  async fn test_committed_term_is_trimmed() {
    let mut search = controller();
    search.input("  laptop ");
    wait(500).await;
    assert_eq!(search.poll(), Some("laptop".to_string()));
  }

  #[tokio::test(start_paused = true)]
  async fn test_submit_bypasses_timer_and_length() {
    let mut search = SearchController::new("phone", DELAY, 2);
    search.input(" x ");
    assert_eq!(search.submit(), Some("x".to_string()));
    assert_eq!(search.committed(), "x");

    // The pending deadline was cancelled
    wait(1000).await;
    assert_eq!(search.poll(), None);
  }

  #[tokio::test(start_paused = true)]
  async fn test_submit_empty_clears_search() {
    let mut search = SearchController::new("phone", DELAY, 2);
    search.input("");
    assert_eq!(search.submit(), Some(String::new()));
  }

  #[tokio::test(start_paused = true)]
  async fn test_unchanged_term_is_not_reported() {
    let mut search = SearchController::new("phone", DELAY, 2);
    search.input("phone ");
    wait(500).await;
    assert_eq!(search.poll(), None);
    assert_eq!(search.submit(), None);
  }

  #[tokio::test(start_paused = true)]
  async fn test_sync_resets_draft_and_cancels_pending() {
    let mut search = controller();
    search.input("lapt");
    search.sync("");
    assert_eq!(search.draft(), "");
    assert_eq!(search.phase(), SearchPhase::Idle);

    wait(1000).await;
    assert_eq!(search.poll(), None);
    assert_eq!(search.committed(), "");
  }

  #[tokio::test(start_paused = true)]
  async fn test_debouncer_arm_cancel() {
    let mut debouncer = Debouncer::new(DELAY);
    assert!(!debouncer.poll());

    debouncer.arm();
    assert!(debouncer.is_armed());
    debouncer.cancel();
    wait(600).await;
    assert!(!debouncer.poll());
  }
}

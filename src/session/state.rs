//! Transient UI state of one interactive session.
//!
//! The fetch guard (loading flag plus draft revision) holds for any caller
//! that lets input arrive while a fetch is outstanding. The line-oriented
//! [`Session`](super::Session) awaits each fetch before reading the next
//! line, so there the guard never fires.

use crate::suggest::Suggestion;

/// Draft text, pending suggestion and loading flag.
///
/// Mutated only through the methods below. Every draft change bumps a
/// revision counter so that a suggestion fetched for an older draft can be
/// recognized and dropped.
#[derive(Debug, Default)]
pub struct SessionState {
    draft: String,
    pending: Option<Suggestion>,
    loading: bool,
    draft_revision: u64,
}

/// Handle for one in-flight fetch, tied to the draft it was started for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    revision: u64,
    text: String,
}

impl FetchTicket {
    /// Draft text the fetch was started for.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Why a fetch could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRefusal {
    /// The draft is blank.
    EmptyDraft,
    /// Another fetch is still outstanding.
    AlreadyLoading,
}

impl SessionState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current draft text.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Suggestion waiting to be attached to the next added task.
    #[must_use]
    pub fn pending(&self) -> Option<&Suggestion> {
        self.pending.as_ref()
    }

    /// Whether a fetch is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replaces the draft text. The pending suggestion is kept.
    pub fn set_draft(&mut self, text: &str) {
        if self.draft != text {
            self.draft = text.to_string();
            self.draft_revision += 1;
        }
    }

    /// Discards the draft and any pending suggestion.
    pub fn clear(&mut self) {
        self.draft.clear();
        self.pending = None;
        self.draft_revision += 1;
    }

    /// Marks a fetch as started for the current draft.
    ///
    /// # Errors
    ///
    /// Refuses when the draft is blank or a fetch is already loading.
    pub fn begin_fetch(&mut self) -> Result<FetchTicket, FetchRefusal> {
        if self.loading {
            return Err(FetchRefusal::AlreadyLoading);
        }
        if self.draft.trim().is_empty() {
            return Err(FetchRefusal::EmptyDraft);
        }
        self.loading = true;
        Ok(FetchTicket { revision: self.draft_revision, text: self.draft.clone() })
    }

    /// Ends a fetch. The result becomes the pending suggestion only if the
    /// draft has not changed since the ticket was issued.
    ///
    /// Returns whether the result was applied.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, suggestion: Suggestion) -> bool {
        self.loading = false;
        if ticket.revision != self.draft_revision {
            tracing::debug!("dropping suggestion fetched for an outdated draft");
            return false;
        }
        self.pending = Some(suggestion);
        true
    }

    /// Takes the draft and pending suggestion for a new task, resetting both.
    ///
    /// Returns `None` and changes nothing when the draft is blank.
    pub fn take_for_add(&mut self) -> Option<(String, Option<Suggestion>)> {
        if self.draft.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.draft);
        let suggestion = self.pending.take();
        self.draft_revision += 1;
        Some((text, suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subtasks(items: &[&str]) -> Suggestion {
        Suggestion::Subtasks {
            model: "gemini-2.5-flash".into(),
            items: items.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn fetch_refused_for_blank_draft() {
        let mut state = SessionState::new();
        state.set_draft("   ");
        assert_eq!(state.begin_fetch(), Err(FetchRefusal::EmptyDraft));
        assert!(!state.is_loading());
    }

    #[test]
    fn second_fetch_refused_while_loading() {
        let mut state = SessionState::new();
        state.set_draft("Bake bread");
        let ticket = state.begin_fetch().unwrap();
        assert_eq!(ticket.text(), "Bake bread");
        assert!(state.is_loading());
        assert_eq!(state.begin_fetch(), Err(FetchRefusal::AlreadyLoading));

        assert!(state.finish_fetch(ticket, subtasks(&["Buy flour"])));
        assert!(!state.is_loading());
        assert_eq!(state.pending(), Some(&subtasks(&["Buy flour"])));
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut state = SessionState::new();
        state.set_draft("Bake bread");
        let ticket = state.begin_fetch().unwrap();
        state.set_draft("Paint fence");

        assert!(!state.finish_fetch(ticket, subtasks(&["Buy flour"])));
        assert!(state.pending().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn setting_same_draft_keeps_ticket_valid() {
        let mut state = SessionState::new();
        state.set_draft("Bake bread");
        let ticket = state.begin_fetch().unwrap();
        state.set_draft("Bake bread");
        assert!(state.finish_fetch(ticket, subtasks(&["x"])));
    }

    #[test]
    fn take_for_add_moves_draft_and_pending() {
        let mut state = SessionState::new();
        state.set_draft("Bake bread");
        let ticket = state.begin_fetch().unwrap();
        state.finish_fetch(ticket, subtasks(&["Buy flour"]));

        let (text, suggestion) = state.take_for_add().unwrap();
        assert_eq!(text, "Bake bread");
        assert_eq!(suggestion, Some(subtasks(&["Buy flour"])));
        assert_eq!(state.draft(), "");
        assert!(state.pending().is_none());
    }

    #[test]
    fn take_for_add_with_blank_draft_keeps_pending() {
        let mut state = SessionState::new();
        state.set_draft("Bake bread");
        let ticket = state.begin_fetch().unwrap();
        state.finish_fetch(ticket, subtasks(&["Buy flour"]));
        state.set_draft("");

        assert!(state.take_for_add().is_none());
        assert!(state.pending().is_some());
    }

    #[test]
    fn clear_discards_everything() {
        let mut state = SessionState::new();
        state.set_draft("Bake bread");
        let ticket = state.begin_fetch().unwrap();
        state.finish_fetch(ticket, Suggestion::Failed { message: "nope".into() });

        state.clear();
        assert_eq!(state.draft(), "");
        assert!(state.pending().is_none());
    }
}

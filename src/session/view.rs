//! Plain-text rendering of the task list and pending suggestion.

use std::fmt::Write as _;

use crate::store::TaskStore;
use crate::suggest::{Suggestion, API_KEY_PAGE};

/// Banner printed when a session starts.
#[must_use]
pub fn render_banner() -> String {
    format!(
        "TaskSpark: tasks with AI-suggested subtasks (Google Gemini)\n\
         No API key? Get one for free at {API_KEY_PAGE}\n\
         Type 'help' for commands."
    )
}

/// Renders the task list, numbering tasks by position.
///
/// Suggestions that carry a failure are never shown in the list.
#[must_use]
pub fn render_tasks(store: &TaskStore) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "My tasks ({}, {} done)", store.len(), store.completed_count());

    if store.is_empty() {
        out.push_str("  No tasks yet. Create one!\n");
        return out;
    }

    for (pos, task) in store.tasks().iter().enumerate() {
        let mark = if task.completed() { "x" } else { " " };
        let _ = writeln!(out, "{:>3}. [{mark}] {}", pos + 1, task.text());
        if let Some(suggestion) = task.suggestion().filter(|s| !s.is_failure()) {
            out.push_str("       Suggested subtasks:\n");
            for item in suggestion.items() {
                let _ = writeln!(out, "       • {item}");
            }
        }
    }
    out
}

/// Renders a freshly fetched or pending suggestion.
#[must_use]
pub fn render_suggestion(suggestion: &Suggestion) -> String {
    match suggestion {
        Suggestion::Subtasks { .. } => format!("AI suggestions:\n{suggestion}"),
        Suggestion::Failed { .. } => format!("Error:\n{suggestion}"),
        Suggestion::Unconfigured { .. } => format!("Setup needed:\n{suggestion}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::Clock;
    use chrono::{DateTime, TimeZone, Utc};

    struct FixedClock;
    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        }
    }

    #[test]
    fn empty_list_invites_a_first_task() {
        let text = render_tasks(&TaskStore::new());
        assert!(text.starts_with("My tasks (0, 0 done)"));
        assert!(text.contains("No tasks yet"));
    }

    #[test]
    fn lists_tasks_with_marks_and_successful_suggestions_only() {
        let mut store = TaskStore::new();
        let ok = Suggestion::Subtasks { model: "m".into(), items: vec!["Buy flour".into()] };
        let failed = Suggestion::Failed { message: "Your API key is invalid".into() };
        store.add_task("Bake bread", Some(ok), &FixedClock);
        store.add_task("Paint fence", Some(failed), &FixedClock);
        let second = store.tasks()[1].id();
        store.toggle_task(second);

        let text = render_tasks(&store);
        assert!(text.contains("  1. [ ] Bake bread"));
        assert!(text.contains("       • Buy flour"));
        assert!(text.contains("  2. [x] Paint fence"));
        assert!(!text.contains("API key"));
        assert!(text.starts_with("My tasks (2, 1 done)"));
    }

    #[test]
    fn suggestion_headers_depend_on_outcome() {
        let ok = Suggestion::Subtasks { model: "m".into(), items: vec!["a".into(), "b".into()] };
        assert_eq!(render_suggestion(&ok), "AI suggestions:\n• a\n• b");
        let failed = Suggestion::Failed { message: "nope".into() };
        assert_eq!(render_suggestion(&failed), "Error:\n❌ nope");
        let unconfigured = Suggestion::Unconfigured { message: "set a key".into() };
        assert_eq!(render_suggestion(&unconfigured), "Setup needed:\n⚠️ set a key");
    }
}

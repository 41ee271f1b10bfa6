//! Task store: the in-memory, insertion-ordered task list.
//!
//! The store lives for one session and is never persisted. Ids come from
//! the creation time in milliseconds, bumped past the previous id when the
//! clock repeats or goes backwards, so they are unique and increasing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ports::clock::Clock;
use crate::suggest::Suggestion;

/// Identifier of a task within one store.
pub type TaskId = u64;

/// A single task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    text: String,
    completed: bool,
    suggestion: Option<Suggestion>,
    created_at: DateTime<Utc>,
}

impl Task {
    /// Unique id assigned at creation.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Trimmed task text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the task has been marked done.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Suggestion captured when the task was added, if any.
    #[must_use]
    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    /// Creation time read from the clock port.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Ordered in-memory collection of tasks.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: Option<TaskId>,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new task and returns it.
    ///
    /// Returns `None` and leaves the store untouched when `text` is empty
    /// after trimming. The clock is only read for accepted tasks.
    pub fn add_task(
        &mut self,
        text: &str,
        suggestion: Option<Suggestion>,
        clock: &dyn Clock,
    ) -> Option<&Task> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let created_at = clock.now();
        let id = self.next_id(created_at);
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            completed: false,
            suggestion,
            created_at,
        });
        tracing::debug!(id, "task added");
        self.tasks.last()
    }

    /// Flips `completed` on the task with `id`. Returns `false` if no such task exists.
    pub fn toggle_task(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Removes the task with `id`. Returns `false` if no such task exists.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// All tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks marked done.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    fn next_id(&mut self, created_at: DateTime<Utc>) -> TaskId {
        let millis = TaskId::try_from(created_at.timestamp_millis()).unwrap_or(0);
        let id = match self.last_id {
            Some(last) if millis <= last => last + 1,
            _ => millis,
        };
        self.last_id = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Clock that returns queued times, repeating the last one.
    struct StepClock {
        times: Mutex<Vec<DateTime<Utc>>>,
        reads: Mutex<usize>,
    }

    impl StepClock {
        fn new(times: &[DateTime<Utc>]) -> Self {
            let mut times = times.to_vec();
            times.reverse();
            Self { times: Mutex::new(times), reads: Mutex::new(0) }
        }

        fn reads(&self) -> usize {
            *self.reads.lock().unwrap()
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            *self.reads.lock().unwrap() += 1;
            let mut times = self.times.lock().unwrap();
            if times.len() > 1 {
                times.pop().unwrap()
            } else {
                times[0]
            }
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn ids(store: &TaskStore) -> Vec<TaskId> {
        store.tasks().iter().map(Task::id).collect()
    }

    #[test]
    fn blank_text_leaves_store_unchanged() {
        let clock = StepClock::new(&[at(0)]);
        let mut store = TaskStore::new();

        assert!(store.add_task("", None, &clock).is_none());
        assert!(store.add_task("   \t\n", None, &clock).is_none());

        assert!(store.is_empty());
        assert_eq!(clock.reads(), 0);
    }

    #[test]
    fn add_appends_incomplete_task_with_trimmed_text() {
        let clock = StepClock::new(&[at(0)]);
        let mut store = TaskStore::new();

        let task = store.add_task("  Bake bread  ", None, &clock).unwrap();
        assert_eq!(task.text(), "Bake bread");
        assert!(!task.completed());
        assert!(task.suggestion().is_none());
        assert_eq!(task.created_at(), at(0));
        assert_eq!(task.id(), 1_700_000_000_000);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_keeps_suggestion() {
        let clock = StepClock::new(&[at(0)]);
        let mut store = TaskStore::new();
        let suggestion = Suggestion::Subtasks {
            model: "gemini-2.5-flash".into(),
            items: vec!["Buy flour".into()],
        };

        let task = store.add_task("Bake bread", Some(suggestion.clone()), &clock).unwrap();
        assert_eq!(task.suggestion(), Some(&suggestion));
    }

    #[test]
    fn ids_stay_unique_when_clock_repeats_or_rewinds() {
        let clock = StepClock::new(&[at(5), at(5), at(1), at(9)]);
        let mut store = TaskStore::new();
        for text in ["a", "b", "c", "d"] {
            store.add_task(text, None, &clock);
        }

        let base = 1_700_000_000_000;
        assert_eq!(ids(&store), vec![base + 5_000, base + 5_001, base + 5_002, base + 9_000]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let clock = StepClock::new(&[at(0), at(1), at(2)]);
        let mut store = TaskStore::new();
        for text in ["first", "second", "third"] {
            store.add_task(text, None, &clock);
        }
        let texts: Vec<&str> = store.tasks().iter().map(Task::text).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn toggle_flips_only_the_target() {
        let clock = StepClock::new(&[at(0), at(1)]);
        let mut store = TaskStore::new();
        store.add_task("a", None, &clock);
        store.add_task("b", None, &clock);
        let [a, b] = [ids(&store)[0], ids(&store)[1]];

        assert!(store.toggle_task(b));
        assert!(!store.get(a).unwrap().completed());
        assert!(store.get(b).unwrap().completed());
        assert_eq!(store.completed_count(), 1);

        assert!(store.toggle_task(b));
        assert!(!store.get(b).unwrap().completed());
    }

    #[test]
    fn toggle_unknown_id_changes_nothing() {
        let clock = StepClock::new(&[at(0)]);
        let mut store = TaskStore::new();
        store.add_task("a", None, &clock);
        let before = store.tasks().to_vec();

        assert!(!store.toggle_task(42));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn delete_removes_exactly_that_task() {
        let clock = StepClock::new(&[at(0), at(1), at(2)]);
        let mut store = TaskStore::new();
        for text in ["a", "b", "c"] {
            store.add_task(text, None, &clock);
        }
        let all = ids(&store);

        assert!(store.delete_task(all[1]));
        assert_eq!(ids(&store), vec![all[0], all[2]]);
    }

    #[test]
    fn delete_unknown_id_changes_nothing() {
        let clock = StepClock::new(&[at(0)]);
        let mut store = TaskStore::new();
        store.add_task("a", None, &clock);

        assert!(!store.delete_task(7));
        assert_eq!(store.len(), 1);
    }
}

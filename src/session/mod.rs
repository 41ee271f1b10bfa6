//! Interactive session: a line-oriented loop over the task store and the
//! suggestion fetcher.
//!
//! Each input line is one command. The loop keeps the draft, the pending
//! suggestion and the loading flag in [`SessionState`] and runs until the
//! user quits or input ends. A `suggest` is awaited before the next line is
//! read, so the draft cannot change while a fetch is outstanding.

pub mod command;
pub mod state;
pub mod view;

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use crate::context::ServiceContext;
use crate::store::{Task, TaskId, TaskStore};
use crate::suggest::SuggestionFetcher;

use self::command::{parse_command, SessionCommand, HELP};
use self::state::{FetchRefusal, SessionState};

/// State for the interactive session loop.
pub struct Session<R: BufRead, W: Write> {
    fetcher: SuggestionFetcher,
    state: SessionState,
    store: TaskStore,
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session with an empty task list.
    pub fn new(fetcher: SuggestionFetcher, reader: R, writer: W) -> Self {
        Self { fetcher, state: SessionState::new(), store: TaskStore::new(), reader, writer }
    }

    /// Runs the loop until `quit` or end of input and returns the final task list.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails. Suggestion
    /// failures are shown to the user and never end the session.
    pub async fn run(mut self, ctx: &ServiceContext) -> Result<TaskStore, String> {
        self.say(&view::render_banner())?;

        loop {
            self.prompt()?;
            let Some(line) = self.read_line()? else {
                break;
            };

            match parse_command(&line) {
                SessionCommand::Quit => break,
                SessionCommand::Nothing => {}
                SessionCommand::Help => self.say(HELP)?,
                SessionCommand::Invalid(hint) => self.say(&hint)?,
                SessionCommand::List => self.show_list()?,
                SessionCommand::Draft(text) => {
                    self.state.set_draft(&text);
                    if self.state.draft().trim().is_empty() {
                        self.say("Draft is empty.")?;
                    } else {
                        let msg = format!("Draft: {}", self.state.draft());
                        self.say(&msg)?;
                    }
                }
                SessionCommand::Clear => {
                    self.state.clear();
                    self.say("Draft and suggestion cleared.")?;
                }
                SessionCommand::Suggest => self.suggest(ctx).await?,
                SessionCommand::Add(text) => {
                    if let Some(text) = text {
                        self.state.set_draft(&text);
                    }
                    self.add(ctx)?;
                }
                SessionCommand::Toggle(pos) => self.toggle(pos)?,
                SessionCommand::Delete(pos) => self.delete(pos)?,
            }
        }

        tracing::info!(tasks = self.store.len(), "session ended");
        Ok(self.store)
    }

    async fn suggest(&mut self, ctx: &ServiceContext) -> Result<(), String> {
        let ticket = match self.state.begin_fetch() {
            Ok(ticket) => ticket,
            Err(FetchRefusal::EmptyDraft) => {
                return self.say("Write a draft first: draft <task text>");
            }
            Err(FetchRefusal::AlreadyLoading) => {
                return self.say("Still generating suggestions, please wait.");
            }
        };

        self.say("Generating suggestions...")?;
        let suggestion = self.fetcher.fetch(ctx.llm.as_ref(), ticket.text()).await;
        let rendered = view::render_suggestion(&suggestion);
        if self.state.finish_fetch(ticket, suggestion) {
            self.say(&rendered)?;
        }
        Ok(())
    }

    fn add(&mut self, ctx: &ServiceContext) -> Result<(), String> {
        let Some((text, suggestion)) = self.state.take_for_add() else {
            return self.say("Nothing to add: the draft is empty.");
        };
        let added = self
            .store
            .add_task(&text, suggestion, ctx.clock.as_ref())
            .map(|task| task.text().to_string());
        match added {
            Some(text) => {
                let msg = format!("Added task {}: {text}", self.store.len());
                self.say(&msg)
            }
            None => self.say("Nothing to add: the draft is empty."),
        }
    }

    fn toggle(&mut self, pos: usize) -> Result<(), String> {
        let Some(id) = self.id_at(pos) else {
            return self.say(&format!("There is no task {pos}."));
        };
        self.store.toggle_task(id);
        let done = self.store.get(id).is_some_and(Task::completed);
        let msg = if done {
            format!("Task {pos} marked done.")
        } else {
            format!("Task {pos} marked not done.")
        };
        self.say(&msg)
    }

    fn delete(&mut self, pos: usize) -> Result<(), String> {
        let Some(id) = self.id_at(pos) else {
            return self.say(&format!("There is no task {pos}."));
        };
        let text = self.store.get(id).map(|t| t.text().to_string()).unwrap_or_default();
        self.store.delete_task(id);
        self.say(&format!("Deleted task {pos}: {text}"))
    }

    fn show_list(&mut self) -> Result<(), String> {
        let mut out = view::render_tasks(&self.store);
        if !self.state.draft().trim().is_empty() {
            let _ = writeln!(out, "\nDraft: {}", self.state.draft());
        }
        if let Some(pending) = self.state.pending() {
            out.push_str(&view::render_suggestion(pending));
            out.push('\n');
        }
        write!(self.writer, "{out}").map_err(|e| format!("write error: {e}"))
    }

    /// Maps a 1-based list position to the task id shown there.
    fn id_at(&self, pos: usize) -> Option<TaskId> {
        pos.checked_sub(1).and_then(|i| self.store.tasks().get(i)).map(Task::id)
    }

    fn say(&mut self, text: &str) -> Result<(), String> {
        writeln!(self.writer, "{text}").map_err(|e| format!("write error: {e}"))
    }

    fn prompt(&mut self) -> Result<(), String> {
        write!(self.writer, "> ").map_err(|e| format!("write error: {e}"))?;
        self.writer.flush().map_err(|e| format!("flush error: {e}"))
    }

    fn read_line(&mut self) -> Result<Option<String>, String> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(|e| format!("read error: {e}"))?;
        Ok((read > 0).then_some(line))
    }
}

//! Parsing of session input lines.

/// One parsed line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Replace the draft text.
    Draft(String),
    /// Ask for AI suggestions for the draft.
    Suggest,
    /// Add the draft (optionally replaced by the given text) as a task.
    Add(Option<String>),
    /// Discard the draft and pending suggestion.
    Clear,
    /// Toggle the task at a 1-based list position.
    Toggle(usize),
    /// Delete the task at a 1-based list position.
    Delete(usize),
    /// Show the task list.
    List,
    /// Show command help.
    Help,
    /// End the session.
    Quit,
    /// Blank line.
    Nothing,
    /// Input that could not be understood, with a hint for the user.
    Invalid(String),
}

/// Help text listing every command.
pub const HELP: &str = "\
Commands:
  draft <text>   set the task you are writing
  suggest        ask Gemini for three subtasks of the draft
  add [text]     add the draft (or <text>) with any pending suggestion
  clear          discard the draft and pending suggestion
  list           show all tasks
  toggle <n>     mark task n done / not done
  delete <n>     remove task n
  help           show this help
  quit           leave (tasks are not saved)";

/// Parses one input line.
#[must_use]
pub fn parse_command(line: &str) -> SessionCommand {
    let line = line.trim();
    if line.is_empty() {
        return SessionCommand::Nothing;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "draft" => SessionCommand::Draft(rest.to_string()),
        "suggest" => SessionCommand::Suggest,
        "add" if rest.is_empty() => SessionCommand::Add(None),
        "add" => SessionCommand::Add(Some(rest.to_string())),
        "clear" => SessionCommand::Clear,
        "toggle" | "done" => {
            parse_position(rest).map_or_else(SessionCommand::Invalid, SessionCommand::Toggle)
        }
        "delete" | "rm" => {
            parse_position(rest).map_or_else(SessionCommand::Invalid, SessionCommand::Delete)
        }
        "list" | "ls" => SessionCommand::List,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => {
            SessionCommand::Invalid(format!("Unknown command '{other}'. Type 'help' for commands."))
        }
    }
}

fn parse_position(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Expected a task number from the list, got '{arg}'")),
    }
}

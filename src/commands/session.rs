//! `taskspark session` command.

use std::io;

use crate::context::ServiceContext;
use crate::session::Session;
use crate::suggest::SuggestionFetcher;

/// Runs an interactive session on stdin/stdout.
///
/// # Errors
///
/// Returns an error string if terminal I/O fails.
pub async fn run(ctx: &ServiceContext, fetcher: SuggestionFetcher) -> Result<(), String> {
    let stdin = io::stdin();
    let session = Session::new(fetcher, stdin.lock(), io::stdout());
    let store = session.run(ctx).await?;
    tracing::debug!(remaining = store.len(), "tasks discarded at exit");
    Ok(())
}

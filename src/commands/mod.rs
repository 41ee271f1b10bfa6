//! Command dispatch and handlers.

pub mod session;
pub mod suggest;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::suggest::SuggestionFetcher;

/// Dispatch a parsed command to its handler.
///
/// When `TASKSPARK_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files below that directory.
///
/// # Errors
///
/// Returns an error string if configuration is invalid, the runtime cannot
/// start, or the selected command handler fails.
pub fn dispatch(command: Option<&Command>) -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;

    let (ctx, session) = if let Some(root) = &config.record_dir {
        let (ctx, session) = ServiceContext::recording_at(&config, root)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config), None)
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    let fetcher = SuggestionFetcher::from_config(&config);
    let result = runtime.block_on(dispatch_with_context(command, &ctx, fetcher));

    // Finish recording after the command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
async fn dispatch_with_context(
    command: Option<&Command>,
    ctx: &ServiceContext,
    fetcher: SuggestionFetcher,
) -> Result<(), String> {
    match command {
        None | Some(Command::Session) => session::run(ctx, fetcher).await,
        Some(Command::Suggest { text }) => {
            suggest::run(ctx, &fetcher, text, &mut std::io::stdout()).await
        }
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

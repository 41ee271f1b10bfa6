//! `taskspark suggest` command.

use std::io::Write;

use crate::context::ServiceContext;
use crate::session::view::render_suggestion;
use crate::suggest::SuggestionFetcher;

/// Fetches suggestions for `words` joined by spaces and writes the outcome.
///
/// A failed fetch is reported in the output, not as an error.
///
/// # Errors
///
/// Returns an error string if writing the output fails.
pub async fn run<W: Write>(
    ctx: &ServiceContext,
    fetcher: &SuggestionFetcher,
    words: &[String],
    out: &mut W,
) -> Result<(), String> {
    let text = words.join(" ");
    let suggestion = fetcher.fetch(ctx.llm.as_ref(), &text).await;
    writeln!(out, "{}", render_suggestion(&suggestion)).map_err(|e| format!("write error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::clock::Clock;
    use crate::ports::llm::{GenerateRequest, GenerateResponse, LlmClient, LlmError, LlmFuture};
    use crate::suggest::MISSING_KEY_MESSAGE;

    struct UnusedClock;
    impl Clock for UnusedClock {
        fn now(&self) -> chrono::DateTime<chrono::Utc> {
            panic!("clock should not be read");
        }
    }

    struct EchoLlm;
    impl LlmClient for EchoLlm {
        fn generate(&self, _request: &GenerateRequest) -> LlmFuture<'_> {
            let text = "```json\n[\"Pick a route\", \"Pack water\"]\n```".to_string();
            let result: Result<GenerateResponse, LlmError> = Ok(GenerateResponse { text });
            Box::pin(async move { result })
        }
    }

    fn ctx() -> ServiceContext {
        ServiceContext { clock: Box::new(UnusedClock), llm: Box::new(EchoLlm) }
    }

    #[tokio::test]
    async fn prints_bulleted_suggestions() {
        let fetcher = SuggestionFetcher::new(vec!["m".into()], true);
        let mut out = Vec::new();
        run(&ctx(), &fetcher, &["Go".into(), "hiking".into()], &mut out).await.unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "AI suggestions:\n• Pick a route\n• Pack water\n");
    }

    #[tokio::test]
    async fn missing_key_is_printed_not_returned() {
        let fetcher = SuggestionFetcher::new(vec!["m".into()], false);
        let mut out = Vec::new();
        run(&ctx(), &fetcher, &["Go".into()], &mut out).await.unwrap();
        assert!(String::from_utf8(out).unwrap().contains(MISSING_KEY_MESSAGE));
    }
}

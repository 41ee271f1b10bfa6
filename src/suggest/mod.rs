//! Suggestion fetcher: asks a language model for three subtasks of a task.
//!
//! Candidate models are tried strictly in order, one call each. The first
//! response that yields a non-empty JSON array wins. When every candidate
//! fails, the last error is mapped to a user-facing message; nothing is
//! returned to the caller as an error.

pub mod parse;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::ports::llm::{GenerateRequest, LlmClient};
use parse::ParseFailure;

/// Where users manage their Gemini API keys.
pub const API_KEY_PAGE: &str = "https://aistudio.google.com/app/apikey";

/// Prefix marking a failed suggestion when rendered.
pub const FAILURE_MARKER: &str = "❌";

/// Prefix marking a configuration problem; no request was made.
pub const WARNING_MARKER: &str = "⚠️";

/// Shown when no credential is configured.
pub const MISSING_KEY_MESSAGE: &str =
    "API key not configured. Set GEMINI_API_KEY in your environment or .env file";

/// Shown when the provider rejects the credential.
pub const INVALID_KEY_MESSAGE: &str =
    "Your API key is invalid. Generate a new one at https://aistudio.google.com/app/apikey";

/// Shown when no candidate model exists for the credential.
pub const MODEL_NOT_FOUND_MESSAGE: &str = "The models are not available; your API key may be \
     outdated. Generate a new one at https://aistudio.google.com/app/apikey";

/// Shown when the credential lacks access to the API.
pub const PERMISSION_DENIED_MESSAGE: &str = "Your API key does not have permission. Check that \
     the Gemini API is enabled for your Google Cloud project: https://aistudio.google.com/app/apikey";

/// Shown when the candidate list was empty.
pub const NO_MODEL_MESSAGE: &str = "Could not reach any Gemini model. Check your API key at \
     https://aistudio.google.com/app/apikey";

/// Outcome of one suggestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    /// Subtasks parsed from a model response.
    Subtasks {
        /// Candidate model that produced the answer.
        model: String,
        /// One or more subtask lines.
        items: Vec<String>,
    },
    /// A user-facing failure description.
    Failed {
        /// Message without the failure marker.
        message: String,
    },
    /// Suggestions are unavailable until the credential is configured.
    Unconfigured {
        /// Message without the warning marker.
        message: String,
    },
}

impl Suggestion {
    /// Whether this is a failure or configuration message rather than subtasks.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Subtasks { .. })
    }

    /// The subtask lines, empty for failures.
    #[must_use]
    pub fn items(&self) -> &[String] {
        match self {
            Self::Subtasks { items, .. } => items,
            Self::Failed { .. } | Self::Unconfigured { .. } => &[],
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subtasks { items, .. } => write!(f, "• {}", items.join("\n• ")),
            Self::Failed { message } => write!(f, "{FAILURE_MARKER} {message}"),
            Self::Unconfigured { message } => write!(f, "{WARNING_MARKER} {message}"),
        }
    }
}

/// Everything that can go wrong while fetching suggestions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SuggestError {
    /// The task text was blank.
    #[error("Enter a task before asking for suggestions")]
    EmptyTask,
    /// No API key is configured; no request was made.
    #[error("{}", MISSING_KEY_MESSAGE)]
    MissingApiKey,
    /// The transport or provider rejected the request.
    #[error("{model}: {message}")]
    Provider {
        /// Candidate model id.
        model: String,
        /// Provider or transport error text.
        message: String,
    },
    /// The response held no parseable JSON array.
    #[error("{model}: response was not valid JSON: {message}")]
    Parse {
        /// Candidate model id.
        model: String,
        /// Parser error text.
        message: String,
    },
    /// The response was JSON but not an array.
    #[error("{model}: response was not a JSON list")]
    NotAList {
        /// Candidate model id.
        model: String,
    },
    /// The response was an empty array.
    #[error("{model}: response contained no subtasks")]
    EmptyList {
        /// Candidate model id.
        model: String,
    },
    /// There were no candidates to try.
    #[error("{}", NO_MODEL_MESSAGE)]
    NoModelResponded,
}

impl SuggestError {
    fn from_parse(model: &str, failure: ParseFailure) -> Self {
        let model = model.to_string();
        match failure {
            ParseFailure::Json(message) => Self::Parse { model, message },
            ParseFailure::NotAList => Self::NotAList { model },
            ParseFailure::EmptyList => Self::EmptyList { model },
        }
    }

    /// Maps the error to the message shown to the user.
    ///
    /// Provider errors are categorized by the markers Google puts in error
    /// bodies. Anything unrecognized is shown as the underlying message,
    /// without the model id.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider { message, .. } => {
                if message.contains("API_KEY_INVALID") || message.contains("401") {
                    INVALID_KEY_MESSAGE.to_string()
                } else if message.contains("404") {
                    MODEL_NOT_FOUND_MESSAGE.to_string()
                } else if message.contains("PERMISSION_DENIED") || message.contains("403") {
                    PERMISSION_DENIED_MESSAGE.to_string()
                } else {
                    message.clone()
                }
            }
            Self::Parse { message, .. } => message.clone(),
            Self::NotAList { .. } => "The response was not a JSON list".to_string(),
            Self::EmptyList { .. } => "The response contained no subtasks".to_string(),
            Self::EmptyTask | Self::MissingApiKey | Self::NoModelResponded => self.to_string(),
        }
    }
}

/// Builds the instruction prompt for `task_text`.
#[must_use]
pub fn build_prompt(task_text: &str) -> String {
    format!(
        "You are a productivity assistant. Analyze this task: \"{task_text}\"\n\
         \n\
         Your job is to suggest exactly 3 specific, concrete and actionable subtasks \
         to complete this task effectively.\n\
         \n\
         IMPORTANT: Reply ONLY with a JSON array of strings. Do NOT add explanations, \
         do NOT use markdown formatting, do NOT include any extra text.\n\
         \n\
         Expected format:\n\
         [\"Specific subtask 1\", \"Specific subtask 2\", \"Specific subtask 3\"]\n\
         \n\
         Example for \"Learn React\":\n\
         [\"Complete the official React tutorial at react.dev\", \
         \"Build a simple to-do app using hooks\", \
         \"Study component lifecycle and state management\"]"
    )
}

/// Tries candidate models in order until one yields subtasks.
#[derive(Debug, Clone)]
pub struct SuggestionFetcher {
    models: Vec<String>,
    credential_configured: bool,
}

impl SuggestionFetcher {
    /// Creates a fetcher over `models` in preference order.
    #[must_use]
    pub fn new(models: Vec<String>, credential_configured: bool) -> Self {
        Self { models, credential_configured }
    }

    /// Creates a fetcher from the configured model list and API key.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.models.clone(), config.api_key.is_some())
    }

    /// Candidate models in the order they are tried.
    #[must_use]
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Fetches suggestions, folding a missing credential into
    /// [`Suggestion::Unconfigured`] and every other failure into
    /// [`Suggestion::Failed`].
    pub async fn fetch(&self, llm: &dyn LlmClient, task_text: &str) -> Suggestion {
        match self.try_fetch(llm, task_text).await {
            Ok(suggestion) => suggestion,
            Err(SuggestError::MissingApiKey) => {
                Suggestion::Unconfigured { message: MISSING_KEY_MESSAGE.to_string() }
            }
            Err(err) => {
                tracing::error!(error = %err, "no candidate model produced suggestions");
                Suggestion::Failed { message: err.user_message() }
            }
        }
    }

    /// Fetches suggestions, returning the raw error of the last candidate on failure.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError::EmptyTask`] or [`SuggestError::MissingApiKey`]
    /// without calling the model; otherwise the last candidate's error, or
    /// [`SuggestError::NoModelResponded`] if there were no candidates.
    pub async fn try_fetch(
        &self,
        llm: &dyn LlmClient,
        task_text: &str,
    ) -> Result<Suggestion, SuggestError> {
        let task_text = task_text.trim();
        if task_text.is_empty() {
            return Err(SuggestError::EmptyTask);
        }
        if !self.credential_configured {
            tracing::warn!("Gemini API key missing; skipping suggestion request");
            return Err(SuggestError::MissingApiKey);
        }

        let prompt = build_prompt(task_text);
        let mut last_error = None;

        for model in &self.models {
            tracing::info!(%model, "trying candidate model");
            let request = GenerateRequest { model: model.clone(), prompt: prompt.clone() };

            let outcome = match llm.generate(&request).await {
                Ok(response) => {
                    tracing::debug!(%model, text = %response.text, "model responded");
                    parse::parse_subtasks(&response.text)
                        .map_err(|failure| SuggestError::from_parse(model, failure))
                }
                Err(e) => {
                    Err(SuggestError::Provider { model: model.clone(), message: e.to_string() })
                }
            };

            match outcome {
                Ok(items) => {
                    tracing::info!(%model, count = items.len(), "suggestions ready");
                    return Ok(Suggestion::Subtasks { model: model.clone(), items });
                }
                Err(err) => {
                    tracing::warn!(%model, error = %err, "candidate model failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(SuggestError::NoModelResponded))
    }
}

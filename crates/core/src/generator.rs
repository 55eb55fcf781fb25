use crate::error::AnswerError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions \
based on the provided context. If the context doesn't contain relevant \
information, say so.";

/// Composes a prompt from retrieved chunks and a question, submits it to a
/// hosted model, and returns the model's response verbatim.
#[async_trait]
pub trait AnswerGenerator {
    /// Cheap readiness check run before the pipeline enters its query state.
    fn validate(&self) -> Result<(), AnswerError> {
        Ok(())
    }

    async fn answer(&self, question: &str, context: &[String]) -> Result<String, AnswerError>;
}

/// Resolves the model credential: explicit configuration first, then the
/// `OPENAI_API_KEY` environment variable as one more explicit source.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String, AnswerError> {
    let explicit = explicit.filter(|key| !key.trim().is_empty());
    let from_env = || {
        std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
    };

    explicit.or_else(from_env).ok_or_else(|| {
        AnswerError::Credential(format!(
            "no api key configured and {API_KEY_ENV_VAR} is unset"
        ))
    })
}

/// Context blocks in retrieval-rank order, numbered and delimited, followed
/// by the question. Deterministic for a given input.
pub fn build_prompt(question: &str, context: &[String]) -> String {
    let blocks = context
        .iter()
        .enumerate()
        .map(|(position, text)| format!("[{}] {text}", position + 1))
        .collect::<Vec<_>>()
        .join("\n---\n");

    format!("Context:\n{blocks}\n\nQuestion: {question}")
}

fn retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

struct AttemptError {
    error: AnswerError,
    transient: bool,
}

/// Chat-completions client for OpenAI-compatible endpoints. Applies a
/// per-request timeout and a bounded retry with doubling backoff for
/// transient failures only.
pub struct OpenAiGenerator {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, AnswerError> {
        let api_key = resolve_api_key(config.api_key)?;
        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        ))?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model,
            temperature: config.temperature,
        })
    }

    async fn send_once(&self, prompt: &str) -> Result<String, AttemptError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|error| AttemptError {
                transient: error.is_timeout() || error.is_connect(),
                error: AnswerError::Http(error),
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AttemptError {
                error: AnswerError::Credential(format!(
                    "model endpoint rejected the api key: {status}"
                )),
                transient: false,
            });
        }
        if !status.is_success() {
            return Err(AttemptError {
                transient: retryable_status(status),
                error: AnswerError::Generation(format!("chat completion returned {status}")),
            });
        }

        let payload: ChatResponse = response.json().await.map_err(|error| AttemptError {
            error: AnswerError::Http(error),
            transient: false,
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AttemptError {
                error: AnswerError::Generation("chat completion had no choices".to_string()),
                transient: false,
            })
    }
}

#[async_trait]
impl AnswerGenerator for OpenAiGenerator {
    async fn answer(&self, question: &str, context: &[String]) -> Result<String, AnswerError> {
        let prompt = build_prompt(question, context);
        let mut backoff = INITIAL_BACKOFF;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.send_once(&prompt).await {
                Ok(answer) => return Ok(answer),
                Err(failed) if failed.transient && attempt < MAX_ATTEMPTS => {
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(failed) => return Err(failed.error),
            }
        }

        Err(AnswerError::Generation(format!(
            "gave up after {MAX_ATTEMPTS} attempts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::{build_prompt, resolve_api_key, retryable_status, API_KEY_ENV_VAR};
    use crate::error::AnswerError;
    use reqwest::StatusCode;

    #[test]
    fn prompt_keeps_retrieval_rank_order_and_delimits_blocks() {
        let context = vec!["alpha".to_string(), "beta".to_string()];
        let prompt = build_prompt("what?", &context);

        assert_eq!(
            prompt,
            "Context:\n[1] alpha\n---\n[2] beta\n\nQuestion: what?"
        );
    }

    #[test]
    fn prompt_assembly_is_deterministic() {
        let context = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        assert_eq!(
            build_prompt("q", &context),
            build_prompt("q", &context)
        );
    }

    #[test]
    fn rate_limits_and_server_errors_are_retryable() {
        assert!(retryable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!retryable_status(StatusCode::BAD_REQUEST));
        assert!(!retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!retryable_status(StatusCode::NOT_FOUND));
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        // Covers precedence and the missing-credential error in one test to
        // avoid racing other tests on the process environment.
        std::env::set_var(API_KEY_ENV_VAR, "env-key");
        let resolved = resolve_api_key(Some("explicit-key".to_string())).unwrap();
        assert_eq!(resolved, "explicit-key");

        let resolved = resolve_api_key(None).unwrap();
        assert_eq!(resolved, "env-key");

        std::env::remove_var(API_KEY_ENV_VAR);
        let result = resolve_api_key(Some("   ".to_string()));
        assert!(matches!(result, Err(AnswerError::Credential(_))));
    }
}

use std::time::Duration;

use crate::error::AppError;
use crate::utils::debug_enabled;

use super::types::{ApiErrorBody, Message, MessagesRequest, MessagesResponse, SystemPrompt};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_OUTPUT_TOKENS: u32 = 4000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const SEND_RETRIES: usize = 3;
const RETRY_BACKOFF_MS: u64 = 500;

pub(crate) struct ApiClient {
    agent: ureq::Agent,
    api_key: String,
}

impl ApiClient {
    pub(crate) fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AppError::MissingApiKey)?;

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self { agent, api_key })
    }

    /// Send one generation request. Retries transient failures (transport
    /// errors, 429, 5xx) with linear backoff; API errors are terminal.
    pub(crate) fn generate(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        cache_enabled: bool,
    ) -> Result<MessagesResponse, AppError> {
        let request = MessagesRequest {
            model: model.to_string(),
            max_tokens: MAX_OUTPUT_TOKENS,
            system: SystemPrompt::new(system_prompt, cache_enabled),
            messages: vec![Message {
                role: "user",
                content: user_prompt.to_string(),
            }],
        };

        let mut last_failure = String::new();
        for attempt in 0..SEND_RETRIES {
            if attempt > 0 {
                std::thread::sleep(Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64));
                if debug_enabled() {
                    eprintln!("Retrying request (attempt {})", attempt + 1);
                }
            }

            match self.send(&request) {
                Ok(response) => return Ok(response),
                Err(Retryable::Yes(reason)) => last_failure = reason,
                Err(Retryable::No(err)) => return Err(err),
            }
        }

        Err(AppError::Http {
            url: MESSAGES_URL.to_string(),
            reason: last_failure,
        })
    }

    fn send(&self, request: &MessagesRequest) -> Result<MessagesResponse, Retryable> {
        let response = self
            .agent
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send_json(request)
            .map_err(|e| Retryable::Yes(e.to_string()))?;

        let status = response.status();
        let mut body = response.into_body();

        if status.is_success() {
            return serde_json::from_reader(body.as_reader())
                .map_err(|e| Retryable::No(AppError::Api(format!("malformed response: {e}"))));
        }

        let detail = serde_json::from_reader::<_, ApiErrorBody>(body.as_reader())
            .map(|b| format!("{}: {}", b.error.kind, b.error.message))
            .unwrap_or_else(|_| format!("HTTP {status}"));

        if status.as_u16() == 429 || status.is_server_error() {
            Err(Retryable::Yes(detail))
        } else {
            Err(Retryable::No(AppError::Api(detail)))
        }
    }
}

enum Retryable {
    Yes(String),
    No(AppError),
}

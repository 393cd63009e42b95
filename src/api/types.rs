//! Serde types for the Anthropic Messages API.

use serde::{Deserialize, Serialize};

use crate::pricing::TokenUsage;

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest {
    pub(crate) model: String,
    pub(crate) max_tokens: u32,
    pub(crate) system: SystemPrompt,
    pub(crate) messages: Vec<Message>,
}

/// The system prompt is either a plain string or, when prompt caching is
/// on, a block list carrying a `cache_control` marker.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum SystemPrompt {
    Plain(String),
    Blocks(Vec<SystemBlock>),
}

impl SystemPrompt {
    pub(crate) fn new(text: &str, cache_enabled: bool) -> Self {
        if cache_enabled {
            SystemPrompt::Blocks(vec![SystemBlock {
                kind: "text",
                text: text.to_string(),
                cache_control: Some(CacheControl { kind: "ephemeral" }),
            }])
        } else {
            SystemPrompt::Plain(text.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SystemBlock {
    #[serde(rename = "type")]
    pub(crate) kind: &'static str,
    pub(crate) text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) cache_control: Option<CacheControl>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CacheControl {
    #[serde(rename = "type")]
    pub(crate) kind: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub(crate) role: &'static str,
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    pub(crate) id: String,
    pub(crate) model: String,
    #[serde(default)]
    pub(crate) stop_reason: Option<String>,
    #[serde(default)]
    pub(crate) content: Vec<ContentBlock>,
    #[serde(default)]
    pub(crate) usage: ApiUsage,
}

impl MessagesResponse {
    /// Concatenated text of all text content blocks
    pub(crate) fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentBlock {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    #[serde(default)]
    pub(crate) text: String,
}

/// Usage block from the response; absent counts default to zero
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiUsage {
    #[serde(default)]
    pub(crate) input_tokens: i64,
    #[serde(default)]
    pub(crate) output_tokens: i64,
    #[serde(default)]
    pub(crate) cache_creation_input_tokens: i64,
    #[serde(default)]
    pub(crate) cache_read_input_tokens: i64,
}

impl ApiUsage {
    pub(crate) fn to_token_usage(&self) -> TokenUsage {
        TokenUsage {
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            cache_creation_input_tokens: self.cache_creation_input_tokens,
            cache_read_input_tokens: self.cache_read_input_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub(super) error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    pub(super) kind: String,
    pub(super) message: String,
}

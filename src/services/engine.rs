use crate::error::{LectureSplitError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_CLAUDE_PROGRAM: &str = "claude";
pub const DEFAULT_API_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_RESPONSE_TOKENS: u32 = 8192;

/// A text reasoning engine: takes fixed instructions plus a task input and
/// returns the raw model output.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn run(&self, instructions: &str, input: &str, model: &str) -> Result<String>;
}

/// Runs the `claude` command line tool in print mode, feeding the task input
/// through stdin.
pub struct ClaudeCliEngine {
    program: String,
}

impl ClaudeCliEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ClaudeCliEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CLAUDE_PROGRAM)
    }
}

#[async_trait]
impl ReasoningEngine for ClaudeCliEngine {
    async fn run(&self, instructions: &str, input: &str, model: &str) -> Result<String> {
        info!("Invoking {} with model '{}'", self.program, model);

        let mut child = Command::new(&self.program)
            .arg("--print")
            .arg("--model")
            .arg(model)
            .arg("--system-prompt")
            .arg(instructions)
            .arg("--output-format")
            .arg("text")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LectureSplitError::Engine {
                reason: format!("failed to launch '{}': {}", self.program, e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input.as_bytes()).await {
                Ok(()) => {}
                // Child exited without reading; its status is reported below.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("'{}' closed stdin early", self.program);
                }
                Err(e) => {
                    return Err(LectureSplitError::Engine {
                        reason: format!("failed to write prompt to '{}': {}", self.program, e),
                    });
                }
            }
            // Dropping stdin here sends EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| LectureSplitError::Engine {
                reason: format!("failed to read output of '{}': {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(LectureSplitError::Engine {
                reason: format!(
                    "'{}' exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Engine returned {} bytes", stdout.len());
        Ok(stdout)
    }
}

/// Calls the Anthropic Messages API directly.
pub struct AnthropicApiEngine {
    api_key: String,
    base_url: Url,
    client: reqwest::Client,
}

impl AnthropicApiEngine {
    pub fn new(api_key: String, base_url: &str) -> Result<Self> {
        Ok(Self {
            api_key,
            base_url: Url::parse(base_url)?,
            client: reqwest::Client::new(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl ReasoningEngine for AnthropicApiEngine {
    async fn run(&self, instructions: &str, input: &str, model: &str) -> Result<String> {
        info!("Calling Anthropic API with model '{}'", model);

        let request = serde_json::json!({
            "model": model,
            "max_tokens": MAX_RESPONSE_TOKENS,
            "system": instructions,
            "messages": [
                {
                    "role": "user",
                    "content": input
                }
            ]
        });

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LectureSplitError::Engine {
                reason: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LectureSplitError::Engine {
                reason: format!("API returned {}: {}", status.as_u16(), error_text),
            });
        }

        let response_data: serde_json::Value =
            response.json().await.map_err(|e| LectureSplitError::Engine {
                reason: format!("failed to read API response: {}", e),
            })?;

        response_data["content"][0]["text"]
            .as_str()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| LectureSplitError::MalformedResponse {
                reason: "API response has no text content".to_string(),
            })
    }
}

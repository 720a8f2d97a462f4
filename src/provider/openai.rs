use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::Config;
use crate::errors::ForgeError;
use crate::wire::PromptDocument;

/// OpenAI chat provider. Fixed sampling temperature, bounded request
/// timeout, verbose request/response dumps when debug is on. The API key is
/// validated by `Config::from_env` before this type is ever constructed.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    verbose: bool,
}

impl OpenAiProvider {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            timeout_secs: cfg.timeout_secs,
            verbose: cfg.verbose,
        }
    }
}

#[async_trait]
impl super::Provider for OpenAiProvider {
    async fn generate(&self, prompt: &PromptDocument) -> Result<String, ForgeError> {
        let body = json!({
            "model": self.model,
            "messages": prompt.messages,
            "temperature": self.temperature,
        });

        if self.verbose {
            eprintln!(
                "debug[openai]: HTTP POST /v1/chat/completions body:\n{}",
                serde_json::to_string_pretty(&body).unwrap_or_default()
            );
        }

        println!("Ready to invoke the model ({})", self.model);

        let resp = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::Generation(format!("model call failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ForgeError::Generation(format!("model response unreadable: {e}")))?;

        if self.verbose {
            eprintln!("debug[openai]: raw status: {status}");
            eprintln!("debug[openai]: raw response:\n{text}");
        }

        if !status.is_success() {
            return Err(ForgeError::Generation(format!(
                "OpenAI API error ({status}): {text}"
            )));
        }

        #[derive(Deserialize)]
        struct ChatMessage {
            content: String,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChatMessage,
        }
        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| ForgeError::Generation(format!("cannot parse OpenAI response: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(ForgeError::Generation("model returned an empty completion".into()));
        }

        println!("Invoked successfully ({} bytes)", content.len());
        Ok(content)
    }
}

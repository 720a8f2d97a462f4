use serde::{Deserialize, Serialize};

use crate::errors::ForgeError;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Resolved once at pipeline start; never read from the environment again.
    pub api_key: String,
    pub model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub verbose: bool,
    /// Directory holding `vectors.sqlite`.
    pub index_dir: String,
    /// Scaffolded projects land under `<tmp_dir>/<entity_name>/`.
    pub tmp_dir: String,
    pub scaffold_tool: String,
    pub scaffold_template: String,
    pub scaffold_region: String,
    pub package_manager: String,
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
    pub timeout_secs: u64,
    pub save_request: bool,
    pub save_response: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4".into(),
            embedding_model: "text-embedding-3-small".into(),
            temperature: 0.6,
            verbose: false,
            index_dir: "index".into(),
            tmp_dir: "tmp".into(),
            scaffold_tool: "genezio".into(),
            scaffold_template: "onboarding-ts".into(),
            scaffold_region: "eu-central-1".into(),
            package_manager: "npm".into(),
            poll_attempts: 10,
            poll_interval_ms: 1000,
            timeout_secs: 120,
            save_request: false,
            save_response: false,
        }
    }
}

impl Config {
    /// Resolve the API key from the environment exactly once. Absence is a
    /// fatal precondition: nothing downstream runs without it.
    pub fn from_env() -> Result<Self, ForgeError> {
        Self::from_parts(std::env::var(API_KEY_VAR).ok())
    }

    pub fn from_parts(api_key: Option<String>) -> Result<Self, ForgeError> {
        let api_key = match api_key {
            Some(k) if !k.trim().is_empty() => k,
            _ => {
                return Err(ForgeError::MissingCredential(format!(
                    "{API_KEY_VAR} is not set; get a key at https://platform.openai.com/account/api-keys"
                )))
            }
        };
        Ok(Self { api_key, ..Self::default() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_precondition_failure() {
        let err = Config::from_parts(None).unwrap_err();
        assert!(matches!(err, ForgeError::MissingCredential(_)));
    }

    #[test]
    fn blank_key_is_rejected_too() {
        let err = Config::from_parts(Some("   ".into())).unwrap_err();
        assert!(matches!(err, ForgeError::MissingCredential(_)));
    }

    #[test]
    fn defaults_match_the_generation_contract() {
        let cfg = Config::from_parts(Some("sk-test".into())).unwrap();
        assert_eq!(cfg.model, "gpt-4");
        assert!((cfg.temperature - 0.6).abs() < f32::EPSILON);
        assert_eq!(cfg.scaffold_template, "onboarding-ts");
        assert_eq!(cfg.scaffold_region, "eu-central-1");
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ========================================
/// Pipeline data model
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

/// Ordered role-tagged segments sent to the model: persona first, then the
/// retrieved context (once injected), then the numbered task rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDocument {
    pub messages: Vec<PromptMessage>,
}

impl PromptDocument {
    pub fn new(messages: Vec<PromptMessage>) -> Self {
        Self { messages }
    }

    /// Inject the retrieved passage between the persona segment and the task
    /// segment. The document is not mutated again after this point.
    pub fn insert_context(&mut self, passage: &str) {
        let msg = PromptMessage {
            role: Role::User,
            content: format!(
                "Reference implementation retrieved from the knowledge base. \
                 Use it as a style and structure example where it applies:\n\n{passage}"
            ),
        };
        let at = self.messages.len().min(1);
        self.messages.insert(at, msg);
    }
}

/// One service to generate. Immutable once constructed; empty strings mean
/// "absent" for `orm_name` and `connection_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub entity_name: String,
    /// Comma-separated method names, interpolated verbatim into the prompt.
    pub method_list: String,
    pub requirement: String,
    pub orm_name: String,
    pub connection_url: String,
}

impl GenerationRequest {
    pub fn has_orm(&self) -> bool {
        !self.orm_name.is_empty()
    }
}

/// Parsed, validated model output. `source_text` contains a class declaration
/// whose name equals `class_name`; neither is empty. `imported_packages`
/// preserves source order and may repeat — dedup belongs to the reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub class_name: String,
    pub source_text: String,
    pub imported_packages: Vec<String>,
}

/// Outcome of one per-entity run, for the dashboard.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub entity_name: String,
    pub class_name: String,
    pub project_dir: PathBuf,
    pub installed: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_lands_between_persona_and_task() {
        let mut doc = PromptDocument::new(vec![
            PromptMessage { role: Role::System, content: "persona".into() },
            PromptMessage { role: Role::User, content: "task".into() },
        ]);
        doc.insert_context("some passage");

        assert_eq!(doc.messages.len(), 3);
        assert_eq!(doc.messages[0].content, "persona");
        assert!(doc.messages[1].content.contains("some passage"));
        assert_eq!(doc.messages[1].role, Role::User);
        assert_eq!(doc.messages[2].content, "task");
    }

    #[test]
    fn roles_serialize_lowercase() {
        let msg = PromptMessage { role: Role::System, content: "x".into() };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"system""#));
    }
}

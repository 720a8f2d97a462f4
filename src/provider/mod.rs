use async_trait::async_trait;

use crate::errors::ForgeError;
use crate::wire::PromptDocument;

pub mod openai;

/// Model invocation seam. One call per request; a failed call fails the
/// whole request — there is no retry layer.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, prompt: &PromptDocument) -> Result<String, ForgeError>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

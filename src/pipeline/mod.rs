use anyhow::Result;
use uuid::Uuid;

use crate::config::Config;
use crate::deps;
use crate::log;
use crate::parse;
use crate::prompt;
use crate::provider::DynProvider;
use crate::retrieval::Retriever;
use crate::scaffold;
use crate::wire::{GenerationRequest, RunReport};

/// Drives one request through the six stages in order. Requests never share
/// state: each gets its own prompt, response, and project directory, and
/// each stage owns its output until the next stage consumes it.
pub struct Pipeline {
    cfg: Config,
    provider: DynProvider,
    retriever: Box<dyn Retriever>,
}

impl Pipeline {
    pub fn new(cfg: Config, provider: DynProvider, retriever: Box<dyn Retriever>) -> Self {
        Self { cfg, provider, retriever }
    }

    /// Prompt → retrieve → generate → parse → materialize → reconcile.
    /// Every stage raises; nothing here recovers or retries.
    pub async fn create_project(&self, req: &GenerationRequest) -> Result<RunReport> {
        let run = Uuid::new_v4();
        println!("\n=== {} (run {run}) ===", req.entity_name);

        let mut doc = prompt::build(req);

        let passage = self.retriever.retrieve(&req.requirement).await?;
        doc.insert_context(&passage);

        let raw = self.provider.generate(&doc).await?;

        let saved = log::save_stage("generate", &doc, &raw, run, &req.entity_name, &self.cfg)?;
        if self.cfg.verbose {
            log::print_saved_paths("generate", &saved);
        }

        let artifact = parse::parse(&raw).map_err(crate::errors::ForgeError::from)?;
        println!("Parsed class {} ({} imports)", artifact.class_name, artifact.imported_packages.len());

        let project_dir = scaffold::materialize(&self.cfg, &req.entity_name, &artifact).await?;

        let installed = deps::reconcile(&self.cfg, &project_dir, &artifact.imported_packages)?;

        Ok(RunReport {
            entity_name: req.entity_name.clone(),
            class_name: artifact.class_name,
            project_dir,
            installed,
        })
    }
}

use chrono::Utc;
use fs_err as fs;
use serde_json::{json, to_string_pretty};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::Config;
use crate::wire::PromptDocument;

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

fn run_dir(run: Uuid) -> PathBuf {
    Path::new(".forge").join("runs").join(run.to_string())
}

/// Persist the generation stage's prompt and raw response for a run, gated
/// on the save flags. A small manifest stamps the run regardless, so the
/// directory is self-describing.
pub fn save_stage(
    stage: &str,
    prompt: &PromptDocument,
    raw_response: &str,
    run: Uuid,
    entity_name: &str,
    cfg: &Config,
) -> anyhow::Result<SavedPaths> {
    let dir = run_dir(run);
    fs::create_dir_all(&dir)?;

    let manifest = json!({
        "run": run,
        "entity": entity_name,
        "model": cfg.model,
        "timestamp": Utc::now(),
    });
    fs::write(dir.join("run.json"), to_string_pretty(&manifest)?)?;

    let mut request_path = None;
    let mut response_path = None;

    if cfg.save_request {
        let p = dir.join(format!("{stage}.request.json"));
        fs::write(&p, to_string_pretty(prompt)?)?;
        request_path = Some(p);
    }

    if cfg.save_response {
        let p = dir.join(format!("{stage}.response.txt"));
        fs::write(&p, raw_response)?;
        response_path = Some(p);
    }

    Ok(SavedPaths { dir, request: request_path, response: response_path })
}

pub fn print_saved_paths(stage: &str, saved: &SavedPaths) {
    println!("debug[{stage}]: artifacts directory: {}", saved.dir.display());
    if let Some(p) = &saved.request {
        println!("debug[{stage}]: request saved at: {}", p.display());
    } else {
        println!("debug[{stage}]: request not saved (flag off)");
    }
    if let Some(p) = &saved.response {
        println!("debug[{stage}]: response saved at: {}", p.display());
    } else {
        println!("debug[{stage}]: response not saved (flag off)");
    }
    std::io::stdout().flush().ok();
}

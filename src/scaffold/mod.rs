use colored::Colorize;
use fs_err as fs;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::errors::ForgeError;
use crate::exec;
use crate::wire::GeneratedArtifact;

/// Template artifacts that have no meaning for a generated service:
/// deployment descriptor, ignore file, linter config.
const TEMPLATE_ONLY_FILES: &[&str] = &["genezio.yaml", ".gitignore", ".eslintrc.json"];

/// The scaffold template pins this dependency for its own sample code.
const TEMPLATE_ONLY_DEP: &str = "@genezio/types";

/// Scaffold a fresh project under `<tmp_dir>/<entity>/`, write the artifact
/// into it, prune template leftovers, and wait for the written file to be
/// observable. Returns the project directory.
pub async fn materialize(
    cfg: &Config,
    entity_name: &str,
    artifact: &GeneratedArtifact,
) -> Result<PathBuf, ForgeError> {
    let tmp_dir = Path::new(&cfg.tmp_dir);
    fs::create_dir_all(tmp_dir)
        .map_err(|e| ForgeError::Scaffold(format!("cannot create {}: {e}", tmp_dir.display())))?;

    run_scaffold_tool(cfg, entity_name, tmp_dir)?;

    let project_dir = tmp_dir.join(entity_name);
    let class_file = project_dir.join(format!("{}.ts", artifact.class_name));
    write_artifact(&project_dir, &class_file, &artifact.source_text)?;

    prune_template_files(&project_dir);

    wait_for_file(cfg, &class_file).await?;
    Ok(project_dir)
}

fn run_scaffold_tool(cfg: &Config, entity_name: &str, tmp_dir: &Path) -> Result<(), ForgeError> {
    // Preflight so a missing tool reads as a scaffold failure, not a spawn error.
    which::which(&cfg.scaffold_tool).map_err(|_| {
        ForgeError::Scaffold(format!("scaffold tool not found on PATH: {}", cfg.scaffold_tool))
    })?;

    let template_arg = format!("--backend={}", cfg.scaffold_template);
    let name_arg = format!("--name={entity_name}");
    let region_arg = format!("--region={}", cfg.scaffold_region);
    let args = ["create", "backend", template_arg.as_str(), name_arg.as_str(), region_arg.as_str()];

    println!("Running command: {} {}", cfg.scaffold_tool, args.join(" "));

    let res = exec::run(&cfg.scaffold_tool, &args, tmp_dir)
        .map_err(|e| ForgeError::Scaffold(e.to_string()))?;
    if !res.success() {
        return Err(ForgeError::Scaffold(format!(
            "{} exited with status {}: {}",
            res.command,
            res.status,
            res.stderr.trim()
        )));
    }
    Ok(())
}

fn write_artifact(project_dir: &Path, class_file: &Path, source: &str) -> Result<(), ForgeError> {
    fs::create_dir_all(project_dir)
        .map_err(|e| ForgeError::Scaffold(format!("cannot create {}: {e}", project_dir.display())))?;

    let tmp = NamedTempFile::new_in(project_dir)
        .map_err(|e| ForgeError::Scaffold(format!("cannot stage artifact file: {e}")))?;
    fs::write(tmp.path(), source)
        .map_err(|e| ForgeError::Scaffold(format!("cannot write artifact: {e}")))?;
    tmp.persist(class_file)
        .map_err(|e| ForgeError::Scaffold(format!("cannot persist {}: {e}", class_file.display())))?;
    Ok(())
}

/// Best-effort by contract: every other stage is fatal, but a template file
/// that refuses to go away does not invalidate the generated service. Each
/// failure is logged and swallowed.
pub fn prune_template_files(project_dir: &Path) {
    for name in TEMPLATE_ONLY_FILES {
        let path = project_dir.join(name);
        if !path.exists() {
            continue;
        }
        if let Err(e) = fs::remove_file(&path) {
            eprintln!("{} could not remove {}: {e}", "warning:".yellow(), path.display());
        }
    }

    if let Err(e) = strip_template_dep(project_dir) {
        eprintln!("{} could not patch package.json: {e}", "warning:".yellow());
    }
}

fn strip_template_dep(project_dir: &Path) -> anyhow::Result<()> {
    let manifest_path = project_dir.join("package.json");
    if !manifest_path.exists() {
        return Ok(());
    }
    let raw = fs::read_to_string(&manifest_path)?;
    let mut manifest: Value = serde_json::from_str(&raw)?;

    let mut changed = false;
    for table in ["dependencies", "devDependencies"] {
        if let Some(deps) = manifest.get_mut(table).and_then(Value::as_object_mut) {
            changed |= deps.remove(TEMPLATE_ONLY_DEP).is_some();
        }
    }

    if changed {
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    }
    Ok(())
}

/// Bounded existence poll. The write above is synchronous, so this normally
/// passes on the first check; it guards against filesystem propagation delays
/// from the scaffold subprocess and is part of the materialization contract.
async fn wait_for_file(cfg: &Config, path: &Path) -> Result<(), ForgeError> {
    for attempt in 0..cfg.poll_attempts {
        if path.exists() {
            return Ok(());
        }
        println!("Waiting for file to be created... {} (attempt {})", path.display(), attempt + 1);
        tokio::time::sleep(Duration::from_millis(cfg.poll_interval_ms)).await;
    }
    Err(ForgeError::Scaffold(format!(
        "artifact file never appeared: {}",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> GeneratedArtifact {
        GeneratedArtifact {
            class_name: "UserService".into(),
            source_text: "export class UserService {}\n".into(),
            imported_packages: vec![],
        }
    }

    fn test_config(tmp_dir: &Path) -> Config {
        Config {
            tmp_dir: tmp_dir.to_string_lossy().into_owned(),
            poll_attempts: 2,
            poll_interval_ms: 10,
            ..Config::from_parts(Some("sk-test".into())).unwrap()
        }
    }

    #[tokio::test]
    async fn missing_scaffold_tool_fails_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = test_config(dir.path());
        cfg.scaffold_tool = "/nonexistent/classforge-scaffold".into();

        let err = materialize(&cfg, "UserService", &artifact()).await.unwrap_err();
        assert!(matches!(err, ForgeError::Scaffold(_)));
        assert!(!dir.path().join("UserService").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_scaffold_exit_fails_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = test_config(dir.path());
        cfg.scaffold_tool = "false".into();

        let err = materialize(&cfg, "UserService", &artifact()).await.unwrap_err();
        assert!(matches!(err, ForgeError::Scaffold(_)));
        assert!(!dir.path().join("UserService").join("UserService.ts").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_scaffold_writes_the_class_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = test_config(dir.path());
        // "true" scaffolds nothing; write_artifact creates the project dir itself.
        cfg.scaffold_tool = "true".into();

        let project = materialize(&cfg, "UserService", &artifact()).await.unwrap();
        assert_eq!(project, dir.path().join("UserService"));
        let written = fs::read_to_string(project.join("UserService.ts")).unwrap();
        assert_eq!(written, "export class UserService {}\n");
    }

    #[test]
    fn pruning_removes_template_files_and_dep() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path();
        fs::write(project.join("genezio.yaml"), "name: template\n").unwrap();
        fs::write(project.join(".gitignore"), "node_modules\n").unwrap();
        fs::write(
            project.join("package.json"),
            r#"{ "dependencies": { "@genezio/types": "^1.0.0", "mongoose": "^8.0.0" } }"#,
        )
        .unwrap();

        prune_template_files(project);

        assert!(!project.join("genezio.yaml").exists());
        assert!(!project.join(".gitignore").exists());
        let manifest = fs::read_to_string(project.join("package.json")).unwrap();
        assert!(!manifest.contains("@genezio/types"));
        assert!(manifest.contains("mongoose"));
    }

    #[test]
    fn pruning_a_bare_directory_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        prune_template_files(dir.path());
    }
}

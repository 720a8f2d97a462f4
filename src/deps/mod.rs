use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::config::Config;
use crate::errors::ForgeError;
use crate::exec;

/// One package to install into the scaffolded project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInstall {
    pub name: String,
    /// Installed with `--save-dev` (typings packages).
    pub dev: bool,
}

impl PackageInstall {
    fn runtime(name: &str) -> Self {
        Self { name: name.to_string(), dev: false }
    }

    fn dev_only(name: &str) -> Self {
        Self { name: name.to_string(), dev: true }
    }
}

/// Known packages whose declared import does not cover everything they need
/// at runtime: an ORM implies its driver packages, a mailer implies its
/// typings. New libraries get a row here, not a new branch in control flow.
const COMPANIONS: &[(&str, &[(&str, bool)])] = &[
    ("mongoose", &[("pg", false), ("pg-hstore", false)]),
    ("sequelize", &[("pg", false), ("pg-hstore", false)]),
    ("nodemailer", &[("@types/nodemailer", true)]),
];

/// Dedup by first occurrence, then expand companions. Companions are also
/// deduplicated against everything already in the set, so the result holds
/// exactly one entry per package name.
pub fn resolve_install_set(imports: &[String]) -> Vec<PackageInstall> {
    fn push_unique(set: &mut Vec<PackageInstall>, pkg: PackageInstall) {
        if !set.iter().any(|p| p.name == pkg.name) {
            set.push(pkg);
        }
    }

    let mut out: Vec<PackageInstall> = Vec::new();

    for name in imports {
        push_unique(&mut out, PackageInstall::runtime(name));
    }

    let declared: Vec<String> = out.iter().map(|p| p.name.clone()).collect();
    for name in &declared {
        if let Some((_, companions)) = COMPANIONS.iter().find(|(k, _)| *k == name.as_str()) {
            for (companion, dev) in *companions {
                let pkg = if *dev {
                    PackageInstall::dev_only(companion)
                } else {
                    PackageInstall::runtime(companion)
                };
                push_unique(&mut out, pkg);
            }
        }
    }

    out
}

/// Install every resolved package individually and in sequence. Any failed
/// install is fatal for the whole request: the generated class cannot run
/// without its declared imports, so there is no useful partial success.
pub fn reconcile(
    cfg: &Config,
    project_dir: &Path,
    imports: &[String],
) -> Result<Vec<String>, ForgeError> {
    let installs = resolve_install_set(imports);
    if installs.is_empty() {
        return Ok(Vec::new());
    }

    let bar = ProgressBar::new(installs.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut installed = Vec::new();
    for pkg in &installs {
        bar.set_message(format!("{} install {}", cfg.package_manager, pkg.name));
        install_one(cfg, project_dir, pkg)?;
        installed.push(pkg.name.clone());
        bar.inc(1);
    }
    bar.finish_with_message("dependencies installed");

    Ok(installed)
}

fn install_one(cfg: &Config, project_dir: &Path, pkg: &PackageInstall) -> Result<(), ForgeError> {
    let mut args = vec!["install"];
    if pkg.dev {
        args.push("--save-dev");
    }
    args.push(&pkg.name);

    let res = exec::run(&cfg.package_manager, &args, project_dir)
        .map_err(|e| ForgeError::DependencyInstall(e.to_string()))?;
    if !res.success() {
        return Err(ForgeError::DependencyInstall(format!(
            "{} exited with status {}: {}",
            res.command,
            res.status,
            res.stderr.trim()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: &[PackageInstall]) -> Vec<&str> {
        set.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn dedup_then_companions() {
        let imports = vec!["mongoose".to_string(), "mongoose".to_string(), "nodemailer".to_string()];
        let set = resolve_install_set(&imports);
        assert_eq!(
            names(&set),
            vec!["mongoose", "nodemailer", "pg", "pg-hstore", "@types/nodemailer"]
        );
    }

    #[test]
    fn resolution_is_idempotent() {
        let imports = vec!["mongoose".to_string(), "mongoose".to_string(), "nodemailer".to_string()];
        let once = resolve_install_set(&imports);
        let again = resolve_install_set(&imports);
        assert_eq!(once, again);
    }

    #[test]
    fn mailer_typings_are_dev_only() {
        let set = resolve_install_set(&["nodemailer".to_string()]);
        let typings = set.iter().find(|p| p.name == "@types/nodemailer").unwrap();
        assert!(typings.dev);
        let mailer = set.iter().find(|p| p.name == "nodemailer").unwrap();
        assert!(!mailer.dev);
    }

    #[test]
    fn companions_do_not_shadow_explicit_imports() {
        // pg imported directly AND implied by sequelize: exactly one entry.
        let imports = vec!["sequelize".to_string(), "pg".to_string()];
        let set = resolve_install_set(&imports);
        assert_eq!(names(&set), vec!["sequelize", "pg", "pg-hstore"]);
    }

    #[test]
    fn unknown_packages_pass_through_unchanged() {
        let set = resolve_install_set(&["left-pad".to_string()]);
        assert_eq!(names(&set), vec!["left-pad"]);
    }

    #[test]
    fn empty_import_list_resolves_to_nothing() {
        assert!(resolve_install_set(&[]).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn failed_install_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::from_parts(Some("sk-test".into())).unwrap();
        cfg.package_manager = "false".into();

        let err = reconcile(&cfg, dir.path(), &["mongoose".to_string()]).unwrap_err();
        assert!(matches!(err, ForgeError::DependencyInstall(_)));
    }
}

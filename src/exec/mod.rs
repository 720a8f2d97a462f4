use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

#[derive(Debug, Clone)]
pub struct CmdResult {
    pub command: String,
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CmdResult {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Run a fixed program with args, cwd-scoped, capturing output. Callers map
/// non-zero exits to their own error variants; a spawn failure is an error
/// here because there is no status to report.
pub fn run(program: &str, args: &[&str], cwd: &Path) -> Result<CmdResult> {
    let rendered = format!("{} {}", program, args.join(" "));

    let mut c = Command::new(program);
    c.args(args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let out = c
        .output()
        .with_context(|| format!("failed to spawn command: {rendered}"))?;

    Ok(CmdResult {
        command: rendered,
        status: out.status.code().unwrap_or_default(),
        stdout: String::from_utf8_lossy(&out.stdout).to_string(),
        stderr: String::from_utf8_lossy(&out.stderr).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonexistent_program_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = run("/nonexistent/classforge-no-such-tool", &[], dir.path());
        assert!(res.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn captures_exit_status_and_output() {
        let dir = tempfile::tempdir().unwrap();
        let res = run("sh", &["-c", "echo out; echo err >&2; exit 3"], dir.path()).unwrap();
        assert_eq!(res.status, 3);
        assert!(!res.success());
        assert_eq!(res.stdout.trim(), "out");
        assert_eq!(res.stderr.trim(), "err");
    }
}

use crate::error::{BumpError, Result};
use crate::git::GitOutput;
use crate::hooks::HookType;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Executes repository hook scripts
pub struct HookExecutor;

impl HookExecutor {
    /// Run `hook` from `hooks_dir` with `args`, inside `workdir`.
    ///
    /// A hook that is missing or not executable is skipped and reported as success,
    /// matching git. Any non-zero exit code is returned as a failed [GitOutput] so the
    /// caller can abort the commit.
    pub fn run(
        hooks_dir: &Path,
        hook: HookType,
        args: &[&Path],
        workdir: &Path,
    ) -> Result<GitOutput> {
        let script = hooks_dir.join(hook.name());

        if !is_executable(&script) {
            debug!(hook = hook.name(), "hook not installed, skipping");
            return Ok(GitOutput::success(String::new()));
        }

        debug!(hook = hook.name(), script = %script.display(), "running hook");
        let output = Command::new(&script)
            .args(args)
            .current_dir(workdir)
            .output()
            .map_err(|e| {
                BumpError::hook(format!("Failed to execute hook {}: {}", script.display(), e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            return Ok(GitOutput {
                code: 0,
                stdout,
                stderr,
            });
        }

        let code = output.status.code().unwrap_or(-1);
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };

        Ok(GitOutput {
            code: if code == 0 { 1 } else { code },
            stdout,
            stderr: format!("{} hook failed with exit code {}: {}", hook.name(), code, detail),
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_hook_is_skipped() {
        let dir = TempDir::new().unwrap();
        let output = HookExecutor::run(dir.path(), HookType::PreCommit, &[], dir.path()).unwrap();
        assert!(output.is_success());
    }

    #[cfg(unix)]
    fn install_hook(dir: &Path, hook: HookType, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(hook.name());
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_hook_reports_stderr() {
        let dir = TempDir::new().unwrap();
        install_hook(
            dir.path(),
            HookType::PreCommit,
            "#!/bin/sh\necho 'lint failed' >&2\nexit 3\n",
        );

        let output = HookExecutor::run(dir.path(), HookType::PreCommit, &[], dir.path()).unwrap();
        assert_eq!(output.code, 3);
        assert!(output.stderr.contains("pre-commit hook failed"));
        assert!(output.stderr.contains("lint failed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_msg_hook_receives_message_file() {
        let dir = TempDir::new().unwrap();
        install_hook(
            dir.path(),
            HookType::CommitMsg,
            "#!/bin/sh\necho ' [skip ci]' >> \"$1\"\n",
        );
        let msg_file = dir.path().join("MSG");
        std::fs::write(&msg_file, "bump: version 1.0.0 → 1.1.0").unwrap();

        let output = HookExecutor::run(
            dir.path(),
            HookType::CommitMsg,
            &[msg_file.as_path()],
            dir.path(),
        )
        .unwrap();

        assert!(output.is_success());
        assert!(std::fs::read_to_string(&msg_file)
            .unwrap()
            .contains("[skip ci]"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_hook_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pre-commit"), "#!/bin/sh\nexit 1\n").unwrap();

        let output = HookExecutor::run(dir.path(), HookType::PreCommit, &[], dir.path()).unwrap();
        assert!(output.is_success());
    }
}

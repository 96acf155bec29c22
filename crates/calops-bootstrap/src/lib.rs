//! Environment bootstrapper for the calendar web application.
//!
//! Installs the app's declared dependencies, applies its schema migrations,
//! and runs its development server in the foreground. Only the install step
//! is checked; migration and server steps surface whatever the sub-process
//! reports and their exit codes are logged, not treated as failures.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tracing::{debug, info, warn};

/// Paths and executables for the launch sequence. Every value the original
/// launcher hardcoded is an explicit field here.
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    /// Root of the web application project (contains `manage.py`).
    pub project_dir: PathBuf,
    /// Python executable used for the manage.py subcommands.
    pub python: String,
    /// Pip executable used for dependency installation.
    pub pip: String,
    /// Requirements manifest, relative to `project_dir`.
    pub requirements: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("event-calendar-main"),
            python: "python".into(),
            pip: "pip".into(),
            requirements: "requirements.txt".into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("project directory not found: {0}")]
    MissingProjectDir(String),

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("dependency installation failed (exit code {code:?})")]
    InstallFailed { code: Option<i32> },
}

/// Run the full launch sequence. Blocks until the development server exits.
pub async fn run(config: &BootstrapConfig) -> Result<(), BootstrapError> {
    if !config.project_dir.is_dir() {
        return Err(BootstrapError::MissingProjectDir(
            config.project_dir.display().to_string(),
        ));
    }

    // Dependency installation is the one step that aborts on failure.
    let status = run_step(
        &config.pip,
        &["install", "-r", &config.requirements],
        &config.project_dir,
    )
    .await?;
    if !status.success() {
        return Err(BootstrapError::InstallFailed {
            code: status.code(),
        });
    }
    info!("dependencies installed");

    // Migrations pass through whatever the sub-process reports.
    for subcommand in ["makemigrations", "migrate"] {
        let status = run_step(
            &config.python,
            &["manage.py", subcommand],
            &config.project_dir,
        )
        .await?;
        if !status.success() {
            warn!(subcommand, code = ?status.code(), "migration step exited non-zero");
        }
    }

    info!("starting development server");
    let status = run_step(
        &config.python,
        &["manage.py", "runserver"],
        &config.project_dir,
    )
    .await?;
    info!(code = ?status.code(), "development server exited");
    Ok(())
}

/// Run one external step with inherited stdio inside the project directory.
async fn run_step(
    program: &str,
    args: &[&str],
    dir: &Path,
) -> Result<ExitStatus, BootstrapError> {
    debug!(program, ?args, dir = %dir.display(), "running step");
    tokio::process::Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .await
        .map_err(|e| BootstrapError::Spawn {
            command: format!("{program} {}", args.join(" ")),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path, pip: &str, python: &str) -> BootstrapConfig {
        BootstrapConfig {
            project_dir: dir.to_owned(),
            python: python.into(),
            pip: pip.into(),
            requirements: "requirements.txt".into(),
        }
    }

    #[tokio::test]
    async fn run_step_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        let status = run_step("true", &[], dir.path()).await.unwrap();
        assert!(status.success());
    }

    #[tokio::test]
    async fn run_step_reports_failure_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let status = run_step("false", &[], dir.path()).await.unwrap();
        assert!(!status.success());
    }

    #[tokio::test]
    async fn run_step_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_step("calops-no-such-binary", &[], dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, BootstrapError::Spawn { .. }));
    }

    #[tokio::test]
    async fn missing_project_dir_aborts() {
        let err = run(&config_in(Path::new("/no/such/project"), "true", "true"))
            .await
            .unwrap_err();
        assert!(matches!(err, BootstrapError::MissingProjectDir(_)));
    }

    #[tokio::test]
    async fn failed_install_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&config_in(dir.path(), "false", "true"))
            .await
            .unwrap_err();
        assert!(matches!(err, BootstrapError::InstallFailed { .. }));
    }

    #[tokio::test]
    async fn failed_migrations_do_not_abort() {
        // python = "false": every manage.py step exits non-zero, but only
        // the install step is checked.
        let dir = tempfile::tempdir().unwrap();
        run(&config_in(dir.path(), "true", "false")).await.unwrap();
    }

    #[tokio::test]
    async fn full_sequence_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        run(&config_in(dir.path(), "true", "true")).await.unwrap();
    }

    #[test]
    fn default_config_matches_project_layout() {
        let config = BootstrapConfig::default();
        assert_eq!(config.project_dir, PathBuf::from("event-calendar-main"));
        assert_eq!(config.python, "python");
        assert_eq!(config.pip, "pip");
        assert_eq!(config.requirements, "requirements.txt");
    }
}

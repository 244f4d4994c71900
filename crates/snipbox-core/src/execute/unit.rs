//! Isolation units: one private directory and one process per execution.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use tokio::process::{Child, Command};

use crate::error::{Error, Result};

/// File name of the artifact inside the unit.
const PROGRAM_NAME: &str = "program";

/// Attempts made when exec races a concurrent fork still holding a write
/// handle to the freshly written binary.
const SPAWN_ATTEMPTS: u32 = 5;

/// A disposable boundary around exactly one execution.
///
/// Owns a private directory containing the artifact. The program runs with
/// that directory as its working directory, a cleared environment and its
/// own process group. Nothing in a unit survives `release`, and dropping an
/// unreleased unit still removes the directory.
pub struct IsolationUnit {
    dir: TempDir,
    program: PathBuf,
}

impl IsolationUnit {
    /// Create a fresh unit under `work_root` (or the system temp dir) and
    /// place the artifact in it as an executable.
    pub fn load(artifact: &[u8], work_root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("snipbox-unit-");

        let dir = match work_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| Error::ArtifactLoad(format!("cannot create unit directory: {e}")))?;

        let program = dir.path().join(PROGRAM_NAME);
        write_executable(&program, artifact)
            .map_err(|e| Error::ArtifactLoad(format!("cannot write {}: {e}", program.display())))?;

        tracing::debug!("Loaded {} bytes into {}", artifact.len(), dir.path().display());

        Ok(Self { dir, program })
    }

    /// Directory owned by this unit.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Start the program with piped stdout/stderr and closed stdin.
    pub async fn spawn(&self, path_env: &str) -> Result<Child> {
        let mut attempt = 1;

        loop {
            match self.command(path_env).spawn() {
                Ok(child) => return Ok(child),
                Err(e) if is_text_busy(&e) && attempt < SPAWN_ATTEMPTS => {
                    tracing::debug!("Program busy on attempt {}, retrying", attempt);
                    tokio::time::sleep(Duration::from_millis(5 * u64::from(attempt))).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(Error::ArtifactLoad(format!(
                        "cannot start {}: {e}",
                        self.program.display()
                    )));
                }
            }
        }
    }

    fn command(&self, path_env: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(self.dir.path())
            .env_clear()
            .env("PATH", path_env)
            .env("HOME", self.dir.path())
            .env("RUST_BACKTRACE", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }

    /// Remove the unit's directory and confirm it is gone.
    pub fn release(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();

        self.dir.close().map_err(|e| Error::Teardown {
            path: path.clone(),
            message: e.to_string(),
        })?;

        if path.exists() {
            return Err(Error::Teardown {
                path,
                message: "directory still present after removal".to_string(),
            });
        }

        Ok(())
    }
}

fn write_executable(path: &Path, bytes: &[u8]) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o700)
            .open(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    #[cfg(not(unix))]
    {
        fs::write(path, bytes)
    }
}

fn is_text_busy(e: &io::Error) -> bool {
    #[cfg(unix)]
    {
        e.raw_os_error() == Some(libc::ETXTBSY)
    }

    #[cfg(not(unix))]
    {
        let _ = e;
        false
    }
}

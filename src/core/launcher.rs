use crate::models::error::Error;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use std::process::{Child, Command};
use tracing::info;

/// How to start the external application once a pack is materialized.
#[derive(Clone, Debug)]
pub struct LaunchSpec {
    pub program: Utf8PathBuf,
    pub args: Vec<String>,
}

impl LaunchSpec {
    pub fn new(program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Handle to the launched game process. A console/monitor collaborator
/// can poll liveness or wait for the exit code.
pub struct LaunchHandle {
    child: Mutex<Child>,
}

impl LaunchHandle {
    pub fn pid(&self) -> u32 {
        self.child.lock().id()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.child.lock().try_wait(), Ok(None))
    }

    /// Exit code if the process has terminated; `None` while it is
    /// still running or when it was killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.child.lock().try_wait().ok().flatten().and_then(|s| s.code())
    }

    /// Blocks until the process terminates.
    pub fn wait(&self) -> Result<Option<i32>, Error> {
        self.child
            .lock()
            .wait()
            .map(|status| status.code())
            .map_err(|e| Error::ProcessLaunch(e.to_string()))
    }
}

/// Spawns the external process with the pack directory as its working
/// directory.
pub fn launch(spec: &LaunchSpec, pack_dir: &Utf8Path) -> Result<LaunchHandle, Error> {
    let child = Command::new(spec.program.as_std_path())
        .args(&spec.args)
        .current_dir(pack_dir)
        .spawn()
        .map_err(|e| Error::ProcessLaunch(format!("{}: {e}", spec.program)))?;
    info!("launched {} (pid {}) in {pack_dir}", spec.program, child.id());
    Ok(LaunchHandle {
        child: Mutex::new(child),
    })
}

use crate::core::launcher::{self, LaunchHandle, LaunchSpec};
use crate::core::registry::ModRegistry;
use crate::models::error::Error;
use crate::models::mod_def::ModId;
use crate::models::modpack::Modpack;
use crate::models::solution::Solution;
use crate::utils::events::Listeners;
use crate::utils::file;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::Failed | TaskState::Cancelled
        )
    }
}

/// Lifecycle notifications emitted by an [`InstallTask`] to its
/// observers. Progress is a fraction in [0.0, 1.0], monotonically
/// non-decreasing.
#[derive(Clone, Debug)]
pub enum TaskEvent {
    Started,
    Progress(f64),
    Succeeded,
    Failed(String),
    Cancelled,
}

enum Outcome {
    Launched(Arc<LaunchHandle>),
    Cancelled,
}

/// A cancellable, observable unit of work that reconciles a pack
/// directory to contain exactly the mods of one chosen [`Solution`],
/// then launches the external application bound to that directory.
///
/// Reconciliation is a diff computed once at start: materialized mods
/// outside the solution are removed, solution mods not yet materialized
/// are copied in. The diff is order-independent and idempotent, so an
/// interrupted run leaves a structurally valid directory that a
/// subsequent run converges from.
pub struct InstallTask {
    id: Uuid,
    pack_name: String,
    pack_dir: Utf8PathBuf,
    solution: Solution,
    /// Source paths snapshotted from the registry at construction; a
    /// registry mutated while the task is queued does not affect it.
    sources: BTreeMap<ModId, Utf8PathBuf>,
    spec: LaunchSpec,
    state: Mutex<TaskState>,
    progress: Mutex<f64>,
    error: Mutex<Option<Error>>,
    handle: Mutex<Option<Arc<LaunchHandle>>>,
    cancel: AtomicBool,
    listeners: Listeners<TaskEvent>,
}

impl InstallTask {
    pub fn new(
        pack: &Modpack,
        solution: Solution,
        registry: &ModRegistry,
        spec: LaunchSpec,
    ) -> Result<Self, Error> {
        let mut sources = BTreeMap::new();
        for id in solution.mods() {
            let definition = registry
                .get(id)
                .ok_or_else(|| Error::ModNotFound(id.to_string()))?;
            sources.insert(id.clone(), definition.source.clone());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            pack_name: pack.name(),
            pack_dir: pack.dir().to_path_buf(),
            solution,
            sources,
            spec,
            state: Mutex::new(TaskState::Pending),
            progress: Mutex::new(0.0),
            error: Mutex::new(None),
            handle: Mutex::new(None),
            cancel: AtomicBool::new(false),
            listeners: Listeners::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn pack_name(&self) -> &str {
        &self.pack_name
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    pub fn state(&self) -> TaskState {
        *self.state.lock()
    }

    pub fn progress(&self) -> f64 {
        *self.progress.lock()
    }

    /// The cause of a `Failed` terminal state.
    pub fn error(&self) -> Option<Error> {
        self.error.lock().clone()
    }

    /// Handle to the launched process once the task has succeeded.
    pub fn launch_handle(&self) -> Option<Arc<LaunchHandle>> {
        self.handle.lock().clone()
    }

    pub fn on_event<F>(&self, callback: F)
    where
        F: Fn(&TaskEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback);
    }

    /// Requests cooperative cancellation, observed at the next
    /// checkpoint between file operations. Already-applied changes are
    /// not rolled back.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Executes the task to a terminal state. Lower-level failures are
    /// converted into the `Failed` state with the cause retained; this
    /// never panics and never propagates an error to the caller, so the
    /// queue worker survives any task.
    pub fn run(&self) {
        self.set_state(TaskState::Running);
        self.listeners.emit(&TaskEvent::Started);

        match self.execute() {
            Ok(Outcome::Launched(handle)) => {
                *self.handle.lock() = Some(handle);
                self.set_state(TaskState::Succeeded);
                self.listeners.emit(&TaskEvent::Succeeded);
            }
            Ok(Outcome::Cancelled) => {
                info!("install of '{}' cancelled", self.pack_name);
                self.set_state(TaskState::Cancelled);
                self.listeners.emit(&TaskEvent::Cancelled);
            }
            Err(e) => {
                warn!("install of '{}' failed: {e}", self.pack_name);
                *self.error.lock() = Some(e.clone());
                self.set_state(TaskState::Failed);
                self.listeners.emit(&TaskEvent::Failed(e.to_string()));
            }
        }
    }

    fn execute(&self) -> Result<Outcome, Error> {
        let plan = self.plan()?;
        let total = plan.removals.len() + plan.additions.len();
        info!(
            "reconciling '{}': {} to add, {} to remove",
            self.pack_name,
            plan.additions.len(),
            plan.removals.len()
        );

        let mut done = 0usize;
        if total == 0 {
            self.set_progress(1.0);
        }

        for path in &plan.removals {
            if self.is_cancelled() {
                return Ok(Outcome::Cancelled);
            }
            file::remove_path(path)?;
            done += 1;
            self.set_progress(done as f64 / total as f64);
        }

        for (source, target) in &plan.additions {
            if self.is_cancelled() {
                return Ok(Outcome::Cancelled);
            }
            if source.is_dir() {
                file::copy_recursive(source, target)?;
            } else {
                std::fs::copy(source, target)?;
            }
            done += 1;
            self.set_progress(done as f64 / total as f64);
        }

        if self.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        let handle = launcher::launch(&self.spec, &self.pack_dir)?;
        Ok(Outcome::Launched(Arc::new(handle)))
    }

    /// Diffs the current directory contents against the solution, once.
    /// Entries that do not parse as materialized mods are left alone.
    fn plan(&self) -> Result<ReconcilePlan, Error> {
        std::fs::create_dir_all(&self.pack_dir)?;

        let mut materialized: BTreeSet<ModId> = BTreeSet::new();
        let mut removals = Vec::new();
        for entry in self.pack_dir.read_dir_utf8()? {
            let entry = entry?;
            let Some(id) = ModId::from_dir_name(entry.file_name()) else {
                continue;
            };
            if self.solution.contains(&id) {
                materialized.insert(id);
            } else {
                removals.push(entry.path().to_path_buf());
            }
        }

        let mut additions = Vec::new();
        for (id, source) in &self.sources {
            if materialized.contains(id) {
                continue;
            }
            additions.push((source.clone(), self.materialized_path(id, source)));
        }

        Ok(ReconcilePlan {
            removals,
            additions,
        })
    }

    /// Target path for one mod: `name_version`, keeping the archive
    /// extension when the source is a single file.
    fn materialized_path(&self, id: &ModId, source: &Utf8Path) -> Utf8PathBuf {
        let mut name = id.dir_name();
        if source.is_file() {
            if let Some(ext) = source.extension() {
                name.push('.');
                name.push_str(ext);
            }
        }
        self.pack_dir.join(name)
    }

    fn set_state(&self, state: TaskState) {
        *self.state.lock() = state;
    }

    fn set_progress(&self, fraction: f64) {
        let value = {
            let mut progress = self.progress.lock();
            // progress never goes backwards
            *progress = progress.max(fraction.clamp(0.0, 1.0));
            *progress
        };
        self.listeners.emit(&TaskEvent::Progress(value));
    }
}

struct ReconcilePlan {
    removals: Vec<Utf8PathBuf>,
    additions: Vec<(Utf8PathBuf, Utf8PathBuf)>,
}

use crate::core::installer::InstallTask;
use crate::core::launcher::LaunchSpec;
use crate::core::resolver;
use crate::core::store::Datastore;
use crate::core::task_service::TaskService;
use crate::models::error::Error;
use crate::models::modpack::Modpack;
use crate::models::solution::{SolutionChoice, SolutionPicker};
use std::sync::Arc;
use tracing::info;

/// Outcome of a launch request, for the presentation layer to branch
/// on. Both `NoSolution` and `Cancelled` are normal results, not
/// errors.
pub enum InstallOutcome {
    /// The task was built and queued; register observers on it to track
    /// progress and the terminal state.
    Submitted(Arc<InstallTask>),
    /// Zero solutions: one or more required mods are missing or
    /// mutually incompatible. Surface a specific message to the user.
    NoSolution,
    /// The user declined to pick between multiple valid solutions.
    Cancelled,
}

/// The full "play" control flow: resolve the pack, let the picker
/// disambiguate when several solutions exist, then queue an
/// install-and-launch task.
pub fn install_and_launch(
    store: &Datastore,
    pack: &Modpack,
    picker: &dyn SolutionPicker,
    service: &TaskService,
    spec: LaunchSpec,
) -> Result<InstallOutcome, Error> {
    let registry = store.registry().read();

    let mut solutions = resolver::resolve(pack, &registry);
    let solution = match solutions.len() {
        0 => return Ok(InstallOutcome::NoSolution),
        1 => solutions.remove(0),
        n => {
            info!("pack '{}' has {n} valid solutions, asking picker", pack.name());
            match picker.pick(&solutions) {
                SolutionChoice::Chosen(solution) => solution,
                SolutionChoice::Cancelled => return Ok(InstallOutcome::Cancelled),
            }
        }
    };

    let task = Arc::new(InstallTask::new(pack, solution, &registry, spec)?);
    drop(registry);

    service.submit(task.clone());
    Ok(InstallOutcome::Submitted(task))
}

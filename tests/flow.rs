mod common;

use common::{pack_with, registry_with, setup_test_env};
use packbound::core::flow::{install_and_launch, InstallOutcome};
use packbound::core::launcher::LaunchSpec;
use packbound::core::store::Datastore;
use packbound::core::task_service::TaskService;
use packbound::models::mod_def::ModId;
use packbound::models::solution::{Solution, SolutionChoice, SolutionPicker};
use semver::Version;

fn id(name: &str, major: u64) -> ModId {
    ModId::new(name, Version::new(major, 0, 0))
}

/// Picker standing in for the choice dialog: takes the first offer.
struct FirstPicker;

impl SolutionPicker for FirstPicker {
    fn pick(&self, solutions: &[Solution]) -> SolutionChoice {
        SolutionChoice::Chosen(solutions[0].clone())
    }
}

/// Picker standing in for the user closing the dialog.
struct DecliningPicker;

impl SolutionPicker for DecliningPicker {
    fn pick(&self, _solutions: &[Solution]) -> SolutionChoice {
        SolutionChoice::Cancelled
    }
}

#[test]
fn missing_mods_surface_as_no_solution() {
    let (_tmp, _mods_root, packs_root) = setup_test_env();
    let store = Datastore::new(packs_root.clone());
    let pack = pack_with(&packs_root, "p", &[id("ghost", 1)]);
    let mut service = TaskService::new();

    let outcome = install_and_launch(
        &store,
        &pack,
        &FirstPicker,
        &service,
        LaunchSpec::new("true"),
    )
    .unwrap();

    assert!(matches!(outcome, InstallOutcome::NoSolution));
    service.shutdown();
}

#[test]
fn declining_the_picker_cancels_the_request() {
    let (_tmp, mods_root, packs_root) = setup_test_env();
    let store = Datastore::new(packs_root.clone());
    *store.registry().write() = registry_with(
        &mods_root,
        &[
            ("alpha", "1.0.0", &["beta >= 1.0.0"]),
            ("beta", "1.0.0", &[]),
            ("beta", "2.0.0", &[]),
        ],
    );
    let pack = pack_with(&packs_root, "p", &[id("alpha", 1)]);
    let mut service = TaskService::new();

    let outcome = install_and_launch(
        &store,
        &pack,
        &DecliningPicker,
        &service,
        LaunchSpec::new("true"),
    )
    .unwrap();

    assert!(matches!(outcome, InstallOutcome::Cancelled));
    service.shutdown();
}

#[cfg(unix)]
#[test]
fn ambiguous_resolution_uses_the_picker_and_submits() {
    use packbound::core::installer::TaskState;

    let (_tmp, mods_root, packs_root) = setup_test_env();
    let store = Datastore::new(packs_root.clone());
    *store.registry().write() = registry_with(
        &mods_root,
        &[
            ("alpha", "1.0.0", &["beta >= 1.0.0"]),
            ("beta", "1.0.0", &[]),
            ("beta", "2.0.0", &[]),
        ],
    );
    let pack = pack_with(&packs_root, "p", &[id("alpha", 1)]);
    let mut service = TaskService::new();

    let outcome = install_and_launch(
        &store,
        &pack,
        &FirstPicker,
        &service,
        LaunchSpec::new("true"),
    )
    .unwrap();

    let InstallOutcome::Submitted(task) = outcome else {
        panic!("expected a submitted task");
    };
    // first solution offered is the newest-first one
    assert!(task.solution().contains(&id("beta", 2)));

    service.shutdown();
    assert_eq!(task.state(), TaskState::Succeeded);
    assert!(task.launch_handle().is_some());
}

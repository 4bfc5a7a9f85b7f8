//! Integración a nivel de workspace: el asistente completo visto desde fuera,
//! incluida la serialización de traza y errores que consume la capa de UI.

use chrono::NaiveDate;
use gym_core::{InMemoryWorkoutStore, WizardEvent, WorkoutFlowError, WorkoutWizard};
use gym_domain::{ExerciseEntryDraft, ExerciseOption, WorkoutDraft};

fn wizard_with_catalog() -> WorkoutWizard<InMemoryWorkoutStore> {
    let catalog = vec![ExerciseOption { id: 1, name: "Sentadilla".to_string() },
                       ExerciseOption { id: 2, name: "Zancada".to_string() },];
    WorkoutWizard::new(InMemoryWorkoutStore::with_exercises(catalog))
}

fn begin_leg_day(wizard: &mut WorkoutWizard<InMemoryWorkoutStore>) {
    wizard.begin(WorkoutDraft { name: "Leg Day".to_string(),
                                start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                                ..Default::default() })
          .expect("begin");
}

fn entry(exercise: i64) -> ExerciseEntryDraft {
    ExerciseEntryDraft { exercise: Some(exercise),
                         sets: "3".to_string(),
                         reps: "10".to_string(),
                         ..Default::default() }
}

#[test]
fn full_session_lifecycle() {
    let mut wizard = wizard_with_catalog();

    // Empty: commit directo es error de estado
    assert!(matches!(wizard.commit(), Err(WorkoutFlowError::State(_))));

    // HeaderStaged → AddingEntries
    begin_leg_day(&mut wizard);
    wizard.add_entry(entry(1)).expect("add");
    wizard.add_entry(entry(2)).expect("add");

    // Committing → Committed → Empty
    let receipt = wizard.commit().expect("commit");
    assert_eq!(receipt.entries_persisted, 2);
    assert!(wizard.snapshot().is_empty());
    assert!(matches!(wizard.commit(), Err(WorkoutFlowError::State(_))));

    // una segunda sesión de la misma instancia empieza de cero
    begin_leg_day(&mut wizard);
    assert_eq!(wizard.next_order(), 1);
}

#[test]
fn partial_failure_requires_fresh_begin() {
    let mut store = InMemoryWorkoutStore::with_exercises(vec![]);
    store.fail_links_from_call = Some(1);
    let mut wizard = WorkoutWizard::new(store);
    begin_leg_day(&mut wizard);
    wizard.add_entry(entry(1)).expect("add");
    wizard.add_entry(entry(2)).expect("add");

    assert!(matches!(wizard.commit(), Err(WorkoutFlowError::PartialCommit { .. })));
    // PartialFailure es terminal para esta instancia: lo preparado sigue ahí,
    // el commit directo se rechaza y sólo un begin nuevo arranca el reintento
    assert_eq!(wizard.snapshot().len(), 2);
    assert!(matches!(wizard.commit(), Err(WorkoutFlowError::State(_))));
    begin_leg_day(&mut wizard);
    assert!(wizard.snapshot().is_empty());
    assert_eq!(wizard.next_order(), 1);
}

#[test]
fn trail_and_errors_serialize_for_the_ui() {
    let mut wizard = wizard_with_catalog();
    begin_leg_day(&mut wizard);
    wizard.add_entry(entry(1)).expect("add");
    let receipt = wizard.commit().expect("commit");

    let trail_json = serde_json::to_string(wizard.events()).expect("trail json");
    assert!(trail_json.contains("HeaderStaged"));
    assert!(trail_json.contains("CommitCompleted"));

    let receipt_json = serde_json::to_value(&receipt).expect("receipt json");
    assert_eq!(receipt_json["entries_persisted"], 1);

    let err = WorkoutFlowError::PartialCommit { workout_id: 9,
                                                failed_exercise: 2,
                                                failed_order: 3,
                                                persisted: 1,
                                                total: 4 };
    let roundtrip: WorkoutFlowError =
        serde_json::from_str(&serde_json::to_string(&err).expect("err json")).expect("err roundtrip");
    assert_eq!(roundtrip, err);
}

#[test]
fn clear_event_is_recorded_once_per_call() {
    let mut wizard = wizard_with_catalog();
    begin_leg_day(&mut wizard);
    wizard.add_entry(entry(1)).expect("add");
    wizard.clear();
    wizard.clear();
    let clears = wizard.events()
                       .iter()
                       .filter(|e| matches!(e.kind, WizardEvent::StagingCleared))
                       .count();
    // idempotente en estado, no en traza: cada acción del usuario queda
    assert_eq!(clears, 2);
    assert!(wizard.snapshot().is_empty());
}

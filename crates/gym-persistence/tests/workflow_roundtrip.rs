//! Recorrido completo contra Postgres: catálogo → asistente → commit →
//! lectura del workout con sus líneas. Se omite sin DATABASE_URL.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use gym_core::WorkoutWizard;
use gym_domain::{ExerciseEntryDraft, WorkoutDraft};
use gym_persistence::{build_dev_pool_from_env, PgWorkoutStore};

fn unique(label: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    format!("{label}-{}-{nanos}", std::process::id())
}

#[test]
fn staged_commit_roundtrip() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL no definido: omitiendo test");
        return;
    }
    let pool = build_dev_pool_from_env().expect("pool");
    let store = PgWorkoutStore::from_pool(pool);

    let squat = store.create_exercise(&unique("Sentadilla"), Some("piernas")).expect("exercise");
    let lunge = store.create_exercise(&unique("Zancada"), Some("piernas")).expect("exercise");
    let client = store.create_client(&unique("Cliente"), &format!("{}@test.local", unique("mail")), None, None)
                      .expect("client");

    let mut wizard = WorkoutWizard::new(store);
    let workout_name = unique("Leg Day");
    wizard.begin(WorkoutDraft { name: workout_name.clone(),
                                start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                                objective: Some("hipertrofia".to_string()),
                                client_id: Some(client),
                                ..Default::default() })
          .expect("begin");
    wizard.add_entry(ExerciseEntryDraft { exercise: Some(squat),
                                          sets: "4".to_string(),
                                          reps: "8".to_string(),
                                          rest_seconds: Some(120),
                                          ..Default::default() })
          .expect("add squat");
    wizard.add_entry(ExerciseEntryDraft { exercise: Some(lunge),
                                          sets: "3".to_string(),
                                          reps: "10".to_string(),
                                          ..Default::default() })
          .expect("add lunge");

    let receipt = wizard.commit().expect("commit");
    assert_eq!(receipt.entries_persisted, 2);

    let overviews = wizard.store().workouts_with_exercises(Some(client), None).expect("read back");
    let workout = overviews.iter().find(|w| w.id == receipt.workout_id).expect("created workout visible");
    assert_eq!(workout.name, workout_name);
    assert_eq!(workout.exercises.len(), 2);
    let positions: Vec<u32> = workout.exercises.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![1, 2]);
    assert_eq!(workout.objective.as_deref(), Some("hipertrofia"));
}

#[test]
fn link_against_missing_exercise_reports_absent_id() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL no definido: omitiendo test");
        return;
    }
    use gym_core::WorkoutStore;
    use gym_domain::{StagedExerciseEntry, WorkoutHeader};

    let pool = build_dev_pool_from_env().expect("pool");
    let mut store = PgWorkoutStore::from_pool(pool);

    let header = WorkoutHeader::new(unique("Suelto"), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()).unwrap();
    let workout_id = store.create_workout(&header).expect("workout id");

    // exercise_id inexistente: violación de FK → None, sin excepción
    let ghost = StagedExerciseEntry::from_draft(ExerciseEntryDraft { exercise: Some(i64::MAX - 1),
                                                                     sets: "3".to_string(),
                                                                     reps: "10".to_string(),
                                                                     ..Default::default() },
                                                1).unwrap();
    assert!(store.create_workout_exercise_link(workout_id, &ghost).is_none());
}

//! Demo ejecutable del registro de workouts por fases.
//!
//! Dos recorridos sobre el backend en memoria: el camino feliz (commit
//! completo) y el corte por fallo parcial con el estado que queda visible.
//! Con el feature `pg_demo` y DATABASE_URL definido, un tercer recorrido
//! persiste en Postgres.

use chrono::NaiveDate;
use gym_core::{InMemoryWorkoutStore, WorkoutFlowError, WorkoutWizard};
use gym_domain::{ExerciseEntryDraft, ExerciseOption, WorkoutDraft};

fn sample_catalog() -> Vec<ExerciseOption> {
    vec![ExerciseOption { id: 1, name: "Sentadilla".to_string() },
         ExerciseOption { id: 2, name: "Zancada".to_string() },
         ExerciseOption { id: 3, name: "Peso muerto".to_string() },]
}

fn leg_day() -> WorkoutDraft {
    WorkoutDraft { name: "Leg Day".to_string(),
                   start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                   end_date: NaiveDate::from_ymd_opt(2024, 3, 1),
                   objective: Some("hipertrofia".to_string()),
                   ..Default::default() }
}

fn entry(exercise: i64, sets: &str, reps: &str) -> ExerciseEntryDraft {
    ExerciseEntryDraft { exercise: Some(exercise),
                         sets: sets.to_string(),
                         reps: reps.to_string(),
                         ..Default::default() }
}

fn print_trail<S: gym_core::WorkoutStore>(wizard: &WorkoutWizard<S>) {
    println!("  traza de la sesión {}:", wizard.session_id());
    for ev in wizard.events() {
        println!("    [{}] {:?}", ev.seq, ev.kind);
    }
}

/// Camino feliz: begin → 2 líneas → commit → buffer reiniciado.
fn run_happy_path() {
    println!("== commit completo ==");
    let mut wizard = WorkoutWizard::new(InMemoryWorkoutStore::with_exercises(sample_catalog()));

    wizard.begin(leg_day()).expect("begin");
    wizard.add_entry(entry(1, "4", "8")).expect("sentadilla");
    wizard.add_entry(entry(2, "3", "10")).expect("zancada");
    println!("  preparadas {} líneas, próximo orden {}", wizard.snapshot().len(), wizard.next_order());

    let receipt = wizard.commit().expect("commit");
    println!("  workout {} persistido con {} líneas", receipt.workout_id, receipt.entries_persisted);
    println!("  buffer tras commit: {} líneas", wizard.snapshot().len());
    print_trail(&wizard);
}

/// Fallo parcial: la segunda línea no devuelve id. El workout y la primera
/// línea quedan escritos; el buffer conserva todo para inspección.
fn run_partial_failure() {
    println!("== corte por fallo parcial ==");
    let mut store = InMemoryWorkoutStore::with_exercises(sample_catalog());
    store.fail_links_from_call = Some(1);
    let mut wizard = WorkoutWizard::new(store);

    wizard.begin(leg_day()).expect("begin");
    wizard.add_entry(entry(1, "4", "8")).expect("sentadilla");
    wizard.add_entry(entry(2, "3", "10")).expect("zancada");

    match wizard.commit() {
        Err(WorkoutFlowError::PartialCommit { workout_id, failed_exercise, failed_order, persisted, total }) => {
            println!("  corte: workout {workout_id} creado, ejercicio {failed_exercise} (orden {failed_order}) \
                      falló tras {persisted}/{total} líneas");
        }
        other => println!("  inesperado: {other:?}"),
    }
    println!("  buffer preservado: {} líneas sin guardar a la vista", wizard.snapshot().len());
    println!("  escrito en el almacén: {} workout(s), {} línea(s)",
             wizard.store().workouts.len(),
             wizard.store().links.len());
    print_trail(&wizard);
}

/// Mismo recorrido feliz pero contra Postgres (requiere DATABASE_URL).
#[cfg(feature = "pg_demo")]
fn run_pg_demo() {
    use gym_persistence::PgWorkoutStore;

    println!("== commit contra Postgres ==");
    if std::env::var("DATABASE_URL").is_err() {
        println!("  DATABASE_URL no definido: recorrido omitido");
        return;
    }
    let pool = match gym_persistence::build_dev_pool_from_env() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("  pool error: {e}");
            return;
        }
    };
    let store = PgWorkoutStore::from_pool(pool);
    let squat = store.create_exercise("Sentadilla (demo)", Some("piernas")).ok();
    let mut wizard = WorkoutWizard::new(store);
    if wizard.begin(leg_day()).is_err() {
        return;
    }
    if let Some(id) = squat {
        let _ = wizard.add_entry(entry(id, "4", "8"));
    }
    match wizard.commit() {
        Ok(receipt) => println!("  workout {} persistido en Postgres", receipt.workout_id),
        Err(e) => println!("  commit falló: {e}"),
    }
}

fn main() {
    // Cargar .env si existe (DATABASE_URL para el recorrido pg_demo)
    let _ = dotenvy::dotenv();

    run_happy_path();
    run_partial_failure();
    #[cfg(feature = "pg_demo")]
    run_pg_demo();
}

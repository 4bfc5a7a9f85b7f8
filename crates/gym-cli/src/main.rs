use chrono::NaiveDate;
use gym_core::{InMemoryWorkoutStore, WorkoutWizard};
use gym_domain::{ExerciseEntryDraft, ExerciseOption, WorkoutDraft};

fn main() {
    // Cargar .env si existe para obtener DATABASE_URL
    let _ = dotenvy::dotenv();
    // CLI mínima:
    //   gym exercises
    //   gym workouts [--client <ID>] [--instructor <ID>] [--json]
    //   gym demo
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("exercises") => run_exercises(),
        Some("workouts") => run_workouts(&args[2..]),
        Some("demo") => run_demo(),
        _ => {
            eprintln!("Uso: gym exercises | gym workouts [--client <ID>] [--instructor <ID>] [--json] | gym demo");
            std::process::exit(2);
        }
    }
}

fn open_store() -> gym_persistence::PgWorkoutStore<gym_persistence::PoolProvider> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("[gym] requiere DATABASE_URL para operar contra el backend persistente");
        std::process::exit(4);
    }
    let pool = match gym_persistence::build_dev_pool_from_env() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[gym] pool error: {e}");
            std::process::exit(5);
        }
    };
    gym_persistence::PgWorkoutStore::from_pool(pool)
}

fn run_exercises() {
    let store = open_store();
    match store.list_exercises() {
        Ok(exercises) if exercises.is_empty() => println!("catálogo de ejercicios vacío"),
        Ok(exercises) => {
            for e in exercises {
                println!("{:>4}  {}  [{}]", e.id, e.name, e.muscle_group.as_deref().unwrap_or("-"));
            }
        }
        Err(e) => {
            eprintln!("[gym exercises] error: {e}");
            std::process::exit(5);
        }
    }
}

fn run_workouts(rest: &[String]) {
    let mut client: Option<i64> = None;
    let mut instructor: Option<i64> = None;
    let mut json = false;
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--client" => {
                i += 1;
                if i < rest.len() {
                    client = rest[i].parse::<i64>().ok();
                }
            }
            "--instructor" => {
                i += 1;
                if i < rest.len() {
                    instructor = rest[i].parse::<i64>().ok();
                }
            }
            "--json" => json = true,
            _ => {}
        }
        i += 1;
    }

    let store = open_store();
    let overviews = match store.workouts_with_exercises(client, instructor) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("[gym workouts] error: {e}");
            std::process::exit(5);
        }
    };
    if json {
        match serde_json::to_string_pretty(&overviews) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("[gym workouts] serialización: {e}");
                std::process::exit(5);
            }
        }
        return;
    }
    if overviews.is_empty() {
        println!("sin workouts para el filtro dado");
        return;
    }
    for w in overviews {
        println!("#{} {} ({} → {})",
                 w.id,
                 w.name,
                 w.start_date,
                 w.end_date.map(|d| d.to_string()).unwrap_or_else(|| "abierto".to_string()));
        if let Some(c) = &w.client_name {
            println!("    cliente: {c}");
        }
        if let Some(i) = &w.instructor_name {
            println!("    instructor: {i}");
        }
        for e in &w.exercises {
            println!("    {}. {} {}x{} descanso {}s",
                     e.position,
                     e.exercise_name,
                     e.sets,
                     e.reps,
                     e.rest_seconds.unwrap_or(0));
        }
    }
}

/// Recorrido de demostración del asistente por fases, en memoria: no toca
/// ninguna base de datos.
fn run_demo() {
    let catalog = vec![ExerciseOption { id: 1, name: "Sentadilla".to_string() },
                       ExerciseOption { id: 2, name: "Zancada".to_string() },];
    let mut wizard = WorkoutWizard::new(InMemoryWorkoutStore::with_exercises(catalog));

    if let Err(e) = wizard.begin(WorkoutDraft { name: "Leg Day".to_string(),
                                                start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                                                objective: Some("hipertrofia".to_string()),
                                                ..Default::default() })
    {
        eprintln!("[gym demo] begin: {e}");
        std::process::exit(4);
    }
    for (exercise, sets, reps) in [(1, "4", "8"), (2, "3", "10")] {
        if let Err(e) = wizard.add_entry(ExerciseEntryDraft { exercise: Some(exercise),
                                                              sets: sets.to_string(),
                                                              reps: reps.to_string(),
                                                              ..Default::default() })
        {
            eprintln!("[gym demo] add_entry: {e}");
            std::process::exit(4);
        }
    }

    match wizard.commit() {
        Ok(receipt) => println!("workout {} creado con {} ejercicios",
                                receipt.workout_id, receipt.entries_persisted),
        Err(e) => {
            eprintln!("[gym demo] {e}");
            std::process::exit(4);
        }
    }
    println!("sesión {}:", wizard.session_id());
    for ev in wizard.events() {
        println!("  [{}] {:?}", ev.seq, ev.kind);
    }
}

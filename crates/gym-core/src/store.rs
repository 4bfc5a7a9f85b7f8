//! Puerto hacia el colaborador de almacenamiento.
//!
//! Contrato del puerto: una operación de creación fallida se detecta por la
//! ausencia de identificador generado (`None`), no por una taxonomía de
//! excepciones. La implementación Postgres vive en `gym-persistence`; aquí
//! sólo el trait y un backend en memoria para tests y demos.

use gym_domain::{ExerciseOption, LinkId, StagedExerciseEntry, WorkoutHeader, WorkoutId};

/// Operaciones mínimas que el núcleo exige al almacén relacional.
pub trait WorkoutStore {
    /// Persiste la cabecera y devuelve el id generado, o `None` si falló.
    fn create_workout(&mut self, header: &WorkoutHeader) -> Option<WorkoutId>;
    /// Persiste una línea workout↔ejercicio. `None` si falló.
    fn create_workout_exercise_link(&mut self, workout_id: WorkoutId, entry: &StagedExerciseEntry)
                                    -> Option<LinkId>;
    /// Opciones id/nombre para el selector de ejercicios, ordenadas por
    /// nombre.
    fn list_exercises_for_selection(&self) -> Vec<ExerciseOption>;
}

/// Backend en memoria con inyección de fallos para ejercitar el contrato
/// fail-fast del secuenciador.
#[derive(Debug, Default)]
pub struct InMemoryWorkoutStore {
    pub exercises: Vec<ExerciseOption>,
    pub workouts: Vec<(WorkoutId, WorkoutHeader)>,
    pub links: Vec<(LinkId, WorkoutId, StagedExerciseEntry)>,
    /// `create_workout` devuelve siempre `None`.
    pub fail_workout_insert: bool,
    /// A partir de la n-ésima llamada (base 0), `create_workout_exercise_link`
    /// devuelve `None` sin registrar nada.
    pub fail_links_from_call: Option<usize>,
    /// Llamadas recibidas por `create_workout_exercise_link`, fallidas
    /// incluidas.
    pub link_calls: usize,
    pub next_workout_id: WorkoutId,
    pub next_link_id: LinkId,
}

impl InMemoryWorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend precargado con un catálogo de ejercicios.
    pub fn with_exercises(exercises: Vec<ExerciseOption>) -> Self {
        InMemoryWorkoutStore { exercises, ..Self::default() }
    }

    /// Líneas persistidas para un workout, en orden de inserción.
    pub fn links_for(&self, workout_id: WorkoutId) -> Vec<&StagedExerciseEntry> {
        self.links
            .iter()
            .filter(|(_, wid, _)| *wid == workout_id)
            .map(|(_, _, e)| e)
            .collect()
    }
}

impl WorkoutStore for InMemoryWorkoutStore {
    fn create_workout(&mut self, header: &WorkoutHeader) -> Option<WorkoutId> {
        if self.fail_workout_insert {
            return None;
        }
        self.next_workout_id += 1;
        let id = self.next_workout_id;
        self.workouts.push((id, header.clone()));
        Some(id)
    }

    fn create_workout_exercise_link(&mut self, workout_id: WorkoutId, entry: &StagedExerciseEntry)
                                    -> Option<LinkId> {
        let call = self.link_calls;
        self.link_calls += 1;
        if matches!(self.fail_links_from_call, Some(n) if call >= n) {
            return None;
        }
        self.next_link_id += 1;
        let id = self.next_link_id;
        self.links.push((id, workout_id, entry.clone()));
        Some(id)
    }

    fn list_exercises_for_selection(&self) -> Vec<ExerciseOption> {
        let mut options = self.exercises.clone();
        options.sort_by(|a, b| a.name.cmp(&b.name));
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gym_domain::ExerciseEntryDraft;

    fn header() -> WorkoutHeader {
        WorkoutHeader::new("Test", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
    }

    fn entry(exercise: i64) -> StagedExerciseEntry {
        StagedExerciseEntry::from_draft(ExerciseEntryDraft { exercise: Some(exercise),
                                                             sets: "3".to_string(),
                                                             reps: "10".to_string(),
                                                             ..Default::default() },
                                        1).unwrap()
    }

    #[test]
    fn test_ids_are_sequential_and_non_zero() {
        let mut store = InMemoryWorkoutStore::new();
        let w1 = store.create_workout(&header()).unwrap();
        let w2 = store.create_workout(&header()).unwrap();
        assert_eq!((w1, w2), (1, 2));
        let l1 = store.create_workout_exercise_link(w1, &entry(5)).unwrap();
        assert_eq!(l1, 1);
    }

    #[test]
    fn test_failure_injection_returns_none_without_recording() {
        let mut store = InMemoryWorkoutStore { fail_links_from_call: Some(1), ..Default::default() };
        let wid = store.create_workout(&header()).unwrap();
        assert!(store.create_workout_exercise_link(wid, &entry(5)).is_some());
        assert!(store.create_workout_exercise_link(wid, &entry(6)).is_none());
        assert_eq!(store.links.len(), 1);
        assert_eq!(store.link_calls, 2);
    }

    #[test]
    fn test_selection_is_sorted_by_name() {
        let store = InMemoryWorkoutStore::with_exercises(vec![ExerciseOption { id: 2, name: "Sentadilla".into() },
                                                              ExerciseOption { id: 1, name: "Press banca".into() },]);
        let names: Vec<String> = store.list_exercises_for_selection().into_iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["Press banca".to_string(), "Sentadilla".to_string()]);
    }
}

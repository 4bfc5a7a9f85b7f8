//! Secuenciador de commit: persistencia con intención transaccional pero sin
//! garantía transaccional.
//!
//! El almacén se trata como un conjunto de creaciones independientes, así que
//! el contrato propio es explícito: cortar en el primer fallo, dejar visible
//! el estado parcial y no compensar nunca. Un borrado compensatorio podría
//! destruir datos que otro lector ya está consultando; continuar en silencio
//! ocultaría pérdida de datos.

use crate::errors::WorkoutFlowError;
use crate::store::WorkoutStore;
use gym_domain::{StagedExerciseEntry, WorkoutHeader, WorkoutId};
use serde::{Deserialize, Serialize};

/// Resultado de un commit completo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    pub workout_id: WorkoutId,
    pub entries_persisted: usize,
}

/// Persiste la cabecera y después cada línea en orden ascendente.
///
/// Secuencia:
/// 1. Lista vacía → `Validation`, sin tocar el almacén.
/// 2. `create_workout` sin id → `Persistence` (el buffer del llamador queda
///    intacto para reintentar).
/// 3. Primer `create_workout_exercise_link` sin id → `PartialCommit` con el
///    id del workout creado y la línea que falló; no se intentan las
///    restantes ni se borra lo ya escrito.
///
/// `entries` debe venir ya ordenado ascendente por `order` (invariante del
/// `StagingBuffer`).
pub fn commit<S: WorkoutStore + ?Sized>(store: &mut S, header: &WorkoutHeader,
                                        entries: &[StagedExerciseEntry])
                                        -> Result<CommitReceipt, WorkoutFlowError> {
    if entries.is_empty() {
        return Err(WorkoutFlowError::Validation("no hay ejercicios preparados para guardar".to_string()));
    }

    let workout_id = store.create_workout(header)
                          .ok_or_else(|| WorkoutFlowError::Persistence("create_workout no devolvió id".to_string()))?;

    for (persisted, entry) in entries.iter().enumerate() {
        if store.create_workout_exercise_link(workout_id, entry).is_none() {
            return Err(WorkoutFlowError::PartialCommit { workout_id,
                                                         failed_exercise: entry.exercise_id(),
                                                         failed_order: entry.order(),
                                                         persisted,
                                                         total: entries.len() });
        }
    }

    Ok(CommitReceipt { workout_id, entries_persisted: entries.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryWorkoutStore;
    use chrono::NaiveDate;
    use gym_domain::ExerciseEntryDraft;

    fn header() -> WorkoutHeader {
        WorkoutHeader::new("Leg Day", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
    }

    fn entry(exercise: i64, order: u32) -> StagedExerciseEntry {
        StagedExerciseEntry::from_draft(ExerciseEntryDraft { exercise: Some(exercise),
                                                             order: Some(order),
                                                             sets: "4".to_string(),
                                                             reps: "8".to_string(),
                                                             ..Default::default() },
                                        order).unwrap()
    }

    #[test]
    fn test_empty_list_rejected_without_store_calls() {
        let mut store = InMemoryWorkoutStore::new();
        let result = commit(&mut store, &header(), &[]);
        assert!(matches!(result, Err(WorkoutFlowError::Validation(_))));
        assert!(store.workouts.is_empty());
        assert_eq!(store.link_calls, 0);
    }

    #[test]
    fn test_header_failure_is_persistence_error() {
        let mut store = InMemoryWorkoutStore { fail_workout_insert: true, ..Default::default() };
        let result = commit(&mut store, &header(), &[entry(1, 1)]);
        assert!(matches!(result, Err(WorkoutFlowError::Persistence(_))));
        assert_eq!(store.link_calls, 0);
    }

    #[test]
    fn test_full_commit_persists_in_order() {
        let mut store = InMemoryWorkoutStore::new();
        let receipt = commit(&mut store, &header(), &[entry(1, 1), entry(2, 2)]).unwrap();
        assert_eq!(receipt.entries_persisted, 2);
        let persisted: Vec<i64> = store.links_for(receipt.workout_id).iter().map(|e| e.exercise_id()).collect();
        assert_eq!(persisted, vec![1, 2]);
    }

    #[test]
    fn test_partial_failure_stops_at_first_none() {
        let mut store = InMemoryWorkoutStore { fail_links_from_call: Some(1), ..Default::default() };
        let entries = [entry(1, 1), entry(2, 2), entry(3, 3)];
        let result = commit(&mut store, &header(), &entries);
        match result {
            Err(WorkoutFlowError::PartialCommit { workout_id, failed_exercise, failed_order, persisted, total }) => {
                assert_eq!(workout_id, 1);
                assert_eq!(failed_exercise, 2);
                assert_eq!(failed_order, 2);
                assert_eq!(persisted, 1);
                assert_eq!(total, 3);
            }
            other => panic!("expected PartialCommit, got {other:?}"),
        }
        // ni tercera llamada ni compensación del link ya escrito
        assert_eq!(store.link_calls, 2);
        assert_eq!(store.links.len(), 1);
        assert_eq!(store.workouts.len(), 1);
    }
}

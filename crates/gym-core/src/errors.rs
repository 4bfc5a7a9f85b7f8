//! Errores del flujo de registro. Ninguno es fatal para el proceso: todos se
//! recuperan al nivel del intento de workflow en curso.

use gym_domain::{DomainError, ExerciseId, WorkoutId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum WorkoutFlowError {
    /// Campo obligatorio ausente o commit con lista vacía. El estado de la
    /// sesión queda intacto y el usuario puede corregir y reintentar.
    #[error("validation: {0}")]
    Validation(String),
    /// Commit sin cabecera confirmada de fase 1.
    #[error("invalid session state: {0}")]
    State(String),
    /// La creación de la cabecera no devolvió identificador. El buffer se
    /// conserva para reintentar.
    #[error("persistence: {0}")]
    Persistence(String),
    /// Una línea falló después de crearse el workout. No se intentan las
    /// restantes ni se borra lo ya escrito: el operador inspecciona con el
    /// id reportado.
    #[error("partial commit: workout {workout_id} created, link for exercise {failed_exercise} (order {failed_order}) failed after {persisted}/{total} links")]
    PartialCommit {
        workout_id: WorkoutId,
        failed_exercise: ExerciseId,
        failed_order: u32,
        persisted: usize,
        total: usize,
    },
}

impl From<DomainError> for WorkoutFlowError {
    fn from(e: DomainError) -> Self {
        WorkoutFlowError::Validation(e.to_string())
    }
}

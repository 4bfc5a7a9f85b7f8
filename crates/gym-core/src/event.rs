//! Traza de eventos de la sesión del asistente.
//!
//! Cada transición del asistente emite un `WizardEvent` a una traza en
//! memoria, propiedad de la sesión. Sirve para diagnóstico y para pintar el
//! progreso en la UI; no se persiste.

use chrono::{DateTime, Utc};
use gym_domain::{ExerciseId, WorkoutId};
use serde::{Deserialize, Serialize};

/// Transiciones observables de una sesión de registro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardEvent {
    /// Fase 1 confirmada. Invariante: reinicia la lista preparada.
    HeaderStaged { name: String },
    /// Línea validada y añadida a la lista preparada.
    EntryStaged { exercise_id: ExerciseId, order: u32 },
    /// Lista preparada vaciada por el usuario.
    StagingCleared,
    /// Commit completo: cabecera y todas las líneas persistidas.
    CommitCompleted { workout_id: WorkoutId, entries_persisted: usize },
    /// Commit cortado. `workout_id: None` si ni la cabecera llegó a crearse;
    /// con `Some`, quedó estado parcial visible para inspección manual.
    CommitHalted {
        workout_id: Option<WorkoutId>,
        failed_order: Option<u32>,
    },
}

/// Evento con metadatos de la traza (orden de emisión y timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub seq: u64,
    pub ts: DateTime<Utc>,
    pub kind: WizardEvent,
}

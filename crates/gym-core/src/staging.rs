//! Buffer de preparación: cabecera confirmada + lista acumulada de líneas.
//!
//! Invariantes:
//! - La lista está siempre ordenada ascendente por `order` tras cada alta
//!   (orden estable: los empates conservan el orden de inserción).
//! - `next_order` es `max(order) + 1` sobre las líneas actuales, o `1` con la
//!   lista vacía.
//! - Órdenes duplicados se permiten: sólo se reordena, nunca se deduplica.

use crate::errors::WorkoutFlowError;
use gym_domain::{ExerciseEntryDraft, StagedExerciseEntry, WorkoutDraft, WorkoutHeader};

/// Estado transitorio de un workout en preparación, propiedad exclusiva de la
/// sesión interactiva que lo creó. No hay baja individual de líneas: sólo
/// `clear` de la lista completa.
#[derive(Debug, Clone, Default)]
pub struct StagingBuffer {
    header: Option<WorkoutHeader>,
    entries: Vec<StagedExerciseEntry>,
    next_order: u32,
}

impl StagingBuffer {
    pub fn new() -> Self {
        StagingBuffer { header: None,
                        entries: Vec::new(),
                        next_order: 1 }
    }

    /// Fase 1: valida y confirma la cabecera. Reemplaza cualquier cabecera
    /// previa y vacía la lista preparada. Si la validación falla, el estado
    /// anterior queda intacto.
    pub fn begin(&mut self, draft: WorkoutDraft) -> Result<(), WorkoutFlowError> {
        let header = WorkoutHeader::from_draft(draft)?;
        self.header = Some(header);
        self.entries.clear();
        self.next_order = 1;
        Ok(())
    }

    /// Fase 2: valida y añade una línea, reordena por `order` y recalcula el
    /// contador. Devuelve la línea tal como quedó preparada.
    pub fn add_entry(&mut self, draft: ExerciseEntryDraft) -> Result<StagedExerciseEntry, WorkoutFlowError> {
        let entry = StagedExerciseEntry::from_draft(draft, self.next_order)?;
        self.entries.push(entry.clone());
        // sort_by_key es estable: los empates de order conservan inserción
        self.entries.sort_by_key(|e| e.order());
        self.next_order = self.entries.iter().map(|e| e.order()).max().unwrap_or(0) + 1;
        Ok(entry)
    }

    /// Vacía la lista y reinicia el contador a 1. Idempotente. La cabecera
    /// confirmada sobrevive: sólo `begin` o un commit completo la sustituyen.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_order = 1;
    }

    /// Reinicio completo a `Empty` (cabecera incluida). Lo usa el asistente
    /// tras un commit totalmente exitoso.
    pub fn reset(&mut self) {
        self.header = None;
        self.clear();
    }

    /// Vista de sólo lectura de la lista preparada, ordenada ascendente.
    pub fn snapshot(&self) -> &[StagedExerciseEntry] {
        &self.entries
    }

    pub fn header(&self) -> Option<&WorkoutHeader> {
        self.header.as_ref()
    }

    /// Orden que se sugerirá a la próxima línea sin orden explícito.
    pub fn next_order(&self) -> u32 {
        self.next_order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

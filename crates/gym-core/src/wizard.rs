//! Fachada por sesión del registro de workouts.
//!
//! Un `WorkoutWizard` por sesión interactiva: el buffer y su contador son
//! propiedad exclusiva de la instancia, nunca estado ambiente compartido. El
//! aislamiento entre sesiones es por posesión (dos asistentes no comparten
//! nada) y no hacen falta locks: cada interacción se ejecuta completa antes
//! de aceptar la siguiente.
//!
//! Máquina de estados por sesión:
//! `Empty → HeaderStaged → (AddingEntries)* → Committing → {Committed | PartialFailure}`.
//! `Committed` reinicia a `Empty`; `PartialFailure` es terminal para la
//! instancia en curso y exige un `begin` nuevo para reintentar.

use crate::errors::WorkoutFlowError;
use crate::event::{SessionEvent, WizardEvent};
use crate::sequencer::{self, CommitReceipt};
use crate::staging::StagingBuffer;
use crate::store::WorkoutStore;
use chrono::Utc;
use gym_domain::{ExerciseEntryDraft, ExerciseOption, StagedExerciseEntry, WorkoutDraft};
use uuid::Uuid;

/// Asistente de registro en dos fases, genérico sobre el almacén.
#[derive(Debug)]
pub struct WorkoutWizard<S: WorkoutStore> {
    session_id: Uuid,
    store: S,
    buffer: StagingBuffer,
    trail: Vec<SessionEvent>,
    // true tras un PartialCommit: la instancia queda terminal hasta un begin
    halted: bool,
}

impl<S: WorkoutStore> WorkoutWizard<S> {
    /// Crea un asistente para una sesión nueva sobre el almacén dado.
    pub fn new(store: S) -> Self {
        WorkoutWizard { session_id: Uuid::new_v4(),
                        store,
                        buffer: StagingBuffer::new(),
                        trail: Vec::new(),
                        halted: false }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Fase 1: confirma la cabecera. Ver `StagingBuffer::begin`. Un `begin`
    /// válido también saca a la sesión del estado terminal de fallo parcial.
    pub fn begin(&mut self, draft: WorkoutDraft) -> Result<(), WorkoutFlowError> {
        self.buffer.begin(draft)?;
        self.halted = false;
        let name = self.buffer.header().map(|h| h.name().to_string()).unwrap_or_default();
        self.push_event(WizardEvent::HeaderStaged { name });
        Ok(())
    }

    /// Fase 2: añade una línea a la lista preparada.
    pub fn add_entry(&mut self, draft: ExerciseEntryDraft) -> Result<(), WorkoutFlowError> {
        let staged = self.buffer.add_entry(draft)?;
        self.push_event(WizardEvent::EntryStaged { exercise_id: staged.exercise_id(),
                                                   order: staged.order() });
        Ok(())
    }

    /// Vacía la lista preparada (la cabecera confirmada sobrevive).
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.push_event(WizardEvent::StagingCleared);
    }

    /// Lista preparada actual, ordenada ascendente por `order`.
    pub fn snapshot(&self) -> &[StagedExerciseEntry] {
        self.buffer.snapshot()
    }

    /// Orden sugerido para la próxima línea.
    pub fn next_order(&self) -> u32 {
        self.buffer.next_order()
    }

    /// Opciones para el selector de ejercicios.
    pub fn exercise_options(&self) -> Vec<ExerciseOption> {
        self.store.list_exercises_for_selection()
    }

    /// Confirmación final: persiste cabecera y líneas vía el secuenciador.
    ///
    /// Éxito → buffer reiniciado a `Empty`. `Persistence` → buffer intacto y
    /// el commit puede reintentarse tal cual. `PartialCommit` → buffer
    /// intacto, con todo lo aún-no-guardado visible para el operador, pero la
    /// instancia queda terminal: reintentar exige un `begin` nuevo. Nunca hay
    /// reintento ni compensación automáticos.
    pub fn commit(&mut self) -> Result<CommitReceipt, WorkoutFlowError> {
        if self.halted {
            return Err(WorkoutFlowError::State("previous commit halted partially; begin a new registration"
                                               .to_string()));
        }
        let header = self.buffer
                         .header()
                         .cloned()
                         .ok_or_else(|| {
                             WorkoutFlowError::State("no confirmed workout header (phase 1 incomplete)".to_string())
                         })?;
        let result = sequencer::commit(&mut self.store, &header, self.buffer.snapshot());
        match &result {
            Ok(receipt) => {
                self.push_event(WizardEvent::CommitCompleted { workout_id: receipt.workout_id,
                                                               entries_persisted: receipt.entries_persisted });
                self.buffer.reset();
            }
            Err(WorkoutFlowError::PartialCommit { workout_id, failed_order, .. }) => {
                self.halted = true;
                self.push_event(WizardEvent::CommitHalted { workout_id: Some(*workout_id),
                                                            failed_order: Some(*failed_order) });
            }
            Err(WorkoutFlowError::Persistence(_)) => {
                self.push_event(WizardEvent::CommitHalted { workout_id: None, failed_order: None });
            }
            // Validation (lista vacía): rechazo local, sin evento de commit
            Err(_) => {}
        }
        result
    }

    /// Traza de eventos de la sesión, en orden de emisión.
    pub fn events(&self) -> &[SessionEvent] {
        &self.trail
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn push_event(&mut self, kind: WizardEvent) {
        let seq = self.trail.len() as u64;
        self.trail.push(SessionEvent { seq, ts: Utc::now(), kind });
    }
}

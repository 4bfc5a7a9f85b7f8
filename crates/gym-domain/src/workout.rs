// workout.rs
use crate::{ClientId, DomainError, ExerciseId, InstructorId, PlanId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Datos crudos de la fase 1 del asistente (cabecera del workout), tal como
/// llegan del formulario. Sin validar: `WorkoutHeader::from_draft` es quien
/// decide si el borrador es aceptable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDraft {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub objective: Option<String>,
    pub client_id: Option<ClientId>,
    pub instructor_id: Option<InstructorId>,
    pub plan_id: Option<PlanId>,
}

/// Cabecera confirmada de un workout. Inmutable una vez preparada: la fase 2
/// no permite editarla sin reiniciar el asistente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutHeader {
    name: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    description: Option<String>,
    kind: Option<String>,
    objective: Option<String>,
    client_id: Option<ClientId>,
    instructor_id: Option<InstructorId>,
    plan_id: Option<PlanId>,
}

impl WorkoutHeader {
    /// Crea una cabecera mínima validada.
    ///
    /// # Errores
    /// `DomainError::ValidationError` si el nombre queda vacío tras `trim`.
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError("El nombre del workout no puede estar vacío".to_string()));
        }
        Ok(WorkoutHeader { name,
                           start_date,
                           end_date: None,
                           description: None,
                           kind: None,
                           objective: None,
                           client_id: None,
                           instructor_id: None,
                           plan_id: None })
    }

    /// Valida un borrador completo de fase 1. La fecha de inicio es
    /// obligatoria; el resto de campos se copia tal cual.
    pub fn from_draft(draft: WorkoutDraft) -> Result<Self, DomainError> {
        let start_date =
            draft.start_date
                 .ok_or_else(|| DomainError::ValidationError("La fecha de inicio es obligatoria".to_string()))?;
        let mut header = WorkoutHeader::new(draft.name, start_date)?;
        header.end_date = draft.end_date;
        header.description = draft.description;
        header.kind = draft.kind;
        header.objective = draft.objective;
        header.client_id = draft.client_id;
        header.instructor_id = draft.instructor_id;
        header.plan_id = draft.plan_id;
        Ok(header)
    }

    /// Copia con fecha de fin.
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Copia con descripción.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Copia con objetivo (hipertrofia, resistencia, etc.).
    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = Some(objective.into());
        self
    }

    /// Copia con tipo de workout (fuerza, cardio, mixto...).
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Copia asociada a un cliente.
    pub fn for_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Copia con instructor asignado.
    pub fn with_instructor(mut self, instructor_id: InstructorId) -> Self {
        self.instructor_id = Some(instructor_id);
        self
    }

    /// Copia vinculada a un plan.
    pub fn with_plan(mut self, plan_id: PlanId) -> Self {
        self.plan_id = Some(plan_id);
        self
    }

    // Getters
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
    pub fn objective(&self) -> Option<&str> {
        self.objective.as_deref()
    }
    pub fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }
    pub fn instructor_id(&self) -> Option<InstructorId> {
        self.instructor_id
    }
    pub fn plan_id(&self) -> Option<PlanId> {
        self.plan_id
    }
}

impl fmt::Display for WorkoutHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkoutHeader(name: {}, start: {})", self.name, self.start_date)
    }
}

/// Datos crudos de la fase 2 (una línea de ejercicio del formulario).
///
/// `exercise: None` representa el centinela del selector ("elija un
/// ejercicio"); `order: None` delega el orden en el contador del buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntryDraft {
    pub exercise: Option<ExerciseId>,
    pub order: Option<u32>,
    pub sets: String,
    pub reps: String,
    pub load: Option<String>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

/// Línea de ejercicio ya validada, lista para el buffer de preparación.
/// Nunca se persiste de forma independiente: sólo existe dentro de la lista
/// preparada de una sesión.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedExerciseEntry {
    exercise_id: ExerciseId,
    order: u32,
    sets: String,
    reps: String,
    load: Option<String>,
    rest_seconds: Option<i32>,
    notes: Option<String>,
}

impl StagedExerciseEntry {
    /// Valida un borrador de línea. `fallback_order` es el orden sugerido por
    /// el buffer cuando el formulario no fija uno explícito.
    ///
    /// # Errores
    /// `DomainError::ValidationError` si el ejercicio quedó en el centinela
    /// del selector, si series o repeticiones están vacías, o si el orden
    /// explícito no es un entero positivo.
    pub fn from_draft(draft: ExerciseEntryDraft, fallback_order: u32) -> Result<Self, DomainError> {
        let exercise_id =
            draft.exercise
                 .ok_or_else(|| DomainError::ValidationError("Seleccione un ejercicio de la lista".to_string()))?;
        if draft.sets.trim().is_empty() {
            return Err(DomainError::ValidationError("Las series son obligatorias".to_string()));
        }
        if draft.reps.trim().is_empty() {
            return Err(DomainError::ValidationError("Las repeticiones son obligatorias".to_string()));
        }
        let order = draft.order.unwrap_or(fallback_order);
        if order == 0 {
            return Err(DomainError::ValidationError("El orden debe ser un entero positivo".to_string()));
        }
        Ok(StagedExerciseEntry { exercise_id,
                                 order,
                                 sets: draft.sets,
                                 reps: draft.reps,
                                 load: draft.load,
                                 rest_seconds: draft.rest_seconds,
                                 notes: draft.notes })
    }

    // Getters
    pub fn exercise_id(&self) -> ExerciseId {
        self.exercise_id
    }
    pub fn order(&self) -> u32 {
        self.order
    }
    pub fn sets(&self) -> &str {
        &self.sets
    }
    pub fn reps(&self) -> &str {
        &self.reps
    }
    pub fn load(&self) -> Option<&str> {
        self.load.as_deref()
    }
    pub fn rest_seconds(&self) -> Option<i32> {
        self.rest_seconds
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl fmt::Display for StagedExerciseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "<exercise {} order {} {}x{}>",
               self.exercise_id, self.order, self.sets, self.reps)
    }
}

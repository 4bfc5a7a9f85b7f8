//! Identificadores generados por el almacén relacional (AUTOINCREMENT /
//! BIGSERIAL). Alias simples: el valor `0` nunca se emite; la ausencia de id
//! se modela con `Option` en el puerto de persistencia.

pub type ClientId = i64;
pub type InstructorId = i64;
pub type PlanId = i64;
pub type ExerciseId = i64;
pub type WorkoutId = i64;
pub type LinkId = i64;
pub type PaymentId = i64;

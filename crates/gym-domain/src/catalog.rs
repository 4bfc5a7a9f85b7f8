//! Registros tipados del catálogo y de lectura del back office.
//!
//! Cada consulta del almacén mapea a una de estas estructuras con campos
//! explícitos, de modo que un campo renombrado rompe en compilación y no en
//! producción.

use crate::{ClientId, ExerciseId, InstructorId, LinkId, PaymentId, PlanId, WorkoutId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cliente de la academia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Instructor registrado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub name: String,
    pub specialty: Option<String>,
}

/// Plan de suscripción.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub monthly_price: f64,
    pub duration_months: i32,
}

/// Ejercicio del catálogo global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub muscle_group: Option<String>,
}

/// Par id/nombre para poblar el selector de ejercicios del asistente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseOption {
    pub id: ExerciseId,
    pub name: String,
}

/// Pago registrado de un cliente.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub client_id: ClientId,
    pub paid_on: NaiveDate,
    pub amount: f64,
    pub settled: bool,
}

/// Resumen de pagos de un cliente: total liquidado y último pago liquidado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStats {
    pub client_id: ClientId,
    pub total_paid: f64,
    pub last_payment_date: Option<NaiveDate>,
    pub last_payment_amount: Option<f64>,
}

/// Cuántos clientes distintos con workout activo atiende cada instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorClientCount {
    pub instructor_id: InstructorId,
    pub name: String,
    pub specialty: Option<String>,
    pub active_clients: i64,
}

/// Una línea persistida de workout_exercises, con el nombre del ejercicio ya
/// resuelto para mostrar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExerciseRow {
    pub link_id: LinkId,
    pub exercise_name: String,
    pub muscle_group: Option<String>,
    pub sets: String,
    pub reps: String,
    pub load: Option<String>,
    pub rest_seconds: Option<i32>,
    pub position: u32,
    pub notes: Option<String>,
}

/// Workout persistido con sus líneas ordenadas y los nombres de cliente,
/// instructor y plan resueltos (LEFT JOIN: pueden faltar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutOverview {
    pub id: WorkoutId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub objective: Option<String>,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub instructor_name: Option<String>,
    pub plan_name: Option<String>,
    pub exercises: Vec<WorkoutExerciseRow>,
}

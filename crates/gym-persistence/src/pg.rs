//! Implementación Postgres (Diesel) del colaborador de almacenamiento.
//!
//! Decisiones:
//! - `create_workout` y `create_workout_exercise_link` son inserciones
//!   sueltas de una fila, sin transacción envolvente: el secuenciador de
//!   `gym-core` asume creaciones independientes y su contrato fail-fast /
//!   estado-parcial-visible depende de que lo sean.
//! - En el puerto `WorkoutStore` un fallo se reporta como ausencia de id; el
//!   error concreto queda en el log (`error!`). Los helpers por entidad, en
//!   cambio, devuelven `Result<_, PersistenceError>`.
//! - Errores transitorios de pool/serialización se reintentan con un backoff
//!   corto antes de darse por perdidos.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, error, warn};

use gym_core::WorkoutStore;
use gym_domain::{Client, ClientId, Exercise, ExerciseId, ExerciseOption, Instructor, InstructorClientCount,
                 InstructorId, LinkId, Payment, PaymentId, PaymentStats, Plan, PlanId, StagedExerciseEntry,
                 WorkoutExerciseRow, WorkoutHeader, WorkoutId, WorkoutOverview};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::{clients, exercises, instructors, payments, plans, workout_exercises, workouts};

/// Pool r2d2 de conexiones Postgres. Al construirlo se corren las
/// migraciones pendientes (una sola vez).
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones: permite inyectar un pool real o un
/// doble en tests sin acoplar el store a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    /// Devuelve una conexión lista para ejecutar consultas Diesel, o
    /// `PersistenceError::TransientIo` si el pool no puede entregarla.
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

/// `ConnectionProvider` respaldado por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Errores que conviene reintentar con backoff: conflictos de serialización,
/// IO transitorio de pool/conexión y desconexiones detectadas por texto
/// (best-effort, sin acoplar a SQLSTATE).
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Reintento con backoff pequeño (hasta 3 intentos: 15ms, 30ms, 45ms).
/// No altera semántica de negocio; sólo repite la unidad de trabajo.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Fila para insertar en `workouts`.
#[derive(Insertable, Debug)]
#[diesel(table_name = workouts)]
struct NewWorkoutRow<'a> {
    name: &'a str,
    client_id: Option<i64>,
    instructor_id: Option<i64>,
    plan_id: Option<i64>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    objective: Option<&'a str>,
    kind: Option<&'a str>,
    description: Option<&'a str>,
}

/// Fila para insertar en `workout_exercises`. `position` es el `order` de la
/// línea preparada (CHECK >= 1 en el esquema).
#[derive(Insertable, Debug)]
#[diesel(table_name = workout_exercises)]
struct NewLinkRow<'a> {
    workout_id: i64,
    exercise_id: i64,
    sets: &'a str,
    reps: &'a str,
    load: Option<&'a str>,
    rest_seconds: Option<i32>,
    position: i32,
    notes: Option<&'a str>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = clients)]
struct NewClientRow<'a> {
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    birth_date: Option<NaiveDate>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = payments)]
struct NewPaymentRow {
    client_id: i64,
    paid_on: NaiveDate,
    amount: f64,
    settled: bool,
}

/// Fila del agregado clientes-activos-por-instructor (consulta SQL cruda:
/// COUNT DISTINCT con join condicionado no se expresa bien en el DSL).
#[derive(QueryableByName, Debug)]
struct InstructorCountRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    instructor_id: i64,
    #[diesel(sql_type = diesel::sql_types::Text)]
    name: String,
    #[diesel(sql_type = diesel::sql_types::Nullable<diesel::sql_types::Text>)]
    specialty: Option<String>,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    active_clients: i64,
}

/// Almacén Postgres del back office.
pub struct PgWorkoutStore<P: ConnectionProvider> {
    provider: P,
}

impl PgWorkoutStore<PoolProvider> {
    /// Constructor habitual: store sobre un pool ya construido/migrado.
    pub fn from_pool(pool: PgPool) -> Self {
        PgWorkoutStore::new(PoolProvider { pool })
    }
}

impl<P: ConnectionProvider> PgWorkoutStore<P> {
    pub fn new(provider: P) -> Self {
        PgWorkoutStore { provider }
    }

    fn try_create_workout(&self, header: &WorkoutHeader) -> Result<WorkoutId, PersistenceError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(workouts::table)
                .values(NewWorkoutRow { name: header.name(),
                                        client_id: header.client_id(),
                                        instructor_id: header.instructor_id(),
                                        plan_id: header.plan_id(),
                                        start_date: header.start_date(),
                                        end_date: header.end_date(),
                                        objective: header.objective(),
                                        kind: header.kind(),
                                        description: header.description() })
                .returning(workouts::id)
                .get_result::<i64>(&mut conn)
                .map_err(PersistenceError::from)
        })
    }

    fn try_create_link(&self, workout_id: WorkoutId, entry: &StagedExerciseEntry)
                       -> Result<LinkId, PersistenceError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(workout_exercises::table)
                .values(NewLinkRow { workout_id,
                                     exercise_id: entry.exercise_id(),
                                     sets: entry.sets(),
                                     reps: entry.reps(),
                                     load: entry.load(),
                                     rest_seconds: entry.rest_seconds(),
                                     position: entry.order() as i32,
                                     notes: entry.notes() })
                .returning(workout_exercises::id)
                .get_result::<i64>(&mut conn)
                .map_err(PersistenceError::from)
        })
    }

    // --- Clientes ---

    pub fn create_client(&self, name: &str, email: &str, phone: Option<&str>, birth_date: Option<NaiveDate>)
                         -> Result<ClientId, PersistenceError> {
        let mut conn = self.provider.connection()?;
        diesel::insert_into(clients::table).values(NewClientRow { name, email, phone, birth_date })
                                           .returning(clients::id)
                                           .get_result::<i64>(&mut conn)
                                           .map_err(PersistenceError::from)
    }

    pub fn list_clients(&self) -> Result<Vec<Client>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let rows: Vec<(i64, String, String, Option<String>, Option<NaiveDate>)> =
            clients::table.order(clients::name.asc())
                          .select((clients::id, clients::name, clients::email, clients::phone, clients::birth_date))
                          .load(&mut conn)?;
        Ok(rows.into_iter()
               .map(|(id, name, email, phone, birth_date)| Client { id, name, email, phone, birth_date })
               .collect())
    }

    // --- Instructores ---

    pub fn create_instructor(&self, name: &str, specialty: Option<&str>) -> Result<InstructorId, PersistenceError> {
        let mut conn = self.provider.connection()?;
        diesel::insert_into(instructors::table)
            .values((instructors::name.eq(name), instructors::specialty.eq(specialty)))
            .returning(instructors::id)
            .get_result::<i64>(&mut conn)
            .map_err(PersistenceError::from)
    }

    pub fn list_instructors(&self) -> Result<Vec<Instructor>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let rows: Vec<(i64, String, Option<String>)> =
            instructors::table.order(instructors::name.asc())
                              .select((instructors::id, instructors::name, instructors::specialty))
                              .load(&mut conn)?;
        Ok(rows.into_iter().map(|(id, name, specialty)| Instructor { id, name, specialty }).collect())
    }

    // --- Planes ---

    pub fn create_plan(&self, name: &str, monthly_price: f64, duration_months: i32)
                       -> Result<PlanId, PersistenceError> {
        let mut conn = self.provider.connection()?;
        diesel::insert_into(plans::table).values((plans::name.eq(name),
                                                  plans::monthly_price.eq(monthly_price),
                                                  plans::duration_months.eq(duration_months)))
                                         .returning(plans::id)
                                         .get_result::<i64>(&mut conn)
                                         .map_err(PersistenceError::from)
    }

    pub fn list_plans(&self) -> Result<Vec<Plan>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let rows: Vec<(i64, String, f64, i32)> =
            plans::table.order(plans::name.asc())
                        .select((plans::id, plans::name, plans::monthly_price, plans::duration_months))
                        .load(&mut conn)?;
        Ok(rows.into_iter()
               .map(|(id, name, monthly_price, duration_months)| Plan { id, name, monthly_price, duration_months })
               .collect())
    }

    // --- Ejercicios ---

    pub fn create_exercise(&self, name: &str, muscle_group: Option<&str>) -> Result<ExerciseId, PersistenceError> {
        let mut conn = self.provider.connection()?;
        diesel::insert_into(exercises::table)
            .values((exercises::name.eq(name), exercises::muscle_group.eq(muscle_group)))
            .returning(exercises::id)
            .get_result::<i64>(&mut conn)
            .map_err(PersistenceError::from)
    }

    pub fn list_exercises(&self) -> Result<Vec<Exercise>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let rows: Vec<(i64, String, Option<String>)> =
            exercises::table.order(exercises::name.asc())
                            .select((exercises::id, exercises::name, exercises::muscle_group))
                            .load(&mut conn)?;
        Ok(rows.into_iter().map(|(id, name, muscle_group)| Exercise { id, name, muscle_group }).collect())
    }

    fn try_exercise_options(&self) -> Result<Vec<ExerciseOption>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let rows: Vec<(i64, String)> = exercises::table.order(exercises::name.asc())
                                                       .select((exercises::id, exercises::name))
                                                       .load(&mut conn)?;
        Ok(rows.into_iter().map(|(id, name)| ExerciseOption { id, name }).collect())
    }

    // --- Pagos ---

    pub fn create_payment(&self, client_id: ClientId, paid_on: NaiveDate, amount: f64, settled: bool)
                          -> Result<PaymentId, PersistenceError> {
        let mut conn = self.provider.connection()?;
        diesel::insert_into(payments::table).values(NewPaymentRow { client_id, paid_on, amount, settled })
                                            .returning(payments::id)
                                            .get_result::<i64>(&mut conn)
                                            .map_err(PersistenceError::from)
    }

    /// Pagos de un cliente, los más recientes primero.
    pub fn payments_for_client(&self, client_id: ClientId) -> Result<Vec<Payment>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let rows: Vec<(i64, i64, NaiveDate, f64, bool)> =
            payments::table.filter(payments::client_id.eq(client_id))
                           .order(payments::paid_on.desc())
                           .select((payments::id, payments::client_id, payments::paid_on, payments::amount,
                                    payments::settled))
                           .load(&mut conn)?;
        Ok(rows.into_iter()
               .map(|(id, client_id, paid_on, amount, settled)| Payment { id, client_id, paid_on, amount, settled })
               .collect())
    }

    /// Total liquidado y último pago liquidado de un cliente.
    pub fn payment_stats_for_client(&self, client_id: ClientId) -> Result<PaymentStats, PersistenceError> {
        use diesel::dsl::sum;
        let mut conn = self.provider.connection()?;
        let total: Option<f64> = payments::table.filter(payments::client_id.eq(client_id))
                                                .filter(payments::settled.eq(true))
                                                .select(sum(payments::amount))
                                                .first(&mut conn)?;
        let last: Option<(NaiveDate, f64)> = payments::table.filter(payments::client_id.eq(client_id))
                                                            .filter(payments::settled.eq(true))
                                                            .order(payments::paid_on.desc())
                                                            .select((payments::paid_on, payments::amount))
                                                            .first(&mut conn)
                                                            .optional()?;
        let (last_payment_date, last_payment_amount) = match last {
            Some((d, a)) => (Some(d), Some(a)),
            None => (None, None),
        };
        Ok(PaymentStats { client_id,
                          total_paid: total.unwrap_or(0.0),
                          last_payment_date,
                          last_payment_amount })
    }

    // --- Listados / dashboard ---

    /// Clientes distintos con workout activo (sin fecha de fin o con fin en
    /// el futuro) por instructor, de más a menos cargado.
    pub fn active_client_count_per_instructor(&self) -> Result<Vec<InstructorClientCount>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let rows: Vec<InstructorCountRow> = diesel::sql_query(
            "SELECT i.id AS instructor_id, i.name, i.specialty, \
                    COUNT(DISTINCT w.client_id) AS active_clients \
             FROM instructors i \
             LEFT JOIN workouts w ON i.id = w.instructor_id \
                  AND (w.end_date IS NULL OR w.end_date >= CURRENT_DATE) \
             GROUP BY i.id, i.name, i.specialty \
             ORDER BY active_clients DESC, i.name",
        ).load(&mut conn)?;
        Ok(rows.into_iter()
               .map(|r| InstructorClientCount { instructor_id: r.instructor_id,
                                                name: r.name,
                                                specialty: r.specialty,
                                                active_clients: r.active_clients })
               .collect())
    }

    /// Workouts persistidos con sus líneas, filtrables por cliente y/o
    /// instructor. Workouts más recientes primero; líneas por `position`
    /// ascendente (empates por id de inserción).
    pub fn workouts_with_exercises(&self, client: Option<ClientId>, instructor: Option<InstructorId>)
                                   -> Result<Vec<WorkoutOverview>, PersistenceError> {
        let mut conn = self.provider.connection()?;
        let mut query = workouts::table
            .left_join(clients::table.on(workouts::client_id.eq(clients::id.nullable())))
            .left_join(instructors::table.on(workouts::instructor_id.eq(instructors::id.nullable())))
            .left_join(plans::table.on(workouts::plan_id.eq(plans::id.nullable())))
            .select((workouts::id,
                     workouts::name,
                     workouts::start_date,
                     workouts::end_date,
                     workouts::objective,
                     workouts::kind,
                     workouts::description,
                     clients::name.nullable(),
                     instructors::name.nullable(),
                     plans::name.nullable()))
            .order((workouts::start_date.desc(), workouts::id.desc()))
            .into_boxed();
        if let Some(cid) = client {
            query = query.filter(workouts::client_id.eq(cid));
        }
        if let Some(iid) = instructor {
            query = query.filter(workouts::instructor_id.eq(iid));
        }

        type HeadRow = (i64, String, NaiveDate, Option<NaiveDate>, Option<String>, Option<String>, Option<String>,
                        Option<String>, Option<String>, Option<String>);
        let heads: Vec<HeadRow> = query.load(&mut conn)?;

        let mut overviews = Vec::with_capacity(heads.len());
        for (id, name, start_date, end_date, objective, kind, description, client_name, instructor_name, plan_name) in
            heads
        {
            let lines: Vec<(i64, String, Option<String>, String, String, Option<String>, Option<i32>, i32,
                  Option<String>)> = workout_exercises::table
                .inner_join(exercises::table)
                .filter(workout_exercises::workout_id.eq(id))
                .order((workout_exercises::position.asc(), workout_exercises::id.asc()))
                .select((workout_exercises::id,
                         exercises::name,
                         exercises::muscle_group,
                         workout_exercises::sets,
                         workout_exercises::reps,
                         workout_exercises::load,
                         workout_exercises::rest_seconds,
                         workout_exercises::position,
                         workout_exercises::notes))
                .load(&mut conn)?;
            let exercises_rows =
                lines.into_iter()
                     .map(|(link_id, exercise_name, muscle_group, sets, reps, load, rest_seconds, position, notes)| {
                         WorkoutExerciseRow { link_id,
                                              exercise_name,
                                              muscle_group,
                                              sets,
                                              reps,
                                              load,
                                              rest_seconds,
                                              position: position as u32,
                                              notes }
                     })
                     .collect();
            overviews.push(WorkoutOverview { id,
                                             name,
                                             start_date,
                                             end_date,
                                             objective,
                                             kind,
                                             description,
                                             client_name,
                                             instructor_name,
                                             plan_name,
                                             exercises: exercises_rows });
        }
        Ok(overviews)
    }
}

impl<P: ConnectionProvider> WorkoutStore for PgWorkoutStore<P> {
    fn create_workout(&mut self, header: &WorkoutHeader) -> Option<WorkoutId> {
        match self.try_create_workout(header) {
            Ok(id) => {
                debug!("create_workout ok id={id} name={}", header.name());
                Some(id)
            }
            Err(e) => {
                error!("create_workout falló: {e}");
                None
            }
        }
    }

    fn create_workout_exercise_link(&mut self, workout_id: WorkoutId, entry: &StagedExerciseEntry)
                                    -> Option<LinkId> {
        match self.try_create_link(workout_id, entry) {
            Ok(id) => {
                debug!("create_link ok id={id} workout={workout_id} position={}", entry.order());
                Some(id)
            }
            Err(e) => {
                error!("create_workout_exercise_link falló (workout={workout_id}, exercise={}): {e}",
                       entry.exercise_id());
                None
            }
        }
    }

    fn list_exercises_for_selection(&self) -> Vec<ExerciseOption> {
        match self.try_exercise_options() {
            Ok(options) => options,
            Err(e) => {
                // mismo contrato que el resto del puerto: sin excepción hacia
                // el asistente, lista vacía y error al log
                error!("list_exercises_for_selection falló: {e}");
                Vec::new()
            }
        }
    }
}

/// Construye un pool Postgres r2d2 y ejecuta las migraciones pendientes en el
/// primer checkout. Ajusta tamaños inválidos (`0`, o `min > max`).
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = if min_size == 0 { 1 } else { min_size };
    let validated_max = if max_size == 0 { 1 } else { max_size };
    if validated_min > validated_max {
        warn!("min_size > max_size ({validated_min} > {validated_max}), ajustando min=max");
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee la configuración y construye un
/// pool ya migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env();
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}

//! gym-persistence
//!
//! Implementación Postgres (Diesel) del colaborador de almacenamiento que
//! exige `gym-core`, más las operaciones de alta/consulta por entidad que el
//! back office usa fuera del asistente (clientes, instructores, planes,
//! ejercicios, pagos, listados de workouts).
//!
//! Módulos:
//! - `pg`: pool r2d2, proveedor de conexiones y `PgWorkoutStore`.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::init_dotenv;
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, ConnectionProvider, PgPool, PgWorkoutStore, PoolProvider};

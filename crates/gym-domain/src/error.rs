use thiserror::Error;

/// Error del dominio de academia. Las operaciones de validación devuelven
/// siempre esta variante; los formularios la muestran tal cual al usuario.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    ValidationError(String),
}

//! Service errors

use crate::infrastructure::entities::UnknownMarkingStatus;
use crate::infrastructure::error::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("the {0} repository is required for this operation")]
    MissingRepository(&'static str),
    #[error("cannot extend a subscription by {0} days")]
    InvalidDuration(i64),
    #[error("cannot resolve the scenario for {0}")]
    UnresolvedScenario(String),
    #[error(transparent)]
    InvalidMarkingStatus(#[from] UnknownMarkingStatus),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        ServiceError::Store(StoreError::Database(error))
    }
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }
}

/// Unwraps an optional collaborator, failing with [`ServiceError::MissingRepository`].
pub(crate) fn required<'a, T>(repo: &'a Option<T>, name: &'static str) -> Result<&'a T, ServiceError> {
    repo.as_ref().ok_or(ServiceError::MissingRepository(name))
}

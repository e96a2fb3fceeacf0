use axum::http::StatusCode;
use portal::domain::value_objects::field_errors::{FORM_FIELD, FieldErrors};
use thiserror::Error;

/// Failure of a CSR action. Every variant renders as `{field: [message]}`.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{message}")]
    NotFound {
        field: &'static str,
        message: &'static str,
    },

    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

pub type ActionResult<T> = Result<T, ActionError>;

impl ActionError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        ActionError::Validation(FieldErrors::single(field, message))
    }

    pub fn persistence(message: &'static str, source: anyhow::Error) -> Self {
        ActionError::Persistence { message, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ActionError::NotFound { .. } => StatusCode::NOT_FOUND,
            ActionError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ActionError::Validation(errors) => errors.clone(),
            ActionError::NotFound { field, message } => FieldErrors::single(*field, *message),
            ActionError::Persistence { message, .. } => FieldErrors::single(FORM_FIELD, *message),
        }
    }
}

impl From<FieldErrors> for ActionError {
    fn from(value: FieldErrors) -> Self {
        ActionError::Validation(value)
    }
}

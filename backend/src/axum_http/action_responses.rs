use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portal::domain::value_objects::field_errors::{FORM_FIELD, FieldErrors};
use serde::Serialize;

use crate::usecases::action_errors::{ActionError, ActionResult};

#[derive(Debug, Serialize)]
struct ActionSuccess<T: Serialize> {
    success: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ActionFailure {
    success: bool,
    errors: FieldErrors,
}

/// Renders an action outcome as `{success, data}` or `{success, errors}`.
pub fn action_response<T: Serialize>(result: ActionResult<T>, success_status: StatusCode) -> Response {
    match result {
        Ok(data) => (
            success_status,
            Json(ActionSuccess {
                success: true,
                data,
            }),
        )
            .into_response(),
        Err(err) => (
            err.status_code(),
            Json(ActionFailure {
                success: false,
                errors: err.field_errors(),
            }),
        )
            .into_response(),
    }
}

/// Extractor rejections that action endpoints render as a form error.
pub trait ActionRejection {
    fn message(&self) -> String;
}

impl ActionRejection for JsonRejection {
    fn message(&self) -> String {
        self.body_text()
    }
}

impl ActionRejection for PathRejection {
    fn message(&self) -> String {
        self.body_text()
    }
}

/// Unreadable request bodies and path ids fail like any other form submission.
pub fn rejected_body(rejection: impl ActionRejection) -> Response {
    let result: ActionResult<()> = Err(ActionError::field(FORM_FIELD, rejection.message()));
    action_response(result, StatusCode::OK)
}

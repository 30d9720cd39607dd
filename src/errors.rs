use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{error, HttpResponse};
use derive_more::Display;

#[derive(Serialize)]
pub struct EngineErrorModel {
    status: u16,
    message: String,
}

#[derive(Debug, Display)]
pub enum EngineError {
    #[display(fmt = "{}", _0)]
    InternalError(String),
    #[display(fmt = "{}", _0)]
    UnprocessableEntity(String),
    #[display(fmt = "{}", _0)]
    MethodNotAllowed(String),
    #[display(fmt = "{}", _0)]
    NotFound(String),
}

impl error::ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status)
            .json(EngineErrorModel {
                message: self.to_string(),
                status: status.as_u16()
            })
    }
}

// Constraint violations land here too and surface as 500.
impl From<diesel::result::Error> for EngineError {
    fn from(db_err: diesel::result::Error) -> Self {
        EngineError::InternalError(format!("Database error: {}", db_err))
    }
}

impl From<BlockingError> for EngineError {
    fn from(_: BlockingError) -> Self {
        EngineError::InternalError("Blocking task was interrupted before finishing.".to_owned())
    }
}

use actix_web::HttpResponse;
use derive_more::Display;
use serde_json::json;

#[derive(Debug, Display)]
pub enum ServerError {
    DieselError,
    R2D2Error,
    #[display(fmt = "'{}' is not a known expiry selection", _0)]
    InvalidExpirySelection(String),
    #[display(fmt = "{}", _0)]
    UserError(&'static str),
    #[display(fmt = "note '{}' was not found or has already been deleted", _0)]
    NotFound(String),
}

impl From<r2d2::Error> for ServerError {
    fn from(_: r2d2::Error) -> ServerError {
        ServerError::R2D2Error
    }
}

impl From<diesel::result::Error> for ServerError {
    fn from(_: diesel::result::Error) -> ServerError {
        ServerError::DieselError
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServerError::DieselError => {
                HttpResponse::InternalServerError().body("Library Error: Diesel Error.")
            }
            ServerError::R2D2Error => {
                HttpResponse::InternalServerError().body("Server Error: Pooling Error.")
            }
            ServerError::InvalidExpirySelection(_) | ServerError::UserError(_) => {
                HttpResponse::BadRequest().json(json!({ "error": self.to_string() }))
            }
            ServerError::NotFound(_) => {
                HttpResponse::NotFound().json(json!({ "error": self.to_string() }))
            }
        }
    }
}

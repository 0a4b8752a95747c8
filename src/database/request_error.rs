use log::{error, warn};
use rocket::{
    http::Status,
    response::{self, Responder},
    serde::{json::Json, Deserialize, Serialize},
    Request,
};
use thiserror::Error;

use super::{ScoreId, StoreError};

/// Every way a request can fail, and the status each one maps to.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("no score with id {id}")]
    NoSuchScore { id: ScoreId },
    #[error("not found: {path}")]
    NoSuchRoute { path: String },
}

impl RequestError {
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::UnprocessableEntity,
            Self::Storage(_) => Status::InternalServerError,
            Self::NoSuchScore { .. } | Self::NoSuchRoute { .. } => Status::NotFound,
        }
    }
}

impl<'r> From<rocket::serde::json::Error<'r>> for RequestError {
    fn from(error: rocket::serde::json::Error<'r>) -> Self {
        use rocket::serde::json::Error;

        match error {
            Error::Parse(_, error) => Self::Validation(error.to_string()),
            Error::Io(error) => Self::Validation(format!("failed to read request body: {}", error)),
        }
    }
}

/// Body of every error response.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct ErrorDetail {
    pub detail: String,
}

impl<'r> Responder<'r, 'static> for RequestError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status.code >= 500 {
            error!("{} {} failed: {}", request.method(), request.uri(), self);
        } else {
            warn!("{} {} rejected: {}", request.method(), request.uri(), self);
        }

        let body = Json(ErrorDetail {
            detail: self.to_string(),
        });
        (status, body).respond_to(request)
    }
}

pub type RequestResult<T, E = RequestError> = std::result::Result<T, E>;

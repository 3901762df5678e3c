use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind};
use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    /// Rejection for a request that carries no usable session key.
    pub(crate) fn unauthenticated() -> Self {
        Self(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Unauthenticated,
            )),
        })
    }

    fn status_code(&self) -> StatusCode {
        let DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)) =
            &self.0.error_kind;

        match entity_error_kind {
            EntityErrorKind::NotFound => StatusCode::NOT_FOUND,
            EntityErrorKind::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
            EntityErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            EntityErrorKind::Conflict => StatusCode::CONFLICT,
            EntityErrorKind::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            debug!("Request rejected with {status}: {self}");
        }

        let reason = status.canonical_reason().unwrap_or("ERROR").to_uppercase();
        (status, reason).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

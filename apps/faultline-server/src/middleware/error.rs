//! Error handling - RFC 7807 responses and the application error taxonomy.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use faultline_core::domain::{SourceLocation, StackFrame, TypeHierarchy};
use faultline_shared::ErrorResponse;

use crate::observability::Reportable;

/// Root of the application error taxonomy.
pub const APP_ERROR: &str = "AppError";
/// Parent of every error that carries its own HTTP status.
pub const HTTP_ERROR: &str = "HttpError";

/// What went wrong.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    ServiceUnavailable(String),

    /// A failure that is not an HTTP-level condition.
    #[error("{0}")]
    Runtime(String),
}

impl ErrorKind {
    fn type_name(&self) -> &'static str {
        match self {
            ErrorKind::NotFound(_) => "NotFound",
            ErrorKind::BadRequest(_) => "BadRequest",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::ServiceUnavailable(_) => "ServiceUnavailable",
            ErrorKind::Runtime(_) => "RuntimeFailure",
        }
    }

    fn http_status(&self) -> Option<StatusCode> {
        match self {
            ErrorKind::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ErrorKind::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            ErrorKind::Forbidden => Some(StatusCode::FORBIDDEN),
            ErrorKind::ServiceUnavailable(_) => Some(StatusCode::SERVICE_UNAVAILABLE),
            ErrorKind::Runtime(_) => None,
        }
    }
}

/// Application-level error type that converts to RFC 7807 responses.
///
/// Remembers where it was raised so unhandled errors can be reported with
/// their origin and call stack.
#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    origin: &'static Location<'static>,
    backtrace: Backtrace,
}

impl AppError {
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            origin: Location::caller(),
            // Captured whatever RUST_BACKTRACE says; symbols resolve only
            // when the frames are read.
            backtrace: Backtrace::force_capture(),
        }
    }

    #[track_caller]
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound(detail.into()))
    }

    #[track_caller]
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest(detail.into()))
    }

    #[track_caller]
    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden)
    }

    #[track_caller]
    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable(detail.into()))
    }

    #[track_caller]
    pub fn runtime(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime(detail.into()))
    }

    /// Register the application error types and their parents.
    pub fn register_types(hierarchy: &mut TypeHierarchy) {
        hierarchy.register(HTTP_ERROR, APP_ERROR);
        for http in [
            "NotFound",
            "BadRequest",
            "Forbidden",
            "ServiceUnavailable",
        ] {
            hierarchy.register(http, HTTP_ERROR);
        }
        hierarchy.register("RuntimeFailure", APP_ERROR);
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for AppError {}

impl Reportable for AppError {
    fn type_name(&self) -> &str {
        self.kind.type_name()
    }

    fn status_code(&self) -> Option<u16> {
        self.kind.http_status().map(|status| status.as_u16())
    }

    fn origin(&self) -> SourceLocation {
        SourceLocation::from(self.origin)
    }

    fn stack_frames(&self) -> Vec<StackFrame> {
        StackFrame::from_backtrace(&self.backtrace)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.kind
            .http_status()
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let error = match &self.kind {
            ErrorKind::NotFound(detail) => ErrorResponse::not_found(detail),
            ErrorKind::BadRequest(detail) => ErrorResponse::bad_request(detail),
            ErrorKind::Forbidden => ErrorResponse::new(403, "Forbidden"),
            ErrorKind::ServiceUnavailable(detail) => ErrorResponse::service_unavailable(detail),
            ErrorKind::Runtime(detail) => {
                // Log internal errors
                tracing::error!(origin = %self.origin, "Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(ResponseError::status_code(self)).json(error)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

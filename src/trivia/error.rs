use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::error::{FieldError, StoreError};

/// Failures of the trivia API, rendered as `{success: false, error, message}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("resource not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("unprocessable: {message}")]
    Unprocessable {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self::Unprocessable {
            message: "unprocessable".to_string(),
            errors,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

fn error_response(status: StatusCode, message: &str, errors: Vec<FieldError>) -> Response {
    let body = ErrorBody {
        success: false,
        error: status.as_u16(),
        message: message.to_string(),
        errors,
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(detail) => {
                warn!("Rejected request body: {}", detail);
                error_response(StatusCode::BAD_REQUEST, "bad request", Vec::new())
            }
            ApiError::NotFound | ApiError::Store(StoreError::NotFound { .. }) => {
                error_response(StatusCode::NOT_FOUND, "resource not found", Vec::new())
            }
            ApiError::MethodNotAllowed => {
                error_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed", Vec::new())
            }
            ApiError::Unprocessable { message, errors } => {
                warn!("Unprocessable request: {}", message);
                error_response(StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", errors)
            }
            ApiError::Store(StoreError::Validation(errors)) => {
                error_response(StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", errors)
            }
            ApiError::Store(err) if err.is_unavailable() => {
                error!("Database unavailable: {}", err);
                error_response(StatusCode::SERVICE_UNAVAILABLE, "service unavailable", Vec::new())
            }
            ApiError::Store(err) => {
                error!("Trivia request failed: {}", err);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error",
                    Vec::new(),
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(err) => ApiError::BadRequest(err.body_text()),
            JsonRejection::JsonDataError(err) => ApiError::unprocessable(err.body_text()),
            JsonRejection::MissingJsonContentType(err) => ApiError::unprocessable(err.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// `Json` extractor whose rejections use the API error envelope
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                debug!("Unusable path parameter: {}", err.body_text());
                ApiError::NotFound
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// `Path` extractor whose rejections use the API error envelope.
/// A parameter that does not parse names no resource, so it is a 404.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// A request payload that failed validation before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{field} is already registered")]
    Conflict { field: &'static str },

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::Validation(v) => ErrorDetail {
                kind: "validation_error".into(),
                message: v.message.clone(),
                field: Some(v.field.clone()),
            },
            AppError::Conflict { field } => ErrorDetail {
                kind: "conflict".into(),
                message: self.to_string(),
                field: Some((*field).into()),
            },
            AppError::InvalidCredentials => ErrorDetail {
                kind: "invalid_credentials".into(),
                message: self.to_string(),
                field: None,
            },
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                ErrorDetail {
                    kind: "internal_error".into(),
                    message: "internal server error".into(),
                    field: None,
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.detail(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let v = AppError::from(ValidationError::new("email", "email is required"));
        assert_eq!(v.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Conflict { field: "email" }.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_hides_cause() {
        let detail = AppError::Internal(anyhow::anyhow!("disk on fire")).detail();
        assert_eq!(detail.kind, "internal_error");
        assert!(!detail.message.contains("disk"));
    }

    #[test]
    fn conflict_detail_names_field() {
        let json = serde_json::to_value(ErrorResponse {
            error: AppError::Conflict {
                field: "phone_number",
            }
            .detail(),
        })
        .unwrap();
        assert_eq!(json["error"]["type"], "conflict");
        assert_eq!(json["error"]["field"], "phone_number");
        assert_eq!(
            json["error"]["message"],
            "phone_number is already registered"
        );
    }
}

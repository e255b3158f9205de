use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::{error::AppError, extractors::Format, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct Greeting {
    pub message: String,
}

/// Welcome page, or a JSON greeting.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome page or greeting", body = Greeting))
)]
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, format: Format) -> Result<Response, AppError> {
    match format {
        Format::Json => Ok(Json(Greeting {
            message: format!("Welcome to {}", state.config.app_name),
        })
        .into_response()),
        Format::Html => {
            let mut ctx = tera::Context::new();
            ctx.insert("swagger_enabled", &state.config.swagger_enabled);
            Ok(Html(state.templates.render("home.html", &ctx)?).into_response())
        }
    }
}

pub async fn health() -> &'static str {
    "ok"
}

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    error::{AppError, ErrorDetail, ErrorResponse},
    routes::home,
    state::AppState,
    users::{
        dto::{LoginForm, LoginResponse, RegisterForm},
        handlers, User,
    },
};

pub const SPEC_PATH: &str = "/static/swagger.json";
pub const UI_PATH: &str = "/swagger";

#[derive(OpenApi)]
#[openapi(
    info(description = "User registration, credential check and listing"),
    paths(
        home::home,
        handlers::register_submit,
        handlers::create_user,
        handlers::login_submit,
        handlers::list_users,
    ),
    components(schemas(
        User,
        RegisterForm,
        LoginForm,
        LoginResponse,
        home::Greeting,
        ErrorResponse,
        ErrorDetail,
    ))
)]
pub struct ApiDoc;

pub fn docs_routes() -> Router<AppState> {
    Router::new()
        .route(SPEC_PATH, get(openapi_json))
        .route(UI_PATH, get(swagger_ui))
}

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

pub async fn swagger_ui(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let mut ctx = tera::Context::new();
    ctx.insert("spec_url", SPEC_PATH);
    Ok(Html(state.templates.render("swagger.html", &ctx)?))
}

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::AppError,
    extractors::{Format, ValidatedForm},
    state::AppState,
    users::{
        dto::{LoginForm, LoginResponse, RegisterForm},
        repo_types::User,
        services::{authenticate, register_user},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register_submit))
        .route("/login", get(login_page).post(login_submit))
        .route("/user", get(list_users).post(create_user))
}

#[instrument(skip(state))]
pub async fn register_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.templates.render_simple("register.html")?))
}

/// Registration form again, with the error and the non-secret fields filled in.
fn register_form_with_error(
    state: &AppState,
    err: &AppError,
    form: &RegisterForm,
) -> Result<Response, AppError> {
    let mut ctx = tera::Context::new();
    ctx.insert("error", &err.to_string());
    ctx.insert("username", &form.username);
    ctx.insert("email", &form.email);
    ctx.insert("phone_number", &form.phone_number);
    let html = state.templates.render("register.html", &ctx)?;
    Ok((err.status(), Html(html)).into_response())
}

fn login_form_with_error(
    state: &AppState,
    err: &AppError,
    form: &LoginForm,
) -> Result<Response, AppError> {
    let mut ctx = tera::Context::new();
    ctx.insert("error", &err.to_string());
    ctx.insert("email", &form.email);
    let html = state.templates.render("login.html", &ctx)?;
    Ok((err.status(), Html(html)).into_response())
}

/// Browser registration: redirects to the login page on success.
#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered; redirect to /login"),
        (status = 201, description = "Registered (JSON clients)", body = User),
        (status = 400, description = "Malformed body, missing or oversized field", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or phone number already registered", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip(state, form))]
pub async fn register_submit(
    State(state): State<AppState>,
    format: Format,
    form: Result<ValidatedForm<RegisterForm>, AppError>,
) -> Result<Response, AppError> {
    let form = match (form, format) {
        (Ok(ValidatedForm(form)), _) => form,
        (Err(e @ AppError::Validation(_)), Format::Html) => {
            return register_form_with_error(&state, &e, &RegisterForm::default());
        }
        (Err(e), _) => return Err(e),
    };

    match (register_user(&state.db, &form).await, format) {
        (Ok(user), Format::Json) => Ok((StatusCode::CREATED, Json(user)).into_response()),
        (Ok(_), Format::Html) => Ok(Redirect::to("/login").into_response()),
        (Err(e @ (AppError::Validation(_) | AppError::Conflict { .. })), Format::Html) => {
            register_form_with_error(&state, &e, &form)
        }
        (Err(e), _) => Err(e),
    }
}

/// API registration: always answers with the created record.
#[utoipa::path(
    post,
    path = "/user",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Created user", body = User),
        (status = 400, description = "Malformed body, missing or oversized field", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or phone number already registered", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip(state, form))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<RegisterForm>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = register_user(&state.db, &form).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.templates.render_simple("login.html")?))
}

/// Credential check. No session is created; success only redirects.
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Valid credentials; redirect to /user"),
        (status = 200, description = "Valid credentials (JSON clients)", body = LoginResponse),
        (status = 400, description = "Malformed body or missing field", body = crate::error::ErrorResponse),
        (status = 401, description = "Unknown email or wrong password", body = crate::error::ErrorResponse),
    )
)]
#[instrument(skip(state, form))]
pub async fn login_submit(
    State(state): State<AppState>,
    format: Format,
    form: Result<ValidatedForm<LoginForm>, AppError>,
) -> Result<Response, AppError> {
    let form = match (form, format) {
        (Ok(ValidatedForm(form)), _) => form,
        (Err(e @ AppError::Validation(_)), Format::Html) => {
            return login_form_with_error(&state, &e, &LoginForm::default());
        }
        (Err(e), _) => return Err(e),
    };

    match (authenticate(&state.db, &form).await, format) {
        (Ok(user), Format::Json) => Ok(Json(LoginResponse {
            authenticated: true,
            user_id: user.user_id,
        })
        .into_response()),
        (Ok(_), Format::Html) => Ok(Redirect::to("/user").into_response()),
        (Err(e @ (AppError::Validation(_) | AppError::InvalidCredentials)), Format::Html) => {
            login_form_with_error(&state, &e, &form)
        }
        (Err(e), _) => Err(e),
    }
}

/// Every stored user, password digests included.
#[utoipa::path(
    get,
    path = "/user",
    responses(
        (status = 200, description = "All users (HTML table, or JSON with Accept: application/json)", body = [User]),
    )
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    format: Format,
) -> Result<Response, AppError> {
    let users = User::list_all(&state.db).await?;
    match format {
        Format::Json => Ok(Json(users).into_response()),
        Format::Html => {
            let mut ctx = tera::Context::new();
            ctx.insert("users", &users);
            Ok(Html(state.templates.render("users.html", &ctx)?).into_response())
        }
    }
}

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::users::{
    dto::{LoginForm, RegisterForm},
    password::{hash_password, verify_password},
    repo::NewUser,
    repo_types::User,
};

/// Validate the form, hash the password and persist the user.
pub async fn register_user(db: &SqlitePool, form: &RegisterForm) -> Result<User, AppError> {
    form.validate()?;

    let hash = hash_password(&form.password)?;
    let user = User::create(
        db,
        NewUser {
            user_name: &form.username,
            email: &form.email,
            password_hash: &hash,
            phone_number: &form.phone_number,
        },
    )
    .await
    .inspect_err(|e| {
        if let AppError::Conflict { field } = e {
            warn!(field, "registration rejected: duplicate");
        }
    })?;

    info!(user_id = user.user_id, "user registered");
    Ok(user)
}

/// Check credentials. Unknown email and wrong password both yield
/// `AppError::InvalidCredentials`.
pub async fn authenticate(db: &SqlitePool, form: &LoginForm) -> Result<User, AppError> {
    form.validate()?;

    let Some(user) = User::find_by_email(db, &form.email).await? else {
        debug!("login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&form.password, &user.password)? {
        debug!(user_id = user.user_id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = user.user_id, "user logged in");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    fn alice() -> RegisterForm {
        RegisterForm {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "secret1".into(),
            phone_number: "111".into(),
        }
    }

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_stores_hashed_password() {
        let state = AppState::in_memory().await.unwrap();
        let user = register_user(&state.db, &alice()).await.unwrap();
        assert_eq!(user.user_name, "alice");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.phone_number, "111");
        assert_ne!(user.password, "secret1");
        assert!(verify_password("secret1", &user.password).unwrap());
    }

    #[tokio::test]
    async fn register_rejects_invalid_form_before_storage() {
        let state = AppState::in_memory().await.unwrap();
        let form = RegisterForm {
            email: String::new(),
            ..alice()
        };
        let err = register_user(&state.db, &form).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref v) if v.field == "email"));
        assert_eq!(User::count(&state.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn authenticate_outcomes() {
        let state = AppState::in_memory().await.unwrap();
        let created = register_user(&state.db, &alice()).await.unwrap();

        let ok = authenticate(&state.db, &login("a@x.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(ok.user_id, created.user_id);

        let wrong = authenticate(&state.db, &login("a@x.com", "nope"))
            .await
            .unwrap_err();
        let unknown = authenticate(&state.db, &login("z@x.com", "secret1"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }
}

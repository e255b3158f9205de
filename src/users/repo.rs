use crate::error::AppError;
use crate::users::repo_types::User;
use sqlx::SqlitePool;

/// Fields of a user about to be inserted; `password_hash` is already hashed.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub user_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone_number: &'a str,
}

impl User {
    /// Insert a new user. A taken email or phone number yields `AppError::Conflict`.
    pub async fn create(db: &SqlitePool, new: NewUser<'_>) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "user" (UserName, email, password, phone_number)
            VALUES (?, ?, ?, ?)
            RETURNING UserID, UserName, email, password, phone_number
            "#,
        )
        .bind(new.user_name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.phone_number)
        .fetch_one(db)
        .await;
        match user {
            Ok(user) => Ok(user),
            Err(e) => Err(map_unique_violation(db, &new, e).await),
        }
    }

    /// Find a user by email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT UserID, UserName, email, password, phone_number
            FROM "user"
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn list_all(db: &SqlitePool) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT UserID, UserName, email, password, phone_number
            FROM "user"
            ORDER BY UserID
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    #[cfg(test)]
    pub(crate) async fn count(db: &SqlitePool) -> Result<i64, AppError> {
        let n = sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM "user""#)
            .fetch_one(db)
            .await?;
        Ok(n)
    }
}

/// Name the unique column a failed insert collided with.
///
/// SQLite reports a single column, e.g. "UNIQUE constraint failed:
/// user.phone_number", and picks the later index when both email and phone
/// are taken. Email wins in that case, so the answer doesn't depend on
/// index order.
async fn conflicting_field(db: &SqlitePool, new: &NewUser<'_>, reported_email: bool) -> &'static str {
    if reported_email {
        return "email";
    }
    match User::find_by_email(db, new.email).await {
        Ok(Some(_)) => "email",
        _ => "phone_number",
    }
}

async fn map_unique_violation(db: &SqlitePool, new: &NewUser<'_>, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let reported_email = db_err.message().contains("user.email");
            let field = conflicting_field(db, new, reported_email).await;
            return AppError::Conflict { field };
        }
    }
    AppError::Database(err)
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Row of the `user` table. Field names on the wire keep the column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    #[serde(rename = "UserID")]
    #[sqlx(rename = "UserID")]
    pub user_id: i64, // assigned by storage, never reused
    #[serde(rename = "UserName")]
    #[sqlx(rename = "UserName")]
    pub user_name: String,
    pub email: String,
    pub password: String, // argon2 PHC string
    pub phone_number: String,
}

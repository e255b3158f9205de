use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

/// Open (creating if needed) the SQLite database behind `url`.
pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("parse database url {url}"))?
        .create_if_missing(true);

    // an in-memory database lives only as long as its connection
    let pool = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
    };

    pool.context("connect to database")
}

pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

/// Stored `CREATE TABLE` statement for `table`, if it exists.
pub async fn table_schema(db: &SqlitePool, table: &str) -> anyhow::Result<Option<String>> {
    let sql = sqlx::query_scalar::<_, String>(
        r#"
        SELECT sql
        FROM sqlite_master
        WHERE type = 'table' AND name = ?
        "#,
    )
    .bind(table)
    .fetch_optional(db)
    .await
    .with_context(|| format!("read schema of table {table}"))?;
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_user_table_with_unique_keys() {
        let db = connect("sqlite::memory:").await.expect("memory db");
        migrate(&db).await.expect("migrate");

        let schema = table_schema(&db, "user")
            .await
            .expect("query schema")
            .expect("user table exists");
        assert!(schema.contains("UserID INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(schema.contains("email VARCHAR(200) UNIQUE"));
        assert!(schema.contains("phone_number VARCHAR(20) UNIQUE"));
    }

    #[tokio::test]
    async fn table_schema_is_none_for_unknown_table() {
        let db = connect("sqlite::memory:").await.expect("memory db");
        assert!(table_schema(&db, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn migrate_is_idempotent() {
        let db = connect("sqlite::memory:").await.expect("memory db");
        migrate(&db).await.expect("first run");
        migrate(&db).await.expect("second run");
    }
}

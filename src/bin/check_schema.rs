//! Prints the stored `CREATE TABLE` statement of the `user` table.

use anyhow::Context;
use roster::{config::AppConfig, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
        .init();

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config.database_url).await?;
    let schema = db::table_schema(&pool, "user")
        .await?
        .with_context(|| format!("no `user` table in {}", config.database_url))?;

    println!("{schema}");
    pool.close().await;
    Ok(())
}

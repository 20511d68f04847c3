use anyhow::Result;

use crate::shared::data::db::{ensure_table, get_connection};

/// Bootstrap the system tables (users, refresh tokens, settings).
///
/// Runs after `initialize_database`, so the connection is already open.
/// Existing tables are left untouched.
pub async fn initialize_system_tables() -> Result<()> {
    let conn = get_connection();

    ensure_table(
        conn,
        "sys_users",
        r#"
            CREATE TABLE sys_users (
                id TEXT PRIMARY KEY NOT NULL,
                email TEXT NOT NULL UNIQUE,
                name TEXT,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                last_login_at TEXT
            );
        "#,
    )
    .await?;

    ensure_table(
        conn,
        "sys_refresh_tokens",
        r#"
            CREATE TABLE sys_refresh_tokens (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL,
                token_hash TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                created_at TEXT NOT NULL,
                revoked_at TEXT
            );
        "#,
    )
    .await?;

    ensure_table(
        conn,
        "sys_settings",
        r#"
            CREATE TABLE sys_settings (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#,
    )
    .await?;

    tracing::info!("System tables ready");

    Ok(())
}

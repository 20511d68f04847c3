use anyhow::{Context, Result};
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

fn row_to_user(row: &sea_orm::QueryResult) -> Result<User> {
    Ok(User {
        id: row.try_get("", "id")?,
        email: row.try_get("", "email")?,
        name: row.try_get("", "name")?,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
    })
}

/// Create user with password hash
pub async fn create_with_password(user: &User, password_hash: &str) -> Result<()> {
    use crate::shared::data::db::get_connection;

    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_users (id, email, name, password_hash, created_at, updated_at, last_login_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        [
            user.id.clone().into(),
            user.email.clone().into(),
            user.name.clone().into(),
            password_hash.to_string().into(),
            user.created_at.clone().into(),
            user.updated_at.clone().into(),
            user.last_login_at.clone().into(),
        ],
    ))
    .await
    .context("Failed to insert user")?;

    Ok(())
}

/// Get user by ID
pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    use crate::shared::data::db::get_connection;

    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, email, name, created_at, updated_at, last_login_at
             FROM sys_users WHERE id = ?",
            [id.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row_to_user(&row)?)),
        None => Ok(None),
    }
}

/// Get user by email (emails are stored lowercase)
pub async fn get_by_email(email: &str) -> Result<Option<User>> {
    use crate::shared::data::db::get_connection;

    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT id, email, name, created_at, updated_at, last_login_at
             FROM sys_users WHERE email = ?",
            [email.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row_to_user(&row)?)),
        None => Ok(None),
    }
}

/// Get password hash for user
pub async fn get_password_hash(user_id: &str) -> Result<Option<String>> {
    use crate::shared::data::db::get_connection;

    let conn = get_connection();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match result {
        Some(row) => {
            let hash: String = row.try_get("", "password_hash")?;
            Ok(Some(hash))
        }
        None => Ok(None),
    }
}

/// Update last login timestamp
pub async fn update_last_login(id: &str) -> Result<()> {
    use crate::shared::data::db::get_connection;

    let now = chrono::Utc::now().to_rfc3339();
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
        [now.into(), id.to_string().into()],
    ))
    .await
    .context("Failed to update last login")?;

    Ok(())
}

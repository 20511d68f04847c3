use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Open the SQLite database and bootstrap the business tables.
///
/// Bootstrap is first-run only: each table is created if it is missing in
/// `sqlite_master` and left untouched otherwise.
pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    ensure_table(
        &conn,
        "a001_form",
        r#"
            CREATE TABLE a001_form (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                fields TEXT NOT NULL DEFAULT '[]',
                settings TEXT NOT NULL DEFAULT '{}',
                google_sheet_id TEXT,
                google_sheet_name TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#,
    )
    .await?;

    ensure_table(
        &conn,
        "a002_response",
        r#"
            CREATE TABLE a002_response (
                id TEXT PRIMARY KEY NOT NULL,
                form_id TEXT NOT NULL,
                data TEXT NOT NULL DEFAULT '{}',
                submitted_at TEXT NOT NULL
            );
        "#,
    )
    .await?;

    // Responses are always read per form
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "CREATE INDEX IF NOT EXISTS idx_a002_response_form_id ON a002_response (form_id);"
            .to_string(),
    ))
    .await?;

    ensure_table(
        &conn,
        "a003_template",
        r#"
            CREATE TABLE a003_template (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                fields TEXT NOT NULL DEFAULT '[]',
                settings TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#,
    )
    .await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub(crate) async fn ensure_table(
    conn: &DatabaseConnection,
    name: &str,
    create_sql: &str,
) -> anyhow::Result<()> {
    let check = format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
        name
    );
    let existing = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, check))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", name);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_sql.to_string(),
        ))
        .await?;
    }

    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

use std::str::FromStr;

use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Arguments, FromRow, SqlitePool};

use crate::core::config::DatabaseConfig;

/// DDL executed on every connect. Every statement is idempotent.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active', 'inactive')),
    createdAt TEXT NOT NULL,
    updatedAt TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_resources_category ON resources(category);
CREATE INDEX IF NOT EXISTS idx_resources_status ON resources(status);
CREATE INDEX IF NOT EXISTS idx_resources_created_at ON resources(createdAt);
"#;

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

/// Outcome of a mutating statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub last_insert_id: i64,
    pub changes: u64,
}

/// Handle to the embedded database.
///
/// Backed by a single-connection pool: SQLite serializes writes anyway, and an
/// in-memory database only exists inside the connection that created it.
/// Cloning is cheap and shares the connection.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    path: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let database = Self {
            pool,
            path: config.path.clone(),
        };
        database.init_schema().await?;

        tracing::info!("Connected to SQLite database at {}", database.path);
        Ok(database)
    }

    async fn init_schema(&self) -> Result<(), sqlx::Error> {
        // sqlx::query runs a single statement at a time
        for stmt in SCHEMA.split(';') {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        tracing::debug!("Resources table created or already exists");
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Execute a mutating statement.
    pub async fn run(&self, sql: &str, params: Vec<SqlValue>) -> Result<RunResult, sqlx::Error> {
        let result = sqlx::query_with(sql, bind_params(params)?)
            .execute(&self.pool)
            .await?;

        Ok(RunResult {
            last_insert_id: result.last_insert_rowid(),
            changes: result.rows_affected(),
        })
    }

    /// Fetch at most one row.
    pub async fn get<T>(&self, sql: &str, params: Vec<SqlValue>) -> Result<Option<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        sqlx::query_as_with::<_, T, _>(sql, bind_params(params)?)
            .fetch_optional(&self.pool)
            .await
    }

    /// Fetch every matching row.
    pub async fn all<T>(&self, sql: &str, params: Vec<SqlValue>) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        sqlx::query_as_with::<_, T, _>(sql, bind_params(params)?)
            .fetch_all(&self.pool)
            .await
    }

    /// Close the connection. Calling it twice is harmless.
    pub async fn close(&self) {
        if self.is_closed() {
            return;
        }
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn bind_params<'q>(params: Vec<SqlValue>) -> Result<SqliteArguments<'q>, sqlx::Error> {
    let mut args = SqliteArguments::default();
    for param in params {
        let added = match param {
            SqlValue::Text(value) => args.add(value),
            SqlValue::Integer(value) => args.add(value),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    async fn memory_db() -> Database {
        Database::connect(&DatabaseConfig::in_memory())
            .await
            .expect("failed to open in-memory database")
    }

    fn temp_db_config(label: &str) -> DatabaseConfig {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "resource-service-{}-{}-{}.sqlite",
            label,
            std::process::id(),
            nanos
        ));
        DatabaseConfig {
            path: path.display().to_string(),
        }
    }

    #[tokio::test]
    async fn test_connect_creates_resources_table() {
        let db = memory_db().await;

        let table: Option<(String,)> = db
            .get(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
                vec!["resources".into()],
            )
            .await
            .unwrap();

        assert_eq!(table.map(|t| t.0).as_deref(), Some("resources"));
    }

    #[tokio::test]
    async fn test_run_reports_last_id_and_changes() {
        let db = memory_db().await;
        let insert = "INSERT INTO resources (name, description, category, status, createdAt, updatedAt) \
                      VALUES (?, ?, ?, ?, ?, ?)";

        let first = db
            .run(
                insert,
                vec![
                    "a".into(),
                    "b".into(),
                    "c".into(),
                    "active".into(),
                    "2024-01-01T00:00:00.000000Z".into(),
                    "2024-01-01T00:00:00.000000Z".into(),
                ],
            )
            .await
            .unwrap();
        assert_eq!(first.last_insert_id, 1);
        assert_eq!(first.changes, 1);

        let update = db
            .run(
                "UPDATE resources SET category = ? WHERE id = ?",
                vec!["d".into(), 42_i64.into()],
            )
            .await
            .unwrap();
        assert_eq!(update.changes, 0);
    }

    #[tokio::test]
    async fn test_get_and_all() {
        let db = memory_db().await;
        for name in ["one", "two", "three"] {
            db.run(
                "INSERT INTO resources (name, description, category, createdAt, updatedAt) \
                 VALUES (?, 'desc', 'cat', '2024-01-01T00:00:00.000000Z', '2024-01-01T00:00:00.000000Z')",
                vec![name.into()],
            )
            .await
            .unwrap();
        }

        let missing: Option<(i64,)> = db
            .get("SELECT id FROM resources WHERE id = ?", vec![99_i64.into()])
            .await
            .unwrap();
        assert!(missing.is_none());

        let names: Vec<(String,)> = db
            .all("SELECT name FROM resources ORDER BY id", vec![])
            .await
            .unwrap();
        let names: Vec<String> = names.into_iter().map(|n| n.0).collect();
        assert_eq!(names, vec!["one", "two", "three"]);

        let status: Option<(String,)> = db
            .get("SELECT status FROM resources WHERE id = ?", vec![1_i64.into()])
            .await
            .unwrap();
        assert_eq!(status.unwrap().0, "active");
    }

    #[tokio::test]
    async fn test_status_check_constraint_rejects_unknown_value() {
        let db = memory_db().await;
        let result = db
            .run(
                "INSERT INTO resources (name, description, category, status, createdAt, updatedAt) \
                 VALUES ('n', 'd', 'c', 'archived', 'x', 'x')",
                vec![],
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_reconnect_to_file_keeps_rows() {
        let config = temp_db_config("reconnect");

        let db = Database::connect(&config).await.unwrap();
        db.run(
            "INSERT INTO resources (name, description, category, createdAt, updatedAt) \
             VALUES ('kept', 'd', 'c', 'x', 'x')",
            vec![],
        )
        .await
        .unwrap();
        db.close().await;
        assert!(db.is_closed());

        let reopened = Database::connect(&config).await.unwrap();
        let count: Option<(i64,)> = reopened
            .get("SELECT COUNT(*) FROM resources", vec![])
            .await
            .unwrap();
        assert_eq!(count.unwrap().0, 1);
        reopened.close().await;

        let _ = std::fs::remove_file(&config.path);
    }

    #[tokio::test]
    async fn test_queries_fail_after_close() {
        let db = memory_db().await;
        db.close().await;
        db.close().await;

        let result: Result<Vec<(i64,)>, _> = db.all("SELECT id FROM resources", vec![]).await;
        assert!(result.is_err());
    }
}

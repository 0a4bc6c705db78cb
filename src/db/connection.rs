/// Database connection management with connection pooling
///
/// One pool per process. It is opened at startup, handed to every request
/// and closed on shutdown. Each query checks a connection out for a single
/// statement and gives it back when the future completes or is dropped.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Default number of database connections in the pool
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
    url: String,
}

impl Database {
    /// Open a pool for `url` and make sure the schema exists
    ///
    /// # Arguments
    /// * `url` - SQLite connection string, e.g. `sqlite://followups.db`
    /// * `max_connections` - Upper bound on pooled connections
    ///
    /// # Examples
    /// ```no_run
    /// use followup_tracker_lib::db::Database;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::connect("sqlite://followups.db", 5).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = is_memory_url(url);

        // Configure SQLite options
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .disable_statement_logging();

        // Create parent directory if it doesn't exist
        if !in_memory {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections.max(1));
        if in_memory {
            // An in-memory database lives only as long as some connection holds it
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(options).await?;

        let db = Self {
            pool: Arc::new(pool),
            url: url.to_string(),
        };

        db.initialize_schema().await?;

        tracing::info!(url = %db.url, max_connections, "database ready");

        Ok(db)
    }

    /// Create a test database in memory
    ///
    /// Used for testing. Creates a fresh database for each test.
    #[cfg(test)]
    pub async fn new_test() -> Result<Self> {
        Self::connect("sqlite::memory:", DEFAULT_MAX_CONNECTIONS).await
    }

    /// Initialize database schema
    ///
    /// Creates the followups table and its indexes if they don't exist.
    async fn initialize_schema(&self) -> Result<()> {
        let schema = include_str!("schema.sql");

        // One statement per execute call
        for statement in schema.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(self.pool.as_ref()).await?;
            }
        }

        Ok(())
    }

    /// Get reference to the connection pool
    ///
    /// Used internally by query modules.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool
    ///
    /// Should be called on application shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(url = %self.url, "database closed");
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

//! Database connection pool utilities.

use diesel::RunQueryDsl;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Pooled PostgreSQL connections for the CodeMeter server.
pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Embedded Diesel migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Initialize the database pool using `DATABASE_URL`.
pub fn init_pool() -> DbPool {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set to a PostgreSQL connection string");
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("failed to create database pool");
    run_migrations(&pool);
    pool
}

/// Run pending Diesel migrations.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("failed to fetch database connection");
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .expect("run migrations");
    if !applied.is_empty() {
        log::info!("applied {} database migration(s)", applied.len());
    }
}

/// Whether the database answers a trivial query.
pub fn is_reachable(pool: &DbPool) -> bool {
    let Ok(mut conn) = pool.get() else {
        return false;
    };
    diesel::sql_query("SELECT 1").execute(&mut conn).is_ok()
}

/// Connection customizer that keeps every test connection inside a transaction
/// which is rolled back when the connection closes.
#[cfg(test)]
#[derive(Debug)]
struct RollbackOnClose;

#[cfg(test)]
impl r2d2::CustomizeConnection<PgConnection, r2d2::Error> for RollbackOnClose {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), r2d2::Error> {
        use diesel::Connection;

        conn.begin_test_transaction().map_err(r2d2::Error::QueryError)
    }
}

#[cfg(test)]
/// PostgreSQL access for tests that touch the schema.
///
/// The pool holds a single connection so every checkout shares one uncommitted
/// transaction; nothing a test writes outlives it.
pub(crate) struct TestDatabase {
    database_url: String,
    pool: Option<DbPool>,
}

#[cfg(test)]
impl TestDatabase {
    /// Use `TEST_DATABASE_URL`, falling back to `DATABASE_URL`.
    pub(crate) fn new() -> Self {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("set TEST_DATABASE_URL or DATABASE_URL for PostgreSQL tests");
        Self {
            database_url,
            pool: None,
        }
    }

    /// The database URL in use.
    pub(crate) fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Rolled-back pool with the CodeMeter schema in place.
    pub(crate) fn pool(&mut self) -> DbPool {
        let database_url = &self.database_url;
        self.pool
            .get_or_insert_with(|| {
                let manager = ConnectionManager::<PgConnection>::new(database_url.clone());
                let pool = r2d2::Pool::builder()
                    .max_size(1)
                    .connection_customizer(Box::new(RollbackOnClose))
                    .build(manager)
                    .expect("test pool");
                run_migrations(&pool);
                pool
            })
            .clone()
    }
}

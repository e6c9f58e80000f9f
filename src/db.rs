use std::time::Duration;

use anyhow::Result;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr,
};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

/// Open the shared connection pool.
pub async fn create_orm_conn(database_url: &str, max_connections: u32) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Apply every pending migration.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}

pub async fn ping(conn: &DatabaseConnection) -> bool {
    match conn.ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "database ping failed");
            false
        }
    }
}

/// Finish a transaction according to the outcome of the work done inside it.
///
/// Commits on success. On failure the transaction is rolled back before the
/// original error is handed back; a rollback failure is only logged, since the
/// connection discards the transaction when it is returned to the pool anyway.
pub async fn settle<T>(txn: DatabaseTransaction, outcome: Result<T, DbErr>) -> Result<T, DbErr> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}

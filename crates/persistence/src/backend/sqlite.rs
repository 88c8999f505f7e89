// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connection setup and write locking for the exam database.
//!
//! Every connection is opened with foreign keys on (batch rows cascade with
//! their exam) and a busy timeout, so a writer that finds the database
//! locked by another scheduler waits instead of failing. The exam and
//! reference SQL itself lives in `queries/` and `mutations/`.

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Schema for `reference_entities`, `exams` and `exam_batches`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applied to every new connection, in order.
const CONNECTION_PRAGMAS: [&str; 2] = ["PRAGMA foreign_keys = ON", "PRAGMA busy_timeout = 5000"];

#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

fn execute_pragma(conn: &mut SqliteConnection, pragma: &str) -> Result<(), PersistenceError> {
    debug!(pragma, "Applying connection pragma");
    diesel::sql_query(pragma)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("{pragma}: {e}")))?;
    Ok(())
}

/// Identifier of the exam row inserted last on `conn`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless `ON DELETE CASCADE` on `exam_batches` will actually fire.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyEnforcementNotEnabled` if the
/// connection has foreign keys off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let pragma: ForeignKeysPragma =
        diesel::sql_query("PRAGMA foreign_keys").get_result::<ForeignKeysPragma>(conn)?;

    if pragma.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    debug!("Foreign key enforcement confirmed");
    Ok(())
}

/// Opens `database_url`, applies the connection pragmas and brings the exam
/// schema up to date.
///
/// Migrations are idempotent, so every connection to a shared file may run
/// them.
///
/// # Errors
///
/// Returns an error if the connection, a pragma or a migration fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, "Opening exam database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    for pragma in CONNECTION_PRAGMAS {
        execute_pragma(&mut conn, pragma)?;
    }

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Switches a file database to write-ahead logging, so readers on other
/// connections are not blocked while a scheduler holds the write lock.
///
/// # Errors
///
/// Returns an error if the pragma fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    execute_pragma(conn, "PRAGMA journal_mode = WAL")
}

/// Opens a `BEGIN IMMEDIATE` transaction.
///
/// The write lock is taken before the first read, so no other connection can
/// write between a check and the write that depends on it. Nested Diesel
/// transactions opened afterwards become savepoints.
///
/// # Errors
///
/// Returns an error if the lock cannot be acquired.
pub fn begin_immediate(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    debug!("BEGIN IMMEDIATE");
    AnsiTransactionManager::begin_transaction_sql(conn, "BEGIN IMMEDIATE")?;
    Ok(())
}

/// Commits the transaction opened by [`begin_immediate`].
///
/// # Errors
///
/// Returns an error if the commit fails.
pub fn commit(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    <AnsiTransactionManager as TransactionManager<SqliteConnection>>::commit_transaction(conn)?;
    Ok(())
}

/// Rolls back the transaction opened by [`begin_immediate`].
///
/// # Errors
///
/// Returns an error if the rollback fails.
pub fn rollback(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    <AnsiTransactionManager as TransactionManager<SqliteConnection>>::rollback_transaction(conn)?;
    Ok(())
}

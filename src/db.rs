//! SQLite connection pool, schema setup and transaction helpers.

use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, Transaction};
use std::path::Path;
use std::time::Duration;

use crate::config::AppType;
use crate::constants::EXPECTED_DB_VERSION;
use crate::error::{DynError, StoreError, StoreResult};
use crate::queries::{ddl, metadata};

/// Open a file-based connection pool for production use
/// Enables WAL mode and foreign keys, creating the file if needed
pub async fn open_pool(db_path: &Path, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    info!("SQLite database: {}", db_path.display());
    Ok(pool)
}

/// Create tables and indexes for the given app, then record version and app type
pub async fn init_database_schema(pool: &SqlitePool, app_type: AppType) -> StoreResult<()> {
    let statements = match app_type {
        AppType::Booking => vec![
            ddl::create_metadata_table(),
            ddl::create_genres_table(),
            ddl::create_venues_table(),
            ddl::create_artists_table(),
            ddl::create_venue_genres_table(),
            ddl::create_artist_genres_table(),
            ddl::create_shows_table(),
            ddl::create_albums_table(),
            ddl::create_songs_table(),
            ddl::create_venues_location_index(),
            ddl::create_shows_venue_id_index(),
            ddl::create_shows_artist_id_index(),
        ],
        AppType::Trivia => vec![
            ddl::create_metadata_table(),
            ddl::create_categories_table(),
            ddl::create_questions_table(),
            ddl::create_questions_category_index(),
        ],
    };

    let mut tx = pool.begin().await?;
    let result = async {
        for sql in &statements {
            sqlx::query(sql).execute(&mut *tx).await?;
        }
        // Only written once; check_metadata catches a mismatch on later opens
        sqlx::query(&metadata::insert_or_ignore("version", EXPECTED_DB_VERSION))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&metadata::insert_or_ignore("app_type", app_type.as_str()))
            .execute(&mut *tx)
            .await?;
        Ok::<(), StoreError>(())
    }
    .await;
    commit_or_rollback(tx, result).await
}

/// Query a single metadata value by key
pub async fn query_metadata<'e, E>(executor: E, key: &str) -> Result<Option<String>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = metadata::select_by_key(key);
    sqlx::query_scalar(&sql).fetch_optional(executor).await
}

/// Refuse databases written by another schema version or initialized for the other app
pub async fn check_metadata(pool: &SqlitePool, app_type: AppType) -> Result<(), DynError> {
    let version = query_metadata(pool, "version")
        .await
        .map_err(|e| format!("Failed to read version from metadata: {}", e))?
        .ok_or("Database has no version metadata")?;

    if version != EXPECTED_DB_VERSION {
        return Err(format!(
            "Unsupported database version: '{}'. This application only supports version '{}'",
            version, EXPECTED_DB_VERSION
        )
        .into());
    }

    let stored_type = query_metadata(pool, "app_type")
        .await
        .map_err(|e| format!("Failed to read app_type from metadata: {}", e))?
        .ok_or("Database has no app_type metadata")?;

    if stored_type != app_type.as_str() {
        return Err(format!(
            "Database was initialized for '{}' but config asks for '{}'",
            stored_type,
            app_type.as_str()
        )
        .into());
    }

    Ok(())
}

/// Open the pool, create the schema if needed and verify its metadata
pub async fn prepare_database(
    db_path: &Path,
    app_type: AppType,
    max_connections: u32,
) -> Result<SqlitePool, DynError> {
    let pool = open_pool(db_path, max_connections).await?;
    // An existing database is checked before any tables of another app are created
    if let Ok(Some(_)) = query_metadata(&pool, "version").await {
        check_metadata(&pool, app_type).await?;
    }
    init_database_schema(&pool, app_type).await?;
    check_metadata(&pool, app_type).await?;
    Ok(pool)
}

/// Commit when `result` is Ok, roll back otherwise.
///
/// The original error wins over a failing rollback, which is only logged.
pub async fn commit_or_rollback<T>(
    tx: Transaction<'_, Sqlite>,
    result: StoreResult<T>,
) -> StoreResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!("Rollback failed after '{}': {}", err, rollback_err);
            }
            Err(err)
        }
    }
}

/// Count every row of a table
pub async fn count_rows<'e, E, T>(executor: E, table: T) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
    T: sea_query::Iden + 'static,
{
    let sql = crate::queries::count_all(table);
    sqlx::query_scalar(&sql).fetch_one(executor).await
}

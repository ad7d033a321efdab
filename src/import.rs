//! Food fixture import
//!
//! Loads a JSON array of food definitions and inserts them in batched
//! transactions. Invalid foods are skipped and reported; storage failures
//! abort the import, keeping the batches already committed.

use std::path::Path;

use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

use crate::db::{Database, DbError, DbResult};
use crate::models::{Food, FoodCreate};

/// Foods inserted per transaction
pub const BATCH_SIZE: usize = 500;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Summary of an import run
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub batches: usize,
    pub errors: Vec<String>,
}

/// Parse a fixture: a JSON array of food definitions
pub fn parse_fixture(json: &str) -> Result<Vec<FoodCreate>, ImportError> {
    Ok(serde_json::from_str(json)?)
}

/// Insert `foods` in transactions of at most `BATCH_SIZE`
pub fn import_foods(conn: &mut Connection, foods: &[FoodCreate]) -> DbResult<ImportReport> {
    let mut report = ImportReport {
        total: foods.len(),
        ..Default::default()
    };

    for (batch_index, batch) in foods.chunks(BATCH_SIZE).enumerate() {
        let tx = conn.transaction()?;
        let mut imported = 0;

        for (offset, food) in batch.iter().enumerate() {
            let index = batch_index * BATCH_SIZE + offset;
            match Food::insert(&tx, food) {
                Ok(_) => imported += 1,
                Err(DbError::Validation(reason)) => {
                    tracing::debug!("Skipping food #{} '{}': {}", index, food.name, reason);
                    report.skipped += 1;
                    report.errors.push(format!("#{} '{}': {}", index, food.name, reason));
                }
                Err(e) => return Err(e),
            }
        }

        tx.commit()?;
        report.imported += imported;
        report.batches += 1;
        tracing::info!(
            "Imported batch {} ({} foods, {} of {} total)",
            batch_index + 1,
            imported,
            report.imported,
            report.total
        );
    }

    Ok(report)
}

/// Read and import a fixture file
pub fn import_file(db: &Database, path: &Path) -> Result<ImportReport, ImportError> {
    let json = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let foods = parse_fixture(&json)?;

    let report = db.with_conn_mut(|conn| import_foods(conn, &foods))?;
    tracing::info!(
        "Import of {} finished: {} imported, {} skipped",
        path.display(),
        report.imported,
        report.skipped
    );
    Ok(report)
}

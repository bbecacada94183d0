use rusqlite::Connection;

use crate::db::repository::latest_barretts_pathology;

use super::types::{BarrettStatus, EngineError};

/// Derive a patient's current Barrett's state from their pathology history.
///
/// The status comes from the most recent Barrett's-positive record — never
/// from the most recent record overall. A patient whose latest biopsy is
/// negative after an earlier positive one is still a Barrett's patient for
/// surveillance purposes. Equal dates resolve to the most recently inserted
/// record.
pub fn resolve_status(conn: &Connection, patient_id: i64) -> Result<BarrettStatus, EngineError> {
    let Some(record) = latest_barretts_pathology(conn, patient_id)? else {
        return Ok(BarrettStatus::none());
    };

    tracing::debug!(
        patient_id,
        pathology_id = record.id,
        grade = record.dysplasia_grade.map(|g| g.as_str()),
        "resolved Barrett's status"
    );

    Ok(BarrettStatus {
        has_barretts: true,
        pathology_id: Some(record.id),
        latest_pathology_date: Some(record.pathology_date),
        dysplasia_grade: record.dysplasia_grade,
    })
}

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::RecallReason;
use crate::models::Recall;

const RECALL_COLUMNS: &str = "id, patient_id, recall_date, reason, notes, completed";

pub fn insert_recall(conn: &Connection, recall: &Recall) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO recalls (patient_id, recall_date, reason, notes, completed)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            recall.patient_id,
            recall.recall_date.to_string(),
            recall.reason.as_str(),
            recall.notes,
            recall.completed as i32,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_recall(conn: &Connection, id: i64) -> Result<Option<Recall>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {RECALL_COLUMNS} FROM recalls WHERE id = ?1"),
            params![id],
            recall_row,
        )
        .optional()?;
    row.map(recall_from_row).transpose()
}

/// All recalls for a patient, soonest first.
pub fn list_recalls_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Recall>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECALL_COLUMNS} FROM recalls WHERE patient_id = ?1
         ORDER BY recall_date ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![patient_id], recall_row)?;

    let mut recalls = Vec::new();
    for row in rows {
        recalls.push(recall_from_row(row?)?);
    }
    Ok(recalls)
}

/// Legacy association lookup: a recall matching the plan's patient, date and
/// Endoscopy reason. Oldest row wins when several match.
pub fn find_recall(
    conn: &Connection,
    patient_id: i64,
    date: NaiveDate,
    reason: RecallReason,
) -> Result<Option<Recall>, DatabaseError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {RECALL_COLUMNS} FROM recalls
                 WHERE patient_id = ?1 AND recall_date = ?2 AND reason = ?3
                 ORDER BY id ASC LIMIT 1"
            ),
            params![patient_id, date.to_string(), reason.as_str()],
            recall_row,
        )
        .optional()?;
    row.map(recall_from_row).transpose()
}

pub fn set_recall_completed(
    conn: &Connection,
    id: i64,
    completed: bool,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE recalls SET completed = ?1 WHERE id = ?2",
        params![completed as i32, id],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "recall".into(),
            id,
        });
    }
    Ok(())
}

pub fn reschedule_recall(
    conn: &Connection,
    id: i64,
    new_date: NaiveDate,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE recalls SET recall_date = ?1 WHERE id = ?2",
        params![new_date.to_string(), id],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "recall".into(),
            id,
        });
    }
    Ok(())
}

pub fn delete_recall(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM recalls WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "recall".into(),
            id,
        });
    }
    Ok(())
}

// Internal row type for Recall mapping
struct RecallRow {
    id: i64,
    patient_id: i64,
    recall_date: String,
    reason: String,
    notes: Option<String>,
    completed: i32,
}

fn recall_row(row: &rusqlite::Row<'_>) -> Result<RecallRow, rusqlite::Error> {
    Ok(RecallRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        recall_date: row.get(2)?,
        reason: row.get(3)?,
        notes: row.get(4)?,
        completed: row.get(5)?,
    })
}

fn recall_from_row(row: RecallRow) -> Result<Recall, DatabaseError> {
    Ok(Recall {
        id: row.id,
        patient_id: row.patient_id,
        recall_date: NaiveDate::parse_from_str(&row.recall_date, "%Y-%m-%d").unwrap_or_default(),
        reason: RecallReason::from_str(&row.reason)?,
        notes: row.notes,
        completed: row.completed != 0,
    })
}

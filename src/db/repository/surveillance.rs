use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{PathologyRecord, Patient, SurveillancePlan};

use super::pathology::latest_barretts_pathology;
use super::patient::get_patient;

const PLAN_COLUMNS: &str = "id, patient_id, next_egd, undecided, last_modified, linked_recall_id";

pub fn insert_surveillance_plan(
    conn: &Connection,
    plan: &SurveillancePlan,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO surveillance_plans (patient_id, next_egd, undecided, last_modified,
         linked_recall_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            plan.patient_id,
            plan.next_egd.map(|d| d.to_string()),
            plan.undecided as i32,
            plan.last_modified.to_string(),
            plan.linked_recall_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_surveillance_plan(
    conn: &Connection,
    id: i64,
) -> Result<Option<SurveillancePlan>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PLAN_COLUMNS} FROM surveillance_plans WHERE id = ?1"),
            params![id],
            plan_row,
        )
        .optional()?;
    Ok(row.map(plan_from_row))
}

/// Plan history for a patient, most recently modified first. The head of
/// this list is the plan shown as current.
pub fn list_surveillance_plans(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<SurveillancePlan>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLAN_COLUMNS} FROM surveillance_plans WHERE patient_id = ?1
         ORDER BY last_modified DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![patient_id], plan_row)?;

    let mut plans = Vec::new();
    for row in rows {
        plans.push(plan_from_row(row?));
    }
    Ok(plans)
}

/// The authoritative (most recently modified) plan, if any.
pub fn latest_surveillance_plan(
    conn: &Connection,
    patient_id: i64,
) -> Result<Option<SurveillancePlan>, DatabaseError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {PLAN_COLUMNS} FROM surveillance_plans WHERE patient_id = ?1
                 ORDER BY last_modified DESC, id DESC LIMIT 1"
            ),
            params![patient_id],
            plan_row,
        )
        .optional()?;
    Ok(row.map(plan_from_row))
}

pub fn set_plan_linked_recall(
    conn: &Connection,
    plan_id: i64,
    recall_id: i64,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE surveillance_plans SET linked_recall_id = ?1 WHERE id = ?2",
        params![recall_id, plan_id],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "surveillance_plan".into(),
            id: plan_id,
        });
    }
    Ok(())
}

pub fn delete_surveillance_plan(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM surveillance_plans WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "surveillance_plan".into(),
            id,
        });
    }
    Ok(())
}

/// Every patient with at least one Barrett's-positive pathology record,
/// with their latest Barrett's record and their authoritative plan.
/// Ordered by patient display name.
pub fn list_barretts_patients(
    conn: &Connection,
) -> Result<Vec<(Patient, PathologyRecord, Option<SurveillancePlan>)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.id FROM patients p
         WHERE EXISTS (SELECT 1 FROM pathology path
                       WHERE path.patient_id = p.id AND path.barretts = 1)
         ORDER BY p.last_name, p.first_name, p.id",
    )?;
    let ids: Vec<i64> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    let mut out = Vec::with_capacity(ids.len());
    for patient_id in ids {
        let patient = get_patient(conn, patient_id)?.ok_or(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: patient_id,
        })?;
        // The EXISTS filter guarantees at least one Barrett's-positive record.
        let pathology =
            latest_barretts_pathology(conn, patient_id)?.ok_or(DatabaseError::NotFound {
                entity_type: "pathology".into(),
                id: patient_id,
            })?;
        let plan = latest_surveillance_plan(conn, patient_id)?;
        out.push((patient, pathology, plan));
    }
    Ok(out)
}

// Internal row type for SurveillancePlan mapping
struct PlanRow {
    id: i64,
    patient_id: i64,
    next_egd: Option<String>,
    undecided: i32,
    last_modified: String,
    linked_recall_id: Option<i64>,
}

fn plan_row(row: &rusqlite::Row<'_>) -> Result<PlanRow, rusqlite::Error> {
    Ok(PlanRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        next_egd: row.get(2)?,
        undecided: row.get(3)?,
        last_modified: row.get(4)?,
        linked_recall_id: row.get(5)?,
    })
}

fn plan_from_row(row: PlanRow) -> SurveillancePlan {
    SurveillancePlan {
        id: row.id,
        patient_id: row.patient_id,
        next_egd: row
            .next_egd
            .filter(|d| !d.is_empty())
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        undecided: row.undecided != 0,
        last_modified: NaiveDate::parse_from_str(&row.last_modified, "%Y-%m-%d")
            .unwrap_or_default(),
        linked_recall_id: row.linked_recall_id,
    }
}

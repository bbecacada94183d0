use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::{Gender, ReferralSource};
use crate::models::Patient;

const PATIENT_COLUMNS: &str = "id, first_name, last_name, mrn, gender, dob, zip_code, bmi,
     referral_source, referral_details, initial_consult_date";

/// Insert a patient and return the new id. The MRN must be unique; a
/// duplicate surfaces as a constraint violation.
pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patients (first_name, last_name, mrn, gender, dob, zip_code, bmi,
         referral_source, referral_details, initial_consult_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            patient.first_name,
            patient.last_name,
            patient.mrn,
            patient.gender.map(|g| g.as_str()),
            patient.dob.map(|d| d.to_string()),
            patient.zip_code,
            patient.bmi,
            patient.referral_source.map(|r| r.as_str()),
            patient.referral_details,
            patient.initial_consult_date.map(|d| d.to_string()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
            params![id],
            patient_row,
        )
        .optional()?;
    row.map(patient_from_row).transpose()
}

pub fn mrn_exists(conn: &Connection, mrn: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE mrn = ?1",
        params![mrn],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Prefix search over first name, last name, and MRN, ordered by last name.
/// An empty term lists everyone.
pub fn search_patients(conn: &Connection, term: &str) -> Result<Vec<Patient>, DatabaseError> {
    let pattern = format!("{}%", term.trim());
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE first_name LIKE ?1 OR last_name LIKE ?1 OR mrn LIKE ?1
         ORDER BY last_name, first_name"
    ))?;
    let rows = stmt.query_map(params![pattern], patient_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE patients SET first_name = ?1, last_name = ?2, mrn = ?3, gender = ?4,
         dob = ?5, zip_code = ?6, bmi = ?7, referral_source = ?8, referral_details = ?9,
         initial_consult_date = ?10
         WHERE id = ?11",
        params![
            patient.first_name,
            patient.last_name,
            patient.mrn,
            patient.gender.map(|g| g.as_str()),
            patient.dob.map(|d| d.to_string()),
            patient.zip_code,
            patient.bmi,
            patient.referral_source.map(|r| r.as_str()),
            patient.referral_details,
            patient.initial_consult_date.map(|d| d.to_string()),
            patient.id,
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: patient.id,
        });
    }
    Ok(())
}

/// Delete a patient and every clinical record attached to them, in one
/// transaction. Surveillance rows go before recalls so the linked-recall
/// reference never dangles mid-delete.
pub fn delete_patient_cascade(conn: &mut Connection, id: i64) -> Result<(), DatabaseError> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM diagnostics WHERE patient_id = ?1", params![id])?;
    tx.execute("DELETE FROM pathology WHERE patient_id = ?1", params![id])?;
    tx.execute(
        "DELETE FROM surgical_history WHERE patient_id = ?1",
        params![id],
    )?;
    tx.execute(
        "DELETE FROM surveillance_plans WHERE patient_id = ?1",
        params![id],
    )?;
    tx.execute("DELETE FROM recalls WHERE patient_id = ?1", params![id])?;
    let deleted = tx.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id,
        });
    }
    tx.commit()?;
    tracing::info!(patient_id = id, "Deleted patient and all linked records");
    Ok(())
}

// Internal row type for Patient mapping
struct PatientRow {
    id: i64,
    first_name: String,
    last_name: String,
    mrn: String,
    gender: Option<String>,
    dob: Option<String>,
    zip_code: Option<String>,
    bmi: Option<f64>,
    referral_source: Option<String>,
    referral_details: Option<String>,
    initial_consult_date: Option<String>,
}

fn patient_row(row: &rusqlite::Row<'_>) -> Result<PatientRow, rusqlite::Error> {
    Ok(PatientRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        mrn: row.get(3)?,
        gender: row.get(4)?,
        dob: row.get(5)?,
        zip_code: row.get(6)?,
        bmi: row.get(7)?,
        referral_source: row.get(8)?,
        referral_details: row.get(9)?,
        initial_consult_date: row.get(10)?,
    })
}

fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        mrn: row.mrn,
        gender: row
            .gender
            .filter(|s| !s.is_empty())
            .map(|s| Gender::from_str(&s))
            .transpose()?,
        dob: row
            .dob
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        zip_code: row.zip_code,
        bmi: row.bmi,
        referral_source: row
            .referral_source
            .filter(|s| !s.is_empty())
            .map(|s| ReferralSource::from_str(&s))
            .transpose()?,
        referral_details: row.referral_details,
        initial_consult_date: row
            .initial_consult_date
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
    })
}

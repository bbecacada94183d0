use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::DiagnosticRecord;

const DIAGNOSTIC_COLUMNS: &str = "id, patient_id, test_date, surgeon, endoscopy,
     esophagitis_grade, hiatal_hernia_size, endoscopy_findings, bravo, ph_impedance,
     demeester_score, ph_findings, endoflip, endoflip_findings, manometry,
     manometry_findings, gastric_emptying, percent_retained_4h, gastric_emptying_findings,
     imaging, imaging_findings, upper_gi, upper_gi_findings, notes";

pub fn insert_diagnostic(conn: &Connection, rec: &DiagnosticRecord) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO diagnostics (patient_id, test_date, surgeon, endoscopy, esophagitis_grade,
         hiatal_hernia_size, endoscopy_findings, bravo, ph_impedance, demeester_score,
         ph_findings, endoflip, endoflip_findings, manometry, manometry_findings,
         gastric_emptying, percent_retained_4h, gastric_emptying_findings, imaging,
         imaging_findings, upper_gi, upper_gi_findings, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19, ?20, ?21, ?22, ?23)",
        params![
            rec.patient_id,
            rec.test_date.to_string(),
            rec.surgeon,
            rec.endoscopy as i32,
            rec.esophagitis_grade,
            rec.hiatal_hernia_size,
            rec.endoscopy_findings,
            rec.bravo as i32,
            rec.ph_impedance as i32,
            rec.demeester_score,
            rec.ph_findings,
            rec.endoflip as i32,
            rec.endoflip_findings,
            rec.manometry as i32,
            rec.manometry_findings,
            rec.gastric_emptying as i32,
            rec.percent_retained_4h,
            rec.gastric_emptying_findings,
            rec.imaging as i32,
            rec.imaging_findings,
            rec.upper_gi as i32,
            rec.upper_gi_findings,
            rec.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_diagnostic(
    conn: &Connection,
    id: i64,
) -> Result<Option<DiagnosticRecord>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {DIAGNOSTIC_COLUMNS} FROM diagnostics WHERE id = ?1"),
            params![id],
            diagnostic_row,
        )
        .optional()?;
    Ok(row.map(diagnostic_from_row))
}

pub fn list_diagnostics(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<DiagnosticRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DIAGNOSTIC_COLUMNS} FROM diagnostics WHERE patient_id = ?1
         ORDER BY test_date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![patient_id], diagnostic_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(diagnostic_from_row(row?));
    }
    Ok(records)
}

/// Most recent diagnostic with an endoscopy, for the "last EGD" line on the
/// surveillance screen.
pub fn latest_endoscopy(
    conn: &Connection,
    patient_id: i64,
) -> Result<Option<DiagnosticRecord>, DatabaseError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {DIAGNOSTIC_COLUMNS} FROM diagnostics
                 WHERE patient_id = ?1 AND endoscopy = 1
                 ORDER BY test_date DESC, id DESC LIMIT 1"
            ),
            params![patient_id],
            diagnostic_row,
        )
        .optional()?;
    Ok(row.map(diagnostic_from_row))
}

pub fn update_diagnostic(conn: &Connection, rec: &DiagnosticRecord) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE diagnostics SET test_date = ?1, surgeon = ?2, endoscopy = ?3,
         esophagitis_grade = ?4, hiatal_hernia_size = ?5, endoscopy_findings = ?6,
         bravo = ?7, ph_impedance = ?8, demeester_score = ?9, ph_findings = ?10,
         endoflip = ?11, endoflip_findings = ?12, manometry = ?13, manometry_findings = ?14,
         gastric_emptying = ?15, percent_retained_4h = ?16, gastric_emptying_findings = ?17,
         imaging = ?18, imaging_findings = ?19, upper_gi = ?20, upper_gi_findings = ?21,
         notes = ?22
         WHERE id = ?23",
        params![
            rec.test_date.to_string(),
            rec.surgeon,
            rec.endoscopy as i32,
            rec.esophagitis_grade,
            rec.hiatal_hernia_size,
            rec.endoscopy_findings,
            rec.bravo as i32,
            rec.ph_impedance as i32,
            rec.demeester_score,
            rec.ph_findings,
            rec.endoflip as i32,
            rec.endoflip_findings,
            rec.manometry as i32,
            rec.manometry_findings,
            rec.gastric_emptying as i32,
            rec.percent_retained_4h,
            rec.gastric_emptying_findings,
            rec.imaging as i32,
            rec.imaging_findings,
            rec.upper_gi as i32,
            rec.upper_gi_findings,
            rec.notes,
            rec.id,
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "diagnostic".into(),
            id: rec.id,
        });
    }
    Ok(())
}

pub fn delete_diagnostic(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM diagnostics WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "diagnostic".into(),
            id,
        });
    }
    Ok(())
}

// Internal row type for DiagnosticRecord mapping
struct DiagnosticRow {
    id: i64,
    patient_id: i64,
    test_date: String,
    surgeon: Option<String>,
    endoscopy: i32,
    esophagitis_grade: Option<String>,
    hiatal_hernia_size: Option<String>,
    endoscopy_findings: Option<String>,
    bravo: i32,
    ph_impedance: i32,
    demeester_score: Option<f64>,
    ph_findings: Option<String>,
    endoflip: i32,
    endoflip_findings: Option<String>,
    manometry: i32,
    manometry_findings: Option<String>,
    gastric_emptying: i32,
    percent_retained_4h: Option<f64>,
    gastric_emptying_findings: Option<String>,
    imaging: i32,
    imaging_findings: Option<String>,
    upper_gi: i32,
    upper_gi_findings: Option<String>,
    notes: Option<String>,
}

fn diagnostic_row(row: &rusqlite::Row<'_>) -> Result<DiagnosticRow, rusqlite::Error> {
    Ok(DiagnosticRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        test_date: row.get(2)?,
        surgeon: row.get(3)?,
        endoscopy: row.get(4)?,
        esophagitis_grade: row.get(5)?,
        hiatal_hernia_size: row.get(6)?,
        endoscopy_findings: row.get(7)?,
        bravo: row.get(8)?,
        ph_impedance: row.get(9)?,
        demeester_score: row.get(10)?,
        ph_findings: row.get(11)?,
        endoflip: row.get(12)?,
        endoflip_findings: row.get(13)?,
        manometry: row.get(14)?,
        manometry_findings: row.get(15)?,
        gastric_emptying: row.get(16)?,
        percent_retained_4h: row.get(17)?,
        gastric_emptying_findings: row.get(18)?,
        imaging: row.get(19)?,
        imaging_findings: row.get(20)?,
        upper_gi: row.get(21)?,
        upper_gi_findings: row.get(22)?,
        notes: row.get(23)?,
    })
}

fn diagnostic_from_row(row: DiagnosticRow) -> DiagnosticRecord {
    DiagnosticRecord {
        id: row.id,
        patient_id: row.patient_id,
        test_date: NaiveDate::parse_from_str(&row.test_date, "%Y-%m-%d").unwrap_or_default(),
        surgeon: row.surgeon,
        endoscopy: row.endoscopy != 0,
        esophagitis_grade: row.esophagitis_grade,
        hiatal_hernia_size: row.hiatal_hernia_size,
        endoscopy_findings: row.endoscopy_findings,
        bravo: row.bravo != 0,
        ph_impedance: row.ph_impedance != 0,
        demeester_score: row.demeester_score,
        ph_findings: row.ph_findings,
        endoflip: row.endoflip != 0,
        endoflip_findings: row.endoflip_findings,
        manometry: row.manometry != 0,
        manometry_findings: row.manometry_findings,
        gastric_emptying: row.gastric_emptying != 0,
        percent_retained_4h: row.percent_retained_4h,
        gastric_emptying_findings: row.gastric_emptying_findings,
        imaging: row.imaging != 0,
        imaging_findings: row.imaging_findings,
        upper_gi: row.upper_gi != 0,
        upper_gi_findings: row.upper_gi_findings,
        notes: row.notes,
    }
}

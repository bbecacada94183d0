use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::DysplasiaGrade;
use crate::models::PathologyRecord;

const PATHOLOGY_COLUMNS: &str = "id, patient_id, pathology_date, biopsy, wats3d, eso_predict,
     tissue_cypher, barretts, dysplasia_grade, eoe, eosinophil_count, h_pylori,
     atrophic_gastritis, other_finding, eso_predict_risk, tissue_cypher_risk, notes";

pub fn insert_pathology(conn: &Connection, rec: &PathologyRecord) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO pathology (patient_id, pathology_date, biopsy, wats3d, eso_predict,
         tissue_cypher, barretts, dysplasia_grade, eoe, eosinophil_count, h_pylori,
         atrophic_gastritis, other_finding, eso_predict_risk, tissue_cypher_risk, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            rec.patient_id,
            rec.pathology_date.to_string(),
            rec.biopsy as i32,
            rec.wats3d as i32,
            rec.eso_predict as i32,
            rec.tissue_cypher as i32,
            rec.barretts as i32,
            rec.dysplasia_grade.map(|g| g.as_str()),
            rec.eoe as i32,
            rec.eosinophil_count,
            rec.h_pylori as i32,
            rec.atrophic_gastritis as i32,
            rec.other_finding,
            rec.eso_predict_risk,
            rec.tissue_cypher_risk,
            rec.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_pathology(conn: &Connection, id: i64) -> Result<Option<PathologyRecord>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PATHOLOGY_COLUMNS} FROM pathology WHERE id = ?1"),
            params![id],
            pathology_row,
        )
        .optional()?;
    Ok(row.map(pathology_from_row))
}

/// All pathology for a patient, newest first (ties: newest insert first).
pub fn list_pathology(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<PathologyRecord>, DatabaseError> {
    query_pathology(
        conn,
        &format!(
            "SELECT {PATHOLOGY_COLUMNS} FROM pathology WHERE patient_id = ?1
             ORDER BY pathology_date DESC, id DESC"
        ),
        patient_id,
    )
}

/// Barrett's-positive pathology only, newest first.
pub fn list_pathology_with_barretts(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<PathologyRecord>, DatabaseError> {
    query_pathology(
        conn,
        &format!(
            "SELECT {PATHOLOGY_COLUMNS} FROM pathology WHERE patient_id = ?1 AND barretts = 1
             ORDER BY pathology_date DESC, id DESC"
        ),
        patient_id,
    )
}

/// Most recent pathology of any kind. Display-only lookup: Barrett's status
/// must come from `latest_barretts_pathology`, never from this.
pub fn latest_pathology(
    conn: &Connection,
    patient_id: i64,
) -> Result<Option<PathologyRecord>, DatabaseError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {PATHOLOGY_COLUMNS} FROM pathology WHERE patient_id = ?1
                 ORDER BY pathology_date DESC, id DESC LIMIT 1"
            ),
            params![patient_id],
            pathology_row,
        )
        .optional()?;
    Ok(row.map(pathology_from_row))
}

/// Most recent Barrett's-positive pathology. Equal dates resolve to the
/// most recently inserted row.
pub fn latest_barretts_pathology(
    conn: &Connection,
    patient_id: i64,
) -> Result<Option<PathologyRecord>, DatabaseError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {PATHOLOGY_COLUMNS} FROM pathology
                 WHERE patient_id = ?1 AND barretts = 1
                 ORDER BY pathology_date DESC, id DESC LIMIT 1"
            ),
            params![patient_id],
            pathology_row,
        )
        .optional()?;
    Ok(row.map(pathology_from_row))
}

/// Whether the patient has ever had a Barrett's-positive pathology record.
pub fn has_barretts_history(conn: &Connection, patient_id: i64) -> Result<bool, DatabaseError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM pathology WHERE patient_id = ?1 AND barretts = 1 LIMIT 1",
            params![patient_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn update_pathology(conn: &Connection, rec: &PathologyRecord) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE pathology SET pathology_date = ?1, biopsy = ?2, wats3d = ?3, eso_predict = ?4,
         tissue_cypher = ?5, barretts = ?6, dysplasia_grade = ?7, eoe = ?8,
         eosinophil_count = ?9, h_pylori = ?10, atrophic_gastritis = ?11, other_finding = ?12,
         eso_predict_risk = ?13, tissue_cypher_risk = ?14, notes = ?15
         WHERE id = ?16",
        params![
            rec.pathology_date.to_string(),
            rec.biopsy as i32,
            rec.wats3d as i32,
            rec.eso_predict as i32,
            rec.tissue_cypher as i32,
            rec.barretts as i32,
            rec.dysplasia_grade.map(|g| g.as_str()),
            rec.eoe as i32,
            rec.eosinophil_count,
            rec.h_pylori as i32,
            rec.atrophic_gastritis as i32,
            rec.other_finding,
            rec.eso_predict_risk,
            rec.tissue_cypher_risk,
            rec.notes,
            rec.id,
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "pathology".into(),
            id: rec.id,
        });
    }
    Ok(())
}

/// Delete one pathology entry. Does not touch recalls or plans; linked
/// cleanup is the caller's concern.
pub fn delete_pathology(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM pathology WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "pathology".into(),
            id,
        });
    }
    Ok(())
}

fn query_pathology(
    conn: &Connection,
    sql: &str,
    patient_id: i64,
) -> Result<Vec<PathologyRecord>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![patient_id], pathology_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(pathology_from_row(row?));
    }
    Ok(records)
}

// Internal row type for PathologyRecord mapping
struct PathologyRow {
    id: i64,
    patient_id: i64,
    pathology_date: String,
    biopsy: i32,
    wats3d: i32,
    eso_predict: i32,
    tissue_cypher: i32,
    barretts: i32,
    dysplasia_grade: Option<String>,
    eoe: i32,
    eosinophil_count: Option<f64>,
    h_pylori: i32,
    atrophic_gastritis: i32,
    other_finding: Option<String>,
    eso_predict_risk: Option<String>,
    tissue_cypher_risk: Option<String>,
    notes: Option<String>,
}

fn pathology_row(row: &rusqlite::Row<'_>) -> Result<PathologyRow, rusqlite::Error> {
    Ok(PathologyRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        pathology_date: row.get(2)?,
        biopsy: row.get(3)?,
        wats3d: row.get(4)?,
        eso_predict: row.get(5)?,
        tissue_cypher: row.get(6)?,
        barretts: row.get(7)?,
        dysplasia_grade: row.get(8)?,
        eoe: row.get(9)?,
        eosinophil_count: row.get(10)?,
        h_pylori: row.get(11)?,
        atrophic_gastritis: row.get(12)?,
        other_finding: row.get(13)?,
        eso_predict_risk: row.get(14)?,
        tissue_cypher_risk: row.get(15)?,
        notes: row.get(16)?,
    })
}

fn pathology_from_row(row: PathologyRow) -> PathologyRecord {
    PathologyRecord {
        id: row.id,
        patient_id: row.patient_id,
        pathology_date: NaiveDate::parse_from_str(&row.pathology_date, "%Y-%m-%d")
            .unwrap_or_default(),
        biopsy: row.biopsy != 0,
        wats3d: row.wats3d != 0,
        eso_predict: row.eso_predict != 0,
        tissue_cypher: row.tissue_cypher != 0,
        barretts: row.barretts != 0,
        // Free-form-compatible column: unrecognized text degrades to unspecified
        dysplasia_grade: row
            .dysplasia_grade
            .as_deref()
            .and_then(DysplasiaGrade::parse_lenient),
        eoe: row.eoe != 0,
        eosinophil_count: row.eosinophil_count,
        h_pylori: row.h_pylori != 0,
        atrophic_gastritis: row.atrophic_gastritis != 0,
        other_finding: row.other_finding,
        eso_predict_risk: row.eso_predict_risk,
        tissue_cypher_risk: row.tissue_cypher_risk,
        notes: row.notes,
    }
}

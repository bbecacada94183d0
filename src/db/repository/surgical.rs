use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::{SurgicalProcedures, SurgicalRecord};

const SURGICAL_COLUMNS: &str = "id, patient_id, surgery_date, surgeon, hiatal_hernia,
     paraesophageal_hernia, mesh_used, gastric_bypass, sleeve_gastrectomy, toupet, tif,
     nissen, dor, heller_myotomy, stretta, ablation, linx, gpoem, epoem, zpoem,
     pyloroplasty, revision, gastric_stimulator, dilation, other, notes";

pub fn insert_surgical(conn: &Connection, rec: &SurgicalRecord) -> Result<i64, DatabaseError> {
    let p = &rec.procedures;
    conn.execute(
        "INSERT INTO surgical_history (patient_id, surgery_date, surgeon, hiatal_hernia,
         paraesophageal_hernia, mesh_used, gastric_bypass, sleeve_gastrectomy, toupet, tif,
         nissen, dor, heller_myotomy, stretta, ablation, linx, gpoem, epoem, zpoem,
         pyloroplasty, revision, gastric_stimulator, dilation, other, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17,
                 ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)",
        params![
            rec.patient_id,
            rec.surgery_date.to_string(),
            rec.surgeon,
            p.hiatal_hernia as i32,
            p.paraesophageal_hernia as i32,
            p.mesh_used as i32,
            p.gastric_bypass as i32,
            p.sleeve_gastrectomy as i32,
            p.toupet as i32,
            p.tif as i32,
            p.nissen as i32,
            p.dor as i32,
            p.heller_myotomy as i32,
            p.stretta as i32,
            p.ablation as i32,
            p.linx as i32,
            p.gpoem as i32,
            p.epoem as i32,
            p.zpoem as i32,
            p.pyloroplasty as i32,
            p.revision as i32,
            p.gastric_stimulator as i32,
            p.dilation as i32,
            p.other as i32,
            rec.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_surgical(conn: &Connection, id: i64) -> Result<Option<SurgicalRecord>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {SURGICAL_COLUMNS} FROM surgical_history WHERE id = ?1"),
            params![id],
            surgical_row,
        )
        .optional()?;
    Ok(row.map(surgical_from_row))
}

pub fn list_surgical(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<SurgicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SURGICAL_COLUMNS} FROM surgical_history WHERE patient_id = ?1
         ORDER BY surgery_date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![patient_id], surgical_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(surgical_from_row(row?));
    }
    Ok(records)
}

pub fn delete_surgical(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM surgical_history WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "surgical".into(),
            id,
        });
    }
    Ok(())
}

/// Surgeon directory for the form dropdowns, alphabetical.
pub fn list_surgeons(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name FROM surgeons ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn add_surgeon(conn: &Connection, name: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO surgeons (name) VALUES (?1)",
        params![name],
    )?;
    Ok(())
}

// Internal row type; the 21 procedure flags come back in column order.
struct SurgicalRow {
    id: i64,
    patient_id: i64,
    surgery_date: String,
    surgeon: Option<String>,
    flags: [i32; 21],
    notes: Option<String>,
}

fn surgical_row(row: &rusqlite::Row<'_>) -> Result<SurgicalRow, rusqlite::Error> {
    let mut flags = [0i32; 21];
    for (i, flag) in flags.iter_mut().enumerate() {
        *flag = row.get(4 + i)?;
    }
    Ok(SurgicalRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        surgery_date: row.get(2)?,
        surgeon: row.get(3)?,
        flags,
        notes: row.get(25)?,
    })
}

fn surgical_from_row(row: SurgicalRow) -> SurgicalRecord {
    let f = |i: usize| row.flags[i] != 0;
    SurgicalRecord {
        id: row.id,
        patient_id: row.patient_id,
        surgery_date: NaiveDate::parse_from_str(&row.surgery_date, "%Y-%m-%d").unwrap_or_default(),
        surgeon: row.surgeon,
        procedures: SurgicalProcedures {
            hiatal_hernia: f(0),
            paraesophageal_hernia: f(1),
            mesh_used: f(2),
            gastric_bypass: f(3),
            sleeve_gastrectomy: f(4),
            toupet: f(5),
            tif: f(6),
            nissen: f(7),
            dor: f(8),
            heller_myotomy: f(9),
            stretta: f(10),
            ablation: f(11),
            linx: f(12),
            gpoem: f(13),
            epoem: f(14),
            zpoem: f(15),
            pyloroplasty: f(16),
            revision: f(17),
            gastric_stimulator: f(18),
            dilation: f(19),
            other: f(20),
        },
        notes: row.notes,
    }
}

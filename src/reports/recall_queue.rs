use chrono::{Days, NaiveDate};
use rusqlite::{params_from_iter, Connection};

use crate::db::repository::{has_barretts_history, latest_pathology};
use crate::models::enums::RecallReason;
use crate::models::filters::RecallQueueFilter;
use crate::models::Recall;
use crate::surveillance::EngineError;

use super::types::{RecallPriority, RecallRow, RecallStatus};

/// Project the recall queue: recalls joined to their patients, filtered,
/// status- and priority-annotated, enriched with each patient's latest
/// pathology summary, and deterministically ordered (date, then name, then
/// id). Recalls beyond the due-within window never appear; past-due ones
/// appear unless excluded.
pub fn project_recall_queue(
    conn: &Connection,
    filter: &RecallQueueFilter,
    today: NaiveDate,
) -> Result<Vec<RecallRow>, EngineError> {
    let deadline = today
        .checked_add_days(Days::new(filter.due_within_days.max(0) as u64))
        .unwrap_or(today);

    let mut sql = String::from(
        "SELECT r.id, r.patient_id, r.recall_date, r.reason, r.notes, r.completed,
                p.first_name, p.last_name, p.mrn
         FROM recalls r
         JOIN patients p ON r.patient_id = p.id
         WHERE 1=1",
    );
    let mut params: Vec<String> = Vec::new();

    if let Some(reason) = filter.reason {
        sql.push_str(" AND r.reason = ?");
        params.push(reason.as_str().to_string());
    }
    if !filter.include_completed {
        sql.push_str(" AND r.completed = 0");
    }
    sql.push_str(" AND r.recall_date <= ?");
    params.push(deadline.to_string());
    if !filter.include_past_due {
        sql.push_str(" AND r.recall_date >= ?");
        params.push(today.to_string());
    }
    sql.push_str(" ORDER BY r.recall_date ASC, r.id ASC");

    let mut stmt = conn.prepare(&sql).map_err(crate::db::DatabaseError::from)?;
    let candidates = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, i32>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
            ))
        })
        .map_err(crate::db::DatabaseError::from)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(crate::db::DatabaseError::from)?;

    let mut rows = Vec::with_capacity(candidates.len());
    for (id, patient_id, date_text, reason_text, notes, completed, first, last, mrn) in candidates {
        let recall_date =
            NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").unwrap_or_default();
        let reason: RecallReason = reason_text.parse()?;
        let completed = completed != 0;

        let has_barretts = has_barretts_history(conn, patient_id)?;
        if filter.barretts_only && !has_barretts {
            continue;
        }

        let days_until = (recall_date - today).num_days();
        let status =
            RecallStatus::classify(recall_date, completed, today, filter.due_within_days);
        let priority = RecallPriority::classify(status, days_until, has_barretts);
        let latest_pathology = latest_pathology(conn, patient_id)?.map(|p| p.summary_line());

        rows.push(RecallRow {
            recall: Recall {
                id,
                patient_id,
                recall_date,
                reason,
                notes,
                completed,
            },
            patient_name: format!("{last}, {first}"),
            mrn,
            status,
            priority,
            days_until,
            has_barretts,
            latest_pathology,
        });
    }

    rows.sort_by(|a, b| {
        (a.recall.recall_date, &a.patient_name, a.recall.id).cmp(&(
            b.recall.recall_date,
            &b.patient_name,
            b.recall.id,
        ))
    });

    tracing::debug!(rows = rows.len(), "projected recall queue");
    Ok(rows)
}

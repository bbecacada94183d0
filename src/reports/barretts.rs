use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::repository::list_barretts_patients;
use crate::models::filters::BarrettsReportFilter;
use crate::surveillance::{EngineError, SurveillanceUrgency};

use super::types::BarrettsRow;

/// Project the Barrett's surveillance report: every patient with a
/// Barrett's-positive pathology record, joined to their latest Barrett's
/// record and authoritative plan, classified against today.
///
/// Rows shown are past due (unless excluded), due within the window, and
/// undecided (unless excluded). Plans beyond the window, and patients with
/// no plan at all, are left off — the screen is a work queue, not a census.
/// Undecided plans sort first, then due date, then patient name.
pub fn project_barretts_report(
    conn: &Connection,
    filter: &BarrettsReportFilter,
    today: NaiveDate,
) -> Result<Vec<BarrettsRow>, EngineError> {
    let mut rows = Vec::new();

    for (patient, pathology, plan) in list_barretts_patients(conn)? {
        let urgency = SurveillanceUrgency::classify(plan.as_ref(), today, filter.due_within_days);
        let include = match urgency {
            SurveillanceUrgency::Overdue => filter.include_past_due,
            SurveillanceUrgency::DueSoon => true,
            SurveillanceUrgency::Undecided => filter.include_undecided,
            SurveillanceUrgency::Future | SurveillanceUrgency::NoPlan => false,
        };
        if !include {
            continue;
        }

        rows.push(BarrettsRow {
            patient_id: patient.id,
            patient_name: patient.display_name(),
            mrn: patient.mrn,
            dob: patient.dob,
            next_egd: plan.as_ref().and_then(|p| p.next_egd),
            urgency,
            pathology_date: pathology.pathology_date,
            dysplasia_grade: pathology.dysplasia_grade,
        });
    }

    rows.sort_by(|a, b| {
        let key = |r: &BarrettsRow| {
            (
                (r.urgency != SurveillanceUrgency::Undecided) as u8,
                r.next_egd.unwrap_or(NaiveDate::MAX),
                r.patient_name.clone(),
                r.patient_id,
            )
        };
        key(a).cmp(&key(b))
    });

    tracing::debug!(rows = rows.len(), "projected Barrett's report");
    Ok(rows)
}

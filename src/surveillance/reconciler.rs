use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::repository::{
    delete_recall, delete_surveillance_plan, find_recall, get_recall, get_surveillance_plan,
    insert_recall, insert_surveillance_plan, set_plan_linked_recall,
};
use crate::events::{ChangeNotifier, EntityChange};
use crate::models::enums::{EntityKind, RecallReason};
use crate::models::{Recall, SurveillancePlan};

use super::types::{EngineError, PlanDeleteResult, PlanDue, PlanSaveResult};

const AUTO_RECALL_NOTES: &str = "Auto-created from Surveillance";

/// Save a surveillance plan. Always inserts a new row — plans are never
/// edited in place, and the most recently saved one is authoritative.
///
/// With a concrete due date and `create_recall` (the caller asks the user;
/// no prompting happens here), an Endoscopy recall is inserted on the same
/// date and linked to the plan. Plan and recall go in one transaction, so a
/// failure leaves neither behind. `create_recall` is ignored for undecided
/// plans — there is no date to recall against.
pub fn save_plan(
    conn: &mut Connection,
    notifier: &ChangeNotifier,
    patient_id: i64,
    due: PlanDue,
    create_recall: bool,
    today: NaiveDate,
) -> Result<PlanSaveResult, EngineError> {
    let (next_egd, undecided) = match due {
        PlanDue::Date(d) => (Some(d), false),
        PlanDue::Undecided => (None, true),
    };

    let tx = conn.transaction().map_err(crate::db::DatabaseError::from)?;

    let plan_id = insert_surveillance_plan(
        &tx,
        &SurveillancePlan {
            id: 0,
            patient_id,
            next_egd,
            undecided,
            last_modified: today,
            linked_recall_id: None,
        },
    )?;

    let mut recall_id = None;
    if let (Some(due_date), true) = (next_egd, create_recall) {
        let id = insert_recall(
            &tx,
            &Recall {
                id: 0,
                patient_id,
                recall_date: due_date,
                reason: RecallReason::Endoscopy,
                notes: Some(AUTO_RECALL_NOTES.into()),
                completed: false,
            },
        )?;
        set_plan_linked_recall(&tx, plan_id, id)?;
        recall_id = Some(id);
    }

    tx.commit().map_err(crate::db::DatabaseError::from)?;

    tracing::info!(patient_id, plan_id, ?recall_id, "saved surveillance plan");
    notifier.notify(EntityChange {
        patient_id,
        entity: EntityKind::SurveillancePlan,
    });
    if recall_id.is_some() {
        notifier.notify(EntityChange {
            patient_id,
            entity: EntityKind::Recall,
        });
    }

    Ok(PlanSaveResult { plan_id, recall_id })
}

/// The recall that belongs to this plan, if any: the explicitly linked one,
/// else the legacy match on (patient, due date, reason = Endoscopy) for
/// plans saved before links existed. Callers use this to decide whether to
/// offer recall deletion alongside plan deletion.
pub fn linked_recall(conn: &Connection, plan_id: i64) -> Result<Option<Recall>, EngineError> {
    let plan = get_surveillance_plan(conn, plan_id)?.ok_or(EngineError::NotFound {
        entity: "surveillance plan",
        id: plan_id,
    })?;
    linked_recall_of(conn, &plan)
}

fn linked_recall_of(
    conn: &Connection,
    plan: &SurveillancePlan,
) -> Result<Option<Recall>, EngineError> {
    if let Some(recall_id) = plan.linked_recall_id {
        return Ok(get_recall(conn, recall_id)?);
    }
    match plan.next_egd {
        Some(due) => Ok(find_recall(
            conn,
            plan.patient_id,
            due,
            RecallReason::Endoscopy,
        )?),
        None => Ok(None),
    }
}

/// Delete a surveillance plan. The linked recall is deleted only when the
/// caller confirmed (`delete_linked_recall`); without a confirmation, or
/// without a matching recall, the recall table is untouched.
pub fn delete_plan(
    conn: &mut Connection,
    notifier: &ChangeNotifier,
    plan_id: i64,
    delete_linked_recall: bool,
) -> Result<PlanDeleteResult, EngineError> {
    let plan = get_surveillance_plan(conn, plan_id)?.ok_or(EngineError::NotFound {
        entity: "surveillance plan",
        id: plan_id,
    })?;
    let linked = linked_recall_of(conn, &plan)?;

    let tx = conn.transaction().map_err(crate::db::DatabaseError::from)?;
    delete_surveillance_plan(&tx, plan_id)?;

    let mut deleted_recall_id = None;
    if delete_linked_recall {
        if let Some(recall) = linked {
            delete_recall(&tx, recall.id)?;
            deleted_recall_id = Some(recall.id);
        }
    }
    tx.commit().map_err(crate::db::DatabaseError::from)?;

    tracing::info!(
        patient_id = plan.patient_id,
        plan_id,
        ?deleted_recall_id,
        "deleted surveillance plan"
    );
    notifier.notify(EntityChange {
        patient_id: plan.patient_id,
        entity: EntityKind::SurveillancePlan,
    });
    if deleted_recall_id.is_some() {
        notifier.notify(EntityChange {
            patient_id: plan.patient_id,
            entity: EntityKind::Recall,
        });
    }

    Ok(PlanDeleteResult { deleted_recall_id })
}

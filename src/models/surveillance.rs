use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One saved surveillance plan. The table is append-only: saving a plan
/// always inserts a new row, and the row with the latest `last_modified`
/// (id as tie-break) is the one shown as current.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveillancePlan {
    pub id: i64,
    pub patient_id: i64,
    /// Absent when the plan is undecided.
    pub next_egd: Option<NaiveDate>,
    pub undecided: bool,
    pub last_modified: NaiveDate,
    /// Recall auto-created alongside this plan, if the user opted in.
    pub linked_recall_id: Option<i64>,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::RecallReason;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recall {
    pub id: i64,
    pub patient_id: i64,
    pub recall_date: NaiveDate,
    pub reason: RecallReason,
    pub notes: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surgeon {
    pub id: i64,
    pub name: String,
}

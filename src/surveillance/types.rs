use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::enums::DysplasiaGrade;
use crate::models::SurveillancePlan;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] DatabaseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
}

/// A patient's current Barrett's state, derived from the most recent
/// Barrett's-positive pathology record. A later Barrett's-negative record
/// does not clear it: Barrett's does not resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrettStatus {
    pub has_barretts: bool,
    /// Id of the record the status came from, for click-through.
    pub pathology_id: Option<i64>,
    pub latest_pathology_date: Option<NaiveDate>,
    pub dysplasia_grade: Option<DysplasiaGrade>,
}

impl BarrettStatus {
    pub fn none() -> Self {
        Self {
            has_barretts: false,
            pathology_id: None,
            latest_pathology_date: None,
            dysplasia_grade: None,
        }
    }
}

/// Advisory surveillance interval for a Barrett's patient. Pre-fills the
/// date picker; the user may always override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalAdvice {
    pub months: u32,
    pub label: &'static str,
}

/// Where a plan stands relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurveillanceUrgency {
    Overdue,
    DueSoon,
    Future,
    Undecided,
    NoPlan,
}

impl SurveillanceUrgency {
    /// Classify a plan (or its absence) against today. `window_days` is the
    /// due-soon horizon: the report screens use 90, the per-patient list one
    /// year.
    pub fn classify(plan: Option<&SurveillancePlan>, today: NaiveDate, window_days: i64) -> Self {
        let Some(plan) = plan else {
            return Self::NoPlan;
        };
        match plan.next_egd {
            // A dated row with undecided set should not exist, but a row
            // with neither date nor flag can (legacy data): both read as
            // undecided.
            None => Self::Undecided,
            Some(_) if plan.undecided => Self::Undecided,
            Some(due) => {
                let days_until = (due - today).num_days();
                if days_until < 0 {
                    Self::Overdue
                } else if days_until <= window_days {
                    Self::DueSoon
                } else {
                    Self::Future
                }
            }
        }
    }
}

/// What the caller wants saved: a concrete due date, or an explicitly
/// undecided plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDue {
    Date(NaiveDate),
    Undecided,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSaveResult {
    pub plan_id: i64,
    /// Set when a linked recall was created alongside the plan.
    pub recall_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDeleteResult {
    /// Set when the linked recall was deleted along with the plan.
    pub deleted_recall_id: Option<i64>,
}

/// today + months, using the 30-day month the date picker pre-fill has
/// always used.
pub fn months_from(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(30 * u64::from(months)))
        .unwrap_or(today)
}

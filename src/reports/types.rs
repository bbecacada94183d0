use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::enums::DysplasiaGrade;
use crate::models::Recall;
use crate::surveillance::SurveillanceUrgency;

/// Where a recall stands relative to today, for coloring and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecallStatus {
    Overdue,
    DueToday,
    DueSoon,
    Future,
    Completed,
}

impl RecallStatus {
    pub fn classify(
        recall_date: NaiveDate,
        completed: bool,
        today: NaiveDate,
        window_days: i64,
    ) -> Self {
        if completed {
            return Self::Completed;
        }
        let days_until = (recall_date - today).num_days();
        if days_until < 0 {
            Self::Overdue
        } else if days_until == 0 {
            Self::DueToday
        } else if days_until <= window_days {
            Self::DueSoon
        } else {
            Self::Future
        }
    }
}

/// Follow-up priority shown on the recall queue. Overdue recalls for
/// Barrett's patients outrank everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecallPriority {
    Critical,
    High,
    Medium,
    Low,
    Completed,
}

impl RecallPriority {
    pub fn classify(status: RecallStatus, days_until: i64, has_barretts: bool) -> Self {
        match status {
            RecallStatus::Completed => Self::Completed,
            RecallStatus::Overdue => {
                if has_barretts {
                    Self::Critical
                } else {
                    Self::High
                }
            }
            RecallStatus::DueToday => Self::High,
            _ if days_until <= 7 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// One row of the recall queue: the recall, its patient, and derived state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallRow {
    pub recall: Recall,
    /// "Last, First"
    pub patient_name: String,
    pub mrn: String,
    pub status: RecallStatus,
    pub priority: RecallPriority,
    pub days_until: i64,
    pub has_barretts: bool,
    /// Summary of the patient's most recent pathology of any kind —
    /// display enrichment only, not part of the status logic.
    pub latest_pathology: Option<String>,
}

/// One row of the Barrett's surveillance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarrettsRow {
    pub patient_id: i64,
    /// "Last, First"
    pub patient_name: String,
    pub mrn: String,
    pub dob: Option<NaiveDate>,
    pub next_egd: Option<NaiveDate>,
    pub urgency: SurveillanceUrgency,
    /// Date and grade of the latest Barrett's-positive pathology.
    pub pathology_date: NaiveDate,
    pub dysplasia_grade: Option<DysplasiaGrade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn status_five_way_rule() {
        let today = date(2025, 6, 15);
        let classify = |d: NaiveDate, done: bool| RecallStatus::classify(d, done, today, 30);

        assert_eq!(classify(date(2025, 6, 14), false), RecallStatus::Overdue);
        assert_eq!(classify(today, false), RecallStatus::DueToday);
        assert_eq!(classify(date(2025, 7, 15), false), RecallStatus::DueSoon);
        assert_eq!(classify(date(2025, 7, 16), false), RecallStatus::Future);
        // Completed wins regardless of date
        assert_eq!(classify(date(2025, 6, 1), true), RecallStatus::Completed);
    }

    /// Report rows cross the presentation boundary as plain data.
    #[test]
    fn recall_row_serializes() {
        use crate::models::enums::RecallReason;

        let row = RecallRow {
            recall: Recall {
                id: 3,
                patient_id: 7,
                recall_date: date(2025, 6, 1),
                reason: RecallReason::Endoscopy,
                notes: None,
                completed: false,
            },
            patient_name: "Olson, Margaret".into(),
            mrn: "MRN-1001".into(),
            status: RecallStatus::DueSoon,
            priority: RecallPriority::Medium,
            days_until: 5,
            has_barretts: true,
            latest_pathology: Some("2024-02-01: Biopsy, Barrett's".into()),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["patient_name"], "Olson, Margaret");
        assert_eq!(json["recall"]["recall_date"], "2025-06-01");
        assert_eq!(json["status"], "DueSoon");
    }

    #[test]
    fn priority_tiers() {
        assert_eq!(
            RecallPriority::classify(RecallStatus::Overdue, -10, true),
            RecallPriority::Critical
        );
        assert_eq!(
            RecallPriority::classify(RecallStatus::Overdue, -10, false),
            RecallPriority::High
        );
        assert_eq!(
            RecallPriority::classify(RecallStatus::DueToday, 0, false),
            RecallPriority::High
        );
        assert_eq!(
            RecallPriority::classify(RecallStatus::DueSoon, 5, false),
            RecallPriority::Medium
        );
        assert_eq!(
            RecallPriority::classify(RecallStatus::DueSoon, 21, false),
            RecallPriority::Low
        );
        assert_eq!(
            RecallPriority::classify(RecallStatus::Completed, 0, true),
            RecallPriority::Completed
        );
    }
}

use super::enums::RecallReason;

/// Filters for the recall-queue projection. Defaults mirror the report
/// screen: 30-day window, past due shown, completed hidden.
#[derive(Debug, Clone)]
pub struct RecallQueueFilter {
    /// None = all reasons.
    pub reason: Option<RecallReason>,
    pub include_completed: bool,
    /// Recalls due within this many days of today qualify.
    pub due_within_days: i64,
    pub include_past_due: bool,
    /// Restrict to patients with any Barrett's-positive pathology, ever.
    pub barretts_only: bool,
}

impl Default for RecallQueueFilter {
    fn default() -> Self {
        Self {
            reason: None,
            include_completed: false,
            due_within_days: 30,
            include_past_due: true,
            barretts_only: false,
        }
    }
}

/// Filters for the Barrett's surveillance report. Defaults mirror the report
/// screen: 90-day window, past due and undecided both shown.
#[derive(Debug, Clone)]
pub struct BarrettsReportFilter {
    pub due_within_days: i64,
    pub include_past_due: bool,
    pub include_undecided: bool,
}

impl Default for BarrettsReportFilter {
    fn default() -> Self {
        Self {
            due_within_days: 90,
            include_past_due: true,
            include_undecided: true,
        }
    }
}

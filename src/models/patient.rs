use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{Gender, ReferralSource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Medical record number; unique across the clinic.
    pub mrn: String,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub zip_code: Option<String>,
    pub bmi: Option<f64>,
    pub referral_source: Option<ReferralSource>,
    pub referral_details: Option<String>,
    pub initial_consult_date: Option<NaiveDate>,
}

impl Patient {
    /// "Last, First" — the display and sort form used by every list view.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

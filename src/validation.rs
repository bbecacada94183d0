//! Field and cross-field checks shared by the entry workflows.
//!
//! Every check returns a human-readable message; nothing here touches the
//! database, so a failed validation never leaves partial state behind.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::PathologyRecord;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Test date must be between 1990 and today")]
    DateOutOfRange,

    #[error("DeMeester score must be a number between 0 and 500")]
    DemeesterOutOfRange,

    #[error("Percentage retained must be between 0 and 100")]
    PercentageOutOfRange,

    #[error("Surgeon name contains invalid characters")]
    InvalidSurgeonName,

    #[error("Eosinophil count must be a non-negative number")]
    InvalidEosinophilCount,

    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Clinical test dates are plausible from 1990 through today; nothing in the
/// future.
pub fn validate_test_date(d: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    let min = NaiveDate::from_ymd_opt(1990, 1, 1).expect("static date");
    if d < min || d > today {
        return Err(ValidationError::DateOutOfRange);
    }
    Ok(())
}

pub fn validate_demeester(score: Option<f64>) -> Result<(), ValidationError> {
    match score {
        Some(s) if !(0.0..=500.0).contains(&s) => Err(ValidationError::DemeesterOutOfRange),
        _ => Ok(()),
    }
}

pub fn validate_percentage(percent: Option<f64>) -> Result<(), ValidationError> {
    match percent {
        Some(p) if !(0.0..=100.0).contains(&p) => Err(ValidationError::PercentageOutOfRange),
        _ => Ok(()),
    }
}

/// First name, last name and MRN are the only required patient fields.
pub fn validate_patient_identity(
    first_name: &str,
    last_name: &str,
    mrn: &str,
) -> Result<(), ValidationError> {
    if first_name.trim().is_empty() {
        return Err(ValidationError::MissingField("First name"));
    }
    if last_name.trim().is_empty() {
        return Err(ValidationError::MissingField("Last name"));
    }
    if mrn.trim().is_empty() {
        return Err(ValidationError::MissingField("MRN"));
    }
    Ok(())
}

/// Letters, spaces, periods, commas, apostrophes, hyphens. Empty is fine
/// (the field is optional).
pub fn validate_surgeon_name(name: &str) -> Result<(), ValidationError> {
    static SURGEON_RE: OnceLock<Regex> = OnceLock::new();
    let re = SURGEON_RE.get_or_init(|| Regex::new(r"^[A-Za-z\s\.,'-]+$").expect("static regex"));

    let trimmed = name.trim();
    if trimmed.is_empty() || re.is_match(trimmed) {
        Ok(())
    } else {
        Err(ValidationError::InvalidSurgeonName)
    }
}

/// Cross-field rule for pathology entry, applied uniformly on both the add
/// and edit paths: a dysplasia grade is only meaningful with Barrett's, and
/// an eosinophil count only with EoE. Mirrors the entry form, which disables
/// and clears those fields rather than rejecting the save.
pub fn normalize_pathology(rec: &mut PathologyRecord) -> Result<(), ValidationError> {
    if !rec.barretts {
        rec.dysplasia_grade = None;
    }
    if !rec.eoe {
        rec.eosinophil_count = None;
    }
    if let Some(count) = rec.eosinophil_count {
        if !count.is_finite() || count < 0.0 {
            return Err(ValidationError::InvalidEosinophilCount);
        }
    }
    Ok(())
}

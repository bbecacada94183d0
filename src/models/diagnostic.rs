use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One diagnostic workup (a form-per-row table in the source system; each
/// section is a completed-flag plus its measurements/findings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub id: i64,
    pub patient_id: i64,
    pub test_date: NaiveDate,
    pub surgeon: Option<String>,
    // Endoscopy
    pub endoscopy: bool,
    pub esophagitis_grade: Option<String>,
    pub hiatal_hernia_size: Option<String>,
    pub endoscopy_findings: Option<String>,
    // Bravo / pH impedance
    pub bravo: bool,
    pub ph_impedance: bool,
    pub demeester_score: Option<f64>,
    pub ph_findings: Option<String>,
    // EndoFLIP
    pub endoflip: bool,
    pub endoflip_findings: Option<String>,
    // Manometry
    pub manometry: bool,
    pub manometry_findings: Option<String>,
    // Gastric emptying
    pub gastric_emptying: bool,
    pub percent_retained_4h: Option<f64>,
    pub gastric_emptying_findings: Option<String>,
    // Imaging / upper GI
    pub imaging: bool,
    pub imaging_findings: Option<String>,
    pub upper_gi: bool,
    pub upper_gi_findings: Option<String>,
    pub notes: Option<String>,
}

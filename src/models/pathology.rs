use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::DysplasiaGrade;

/// One pathology result set for a patient. The dysplasia grade is meaningful
/// only when `barretts` is set; `crate::validation::normalize_pathology`
/// enforces that before insert/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathologyRecord {
    pub id: i64,
    pub patient_id: i64,
    pub pathology_date: NaiveDate,
    // Test types
    pub biopsy: bool,
    pub wats3d: bool,
    pub eso_predict: bool,
    pub tissue_cypher: bool,
    // Findings
    pub barretts: bool,
    pub dysplasia_grade: Option<DysplasiaGrade>,
    pub eoe: bool,
    /// Eosinophils per high-power field, when EoE was assessed.
    pub eosinophil_count: Option<f64>,
    pub h_pylori: bool,
    pub atrophic_gastritis: bool,
    pub other_finding: Option<String>,
    // Risk scores (free text as reported by the assay vendors)
    pub eso_predict_risk: Option<String>,
    pub tissue_cypher_risk: Option<String>,
    pub notes: Option<String>,
}

impl PathologyRecord {
    /// One-line summary used to enrich recall-queue rows:
    /// "2024-03-01: Biopsy, Barrett's, Low Grade, H. pylori".
    pub fn summary_line(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.biopsy {
            parts.push("Biopsy".into());
        }
        if self.eso_predict {
            match self.eso_predict_risk.as_deref().filter(|r| !r.is_empty()) {
                Some(risk) => parts.push(format!("EsoPredict ({risk})")),
                None => parts.push("EsoPredict".into()),
            }
        }
        if self.tissue_cypher {
            match self.tissue_cypher_risk.as_deref().filter(|r| !r.is_empty()) {
                Some(risk) => parts.push(format!("TissueCypher ({risk})")),
                None => parts.push("TissueCypher".into()),
            }
        }
        if self.barretts {
            parts.push("Barrett's".into());
        }
        if let Some(grade) = self.dysplasia_grade {
            parts.push(grade.as_str().into());
        }
        if self.h_pylori {
            parts.push("H. pylori".into());
        }
        if self.atrophic_gastritis {
            parts.push("Atrophic Gastritis".into());
        }
        if self.eoe {
            match self.eosinophil_count {
                Some(count) => parts.push(format!("EoE ({count} eos)")),
                None => parts.push("EoE".into()),
            }
        }
        format!("{}: {}", self.pathology_date, parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_record() -> PathologyRecord {
        PathologyRecord {
            id: 1,
            patient_id: 1,
            pathology_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            biopsy: false,
            wats3d: false,
            eso_predict: false,
            tissue_cypher: false,
            barretts: false,
            dysplasia_grade: None,
            eoe: false,
            eosinophil_count: None,
            h_pylori: false,
            atrophic_gastritis: false,
            other_finding: None,
            eso_predict_risk: None,
            tissue_cypher_risk: None,
            notes: None,
        }
    }

    #[test]
    fn summary_line_joins_findings() {
        let mut rec = base_record();
        rec.biopsy = true;
        rec.barretts = true;
        rec.dysplasia_grade = Some(DysplasiaGrade::LowGrade);
        rec.h_pylori = true;
        assert_eq!(
            rec.summary_line(),
            "2024-03-01: Biopsy, Barrett's, Low Grade, H. pylori"
        );
    }

    #[test]
    fn summary_line_includes_risk_scores_and_eos() {
        let mut rec = base_record();
        rec.eso_predict = true;
        rec.eso_predict_risk = Some("High".into());
        rec.tissue_cypher = true;
        rec.eoe = true;
        rec.eosinophil_count = Some(22.0);
        assert_eq!(
            rec.summary_line(),
            "2024-03-01: EsoPredict (High), TissueCypher, EoE (22 eos)"
        );
    }
}

use chrono::NaiveDate;

use crate::models::enums::DysplasiaGrade;

use super::types::{months_from, BarrettStatus, IntervalAdvice};

const HIGH_GRADE: IntervalAdvice = IntervalAdvice {
    months: 3,
    label: "High-grade dysplasia – 3-month surveillance",
};
const LOW_GRADE: IntervalAdvice = IntervalAdvice {
    months: 6,
    label: "Low-grade dysplasia – 6-month surveillance",
};
const LOW_RISK: IntervalAdvice = IntervalAdvice {
    months: 36,
    label: "No/low-risk – 3-year surveillance",
};

/// Recommended next-EGD interval for a Barrett's patient.
///
/// High grade → 3 months, low grade → 6 months, everything else (no
/// dysplasia, NGIM, indeterminate, no grade recorded) → 3 years. Returns
/// None when the patient has no Barrett's record: the surveillance form then
/// offers a free-choice date with a warning instead of a recommendation.
/// Advisory only — the date picker pre-fill, never enforced.
pub fn recommend(status: &BarrettStatus) -> Option<IntervalAdvice> {
    if !status.has_barretts {
        return None;
    }
    Some(match status.dysplasia_grade {
        Some(DysplasiaGrade::HighGrade) => HIGH_GRADE,
        Some(DysplasiaGrade::LowGrade) => LOW_GRADE,
        _ => LOW_RISK,
    })
}

/// Pre-fill date for the recommended interval.
pub fn recommended_due_date(today: NaiveDate, advice: &IntervalAdvice) -> NaiveDate {
    months_from(today, advice.months)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_with(grade: Option<DysplasiaGrade>) -> BarrettStatus {
        BarrettStatus {
            has_barretts: true,
            pathology_id: Some(1),
            latest_pathology_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            dysplasia_grade: grade,
        }
    }

    #[test]
    fn grade_to_interval_mapping() {
        let cases = [
            (Some(DysplasiaGrade::HighGrade), 3),
            (Some(DysplasiaGrade::LowGrade), 6),
            (Some(DysplasiaGrade::NoDysplasia), 36),
            (Some(DysplasiaGrade::Ngim), 36),
            (Some(DysplasiaGrade::Indeterminate), 36),
            (None, 36),
        ];
        for (grade, months) in cases {
            let advice = recommend(&status_with(grade)).unwrap();
            assert_eq!(advice.months, months, "grade {grade:?}");
        }
    }

    #[test]
    fn labels_carry_urgency_wording() {
        assert_eq!(
            recommend(&status_with(Some(DysplasiaGrade::HighGrade)))
                .unwrap()
                .label,
            "High-grade dysplasia – 3-month surveillance"
        );
        assert_eq!(
            recommend(&status_with(Some(DysplasiaGrade::LowGrade)))
                .unwrap()
                .label,
            "Low-grade dysplasia – 6-month surveillance"
        );
        assert_eq!(
            recommend(&status_with(None)).unwrap().label,
            "No/low-risk – 3-year surveillance"
        );
    }

    #[test]
    fn no_barretts_no_recommendation() {
        assert_eq!(recommend(&BarrettStatus::none()), None);
    }

    /// Identical input always yields identical output.
    #[test]
    fn recommendation_is_pure() {
        let status = status_with(Some(DysplasiaGrade::HighGrade));
        assert_eq!(recommend(&status), recommend(&status));
    }

    #[test]
    fn due_date_prefill() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let advice = recommend(&status_with(Some(DysplasiaGrade::HighGrade))).unwrap();
        assert_eq!(
            recommended_due_date(today, &advice),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
        );
    }
}

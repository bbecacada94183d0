use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(RecallReason {
    OfficeVisit => "Office Visit",
    Endoscopy => "Endoscopy",
    BarrettsSurveillance => "Barrett's Surveillance",
    SurveillanceForm => "Surveillance Form",
    PostOpFollowUp => "Post-op Follow-up",
    LabReview => "Lab Review",
    Other => "Other",
});

str_enum!(DysplasiaGrade {
    Ngim => "NGIM",
    NoDysplasia => "No Dysplasia",
    Indeterminate => "Indeterminate",
    LowGrade => "Low Grade",
    HighGrade => "High Grade",
});

str_enum!(Gender {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

str_enum!(ReferralSource {
    SelfReferred => "Self",
    Physician => "Physician",
    Patient => "Patient",
    Other => "Other",
});

/// Entity kinds carried by change notifications.
str_enum!(EntityKind {
    Patient => "patient",
    Pathology => "pathology",
    Diagnostic => "diagnostic",
    Surgical => "surgical",
    SurveillancePlan => "surveillance_plan",
    Recall => "recall",
});

impl DysplasiaGrade {
    /// Lenient parse for the free-form-compatible column: case-insensitive,
    /// whitespace-trimmed. Unrecognized or blank text is "unspecified" (None),
    /// which the interval advisor treats as the 3-year default.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "ngim" => Some(Self::Ngim),
            "no dysplasia" => Some(Self::NoDysplasia),
            "indeterminate" => Some(Self::Indeterminate),
            "low grade" => Some(Self::LowGrade),
            "high grade" => Some(Self::HighGrade),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn recall_reason_round_trip() {
        for (variant, s) in [
            (RecallReason::OfficeVisit, "Office Visit"),
            (RecallReason::Endoscopy, "Endoscopy"),
            (RecallReason::BarrettsSurveillance, "Barrett's Surveillance"),
            (RecallReason::SurveillanceForm, "Surveillance Form"),
            (RecallReason::PostOpFollowUp, "Post-op Follow-up"),
            (RecallReason::LabReview, "Lab Review"),
            (RecallReason::Other, "Other"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(RecallReason::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn dysplasia_grade_round_trip() {
        for (variant, s) in [
            (DysplasiaGrade::Ngim, "NGIM"),
            (DysplasiaGrade::NoDysplasia, "No Dysplasia"),
            (DysplasiaGrade::Indeterminate, "Indeterminate"),
            (DysplasiaGrade::LowGrade, "Low Grade"),
            (DysplasiaGrade::HighGrade, "High Grade"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DysplasiaGrade::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn dysplasia_grade_lenient_parse() {
        assert_eq!(
            DysplasiaGrade::parse_lenient("high grade"),
            Some(DysplasiaGrade::HighGrade)
        );
        assert_eq!(
            DysplasiaGrade::parse_lenient("  Low Grade "),
            Some(DysplasiaGrade::LowGrade)
        );
        assert_eq!(DysplasiaGrade::parse_lenient(""), None);
        assert_eq!(DysplasiaGrade::parse_lenient("   "), None);
        assert_eq!(DysplasiaGrade::parse_lenient("see comment"), None);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(RecallReason::from_str("Phone Call").is_err());
        assert!(DysplasiaGrade::from_str("high grade").is_err());
        assert!(Gender::from_str("").is_err());
    }
}

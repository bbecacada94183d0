//! Repository layer — entity-scoped database operations.
//!
//! Free functions over `rusqlite::Connection`, one sub-module per entity.
//! All public functions are re-exported here.

mod diagnostic;
mod pathology;
mod patient;
mod recall;
mod surgical;
mod surveillance;

pub use diagnostic::*;
pub use pathology::*;
pub use patient::*;
pub use recall::*;
pub use surgical::*;
pub use surveillance::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::*;
    use crate::models::*;
    use chrono::NaiveDate;
    use rusqlite::Connection;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_patient(conn: &Connection, last: &str, first: &str, mrn: &str) -> i64 {
        insert_patient(
            conn,
            &Patient {
                id: 0,
                first_name: first.into(),
                last_name: last.into(),
                mrn: mrn.into(),
                gender: Some(Gender::Female),
                dob: Some(date(1961, 4, 12)),
                zip_code: Some("55401".into()),
                bmi: Some(27.4),
                referral_source: Some(ReferralSource::Physician),
                referral_details: None,
                initial_consult_date: Some(date(2023, 9, 5)),
            },
        )
        .unwrap()
    }

    fn make_pathology(
        conn: &Connection,
        patient_id: i64,
        day: NaiveDate,
        barretts: bool,
        grade: Option<DysplasiaGrade>,
    ) -> i64 {
        insert_pathology(
            conn,
            &PathologyRecord {
                id: 0,
                patient_id,
                pathology_date: day,
                biopsy: true,
                wats3d: false,
                eso_predict: false,
                tissue_cypher: false,
                barretts,
                dysplasia_grade: grade,
                eoe: false,
                eosinophil_count: None,
                h_pylori: false,
                atrophic_gastritis: false,
                other_finding: None,
                eso_predict_risk: None,
                tissue_cypher_risk: None,
                notes: None,
            },
        )
        .unwrap()
    }

    fn make_recall(
        conn: &Connection,
        patient_id: i64,
        day: NaiveDate,
        reason: RecallReason,
        completed: bool,
    ) -> i64 {
        insert_recall(
            conn,
            &Recall {
                id: 0,
                patient_id,
                recall_date: day,
                reason,
                notes: None,
                completed,
            },
        )
        .unwrap()
    }

    #[test]
    fn patient_insert_and_retrieve() {
        let conn = test_db();
        let id = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        let patient = get_patient(&conn, id).unwrap().unwrap();
        assert_eq!(patient.display_name(), "Olson, Margaret");
        assert_eq!(patient.mrn, "MRN-1001");
        assert_eq!(patient.gender, Some(Gender::Female));
        assert_eq!(patient.dob, Some(date(1961, 4, 12)));
    }

    #[test]
    fn patient_duplicate_mrn_rejected() {
        let conn = test_db();
        make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        let result = insert_patient(
            &conn,
            &Patient {
                id: 0,
                first_name: "Other".into(),
                last_name: "Person".into(),
                mrn: "MRN-1001".into(),
                gender: None,
                dob: None,
                zip_code: None,
                bmi: None,
                referral_source: None,
                referral_details: None,
                initial_consult_date: None,
            },
        );
        assert!(result.is_err());
        assert!(mrn_exists(&conn, "MRN-1001").unwrap());
        assert!(!mrn_exists(&conn, "MRN-9999").unwrap());
    }

    #[test]
    fn patient_search_matches_prefix_on_all_fields() {
        let conn = test_db();
        make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        make_patient(&conn, "Ortega", "Luis", "MRN-2002");
        make_patient(&conn, "Berg", "Olivia", "MRN-3003");

        // Last-name prefix
        let by_last = search_patients(&conn, "Ol").unwrap();
        assert_eq!(by_last.len(), 2); // Olson (last), Olivia (first)

        // MRN prefix
        let by_mrn = search_patients(&conn, "MRN-2").unwrap();
        assert_eq!(by_mrn.len(), 1);
        assert_eq!(by_mrn[0].last_name, "Ortega");

        // Empty term lists everyone, ordered by last name
        let all = search_patients(&conn, "").unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].last_name, "Berg");
    }

    #[test]
    fn patient_update_round_trip() {
        let conn = test_db();
        let id = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        let mut patient = get_patient(&conn, id).unwrap().unwrap();
        patient.zip_code = Some("55902".into());
        patient.bmi = Some(26.1);
        update_patient(&conn, &patient).unwrap();

        let reloaded = get_patient(&conn, id).unwrap().unwrap();
        assert_eq!(reloaded.zip_code.as_deref(), Some("55902"));
        assert_eq!(reloaded.bmi, Some(26.1));
    }

    #[test]
    fn patient_delete_cascades_all_tables() {
        let mut conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        make_pathology(&conn, pid, date(2024, 1, 1), true, None);
        make_recall(&conn, pid, date(2025, 1, 1), RecallReason::Endoscopy, false);
        insert_surveillance_plan(
            &conn,
            &SurveillancePlan {
                id: 0,
                patient_id: pid,
                next_egd: Some(date(2025, 1, 1)),
                undecided: false,
                last_modified: date(2024, 1, 1),
                linked_recall_id: None,
            },
        )
        .unwrap();

        delete_patient_cascade(&mut conn, pid).unwrap();

        assert!(get_patient(&conn, pid).unwrap().is_none());
        for table in ["pathology", "recalls", "surveillance_plans"] {
            let count: i64 = conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM {table} WHERE patient_id = ?1"),
                    [pid],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(count, 0, "{table} not emptied");
        }
    }

    #[test]
    fn patient_delete_missing_is_not_found() {
        let mut conn = test_db();
        let result = delete_patient_cascade(&mut conn, 424242);
        assert!(result.is_err());
    }

    #[test]
    fn pathology_foreign_key_enforced() {
        let conn = test_db();
        let result = insert_pathology(
            &conn,
            &PathologyRecord {
                id: 0,
                patient_id: 424242, // no such patient
                pathology_date: date(2024, 1, 1),
                biopsy: true,
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
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn pathology_listing_is_newest_first() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        make_pathology(&conn, pid, date(2023, 5, 1), false, None);
        make_pathology(&conn, pid, date(2024, 2, 1), true, Some(DysplasiaGrade::LowGrade));

        let all = list_pathology(&conn, pid).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].pathology_date, date(2024, 2, 1));

        let barretts = list_pathology_with_barretts(&conn, pid).unwrap();
        assert_eq!(barretts.len(), 1);
        assert_eq!(barretts[0].dysplasia_grade, Some(DysplasiaGrade::LowGrade));
    }

    #[test]
    fn latest_barretts_ignores_newer_negative_record() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        make_pathology(&conn, pid, date(2024, 1, 1), true, Some(DysplasiaGrade::LowGrade));
        make_pathology(&conn, pid, date(2024, 6, 1), false, None);

        let latest_b = latest_barretts_pathology(&conn, pid).unwrap().unwrap();
        assert_eq!(latest_b.pathology_date, date(2024, 1, 1));

        // The display lookup is distinct and does follow the newest record
        let latest_any = latest_pathology(&conn, pid).unwrap().unwrap();
        assert_eq!(latest_any.pathology_date, date(2024, 6, 1));
    }

    #[test]
    fn latest_barretts_equal_dates_newest_insert_wins() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        make_pathology(&conn, pid, date(2024, 1, 1), true, Some(DysplasiaGrade::NoDysplasia));
        let second = make_pathology(&conn, pid, date(2024, 1, 1), true, Some(DysplasiaGrade::HighGrade));

        let latest = latest_barretts_pathology(&conn, pid).unwrap().unwrap();
        assert_eq!(latest.id, second);
        assert_eq!(latest.dysplasia_grade, Some(DysplasiaGrade::HighGrade));
    }

    #[test]
    fn has_barretts_history_is_an_ever_check() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        assert!(!has_barretts_history(&conn, pid).unwrap());

        make_pathology(&conn, pid, date(2022, 1, 1), true, None);
        make_pathology(&conn, pid, date(2024, 1, 1), false, None);
        assert!(has_barretts_history(&conn, pid).unwrap());
    }

    #[test]
    fn pathology_unrecognized_grade_loads_as_unspecified() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        conn.execute(
            "INSERT INTO pathology (patient_id, pathology_date, barretts, dysplasia_grade)
             VALUES (?1, '2024-01-01', 1, 'see addendum')",
            [pid],
        )
        .unwrap();

        let rec = latest_barretts_pathology(&conn, pid).unwrap().unwrap();
        assert!(rec.barretts);
        assert_eq!(rec.dysplasia_grade, None);
    }

    #[test]
    fn pathology_update_and_delete() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        let path_id = make_pathology(&conn, pid, date(2024, 1, 1), true, None);

        let mut rec = get_pathology(&conn, path_id).unwrap().unwrap();
        rec.dysplasia_grade = Some(DysplasiaGrade::Indeterminate);
        rec.notes = Some("repeat in 6 months".into());
        update_pathology(&conn, &rec).unwrap();

        let reloaded = get_pathology(&conn, path_id).unwrap().unwrap();
        assert_eq!(reloaded.dysplasia_grade, Some(DysplasiaGrade::Indeterminate));

        delete_pathology(&conn, path_id).unwrap();
        assert!(get_pathology(&conn, path_id).unwrap().is_none());
        assert!(delete_pathology(&conn, path_id).is_err());
    }

    #[test]
    fn diagnostic_insert_and_latest_endoscopy() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");

        let mut rec = DiagnosticRecord {
            id: 0,
            patient_id: pid,
            test_date: date(2023, 3, 10),
            surgeon: Some("Dr. Carlson".into()),
            endoscopy: true,
            esophagitis_grade: Some("LA B".into()),
            hiatal_hernia_size: Some("2 cm".into()),
            endoscopy_findings: Some("Short-segment Barrett's".into()),
            bravo: false,
            ph_impedance: true,
            demeester_score: Some(31.2),
            ph_findings: None,
            endoflip: false,
            endoflip_findings: None,
            manometry: false,
            manometry_findings: None,
            gastric_emptying: false,
            percent_retained_4h: None,
            gastric_emptying_findings: None,
            imaging: false,
            imaging_findings: None,
            upper_gi: false,
            upper_gi_findings: None,
            notes: None,
        };
        insert_diagnostic(&conn, &rec).unwrap();

        // A later test without endoscopy must not displace the EGD lookup
        rec.test_date = date(2024, 1, 5);
        rec.endoscopy = false;
        rec.ph_impedance = false;
        rec.manometry = true;
        insert_diagnostic(&conn, &rec).unwrap();

        let egd = latest_endoscopy(&conn, pid).unwrap().unwrap();
        assert_eq!(egd.test_date, date(2023, 3, 10));
        assert_eq!(egd.demeester_score, Some(31.2));

        assert_eq!(list_diagnostics(&conn, pid).unwrap().len(), 2);
    }

    #[test]
    fn surgical_round_trip_preserves_procedures() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");

        let id = insert_surgical(
            &conn,
            &SurgicalRecord {
                id: 0,
                patient_id: pid,
                surgery_date: date(2021, 11, 2),
                surgeon: Some("Dr. Carlson".into()),
                procedures: SurgicalProcedures {
                    nissen: true,
                    hiatal_hernia: true,
                    mesh_used: true,
                    ..Default::default()
                },
                notes: Some("uneventful".into()),
            },
        )
        .unwrap();

        let rec = get_surgical(&conn, id).unwrap().unwrap();
        assert!(rec.procedures.nissen);
        assert!(rec.procedures.mesh_used);
        assert!(!rec.procedures.toupet);
        assert_eq!(
            rec.procedures.labels(),
            vec!["Hiatal Hernia", "Mesh Used", "Nissen"]
        );

        delete_surgical(&conn, id).unwrap();
        assert!(list_surgical(&conn, pid).unwrap().is_empty());
    }

    #[test]
    fn surgeon_directory_dedupes_and_sorts() {
        let conn = test_db();
        add_surgeon(&conn, "Dr. Zimmer").unwrap();
        add_surgeon(&conn, "Dr. Abel").unwrap();
        add_surgeon(&conn, "Dr. Zimmer").unwrap();
        assert_eq!(list_surgeons(&conn).unwrap(), vec!["Dr. Abel", "Dr. Zimmer"]);
    }

    #[test]
    fn recall_insert_toggle_reschedule_delete() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        let id = make_recall(&conn, pid, date(2025, 3, 1), RecallReason::OfficeVisit, false);

        set_recall_completed(&conn, id, true).unwrap();
        assert!(get_recall(&conn, id).unwrap().unwrap().completed);

        reschedule_recall(&conn, id, date(2025, 4, 1)).unwrap();
        assert_eq!(
            get_recall(&conn, id).unwrap().unwrap().recall_date,
            date(2025, 4, 1)
        );

        delete_recall(&conn, id).unwrap();
        assert!(get_recall(&conn, id).unwrap().is_none());
        assert!(set_recall_completed(&conn, id, false).is_err());
    }

    #[test]
    fn find_recall_matches_patient_date_reason() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        make_recall(&conn, pid, date(2025, 3, 1), RecallReason::OfficeVisit, false);
        let endo = make_recall(&conn, pid, date(2025, 3, 1), RecallReason::Endoscopy, false);

        let found = find_recall(&conn, pid, date(2025, 3, 1), RecallReason::Endoscopy)
            .unwrap()
            .unwrap();
        assert_eq!(found.id, endo);

        assert!(find_recall(&conn, pid, date(2025, 3, 2), RecallReason::Endoscopy)
            .unwrap()
            .is_none());
    }

    #[test]
    fn latest_plan_is_by_last_modified_then_id() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        insert_surveillance_plan(
            &conn,
            &SurveillancePlan {
                id: 0,
                patient_id: pid,
                next_egd: Some(date(2026, 1, 1)),
                undecided: false,
                last_modified: date(2024, 1, 1),
                linked_recall_id: None,
            },
        )
        .unwrap();
        let newer = insert_surveillance_plan(
            &conn,
            &SurveillancePlan {
                id: 0,
                patient_id: pid,
                next_egd: None,
                undecided: true,
                last_modified: date(2024, 6, 1),
                linked_recall_id: None,
            },
        )
        .unwrap();

        let latest = latest_surveillance_plan(&conn, pid).unwrap().unwrap();
        assert_eq!(latest.id, newer);
        assert!(latest.undecided);

        // Same-day saves: the later insert is authoritative
        let same_day = insert_surveillance_plan(
            &conn,
            &SurveillancePlan {
                id: 0,
                patient_id: pid,
                next_egd: Some(date(2027, 1, 1)),
                undecided: false,
                last_modified: date(2024, 6, 1),
                linked_recall_id: None,
            },
        )
        .unwrap();
        let latest = latest_surveillance_plan(&conn, pid).unwrap().unwrap();
        assert_eq!(latest.id, same_day);
    }

    #[test]
    fn deleting_linked_recall_nulls_plan_reference() {
        let conn = test_db();
        let pid = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        let recall_id = make_recall(&conn, pid, date(2025, 6, 1), RecallReason::Endoscopy, false);
        let plan_id = insert_surveillance_plan(
            &conn,
            &SurveillancePlan {
                id: 0,
                patient_id: pid,
                next_egd: Some(date(2025, 6, 1)),
                undecided: false,
                last_modified: date(2024, 6, 1),
                linked_recall_id: Some(recall_id),
            },
        )
        .unwrap();

        delete_recall(&conn, recall_id).unwrap();
        let plan = get_surveillance_plan(&conn, plan_id).unwrap().unwrap();
        assert_eq!(plan.linked_recall_id, None);
    }

    #[test]
    fn barretts_patients_listing() {
        let conn = test_db();
        let with_b = make_patient(&conn, "Olson", "Margaret", "MRN-1001");
        let without_b = make_patient(&conn, "Berg", "Olivia", "MRN-2002");
        make_pathology(&conn, with_b, date(2024, 1, 1), true, Some(DysplasiaGrade::LowGrade));
        make_pathology(&conn, without_b, date(2024, 1, 1), false, None);

        let rows = list_barretts_patients(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        let (patient, pathology, plan) = &rows[0];
        assert_eq!(patient.id, with_b);
        assert_eq!(pathology.dysplasia_grade, Some(DysplasiaGrade::LowGrade));
        assert!(plan.is_none());
    }
}
